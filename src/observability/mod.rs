//! Observability subsystem
//!
//! Structured logging through `tracing`:
//! - Subscriber setup from configuration (JSON by default)
//! - Typed lifecycle events, each carrying its own structured fields
//!
//! # Usage
//!
//! ```ignore
//! use agrifarm::log_event;
//! use agrifarm::observability::Event;
//!
//! log_event!(Event::StorageOpened, backend = "sqlite", pool_size = 10);
//! ```

mod events;
mod logger;

pub use events::Event;
pub use logger::init_tracing;

/// Log a lifecycle event, at error level when the event is fatal.
///
/// Trailing arguments are `tracing` fields and keep their own keys in the
/// JSON output.
#[macro_export]
macro_rules! log_event {
    ($event:expr) => {{
        let event: $crate::observability::Event = $event;
        if event.is_fatal() {
            ::tracing::error!(event = event.as_str());
        } else {
            ::tracing::info!(event = event.as_str());
        }
    }};
    ($event:expr, $($field:tt)+) => {{
        let event: $crate::observability::Event = $event;
        if event.is_fatal() {
            ::tracing::error!(event = event.as_str(), $($field)+);
        } else {
            ::tracing::info!(event = event.as_str(), $($field)+);
        }
    }};
}
