//! Technology storage subsystem
//!
//! A single repository trait with two engines:
//!
//! - `memory`: ordered map, lost on restart
//! - `sqlite`: relational table with migrations
//!
//! # Guarantees
//!
//! - Ids are assigned once, on first save, and never reused
//! - Each save or delete is atomic on its own row
//! - Missing ids are `None` on lookup and a no-op on delete
//! - Concurrent writes to one id are last-write-wins

mod errors;
mod memory;
pub mod migrations;
mod repository;
mod sqlite;

use std::sync::Arc;

pub use errors::{StorageError, StorageErrorCode, StorageResult};
pub use memory::InMemoryTechnologyRepository;
pub use repository::TechnologyRepository;
pub use sqlite::SqliteTechnologyRepository;

use crate::config::{StorageBackend, StorageConfig};
use crate::log_event;
use crate::observability::Event;

/// Open the repository selected by configuration.
pub fn open_repository(config: &StorageConfig) -> StorageResult<Arc<dyn TechnologyRepository>> {
    match config.backend {
        StorageBackend::Memory => {
            log_event!(Event::StorageOpened, backend = "memory");
            Ok(Arc::new(InMemoryTechnologyRepository::new()))
        }
        StorageBackend::Sqlite => Ok(Arc::new(SqliteTechnologyRepository::open(&config.path)?)),
    }
}
