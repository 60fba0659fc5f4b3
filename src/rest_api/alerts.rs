//! Notification headers
//!
//! Client tooling reads these to show user alerts:
//!
//! - `X-<app>-alert`: `<app>.<entity>.created|updated|deleted`
//! - `X-<app>-error`: `error.<errorKey>`
//! - `X-<app>-params`: affected id, or the entity name on failure

use axum::http::header::{HeaderName, HeaderValue, InvalidHeaderName};
use axum::http::HeaderMap;

/// Builds alert headers for one application name.
#[derive(Debug, Clone)]
pub struct AlertHeaders {
    application_name: String,
    alert: HeaderName,
    error: HeaderName,
    params: HeaderName,
}

impl AlertHeaders {
    /// Fails if the application name cannot appear in a header name.
    pub fn new(application_name: &str) -> Result<Self, InvalidHeaderName> {
        let name = |suffix: &str| {
            HeaderName::from_bytes(format!("X-{}-{}", application_name, suffix).as_bytes())
        };
        Ok(Self {
            application_name: application_name.to_string(),
            alert: name("alert")?,
            error: name("error")?,
            params: name("params")?,
        })
    }

    /// Generic success alert
    fn alert(&self, message: &str, param: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        self.insert(&mut headers, self.alert.clone(), message);
        self.insert(&mut headers, self.params.clone(), param);
        headers
    }

    pub fn entity_created(&self, entity_name: &str, id: &str) -> HeaderMap {
        self.entity_alert(entity_name, "created", id)
    }

    pub fn entity_updated(&self, entity_name: &str, id: &str) -> HeaderMap {
        self.entity_alert(entity_name, "updated", id)
    }

    pub fn entity_deleted(&self, entity_name: &str, id: &str) -> HeaderMap {
        self.entity_alert(entity_name, "deleted", id)
    }

    /// Failure alert for a rejected request
    pub fn failure(&self, entity_name: &str, error_key: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        self.insert(&mut headers, self.error.clone(), &format!("error.{}", error_key));
        self.insert(&mut headers, self.params.clone(), entity_name);
        headers
    }

    fn entity_alert(&self, entity_name: &str, action: &str, id: &str) -> HeaderMap {
        let message = format!("{}.{}.{}", self.application_name, entity_name, action);
        self.alert(&message, id)
    }

    fn insert(&self, headers: &mut HeaderMap, name: HeaderName, value: &str) {
        match HeaderValue::from_str(value) {
            Ok(value) => {
                headers.insert(name, value);
            }
            Err(_) => tracing::warn!(header = %name, "dropping alert header with invalid value"),
        }
    }
}
