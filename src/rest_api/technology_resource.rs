//! # Technology Resource
//!
//! REST endpoints for managing technologies, mounted under `/api`:
//!
//! - `POST   /technologies`      create, 201 with `Location`
//! - `PUT    /technologies`      update, or create when the body has no id
//! - `GET    /technologies`      list every record
//! - `GET    /technologies/:id`  fetch one record, 404 when absent
//! - `DELETE /technologies/:id`  delete, 200 even when absent

use std::sync::Arc;

use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{Path, State};
use axum::http::header::{HeaderValue, LOCATION};
use axum::http::{HeaderMap, StatusCode};
use axum::routing::get;
use axum::{Json, Router};

use crate::schema::{Technology, TechnologyDraft, ENTITY_NAME};
use crate::storage::{StorageResult, TechnologyRepository};

use super::alerts::AlertHeaders;
use super::errors::{ApiError, ApiResult};

/// Shared state for technology handlers
pub struct TechnologyState {
    pub repository: Arc<dyn TechnologyRepository>,
    pub alerts: AlertHeaders,
}

impl TechnologyState {
    pub fn new(repository: Arc<dyn TechnologyRepository>, alerts: AlertHeaders) -> Self {
        Self { repository, alerts }
    }

    /// Run a repository call on the blocking thread pool
    async fn storage<T, F>(&self, op: F) -> ApiResult<T>
    where
        T: Send + 'static,
        F: FnOnce(&dyn TechnologyRepository) -> StorageResult<T> + Send + 'static,
    {
        let repository = Arc::clone(&self.repository);
        let result = tokio::task::spawn_blocking(move || op(repository.as_ref()))
            .await
            .map_err(|e| ApiError::Internal(format!("storage task failed: {}", e)))?;
        Ok(result?)
    }
}

/// Response shape for create and update
type SavedResponse = (StatusCode, HeaderMap, Json<Technology>);

/// Create technology routes
pub fn technology_routes(state: Arc<TechnologyState>) -> Router {
    Router::new()
        .route(
            "/technologies",
            get(get_all_technologies)
                .post(create_technology)
                .put(update_technology),
        )
        .route(
            "/technologies/:id",
            get(get_technology).delete(delete_technology),
        )
        .with_state(state)
}

/// POST /technologies
async fn create_technology(
    State(state): State<Arc<TechnologyState>>,
    payload: Result<Json<TechnologyDraft>, JsonRejection>,
) -> ApiResult<SavedResponse> {
    let technology = validated(payload)?;
    tracing::debug!("REST request to save Technology : {}", technology);
    create(&state, technology).await
}

/// PUT /technologies
async fn update_technology(
    State(state): State<Arc<TechnologyState>>,
    payload: Result<Json<TechnologyDraft>, JsonRejection>,
) -> ApiResult<SavedResponse> {
    let technology = validated(payload)?;
    tracing::debug!("REST request to update Technology : {}", technology);

    let Some(id) = technology.id else {
        return create(&state, technology).await;
    };

    let result = state.storage(move |repo| repo.save(technology)).await?;
    // an id with no stored row was saved under a fresh one
    let id = result.id.unwrap_or(id);
    let headers = state.alerts.entity_updated(ENTITY_NAME, &id.to_string());
    Ok((StatusCode::OK, headers, Json(result)))
}

/// GET /technologies
async fn get_all_technologies(
    State(state): State<Arc<TechnologyState>>,
) -> ApiResult<Json<Vec<Technology>>> {
    tracing::debug!("REST request to get all Technologies");
    let technologies = state.storage(|repo| repo.find_all()).await?;
    Ok(Json(technologies))
}

/// GET /technologies/:id
async fn get_technology(
    State(state): State<Arc<TechnologyState>>,
    id: Result<Path<i64>, PathRejection>,
) -> ApiResult<Json<Technology>> {
    let Path(id) = id?;
    tracing::debug!("REST request to get Technology : {}", id);

    state
        .storage(move |repo| repo.find_by_id(id))
        .await?
        .map(Json)
        .ok_or(ApiError::NotFound)
}

/// DELETE /technologies/:id
async fn delete_technology(
    State(state): State<Arc<TechnologyState>>,
    id: Result<Path<i64>, PathRejection>,
) -> ApiResult<(StatusCode, HeaderMap)> {
    let Path(id) = id?;
    tracing::debug!("REST request to delete Technology : {}", id);

    state.storage(move |repo| repo.delete_by_id(id)).await?;
    let headers = state.alerts.entity_deleted(ENTITY_NAME, &id.to_string());
    Ok((StatusCode::OK, headers))
}

/// Parse and validate a request body. Validation precedes every other check.
fn validated(payload: Result<Json<TechnologyDraft>, JsonRejection>) -> ApiResult<Technology> {
    let Json(draft) = payload?;
    draft.into_technology().map_err(ApiError::Validation)
}

async fn create(state: &TechnologyState, technology: Technology) -> ApiResult<SavedResponse> {
    if technology.is_persisted() {
        return Err(ApiError::bad_request_alert(
            &state.alerts,
            "A new technology cannot already have an ID",
            ENTITY_NAME,
            "idexists",
        ));
    }

    let result = state.storage(move |repo| repo.save(technology)).await?;
    let id = result
        .id
        .ok_or_else(|| ApiError::Internal("saved technology has no id".to_string()))?;

    let mut headers = state.alerts.entity_created(ENTITY_NAME, &id.to_string());
    headers.insert(
        LOCATION,
        HeaderValue::try_from(format!("/api/technologies/{}", id))?,
    );
    Ok((StatusCode::CREATED, headers, Json(result)))
}
