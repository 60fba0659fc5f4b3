//! Technology API Tests
//!
//! Drives the full router with in-process requests against both storage
//! engines:
//! - create assigns an id and is readable back
//! - validation and `idexists` failures leave storage untouched
//! - update without id behaves like create
//! - delete is idempotent and followed by 404
//! - storage failures surface as a bare 500

use std::sync::Arc;

use agrifarm::http_server::build_router;
use agrifarm::http_server::HttpServerConfig;
use agrifarm::rest_api::{AlertHeaders, TechnologyState};
use agrifarm::storage::{StorageError, StorageResult};
use agrifarm::{
    InMemoryTechnologyRepository, SqliteTechnologyRepository, Technology, TechnologyRepository,
};
use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::response::Response;
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;

// =============================================================================
// Test Utilities
// =============================================================================

fn backends() -> Vec<(&'static str, Arc<dyn TechnologyRepository>)> {
    let memory: Arc<dyn TechnologyRepository> = Arc::new(InMemoryTechnologyRepository::new());
    let sqlite: Arc<dyn TechnologyRepository> =
        Arc::new(SqliteTechnologyRepository::open_in_memory().expect("open sqlite"));
    vec![("memory", memory), ("sqlite", sqlite)]
}

fn app(repository: Arc<dyn TechnologyRepository>) -> Router {
    let state = Arc::new(TechnologyState::new(
        repository,
        AlertHeaders::new("agrifarmApp").expect("valid app name"),
    ));
    build_router(&HttpServerConfig::default(), state).expect("default router")
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> Response {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string())),
        None => builder.body(Body::empty()),
    }
    .unwrap();

    app.clone().oneshot(request).await.unwrap()
}

async fn send_raw(app: &Router, method: Method, uri: &str, body: &str) -> Response {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    app.clone().oneshot(request).await.unwrap()
}

async fn json_body(response: Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

async fn list(app: &Router) -> Vec<Value> {
    let response = send(app, Method::GET, "/api/technologies", None).await;
    assert_eq!(response.status(), StatusCode::OK);
    json_body(response).await.as_array().unwrap().clone()
}

fn drip_irrigation() -> Value {
    json!({"name": "Drip Irrigation", "date": "2023-05-01"})
}

// =============================================================================
// Create
// =============================================================================

#[tokio::test]
async fn test_create_then_get_round_trip() {
    for (backend, repo) in backends() {
        let app = app(repo);

        let response = send(&app, Method::POST, "/api/technologies", Some(drip_irrigation())).await;
        assert_eq!(response.status(), StatusCode::CREATED, "{backend}");
        assert_eq!(response.headers()[header::LOCATION], "/api/technologies/1");
        assert_eq!(
            response.headers()["x-agrifarmapp-alert"],
            "agrifarmApp.technology.created"
        );
        assert_eq!(response.headers()["x-agrifarmapp-params"], "1");

        let created = json_body(response).await;
        assert_eq!(
            created,
            json!({"id": 1, "name": "Drip Irrigation", "description": null, "date": "2023-05-01"}),
            "{backend}"
        );

        let response = send(&app, Method::GET, "/api/technologies/1", None).await;
        assert_eq!(response.status(), StatusCode::OK, "{backend}");
        assert_eq!(json_body(response).await, created, "{backend}");
    }
}

#[tokio::test]
async fn test_create_keeps_description() {
    for (backend, repo) in backends() {
        let app = app(repo);
        let response = send(
            &app,
            Method::POST,
            "/api/technologies",
            Some(json!({
                "name": "Hydroponics",
                "description": "Soil-free cultivation in nutrient solution",
                "date": "2021-11-30"
            })),
        )
        .await;
        assert_eq!(response.status(), StatusCode::CREATED, "{backend}");

        let body = json_body(response).await;
        assert_eq!(body["description"], "Soil-free cultivation in nutrient solution");
        assert_eq!(body["date"], "2021-11-30");
    }
}

#[tokio::test]
async fn test_create_short_name_is_validation_error() {
    for (backend, repo) in backends() {
        let app = app(repo);
        let response = send(
            &app,
            Method::POST,
            "/api/technologies",
            Some(json!({"name": "ab", "date": "2023-05-01"})),
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{backend}");

        let body = json_body(response).await;
        assert_eq!(body["message"], "error.validation");
        assert_eq!(body["fieldErrors"][0]["field"], "name");
        assert_eq!(body["fieldErrors"][0]["message"], "Size");

        assert!(list(&app).await.is_empty(), "{backend}");
    }
}

#[tokio::test]
async fn test_create_missing_fields_lists_every_violation() {
    for (backend, repo) in backends() {
        let app = app(repo);
        let response = send(&app, Method::POST, "/api/technologies", Some(json!({}))).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{backend}");

        let body = json_body(response).await;
        let fields: Vec<_> = body["fieldErrors"]
            .as_array()
            .unwrap()
            .iter()
            .map(|v| v["field"].as_str().unwrap().to_string())
            .collect();
        assert_eq!(fields, vec!["name", "date"], "{backend}");
    }
}

#[tokio::test]
async fn test_create_with_id_is_rejected() {
    for (backend, repo) in backends() {
        let app = app(repo);
        let response = send(
            &app,
            Method::POST,
            "/api/technologies",
            Some(json!({"id": 7, "name": "Drip Irrigation", "date": "2023-05-01"})),
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{backend}");
        assert_eq!(response.headers()["x-agrifarmapp-error"], "error.idexists");
        assert_eq!(response.headers()["x-agrifarmapp-params"], "technology");

        let body = json_body(response).await;
        assert_eq!(body["errorKey"], "idexists");
        assert_eq!(body["entityName"], "technology");

        assert!(list(&app).await.is_empty(), "{backend}");
    }
}

#[tokio::test]
async fn test_validation_runs_before_id_check() {
    for (backend, repo) in backends() {
        let app = app(repo);
        let response = send(
            &app,
            Method::POST,
            "/api/technologies",
            Some(json!({"id": 7, "name": "ab", "date": "2023-05-01"})),
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{backend}");
        assert_eq!(json_body(response).await["message"], "error.validation");
    }
}

#[tokio::test]
async fn test_malformed_bodies() {
    for (backend, repo) in backends() {
        let app = app(repo);

        let response = send_raw(&app, Method::POST, "/api/technologies", "{not json").await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{backend}");
        assert_eq!(json_body(response).await["message"], "error.http.400");

        let response = send(
            &app,
            Method::POST,
            "/api/technologies",
            Some(json!({"name": "Drip Irrigation", "date": "May 1st"})),
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{backend}");

        assert!(list(&app).await.is_empty(), "{backend}");
    }
}

// =============================================================================
// Update
// =============================================================================

#[tokio::test]
async fn test_update_without_id_creates() {
    for (backend, repo) in backends() {
        let app = app(repo);
        let response = send(&app, Method::PUT, "/api/technologies", Some(drip_irrigation())).await;

        assert_eq!(response.status(), StatusCode::CREATED, "{backend}");
        assert_eq!(response.headers()[header::LOCATION], "/api/technologies/1");
        assert_eq!(
            response.headers()["x-agrifarmapp-alert"],
            "agrifarmApp.technology.created"
        );
        assert_eq!(json_body(response).await["id"], 1);
    }
}

#[tokio::test]
async fn test_update_with_unknown_max_id_gets_fresh_id() {
    for (backend, repo) in backends() {
        let app = app(repo);
        let mut body = drip_irrigation();
        body["id"] = json!(i64::MAX);

        let response = send(&app, Method::PUT, "/api/technologies", Some(body)).await;
        assert_eq!(response.status(), StatusCode::OK, "{backend}");
        assert_eq!(
            response.headers()["x-agrifarmapp-params"],
            "1",
            "{backend}"
        );
        assert_eq!(json_body(response).await["id"], 1, "{backend}");

        assert_eq!(list(&app).await.len(), 1, "{backend}");
        let response = send(&app, Method::POST, "/api/technologies", Some(drip_irrigation())).await;
        assert_eq!(response.status(), StatusCode::CREATED, "{backend}");
        assert_eq!(json_body(response).await["id"], 2, "{backend}");
    }
}

#[tokio::test]
async fn test_update_replaces_fields_and_keeps_id() {
    for (backend, repo) in backends() {
        let app = app(repo);
        send(&app, Method::POST, "/api/technologies", Some(drip_irrigation())).await;

        let response = send(
            &app,
            Method::PUT,
            "/api/technologies",
            Some(json!({
                "id": 1,
                "name": "Subsurface Drip",
                "description": "Buried emitter lines",
                "date": "2024-02-10"
            })),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK, "{backend}");
        assert_eq!(
            response.headers()["x-agrifarmapp-alert"],
            "agrifarmApp.technology.updated"
        );
        assert_eq!(response.headers()["x-agrifarmapp-params"], "1");

        let response = send(&app, Method::GET, "/api/technologies/1", None).await;
        assert_eq!(
            json_body(response).await,
            json!({
                "id": 1,
                "name": "Subsurface Drip",
                "description": "Buried emitter lines",
                "date": "2024-02-10"
            }),
            "{backend}"
        );
        assert_eq!(list(&app).await.len(), 1, "{backend}");
    }
}

#[tokio::test]
async fn test_update_clears_omitted_description() {
    for (backend, repo) in backends() {
        let app = app(repo);
        send(
            &app,
            Method::POST,
            "/api/technologies",
            Some(json!({"name": "Greenhouse", "description": "Glass", "date": "2020-01-01"})),
        )
        .await;

        send(
            &app,
            Method::PUT,
            "/api/technologies",
            Some(json!({"id": 1, "name": "Greenhouse", "date": "2020-01-01"})),
        )
        .await;

        let response = send(&app, Method::GET, "/api/technologies/1", None).await;
        assert_eq!(json_body(response).await["description"], Value::Null, "{backend}");
    }
}

#[tokio::test]
async fn test_update_invalid_body_rejected() {
    for (backend, repo) in backends() {
        let app = app(repo);
        send(&app, Method::POST, "/api/technologies", Some(drip_irrigation())).await;

        let response = send(
            &app,
            Method::PUT,
            "/api/technologies",
            Some(json!({"id": 1, "name": "x", "date": "2023-05-01"})),
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{backend}");

        let response = send(&app, Method::GET, "/api/technologies/1", None).await;
        assert_eq!(json_body(response).await["name"], "Drip Irrigation", "{backend}");
    }
}

// =============================================================================
// Get / List
// =============================================================================

#[tokio::test]
async fn test_get_missing_is_404() {
    for (backend, repo) in backends() {
        let app = app(repo);
        let response = send(&app, Method::GET, "/api/technologies/42", None).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND, "{backend}");
        assert_eq!(json_body(response).await["message"], "error.http.404");
    }
}

#[tokio::test]
async fn test_non_numeric_id_is_400() {
    for (backend, repo) in backends() {
        let app = app(repo);
        let response = send(&app, Method::GET, "/api/technologies/abc", None).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{backend}");

        let response = send(&app, Method::DELETE, "/api/technologies/abc", None).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{backend}");
    }
}

#[tokio::test]
async fn test_list_empty() {
    for (backend, repo) in backends() {
        let app = app(repo);
        assert!(list(&app).await.is_empty(), "{backend}");
    }
}

#[tokio::test]
async fn test_list_tracks_creates_and_deletes() {
    for (backend, repo) in backends() {
        let app = app(repo);
        for name in ["Drip Irrigation", "Hydroponics", "Agroforestry"] {
            let response = send(
                &app,
                Method::POST,
                "/api/technologies",
                Some(json!({"name": name, "date": "2023-05-01"})),
            )
            .await;
            assert_eq!(response.status(), StatusCode::CREATED, "{backend}");
        }
        send(&app, Method::DELETE, "/api/technologies/2", None).await;

        let mut names: Vec<_> = list(&app)
            .await
            .iter()
            .map(|v| v["name"].as_str().unwrap().to_string())
            .collect();
        names.sort();
        assert_eq!(names, vec!["Agroforestry", "Drip Irrigation"], "{backend}");
    }
}

// =============================================================================
// Delete
// =============================================================================

#[tokio::test]
async fn test_delete_then_get_is_404() {
    for (backend, repo) in backends() {
        let app = app(repo);
        send(&app, Method::POST, "/api/technologies", Some(drip_irrigation())).await;

        let response = send(&app, Method::DELETE, "/api/technologies/1", None).await;
        assert_eq!(response.status(), StatusCode::OK, "{backend}");
        assert_eq!(
            response.headers()["x-agrifarmapp-alert"],
            "agrifarmApp.technology.deleted"
        );
        assert_eq!(response.headers()["x-agrifarmapp-params"], "1");

        let response = send(&app, Method::GET, "/api/technologies/1", None).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND, "{backend}");
    }
}

#[tokio::test]
async fn test_delete_missing_is_ok_and_harmless() {
    for (backend, repo) in backends() {
        let app = app(repo);
        send(&app, Method::POST, "/api/technologies", Some(drip_irrigation())).await;

        let response = send(&app, Method::DELETE, "/api/technologies/99", None).await;
        assert_eq!(response.status(), StatusCode::OK, "{backend}");
        assert_eq!(list(&app).await.len(), 1, "{backend}");
    }
}

// =============================================================================
// Storage failures
// =============================================================================

const STORAGE_DETAIL: &str = "cannot open /var/lib/agrifarm/agrifarm.db";

/// Repository whose medium is always unreachable
struct UnavailableRepository;

impl UnavailableRepository {
    fn fail<T>() -> StorageResult<T> {
        Err(StorageError::Unavailable(STORAGE_DETAIL.to_string()))
    }
}

impl TechnologyRepository for UnavailableRepository {
    fn save(&self, _technology: Technology) -> StorageResult<Technology> {
        Self::fail()
    }

    fn find_by_id(&self, _id: i64) -> StorageResult<Option<Technology>> {
        Self::fail()
    }

    fn find_all(&self) -> StorageResult<Vec<Technology>> {
        Self::fail()
    }

    fn delete_by_id(&self, _id: i64) -> StorageResult<()> {
        Self::fail()
    }
}

#[tokio::test]
async fn test_storage_failure_is_opaque_500() {
    let app = app(Arc::new(UnavailableRepository));
    let mut update = drip_irrigation();
    update["id"] = json!(1);

    let requests = [
        (Method::POST, "/api/technologies", Some(drip_irrigation())),
        (Method::PUT, "/api/technologies", Some(update)),
        (Method::GET, "/api/technologies", None),
        (Method::GET, "/api/technologies/1", None),
        (Method::DELETE, "/api/technologies/1", None),
    ];

    for (method, uri, body) in requests {
        let label = format!("{method} {uri}");
        let response = send(&app, method, uri, body).await;
        assert_eq!(
            response.status(),
            StatusCode::INTERNAL_SERVER_ERROR,
            "{label}"
        );

        let body = json_body(response).await;
        assert_eq!(body["message"], "error.http.500", "{label}");
        assert_eq!(body["status"], 500, "{label}");
        assert!(
            !body.to_string().contains("/var/lib/agrifarm"),
            "{label} leaked storage detail: {body}"
        );
    }
}

#[tokio::test]
async fn test_validation_precedes_storage_failure() {
    let app = app(Arc::new(UnavailableRepository));
    let response = send(
        &app,
        Method::POST,
        "/api/technologies",
        Some(json!({"name": "ab", "date": "2023-05-01"})),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// =============================================================================
// Ambient routes
// =============================================================================

#[tokio::test]
async fn test_health() {
    let app = app(Arc::new(InMemoryTechnologyRepository::new()));
    let response = send(&app, Method::GET, "/health", None).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await["status"], "ok");
}
