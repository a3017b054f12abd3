//! HTTP handlers
//!
//! Thin plumbing between axum and the rendering engine. Client mistakes
//! (unparseable JSON, wrong types, over-long goods lists) come back as 400
//! with a stable machine-readable code; rendering failures are logged in
//! full and answered with a generic 500.

use axum::{
    extract::{rejection::JsonRejection, State},
    http::{header, StatusCode},
    response::{Html, IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use cmr_render::{RenderEngine, RenderError, ShipmentRecord};
use serde_json::json;
use std::sync::Arc;
use tower_http::cors::CorsLayer;

/// Suggested filename for the downloaded document
const ATTACHMENT: &str = "attachment; filename=cmr.pdf";

static FORM_PAGE: &str = include_str!("../assets/form.html");

#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<RenderEngine>,
}

/// Assemble the service router
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/health", get(health))
        .route("/api/create-cmr", post(create_cmr))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// `GET /` - the browser form that posts a ShipmentRecord
pub async fn index() -> Html<&'static str> {
    Html(FORM_PAGE)
}

/// `GET /health`
pub async fn health() -> impl IntoResponse {
    Json(json!({"status": "ok"}))
}

/// `POST /api/create-cmr` - render a consignment note PDF
pub async fn create_cmr(
    State(state): State<AppState>,
    body: Result<Json<ShipmentRecord>, JsonRejection>,
) -> Response {
    let Json(record) = match body {
        Ok(body) => body,
        Err(rejection) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(json!({
                    "error": "invalid_request",
                    "detail": rejection.body_text(),
                })),
            )
                .into_response();
        }
    };

    match state.engine.render(&record).await {
        Ok(doc) => (
            [
                (header::CONTENT_TYPE, "application/pdf"),
                (header::CONTENT_DISPOSITION, ATTACHMENT),
            ],
            doc.bytes,
        )
            .into_response(),
        Err(RenderError::Validation(err)) => (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "error": "invalid_request",
                "detail": err.to_string(),
            })),
        )
            .into_response(),
        Err(err) => {
            tracing::error!(error = %err, "failed to render consignment note");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({"error": "render_failed"})),
            )
                .into_response()
        }
    }
}
