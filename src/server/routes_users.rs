//! User upload and CRUD API routes.
//!
//! Each handler maps its workflow outcome to a status code and JSON body
//! directly; there is no shared error middleware.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get, post},
    Json, Router,
};
use serde::Deserialize;

use bannerhub_common::{Error, UserId};

use super::AppContext;

/// Create user-related routes.
pub fn user_routes() -> Router<AppContext> {
    Router::new()
        .route("/upload", post(upload_banner))
        .route("/users", get(list_users))
        .route("/update/:id", post(update_user))
        .route("/delete/:id", delete(delete_user))
        .route("/backend_app", get(service_info))
}

// ============================================================================
// Request types
// ============================================================================

/// Body for the upload and update endpoints.
///
/// Both fields are optional at the JSON layer so a missing field reaches
/// the presence check instead of failing deserialization.
#[derive(Debug, Deserialize)]
pub struct BannerRequest {
    #[serde(default)]
    pub name: Option<String>,
    /// Base64 payload, optionally with a data-URL header.
    #[serde(default)]
    pub banner: Option<String>,
}

// ============================================================================
// Handlers
// ============================================================================

/// Store a banner and create a user record referencing it.
async fn upload_banner(
    State(ctx): State<AppContext>,
    Json(req): Json<BannerRequest>,
) -> impl IntoResponse {
    let name = req.name.unwrap_or_default();
    let banner = req.banner.unwrap_or_default();

    match ctx.banners.create(&name, &banner) {
        Ok(created) => (
            StatusCode::CREATED,
            Json(serde_json::json!({
                "message": "File uploaded successfully",
                "filePath": created.public_path,
            })),
        )
            .into_response(),
        Err(Error::InvalidInput(msg)) => (
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({"message": msg})),
        )
            .into_response(),
        Err(Error::Io(e)) => {
            tracing::error!("banner write failed: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({"message": "Error saving file"})),
            )
                .into_response()
        }
        Err(e) => {
            tracing::error!("upload failed: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({"message": "Error saving file metadata to database"})),
            )
                .into_response()
        }
    }
}

/// List all user records.
async fn list_users(State(ctx): State<AppContext>) -> impl IntoResponse {
    match ctx.banners.list() {
        Ok(users) => Json(users).into_response(),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(serde_json::json!({
                "error": "Database query failed",
                "details": e.to_string(),
            })),
        )
            .into_response(),
    }
}

/// Replace a user's name and banner.
async fn update_user(
    State(ctx): State<AppContext>,
    Path(id): Path<i64>,
    Json(req): Json<BannerRequest>,
) -> impl IntoResponse {
    let name = req.name.unwrap_or_default();
    let banner = req.banner.unwrap_or_default();

    match ctx.banners.update(UserId::from(id), &name, &banner) {
        Ok(_) => (
            StatusCode::OK,
            Json(serde_json::json!({"message": "File updated successfully"})),
        )
            .into_response(),
        Err(Error::InvalidInput(msg)) => (
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({"message": msg})),
        )
            .into_response(),
        Err(Error::NotFound(_)) => (
            StatusCode::NOT_FOUND,
            Json(serde_json::json!({"message": "User not found"})),
        )
            .into_response(),
        Err(e) => {
            tracing::error!("update of user {} failed: {}", id, e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({"message": "Error updating user"})),
            )
                .into_response()
        }
    }
}

/// Delete a user record and its banner.
async fn delete_user(State(ctx): State<AppContext>, Path(id): Path<i64>) -> impl IntoResponse {
    match ctx.banners.delete(UserId::from(id)) {
        Ok(()) => (
            StatusCode::OK,
            Json(serde_json::json!({"message": "User deleted successfully"})),
        )
            .into_response(),
        Err(Error::NotFound(_)) => (
            StatusCode::NOT_FOUND,
            Json(serde_json::json!({"message": "User not found"})),
        )
            .into_response(),
        Err(e) => {
            tracing::error!("delete of user {} failed: {}", id, e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({"message": "Error deleting user"})),
            )
                .into_response()
        }
    }
}

/// Liveness/info endpoint, no side effects.
async fn service_info() -> impl IntoResponse {
    Json("bannerhub backend is running")
}
