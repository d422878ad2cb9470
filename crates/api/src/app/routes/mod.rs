//! HTTP routes, one file per surface.

use axum::http::StatusCode;
use axum::response::IntoResponse;

pub mod admin;
pub mod auth;
pub mod me;
pub mod podcasts;
pub mod public;

pub async fn health() -> impl IntoResponse {
    (StatusCode::OK, "ok")
}
