//! HTTP API application wiring (Axum router + service wiring).
//!
//! Folder structure:
//! - `services.rs`: collaborator wiring + operation orchestration
//! - `routes/`: HTTP routes + handlers (one file per surface)
//! - `dto.rs`: request/response DTOs and JSON mapping helpers
//! - `errors.rs`: consistent error responses

use std::sync::Arc;

use axum::{routing::get, Extension, Router};

use crate::middleware;

pub mod dto;
pub mod errors;
pub mod routes;
pub mod services;

pub use services::AppServices;

/// Build the full HTTP router (public entrypoint used by `main.rs` and the
/// black-box tests).
pub fn build_app(services: Arc<AppServices>) -> Router {
    // Protected surfaces: bearer token resolved to an account up front.
    let protected = Router::new()
        .nest(
            "/me",
            routes::me::router().nest("/podcasts", routes::podcasts::router()),
        )
        .nest("/admin", routes::admin::router())
        .layer(axum::middleware::from_fn_with_state(
            services.clone(),
            middleware::auth_middleware,
        ));

    Router::new()
        .route("/health", get(routes::health))
        .nest("/auth", routes::auth::router())
        .merge(routes::public::router())
        .merge(protected)
        .layer(Extension(services))
}
