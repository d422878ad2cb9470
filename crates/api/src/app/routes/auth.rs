//! Authentication surface: registration, sessions, tokens, passwords.

use std::sync::Arc;

use axum::{
    extract::Extension,
    http::{HeaderMap, StatusCode},
    response::Response,
    routing::post,
    Json, Router,
};

use podharbor_core::Fault;

use crate::app::{dto, errors, services::AppServices};

pub fn router() -> Router {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/refresh", post(refresh))
        .route("/verify-email", post(verify_email))
        .route("/resend-verification", post(resend_verification))
        .route("/reset-password", post(reset_password))
        .route("/sign-out", post(sign_out))
        .route("/change-password", post(change_password))
}

async fn register(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<dto::RegisterRequest>,
) -> Response {
    errors::respond(services.register(body).await, StatusCode::CREATED)
}

async fn login(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<dto::LoginRequest>,
) -> Response {
    errors::respond(services.login(body).await, StatusCode::OK)
}

async fn refresh(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<dto::RefreshRequest>,
) -> Response {
    errors::respond(services.refresh(&body.refresh_token).await, StatusCode::OK)
}

async fn verify_email(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<dto::VerifyEmailRequest>,
) -> Response {
    errors::respond_empty(services.verify_email(body).await, StatusCode::NO_CONTENT)
}

async fn resend_verification(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<dto::ResendVerificationRequest>,
) -> Response {
    errors::respond_empty(services.resend_verification(body).await, StatusCode::ACCEPTED)
}

async fn reset_password(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<dto::ResetPasswordRequest>,
) -> Response {
    errors::respond_empty(services.reset_password(body).await, StatusCode::NO_CONTENT)
}

/// Sign-out and password change take the access token straight from the
/// Authorization header because they additionally re-check the password —
/// they never ride behind the middleware-resolved account.
async fn sign_out(
    Extension(services): Extension<Arc<AppServices>>,
    headers: HeaderMap,
    Json(body): Json<dto::SignOutRequest>,
) -> Response {
    match bearer(&headers) {
        Ok(token) => {
            errors::respond_empty(services.sign_out(token, body).await, StatusCode::NO_CONTENT)
        }
        Err(fault) => errors::fault_to_response(fault),
    }
}

async fn change_password(
    Extension(services): Extension<Arc<AppServices>>,
    headers: HeaderMap,
    Json(body): Json<dto::ChangePasswordRequest>,
) -> Response {
    match bearer(&headers) {
        Ok(token) => errors::respond_empty(
            services.change_password(token, body).await,
            StatusCode::NO_CONTENT,
        ),
        Err(fault) => errors::fault_to_response(fault),
    }
}

fn bearer(headers: &HeaderMap) -> Result<&str, Fault> {
    headers
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .ok_or_else(|| Fault::token_invalid().with_detail("missing Authorization header"))
}
