//! Current-account surface: profile and account deletion.

use std::sync::Arc;

use axum::{
    extract::Extension,
    http::StatusCode,
    response::Response,
    routing::{delete, get, post},
    Json, Router,
};

use crate::app::{dto, errors, services::AppServices};
use crate::context::CurrentAccount;

pub fn router() -> Router {
    Router::new()
        .route("/profile", get(profile).patch(update_profile))
        .route("/profile/image-upload-url", post(profile_upload_url))
        .route("/account", delete(delete_account))
}

async fn profile(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(current): Extension<CurrentAccount>,
) -> Response {
    errors::respond(services.my_profile(current.account()).await, StatusCode::OK)
}

async fn update_profile(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(current): Extension<CurrentAccount>,
    Json(body): Json<dto::UpdateProfileRequest>,
) -> Response {
    errors::respond(
        services.update_profile(current.account(), body).await,
        StatusCode::OK,
    )
}

async fn profile_upload_url(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(current): Extension<CurrentAccount>,
    Json(body): Json<dto::ImageUploadRequest>,
) -> Response {
    errors::respond(
        services.profile_upload_url(current.account(), body).await,
        StatusCode::OK,
    )
}

async fn delete_account(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(current): Extension<CurrentAccount>,
    Json(body): Json<dto::DeleteAccountRequest>,
) -> Response {
    errors::respond_empty(
        services.delete_my_account(current.account(), body).await,
        StatusCode::NO_CONTENT,
    )
}
