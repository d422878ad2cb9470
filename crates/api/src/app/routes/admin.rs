//! Admin surface: account moderation and content moderation.
//!
//! Ownership checks are bypassed here by design; every operation instead
//! requires the Admin role, enforced inside the service methods.

use std::sync::Arc;

use axum::{
    extract::{Extension, Path, Query},
    http::StatusCode,
    response::Response,
    routing::{delete, get, post},
    Router,
};

use podharbor_core::{AccountId, PodcastId};

use crate::app::{dto, errors, services::AppServices};
use crate::context::CurrentAccount;

pub fn router() -> Router {
    Router::new()
        .route("/users", get(list_accounts))
        .route("/users/:id", get(account_detail).delete(delete_account))
        .route("/users/:id/lock", post(lock_account))
        .route("/users/:id/unlock", post(unlock_account))
        .route("/podcasts", get(list_podcasts))
        .route("/podcasts/:id", get(podcast_detail).delete(delete_podcast))
        .route("/podcasts/:id/flag", post(flag_podcast))
        .route("/podcasts/:id/unflag", post(unflag_podcast))
        .route("/podcasts/:id/episodes", get(episodes))
        .route("/podcasts/:id/episodes/:index", delete(delete_episode))
}

async fn list_accounts(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(current): Extension<CurrentAccount>,
    Query(params): Query<dto::AccountListParams>,
) -> Response {
    errors::respond(
        services.admin_list_accounts(current.account(), params).await,
        StatusCode::OK,
    )
}

async fn account_detail(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(current): Extension<CurrentAccount>,
    Path(id): Path<AccountId>,
) -> Response {
    errors::respond(
        services.admin_account_detail(current.account(), id).await,
        StatusCode::OK,
    )
}

async fn lock_account(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(current): Extension<CurrentAccount>,
    Path(id): Path<AccountId>,
) -> Response {
    errors::respond_empty(
        services.admin_lock_account(current.account(), id).await,
        StatusCode::NO_CONTENT,
    )
}

async fn unlock_account(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(current): Extension<CurrentAccount>,
    Path(id): Path<AccountId>,
) -> Response {
    errors::respond_empty(
        services.admin_unlock_account(current.account(), id).await,
        StatusCode::NO_CONTENT,
    )
}

async fn delete_account(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(current): Extension<CurrentAccount>,
    Path(id): Path<AccountId>,
) -> Response {
    errors::respond_empty(
        services.admin_delete_account(current.account(), id).await,
        StatusCode::NO_CONTENT,
    )
}

async fn list_podcasts(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(current): Extension<CurrentAccount>,
    Query(params): Query<dto::PodcastListParams>,
) -> Response {
    errors::respond(
        services.admin_list_podcasts(current.account(), params).await,
        StatusCode::OK,
    )
}

async fn podcast_detail(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(current): Extension<CurrentAccount>,
    Path(id): Path<PodcastId>,
) -> Response {
    errors::respond(
        services.admin_podcast_detail(current.account(), id).await,
        StatusCode::OK,
    )
}

async fn flag_podcast(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(current): Extension<CurrentAccount>,
    Path(id): Path<PodcastId>,
) -> Response {
    errors::respond_empty(
        services.admin_flag_podcast(current.account(), id).await,
        StatusCode::NO_CONTENT,
    )
}

async fn unflag_podcast(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(current): Extension<CurrentAccount>,
    Path(id): Path<PodcastId>,
) -> Response {
    errors::respond_empty(
        services.admin_unflag_podcast(current.account(), id).await,
        StatusCode::NO_CONTENT,
    )
}

async fn delete_podcast(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(current): Extension<CurrentAccount>,
    Path(id): Path<PodcastId>,
) -> Response {
    errors::respond_empty(
        services.admin_delete_podcast(current.account(), id).await,
        StatusCode::NO_CONTENT,
    )
}

async fn episodes(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(current): Extension<CurrentAccount>,
    Path(id): Path<PodcastId>,
) -> Response {
    errors::respond(
        services.admin_episodes(current.account(), id).await,
        StatusCode::OK,
    )
}

async fn delete_episode(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(current): Extension<CurrentAccount>,
    Path((id, index)): Path<(PodcastId, usize)>,
) -> Response {
    errors::respond_empty(
        services
            .admin_delete_episode(current.account(), id, index)
            .await,
        StatusCode::NO_CONTENT,
    )
}
