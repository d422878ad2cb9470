//! Public discovery surface: no authentication, published content only.

use std::sync::Arc;

use axum::{
    extract::{Extension, Path, Query},
    http::StatusCode,
    response::Response,
    routing::get,
    Router,
};

use podharbor_core::{AccountId, PodcastId};

use crate::app::{dto, errors, services::AppServices};

pub fn router() -> Router {
    Router::new()
        .route("/podcasts", get(discover))
        .route("/podcasts/:id", get(podcast_detail))
        .route("/podcasts/:id/episodes", get(episodes))
        .route("/podcasts/:id/episodes/:index", get(episode_detail))
        .route("/creators/:id", get(creator))
}

async fn discover(
    Extension(services): Extension<Arc<AppServices>>,
    Query(params): Query<dto::DiscoveryParams>,
) -> Response {
    errors::respond(services.discover_podcasts(params).await, StatusCode::OK)
}

async fn podcast_detail(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<PodcastId>,
) -> Response {
    errors::respond(services.public_podcast_detail(id).await, StatusCode::OK)
}

async fn episodes(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<PodcastId>,
) -> Response {
    errors::respond(services.public_episodes(id).await, StatusCode::OK)
}

async fn episode_detail(
    Extension(services): Extension<Arc<AppServices>>,
    Path((id, index)): Path<(PodcastId, usize)>,
) -> Response {
    errors::respond(services.public_episode_detail(id, index).await, StatusCode::OK)
}

async fn creator(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<AccountId>,
) -> Response {
    errors::respond(services.creator_profile(id).await, StatusCode::OK)
}
