//! Owner surface: podcasts and their episodes, nested under `/me/podcasts`.

use std::sync::Arc;

use axum::{
    extract::{Extension, Path, Query},
    http::StatusCode,
    response::Response,
    routing::{get, post},
    Json, Router,
};

use podharbor_core::PodcastId;

use crate::app::{dto, errors, services::AppServices};
use crate::context::CurrentAccount;

pub fn router() -> Router {
    Router::new()
        .route("/", get(list).post(create))
        .route("/:id", get(detail).patch(update).delete(remove))
        .route("/:id/publish", post(publish))
        .route("/:id/archive", post(archive))
        .route("/:id/image-upload-url", post(image_upload_url))
        .route("/:id/episodes", get(episodes).post(create_episode))
        .route(
            "/:id/episodes/:index",
            get(episode_detail)
                .patch(update_episode)
                .delete(delete_episode),
        )
        .route("/:id/episodes/:index/publish", post(publish_episode))
        .route("/:id/episodes/:index/archive", post(archive_episode))
        .route(
            "/:id/episodes/:index/image-upload-url",
            post(episode_image_upload_url),
        )
        .route(
            "/:id/episodes/:index/audio-upload-url",
            post(episode_audio_upload_url),
        )
}

// ── podcasts ────────────────────────────────────────────────────────────

async fn list(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(current): Extension<CurrentAccount>,
    Query(params): Query<dto::PodcastListParams>,
) -> Response {
    errors::respond(
        services.my_podcasts(current.account(), params).await,
        StatusCode::OK,
    )
}

async fn create(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(current): Extension<CurrentAccount>,
    Json(body): Json<dto::CreatePodcastRequest>,
) -> Response {
    errors::respond(
        services.create_podcast(current.account(), body).await,
        StatusCode::CREATED,
    )
}

async fn detail(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(current): Extension<CurrentAccount>,
    Path(id): Path<PodcastId>,
) -> Response {
    errors::respond(
        services.my_podcast_detail(current.account(), id).await,
        StatusCode::OK,
    )
}

async fn update(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(current): Extension<CurrentAccount>,
    Path(id): Path<PodcastId>,
    Json(body): Json<dto::UpdatePodcastRequest>,
) -> Response {
    errors::respond(
        services.update_podcast(current.account(), id, body).await,
        StatusCode::OK,
    )
}

async fn publish(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(current): Extension<CurrentAccount>,
    Path(id): Path<PodcastId>,
) -> Response {
    errors::respond(
        services.publish_podcast(current.account(), id).await,
        StatusCode::OK,
    )
}

async fn archive(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(current): Extension<CurrentAccount>,
    Path(id): Path<PodcastId>,
) -> Response {
    errors::respond(
        services.archive_podcast(current.account(), id).await,
        StatusCode::OK,
    )
}

async fn remove(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(current): Extension<CurrentAccount>,
    Path(id): Path<PodcastId>,
) -> Response {
    errors::respond_empty(
        services.delete_podcast(current.account(), id).await,
        StatusCode::NO_CONTENT,
    )
}

async fn image_upload_url(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(current): Extension<CurrentAccount>,
    Path(id): Path<PodcastId>,
    Json(body): Json<dto::PodcastImageUploadRequest>,
) -> Response {
    errors::respond(
        services
            .podcast_image_upload_url(current.account(), id, body)
            .await,
        StatusCode::OK,
    )
}

// ── episodes ────────────────────────────────────────────────────────────

async fn episodes(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(current): Extension<CurrentAccount>,
    Path(id): Path<PodcastId>,
) -> Response {
    errors::respond(
        services.my_episodes(current.account(), id).await,
        StatusCode::OK,
    )
}

async fn create_episode(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(current): Extension<CurrentAccount>,
    Path(id): Path<PodcastId>,
    Json(body): Json<dto::CreateEpisodeRequest>,
) -> Response {
    errors::respond(
        services.create_episode(current.account(), id, body).await,
        StatusCode::CREATED,
    )
}

async fn episode_detail(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(current): Extension<CurrentAccount>,
    Path((id, index)): Path<(PodcastId, usize)>,
) -> Response {
    errors::respond(
        services.my_episode_detail(current.account(), id, index).await,
        StatusCode::OK,
    )
}

async fn update_episode(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(current): Extension<CurrentAccount>,
    Path((id, index)): Path<(PodcastId, usize)>,
    Json(body): Json<dto::UpdateEpisodeRequest>,
) -> Response {
    errors::respond(
        services
            .update_episode(current.account(), id, index, body)
            .await,
        StatusCode::OK,
    )
}

async fn publish_episode(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(current): Extension<CurrentAccount>,
    Path((id, index)): Path<(PodcastId, usize)>,
) -> Response {
    errors::respond(
        services.publish_episode(current.account(), id, index).await,
        StatusCode::OK,
    )
}

async fn archive_episode(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(current): Extension<CurrentAccount>,
    Path((id, index)): Path<(PodcastId, usize)>,
) -> Response {
    errors::respond(
        services.archive_episode(current.account(), id, index).await,
        StatusCode::OK,
    )
}

async fn delete_episode(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(current): Extension<CurrentAccount>,
    Path((id, index)): Path<(PodcastId, usize)>,
) -> Response {
    errors::respond_empty(
        services.delete_episode(current.account(), id, index).await,
        StatusCode::NO_CONTENT,
    )
}

async fn episode_image_upload_url(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(current): Extension<CurrentAccount>,
    Path((id, index)): Path<(PodcastId, usize)>,
    Json(body): Json<dto::ImageUploadRequest>,
) -> Response {
    errors::respond(
        services
            .episode_image_upload_url(current.account(), id, index, body)
            .await,
        StatusCode::OK,
    )
}

async fn episode_audio_upload_url(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(current): Extension<CurrentAccount>,
    Path((id, index)): Path<(PodcastId, usize)>,
    Json(body): Json<dto::AudioUploadRequest>,
) -> Response {
    errors::respond(
        services
            .episode_audio_upload_url(current.account(), id, index, body)
            .await,
        StatusCode::OK,
    )
}
