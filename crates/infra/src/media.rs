//! Media helper: blob-path conventions and the replace/verify/delete rules
//! shared by every media-bearing field.

use std::sync::Arc;

use serde::Deserialize;
use uuid::Uuid;

use podharbor_core::{AccountId, DomainResult, Fault, PodcastId};

use crate::blob::BlobStore;

/// Accepted image file extensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageExt {
    Png,
    Jpg,
    Jpeg,
    Webp,
}

impl ImageExt {
    pub fn as_str(self) -> &'static str {
        match self {
            ImageExt::Png => "png",
            ImageExt::Jpg => "jpg",
            ImageExt::Jpeg => "jpeg",
            ImageExt::Webp => "webp",
        }
    }
}

/// Accepted audio file extensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AudioExt {
    Mp3,
    Wav,
    M4a,
}

impl AudioExt {
    pub fn as_str(self) -> &'static str {
        match self {
            AudioExt::Mp3 => "mp3",
            AudioExt::Wav => "wav",
            AudioExt::M4a => "m4a",
        }
    }
}

/// Thin policy layer over the blob store.
#[derive(Clone)]
pub struct Media {
    blobs: Arc<dyn BlobStore>,
}

impl Media {
    pub fn new(blobs: Arc<dyn BlobStore>) -> Self {
        Self { blobs }
    }

    /// Signed download URL for an optional path; `None` stays `None`.
    pub async fn download_url(&self, path: Option<&str>) -> DomainResult<Option<String>> {
        match path {
            Some(path) if !path.is_empty() => {
                Ok(Some(self.blobs.signed_download_url(path).await?))
            }
            _ => Ok(None),
        }
    }

    pub async fn upload_url(&self, path: &str) -> DomainResult<String> {
        Ok(self.blobs.signed_upload_url(path).await?)
    }

    /// A recorded path is not proof of an upload; ask the store.
    pub async fn ensure_uploaded(&self, path: &str) -> DomainResult<()> {
        if self.blobs.exists(path).await? {
            Ok(())
        } else {
            Err(Fault::upload_incomplete().with_detail(path.to_string()))
        }
    }

    pub async fn delete_if_present(&self, path: Option<&str>) -> DomainResult<()> {
        if let Some(path) = path {
            if !path.is_empty() {
                self.blobs.delete(path).await?;
            }
        }
        Ok(())
    }

    /// Accepting a new media path means verifying the new upload landed and
    /// releasing the superseded blob, unless the path is unchanged.
    pub async fn replace_if_changed(&self, new: &str, old: Option<&str>) -> DomainResult<()> {
        self.ensure_uploaded(new).await?;
        if let Some(old) = old {
            if old != new {
                self.delete_if_present(Some(old)).await?;
            }
        }
        Ok(())
    }

    // ── path conventions ────────────────────────────────────────────────

    pub fn profile_image_path(account_id: AccountId, ext: ImageExt) -> String {
        format!(
            "media/accounts/{account_id}/profile/{}.{}",
            Uuid::new_v4(),
            ext.as_str()
        )
    }

    pub fn podcast_cover_path(podcast_id: PodcastId, ext: ImageExt) -> String {
        format!(
            "media/podcasts/{podcast_id}/cover/{}.{}",
            Uuid::new_v4(),
            ext.as_str()
        )
    }

    pub fn podcast_banner_path(podcast_id: PodcastId, ext: ImageExt) -> String {
        format!(
            "media/podcasts/{podcast_id}/banner/{}.{}",
            Uuid::new_v4(),
            ext.as_str()
        )
    }

    pub fn episode_image_path(podcast_id: PodcastId, index: usize, ext: ImageExt) -> String {
        format!(
            "media/podcasts/{podcast_id}/episodes/{index}/image/{}.{}",
            Uuid::new_v4(),
            ext.as_str()
        )
    }

    pub fn episode_audio_path(podcast_id: PodcastId, index: usize, ext: AudioExt) -> String {
        format!(
            "media/podcasts/{podcast_id}/episodes/{index}/audio/{}.{}",
            Uuid::new_v4(),
            ext.as_str()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blob::InMemoryBlobStore;

    fn media() -> (Arc<InMemoryBlobStore>, Media) {
        let blobs = Arc::new(InMemoryBlobStore::new());
        let media = Media::new(blobs.clone());
        (blobs, media)
    }

    #[tokio::test]
    async fn ensure_uploaded_distrusts_path_strings() {
        let (blobs, media) = media();

        let err = media.ensure_uploaded("media/missing.png").await.unwrap_err();
        assert_eq!(err.code, "FILE_UPLOAD_INCOMPLETE");

        blobs.put("media/present.png");
        assert!(media.ensure_uploaded("media/present.png").await.is_ok());
    }

    #[tokio::test]
    async fn replace_deletes_the_superseded_blob_only_on_change() {
        let (blobs, media) = media();
        blobs.put("media/old.png");
        blobs.put("media/new.png");

        media
            .replace_if_changed("media/new.png", Some("media/old.png"))
            .await
            .unwrap();
        assert!(!blobs.contains("media/old.png"));
        assert!(blobs.contains("media/new.png"));

        // Same path again: nothing is deleted.
        media
            .replace_if_changed("media/new.png", Some("media/new.png"))
            .await
            .unwrap();
        assert!(blobs.contains("media/new.png"));
    }

    #[tokio::test]
    async fn download_url_passes_none_through() {
        let (_blobs, media) = media();
        assert_eq!(media.download_url(None).await.unwrap(), None);
        assert!(media
            .download_url(Some("media/x.png"))
            .await
            .unwrap()
            .unwrap()
            .contains("media/x.png"));
    }
}
