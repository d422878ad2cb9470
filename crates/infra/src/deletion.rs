//! Cascading deletion.
//!
//! Modeled as a saga without cross-document transactions: deletions run
//! leaf-first (media → episode → podcast → account), so a failure partway
//! leaves only orphaned-but-harmless leaf state, never a dangling reference
//! to a missing parent. Retrying is safe because blob deletion is
//! idempotent.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::info;

use podharbor_accounts::Account;
use podharbor_catalog::Podcast;
use podharbor_core::DomainResult;

use crate::media::Media;
use crate::store::{AccountStore, PodcastStore};

#[derive(Clone)]
pub struct DeletionCascade {
    accounts: Arc<dyn AccountStore>,
    podcasts: Arc<dyn PodcastStore>,
    media: Media,
}

impl DeletionCascade {
    pub fn new(
        accounts: Arc<dyn AccountStore>,
        podcasts: Arc<dyn PodcastStore>,
        media: Media,
    ) -> Self {
        Self {
            accounts,
            podcasts,
            media,
        }
    }

    /// Delete one episode by positional index: release its blobs, remove it
    /// from the list (shifting later indices), persist the parent. An
    /// emptied list downgrades the podcast to draft unless it was archived.
    pub async fn delete_episode(
        &self,
        podcast: &mut Podcast,
        index: usize,
        now: DateTime<Utc>,
    ) -> DomainResult<()> {
        let episode = podcast.episode(index)?.clone();

        self.media
            .delete_if_present(episode.audio_path.as_deref())
            .await?;
        self.media
            .delete_if_present(episode.image_path.as_deref())
            .await?;

        podcast.remove_episode(index, now)?;
        self.podcasts.save(podcast).await?;

        info!(podcast_id = %podcast.id, index, "episode deleted");
        Ok(())
    }

    /// Delete a podcast and everything it owns: each episode's blobs
    /// back-to-front, then cover and banner, then the document.
    pub async fn delete_podcast(&self, podcast: Podcast) -> DomainResult<()> {
        for episode in podcast.episodes.iter().rev() {
            self.media
                .delete_if_present(episode.audio_path.as_deref())
                .await?;
            self.media
                .delete_if_present(episode.image_path.as_deref())
                .await?;
        }

        self.media
            .delete_if_present(podcast.cover_path.as_deref())
            .await?;
        self.media
            .delete_if_present(podcast.banner_path.as_deref())
            .await?;

        self.podcasts.delete(podcast.id).await?;

        info!(podcast_id = %podcast.id, episodes = podcast.episodes.len(), "podcast deleted");
        Ok(())
    }

    /// Delete an account and everything it owns: the full cascade for every
    /// owned podcast, then the profile blob, then the account document.
    pub async fn delete_account(&self, account: Account) -> DomainResult<()> {
        let owned = self.podcasts.list_by_owner(account.id).await?;
        let podcast_count = owned.len();
        for podcast in owned {
            self.delete_podcast(podcast).await?;
        }

        self.media
            .delete_if_present(account.profile_path.as_deref())
            .await?;

        self.accounts.delete(account.id).await?;

        info!(account_id = %account.id, podcasts = podcast_count, "account deleted");
        Ok(())
    }
}
