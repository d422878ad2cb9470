//! Podcast entity and its status machine.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use podharbor_core::{AccountId, DomainResult, Fault, FaultKind, Patch, PodcastId};

use crate::episode::{Episode, EpisodeStatus};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PodcastStatus {
    Draft,
    Published,
    Archived,
}

/// A podcast document with its embedded, ordered episode list.
///
/// Moderation is the orthogonal `flagged` bit layered on top of the status,
/// not a fourth status value. Episodes have positional identity: their index
/// in `episodes` is their id, and deletions shift every later index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Podcast {
    pub id: PodcastId,
    pub owner: AccountId,
    pub title: String,
    pub description: String,
    /// Stored lowercase.
    pub category: String,
    pub cover_path: Option<String>,
    pub banner_path: Option<String>,
    pub flagged: bool,
    pub status: PodcastStatus,
    /// Non-null iff `status == Published`.
    pub published_at: Option<DateTime<Utc>>,
    pub episodes: Vec<Episode>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPodcast {
    pub owner: AccountId,
    pub title: String,
    pub description: String,
    pub category: String,
}

/// Partial update; cover and banner are clearable.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PodcastUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub cover_path: Patch<String>,
    pub banner_path: Patch<String>,
}

impl Podcast {
    pub fn create(id: PodcastId, new: NewPodcast, now: DateTime<Utc>) -> DomainResult<Self> {
        validate_title(&new.title)?;
        validate_description(&new.description)?;
        validate_category(&new.category)?;

        Ok(Self {
            id,
            owner: new.owner,
            title: new.title,
            description: new.description,
            category: new.category.to_lowercase(),
            cover_path: None,
            banner_path: None,
            flagged: false,
            status: PodcastStatus::Draft,
            published_at: None,
            episodes: Vec::new(),
            created_at: now,
            updated_at: now,
        })
    }

    /// Apply a partial update. Media side effects happen before this call.
    pub fn apply(&mut self, update: PodcastUpdate, now: DateTime<Utc>) -> DomainResult<()> {
        if let Some(title) = update.title {
            validate_title(&title)?;
            self.title = title;
        }
        if let Some(description) = update.description {
            validate_description(&description)?;
            self.description = description;
        }
        if let Some(category) = update.category {
            validate_category(&category)?;
            self.category = category.to_lowercase();
        }
        update.cover_path.apply(&mut self.cover_path);
        update.banner_path.apply(&mut self.banner_path);
        self.updated_at = now;
        Ok(())
    }

    pub fn has_published_episode(&self) -> bool {
        self.episodes
            .iter()
            .any(|e| e.status == EpisodeStatus::Published)
    }

    pub fn published_episode_count(&self) -> usize {
        self.episodes
            .iter()
            .filter(|e| e.status == EpisodeStatus::Published)
            .count()
    }

    pub fn last_published_episode_at(&self) -> Option<DateTime<Utc>> {
        self.episodes
            .iter()
            .filter(|e| e.status == EpisodeStatus::Published)
            .filter_map(|e| e.published_at)
            .max()
    }

    /// Publish guards, in order: not flagged, cover present, at least one
    /// published episode. Returns the cover path so the caller can verify
    /// the blob actually exists before committing.
    pub fn ensure_publishable(&self) -> DomainResult<&str> {
        if self.flagged {
            return Err(Fault::publish_forbidden());
        }
        let cover = self.cover_path.as_deref().ok_or_else(Fault::missing_assets)?;
        if !self.has_published_episode() {
            return Err(Fault::missing_episode());
        }
        Ok(cover)
    }

    pub fn mark_published(&mut self, now: DateTime<Utc>) {
        self.status = PodcastStatus::Published;
        self.published_at = Some(now);
        self.updated_at = now;
    }

    /// Unconditional; redundant archives are allowed.
    pub fn archive(&mut self, now: DateTime<Utc>) {
        self.status = PodcastStatus::Archived;
        self.published_at = None;
        self.updated_at = now;
    }

    /// Moderation flag. Flagging always un-publishes all live content: a
    /// published podcast demotes to archived, and every published episode is
    /// forced to archived with its publication timestamp cleared.
    pub fn flag(&mut self, now: DateTime<Utc>) -> DomainResult<()> {
        if self.flagged {
            return Err(Fault::already_flagged());
        }
        self.flagged = true;
        if self.status == PodcastStatus::Published {
            self.status = PodcastStatus::Archived;
        }
        self.published_at = None;
        for episode in &mut self.episodes {
            if episode.status == EpisodeStatus::Published {
                episode.archive(now);
            }
        }
        self.updated_at = now;
        Ok(())
    }

    /// Clears the flag only; republishing is a separate, explicit action.
    pub fn unflag(&mut self, now: DateTime<Utc>) -> DomainResult<()> {
        if !self.flagged {
            return Err(Fault::not_flagged());
        }
        self.flagged = false;
        self.updated_at = now;
        Ok(())
    }

    // ── episodes (positional identity) ──────────────────────────────────

    pub fn episode(&self, index: usize) -> DomainResult<&Episode> {
        self.episodes.get(index).ok_or_else(Fault::episode_not_found)
    }

    pub fn episode_mut(&mut self, index: usize) -> DomainResult<&mut Episode> {
        self.episodes
            .get_mut(index)
            .ok_or_else(Fault::episode_not_found)
    }

    /// Append an episode; its identity is the returned index.
    pub fn add_episode(&mut self, episode: Episode, now: DateTime<Utc>) -> usize {
        self.episodes.push(episode);
        self.updated_at = now;
        self.episodes.len() - 1
    }

    /// Remove the episode at `index`; every later episode shifts down one.
    ///
    /// If the list becomes empty the podcast drops back to draft — unless it
    /// was archived, which it stays. A published podcast demoted this way
    /// also loses `published_at` to keep the status invariant.
    pub fn remove_episode(&mut self, index: usize, now: DateTime<Utc>) -> DomainResult<Episode> {
        if index >= self.episodes.len() {
            return Err(Fault::episode_not_found());
        }
        let removed = self.episodes.remove(index);
        if self.episodes.is_empty() && self.status != PodcastStatus::Archived {
            self.status = PodcastStatus::Draft;
            self.published_at = None;
        }
        self.updated_at = now;
        Ok(removed)
    }
}

fn validate_title(title: &str) -> DomainResult<()> {
    let len = title.trim().chars().count();
    if len < 3 || len > 100 {
        return Err(Fault::new(
            FaultKind::Validation,
            "INVALID_TITLE",
            "title must be between 3 and 100 characters",
        ));
    }
    Ok(())
}

fn validate_description(description: &str) -> DomainResult<()> {
    let len = description.trim().chars().count();
    if len < 10 || len > 300 {
        return Err(Fault::new(
            FaultKind::Validation,
            "INVALID_DESCRIPTION",
            "description must be between 10 and 300 characters",
        ));
    }
    Ok(())
}

fn validate_category(category: &str) -> DomainResult<()> {
    if category.trim().is_empty() {
        return Err(Fault::new(
            FaultKind::Validation,
            "INVALID_CATEGORY",
            "category must not be empty",
        ));
    }
    Ok(())
}
