//! Episode entity.
//!
//! Episodes are embedded in their podcast and have **positional identity**:
//! an episode's id is its index in the parent's list, so deleting episode
//! `k` shifts the identity of every episode after `k`. Callers must treat
//! indices as invalidated by any deletion.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use podharbor_core::{DomainResult, Fault, FaultKind, Patch};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EpisodeStatus {
    Draft,
    Published,
    Archived,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Episode {
    pub title: String,
    pub description: Option<String>,
    /// Blob paths; the domain never opens blob bytes.
    pub image_path: Option<String>,
    pub audio_path: Option<String>,
    pub duration_secs: u32,
    pub status: EpisodeStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Non-null iff `status == Published`.
    pub published_at: Option<DateTime<Utc>>,
}

/// Input for episode creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewEpisode {
    pub title: String,
    pub description: Option<String>,
    pub duration_secs: u32,
}

/// Partial update. Omitted fields keep their value; `description`,
/// `image_path` and `audio_path` can additionally be cleared with an
/// explicit null.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct EpisodePatch {
    pub title: Option<String>,
    pub description: Patch<String>,
    pub duration_secs: Option<u32>,
    pub image_path: Patch<String>,
    pub audio_path: Patch<String>,
}

impl Episode {
    pub fn create(new: NewEpisode, now: DateTime<Utc>) -> DomainResult<Self> {
        validate_title(&new.title)?;
        validate_duration(new.duration_secs)?;

        Ok(Self {
            title: new.title,
            description: new.description,
            image_path: None,
            audio_path: None,
            duration_secs: new.duration_secs,
            status: EpisodeStatus::Draft,
            created_at: now,
            updated_at: now,
            published_at: None,
        })
    }

    /// Apply a partial update. Media replacement side effects (verifying the
    /// new blob, deleting the superseded one) must already have happened.
    pub fn apply(&mut self, patch: EpisodePatch, now: DateTime<Utc>) -> DomainResult<()> {
        if let Some(title) = patch.title {
            validate_title(&title)?;
            self.title = title;
        }
        if let Some(duration) = patch.duration_secs {
            validate_duration(duration)?;
            self.duration_secs = duration;
        }
        patch.description.apply(&mut self.description);
        patch.image_path.apply(&mut self.image_path);
        patch.audio_path.apply(&mut self.audio_path);
        self.updated_at = now;
        Ok(())
    }

    /// Publish guard: there must be an audio file. Returns its blob path so
    /// the caller can verify the upload actually landed in storage.
    pub fn ensure_publishable(&self) -> DomainResult<&str> {
        self.audio_path.as_deref().ok_or_else(Fault::missing_audio)
    }

    pub fn mark_published(&mut self, now: DateTime<Utc>) {
        self.status = EpisodeStatus::Published;
        self.published_at = Some(now);
        self.updated_at = now;
    }

    /// Unconditional; redundant archives are allowed.
    pub fn archive(&mut self, now: DateTime<Utc>) {
        self.status = EpisodeStatus::Archived;
        self.published_at = None;
        self.updated_at = now;
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

fn validate_duration(duration_secs: u32) -> DomainResult<()> {
    if duration_secs == 0 {
        return Err(Fault::new(
            FaultKind::Validation,
            "INVALID_DURATION",
            "duration must be at least one second",
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft() -> Episode {
        Episode::create(
            NewEpisode {
                title: "Pilot".to_string(),
                description: None,
                duration_secs: 60,
            },
            Utc::now(),
        )
        .unwrap()
    }

    #[test]
    fn creation_starts_as_draft() {
        let ep = draft();
        assert_eq!(ep.status, EpisodeStatus::Draft);
        assert!(ep.published_at.is_none());
    }

    #[test]
    fn zero_duration_is_rejected() {
        let err = Episode::create(
            NewEpisode {
                title: "Pilot".to_string(),
                description: None,
                duration_secs: 0,
            },
            Utc::now(),
        )
        .unwrap_err();
        assert_eq!(err.code, "INVALID_DURATION");
    }

    #[test]
    fn publish_requires_audio() {
        let mut ep = draft();
        assert_eq!(ep.ensure_publishable().unwrap_err().code, "EPISODE_MISSING_AUDIO");

        ep.audio_path = Some("media/audio.mp3".to_string());
        assert_eq!(ep.ensure_publishable().unwrap(), "media/audio.mp3");

        let now = Utc::now();
        ep.mark_published(now);
        assert_eq!(ep.status, EpisodeStatus::Published);
        assert_eq!(ep.published_at, Some(now));
    }

    #[test]
    fn archive_clears_published_at() {
        let mut ep = draft();
        ep.audio_path = Some("media/audio.mp3".to_string());
        ep.mark_published(Utc::now());

        ep.archive(Utc::now());
        assert_eq!(ep.status, EpisodeStatus::Archived);
        assert!(ep.published_at.is_none());
    }

    #[test]
    fn patch_distinguishes_omit_from_clear() {
        let mut ep = draft();
        ep.description = Some("about".to_string());
        ep.image_path = Some("media/image.png".to_string());

        // Omitted fields keep.
        ep.apply(
            EpisodePatch {
                title: Some("Pilot v2".to_string()),
                ..Default::default()
            },
            Utc::now(),
        )
        .unwrap();
        assert_eq!(ep.title, "Pilot v2");
        assert_eq!(ep.description.as_deref(), Some("about"));

        // Explicit clear removes.
        ep.apply(
            EpisodePatch {
                description: Patch::Clear,
                image_path: Patch::Set("media/other.png".to_string()),
                ..Default::default()
            },
            Utc::now(),
        )
        .unwrap();
        assert!(ep.description.is_none());
        assert_eq!(ep.image_path.as_deref(), Some("media/other.png"));
    }
}
