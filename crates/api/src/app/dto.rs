//! Request/response DTOs and JSON mapping shapes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use podharbor_auth::Role;
use podharbor_catalog::{EpisodeStatus, PodcastStatus};
use podharbor_core::{AccountId, Patch, PodcastId};
use podharbor_infra::{AudioExt, ImageExt, Page};

// ── auth ────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub username: String,
    pub password: String,
    pub bio: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    pub account_id: AccountId,
    pub email: String,
    pub username: String,
    pub verification_required: bool,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub account_id: AccountId,
    pub email: String,
    pub username: String,
    pub roles: Vec<Role>,
    pub profile_url: Option<String>,
    pub access_token: String,
    pub refresh_token: String,
}

#[derive(Debug, Serialize)]
pub struct TokenPairResponse {
    pub access_token: String,
    pub refresh_token: String,
}

#[derive(Debug, Deserialize)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

#[derive(Debug, Deserialize)]
pub struct VerifyEmailRequest {
    pub email: String,
    pub token: String,
}

#[derive(Debug, Deserialize)]
pub struct ResendVerificationRequest {
    pub email: String,
    pub purpose: VerificationPurpose,
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VerificationPurpose {
    Email,
    PasswordReset,
    AccountDeletion,
}

#[derive(Debug, Deserialize)]
pub struct SignOutRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct ChangePasswordRequest {
    pub email: String,
    pub password: String,
    pub new_password: String,
}

#[derive(Debug, Deserialize)]
pub struct ResetPasswordRequest {
    pub email: String,
    pub token: String,
    pub new_password: String,
    pub confirm_password: String,
}

// ── profile ─────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    pub account_id: AccountId,
    pub email: String,
    pub username: String,
    pub bio: Option<String>,
    pub profile_url: Option<String>,
    pub roles: Vec<Role>,
    pub podcast_count: usize,
    pub joined_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub last_login_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize, Default)]
pub struct UpdateProfileRequest {
    pub username: Option<String>,
    #[serde(default)]
    pub bio: Patch<String>,
    #[serde(default)]
    pub profile_path: Patch<String>,
}

#[derive(Debug, Deserialize)]
pub struct DeleteAccountRequest {
    pub token: String,
}

#[derive(Debug, Deserialize)]
pub struct ImageUploadRequest {
    pub extension: ImageExt,
}

#[derive(Debug, Deserialize)]
pub struct AudioUploadRequest {
    pub extension: AudioExt,
}

#[derive(Debug, Serialize)]
pub struct UploadUrlResponse {
    pub upload_url: String,
    pub blob_path: String,
}

// ── podcasts (owner surface) ────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct CreatePodcastRequest {
    pub title: String,
    pub description: String,
    pub category: String,
}

#[derive(Debug, Deserialize, Default)]
pub struct UpdatePodcastRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    #[serde(default)]
    pub cover_path: Patch<String>,
    #[serde(default)]
    pub banner_path: Patch<String>,
}

/// `cover` or `banner`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageSlot {
    Cover,
    Banner,
}

#[derive(Debug, Deserialize)]
pub struct PodcastImageUploadRequest {
    pub slot: ImageSlot,
    pub extension: ImageExt,
}

#[derive(Debug, Serialize)]
pub struct PodcastSummary {
    pub podcast_id: PodcastId,
    pub title: String,
    pub category: String,
    pub status: PodcastStatus,
    pub flagged: bool,
    pub cover_url: Option<String>,
    pub episode_count: usize,
    pub published_at: Option<DateTime<Utc>>,
    pub last_episode_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize)]
pub struct PodcastDetail {
    pub podcast_id: PodcastId,
    pub title: String,
    pub description: String,
    pub category: String,
    pub status: PodcastStatus,
    pub flagged: bool,
    pub cover_url: Option<String>,
    pub banner_url: Option<String>,
    pub episode_count: usize,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub published_at: Option<DateTime<Utc>>,
    pub last_episode_at: Option<DateTime<Utc>>,
}

// ── episodes ────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct CreateEpisodeRequest {
    pub title: String,
    pub description: Option<String>,
    pub duration_secs: u32,
}

#[derive(Debug, Deserialize, Default)]
pub struct UpdateEpisodeRequest {
    pub title: Option<String>,
    #[serde(default)]
    pub description: Patch<String>,
    pub duration_secs: Option<u32>,
    #[serde(default)]
    pub image_path: Patch<String>,
    #[serde(default)]
    pub audio_path: Patch<String>,
}

#[derive(Debug, Serialize)]
pub struct EpisodeDetail {
    /// Positional identity: the episode's index in the podcast's list.
    pub episode_id: usize,
    pub title: String,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub audio_url: Option<String>,
    pub duration_secs: u32,
    pub status: EpisodeStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub published_at: Option<DateTime<Utc>>,
}

// ── public discovery ────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct PublicPodcast {
    pub podcast_id: PodcastId,
    pub title: String,
    pub description: String,
    pub creator_id: AccountId,
    pub creator_name: String,
    pub category: String,
    pub cover_url: Option<String>,
    pub banner_url: Option<String>,
    /// Published episodes only.
    pub episode_count: usize,
    pub published_at: Option<DateTime<Utc>>,
    pub last_episode_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize)]
pub struct PublicEpisode {
    /// Index within the *published* episode list.
    pub episode_id: usize,
    pub title: String,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub audio_url: Option<String>,
    pub duration_secs: u32,
    pub published_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize)]
pub struct CreatorResponse {
    pub creator_id: AccountId,
    pub username: String,
    pub bio: Option<String>,
    pub profile_url: Option<String>,
    pub joined_at: DateTime<Utc>,
    pub published_podcast_count: usize,
}

// ── admin ───────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct AdminAccountSummary {
    pub account_id: AccountId,
    pub username: String,
    pub email: String,
    pub profile_url: Option<String>,
    pub roles: Vec<Role>,
    pub locked: bool,
    pub email_verified: bool,
    pub podcast_count: usize,
    pub joined_at: DateTime<Utc>,
    pub last_login_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize)]
pub struct AdminAccountDetail {
    #[serde(flatten)]
    pub summary: AdminAccountSummary,
    pub podcasts: Vec<PodcastSummary>,
}

// ── query parameters ────────────────────────────────────────────────────

/// Podcast status filter; `FLAGGED` is the moderation pseudo-status layered
/// on top of the real three.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PodcastStatusParam {
    Draft,
    Published,
    Archived,
    Flagged,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AccountStatusParam {
    Active,
    Locked,
    PendingVerification,
}

#[derive(Debug, Deserialize, Default)]
pub struct PodcastListParams {
    pub q: Option<String>,
    pub status: Option<PodcastStatusParam>,
    #[serde(default)]
    pub page: usize,
    pub size: Option<usize>,
}

#[derive(Debug, Deserialize, Default)]
pub struct DiscoveryParams {
    pub q: Option<String>,
    pub category: Option<String>,
    #[serde(default)]
    pub page: usize,
    pub size: Option<usize>,
}

#[derive(Debug, Deserialize, Default)]
pub struct AccountListParams {
    pub q: Option<String>,
    pub role: Option<Role>,
    pub status: Option<AccountStatusParam>,
    #[serde(default)]
    pub page: usize,
    pub size: Option<usize>,
}

// ── pagination envelope ─────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct PageResponse<T> {
    pub items: Vec<T>,
    pub page: usize,
    pub size: usize,
    pub total: usize,
}

impl<T> From<Page<T>> for PageResponse<T> {
    fn from(page: Page<T>) -> Self {
        Self {
            items: page.items,
            page: page.page,
            size: page.size,
            total: page.total,
        }
    }
}
