//! Structured failure model.
//!
//! Every failure the domain can raise is a [`Fault`]: a category, a stable
//! machine-readable code, a human message, and an optional free-form detail.
//! HTTP status mapping is deliberately *not* here — transports own that.

use serde::Serialize;
use thiserror::Error;

/// Result type used across the domain layer.
pub type DomainResult<T> = Result<T, Fault>;

/// Failure category.
///
/// Keep this closed: callers branch on it (retry policy, status mapping),
/// so a new category is an API decision, not a convenience.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FaultKind {
    /// Malformed input — caller's fault, never retried.
    Validation,
    /// Resource already in the requested state (duplicate, redundant toggle).
    Conflict,
    /// Resource absent.
    NotFound,
    /// Authenticated but not authorized (ownership, moderation, credentials).
    Forbidden,
    /// Token expired/invalid/kind-mismatched — caller must re-authenticate.
    Token,
    /// Precondition on the acting account (locked, unverified).
    Unavailable,
    /// Infrastructure failure (store, blob). Nothing the caller can fix.
    Internal,
}

/// A structured, terminal failure.
#[derive(Debug, Error, Clone, PartialEq, Eq, Serialize)]
#[error("{code}: {message}")]
pub struct Fault {
    pub kind: FaultKind,
    pub code: &'static str,
    pub message: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl Fault {
    pub const fn new(kind: FaultKind, code: &'static str, message: &'static str) -> Self {
        Self {
            kind,
            code,
            message,
            detail: None,
        }
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    // ── validation ──────────────────────────────────────────────────────

    pub fn invalid_id(detail: impl Into<String>) -> Self {
        Self::new(FaultKind::Validation, "INVALID_ID", "invalid identifier").with_detail(detail)
    }

    pub const fn weak_password() -> Self {
        Self::new(
            FaultKind::Validation,
            "WEAK_PASSWORD",
            "password does not meet security requirements",
        )
    }

    pub const fn password_mismatch() -> Self {
        Self::new(
            FaultKind::Validation,
            "PASSWORD_NOT_MATCH",
            "passwords do not match",
        )
    }

    // ── conflict ────────────────────────────────────────────────────────

    pub const fn email_exists() -> Self {
        Self::new(FaultKind::Conflict, "EMAIL_ALREADY_EXISTS", "email already exists")
    }

    pub const fn username_exists() -> Self {
        Self::new(
            FaultKind::Conflict,
            "USERNAME_ALREADY_EXISTS",
            "username already exists",
        )
    }

    pub const fn admin_exists() -> Self {
        Self::new(FaultKind::Conflict, "ADMIN_ALREADY_EXISTS", "admin already exists")
    }

    pub const fn already_locked() -> Self {
        Self::new(
            FaultKind::Conflict,
            "USER_ALREADY_LOCKED",
            "account is already locked",
        )
    }

    pub const fn not_locked() -> Self {
        Self::new(FaultKind::Conflict, "USER_NOT_LOCKED", "account is not locked")
    }

    pub const fn already_flagged() -> Self {
        Self::new(
            FaultKind::Conflict,
            "PODCAST_ALREADY_FLAGGED",
            "podcast is already flagged",
        )
    }

    pub const fn not_flagged() -> Self {
        Self::new(FaultKind::Conflict, "PODCAST_NOT_FLAGGED", "podcast is not flagged")
    }

    // ── not found ───────────────────────────────────────────────────────

    pub const fn account_not_found() -> Self {
        Self::new(FaultKind::NotFound, "USER_NOT_FOUND", "account not found")
    }

    pub const fn podcast_not_found() -> Self {
        Self::new(FaultKind::NotFound, "PODCAST_NOT_FOUND", "podcast not found")
    }

    pub const fn episode_not_found() -> Self {
        Self::new(
            FaultKind::NotFound,
            "EPISODE_NOT_FOUND",
            "no episode exists at the given index",
        )
    }

    pub const fn upload_incomplete() -> Self {
        Self::new(
            FaultKind::NotFound,
            "FILE_UPLOAD_INCOMPLETE",
            "the referenced file is not available in storage",
        )
    }

    // ── forbidden ───────────────────────────────────────────────────────

    pub const fn not_owner() -> Self {
        Self::new(
            FaultKind::Forbidden,
            "PODCAST_ACCESS_FORBIDDEN",
            "caller is not the owner of this podcast",
        )
    }

    pub const fn admin_required() -> Self {
        Self::new(FaultKind::Forbidden, "ADMIN_REQUIRED", "admin role required")
    }

    pub const fn invalid_credentials() -> Self {
        Self::new(
            FaultKind::Forbidden,
            "INVALID_CREDENTIALS",
            "invalid email or password",
        )
    }

    pub const fn publish_forbidden() -> Self {
        Self::new(
            FaultKind::Forbidden,
            "PODCAST_FORBIDDEN_TO_PUBLISH",
            "flagged podcasts cannot be published",
        )
    }

    pub const fn missing_assets() -> Self {
        Self::new(
            FaultKind::Forbidden,
            "PODCAST_MISSING_ASSETS",
            "podcast has no cover image",
        )
    }

    pub const fn missing_episode() -> Self {
        Self::new(
            FaultKind::Forbidden,
            "PODCAST_MISSING_EPISODE",
            "podcast has no published episode",
        )
    }

    pub const fn missing_audio() -> Self {
        Self::new(
            FaultKind::Forbidden,
            "EPISODE_MISSING_AUDIO",
            "episode has no audio file",
        )
    }

    // ── token ───────────────────────────────────────────────────────────

    pub const fn token_invalid() -> Self {
        Self::new(
            FaultKind::Token,
            "TOKEN_INVALID",
            "the provided token is invalid or malformed",
        )
    }

    pub const fn token_expired() -> Self {
        Self::new(FaultKind::Token, "TOKEN_EXPIRED", "the provided token has expired")
    }

    pub const fn token_kind_mismatch() -> Self {
        Self::new(
            FaultKind::Token,
            "TOKEN_KIND_MISMATCH",
            "token kind does not match the expected kind",
        )
    }

    pub const fn email_token_mismatch() -> Self {
        Self::new(
            FaultKind::Token,
            "EMAIL_TOKEN_MISMATCH",
            "email does not match the token subject",
        )
    }

    // ── unavailable ─────────────────────────────────────────────────────

    pub const fn account_unverified() -> Self {
        Self::new(
            FaultKind::Unavailable,
            "ACCOUNT_NEED_VERIFICATION",
            "account needs email verification",
        )
    }

    pub const fn account_locked() -> Self {
        Self::new(FaultKind::Unavailable, "USER_LOCKED", "account is locked")
    }

    // ── internal ────────────────────────────────────────────────────────

    pub fn internal(detail: impl Into<String>) -> Self {
        Self::new(
            FaultKind::Internal,
            "INTERNAL_ERROR",
            "an unexpected error occurred",
        )
        .with_detail(detail)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detail_is_optional_and_attachable() {
        let bare = Fault::not_owner();
        assert!(bare.detail.is_none());

        let detailed = Fault::not_owner().with_detail("account x is not the owner of podcast y");
        assert_eq!(
            detailed.detail.as_deref(),
            Some("account x is not the owner of podcast y")
        );
        assert_eq!(bare.code, detailed.code);
    }

    #[test]
    fn display_carries_code_and_message() {
        let f = Fault::token_expired();
        assert_eq!(f.to_string(), "TOKEN_EXPIRED: the provided token has expired");
    }
}
