//! Token verification: signature, window, kind, and subject checks.

use chrono::{DateTime, Utc};

use podharbor_core::{DomainResult, Fault};

use crate::claims::validate_window;
use crate::token::{TokenCodec, TokenKind};

/// Outcome of a successful validation: the kind the token actually carries
/// and the email recovered from its subject.
///
/// Resolving the email to a stored account (and failing with
/// `USER_NOT_FOUND` when absent) is the service layer's final step — this
/// module stays storage-free.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifiedToken {
    pub kind: TokenKind,
    pub email: String,
}

/// Validate a raw bearer string against an expected kind.
///
/// `expected_email`, when supplied, must match the token subject
/// (case-insensitive). Access tokens may arrive with the transport's
/// `"Bearer "` prefix still attached; it is stripped here.
pub fn validate_token(
    codec: &TokenCodec,
    raw: &str,
    expected_kind: TokenKind,
    expected_email: Option<&str>,
    now: DateTime<Utc>,
) -> DomainResult<VerifiedToken> {
    let raw = match expected_kind {
        TokenKind::Access => raw.strip_prefix("Bearer ").unwrap_or(raw).trim(),
        _ => raw.trim(),
    };

    let claims = codec.decode(raw)?;
    validate_window(&claims, now)?;

    let (kind, email) = TokenKind::split_subject(&claims.sub);
    if kind != expected_kind {
        return Err(Fault::token_kind_mismatch()
            .with_detail(format!("expected {expected_kind} token, got {kind}")));
    }

    if let Some(expected) = expected_email {
        if !expected.eq_ignore_ascii_case(email) {
            return Err(Fault::email_token_mismatch());
        }
    }

    Ok(VerifiedToken {
        kind,
        email: email.to_string(),
    })
}
