//! Token issuance: three kinds, one HS256 key, per-kind subject tagging.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};

use podharbor_core::{DomainResult, Fault};

use crate::claims::TokenClaims;

/// The three token kinds.
///
/// Kinds share a signing key and a claims shape; what separates them is the
/// subject-encoding convention and the validity window. A refresh token can
/// therefore never pass where an access token is expected — the subject tag
/// gives it away before any business logic runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Access,
    Refresh,
    Verification,
}

impl TokenKind {
    /// Subject prefix for this kind. Access tokens carry the bare email.
    pub const fn subject_tag(self) -> &'static str {
        match self {
            TokenKind::Access => "",
            TokenKind::Refresh => "#refresh",
            TokenKind::Verification => "#verification",
        }
    }

    /// Build the tagged subject for an email.
    pub fn tag_subject(self, email: &str) -> String {
        format!("{}{}", self.subject_tag(), email)
    }

    /// Classify a subject and split off the email part.
    pub fn split_subject(subject: &str) -> (TokenKind, &str) {
        if let Some(email) = subject.strip_prefix(TokenKind::Verification.subject_tag()) {
            (TokenKind::Verification, email)
        } else if let Some(email) = subject.strip_prefix(TokenKind::Refresh.subject_tag()) {
            (TokenKind::Refresh, email)
        } else {
            (TokenKind::Access, subject)
        }
    }
}

impl core::fmt::Display for TokenKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let name = match self {
            TokenKind::Access => "access",
            TokenKind::Refresh => "refresh",
            TokenKind::Verification => "verification",
        };
        f.write_str(name)
    }
}

/// Per-kind validity windows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenLifetimes {
    pub access: Duration,
    pub refresh: Duration,
    pub verification: Duration,
}

impl TokenLifetimes {
    /// Conventional units: days for the session tokens, minutes for the
    /// short-lived verification token.
    pub fn new(access_days: i64, refresh_days: i64, verification_minutes: i64) -> Self {
        Self {
            access: Duration::days(access_days),
            refresh: Duration::days(refresh_days),
            verification: Duration::minutes(verification_minutes),
        }
    }

    pub fn for_kind(&self, kind: TokenKind) -> Duration {
        match kind {
            TokenKind::Access => self.access,
            TokenKind::Refresh => self.refresh,
            TokenKind::Verification => self.verification,
        }
    }
}

impl Default for TokenLifetimes {
    fn default() -> Self {
        Self::new(1, 7, 10)
    }
}

/// Encoder/decoder over the shared signing secret.
pub struct TokenCodec {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    lifetimes: TokenLifetimes,
}

impl TokenCodec {
    pub fn new(secret: &[u8], lifetimes: TokenLifetimes) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        // Expiry is checked by `validate_window` against an explicit clock so
        // that callers (and tests) control time.
        validation.validate_exp = false;
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            validation,
            lifetimes,
        }
    }

    pub fn lifetimes(&self) -> &TokenLifetimes {
        &self.lifetimes
    }

    /// Issue a token of the given kind for an email subject.
    ///
    /// Pure apart from the signature: `iat = now`,
    /// `exp = now + lifetime(kind)`.
    pub fn issue(&self, kind: TokenKind, email: &str, now: DateTime<Utc>) -> DomainResult<String> {
        let claims = TokenClaims {
            sub: kind.tag_subject(email),
            iat: now.timestamp(),
            exp: (now + self.lifetimes.for_kind(kind)).timestamp(),
        };

        jsonwebtoken::encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|e| Fault::internal(format!("token signing failed: {e}")))
    }

    /// Verify the signature and recover the claims. Window and kind checks
    /// are the validator's job.
    pub(crate) fn decode(&self, raw: &str) -> DomainResult<TokenClaims> {
        jsonwebtoken::decode::<TokenClaims>(raw, &self.decoding, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| Fault::token_invalid().with_detail(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn subjects_are_tagged_per_kind() {
        assert_eq!(TokenKind::Access.tag_subject("a@x.com"), "a@x.com");
        assert_eq!(TokenKind::Refresh.tag_subject("a@x.com"), "#refresha@x.com");
        assert_eq!(
            TokenKind::Verification.tag_subject("a@x.com"),
            "#verificationa@x.com"
        );
    }

    #[test]
    fn split_subject_round_trips_every_kind() {
        for kind in [TokenKind::Access, TokenKind::Refresh, TokenKind::Verification] {
            let subject = kind.tag_subject("a@x.com");
            let (recovered, email) = TokenKind::split_subject(&subject);
            assert_eq!(recovered, kind);
            assert_eq!(email, "a@x.com");
        }
    }

    #[test]
    fn issue_produces_decodable_claims() {
        let codec = TokenCodec::new(b"test-secret", TokenLifetimes::default());
        let now = Utc::now();

        let raw = codec.issue(TokenKind::Refresh, "a@x.com", now).unwrap();
        let claims = codec.decode(&raw).unwrap();

        assert_eq!(claims.sub, "#refresha@x.com");
        assert_eq!(claims.iat, now.timestamp());
        assert_eq!(claims.exp, (now + Duration::days(7)).timestamp());
    }

    #[test]
    fn decode_rejects_foreign_signature() {
        let issuer = TokenCodec::new(b"secret-a", TokenLifetimes::default());
        let verifier = TokenCodec::new(b"secret-b", TokenLifetimes::default());

        let raw = issuer.issue(TokenKind::Access, "a@x.com", Utc::now()).unwrap();
        let err = verifier.decode(&raw).unwrap_err();
        assert_eq!(err.code, "TOKEN_INVALID");
    }

    #[test]
    fn decode_rejects_garbage() {
        let codec = TokenCodec::new(b"test-secret", TokenLifetimes::default());
        assert_eq!(codec.decode("not-a-token").unwrap_err().code, "TOKEN_INVALID");
    }
}
