//! JWT claims model (transport-agnostic).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use podharbor_core::{DomainResult, Fault};

/// The claims carried by every token, regardless of kind.
///
/// The kind is encoded in the subject string (see [`crate::TokenKind`]), not
/// in a separate claim — one signing key, one claims shape, three subject
/// conventions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenClaims {
    /// Kind-tagged subject (bare email for access tokens).
    pub sub: String,

    /// Issued-at, unix seconds.
    pub iat: i64,

    /// Expiry, unix seconds.
    pub exp: i64,
}

/// Deterministically validate the claims window against an explicit clock.
///
/// Signature verification happens during decode; this checks only time. A
/// token is valid in `[iat, exp)` — `now == exp` is already expired.
pub fn validate_window(claims: &TokenClaims, now: DateTime<Utc>) -> DomainResult<()> {
    if claims.exp <= claims.iat {
        return Err(Fault::token_invalid().with_detail("expiry is not after issuance"));
    }
    if now.timestamp() < claims.iat {
        return Err(Fault::token_invalid().with_detail("token is not yet valid"));
    }
    if now.timestamp() >= claims.exp {
        return Err(Fault::token_expired());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn claims_at(iat: DateTime<Utc>, exp: DateTime<Utc>) -> TokenClaims {
        TokenClaims {
            sub: "someone@example.com".to_string(),
            iat: iat.timestamp(),
            exp: exp.timestamp(),
        }
    }

    #[test]
    fn valid_inside_window() {
        let t0 = Utc::now();
        let claims = claims_at(t0, t0 + Duration::minutes(10));

        assert!(validate_window(&claims, t0).is_ok());
        assert!(validate_window(&claims, t0 + Duration::minutes(9)).is_ok());
    }

    #[test]
    fn expired_at_and_after_boundary() {
        let t0 = Utc::now();
        let claims = claims_at(t0, t0 + Duration::minutes(10));

        let at_exp = validate_window(&claims, t0 + Duration::minutes(10)).unwrap_err();
        assert_eq!(at_exp.code, "TOKEN_EXPIRED");

        let after = validate_window(&claims, t0 + Duration::days(1)).unwrap_err();
        assert_eq!(after.code, "TOKEN_EXPIRED");
    }

    #[test]
    fn rejects_inverted_window_and_future_issuance() {
        let t0 = Utc::now();

        let inverted = claims_at(t0, t0 - Duration::seconds(1));
        assert_eq!(validate_window(&inverted, t0).unwrap_err().code, "TOKEN_INVALID");

        let future = claims_at(t0 + Duration::minutes(5), t0 + Duration::minutes(15));
        assert_eq!(validate_window(&future, t0).unwrap_err().code, "TOKEN_INVALID");
    }
}
