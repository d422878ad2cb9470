//! `podharbor-auth` — pure authentication/authorization boundary.
//!
//! This crate is intentionally decoupled from HTTP and storage: it issues and
//! verifies tokens, checks passwords against the strength policy, and makes
//! ownership/role decisions. Resolving a verified token subject to a stored
//! account is the caller's job.

pub mod claims;
pub mod ownership;
pub mod password;
pub mod roles;
pub mod token;
pub mod validator;

pub use claims::{validate_window, TokenClaims};
pub use ownership::assert_owner;
pub use password::ensure_strong;
pub use roles::{require_role, Role};
pub use token::{TokenCodec, TokenKind, TokenLifetimes};
pub use validator::{validate_token, VerifiedToken};
