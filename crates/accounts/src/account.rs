//! Account entity and lifecycle transitions.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use podharbor_auth::Role;
use podharbor_core::{AccountId, DomainResult, Fault, FaultKind};

const USERNAME_MIN: usize = 3;
const USERNAME_MAX: usize = 20;
const BIO_MAX: usize = 100;

/// A registered account.
///
/// Email and username are stored lowercase; uniqueness is therefore
/// case-insensitive by construction. `email_verified` doubles as the
/// sign-out switch: flipping it off blocks every future login until the
/// address is re-verified.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub id: AccountId,
    pub email: String,
    pub username: String,
    pub password_hash: String,
    pub roles: BTreeSet<Role>,
    pub bio: Option<String>,
    /// Blob path of the profile image, if one was uploaded.
    pub profile_path: Option<String>,
    pub locked: bool,
    pub email_verified: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub last_login_at: Option<DateTime<Utc>>,
}

/// Input for account creation, after request-level validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAccount {
    pub email: String,
    pub username: String,
    pub password_hash: String,
    pub roles: BTreeSet<Role>,
    pub bio: Option<String>,
}

/// Decide the role set for a registration.
///
/// The configured admin address gets `Admin` — but only while no admin
/// account exists yet. A second registration under that address must fail
/// loudly rather than silently downgrade to `User`.
pub fn determine_roles(
    email: &str,
    admin_email: &str,
    admin_exists: bool,
) -> DomainResult<BTreeSet<Role>> {
    if email.eq_ignore_ascii_case(admin_email) {
        if admin_exists {
            return Err(Fault::admin_exists());
        }
        Ok(BTreeSet::from([Role::Admin]))
    } else {
        Ok(BTreeSet::from([Role::User]))
    }
}

/// Request-level shape checks for an email address.
pub fn validate_email(email: &str) -> DomainResult<()> {
    let trimmed = email.trim();
    let mut parts = trimmed.splitn(2, '@');
    let local = parts.next().unwrap_or_default();
    let domain = parts.next().unwrap_or_default();
    if local.is_empty() || domain.is_empty() || !domain.contains('.') {
        return Err(Fault::new(
            FaultKind::Validation,
            "INVALID_EMAIL",
            "invalid email format",
        ));
    }
    Ok(())
}

/// Usernames: 3–20 characters, lowercase letters and digits only.
pub fn validate_username(username: &str) -> DomainResult<()> {
    let len = username.chars().count();
    let shape_ok = len >= USERNAME_MIN
        && len <= USERNAME_MAX
        && username
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit());
    if shape_ok {
        Ok(())
    } else {
        Err(Fault::new(
            FaultKind::Validation,
            "INVALID_USERNAME",
            "username must be 3-20 lowercase letters or digits",
        ))
    }
}

pub fn validate_bio(bio: &str) -> DomainResult<()> {
    if bio.chars().count() > BIO_MAX {
        return Err(Fault::new(
            FaultKind::Validation,
            "INVALID_BIO",
            "bio must not exceed 100 characters",
        ));
    }
    Ok(())
}

impl Account {
    /// Create a fresh, unverified account. Email and username are
    /// normalized to lowercase here, not at the call sites.
    pub fn create(id: AccountId, new: NewAccount, now: DateTime<Utc>) -> Self {
        Self {
            id,
            email: new.email.trim().to_lowercase(),
            username: new.username.trim().to_lowercase(),
            password_hash: new.password_hash,
            roles: new.roles,
            bio: new.bio,
            profile_path: None,
            locked: false,
            email_verified: false,
            created_at: now,
            updated_at: now,
            last_login_at: None,
        }
    }

    pub fn is_admin(&self) -> bool {
        self.roles.contains(&Role::Admin)
    }

    /// Preconditions on the actor before any credential check runs.
    ///
    /// Verification is reported before the lock state.
    pub fn ensure_can_authenticate(&self) -> DomainResult<()> {
        if !self.email_verified {
            return Err(Fault::account_unverified());
        }
        if self.locked {
            return Err(Fault::account_locked());
        }
        Ok(())
    }

    pub fn lock(&mut self, now: DateTime<Utc>) -> DomainResult<()> {
        if self.locked {
            return Err(Fault::already_locked());
        }
        self.locked = true;
        self.updated_at = now;
        Ok(())
    }

    pub fn unlock(&mut self, now: DateTime<Utc>) -> DomainResult<()> {
        if !self.locked {
            return Err(Fault::not_locked());
        }
        self.locked = false;
        self.updated_at = now;
        Ok(())
    }

    pub fn verify_email(&mut self, now: DateTime<Utc>) {
        self.email_verified = true;
        self.updated_at = now;
    }

    /// Sign-out: tokens are stateless, so "logging out" means un-verifying
    /// the address, which blocks all future logins until re-verification.
    pub fn unverify_email(&mut self, now: DateTime<Utc>) {
        self.email_verified = false;
        self.updated_at = now;
    }

    pub fn record_login(&mut self, now: DateTime<Utc>) {
        self.last_login_at = Some(now);
        self.updated_at = now;
    }

    pub fn set_password_hash(&mut self, hash: String, now: DateTime<Utc>) {
        self.password_hash = hash;
        self.updated_at = now;
    }

    pub fn set_username(&mut self, username: &str, now: DateTime<Utc>) -> DomainResult<()> {
        validate_username(username)?;
        self.username = username.to_lowercase();
        self.updated_at = now;
        Ok(())
    }

    pub fn set_bio(&mut self, bio: Option<String>, now: DateTime<Utc>) -> DomainResult<()> {
        if let Some(text) = bio.as_deref() {
            validate_bio(text)?;
        }
        self.bio = bio;
        self.updated_at = now;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_account(email: &str) -> Account {
        Account::create(
            AccountId::new(),
            NewAccount {
                email: email.to_string(),
                username: "alice".to_string(),
                password_hash: "hash".to_string(),
                roles: BTreeSet::from([Role::User]),
                bio: None,
            },
            Utc::now(),
        )
    }

    #[test]
    fn creation_normalizes_email_and_username() {
        let account = Account::create(
            AccountId::new(),
            NewAccount {
                email: "Alice@Example.COM".to_string(),
                username: "Alice".to_string(),
                password_hash: "hash".to_string(),
                roles: BTreeSet::from([Role::User]),
                bio: None,
            },
            Utc::now(),
        );
        assert_eq!(account.email, "alice@example.com");
        assert_eq!(account.username, "alice");
        assert!(!account.email_verified);
        assert!(!account.locked);
    }

    #[test]
    fn unverified_is_reported_before_locked() {
        let mut account = new_account("a@x.com");
        account.locked = true;

        let err = account.ensure_can_authenticate().unwrap_err();
        assert_eq!(err.code, "ACCOUNT_NEED_VERIFICATION");

        account.verify_email(Utc::now());
        let err = account.ensure_can_authenticate().unwrap_err();
        assert_eq!(err.code, "USER_LOCKED");

        account.unlock(Utc::now()).unwrap();
        assert!(account.ensure_can_authenticate().is_ok());
    }

    #[test]
    fn lock_and_unlock_guard_redundant_transitions() {
        let mut account = new_account("a@x.com");

        account.lock(Utc::now()).unwrap();
        assert_eq!(account.lock(Utc::now()).unwrap_err().code, "USER_ALREADY_LOCKED");

        account.unlock(Utc::now()).unwrap();
        assert_eq!(account.unlock(Utc::now()).unwrap_err().code, "USER_NOT_LOCKED");
    }

    #[test]
    fn admin_role_is_assigned_once() {
        let roles = determine_roles("admin@x.com", "admin@x.com", false).unwrap();
        assert_eq!(roles, BTreeSet::from([Role::Admin]));

        // Case differences still hit the admin path.
        let err = determine_roles("ADMIN@x.com", "admin@x.com", true).unwrap_err();
        assert_eq!(err.code, "ADMIN_ALREADY_EXISTS");

        let roles = determine_roles("user@x.com", "admin@x.com", true).unwrap();
        assert_eq!(roles, BTreeSet::from([Role::User]));
    }

    #[test]
    fn sign_out_unverifies() {
        let mut account = new_account("a@x.com");
        account.verify_email(Utc::now());
        assert!(account.ensure_can_authenticate().is_ok());

        account.unverify_email(Utc::now());
        assert_eq!(
            account.ensure_can_authenticate().unwrap_err().code,
            "ACCOUNT_NEED_VERIFICATION"
        );
    }

    #[test]
    fn username_and_bio_shape_checks() {
        assert!(validate_username("alice99").is_ok());
        assert!(validate_username("Al").is_err());
        assert!(validate_username("has space").is_err());
        assert!(validate_bio(&"x".repeat(100)).is_ok());
        assert!(validate_bio(&"x".repeat(101)).is_err());
    }
}
