//! Password strength policy.

use podharbor_core::{DomainResult, Fault};

const MIN_LEN: usize = 8;
const MAX_LEN: usize = 20;
const SPECIALS: &str = "@$!%*?&";

/// Check a candidate password against the strength policy: 8–20 characters,
/// at least one lowercase letter, one uppercase letter, one digit, and one
/// special from `@$!%*?&`; no characters outside those classes.
pub fn ensure_strong(password: &str) -> DomainResult<()> {
    let len = password.chars().count();
    if len < MIN_LEN || len > MAX_LEN {
        return Err(Fault::weak_password());
    }

    let mut lower = false;
    let mut upper = false;
    let mut digit = false;
    let mut special = false;

    for c in password.chars() {
        if c.is_ascii_lowercase() {
            lower = true;
        } else if c.is_ascii_uppercase() {
            upper = true;
        } else if c.is_ascii_digit() {
            digit = true;
        } else if SPECIALS.contains(c) {
            special = true;
        } else {
            return Err(Fault::weak_password());
        }
    }

    if lower && upper && digit && special {
        Ok(())
    } else {
        Err(Fault::weak_password())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_a_conforming_password() {
        assert!(ensure_strong("Str0ng!Pass").is_ok());
    }

    #[test]
    fn rejects_missing_classes() {
        assert!(ensure_strong("str0ng!pass").is_err()); // no uppercase
        assert!(ensure_strong("STR0NG!PASS").is_err()); // no lowercase
        assert!(ensure_strong("Strong!Pass").is_err()); // no digit
        assert!(ensure_strong("Str0ngPass1").is_err()); // no special
    }

    #[test]
    fn rejects_bad_lengths_and_foreign_characters() {
        assert!(ensure_strong("S0!a").is_err());
        assert!(ensure_strong("S0!aaaaaaaaaaaaaaaaaaaaaaa").is_err());
        assert!(ensure_strong("Str0ng!Pa s").is_err()); // space is outside the alphabet
    }
}
