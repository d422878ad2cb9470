//! Ownership guard.

use podharbor_core::{AccountId, DomainResult, Fault};

/// Verify that the caller is the resource's owning account.
///
/// Pure comparison; must run before any mutating current-user operation on a
/// podcast or its episodes. The admin surface bypasses this by design and is
/// guarded by [`crate::require_role`] instead.
pub fn assert_owner(owner: AccountId, caller: AccountId) -> DomainResult<()> {
    if owner == caller {
        Ok(())
    } else {
        Err(Fault::not_owner()
            .with_detail(format!("account {caller} does not own this resource")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn owner_passes_stranger_fails() {
        let owner = AccountId::new();
        let stranger = AccountId::new();

        assert!(assert_owner(owner, owner).is_ok());
        assert_eq!(
            assert_owner(owner, stranger).unwrap_err().code,
            "PODCAST_ACCESS_FORBIDDEN"
        );
    }
}
