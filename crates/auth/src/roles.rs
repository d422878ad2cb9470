//! Role set and the explicit capability check.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use podharbor_core::{DomainResult, Fault};

/// The closed role set. At most one account ever holds `Admin`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    User,
    Admin,
}

impl core::fmt::Display for Role {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Role::User => f.write_str("USER"),
            Role::Admin => f.write_str("ADMIN"),
        }
    }
}

/// Capability check invoked at the top of each guarded operation.
///
/// Replaces declarative framework security: the operation names the role it
/// needs, in code, where the mutation happens.
pub fn require_role(roles: &BTreeSet<Role>, required: Role) -> DomainResult<()> {
    if roles.contains(&required) {
        Ok(())
    } else {
        Err(Fault::admin_required().with_detail(format!("required role: {required}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn admin_passes_user_fails() {
        let admin = BTreeSet::from([Role::Admin]);
        let user = BTreeSet::from([Role::User]);

        assert!(require_role(&admin, Role::Admin).is_ok());
        assert_eq!(
            require_role(&user, Role::Admin).unwrap_err().code,
            "ADMIN_REQUIRED"
        );
    }
}
