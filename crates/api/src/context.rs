//! Request context: the authenticated account.

use podharbor_accounts::Account;

/// The account resolved from a validated access token, inserted into request
/// extensions by the auth middleware.
#[derive(Debug, Clone)]
pub struct CurrentAccount(pub Account);

impl CurrentAccount {
    pub fn account(&self) -> &Account {
        &self.0
    }
}
