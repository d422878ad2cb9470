//! `podharbor-accounts` — the Account entity and its guarded lifecycle.
//!
//! Pure domain: every transition validates its precondition and either
//! mutates or returns a typed fault. IO (stores, hashing, notification)
//! lives elsewhere.

pub mod account;

pub use account::{determine_roles, Account, NewAccount};
