//! Document store contracts.
//!
//! Typed get/save/delete-by-id plus filtered, paged search for the two
//! aggregate documents. No storage assumptions: the in-memory engine backs
//! tests and development; a hosted document database implements the same
//! contract in production. Per-document writes are assumed atomic;
//! multi-document operations are not (see `deletion`).

use async_trait::async_trait;
use thiserror::Error;

use podharbor_accounts::Account;
use podharbor_auth::Role;
use podharbor_catalog::{EpisodeStatus, Podcast, PodcastStatus};
use podharbor_core::{AccountId, Fault, PodcastId};

mod in_memory;

pub use in_memory::InMemoryStore;

/// Store operation error. Infrastructure-only: domain faults never originate
/// here.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage backend failure: {0}")]
    Backend(String),
}

impl From<StoreError> for Fault {
    fn from(err: StoreError) -> Self {
        Fault::internal(err.to_string())
    }
}

/// A page request. `page` is zero-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: usize,
    pub size: usize,
}

impl PageRequest {
    pub fn new(page: usize, size: usize) -> Self {
        Self {
            page,
            size: size.clamp(1, 100),
        }
    }

    pub fn offset(&self) -> usize {
        self.page * self.size
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self { page: 0, size: 20 }
    }
}

/// One page of results plus the total match count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: usize,
    pub size: usize,
    pub total: usize,
}

impl<T> Page<T> {
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            page: self.page,
            size: self.size,
            total: self.total,
        }
    }
}

/// Account search criteria; every field is optional and conjunctive.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AccountFilter {
    pub role: Option<Role>,
    pub locked: Option<bool>,
    pub email_verified: Option<bool>,
    /// Case-insensitive substring over username, email and bio.
    pub keyword: Option<String>,
}

/// Podcast search criteria; every field is optional and conjunctive.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PodcastFilter {
    pub owner: Option<AccountId>,
    pub category: Option<String>,
    pub flagged: Option<bool>,
    pub status: Option<PodcastStatus>,
    /// Matches podcasts having at least one episode in this status.
    pub episode_status: Option<EpisodeStatus>,
    /// Case-insensitive substring over titles and descriptions, episodes
    /// included.
    pub keyword: Option<String>,
}

#[async_trait]
pub trait AccountStore: Send + Sync {
    async fn get(&self, id: AccountId) -> Result<Option<Account>, StoreError>;

    /// Lookup by email; the probe is compared case-insensitively against the
    /// stored (lowercase) address.
    async fn find_by_email(&self, email: &str) -> Result<Option<Account>, StoreError>;

    async fn email_exists(&self, email: &str) -> Result<bool, StoreError>;

    async fn username_exists(&self, username: &str) -> Result<bool, StoreError>;

    async fn any_with_role(&self, role: Role) -> Result<bool, StoreError>;

    /// Upsert by id.
    async fn save(&self, account: &Account) -> Result<(), StoreError>;

    async fn delete(&self, id: AccountId) -> Result<(), StoreError>;

    /// Newest accounts first.
    async fn search(
        &self,
        filter: &AccountFilter,
        page: PageRequest,
    ) -> Result<Page<Account>, StoreError>;
}

#[async_trait]
pub trait PodcastStore: Send + Sync {
    async fn get(&self, id: PodcastId) -> Result<Option<Podcast>, StoreError>;

    /// Upsert by id.
    async fn save(&self, podcast: &Podcast) -> Result<(), StoreError>;

    async fn delete(&self, id: PodcastId) -> Result<(), StoreError>;

    async fn list_by_owner(&self, owner: AccountId) -> Result<Vec<Podcast>, StoreError>;

    async fn count_by_owner(
        &self,
        owner: AccountId,
        status: Option<PodcastStatus>,
    ) -> Result<usize, StoreError>;

    /// Most recently published first; unpublished podcasts sort last by
    /// creation time.
    async fn search(
        &self,
        filter: &PodcastFilter,
        page: PageRequest,
    ) -> Result<Page<Podcast>, StoreError>;
}
