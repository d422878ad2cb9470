//! In-memory document store (tests and development).

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;

use podharbor_accounts::Account;
use podharbor_auth::Role;
use podharbor_catalog::{Podcast, PodcastStatus};
use podharbor_core::{AccountId, PodcastId};

use super::{
    AccountFilter, AccountStore, Page, PageRequest, PodcastFilter, PodcastStore, StoreError,
};

/// Both document collections behind plain `RwLock`s.
///
/// Lock scope is one call; nothing await-s while holding a guard.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    accounts: RwLock<HashMap<AccountId, Account>>,
    podcasts: RwLock<HashMap<PodcastId, Podcast>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn lock_poisoned<T>(_: std::sync::PoisonError<T>) -> StoreError {
    StoreError::Backend("lock poisoned".to_string())
}

fn paginate<T>(mut items: Vec<T>, page: PageRequest) -> Page<T> {
    let total = items.len();
    let start = page.offset().min(total);
    let end = (start + page.size).min(total);
    let items = items.drain(start..end).collect();
    Page {
        items,
        page: page.page,
        size: page.size,
        total,
    }
}

fn contains_ci(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(needle)
}

fn account_matches(account: &Account, filter: &AccountFilter) -> bool {
    if let Some(role) = filter.role {
        if !account.roles.contains(&role) {
            return false;
        }
    }
    if let Some(locked) = filter.locked {
        if account.locked != locked {
            return false;
        }
    }
    if let Some(verified) = filter.email_verified {
        if account.email_verified != verified {
            return false;
        }
    }
    if let Some(keyword) = filter.keyword.as_deref() {
        let needle = keyword.to_lowercase();
        let hit = contains_ci(&account.username, &needle)
            || contains_ci(&account.email, &needle)
            || account
                .bio
                .as_deref()
                .is_some_and(|bio| contains_ci(bio, &needle));
        if !hit {
            return false;
        }
    }
    true
}

fn podcast_matches(podcast: &Podcast, filter: &PodcastFilter) -> bool {
    if let Some(owner) = filter.owner {
        if podcast.owner != owner {
            return false;
        }
    }
    if let Some(category) = filter.category.as_deref() {
        if !podcast.category.eq_ignore_ascii_case(category) {
            return false;
        }
    }
    if let Some(flagged) = filter.flagged {
        if podcast.flagged != flagged {
            return false;
        }
    }
    if let Some(status) = filter.status {
        if podcast.status != status {
            return false;
        }
    }
    if let Some(episode_status) = filter.episode_status {
        if !podcast.episodes.iter().any(|e| e.status == episode_status) {
            return false;
        }
    }
    if let Some(keyword) = filter.keyword.as_deref() {
        let needle = keyword.to_lowercase();
        let hit = contains_ci(&podcast.title, &needle)
            || contains_ci(&podcast.description, &needle)
            || podcast.episodes.iter().any(|e| {
                contains_ci(&e.title, &needle)
                    || e.description
                        .as_deref()
                        .is_some_and(|d| contains_ci(d, &needle))
            });
        if !hit {
            return false;
        }
    }
    true
}

#[async_trait]
impl AccountStore for InMemoryStore {
    async fn get(&self, id: AccountId) -> Result<Option<Account>, StoreError> {
        Ok(self.accounts.read().map_err(lock_poisoned)?.get(&id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Account>, StoreError> {
        let probe = email.trim().to_lowercase();
        Ok(self
            .accounts
            .read()
            .map_err(lock_poisoned)?
            .values()
            .find(|a| a.email == probe)
            .cloned())
    }

    async fn email_exists(&self, email: &str) -> Result<bool, StoreError> {
        Ok(self.find_by_email(email).await?.is_some())
    }

    async fn username_exists(&self, username: &str) -> Result<bool, StoreError> {
        let probe = username.trim().to_lowercase();
        Ok(self
            .accounts
            .read()
            .map_err(lock_poisoned)?
            .values()
            .any(|a| a.username == probe))
    }

    async fn any_with_role(&self, role: Role) -> Result<bool, StoreError> {
        Ok(self
            .accounts
            .read()
            .map_err(lock_poisoned)?
            .values()
            .any(|a| a.roles.contains(&role)))
    }

    async fn save(&self, account: &Account) -> Result<(), StoreError> {
        self.accounts
            .write()
            .map_err(lock_poisoned)?
            .insert(account.id, account.clone());
        Ok(())
    }

    async fn delete(&self, id: AccountId) -> Result<(), StoreError> {
        self.accounts.write().map_err(lock_poisoned)?.remove(&id);
        Ok(())
    }

    async fn search(
        &self,
        filter: &AccountFilter,
        page: PageRequest,
    ) -> Result<Page<Account>, StoreError> {
        let mut matches: Vec<Account> = self
            .accounts
            .read()
            .map_err(lock_poisoned)?
            .values()
            .filter(|a| account_matches(a, filter))
            .cloned()
            .collect();
        matches.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(paginate(matches, page))
    }
}

#[async_trait]
impl PodcastStore for InMemoryStore {
    async fn get(&self, id: PodcastId) -> Result<Option<Podcast>, StoreError> {
        Ok(self.podcasts.read().map_err(lock_poisoned)?.get(&id).cloned())
    }

    async fn save(&self, podcast: &Podcast) -> Result<(), StoreError> {
        self.podcasts
            .write()
            .map_err(lock_poisoned)?
            .insert(podcast.id, podcast.clone());
        Ok(())
    }

    async fn delete(&self, id: PodcastId) -> Result<(), StoreError> {
        self.podcasts.write().map_err(lock_poisoned)?.remove(&id);
        Ok(())
    }

    async fn list_by_owner(&self, owner: AccountId) -> Result<Vec<Podcast>, StoreError> {
        let mut owned: Vec<Podcast> = self
            .podcasts
            .read()
            .map_err(lock_poisoned)?
            .values()
            .filter(|p| p.owner == owner)
            .cloned()
            .collect();
        owned.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(owned)
    }

    async fn count_by_owner(
        &self,
        owner: AccountId,
        status: Option<PodcastStatus>,
    ) -> Result<usize, StoreError> {
        Ok(self
            .podcasts
            .read()
            .map_err(lock_poisoned)?
            .values()
            .filter(|p| p.owner == owner && status.is_none_or(|s| p.status == s))
            .count())
    }

    async fn search(
        &self,
        filter: &PodcastFilter,
        page: PageRequest,
    ) -> Result<Page<Podcast>, StoreError> {
        let mut matches: Vec<Podcast> = self
            .podcasts
            .read()
            .map_err(lock_poisoned)?
            .values()
            .filter(|p| podcast_matches(p, filter))
            .cloned()
            .collect();
        // Most recently published first; never-published sort last, newest
        // creation first among them.
        matches.sort_by(|a, b| {
            b.published_at
                .cmp(&a.published_at)
                .then(b.created_at.cmp(&a.created_at))
        });
        Ok(paginate(matches, page))
    }
}
