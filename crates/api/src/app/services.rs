//! Service wiring and operation orchestration.
//!
//! `AppServices` owns the collaborator handles and hosts every operation the
//! routes expose: token-validated account flows, ownership-checked content
//! transitions, admin moderation, and public discovery. Routes stay thin.

use std::sync::Arc;

use chrono::Utc;

use podharbor_accounts::{account as account_rules, determine_roles, Account, NewAccount};
use podharbor_auth::{
    assert_owner, ensure_strong, require_role, validate_token, Role, TokenCodec, TokenKind,
};
use podharbor_catalog::{
    Episode, EpisodeStatus, NewEpisode, NewPodcast, Podcast, PodcastStatus,
};
use podharbor_core::{DomainResult, Fault, Patch, PodcastId};
use podharbor_infra::{
    dispatch_with_retry, AccountFilter, AccountStore, ArgonPasswordHasher, BlobStore,
    DeletionCascade, InMemoryBlobStore, InMemoryStore, Media, NoticeKind, Notifier, PageRequest,
    PasswordHasher, PodcastFilter, PodcastStore, RetryPolicy, TracingNotifier,
};

use crate::app::dto;
use crate::config::AppConfig;

pub struct AppServices {
    accounts: Arc<dyn AccountStore>,
    podcasts: Arc<dyn PodcastStore>,
    media: Media,
    hasher: Arc<dyn PasswordHasher>,
    notifier: Arc<dyn Notifier>,
    tokens: TokenCodec,
    cascade: DeletionCascade,
    admin_email: String,
    notify_retry: RetryPolicy,
}

impl AppServices {
    pub fn new(
        config: &AppConfig,
        accounts: Arc<dyn AccountStore>,
        podcasts: Arc<dyn PodcastStore>,
        blobs: Arc<dyn BlobStore>,
        hasher: Arc<dyn PasswordHasher>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        let media = Media::new(blobs);
        let cascade = DeletionCascade::new(accounts.clone(), podcasts.clone(), media.clone());
        Self {
            accounts,
            podcasts,
            media,
            hasher,
            notifier,
            tokens: TokenCodec::new(config.jwt_secret.as_bytes(), config.token_lifetimes),
            cascade,
            admin_email: config.admin_email.clone(),
            notify_retry: config.notify_retry,
        }
    }

    /// Default development wiring: in-memory store and blob store, argon2id
    /// hashing, log-only notifications.
    pub fn in_memory(config: &AppConfig) -> Self {
        let store = Arc::new(InMemoryStore::new());
        Self::new(
            config,
            store.clone(),
            store,
            Arc::new(InMemoryBlobStore::new()),
            Arc::new(ArgonPasswordHasher),
            Arc::new(TracingNotifier),
        )
    }

    // ── token plumbing ──────────────────────────────────────────────────

    /// Validate a token of the expected kind and resolve its subject to a
    /// stored account — the final step of token validation.
    async fn resolve_token(
        &self,
        raw: &str,
        kind: TokenKind,
        expected_email: Option<&str>,
    ) -> DomainResult<Account> {
        let verified = validate_token(&self.tokens, raw, kind, expected_email, Utc::now())?;
        self.accounts
            .find_by_email(&verified.email)
            .await?
            .ok_or_else(Fault::account_not_found)
    }

    /// Access-token authentication for the protected surfaces. The account
    /// must still be able to authenticate: a lock or sign-out kills every
    /// outstanding token's usefulness.
    pub async fn authenticate_access(&self, raw: &str) -> DomainResult<Account> {
        let account = self.resolve_token(raw, TokenKind::Access, None).await?;
        account.ensure_can_authenticate()?;
        Ok(account)
    }

    fn issue_pair(&self, email: &str) -> DomainResult<(String, String)> {
        let now = Utc::now();
        let access = self.tokens.issue(TokenKind::Access, email, now)?;
        let refresh = self.tokens.issue(TokenKind::Refresh, email, now)?;
        Ok((access, refresh))
    }

    /// Issue a verification token and hand it to the notifier without
    /// blocking the caller. Dispatch failure never fails the operation.
    fn dispatch_verification(&self, email: &str, kind: NoticeKind) -> DomainResult<()> {
        let token = self.tokens.issue(TokenKind::Verification, email, Utc::now())?;
        let _ = dispatch_with_retry(
            self.notifier.clone(),
            self.notify_retry,
            email.to_string(),
            token,
            kind,
        );
        Ok(())
    }

    // ── account lifecycle ───────────────────────────────────────────────

    pub async fn register(
        &self,
        req: dto::RegisterRequest,
    ) -> DomainResult<dto::RegisterResponse> {
        let email = req.email.trim().to_lowercase();
        let username = req.username.trim().to_lowercase();

        account_rules::validate_email(&email)?;
        account_rules::validate_username(&username)?;
        if let Some(bio) = req.bio.as_deref() {
            account_rules::validate_bio(bio)?;
        }

        if self.accounts.email_exists(&email).await? {
            return Err(Fault::email_exists());
        }
        if self.accounts.username_exists(&username).await? {
            return Err(Fault::username_exists());
        }

        ensure_strong(&req.password)?;

        let admin_exists = self.accounts.any_with_role(Role::Admin).await?;
        let roles = determine_roles(&email, &self.admin_email, admin_exists)?;

        let account = Account::create(
            podharbor_core::AccountId::new(),
            NewAccount {
                email: email.clone(),
                username,
                password_hash: self.hasher.hash(&req.password)?,
                roles,
                bio: req.bio,
            },
            Utc::now(),
        );
        self.accounts.save(&account).await?;

        tracing::info!(account_id = %account.id, "account registered");
        self.dispatch_verification(&email, NoticeKind::EmailVerification)?;

        Ok(dto::RegisterResponse {
            account_id: account.id,
            email: account.email,
            username: account.username,
            verification_required: true,
        })
    }

    pub async fn login(&self, req: dto::LoginRequest) -> DomainResult<dto::LoginResponse> {
        let mut account = self
            .accounts
            .find_by_email(&req.email)
            .await?
            .ok_or_else(Fault::account_not_found)?;

        account.ensure_can_authenticate()?;
        if !self.hasher.verify(&req.password, &account.password_hash) {
            return Err(Fault::invalid_credentials());
        }

        account.record_login(Utc::now());
        self.accounts.save(&account).await?;

        let (access_token, refresh_token) = self.issue_pair(&account.email)?;
        let profile_url = self.media.download_url(account.profile_path.as_deref()).await?;

        Ok(dto::LoginResponse {
            account_id: account.id,
            email: account.email,
            username: account.username,
            roles: account.roles.into_iter().collect(),
            profile_url,
            access_token,
            refresh_token,
        })
    }

    /// Rotation: the old refresh token is not revoked (tokens are
    /// stateless); the new pair supersedes it for subsequent use.
    pub async fn refresh(&self, raw: &str) -> DomainResult<dto::TokenPairResponse> {
        let account = self.resolve_token(raw, TokenKind::Refresh, None).await?;
        let (access_token, refresh_token) = self.issue_pair(&account.email)?;
        Ok(dto::TokenPairResponse {
            access_token,
            refresh_token,
        })
    }

    pub async fn verify_email(&self, req: dto::VerifyEmailRequest) -> DomainResult<()> {
        let mut account = self
            .resolve_token(&req.token, TokenKind::Verification, Some(&req.email))
            .await?;
        account.verify_email(Utc::now());
        self.accounts.save(&account).await?;
        Ok(())
    }

    pub async fn resend_verification(
        &self,
        req: dto::ResendVerificationRequest,
    ) -> DomainResult<()> {
        let account = self
            .accounts
            .find_by_email(&req.email)
            .await?
            .ok_or_else(Fault::account_not_found)?;
        self.dispatch_verification(&account.email, req.purpose.into())
    }

    /// Sign-out is modeled as un-verifying the address: tokens carry no
    /// revocation state, so this is what invalidates future logins.
    pub async fn sign_out(&self, bearer: &str, req: dto::SignOutRequest) -> DomainResult<()> {
        let mut account = self
            .resolve_token(bearer, TokenKind::Access, Some(&req.email))
            .await?;
        if !self.hasher.verify(&req.password, &account.password_hash) {
            return Err(Fault::invalid_credentials());
        }
        account.unverify_email(Utc::now());
        self.accounts.save(&account).await?;
        Ok(())
    }

    pub async fn change_password(
        &self,
        bearer: &str,
        req: dto::ChangePasswordRequest,
    ) -> DomainResult<()> {
        let mut account = self
            .resolve_token(bearer, TokenKind::Access, Some(&req.email))
            .await?;
        if !self.hasher.verify(&req.password, &account.password_hash) {
            return Err(Fault::invalid_credentials());
        }
        ensure_strong(&req.new_password)?;
        account.set_password_hash(self.hasher.hash(&req.new_password)?, Utc::now());
        self.accounts.save(&account).await?;
        Ok(())
    }

    pub async fn reset_password(&self, req: dto::ResetPasswordRequest) -> DomainResult<()> {
        let mut account = self
            .resolve_token(&req.token, TokenKind::Verification, Some(&req.email))
            .await?;
        if req.new_password != req.confirm_password {
            return Err(Fault::password_mismatch());
        }
        ensure_strong(&req.new_password)?;
        account.set_password_hash(self.hasher.hash(&req.new_password)?, Utc::now());
        self.accounts.save(&account).await?;
        Ok(())
    }

    // ── profile ─────────────────────────────────────────────────────────

    pub async fn my_profile(&self, account: &Account) -> DomainResult<dto::ProfileResponse> {
        let podcast_count = self.podcasts.count_by_owner(account.id, None).await?;
        Ok(dto::ProfileResponse {
            account_id: account.id,
            email: account.email.clone(),
            username: account.username.clone(),
            bio: account.bio.clone(),
            profile_url: self.media.download_url(account.profile_path.as_deref()).await?,
            roles: account.roles.iter().copied().collect(),
            podcast_count,
            joined_at: account.created_at,
            updated_at: account.updated_at,
            last_login_at: account.last_login_at,
        })
    }

    pub async fn profile_upload_url(
        &self,
        account: &Account,
        req: dto::ImageUploadRequest,
    ) -> DomainResult<dto::UploadUrlResponse> {
        let blob_path = Media::profile_image_path(account.id, req.extension);
        Ok(dto::UploadUrlResponse {
            upload_url: self.media.upload_url(&blob_path).await?,
            blob_path,
        })
    }

    pub async fn update_profile(
        &self,
        account: &Account,
        req: dto::UpdateProfileRequest,
    ) -> DomainResult<dto::ProfileResponse> {
        let mut account = account.clone();
        let now = Utc::now();

        if let Some(username) = req.username {
            let username = username.trim().to_lowercase();
            if username != account.username && self.accounts.username_exists(&username).await? {
                return Err(Fault::username_exists());
            }
            account.set_username(&username, now)?;
        }

        match req.bio {
            Patch::Keep => {}
            Patch::Clear => account.set_bio(None, now)?,
            Patch::Set(bio) => account.set_bio(Some(bio), now)?,
        }

        match req.profile_path.as_ref() {
            Patch::Keep => {}
            Patch::Clear => {
                self.media
                    .delete_if_present(account.profile_path.as_deref())
                    .await?;
            }
            Patch::Set(new) => {
                self.media
                    .replace_if_changed(new, account.profile_path.as_deref())
                    .await?;
            }
        }
        req.profile_path.apply(&mut account.profile_path);

        self.accounts.save(&account).await?;
        self.my_profile(&account).await
    }

    /// Account self-deletion, gated on a fresh verification token.
    pub async fn delete_my_account(
        &self,
        account: &Account,
        req: dto::DeleteAccountRequest,
    ) -> DomainResult<()> {
        let account = self
            .resolve_token(&req.token, TokenKind::Verification, Some(&account.email))
            .await?;
        self.cascade.delete_account(account).await
    }

    // ── podcasts (owner surface) ────────────────────────────────────────

    async fn podcast_by_id(&self, id: PodcastId) -> DomainResult<Podcast> {
        self.podcasts
            .get(id)
            .await?
            .ok_or_else(Fault::podcast_not_found)
    }

    async fn podcast_for_owner(
        &self,
        caller: &Account,
        id: PodcastId,
    ) -> DomainResult<Podcast> {
        let podcast = self.podcast_by_id(id).await?;
        assert_owner(podcast.owner, caller.id)?;
        Ok(podcast)
    }

    pub async fn my_podcasts(
        &self,
        account: &Account,
        params: dto::PodcastListParams,
    ) -> DomainResult<dto::PageResponse<dto::PodcastSummary>> {
        let (flagged, status) = podcast_status_filter(params.status);
        let filter = PodcastFilter {
            owner: Some(account.id),
            flagged,
            status,
            keyword: params.q,
            ..Default::default()
        };
        let page = self
            .podcasts
            .search(&filter, page_request(params.page, params.size))
            .await?;

        let mut items = Vec::with_capacity(page.items.len());
        for podcast in &page.items {
            items.push(self.podcast_summary(podcast).await?);
        }
        Ok(dto::PageResponse {
            items,
            page: page.page,
            size: page.size,
            total: page.total,
        })
    }

    pub async fn create_podcast(
        &self,
        account: &Account,
        req: dto::CreatePodcastRequest,
    ) -> DomainResult<dto::PodcastDetail> {
        let podcast = Podcast::create(
            PodcastId::new(),
            NewPodcast {
                owner: account.id,
                title: req.title,
                description: req.description,
                category: req.category,
            },
            Utc::now(),
        )?;
        self.podcasts.save(&podcast).await?;
        self.podcast_detail(&podcast).await
    }

    pub async fn my_podcast_detail(
        &self,
        account: &Account,
        id: PodcastId,
    ) -> DomainResult<dto::PodcastDetail> {
        let podcast = self.podcast_for_owner(account, id).await?;
        self.podcast_detail(&podcast).await
    }

    pub async fn update_podcast(
        &self,
        account: &Account,
        id: PodcastId,
        req: dto::UpdatePodcastRequest,
    ) -> DomainResult<dto::PodcastDetail> {
        let mut podcast = self.podcast_for_owner(account, id).await?;

        match req.cover_path.as_ref() {
            Patch::Keep => {}
            Patch::Clear => {
                self.media
                    .delete_if_present(podcast.cover_path.as_deref())
                    .await?;
            }
            Patch::Set(new) => {
                self.media
                    .replace_if_changed(new, podcast.cover_path.as_deref())
                    .await?;
            }
        }
        match req.banner_path.as_ref() {
            Patch::Keep => {}
            Patch::Clear => {
                self.media
                    .delete_if_present(podcast.banner_path.as_deref())
                    .await?;
            }
            Patch::Set(new) => {
                self.media
                    .replace_if_changed(new, podcast.banner_path.as_deref())
                    .await?;
            }
        }

        podcast.apply(
            podharbor_catalog::PodcastUpdate {
                title: req.title,
                description: req.description,
                category: req.category,
                cover_path: req.cover_path,
                banner_path: req.banner_path,
            },
            Utc::now(),
        )?;

        self.podcasts.save(&podcast).await?;
        self.podcast_detail(&podcast).await
    }

    pub async fn publish_podcast(
        &self,
        account: &Account,
        id: PodcastId,
    ) -> DomainResult<dto::PodcastDetail> {
        let mut podcast = self.podcast_for_owner(account, id).await?;

        let cover = podcast.ensure_publishable()?.to_string();
        self.media.ensure_uploaded(&cover).await?;

        podcast.mark_published(Utc::now());
        self.podcasts.save(&podcast).await?;

        tracing::info!(podcast_id = %podcast.id, "podcast published");
        self.podcast_detail(&podcast).await
    }

    pub async fn archive_podcast(
        &self,
        account: &Account,
        id: PodcastId,
    ) -> DomainResult<dto::PodcastDetail> {
        let mut podcast = self.podcast_for_owner(account, id).await?;
        podcast.archive(Utc::now());
        self.podcasts.save(&podcast).await?;
        self.podcast_detail(&podcast).await
    }

    pub async fn delete_podcast(&self, account: &Account, id: PodcastId) -> DomainResult<()> {
        let podcast = self.podcast_for_owner(account, id).await?;
        self.cascade.delete_podcast(podcast).await
    }

    pub async fn podcast_image_upload_url(
        &self,
        account: &Account,
        id: PodcastId,
        req: dto::PodcastImageUploadRequest,
    ) -> DomainResult<dto::UploadUrlResponse> {
        let podcast = self.podcast_for_owner(account, id).await?;
        let blob_path = match req.slot {
            dto::ImageSlot::Cover => Media::podcast_cover_path(podcast.id, req.extension),
            dto::ImageSlot::Banner => Media::podcast_banner_path(podcast.id, req.extension),
        };
        Ok(dto::UploadUrlResponse {
            upload_url: self.media.upload_url(&blob_path).await?,
            blob_path,
        })
    }

    // ── episodes (owner surface) ────────────────────────────────────────

    pub async fn my_episodes(
        &self,
        account: &Account,
        id: PodcastId,
    ) -> DomainResult<Vec<dto::EpisodeDetail>> {
        let podcast = self.podcast_for_owner(account, id).await?;
        let mut items = Vec::with_capacity(podcast.episodes.len());
        for (index, episode) in podcast.episodes.iter().enumerate() {
            items.push(self.episode_detail(episode, index).await?);
        }
        Ok(items)
    }

    pub async fn create_episode(
        &self,
        account: &Account,
        id: PodcastId,
        req: dto::CreateEpisodeRequest,
    ) -> DomainResult<dto::EpisodeDetail> {
        let mut podcast = self.podcast_for_owner(account, id).await?;
        let now = Utc::now();
        let episode = Episode::create(
            NewEpisode {
                title: req.title,
                description: req.description,
                duration_secs: req.duration_secs,
            },
            now,
        )?;
        let index = podcast.add_episode(episode, now);
        self.podcasts.save(&podcast).await?;
        self.episode_detail(&podcast.episodes[index], index).await
    }

    pub async fn my_episode_detail(
        &self,
        account: &Account,
        id: PodcastId,
        index: usize,
    ) -> DomainResult<dto::EpisodeDetail> {
        let podcast = self.podcast_for_owner(account, id).await?;
        let episode = podcast.episode(index)?;
        self.episode_detail(episode, index).await
    }

    pub async fn update_episode(
        &self,
        account: &Account,
        id: PodcastId,
        index: usize,
        req: dto::UpdateEpisodeRequest,
    ) -> DomainResult<dto::EpisodeDetail> {
        let mut podcast = self.podcast_for_owner(account, id).await?;
        let episode = podcast.episode(index)?;

        match req.image_path.as_ref() {
            Patch::Keep => {}
            Patch::Clear => {
                self.media
                    .delete_if_present(episode.image_path.as_deref())
                    .await?;
            }
            Patch::Set(new) => {
                self.media
                    .replace_if_changed(new, episode.image_path.as_deref())
                    .await?;
            }
        }
        match req.audio_path.as_ref() {
            Patch::Keep => {}
            Patch::Clear => {
                self.media
                    .delete_if_present(episode.audio_path.as_deref())
                    .await?;
            }
            Patch::Set(new) => {
                self.media
                    .replace_if_changed(new, episode.audio_path.as_deref())
                    .await?;
            }
        }

        let now = Utc::now();
        podcast.episode_mut(index)?.apply(
            podharbor_catalog::EpisodePatch {
                title: req.title,
                description: req.description,
                duration_secs: req.duration_secs,
                image_path: req.image_path,
                audio_path: req.audio_path,
            },
            now,
        )?;

        self.podcasts.save(&podcast).await?;
        self.episode_detail(&podcast.episodes[index], index).await
    }

    pub async fn publish_episode(
        &self,
        account: &Account,
        id: PodcastId,
        index: usize,
    ) -> DomainResult<dto::EpisodeDetail> {
        let mut podcast = self.podcast_for_owner(account, id).await?;

        let audio = podcast.episode(index)?.ensure_publishable()?.to_string();
        self.media.ensure_uploaded(&audio).await?;

        podcast.episode_mut(index)?.mark_published(Utc::now());
        self.podcasts.save(&podcast).await?;
        self.episode_detail(&podcast.episodes[index], index).await
    }

    pub async fn archive_episode(
        &self,
        account: &Account,
        id: PodcastId,
        index: usize,
    ) -> DomainResult<dto::EpisodeDetail> {
        let mut podcast = self.podcast_for_owner(account, id).await?;
        podcast.episode_mut(index)?.archive(Utc::now());
        self.podcasts.save(&podcast).await?;
        self.episode_detail(&podcast.episodes[index], index).await
    }

    pub async fn delete_episode(
        &self,
        account: &Account,
        id: PodcastId,
        index: usize,
    ) -> DomainResult<()> {
        let mut podcast = self.podcast_for_owner(account, id).await?;
        self.cascade
            .delete_episode(&mut podcast, index, Utc::now())
            .await
    }

    pub async fn episode_image_upload_url(
        &self,
        account: &Account,
        id: PodcastId,
        index: usize,
        req: dto::ImageUploadRequest,
    ) -> DomainResult<dto::UploadUrlResponse> {
        let podcast = self.podcast_for_owner(account, id).await?;
        podcast.episode(index)?;
        let blob_path = Media::episode_image_path(podcast.id, index, req.extension);
        Ok(dto::UploadUrlResponse {
            upload_url: self.media.upload_url(&blob_path).await?,
            blob_path,
        })
    }

    pub async fn episode_audio_upload_url(
        &self,
        account: &Account,
        id: PodcastId,
        index: usize,
        req: dto::AudioUploadRequest,
    ) -> DomainResult<dto::UploadUrlResponse> {
        let podcast = self.podcast_for_owner(account, id).await?;
        podcast.episode(index)?;
        let blob_path = Media::episode_audio_path(podcast.id, index, req.extension);
        Ok(dto::UploadUrlResponse {
            upload_url: self.media.upload_url(&blob_path).await?,
            blob_path,
        })
    }

    // ── admin surface ───────────────────────────────────────────────────

    pub async fn admin_list_accounts(
        &self,
        caller: &Account,
        params: dto::AccountListParams,
    ) -> DomainResult<dto::PageResponse<dto::AdminAccountSummary>> {
        require_role(&caller.roles, Role::Admin)?;

        let (locked, email_verified) = account_status_filter(params.status);
        let filter = AccountFilter {
            role: params.role,
            locked,
            email_verified,
            keyword: params.q,
        };
        let page = self
            .accounts
            .search(&filter, page_request(params.page, params.size))
            .await?;

        let mut items = Vec::with_capacity(page.items.len());
        for account in &page.items {
            items.push(self.admin_account_summary(account).await?);
        }
        Ok(dto::PageResponse {
            items,
            page: page.page,
            size: page.size,
            total: page.total,
        })
    }

    pub async fn admin_account_detail(
        &self,
        caller: &Account,
        id: podharbor_core::AccountId,
    ) -> DomainResult<dto::AdminAccountDetail> {
        require_role(&caller.roles, Role::Admin)?;
        let account = self
            .accounts
            .get(id)
            .await?
            .ok_or_else(Fault::account_not_found)?;

        let owned = self.podcasts.list_by_owner(account.id).await?;
        let mut podcasts = Vec::with_capacity(owned.len());
        for podcast in &owned {
            podcasts.push(self.podcast_summary(podcast).await?);
        }

        Ok(dto::AdminAccountDetail {
            summary: self.admin_account_summary(&account).await?,
            podcasts,
        })
    }

    pub async fn admin_lock_account(
        &self,
        caller: &Account,
        id: podharbor_core::AccountId,
    ) -> DomainResult<()> {
        require_role(&caller.roles, Role::Admin)?;
        let mut account = self
            .accounts
            .get(id)
            .await?
            .ok_or_else(Fault::account_not_found)?;
        account.lock(Utc::now())?;
        self.accounts.save(&account).await?;
        tracing::info!(account_id = %account.id, "account locked");
        Ok(())
    }

    pub async fn admin_unlock_account(
        &self,
        caller: &Account,
        id: podharbor_core::AccountId,
    ) -> DomainResult<()> {
        require_role(&caller.roles, Role::Admin)?;
        let mut account = self
            .accounts
            .get(id)
            .await?
            .ok_or_else(Fault::account_not_found)?;
        account.unlock(Utc::now())?;
        self.accounts.save(&account).await?;
        tracing::info!(account_id = %account.id, "account unlocked");
        Ok(())
    }

    pub async fn admin_delete_account(
        &self,
        caller: &Account,
        id: podharbor_core::AccountId,
    ) -> DomainResult<()> {
        require_role(&caller.roles, Role::Admin)?;
        let account = self
            .accounts
            .get(id)
            .await?
            .ok_or_else(Fault::account_not_found)?;
        self.cascade.delete_account(account).await
    }

    pub async fn admin_list_podcasts(
        &self,
        caller: &Account,
        params: dto::PodcastListParams,
    ) -> DomainResult<dto::PageResponse<dto::PodcastSummary>> {
        require_role(&caller.roles, Role::Admin)?;

        let (flagged, status) = podcast_status_filter(params.status);
        let filter = PodcastFilter {
            flagged,
            status,
            keyword: params.q,
            ..Default::default()
        };
        let page = self
            .podcasts
            .search(&filter, page_request(params.page, params.size))
            .await?;

        let mut items = Vec::with_capacity(page.items.len());
        for podcast in &page.items {
            items.push(self.podcast_summary(podcast).await?);
        }
        Ok(dto::PageResponse {
            items,
            page: page.page,
            size: page.size,
            total: page.total,
        })
    }

    pub async fn admin_podcast_detail(
        &self,
        caller: &Account,
        id: PodcastId,
    ) -> DomainResult<dto::PodcastDetail> {
        require_role(&caller.roles, Role::Admin)?;
        let podcast = self.podcast_by_id(id).await?;
        self.podcast_detail(&podcast).await
    }

    pub async fn admin_flag_podcast(&self, caller: &Account, id: PodcastId) -> DomainResult<()> {
        require_role(&caller.roles, Role::Admin)?;
        let mut podcast = self.podcast_by_id(id).await?;
        podcast.flag(Utc::now())?;
        self.podcasts.save(&podcast).await?;
        tracing::info!(podcast_id = %podcast.id, "podcast flagged");
        Ok(())
    }

    pub async fn admin_unflag_podcast(
        &self,
        caller: &Account,
        id: PodcastId,
    ) -> DomainResult<()> {
        require_role(&caller.roles, Role::Admin)?;
        let mut podcast = self.podcast_by_id(id).await?;
        podcast.unflag(Utc::now())?;
        self.podcasts.save(&podcast).await?;
        tracing::info!(podcast_id = %podcast.id, "podcast unflagged");
        Ok(())
    }

    pub async fn admin_delete_podcast(
        &self,
        caller: &Account,
        id: PodcastId,
    ) -> DomainResult<()> {
        require_role(&caller.roles, Role::Admin)?;
        let podcast = self.podcast_by_id(id).await?;
        self.cascade.delete_podcast(podcast).await
    }

    pub async fn admin_episodes(
        &self,
        caller: &Account,
        id: PodcastId,
    ) -> DomainResult<Vec<dto::EpisodeDetail>> {
        require_role(&caller.roles, Role::Admin)?;
        let podcast = self.podcast_by_id(id).await?;
        let mut items = Vec::with_capacity(podcast.episodes.len());
        for (index, episode) in podcast.episodes.iter().enumerate() {
            items.push(self.episode_detail(episode, index).await?);
        }
        Ok(items)
    }

    pub async fn admin_delete_episode(
        &self,
        caller: &Account,
        id: PodcastId,
        index: usize,
    ) -> DomainResult<()> {
        require_role(&caller.roles, Role::Admin)?;
        let mut podcast = self.podcast_by_id(id).await?;
        self.cascade
            .delete_episode(&mut podcast, index, Utc::now())
            .await
    }

    // ── public discovery ────────────────────────────────────────────────

    pub async fn discover_podcasts(
        &self,
        params: dto::DiscoveryParams,
    ) -> DomainResult<dto::PageResponse<dto::PublicPodcast>> {
        let filter = PodcastFilter {
            category: params.category,
            status: Some(PodcastStatus::Published),
            episode_status: Some(EpisodeStatus::Published),
            keyword: params.q,
            ..Default::default()
        };
        let page = self
            .podcasts
            .search(&filter, page_request(params.page, params.size))
            .await?;

        let mut items = Vec::with_capacity(page.items.len());
        for podcast in &page.items {
            items.push(self.public_podcast(podcast).await?);
        }
        Ok(dto::PageResponse {
            items,
            page: page.page,
            size: page.size,
            total: page.total,
        })
    }

    async fn published_podcast(&self, id: PodcastId) -> DomainResult<Podcast> {
        let podcast = self.podcast_by_id(id).await?;
        if podcast.status != PodcastStatus::Published {
            return Err(Fault::podcast_not_found());
        }
        Ok(podcast)
    }

    pub async fn public_podcast_detail(&self, id: PodcastId) -> DomainResult<dto::PublicPodcast> {
        let podcast = self.published_podcast(id).await?;
        self.public_podcast(&podcast).await
    }

    /// Published episodes only; the public episode id is the index within
    /// the published subset, not the owner-visible index.
    pub async fn public_episodes(&self, id: PodcastId) -> DomainResult<Vec<dto::PublicEpisode>> {
        let podcast = self.published_podcast(id).await?;
        let published: Vec<&Episode> = podcast
            .episodes
            .iter()
            .filter(|e| e.status == EpisodeStatus::Published)
            .collect();

        let mut items = Vec::with_capacity(published.len());
        for (index, episode) in published.iter().enumerate() {
            items.push(self.public_episode(episode, index).await?);
        }
        Ok(items)
    }

    pub async fn public_episode_detail(
        &self,
        id: PodcastId,
        index: usize,
    ) -> DomainResult<dto::PublicEpisode> {
        let podcast = self.published_podcast(id).await?;
        let published: Vec<&Episode> = podcast
            .episodes
            .iter()
            .filter(|e| e.status == EpisodeStatus::Published)
            .collect();
        let episode = published.get(index).ok_or_else(Fault::episode_not_found)?;
        self.public_episode(episode, index).await
    }

    pub async fn creator_profile(
        &self,
        id: podharbor_core::AccountId,
    ) -> DomainResult<dto::CreatorResponse> {
        let account = self
            .accounts
            .get(id)
            .await?
            .ok_or_else(Fault::account_not_found)?;
        let published_podcast_count = self
            .podcasts
            .count_by_owner(account.id, Some(PodcastStatus::Published))
            .await?;
        Ok(dto::CreatorResponse {
            creator_id: account.id,
            username: account.username,
            bio: account.bio,
            profile_url: self.media.download_url(account.profile_path.as_deref()).await?,
            joined_at: account.created_at,
            published_podcast_count,
        })
    }

    // ── mappers ─────────────────────────────────────────────────────────

    async fn podcast_summary(&self, podcast: &Podcast) -> DomainResult<dto::PodcastSummary> {
        Ok(dto::PodcastSummary {
            podcast_id: podcast.id,
            title: podcast.title.clone(),
            category: podcast.category.clone(),
            status: podcast.status,
            flagged: podcast.flagged,
            cover_url: self.media.download_url(podcast.cover_path.as_deref()).await?,
            episode_count: podcast.episodes.len(),
            published_at: podcast.published_at,
            last_episode_at: podcast.last_published_episode_at(),
        })
    }

    async fn podcast_detail(&self, podcast: &Podcast) -> DomainResult<dto::PodcastDetail> {
        Ok(dto::PodcastDetail {
            podcast_id: podcast.id,
            title: podcast.title.clone(),
            description: podcast.description.clone(),
            category: podcast.category.clone(),
            status: podcast.status,
            flagged: podcast.flagged,
            cover_url: self.media.download_url(podcast.cover_path.as_deref()).await?,
            banner_url: self.media.download_url(podcast.banner_path.as_deref()).await?,
            episode_count: podcast.episodes.len(),
            created_at: podcast.created_at,
            updated_at: podcast.updated_at,
            published_at: podcast.published_at,
            last_episode_at: podcast.last_published_episode_at(),
        })
    }

    async fn episode_detail(
        &self,
        episode: &Episode,
        index: usize,
    ) -> DomainResult<dto::EpisodeDetail> {
        Ok(dto::EpisodeDetail {
            episode_id: index,
            title: episode.title.clone(),
            description: episode.description.clone(),
            image_url: self.media.download_url(episode.image_path.as_deref()).await?,
            audio_url: self.media.download_url(episode.audio_path.as_deref()).await?,
            duration_secs: episode.duration_secs,
            status: episode.status,
            created_at: episode.created_at,
            updated_at: episode.updated_at,
            published_at: episode.published_at,
        })
    }

    async fn public_episode(
        &self,
        episode: &Episode,
        index: usize,
    ) -> DomainResult<dto::PublicEpisode> {
        Ok(dto::PublicEpisode {
            episode_id: index,
            title: episode.title.clone(),
            description: episode.description.clone(),
            image_url: self.media.download_url(episode.image_path.as_deref()).await?,
            audio_url: self.media.download_url(episode.audio_path.as_deref()).await?,
            duration_secs: episode.duration_secs,
            published_at: episode.published_at,
        })
    }

    async fn public_podcast(&self, podcast: &Podcast) -> DomainResult<dto::PublicPodcast> {
        let creator = self
            .accounts
            .get(podcast.owner)
            .await?
            .ok_or_else(Fault::account_not_found)?;
        Ok(dto::PublicPodcast {
            podcast_id: podcast.id,
            title: podcast.title.clone(),
            description: podcast.description.clone(),
            creator_id: creator.id,
            creator_name: creator.username,
            category: podcast.category.clone(),
            cover_url: self.media.download_url(podcast.cover_path.as_deref()).await?,
            banner_url: self.media.download_url(podcast.banner_path.as_deref()).await?,
            episode_count: podcast.published_episode_count(),
            published_at: podcast.published_at,
            last_episode_at: podcast.last_published_episode_at(),
        })
    }

    async fn admin_account_summary(
        &self,
        account: &Account,
    ) -> DomainResult<dto::AdminAccountSummary> {
        let podcast_count = self.podcasts.count_by_owner(account.id, None).await?;
        Ok(dto::AdminAccountSummary {
            account_id: account.id,
            username: account.username.clone(),
            email: account.email.clone(),
            profile_url: self.media.download_url(account.profile_path.as_deref()).await?,
            roles: account.roles.iter().copied().collect(),
            locked: account.locked,
            email_verified: account.email_verified,
            podcast_count,
            joined_at: account.created_at,
            last_login_at: account.last_login_at,
        })
    }
}

impl From<dto::VerificationPurpose> for NoticeKind {
    fn from(purpose: dto::VerificationPurpose) -> Self {
        match purpose {
            dto::VerificationPurpose::Email => NoticeKind::EmailVerification,
            dto::VerificationPurpose::PasswordReset => NoticeKind::PasswordReset,
            dto::VerificationPurpose::AccountDeletion => NoticeKind::AccountDeletion,
        }
    }
}

fn page_request(page: usize, size: Option<usize>) -> PageRequest {
    match size {
        Some(size) => PageRequest::new(page, size),
        None => PageRequest {
            page,
            ..Default::default()
        },
    }
}

/// `FLAGGED` selects on the moderation bit; real statuses select on status.
fn podcast_status_filter(
    param: Option<dto::PodcastStatusParam>,
) -> (Option<bool>, Option<PodcastStatus>) {
    match param {
        None => (None, None),
        Some(dto::PodcastStatusParam::Flagged) => (Some(true), None),
        Some(dto::PodcastStatusParam::Draft) => (None, Some(PodcastStatus::Draft)),
        Some(dto::PodcastStatusParam::Published) => (None, Some(PodcastStatus::Published)),
        Some(dto::PodcastStatusParam::Archived) => (None, Some(PodcastStatus::Archived)),
    }
}

fn account_status_filter(
    param: Option<dto::AccountStatusParam>,
) -> (Option<bool>, Option<bool>) {
    match param {
        None => (None, None),
        Some(dto::AccountStatusParam::Active) => (Some(false), Some(true)),
        Some(dto::AccountStatusParam::Locked) => (Some(true), None),
        Some(dto::AccountStatusParam::PendingVerification) => (None, Some(false)),
    }
}
