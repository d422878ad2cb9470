use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use serde_json::json;

use podharbor_api::app::{build_app, AppServices};
use podharbor_api::config::AppConfig;
use podharbor_infra::{
    ArgonPasswordHasher, InMemoryBlobStore, InMemoryStore, NoticeKind, Notifier, NotifyError,
};

const PASSWORD: &str = "Str0ng!Pass";
const ADMIN_EMAIL: &str = "admin@podharbor.dev";

/// Captures dispatched notifications so tests can fish out the verification
/// token a real deployment would deliver by email.
#[derive(Default)]
struct RecordingNotifier {
    sent: Mutex<Vec<(String, String, NoticeKind)>>,
}

impl RecordingNotifier {
    fn latest_for(&self, email: &str) -> Option<String> {
        self.sent
            .lock()
            .unwrap()
            .iter()
            .rev()
            .find(|(to, _, _)| to == email)
            .map(|(_, token, _)| token.clone())
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn send(&self, email: &str, token: &str, kind: NoticeKind) -> Result<(), NotifyError> {
        self.sent
            .lock()
            .unwrap()
            .push((email.to_string(), token.to_string(), kind));
        Ok(())
    }
}

struct TestServer {
    base_url: String,
    blobs: Arc<InMemoryBlobStore>,
    notifier: Arc<RecordingNotifier>,
    handle: tokio::task::JoinHandle<()>,
}

impl TestServer {
    async fn spawn() -> Self {
        // Same router as prod, but with a recording notifier, a shared blob
        // store handle, and an ephemeral port.
        let config = AppConfig::for_tests("test-secret", ADMIN_EMAIL);
        let store = Arc::new(InMemoryStore::new());
        let blobs = Arc::new(InMemoryBlobStore::new());
        let notifier = Arc::new(RecordingNotifier::default());

        let services = Arc::new(AppServices::new(
            &config,
            store.clone(),
            store,
            blobs.clone(),
            Arc::new(ArgonPasswordHasher),
            notifier.clone(),
        ));
        let app = build_app(services);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind ephemeral port");
        let addr = listener.local_addr().unwrap();
        let base_url = format!("http://{}", addr);

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            base_url,
            blobs,
            notifier,
            handle,
        }
    }

    /// Notification dispatch is fire-and-forget on a spawned task; poll
    /// briefly until the token lands.
    async fn verification_token_for(&self, email: &str) -> String {
        for _ in 0..100 {
            if let Some(token) = self.notifier.latest_for(email) {
                return token;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        panic!("no verification token dispatched for {email} within timeout");
    }

    /// Simulate the client PUT against a signed upload URL.
    fn upload(&self, blob_path: &str) {
        self.blobs.put(blob_path);
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

async fn register(srv: &TestServer, client: &reqwest::Client, email: &str, username: &str) {
    let res = client
        .post(format!("{}/auth/register", srv.base_url))
        .json(&json!({ "email": email, "username": username, "password": PASSWORD }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
}

async fn verify_email(srv: &TestServer, client: &reqwest::Client, email: &str) {
    let token = srv.verification_token_for(email).await;
    let res = client
        .post(format!("{}/auth/verify-email", srv.base_url))
        .json(&json!({ "email": email, "token": token }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NO_CONTENT);
}

async fn login(srv: &TestServer, client: &reqwest::Client, email: &str) -> serde_json::Value {
    let res = client
        .post(format!("{}/auth/login", srv.base_url))
        .json(&json!({ "email": email, "password": PASSWORD }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    res.json().await.unwrap()
}

/// Register, verify, and log in; returns the access token.
async fn onboard(srv: &TestServer, client: &reqwest::Client, email: &str, username: &str) -> String {
    register(srv, client, email, username).await;
    verify_email(srv, client, email).await;
    login(srv, client, email).await["access_token"]
        .as_str()
        .unwrap()
        .to_string()
}

/// Create a draft podcast with an uploaded cover; returns its id.
async fn draft_podcast(srv: &TestServer, client: &reqwest::Client, token: &str) -> String {
    let res = client
        .post(format!("{}/me/podcasts", srv.base_url))
        .bearer_auth(token)
        .json(&json!({
            "title": "Harbor Tales",
            "description": "Stories from the harbor after dark.",
            "category": "Fiction",
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    let created: serde_json::Value = res.json().await.unwrap();
    let id = created["podcast_id"].as_str().unwrap().to_string();

    let res = client
        .post(format!("{}/me/podcasts/{}/image-upload-url", srv.base_url, id))
        .bearer_auth(token)
        .json(&json!({ "slot": "cover", "extension": "png" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let upload: serde_json::Value = res.json().await.unwrap();
    let blob_path = upload["blob_path"].as_str().unwrap();
    srv.upload(blob_path);

    let res = client
        .patch(format!("{}/me/podcasts/{}", srv.base_url, id))
        .bearer_auth(token)
        .json(&json!({ "cover_path": blob_path }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    id
}

/// Create an episode, upload its audio, and publish it.
async fn published_episode(
    srv: &TestServer,
    client: &reqwest::Client,
    token: &str,
    podcast_id: &str,
    title: &str,
) -> usize {
    let res = client
        .post(format!("{}/me/podcasts/{}/episodes", srv.base_url, podcast_id))
        .bearer_auth(token)
        .json(&json!({ "title": title, "duration_secs": 300 }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    let created: serde_json::Value = res.json().await.unwrap();
    let index = created["episode_id"].as_u64().unwrap() as usize;

    let res = client
        .post(format!(
            "{}/me/podcasts/{}/episodes/{}/audio-upload-url",
            srv.base_url, podcast_id, index
        ))
        .bearer_auth(token)
        .json(&json!({ "extension": "mp3" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let upload: serde_json::Value = res.json().await.unwrap();
    let blob_path = upload["blob_path"].as_str().unwrap();
    srv.upload(blob_path);

    let res = client
        .patch(format!(
            "{}/me/podcasts/{}/episodes/{}",
            srv.base_url, podcast_id, index
        ))
        .bearer_auth(token)
        .json(&json!({ "audio_path": blob_path }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let res = client
        .post(format!(
            "{}/me/podcasts/{}/episodes/{}/publish",
            srv.base_url, podcast_id, index
        ))
        .bearer_auth(token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    index
}

async fn error_code(res: reqwest::Response) -> String {
    let body: serde_json::Value = res.json().await.unwrap();
    body["code"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn auth_is_required_on_protected_surfaces() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let res = client
        .get(format!("{}/me/profile", srv.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    let res = client
        .get(format!("{}/me/profile", srv.base_url))
        .bearer_auth("not-a-token")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(error_code(res).await, "TOKEN_INVALID");
}

#[tokio::test]
async fn registration_to_published_podcast() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    register(&srv, &client, "a@x.com", "alice").await;

    // Unverified accounts cannot log in.
    let res = client
        .post(format!("{}/auth/login", srv.base_url))
        .json(&json!({ "email": "a@x.com", "password": PASSWORD }))
        .send()
        .await
        .unwrap();
    assert_eq!(error_code(res).await, "ACCOUNT_NEED_VERIFICATION");

    // A case-variant duplicate is still a duplicate.
    let res = client
        .post(format!("{}/auth/register", srv.base_url))
        .json(&json!({ "email": "A@X.com", "username": "alice2", "password": PASSWORD }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CONFLICT);
    assert_eq!(error_code(res).await, "EMAIL_ALREADY_EXISTS");

    verify_email(&srv, &client, "a@x.com").await;
    let session = login(&srv, &client, "a@x.com").await;
    let token = session["access_token"].as_str().unwrap();

    // A bare podcast has no cover, so publishing stops there.
    let res = client
        .post(format!("{}/me/podcasts", srv.base_url))
        .bearer_auth(token)
        .json(&json!({
            "title": "Harbor Tales",
            "description": "Stories from the harbor after dark.",
            "category": "Fiction",
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    let podcast: serde_json::Value = res.json().await.unwrap();
    let id = podcast["podcast_id"].as_str().unwrap().to_string();

    let res = client
        .post(format!("{}/me/podcasts/{}/publish", srv.base_url, id))
        .bearer_auth(token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::FORBIDDEN);
    assert_eq!(error_code(res).await, "PODCAST_MISSING_ASSETS");

    // Upload a cover; now the missing piece is a published episode.
    let res = client
        .post(format!("{}/me/podcasts/{}/image-upload-url", srv.base_url, id))
        .bearer_auth(token)
        .json(&json!({ "slot": "cover", "extension": "png" }))
        .send()
        .await
        .unwrap();
    let upload: serde_json::Value = res.json().await.unwrap();
    let cover_path = upload["blob_path"].as_str().unwrap();
    srv.upload(cover_path);

    let res = client
        .patch(format!("{}/me/podcasts/{}", srv.base_url, id))
        .bearer_auth(token)
        .json(&json!({ "cover_path": cover_path }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let res = client
        .post(format!("{}/me/podcasts/{}/publish", srv.base_url, id))
        .bearer_auth(token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::FORBIDDEN);
    assert_eq!(error_code(res).await, "PODCAST_MISSING_EPISODE");

    // An episode without audio cannot publish either.
    let res = client
        .post(format!("{}/me/podcasts/{}/episodes", srv.base_url, id))
        .bearer_auth(token)
        .json(&json!({ "title": "Pilot", "duration_secs": 300 }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);

    let res = client
        .post(format!("{}/me/podcasts/{}/episodes/0/publish", srv.base_url, id))
        .bearer_auth(token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::FORBIDDEN);
    assert_eq!(error_code(res).await, "EPISODE_MISSING_AUDIO");

    let res = client
        .post(format!(
            "{}/me/podcasts/{}/episodes/0/audio-upload-url",
            srv.base_url, id
        ))
        .bearer_auth(token)
        .json(&json!({ "extension": "mp3" }))
        .send()
        .await
        .unwrap();
    let upload: serde_json::Value = res.json().await.unwrap();
    let audio_path = upload["blob_path"].as_str().unwrap();
    srv.upload(audio_path);

    let res = client
        .patch(format!("{}/me/podcasts/{}/episodes/0", srv.base_url, id))
        .bearer_auth(token)
        .json(&json!({ "audio_path": audio_path }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let res = client
        .post(format!("{}/me/podcasts/{}/episodes/0/publish", srv.base_url, id))
        .bearer_auth(token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let episode: serde_json::Value = res.json().await.unwrap();
    assert_eq!(episode["status"], "PUBLISHED");

    // With cover and one published episode, the podcast goes live.
    let res = client
        .post(format!("{}/me/podcasts/{}/publish", srv.base_url, id))
        .bearer_auth(token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let live: serde_json::Value = res.json().await.unwrap();
    assert_eq!(live["status"], "PUBLISHED");
    assert!(!live["published_at"].is_null());

    // And it shows up in public discovery, unauthenticated.
    let res = client
        .get(format!("{}/podcasts", srv.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let page: serde_json::Value = res.json().await.unwrap();
    assert_eq!(page["total"], 1);
    assert_eq!(page["items"][0]["title"], "Harbor Tales");
}

#[tokio::test]
async fn tokens_are_kind_bound_and_rotate() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    register(&srv, &client, "a@x.com", "alice").await;
    verify_email(&srv, &client, "a@x.com").await;
    let session = login(&srv, &client, "a@x.com").await;
    let access = session["access_token"].as_str().unwrap();
    let refresh = session["refresh_token"].as_str().unwrap();

    // A valid access token is not a refresh token.
    let res = client
        .post(format!("{}/auth/refresh", srv.base_url))
        .json(&json!({ "refresh_token": access }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(error_code(res).await, "TOKEN_KIND_MISMATCH");

    // Nor is a refresh token an access token.
    let res = client
        .get(format!("{}/me/profile", srv.base_url))
        .bearer_auth(refresh)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(error_code(res).await, "TOKEN_KIND_MISMATCH");

    // Rotation hands out a fresh working pair.
    let res = client
        .post(format!("{}/auth/refresh", srv.base_url))
        .json(&json!({ "refresh_token": refresh }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let pair: serde_json::Value = res.json().await.unwrap();

    let res = client
        .get(format!("{}/me/profile", srv.base_url))
        .bearer_auth(pair["access_token"].as_str().unwrap())
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let profile: serde_json::Value = res.json().await.unwrap();
    assert_eq!(profile["email"], "a@x.com");
}

#[tokio::test]
async fn sign_out_forces_reverification() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let token = onboard(&srv, &client, "a@x.com", "alice").await;

    let res = client
        .post(format!("{}/auth/sign-out", srv.base_url))
        .bearer_auth(&token)
        .json(&json!({ "email": "a@x.com", "password": PASSWORD }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NO_CONTENT);

    // The still-unexpired access token stopped working.
    let res = client
        .get(format!("{}/me/profile", srv.base_url))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(error_code(res).await, "ACCOUNT_NEED_VERIFICATION");

    // So did the password, until the address is verified again.
    let res = client
        .post(format!("{}/auth/login", srv.base_url))
        .json(&json!({ "email": "a@x.com", "password": PASSWORD }))
        .send()
        .await
        .unwrap();
    assert_eq!(error_code(res).await, "ACCOUNT_NEED_VERIFICATION");

    let res = client
        .post(format!("{}/auth/resend-verification", srv.base_url))
        .json(&json!({ "email": "a@x.com", "purpose": "email" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::ACCEPTED);

    verify_email(&srv, &client, "a@x.com").await;
    login(&srv, &client, "a@x.com").await;
}

#[tokio::test]
async fn password_reset_via_verification_token() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    register(&srv, &client, "a@x.com", "alice").await;
    verify_email(&srv, &client, "a@x.com").await;

    let res = client
        .post(format!("{}/auth/resend-verification", srv.base_url))
        .json(&json!({ "email": "a@x.com", "purpose": "password_reset" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::ACCEPTED);
    let reset_token = srv.verification_token_for("a@x.com").await;

    let res = client
        .post(format!("{}/auth/reset-password", srv.base_url))
        .json(&json!({
            "email": "a@x.com",
            "token": reset_token,
            "new_password": "N3w!Password",
            "confirm_password": "D1ff!Password",
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    assert_eq!(error_code(res).await, "PASSWORD_NOT_MATCH");

    let res = client
        .post(format!("{}/auth/reset-password", srv.base_url))
        .json(&json!({
            "email": "a@x.com",
            "token": reset_token,
            "new_password": "N3w!Password",
            "confirm_password": "N3w!Password",
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NO_CONTENT);

    let res = client
        .post(format!("{}/auth/login", srv.base_url))
        .json(&json!({ "email": "a@x.com", "password": PASSWORD }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::FORBIDDEN);
    assert_eq!(error_code(res).await, "INVALID_CREDENTIALS");

    let res = client
        .post(format!("{}/auth/login", srv.base_url))
        .json(&json!({ "email": "a@x.com", "password": "N3w!Password" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
}

#[tokio::test]
async fn ownership_is_enforced_on_the_current_user_surface() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let alice = onboard(&srv, &client, "a@x.com", "alice").await;
    let mallory = onboard(&srv, &client, "m@x.com", "mallory").await;

    let id = draft_podcast(&srv, &client, &alice).await;

    let res = client
        .patch(format!("{}/me/podcasts/{}", srv.base_url, id))
        .bearer_auth(&mallory)
        .json(&json!({ "title": "Hijacked" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::FORBIDDEN);
    assert_eq!(error_code(res).await, "PODCAST_ACCESS_FORBIDDEN");
}

#[tokio::test]
async fn episode_deletion_shifts_positional_identity() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let token = onboard(&srv, &client, "a@x.com", "alice").await;
    let id = draft_podcast(&srv, &client, &token).await;
    for title in ["Zero", "One", "Two"] {
        let res = client
            .post(format!("{}/me/podcasts/{}/episodes", srv.base_url, id))
            .bearer_auth(&token)
            .json(&json!({ "title": title, "duration_secs": 300 }))
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::CREATED);
    }

    let res = client
        .delete(format!("{}/me/podcasts/{}/episodes/0", srv.base_url, id))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NO_CONTENT);

    let res = client
        .get(format!("{}/me/podcasts/{}/episodes", srv.base_url, id))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    let episodes: serde_json::Value = res.json().await.unwrap();
    let episodes = episodes.as_array().unwrap();
    assert_eq!(episodes.len(), 2);
    // What was index 1 is now index 0.
    assert_eq!(episodes[0]["episode_id"], 0);
    assert_eq!(episodes[0]["title"], "One");
    assert_eq!(episodes[1]["title"], "Two");
}

#[tokio::test]
async fn admin_moderation_lock_cycle_and_flag_cascade() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    // The configured admin address gets the admin role at registration.
    let admin = onboard(&srv, &client, ADMIN_EMAIL, "admin").await;
    let bob = onboard(&srv, &client, "b@x.com", "bob").await;
    let bob_id = login(&srv, &client, "b@x.com").await["account_id"]
        .as_str()
        .unwrap()
        .to_string();

    // The admin surface is closed to regular users.
    let res = client
        .get(format!("{}/admin/users", srv.base_url))
        .bearer_auth(&bob)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::FORBIDDEN);
    assert_eq!(error_code(res).await, "ADMIN_REQUIRED");

    // Bob publishes a podcast with two live episodes.
    let id = draft_podcast(&srv, &client, &bob).await;
    published_episode(&srv, &client, &bob, &id, "One").await;
    published_episode(&srv, &client, &bob, &id, "Two").await;
    let res = client
        .post(format!("{}/me/podcasts/{}/publish", srv.base_url, id))
        .bearer_auth(&bob)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    // Flagging takes everything off the air.
    let res = client
        .post(format!("{}/admin/podcasts/{}/flag", srv.base_url, id))
        .bearer_auth(&admin)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NO_CONTENT);

    let res = client
        .get(format!("{}/admin/podcasts/{}", srv.base_url, id))
        .bearer_auth(&admin)
        .send()
        .await
        .unwrap();
    let podcast: serde_json::Value = res.json().await.unwrap();
    assert_eq!(podcast["status"], "ARCHIVED");
    assert_eq!(podcast["flagged"], true);
    assert!(podcast["published_at"].is_null());

    let res = client
        .get(format!("{}/admin/podcasts/{}/episodes", srv.base_url, id))
        .bearer_auth(&admin)
        .send()
        .await
        .unwrap();
    let episodes: serde_json::Value = res.json().await.unwrap();
    for episode in episodes.as_array().unwrap() {
        assert_eq!(episode["status"], "ARCHIVED");
        assert!(episode["published_at"].is_null());
    }

    // Gone from public discovery too.
    let res = client
        .get(format!("{}/podcasts/{}", srv.base_url, id))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    // Redundant moderation toggles fail loudly.
    let res = client
        .post(format!("{}/admin/podcasts/{}/flag", srv.base_url, id))
        .bearer_auth(&admin)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CONFLICT);
    assert_eq!(error_code(res).await, "PODCAST_ALREADY_FLAGGED");

    // Unflagging restores nothing; republishing is a separate action.
    let res = client
        .post(format!("{}/admin/podcasts/{}/unflag", srv.base_url, id))
        .bearer_auth(&admin)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NO_CONTENT);
    let res = client
        .get(format!("{}/admin/podcasts/{}", srv.base_url, id))
        .bearer_auth(&admin)
        .send()
        .await
        .unwrap();
    let podcast: serde_json::Value = res.json().await.unwrap();
    assert_eq!(podcast["status"], "ARCHIVED");
    assert_eq!(podcast["flagged"], false);

    // Lock cycle with conflict guards on redundant transitions.
    let res = client
        .post(format!("{}/admin/users/{}/lock", srv.base_url, bob_id))
        .bearer_auth(&admin)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NO_CONTENT);

    // Bob's outstanding access token dies with the lock.
    let res = client
        .get(format!("{}/me/profile", srv.base_url))
        .bearer_auth(&bob)
        .send()
        .await
        .unwrap();
    assert_eq!(error_code(res).await, "USER_LOCKED");

    let res = client
        .post(format!("{}/admin/users/{}/lock", srv.base_url, bob_id))
        .bearer_auth(&admin)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CONFLICT);
    assert_eq!(error_code(res).await, "USER_ALREADY_LOCKED");

    let res = client
        .post(format!("{}/admin/users/{}/unlock", srv.base_url, bob_id))
        .bearer_auth(&admin)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NO_CONTENT);

    let res = client
        .post(format!("{}/admin/users/{}/unlock", srv.base_url, bob_id))
        .bearer_auth(&admin)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CONFLICT);
    assert_eq!(error_code(res).await, "USER_NOT_LOCKED");
}
