//! Outbound token notifications with bounded, fire-and-forget retry.
//!
//! Dispatch must never block the triggering request or roll back the
//! mutation that triggered it: the send loop runs on a spawned task, retries
//! transient failures a bounded number of times, and logs loss when it gives
//! up.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;
use tracing::{error, info, warn};

/// Why a token is being sent; the transport picks subject and body from it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    EmailVerification,
    PasswordReset,
    AccountDeletion,
}

impl core::fmt::Display for NoticeKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let name = match self {
            NoticeKind::EmailVerification => "email_verification",
            NoticeKind::PasswordReset => "password_reset",
            NoticeKind::AccountDeletion => "account_deletion",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("transport failure: {0}")]
    Transport(String),
}

/// The email transport contract. Implementations deliver a token-bearing
/// message; everything about templates and SMTP/API transports lives behind
/// this seam.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send(&self, email: &str, token: &str, kind: NoticeKind) -> Result<(), NotifyError>;
}

/// Bounded retry with a fixed delay between attempts.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    pub attempts: u32,
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            attempts: 4,
            delay: Duration::from_secs(3),
        }
    }
}

/// Fire-and-forget dispatch. Returns the task handle so tests can await
/// completion; production callers drop it.
pub fn dispatch_with_retry(
    notifier: Arc<dyn Notifier>,
    policy: RetryPolicy,
    email: String,
    token: String,
    kind: NoticeKind,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        for attempt in 1..=policy.attempts {
            match notifier.send(&email, &token, kind).await {
                Ok(()) => {
                    info!(%email, %kind, attempt, "notification dispatched");
                    return;
                }
                Err(e) => {
                    warn!(%email, %kind, attempt, error = %e, "notification dispatch failed");
                    if attempt < policy.attempts {
                        tokio::time::sleep(policy.delay).await;
                    }
                }
            }
        }
        error!(
            %email,
            %kind,
            attempts = policy.attempts,
            "giving up on notification dispatch"
        );
    })
}

/// Development transport: the token goes to the log instead of a mailbox.
#[derive(Debug, Default)]
pub struct TracingNotifier;

#[async_trait]
impl Notifier for TracingNotifier {
    async fn send(&self, email: &str, token: &str, kind: NoticeKind) -> Result<(), NotifyError> {
        info!(%email, %kind, %token, "notification (dev transport)");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    /// Fails the first `failures` sends, then succeeds.
    struct FlakyNotifier {
        failures: u32,
        calls: AtomicU32,
        delivered: AtomicU32,
    }

    impl FlakyNotifier {
        fn new(failures: u32) -> Self {
            Self {
                failures,
                calls: AtomicU32::new(0),
                delivered: AtomicU32::new(0),
            }
        }
    }

    #[async_trait]
    impl Notifier for FlakyNotifier {
        async fn send(&self, _: &str, _: &str, _: NoticeKind) -> Result<(), NotifyError> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst);
            if call < self.failures {
                Err(NotifyError::Transport("connection reset".to_string()))
            } else {
                self.delivered.fetch_add(1, Ordering::SeqCst);
                Ok(())
            }
        }
    }

    fn fast_policy() -> RetryPolicy {
        RetryPolicy {
            attempts: 4,
            delay: Duration::from_millis(5),
        }
    }

    #[tokio::test]
    async fn transient_failures_are_retried_until_delivery() {
        let notifier = Arc::new(FlakyNotifier::new(2));
        dispatch_with_retry(
            notifier.clone(),
            fast_policy(),
            "a@x.com".to_string(),
            "token".to_string(),
            NoticeKind::EmailVerification,
        )
        .await
        .unwrap();

        assert_eq!(notifier.calls.load(Ordering::SeqCst), 3);
        assert_eq!(notifier.delivered.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn dispatch_gives_up_after_bounded_attempts() {
        let notifier = Arc::new(FlakyNotifier::new(u32::MAX));
        dispatch_with_retry(
            notifier.clone(),
            fast_policy(),
            "a@x.com".to_string(),
            "token".to_string(),
            NoticeKind::PasswordReset,
        )
        .await
        .unwrap();

        assert_eq!(notifier.calls.load(Ordering::SeqCst), 4);
        assert_eq!(notifier.delivered.load(Ordering::SeqCst), 0);
    }
}
