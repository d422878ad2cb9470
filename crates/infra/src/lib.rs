//! `podharbor-infra` — collaborator contracts and their implementations.
//!
//! Everything the domain treats as a black box lives here: the document
//! store, the blob store and the media helper on top of it, password
//! hashing, outbound notifications, and the cascading deletion saga that
//! spans all of them.

pub mod blob;
pub mod credentials;
pub mod deletion;
pub mod media;
pub mod notifier;
pub mod store;

pub use blob::{BlobError, BlobStore, InMemoryBlobStore};
pub use credentials::{ArgonPasswordHasher, PasswordHasher};
pub use deletion::DeletionCascade;
pub use media::{AudioExt, ImageExt, Media};
pub use notifier::{
    dispatch_with_retry, NoticeKind, Notifier, NotifyError, RetryPolicy, TracingNotifier,
};
pub use store::{
    AccountFilter, AccountStore, InMemoryStore, Page, PageRequest, PodcastFilter, PodcastStore,
    StoreError,
};
