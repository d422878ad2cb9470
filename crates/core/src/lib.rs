//! `podharbor-core` — domain foundation building blocks.
//!
//! This crate contains **pure domain** primitives (no infrastructure concerns).

pub mod fault;
pub mod id;
pub mod patch;

pub use fault::{DomainResult, Fault, FaultKind};
pub use id::{AccountId, PodcastId};
pub use patch::Patch;
