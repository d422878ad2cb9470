//! `podharbor-catalog` — Podcast and Episode entities and their status
//! machines.
//!
//! Pure domain: publish/archive/flag transitions validate their guards and
//! mutate in place; blob existence checks and persistence are the caller's
//! concern.

pub mod episode;
pub mod podcast;

pub use episode::{Episode, EpisodePatch, EpisodeStatus, NewEpisode};
pub use podcast::{NewPodcast, Podcast, PodcastStatus, PodcastUpdate};
