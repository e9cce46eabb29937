//! tubize video library previewer
//!
//! Builds browsing artifacts for a directory tree of videos: a thumbnail,
//! an animated webp preview picked by an adaptive scene-detection search,
//! a timeline scrub sprite with WebVTT captions, and a JSON catalog grouped
//! by directory with per-group mosaics. Raw captures can be converted and
//! joined on the way in.

pub mod adapters;
pub mod app;
pub mod cli;
pub mod config_initialization;
pub mod domain;
pub mod engine;
pub mod error;
pub mod output;
pub mod planner;
pub mod ports;
pub mod probe;
pub mod utils;

#[cfg(test)]
pub(crate) mod test_support;

// Re-export commonly used types
pub use domain::errors::DomainError;
pub use domain::model::{LibraryAsset, ScrubGeometry, VideoMetadata};
pub use error::{TubizeError, TubizeResult};
