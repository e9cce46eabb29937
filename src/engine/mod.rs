//! Artifact engines
//!
//! Each engine drives the media tool port for one kind of output and leaves
//! the skip/force bookkeeping to the caller, except the scene search which
//! also honours its sentinel.

pub mod converter;
pub mod joiner;
pub mod scene_search;
pub mod scrub;
pub mod thumbnail;

pub use converter::{ConvertOutcome, VideoConverter};
pub use joiner::VideoJoiner;
pub use scene_search::{SceneSearchEngine, SceneSearchOutcome, SceneSearchResult};
pub use scrub::ScrubEngine;
pub use thumbnail::ThumbnailEngine;
