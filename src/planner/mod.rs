//! Pure planning: scene search steps, scrub sprite layout and join segments
//!
//! Nothing in here touches the filesystem or runs a tool; the engines feed
//! tool results in and act on the decisions that come back.

pub mod scene;
pub mod scrub;
pub mod segments;

pub use scene::{SceneSearchState, StepDecision};
pub use scrub::{plan_cues, scrub_geometry, ScrubCue};
pub use segments::{plan_segments, JoinInput, Segment};
