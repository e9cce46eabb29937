//! Animated preview driver for the scene-detection search

use std::path::{Path, PathBuf};
use std::time::Instant;

use tracing::{debug, info, warn};

use crate::domain::errors::DomainError;
use crate::domain::model::{LibraryAsset, SceneSearchReport};
use crate::planner::scene::{SceneSearchState, StepDecision, PREVIEW_FRAME_DELAY};
use crate::ports::MediaToolPort;
use crate::utils::format_file_size;

/// Contents of a sentinel file
const SENTINEL_BODY: &str = "Ignore";

/// How a search invocation ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SceneSearchOutcome {
    /// Preview encoded from `frames` frames found at `step`
    Accepted { frames: usize, step: i32 },
    /// No step produced an acceptable count; sentinel written
    Exhausted { last_count: usize },
    /// The final extraction produced nothing; sentinel written
    Empty,
    /// Preview already present or disabled by a sentinel
    Skipped,
}

impl SceneSearchOutcome {
    pub fn wrote_sentinel(&self) -> bool {
        matches!(self, Self::Exhausted { .. } | Self::Empty)
    }
}

/// Result of one search: the outcome plus the trajectory for the meta file
#[derive(Debug, Clone)]
pub struct SceneSearchResult {
    pub outcome: SceneSearchOutcome,
    pub report: Option<SceneSearchReport>,
}

/// Runs the extractor repeatedly until a frame set fits the acceptance band
pub struct SceneSearchEngine<'a> {
    tools: &'a dyn MediaToolPort,
    initial_step: i32,
    tile_width: u32,
}

impl<'a> SceneSearchEngine<'a> {
    pub fn new(tools: &'a dyn MediaToolPort, initial_step: i32, tile_width: u32) -> Self {
        Self {
            tools,
            initial_step,
            tile_width,
        }
    }

    /// Build the animated preview of `asset`
    ///
    /// Skips without touching the extractor when the sentinel exists, or when
    /// the preview exists and `force` is unset.
    pub async fn run(&self, asset: &LibraryAsset, force: bool) -> Result<SceneSearchResult, DomainError> {
        let output = asset.webp_path();
        let sentinel = asset.webp_ignore_path();
        if sentinel.exists() || (output.exists() && !force) {
            debug!("Preview skipped for {}", asset.source().display());
            return Ok(SceneSearchResult {
                outcome: SceneSearchOutcome::Skipped,
                report: None,
            });
        }

        let started = Instant::now();
        let mut state = SceneSearchState::new(self.initial_step);
        let outcome = loop {
            let scratch = tempfile::Builder::new().prefix("preview").tempdir()?;
            let frames = self.extract(asset.source(), &state, scratch.path()).await?;
            let count = frames.len();
            let step = state.step();

            match state.record(count) {
                StepDecision::Retry => continue,
                StepDecision::Accept => {
                    self.encode(&frames, &output, scratch.path()).await?;
                    break SceneSearchOutcome::Accepted { frames: count, step };
                }
                StepDecision::Exhausted => {
                    warn!(
                        "Preview creation failed for {} after {} attempts",
                        asset.source().display(),
                        state.history().len()
                    );
                    std::fs::write(&sentinel, SENTINEL_BODY)?;
                    break if count == 0 {
                        SceneSearchOutcome::Empty
                    } else {
                        SceneSearchOutcome::Exhausted { last_count: count }
                    };
                }
            }
        };
        debug!("Time to find {:.2}s", started.elapsed().as_secs_f64());

        Ok(SceneSearchResult {
            outcome,
            report: Some(SceneSearchReport {
                delay: PREVIEW_FRAME_DELAY,
                search: state.into_history(),
            }),
        })
    }

    /// One extraction into `scratch`; returns the frame names, sorted
    async fn extract(
        &self,
        source: &Path,
        state: &SceneSearchState,
        scratch: &Path,
    ) -> Result<Vec<PathBuf>, DomainError> {
        let threshold = state.threshold();
        let result = self
            .tools
            .extract_scenes(source, &threshold, self.tile_width, scratch)
            .await?;
        let frames = list_frames(scratch)?;
        info!(
            "Find scenes @ {} ... found {} in {:.2}s",
            threshold,
            frames.len(),
            result.elapsed.as_secs_f64()
        );
        Ok(frames)
    }

    async fn encode(&self, frames: &[PathBuf], output: &Path, scratch: &Path) -> Result<(), DomainError> {
        let result = self
            .tools
            .encode_animated(frames, PREVIEW_FRAME_DELAY, output, scratch)
            .await?;
        if !result.success || !output.exists() {
            return Err(DomainError::ToolFailed(format!(
                "animated preview encode failed for {}: {}",
                output.display(),
                result.stderr.trim()
            )));
        }
        let size = std::fs::metadata(output).map(|m| m.len()).unwrap_or(0);
        info!("Webp size: {} from {}", format_file_size(size), frames.len());
        Ok(())
    }
}

/// File names in `dir`, relative to it, sorted
fn list_frames(dir: &Path) -> Result<Vec<PathBuf>, DomainError> {
    let mut frames = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        if entry.file_type()?.is_file() {
            frames.push(PathBuf::from(entry.file_name()));
        }
    }
    frames.sort();
    Ok(frames)
}
