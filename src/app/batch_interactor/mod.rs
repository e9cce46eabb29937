// Batch interactor - Orchestrates conversion and joining of raw captures

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::info;

use crate::domain::errors::*;
use crate::engine::{ConvertOutcome, VideoConverter, VideoJoiner};
use crate::ports::*;

/// Default source extension of the convert command
pub const DEFAULT_CONVERT_EXTENSION: &str = "avi";

/// Interactor for the convert and join use cases
pub struct BatchInteractor {
    tools: Arc<dyn MediaToolPort>,
}

impl BatchInteractor {
    /// Create new batch interactor with injected ports
    pub fn new(tools: Arc<dyn MediaToolPort>) -> Self {
        Self { tools }
    }

    /// Convert one file, or every `*.<extension>` below a directory
    pub async fn convert(
        &self,
        input: &Path,
        extension: &str,
    ) -> Result<Vec<ConvertOutcome>, DomainError> {
        let converter = VideoConverter::new(self.tools.as_ref());
        let outcomes = if input.is_file() {
            vec![converter.convert_file(input).await?]
        } else if input.is_dir() {
            converter.convert_directory(input, extension).await?
        } else {
            return Err(DomainError::FileNotFound(input.display().to_string()));
        };
        let converted = outcomes
            .iter()
            .filter(|outcome| matches!(outcome, ConvertOutcome::Converted(_)))
            .count();
        info!("Converted {} of {} files", converted, outcomes.len());
        Ok(outcomes)
    }

    /// Join the AVI files of `dir` into dated segments
    pub async fn join(
        &self,
        dir: &Path,
        prefix: &str,
        output_dir: &Path,
    ) -> Result<Vec<PathBuf>, DomainError> {
        if !dir.is_dir() {
            return Err(DomainError::BadArgs(format!(
                "Expected directory path: {}",
                dir.display()
            )));
        }
        VideoJoiner::new(self.tools.as_ref())
            .join_directory(dir, prefix, output_dir)
            .await
    }
}
