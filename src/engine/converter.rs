//! Single-call conversion of legacy containers to MP4

use std::path::{Path, PathBuf};

use tracing::{error, info, warn};

use crate::domain::errors::DomainError;
use crate::domain::rules::ConversionRules;
use crate::ports::MediaToolPort;
use crate::probe::parse_recorded_date;
use crate::utils::find_files;

/// What happened to one input file
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConvertOutcome {
    Converted(PathBuf),
    /// `<stem>.mp4` was already there
    AlreadyExists(PathBuf),
    /// No rule for this extension
    Unsupported(String),
}

pub struct VideoConverter<'a> {
    tools: &'a dyn MediaToolPort,
}

impl<'a> VideoConverter<'a> {
    pub fn new(tools: &'a dyn MediaToolPort) -> Self {
        Self { tools }
    }

    /// Convert `input` next to itself as `<stem>.mp4`
    pub async fn convert_file(&self, input: &Path) -> Result<ConvertOutcome, DomainError> {
        let output = input.with_extension("mp4");
        if output.exists() {
            info!("Skipping file {} already exists!", output.display());
            return Ok(ConvertOutcome::AlreadyExists(output));
        }

        let extension = input
            .extension()
            .map(|ext| format!(".{}", ext.to_string_lossy()))
            .unwrap_or_default();
        let Some(flags) = ConversionRules::flags_for(&extension) else {
            error!("Skipping unsupported type {}!", extension);
            return Ok(ConvertOutcome::Unsupported(extension));
        };

        let report = self.tools.probe_container(input).await?;
        let recorded_date = parse_recorded_date(&report.stdout).unwrap_or_default();

        info!("Convert {} to MP4 {} ...", extension, output.display());
        let result = self
            .tools
            .transcode(input, flags, &recorded_date, &output)
            .await?;
        if !result.success {
            return Err(DomainError::ToolFailed(format!(
                "conversion of {} failed: {}",
                input.display(),
                result.stderr.trim()
            )));
        }
        Ok(ConvertOutcome::Converted(output))
    }

    /// Convert every `*.<extension>` below `dir`
    ///
    /// Per-file tool failures are logged and skipped; transport failures abort.
    pub async fn convert_directory(
        &self,
        dir: &Path,
        extension: &str,
    ) -> Result<Vec<ConvertOutcome>, DomainError> {
        let files = find_files(dir, extension)?;
        if files.is_empty() {
            warn!("No matching files found in directory {}", dir.display());
        }
        let mut outcomes = Vec::with_capacity(files.len());
        for file in files {
            match self.convert_file(&file).await {
                Ok(outcome) => outcomes.push(outcome),
                Err(e) if e.is_fatal() => return Err(e),
                Err(e) => warn!("{}", e),
            }
        }
        Ok(outcomes)
    }
}
