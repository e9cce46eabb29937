// Inspect interactor - Orchestrates video inspection use case

use std::path::PathBuf;
use std::sync::Arc;

use crate::domain::errors::*;
use crate::domain::model::*;
use crate::output::MetaDocument;
use crate::ports::*;
use crate::probe::MetaInfoExtractor;
use crate::utils::{format_duration, format_file_size};

/// Interactor for video inspection use case
pub struct InspectInteractor {
    tools: Arc<dyn MediaToolPort>,
}

impl InspectInteractor {
    /// Create new inspect interactor with injected ports
    pub fn new(tools: Arc<dyn MediaToolPort>) -> Self {
        Self { tools }
    }

    /// Execute video inspection
    pub async fn execute(&self, request: InspectRequest) -> Result<InspectResponse, DomainError> {
        let asset = LibraryAsset::new(&request.input_path)?;
        let metadata = MetaInfoExtractor::new(self.tools.as_ref())
            .fetch(asset.source())
            .await?;
        let document = MetaDocument::new(&asset, &metadata);

        let summary = match request.format.as_str() {
            "json" => self.format_as_json(&document)?,
            "yaml" => self.format_as_yaml(&document)?,
            _ => self.format_as_text(&asset, &document),
        };

        Ok(InspectResponse { metadata, summary })
    }

    /// Format document as JSON
    fn format_as_json(&self, document: &MetaDocument) -> Result<String, DomainError> {
        serde_json::to_string_pretty(document)
            .map_err(|e| DomainError::InternalError(format!("JSON serialization failed: {}", e)))
    }

    /// Format document as YAML
    fn format_as_yaml(&self, document: &MetaDocument) -> Result<String, DomainError> {
        serde_yaml::to_string(document)
            .map_err(|e| DomainError::InternalError(format!("YAML serialization failed: {}", e)))
    }

    /// Format document as human-readable text
    fn format_as_text(&self, asset: &LibraryAsset, document: &MetaDocument) -> String {
        let stream = &document.stream;
        let mut output = String::new();
        output.push_str("Video File Information:\n");
        output.push_str(&format!("  File: {}\n", asset.source().display()));
        output.push_str(&format!("  File Size: {}\n", format_file_size(asset.file_size())));
        output.push_str(&format!(
            "  Dimensions: {}x{} ({})\n",
            stream.width, stream.height, stream.aspect_ratio
        ));
        output.push_str(&format!("  Frame Rate: {} fps\n", stream.fps));
        output.push_str(&format!("  Frames: {}\n", stream.frames));
        output.push_str(&format!("  Duration: {}\n", format_duration(document.duration)));
        output.push_str(&format!(
            "  Recorded: {}\n",
            document.originaldate.as_deref().unwrap_or("unknown")
        ));
        output.push_str(&format!("  Title: {}\n", document.title));
        output.push_str(&format!("  Tags: {}\n", document.tags.join(", ")));
        output
    }
}

/// Request for video inspection
#[derive(Debug, Clone)]
pub struct InspectRequest {
    pub input_path: PathBuf,
    /// `text`, `json` or `yaml`
    pub format: String,
}

impl InspectRequest {
    /// Create new inspect request with format
    pub fn with_format(input_path: impl Into<PathBuf>, format: impl Into<String>) -> Self {
        Self {
            input_path: input_path.into(),
            format: format.into(),
        }
    }
}

/// Response from video inspection
#[derive(Debug, Clone)]
pub struct InspectResponse {
    pub metadata: VideoMetadata,
    pub summary: String,
}
