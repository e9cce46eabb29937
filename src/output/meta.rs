//! Per-asset meta JSON

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::domain::errors::DomainError;
use crate::domain::model::{LibraryAsset, SceneSearchReport, VideoMetadata};
use crate::domain::rules::FilenameTags;

/// Contents of `<file>.json` in the preview directory
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetaDocument {
    pub title: String,
    pub duration: u64,
    pub originaldate: Option<String>,
    pub description: String,
    pub tags: Vec<String>,
    pub stream: VideoMetadata,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preview: Option<SceneSearchReport>,
}

impl MetaDocument {
    pub fn new(asset: &LibraryAsset, meta: &VideoMetadata) -> Self {
        let tags = FilenameTags::from_path(asset.source());
        Self {
            title: tags.title(),
            duration: meta.duration(),
            originaldate: meta.recorded_date.clone(),
            description: tags.description(),
            tags: tags.keywords().to_vec(),
            stream: meta.clone(),
            preview: asset.preview_search.clone(),
        }
    }

    /// Stream record with the recording date restored
    pub fn metadata(&self) -> VideoMetadata {
        VideoMetadata {
            recorded_date: self.originaldate.clone(),
            ..self.stream.clone()
        }
    }

    pub fn read(path: &Path) -> Result<Self, DomainError> {
        let text = std::fs::read_to_string(path)?;
        serde_json::from_str(&text)
            .map_err(|e| DomainError::ParseFailed(format!("{}: {}", path.display(), e)))
    }

    pub fn write(&self, path: &Path) -> Result<(), DomainError> {
        let text = serde_json::to_string_pretty(self)
            .map_err(|e| DomainError::InternalError(format!("JSON serialization failed: {}", e)))?;
        std::fs::write(path, text)?;
        Ok(())
    }
}
