// Domain models - Core types and data structures

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::domain::errors::DomainError;

/// Name of the sibling directory that receives every generated artifact
pub const PREVIEW_DIR_NAME: &str = ".preview";

/// Suffix of the marker file that permanently disables an artifact
pub const IGNORE_SUFFIX: &str = ".ignore";

/// Scalar stream properties read from the probe tools
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoMetadata {
    pub width: u32,
    pub height: u32,
    pub fps: u32,
    pub frames: u64,
    pub aspect_ratio: String,
    #[serde(skip)]
    pub recorded_date: Option<String>,
}

impl VideoMetadata {
    /// Create a validated metadata record
    pub fn new(
        width: u32,
        height: u32,
        fps: u32,
        frames: u64,
        aspect_ratio: impl Into<String>,
        recorded_date: Option<String>,
    ) -> Result<Self, DomainError> {
        if width == 0 || height == 0 {
            return Err(DomainError::BadArgs(format!(
                "Frame dimensions must be positive, got {}x{}",
                width, height
            )));
        }
        if fps == 0 {
            return Err(DomainError::BadArgs("Frame rate must be positive".to_string()));
        }
        Ok(Self {
            width,
            height,
            fps,
            frames,
            aspect_ratio: aspect_ratio.into(),
            recorded_date,
        })
    }

    /// Record used when the probe output cannot be parsed
    pub fn fallback(recorded_date: Option<String>) -> Self {
        Self {
            width: 100,
            height: 100,
            fps: 30,
            frames: 1,
            aspect_ratio: "1".to_string(),
            recorded_date,
        }
    }

    /// Whole seconds of video, rounded down
    pub fn duration(&self) -> u64 {
        self.frames / u64::from(self.fps)
    }

    /// Height of a tile scaled to `width` pixels wide, keeping the aspect
    pub fn scaled_height(&self, width: u32) -> u32 {
        (u64::from(width) * u64::from(self.height) / u64::from(self.width)) as u32
    }
}

/// Lazily fetched metadata: nothing is probed until first use
#[derive(Debug, Clone, PartialEq, Default)]
pub enum MetaState {
    #[default]
    Unfetched,
    Fetched(VideoMetadata),
}

impl MetaState {
    pub fn get(&self) -> Option<&VideoMetadata> {
        match self {
            MetaState::Unfetched => None,
            MetaState::Fetched(meta) => Some(meta),
        }
    }
}

/// Grid layout of the scrub sprite
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScrubGeometry {
    /// Seconds of video covered by each tile
    pub interval_seconds: u64,
    pub columns: u32,
    pub rows: u32,
}

impl ScrubGeometry {
    pub fn tile_count(&self) -> u32 {
        self.columns * self.rows
    }
}

/// Trajectory of a scene search, persisted into the asset meta file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneSearchReport {
    /// Inter-frame delay handed to the animated encoder
    pub delay: u32,
    /// Every (step, frame count) pair tried, in order
    pub search: Vec<(i32, usize)>,
}

/// One source video and the artifacts derived from it
#[derive(Debug, Clone)]
pub struct LibraryAsset {
    source: PathBuf,
    file_size: u64,
    /// Set when any artifact was (re)generated during this run
    pub updated: bool,
    pub metadata: MetaState,
    pub preview_search: Option<SceneSearchReport>,
}

impl LibraryAsset {
    /// Create an asset for `source`, capturing its current size
    pub fn new(source: impl Into<PathBuf>) -> Result<Self, DomainError> {
        let source = source.into();
        let file_size = std::fs::metadata(&source)
            .map_err(|e| DomainError::FileNotFound(format!("{}: {}", source.display(), e)))?
            .len();
        Ok(Self::with_size(source, file_size))
    }

    /// Create an asset without touching the filesystem
    pub fn with_size(source: impl Into<PathBuf>, file_size: u64) -> Self {
        Self {
            source: source.into(),
            file_size,
            updated: false,
            metadata: MetaState::Unfetched,
            preview_search: None,
        }
    }

    pub fn source(&self) -> &Path {
        &self.source
    }

    pub fn file_size(&self) -> u64 {
        self.file_size
    }

    /// File name without extension
    pub fn name(&self) -> String {
        self.source
            .file_stem()
            .map(|stem| stem.to_string_lossy().to_string())
            .unwrap_or_default()
    }

    /// Name of the directory holding the source file
    pub fn group(&self) -> String {
        self.source
            .parent()
            .and_then(|parent| parent.file_name())
            .map(|name| name.to_string_lossy().to_string())
            .unwrap_or_default()
    }

    /// Web path of the asset inside the catalog
    pub fn uri(&self) -> String {
        format!("{}/{}", self.group(), self.name())
    }

    /// `<grandparent>/.preview/<parent>`: mirrors the parent folder next to it
    pub fn preview_dir(&self) -> PathBuf {
        let parent = self.source.parent().unwrap_or_else(|| Path::new(""));
        let base = parent.parent().unwrap_or_else(|| Path::new(""));
        base.join(PREVIEW_DIR_NAME).join(self.group())
    }

    fn preview_path(&self, suffix: &str) -> PathBuf {
        let file_name = self
            .source
            .file_name()
            .map(|name| name.to_string_lossy().to_string())
            .unwrap_or_default();
        self.preview_dir().join(format!("{}{}", file_name, suffix))
    }

    pub fn thumbnail_path(&self) -> PathBuf {
        self.preview_path(".thumb.jpg")
    }

    pub fn webp_path(&self) -> PathBuf {
        self.preview_path(".webp")
    }

    /// Marker that disables animated preview generation for good
    pub fn webp_ignore_path(&self) -> PathBuf {
        self.preview_path(&format!(".webp{}", IGNORE_SUFFIX))
    }

    pub fn scrub_path(&self) -> PathBuf {
        self.preview_path(".jpg")
    }

    /// Scrub sprite name as referenced from the VTT file
    pub fn scrub_uri(&self) -> String {
        self.scrub_path()
            .file_name()
            .map(|name| name.to_string_lossy().to_string())
            .unwrap_or_default()
    }

    pub fn vtt_path(&self) -> PathBuf {
        self.preview_path(".vtt")
    }

    pub fn meta_path(&self) -> PathBuf {
        self.preview_path(".json")
    }
}

#[cfg(test)]
mod tests;
