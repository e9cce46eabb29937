// Ports - Interface definitions (contracts)

use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use async_trait::async_trait;

use crate::domain::errors::*;
use crate::domain::model::*;

/// External binaries the library depends on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExternalTool {
    Ffmpeg,
    Ffprobe,
    Mediainfo,
    Img2webp,
    Montage,
}

impl ExternalTool {
    /// Every tool needed to build a library
    pub const ALL: [ExternalTool; 5] = [
        ExternalTool::Ffmpeg,
        ExternalTool::Ffprobe,
        ExternalTool::Mediainfo,
        ExternalTool::Img2webp,
        ExternalTool::Montage,
    ];

    /// Executable name looked up on PATH
    pub fn program(&self) -> &'static str {
        match self {
            ExternalTool::Ffmpeg => "ffmpeg",
            ExternalTool::Ffprobe => "ffprobe",
            ExternalTool::Mediainfo => "mediainfo",
            ExternalTool::Img2webp => "img2webp",
            ExternalTool::Montage => "montage",
        }
    }

    /// Arguments of a cheap invocation proving the tool runs
    pub fn version_args(&self) -> &'static [&'static str] {
        match self {
            ExternalTool::Ffmpeg | ExternalTool::Ffprobe | ExternalTool::Img2webp => &["-version"],
            ExternalTool::Mediainfo | ExternalTool::Montage => &["--version"],
        }
    }
}

impl fmt::Display for ExternalTool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.program())
    }
}

/// Raw result of one external tool call
#[derive(Debug, Clone, Default)]
pub struct ToolOutput {
    pub stdout: String,
    pub stderr: String,
    pub success: bool,
    pub elapsed: Duration,
}

/// Everything needed to render a scrub sprite
#[derive(Debug, Clone)]
pub struct SpriteRequest {
    pub geometry: ScrubGeometry,
    pub fps: u32,
    pub tile_width: u32,
}

/// Port for the external media tools
///
/// Every call is a black box returning raw text; parsing belongs to the caller.
/// `Err` is reserved for transport failures (the binary could not be run at all);
/// a tool that runs and fails reports `success == false`.
#[async_trait]
pub trait MediaToolPort: Send + Sync {
    /// Run the tool's version command
    async fn check_tool(&self, tool: ExternalTool) -> Result<ToolOutput, DomainError>;

    /// Stream properties of the first video stream, one value per line
    async fn probe_stream(&self, input: &Path) -> Result<ToolOutput, DomainError>;

    /// Container report, used for the recording date
    async fn probe_container(&self, input: &Path) -> Result<ToolOutput, DomainError>;

    /// Write one PNG per detected scene change into `out_dir`
    async fn extract_scenes(
        &self,
        input: &Path,
        threshold: &str,
        tile_width: u32,
        out_dir: &Path,
    ) -> Result<ToolOutput, DomainError>;

    /// Encode `frames` (names relative to `work_dir`) into an animated image
    async fn encode_animated(
        &self,
        frames: &[PathBuf],
        delay: u32,
        output: &Path,
        work_dir: &Path,
    ) -> Result<ToolOutput, DomainError>;

    /// Capture a single frame at `offset_seconds`
    async fn capture_frame(
        &self,
        input: &Path,
        offset_seconds: u32,
        width: u32,
        output: &Path,
    ) -> Result<ToolOutput, DomainError>;

    /// Render the tiled timeline sprite
    async fn render_scrub_sprite(
        &self,
        input: &Path,
        request: &SpriteRequest,
        output: &Path,
    ) -> Result<ToolOutput, DomainError>;

    /// Compose `tiles` into a `dim`x`dim` mosaic
    async fn compose_mosaic(
        &self,
        tiles: &[PathBuf],
        dim: u32,
        output: &Path,
    ) -> Result<ToolOutput, DomainError>;

    /// Convert `input` into an MP4 using the encoder `flags`
    async fn transcode(
        &self,
        input: &Path,
        flags: &str,
        recorded_date: &str,
        output: &Path,
    ) -> Result<ToolOutput, DomainError>;

    /// Stream-copy every file listed in a concat demuxer `list_file`
    async fn concat(&self, list_file: &Path, output: &Path) -> Result<ToolOutput, DomainError>;
}
