//! Test-only scripted implementation of the media tool port.

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use async_trait::async_trait;
use image::{Rgb, RgbImage};

use crate::domain::errors::DomainError;
use crate::ports::{ExternalTool, MediaToolPort, SpriteRequest, ToolOutput};

/// ffprobe output for a 10s 1080p clip at 30fps
pub const STREAM_1080P_10S: &str = "1920\n1080\n16:9\n30/1\n300\n";

type SceneCounts = Box<dyn Fn(i32) -> usize + Send + Sync>;

/// Records every call and fakes tool output on disk
pub struct ScriptedTools {
    stream_text: String,
    container_text: String,
    scene_counts: SceneCounts,
    featureless_until: u32,
    missing: Vec<ExternalTool>,
    unreachable: bool,
    calls: Mutex<Vec<String>>,
}

impl ScriptedTools {
    pub fn new() -> Self {
        Self {
            stream_text: STREAM_1080P_10S.to_string(),
            container_text: "General\nRecorded date : 2021-07-14 09:30:00\n".to_string(),
            scene_counts: Box::new(|_| 120),
            featureless_until: 0,
            missing: Vec::new(),
            unreachable: false,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn with_stream(mut self, text: &str) -> Self {
        self.stream_text = text.to_string();
        self
    }

    pub fn with_container(mut self, text: &str) -> Self {
        self.container_text = text.to_string();
        self
    }

    /// Frames produced by a scene extraction at a given step
    pub fn with_scene_counts(mut self, counts: impl Fn(i32) -> usize + Send + Sync + 'static) -> Self {
        self.scene_counts = Box::new(counts);
        self
    }

    /// Captures below this offset produce a flat black frame
    pub fn with_featureless_until(mut self, offset: u32) -> Self {
        self.featureless_until = offset;
        self
    }

    pub fn with_missing(mut self, tool: ExternalTool) -> Self {
        self.missing.push(tool);
        self
    }

    /// Every call fails as if the binaries vanished
    pub fn unreachable(mut self) -> Self {
        self.unreachable = true;
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub fn calls_to(&self, name: &str) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|call| call.split_whitespace().next() == Some(name))
            .count()
    }

    pub fn reset_calls(&self) {
        self.calls.lock().unwrap().clear();
    }

    fn record(&self, call: String) -> Result<(), DomainError> {
        self.calls.lock().unwrap().push(call);
        if self.unreachable {
            return Err(DomainError::ToolUnavailable("scripted tools unreachable".to_string()));
        }
        Ok(())
    }
}

fn ok(stdout: &str) -> Result<ToolOutput, DomainError> {
    Ok(ToolOutput {
        stdout: stdout.to_string(),
        success: true,
        ..ToolOutput::default()
    })
}

fn touch(path: &Path) -> Result<ToolOutput, DomainError> {
    std::fs::write(path, b"scripted")?;
    ok("")
}

/// A 128x128 frame; featureless frames are solid black, others carry a grid of 64 dark squares
pub fn write_frame(path: &Path, featureless: bool) {
    let image = if featureless {
        RgbImage::from_pixel(128, 128, Rgb([0, 0, 0]))
    } else {
        RgbImage::from_fn(128, 128, |x, y| {
            if x % 16 < 8 && y % 16 < 8 {
                Rgb([0, 0, 0])
            } else {
                Rgb([255, 255, 255])
            }
        })
    };
    image.save(path).unwrap();
}

#[async_trait]
impl MediaToolPort for ScriptedTools {
    async fn check_tool(&self, tool: ExternalTool) -> Result<ToolOutput, DomainError> {
        self.record(format!("check_tool {}", tool))?;
        if self.missing.contains(&tool) {
            return Err(DomainError::ToolUnavailable(format!("{} not found", tool)));
        }
        ok("version 1.0")
    }

    async fn probe_stream(&self, input: &Path) -> Result<ToolOutput, DomainError> {
        self.record(format!("probe_stream {}", input.display()))?;
        ok(&self.stream_text)
    }

    async fn probe_container(&self, input: &Path) -> Result<ToolOutput, DomainError> {
        self.record(format!("probe_container {}", input.display()))?;
        ok(&self.container_text)
    }

    async fn extract_scenes(
        &self,
        _input: &Path,
        threshold: &str,
        _tile_width: u32,
        out_dir: &Path,
    ) -> Result<ToolOutput, DomainError> {
        self.record(format!("extract_scenes {}", threshold))?;
        let step = (threshold.parse::<f64>().unwrap() * 1000.0).round() as i32;
        for index in 1..=(self.scene_counts)(step) {
            std::fs::write(out_dir.join(format!("{:03}.png", index)), b"frame")?;
        }
        ok("")
    }

    async fn encode_animated(
        &self,
        frames: &[PathBuf],
        delay: u32,
        output: &Path,
        _work_dir: &Path,
    ) -> Result<ToolOutput, DomainError> {
        self.record(format!("encode_animated {} {}", frames.len(), delay))?;
        touch(output)
    }

    async fn capture_frame(
        &self,
        _input: &Path,
        offset_seconds: u32,
        width: u32,
        output: &Path,
    ) -> Result<ToolOutput, DomainError> {
        self.record(format!("capture_frame {} {}", offset_seconds, width))?;
        write_frame(output, offset_seconds < self.featureless_until);
        ok("")
    }

    async fn render_scrub_sprite(
        &self,
        _input: &Path,
        request: &SpriteRequest,
        output: &Path,
    ) -> Result<ToolOutput, DomainError> {
        self.record(format!(
            "render_scrub_sprite {}x{}",
            request.geometry.columns, request.geometry.rows
        ))?;
        touch(output)
    }

    async fn compose_mosaic(
        &self,
        tiles: &[PathBuf],
        dim: u32,
        output: &Path,
    ) -> Result<ToolOutput, DomainError> {
        self.record(format!("compose_mosaic {} {}", tiles.len(), dim))?;
        touch(output)
    }

    async fn transcode(
        &self,
        input: &Path,
        flags: &str,
        recorded_date: &str,
        output: &Path,
    ) -> Result<ToolOutput, DomainError> {
        self.record(format!("transcode {} [{}] {}", input.display(), flags, recorded_date))?;
        touch(output)
    }

    async fn concat(&self, list_file: &Path, output: &Path) -> Result<ToolOutput, DomainError> {
        let list = std::fs::read_to_string(list_file)?;
        self.record(format!("concat {} {}", list.lines().count(), output.display()))?;
        touch(output)
    }
}
