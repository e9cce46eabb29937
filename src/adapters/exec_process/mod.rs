//! External process adapter
//!
//! Runs ffmpeg, ffprobe, mediainfo, img2webp and montage as child processes.
//! Argument construction is kept in pure builder functions so it can be tested
//! without any of the binaries installed.

use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Instant;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::{debug, warn};

use crate::domain::errors::*;
use crate::domain::rules::CONVERT_BASE_FLAGS;
use crate::ports::*;

/// Offset skipped before scene detection, avoiding fades and title cards
const SCENE_SEEK: &str = "00:00:04";

/// Process-backed implementation of [`MediaToolPort`]
pub struct ProcessToolAdapter;

impl ProcessToolAdapter {
    /// Create new process adapter
    pub fn new() -> Result<Self, DomainError> {
        Ok(Self)
    }

    /// Spawn `tool` and wait for it, capturing output and wall-clock time
    async fn run(
        &self,
        tool: ExternalTool,
        args: Vec<String>,
        cwd: Option<&Path>,
    ) -> Result<ToolOutput, DomainError> {
        debug!("Exec -> {} {}", tool, args.join(" "));
        let start = Instant::now();

        let mut command = Command::new(tool.program());
        command.args(&args).stdin(Stdio::null()).kill_on_drop(true);
        if let Some(dir) = cwd {
            command.current_dir(dir);
        }

        let output = command.output().await.map_err(|e| {
            DomainError::ToolUnavailable(format!("unable to invoke {}: {}", tool, e))
        })?;
        let elapsed = start.elapsed();

        let result = ToolOutput {
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
            success: output.status.success(),
            elapsed,
        };

        if result.success {
            debug!("Exec Result <- {} in {:.2}s", tool, elapsed.as_secs_f64());
        } else {
            warn!(
                "{} exited with {} after {:.2}s: {}",
                tool,
                output.status,
                elapsed.as_secs_f64(),
                result.stderr.trim()
            );
        }
        Ok(result)
    }
}

#[async_trait]
impl MediaToolPort for ProcessToolAdapter {
    async fn check_tool(&self, tool: ExternalTool) -> Result<ToolOutput, DomainError> {
        let args = tool.version_args().iter().map(|a| a.to_string()).collect();
        self.run(tool, args, None).await
    }

    async fn probe_stream(&self, input: &Path) -> Result<ToolOutput, DomainError> {
        self.run(ExternalTool::Ffprobe, build_probe_stream_args(input), None)
            .await
    }

    async fn probe_container(&self, input: &Path) -> Result<ToolOutput, DomainError> {
        self.run(ExternalTool::Mediainfo, vec![path_arg(input)], None)
            .await
    }

    async fn extract_scenes(
        &self,
        input: &Path,
        threshold: &str,
        tile_width: u32,
        out_dir: &Path,
    ) -> Result<ToolOutput, DomainError> {
        let args = build_scene_args(input, threshold, tile_width, out_dir);
        self.run(ExternalTool::Ffmpeg, args, None).await
    }

    async fn encode_animated(
        &self,
        frames: &[PathBuf],
        delay: u32,
        output: &Path,
        work_dir: &Path,
    ) -> Result<ToolOutput, DomainError> {
        let output = std::path::absolute(output)?;
        let args = build_animated_args(frames, delay, &output);
        self.run(ExternalTool::Img2webp, args, Some(work_dir)).await
    }

    async fn capture_frame(
        &self,
        input: &Path,
        offset_seconds: u32,
        width: u32,
        output: &Path,
    ) -> Result<ToolOutput, DomainError> {
        let args = build_capture_args(input, offset_seconds, width, output);
        self.run(ExternalTool::Ffmpeg, args, None).await
    }

    async fn render_scrub_sprite(
        &self,
        input: &Path,
        request: &SpriteRequest,
        output: &Path,
    ) -> Result<ToolOutput, DomainError> {
        let args = build_sprite_args(input, request, output);
        self.run(ExternalTool::Ffmpeg, args, None).await
    }

    async fn compose_mosaic(
        &self,
        tiles: &[PathBuf],
        dim: u32,
        output: &Path,
    ) -> Result<ToolOutput, DomainError> {
        let args = build_mosaic_args(tiles, dim, output);
        self.run(ExternalTool::Montage, args, None).await
    }

    async fn transcode(
        &self,
        input: &Path,
        flags: &str,
        recorded_date: &str,
        output: &Path,
    ) -> Result<ToolOutput, DomainError> {
        let args = build_transcode_args(input, flags, recorded_date, output);
        self.run(ExternalTool::Ffmpeg, args, None).await
    }

    async fn concat(&self, list_file: &Path, output: &Path) -> Result<ToolOutput, DomainError> {
        self.run(ExternalTool::Ffmpeg, build_concat_args(list_file, output), None)
            .await
    }
}

fn path_arg(path: &Path) -> String {
    path.to_string_lossy().to_string()
}

fn strings(args: &[&str]) -> Vec<String> {
    args.iter().map(|a| a.to_string()).collect()
}

/// Flags shared by every ffmpeg invocation
fn ffmpeg_base_args() -> Vec<String> {
    strings(&["-hwaccel", "auto", "-hide_banner", "-loglevel", "error", "-y"])
}

/// `HH:MM:SS` seek position for a whole-second offset
fn seek_position(offset_seconds: u32) -> String {
    format!(
        "{:02}:{:02}:{:02}",
        offset_seconds / 3600,
        (offset_seconds / 60) % 60,
        offset_seconds % 60
    )
}

pub fn build_probe_stream_args(input: &Path) -> Vec<String> {
    let mut args = strings(&[
        "-v",
        "error",
        "-select_streams",
        "v:0",
        "-show_entries",
        "stream=r_frame_rate,nb_frames,height,width,display_aspect_ratio",
        "-of",
        "default=nokey=1:noprint_wrappers=1",
    ]);
    args.push(path_arg(input));
    args
}

pub fn build_scene_args(input: &Path, threshold: &str, tile_width: u32, out_dir: &Path) -> Vec<String> {
    let mut args = ffmpeg_base_args();
    args.extend(strings(&["-ss", SCENE_SEEK, "-i"]));
    args.push(path_arg(input));
    args.push("-filter_complex".to_string());
    args.push(format!(
        "yadif=1,select='gt(scene,{})',setpts=N/(25*TB),scale={}:-1",
        threshold, tile_width
    ));
    args.extend(strings(&["-vsync", "vfr"]));
    args.push(path_arg(&out_dir.join("%03d.png")));
    args
}

pub fn build_animated_args(frames: &[PathBuf], delay: u32, output: &Path) -> Vec<String> {
    let mut args = strings(&["-min_size", "-lossy", "-d"]);
    args.push(delay.to_string());
    args.extend(frames.iter().map(|frame| path_arg(frame)));
    args.push("-o".to_string());
    args.push(path_arg(output));
    args
}

pub fn build_capture_args(input: &Path, offset_seconds: u32, width: u32, output: &Path) -> Vec<String> {
    let mut args = ffmpeg_base_args();
    args.push("-i".to_string());
    args.push(path_arg(input));
    args.push("-ss".to_string());
    args.push(seek_position(offset_seconds));
    args.extend(strings(&["-vframes", "1", "-q:v", "5", "-vf"]));
    args.push(format!("scale={}:-1", width));
    args.push(path_arg(output));
    args
}

pub fn build_sprite_args(input: &Path, request: &SpriteRequest, output: &Path) -> Vec<String> {
    let every_n_frames = u64::from(request.fps.max(1)) * request.geometry.interval_seconds.max(1);
    let mut args = ffmpeg_base_args();
    args.push("-i".to_string());
    args.push(path_arg(input));
    args.extend(strings(&["-frames", "1", "-q:v", "2", "-vf"]));
    args.push(format!(
        "yadif=1,select='not(mod(n\\,{}))',scale={}:-1,tile={}x{}",
        every_n_frames, request.tile_width, request.geometry.columns, request.geometry.rows
    ));
    args.push(path_arg(output));
    args
}

pub fn build_mosaic_args(tiles: &[PathBuf], dim: u32, output: &Path) -> Vec<String> {
    let dim = dim.max(1);
    let mut args: Vec<String> = tiles.iter().map(|tile| path_arg(tile)).collect();
    args.push("-geometry".to_string());
    args.push(format!("{}x{}+0+0", 350 / dim, 200 / dim));
    args.push("-tile".to_string());
    args.push(format!("{}x{}", dim, dim));
    args.extend(strings(&["-gravity", "center", "-background", "black"]));
    args.push(path_arg(output));
    args
}

pub fn build_transcode_args(input: &Path, flags: &str, recorded_date: &str, output: &Path) -> Vec<String> {
    let mut args = ffmpeg_base_args();
    args.push("-i".to_string());
    args.push(path_arg(input));
    args.extend(CONVERT_BASE_FLAGS.split_whitespace().map(str::to_string));
    args.extend(flags.split_whitespace().map(str::to_string));
    args.push("-metadata".to_string());
    args.push(format!("date={}", recorded_date));
    args.push(path_arg(output));
    args
}

pub fn build_concat_args(list_file: &Path, output: &Path) -> Vec<String> {
    let mut args = strings(&["-v", "error", "-y", "-f", "concat", "-safe", "0", "-i"]);
    args.push(path_arg(list_file));
    args.extend(strings(&["-c", "copy"]));
    args.push(path_arg(output));
    args
}
