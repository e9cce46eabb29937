//! Command-line argument definitions

use std::path::PathBuf;

use clap::Args;
use clap_num::number_range;

use crate::app::batch_interactor::DEFAULT_CONVERT_EXTENSION;

fn scene_sensitivity(s: &str) -> Result<i32, String> {
    number_range(s, 1, 999)
}

fn preview_width(s: &str) -> Result<u32, String> {
    number_range(s, 16, 4096)
}

/// Arguments for the library command
#[derive(Args, Debug)]
pub struct LibraryArgs {
    /// Library root directory
    #[arg(short, long)]
    pub input: PathBuf,

    /// Initial scene detection sensitivity in permille (1-999)
    #[arg(long, value_parser = scene_sensitivity)]
    pub scene: Option<i32>,

    /// Preview width in pixels (16-4096)
    #[arg(short = 'w', long, value_parser = preview_width)]
    pub width: Option<u32>,

    /// Rebuild artifacts that already exist
    #[arg(long)]
    pub force: bool,

    /// Skip thumbnail generation
    #[arg(long)]
    pub no_thumbnail: bool,

    /// Skip animated preview generation
    #[arg(long)]
    pub no_animated_preview: bool,

    /// Skip timeline scrub sprite and captions
    #[arg(long)]
    pub no_video_timeline_scrub: bool,
}

/// Arguments for the inspect command
#[derive(Args, Debug)]
pub struct InspectArgs {
    /// Input video file path
    #[arg(short, long)]
    pub input: PathBuf,

    /// Output format
    #[arg(long, default_value = "text", value_parser = ["text", "json", "yaml"])]
    pub format: String,
}

/// Arguments for the convert command
#[derive(Args, Debug)]
pub struct ConvertArgs {
    /// Video file, or directory searched recursively
    #[arg(short, long)]
    pub input: PathBuf,

    /// Extension converted when the input is a directory
    #[arg(short = 'x', long, default_value = DEFAULT_CONVERT_EXTENSION)]
    pub ext: String,
}

/// Arguments for the join command
#[derive(Args, Debug)]
pub struct JoinArgs {
    /// Directory holding the AVI captures
    #[arg(short, long)]
    pub input: PathBuf,

    /// Prefix of the joined file names
    #[arg(long, default_value = "joined")]
    pub prefix: String,

    /// Directory the joined files are written to
    #[arg(short, long, default_value = ".")]
    pub output_dir: PathBuf,
}
