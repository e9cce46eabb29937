//! CLI module for tubize
//!
//! This module handles command-line argument parsing and command execution.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub mod args;
pub mod commands;

pub use args::{ConvertArgs, InspectArgs, JoinArgs, LibraryArgs};

/// tubize video library previewer
///
/// Walks a directory of videos and builds thumbnails, animated previews,
/// timeline scrub sprites and a JSON catalog next to them.
#[derive(Parser, Debug)]
#[command(name = "tubize")]
#[command(about = "tubize - Preview artifacts and a catalog for a video library")]
#[command(version)]
#[command(long_about = None)]
pub struct Cli {
    /// Logging level (trace, debug, info, warn, error)
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Emit log events as JSON lines
    #[arg(long, global = true)]
    pub json_logs: bool,

    /// Configuration file (default: tubize.toml or config/tubize.toml)
    #[arg(long, global = true, env = "TUBIZE_CONFIG")]
    pub config: Option<PathBuf>,

    /// The command to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Build preview artifacts and the catalog for a video library
    Library(LibraryArgs),
    /// Inspect video file information
    Inspect(InspectArgs),
    /// Convert raw captures to MP4
    Convert(ConvertArgs),
    /// Join AVI captures into dated segments
    Join(JoinArgs),
}

impl Commands {
    pub fn name(&self) -> &'static str {
        match self {
            Commands::Library(_) => "library",
            Commands::Inspect(_) => "inspect",
            Commands::Convert(_) => "convert",
            Commands::Join(_) => "join",
        }
    }
}
