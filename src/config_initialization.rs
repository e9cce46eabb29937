//! Configuration initialization and hierarchy management

use std::path::{Path, PathBuf};

use crate::adapters::toml_config::{SettingsLayer, TomlConfigAdapter};
use crate::app::library_interactor::{LibraryOptions, DEFAULT_PREVIEW_WIDTH};
use crate::cli::{Cli, Commands};
use crate::error::{TubizeError, TubizeResult};
use crate::planner::scene::DEFAULT_STEP;
use crate::utils::logging::parse_level;

pub const DEFAULT_LOG_LEVEL: &str = "info";

const SCENE_RANGE: std::ops::RangeInclusive<i32> = 1..=999;
const WIDTH_RANGE: std::ops::RangeInclusive<u32> = 16..=4096;

/// Settings after every layer has been applied
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub scene_detection: i32,
    pub preview_width: u32,
    pub force: bool,
    pub log_level: String,
    /// Config file the settings were read from, if any
    pub config_file: Option<PathBuf>,
}

impl Settings {
    /// Library options for the `library` command, honoring its artifact toggles
    pub fn library_options(&self, cli: &Cli) -> LibraryOptions {
        let mut options = LibraryOptions {
            scene_detection: self.scene_detection,
            preview_width: self.preview_width,
            force: self.force,
            ..LibraryOptions::default()
        };
        if let Commands::Library(args) = &cli.command {
            options.thumbnail = !args.no_thumbnail;
            options.animated_preview = !args.no_animated_preview;
            options.scrub = !args.no_video_timeline_scrub;
        }
        options
    }
}

/// Resolve settings with precedence CLI > Env > File > Defaults
///
/// `base_dir` is where default config files are looked up and `env` reads
/// environment variables, so callers can substitute both in tests.
pub fn initialize_configuration_hierarchy<F>(
    cli: &Cli,
    base_dir: &Path,
    env: F,
) -> TubizeResult<Settings>
where
    F: Fn(&str) -> Option<String>,
{
    let (config_file, file_layer) = load_config_file(cli.config.as_deref(), base_dir)?;
    let env_layer = TomlConfigAdapter::from_env(env).map_err(|e| TubizeError::config(e.to_string()))?;
    let cli_layer = cli_overrides(cli);

    let merged = cli_layer.over(env_layer).over(file_layer);
    let settings = Settings {
        scene_detection: merged.scene_detection.unwrap_or(DEFAULT_STEP),
        preview_width: merged.preview_width.unwrap_or(DEFAULT_PREVIEW_WIDTH),
        force: merged.force.unwrap_or(false),
        log_level: merged.log_level.unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string()),
        config_file,
    };
    validate(&settings)?;
    Ok(settings)
}

fn load_config_file(
    explicit: Option<&Path>,
    base_dir: &Path,
) -> TubizeResult<(Option<PathBuf>, SettingsLayer)> {
    let path = match explicit {
        Some(path) if !path.is_file() => {
            return Err(TubizeError::config(format!(
                "config file not found: {}",
                path.display()
            )))
        }
        Some(path) => path.to_path_buf(),
        None => match TomlConfigAdapter::discover(base_dir) {
            Some(path) => path,
            None => return Ok((None, SettingsLayer::default())),
        },
    };
    let layer = TomlConfigAdapter::load(&path).map_err(|e| TubizeError::config(e.to_string()))?;
    Ok((Some(path), layer))
}

fn cli_overrides(cli: &Cli) -> SettingsLayer {
    let mut layer = SettingsLayer {
        log_level: cli.log_level.clone(),
        ..SettingsLayer::default()
    };
    if let Commands::Library(args) = &cli.command {
        layer.scene_detection = args.scene;
        layer.preview_width = args.width;
        // an absent --force leaves the lower layers in charge
        layer.force = args.force.then_some(true);
    }
    layer
}

fn validate(settings: &Settings) -> TubizeResult<()> {
    if !SCENE_RANGE.contains(&settings.scene_detection) {
        return Err(TubizeError::config(format!(
            "scene_detection must be within 1..=999, got {}",
            settings.scene_detection
        )));
    }
    if !WIDTH_RANGE.contains(&settings.preview_width) {
        return Err(TubizeError::config(format!(
            "preview_width must be within 16..=4096, got {}",
            settings.preview_width
        )));
    }
    parse_level(&settings.log_level)?;
    Ok(())
}
