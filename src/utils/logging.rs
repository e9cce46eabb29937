//! Logging initialization

use std::str::FromStr;

use tracing_subscriber::EnvFilter;

use crate::error::{TubizeError, TubizeResult};

/// Check that `level` names a tracing level
pub fn parse_level(level: &str) -> TubizeResult<tracing::Level> {
    tracing::Level::from_str(level)
        .map_err(|_| TubizeError::config(format!("unknown log level '{}'", level)))
}

/// Install the global subscriber
///
/// `RUST_LOG` wins over `level`. With `json` set every event is emitted as
/// one JSON object per line. Output goes to stderr so command output on
/// stdout stays clean.
pub fn init_logging(level: &str, json: bool) -> TubizeResult<()> {
    let level = parse_level(level)?;
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level.as_str().to_lowercase()));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr);

    let installed = if json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
    installed.map_err(|e| TubizeError::Logging { message: e.to_string() })
}
