//! Media probing: parses probe tool output into [`VideoMetadata`]

use chrono::NaiveDate;

use crate::domain::errors::DomainError;
use crate::domain::model::VideoMetadata;

pub mod inspector;

pub use inspector::MetaInfoExtractor;

/// Marker preceding the recording date in the container report
const RECORDED_DATE_KEY: &str = "Recorded date";

/// Parse the probe lines `width`, `height`, `aspect`, `num/den` rate, `frames`
pub fn parse_stream_properties(
    text: &str,
    recorded_date: Option<String>,
) -> Result<VideoMetadata, DomainError> {
    let lines: Vec<&str> = text.lines().map(str::trim).collect();
    let field = |index: usize, name: &str| -> Result<&str, DomainError> {
        lines
            .get(index)
            .copied()
            .filter(|value| !value.is_empty())
            .ok_or_else(|| DomainError::ParseFailed(format!("missing {} in probe output", name)))
    };

    let width = parse_number::<u32>(field(0, "width")?, "width")?;
    let height = parse_number::<u32>(field(1, "height")?, "height")?;
    let aspect_ratio = field(2, "aspect ratio")?;
    let fps = parse_frame_rate(field(3, "frame rate")?)?;
    let frames = parse_number::<u64>(field(4, "frame count")?, "frame count")?;

    VideoMetadata::new(width, height, fps, frames, aspect_ratio, recorded_date)
        .map_err(|e| DomainError::ParseFailed(e.to_string()))
}

fn parse_number<T: std::str::FromStr>(value: &str, name: &str) -> Result<T, DomainError> {
    value
        .parse::<T>()
        .map_err(|_| DomainError::ParseFailed(format!("invalid {}: '{}'", name, value)))
}

/// Whole frames per second from a rational such as `30000/1001`
pub fn parse_frame_rate(value: &str) -> Result<u32, DomainError> {
    let (num, den) = value
        .split_once('/')
        .ok_or_else(|| DomainError::ParseFailed(format!("invalid frame rate: '{}'", value)))?;
    let num = parse_number::<u64>(num, "frame rate numerator")?;
    let den = parse_number::<u64>(den, "frame rate denominator")?;
    if den == 0 {
        return Err(DomainError::ParseFailed(format!("invalid frame rate: '{}'", value)));
    }
    u32::try_from(num / den)
        .map_err(|_| DomainError::ParseFailed(format!("frame rate out of range: '{}'", value)))
}

/// Recording date from a mediainfo report, normalized to `YYYY-MM-DD` when possible
pub fn parse_recorded_date(text: &str) -> Option<String> {
    let (_, rest) = text.split_once(RECORDED_DATE_KEY)?;
    let mut tokens = rest.split_whitespace().skip_while(|token| *token == ":");
    let mut token = tokens.next()?;
    if token == "UTC" {
        token = tokens.next()?;
    }
    Some(normalize_date(token))
}

fn normalize_date(token: &str) -> String {
    ["%Y-%m-%d", "%Y/%m/%d", "%Y:%m:%d"]
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(token, format).ok())
        .map(|date| date.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| token.to_string())
}
