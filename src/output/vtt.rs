//! WebVTT thumbnail track for the scrub sprite

use std::fmt::Write as _;
use std::path::Path;

use crate::domain::errors::DomainError;
use crate::planner::scrub::ScrubCue;

/// `HH:MM:SS.mmm`; hours are not wrapped
pub fn timecode(ms: u64) -> String {
    format!(
        "{:02}:{:02}:{:02}.{:03}",
        ms / 3_600_000,
        (ms / 60_000) % 60,
        (ms / 1000) % 60,
        ms % 1000
    )
}

/// Render a VTT document pointing every cue at a region of `image_uri`
pub fn render_vtt(image_uri: &str, cues: &[ScrubCue]) -> String {
    let mut vtt = String::from("WEBVTT\n\n");
    for cue in cues {
        // Writing into a String cannot fail
        let _ = write!(
            vtt,
            "{}\n{} --> {}\n{}#xywh={},{},{},{}\n\n",
            cue.index,
            timecode(cue.start_ms),
            timecode(cue.end_ms),
            image_uri,
            cue.x,
            cue.y,
            cue.width,
            cue.height
        );
    }
    vtt
}

pub fn write_vtt(path: &Path, image_uri: &str, cues: &[ScrubCue]) -> Result<(), DomainError> {
    std::fs::write(path, render_vtt(image_uri, cues))?;
    Ok(())
}
