//! Grouping of consecutive AVI recordings into joinable segments

use std::path::PathBuf;

use tracing::{info, warn};

/// Date used when no file in the run carried one
pub const UNDATED: &str = "undated";

/// Probe facts for one input of the join
#[derive(Debug, Clone, PartialEq)]
pub struct JoinInput {
    pub path: PathBuf,
    pub recorded_date: Option<String>,
    pub aspect_ratio: String,
}

/// Files concatenated into one output
#[derive(Debug, Clone, PartialEq)]
pub struct Segment {
    pub date: String,
    pub index: usize,
    pub files: Vec<PathBuf>,
}

impl Segment {
    /// `<prefix>_<date>_<index>.avi`
    pub fn output_name(&self, prefix: &str) -> String {
        format!("{}_{}_{}.avi", prefix, self.date, self.index)
    }
}

/// Split sorted `inputs` wherever the aspect ratio or recording date changes
///
/// A file without a date inherits the date of the file before it.
pub fn plan_segments(inputs: &[JoinInput]) -> Vec<Segment> {
    let mut segments = Vec::new();
    let mut group: Vec<PathBuf> = Vec::new();
    let mut previous_date: Option<String> = None;
    let mut previous_aspect: Option<&str> = None;

    for input in inputs {
        let date = match &input.recorded_date {
            Some(date) => Some(date.clone()),
            None => {
                warn!("No recorded date for {}, reusing previous", input.path.display());
                previous_date.clone()
            }
        };
        info!(
            "{} - {} - {}",
            input.path.display(),
            date.as_deref().unwrap_or(UNDATED),
            input.aspect_ratio
        );

        let aspect_changed = previous_aspect.is_some_and(|aspect| aspect != input.aspect_ratio);
        let date_changed = previous_aspect.is_some() && previous_date != date;
        if (aspect_changed || date_changed) && !group.is_empty() {
            segments.push(Segment {
                date: previous_date.clone().unwrap_or_else(|| UNDATED.to_string()),
                index: segments.len(),
                files: std::mem::take(&mut group),
            });
        }

        previous_aspect = Some(&input.aspect_ratio);
        previous_date = date;
        group.push(input.path.clone());
    }

    if !group.is_empty() {
        segments.push(Segment {
            date: previous_date.unwrap_or_else(|| UNDATED.to_string()),
            index: segments.len(),
            files: group,
        });
    }
    segments
}

/// Body of an ffmpeg concat demuxer list
///
/// Single quotes inside a path are closed, escaped and reopened (`'\''`).
pub fn concat_list(files: &[PathBuf]) -> String {
    files
        .iter()
        .map(|file| format!("file '{}'\n", file.display().to_string().replace('\'', r"'\''")))
        .collect()
}
