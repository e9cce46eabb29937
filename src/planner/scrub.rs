//! Scrub sprite geometry
//!
//! A scrub sprite is one JPEG holding `columns x rows` frames of the video.
//! JPEG caps each dimension at 65500 pixels, so the column count is bounded by
//! what fits at the requested tile width, with a 5% margin.

use tracing::debug;

use crate::domain::model::{ScrubGeometry, VideoMetadata};

/// Largest JPEG dimension in pixels
pub const JPEG_MAX_DIMENSION: u32 = 65500;
/// Share of the JPEG ceiling the sprite may use
pub const CEILING_MARGIN: f64 = 0.95;
/// Videos shorter than this get a single tile
pub const MIN_SCRUB_SECONDS: u64 = 2;
/// Fixed sampling cadence of the sprite
pub const SAMPLE_INTERVAL_SECONDS: u64 = 1;

/// Columns that fit in the ceiling at `tile_width`
pub fn max_supported_columns(tile_width: u32) -> u32 {
    let max = (f64::from(JPEG_MAX_DIMENSION) / f64::from(tile_width.max(1))) * CEILING_MARGIN;
    (max as u32).max(1)
}

/// Share of the column bound used for a video of `duration` seconds
pub fn density_factor(duration: u64) -> f64 {
    match duration {
        d if d >= 40 * 60 => 1.0,
        d if d >= 20 * 60 => 0.8,
        d if d >= 10 * 60 => 0.5,
        _ => 0.25,
    }
}

/// Compute the sprite grid for `meta` at `tile_width` pixels per tile
pub fn scrub_geometry(meta: &VideoMetadata, tile_width: u32) -> ScrubGeometry {
    let duration = meta.duration();
    if duration < MIN_SCRUB_SECONDS {
        return ScrubGeometry {
            interval_seconds: (meta.frames / 2).max(1),
            columns: 1,
            rows: 1,
        };
    }

    let max_supported = max_supported_columns(tile_width);
    let column_bound = f64::from(max_supported) * density_factor(duration);
    let sampled_interval = (meta.frames as f64 / column_bound) as u64;

    // The density-derived cadence is superseded by a fixed one; VTT timing relies on it.
    let mut interval = SAMPLE_INTERVAL_SECONDS;
    let mut dim = square_dimension(duration, interval);
    if dim > max_supported {
        dim = max_supported;
        let tiles = u64::from(dim) * u64::from(dim);
        interval = duration.div_ceil(tiles);
    }

    debug!(
        "desired snapshots = {}s, sampled every {} frames, using {}s interval on {}x{} grid",
        duration, sampled_interval, interval, dim, dim
    );

    ScrubGeometry {
        interval_seconds: interval,
        columns: dim,
        rows: dim,
    }
}

/// `ceil(sqrt(duration / interval))`
fn square_dimension(duration: u64, interval: u64) -> u32 {
    let samples = duration as f64 / interval as f64;
    (samples.sqrt().ceil() as u32).max(1)
}

/// One VTT cue pointing at a tile of the sprite
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScrubCue {
    pub index: u32,
    pub start_ms: u64,
    pub end_ms: u64,
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

/// Cues for every tile of `geometry`
///
/// Numbering starts at 1 and stops before `columns * rows`, so the final tile
/// has no cue. Players have relied on this layout, so it is kept.
pub fn plan_cues(geometry: &ScrubGeometry, tile_width: u32, tile_height: u32) -> Vec<ScrubCue> {
    let interval_ms = geometry.interval_seconds * 1000;
    let columns = geometry.columns.max(1);
    (1..geometry.tile_count())
        .map(|index| {
            let tile = index - 1;
            let start_ms = u64::from(tile) * interval_ms;
            ScrubCue {
                index,
                start_ms,
                end_ms: start_ms + interval_ms,
                x: (tile % columns) * tile_width,
                y: (tile / columns) * tile_height,
                width: tile_width,
                height: tile_height,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn meta(fps: u32, frames: u64) -> VideoMetadata {
        VideoMetadata::new(1920, 1080, fps, frames, "16:9", None).unwrap()
    }

    #[test]
    fn ten_second_video_gets_four_by_four() {
        let geometry = scrub_geometry(&meta(30, 300), 160);
        assert_eq!(
            geometry,
            ScrubGeometry { interval_seconds: 1, columns: 4, rows: 4 }
        );
    }

    #[test]
    fn short_clips_get_single_tile() {
        let zero = scrub_geometry(&meta(30, 0), 160);
        assert_eq!(zero, ScrubGeometry { interval_seconds: 1, columns: 1, rows: 1 });

        let one_second = scrub_geometry(&meta(30, 59), 160);
        assert_eq!(one_second.columns, 1);
        assert_eq!(one_second.rows, 1);
        assert_eq!(one_second.interval_seconds, 29);
    }

    #[test]
    fn square_grid_follows_duration() {
        for seconds in [2u64, 3, 17, 100, 599, 601, 3600] {
            let geometry = scrub_geometry(&meta(25, seconds * 25), 160);
            let expected = (seconds as f64).sqrt().ceil() as u32;
            assert_eq!(geometry.columns, expected, "duration {}", seconds);
            assert_eq!(geometry.rows, expected);
            assert_eq!(geometry.interval_seconds, 1);
        }
    }

    #[test]
    fn columns_never_exceed_ceiling() {
        let ceiling = f64::from(JPEG_MAX_DIMENSION) * CEILING_MARGIN;
        for width in [160u32, 640, 2000, 8000] {
            for seconds in [5u64, 600, 7200, 200_000] {
                let geometry = scrub_geometry(&meta(30, seconds * 30), width);
                assert!(f64::from(geometry.columns * width) <= ceiling, "width {} duration {}", width, seconds);
                let covered = u64::from(geometry.tile_count()) * geometry.interval_seconds;
                assert!(covered >= seconds);
            }
        }
    }

    #[test]
    fn density_factor_scales_with_duration() {
        assert_eq!(density_factor(9 * 60), 0.25);
        assert_eq!(density_factor(10 * 60), 0.5);
        assert_eq!(density_factor(20 * 60), 0.8);
        assert_eq!(density_factor(40 * 60), 1.0);
    }

    #[test]
    fn max_columns_for_default_width() {
        assert_eq!(max_supported_columns(160), 388);
        assert_eq!(max_supported_columns(100_000), 1);
    }

    #[test]
    fn cue_count_is_one_short_of_grid() {
        let geometry = ScrubGeometry { interval_seconds: 1, columns: 4, rows: 4 };
        let cues = plan_cues(&geometry, 160, 90);
        assert_eq!(cues.len(), 15);
        assert_eq!(cues.first().unwrap().index, 1);
        assert_eq!(cues.last().unwrap().index, 15);
    }

    #[test]
    fn cues_walk_tiles_row_by_row() {
        let geometry = ScrubGeometry { interval_seconds: 1, columns: 4, rows: 4 };
        let cues = plan_cues(&geometry, 160, 90);
        assert_eq!((cues[0].x, cues[0].y, cues[0].start_ms, cues[0].end_ms), (0, 0, 0, 1000));
        assert_eq!((cues[3].x, cues[3].y), (480, 0));
        assert_eq!((cues[4].x, cues[4].y, cues[4].start_ms), (0, 90, 4000));
        assert_eq!((cues[14].x, cues[14].y), (320, 270));
    }

    #[test]
    fn single_tile_grid_has_no_cues() {
        let geometry = ScrubGeometry { interval_seconds: 1, columns: 1, rows: 1 };
        assert!(plan_cues(&geometry, 160, 90).is_empty());
    }
}
