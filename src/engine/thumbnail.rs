//! Poster frame capture with a flat-frame retry

use std::path::Path;

use image::RgbImage;
use tracing::{debug, info, warn};

use crate::domain::errors::DomainError;
use crate::domain::model::LibraryAsset;
use crate::ports::MediaToolPort;
use crate::utils::format_file_size;

/// First capture position in seconds
pub const FIRST_OFFSET: u32 = 1;
/// Seconds skipped after a featureless frame
pub const OFFSET_STEP: u32 = 4;
/// Last offset tried before giving up
pub const MAX_OFFSET: u32 = 500;

/// Channel level at or below which a pixel counts as dark
pub const DARK_LEVEL: u8 = 50;
/// Frames with fewer dark regions than this are featureless
pub const MIN_DARK_REGIONS: usize = 20;

pub struct ThumbnailEngine<'a> {
    tools: &'a dyn MediaToolPort,
    /// Thumbnails are captured at twice the preview width
    preview_width: u32,
}

impl<'a> ThumbnailEngine<'a> {
    pub fn new(tools: &'a dyn MediaToolPort, preview_width: u32) -> Self {
        Self { tools, preview_width }
    }

    /// Capture the thumbnail of `asset`, returning the offset that was kept
    ///
    /// `Ok(None)` means every offset up to [`MAX_OFFSET`] gave a featureless
    /// frame or no frame at all. The last featureless capture is left in place
    /// as the thumbnail, so later runs treat the thumbnail as built and do not
    /// repeat the search; `--force` retries it.
    pub async fn generate(&self, asset: &LibraryAsset) -> Result<Option<u32>, DomainError> {
        let output = asset.thumbnail_path();
        let mut offset = FIRST_OFFSET;
        while offset <= MAX_OFFSET {
            let result = self
                .tools
                .capture_frame(asset.source(), offset, self.preview_width * 2, &output)
                .await?;
            if result.success && output.exists() {
                match is_uniform_image(&output) {
                    Ok(false) => {
                        let size = std::fs::metadata(&output).map(|m| m.len()).unwrap_or(0);
                        info!("Thumbnail size {} at {}s", format_file_size(size), offset);
                        return Ok(Some(offset));
                    }
                    Ok(true) => debug!("Featureless frame at {}s", offset),
                    Err(e) => warn!("Unreadable thumbnail at {}s: {}", offset, e),
                }
            }
            offset += OFFSET_STEP;
        }
        warn!(
            "Unable to find thumbnail for {}, keeping last frame",
            asset.source().display()
        );
        Ok(None)
    }
}

/// True when the image at `path` is flat: too few distinct dark shapes
pub fn is_uniform_image(path: &Path) -> Result<bool, DomainError> {
    let image = image::open(path)
        .map_err(|e| DomainError::ParseFailed(format!("{}: {}", path.display(), e)))?
        .to_rgb8();
    let regions = count_dark_regions(&image);
    debug!("Found {} black shapes", regions);
    Ok(regions < MIN_DARK_REGIONS)
}

/// Number of 8-connected regions of dark pixels
pub fn count_dark_regions(image: &RgbImage) -> usize {
    let (width, height) = image.dimensions();
    let (w, h) = (width as usize, height as usize);
    let mut dark: Vec<bool> = image
        .pixels()
        .map(|pixel| pixel.0.iter().all(|channel| *channel <= DARK_LEVEL))
        .collect();

    let mut regions = 0;
    let mut stack = Vec::new();
    for start in 0..dark.len() {
        if !dark[start] {
            continue;
        }
        regions += 1;
        dark[start] = false;
        stack.push(start);
        while let Some(index) = stack.pop() {
            let (x, y) = (index % w, index / w);
            for ny in y.saturating_sub(1)..=(y + 1).min(h - 1) {
                for nx in x.saturating_sub(1)..=(x + 1).min(w - 1) {
                    let neighbour = ny * w + nx;
                    if dark[neighbour] {
                        dark[neighbour] = false;
                        stack.push(neighbour);
                    }
                }
            }
        }
    }
    regions
}
