//! Timeline scrub sprite and its VTT track

use tracing::info;

use crate::domain::errors::DomainError;
use crate::domain::model::{LibraryAsset, ScrubGeometry, VideoMetadata};
use crate::output::vtt::write_vtt;
use crate::planner::scrub::{plan_cues, scrub_geometry};
use crate::ports::{MediaToolPort, SpriteRequest};
use crate::utils::format_file_size;

pub struct ScrubEngine<'a> {
    tools: &'a dyn MediaToolPort,
    tile_width: u32,
}

impl<'a> ScrubEngine<'a> {
    pub fn new(tools: &'a dyn MediaToolPort, tile_width: u32) -> Self {
        Self { tools, tile_width }
    }

    /// Render the sprite, then write the VTT describing its tiles
    pub async fn generate(
        &self,
        asset: &LibraryAsset,
        meta: &VideoMetadata,
    ) -> Result<ScrubGeometry, DomainError> {
        let geometry = scrub_geometry(meta, self.tile_width);
        let request = SpriteRequest {
            geometry,
            fps: meta.fps,
            tile_width: self.tile_width,
        };
        let sprite = asset.scrub_path();
        let result = self
            .tools
            .render_scrub_sprite(asset.source(), &request, &sprite)
            .await?;
        if !result.success || !sprite.exists() {
            return Err(DomainError::ToolFailed(format!(
                "scrub sprite failed for {}: {}",
                asset.source().display(),
                result.stderr.trim()
            )));
        }
        let size = std::fs::metadata(&sprite).map(|m| m.len()).unwrap_or(0);
        info!(
            "Timeline size {} for {}x{}",
            format_file_size(size),
            geometry.columns,
            geometry.rows
        );

        let cues = plan_cues(&geometry, self.tile_width, meta.scaled_height(self.tile_width));
        write_vtt(&asset.vtt_path(), &asset.scrub_uri(), &cues)?;
        Ok(geometry)
    }
}
