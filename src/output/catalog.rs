//! Library catalog: assets grouped by folder, plus group mosaics

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::domain::errors::DomainError;
use crate::domain::model::{LibraryAsset, VideoMetadata};
use crate::domain::rules::{CatalogPolicy, FilenameTags};

/// Largest mosaic grid side
pub const MAX_MOSAIC_DIM: u32 = 5;

/// One asset as listed in the catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogEntry {
    #[serde(rename = "_")]
    pub uri: String,
    pub title: String,
    pub description: String,
    pub tags: Vec<String>,
    pub duration: u64,
    #[serde(skip)]
    pub file_size: u64,
    #[serde(skip)]
    pub thumbnail: PathBuf,
}

impl CatalogEntry {
    pub fn new(asset: &LibraryAsset, meta: &VideoMetadata) -> Self {
        let tags = FilenameTags::from_path(asset.source());
        Self {
            uri: asset.uri(),
            title: tags.title(),
            description: tags.description(),
            tags: tags.keywords().to_vec(),
            duration: meta.duration(),
            file_size: asset.file_size(),
            thumbnail: asset.thumbnail_path(),
        }
    }
}

/// Assets of one folder
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CatalogGroup {
    pub assets: Vec<CatalogEntry>,
    pub thumbnail: String,
}

impl CatalogGroup {
    /// Sum of the asset durations, in seconds
    pub fn time(&self) -> u64 {
        self.assets.iter().map(|entry| entry.duration).sum()
    }

    /// Thumbnails feeding the mosaic
    pub fn tiles(&self) -> Vec<PathBuf> {
        self.assets.iter().map(|entry| entry.thumbnail.clone()).collect()
    }
}

#[derive(Serialize)]
struct GroupView<'a> {
    assets: &'a [CatalogEntry],
    time: u64,
    thumbnail: &'a str,
}

/// Group name to group; serializes to the catalog JSON layout
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Catalog {
    groups: BTreeMap<String, CatalogGroup>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `asset` to its group; returns false when the asset is excluded
    pub fn append(&mut self, asset: &LibraryAsset, meta: &VideoMetadata) -> bool {
        if CatalogPolicy::is_excluded(asset.source()) {
            return false;
        }
        self.groups
            .entry(asset.group())
            .or_default()
            .assets
            .push(CatalogEntry::new(asset, meta));
        true
    }

    pub fn groups(&self) -> &BTreeMap<String, CatalogGroup> {
        &self.groups
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Point every group at `<catalog>.<group>.jpeg`, returning (group, mosaic path)
    pub fn assign_mosaics(&mut self, catalog_path: &Path) -> Vec<(String, PathBuf)> {
        self.groups
            .iter_mut()
            .map(|(name, group)| {
                let path = mosaic_path(catalog_path, name);
                group.thumbnail = path.to_string_lossy().to_string();
                (name.clone(), path)
            })
            .collect()
    }

    pub fn to_json(&self) -> Result<String, DomainError> {
        let view: BTreeMap<&str, GroupView<'_>> = self
            .groups
            .iter()
            .map(|(name, group)| {
                (
                    name.as_str(),
                    GroupView {
                        assets: &group.assets,
                        time: group.time(),
                        thumbnail: &group.thumbnail,
                    },
                )
            })
            .collect();
        serde_json::to_string_pretty(&view)
            .map_err(|e| DomainError::InternalError(format!("JSON serialization failed: {}", e)))
    }
}

/// Library-wide totals, derived from the groups on demand
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CatalogStats {
    pub total_duration: u64,
    pub total_file_size: u64,
    pub asset_count: usize,
}

impl CatalogStats {
    pub fn compute(catalog: &Catalog) -> Self {
        catalog
            .groups()
            .values()
            .flat_map(|group| group.assets.iter())
            .fold(Self::default(), |stats, entry| Self {
                total_duration: stats.total_duration + entry.duration,
                total_file_size: stats.total_file_size + entry.file_size,
                asset_count: stats.asset_count + 1,
            })
    }
}

/// `<catalog>.<group>.jpeg`
pub fn mosaic_path(catalog_path: &Path, group: &str) -> PathBuf {
    PathBuf::from(format!("{}.{}.jpeg", catalog_path.display(), group))
}

/// Largest square grid no bigger than 5x5 that `count` thumbnails fill
pub fn mosaic_dim(count: usize) -> Option<u32> {
    (1..=MAX_MOSAIC_DIM)
        .rev()
        .find(|dim| (*dim as usize) * (*dim as usize) <= count)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn asset(path: &str, size: u64) -> LibraryAsset {
        LibraryAsset::with_size(path, size)
    }

    fn meta(frames: u64) -> VideoMetadata {
        VideoMetadata::new(640, 360, 25, frames, "16:9", None).unwrap()
    }

    #[test]
    fn groups_assets_by_folder() {
        let mut catalog = Catalog::new();
        assert!(catalog.append(&asset("/lib/holiday/beach_trip.mp4", 100), &meta(250)));
        assert!(catalog.append(&asset("/lib/holiday/mountain_hike.mp4", 200), &meta(500)));
        assert!(catalog.append(&asset("/lib/family/birthday_party.mp4", 300), &meta(1000)));

        let groups = catalog.groups();
        assert_eq!(groups.len(), 2);
        assert_eq!(groups["holiday"].assets.len(), 2);
        assert_eq!(groups["holiday"].time(), 30);
        assert_eq!(groups["family"].assets[0].uri, "family/birthday_party");
    }

    #[test]
    fn underscore_folders_and_spaces_are_excluded() {
        let mut catalog = Catalog::new();
        assert!(!catalog.append(&asset("/lib/_drafts/clip.mp4", 1), &meta(25)));
        assert!(!catalog.append(&asset("/lib/holiday/my clip.mp4", 1), &meta(25)));
        assert!(catalog.is_empty());
    }

    #[test]
    fn totals_do_not_depend_on_order() {
        let inputs = [
            ("/lib/a/one.mp4", 10u64, 250u64),
            ("/lib/b/two.mp4", 20, 260),
            ("/lib/a/three.mp4", 30, 24),
        ];
        let mut forward = Catalog::new();
        for (path, size, frames) in inputs {
            forward.append(&asset(path, size), &meta(frames));
        }
        let mut backward = Catalog::new();
        for (path, size, frames) in inputs.iter().rev() {
            backward.append(&asset(path, *size), &meta(*frames));
        }

        let stats = CatalogStats::compute(&forward);
        assert_eq!(stats, CatalogStats::compute(&backward));
        assert_eq!(stats.total_duration, 10 + 10);
        assert_eq!(stats.total_file_size, 60);
        assert_eq!(stats.asset_count, 3);
    }

    #[test]
    fn serializes_group_layout() {
        let mut catalog = Catalog::new();
        catalog.append(&asset("/lib/holiday/beach_trip.mp4", 1), &meta(250));
        catalog.assign_mosaics(Path::new("/lib/catalog.json"));

        let json: serde_json::Value = serde_json::from_str(&catalog.to_json().unwrap()).unwrap();
        let group = &json["holiday"];
        assert_eq!(group["time"], 10);
        assert_eq!(group["thumbnail"], "/lib/catalog.json.holiday.jpeg");
        let entry = &group["assets"][0];
        assert_eq!(entry["_"], "holiday/beach_trip");
        assert_eq!(entry["title"], "Beach Trip");
        assert_eq!(entry["description"], "beach trip");
        assert_eq!(entry["tags"], serde_json::json!(["beach", "trip"]));
        assert_eq!(entry["duration"], 10);
        assert!(entry.get("file_size").is_none());
    }

    #[test]
    fn mosaic_dim_is_largest_filled_square() {
        assert_eq!(mosaic_dim(0), None);
        assert_eq!(mosaic_dim(1), Some(1));
        assert_eq!(mosaic_dim(3), Some(1));
        assert_eq!(mosaic_dim(4), Some(2));
        assert_eq!(mosaic_dim(24), Some(4));
        assert_eq!(mosaic_dim(25), Some(5));
        assert_eq!(mosaic_dim(400), Some(5));
    }
}
