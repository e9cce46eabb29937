// Unit tests for domain models

#[cfg(test)]
mod tests {
    use crate::domain::errors::*;
    use crate::domain::model::*;
    use std::path::PathBuf;

    fn sample_asset() -> LibraryAsset {
        LibraryAsset::with_size("/videos/holiday/beach_trip.mp4", 1024)
    }

    #[test]
    fn test_duration_rounds_down() {
        let meta = VideoMetadata::new(1920, 1080, 30, 300, "16:9", None).unwrap();
        assert_eq!(meta.duration(), 10);

        let meta = VideoMetadata::new(1920, 1080, 30, 329, "16:9", None).unwrap();
        assert_eq!(meta.duration(), 10);
    }

    #[test]
    fn test_metadata_rejects_zero_values() {
        assert!(matches!(
            VideoMetadata::new(0, 1080, 30, 300, "16:9", None),
            Err(DomainError::BadArgs(_))
        ));
        assert!(matches!(
            VideoMetadata::new(1920, 1080, 0, 300, "16:9", None),
            Err(DomainError::BadArgs(_))
        ));
    }

    #[test]
    fn test_fallback_record_keeps_recorded_date() {
        let meta = VideoMetadata::fallback(Some("2020-01-02".to_string()));
        assert_eq!(meta.width, 100);
        assert_eq!(meta.height, 100);
        assert_eq!(meta.fps, 30);
        assert_eq!(meta.frames, 1);
        assert_eq!(meta.duration(), 0);
        assert_eq!(meta.recorded_date.as_deref(), Some("2020-01-02"));
    }

    #[test]
    fn test_scaled_height() {
        let meta = VideoMetadata::new(1920, 1080, 30, 300, "16:9", None).unwrap();
        assert_eq!(meta.scaled_height(160), 90);
    }

    #[test]
    fn test_meta_state_starts_unfetched() {
        let asset = sample_asset();
        assert_eq!(asset.metadata, MetaState::Unfetched);
        assert!(asset.metadata.get().is_none());
        assert!(!asset.updated);
    }

    #[test]
    fn test_asset_group_and_uri() {
        let asset = sample_asset();
        assert_eq!(asset.name(), "beach_trip");
        assert_eq!(asset.group(), "holiday");
        assert_eq!(asset.uri(), "holiday/beach_trip");
        assert_eq!(asset.file_size(), 1024);
    }

    #[test]
    fn test_preview_paths_mirror_parent_folder() {
        let asset = sample_asset();
        let dir = PathBuf::from("/videos/.preview/holiday");
        assert_eq!(asset.preview_dir(), dir);
        assert_eq!(asset.thumbnail_path(), dir.join("beach_trip.mp4.thumb.jpg"));
        assert_eq!(asset.webp_path(), dir.join("beach_trip.mp4.webp"));
        assert_eq!(asset.webp_ignore_path(), dir.join("beach_trip.mp4.webp.ignore"));
        assert_eq!(asset.scrub_path(), dir.join("beach_trip.mp4.jpg"));
        assert_eq!(asset.vtt_path(), dir.join("beach_trip.mp4.vtt"));
        assert_eq!(asset.meta_path(), dir.join("beach_trip.mp4.json"));
        assert_eq!(asset.scrub_uri(), "beach_trip.mp4.jpg");
    }

    #[test]
    fn test_asset_new_requires_existing_file() {
        let result = LibraryAsset::new("/definitely/not/here.mp4");
        assert!(matches!(result, Err(DomainError::FileNotFound(_))));
    }

    #[test]
    fn test_tile_count() {
        let geometry = ScrubGeometry {
            interval_seconds: 1,
            columns: 4,
            rows: 4,
        };
        assert_eq!(geometry.tile_count(), 16);
    }

    #[test]
    fn test_transport_errors_are_fatal() {
        assert!(DomainError::ToolUnavailable("ffmpeg".to_string()).is_fatal());
        assert!(!DomainError::ToolFailed("ffmpeg".to_string()).is_fatal());
        assert!(!DomainError::ParseFailed("x".to_string()).is_fatal());
    }
}
