//! Lazy metadata extraction over the media tool port

use std::path::Path;

use tracing::{debug, error};

use crate::domain::errors::DomainError;
use crate::domain::model::{MetaState, VideoMetadata};
use crate::ports::MediaToolPort;

use super::{parse_recorded_date, parse_stream_properties};

/// Fetches video metadata on first use and degrades to a fallback on bad output
pub struct MetaInfoExtractor<'a> {
    tools: &'a dyn MediaToolPort,
}

impl<'a> MetaInfoExtractor<'a> {
    pub fn new(tools: &'a dyn MediaToolPort) -> Self {
        Self { tools }
    }

    /// Return the cached record, probing only when `state` is still unfetched
    pub async fn resolve(
        &self,
        source: &Path,
        state: &mut MetaState,
    ) -> Result<VideoMetadata, DomainError> {
        if let MetaState::Fetched(meta) = state {
            return Ok(meta.clone());
        }
        let meta = self.fetch(source).await?;
        *state = MetaState::Fetched(meta.clone());
        Ok(meta)
    }

    /// Probe `source` unconditionally
    ///
    /// Only transport failures are returned as errors. Unparseable probe output
    /// is logged and replaced by [`VideoMetadata::fallback`].
    pub async fn fetch(&self, source: &Path) -> Result<VideoMetadata, DomainError> {
        let stream = self.tools.probe_stream(source).await?;
        let container = self.tools.probe_container(source).await?;
        let recorded_date = parse_recorded_date(&container.stdout);

        match parse_stream_properties(&stream.stdout, recorded_date.clone()) {
            Ok(meta) => {
                debug!(
                    "Probed {}: {}x{} @ {}fps, {} frames",
                    source.display(),
                    meta.width,
                    meta.height,
                    meta.fps,
                    meta.frames
                );
                Ok(meta)
            }
            Err(e) => {
                error!("parse failed inspecting response '{}': {}", source.display(), e);
                Ok(VideoMetadata::fallback(recorded_date))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{ScriptedTools, STREAM_1080P_10S};

    #[tokio::test]
    async fn test_resolve_probes_once() {
        let tools = ScriptedTools::new().with_stream(STREAM_1080P_10S);
        let extractor = MetaInfoExtractor::new(&tools);
        let mut state = MetaState::Unfetched;

        let first = extractor.resolve(Path::new("/v/a.mp4"), &mut state).await.unwrap();
        let second = extractor.resolve(Path::new("/v/a.mp4"), &mut state).await.unwrap();

        assert_eq!(first, second);
        assert_eq!(first.width, 1920);
        assert_eq!(first.duration(), 10);
        assert_eq!(first.recorded_date.as_deref(), Some("2021-07-14"));
        assert_eq!(tools.calls_to("probe_stream"), 1);
        assert_eq!(tools.calls_to("probe_container"), 1);
    }

    #[tokio::test]
    async fn test_garbage_output_falls_back() {
        let tools = ScriptedTools::new().with_stream("N/A\n");
        let meta = MetaInfoExtractor::new(&tools).fetch(Path::new("/v/a.mp4")).await.unwrap();

        assert_eq!((meta.width, meta.height, meta.fps, meta.frames), (100, 100, 30, 1));
        assert_eq!(meta.recorded_date.as_deref(), Some("2021-07-14"));
    }

    #[tokio::test]
    async fn test_transport_failure_is_returned() {
        let tools = ScriptedTools::new().unreachable();
        let err = MetaInfoExtractor::new(&tools)
            .fetch(Path::new("/v/a.mp4"))
            .await
            .unwrap_err();
        assert!(err.is_fatal());
    }
}
