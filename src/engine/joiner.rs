//! Concatenation of AVI captures into dated segments

use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::domain::errors::DomainError;
use crate::planner::segments::{concat_list, plan_segments, JoinInput};
use crate::ports::MediaToolPort;
use crate::probe::MetaInfoExtractor;
use crate::utils::list_directory;

pub struct VideoJoiner<'a> {
    tools: &'a dyn MediaToolPort,
}

impl<'a> VideoJoiner<'a> {
    pub fn new(tools: &'a dyn MediaToolPort) -> Self {
        Self { tools }
    }

    /// Join the `*.avi` files of `dir` into `<prefix>_<date>_<n>.avi` files in `output_dir`
    pub async fn join_directory(
        &self,
        dir: &Path,
        prefix: &str,
        output_dir: &Path,
    ) -> Result<Vec<PathBuf>, DomainError> {
        let files = list_directory(dir, "avi")?;
        if files.is_empty() {
            return Err(DomainError::FileNotFound(format!(
                "No matching files found in {}",
                dir.display()
            )));
        }
        info!("Found files {}", files.len());

        let extractor = MetaInfoExtractor::new(self.tools);
        let mut inputs = Vec::with_capacity(files.len());
        for path in files {
            let meta = extractor.fetch(&path).await?;
            inputs.push(JoinInput {
                path,
                recorded_date: meta.recorded_date,
                aspect_ratio: meta.aspect_ratio,
            });
        }

        let mut outputs = Vec::new();
        for segment in plan_segments(&inputs) {
            let output = output_dir.join(segment.output_name(prefix));
            let mut list = tempfile::Builder::new().prefix("concat").suffix(".txt").tempfile()?;
            list.write_all(concat_list(&segment.files).as_bytes())?;
            list.flush()?;

            info!("Creating {} - from {} files", output.display(), segment.files.len());
            let result = self.tools.concat(list.path(), &output).await?;
            if !result.success {
                return Err(DomainError::ToolFailed(format!(
                    "concat into {} failed: {}",
                    output.display(),
                    result.stderr.trim()
                )));
            }
            outputs.push(output);
        }
        Ok(outputs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::ScriptedTools;
    use tempfile::TempDir;

    #[tokio::test]
    async fn joins_same_day_captures_into_one_segment() {
        let dir = TempDir::new().unwrap();
        for name in ["02.avi", "01.avi", "03.avi"] {
            std::fs::write(dir.path().join(name), b"x").unwrap();
        }
        let out = TempDir::new().unwrap();
        let tools = ScriptedTools::new().with_stream("720\n576\n4:3\n25/1\n250\n");

        let outputs = VideoJoiner::new(&tools)
            .join_directory(dir.path(), "cam", out.path())
            .await
            .unwrap();

        assert_eq!(outputs, vec![out.path().join("cam_2021-07-14_0.avi")]);
        assert!(outputs[0].exists());
        assert_eq!(tools.calls_to("concat"), 1);
        assert!(tools.calls().last().unwrap().starts_with("concat 3 "));
    }

    #[tokio::test]
    async fn empty_directory_is_an_error() {
        let dir = TempDir::new().unwrap();
        let tools = ScriptedTools::new();
        let err = VideoJoiner::new(&tools)
            .join_directory(dir.path(), "cam", dir.path())
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::FileNotFound(_)));
        assert_eq!(tools.call_count(), 0);
    }
}
