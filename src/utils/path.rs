//! File discovery for library and batch commands

use std::path::{Path, PathBuf};

use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::domain::errors::DomainError;
use crate::domain::rules::DiscoveryPolicy;

fn has_extension(path: &Path, extension: &str) -> bool {
    let wanted = extension.trim_start_matches('.');
    path.extension()
        .map(|ext| ext.to_string_lossy().eq_ignore_ascii_case(wanted))
        .unwrap_or(false)
}

/// Every `*.<extension>` file below `root`, sorted, skipping hidden entries
///
/// Hidden is judged on the part of the path below `root`, so a root that
/// itself lives under a dot-directory is still searched. Entries that cannot
/// be read (symlink loops, unreadable folders, files removed mid-walk) are
/// logged and skipped.
pub fn find_files(root: &Path, extension: &str) -> Result<Vec<PathBuf>, DomainError> {
    debug!("Searching {} for *.{} ...", root.display(), extension.trim_start_matches('.'));
    let mut files = Vec::new();
    for entry in WalkDir::new(root).follow_links(true) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!("Skipping unreadable entry: {}", e);
                continue;
            }
        };
        if !entry.file_type().is_file() || !has_extension(entry.path(), extension) {
            continue;
        }
        let relative = entry.path().strip_prefix(root).unwrap_or(entry.path());
        if DiscoveryPolicy::is_hidden(relative) {
            debug!("Ignoring hidden file {}", entry.path().display());
            continue;
        }
        files.push(entry.into_path());
    }
    files.sort();
    Ok(files)
}

/// `*.<extension>` files directly inside `dir`, sorted
pub fn list_directory(dir: &Path, extension: &str) -> Result<Vec<PathBuf>, DomainError> {
    let mut files: Vec<PathBuf> = WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|entry| entry.file_type().is_file() && has_extension(entry.path(), extension))
        .map(|entry| entry.into_path())
        .collect();
    files.sort();
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn touch(root: &Path, relative: &str) {
        let path = root.join(relative);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, b"x").unwrap();
    }

    #[test]
    fn finds_nested_files_case_insensitively() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "b/clip.MP4");
        touch(dir.path(), "a/clip.mp4");
        touch(dir.path(), "a/notes.txt");

        let files = find_files(dir.path(), "mp4").unwrap();

        assert_eq!(files, vec![dir.path().join("a/clip.mp4"), dir.path().join("b/clip.MP4")]);
    }

    #[test]
    fn skips_dot_directories_and_dot_files() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), ".preview/a/clip.mp4");
        touch(dir.path(), "a/.hidden.mp4");
        touch(dir.path(), "a/shown.mp4");

        let files = find_files(dir.path(), ".mp4").unwrap();

        assert_eq!(files, vec![dir.path().join("a/shown.mp4")]);
    }

    #[cfg(unix)]
    #[test]
    fn symlink_loop_does_not_hide_sibling_videos() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "holiday/beach.mp4");
        std::fs::create_dir_all(dir.path().join("loopdir")).unwrap();
        std::os::unix::fs::symlink(dir.path().join("loopdir"), dir.path().join("loopdir/self"))
            .unwrap();

        let files = find_files(dir.path(), "mp4").unwrap();

        assert_eq!(files, vec![dir.path().join("holiday/beach.mp4")]);
    }

    #[test]
    fn list_directory_is_not_recursive() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "02.avi");
        touch(dir.path(), "01.AVI");
        touch(dir.path(), "nested/03.avi");

        let files = list_directory(dir.path(), "avi").unwrap();

        assert_eq!(files, vec![dir.path().join("01.AVI"), dir.path().join("02.avi")]);
    }
}
