// Domain rules - Business logic and policies

use std::path::{Component, Path};

/// Words dropped from filename keywords on top of the short ones
const STOP_WORDS: [&str; 3] = ["the", "day", "out"];

/// Titles longer than this many characters are cut and marked
const TITLE_MAX_LENGTH: usize = 30;

/// Tags derived from a video's file name
#[derive(Debug, Clone, PartialEq)]
pub struct FilenameTags {
    keywords: Vec<String>,
}

impl FilenameTags {
    /// Derive tags from a file stem such as `the-big_day_Beach-Trip`
    pub fn from_stem(stem: &str) -> Self {
        let normalized = stem.to_lowercase().replace('-', "_");
        let keywords = normalized
            .split('_')
            .filter(|word| word.chars().count() > 2 && !STOP_WORDS.contains(word))
            .map(str::to_string)
            .collect();
        Self { keywords }
    }

    /// Derive tags from the file name of `path`
    pub fn from_path(path: &Path) -> Self {
        let stem = path
            .file_stem()
            .map(|stem| stem.to_string_lossy().to_string())
            .unwrap_or_default();
        Self::from_stem(&stem)
    }

    pub fn keywords(&self) -> &[String] {
        &self.keywords
    }

    /// Capitalized keywords, cut to 30 characters with a `..` marker
    pub fn title(&self) -> String {
        let title = self
            .keywords
            .iter()
            .map(|word| capitalize(word))
            .collect::<Vec<_>>()
            .join(" ");
        if title.chars().count() > TITLE_MAX_LENGTH - 2 {
            let cut: String = title.chars().take(TITLE_MAX_LENGTH).collect();
            format!("{}..", cut)
        } else {
            title
        }
    }

    /// Lowercase keywords joined by spaces
    pub fn description(&self) -> String {
        self.keywords.join(" ")
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Library traversal rules
pub struct DiscoveryPolicy;

impl DiscoveryPolicy {
    /// Anything below a dot-directory, or a dot-file, is never processed
    pub fn is_hidden(path: &Path) -> bool {
        path.components().any(|component| match component {
            Component::Normal(name) => name.to_string_lossy().starts_with('.'),
            _ => false,
        })
    }
}

/// Catalog membership rules
pub struct CatalogPolicy;

impl CatalogPolicy {
    /// Folders prefixed with `_` and paths containing spaces stay out of the catalog
    pub fn is_excluded(path: &Path) -> bool {
        let text = path.to_string_lossy();
        text.contains("/_") || text.contains("\\_") || text.contains(' ')
    }
}

/// Source extensions the converter accepts
pub const SUPPORTED_EXTENSIONS: [&str; 5] = [".wmv", ".avi", ".mkv", ".mov", ".flv"];

/// Flags applied on every conversion to MP4
pub const CONVERT_BASE_FLAGS: &str = "-movflags +faststart -pix_fmt yuv420p";

/// Conversion rules by source extension
pub struct ConversionRules;

impl ConversionRules {
    /// Encoder flags for `extension` (with leading dot, case-insensitive)
    pub fn flags_for(extension: &str) -> Option<&'static str> {
        match extension.to_lowercase().as_str() {
            ".wmv" => Some("-c:v libx264 -crf 19"),
            ".avi" => Some("-vf yadif=1 -c:v h264_nvenc -preset slow -tune film -crf 17"),
            ".mkv" => Some("-c copy"),
            ".mov" => Some("-vcodec h264 -acodec aac -strict -2 -crf 19"),
            ".flv" => Some("-r 20"),
            _ => None,
        }
    }
}
