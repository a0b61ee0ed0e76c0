//! Permalink manifest loading.
//!
//! The manifest is a flat text file, one entry per line:
//!
//! ```text
//! guides/setup.mdx : permalink: https://example.com/docs/handbook/guides/setup
//! ```
//!
//! Each URL is normalized to the suffix starting at the documentation-root
//! marker (`/docs/handbook/guides/setup`), so scheme, host and any prefix in
//! front of the marker do not matter. The result is a [`PermalinkMap`] from
//! normalized permalink to the page file that now hosts it.

use std::fs;
use std::path::{Path, PathBuf};

use rustc_hash::FxHashMap;

use crate::core::RelinkError;
use crate::log;

/// Separator between the file path and the permalink URL on a manifest line.
pub const SEPARATOR: &str = " : permalink: ";

/// One manifest entry after normalization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PermalinkEntry {
    /// Normalized permalink, always starting with the marker.
    pub permalink: String,
    /// File path the permalink now points at, as written in the manifest.
    pub target: PathBuf,
}

/// Normalized permalink → target file, in first-insertion order.
///
/// Built once by [`PermalinkMap::load`] and read-only afterwards.
#[derive(Debug, Default, Clone)]
pub struct PermalinkMap {
    entries: Vec<PermalinkEntry>,
    index: FxHashMap<String, usize>,
}

impl PermalinkMap {
    /// Read and parse a manifest file.
    pub fn load(path: &Path, marker: &str) -> Result<Self, RelinkError> {
        let content = fs::read_to_string(path).map_err(|e| RelinkError::file_access(path, e))?;
        Self::parse(&content, marker)
    }

    /// Parse manifest text.
    ///
    /// Trailing blank lines are ignored. Every other line must split into
    /// exactly two parts on [`SEPARATOR`] and its URL must contain `marker`.
    /// The first bad line aborts parsing.
    pub fn parse(content: &str, marker: &str) -> Result<Self, RelinkError> {
        let mut map = Self::default();

        for (idx, raw) in content.trim_end().lines().enumerate() {
            let line = raw.trim();
            let line_no = idx + 1;

            let (file_path, url) = split_line(line).ok_or_else(|| {
                RelinkError::MalformedManifestLine {
                    line: line_no,
                    content: line.to_string(),
                }
            })?;

            let permalink = normalize_permalink(url, marker).ok_or_else(|| {
                RelinkError::UnrecognizedPermalinkFormat {
                    line: line_no,
                    url: url.to_string(),
                    marker: marker.to_string(),
                }
            })?;

            map.insert(permalink.to_string(), PathBuf::from(file_path));
            log!("manifest"; "{} {}", permalink, file_path);
        }

        Ok(map)
    }

    /// Insert an entry. A repeated permalink replaces the earlier target
    /// and keeps its original position.
    fn insert(&mut self, permalink: String, target: PathBuf) {
        if let Some(&pos) = self.index.get(&permalink) {
            let entry = &mut self.entries[pos];
            log!(
                "warning";
                "duplicate permalink {}: {} replaces {}",
                permalink,
                target.display(),
                entry.target.display()
            );
            entry.target = target;
            return;
        }

        self.index.insert(permalink.clone(), self.entries.len());
        self.entries.push(PermalinkEntry { permalink, target });
    }

    /// Target for a normalized permalink.
    #[cfg(test)]
    pub fn get(&self, permalink: &str) -> Option<&Path> {
        self.index
            .get(permalink)
            .map(|&pos| self.entries[pos].target.as_path())
    }

    pub fn iter(&self) -> impl Iterator<Item = &PermalinkEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Split `<path> : permalink: <url>` into its two parts.
///
/// Returns `None` when the separator is missing or appears more than once.
fn split_line(line: &str) -> Option<(&str, &str)> {
    let mut parts = line.split(SEPARATOR);
    let file_path = parts.next()?;
    let url = parts.next()?;
    parts.next().is_none().then_some((file_path, url))
}

/// Keep `marker` and everything after its first occurrence in `url`.
///
/// # Examples
/// ```ignore
/// normalize_permalink("https://x/docs/handbook/a/b", "/docs/handbook/") // Some("/docs/handbook/a/b")
/// normalize_permalink("https://x/blog/a", "/docs/handbook/")            // None
/// ```
pub fn normalize_permalink<'a>(url: &'a str, marker: &str) -> Option<&'a str> {
    url.find(marker).map(|pos| &url[pos..])
}
