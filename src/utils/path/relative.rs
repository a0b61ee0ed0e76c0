//! Relative link computation.

use std::path::{Component, Path};

use super::fs::clean_path;

/// Compute the path from directory `from_dir` to `target`, as a link string.
///
/// Both paths should share the same base (both absolute, or both relative
/// to the same directory). They are cleaned lexically, the shared leading
/// components are dropped, and the rest is rendered with `/` separators:
/// one `..` per remaining component of `from_dir`, then the remaining
/// components of `target`. An empty result becomes `.`.
///
/// # Examples
///
/// ```ignore
/// relative_link(Path::new("/site/c"), Path::new("/site/a/b.mdx")) // "../a/b.mdx"
/// relative_link(Path::new("/site"), Path::new("/site/a/b.mdx"))   // "a/b.mdx"
/// ```
pub fn relative_link(from_dir: &Path, target: &Path) -> String {
    let from = clean_path(from_dir);
    let to = clean_path(target);

    let from_parts: Vec<Component<'_>> = from.components().collect();
    let to_parts: Vec<Component<'_>> = to.components().collect();

    let common = from_parts
        .iter()
        .zip(&to_parts)
        .take_while(|(a, b)| a == b)
        .count();

    let mut segments: Vec<String> = Vec::with_capacity(from_parts.len() + to_parts.len());
    segments.extend(std::iter::repeat_n("..".to_string(), from_parts.len() - common));
    segments.extend(
        to_parts[common..]
            .iter()
            .map(|c| c.as_os_str().to_string_lossy().into_owned()),
    );

    if segments.is_empty() {
        ".".to_string()
    } else {
        segments.join("/")
    }
}
