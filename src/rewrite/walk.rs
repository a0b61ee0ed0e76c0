//! Page discovery.

use std::path::{Path, PathBuf};

use jwalk::WalkDir;

use crate::core::RelinkError;

/// Collect every page under `root` whose file name ends with `suffix`.
///
/// Directory symlinks are not followed; symlinks to files are included.
/// Sorted by path so runs are reproducible. Any unreadable directory fails
/// the whole walk.
pub fn collect_pages(
    root: &Path,
    suffix: &str,
    skip_hidden: bool,
) -> Result<Vec<PathBuf>, RelinkError> {
    let mut pages = Vec::new();

    for entry in WalkDir::new(root).skip_hidden(skip_hidden).sort(true) {
        let entry = entry.map_err(|err| {
            let path = err.path().map_or_else(|| root.to_path_buf(), Path::to_path_buf);
            RelinkError::file_access(path, err.into())
        })?;

        let file_type = entry.file_type();
        let path = entry.path();
        if !(file_type.is_file() || (file_type.is_symlink() && path.is_file())) {
            continue;
        }

        if entry.file_name().to_string_lossy().ends_with(suffix) {
            pages.push(path);
        }
    }

    Ok(pages)
}
