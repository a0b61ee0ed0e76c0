//! Path utilities.
//!
//! Pure functions for path manipulation. No side effects apart from the
//! `canonicalize` attempt in [`normalize_path`].
//!
//! - [`fs`]: Filesystem path normalization (`normalize_path`, `resolve_path`, `clean_path`)
//! - [`relative`]: Relative link computation (`relative_link`)

pub mod fs;
pub mod relative;

pub use fs::{normalize_path, resolve_path};
pub use relative::relative_link;
