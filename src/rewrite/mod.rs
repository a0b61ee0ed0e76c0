//! Permalink → relative link rewriting over a page tree.
//!
//! # Flow
//!
//! ```text
//! PermalinkMap ──► LinkRewriter (one LinkRule per permalink)
//!                       │
//! collect_pages(root) ──┴──► rewrite_page(path) ──► write back iff changed
//! ```
//!
//! Matching is textual: `[label](/docs/handbook/x#anchor)` becomes
//! `[label](./<relative path to target>#anchor)` wherever it appears,
//! including inside code blocks. Everything outside a match is preserved
//! byte-for-byte, and a page with no match is never written.

mod rule;
mod walk;

pub use rule::LinkRule;
pub use walk::collect_pages;

use std::fs;
use std::io::{self, ErrorKind};
use std::path::Path;

use crate::config::RunConfig;
use crate::core::RelinkError;
use crate::debug;
use crate::manifest::PermalinkMap;
use crate::utils::path::resolve_path;
use crate::utils::plural_count;

/// Outcome of rewriting one page's text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rewritten {
    pub content: String,
    pub replacements: usize,
}

impl Rewritten {
    pub fn is_changed(&self) -> bool {
        self.replacements > 0
    }
}

/// Counters for a whole tree run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RewriteSummary {
    pub pages_scanned: usize,
    pub pages_changed: usize,
    pub links_rewritten: usize,
}

/// Applies a fixed set of [`LinkRule`]s to pages.
#[derive(Debug, Clone)]
pub struct LinkRewriter {
    rules: Vec<LinkRule>,
}

impl LinkRewriter {
    /// Compile one rule per mapping entry.
    ///
    /// Relative targets resolve against `base_dir`, the directory the
    /// manifest was read from.
    pub fn new(map: &PermalinkMap, base_dir: &Path) -> Result<Self, RelinkError> {
        let rules = map
            .iter()
            .map(|entry| LinkRule::new(&entry.permalink, resolve_path(&entry.target, base_dir)))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { rules })
    }

    #[cfg(test)]
    pub fn rules(&self) -> &[LinkRule] {
        &self.rules
    }

    /// Rewrite all matching links in `content` for a page living in `page_dir`.
    pub fn rewrite_content(&self, content: &str, page_dir: &Path) -> Rewritten {
        let mut text = content.to_string();
        let mut replacements = 0;

        for rule in &self.rules {
            if let Some((updated, count)) = rule.apply(&text, page_dir) {
                debug!("rewrite"; "{} -> {} ({}x)", rule.permalink(), rule.target().display(), count);
                text = updated;
                replacements += count;
            }
        }

        Rewritten {
            content: text,
            replacements,
        }
    }

    /// Rewrite one page in place. Returns the number of links replaced;
    /// the file is only written when that number is non-zero.
    pub fn rewrite_page(&self, path: &Path) -> Result<usize, RelinkError> {
        let content = fs::read_to_string(path).map_err(|e| {
            let e = if e.kind() == ErrorKind::InvalidData {
                io::Error::new(ErrorKind::InvalidData, "page is not valid UTF-8")
            } else {
                e
            };
            RelinkError::file_access(path, e)
        })?;
        let page_dir = path.parent().unwrap_or_else(|| Path::new(""));

        let rewritten = self.rewrite_content(&content, page_dir);
        if rewritten.is_changed() {
            fs::write(path, &rewritten.content).map_err(|e| RelinkError::file_access(path, e))?;
            debug!("rewrite"; "{} in {}", plural_count(rewritten.replacements, "link"), path.display());
        }

        Ok(rewritten.replacements)
    }

    /// Rewrite every page under `config.root`.
    ///
    /// Pages are processed one at a time; the first failure stops the run.
    pub fn rewrite_tree(&self, config: &RunConfig) -> Result<RewriteSummary, RelinkError> {
        let pages = collect_pages(&config.root, &config.page_suffix(), config.skip_hidden)?;
        let mut summary = RewriteSummary {
            pages_scanned: pages.len(),
            ..RewriteSummary::default()
        };

        if self.rules.is_empty() {
            return Ok(summary);
        }

        for page in &pages {
            let count = self.rewrite_page(page)?;
            if count > 0 {
                summary.pages_changed += 1;
                summary.links_rewritten += count;
            }
        }

        Ok(summary)
    }
}
