//! Per-permalink link pattern.

use std::path::{Path, PathBuf};

use regex::{Captures, Regex};

use crate::utils::path::relative_link;

/// Matches `[label](<permalink>)` and `[label](<permalink>#anchor)` for one
/// permalink, and knows the file that permalink now points at.
#[derive(Debug, Clone)]
pub struct LinkRule {
    permalink: String,
    target: PathBuf,
    pattern: Regex,
}

impl LinkRule {
    /// Build the rule. `permalink` is matched literally; `target` should be
    /// absolute (or share a base with the pages it will be applied to).
    pub fn new(permalink: &str, target: PathBuf) -> Result<Self, regex::Error> {
        let pattern = Regex::new(&format!(
            r"\[([^\]]+)\]\({}(#[^)]*)?\)",
            regex::escape(permalink)
        ))?;
        Ok(Self {
            permalink: permalink.to_string(),
            target,
            pattern,
        })
    }

    pub fn permalink(&self) -> &str {
        &self.permalink
    }

    pub fn target(&self) -> &Path {
        &self.target
    }

    /// Rewrite every match in `text` relative to `page_dir`.
    ///
    /// Returns `None` when nothing matched. The `./` prefix is always added,
    /// also in front of `../`.
    pub fn apply(&self, text: &str, page_dir: &Path) -> Option<(String, usize)> {
        if !self.pattern.is_match(text) {
            return None;
        }

        let link = relative_link(page_dir, &self.target);
        let mut count = 0;
        let replaced = self.pattern.replace_all(text, |caps: &Captures<'_>| {
            count += 1;
            let anchor = caps.get(2).map_or("", |m| m.as_str());
            format!("[{}](./{}{})", &caps[1], link, anchor)
        });

        Some((replaced.into_owned(), count))
    }
}
