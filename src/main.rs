//! relink - rewrite permalink-style documentation links into relative file links.

mod cli;
mod config;
mod core;
mod logger;
mod manifest;
mod rewrite;
mod utils;

use anyhow::{Context, Result};
use clap::{ColorChoice, Parser};
use cli::Cli;
use config::RunConfig;
use manifest::PermalinkMap;
use rewrite::{LinkRewriter, RewriteSummary};
use utils::plural_count;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set global color override based on CLI option
    match cli.color {
        ColorChoice::Always => owo_colors::set_override(true),
        ColorChoice::Never => owo_colors::set_override(false),
        ColorChoice::Auto => {} // owo-colors auto-detects TTY
    }
    logger::set_verbose(cli.verbose);

    let config = RunConfig::load(&cli)?;
    debug!("config"; "{:?}", config);

    run(&config).map(|_| ())
}

/// Load the manifest, then rewrite the tree with it.
///
/// The mapping is fully built before any page is opened, so a bad manifest
/// line fails the run with the tree untouched.
fn run(config: &RunConfig) -> Result<RewriteSummary> {
    let map = PermalinkMap::load(&config.manifest, &config.marker)
        .with_context(|| format!("failed to load manifest `{}`", config.manifest.display()))?;
    if map.is_empty() {
        log!("warning"; "manifest `{}` has no entries", config.manifest.display());
    } else {
        log!("manifest"; "loaded {}", plural_count(map.len(), "permalink"));
    }

    let rewriter = LinkRewriter::new(&map, &config.manifest_dir())?;
    let summary = rewriter
        .rewrite_tree(config)
        .with_context(|| format!("failed to rewrite pages under `{}`", config.root.display()))?;

    log!(
        "rewrite";
        "rewrote {} in {} ({} scanned)",
        plural_count(summary.links_rewritten, "link"),
        plural_count(summary.pages_changed, "page"),
        summary.pages_scanned
    );

    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::RelinkError;
    use crate::utils::path::normalize_path;
    use std::fs;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn site(manifest: &str, pages: &[(&str, &str)]) -> (TempDir, RunConfig) {
        let dir = TempDir::new().unwrap();
        let root = normalize_path(dir.path());
        fs::write(root.join("permalinks.txt"), manifest).unwrap();
        for (path, content) in pages {
            let full = root.join(path);
            fs::create_dir_all(full.parent().unwrap()).unwrap();
            fs::write(full, content).unwrap();
        }
        let config = RunConfig {
            manifest: root.join("permalinks.txt"),
            root,
            ..RunConfig::default()
        };
        (dir, config)
    }

    #[test]
    fn test_run_end_to_end() {
        let (_dir, config) = site(
            "a/b.mdx : permalink: https://x/docs/handbook/a/b\n\
             guides/setup.mdx : permalink: https://example.com/docs/handbook/guides/setup\n",
            &[
                ("c/d.mdx", "See [here](/docs/handbook/a/b) for details."),
                ("index.mdx", "[Setup](/docs/handbook/guides/setup#install)"),
            ],
        );

        let summary = run(&config).unwrap();

        assert_eq!(summary.pages_changed, 2);
        assert_eq!(
            fs::read_to_string(config.root.join("c/d.mdx")).unwrap(),
            "See [here](./../a/b.mdx) for details."
        );
        assert_eq!(
            fs::read_to_string(config.root.join("index.mdx")).unwrap(),
            "[Setup](./guides/setup.mdx#install)"
        );
    }

    #[test]
    fn test_root_below_manifest_dir() {
        let (dir, _) = site(
            "docs/a/b.mdx : permalink: https://x/docs/handbook/a/b\n",
            &[("docs/a/b.mdx", "# B"), ("docs/c/d.mdx", "[h](/docs/handbook/a/b)")],
        );
        let cli = Cli {
            root: Some(PathBuf::from("docs")),
            ..Cli::default()
        };
        let config = RunConfig::load_from(&cli, dir.path()).unwrap();

        run(&config).unwrap();

        let page = config.root.join("c/d.mdx");
        assert_eq!(fs::read_to_string(&page).unwrap(), "[h](./../a/b.mdx)");
        assert!(page.parent().unwrap().join("../a/b.mdx").is_file());
    }

    #[test]
    fn test_malformed_manifest_touches_nothing() {
        let original = "See [here](/docs/handbook/a/b) for details.";
        let (_dir, config) = site(
            "a/b.mdx : permalink: https://x/docs/handbook/a/b\nbroken line\n",
            &[("c/d.mdx", original)],
        );
        let page = config.root.join("c/d.mdx");
        let mtime = fs::metadata(&page).unwrap().modified().unwrap();

        let err = run(&config).unwrap_err();

        assert!(matches!(
            err.downcast_ref::<RelinkError>(),
            Some(RelinkError::MalformedManifestLine { line: 2, .. })
        ));
        assert_eq!(fs::read_to_string(&page).unwrap(), original);
        assert_eq!(fs::metadata(&page).unwrap().modified().unwrap(), mtime);
    }

    #[test]
    fn test_unrecognized_permalink_aborts() {
        let (_dir, config) = site("a.mdx : permalink: https://x/blog/a\n", &[]);

        let err = run(&config).unwrap_err();

        assert!(matches!(
            err.downcast_ref::<RelinkError>(),
            Some(RelinkError::UnrecognizedPermalinkFormat { .. })
        ));
    }

    #[test]
    fn test_missing_manifest_is_file_access_error() {
        let (_dir, mut config) = site("", &[]);
        config.manifest = config.root.join("nope.txt");

        let err = run(&config).unwrap_err();

        assert!(matches!(
            err.downcast_ref::<RelinkError>(),
            Some(RelinkError::FileAccess { .. })
        ));
    }
}
