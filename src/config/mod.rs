//! Run configuration for `relink.toml`.
//!
//! # Example
//!
//! ```toml
//! manifest = "permalinks.txt"   # `<path> : permalink: <url>` lines
//! root = "."                    # documentation tree to rewrite
//! extension = "mdx"             # page file extension
//! marker = "/docs/handbook/"    # where permalink normalization starts
//! skip_hidden = false           # skip dot-files and dot-directories
//! ```
//!
//! Every key is optional. Relative paths in the file resolve against the
//! file's directory; relative paths given on the command line resolve
//! against the current directory. Manifest targets are resolved against
//! the manifest's own directory by the rewriter.

mod error;
mod util;

pub use error::ConfigError;

use util::find_config_file;

use crate::{cli::Cli, log, utils::path::{normalize_path, resolve_path}};
use anyhow::{Context, Result};
use serde::Deserialize;
use std::{
    fs,
    path::{Path, PathBuf},
};

/// Config file searched for when `--config` is not given.
pub const DEFAULT_CONFIG_NAME: &str = "relink.toml";

/// Everything one run needs, built once at startup.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    /// Manifest file path
    pub manifest: PathBuf,

    /// Root of the documentation tree
    pub root: PathBuf,

    /// Page extension without the leading dot
    pub extension: String,

    /// Documentation-root marker
    pub marker: String,

    /// Skip hidden entries while walking
    pub skip_hidden: bool,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            manifest: PathBuf::from("permalinks.txt"),
            root: PathBuf::from("."),
            extension: "mdx".to_string(),
            marker: "/docs/handbook/".to_string(),
            skip_hidden: false,
        }
    }
}

impl RunConfig {
    /// Load configuration from CLI arguments, relative to the current directory.
    pub fn load(cli: &Cli) -> Result<Self> {
        let cwd = std::env::current_dir().context("Failed to get current working directory")?;
        Self::load_from(cli, &cwd)
    }

    /// Load configuration from CLI arguments, relative to `cwd`.
    pub fn load_from(cli: &Cli, cwd: &Path) -> Result<Self> {
        let mut config = match Self::resolve_config_path(cli, cwd)? {
            Some(path) => {
                let base = path.parent().map_or_else(|| cwd.to_path_buf(), Path::to_path_buf);
                let mut config = Self::from_path(&path)?;
                config.resolve_paths(&base);
                config
            }
            None => {
                let mut config = Self::default();
                config.resolve_paths(cwd);
                config
            }
        };

        config.apply_cli(cli, cwd);
        config.finalize();
        config.validate()?;
        Ok(config)
    }

    /// Find the config file: an explicit `--config` must exist, the default
    /// name is optional.
    fn resolve_config_path(cli: &Cli, cwd: &Path) -> Result<Option<PathBuf>> {
        match &cli.config {
            Some(explicit) => {
                let path = resolve_path(explicit, cwd);
                if !path.is_file() {
                    return Err(ConfigError::Io(
                        path,
                        std::io::Error::new(std::io::ErrorKind::NotFound, "config file not found"),
                    )
                    .into());
                }
                Ok(Some(path))
            }
            None => Ok(find_config_file(Path::new(DEFAULT_CONFIG_NAME), cwd)),
        }
    }

    /// Parse configuration from TOML string
    pub fn from_str(content: &str) -> Result<Self> {
        let (config, ignored) = Self::parse_with_ignored(content)?;
        if !ignored.is_empty() {
            Self::print_unknown_fields_warning(&ignored);
        }
        Ok(config)
    }

    /// Load configuration from file path with unknown field detection.
    fn from_path(path: &Path) -> Result<Self> {
        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;
        Self::from_str(&content).with_context(|| format!("in {}", path.display()))
    }

    /// Parse TOML content, collecting any unknown fields.
    fn parse_with_ignored(content: &str) -> Result<(Self, Vec<String>), ConfigError> {
        let mut ignored = Vec::new();
        let deserializer = toml::Deserializer::new(content);
        let config = serde_ignored::deserialize(deserializer, |path: serde_ignored::Path| {
            ignored.push(path.to_string());
        })?;
        Ok((config, ignored))
    }

    /// Print warning about unknown fields.
    fn print_unknown_fields_warning(fields: &[String]) {
        log!("warning"; "unknown fields in {}, ignoring:", DEFAULT_CONFIG_NAME);
        for field in fields {
            log!("warning"; "- {}", field);
        }
    }

    fn resolve_paths(&mut self, base: &Path) {
        self.manifest = resolve_path(&self.manifest, base);
        self.root = resolve_path(&self.root, base);
    }

    /// Apply command-line overrides.
    fn apply_cli(&mut self, cli: &Cli, cwd: &Path) {
        if let Some(manifest) = &cli.manifest {
            self.manifest = resolve_path(manifest, cwd);
        }
        if let Some(root) = &cli.root {
            self.root = resolve_path(root, cwd);
        }
        Self::update_option(&mut self.extension, cli.extension.as_ref());
        Self::update_option(&mut self.marker, cli.marker.as_ref());
        Self::update_option(&mut self.skip_hidden, cli.skip_hidden.as_ref());
    }

    /// Update config option if CLI value is provided
    fn update_option<T: Clone>(config_option: &mut T, cli_option: Option<&T>) {
        if let Some(option) = cli_option {
            *config_option = option.clone();
        }
    }

    fn finalize(&mut self) {
        if let Some(stripped) = self.extension.strip_prefix('.') {
            self.extension = stripped.to_string();
        }
        self.manifest = normalize_path(&self.manifest);
        self.root = normalize_path(&self.root);
    }

    /// Validate values that would make the run meaningless.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.extension.is_empty() {
            return Err(ConfigError::Validation(
                "`extension` must not be empty".to_string(),
            ));
        }
        if self.marker.is_empty() {
            return Err(ConfigError::Validation(
                "`marker` must not be empty".to_string(),
            ));
        }
        if !self.root.is_dir() {
            return Err(ConfigError::Validation(format!(
                "`root` is not a directory: {}",
                self.root.display()
            )));
        }
        Ok(())
    }

    /// Directory the manifest lives in; relative targets are rooted here.
    pub fn manifest_dir(&self) -> PathBuf {
        self.manifest
            .parent()
            .map_or_else(|| self.root.clone(), Path::to_path_buf)
    }

    /// Page file suffix including the dot, e.g. `.mdx`.
    pub fn page_suffix(&self) -> String {
        format!(".{}", self.extension)
    }
}

// ============================================================================
// tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn cli() -> Cli {
        Cli::default()
    }

    #[test]
    fn test_defaults_without_config_file() {
        let dir = TempDir::new().unwrap();
        let config = RunConfig::load_from(&cli(), dir.path()).unwrap();

        assert_eq!(config.manifest, dir.path().join("permalinks.txt"));
        assert_eq!(config.root, normalize_path(dir.path()));
        assert_eq!(config.extension, "mdx");
        assert_eq!(config.marker, "/docs/handbook/");
        assert!(!config.skip_hidden);
    }

    #[test]
    fn test_from_str_partial() {
        let config = RunConfig::from_str("extension = \"md\"\nskip_hidden = true").unwrap();
        assert_eq!(config.extension, "md");
        assert!(config.skip_hidden);
        assert_eq!(config.marker, "/docs/handbook/");
    }

    #[test]
    fn test_unknown_fields_are_collected() {
        let (config, ignored) =
            RunConfig::parse_with_ignored("extension = \"md\"\ndry_run = true").unwrap();
        assert_eq!(config.extension, "md");
        assert_eq!(ignored, vec!["dry_run".to_string()]);
    }

    #[test]
    fn test_invalid_toml() {
        assert!(RunConfig::from_str("extension = ").is_err());
    }

    #[test]
    fn test_config_file_paths_resolve_against_file_dir() {
        let dir = TempDir::new().unwrap();
        let docs = dir.path().join("docs");
        std::fs::create_dir_all(&docs).unwrap();
        std::fs::write(
            dir.path().join(DEFAULT_CONFIG_NAME),
            "manifest = \"links.txt\"\nroot = \"docs\"\n",
        )
        .unwrap();

        let config = RunConfig::load_from(&cli(), &docs).unwrap();
        assert_eq!(config.manifest, dir.path().join("links.txt"));
        assert_eq!(config.root, normalize_path(&docs));
    }

    #[test]
    fn test_cli_overrides_config_file() {
        let dir = TempDir::new().unwrap();
        let other = dir.path().join("other");
        std::fs::create_dir_all(&other).unwrap();
        std::fs::write(
            dir.path().join(DEFAULT_CONFIG_NAME),
            "extension = \"md\"\nmarker = \"/docs/\"\n",
        )
        .unwrap();

        let cli = Cli {
            root: Some(PathBuf::from("other")),
            extension: Some(".markdown".to_string()),
            skip_hidden: Some(true),
            ..Cli::default()
        };
        let config = RunConfig::load_from(&cli, dir.path()).unwrap();

        assert_eq!(config.root, normalize_path(&other));
        assert_eq!(config.extension, "markdown");
        assert_eq!(config.marker, "/docs/");
        assert!(config.skip_hidden);
        assert_eq!(config.page_suffix(), ".markdown");
    }

    #[test]
    fn test_manifest_dir_independent_of_root() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir_all(dir.path().join("docs")).unwrap();
        std::fs::write(dir.path().join("permalinks.txt"), "").unwrap();
        let cli = Cli {
            root: Some(PathBuf::from("docs")),
            ..Cli::default()
        };
        let config = RunConfig::load_from(&cli, dir.path()).unwrap();

        assert_eq!(config.manifest_dir(), normalize_path(dir.path()));
        assert_eq!(config.root, normalize_path(&dir.path().join("docs")));
    }

    #[test]
    fn test_explicit_config_must_exist() {
        let dir = TempDir::new().unwrap();
        let cli = Cli {
            config: Some(PathBuf::from("missing.toml")),
            ..Cli::default()
        };
        let err = RunConfig::load_from(&cli, dir.path()).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ConfigError>(),
            Some(ConfigError::Io(..))
        ));
    }

    #[test]
    fn test_validate_rejects_missing_root() {
        let dir = TempDir::new().unwrap();
        let cli = Cli {
            root: Some(PathBuf::from("nope")),
            ..Cli::default()
        };
        let err = RunConfig::load_from(&cli, dir.path()).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ConfigError>(),
            Some(ConfigError::Validation(_))
        ));
    }

    #[test]
    fn test_validate_rejects_empty_marker() {
        let dir = TempDir::new().unwrap();
        let cli = Cli {
            marker: Some(String::new()),
            ..Cli::default()
        };
        assert!(RunConfig::load_from(&cli, dir.path()).is_err());
    }
}
