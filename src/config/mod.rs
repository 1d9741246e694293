//! Editor configuration management for `vise.toml`.
//!
//! # Module Structure
//!
//! ```text
//! config/
//! ├── section    # [sections], [editor], [preview]
//! ├── error      # ConfigError
//! ├── util       # config discovery, path expansion
//! └── mod.rs     # ViseConfig (this file)
//! ```
//!
//! # Sections
//!
//! | Section      | Purpose                                         |
//! |--------------|-------------------------------------------------|
//! | `[sections]` | Section directory, names, extension, entry file |
//! | `[editor]`   | Debounce, feedback suppression, status timing   |
//! | `[preview]`  | Interaction layer delay                         |
//!
//! A missing config file is not an error: every section has defaults and
//! the project root falls back to the working directory.

mod error;
mod section;
mod util;

pub use error::ConfigError;
pub use section::{EditorConfig, PreviewConfig, SectionsConfig};

use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::{cli::Cli, log};
use util::{expand_path, find_config_file};

// ============================================================================
// root configuration
// ============================================================================

/// Root configuration structure representing vise.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ViseConfig {
    /// Absolute path to the config file, empty when none was found
    #[serde(skip)]
    pub config_path: PathBuf,

    /// Project root directory - parent of config file, or cwd
    #[serde(skip)]
    pub root: PathBuf,

    /// Section sources
    #[serde(default)]
    pub sections: SectionsConfig,

    /// Host editor timing
    #[serde(default)]
    pub editor: EditorConfig,

    /// Preview timing
    #[serde(default)]
    pub preview: PreviewConfig,
}

impl ViseConfig {
    /// Load configuration from CLI arguments.
    ///
    /// Searches upward from cwd for the config file; the project root is the
    /// config file's parent directory.
    pub fn load(cli: &Cli) -> Result<Self> {
        let cwd = std::env::current_dir().context("Failed to get current working directory")?;

        let mut config = match find_config_file(&cwd, &cli.config) {
            Some(path) => {
                let mut config = Self::from_path(&path)?;
                config.root = path.parent().map(Path::to_path_buf).unwrap_or(cwd);
                config.config_path = path;
                config
            }
            None => {
                crate::debug!("config"; "no {} found, using defaults", cli.config.display());
                Self {
                    root: cwd,
                    ..Self::default()
                }
            }
        };

        if let Some(dir) = &cli.sections {
            config.sections.dir = dir.clone();
        }

        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a file path
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;

        let (config, ignored) = Self::parse_with_ignored(&content)?;
        if !ignored.is_empty() {
            Self::print_unknown_fields_warning(&ignored, path);
        }

        Ok(config)
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
    fn print_unknown_fields_warning(fields: &[String], path: &Path) {
        let display_path = path
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_else(|| path.to_string_lossy());
        log!("warning"; "unknown fields in {}, ignoring:", display_path);
        for field in fields {
            eprintln!("- {}", field);
        }
    }

    /// Absolute directory holding the section sources.
    pub fn sections_dir(&self) -> PathBuf {
        expand_path(&self.sections.dir, &self.root)
    }

    // ========================================================================
    // validation
    // ========================================================================

    /// Reject configurations the editor cannot work with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let sections = &self.sections;

        if sections.extension.is_empty() || sections.extension.contains(['.', '/']) {
            return Err(ConfigError::Validation(format!(
                "sections.extension must be a bare extension, got `{}`",
                sections.extension
            )));
        }
        if sections.entry.trim_start_matches('/').is_empty() {
            return Err(ConfigError::Validation("sections.entry is empty".into()));
        }

        let mut seen = rustc_hash::FxHashSet::default();
        for name in &sections.names {
            if !is_component_name(name) {
                return Err(ConfigError::Validation(format!(
                    "sections.names: `{name}` is not a component name"
                )));
            }
            if !seen.insert(name.as_str()) {
                return Err(ConfigError::Validation(format!(
                    "sections.names: `{name}` listed twice"
                )));
            }
        }

        Ok(())
    }
}

/// Component names start with an uppercase letter and are identifiers.
fn is_component_name(name: &str) -> bool {
    let mut chars = name.chars();
    chars.next().is_some_and(|c| c.is_ascii_uppercase())
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

#[cfg(test)]
pub(crate) fn test_parse_config(content: &str) -> ViseConfig {
    ViseConfig::parse_with_ignored(content)
        .map(|(config, _)| config)
        .unwrap()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_unknown_fields_collected() {
        let (config, ignored) =
            ViseConfig::parse_with_ignored("[editor]\ntext_debounce_ms = 10\ncolour = 1\n[extra]\nx = 1")
                .unwrap();
        assert_eq!(config.editor.text_debounce_ms, 10);
        assert_eq!(ignored, vec!["editor.colour".to_string(), "extra".to_string()]);
    }

    #[test]
    fn test_invalid_toml() {
        let err = ViseConfig::parse_with_ignored("[editor\n").unwrap_err();
        assert!(matches!(err, ConfigError::Toml(_)));
    }

    #[test]
    fn test_from_path_missing() {
        let dir = TempDir::new().unwrap();
        let err = ViseConfig::from_path(&dir.path().join("vise.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io(..)));
    }

    #[test]
    fn test_from_path_reads_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("vise.toml");
        fs::write(&path, "[sections]\ndir = \"src/sections\"\n").unwrap();

        let mut config = ViseConfig::from_path(&path).unwrap();
        config.root = dir.path().to_path_buf();
        assert_eq!(config.sections_dir(), dir.path().join("src/sections"));
    }

    #[test]
    fn test_validate_names() {
        let mut config = ViseConfig::default();
        assert!(config.validate().is_ok());

        config.sections.names = vec!["hero".into()];
        assert!(matches!(config.validate(), Err(ConfigError::Validation(_))));

        config.sections.names = vec!["Hero".into(), "Hero".into()];
        assert!(matches!(config.validate(), Err(ConfigError::Validation(_))));
    }

    #[test]
    fn test_validate_extension() {
        let mut config = ViseConfig::default();
        config.sections.extension = ".tsx".into();
        assert!(config.validate().is_err());
    }
}
