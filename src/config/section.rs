//! Configuration sections.
//!
//! ```toml
//! [sections]
//! dir = "sections"            # Directory holding the section sources
//! names = ["HeroSection"]     # Sections, in mount order
//! extension = "tsx"           # Source file extension
//! entry = "App.tsx"           # Aggregating entry file
//!
//! [editor]
//! text_debounce_ms = 300      # Quiet period before a text edit commits
//! feedback_delay_ms = 100     # How long self-triggered selections are suppressed
//! status_ttl_ms = 2000        # How long a status message stays visible
//!
//! [preview]
//! interaction_delay_ms = 100  # Delay before the interaction layer attaches
//! ```

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

// ============================================================================
// [sections]
// ============================================================================

/// Where section sources live and how they are named.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SectionsConfig {
    /// Directory holding `<Name>.<extension>` files
    pub dir: PathBuf,

    /// Section component names, in mount order
    pub names: Vec<String>,

    /// Source file extension, without the dot
    pub extension: String,

    /// Entry file name; generated when missing on disk
    pub entry: String,
}

impl Default for SectionsConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("sections"),
            names: ["HeroSection", "FeaturesSection", "ServicesSection", "AboutSection"]
                .map(String::from)
                .to_vec(),
            extension: "tsx".into(),
            entry: "App.tsx".into(),
        }
    }
}

impl SectionsConfig {
    /// Source path of a section as seen by the preview (e.g., "/HeroSection.tsx").
    pub fn source_path(&self, name: &str) -> String {
        format!("/{}.{}", name, self.extension)
    }

    /// Source path of the entry file (e.g., "/App.tsx").
    pub fn entry_path(&self) -> String {
        format!("/{}", self.entry.trim_start_matches('/'))
    }
}

// ============================================================================
// [editor]
// ============================================================================

/// Host-side timing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    pub text_debounce_ms: u64,
    pub feedback_delay_ms: u64,
    pub status_ttl_ms: u64,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            text_debounce_ms: 300,
            feedback_delay_ms: 100,
            status_ttl_ms: 2000,
        }
    }
}

impl EditorConfig {
    pub const fn text_debounce(&self) -> Duration {
        Duration::from_millis(self.text_debounce_ms)
    }

    pub const fn feedback_delay(&self) -> Duration {
        Duration::from_millis(self.feedback_delay_ms)
    }

    pub const fn status_ttl(&self) -> Duration {
        Duration::from_millis(self.status_ttl_ms)
    }
}

// ============================================================================
// [preview]
// ============================================================================

/// Preview-side timing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PreviewConfig {
    pub interaction_delay_ms: u64,
}

impl Default for PreviewConfig {
    fn default() -> Self {
        Self {
            interaction_delay_ms: 100,
        }
    }
}

impl PreviewConfig {
    pub const fn interaction_delay(&self) -> Duration {
        Duration::from_millis(self.interaction_delay_ms)
    }
}

#[cfg(test)]
mod tests {
    use crate::config::test_parse_config;

    #[test]
    fn test_sections_defaults() {
        let config = test_parse_config("");
        assert_eq!(config.sections.names.len(), 4);
        assert_eq!(config.sections.names[0], "HeroSection");
        assert_eq!(config.sections.source_path("HeroSection"), "/HeroSection.tsx");
        assert_eq!(config.sections.entry_path(), "/App.tsx");
    }

    #[test]
    fn test_sections_override() {
        let config = test_parse_config(
            "[sections]\nnames = [\"Pricing\"]\nextension = \"jsx\"\nentry = \"/Main.jsx\"",
        );
        assert_eq!(config.sections.names, vec!["Pricing".to_string()]);
        assert_eq!(config.sections.source_path("Pricing"), "/Pricing.jsx");
        assert_eq!(config.sections.entry_path(), "/Main.jsx");
        assert_eq!(config.sections.dir.to_str(), Some("sections"));
    }

    #[test]
    fn test_timing_sections() {
        let config = test_parse_config("[editor]\ntext_debounce_ms = 50\n[preview]\ninteraction_delay_ms = 0");
        assert_eq!(config.editor.text_debounce().as_millis(), 50);
        assert_eq!(config.editor.feedback_delay_ms, 100);
        assert!(config.preview.interaction_delay().is_zero());
    }
}
