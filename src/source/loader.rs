//! Section loading from disk.
//!
//! Each section is read from `<dir>/<Name>.<ext>`. A missing or unreadable
//! section is replaced by its built-in fallback, independently of the others.
//! The entry file is read when present and generated otherwise.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

use super::fallback::fallback_source;
use super::{SourceSet, entry_source};
use crate::config::SectionsConfig;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read `{path}`")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to write `{path}`")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("no sections configured")]
    Empty,
}

/// What `load_sections` did, for status reporting.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadReport {
    /// Sections read from disk
    pub loaded: Vec<String>,
    /// Sections replaced by their fallback
    pub fallbacks: Vec<String>,
    /// Whether the entry file was generated
    pub generated_entry: bool,
}

impl LoadReport {
    pub fn has_fallbacks(&self) -> bool {
        !self.fallbacks.is_empty()
    }
}

/// Load every configured section from `dir`.
pub fn load_sections(
    config: &SectionsConfig,
    dir: &Path,
) -> Result<(SourceSet, LoadReport), LoadError> {
    if config.names.is_empty() {
        return Err(LoadError::Empty);
    }

    let mut set = SourceSet::new(config.entry_path());
    let mut report = LoadReport::default();

    for name in &config.names {
        let path = section_file(config, dir, name);
        let code = match read_file(&path) {
            Ok(code) => {
                report.loaded.push(name.clone());
                code
            }
            Err(e) => {
                crate::debug!("load"; "{:#}", anyhow::Error::from(e));
                report.fallbacks.push(name.clone());
                fallback_source(name)
            }
        };
        set.insert(config.source_path(name), code);
    }

    let entry_file = dir.join(config.entry.trim_start_matches('/'));
    let entry = match read_file(&entry_file) {
        Ok(code) => code,
        Err(_) => {
            report.generated_entry = true;
            entry_source(&config.names)
        }
    };
    set.insert(config.entry_path(), entry);

    Ok((set, report))
}

/// On-disk location of a section.
pub fn section_file(config: &SectionsConfig, dir: &Path, name: &str) -> PathBuf {
    dir.join(format!("{}.{}", name, config.extension))
}

/// On-disk location of a preview path such as `/HeroSection.tsx`.
pub fn disk_path(dir: &Path, path: &str) -> PathBuf {
    dir.join(path.trim_start_matches('/'))
}

/// Preview path of a file inside `dir`, if it is one of the known sources.
pub fn preview_path(set: &SourceSet, dir: &Path, file: &Path) -> Option<String> {
    let rel = file.strip_prefix(dir).ok()?;
    let path = format!("/{}", rel.to_string_lossy().replace('\\', "/"));
    set.contains(&path).then_some(path)
}

fn read_file(path: &Path) -> Result<String, LoadError> {
    fs::read_to_string(path).map_err(|source| LoadError::Read {
        path: path.to_path_buf(),
        source,
    })
}

/// Write the files of `set` whose content differs from `baseline` under `dir`.
///
/// `baseline` is what the directory is known to hold, so loaded fallbacks and
/// the generated entry stay in memory until the editor actually changes them.
pub fn write_changed(
    set: &SourceSet,
    baseline: &SourceSet,
    dir: &Path,
) -> Result<Vec<PathBuf>, LoadError> {
    let mut written = Vec::new();
    for (path, code) in set.iter() {
        if baseline.get(path) == Some(code) {
            continue;
        }
        let file = disk_path(dir, path);
        fs::write(&file, code).map_err(|source| LoadError::Write {
            path: file.clone(),
            source,
        })?;
        written.push(file);
    }
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn config(names: &[&str]) -> SectionsConfig {
        SectionsConfig {
            names: names.iter().map(|s| s.to_string()).collect(),
            ..SectionsConfig::default()
        }
    }

    #[test]
    fn test_load_with_fallback() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("HeroSection.tsx"),
            "export default function HeroSection() { return (<h1>Disk</h1>); }",
        )
        .unwrap();

        let (set, report) =
            load_sections(&config(&["HeroSection", "AboutSection"]), dir.path()).unwrap();

        assert_eq!(report.loaded, vec!["HeroSection".to_string()]);
        assert_eq!(report.fallbacks, vec!["AboutSection".to_string()]);
        assert!(report.generated_entry);
        assert!(set.get("/HeroSection.tsx").unwrap().contains("Disk"));
        assert!(set.get("/AboutSection.tsx").unwrap().contains("About Us"));
        assert!(set.get("/App.tsx").unwrap().contains("<AboutSection />"));

        let order: Vec<_> = set.search_order().collect();
        assert_eq!(order, ["/App.tsx", "/HeroSection.tsx", "/AboutSection.tsx"]);
    }

    #[test]
    fn test_entry_read_from_disk() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("App.tsx"), "custom entry").unwrap();
        let (set, report) = load_sections(&config(&["HeroSection"]), dir.path()).unwrap();
        assert!(!report.generated_entry);
        assert_eq!(set.get("/App.tsx"), Some("custom entry"));
    }

    #[test]
    fn test_empty_names() {
        let dir = TempDir::new().unwrap();
        assert!(matches!(
            load_sections(&config(&[]), dir.path()),
            Err(LoadError::Empty)
        ));
    }

    #[test]
    fn test_write_changed_only() {
        let dir = TempDir::new().unwrap();
        let (baseline, report) = load_sections(&config(&["HeroSection"]), dir.path()).unwrap();
        assert!(report.generated_entry);

        assert!(write_changed(&baseline, &baseline, dir.path()).unwrap().is_empty());

        let mut set = baseline.clone();
        set.set("/HeroSection.tsx", "changed");
        let written = write_changed(&set, &baseline, dir.path()).unwrap();
        assert_eq!(written, vec![dir.path().join("HeroSection.tsx")]);
        assert_eq!(fs::read_to_string(&written[0]).unwrap(), "changed");
        // The generated entry was never edited
        assert!(!dir.path().join("App.tsx").exists());
    }

    #[test]
    fn test_preview_path() {
        let dir = TempDir::new().unwrap();
        let (set, _) = load_sections(&config(&["HeroSection"]), dir.path()).unwrap();
        assert_eq!(
            preview_path(&set, dir.path(), &dir.path().join("HeroSection.tsx")).as_deref(),
            Some("/HeroSection.tsx")
        );
        assert_eq!(preview_path(&set, dir.path(), &dir.path().join("Other.tsx")), None);
    }
}
