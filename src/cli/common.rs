//! Helpers shared by the subcommands.

use std::time::Instant;

use anyhow::{Context, Result};
use owo_colors::OwoColorize;

use crate::config::ViseConfig;
use crate::preview::PreviewSurface;
use crate::protocol::Message;
use crate::source::{LoadReport, SourceSet, load_sections};

/// Status shown when any section fell back to its built-in source.
pub const LOAD_FAILED_STATUS: &str = "Failed to load files";

/// Load the configured sections, reporting fallbacks.
pub fn load_sources(config: &ViseConfig) -> Result<(SourceSet, LoadReport)> {
    let dir = config.sections_dir();
    let (sources, report) = load_sections(&config.sections, &dir)
        .with_context(|| format!("failed to load sections from {}", dir.display()))?;

    crate::debug!(
        "load";
        "{} section(s) from {}, {} fallback(s)",
        report.loaded.len(),
        dir.display(),
        report.fallbacks.len()
    );
    if report.has_fallbacks() {
        crate::log!("load"; "using built-in sources for: {}", report.fallbacks.join(", "));
    }
    if report.generated_entry {
        crate::debug!("load"; "generated {}", sources.entry());
    }
    Ok((sources, report))
}

/// Mount every source into a fresh, interactive preview surface.
pub fn mount_preview(config: &ViseConfig, sources: &SourceSet) -> PreviewSurface {
    let delay = config.preview.interaction_delay();
    let mut surface = PreviewSurface::new(sources.entry(), delay);
    let now = Instant::now();

    surface.boot();
    for (path, code) in sources.iter() {
        surface.handle(Message::render(path, code), now);
    }
    surface.poll(now + delay);
    surface.drain_outbox();
    surface
}

/// Runtime for the actor system.
pub fn runtime() -> Result<tokio::runtime::Runtime> {
    tokio::runtime::Builder::new_multi_thread()
        .worker_threads(2)
        .enable_all()
        .build()
        .context("failed to create tokio runtime")
}

/// Print the lines that differ between `before` and `after`.
///
/// Prints the changed region only, with one line of context on each side.
pub fn print_diff(path: &str, before: &str, after: &str) {
    let old: Vec<&str> = before.lines().collect();
    let new: Vec<&str> = after.lines().collect();

    let prefix = old.iter().zip(&new).take_while(|(a, b)| a == b).count();
    let suffix = old[prefix..]
        .iter()
        .rev()
        .zip(new[prefix..].iter().rev())
        .take_while(|(a, b)| a == b)
        .count();

    println!("{}", format!("--- {path}").dimmed());
    println!("{}", format!("+++ {path}").dimmed());
    if prefix > 0 {
        println!(" {}", old[prefix - 1]);
    }
    for line in &old[prefix..old.len() - suffix] {
        println!("{}", format!("-{line}").red());
    }
    for line in &new[prefix..new.len() - suffix] {
        println!("{}", format!("+{line}").green());
    }
    if suffix > 0 {
        println!(" {}", old[old.len() - suffix]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::preview::Readiness;

    #[test]
    fn test_mount_preview_with_fallbacks() {
        let dir = tempfile::TempDir::new().unwrap();
        let mut config = ViseConfig::default();
        config.root = dir.path().to_path_buf();

        let (sources, report) = load_sources(&config).unwrap();
        assert_eq!(report.fallbacks.len(), config.sections.names.len());

        let surface = mount_preview(&config, &sources);
        assert_eq!(surface.readiness(), Readiness::Interactive);
        let doc = surface.document();
        assert!(doc.element_children(doc.root()).count() > 0);
    }
}
