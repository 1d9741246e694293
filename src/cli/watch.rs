//! `vise watch`: keep the preview in sync with section files on disk.

use std::sync::Arc;

use anyhow::{Result, bail};

use super::common::{LOAD_FAILED_STATUS, load_sources, runtime};
use crate::actor::Coordinator;
use crate::config::ViseConfig;

pub fn run_watch(config: &ViseConfig) -> Result<()> {
    let dir = config.sections_dir();
    if !dir.is_dir() {
        bail!("sections directory {} does not exist", dir.display());
    }

    let (sources, report) = load_sources(config)?;
    let mut coordinator = Coordinator::new(Arc::new(config.clone()), sources).with_watch(dir.clone());
    if report.has_fallbacks() {
        coordinator = coordinator.with_startup_status(LOAD_FAILED_STATUS);
    }

    crate::log!("watch"; "watching {} (Ctrl+C to stop)", dir.display());
    runtime()?.block_on(coordinator.run())
}
