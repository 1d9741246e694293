//! FileSystem Actor
//!
//! Watches the sections directory and forwards debounced changes to the
//! HostActor as `FileUpdate`. The host compares content, so writes the
//! editor made itself come back as echoes and are ignored there.
//!
//! ```text
//! Watcher → Debouncer (pure timing) → read file → HostMsg::FileUpdate
//! ```

mod debouncer;

use std::path::{Path, PathBuf};
use std::time::Duration;

use notify::{RecommendedWatcher, RecursiveMode, Watcher};
use rustc_hash::FxHashMap;
use tokio::sync::mpsc;

use super::clock;
use super::messages::HostMsg;
use crate::source::SourceSet;
use crate::source::loader::preview_path;
use debouncer::{ChangeKind, Debouncer};

/// Debounce window for file events
const DEBOUNCE_MS: u64 = 300;

/// FileSystem Actor - watches section files
pub struct FsActor {
    /// Channel to receive notify events (sync -> async bridge)
    notify_rx: std::sync::mpsc::Receiver<notify::Result<notify::Event>>,
    /// Watcher handle (must be kept alive)
    _watcher: RecommendedWatcher,
    host_tx: mpsc::UnboundedSender<HostMsg>,
    debouncer: Debouncer,
    dir: PathBuf,
    /// Paths the editor knows, for mapping files back to preview paths
    known: SourceSet,
}

impl FsActor {
    /// Start watching `dir` immediately; events buffer until `run`.
    pub fn new(
        dir: PathBuf,
        known: SourceSet,
        host_tx: mpsc::UnboundedSender<HostMsg>,
    ) -> notify::Result<Self> {
        let (notify_tx, notify_rx) = std::sync::mpsc::channel();

        let mut watcher = notify::recommended_watcher(move |res| {
            let _ = notify_tx.send(res);
        })?;
        watcher.watch(&dir, RecursiveMode::NonRecursive)?;

        Ok(Self {
            notify_rx,
            _watcher: watcher,
            host_tx,
            debouncer: Debouncer::new(Duration::from_millis(DEBOUNCE_MS)),
            dir,
            known,
        })
    }

    /// Run the actor event loop
    pub async fn run(self) {
        let Self {
            notify_rx,
            _watcher,
            host_tx,
            mut debouncer,
            dir,
            known,
        } = self;

        let (async_tx, mut async_rx) = mpsc::channel::<notify::Event>(64);

        // notify is sync; bridge it onto the runtime from a plain thread
        std::thread::spawn(move || {
            while let Ok(result) = notify_rx.recv() {
                match result {
                    Ok(event) => {
                        if async_tx.blocking_send(event).is_err() {
                            break;
                        }
                    }
                    Err(e) => crate::log!("watch"; "notify error: {}", e),
                }
            }
        });

        loop {
            tokio::select! {
                biased;
                Some(event) = async_rx.recv() => debouncer.add_event(&event, clock()),
                _ = tokio::time::sleep(debouncer.sleep_duration(clock())) => {
                    let Some(changes) = debouncer.take_if_ready(clock()) else {
                        continue;
                    };
                    for (path, kind) in in_path_order(changes) {
                        if forward(&dir, &known, &path, kind, &host_tx).is_err() {
                            crate::debug!("watch"; "host gone, stopping");
                            return;
                        }
                    }
                }
                _ = host_tx.closed() => break,
            }
        }
    }
}

/// Drain a debounced batch sorted by path, so forwarding order is stable.
fn in_path_order(changes: FxHashMap<PathBuf, ChangeKind>) -> Vec<(PathBuf, ChangeKind)> {
    let mut paths: Vec<_> = changes.into_iter().collect();
    paths.sort_by(|a, b| a.0.cmp(&b.0));
    paths
}

/// Forward one change. Returns `Err(())` if the HostActor shut down.
fn forward(
    dir: &Path,
    known: &SourceSet,
    file: &Path,
    kind: ChangeKind,
    host_tx: &mpsc::UnboundedSender<HostMsg>,
) -> Result<(), ()> {
    let Some(path) = preview_path(known, dir, file) else {
        crate::debug!("watch"; "{} {} (not a section)", kind.label(), file.display());
        return Ok(());
    };
    if kind == ChangeKind::Removed {
        crate::log!("watch"; "{} removed, keeping the editor copy", path);
        return Ok(());
    }
    let code = match std::fs::read_to_string(file) {
        Ok(code) => code,
        Err(e) => {
            crate::debug!("watch"; "cannot read {}: {}", file.display(), e);
            return Ok(());
        }
    };
    host_tx
        .send(HostMsg::FileUpdate { path, code })
        .map_err(|_| ())
}
