//! Host Actor
//!
//! Drives the sans-IO `Host` from three sources: protocol frames from the
//! preview, editor commands, and its own timers (debounced text commit,
//! suppression window, status expiry).
//!
//! ```text
//! link_rx ──┐
//! rx ───────┼──▶ Host ──outbox──▶ link_tx
//! timer ────┘        └──sources──▶ disk (optional)
//! ```

use std::path::PathBuf;
use std::time::Duration;

use tokio::sync::mpsc;

use super::clock;
use super::messages::{HostMsg, HostSnapshot};
use crate::host::{FileUpdate, Host};
use crate::protocol::{LinkRx, LinkTx};
use crate::source::SourceSet;
use crate::source::loader::write_changed;

/// Sleep used when no timer is armed.
const IDLE: Duration = Duration::from_secs(86400);

pub struct HostActor {
    host: Host,
    link_tx: LinkTx,
    link_rx: LinkRx,
    rx: mpsc::UnboundedReceiver<HostMsg>,
    /// Write patched sources back under this directory
    persist_dir: Option<PathBuf>,
    /// What the persist directory holds: loaded sources plus everything
    /// written or reported by the watcher since
    on_disk: SourceSet,
    /// Last status line shown
    shown_status: Option<String>,
    /// Show statuses on the single overwriting watch line
    status_line: bool,
}

impl HostActor {
    pub fn new(
        host: Host,
        link_tx: LinkTx,
        link_rx: LinkRx,
        rx: mpsc::UnboundedReceiver<HostMsg>,
    ) -> Self {
        let on_disk = host.sources().clone();
        Self {
            host,
            link_tx,
            link_rx,
            rx,
            persist_dir: None,
            on_disk,
            shown_status: None,
            status_line: false,
        }
    }

    /// Show statuses through `WatchStatus` instead of log lines.
    pub fn with_status_line(mut self) -> Self {
        self.status_line = true;
        self
    }

    /// Write patched sources under `dir` as they change.
    pub fn with_persist_dir(mut self, dir: PathBuf) -> Self {
        self.persist_dir = Some(dir);
        self
    }

    /// Run the actor event loop
    pub async fn run(mut self) {
        loop {
            let sleep = self.host.next_deadline(clock()).unwrap_or(IDLE);

            tokio::select! {
                biased;

                message = self.link_rx.recv() => match message {
                    Some(message) => self.host.handle(message, clock()),
                    None => {
                        crate::debug!("host"; "preview link closed");
                        break;
                    }
                },

                msg = self.rx.recv() => match msg {
                    Some(HostMsg::Shutdown) | None => break,
                    Some(msg) => self.handle_msg(msg),
                },

                _ = tokio::time::sleep(sleep) => self.host.poll(clock()),
            }

            if !self.flush() {
                crate::debug!("host"; "preview gone, stopping");
                break;
            }
            self.persist();
            self.show_status();
        }
        self.persist();
    }

    fn handle_msg(&mut self, msg: HostMsg) {
        let now = clock();
        match msg {
            HostMsg::Click(region) => {
                self.host.click(region, now);
            }
            HostMsg::Edit { property, value } => {
                if !self.host.edit(property.clone(), &value, now) {
                    crate::debug!("host"; "edit of {} ignored", property);
                }
            }
            HostMsg::View(view) => self.host.set_view(view, now),
            HostMsg::Reload => {
                let pushed = self.host.reload_preview(now);
                crate::debug!("host"; "reload pushed {} file(s)", pushed);
            }
            HostMsg::Save => {
                self.host.save(now);
            }
            HostMsg::Upload => {
                self.host.upload(now);
            }
            HostMsg::FileUpdate { path, code } => {
                match self.host.on_file_update(&path, &code, now) {
                    FileUpdate::Applied => crate::log!("watch"; "{} changed", path),
                    FileUpdate::Echo => crate::debug!("watch"; "{} unchanged", path),
                    FileUpdate::Unknown => crate::debug!("watch"; "{} is not a section", path),
                }
                // The disk already holds this file; a pending edit flushed
                // above may still have patched another one.
                self.on_disk.set(&path, code);
            }
            HostMsg::Status(text) => self.host.set_status(text, now),
            HostMsg::Snapshot(reply) => {
                let _ = reply.send(self.snapshot());
            }
            HostMsg::Shutdown => {}
        }
    }

    fn snapshot(&self) -> HostSnapshot {
        let host = &self.host;
        HostSnapshot {
            sources: host.sources().clone(),
            view: host.view(),
            selected: host.descriptor().cloned(),
            panel: host.panel().cloned(),
            changes: host.changes().to_vec(),
            status: host.status().map(str::to_string),
            component_id: host.component_id().map(str::to_string),
            interaction_ready: host.is_interaction_ready(),
        }
    }

    /// Post everything the host queued. Returns `false` once the preview is gone.
    fn flush(&mut self) -> bool {
        self.host
            .drain_outbox()
            .into_iter()
            .all(|message| self.link_tx.send(message))
    }

    fn persist(&mut self) {
        let Some(dir) = &self.persist_dir else {
            return;
        };
        if *self.host.sources() == self.on_disk {
            return;
        }
        match write_changed(self.host.sources(), &self.on_disk, dir) {
            Ok(written) => {
                for file in written {
                    crate::log!("patch"; "wrote {}", file.display());
                }
                crate::debug!("patch"; "sources now at {}", self.host.sources().fingerprint());
                self.on_disk = self.host.sources().clone();
            }
            Err(e) => crate::log!("error"; "{}", e),
        }
    }

    fn show_status(&mut self) {
        let status = self.host.status();
        if status == self.shown_status.as_deref() {
            return;
        }
        match status {
            Some(text) if self.status_line && text.to_ascii_lowercase().contains("failed") => {
                crate::logger::status_error(text, "");
            }
            Some(text) if self.status_line => crate::logger::status_success(text),
            Some(text) => crate::log!("editor"; "{}", text),
            None => {}
        }
        self.shown_status = status.map(str::to_string);
    }
}
