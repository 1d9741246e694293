//! Actor Coordinator
//!
//! Wires the link pair and command channels, spawns the actors, and hands
//! back a `Session` for driving them.
//!
//! ```text
//! Coordinator::start
//!   ├─ link::pair()            host ⇄ preview frames
//!   ├─ HostActor               (+ sources written back with `persist`)
//!   ├─ PreviewActor            boots and announces `ready`
//!   └─ FsActor                 only with `watch`
//! ```

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;

use super::fs::FsActor;
use super::host::HostActor;
use super::messages::{HostMsg, HostSnapshot, PreviewMsg, Target};
use super::preview::PreviewActor;
use crate::config::ViseConfig;
use crate::host::Host;
use crate::preview::{Pointer, PreviewSurface};
use crate::protocol::{FrameLog, link};
use crate::source::SourceSet;
use crate::store::MockStore;

/// How long `shutdown` waits for each actor.
const SHUTDOWN_GRACE: Duration = Duration::from_millis(500);

pub struct Coordinator {
    config: Arc<ViseConfig>,
    sources: SourceSet,
    store: Arc<MockStore>,
    log: FrameLog,
    /// Sections directory to write to / watch
    dir: Option<PathBuf>,
    persist: bool,
    watch: bool,
    startup_status: Option<String>,
}

impl Coordinator {
    pub fn new(config: Arc<ViseConfig>, sources: SourceSet) -> Self {
        Self {
            config,
            sources,
            store: Arc::new(MockStore::new()),
            log: FrameLog::new(),
            dir: None,
            persist: false,
            watch: false,
            startup_status: None,
        }
    }

    /// Write patched sources back under `dir`.
    pub fn with_persist(mut self, dir: PathBuf) -> Self {
        self.dir = Some(dir);
        self.persist = true;
        self
    }

    /// Watch `dir` for changes made outside the editor.
    pub fn with_watch(mut self, dir: PathBuf) -> Self {
        self.dir = Some(dir);
        self.watch = true;
        self
    }

    /// Status line shown once the host starts.
    pub fn with_startup_status(mut self, status: impl Into<String>) -> Self {
        self.startup_status = Some(status.into());
        self
    }

    /// Spawn all actors on the current runtime.
    pub fn start(self) -> Result<Session> {
        let link::LinkPair {
            host_tx,
            host_rx,
            preview_tx,
            preview_rx,
        } = link::pair();
        let host_tx = host_tx.with_log(self.log.clone());
        let preview_tx = preview_tx.with_log(self.log.clone());

        let (host_cmd_tx, host_cmd_rx) = mpsc::unbounded_channel();
        let (preview_cmd_tx, preview_cmd_rx) = mpsc::unbounded_channel();

        // Watcher first, so nothing written after loading is missed
        let fs = match (&self.dir, self.watch) {
            (Some(dir), true) => {
                let dir = dir.canonicalize().unwrap_or_else(|_| dir.clone());
                let actor = FsActor::new(dir.clone(), self.sources.clone(), host_cmd_tx.clone())
                    .with_context(|| format!("failed to watch {}", dir.display()))?;
                Some(actor)
            }
            _ => None,
        };

        let entry = self.sources.entry().to_string();
        let host = Host::new(self.sources, self.config.editor.clone(), self.store);
        let mut host_actor = HostActor::new(host, host_tx, host_rx, host_cmd_rx);
        if let (Some(dir), true) = (&self.dir, self.persist) {
            host_actor = host_actor.with_persist_dir(dir.clone());
        }
        if self.watch {
            host_actor = host_actor.with_status_line();
        }

        let surface = PreviewSurface::new(entry, self.config.preview.interaction_delay());
        let preview_actor = PreviewActor::new(surface, preview_tx, preview_rx, preview_cmd_rx);

        if let Some(status) = self.startup_status {
            let _ = host_cmd_tx.send(HostMsg::Status(status));
        }

        let mut handles = vec![
            tokio::spawn(host_actor.run()),
            tokio::spawn(preview_actor.run()),
        ];
        if let Some(fs) = fs {
            handles.push(tokio::spawn(fs.run()));
        }

        crate::debug!("actor"; "started {} actor(s)", handles.len());
        Ok(Session {
            host: host_cmd_tx,
            preview: preview_cmd_tx,
            log: self.log,
            handles,
        })
    }

    /// Run until Ctrl+C or until an actor stops.
    pub async fn run(self) -> Result<()> {
        let session = self.start()?;

        tokio::select! {
            _ = crate::core::wait_for_shutdown() => {
                crate::debug!("actor"; "shutdown signal received");
            }
            _ = session.any_stopped() => {
                crate::debug!("actor"; "an actor stopped");
            }
        }

        session.shutdown().await;
        Ok(())
    }
}

/// Handle to a running set of actors.
pub struct Session {
    host: mpsc::UnboundedSender<HostMsg>,
    preview: mpsc::UnboundedSender<PreviewMsg>,
    log: FrameLog,
    handles: Vec<JoinHandle<()>>,
}

impl Session {
    /// Every frame posted so far, in post order.
    pub fn frame_log(&self) -> &FrameLog {
        &self.log
    }

    pub fn send(&self, msg: HostMsg) -> Result<()> {
        self.host
            .send(msg)
            .map_err(|_| anyhow!("host actor stopped"))
    }

    pub async fn snapshot(&self) -> Result<HostSnapshot> {
        let (reply, answer) = oneshot::channel();
        self.send(HostMsg::Snapshot(reply))?;
        answer.await.context("host actor stopped")
    }

    /// Deliver a pointer event in the preview.
    pub async fn pointer(&self, event: Pointer, target: Target) -> Result<bool> {
        let (reply, answer) = oneshot::channel();
        self.preview
            .send(PreviewMsg::Pointer {
                event,
                target,
                reply,
            })
            .map_err(|_| anyhow!("preview actor stopped"))?;
        answer.await.context("preview actor stopped")
    }

    /// Rendered preview document.
    pub async fn html(&self) -> Result<String> {
        let (reply, answer) = oneshot::channel();
        self.preview
            .send(PreviewMsg::Html(reply))
            .map_err(|_| anyhow!("preview actor stopped"))?;
        answer.await.context("preview actor stopped")
    }

    async fn sync_preview(&self) -> Result<()> {
        let (reply, answer) = oneshot::channel();
        self.preview
            .send(PreviewMsg::Sync(reply))
            .map_err(|_| anyhow!("preview actor stopped"))?;
        answer.await.context("preview actor stopped")
    }

    /// Wait until both actors have handled everything already in flight.
    ///
    /// Each actor drains its link before commands, so two round trips cover
    /// a host message, the preview's answer, and the host's reaction to it.
    pub async fn settle(&self) -> Result<()> {
        for _ in 0..2 {
            self.snapshot().await?;
            self.sync_preview().await?;
        }
        self.snapshot().await.map(|_| ())
    }

    async fn any_stopped(&self) {
        while !self.handles.iter().any(JoinHandle::is_finished) {
            tokio::time::sleep(Duration::from_millis(100)).await;
        }
    }

    /// Stop every actor, waiting briefly for each.
    pub async fn shutdown(self) {
        let _ = self.host.send(HostMsg::Shutdown);
        let _ = self.preview.send(PreviewMsg::Shutdown);
        for handle in self.handles {
            if tokio::time::timeout(SHUTDOWN_GRACE, handle).await.is_err() {
                crate::debug!("actor"; "actor did not stop in time");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::preview::mutate::Property;
    use crate::protocol::{EndpointId, Message};
    use tempfile::TempDir;

    const APP: &str = "export default function App() {\n  return (\n    <div className=\"min-h-screen\">\n      <Hero />\n    </div>\n  );\n}";
    const HERO: &str = "export default function Hero() {\n  return (\n    <section><h1 className=\"text-lg font-normal\">Hello</h1></section>\n  );\n}";

    fn sources() -> SourceSet {
        let mut set = SourceSet::new("/App.tsx");
        set.insert("/App.tsx", APP);
        set.insert("/Hero.tsx", HERO);
        set
    }

    async fn wait_interactive(session: &Session) {
        for _ in 0..100 {
            if session.snapshot().await.unwrap().interaction_ready {
                return;
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
        panic!("preview never became interactive");
    }

    #[tokio::test(start_paused = true)]
    async fn test_click_edit_reload() {
        let config = Arc::new(ViseConfig::default());
        let session = Coordinator::new(config, sources()).start().unwrap();
        wait_interactive(&session).await;

        let hit = session
            .pointer(Pointer::Click, Target::Text("Hello".into()))
            .await
            .unwrap();
        assert!(hit);
        session.settle().await.unwrap();
        let selected = session.snapshot().await.unwrap().selected.unwrap();
        assert_eq!(selected.tag_name, "H1");

        session
            .send(HostMsg::Edit {
                property: Property::TextContent,
                value: "Hi there".into(),
            })
            .unwrap();
        tokio::time::sleep(Duration::from_millis(400)).await;
        session.settle().await.unwrap();

        let snapshot = session.snapshot().await.unwrap();
        assert!(snapshot.sources.get("/Hero.tsx").unwrap().contains(">Hi there<"));
        assert_eq!(snapshot.changes.len(), 1);
        assert_eq!(snapshot.changes[0].patched.as_deref(), Some("/Hero.tsx"));
        assert_eq!(snapshot.status.as_deref(), Some("Auto-saved"));
        assert!(session.html().await.unwrap().contains("Hi there"));

        session.send(HostMsg::Reload).unwrap();
        session.settle().await.unwrap();
        assert!(session.html().await.unwrap().contains("Hi there"));
        assert!(session.snapshot().await.unwrap().selected.is_none());

        let sent = session.frame_log().messages_from(EndpointId::Host);
        let updates = sent
            .iter()
            .filter(|m| matches!(m, Message::Update { .. }))
            .count();
        assert_eq!(updates, 1);

        session.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_startup_status_and_persist() {
        let dir = TempDir::new().unwrap();
        let config = Arc::new(ViseConfig::default());
        let session = Coordinator::new(config, sources())
            .with_persist(dir.path().to_path_buf())
            .with_startup_status("Failed to load files")
            .start()
            .unwrap();
        assert_eq!(
            session.snapshot().await.unwrap().status.as_deref(),
            Some("Failed to load files")
        );
        wait_interactive(&session).await;

        session
            .pointer(Pointer::Click, Target::Text("Hello".into()))
            .await
            .unwrap();
        session.settle().await.unwrap();
        session
            .send(HostMsg::Edit {
                property: Property::ClassName,
                value: "text-xl".into(),
            })
            .unwrap();
        session.settle().await.unwrap();

        let hero = std::fs::read_to_string(dir.path().join("Hero.tsx")).unwrap();
        assert!(hero.contains("className=\"text-xl\""));
        session.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_pending_edit_persisted_across_file_update() {
        let dir = TempDir::new().unwrap();
        let config = Arc::new(ViseConfig::default());
        let session = Coordinator::new(config, sources())
            .with_persist(dir.path().to_path_buf())
            .start()
            .unwrap();
        wait_interactive(&session).await;

        session
            .pointer(Pointer::Click, Target::Text("Hello".into()))
            .await
            .unwrap();
        session.settle().await.unwrap();
        session
            .send(HostMsg::Edit {
                property: Property::TextContent,
                value: "Bye".into(),
            })
            .unwrap();
        session
            .send(HostMsg::FileUpdate {
                path: "/App.tsx".into(),
                code: APP.replace("min-h-screen", "min-h-full"),
            })
            .unwrap();
        session.settle().await.unwrap();

        let snapshot = session.snapshot().await.unwrap();
        assert!(snapshot.sources.get("/Hero.tsx").unwrap().contains(">Bye<"));
        let hero = std::fs::read_to_string(dir.path().join("Hero.tsx")).unwrap();
        assert!(hero.contains("<h1 className=\"text-lg font-normal\">Bye</h1>"));
        // The entry came from disk and was never edited here
        assert!(!dir.path().join("App.tsx").exists());
        session.shutdown().await;
    }

    #[tokio::test]
    async fn test_watch_forwards_outside_edits() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("App.tsx"), APP).unwrap();
        std::fs::write(dir.path().join("Hero.tsx"), HERO).unwrap();

        let config = Arc::new(ViseConfig::default());
        let session = Coordinator::new(config, sources())
            .with_watch(dir.path().to_path_buf())
            .start()
            .unwrap();
        wait_interactive(&session).await;

        let edited = HERO.replace("Hello", "Edited on disk");
        std::fs::write(dir.path().join("Hero.tsx"), &edited).unwrap();

        for _ in 0..100 {
            if session.snapshot().await.unwrap().sources.get("/Hero.tsx") == Some(edited.as_str()) {
                session.settle().await.unwrap();
                assert!(session.html().await.unwrap().contains("Edited on disk"));
                session.shutdown().await;
                return;
            }
            tokio::time::sleep(Duration::from_millis(50)).await;
        }
        panic!("file change never reached the host");
    }
}
