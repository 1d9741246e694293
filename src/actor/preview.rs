//! Preview Actor
//!
//! Drives a `PreviewSurface`: boots it, feeds it host frames, fires the
//! interaction timer, and delivers pointer events from the outside.

use std::time::Duration;

use tokio::sync::mpsc;

use super::clock;
use super::messages::{PreviewMsg, Target};
use crate::dom;
use crate::preview::{PreviewSurface, Readiness};
use crate::protocol::{LinkRx, LinkTx};

const IDLE: Duration = Duration::from_secs(86400);

pub struct PreviewActor {
    surface: PreviewSurface,
    link_tx: LinkTx,
    link_rx: LinkRx,
    rx: mpsc::UnboundedReceiver<PreviewMsg>,
}

impl PreviewActor {
    pub fn new(
        surface: PreviewSurface,
        link_tx: LinkTx,
        link_rx: LinkRx,
        rx: mpsc::UnboundedReceiver<PreviewMsg>,
    ) -> Self {
        Self {
            surface,
            link_tx,
            link_rx,
            rx,
        }
    }

    /// Run the actor event loop
    pub async fn run(mut self) {
        self.surface.boot();
        if !self.flush() {
            return;
        }

        loop {
            let sleep = self.surface.next_deadline(clock()).unwrap_or(IDLE);

            tokio::select! {
                biased;

                message = self.link_rx.recv() => match message {
                    Some(message) => self.surface.handle(message, clock()),
                    None => {
                        crate::debug!("preview"; "host link closed");
                        break;
                    }
                },

                msg = self.rx.recv() => match msg {
                    Some(PreviewMsg::Shutdown) | None => break,
                    Some(msg) => self.handle_msg(msg),
                },

                _ = tokio::time::sleep(sleep) => {
                    self.surface.poll(clock());
                    if self.surface.readiness() == Readiness::Interactive {
                        crate::debug!("preview"; "interaction layer attached");
                    }
                }
            }

            if !self.flush() {
                crate::debug!("preview"; "host gone, stopping");
                break;
            }
        }
    }

    fn handle_msg(&mut self, msg: PreviewMsg) {
        match msg {
            PreviewMsg::Pointer {
                event,
                target,
                reply,
            } => {
                let delivered = self.pointer(event, &target);
                let _ = reply.send(delivered);
            }
            PreviewMsg::Html(reply) => {
                let doc = self.surface.document();
                let _ = reply.send(doc.to_html(doc.root()));
            }
            PreviewMsg::Sync(reply) => {
                let _ = reply.send(());
            }
            PreviewMsg::Shutdown => {}
        }
    }

    /// Deliver a pointer event; `false` if the target is missing or the
    /// surface is not interactive yet.
    fn pointer(&mut self, event: crate::preview::Pointer, target: &Target) -> bool {
        let doc = self.surface.document();
        let node = match target {
            Target::Address(address) => dom::resolve_address(doc, doc.root(), address),
            Target::Text(text) => self.surface.find_by_text(text),
        };
        let Some(node) = node else {
            crate::debug!("preview"; "no element for {:?}", target);
            return false;
        };
        if self.surface.readiness() != Readiness::Interactive {
            crate::debug!("preview"; "pointer before interaction ready, ignored");
            return false;
        }
        self.surface.pointer(event, node);
        true
    }

    fn flush(&mut self) -> bool {
        self.surface
            .drain_outbox()
            .into_iter()
            .all(|message| self.link_tx.send(message))
    }
}
