//! Origin-verified transport between host and preview.
//!
//! A link is a pair of unbounded FIFO channels carrying JSON frames. Each
//! receiving half knows the one peer it accepts frames from; frames with a
//! foreign sender, a foreign protocol version, a message type the peer may
//! not send, or a malformed body are dropped and only debug-logged.

use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::mpsc;

use super::{EndpointId, Envelope, Message, PROTOCOL_VERSION};

/// Shared record of every frame posted on a link, in post order.
#[derive(Debug, Clone, Default)]
pub struct FrameLog(Arc<Mutex<Vec<(EndpointId, String)>>>);

impl FrameLog {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&self, source: EndpointId, frame: &str) {
        self.0.lock().push((source, frame.to_string()));
    }

    /// Snapshot of all frames so far.
    pub fn frames(&self) -> Vec<(EndpointId, String)> {
        self.0.lock().clone()
    }

    /// Decoded messages sent by `source`.
    pub fn messages_from(&self, source: EndpointId) -> Vec<Message> {
        self.0
            .lock()
            .iter()
            .filter(|(s, _)| *s == source)
            .filter_map(|(_, frame)| Envelope::from_json(frame))
            .map(|env| env.message)
            .collect()
    }
}

/// Sending half, stamped with the local endpoint.
#[derive(Debug, Clone)]
pub struct LinkTx {
    local: EndpointId,
    tx: mpsc::UnboundedSender<String>,
    log: Option<FrameLog>,
}

impl LinkTx {
    /// Create a sender over a raw frame channel.
    pub fn new(local: EndpointId, tx: mpsc::UnboundedSender<String>) -> Self {
        Self {
            local,
            tx,
            log: None,
        }
    }

    /// Record every posted frame in `log`.
    pub fn with_log(mut self, log: FrameLog) -> Self {
        self.log = Some(log);
        self
    }

    #[inline]
    pub fn local(&self) -> EndpointId {
        self.local
    }

    /// Post a message. Fire-and-forget: returns `false` once the peer is gone.
    pub fn send(&self, message: Message) -> bool {
        let frame = Envelope::new(self.local, message).to_json();
        if let Some(log) = &self.log {
            log.push(self.local, &frame);
        }
        self.tx.send(frame).is_ok()
    }
}

/// Why a frame was dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rejected {
    Malformed,
    Version(u32),
    Sender(EndpointId),
    Direction(&'static str),
}

/// Receiving half, bound to the one peer it accepts.
#[derive(Debug)]
pub struct LinkRx {
    peer: EndpointId,
    rx: mpsc::UnboundedReceiver<String>,
}

impl LinkRx {
    pub fn new(peer: EndpointId, rx: mpsc::UnboundedReceiver<String>) -> Self {
        Self { peer, rx }
    }

    #[inline]
    pub fn peer(&self) -> EndpointId {
        self.peer
    }

    /// Next accepted message; `None` once every sender is gone.
    pub async fn recv(&mut self) -> Option<Message> {
        while let Some(frame) = self.rx.recv().await {
            if let Some(message) = self.accept(&frame) {
                return Some(message);
            }
        }
        None
    }

    /// Next accepted message without waiting.
    pub fn try_recv(&mut self) -> Option<Message> {
        while let Ok(frame) = self.rx.try_recv() {
            if let Some(message) = self.accept(&frame) {
                return Some(message);
            }
        }
        None
    }

    fn accept(&self, frame: &str) -> Option<Message> {
        match verify(frame, self.peer) {
            Ok(message) => Some(message),
            Err(reason) => {
                crate::debug!("link"; "dropped frame for {}: {:?}", self.peer.peer(), reason);
                None
            }
        }
    }
}

/// Check a frame against the expected peer and protocol version.
pub fn verify(frame: &str, peer: EndpointId) -> Result<Message, Rejected> {
    let envelope = Envelope::from_json(frame).ok_or(Rejected::Malformed)?;
    if envelope.v != PROTOCOL_VERSION {
        return Err(Rejected::Version(envelope.v));
    }
    if envelope.source != peer {
        return Err(Rejected::Sender(envelope.source));
    }
    if envelope.message.sender() != peer {
        return Err(Rejected::Direction(envelope.message.kind()));
    }
    Ok(envelope.message)
}

/// Host and preview ends of a fresh link.
pub struct LinkPair {
    pub host_tx: LinkTx,
    pub host_rx: LinkRx,
    pub preview_tx: LinkTx,
    pub preview_rx: LinkRx,
}

/// Wire both directions.
pub fn pair() -> LinkPair {
    let (to_preview, from_host) = mpsc::unbounded_channel();
    let (to_host, from_preview) = mpsc::unbounded_channel();
    LinkPair {
        host_tx: LinkTx::new(EndpointId::Host, to_preview),
        host_rx: LinkRx::new(EndpointId::Preview, from_preview),
        preview_tx: LinkTx::new(EndpointId::Preview, to_host),
        preview_rx: LinkRx::new(EndpointId::Host, from_host),
    }
}
