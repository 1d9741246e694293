//! Preview Surface
//!
//! The sandboxed side of the boundary: it owns the preview document, its
//! working copy of the section sources and the selection state. It talks to
//! the host only through `protocol::Message`s pushed to its outbox.
//!
//! # Lifecycle
//!
//! ```text
//! Booting ──boot()──▶ Ready ──first mount + interaction delay──▶ Interactive
//!             posts `ready`                      posts `interaction-ready`
//! ```
//!
//! `render` is dropped while `Booting`; `update` and `clear-selection` are
//! dropped until `Interactive`. Pointer events are only intercepted once
//! `Interactive`.
//!
//! The surface is sans-IO: time is passed in, messages are collected in an
//! outbox, and `actor::preview` drives it.

pub mod descriptor;
pub mod mutate;
pub mod render;
pub mod selection;

use std::time::{Duration, Instant};

use rustc_hash::FxHashMap;

use crate::dom::{self, Document, NodeId};
use crate::protocol::Message;
use selection::SelectionTracker;

/// Readiness of the preview side.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Readiness {
    Booting,
    Ready,
    Interactive,
}

/// Pointer event delivered to an element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pointer {
    Over,
    Out,
    Click,
}

pub struct PreviewSurface {
    doc: Document,
    /// Working copy of the sources, keyed by path
    files: FxHashMap<String, String>,
    entry: String,
    readiness: Readiness,
    tracker: SelectionTracker,
    interaction_delay: Duration,
    /// When the interaction layer attaches (set at first mount)
    interaction_at: Option<Instant>,
    outbox: Vec<Message>,
}

impl PreviewSurface {
    pub fn new(entry: impl Into<String>, interaction_delay: Duration) -> Self {
        Self {
            doc: Document::new(),
            files: FxHashMap::default(),
            entry: entry.into(),
            readiness: Readiness::Booting,
            tracker: SelectionTracker::new(),
            interaction_delay,
            interaction_at: None,
            outbox: Vec::new(),
        }
    }

    #[inline]
    pub fn readiness(&self) -> Readiness {
        self.readiness
    }

    #[inline]
    pub fn document(&self) -> &Document {
        &self.doc
    }

    #[cfg(test)]
    pub fn selected(&self) -> Option<NodeId> {
        self.tracker.selected()
    }

    #[cfg(test)]
    pub fn file(&self, path: &str) -> Option<&str> {
        self.files.get(path).map(String::as_str)
    }

    /// Boot the surface and announce it.
    pub fn boot(&mut self) {
        if self.readiness != Readiness::Booting {
            return;
        }
        self.readiness = Readiness::Ready;
        self.outbox.push(Message::Ready);
    }

    /// Handle one message from the host.
    pub fn handle(&mut self, message: Message, now: Instant) {
        match message {
            Message::Render { path, code } => {
                if self.readiness == Readiness::Booting {
                    crate::debug!("preview"; "render for {} before ready, dropped", path);
                    return;
                }
                self.files.insert(path, code);
                self.remount(now);
            }
            Message::Update {
                address,
                property,
                value,
            } => {
                if self.readiness != Readiness::Interactive {
                    crate::debug!("preview"; "update before interaction-ready, dropped");
                    return;
                }
                let root = self.doc.root();
                let Some(node) = dom::resolve_address(&self.doc, root, &address) else {
                    crate::debug!("preview"; "stale address {}, update ignored", address);
                    return;
                };
                if !mutate::apply(&mut self.doc, node, &property, &value) {
                    crate::debug!("preview"; "unsupported property {}", property);
                }
            }
            Message::ClearSelection => {
                if self.readiness != Readiness::Interactive {
                    crate::debug!("preview"; "clear-selection before interaction-ready, dropped");
                    return;
                }
                self.tracker.clear(&mut self.doc);
            }
            other => {
                crate::debug!("preview"; "unexpected {} from host", other.kind());
            }
        }
    }

    /// Rebuild the document from the working copy.
    fn remount(&mut self, now: Instant) {
        let markup = match render::render_entry(&self.files, &self.entry) {
            Ok(markup) => markup,
            Err(e) => {
                crate::debug!("preview"; "mount skipped: {}", e);
                return;
            }
        };

        let mut doc = Document::new();
        let root = doc.root();
        dom::parse::parse_into(&mut doc, root, &markup);
        self.doc = doc;
        self.tracker.reset();

        if self.readiness == Readiness::Ready && self.interaction_at.is_none() {
            self.interaction_at = Some(now + self.interaction_delay);
        }
    }

    /// Advance timers; attaches the interaction layer once due.
    pub fn poll(&mut self, now: Instant) {
        if let Some(at) = self.interaction_at
            && self.readiness == Readiness::Ready
            && now >= at
        {
            self.interaction_at = None;
            self.readiness = Readiness::Interactive;
            self.outbox.push(Message::InteractionReady);
        }
    }

    /// Time until the next `poll` has work, if any.
    pub fn next_deadline(&self, now: Instant) -> Option<Duration> {
        self.interaction_at
            .filter(|_| self.readiness == Readiness::Ready)
            .map(|at| at.saturating_duration_since(now))
    }

    /// Deliver a pointer event. Returns whether the default action was prevented.
    pub fn pointer(&mut self, event: Pointer, node: NodeId) -> bool {
        if self.readiness != Readiness::Interactive || !self.doc.contains(self.doc.root(), node) {
            return false;
        }
        match event {
            Pointer::Over => {
                self.tracker.hover(&mut self.doc, node);
                false
            }
            Pointer::Out => {
                self.tracker.unhover(&mut self.doc, node);
                false
            }
            Pointer::Click => {
                let element = self.tracker.select(&mut self.doc, node);
                self.outbox.push(Message::Selected { element });
                true
            }
        }
    }

    /// Pointer event on the element at `address`.
    #[cfg(test)]
    pub fn pointer_at(&mut self, event: Pointer, address: &dom::ElementAddress) -> bool {
        match dom::resolve_address(&self.doc, self.doc.root(), address) {
            Some(node) => self.pointer(event, node),
            None => false,
        }
    }

    /// Deepest element whose trimmed text equals `text`.
    pub fn find_by_text(&self, text: &str) -> Option<NodeId> {
        let text = text.trim();
        self.doc
            .descendants(self.doc.root())
            .into_iter()
            .rev()
            .find(|&n| self.doc.text_content(n).trim() == text)
    }

    /// Take everything posted since the last drain.
    pub fn drain_outbox(&mut self) -> Vec<Message> {
        std::mem::take(&mut self.outbox)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::ElementAddress;
    use crate::dom::class::SELECTED_MARKER;
    use crate::preview::mutate::Property;

    const APP: &str = "import Hero from './Hero';\nexport default function App() {\n  return (\n    <div className=\"min-h-screen\"><Hero /></div>\n  );\n}";
    const HERO: &str = "export default function Hero() {\n  return (\n    <section><h1 className=\"text-lg font-normal text-black\">Hello</h1></section>\n  );\n}";

    fn interactive() -> (PreviewSurface, Instant) {
        let now = Instant::now();
        let mut surface = PreviewSurface::new("/App.tsx", Duration::from_millis(100));
        surface.boot();
        surface.handle(Message::render("/Hero.tsx", HERO), now);
        surface.handle(Message::render("/App.tsx", APP), now);
        surface.poll(now + Duration::from_millis(100));
        (surface, now)
    }

    fn h1() -> ElementAddress {
        ElementAddress::new([0, 0, 0])
    }

    #[test]
    fn test_boot_sequence() {
        let (mut surface, _) = interactive();
        assert_eq!(surface.readiness(), Readiness::Interactive);
        assert_eq!(
            surface.drain_outbox(),
            vec![Message::Ready, Message::InteractionReady]
        );
    }

    #[test]
    fn test_render_before_ready_dropped() {
        let now = Instant::now();
        let mut surface = PreviewSurface::new("/App.tsx", Duration::ZERO);
        surface.handle(Message::render("/App.tsx", APP), now);
        assert_eq!(surface.file("/App.tsx"), None);
        assert_eq!(surface.readiness(), Readiness::Booting);
    }

    #[test]
    fn test_update_before_interaction_ready_dropped() {
        let now = Instant::now();
        let mut surface = PreviewSurface::new("/App.tsx", Duration::from_millis(100));
        surface.boot();
        surface.handle(Message::render("/Hero.tsx", HERO), now);
        surface.handle(Message::render("/App.tsx", APP), now);
        let before = surface.document().to_html(surface.document().root());

        surface.handle(
            Message::update(h1(), Property::TextContent, "Changed"),
            now + Duration::from_millis(10),
        );
        surface.poll(now + Duration::from_millis(50));

        assert_eq!(surface.readiness(), Readiness::Ready);
        assert_eq!(surface.document().to_html(surface.document().root()), before);
    }

    #[test]
    fn test_click_selects_and_reports() {
        let (mut surface, _) = interactive();
        surface.drain_outbox();

        assert!(surface.pointer_at(Pointer::Click, &h1()));
        let out = surface.drain_outbox();
        let [Message::Selected { element }] = out.as_slice() else {
            panic!("expected one selected message, got {out:?}");
        };
        assert_eq!(element.tag_name, "H1");
        assert_eq!(element.address, h1());
        assert!(element.class_name.contains(SELECTED_MARKER));
    }

    #[test]
    fn test_update_mutates_live_node() {
        let (mut surface, now) = interactive();
        surface.handle(
            Message::update(h1(), Property::FontWeight, "font-bold"),
            now,
        );
        let doc = surface.document();
        let node = dom::resolve_address(doc, doc.root(), &h1()).unwrap();
        assert_eq!(doc.class_name(node), "text-lg text-black font-bold");
    }

    #[test]
    fn test_stale_address_ignored() {
        let (mut surface, now) = interactive();
        let before = surface.document().to_html(surface.document().root());
        surface.handle(
            Message::update(ElementAddress::new([4, 4]), Property::TextContent, "x"),
            now,
        );
        assert_eq!(surface.document().to_html(surface.document().root()), before);
    }

    #[test]
    fn test_rerender_discards_selection() {
        let (mut surface, now) = interactive();
        surface.pointer_at(Pointer::Click, &h1());
        assert!(surface.selected().is_some());

        surface.handle(Message::render("/Hero.tsx", HERO.replace("Hello", "Hi")), now);
        assert_eq!(surface.selected(), None);
        assert!(surface.find_by_text("Hi").is_some());
    }

    #[test]
    fn test_pointer_ignored_before_interactive() {
        let now = Instant::now();
        let mut surface = PreviewSurface::new("/App.tsx", Duration::from_millis(100));
        surface.boot();
        surface.handle(Message::render("/Hero.tsx", HERO), now);
        surface.handle(Message::render("/App.tsx", APP), now);
        surface.drain_outbox();

        assert!(!surface.pointer_at(Pointer::Click, &h1()));
        assert!(surface.drain_outbox().is_empty());
    }

    #[test]
    fn test_clear_selection() {
        let (mut surface, now) = interactive();
        surface.pointer_at(Pointer::Click, &h1());
        surface.handle(Message::ClearSelection, now);
        assert_eq!(surface.selected(), None);
        let doc = surface.document();
        let node = dom::resolve_address(doc, doc.root(), &h1()).unwrap();
        assert!(!doc.class_name(node).contains(SELECTED_MARKER));
    }
}
