//! Selection Tracker: owns which element is selected and hovered.
//!
//! ```text
//! Idle ──click──▶ Selected(a) ──click──▶ Selected(b)
//!   ▲                  │
//!   └─clear-selection──┘
//! ```
//!
//! The selected element carries the `vise-selected` marker class and a
//! `data-element-info` label; a hovered element carries `vise-hoverable`.

use crate::dom::class::{self, HOVER_MARKER, SELECTED_MARKER};
use crate::dom::{Document, NodeId};

use super::descriptor::{ElementDescriptor, element_info};

/// Attribute holding the label of the selected element.
pub const INFO_ATTR: &str = "data-element-info";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Selection {
    #[default]
    Idle,
    Selected(NodeId),
}

#[derive(Debug, Default)]
pub struct SelectionTracker {
    state: Selection,
    hovered: Option<NodeId>,
}

impl SelectionTracker {
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    pub fn state(&self) -> Selection {
        self.state
    }

    pub fn selected(&self) -> Option<NodeId> {
        match self.state {
            Selection::Selected(node) => Some(node),
            Selection::Idle => None,
        }
    }

    /// Select `node`, moving the marking off any prior selection.
    ///
    /// The descriptor is captured after marking, so its class string
    /// includes the selection marker.
    pub fn select(&mut self, doc: &mut Document, node: NodeId) -> ElementDescriptor {
        self.unmark_selected(doc);

        if self.hovered == Some(node) {
            self.hovered = None;
        }
        remove_marker(doc, node, HOVER_MARKER);
        add_marker(doc, node, SELECTED_MARKER);
        let info = element_info(doc, node);
        doc.set_attr(node, INFO_ATTR, &info);

        self.state = Selection::Selected(node);
        ElementDescriptor::capture(doc, doc.root(), node)
    }

    /// Drop the selection and its marking.
    pub fn clear(&mut self, doc: &mut Document) {
        self.unmark_selected(doc);
        self.state = Selection::Idle;
    }

    /// Forget all state without touching the document (after a remount).
    pub fn reset(&mut self) {
        self.state = Selection::Idle;
        self.hovered = None;
    }

    /// Pointer entered `node`. The selected element is never hover-marked.
    pub fn hover(&mut self, doc: &mut Document, node: NodeId) {
        if self.selected() == Some(node) {
            return;
        }
        add_marker(doc, node, HOVER_MARKER);
        self.hovered = Some(node);
    }

    /// Pointer left `node`.
    pub fn unhover(&mut self, doc: &mut Document, node: NodeId) {
        remove_marker(doc, node, HOVER_MARKER);
        if self.hovered == Some(node) {
            self.hovered = None;
        }
    }

    fn unmark_selected(&mut self, doc: &mut Document) {
        if let Selection::Selected(prev) = self.state {
            remove_marker(doc, prev, SELECTED_MARKER);
            doc.remove_attr(prev, INFO_ATTR);
        }
    }
}

fn add_marker(doc: &mut Document, node: NodeId, marker: &str) {
    let next = class::add_class(doc.class_name(node), marker);
    doc.set_class_name(node, &next);
}

fn remove_marker(doc: &mut Document, node: NodeId, marker: &str) {
    let current = doc.class_name(node);
    if !class::has_class(current, marker) {
        return;
    }
    let next = class::remove_class(current, marker);
    if next.is_empty() {
        doc.remove_attr(node, "class");
    } else {
        doc.set_class_name(node, &next);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::parse::parse_into;

    fn doc() -> (Document, NodeId, NodeId) {
        let mut doc = Document::new();
        let root = doc.root();
        parse_into(&mut doc, root, r#"<h1 class="title">A</h1><p>B</p>"#);
        let kids: Vec<_> = doc.element_children(root).collect();
        (doc, kids[0], kids[1])
    }

    #[test]
    fn test_select_marks_and_describes() {
        let (mut doc, h1, _) = doc();
        let mut tracker = SelectionTracker::new();
        let desc = tracker.select(&mut doc, h1);

        assert_eq!(tracker.state(), Selection::Selected(h1));
        assert_eq!(doc.class_name(h1), "title vise-selected");
        assert_eq!(doc.attr(h1, INFO_ATTR), Some("h1.title"));
        assert_eq!(desc.class_name, "title vise-selected");
    }

    #[test]
    fn test_reselect_moves_marking() {
        let (mut doc, h1, p) = doc();
        let mut tracker = SelectionTracker::new();
        tracker.select(&mut doc, h1);
        tracker.select(&mut doc, p);

        assert_eq!(tracker.selected(), Some(p));
        assert_eq!(doc.class_name(h1), "title");
        assert_eq!(doc.attr(h1, INFO_ATTR), None);
        assert_eq!(doc.class_name(p), "vise-selected");
    }

    #[test]
    fn test_clear_restores_markup() {
        let (mut doc, h1, p) = doc();
        let before = doc.to_html(doc.root());
        let mut tracker = SelectionTracker::new();
        tracker.select(&mut doc, p);
        tracker.clear(&mut doc);

        assert_eq!(tracker.state(), Selection::Idle);
        assert_eq!(doc.to_html(doc.root()), before);
        assert_eq!(doc.class_name(h1), "title");
    }

    #[test]
    fn test_hover_skips_selected() {
        let (mut doc, h1, p) = doc();
        let mut tracker = SelectionTracker::new();
        tracker.select(&mut doc, h1);

        tracker.hover(&mut doc, h1);
        assert!(!doc.class_name(h1).contains(HOVER_MARKER));

        tracker.hover(&mut doc, p);
        assert_eq!(doc.class_name(p), HOVER_MARKER);
        tracker.unhover(&mut doc, p);
        assert_eq!(doc.attr(p, "class"), None);
    }

    #[test]
    fn test_click_clears_hover_marker() {
        let (mut doc, _, p) = doc();
        let mut tracker = SelectionTracker::new();
        tracker.hover(&mut doc, p);
        let desc = tracker.select(&mut doc, p);
        assert_eq!(desc.class_name, SELECTED_MARKER);
    }
}
