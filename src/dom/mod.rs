//! Preview Document Model
//!
//! An arena-backed DOM owned by the preview surface. Nodes are addressed by
//! `NodeId` handles that are only meaningful for the document that created
//! them; a re-render builds a fresh document.
//!
//! # Modules
//!
//! - `address` - structural child-index addresses (Path Resolver)
//! - `class` - class lists and mutually exclusive class families
//! - `parse` - markup parsing into the arena (via `tl`)
//! - `style` - computed style snapshot

pub mod address;
pub mod class;
pub mod parse;
pub mod style;

use std::fmt;

use crate::utils::html;

pub use address::{ElementAddress, compute_address, resolve_address};

// =============================================================================
// Node Handles
// =============================================================================

/// Handle to a node inside one `Document`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u32);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "n{}", self.0)
    }
}

/// Element payload: tag name and ordered attributes.
#[derive(Debug, Clone)]
pub struct Element {
    tag: String,
    attrs: Vec<(String, String)>,
}

#[derive(Debug, Clone)]
enum NodeKind {
    Element(Element),
    Text(String),
}

#[derive(Debug, Clone)]
struct Slot {
    kind: NodeKind,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

// =============================================================================
// Document
// =============================================================================

/// Preview document: a `<div id="root">` plus everything mounted below it.
#[derive(Debug, Clone)]
pub struct Document {
    slots: Vec<Slot>,
    root: NodeId,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// Create an empty document with its mount root.
    pub fn new() -> Self {
        let mut doc = Self {
            slots: Vec::new(),
            root: NodeId(0),
        };
        let root = doc.create_element("div");
        doc.set_attr(root, "id", "root");
        doc.root = root;
        doc
    }

    /// The fixed root every `ElementAddress` is relative to.
    #[inline]
    pub fn root(&self) -> NodeId {
        self.root
    }

    fn push(&mut self, kind: NodeKind) -> NodeId {
        #[allow(clippy::cast_possible_truncation)]
        let id = NodeId(self.slots.len() as u32);
        self.slots.push(Slot {
            kind,
            parent: None,
            children: Vec::new(),
        });
        id
    }

    #[inline]
    fn slot(&self, node: NodeId) -> &Slot {
        &self.slots[node.0 as usize]
    }

    #[inline]
    fn slot_mut(&mut self, node: NodeId) -> &mut Slot {
        &mut self.slots[node.0 as usize]
    }

    /// Create a detached element.
    pub fn create_element(&mut self, tag: &str) -> NodeId {
        self.push(NodeKind::Element(Element {
            tag: tag.to_string(),
            attrs: Vec::new(),
        }))
    }

    /// Create a detached text node.
    pub fn create_text(&mut self, text: &str) -> NodeId {
        self.push(NodeKind::Text(text.to_string()))
    }

    /// Append `child` as the last child of `parent`, detaching it first.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        self.detach(child);
        self.slot_mut(child).parent = Some(parent);
        self.slot_mut(parent).children.push(child);
    }

    /// Remove a node from its parent. The node stays in the arena.
    pub fn detach(&mut self, node: NodeId) {
        if let Some(parent) = self.slot_mut(node).parent.take() {
            self.slot_mut(parent).children.retain(|&c| c != node);
        }
    }

    #[inline]
    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.slot(node).parent
    }

    /// All children, text nodes included.
    #[inline]
    pub fn children(&self, node: NodeId) -> &[NodeId] {
        &self.slot(node).children
    }

    /// Element children only - the child list addresses index into.
    pub fn element_children(&self, node: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.children(node)
            .iter()
            .copied()
            .filter(|&c| self.is_element(c))
    }

    /// Position of `node` among its parent's element children.
    pub fn element_index(&self, node: NodeId) -> Option<usize> {
        let parent = self.parent(node)?;
        self.element_children(parent).position(|c| c == node)
    }

    #[inline]
    pub fn is_element(&self, node: NodeId) -> bool {
        matches!(self.slot(node).kind, NodeKind::Element(_))
    }

    fn element(&self, node: NodeId) -> Option<&Element> {
        match &self.slot(node).kind {
            NodeKind::Element(el) => Some(el),
            NodeKind::Text(_) => None,
        }
    }

    fn element_mut(&mut self, node: NodeId) -> Option<&mut Element> {
        match &mut self.slot_mut(node).kind {
            NodeKind::Element(el) => Some(el),
            NodeKind::Text(_) => None,
        }
    }

    /// Tag name as written (`h1`, or `HeroSection` for an unexpanded component).
    pub fn tag(&self, node: NodeId) -> Option<&str> {
        self.element(node).map(|el| el.tag.as_str())
    }

    /// Text of a text node.
    pub fn text(&self, node: NodeId) -> Option<&str> {
        match &self.slot(node).kind {
            NodeKind::Text(text) => Some(text),
            NodeKind::Element(_) => None,
        }
    }

    // -------------------------------------------------------------------------
    // Attributes
    // -------------------------------------------------------------------------

    pub fn attr(&self, node: NodeId, name: &str) -> Option<&str> {
        self.element(node)?
            .attrs
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    #[cfg(test)]
    pub fn attrs(&self, node: NodeId) -> &[(String, String)] {
        self.element(node).map(|el| el.attrs.as_slice()).unwrap_or(&[])
    }

    /// Set an attribute, keeping its original position when it already exists.
    pub fn set_attr(&mut self, node: NodeId, name: &str, value: &str) {
        let Some(el) = self.element_mut(node) else {
            return;
        };
        match el.attrs.iter_mut().find(|(k, _)| k == name) {
            Some((_, v)) => *v = value.to_string(),
            None => el.attrs.push((name.to_string(), value.to_string())),
        }
    }

    pub fn remove_attr(&mut self, node: NodeId, name: &str) {
        if let Some(el) = self.element_mut(node) {
            el.attrs.retain(|(k, _)| k != name);
        }
    }

    /// Raw class attribute (empty when absent).
    pub fn class_name(&self, node: NodeId) -> &str {
        self.attr(node, "class").unwrap_or("")
    }

    pub fn set_class_name(&mut self, node: NodeId, value: &str) {
        self.set_attr(node, "class", value);
    }

    /// Read one declaration from the inline `style` attribute.
    pub fn style_property(&self, node: NodeId, name: &str) -> Option<String> {
        let style = self.attr(node, "style")?;
        parse_declarations(style)
            .into_iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v)
    }

    /// Set one inline style declaration; an empty value removes it.
    pub fn set_style_property(&mut self, node: NodeId, name: &str, value: &str) {
        let mut decls = self
            .attr(node, "style")
            .map(parse_declarations)
            .unwrap_or_default();
        let value = value.trim();

        match decls.iter_mut().find(|(k, _)| k == name) {
            Some(_) if value.is_empty() => decls.retain(|(k, _)| k != name),
            Some((_, v)) => *v = value.to_string(),
            None if value.is_empty() => {}
            None => decls.push((name.to_string(), value.to_string())),
        }

        if decls.is_empty() {
            self.remove_attr(node, "style");
        } else {
            let style = decls
                .iter()
                .map(|(k, v)| format!("{k}: {v}"))
                .collect::<Vec<_>>()
                .join("; ");
            self.set_attr(node, "style", &style);
        }
    }

    // -------------------------------------------------------------------------
    // Text content
    // -------------------------------------------------------------------------

    /// Concatenated text of all descendant text nodes.
    pub fn text_content(&self, node: NodeId) -> String {
        let mut out = String::new();
        self.collect_text(node, &mut out);
        out
    }

    fn collect_text(&self, node: NodeId, out: &mut String) {
        match &self.slot(node).kind {
            NodeKind::Text(text) => out.push_str(text),
            NodeKind::Element(_) => {
                for &child in self.children(node) {
                    self.collect_text(child, out);
                }
            }
        }
    }

    /// Replace all children with a single text node (none when `text` is empty).
    pub fn set_text_content(&mut self, node: NodeId, text: &str) {
        if !self.is_element(node) {
            if let NodeKind::Text(t) = &mut self.slot_mut(node).kind {
                *t = text.to_string();
            }
            return;
        }
        for child in self.slot(node).children.clone() {
            self.slot_mut(child).parent = None;
        }
        self.slot_mut(node).children.clear();
        if !text.is_empty() {
            let text_node = self.create_text(text);
            self.append_child(node, text_node);
        }
    }

    // -------------------------------------------------------------------------
    // Traversal
    // -------------------------------------------------------------------------

    /// Elements below `node` in document order (excluding `node`).
    pub fn descendants(&self, node: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.element_children(node).collect();
        stack.reverse();
        while let Some(current) = stack.pop() {
            out.push(current);
            let mut children: Vec<NodeId> = self.element_children(current).collect();
            children.reverse();
            stack.extend(children);
        }
        out
    }

    /// Whether `node` is `ancestor` or lies below it.
    pub fn contains(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut current = Some(node);
        while let Some(n) = current {
            if n == ancestor {
                return true;
            }
            current = self.parent(n);
        }
        false
    }

    /// Serialize a node (and its subtree) as HTML.
    pub fn to_html(&self, node: NodeId) -> String {
        let mut out = String::new();
        self.write_html(node, &mut out);
        out
    }

    fn write_html(&self, node: NodeId, out: &mut String) {
        match &self.slot(node).kind {
            NodeKind::Text(text) => out.push_str(&html::escape(text)),
            NodeKind::Element(el) => {
                out.push('<');
                out.push_str(&el.tag);
                for (k, v) in &el.attrs {
                    out.push(' ');
                    out.push_str(k);
                    out.push_str("=\"");
                    out.push_str(&html::escape_attr(v));
                    out.push('"');
                }
                out.push('>');
                if html::is_void_element(&el.tag) {
                    return;
                }
                for &child in self.children(node) {
                    self.write_html(child, out);
                }
                out.push_str("</");
                out.push_str(&el.tag);
                out.push('>');
            }
        }
    }
}

/// Split `a: b; c: d` into trimmed declaration pairs.
fn parse_declarations(style: &str) -> Vec<(String, String)> {
    style
        .split(';')
        .filter_map(|decl| {
            let (k, v) = decl.split_once(':')?;
            let (k, v) = (k.trim(), v.trim());
            (!k.is_empty()).then(|| (k.to_ascii_lowercase(), v.to_string()))
        })
        .collect()
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> (Document, NodeId, NodeId) {
        let mut doc = Document::new();
        let section = doc.create_element("section");
        let h1 = doc.create_element("h1");
        let text = doc.create_text("Hello");
        doc.append_child(doc.root(), section);
        doc.append_child(section, h1);
        doc.append_child(h1, text);
        (doc, section, h1)
    }

    #[test]
    fn test_root_is_mount_point() {
        let doc = Document::new();
        assert_eq!(doc.tag(doc.root()), Some("div"));
        assert_eq!(doc.attr(doc.root(), "id"), Some("root"));
    }

    #[test]
    fn test_text_content_roundtrip() {
        let (mut doc, section, h1) = sample();
        assert_eq!(doc.text_content(section), "Hello");

        doc.set_text_content(h1, "Hi there");
        assert_eq!(doc.text_content(h1), "Hi there");
        assert_eq!(doc.children(h1).len(), 1);

        doc.set_text_content(h1, "");
        assert!(doc.children(h1).is_empty());
    }

    #[test]
    fn test_element_children_skip_text() {
        let mut doc = Document::new();
        let p = doc.create_element("p");
        let t = doc.create_text("a");
        let b = doc.create_element("b");
        doc.append_child(doc.root(), p);
        doc.append_child(p, t);
        doc.append_child(p, b);

        assert_eq!(doc.children(p).len(), 2);
        assert_eq!(doc.element_children(p).collect::<Vec<_>>(), vec![b]);
        assert_eq!(doc.element_index(b), Some(0));
    }

    #[test]
    fn test_style_property_set_and_remove() {
        let (mut doc, _, h1) = sample();
        doc.set_style_property(h1, "color", "#ff0000");
        doc.set_style_property(h1, "background-color", "#00ff00");
        assert_eq!(doc.style_property(h1, "color").as_deref(), Some("#ff0000"));
        assert_eq!(
            doc.attr(h1, "style"),
            Some("color: #ff0000; background-color: #00ff00")
        );

        doc.set_style_property(h1, "color", "");
        doc.set_style_property(h1, "background-color", "");
        assert_eq!(doc.attr(h1, "style"), None);
    }

    #[test]
    fn test_set_attr_keeps_position() {
        let (mut doc, _, h1) = sample();
        doc.set_attr(h1, "class", "a");
        doc.set_attr(h1, "id", "x");
        doc.set_attr(h1, "class", "b");
        assert_eq!(doc.attrs(h1)[0], ("class".to_string(), "b".to_string()));
    }

    #[test]
    fn test_descendants_document_order() {
        let (doc, section, h1) = sample();
        assert_eq!(doc.descendants(doc.root()), vec![section, h1]);
        assert!(doc.contains(section, h1));
        assert!(!doc.contains(h1, section));
    }

    #[test]
    fn test_to_html_escapes() {
        let (mut doc, section, h1) = sample();
        doc.set_text_content(h1, "a < b");
        doc.set_class_name(h1, "text-lg");
        assert_eq!(
            doc.to_html(section),
            r#"<section><h1 class="text-lg">a &lt; b</h1></section>"#
        );
    }
}
