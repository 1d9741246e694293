//! Element descriptors: the serialized snapshot of a selected element.

use serde::{Deserialize, Serialize};

use crate::dom::class;
use crate::dom::style::{StyleSnapshot, compute_style};
use crate::dom::{Document, ElementAddress, NodeId, compute_address};

/// Classes included in a generated selector.
const SELECTOR_CLASSES: usize = 3;

/// Snapshot of a selected element, as shipped in a `selected` message.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElementDescriptor {
    /// Upper-case tag name (`H1`), as a browser reports it.
    pub tag_name: String,
    pub address: ElementAddress,
    /// Trimmed text content.
    pub text_content: String,
    /// Raw class attribute, transient marker classes included.
    pub class_name: String,
    pub styles: StyleSnapshot,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub selector: String,
}

impl ElementDescriptor {
    /// Capture `node` relative to `root`.
    pub fn capture(doc: &Document, root: NodeId, node: NodeId) -> Self {
        let id = doc.attr(node, "id").filter(|id| !id.is_empty()).map(str::to_string);
        Self {
            tag_name: doc.tag(node).unwrap_or_default().to_ascii_uppercase(),
            address: compute_address(doc, root, node),
            text_content: doc.text_content(node).trim().to_string(),
            class_name: doc.class_name(node).to_string(),
            styles: compute_style(doc, node),
            id,
            selector: selector(doc, node),
        }
    }

    /// Lower-case tag name.
    pub fn tag(&self) -> String {
        self.tag_name.to_ascii_lowercase()
    }
}

/// `#id`, or `tag.c1.c2.c3` from the first non-marker classes.
pub fn selector(doc: &Document, node: NodeId) -> String {
    if let Some(id) = doc.attr(node, "id").filter(|id| !id.is_empty()) {
        return format!("#{id}");
    }
    let mut selector = doc.tag(node).unwrap_or_default().to_ascii_lowercase();
    for class in class::tokens(doc.class_name(node))
        .filter(|c| !class::is_marker(c))
        .take(SELECTOR_CLASSES)
    {
        selector.push('.');
        selector.push_str(class);
    }
    selector
}

/// Short label shown on the selected element: `tag#id.first-class`.
pub fn element_info(doc: &Document, node: NodeId) -> String {
    let mut info = doc.tag(node).unwrap_or_default().to_ascii_lowercase();
    if let Some(id) = doc.attr(node, "id").filter(|id| !id.is_empty()) {
        info.push('#');
        info.push_str(id);
    }
    if let Some(first) = class::tokens(doc.class_name(node)).find(|c| !class::is_marker(c)) {
        info.push('.');
        info.push_str(first);
    }
    info
}
