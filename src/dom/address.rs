//! Structural element addresses (Path Resolver).
//!
//! An address is the list of element-child indices walked from the preview
//! root down to a node. Addresses are only valid for the render they were
//! computed against; a re-render invalidates all of them.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::{Document, NodeId};

/// Child-index path from the preview root. Serialized as a JSON array.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ElementAddress(SmallVec<[usize; 8]>);

impl ElementAddress {
    #[cfg(test)]
    pub fn new(indices: impl IntoIterator<Item = usize>) -> Self {
        Self(indices.into_iter().collect())
    }

    /// The empty address names the root itself.
    #[cfg(test)]
    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    #[inline]
    pub fn indices(&self) -> &[usize] {
        &self.0
    }

    #[inline]
    pub fn depth(&self) -> usize {
        self.0.len()
    }
}

impl fmt::Display for ElementAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return f.write_str("(root)");
        }
        for (i, index) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(" > ")?;
            }
            write!(f, "{index}")?;
        }
        Ok(())
    }
}

impl FromStr for ElementAddress {
    type Err = std::num::ParseIntError;

    /// Accepts `0 > 2 > 1`, `0.2.1`, `0/2/1` or `0,2,1`. Empty means root.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() || s == "(root)" {
            return Ok(Self::default());
        }
        s.split(['>', '.', '/', ','])
            .map(|part| part.trim().parse::<usize>())
            .collect::<Result<SmallVec<_>, _>>()
            .map(Self)
    }
}

/// Compute the address of `node` relative to `root`.
///
/// Walks up until `root` or a parentless node is reached. A node outside
/// `root` yields the path from its own topmost ancestor instead of failing.
pub fn compute_address(doc: &Document, root: NodeId, node: NodeId) -> ElementAddress {
    let mut indices: SmallVec<[usize; 8]> = SmallVec::new();
    let mut current = node;

    while current != root {
        let Some(parent) = doc.parent(current) else {
            break;
        };
        let Some(index) = doc.element_index(current) else {
            break;
        };
        indices.push(index);
        current = parent;
    }

    indices.reverse();
    ElementAddress(indices)
}

/// Resolve an address back to a node, `None` once an index is out of range.
pub fn resolve_address(doc: &Document, root: NodeId, address: &ElementAddress) -> Option<NodeId> {
    address
        .indices()
        .iter()
        .try_fold(root, |current, &index| doc.element_children(current).nth(index))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::parse::parse_into;

    const MARKUP: &str = r#"
        <section>
          <div>
            <h1>Title</h1>
            <p>Intro <b>bold</b> tail</p>
          </div>
          <ul><li>a</li><li>b</li><li>c</li></ul>
        </section>
        <footer>f</footer>
    "#;

    fn doc() -> Document {
        let mut doc = Document::new();
        let root = doc.root();
        parse_into(&mut doc, root, MARKUP);
        doc
    }

    #[test]
    fn test_roundtrip_every_element() {
        let doc = doc();
        let root = doc.root();
        for node in doc.descendants(root) {
            let address = compute_address(&doc, root, node);
            assert_eq!(resolve_address(&doc, root, &address), Some(node), "{address}");
        }
    }

    #[test]
    fn test_text_nodes_not_counted() {
        let doc = doc();
        let root = doc.root();
        // <b> follows the "Intro " text node but is the first element child
        let b = resolve_address(&doc, root, &ElementAddress::new([0, 0, 1, 0])).unwrap();
        assert_eq!(doc.tag(b), Some("b"));
    }

    #[test]
    fn test_out_of_range_is_none() {
        let doc = doc();
        let root = doc.root();
        assert_eq!(resolve_address(&doc, root, &ElementAddress::new([0, 1, 3])), None);
        assert_eq!(resolve_address(&doc, root, &ElementAddress::new([7])), None);
        assert_eq!(resolve_address(&doc, root, &ElementAddress::new([1, 0])), None);
    }

    #[test]
    fn test_empty_address_is_root() {
        let doc = doc();
        let root = doc.root();
        assert_eq!(compute_address(&doc, root, root), ElementAddress::default());
        assert_eq!(resolve_address(&doc, root, &ElementAddress::default()), Some(root));
    }

    #[test]
    fn test_detached_node_partial_address() {
        let mut doc = doc();
        let root = doc.root();
        let orphan = doc.create_element("div");
        let inner = doc.create_element("span");
        doc.append_child(orphan, inner);
        assert_eq!(compute_address(&doc, root, inner), ElementAddress::new([0]));
        assert!(compute_address(&doc, root, orphan).is_root());
    }

    #[test]
    fn test_display_and_parse() {
        let address = ElementAddress::new([0, 2, 1]);
        assert_eq!(address.to_string(), "0 > 2 > 1");
        assert_eq!("0 > 2 > 1".parse::<ElementAddress>().unwrap(), address);
        assert_eq!("0.2.1".parse::<ElementAddress>().unwrap(), address);
        assert!("0 > x".parse::<ElementAddress>().is_err());
    }

    #[test]
    fn test_serde_as_array() {
        let address = ElementAddress::new([0, 2, 1]);
        assert_eq!(serde_json::to_string(&address).unwrap(), "[0,2,1]");
        let back: ElementAddress = serde_json::from_str("[0,2,1]").unwrap();
        assert_eq!(back, address);
    }
}
