//! Markup parsing into the preview arena.
//!
//! Markup comes from the static renderer, so it is JSX-flavoured HTML:
//! `className` / `htmlFor` attributes and self-closing non-void tags.
//! Both are normalized here before nodes reach the document.

use std::sync::LazyLock;

use regex::Regex;

use super::{Document, NodeId};
use crate::utils::html;

/// `<tag ... />` for any tag name.
static SELF_CLOSING: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"<([A-Za-z][A-Za-z0-9.\-]*)((?:\s+[^<>]*?)?)\s*/>"#).unwrap()
});

/// Parse `markup` and append the resulting top-level nodes to `parent`.
///
/// Returns the number of nodes appended. Unparseable markup is appended
/// as a single text node so nothing silently disappears.
pub fn parse_into(doc: &mut Document, parent: NodeId, markup: &str) -> usize {
    let markup = expand_self_closing(markup);
    let Ok(dom) = tl::parse(&markup, tl::ParserOptions::default()) else {
        let text = doc.create_text(&markup);
        doc.append_child(parent, text);
        return 1;
    };

    let parser = dom.parser();
    let mut count = 0;
    for handle in dom.children() {
        if let Some(node) = convert(doc, *handle, parser) {
            doc.append_child(parent, node);
            count += 1;
        }
    }
    count
}

/// Rewrite `<x a="b" />` to `<x a="b"></x>` (void elements stay as `<br>`).
pub fn expand_self_closing(markup: &str) -> String {
    SELF_CLOSING
        .replace_all(markup, |caps: &regex::Captures<'_>| {
            let tag = &caps[1];
            let attrs = caps.get(2).map_or("", |m| m.as_str()).trim_end();
            if html::is_void_element(&tag.to_ascii_lowercase()) {
                format!("<{tag}{attrs}>")
            } else {
                format!("<{tag}{attrs}></{tag}>")
            }
        })
        .into_owned()
}

fn convert(doc: &mut Document, handle: tl::NodeHandle, parser: &tl::Parser<'_>) -> Option<NodeId> {
    let node = handle.get(parser)?;

    match node {
        tl::Node::Tag(tag) => {
            let name = normalize_tag(&tag.name().as_utf8_str());
            let element = doc.create_element(&name);

            for (key, value) in tag.attributes().iter() {
                let key: &str = key.as_ref();
                let value = value.map(|v| html::unescape(&v).into_owned()).unwrap_or_default();
                doc.set_attr(element, normalize_attr(key), &value);
            }

            for child in tag.children().top().iter() {
                if let Some(child) = convert(doc, *child, parser) {
                    doc.append_child(element, child);
                }
            }
            Some(element)
        }
        tl::Node::Raw(bytes) => {
            let text = bytes.as_utf8_str();
            if text.trim().is_empty() {
                None
            } else {
                Some(doc.create_text(&html::unescape(&text)))
            }
        }
        tl::Node::Comment(_) => None,
    }
}

/// HTML tags are case-insensitive; capitalized names are components.
fn normalize_tag(name: &str) -> String {
    if name.starts_with(|c: char| c.is_ascii_uppercase()) {
        name.to_string()
    } else {
        name.to_ascii_lowercase()
    }
}

fn normalize_attr(name: &str) -> &str {
    match name {
        "className" => "class",
        "htmlFor" => "for",
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(markup: &str) -> Document {
        let mut doc = Document::new();
        let root = doc.root();
        parse_into(&mut doc, root, markup);
        doc
    }

    #[test]
    fn test_parse_nested() {
        let doc = parse(r#"<section className="py-20"><h1>Hello</h1><p>World</p></section>"#);
        let section = doc.element_children(doc.root()).next().unwrap();
        assert_eq!(doc.tag(section), Some("section"));
        assert_eq!(doc.class_name(section), "py-20");
        assert_eq!(doc.element_children(section).count(), 2);
        assert_eq!(doc.text_content(section), "HelloWorld");
    }

    #[test]
    fn test_whitespace_text_dropped() {
        let doc = parse("<div>\n  <span>a</span>\n  <span>b</span>\n</div>");
        let div = doc.element_children(doc.root()).next().unwrap();
        assert_eq!(doc.children(div).len(), 2);
    }

    #[test]
    fn test_entities_decoded() {
        let doc = parse("<p>Analytics &amp; Insights</p>");
        assert_eq!(doc.text_content(doc.root()), "Analytics & Insights");
    }

    #[test]
    fn test_component_tag_case_kept() {
        let doc = parse("<HeroSection />");
        let el = doc.element_children(doc.root()).next().unwrap();
        assert_eq!(doc.tag(el), Some("HeroSection"));
    }

    #[test]
    fn test_expand_self_closing() {
        assert_eq!(expand_self_closing("<Hero />"), "<Hero></Hero>");
        assert_eq!(
            expand_self_closing(r#"<path d="M5 13l4 4L19 7" />"#),
            r#"<path d="M5 13l4 4L19 7"></path>"#
        );
        assert_eq!(expand_self_closing("<br />"), "<br>");
    }

    #[test]
    fn test_void_elements_have_no_children() {
        let doc = parse(r#"<div><img src="a.png" /><p>x</p></div>"#);
        let div = doc.element_children(doc.root()).next().unwrap();
        let kids: Vec<_> = doc.element_children(div).collect();
        assert_eq!(kids.len(), 2);
        assert_eq!(doc.tag(kids[0]), Some("img"));
        assert_eq!(doc.tag(kids[1]), Some("p"));
    }
}
