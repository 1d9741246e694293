//! `vise inspect`: print the rendered preview.

use anyhow::{Context, Result, anyhow};
use owo_colors::OwoColorize;

use super::args::InspectArgs;
use super::common::{load_sources, mount_preview};
use crate::config::ViseConfig;
use crate::dom::{self, Document, ElementAddress, NodeId};
use crate::preview::descriptor::ElementDescriptor;

/// Longest text preview shown per element.
const TEXT_PREVIEW: usize = 40;

pub fn run_inspect(args: &InspectArgs, config: &ViseConfig) -> Result<()> {
    let (sources, _) = load_sources(config)?;
    let surface = mount_preview(config, &sources);
    let doc = surface.document();
    let root = doc.root();

    if let Some(address) = &args.address {
        let address: ElementAddress = address
            .parse()
            .with_context(|| format!("invalid address `{address}`"))?;
        let node = dom::resolve_address(doc, root, &address)
            .ok_or_else(|| anyhow!("no element at {address}"))?;
        if args.html {
            println!("{}", doc.to_html(node));
        } else {
            let descriptor = ElementDescriptor::capture(doc, root, node);
            println!("{}", serde_json::to_string_pretty(&descriptor)?);
        }
        return Ok(());
    }

    if args.html {
        for node in doc.element_children(root) {
            println!("{}", doc.to_html(node));
        }
        return Ok(());
    }

    for line in tree_lines(doc, root) {
        println!("{line}");
    }
    Ok(())
}

/// One line per element: address, tag, classes, and leading text.
fn tree_lines(doc: &Document, root: NodeId) -> Vec<String> {
    doc.descendants(root)
        .into_iter()
        .map(|node| {
            let address = dom::compute_address(doc, root, node);
            let indent = "  ".repeat(address.depth().saturating_sub(1));
            let mut line = format!(
                "{indent}{} <{}>",
                address.to_string().dimmed(),
                doc.tag(node).unwrap_or_default().cyan()
            );
            let class_name = doc.class_name(node);
            if !class_name.is_empty() {
                line.push_str(&format!(" .{}", class_name.split_whitespace().collect::<Vec<_>>().join(".")));
            }
            if let Some(text) = own_text(doc, node) {
                line.push_str(&format!(" {:?}", text));
            }
            line
        })
        .collect()
}

/// Text directly inside `node`, shortened.
fn own_text(doc: &Document, node: NodeId) -> Option<String> {
    let text = doc
        .children(node)
        .iter()
        .filter_map(|&child| doc.text(child))
        .collect::<String>();
    let text = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if text.is_empty() {
        return None;
    }
    Some(match text.char_indices().nth(TEXT_PREVIEW) {
        Some((cut, _)) => format!("{}…", &text[..cut]),
        None => text,
    })
}
