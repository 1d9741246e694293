//! Computed style snapshot.
//!
//! The preview has no layout engine, so "computed" style is resolved from
//! three layers, highest priority first: the inline `style` attribute, the
//! utility classes on the element, and tag defaults. Inherited properties
//! (color, font, text alignment) fall back to the nearest ancestor that
//! defines them. Colors are normalized to `rgb(r, g, b)` like a browser's
//! computed values.

use serde::{Deserialize, Serialize};

use super::class::{self, ClassFamily};
use super::{Document, NodeId};
use crate::utils::html;

pub const DEFAULT_COLOR: &str = "rgb(0, 0, 0)";
pub const TRANSPARENT: &str = "rgba(0, 0, 0, 0)";
const SANS_STACK: &str = "ui-sans-serif, system-ui, sans-serif";
const SERIF_STACK: &str = "ui-serif, Georgia, serif";
const MONO_STACK: &str = "ui-monospace, SFMono-Regular, monospace";

/// Read-only style values captured at selection time.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StyleSnapshot {
    pub color: String,
    pub background_color: String,
    pub font_size: String,
    pub font_weight: String,
    pub font_style: String,
    pub font_family: String,
    pub padding: String,
    pub margin: String,
    pub display: String,
    pub text_align: String,
    pub border_radius: String,
    pub border: String,
    pub width: String,
    pub height: String,
}

/// Compute the snapshot for one element.
pub fn compute_style(doc: &Document, node: NodeId) -> StyleSnapshot {
    let own = |prop: &str, from_class: fn(&str) -> Option<String>| {
        doc.style_property(node, prop)
            .map(|v| normalize_color(&v))
            .or_else(|| class_value(doc, node, from_class))
    };

    StyleSnapshot {
        color: inherited(doc, node, "color", text_color)
            .map(|v| normalize_color(&v))
            .unwrap_or_else(|| DEFAULT_COLOR.to_string()),
        background_color: own("background-color", background_color)
            .unwrap_or_else(|| TRANSPARENT.to_string()),
        font_size: inherited(doc, node, "font-size", font_size)
            .or_else(|| tag_font_size(doc, node))
            .unwrap_or_else(|| "16px".to_string()),
        font_weight: inherited(doc, node, "font-weight", font_weight)
            .or_else(|| tag_font_weight(doc, node))
            .unwrap_or_else(|| "400".to_string()),
        font_style: inherited(doc, node, "font-style", font_style)
            .or_else(|| tag_font_style(doc, node))
            .unwrap_or_else(|| "normal".to_string()),
        font_family: inherited(doc, node, "font-family", font_family)
            .unwrap_or_else(|| SANS_STACK.to_string()),
        padding: doc
            .style_property(node, "padding")
            .unwrap_or_else(|| spacing(doc.class_name(node), ClassFamily::Padding, 'p')),
        margin: doc
            .style_property(node, "margin")
            .unwrap_or_else(|| spacing(doc.class_name(node), ClassFamily::Margin, 'm')),
        display: own("display", display)
            .unwrap_or_else(|| tag_display(doc.tag(node).unwrap_or("div")).to_string()),
        text_align: inherited(doc, node, "text-align", text_align)
            .unwrap_or_else(|| "start".to_string()),
        border_radius: own("border-radius", border_radius).unwrap_or_else(|| "0px".to_string()),
        border: own("border", border).unwrap_or_else(|| format!("0px none {DEFAULT_COLOR}")),
        width: own("width", width).unwrap_or_else(|| "auto".to_string()),
        height: own("height", height).unwrap_or_else(|| "auto".to_string()),
    }
}

/// Inline value or class value on `node`, else on the nearest ancestor.
fn inherited(
    doc: &Document,
    node: NodeId,
    prop: &str,
    from_class: fn(&str) -> Option<String>,
) -> Option<String> {
    let mut current = Some(node);
    while let Some(n) = current {
        if let Some(v) = doc.style_property(n, prop) {
            return Some(v);
        }
        if let Some(v) = class_value(doc, n, from_class) {
            return Some(v);
        }
        current = doc.parent(n);
    }
    None
}

/// Last matching class wins, mirroring stylesheet order for equal specificity.
fn class_value(doc: &Document, node: NodeId, from_class: fn(&str) -> Option<String>) -> Option<String> {
    class::tokens(doc.class_name(node))
        .filter_map(from_class)
        .last()
}

// =============================================================================
// Utility class lookups
// =============================================================================

fn text_color(class: &str) -> Option<String> {
    named_color(class.strip_prefix("text-")?)
}

fn background_color(class: &str) -> Option<String> {
    named_color(class.strip_prefix("bg-")?)
}

fn named_color(name: &str) -> Option<String> {
    let rgb = match name {
        "white" => "rgb(255, 255, 255)",
        "black" => "rgb(0, 0, 0)",
        "transparent" => TRANSPARENT,
        "gray-50" => "rgb(249, 250, 251)",
        "gray-100" => "rgb(243, 244, 246)",
        "gray-600" => "rgb(75, 85, 99)",
        "gray-700" => "rgb(55, 65, 81)",
        "gray-900" => "rgb(17, 24, 39)",
        "blue-50" => "rgb(239, 246, 255)",
        "blue-600" => "rgb(37, 99, 235)",
        "blue-700" => "rgb(29, 78, 216)",
        "indigo-600" => "rgb(79, 70, 229)",
        _ => return None,
    };
    Some(rgb.to_string())
}

fn font_size(class: &str) -> Option<String> {
    if !ClassFamily::FontSize.matches(class) {
        return None;
    }
    let px = match class.strip_prefix("text-")? {
        "xs" => 12,
        "sm" => 14,
        "base" => 16,
        "lg" => 18,
        "xl" => 20,
        "2xl" => 24,
        "3xl" => 30,
        "4xl" => 36,
        "5xl" => 48,
        "6xl" => 60,
        "7xl" => 72,
        "8xl" => 96,
        _ => 128,
    };
    Some(format!("{px}px"))
}

fn font_weight(class: &str) -> Option<String> {
    if !ClassFamily::FontWeight.matches(class) {
        return None;
    }
    let weight = match class.strip_prefix("font-")? {
        "thin" => 100,
        "extralight" => 200,
        "light" => 300,
        "normal" => 400,
        "medium" => 500,
        "semibold" => 600,
        "bold" => 700,
        "extrabold" => 800,
        _ => 900,
    };
    Some(weight.to_string())
}

fn font_family(class: &str) -> Option<String> {
    let stack = match class {
        "font-sans" => SANS_STACK,
        "font-serif" => SERIF_STACK,
        "font-mono" => MONO_STACK,
        _ => return None,
    };
    Some(stack.to_string())
}

fn font_style(class: &str) -> Option<String> {
    match class {
        "italic" => Some("italic".to_string()),
        "not-italic" => Some("normal".to_string()),
        _ => None,
    }
}

fn text_align(class: &str) -> Option<String> {
    match class {
        "text-left" | "text-center" | "text-right" | "text-justify" | "text-start"
        | "text-end" => class.strip_prefix("text-").map(str::to_string),
        _ => None,
    }
}

fn display(class: &str) -> Option<String> {
    match class {
        "block" | "inline-block" | "inline" | "flex" | "inline-flex" | "grid" | "inline-grid"
        | "contents" => Some(class.to_string()),
        "hidden" => Some("none".to_string()),
        _ => None,
    }
}

fn border_radius(class: &str) -> Option<String> {
    let px = match class {
        "rounded-none" => "0px",
        "rounded-sm" => "2px",
        "rounded" => "4px",
        "rounded-md" => "6px",
        "rounded-lg" => "8px",
        "rounded-xl" => "12px",
        "rounded-2xl" => "16px",
        "rounded-3xl" => "24px",
        "rounded-full" => "9999px",
        _ => return None,
    };
    Some(px.to_string())
}

fn border(class: &str) -> Option<String> {
    let width = match class {
        "border" => 1,
        "border-0" => 0,
        "border-2" => 2,
        "border-4" => 4,
        "border-8" => 8,
        _ => return None,
    };
    Some(format!("{width}px solid rgb(229, 231, 235)"))
}

fn width(class: &str) -> Option<String> {
    size(class, "w-")
}

fn height(class: &str) -> Option<String> {
    size(class, "h-")
}

fn size(class: &str, prefix: &str) -> Option<String> {
    let value = class.strip_prefix(prefix)?;
    match value {
        "full" => Some("100%".to_string()),
        "auto" => Some("auto".to_string()),
        _ => spacing_px(value),
    }
}

/// Tailwind spacing scale: one unit is 0.25rem (4px).
fn spacing_px(value: &str) -> Option<String> {
    if value == "px" {
        return Some("1px".to_string());
    }
    let units: f64 = value.parse().ok()?;
    Some(format_px(units * 4.0))
}

fn format_px(px: f64) -> String {
    if px.fract() == 0.0 {
        format!("{}px", px as i64)
    } else {
        format!("{px}px")
    }
}

/// Resolve padding/margin shorthand from the spacing classes.
///
/// Sides are applied from least to most specific (`p`, `px`/`py`, `pt`...),
/// and the result is collapsed like a computed shorthand.
fn spacing(class_name: &str, family: ClassFamily, letter: char) -> String {
    // top, right, bottom, left
    let mut sides = ["0px".to_string(), "0px".to_string(), "0px".to_string(), "0px".to_string()];
    let members: Vec<&str> = class::tokens(class_name).filter(|c| family.matches(c)).collect();

    for pass in 0..3 {
        for class in &members {
            let (negative, class) = match class.strip_prefix('-') {
                Some(rest) => (true, rest),
                None => (false, *class),
            };
            let Some(rest) = class.strip_prefix(letter) else {
                continue;
            };
            let Some((axis, value)) = rest.split_once('-') else {
                continue;
            };
            let targets: &[usize] = match (pass, axis) {
                (0, "") => &[0, 1, 2, 3],
                (1, "x") => &[1, 3],
                (1, "y") => &[0, 2],
                (2, "t") => &[0],
                (2, "r" | "e") => &[1],
                (2, "b") => &[2],
                (2, "l" | "s") => &[3],
                _ => continue,
            };
            let resolved = if value == "auto" {
                Some("auto".to_string())
            } else {
                spacing_px(value).map(|px| if negative { format!("-{px}") } else { px })
            };
            if let Some(resolved) = resolved {
                for &i in targets {
                    sides[i].clone_from(&resolved);
                }
            }
        }
    }

    let [top, right, bottom, left] = &sides;
    if top == right && right == bottom && bottom == left {
        top.clone()
    } else if top == bottom && right == left {
        format!("{top} {right}")
    } else if right == left {
        format!("{top} {right} {bottom}")
    } else {
        format!("{top} {right} {bottom} {left}")
    }
}

// =============================================================================
// Tag defaults
// =============================================================================

fn tag_font_size(doc: &Document, node: NodeId) -> Option<String> {
    ancestor_tag(doc, node, |tag| match tag {
        "h1" => Some("32px"),
        "h2" => Some("24px"),
        "h3" => Some("18.72px"),
        "h4" => Some("16px"),
        "h5" => Some("13.28px"),
        "h6" => Some("10.72px"),
        "small" => Some("13.33px"),
        _ => None,
    })
}

fn tag_font_weight(doc: &Document, node: NodeId) -> Option<String> {
    ancestor_tag(doc, node, |tag| match tag {
        "h1" | "h2" | "h3" | "h4" | "h5" | "h6" | "b" | "strong" | "th" => Some("700"),
        _ => None,
    })
}

fn tag_font_style(doc: &Document, node: NodeId) -> Option<String> {
    ancestor_tag(doc, node, |tag| match tag {
        "em" | "i" | "cite" => Some("italic"),
        _ => None,
    })
}

fn ancestor_tag(
    doc: &Document,
    node: NodeId,
    lookup: impl Fn(&str) -> Option<&'static str>,
) -> Option<String> {
    let mut current = Some(node);
    while let Some(n) = current {
        if let Some(v) = doc.tag(n).and_then(&lookup) {
            return Some(v.to_string());
        }
        current = doc.parent(n);
    }
    None
}

fn tag_display(tag: &str) -> &'static str {
    match tag {
        "li" => "list-item",
        "table" => "table",
        "button" | "img" | "svg" | "input" | "select" | "textarea" => "inline-block",
        _ if html::is_block_element(tag) => "block",
        _ => "inline",
    }
}

// =============================================================================
// Colors
// =============================================================================

/// Normalize `#rgb` / `#rrggbb` to `rgb(r, g, b)`; anything else passes through.
pub fn normalize_color(value: &str) -> String {
    let value = value.trim();
    let Some(hex) = value.strip_prefix('#') else {
        return value.to_string();
    };
    let expanded: String = match hex.len() {
        3 => hex.chars().flat_map(|c| [c, c]).collect(),
        6 => hex.to_string(),
        _ => return value.to_string(),
    };
    if !expanded.is_ascii() {
        return value.to_string();
    }
    let channel = |i: usize| u8::from_str_radix(&expanded[i..i + 2], 16).ok();
    match (channel(0), channel(2), channel(4)) {
        (Some(r), Some(g), Some(b)) => format!("rgb({r}, {g}, {b})"),
        _ => value.to_string(),
    }
}

/// Convert `rgb(...)`/`rgba(...)` to `#rrggbb`. Fully transparent maps to white.
pub fn rgb_to_hex(value: &str) -> Option<String> {
    let value = value.trim();
    if value == "transparent" {
        return Some("#ffffff".to_string());
    }
    if value.starts_with('#') && value.len() == 7 {
        return Some(value.to_ascii_lowercase());
    }
    let inner = value
        .strip_prefix("rgba(")
        .or_else(|| value.strip_prefix("rgb("))?
        .strip_suffix(')')?;
    let parts: Vec<&str> = inner.split(',').map(str::trim).collect();
    if parts.len() == 4 && parts[3].parse::<f64>().ok() == Some(0.0) {
        return Some("#ffffff".to_string());
    }
    if parts.len() < 3 {
        return None;
    }
    let mut hex = String::from("#");
    for part in &parts[..3] {
        let channel: u8 = part.parse().ok()?;
        hex.push_str(&format!("{channel:02x}"));
    }
    Some(hex)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::parse::parse_into;

    fn first(markup: &str, path: &[usize]) -> (Document, NodeId) {
        let mut doc = Document::new();
        let root = doc.root();
        parse_into(&mut doc, root, markup);
        let address = crate::dom::ElementAddress::new(path.iter().copied());
        let node = crate::dom::resolve_address(&doc, root, &address).unwrap();
        (doc, node)
    }

    #[test]
    fn test_defaults() {
        let (doc, p) = first("<p>x</p>", &[0]);
        let style = compute_style(&doc, p);
        assert_eq!(style.color, DEFAULT_COLOR);
        assert_eq!(style.background_color, TRANSPARENT);
        assert_eq!(style.font_size, "16px");
        assert_eq!(style.font_weight, "400");
        assert_eq!(style.display, "block");
        assert_eq!(style.padding, "0px");
    }

    #[test]
    fn test_classes_and_inheritance() {
        let (doc, span) = first(
            r#"<div class="text-white font-serif text-center"><span class="text-2xl">x</span></div>"#,
            &[0, 0],
        );
        let style = compute_style(&doc, span);
        assert_eq!(style.color, "rgb(255, 255, 255)");
        assert_eq!(style.font_family, SERIF_STACK);
        assert_eq!(style.text_align, "center");
        assert_eq!(style.font_size, "24px");
        assert_eq!(style.display, "inline");
        // background is not inherited
        assert_eq!(style.background_color, TRANSPARENT);
    }

    #[test]
    fn test_heading_defaults() {
        let (doc, h1) = first("<h1>Title</h1>", &[0]);
        let style = compute_style(&doc, h1);
        assert_eq!(style.font_weight, "700");
        assert_eq!(style.font_size, "32px");
    }

    #[test]
    fn test_inline_style_wins() {
        let (doc, p) = first(r#"<p class="text-black" style="color: #ff0000">x</p>"#, &[0]);
        assert_eq!(compute_style(&doc, p).color, "rgb(255, 0, 0)");
    }

    #[test]
    fn test_spacing_shorthand() {
        assert_eq!(spacing("p-4", ClassFamily::Padding, 'p'), "16px");
        assert_eq!(spacing("px-8 py-4", ClassFamily::Padding, 'p'), "16px 32px");
        assert_eq!(spacing("p-2 pt-0", ClassFamily::Padding, 'p'), "0px 8px 8px");
        assert_eq!(spacing("mx-auto", ClassFamily::Margin, 'm'), "0px auto");
        assert_eq!(spacing("-mt-2", ClassFamily::Margin, 'm'), "-8px 0px 0px");
    }

    #[test]
    fn test_rgb_to_hex() {
        assert_eq!(rgb_to_hex("rgb(255, 0, 0)").as_deref(), Some("#ff0000"));
        assert_eq!(rgb_to_hex("rgba(0, 0, 0, 0)").as_deref(), Some("#ffffff"));
        assert_eq!(rgb_to_hex("transparent").as_deref(), Some("#ffffff"));
        assert_eq!(rgb_to_hex("rgba(17, 24, 39, 0.5)").as_deref(), Some("#111827"));
        assert_eq!(rgb_to_hex("hsl(0 0% 0%)"), None);
    }

    #[test]
    fn test_normalize_color() {
        assert_eq!(normalize_color("#f00"), "rgb(255, 0, 0)");
        assert_eq!(normalize_color("#00ff00"), "rgb(0, 255, 0)");
        assert_eq!(normalize_color("red"), "red");
    }
}
