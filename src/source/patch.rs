//! Source Patcher: reflects a property change into the section sources.
//!
//! The patcher works on text, not on a syntax tree. Files are tried in
//! search order and the first file that matches wins; inside that file only
//! the first occurrence is rewritten. When nothing matches the sources are
//! left byte-identical.
//!
//! # Text strategies
//!
//! | Order | Pattern              | Rewritten as                     |
//! |-------|----------------------|----------------------------------|
//! | 1     | `>old<`              | `>new<`                          |
//! | 2     | `>  old  <`          | `>  new  <` (whitespace kept)    |
//! | 3     | `"old"` `'old'` `` `old` `` | same quote, `new` escaped |
//!
//! Markup strategies also try the entity-escaped form of `old`. An empty
//! old value fills the first empty element instead.

use std::sync::LazyLock;

use regex::Regex;

use super::SourceSet;
use crate::dom::class;
use crate::preview::mutate::Property;
use crate::utils::html;

/// First empty element: `<tag ...>   </tag>`.
static EMPTY_ELEMENT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"<([A-Za-z][\w.\-]*)(?:\s[^<>]*)?>(\s*)</([A-Za-z][\w.\-]*)\s*>").unwrap()
});

/// Which rule rewrote the source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    TagContent,
    PaddedTagContent,
    StringLiteral,
    EmptyElement,
    ClassLiteral,
}

impl Strategy {
    pub const fn label(self) -> &'static str {
        match self {
            Self::TagContent => "tag content",
            Self::PaddedTagContent => "padded tag content",
            Self::StringLiteral => "string literal",
            Self::EmptyElement => "empty element",
            Self::ClassLiteral => "class literal",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PatchOutcome {
    Patched { path: String, strategy: Strategy },
    NoMatch,
    Unsupported,
}

impl PatchOutcome {
    pub fn is_patched(&self) -> bool {
        matches!(self, Self::Patched { .. })
    }

    pub fn path(&self) -> Option<&str> {
        match self {
            Self::Patched { path, .. } => Some(path),
            _ => None,
        }
    }
}

/// Rewrite the first source occurrence of `old` for `property` into `new`.
pub fn patch(sources: &mut SourceSet, property: &Property, old: &str, new: &str) -> PatchOutcome {
    let rewrite = match property {
        Property::TextContent if old.trim().is_empty() => find_empty_element(sources, new),
        Property::TextContent => find_text(sources, old, new),
        Property::ClassName => find_class(sources, old, new),
        _ => return PatchOutcome::Unsupported,
    };

    let Some((path, code, strategy)) = rewrite else {
        crate::debug!("patch"; "no source match for {} {:?}", property, old);
        return PatchOutcome::NoMatch;
    };

    sources.set(&path, code);
    crate::debug!("patch"; "{} rewritten in {} ({:?})", property, path, strategy);
    PatchOutcome::Patched { path, strategy }
}

type Rewrite = (String, String, Strategy);

fn first_match(
    sources: &SourceSet,
    mut rewrite: impl FnMut(&str) -> Option<(String, Strategy)>,
) -> Option<Rewrite> {
    sources.search_order().find_map(|path| {
        let code = sources.get(path)?;
        rewrite(code).map(|(patched, strategy)| (path.to_string(), patched, strategy))
    })
}

// ============================================================================
// textContent
// ============================================================================

fn find_text(sources: &SourceSet, old: &str, new: &str) -> Option<Rewrite> {
    let escaped = html::escape_jsx_text(old);
    let mut forms = vec![old];
    if escaped != old {
        forms.push(escaped.as_ref());
    }
    let markup_new = html::escape_jsx_text(new);

    first_match(sources, |code| {
        forms
            .iter()
            .find_map(|form| tag_content(code, form, &markup_new))
            .map(|code| (code, Strategy::TagContent))
            .or_else(|| {
                forms
                    .iter()
                    .find_map(|form| padded_tag_content(code, form, &markup_new))
                    .map(|code| (code, Strategy::PaddedTagContent))
            })
            .or_else(|| string_literal(code, old, new).map(|code| (code, Strategy::StringLiteral)))
    })
}

/// `>old<` verbatim.
fn tag_content(code: &str, old: &str, new: &str) -> Option<String> {
    let needle = format!(">{old}<");
    let start = code.find(&needle)?;
    Some(splice(code, start + 1, start + needle.len() - 1, new))
}

/// `>old<` with whitespace around `old`, which is kept.
fn padded_tag_content(code: &str, old: &str, new: &str) -> Option<String> {
    let pattern = Regex::new(&format!(r">(\s*){}(\s*)<", regex::escape(old))).ok()?;
    let caps = pattern.captures(code)?;
    let (lead, trail) = (caps.get(1)?, caps.get(2)?);
    Some(splice(code, lead.end(), trail.start(), new))
}

/// `old` as a whole string literal bounded by the same quote on both sides.
/// The literal body is matched in its escaped form, as it appears in source.
fn string_literal(code: &str, old: &str, new: &str) -> Option<String> {
    let (start, quote, len) = ['"', '\'', '`']
        .into_iter()
        .filter_map(|q| {
            let body = escape_literal(old, q);
            code.find(&format!("{q}{body}{q}")).map(|pos| (pos, q, body.len()))
        })
        .min_by_key(|(pos, ..)| *pos)?;
    let body = start + quote.len_utf8();
    Some(splice(code, body, body + len, &escape_literal(new, quote)))
}

/// Escape a value for a JS string literal delimited by `quote`.
fn escape_literal(value: &str, quote: char) -> String {
    let mut out = String::with_capacity(value.len());
    let mut chars = value.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            c if c == quote => {
                out.push('\\');
                out.push(c);
            }
            '$' if quote == '`' && chars.peek() == Some(&'{') => out.push_str("\\$"),
            c => out.push(c),
        }
    }
    out
}

fn find_empty_element(sources: &SourceSet, new: &str) -> Option<Rewrite> {
    let new = html::escape_jsx_text(new);
    first_match(sources, |code| {
        EMPTY_ELEMENT
            .captures_iter(code)
            .filter(|caps| caps.get(1).map(|m| m.as_str()) == caps.get(3).map(|m| m.as_str()))
            .find_map(|caps| caps.get(2))
            .map(|gap| (splice(code, gap.start(), gap.end(), &new), Strategy::EmptyElement))
    })
}

// ============================================================================
// className
// ============================================================================

fn find_class(sources: &SourceSet, old: &str, new: &str) -> Option<Rewrite> {
    let old = class::strip_markers(old);
    if old.is_empty() {
        return None;
    }
    let new = class::strip_markers(new);

    first_match(sources, |code| {
        code.find(&old)
            .map(|start| (splice(code, start, start + old.len(), &new), Strategy::ClassLiteral))
    })
}

fn splice(code: &str, start: usize, end: usize, with: &str) -> String {
    let mut out = String::with_capacity(code.len() - (end - start) + with.len());
    out.push_str(&code[..start]);
    out.push_str(with);
    out.push_str(&code[end..]);
    out
}
