//! Static markup renderer.
//!
//! Turns section components into plain markup without evaluating any code:
//!
//! 1. take the markup returned by the component (`return ( ... )`)
//! 2. resolve `{expr}` containers: string default props and literals are
//!    inlined, everything else (maps, conditionals, comments) is dropped
//! 3. strip fragments (`<>` / `</>`)
//! 4. expand capitalized component tags with the referenced file's markup
//!
//! The result feeds `dom::parse`.

use std::sync::LazyLock;

use regex::Regex;
use rustc_hash::FxHashMap;
use thiserror::Error;

use crate::utils::html;

/// Nesting limit for component expansion (guards against import cycles).
pub const MAX_DEPTH: usize = 8;

/// Extensions tried when resolving `./Name` imports.
const EXTENSIONS: [&str; 4] = ["tsx", "jsx", "ts", "js"];

static RETURN_PAREN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\breturn\s*\(").unwrap());

/// `name = "literal",` on its own line (destructured default props).
static DEFAULT_PROP: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"(?m)^\s*([A-Za-z_$][\w$]*)\s*=\s*(?:"((?:[^"\\\n]|\\.)*)"|'((?:[^'\\\n]|\\.)*)')\s*,?\s*$"#,
    )
    .unwrap()
});

/// `import Name from './Path'`
static IMPORT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?m)^\s*import\s+([A-Za-z_$][\w$]*)\s+from\s+['"]\./([^'"]+)['"]"#).unwrap()
});

static IDENT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[A-Za-z_$][\w$]*$").unwrap());

static NUMBER: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^-?\d+(?:\.\d+)?$").unwrap());

static WHITESPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RenderError {
    #[error("source file not found: {0}")]
    MissingFile(String),
}

// =============================================================================
// Entry Point
// =============================================================================

/// Render the entry file, expanding every component it references.
pub fn render_entry(files: &FxHashMap<String, String>, entry: &str) -> Result<String, RenderError> {
    let code = files
        .get(entry)
        .ok_or_else(|| RenderError::MissingFile(entry.to_string()))?;
    Ok(render_component(files, code, 0))
}

/// Render one component's markup; nested components are expanded.
pub fn render_component(files: &FxHashMap<String, String>, code: &str, depth: usize) -> String {
    let Some(markup) = component_markup(code) else {
        return String::new();
    };
    let props = default_props(code);
    let markup = strip_fragments(&strip_expressions(markup, &props));

    let imports = imports(code);
    expand_components(&markup, |name| {
        if depth >= MAX_DEPTH {
            crate::debug!("render"; "component depth limit reached at <{}>", name);
            return String::new();
        }
        match resolve_component(files, &imports, name) {
            Some(child) => render_component(files, child, depth + 1),
            None => {
                crate::debug!("render"; "unresolved component <{}>", name);
                String::new()
            }
        }
    })
}

fn resolve_component<'a>(
    files: &'a FxHashMap<String, String>,
    imports: &FxHashMap<String, String>,
    name: &str,
) -> Option<&'a str> {
    let stem = imports
        .get(name)
        .map_or_else(|| format!("/{name}"), |path| format!("/{path}"));
    if let Some(code) = files.get(&stem) {
        return Some(code.as_str());
    }
    EXTENSIONS
        .iter()
        .find_map(|ext| files.get(&format!("{stem}.{ext}")))
        .map(String::as_str)
}

// =============================================================================
// Extraction
// =============================================================================

/// The parenthesized markup after the first `return (`.
pub fn component_markup(code: &str) -> Option<&str> {
    let found = RETURN_PAREN.find(code)?;
    let start = found.end();
    let mut depth = 1usize;
    for (offset, c) in code[start..].char_indices() {
        match c {
            '(' => depth += 1,
            ')' => {
                depth -= 1;
                if depth == 0 {
                    return Some(code[start..start + offset].trim());
                }
            }
            _ => {}
        }
    }
    None
}

/// String-literal default props (`title = "Hello",`).
pub fn default_props(code: &str) -> FxHashMap<String, String> {
    DEFAULT_PROP
        .captures_iter(code)
        .filter_map(|caps| {
            let value = caps.get(2).or_else(|| caps.get(3))?;
            Some((caps[1].to_string(), unescape_literal(value.as_str())))
        })
        .collect()
}

/// `import Name from './Path'` pairs.
fn imports(code: &str) -> FxHashMap<String, String> {
    IMPORT
        .captures_iter(code)
        .map(|caps| (caps[1].to_string(), caps[2].to_string()))
        .collect()
}

// =============================================================================
// Expression Containers
// =============================================================================

/// Replace every `{...}` container with its static value.
pub fn strip_expressions(markup: &str, props: &FxHashMap<String, String>) -> String {
    let mut out = String::with_capacity(markup.len());
    let mut rest = markup;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let tail = &rest[open..];
        let Some(close) = matching_brace(tail) else {
            // unbalanced: drop the remainder rather than mount half an expression
            return out;
        };
        let expr = &tail[1..close];

        if out.trim_end().ends_with('=') {
            let value = evaluate(expr, props).unwrap_or_default();
            out.push('"');
            out.push_str(&html::escape_attr(&value));
            out.push('"');
        } else if let Some(text) = evaluate(expr, props) {
            out.push_str(&html::escape(&text));
        }
        rest = &tail[close + 1..];
    }
    out.push_str(rest);
    out
}

/// Byte offset of the brace closing the one `s` starts with.
fn matching_brace(s: &str) -> Option<usize> {
    let mut depth = 0usize;
    for (i, c) in s.char_indices() {
        match c {
            '{' => depth += 1,
            '}' => {
                depth = depth.checked_sub(1)?;
                if depth == 0 {
                    return Some(i);
                }
            }
            _ => {}
        }
    }
    None
}

/// Static value of an expression, if it has one.
fn evaluate(expr: &str, props: &FxHashMap<String, String>) -> Option<String> {
    let expr = expr.trim();
    if expr.is_empty() || (expr.starts_with("/*") && expr.ends_with("*/")) {
        return None;
    }
    if IDENT.is_match(expr) {
        return props.get(expr).cloned();
    }
    if NUMBER.is_match(expr) {
        return Some(expr.to_string());
    }
    string_literal(expr)
}

/// Content of a single string literal; template literals lose their
/// `${...}` interpolations.
fn string_literal(expr: &str) -> Option<String> {
    let quote = expr.chars().next()?;
    if !matches!(quote, '"' | '\'' | '`') || expr.len() < 2 || !expr.ends_with(quote) {
        return None;
    }
    let inner = &expr[1..expr.len() - 1];
    if quote != '`' {
        return (!has_unescaped(inner, quote)).then(|| unescape_literal(inner));
    }
    if inner.contains('`') {
        return None;
    }

    let mut text = String::with_capacity(inner.len());
    let mut rest = inner;
    while let Some(start) = rest.find("${") {
        text.push_str(&rest[..start]);
        let close = matching_brace(&rest[start + 1..])?;
        rest = &rest[start + 1 + close + 1..];
    }
    text.push_str(rest);
    Some(WHITESPACE.replace_all(text.trim(), " ").into_owned())
}

/// Whether `quote` occurs in a literal body without a backslash before it.
fn has_unescaped(body: &str, quote: char) -> bool {
    let mut escaped = false;
    for c in body.chars() {
        match c {
            _ if escaped => escaped = false,
            '\\' => escaped = true,
            c if c == quote => return true,
            _ => {}
        }
    }
    false
}

/// Undo backslash escapes in a quoted literal body.
pub fn unescape_literal(body: &str) -> String {
    if !body.contains('\\') {
        return body.to_string();
    }
    let mut out = String::with_capacity(body.len());
    let mut chars = body.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some(other) => out.push(other),
            None => out.push('\\'),
        }
    }
    out
}

fn strip_fragments(markup: &str) -> String {
    markup.replace("<>", "").replace("</>", "")
}

// =============================================================================
// Component Expansion
// =============================================================================

/// Replace `<Name ... />` and `<Name ...>...</Name>` with `expand(Name)`.
fn expand_components(markup: &str, mut expand: impl FnMut(&str) -> String) -> String {
    let mut out = String::with_capacity(markup.len());
    let mut rest = markup;

    while let Some(pos) = find_component_open(rest) {
        out.push_str(&rest[..pos]);
        let tail = &rest[pos..];
        let name_len = tail[1..]
            .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_' || c == '.'))
            .unwrap_or(tail.len() - 1);
        let name = &tail[1..1 + name_len];

        let Some(gt) = tail.find('>') else {
            out.push_str(tail);
            return out;
        };
        let self_closing = tail[..gt].ends_with('/');
        let end = if self_closing {
            gt + 1
        } else {
            let closing = format!("</{name}>");
            tail[gt..]
                .find(&closing)
                .map_or(gt + 1, |i| gt + i + closing.len())
        };

        out.push_str(&expand(name));
        rest = &tail[end..];
    }
    out.push_str(rest);
    out
}

/// Offset of the next `<` that opens a capitalized tag.
fn find_component_open(s: &str) -> Option<usize> {
    s.match_indices('<')
        .map(|(i, _)| i)
        .find(|&i| s[i + 1..].starts_with(|c: char| c.is_ascii_uppercase()))
}
