//! Entity escaping for preview markup and JSX sources.
//!
//! The preview serializes with `escape`/`escape_attr`, the parser decodes with
//! `unescape`, and the source patcher writes text back with `escape_jsx_text`.

use std::borrow::Cow;

/// Entities emitted when serializing preview markup.
const MARKUP_ENTITIES: &[(char, &str)] = &[
    ('&', "&amp;"),
    ('<', "&lt;"),
    ('>', "&gt;"),
    ('"', "&quot;"),
    ('\'', "&#39;"),
];

/// Entities for text between JSX tags: quotes are literal there, braces are not.
const JSX_TEXT_ENTITIES: &[(char, &str)] = &[
    ('&', "&amp;"),
    ('<', "&lt;"),
    ('>', "&gt;"),
    ('{', "&#123;"),
    ('}', "&#125;"),
];

/// Named entities understood by `unescape`.
const NAMED_ENTITIES: &[(&str, char)] = &[
    ("amp", '&'),
    ("lt", '<'),
    ("gt", '>'),
    ("quot", '"'),
    ("apos", '\''),
    ("nbsp", '\u{00A0}'),
];

/// Longest entity body `unescape` will scan before giving up.
const MAX_ENTITY_LEN: usize = 10;

const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "track",
    "wbr",
];

const BLOCK_ELEMENTS: &[&str] = &[
    "address", "article", "aside", "blockquote", "dd", "div", "dl", "dt", "fieldset",
    "figcaption", "figure", "footer", "form", "h1", "h2", "h3", "h4", "h5", "h6", "header", "hr",
    "li", "main", "nav", "ol", "p", "pre", "section", "table", "ul",
];

/// Escape a text node for preview markup.
pub fn escape(s: &str) -> Cow<'_, str> {
    replace_chars(s, MARKUP_ENTITIES)
}

/// Escape an attribute value for preview markup.
pub fn escape_attr(s: &str) -> Cow<'_, str> {
    replace_chars(s, MARKUP_ENTITIES)
}

/// Escape text written between `>` and `<` of a JSX element.
pub fn escape_jsx_text(s: &str) -> Cow<'_, str> {
    replace_chars(s, JSX_TEXT_ENTITIES)
}

fn replace_chars<'a>(s: &'a str, table: &[(char, &str)]) -> Cow<'a, str> {
    let lookup = |c: char| table.iter().find(|(k, _)| *k == c).map(|(_, v)| *v);
    if !s.chars().any(|c| lookup(c).is_some()) {
        return Cow::Borrowed(s);
    }

    let mut out = String::with_capacity(s.len() + 8);
    for c in s.chars() {
        match lookup(c) {
            Some(entity) => out.push_str(entity),
            None => out.push(c),
        }
    }
    Cow::Owned(out)
}

/// Decode named and numeric entities. Anything unrecognized is kept as written,
/// including a bare `&`.
pub fn unescape(s: &str) -> Cow<'_, str> {
    if !s.contains('&') {
        return Cow::Borrowed(s);
    }

    let mut out = String::with_capacity(s.len());
    let mut rest = s;

    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        let tail = &rest[amp + 1..];

        let body_end = tail
            .char_indices()
            .take_while(|&(i, c)| i <= MAX_ENTITY_LEN && c != '&' && !c.is_whitespace())
            .find(|&(_, c)| c == ';')
            .map(|(i, _)| i);

        match body_end.and_then(|end| decode_entity(&tail[..end]).map(|c| (end, c))) {
            Some((end, c)) => {
                out.push(c);
                rest = &tail[end + 1..];
            }
            None => {
                out.push('&');
                rest = tail;
            }
        }
    }

    out.push_str(rest);
    Cow::Owned(out)
}

fn decode_entity(body: &str) -> Option<char> {
    if let Some(num) = body.strip_prefix('#') {
        let code = match num.strip_prefix(['x', 'X']) {
            Some(hex) => u32::from_str_radix(hex, 16).ok()?,
            None => num.parse().ok()?,
        };
        return char::from_u32(code);
    }
    NAMED_ENTITIES
        .iter()
        .find(|(name, _)| *name == body)
        .map(|&(_, c)| c)
}

/// Elements without a closing tag.
pub fn is_void_element(tag: &str) -> bool {
    VOID_ELEMENTS.contains(&tag)
}

/// Elements that take `display: block` in the style snapshot.
pub fn is_block_element(tag: &str) -> bool {
    BLOCK_ELEMENTS.contains(&tag)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_plain_is_borrowed() {
        assert!(matches!(escape("Launch faster"), Cow::Borrowed(_)));
        assert!(matches!(escape_jsx_text("it's \"fine\""), Cow::Borrowed(_)));
    }

    #[test]
    fn test_escape_markup() {
        assert_eq!(escape("<b>"), "&lt;b&gt;");
        assert_eq!(escape("Tom & Jerry"), "Tom &amp; Jerry");
        assert_eq!(escape("it's"), "it&#39;s");
        assert_eq!(escape_attr("a\"b&c"), "a&quot;b&amp;c");
    }

    #[test]
    fn test_escape_jsx_text() {
        assert_eq!(escape_jsx_text("{x} < y"), "&#123;x&#125; &lt; y");
    }

    #[test]
    fn test_unescape() {
        assert_eq!(unescape("&lt;b&gt; &amp; &quot;q&quot;"), "<b> & \"q\"");
        assert_eq!(unescape("&#39;&#x27;&#123;"), "''{");
        assert_eq!(unescape("a&nbsp;b"), "a\u{00A0}b");
    }

    #[test]
    fn test_unescape_keeps_unknown() {
        assert_eq!(unescape("Analytics & Insights"), "Analytics & Insights");
        assert_eq!(unescape("R&D;"), "R&D;");
        assert_eq!(unescape("&&amp;"), "&&");
        assert_eq!(unescape("trailing &"), "trailing &");
    }

    #[test]
    fn test_element_classification() {
        assert!(is_void_element("img"));
        assert!(!is_void_element("div"));
        assert!(is_block_element("section"));
        assert!(!is_block_element("span"));
        assert!(!is_block_element("button"));
    }
}
