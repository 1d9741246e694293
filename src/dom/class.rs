//! Class lists and utility-class families.
//!
//! A family is a set of mutually exclusive utility classes (all font sizes,
//! all padding variants, ...). Replacing a family value removes every
//! member from the class list and appends the new class, so at most one
//! member survives. Only unprefixed classes belong to a family: responsive
//! or state variants (`sm:text-6xl`, `hover:p-2`) are left alone.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Prefix of the transient classes the preview adds for selection/hover.
pub const MARKER_PREFIX: &str = "vise-";

/// Marker on the selected element.
pub const SELECTED_MARKER: &str = "vise-selected";

/// Marker on the hovered element.
pub const HOVER_MARKER: &str = "vise-hoverable";

static FONT_SIZE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^text-(?:xs|sm|base|lg|xl|[2-9]xl)$").unwrap());

static FONT_WEIGHT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^font-(?:thin|extralight|light|normal|medium|semibold|bold|extrabold|black)$")
        .unwrap()
});

static FONT_FAMILY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^font-(?:sans|serif|mono)$").unwrap());

static PADDING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^p[xytrblse]?-[A-Za-z0-9.\[\]/]+$").unwrap());

static MARGIN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^-?m[xytrblse]?-[A-Za-z0-9.\[\]/]+$").unwrap());

/// Mutually exclusive utility-class family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ClassFamily {
    FontSize,
    FontWeight,
    FontFamily,
    Padding,
    Margin,
}

impl ClassFamily {
    pub const ALL: [Self; 5] = [
        Self::FontSize,
        Self::FontWeight,
        Self::FontFamily,
        Self::Padding,
        Self::Margin,
    ];

    fn pattern(self) -> &'static Regex {
        match self {
            Self::FontSize => &FONT_SIZE,
            Self::FontWeight => &FONT_WEIGHT,
            Self::FontFamily => &FONT_FAMILY,
            Self::Padding => &PADDING,
            Self::Margin => &MARGIN,
        }
    }

    /// Whether a single class token belongs to this family.
    #[inline]
    pub fn matches(self, class: &str) -> bool {
        self.pattern().is_match(class)
    }

    /// First member of this family present in a class string.
    pub fn find(self, class_name: &str) -> Option<&str> {
        tokens(class_name).find(|c| self.matches(c))
    }

    /// Remove every member of the family and append `new_class` (if non-empty).
    pub fn replace(self, class_name: &str, new_class: &str) -> String {
        let mut kept: Vec<&str> = tokens(class_name).filter(|c| !self.matches(c)).collect();
        kept.extend(tokens(new_class));
        kept.join(" ")
    }
}

/// Whitespace-separated class tokens.
#[inline]
pub fn tokens(class_name: &str) -> impl Iterator<Item = &str> {
    class_name.split_whitespace()
}

pub fn has_class(class_name: &str, class: &str) -> bool {
    tokens(class_name).any(|c| c == class)
}

/// Append `class` unless already present.
pub fn add_class(class_name: &str, class: &str) -> String {
    if has_class(class_name, class) {
        return normalize(class_name);
    }
    tokens(class_name)
        .chain(std::iter::once(class))
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn remove_class(class_name: &str, class: &str) -> String {
    tokens(class_name)
        .filter(|c| *c != class)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Drop the transient `vise-` marker classes.
pub fn strip_markers(class_name: &str) -> String {
    tokens(class_name)
        .filter(|c| !is_marker(c))
        .collect::<Vec<_>>()
        .join(" ")
}

#[inline]
pub fn is_marker(class: &str) -> bool {
    class.starts_with(MARKER_PREFIX)
}

fn normalize(class_name: &str) -> String {
    tokens(class_name).collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_font_weight_scenario() {
        let out = ClassFamily::FontWeight.replace("text-lg font-normal text-black", "font-bold");
        assert_eq!(out, "text-lg text-black font-bold");
    }

    #[test]
    fn test_replace_idempotent() {
        let input = "text-xl font-bold p-4 m-2 font-serif";
        let cases = [
            (ClassFamily::FontSize, "text-2xl"),
            (ClassFamily::FontWeight, "font-bold"),
            (ClassFamily::FontFamily, "font-mono"),
            (ClassFamily::Padding, "p-6"),
            (ClassFamily::Margin, "m-4"),
        ];
        for (family, value) in cases {
            let once = family.replace(input, value);
            assert_eq!(family.replace(&once, value), once, "{family:?}");
        }
    }

    #[test]
    fn test_family_replacement_leaves_one_member() {
        let out = ClassFamily::FontSize.replace("text-sm text-4xl text-center", "text-2xl");
        assert_eq!(out, "text-center text-2xl");
        assert_eq!(
            tokens(&out).filter(|c| ClassFamily::FontSize.matches(c)).count(),
            1
        );
    }

    #[test]
    fn test_empty_new_value_only_removes() {
        assert_eq!(ClassFamily::FontFamily.replace("font-mono a", ""), "a");
    }

    #[test]
    fn test_text_color_not_font_size() {
        assert!(!ClassFamily::FontSize.matches("text-black"));
        assert!(!ClassFamily::FontSize.matches("text-center"));
        assert!(ClassFamily::FontSize.matches("text-9xl"));
    }

    #[test]
    fn test_spacing_directional_variants() {
        let out = ClassFamily::Padding.replace("px-8 py-4 pt-2 pointer-events-none", "p-6");
        assert_eq!(out, "pointer-events-none p-6");

        let out = ClassFamily::Margin.replace("mx-auto mb-6 -mt-2 max-w-3xl", "m-4");
        assert_eq!(out, "max-w-3xl m-4");
    }

    #[test]
    fn test_responsive_variants_untouched() {
        let out = ClassFamily::FontSize.replace("text-4xl md:text-6xl", "text-5xl");
        assert_eq!(out, "md:text-6xl text-5xl");
    }

    #[test]
    fn test_markers() {
        let with = add_class("a b", SELECTED_MARKER);
        assert_eq!(with, "a b vise-selected");
        assert_eq!(add_class(&with, SELECTED_MARKER), with);
        assert_eq!(strip_markers("a vise-selected b vise-hoverable"), "a b");
        assert_eq!(remove_class(&with, SELECTED_MARKER), "a b");
    }
}
