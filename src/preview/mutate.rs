//! Mutation Applier: maps a `(property, value)` pair onto the live DOM.
//!
//! | property | effect |
//! |---|---|
//! | `textContent` | children replaced by one text node |
//! | `className` | class attribute replaced verbatim |
//! | `color`, `backgroundColor` | inline style property |
//! | `fontSize`, `fontWeight`, `fontFamily`, `padding`, `margin` | class family swap |
//!
//! Anything else is ignored.

use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::dom::class::ClassFamily;
use crate::dom::{Document, NodeId};

/// Editable element property, named the way the panel and wire format name it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Property {
    TextContent,
    ClassName,
    Color,
    BackgroundColor,
    FontSize,
    FontWeight,
    FontFamily,
    Padding,
    Margin,
    /// Unrecognized name, kept verbatim so it round-trips.
    Other(String),
}

impl Property {
    pub fn as_str(&self) -> &str {
        match self {
            Self::TextContent => "textContent",
            Self::ClassName => "className",
            Self::Color => "color",
            Self::BackgroundColor => "backgroundColor",
            Self::FontSize => "fontSize",
            Self::FontWeight => "fontWeight",
            Self::FontFamily => "fontFamily",
            Self::Padding => "padding",
            Self::Margin => "margin",
            Self::Other(name) => name,
        }
    }

    /// Class family this property swaps within, if any.
    pub fn family(&self) -> Option<ClassFamily> {
        match self {
            Self::FontSize => Some(ClassFamily::FontSize),
            Self::FontWeight => Some(ClassFamily::FontWeight),
            Self::FontFamily => Some(ClassFamily::FontFamily),
            Self::Padding => Some(ClassFamily::Padding),
            Self::Margin => Some(ClassFamily::Margin),
            _ => None,
        }
    }

    /// CSS property name for inline-style properties.
    pub fn css_name(&self) -> Option<&'static str> {
        match self {
            Self::Color => Some("color"),
            Self::BackgroundColor => Some("background-color"),
            _ => None,
        }
    }
}

impl From<&str> for Property {
    fn from(name: &str) -> Self {
        match name {
            "textContent" => Self::TextContent,
            "className" => Self::ClassName,
            "color" => Self::Color,
            "backgroundColor" => Self::BackgroundColor,
            "fontSize" => Self::FontSize,
            "fontWeight" => Self::FontWeight,
            "fontFamily" => Self::FontFamily,
            "padding" => Self::Padding,
            "margin" => Self::Margin,
            other => Self::Other(other.to_string()),
        }
    }
}

impl From<String> for Property {
    fn from(name: String) -> Self {
        Self::from(name.as_str())
    }
}

impl From<Property> for String {
    fn from(property: Property) -> Self {
        match property {
            Property::Other(name) => name,
            known => known.as_str().to_string(),
        }
    }
}

impl FromStr for Property {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from(s))
    }
}

impl fmt::Display for Property {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Apply one change to `node`. Returns `false` when the property is unknown.
pub fn apply(doc: &mut Document, node: NodeId, property: &Property, value: &str) -> bool {
    match property {
        Property::TextContent => doc.set_text_content(node, value),
        Property::ClassName => doc.set_class_name(node, value),
        Property::Color | Property::BackgroundColor => {
            let Some(css) = property.css_name() else {
                return false;
            };
            doc.set_style_property(node, css, value);
        }
        Property::FontSize
        | Property::FontWeight
        | Property::FontFamily
        | Property::Padding
        | Property::Margin => {
            let Some(family) = property.family() else {
                return false;
            };
            let next = family.replace(doc.class_name(node), value);
            doc.set_class_name(node, &next);
        }
        Property::Other(_) => return false,
    }
    true
}
