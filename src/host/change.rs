//! Change records produced by the property panel.

use serde::Serialize;

use crate::preview::descriptor::ElementDescriptor;
use crate::preview::mutate::Property;
use crate::source::PatchOutcome;

/// How a panel control produces its value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ChangeKind {
    /// Free-form input (className)
    FreeText,
    /// Select swapping one class of a family
    ClassSubstitution,
    /// Color picker writing an inline style
    InlineStyle,
    /// Text area, committed after a quiet period
    DebouncedText,
}

impl ChangeKind {
    pub fn of(property: &Property) -> Self {
        match property {
            Property::TextContent => Self::DebouncedText,
            Property::Color | Property::BackgroundColor => Self::InlineStyle,
            p if p.family().is_some() => Self::ClassSubstitution,
            _ => Self::FreeText,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangeRecord {
    pub property: Property,
    /// Value materialized in the preview before the change
    pub old_value: String,
    pub new_value: String,
    pub kind: ChangeKind,
    /// Source file rewritten by the change, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub patched: Option<String>,
}

impl ChangeRecord {
    /// Build a record. The old value comes from the inline styles written
    /// since selection, then from the materialized descriptor.
    pub fn new(
        descriptor: &ElementDescriptor,
        inline: &InlineStyles,
        property: Property,
        new_value: &str,
    ) -> Self {
        let old_value = inline
            .get(&property)
            .map_or_else(|| materialized(descriptor, &property), str::to_string);
        Self {
            old_value,
            new_value: new_value.to_string(),
            kind: ChangeKind::of(&property),
            property,
            patched: None,
        }
    }

    pub fn with_outcome(mut self, outcome: &PatchOutcome) -> Self {
        self.patched = outcome.path().map(str::to_string);
        self
    }
}

/// Inline colors the host has written to the selected element.
///
/// The style snapshot in the descriptor only changes through a fresh
/// selection, so consecutive color edits read their old value from here.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InlineStyles {
    color: Option<String>,
    background_color: Option<String>,
}

impl InlineStyles {
    pub fn get(&self, property: &Property) -> Option<&str> {
        match property {
            Property::Color => self.color.as_deref(),
            Property::BackgroundColor => self.background_color.as_deref(),
            _ => None,
        }
    }

    /// Remember an inline write; other properties are ignored.
    pub fn record(&mut self, property: &Property, value: &str) {
        let slot = match property {
            Property::Color => &mut self.color,
            Property::BackgroundColor => &mut self.background_color,
            _ => return,
        };
        *slot = Some(value.to_string());
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

/// Current value of `property` as the descriptor records it.
pub fn materialized(descriptor: &ElementDescriptor, property: &Property) -> String {
    match property {
        Property::TextContent => descriptor.text_content.clone(),
        Property::ClassName => descriptor.class_name.clone(),
        Property::Color => descriptor.styles.color.clone(),
        Property::BackgroundColor => descriptor.styles.background_color.clone(),
        p => p
            .family()
            .and_then(|family| family.find(&descriptor.class_name))
            .unwrap_or_default()
            .to_string(),
    }
}

/// Bring the descriptor in step with a change the preview just applied.
///
/// Inline style writes are not folded back into the style snapshot; the
/// snapshot only changes through a fresh selection.
pub fn materialize(descriptor: &mut ElementDescriptor, property: &Property, value: &str) {
    match property {
        Property::TextContent => descriptor.text_content = value.trim().to_string(),
        Property::ClassName => descriptor.class_name = value.to_string(),
        p => {
            if let Some(family) = p.family() {
                descriptor.class_name = family.replace(&descriptor.class_name, value);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn descriptor() -> ElementDescriptor {
        let mut d = ElementDescriptor {
            tag_name: "H1".into(),
            text_content: "Hello".into(),
            class_name: "text-lg font-normal text-black vise-selected".into(),
            ..ElementDescriptor::default()
        };
        d.styles.color = "rgb(0, 0, 0)".into();
        d
    }

    #[test]
    fn test_kinds() {
        assert_eq!(ChangeKind::of(&Property::TextContent), ChangeKind::DebouncedText);
        assert_eq!(ChangeKind::of(&Property::ClassName), ChangeKind::FreeText);
        assert_eq!(ChangeKind::of(&Property::Margin), ChangeKind::ClassSubstitution);
        assert_eq!(ChangeKind::of(&Property::BackgroundColor), ChangeKind::InlineStyle);
    }

    #[test]
    fn test_old_value_from_descriptor() {
        let d = descriptor();
        let none = InlineStyles::default();
        let old = |property, value| ChangeRecord::new(&d, &none, property, value).old_value;
        assert_eq!(old(Property::TextContent, "Hi"), "Hello");
        assert_eq!(old(Property::FontWeight, "font-bold"), "font-normal");
        assert_eq!(old(Property::Padding, "p-4"), "");
        assert_eq!(old(Property::Color, "#ff0000"), "rgb(0, 0, 0)");
    }

    #[test]
    fn test_old_value_from_inline_write() {
        let d = descriptor();
        let mut inline = InlineStyles::default();
        inline.record(&Property::Color, "#ff0000");
        inline.record(&Property::FontWeight, "font-bold");

        let record = ChangeRecord::new(&d, &inline, Property::Color, "#00ff00");
        assert_eq!(record.old_value, "#ff0000");
        let record = ChangeRecord::new(&d, &inline, Property::BackgroundColor, "#000000");
        assert_eq!(record.old_value, "");
        let record = ChangeRecord::new(&d, &inline, Property::FontWeight, "font-light");
        assert_eq!(record.old_value, "font-normal");

        inline.clear();
        assert_eq!(inline.get(&Property::Color), None);
    }

    #[test]
    fn test_materialize_tracks_dom() {
        let mut d = descriptor();
        materialize(&mut d, &Property::FontWeight, "font-bold");
        assert_eq!(d.class_name, "text-lg text-black vise-selected font-bold");
        materialize(&mut d, &Property::TextContent, "  Hi  ");
        assert_eq!(d.text_content, "Hi");
        materialize(&mut d, &Property::Color, "#ff0000");
        assert_eq!(d.styles.color, "rgb(0, 0, 0)");
    }
}
