//! Property panel state.
//!
//! Initialised from a descriptor when an element is selected, then edited
//! field by field. Family selects read their value from the class list;
//! colors come from the style snapshot.

use serde::Serialize;

use crate::dom::class::ClassFamily;
use crate::dom::style::rgb_to_hex;
use crate::preview::descriptor::ElementDescriptor;
use crate::preview::mutate::Property;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyPanel {
    pub text_content: String,
    pub class_name: String,
    pub font_size: String,
    pub color: String,
    pub background_color: String,
    pub font_weight: String,
    pub font_style: String,
    /// `sans`, `serif` or `mono`
    pub font_family: String,
    pub padding: String,
    pub margin: String,
}

impl Default for PropertyPanel {
    fn default() -> Self {
        Self {
            text_content: String::new(),
            class_name: String::new(),
            font_size: "text-base".into(),
            color: "#000000".into(),
            background_color: "#ffffff".into(),
            font_weight: "font-normal".into(),
            font_style: "normal".into(),
            font_family: "sans".into(),
            padding: "p-0".into(),
            margin: "m-0".into(),
        }
    }
}

impl PropertyPanel {
    pub fn from_descriptor(descriptor: &ElementDescriptor) -> Self {
        let defaults = Self::default();
        let classes = descriptor.class_name.as_str();
        let class_or = |family: ClassFamily, fallback: String| {
            family.find(classes).map(str::to_string).unwrap_or(fallback)
        };
        let styles = &descriptor.styles;

        Self {
            text_content: descriptor.text_content.clone(),
            class_name: descriptor.class_name.clone(),
            font_size: class_or(ClassFamily::FontSize, defaults.font_size),
            color: rgb_to_hex(&styles.color).unwrap_or(defaults.color),
            background_color: rgb_to_hex(&styles.background_color)
                .unwrap_or(defaults.background_color),
            font_weight: class_or(ClassFamily::FontWeight, defaults.font_weight),
            font_style: if styles.font_style.is_empty() {
                defaults.font_style
            } else {
                styles.font_style.clone()
            },
            font_family: font_family_key(&styles.font_family).to_string(),
            padding: class_or(ClassFamily::Padding, defaults.padding),
            margin: class_or(ClassFamily::Margin, defaults.margin),
        }
    }

    /// Reflect an edit in the matching field.
    pub fn set(&mut self, property: &Property, value: &str) {
        let field = match property {
            Property::TextContent => &mut self.text_content,
            Property::ClassName => &mut self.class_name,
            Property::Color => &mut self.color,
            Property::BackgroundColor => &mut self.background_color,
            Property::FontSize => &mut self.font_size,
            Property::FontWeight => &mut self.font_weight,
            Property::FontFamily => {
                self.font_family = value.strip_prefix("font-").unwrap_or(value).to_string();
                return;
            }
            Property::Padding => &mut self.padding,
            Property::Margin => &mut self.margin,
            Property::Other(_) => return,
        };
        *field = value.to_string();
    }
}

/// Panel key for a computed font-family stack.
fn font_family_key(stack: &str) -> &'static str {
    let stack = stack.to_ascii_lowercase();
    if stack.contains("monospace") {
        "mono"
    } else if stack.contains("serif") && !stack.contains("sans-serif") {
        "serif"
    } else {
        "sans"
    }
}
