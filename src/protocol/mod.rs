//! Cross-Boundary Message Protocol
//!
//! Host and preview share no state; everything crossing between them is a
//! JSON envelope:
//!
//! ```json
//! {"v":1,"source":"host","message":{"type":"update","address":[0,2],"property":"color","value":"#ff0000"}}
//! ```
//!
//! # Message Types
//!
//! - `ready`: preview booted and listens for `render` (preview → host)
//! - `render`: (re)mount with a source file's content (host → preview)
//! - `selected`: user clicked an element (preview → host)
//! - `update`: apply a property change at an address (host → preview)
//! - `interaction-ready`: selection and mutation handlers are live (preview → host)
//! - `clear-selection`: drop the current selection (host → preview)

pub mod link;

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::dom::ElementAddress;
use crate::preview::descriptor::ElementDescriptor;
use crate::preview::mutate::Property;

pub use link::{FrameLog, LinkRx, LinkTx};

/// Envelope version; receivers drop anything else.
pub const PROTOCOL_VERSION: u32 = 1;

/// One side of the boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EndpointId {
    Host,
    Preview,
}

impl EndpointId {
    /// The endpoint on the other side.
    pub const fn peer(self) -> Self {
        match self {
            Self::Host => Self::Preview,
            Self::Preview => Self::Host,
        }
    }
}

impl fmt::Display for EndpointId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Host => "host",
            Self::Preview => "preview",
        })
    }
}

/// Message payload, tagged by `type`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum Message {
    /// Preview booted
    Ready,

    /// Source content to (re)mount
    Render {
        /// Source path (e.g., "/HeroSection.tsx")
        path: String,
        code: String,
    },

    /// Element selected by the user
    Selected { element: ElementDescriptor },

    /// Property change at an address
    Update {
        address: ElementAddress,
        property: Property,
        value: String,
    },

    /// Interaction layer attached
    InteractionReady,

    /// Drop the current selection
    ClearSelection,
}

impl Message {
    pub fn render(path: impl Into<String>, code: impl Into<String>) -> Self {
        Self::Render {
            path: path.into(),
            code: code.into(),
        }
    }

    pub fn update(address: ElementAddress, property: Property, value: impl Into<String>) -> Self {
        Self::Update {
            address,
            property,
            value: value.into(),
        }
    }

    /// The only endpoint allowed to send this message.
    pub const fn sender(&self) -> EndpointId {
        match self {
            Self::Ready | Self::Selected { .. } | Self::InteractionReady => EndpointId::Preview,
            Self::Render { .. } | Self::Update { .. } | Self::ClearSelection => EndpointId::Host,
        }
    }

    /// Wire name of the message type.
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Ready => "ready",
            Self::Render { .. } => "render",
            Self::Selected { .. } => "selected",
            Self::Update { .. } => "update",
            Self::InteractionReady => "interaction-ready",
            Self::ClearSelection => "clear-selection",
        }
    }
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Render { path, code } => write!(f, "render {path} ({} bytes)", code.len()),
            Self::Selected { element } => {
                write!(f, "selected {} at {}", element.selector, element.address)
            }
            Self::Update {
                address,
                property,
                value,
            } => write!(f, "update {address} {property}={value:?}"),
            other => f.write_str(other.kind()),
        }
    }
}

/// Versioned, sender-stamped message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    pub v: u32,
    pub source: EndpointId,
    pub message: Message,
}

impl Envelope {
    pub fn new(source: EndpointId, message: Message) -> Self {
        Self {
            v: PROTOCOL_VERSION,
            source,
            message,
        }
    }

    /// Serialize to JSON string
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }

    /// Parse from JSON string
    pub fn from_json(s: &str) -> Option<Self> {
        serde_json::from_str(s).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_serialization() {
        let env = Envelope::new(
            EndpointId::Host,
            Message::update(ElementAddress::new([0, 2]), Property::Color, "#ff0000"),
        );
        let json = env.to_json();
        assert!(json.contains(r#""v":1"#));
        assert!(json.contains(r#""source":"host""#));
        assert!(json.contains(r#""type":"update""#));
        assert!(json.contains(r#""address":[0,2]"#));
        assert!(json.contains(r#""property":"color""#));

        assert_eq!(Envelope::from_json(&json), Some(env));
    }

    #[test]
    fn test_unit_messages() {
        for (msg, name) in [
            (Message::Ready, "ready"),
            (Message::InteractionReady, "interaction-ready"),
            (Message::ClearSelection, "clear-selection"),
        ] {
            let json = serde_json::to_string(&msg).unwrap();
            assert_eq!(json, format!(r#"{{"type":"{name}"}}"#));
            assert_eq!(msg.kind(), name);
        }
    }

    #[test]
    fn test_render_roundtrip() {
        let msg = Message::render("/HeroSection.tsx", "export default function Hero() {}");
        let json = serde_json::to_string(&msg).unwrap();
        assert!(json.starts_with(r#"{"type":"render","path":"/HeroSection.tsx""#));
        assert_eq!(serde_json::from_str::<Message>(&json).unwrap(), msg);
    }

    #[test]
    fn test_sender_direction() {
        assert_eq!(Message::Ready.sender(), EndpointId::Preview);
        assert_eq!(Message::ClearSelection.sender(), EndpointId::Host);
        assert_eq!(EndpointId::Host.peer(), EndpointId::Preview);
    }

    #[test]
    fn test_malformed_rejected() {
        assert!(Envelope::from_json("not json").is_none());
        assert!(Envelope::from_json(r#"{"v":1,"source":"host","message":{"type":"explode"}}"#).is_none());
    }
}
