//! Actor Message Definitions
//!
//! Commands for the two endpoint actors. Protocol traffic between the
//! endpoints does not pass through here; it travels as JSON frames over the
//! `protocol::link` pair.
//!
//! ```text
//! FsActor ──FileUpdate──▶ HostActor ◀══ link ══▶ PreviewActor
//!   CLI ────HostMsg─────▶    │                      ▲
//!   CLI ───────────────────────────── PreviewMsg ───┘
//! ```

use tokio::sync::oneshot;

use crate::dom::ElementAddress;
use crate::host::change::ChangeRecord;
use crate::host::panel::PropertyPanel;
use crate::host::{ClickRegion, View};
use crate::preview::Pointer;
use crate::preview::descriptor::ElementDescriptor;
use crate::preview::mutate::Property;
use crate::source::SourceSet;

// =============================================================================
// HostActor Messages
// =============================================================================

/// Messages to Host Actor
#[derive(Debug)]
pub enum HostMsg {
    /// Click somewhere in the editor chrome
    Click(ClickRegion),
    /// Property panel edit
    Edit { property: Property, value: String },
    /// Switch between preview and code view
    View(View),
    /// Push patched files back to the preview
    Reload,
    Save,
    Upload,
    /// A source file changed outside the editor
    FileUpdate { path: String, code: String },
    /// Show a transient status line
    Status(String),
    /// Answer with the current editor state
    Snapshot(oneshot::Sender<HostSnapshot>),
    Shutdown,
}

/// Point-in-time copy of the host state.
#[derive(Debug, Clone)]
pub struct HostSnapshot {
    pub sources: SourceSet,
    pub view: View,
    pub selected: Option<ElementDescriptor>,
    pub panel: Option<PropertyPanel>,
    pub changes: Vec<ChangeRecord>,
    pub status: Option<String>,
    pub component_id: Option<String>,
    pub interaction_ready: bool,
}

// =============================================================================
// PreviewActor Messages
// =============================================================================

/// Element a pointer event is aimed at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    Address(ElementAddress),
    /// Deepest element whose trimmed text matches
    Text(String),
}

/// Messages to Preview Actor
#[derive(Debug)]
pub enum PreviewMsg {
    /// Deliver a pointer event; replies whether an element received it
    Pointer {
        event: Pointer,
        target: Target,
        reply: oneshot::Sender<bool>,
    },
    /// Answer with the rendered document markup
    Html(oneshot::Sender<String>),
    /// Answer once every earlier message is handled
    Sync(oneshot::Sender<()>),
    Shutdown,
}
