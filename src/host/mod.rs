//! Host editor state.
//!
//! The host owns the authoritative section sources, the selected element's
//! descriptor, the property panel and the change history. It never touches
//! the preview document; everything it wants from the preview goes out as a
//! `protocol::Message` in its outbox.
//!
//! # Edit flow
//!
//! ```text
//! edit(property, value)
//!   ├─ textContent ──▶ pending slot ──(quiet period)──┐
//!   └─ anything else ─────────────────────────────────┤
//!                                                     ▼
//!                     hold suppression ─▶ send update ─▶ materialize descriptor
//!                                      ─▶ patch sources ─▶ mark dirty ─▶ "Auto-saved"
//! ```
//!
//! Dirty files are pushed back to the preview as `render` on the next
//! `reload_preview`. Like the preview surface, the host is sans-IO: time is
//! passed in and `actor::host` drives it.

pub mod change;
pub mod panel;
pub mod pending;
pub mod suppress;

use std::sync::Arc;
use std::time::{Duration, Instant};

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

use crate::config::EditorConfig;
use crate::dom::ElementAddress;
use crate::preview::descriptor::ElementDescriptor;
use crate::preview::mutate::Property;
use crate::protocol::Message;
use crate::source::{self, SourceSet};
use crate::store::MockStore;
use change::{ChangeKind, ChangeRecord, InlineStyles};
use panel::PropertyPanel;
use pending::Pending;
use suppress::Suppression;

/// Which pane the editor shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum View {
    #[default]
    Preview,
    Code,
}

/// Where a host-side click landed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickRegion {
    /// Inside the preview container
    Preview,
    /// Inside the property panel
    Panel,
    Outside,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum HostSelection {
    #[default]
    Idle,
    Selected(ElementDescriptor),
}

/// What happened to a code-view file update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileUpdate {
    Applied,
    /// Content equals the authoritative copy (our own write coming back)
    Echo,
    Unknown,
}

#[derive(Debug, Clone)]
struct TextEdit {
    address: ElementAddress,
    value: String,
}

#[derive(Debug, Clone)]
struct Status {
    text: String,
    until: Instant,
}

pub struct Host {
    sources: SourceSet,
    timing: EditorConfig,
    store: Arc<MockStore>,

    preview_ready: bool,
    interaction_ready: bool,
    view: View,

    selection: HostSelection,
    /// Inline colors written since the selection was taken
    inline: InlineStyles,
    panel: Option<PropertyPanel>,
    pending_text: Pending<TextEdit>,
    suppression: Suppression,

    /// Patched since the last push to the preview
    dirty: FxHashSet<String>,
    /// Changed since the last save
    unsaved: FxHashSet<String>,
    component_id: Option<String>,
    changes: Vec<ChangeRecord>,
    status: Option<Status>,

    outbox: Vec<Message>,
}

impl Host {
    pub fn new(sources: SourceSet, timing: EditorConfig, store: Arc<MockStore>) -> Self {
        Self {
            sources,
            timing,
            store,
            preview_ready: false,
            interaction_ready: false,
            view: View::Preview,
            selection: HostSelection::Idle,
            inline: InlineStyles::default(),
            panel: None,
            pending_text: Pending::new(),
            suppression: Suppression::new(),
            dirty: FxHashSet::default(),
            unsaved: FxHashSet::default(),
            component_id: None,
            changes: Vec::new(),
            status: None,
            outbox: Vec::new(),
        }
    }

    // ========================================================================
    // accessors
    // ========================================================================

    #[inline]
    pub fn sources(&self) -> &SourceSet {
        &self.sources
    }

    #[inline]
    pub fn view(&self) -> View {
        self.view
    }

    #[cfg(test)]
    pub fn selection(&self) -> &HostSelection {
        &self.selection
    }

    pub fn descriptor(&self) -> Option<&ElementDescriptor> {
        match &self.selection {
            HostSelection::Selected(descriptor) => Some(descriptor),
            HostSelection::Idle => None,
        }
    }

    pub fn panel(&self) -> Option<&PropertyPanel> {
        self.panel.as_ref()
    }

    #[cfg(test)]
    pub fn is_preview_ready(&self) -> bool {
        self.preview_ready
    }

    pub fn is_interaction_ready(&self) -> bool {
        self.interaction_ready
    }

    pub fn changes(&self) -> &[ChangeRecord] {
        &self.changes
    }

    pub fn component_id(&self) -> Option<&str> {
        self.component_id.as_deref()
    }

    /// Dirty paths in mount order.
    pub fn dirty(&self) -> Vec<&str> {
        self.sources
            .paths()
            .filter(|path| self.dirty.contains(*path))
            .collect()
    }

    /// Visible status line, if any.
    pub fn status(&self) -> Option<&str> {
        self.status.as_ref().map(|s| s.text.as_str())
    }

    pub fn set_status(&mut self, text: impl Into<String>, now: Instant) {
        let text = text.into();
        crate::debug!("host"; "status: {}", text);
        self.status = Some(Status {
            text,
            until: now + self.timing.status_ttl(),
        });
    }

    /// Take everything posted since the last drain.
    pub fn drain_outbox(&mut self) -> Vec<Message> {
        std::mem::take(&mut self.outbox)
    }

    // ========================================================================
    // messages from the preview
    // ========================================================================

    pub fn handle(&mut self, message: Message, now: Instant) {
        match message {
            Message::Ready => {
                if self.preview_ready {
                    crate::debug!("host"; "preview restarted");
                    self.interaction_ready = false;
                    self.discard_selection();
                }
                self.preview_ready = true;
                self.push_all();
            }
            Message::InteractionReady => {
                self.interaction_ready = true;
            }
            Message::Selected { element } => self.on_selected(element, now),
            other => {
                crate::debug!("host"; "unexpected {} from preview", other.kind());
            }
        }
    }

    fn on_selected(&mut self, mut element: ElementDescriptor, now: Instant) {
        if self.view != View::Preview {
            crate::debug!("host"; "selection outside preview view ignored");
            return;
        }

        let same = self
            .descriptor()
            .is_some_and(|current| current.address == element.address);
        if same && self.suppression.is_held(now) {
            // echo of our own update: keep the panel as the user left it
            self.selection = HostSelection::Selected(element);
            return;
        }

        if let Some(record) = self.flush_pending(now)
            && self.descriptor().is_some_and(|d| d.address == element.address)
        {
            change::materialize(&mut element, &record.property, &record.new_value);
        }

        // the fresh snapshot already carries our inline writes
        self.inline.clear();
        self.panel = Some(PropertyPanel::from_descriptor(&element));
        self.selection = HostSelection::Selected(element);
    }

    /// Send every file in mount order; the entry goes last so the preview
    /// mounts once everything it imports is present.
    fn push_all(&mut self) {
        for (path, code) in self.sources.iter() {
            self.outbox.push(Message::render(path, code));
        }
        self.dirty.clear();
    }

    // ========================================================================
    // user actions
    // ========================================================================

    /// A click somewhere in the host UI. Returns whether it cleared the selection.
    pub fn click(&mut self, region: ClickRegion, now: Instant) -> bool {
        if region != ClickRegion::Outside
            || self.view != View::Preview
            || self.selection == HostSelection::Idle
        {
            return false;
        }
        self.flush_pending(now);
        self.deselect();
        true
    }

    /// Switch panes. Leaving the preview discards the selection.
    pub fn set_view(&mut self, view: View, now: Instant) {
        if self.view == view {
            return;
        }
        if self.view == View::Preview {
            self.flush_pending(now);
            if self.selection != HostSelection::Idle {
                self.deselect();
            }
        }
        self.view = view;
    }

    /// A panel control fired. Returns whether the edit was accepted.
    pub fn edit(&mut self, property: Property, value: &str, now: Instant) -> bool {
        if self.view != View::Preview {
            return false;
        }
        let Some(address) = self.descriptor().map(|d| d.address.clone()) else {
            return false;
        };
        if !self.interaction_ready {
            crate::debug!("host"; "{} edit before interaction-ready, dropped", property);
            return false;
        }
        if let Some(panel) = &mut self.panel {
            panel.set(&property, value);
        }

        if ChangeKind::of(&property) == ChangeKind::DebouncedText {
            let edit = TextEdit {
                address,
                value: value.to_string(),
            };
            self.pending_text.set(edit, now + self.timing.text_debounce());
        } else {
            self.flush_pending(now);
            self.commit(property, value, now);
        }
        true
    }

    /// Commit the pending text edit now, if any.
    fn flush_pending(&mut self, now: Instant) -> Option<ChangeRecord> {
        let edit = self.pending_text.flush()?;
        self.commit_text(edit, now)
    }

    fn commit_text(&mut self, edit: TextEdit, now: Instant) -> Option<ChangeRecord> {
        if self.descriptor().map(|d| &d.address) != Some(&edit.address) {
            crate::debug!("host"; "text edit for {} outlived its selection", edit.address);
            return None;
        }
        self.commit(Property::TextContent, &edit.value, now)
    }

    /// Apply one change: live update, descriptor, sources.
    fn commit(&mut self, property: Property, value: &str, now: Instant) -> Option<ChangeRecord> {
        if !self.interaction_ready {
            crate::debug!("host"; "{} edit before interaction-ready, dropped", property);
            return None;
        }
        let HostSelection::Selected(descriptor) = &mut self.selection else {
            return None;
        };

        let record = ChangeRecord::new(descriptor, &self.inline, property.clone(), value);
        self.suppression.hold(now, self.timing.feedback_delay());
        self.outbox.push(Message::update(
            descriptor.address.clone(),
            property.clone(),
            value,
        ));
        change::materialize(descriptor, &property, value);
        self.inline.record(&property, value);

        let outcome = source::patch(&mut self.sources, &property, &record.old_value, value);
        if let Some(path) = outcome.path() {
            self.dirty.insert(path.to_string());
            self.unsaved.insert(path.to_string());
        }

        let record = record.with_outcome(&outcome);
        self.changes.push(record.clone());
        self.set_status("Auto-saved", now);
        Some(record)
    }

    /// Full preview reload: push patched files back as `render`.
    ///
    /// Re-rendering discards the preview's selection, so the host drops its own.
    pub fn reload_preview(&mut self, now: Instant) -> usize {
        self.flush_pending(now);
        if !self.preview_ready {
            crate::debug!("host"; "reload before ready, deferred");
            return 0;
        }

        let dirty: Vec<String> = self.dirty().into_iter().map(str::to_string).collect();
        for path in &dirty {
            if let Some(code) = self.sources.get(path) {
                self.outbox.push(Message::render(path.as_str(), code));
            }
        }
        self.dirty.clear();
        if !dirty.is_empty() {
            self.discard_selection();
        }
        dirty.len()
    }

    /// A file edited in the code view changed.
    pub fn on_file_update(&mut self, path: &str, code: &str, now: Instant) -> FileUpdate {
        match self.sources.get(path) {
            None => return FileUpdate::Unknown,
            Some(current) if current == code => return FileUpdate::Echo,
            Some(_) => {}
        }

        self.flush_pending(now);
        self.sources.set(path, code);
        self.unsaved.insert(path.to_string());
        self.dirty.remove(path);

        if self.preview_ready {
            self.outbox.push(Message::render(path, code));
            self.discard_selection();
        }
        FileUpdate::Applied
    }

    /// Persist all sources to the store.
    pub fn save(&mut self, now: Instant) -> bool {
        let bundle = self.sources.bundle();
        let result = match self.component_id.clone() {
            Some(id) => self
                .store
                .update_component(&id, &bundle)
                .map(|_| "Updated successfully".to_string()),
            None => self.store.save_component(&bundle).map(|saved| {
                self.component_id = Some(saved.id);
                "Saved successfully".to_string()
            }),
        }
        .and_then(|status| {
            self.save_files()?;
            Ok(status)
        });

        match result {
            Ok(status) => {
                self.set_status(status, now);
                true
            }
            Err(e) => {
                crate::log!("error"; "save failed: {}", e);
                self.set_status("Save failed", now);
                false
            }
        }
    }

    fn save_files(&mut self) -> Result<(), crate::store::StoreError> {
        let paths: Vec<String> = self
            .sources
            .paths()
            .filter(|path| self.unsaved.contains(*path))
            .map(str::to_string)
            .collect();
        for path in paths {
            if let Some(code) = self.sources.get(&path) {
                self.store.save_file_content(&path, code)?;
            }
            self.unsaved.remove(&path);
        }
        Ok(())
    }

    /// Upload all sources as a new component.
    pub fn upload(&mut self, now: Instant) -> bool {
        match self.store.save_component(&self.sources.bundle()) {
            Ok(saved) => {
                self.set_status(format!("Component uploaded with ID: {}", saved.id), now);
                self.component_id = Some(saved.id);
                true
            }
            Err(e) => {
                crate::log!("error"; "upload failed: {}", e);
                self.set_status("Upload failed", now);
                false
            }
        }
    }

    // ========================================================================
    // timers
    // ========================================================================

    /// Advance timers: commit a due text edit, release suppression, expire status.
    pub fn poll(&mut self, now: Instant) {
        if let Some(edit) = self.pending_text.take_due(now) {
            self.commit_text(edit, now);
        }
        self.suppression.release_due(now);
        if self.status.as_ref().is_some_and(|s| now >= s.until) {
            self.status = None;
        }
    }

    /// Time until the next `poll` has work, if any.
    pub fn next_deadline(&self, now: Instant) -> Option<Duration> {
        [
            self.pending_text.deadline(),
            self.suppression.deadline(),
            self.status.as_ref().map(|s| s.until),
        ]
        .into_iter()
        .flatten()
        .min()
        .map(|at| at.saturating_duration_since(now))
    }

    // ========================================================================
    // selection
    // ========================================================================

    /// Drop the selection on both sides.
    fn deselect(&mut self) {
        self.discard_selection();
        if self.interaction_ready {
            self.outbox.push(Message::ClearSelection);
        }
    }

    /// Drop the host-side selection only.
    fn discard_selection(&mut self) {
        self.selection = HostSelection::Idle;
        self.inline.clear();
        self.panel = None;
    }
}
