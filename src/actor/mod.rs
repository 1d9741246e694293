//! Actor System for the editor session
//!
//! Message-passing concurrency around the two sans-IO endpoints:
//!
//! ```text
//!                 HostMsg               frames              PreviewMsg
//! FsActor/CLI ─────────────▶ HostActor ◀═══════▶ PreviewActor ◀──────── CLI
//! (watch)                    (editor)     link    (iframe side)
//! ```
//!
//! # Module Structure
//!
//! - `messages` - Message types for inter-actor communication
//! - `host` - Drives `host::Host`
//! - `preview` - Drives `preview::PreviewSurface`
//! - `fs` - Section directory watcher with debouncing
//! - `coordinator` - Wires up and runs actors

pub mod coordinator;
pub mod fs;
pub mod host;
pub mod messages;
pub mod preview;

pub use coordinator::{Coordinator, Session};

use std::time::Instant;

/// Current time on the runtime clock (follows tokio's paused clock in tests).
pub(crate) fn clock() -> Instant {
    tokio::time::Instant::now().into_std()
}
