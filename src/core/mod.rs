//! Core process state shared across the codebase.

mod state;

pub use state::{setup_shutdown_handler, wait_for_shutdown};
