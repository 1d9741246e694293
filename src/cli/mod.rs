//! Command-line interface module.

mod args;
pub mod common;
pub mod inspect;
pub mod patch;
pub mod session;
pub mod watch;

pub use args::{Cli, Commands};
