//! Utility modules shared by host and preview.

pub mod date;
pub mod hash;
pub mod html;
