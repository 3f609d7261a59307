//! Platform abstraction layer
//!
//! Handles browser/native differences for:
//! - Clipboard writes
//! - The animation-frame loop and input listeners (web only)

pub mod clipboard;
#[cfg(target_arch = "wasm32")]
pub mod web;

pub use clipboard::{Clipboard, ClipboardError, CopyStatus, LogClipboard, MemoryClipboard};
