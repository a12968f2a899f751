//! Input handling module
//!
//! Translates raw per-frame window events into edge-triggered,
//! duration-aware logical button state.

mod key;
mod source;
mod tracker;

pub use key::{Key, KeyBindings};
pub use source::{EventQueue, EventSource, InputEvent};
pub use tracker::InputTracker;
