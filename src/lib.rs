//! An early-stage scaffold for a 2D game
//!
//! The scaffold provides:
//! - Startup configuration read from an embedded Lua runtime (mlua)
//! - A window opened with winit from that configuration
//! - Edge-triggered, hold-aware tracking of logical game buttons
//! - A fixed-rate frame loop driving input and game updates

pub mod config;
pub mod core;
pub mod input;
pub mod scripting;

// Re-exports for convenience
pub use mlua;
pub use winit;

/// Prelude module for common imports
pub mod prelude {
    pub use crate::config::{ConfigError, WindowConfig, bootstrap};
    pub use crate::core::{Context, Engine, FrameClock, FrameStats, Game};
    pub use crate::input::{EventQueue, EventSource, InputEvent, InputTracker, Key, KeyBindings};
    pub use crate::scripting::ScriptRuntime;
}
