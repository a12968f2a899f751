//! Startup configuration
//!
//! The settings script populates the scripting runtime's global namespace;
//! [`bootstrap`] freezes the `video` table into a statically-typed
//! [`WindowConfig`] that is read-only for the rest of the process lifetime.
//! Required fields have no defaults: startup fails fast with the offending
//! field name instead of guessing.

use std::path::Path;
use std::time::Duration;

use thiserror::Error;

use crate::input::Key;
use crate::scripting::ScriptRuntime;

/// A fatal problem with the settings source.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required settings field `{field}`")]
    MissingField { field: String },

    #[error("settings field `{field}` has the wrong type: expected {expected}, found {found}")]
    WrongType {
        field: String,
        expected: &'static str,
        found: &'static str,
    },

    #[error("settings field `{field}` is invalid: {reason}")]
    InvalidValue { field: String, reason: String },

    #[error("`{first}` and `{second}` are both bound to key code {code}")]
    DuplicateBinding { first: Key, second: Key, code: u32 },

    #[error("failed to read settings script `{path}`")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("settings script error: {0}")]
    Script(#[from] mlua::Error),
}

/// Window and main-loop configuration, derived once from settings.
#[derive(Debug, Clone)]
pub struct WindowConfig {
    pub width: u32,
    pub height: u32,
    pub fullscreen: bool,
    pub anti_aliasing_level: u32,
    pub fps_limit: u32,
    pub vsync_enabled: bool,
    /// Window title; the only defaulted field (`video.title` is optional).
    pub title: String,
    /// Fixed time slice of one main-loop iteration, `1 / fps_limit`.
    pub frame_duration: Duration,
}

impl WindowConfig {
    /// Read the `video` table out of the runtime's global namespace.
    pub fn from_settings(settings: &ScriptRuntime) -> Result<Self, ConfigError> {
        let width = positive(settings, "screenwidth")?;
        let height = positive(settings, "screenheight")?;
        let anti_aliasing_level = non_negative(settings, "anti_aliasing_level")?;
        let fps_limit = positive(settings, "fps_limit")?;
        let fullscreen = settings.bool_field("video", "fullscreen")?;
        let vsync_enabled = settings.bool_field("video", "vsync_enabled")?;
        let title = settings
            .opt_string_field("video", "title")?
            .unwrap_or_else(|| env!("CARGO_PKG_NAME").to_string());

        Ok(Self {
            width,
            height,
            fullscreen,
            anti_aliasing_level,
            fps_limit,
            vsync_enabled,
            title,
            frame_duration: Duration::from_secs_f64(1.0 / f64::from(fps_limit)),
        })
    }
}

/// Evaluate the settings script and build the window configuration.
///
/// The runtime is returned alongside the configuration: its globals stay
/// available for later lookups (key bindings, gameplay values).
pub fn bootstrap(script: &Path) -> Result<(ScriptRuntime, WindowConfig), ConfigError> {
    let runtime = ScriptRuntime::new();
    runtime.run_file(script)?;
    let config = WindowConfig::from_settings(&runtime)?;
    log::info!(
        "settings loaded from {}: {}x{}, fullscreen {}, {} fps cap, vsync {}, {}x AA",
        script.display(),
        config.width,
        config.height,
        config.fullscreen,
        config.fps_limit,
        config.vsync_enabled,
        config.anti_aliasing_level,
    );
    Ok((runtime, config))
}

fn positive(settings: &ScriptRuntime, field: &str) -> Result<u32, ConfigError> {
    let value = settings.int_field("video", field)?;
    u32::try_from(value)
        .ok()
        .filter(|v| *v > 0)
        .ok_or_else(|| ConfigError::InvalidValue {
            field: format!("video.{field}"),
            reason: format!("expected a positive value, got {value}"),
        })
}

fn non_negative(settings: &ScriptRuntime, field: &str) -> Result<u32, ConfigError> {
    let value = settings.int_field("video", field)?;
    u32::try_from(value).map_err(|_| ConfigError::InvalidValue {
        field: format!("video.{field}"),
        reason: format!("expected a non-negative value, got {value}"),
    })
}
