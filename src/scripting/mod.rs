//! Embedded scripting runtime
//!
//! Settings and gameplay configuration live in Lua. The runtime is created
//! once at startup, evaluates the settings script, and stays alive for the
//! process lifetime so its global namespace remains available to game logic.

use std::path::Path;

use mlua::{Lua, Value};

use crate::config::ConfigError;

/// The embedded Lua state.
///
/// Field getters resolve `table.field` paths against the global namespace and
/// convert values strictly: a `nil` required field or a type mismatch is a
/// [`ConfigError`] naming the offending field, never a silent default.
#[derive(Debug)]
pub struct ScriptRuntime {
    lua: Lua,
}

impl ScriptRuntime {
    /// Create a runtime with the Lua standard library loaded.
    pub fn new() -> Self {
        Self { lua: Lua::new() }
    }

    /// Evaluate a script file for its side effects on the global namespace.
    pub fn run_file(&self, path: &Path) -> Result<(), ConfigError> {
        let chunk = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        self.lua
            .load(&chunk)
            .set_name(path.to_string_lossy())
            .exec()?;
        Ok(())
    }

    /// Evaluate an in-memory chunk for its side effects on the global namespace.
    pub fn run_str(&self, chunk: &str) -> Result<(), ConfigError> {
        self.lua.load(chunk).exec()?;
        Ok(())
    }

    /// Required integer field, e.g. `int_field("video", "fps_limit")`.
    pub fn int_field(&self, table: &str, field: &str) -> Result<i64, ConfigError> {
        self.opt_int_field(table, field)?
            .ok_or_else(|| ConfigError::MissingField {
                field: dotted(table, field),
            })
    }

    /// Optional integer field; `None` when the field is absent.
    pub fn opt_int_field(&self, table: &str, field: &str) -> Result<Option<i64>, ConfigError> {
        match self.field_value(table, field)? {
            None => Ok(None),
            Some(Value::Integer(i)) => Ok(Some(i)),
            // Lua number literals may come back as floats; accept whole ones.
            Some(Value::Number(n)) if n.fract() == 0.0 => Ok(Some(n as i64)),
            Some(other) => Err(wrong_type(table, field, "integer", &other)),
        }
    }

    /// Required boolean field.
    pub fn bool_field(&self, table: &str, field: &str) -> Result<bool, ConfigError> {
        match self.field_value(table, field)? {
            None => Err(ConfigError::MissingField {
                field: dotted(table, field),
            }),
            Some(Value::Boolean(b)) => Ok(b),
            Some(other) => Err(wrong_type(table, field, "boolean", &other)),
        }
    }

    /// Optional string field; `None` when the field is absent.
    pub fn opt_string_field(&self, table: &str, field: &str) -> Result<Option<String>, ConfigError> {
        match self.field_value(table, field)? {
            None => Ok(None),
            Some(Value::String(s)) => Ok(Some(s.to_str()?.to_string())),
            Some(other) => Err(wrong_type(table, field, "string", &other)),
        }
    }

    /// Optional top-level string global.
    pub fn global_string(&self, name: &str) -> Result<Option<String>, ConfigError> {
        match self.lua.globals().get::<Value>(name)? {
            Value::Nil => Ok(None),
            Value::String(s) => Ok(Some(s.to_str()?.to_string())),
            other => Err(ConfigError::WrongType {
                field: name.to_string(),
                expected: "string",
                found: other.type_name(),
            }),
        }
    }

    /// Direct access to the Lua state for gameplay logic.
    pub fn lua(&self) -> &Lua {
        &self.lua
    }

    fn field_value(&self, table: &str, field: &str) -> Result<Option<Value>, ConfigError> {
        let parent = match self.lua.globals().get::<Value>(table)? {
            Value::Table(t) => t,
            Value::Nil => {
                return Err(ConfigError::MissingField {
                    field: table.to_string(),
                });
            }
            other => {
                return Err(ConfigError::WrongType {
                    field: table.to_string(),
                    expected: "table",
                    found: other.type_name(),
                });
            }
        };
        match parent.get::<Value>(field)? {
            Value::Nil => Ok(None),
            value => Ok(Some(value)),
        }
    }
}

impl Default for ScriptRuntime {
    fn default() -> Self {
        Self::new()
    }
}

fn dotted(table: &str, field: &str) -> String {
    format!("{table}.{field}")
}

fn wrong_type(table: &str, field: &str, expected: &'static str, found: &Value) -> ConfigError {
    ConfigError::WrongType {
        field: dotted(table, field),
        expected,
        found: found.type_name(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn runtime(chunk: &str) -> ScriptRuntime {
        let rt = ScriptRuntime::new();
        rt.run_str(chunk).unwrap();
        rt
    }

    #[test]
    fn reads_typed_fields_from_a_table() {
        let rt = runtime("video = { fps_limit = 60, vsync_enabled = true, title = 'demo' }");
        assert_eq!(rt.int_field("video", "fps_limit").unwrap(), 60);
        assert!(rt.bool_field("video", "vsync_enabled").unwrap());
        assert_eq!(
            rt.opt_string_field("video", "title").unwrap(),
            Some(String::from("demo"))
        );
    }

    #[test]
    fn whole_float_counts_as_integer() {
        let rt = runtime("video = { fps_limit = 120.0 }");
        assert_eq!(rt.int_field("video", "fps_limit").unwrap(), 120);
    }

    #[test]
    fn fractional_number_is_a_type_error() {
        let rt = runtime("video = { fps_limit = 59.94 }");
        let err = rt.int_field("video", "fps_limit").unwrap_err();
        assert!(matches!(
            err,
            ConfigError::WrongType { field, expected: "integer", .. } if field == "video.fps_limit"
        ));
    }

    #[test]
    fn missing_field_names_its_dotted_path() {
        let rt = runtime("video = {}");
        let err = rt.int_field("video", "fps_limit").unwrap_err();
        assert!(matches!(
            err,
            ConfigError::MissingField { field } if field == "video.fps_limit"
        ));
    }

    #[test]
    fn missing_table_is_reported_by_name() {
        let rt = runtime("");
        let err = rt.int_field("video", "fps_limit").unwrap_err();
        assert!(matches!(err, ConfigError::MissingField { field } if field == "video"));
    }

    #[test]
    fn non_table_global_is_a_type_error() {
        let rt = runtime("video = 3");
        let err = rt.bool_field("video", "fullscreen").unwrap_err();
        assert!(matches!(
            err,
            ConfigError::WrongType { field, expected: "table", .. } if field == "video"
        ));
    }

    #[test]
    fn optional_fields_report_absence_as_none() {
        let rt = runtime("video = {}");
        assert_eq!(rt.opt_int_field("video", "extra").unwrap(), None);
        assert_eq!(rt.opt_string_field("video", "title").unwrap(), None);
    }

    #[test]
    fn reads_a_top_level_string_global() {
        let rt = runtime("greeting = 'hello from lua'");
        assert_eq!(
            rt.global_string("greeting").unwrap(),
            Some(String::from("hello from lua"))
        );
        assert_eq!(rt.global_string("absent").unwrap(), None);
    }

    #[test]
    fn exposes_the_raw_lua_state() {
        let rt = runtime("score = 10");
        let score: i64 = rt.lua().globals().get("score").unwrap();
        assert_eq!(score, 10);
    }

    #[test]
    fn evaluates_a_script_file_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.lua");
        std::fs::write(&path, "video = { fps_limit = 144 }").unwrap();

        let rt = ScriptRuntime::new();
        rt.run_file(&path).unwrap();
        assert_eq!(rt.int_field("video", "fps_limit").unwrap(), 144);
    }

    #[test]
    fn syntax_errors_surface_as_script_errors() {
        let rt = ScriptRuntime::new();
        let err = rt.run_str("video = {").unwrap_err();
        assert!(matches!(err, ConfigError::Script(_)));
    }
}
