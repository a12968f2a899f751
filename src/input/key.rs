//! Logical game buttons and the physical key binding map

use std::fmt;

use rustc_hash::FxHashMap;

use crate::config::ConfigError;
use crate::scripting::ScriptRuntime;

/// A logical game button, stable across physical-device remapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    A,
    B,
    X,
    Y,
    L,
    R,
    Up,
    Down,
    Left,
    Right,
    Start,
    Select,
    /// Placeholder for a button with no binding; always reads as idle.
    Unknown,
}

impl Key {
    /// Every key that may appear in the `keyboard_bindings` settings table.
    pub const BINDABLE: [Key; 12] = [
        Key::A,
        Key::B,
        Key::X,
        Key::Y,
        Key::L,
        Key::R,
        Key::Up,
        Key::Down,
        Key::Left,
        Key::Right,
        Key::Start,
        Key::Select,
    ];

    /// Name of the key's entry in the `keyboard_bindings` table.
    pub fn binding_name(self) -> &'static str {
        match self {
            Key::A => "A",
            Key::B => "B",
            Key::X => "X",
            Key::Y => "Y",
            Key::L => "L",
            Key::R => "R",
            Key::Up => "UP",
            Key::Down => "DOWN",
            Key::Left => "LEFT",
            Key::Right => "RIGHT",
            Key::Start => "START",
            Key::Select => "SELECT",
            Key::Unknown => "UNKNOWN",
        }
    }

    // Shoulder buttons are the only optional bindings.
    fn binding_required(self) -> bool {
        !matches!(self, Key::L | Key::R | Key::Unknown)
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.binding_name())
    }
}

/// One-to-one map from physical key codes to logical keys.
///
/// Built once from the settings namespace and immutable for the rest of the
/// process lifetime; remapping means constructing a fresh value.
#[derive(Debug, Default)]
pub struct KeyBindings {
    map: FxHashMap<u32, Key>,
}

impl KeyBindings {
    /// Read the named bindings out of the `keyboard_bindings` table.
    ///
    /// Each value is an integer physical key code. A missing required
    /// binding, a non-integer value, an out-of-range code, or two keys
    /// sharing one code is fatal.
    pub fn from_settings(settings: &ScriptRuntime) -> Result<Self, ConfigError> {
        let mut bindings = Self::default();
        for key in Key::BINDABLE {
            let name = key.binding_name();
            let value = if key.binding_required() {
                settings.int_field("keyboard_bindings", name)?
            } else {
                match settings.opt_int_field("keyboard_bindings", name)? {
                    Some(value) => value,
                    None => continue,
                }
            };
            let code = u32::try_from(value).map_err(|_| ConfigError::InvalidValue {
                field: format!("keyboard_bindings.{name}"),
                reason: format!("key code {value} is out of range"),
            })?;
            bindings.bind(code, key)?;
        }
        log::debug!("loaded {} key bindings", bindings.len());
        Ok(bindings)
    }

    /// Bind a physical code to a logical key, rejecting duplicates.
    pub fn bind(&mut self, code: u32, key: Key) -> Result<(), ConfigError> {
        if let Some(&first) = self.map.get(&code) {
            return Err(ConfigError::DuplicateBinding {
                first,
                second: key,
                code,
            });
        }
        self.map.insert(code, key);
        Ok(())
    }

    /// Logical key bound to a physical code, if any.
    pub fn lookup(&self, code: u32) -> Option<Key> {
        self.map.get(&code).copied()
    }

    /// Iterate over the bound logical keys.
    pub fn keys(&self) -> impl Iterator<Item = Key> + '_ {
        self.map.values().copied()
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}
