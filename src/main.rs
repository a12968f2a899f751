//! Scaffold entry point
//!
//! Evaluates the settings script, builds the window configuration and key
//! bindings from it, and runs the main loop with a probe game that logs
//! button edges.

use std::path::Path;
use std::time::Duration;

use burrow::config;
use burrow::core::{Context, Engine, Game};
use burrow::input::{Key, KeyBindings};

// Holding START this long quits the scaffold.
const QUIT_HOLD: Duration = Duration::from_secs(2);

/// Placeholder gameplay: logs every button edge and hold times.
struct ProbeGame;

impl Game for ProbeGame {
    fn init(&mut self, ctx: &mut Context) {
        log::info!("{} buttons bound", ctx.input.bindings().len());
        match ctx.scripts.global_string("greeting") {
            Ok(Some(greeting)) => log::info!("{greeting}"),
            Ok(None) => {}
            Err(e) => log::warn!("greeting lookup failed: {e}"),
        }
    }

    fn update(&mut self, ctx: &mut Context) {
        for key in Key::BINDABLE {
            if ctx.input.was_key_pressed(key) {
                log::debug!("{key} pressed");
            }
            if ctx.input.was_key_released(key) {
                log::debug!("{key} released");
            }
        }

        if ctx.input.is_key_down(Key::Start) && ctx.input.hold_duration(Key::Start) >= QUIT_HOLD {
            log::info!("START held, quitting");
            ctx.quit();
        }
    }
}

fn main() {
    env_logger::init();

    if let Err(e) = run() {
        eprintln!("startup error: {e}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let path = std::env::args().nth(1).unwrap_or_else(|| "settings.lua".into());

    let (runtime, window_config) = config::bootstrap(Path::new(&path))?;
    let bindings = KeyBindings::from_settings(&runtime)?;

    Engine::new(window_config, runtime, bindings, ProbeGame).run()
}
