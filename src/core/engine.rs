//! Engine shell and main game loop
//!
//! Owns the window, translates winit events into the input layer's event
//! queue, and drives one tracker/game update per frame at the configured
//! frame rate.

use winit::application::ApplicationHandler;
use winit::dpi::PhysicalSize;
use winit::event::{ElementState, StartCause, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::platform::scancode::PhysicalKeyExtScancode;
use winit::window::{Fullscreen, Window, WindowId};

use crate::config::WindowConfig;
use crate::core::debug::FrameStats;
use crate::core::time::FrameClock;
use crate::input::{EventQueue, InputEvent, InputTracker, KeyBindings};
use crate::scripting::ScriptRuntime;

// How often the rolling frame stats go to the debug log.
const STATS_LOG_INTERVAL: u64 = 300;

/// Game trait that users implement
pub trait Game: 'static {
    /// Called once after the window exists.
    fn init(&mut self, ctx: &mut Context);

    /// Called every frame after the input tracker has been updated.
    fn update(&mut self, ctx: &mut Context);

    /// Called when the loop is shutting down.
    fn shutdown(&mut self, _ctx: &mut Context) {}
}

/// Context passed to game callbacks
pub struct Context {
    /// Logical button state for this frame
    pub input: InputTracker,
    /// The embedded scripting runtime and its global namespace
    pub scripts: ScriptRuntime,
    /// Frame timing
    pub clock: FrameClock,
    /// Rolling frame statistics
    pub stats: FrameStats,
    should_quit: bool,
}

impl Context {
    fn new(scripts: ScriptRuntime, input: InputTracker, clock: FrameClock) -> Self {
        Self {
            input,
            scripts,
            clock,
            stats: FrameStats::new(),
            should_quit: false,
        }
    }

    /// Request engine shutdown at the end of this frame.
    pub fn quit(&mut self) {
        self.should_quit = true;
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }
}

/// Main engine struct
pub struct Engine<G: Game> {
    config: WindowConfig,
    game: G,
    context: Context,
    events: EventQueue,
    window: Option<Window>,
    initialized: bool,
}

impl<G: Game> Engine<G> {
    /// Assemble the engine from the bootstrap products.
    pub fn new(config: WindowConfig, scripts: ScriptRuntime, bindings: KeyBindings, game: G) -> Self {
        let input = InputTracker::new(bindings, config.frame_duration);
        let clock = FrameClock::new(config.frame_duration);
        Self {
            context: Context::new(scripts, input, clock),
            config,
            game,
            events: EventQueue::new(),
            window: None,
            initialized: false,
        }
    }

    /// Run the main loop until the window closes or the game quits.
    pub fn run(mut self) -> Result<(), Box<dyn std::error::Error>> {
        log::info!("starting {}", self.config.title);

        let event_loop = EventLoop::new()?;
        event_loop.set_control_flow(ControlFlow::Poll);
        event_loop.run_app(&mut self)?;

        Ok(())
    }

    fn shutdown(&mut self, event_loop: &ActiveEventLoop) {
        self.game.shutdown(&mut self.context);
        log::info!("shutting down after {}", self.context.stats.summary());
        event_loop.exit();
    }
}

impl<G: Game> ApplicationHandler for Engine<G> {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let mut attrs = Window::default_attributes()
            .with_title(&self.config.title)
            .with_inner_size(PhysicalSize::new(self.config.width, self.config.height));
        if self.config.fullscreen {
            attrs = attrs.with_fullscreen(Some(Fullscreen::Borderless(None)));
        }

        let window = event_loop
            .create_window(attrs)
            .expect("Failed to create window");
        window.request_redraw();
        self.window = Some(window);

        if !self.initialized {
            self.game.init(&mut self.context);
            self.initialized = true;
            log::info!("scaffold initialized");
        }
    }

    fn new_events(&mut self, _event_loop: &ActiveEventLoop, cause: StartCause) {
        // The frame pacing deadline elapsed; schedule the next frame.
        if matches!(cause, StartCause::ResumeTimeReached { .. }) {
            if let Some(window) = &self.window {
                window.request_redraw();
            }
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => {
                self.events.push(InputEvent::Closed);
            }

            WindowEvent::KeyboardInput { event, .. } => {
                if event.repeat {
                    return;
                }
                if let Some(code) = event.physical_key.to_scancode() {
                    self.events.push(match event.state {
                        ElementState::Pressed => InputEvent::KeyPressed { code },
                        ElementState::Released => InputEvent::KeyReleased { code },
                    });
                }
            }

            WindowEvent::RedrawRequested => {
                let delta = self.context.clock.tick();
                self.context.stats.record(delta);

                self.context.input.update(&mut self.events);
                self.game.update(&mut self.context);

                if self.context.should_quit() || self.events.close_requested() {
                    self.shutdown(event_loop);
                    return;
                }

                if self.context.clock.frames() % STATS_LOG_INTERVAL == 0 {
                    log::debug!("{}", self.context.stats.summary());
                }

                if let Some(deadline) = self.context.clock.next_deadline() {
                    event_loop.set_control_flow(ControlFlow::WaitUntil(deadline));
                }
            }

            _ => {}
        }
    }
}
