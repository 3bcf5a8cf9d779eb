//! Window and input via winit
//!
//! The event loop is pumped once per scheduler poll instead of owning the
//! main loop, so the frame scheduler stays in control of timing.

use std::sync::Arc;
use std::time::Duration;

use ember_core::{InputAction, InputState};
use ember_game::{InputBinding, InputHandler, InputSource};
use tracing::{error, info};
use winit::application::ApplicationHandler;
use winit::dpi::LogicalSize;
use winit::error::{EventLoopError, OsError};
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::platform::pump_events::{EventLoopExtPumpEvents, PumpStatus};
use winit::window::{Window, WindowAttributes, WindowId};

use crate::settings::WindowSettings;

/// How long startup waits for the platform to hand over a window
const WINDOW_WAIT: Duration = Duration::from_secs(2);

#[derive(Debug, thiserror::Error)]
pub enum PlatformError {
    #[error("failed to create event loop: {0}")]
    EventLoop(#[from] EventLoopError),

    #[error("failed to create window: {0}")]
    Window(#[from] OsError),

    #[error("the platform never created a window")]
    NoWindow,
}

/// Event handler state fed by the pumped event loop
struct PlatformApp {
    attributes: WindowAttributes,
    window: Option<Arc<Window>>,
    window_error: Option<OsError>,
    input: InputHandler,
    close_requested: bool,
}

impl ApplicationHandler for PlatformApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }
        match event_loop.create_window(self.attributes.clone()) {
            Ok(window) => {
                let size = window.inner_size();
                info!("Window created: {}x{}", size.width, size.height);
                self.window = Some(Arc::new(window));
            }
            Err(e) => {
                error!("Failed to create window: {e}");
                self.window_error = Some(e);
            }
        }
    }

    fn window_event(&mut self, _event_loop: &ActiveEventLoop, _window_id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => {
                info!("Window close requested");
                self.close_requested = true;
            }
            WindowEvent::KeyboardInput { event, .. } => {
                if !event.repeat {
                    self.input.handle_keyboard(event.physical_key, event.state);
                }
            }
            WindowEvent::MouseInput { state, button, .. } => {
                self.input.handle_mouse_button(button, state);
            }
            WindowEvent::CursorMoved { position, .. } => {
                self.input.handle_cursor_moved(position.x, position.y);
            }
            WindowEvent::Focused(false) => {
                self.input.release_all();
            }
            _ => {}
        }
    }
}

/// The application window plus its input state
pub struct Platform {
    app: PlatformApp,
    window: Arc<Window>,
    event_loop: EventLoop<()>,
}

impl Platform {
    /// Open the window described by `settings`.
    pub fn new(settings: &WindowSettings) -> Result<Self, PlatformError> {
        let mut event_loop = EventLoop::new()?;
        event_loop.set_control_flow(ControlFlow::Poll);

        let mut app = PlatformApp {
            attributes: Window::default_attributes()
                .with_title(settings.title.clone())
                .with_inner_size(LogicalSize::new(settings.width, settings.height)),
            window: None,
            window_error: None,
            input: InputHandler::new(),
            close_requested: false,
        };

        // The window is created from `resumed`, which arrives on the first pumps
        let deadline = std::time::Instant::now() + WINDOW_WAIT;
        while app.window.is_none() && app.window_error.is_none() && std::time::Instant::now() < deadline {
            if let PumpStatus::Exit(_) = event_loop.pump_app_events(Some(Duration::from_millis(10)), &mut app) {
                break;
            }
        }

        if let Some(e) = app.window_error.take() {
            return Err(e.into());
        }
        let window = app.window.clone().ok_or(PlatformError::NoWindow)?;

        Ok(Self {
            app,
            window,
            event_loop,
        })
    }

    pub fn window(&self) -> &Arc<Window> {
        &self.window
    }

    pub fn event_loop(&self) -> &EventLoop<()> {
        &self.event_loop
    }
}

impl InputSource for Platform {
    fn poll(&mut self) {
        self.app.input.end_frame();
        if let PumpStatus::Exit(code) = self.event_loop.pump_app_events(Some(Duration::ZERO), &mut self.app) {
            info!(code, "event loop exited");
            self.app.close_requested = true;
        }
    }

    fn state(&self) -> &InputState {
        &self.app.input.state
    }

    fn is_down(&self, binding: InputBinding) -> bool {
        self.app.input.is_down(binding)
    }

    fn quit_requested(&self) -> bool {
        self.app.close_requested || self.app.input.state.is_held(InputAction::Quit)
    }
}
