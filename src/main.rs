use std::sync::Arc;
use rand::SeedableRng;
use rand::rngs::SmallRng;
use winit::{
    application::ApplicationHandler,
    event::{ElementState, KeyEvent, WindowEvent},
    event_loop::{ActiveEventLoop, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::{Window, WindowId},
};

#[cfg(target_arch = "wasm32")]
use std::cell::RefCell;
#[cfg(target_arch = "wasm32")]
use std::rc::Rc;

mod animation;
mod assets;
mod camera;
mod chase;
mod config;
mod game;
mod hud;
mod input;
mod level;
mod physics;
mod player;
mod render;
mod round;

use config::MAX_FRAME_DELTA;
use game::SimulationState;
use hud::HostCommand;
use input::InputState;
use level::LevelLayout;
use render::Renderer;

#[cfg(not(target_arch = "wasm32"))]
type PlatformFrontend = hud::WindowFrontend;
#[cfg(target_arch = "wasm32")]
type PlatformFrontend = hud::DomFrontend;

/// Real time between redraws, capped so a stalled tab does not dump seconds
/// of motion into one tick.
struct FrameClock {
    last: instant::Instant,
}

impl FrameClock {
    fn new() -> Self {
        Self {
            last: instant::Instant::now(),
        }
    }

    fn tick(&mut self) -> f32 {
        let now = instant::Instant::now();
        let dt = (now - self.last).as_secs_f32().min(MAX_FRAME_DELTA);
        self.last = now;
        dt
    }
}

struct ClientState {
    renderer: Renderer,
    sim: SimulationState,
    input: InputState,
    frontend: PlatformFrontend,
    clock: FrameClock,
    #[cfg(target_arch = "wasm32")]
    commands: Rc<RefCell<Vec<HostCommand>>>,
}

impl ClientState {
    async fn new(window: Arc<Window>, frontend: PlatformFrontend) -> Self {
        let level = LevelLayout::course();
        let renderer = Renderer::new(window, &level).await;

        let (sender, inbox) = assets::channel();
        let sim = SimulationState::new(&level, inbox, SmallRng::from_entropy());
        assets::spawn_builtin_loader(sender);
        log::info!("Course ready: {} colliders", level.colliders.len());

        Self {
            renderer,
            sim,
            input: InputState::default(),
            frontend,
            clock: FrameClock::new(),
            #[cfg(target_arch = "wasm32")]
            commands: Rc::new(RefCell::new(Vec::new())),
        }
    }

    fn apply(&mut self, command: HostCommand) {
        log::debug!("Command {:?}", command);
        match command {
            HostCommand::Start => self.sim.start(),
            HostCommand::Reset => self.sim.reset(),
        }
    }

    fn handle_key(&mut self, key: KeyCode, pressed: bool) {
        if pressed {
            match key {
                KeyCode::Enter => self.apply(HostCommand::Start),
                KeyCode::KeyR => self.apply(HostCommand::Reset),
                _ => self.input.handle_key_press(key),
            }
        } else {
            self.input.handle_key_release(key);
        }
    }

    /// Returns false when the GPU is out of memory and the loop should stop.
    fn frame(&mut self) -> bool {
        #[cfg(target_arch = "wasm32")]
        {
            let pending: Vec<HostCommand> = self.commands.borrow_mut().drain(..).collect();
            for command in pending {
                self.apply(command);
            }
        }

        let dt = self.clock.tick();
        self.sim.tick(self.input, dt);
        for event in self.sim.take_events() {
            log::info!("{:?}", event);
            hud::present(&mut self.frontend, event);
        }

        match self.renderer.render(&self.sim) {
            Ok(_) => {}
            Err(wgpu::SurfaceError::Lost) => self.renderer.resize(self.renderer.size()),
            Err(wgpu::SurfaceError::OutOfMemory) => return false,
            Err(e) => log::error!("Render error: {:?}", e),
        }
        self.renderer.window.request_redraw();
        true
    }
}

#[cfg(target_arch = "wasm32")]
thread_local! {
    static CLIENT_STATE: RefCell<Option<ClientState>> = const { RefCell::new(None) };
}

struct App {
    #[cfg(not(target_arch = "wasm32"))]
    state: Option<ClientState>,
}

impl App {
    fn new() -> Self {
        Self {
            #[cfg(not(target_arch = "wasm32"))]
            state: None,
        }
    }

    fn with_state(&mut self, f: impl FnOnce(&mut ClientState)) {
        #[cfg(target_arch = "wasm32")]
        CLIENT_STATE.with(|s| {
            if let Some(state) = s.borrow_mut().as_mut() {
                f(state);
            }
        });

        #[cfg(not(target_arch = "wasm32"))]
        if let Some(state) = &mut self.state {
            f(state);
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        #[cfg(not(target_arch = "wasm32"))]
        if self.state.is_some() {
            return;
        }

        let window_attrs = Window::default_attributes()
            .with_title("Ducky Chase");

        let window = Arc::new(event_loop.create_window(window_attrs).unwrap());

        #[cfg(target_arch = "wasm32")]
        {
            use winit::platform::web::WindowExtWebSys;

            let canvas = window.canvas().expect("Couldn't get canvas");

            let web_window = web_sys::window().expect("No window");
            let dpr = web_window.device_pixel_ratio();
            let width = (web_window.inner_width().unwrap().as_f64().unwrap() * dpr) as u32;
            let height = (web_window.inner_height().unwrap().as_f64().unwrap() * dpr) as u32;

            canvas.set_width(width);
            canvas.set_height(height);
            canvas.style().set_css_text("width: 100%; height: 100%; display: block;");

            web_sys::window()
                .and_then(|win| win.document())
                .and_then(|doc| {
                    let dst = doc.get_element_by_id("wasm-container")?;
                    dst.append_child(&canvas).ok()?;
                    Some(())
                })
                .expect("Couldn't append canvas to document body.");

            let window_clone = window.clone();
            wasm_bindgen_futures::spawn_local(async move {
                let mut state = ClientState::new(window_clone.clone(), hud::DomFrontend).await;
                state.renderer.resize(winit::dpi::PhysicalSize::new(width, height));
                hud::bind_buttons(state.commands.clone());
                CLIENT_STATE.with(|s| {
                    *s.borrow_mut() = Some(state);
                });
                window_clone.request_redraw();
            });
        }

        #[cfg(not(target_arch = "wasm32"))]
        {
            let frontend = hud::WindowFrontend::new(window.clone());
            self.state = Some(pollster::block_on(ClientState::new(window.clone(), frontend)));
            window.request_redraw();
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::Resized(physical_size) => {
                self.with_state(|state| state.renderer.resize(physical_size));
            }
            WindowEvent::Focused(false) => {
                self.with_state(|state| state.input.clear());
            }
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(key),
                        state: key_state,
                        repeat,
                        ..
                    },
                ..
            } => {
                if key == KeyCode::Escape && key_state == ElementState::Pressed {
                    #[cfg(not(target_arch = "wasm32"))]
                    event_loop.exit();
                    return;
                }
                let pressed = key_state == ElementState::Pressed;
                if pressed && repeat {
                    return;
                }
                self.with_state(|state| state.handle_key(key, pressed));
            }
            WindowEvent::RedrawRequested => {
                let mut keep_running = true;
                self.with_state(|state| keep_running = state.frame());
                if !keep_running {
                    log::error!("GPU out of memory");
                    event_loop.exit();
                }
            }
            _ => {}
        }
    }
}

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg_attr(target_arch = "wasm32", wasm_bindgen(start))]
pub fn run() {
    #[cfg(target_arch = "wasm32")]
    {
        std::panic::set_hook(Box::new(console_error_panic_hook::hook));
        console_log::init_with_level(log::Level::Info).expect("Couldn't initialize logger");
    }

    #[cfg(not(target_arch = "wasm32"))]
    {
        env_logger::init();
    }

    let event_loop = EventLoop::new().unwrap();
    let mut app = App::new();

    #[allow(clippy::let_underscore_future)]
    let _ = event_loop.run_app(&mut app);
}

fn main() {
    run();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frame_clock_caps_long_pauses() {
        let mut clock = FrameClock::new();
        clock.last = instant::Instant::now() - std::time::Duration::from_secs(3);
        assert_eq!(clock.tick(), MAX_FRAME_DELTA);
        assert!(clock.tick() < MAX_FRAME_DELTA);
    }
}
