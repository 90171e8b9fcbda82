//! Canvas Breakout entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{HtmlCanvasElement, MouseEvent};

    use canvas_breakout::Settings;
    use canvas_breakout::consts::{CLEAR_MESSAGE, CONTROLS_HEIGHT};
    use canvas_breakout::renderer::{RenderState, shapes};
    use canvas_breakout::sim::{GameState, Playfield, SeededJitter, TickInput, tick};

    /// Game instance holding all state
    struct Game {
        state: GameState,
        jitter: SeededJitter,
        settings: Settings,
        render_state: Option<RenderState>,
        input: TickInput,
        canvas: HtmlCanvasElement,
        // FPS tracking
        frame_times: [f64; 60],
        frame_index: usize,
        fps: u32,
    }

    impl Game {
        fn new(canvas: HtmlCanvasElement, playfield: Playfield, settings: Settings) -> Self {
            let jitter = SeededJitter::new(settings.seed_or(js_sys::Date::now() as u64));
            log::info!("Jitter seed: {}", jitter.seed());
            Self {
                state: GameState::new(playfield),
                jitter,
                settings,
                render_state: None,
                input: TickInput::default(),
                canvas,
                frame_times: [0.0; 60],
                frame_index: 0,
                fps: 0,
            }
        }

        /// Replace the whole state with a fresh game on the current playfield
        fn restart(&mut self) {
            self.state = GameState::new(self.state.playfield);
        }

        /// Resize canvas and surface to the window, then restart
        fn resize(&mut self) {
            let (playfield, width, height) = size_canvas(&self.canvas);
            if let Some(ref mut render_state) = self.render_state {
                render_state.resize(width, height, playfield);
            }
            self.state = GameState::new(playfield);
            log::info!("Resized to {}x{}", playfield.width, playfield.height);
        }

        /// Advance one tick unless the game has stopped
        fn update(&mut self, time: f64) {
            if !self.state.is_stopped() {
                self.state = tick(&self.state, &self.input, &mut self.jitter);
            }

            // Track frame times for FPS
            self.frame_times[self.frame_index] = time;
            self.frame_index = (self.frame_index + 1) % 60;

            let oldest_time = self.frame_times[self.frame_index];
            if oldest_time > 0.0 {
                let elapsed = time - oldest_time;
                if elapsed > 0.0 {
                    self.fps = (60000.0 / elapsed).round() as u32;
                }
            }
        }

        /// Render the current frame
        fn render(&mut self) {
            if let Some(ref mut render_state) = self.render_state {
                let vertices = shapes::scene(&self.state);
                match render_state.render(&vertices) {
                    Ok(_) => {}
                    Err(wgpu::SurfaceError::Lost) => {
                        let (w, h) = render_state.size;
                        let playfield = render_state.playfield;
                        render_state.resize(w, h, playfield);
                    }
                    Err(wgpu::SurfaceError::OutOfMemory) => {
                        log::error!("Out of memory!");
                    }
                    Err(e) => log::warn!("Render error: {:?}", e),
                }
            }
        }

        /// Update HUD elements in DOM
        fn update_hud(&self) {
            let Some(document) = web_sys::window().and_then(|w| w.document()) else {
                return;
            };

            if let Some(el) = document.get_element_by_id("clear-message") {
                let class = if self.state.is_cleared() { "" } else { "hidden" };
                let _ = el.set_attribute("class", class);
            }

            if let Some(el) = document.get_element_by_id("hud-fps") {
                if self.settings.show_fps {
                    let _ = el.set_attribute("class", "hud-item");
                    el.set_text_content(Some(&format!("{} fps", self.fps)));
                } else {
                    let _ = el.set_attribute("class", "hud-item hidden");
                }
            }
        }
    }

    /// Size the canvas backing store to the window minus the controls strip
    /// (the CSS box is sized by index.html). Returns the playfield in CSS
    /// pixels and the surface size in device pixels.
    fn size_canvas(canvas: &HtmlCanvasElement) -> (Playfield, u32, u32) {
        let window = web_sys::window().expect("no window");
        let css_w = window
            .inner_width()
            .ok()
            .and_then(|v| v.as_f64())
            .unwrap_or(0.0);
        let css_h = window
            .inner_height()
            .ok()
            .and_then(|v| v.as_f64())
            .unwrap_or(0.0);

        let playfield = Playfield::new(
            css_w as u32,
            (css_h as u32).saturating_sub(CONTROLS_HEIGHT),
        );

        let dpr = window.device_pixel_ratio();
        let width = (playfield.width as f64 * dpr) as u32;
        let height = (playfield.height as f64 * dpr) as u32;
        canvas.set_width(width);
        canvas.set_height(height);

        (playfield, width, height)
    }

    pub async fn run() {
        console_error_panic_hook::set_once();
        let settings = Settings::load();
        console_log::init_with_level(settings.log_level()).expect("Failed to init logger");
        // Write back so the key exists for hand-editing seed/debug_logging
        settings.save();

        log::info!("Canvas Breakout starting...");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .expect("no canvas")
            .dyn_into()
            .expect("not a canvas");

        let (playfield, width, height) = size_canvas(&canvas);

        if let Some(el) = document.get_element_by_id("clear-message") {
            el.set_text_content(Some(CLEAR_MESSAGE));
        }

        let game = Rc::new(RefCell::new(Game::new(canvas.clone(), playfield, settings)));

        // Initialize WebGPU
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU | wgpu::Backends::GL,
            ..Default::default()
        });

        let surface = instance
            .create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone()))
            .expect("Failed to create surface");

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::LowPower,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .expect("Failed to get adapter");

        log::info!("Using adapter: {:?}", adapter.get_info().name);

        let render_state = RenderState::new(surface, &adapter, width, height, playfield).await;
        game.borrow_mut().render_state = Some(render_state);

        setup_input_handlers(&canvas, game.clone());
        setup_restart_button(game.clone());
        setup_resize(game.clone());

        request_animation_frame(game);

        log::info!("Canvas Breakout running!");
    }

    fn setup_input_handlers(canvas: &HtmlCanvasElement, game: Rc<RefCell<Game>>) {
        let window = web_sys::window().unwrap();

        // Mouse move anywhere in the window; x relative to the canvas left edge
        let canvas = canvas.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
            let left = canvas.get_bounding_client_rect().left();
            let x = event.client_x() as f64 - left;
            game.borrow_mut().input.pointer_x = Some(x as f32);
        });
        let _ = window.add_event_listener_with_callback("mousemove", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().unwrap();
        let closure = Closure::once(move |time: f64| {
            game_loop(game, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>, time: f64) {
        {
            let mut g = game.borrow_mut();
            g.update(time);
            g.render();
            g.update_hud();
        }

        request_animation_frame(game);
    }

    fn setup_restart_button(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().unwrap();
        let document = window.document().unwrap();

        if let Some(btn) = document.get_element_by_id("restart-btn") {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                game.borrow_mut().restart();
                log::info!("Game restarted");
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_resize(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().unwrap();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            game.borrow_mut().resize();
        });
        let _ = window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
        closure.forget();
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    wasm_game::run().await;
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Canvas Breakout (native) starting...");
    log::info!("Native mode has no window - run with `trunk serve` for the web version");

    autoplay();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Headless session: the paddle follows the ball until the game stops
#[cfg(not(target_arch = "wasm32"))]
fn autoplay() {
    use canvas_breakout::Settings;
    use canvas_breakout::sim::{GameEvent, GameState, Playfield, SeededJitter, TickInput, tick};

    const MAX_TICKS: u64 = 100_000;

    let settings = Settings::load();
    let mut jitter = SeededJitter::new(
        settings.seed_or(
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .map(|d| d.as_millis() as u64)
                .unwrap_or(0),
        ),
    );
    let mut state = GameState::new(Playfield::new(800, 600));
    log::info!("Autoplay seed: {}", jitter.seed());

    let mut destroyed = 0usize;
    while !state.is_stopped() && state.ticks < MAX_TICKS {
        let input = TickInput::pointer(state.ball.pos.x);
        state = tick(&state, &input, &mut jitter);
        destroyed += state
            .events
            .iter()
            .filter(|e| matches!(e, GameEvent::BrickDestroyed { .. }))
            .count();
    }

    if state.is_cleared() {
        log::info!("Cleared all bricks in {} ticks", state.ticks);
    } else if state.is_stopped() {
        log::info!(
            "Ball lost after {} ticks: {} destroyed, {} remaining",
            state.ticks,
            destroyed,
            state.bricks.len()
        );
    } else {
        log::warn!(
            "Gave up after {} ticks: {} destroyed, {} remaining",
            state.ticks,
            destroyed,
            state.bricks.len()
        );
    }
}
