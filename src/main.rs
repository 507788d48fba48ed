//! Harbor Pilot entry point
//!
//! Browser builds run the requestAnimationFrame loop. Native builds run a
//! headless session steered by the autopilot.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;

    use glam::Vec2;
    use wasm_bindgen::closure::WasmClosure;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, EventTarget, HtmlCanvasElement, KeyboardEvent, MouseEvent, TouchEvent};

    use harbor_pilot::consts::*;
    use harbor_pilot::platform::{FixedStep, InputEvent, InputQueue, Viewport};
    use harbor_pilot::renderer::SdfRenderState;
    use harbor_pilot::sim::{GamePhase, GameState, TickInput, tick};
    use harbor_pilot::{Settings, StartupError};

    /// Game instance holding all state
    struct Game {
        state: GameState,
        settings: Settings,
        render_state: Option<SdfRenderState>,
        queue: InputQueue,
        document: Document,
        /// Canvas CSS pixels to world units
        viewport: Viewport,
        step: FixedStep,
        last_time: f64,
        // FPS tracking
        frame_times: [f64; 60],
        frame_index: usize,
        fps: u32,
        // Last values pushed to the DOM
        shown_score: Option<u64>,
        shown_phase: Option<GamePhase>,
    }

    impl Game {
        fn new(seed: u64, settings: Settings, document: Document, viewport: Viewport) -> Self {
            Self {
                state: GameState::new(seed),
                settings,
                render_state: None,
                queue: InputQueue::new(),
                document,
                viewport,
                step: FixedStep::new(),
                last_time: 0.0,
                frame_times: [0.0; 60],
                frame_index: 0,
                fps: 0,
                shown_score: None,
                shown_phase: None,
            }
        }

        /// Queue a pointer event given in canvas CSS pixels
        fn pointer(&mut self, make: fn(Vec2) -> InputEvent, canvas_pos: Vec2) {
            let world = self.viewport.screen_to_world(canvas_pos);
            self.queue.push(make(world));
        }

        /// Run simulation ticks
        fn update(&mut self, dt: f32, time: f64) {
            for _ in 0..self.step.advance(dt) {
                let mut input = TickInput::default();
                self.queue.drain_into(&mut input);
                tick(&mut self.state, &input, SIM_DT);
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
        fn render(&mut self, time: f64) {
            if let Some(ref mut render_state) = self.render_state {
                match render_state.render(&self.state, &self.settings, time) {
                    Ok(_) => {}
                    Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                        render_state.resize(render_state.size.0, render_state.size.1);
                    }
                    Err(wgpu::SurfaceError::OutOfMemory) => {
                        log::error!("Out of memory!");
                    }
                    Err(e) => log::warn!("Render error: {:?}", e),
                }
            }
        }

        /// Update HUD elements in DOM
        fn update_hud(&mut self) {
            if self.shown_score != Some(self.state.score) {
                if let Some(el) = self.document.query_selector("#hud-score .hud-value").ok().flatten() {
                    el.set_text_content(Some(&self.state.score.to_string()));
                }
                self.shown_score = Some(self.state.score);
            }

            if self.settings.show_fps {
                if let Some(el) = self.document.query_selector("#hud-fps .hud-value").ok().flatten() {
                    el.set_text_content(Some(&self.fps.to_string()));
                }
            }

            if self.shown_phase != Some(self.state.phase) {
                let over = self.state.phase == GamePhase::GameOver;
                set_hidden(&self.document, "game-over", !over);
                if over {
                    if let Some(el) = self.document.get_element_by_id("final-score") {
                        el.set_text_content(Some(&self.state.score.to_string()));
                    }
                }
                self.shown_phase = Some(self.state.phase);
            }
        }

        /// Match the canvas backing store and viewport to its on-screen size
        fn fit_canvas(&mut self, canvas: &HtmlCanvasElement, dpr: f64) {
            let client_w = canvas.client_width().max(1);
            let client_h = canvas.client_height().max(1);
            let width = (client_w as f64 * dpr) as u32;
            let height = (client_h as f64 * dpr) as u32;
            canvas.set_width(width);
            canvas.set_height(height);
            self.viewport = Viewport::new(client_w as f32, client_h as f32);
            if let Some(ref mut render_state) = self.render_state {
                render_state.resize(width, height);
            }
        }
    }

    fn set_hidden(document: &Document, id: &str, hidden: bool) {
        if let Some(el) = document.get_element_by_id(id) {
            let _ = el.class_list().toggle_with_force("hidden", hidden);
        }
    }

    /// Attach `closure` as a listener and leak it for the page lifetime
    fn attach<T: WasmClosure + ?Sized>(target: &EventTarget, kind: &str, closure: Closure<T>) {
        if let Err(e) = target.add_event_listener_with_callback(kind, closure.as_ref().unchecked_ref())
        {
            log::warn!("Failed to listen for {}: {:?}", kind, e);
        }
        closure.forget();
    }

    /// Position of a client-space point relative to the canvas, in CSS pixels
    fn canvas_point(canvas: &HtmlCanvasElement, client_x: i32, client_y: i32) -> Vec2 {
        let rect = canvas.get_bounding_client_rect();
        Vec2::new(
            client_x as f32 - rect.left() as f32,
            client_y as f32 - rect.top() as f32,
        )
    }

    pub async fn run() -> Result<(), StartupError> {
        log::info!("Harbor Pilot starting...");

        let window = web_sys::window().ok_or(StartupError::NoWindow)?;
        let document = window.document().ok_or(StartupError::NoDocument)?;

        set_hidden(&document, "loading", true);

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .ok_or(StartupError::MissingElement("canvas"))?
            .dyn_into()
            .map_err(|_| StartupError::NotACanvas("canvas"))?;

        let settings = Settings::load();
        set_hidden(&document, "hud-fps", !settings.show_fps);

        let seed = js_sys::Date::now() as u64;
        let dpr = window.device_pixel_ratio();
        let game = Rc::new(RefCell::new(Game::new(
            seed,
            settings,
            document.clone(),
            Viewport::new(1.0, 1.0),
        )));
        game.borrow_mut().fit_canvas(&canvas, dpr);

        log::info!("Game initialized with seed: {}", seed);

        // Initialize WebGPU
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU,
            ..Default::default()
        });

        let surface = instance
            .create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone()))
            .map_err(|e| StartupError::Surface(e.to_string()))?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .map_err(|e| StartupError::Adapter(e.to_string()))?;

        log::info!("Using adapter: {:?}", adapter.get_info().name);

        let mut render_state =
            SdfRenderState::new(surface, &adapter, canvas.width(), canvas.height()).await?;
        render_state.set_start_time(js_sys::Date::now());
        game.borrow_mut().render_state = Some(render_state);

        setup_input_handlers(&canvas, game.clone());
        setup_restart_button(&document, game.clone());

        set_hidden(&document, "hud", false);

        request_animation_frame(game);

        log::info!("Harbor Pilot running!");
        Ok(())
    }

    fn setup_input_handlers(canvas: &HtmlCanvasElement, game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };

        // Mouse press starts a gesture on the canvas
        {
            let game = game.clone();
            let canvas_clone = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                let p = canvas_point(&canvas_clone, event.client_x(), event.client_y());
                game.borrow_mut().pointer(InputEvent::Press, p);
            });
            attach(canvas, "mousedown", closure);
        }

        // Move and release are tracked on the window so drags may leave the canvas
        {
            let game = game.clone();
            let canvas_clone = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                let p = canvas_point(&canvas_clone, event.client_x(), event.client_y());
                game.borrow_mut().pointer(InputEvent::Move, p);
            });
            attach(&window, "mousemove", closure);
        }
        {
            let game = game.clone();
            let canvas_clone = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                let p = canvas_point(&canvas_clone, event.client_x(), event.client_y());
                game.borrow_mut().pointer(InputEvent::Release, p);
            });
            attach(&window, "mouseup", closure);
        }

        // Touch: first finger only
        {
            let game = game.clone();
            let canvas_clone = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                if let Some(touch) = event.touches().get(0) {
                    let p = canvas_point(&canvas_clone, touch.client_x(), touch.client_y());
                    game.borrow_mut().pointer(InputEvent::Press, p);
                }
            });
            attach(canvas, "touchstart", closure);
        }
        {
            let game = game.clone();
            let canvas_clone = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                if let Some(touch) = event.touches().get(0) {
                    let p = canvas_point(&canvas_clone, touch.client_x(), touch.client_y());
                    game.borrow_mut().pointer(InputEvent::Move, p);
                }
            });
            attach(canvas, "touchmove", closure);
        }
        for kind in ["touchend", "touchcancel"] {
            let game = game.clone();
            let canvas_clone = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                if let Some(touch) = event.changed_touches().get(0) {
                    let p = canvas_point(&canvas_clone, touch.client_x(), touch.client_y());
                    game.borrow_mut().pointer(InputEvent::Release, p);
                }
            });
            attach(canvas, kind, closure);
        }

        // Keyboard
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                if matches!(event.key().as_str(), "r" | "R") {
                    game.borrow_mut().queue.push(InputEvent::Restart);
                }
            });
            attach(&window, "keydown", closure);
        }

        // Resize keeps the backing store and viewport in step with the layout
        {
            let canvas_clone = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                let dpr = web_sys::window().map_or(1.0, |w| w.device_pixel_ratio());
                game.borrow_mut().fit_canvas(&canvas_clone, dpr);
            });
            attach(&window, "resize", closure);
        }
    }

    fn setup_restart_button(document: &Document, game: Rc<RefCell<Game>>) {
        if let Some(btn) = document.get_element_by_id("restart-btn") {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                game.borrow_mut().queue.push(InputEvent::Restart);
            });
            attach(&btn, "click", closure);
        }
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |time: f64| {
            game_loop(game, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>, time: f64) {
        {
            let mut g = game.borrow_mut();

            let dt = if g.last_time > 0.0 {
                ((time - g.last_time) / 1000.0) as f32
            } else {
                SIM_DT
            };
            g.last_time = time;

            g.update(dt, time);
            g.render(time);
            g.update_hud();
        }

        request_animation_frame(game);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    console_error_panic_hook::set_once();
    if console_log::init_with_level(log::Level::Info).is_err() {
        web_sys::console::warn_1(&"Logger already initialized".into());
    }

    if let Err(e) = wasm_game::run().await {
        log::error!("Startup failed: {}", e);
    }
}

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use clap::Parser;

    use harbor_pilot::consts::SIM_DT;
    use harbor_pilot::pilot::{Autopilot, run_headless};

    #[derive(Debug, Parser)]
    #[command(name = "harbor-pilot", version)]
    #[command(about = "Run a headless Harbor Pilot session")]
    struct Args {
        /// Seed for boat spawns
        #[arg(long, default_value_t = 1)]
        seed: u64,

        /// Simulated seconds to run
        #[arg(long, default_value_t = 120.0)]
        seconds: f32,

        /// Let boats drift instead of steering them home
        #[arg(long)]
        no_pilot: bool,

        /// Print the run summary as JSON
        #[arg(long)]
        json: bool,
    }

    pub fn run() {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
        let args = Args::parse();

        let max_ticks = (args.seconds.max(0.0) / SIM_DT).round() as u64;
        log::info!(
            "Harbor Pilot (native) running seed {} for {} ticks",
            args.seed,
            max_ticks
        );

        let pilot = (!args.no_pilot).then(Autopilot::new);
        let (state, summary) = run_headless(args.seed, max_ticks, pilot.as_ref());

        log::info!(
            "Finished after {} ticks: score {}, {} spawned, {} docked, {} lost",
            summary.ticks,
            summary.score,
            summary.spawned,
            summary.docked,
            summary.lost
        );
        if summary.game_over() {
            log::info!("Round ended in a collision: {:?}", summary.collision);
        }
        log::debug!("{} boats still in play", state.boats.len());

        if args.json {
            match serde_json::to_string_pretty(&summary) {
                Ok(json) => println!("{}", json),
                Err(e) => log::error!("Failed to encode summary: {}", e),
            }
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    native::run();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
