//! Balloon Pop Party entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{HtmlCanvasElement, KeyboardEvent, MouseEvent};

    use balloon_party::{Settings, Variant};
    use balloon_party::audio::{AudioManager, SoundEffect};
    use balloon_party::consts::*;
    use balloon_party::input::key_action;
    use balloon_party::overlay::Overlay;
    use balloon_party::renderer::{RenderState, Viewport, build_vertices, emoji_sprites};
    use balloon_party::sim::{GameEvent, GamePhase, GameState, TickInput, tick};
    use balloon_party::speech::Speech;

    /// Game instance holding all state
    struct Game {
        state: GameState,
        settings: Settings,
        /// Variant for this session (may come from the URL, never saved)
        variant: Variant,
        render_state: Option<RenderState>,
        overlay: Overlay,
        audio: AudioManager,
        speech: Speech,
        accumulator: f32,
        last_time: f64,
        start_time: f64,
        input: TickInput,
        /// Canvas size in CSS pixels (for the emoji overlay)
        css_viewport: Viewport,
    }

    impl Game {
        /// Run simulation ticks
        fn update(&mut self, dt: f32) {
            let dt = dt.min(0.1);
            self.accumulator += dt;

            let mut substeps = 0;
            while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
                let input = self.input.clone();
                tick(&mut self.state, &input);
                self.accumulator -= SIM_DT;
                substeps += 1;

                // Clear one-shot inputs after processing
                self.input = TickInput::default();
            }

            for event in self.state.drain_events() {
                self.dispatch(&event);
            }
        }

        /// Sounds and speech for one simulation event
        fn dispatch(&mut self, event: &GameEvent) {
            for effect in SoundEffect::for_event(event) {
                self.audio.play(effect);
            }
            if *event == GameEvent::Paused {
                self.speech.cancel();
            }
            self.speech.announce(event);
        }

        /// Render the current frame
        fn render(&mut self, time: f64) {
            let secs = ((time - self.start_time) / 1000.0) as f32;
            if let Some(ref mut render_state) = self.render_state {
                let vertices = build_vertices(&self.state, secs);
                match render_state.render(&vertices) {
                    Ok(_) => {}
                    Err(wgpu::SurfaceError::Lost) => {
                        let Viewport { width, height } = render_state.viewport;
                        render_state.resize(width, height);
                    }
                    Err(wgpu::SurfaceError::OutOfMemory) => {
                        log::error!("Out of memory!");
                    }
                    Err(e) => log::warn!("Render error: {:?}", e),
                }
            }

            let sprites = emoji_sprites(&self.state);
            self.overlay.sync_sprites(&sprites, &self.css_viewport);
            self.overlay.update_hud(&self.state);
        }

        /// Reset game state for restart
        fn restart(&mut self, seed: u64) {
            self.state = GameState::new(seed, self.settings.tuning_for(self.variant));
            self.accumulator = 0.0;
            self.input = TickInput::default();
            log::info!("Game restarted with seed: {}", seed);
        }

        fn toggle_mute(&mut self) {
            let muted = self.settings.toggle_mute();
            self.audio.set_muted(muted);
            self.speech.set_enabled(self.settings.speech_enabled());
            self.overlay.set_mute_icon(muted);
            self.settings.save();
            log::info!("{}", if muted { "🔇 Muted" } else { "🔊 Unmuted" });
        }
    }

    /// Size the canvas backing store to its CSS box (device pixel ratio capped at 2)
    fn fit_canvas(window: &web_sys::Window, canvas: &HtmlCanvasElement) -> (Viewport, Viewport) {
        let dpr = window.device_pixel_ratio().min(2.0);
        let client_w = canvas.client_width().max(1) as u32;
        let client_h = canvas.client_height().max(1) as u32;
        let width = (client_w as f64 * dpr) as u32;
        let height = (client_h as f64 * dpr) as u32;
        canvas.set_width(width);
        canvas.set_height(height);
        (Viewport::new(width, height), Viewport::new(client_w, client_h))
    }

    pub async fn run() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).ok();

        let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
        let document = window
            .document()
            .ok_or_else(|| JsValue::from_str("no document"))?;

        let settings = Settings::load();
        let variant = window
            .location()
            .search()
            .map(|query| settings.session_variant(&query))
            .unwrap_or(settings.variant);
        let tuning = settings.tuning_for(variant);
        log::info!("{} starting...", tuning.variant.title());

        // Hide loading indicator
        if let Some(loading) = document.get_element_by_id("loading") {
            let _ = loading.set_attribute("class", "hidden");
        }

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .ok_or_else(|| JsValue::from_str("no canvas"))?
            .dyn_into()?;
        let (physical, css_viewport) = fit_canvas(&window, &canvas);

        let overlay = Overlay::new(&document)?;
        overlay.set_title(tuning.variant.title());
        overlay.set_mute_icon(settings.muted);

        let mut audio = AudioManager::new();
        audio.apply_settings(&settings);
        let speech = Speech::new(settings.speech_enabled());

        // Initialize game
        let seed = js_sys::Date::now() as u64;
        let game = Rc::new(RefCell::new(Game {
            state: GameState::new(seed, tuning),
            settings,
            variant,
            render_state: None,
            overlay,
            audio,
            speech,
            accumulator: 0.0,
            last_time: 0.0,
            start_time: js_sys::Date::now(),
            input: TickInput::default(),
            css_viewport,
        }));
        log::info!("Game initialized with seed: {}", seed);

        // WebGPU where available, WebGL2 otherwise
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU | wgpu::Backends::GL,
            ..Default::default()
        });

        let surface = instance
            .create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone()))
            .map_err(|e| JsValue::from_str(&format!("Failed to create surface: {}", e)))?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::LowPower,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .map_err(|e| JsValue::from_str(&format!("Failed to get adapter: {}", e)))?;

        log::info!("Using adapter: {:?}", adapter.get_info().name);

        let render_state = RenderState::new(surface, &adapter, physical.width, physical.height)
            .await
            .map_err(|e| JsValue::from_str(&format!("Failed to create device: {}", e)))?;
        game.borrow_mut().render_state = Some(render_state);

        setup_input_handlers(&canvas, game.clone());
        setup_mute_button(game.clone());
        setup_resize(&canvas, game.clone());
        setup_auto_pause(game.clone());

        if let Some(hud) = document.get_element_by_id("hud") {
            let _ = hud.set_attribute("class", "");
        }

        // Start game loop
        request_animation_frame(game);

        log::info!("Balloon Pop Party running!");
        Ok(())
    }

    fn setup_input_handlers(canvas: &HtmlCanvasElement, game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else { return };

        // Keyboard: arrows aim, (almost) any other key shoots
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let key = event.key();
                let chord = event.ctrl_key() || event.meta_key() || event.alt_key();
                let Some(action) = key_action(&key, event.repeat(), chord) else {
                    return;
                };
                if action.suppresses_default(&key) {
                    event.prevent_default();
                }

                let mut g = game.borrow_mut();
                // First gesture unlocks audio
                g.audio.resume();

                if g.state.can_restart() {
                    let seed = js_sys::Date::now() as u64;
                    g.restart(seed);
                    return;
                }
                action.apply(&mut g.input);
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Clicking/tapping the sky also shoots
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                let mut g = game.borrow_mut();
                g.audio.resume();
                if g.state.can_restart() {
                    let seed = js_sys::Date::now() as u64;
                    g.restart(seed);
                } else {
                    g.input.fire = true;
                }
            });
            let _ = canvas
                .add_event_listener_with_callback("mousedown", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_mute_button(game: Rc<RefCell<Game>>) {
        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            return;
        };

        if let Some(btn) = document.get_element_by_id("muteBtn") {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                event.stop_propagation();
                let mut g = game.borrow_mut();
                g.audio.resume();
                g.toggle_mute();
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_resize(canvas: &HtmlCanvasElement, game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else { return };
        let canvas = canvas.clone();
        let window_clone = window.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            let (physical, css) = fit_canvas(&window_clone, &canvas);
            let mut g = game.borrow_mut();
            g.css_viewport = css;
            if let Some(render_state) = g.render_state.as_mut() {
                render_state.resize(physical.width, physical.height);
            }
            log::debug!("Resized to {}x{}", physical.width, physical.height);
        });
        let _ = window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else { return };
        let closure = Closure::once(move |time: f64| {
            game_loop(game, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>, time: f64) {
        {
            let mut g = game.borrow_mut();

            // Calculate delta time
            let dt = if g.last_time > 0.0 {
                ((time - g.last_time) / 1000.0) as f32
            } else {
                SIM_DT
            };
            g.last_time = time;

            g.update(dt);
            g.render(time);
        }

        request_animation_frame(game);
    }

    /// Only a live round can be paused
    fn pausable(phase: GamePhase) -> bool {
        matches!(phase, GamePhase::Countdown { .. } | GamePhase::Playing)
    }

    fn setup_auto_pause(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else { return };
        let Some(document) = window.document() else { return };

        // Visibility change (tab switch, minimize)
        {
            let game = game.clone();
            let document_clone = document.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                if document_clone.visibility_state() == web_sys::VisibilityState::Hidden {
                    let mut g = game.borrow_mut();
                    if pausable(g.state.phase) {
                        g.input.pause = true;
                        log::info!("Auto-paused (tab hidden)");
                    }
                }
            });
            let _ = document.add_event_listener_with_callback(
                "visibilitychange",
                closure.as_ref().unchecked_ref(),
            );
            closure.forget();
        }

        // Window blur (click outside)
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
                let mut g = game.borrow_mut();
                if pausable(g.state.phase) {
                    g.input.pause = true;
                    log::info!("Auto-paused (window blur)");
                }
            });
            let _ = window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    if let Err(e) = wasm_game::run().await {
        log::error!("Startup failed: {:?}", e);
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();

    let variant = std::env::args()
        .nth(1)
        .and_then(|arg| balloon_party::Variant::parse(&arg))
        .unwrap_or_default();
    log::info!("{} (native) starting...", variant.title());
    log::info!("Native mode is a headless demo - build for wasm32 to play in the browser");

    headless_demo(variant);
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Play one round with a simple autopilot and log what happens
#[cfg(not(target_arch = "wasm32"))]
fn headless_demo(variant: balloon_party::Variant) {
    use balloon_party::Tuning;
    use balloon_party::consts::*;
    use balloon_party::sim::{GameEvent, GameState, TickInput, tick};

    let mut state = GameState::new(2024, Tuning::for_variant(variant));
    let max_ticks = 60 * 90;

    for _ in 0..max_ticks {
        let input = autopilot(&state);
        tick(&mut state, &input);

        for event in state.drain_events() {
            match event {
                GameEvent::BalloonSpawned | GameEvent::ArrowFired { .. } => {}
                GameEvent::BalloonPopped { streak, .. } => {
                    log::info!("🎈 Pop! (streak {})", streak)
                }
                other => log::info!("{:?}", other),
            }
        }

        if state.can_restart() {
            break;
        }
    }

    let stats = &state.stats;
    println!(
        "{}: {} pops, {} escaped, {} shots, {} misses, best streak {} ({:.1}s)",
        variant.title(),
        stats.pops,
        stats.escapes,
        stats.shots,
        stats.misses,
        stats.best_streak,
        state.time_ticks as f32 * SIM_DT
    );

    /// Aim where the nearest balloon will be when an arrow arrives
    fn autopilot(state: &GameState) -> TickInput {
        let mut input = TickInput::default();
        let Some(target) = state
            .balloons
            .iter()
            .min_by(|a, b| a.pos.x.total_cmp(&b.pos.x))
        else {
            return input;
        };

        let flight_ticks = (target.pos.x - ARCHER_X) / state.tuning.arrow_speed;
        let predicted_y = target.pos.y + state.tuning.rise_speed * flight_ticks;
        let dy = predicted_y - state.archer.y;

        if dy.abs() < 0.8 {
            input.fire = state.arrows.is_empty();
        } else {
            input.aim = if dy > 0.0 { 1 } else { -1 };
        }
        input
    }
}
