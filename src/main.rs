//! Cautio entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, HtmlCanvasElement, HtmlElement, KeyboardEvent, MouseEvent};

    use cautio::consts::*;
    use cautio::platform::web::{DomHud, LocalStorageStore, PerformanceClock};
    use cautio::renderer::{RenderState, scene};
    use cautio::sim::{GameEvent, GamePhase, RunSummary, TickInput, seeded};
    use cautio::{QuestionBank, Session, Tuning};
    use rand_pcg::Pcg32;

    type WebSession = Session<Pcg32, PerformanceClock, DomHud, LocalStorageStore>;

    /// Game instance holding all state
    struct Game {
        session: WebSession,
        render_state: Option<RenderState>,
        input: TickInput,
        canvas: HtmlCanvasElement,
    }

    impl Game {
        /// One simulation tick per display frame
        fn update(&mut self) {
            let input = self.input.clone();
            let events = self.session.frame(&input);

            // Clear one-shot inputs after processing
            self.input = TickInput::default();

            for event in &events {
                if let GameEvent::Ended(summary) = event {
                    show_game_over(summary, self.session.state().tuning.distance_scale);
                }
            }
        }

        /// Render the current frame
        fn render(&mut self) {
            let vertices = scene::build(self.session.state());
            if let Some(ref mut render_state) = self.render_state {
                match render_state.render(&vertices) {
                    Ok(_) => {}
                    Err(wgpu::SurfaceError::Lost) => {
                        let (w, h) = render_state.size;
                        let logical = render_state.logical_size;
                        render_state.resize(w, h, logical);
                    }
                    Err(wgpu::SurfaceError::OutOfMemory) => {
                        log::error!("Out of memory!");
                    }
                    Err(e) => log::warn!("Render error: {:?}", e),
                }
            }
        }

        /// Fit the canvas to its container, capped at the maximum canvas size
        fn resize_canvas(&mut self) {
            let Some(window) = web_sys::window() else {
                return;
            };
            let container_width = self
                .canvas
                .parent_element()
                .map(|p| p.client_width() as f32)
                .unwrap_or(DEFAULT_CANVAS_WIDTH + 40.0);
            let inner_height = window
                .inner_height()
                .ok()
                .and_then(|h| h.as_f64())
                .unwrap_or(DEFAULT_CANVAS_HEIGHT as f64 + 120.0) as f32;

            let width = (container_width - 40.0).clamp(1.0, MAX_CANVAS_WIDTH).floor();
            let height = (inner_height - 120.0).clamp(1.0, MAX_CANVAS_HEIGHT).floor();

            let dpr = window.device_pixel_ratio();
            let physical_w = (width as f64 * dpr) as u32;
            let physical_h = (height as f64 * dpr) as u32;
            self.canvas.set_width(physical_w);
            self.canvas.set_height(physical_h);
            if let Some(el) = self.canvas.dyn_ref::<HtmlElement>() {
                let style = el.style();
                let _ = style.set_property("width", &format!("{}px", width));
                let _ = style.set_property("height", &format!("{}px", height));
            }

            self.session.resize(width, height);
            if let Some(ref mut render_state) = self.render_state {
                render_state.resize(physical_w, physical_h, (width, height));
            }
        }

        fn start(&mut self) {
            self.input = TickInput::default();
            self.session.start();
            if let Some(document) = document() {
                set_display(&document, "controlsHint", "none");
                set_display(&document, "gameOver", "none");
            }
        }
    }

    fn document() -> Option<Document> {
        web_sys::window().and_then(|w| w.document())
    }

    fn set_display(document: &Document, id: &str, display: &str) {
        if let Some(el) = document
            .get_element_by_id(id)
            .and_then(|el| el.dyn_into::<HtmlElement>().ok())
        {
            let _ = el.style().set_property("display", display);
        }
    }

    fn show_game_over(summary: &RunSummary, distance_scale: f32) {
        let Some(document) = document() else {
            return;
        };
        let km = (summary.distance / distance_scale).floor() as u64;
        for (id, text) in [
            ("finalScore", summary.score.to_string()),
            ("finalDistance", format!("{}km", km)),
            ("correctAnswers", summary.correct_answers.to_string()),
        ] {
            if let Some(el) = document.get_element_by_id(id) {
                el.set_text_content(Some(&text));
            }
        }
        set_display(&document, "gameOver", "flex");
    }

    /// Optional `<script id="tuning" type="application/json">` override
    fn load_tuning(document: &Document) -> Tuning {
        match document
            .get_element_by_id("tuning")
            .and_then(|el| el.text_content())
        {
            Some(json) if !json.trim().is_empty() => Tuning::from_json_or_default(&json),
            _ => Tuning::default(),
        }
    }

    pub async fn run() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info)
            .map_err(|e| JsValue::from_str(&e.to_string()))?;

        log::info!("Cautio starting...");

        let window = web_sys::window().ok_or("no window")?;
        let document = window.document().ok_or("no document")?;

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("gameCanvas")
            .ok_or("no canvas")?
            .dyn_into()
            .map_err(|_| "not a canvas")?;

        let seed = js_sys::Date::now() as u64;
        let bank = QuestionBank::load_or_empty();
        let session = Session::new(
            load_tuning(&document),
            bank.runner,
            seeded(seed),
            PerformanceClock::new(),
            DomHud::new(),
            LocalStorageStore::new(),
        );
        let game = Rc::new(RefCell::new(Game {
            session,
            render_state: None,
            input: TickInput::default(),
            canvas: canvas.clone(),
        }));
        game.borrow_mut().resize_canvas();

        log::info!("Game initialized with seed: {}", seed);

        // Initialize WebGPU
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU | wgpu::Backends::GL,
            ..Default::default()
        });

        let surface = instance
            .create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone()))
            .map_err(|e| JsValue::from_str(&e.to_string()))?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .map_err(|e| JsValue::from_str(&e.to_string()))?;

        log::info!("Using adapter: {:?}", adapter.get_info().name);

        let (width, height, logical) = {
            let g = game.borrow();
            let road = &g.session.state().road;
            (
                canvas.width(),
                canvas.height(),
                (road.canvas_width, road.canvas_height),
            )
        };
        let render_state = RenderState::new(surface, &adapter, width, height, logical)
            .await
            .map_err(|e| JsValue::from_str(&e.to_string()))?;
        game.borrow_mut().render_state = Some(render_state);

        setup_input_handlers(game.clone());
        setup_buttons(game.clone());

        request_animation_frame(game);

        log::info!("Cautio running!");
        Ok(())
    }

    fn setup_input_handlers(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };

        // Keyboard
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let mut g = game.borrow_mut();
                let playing = g.session.state().phase == GamePhase::Playing;
                match event.code().as_str() {
                    "Space" | "KeyW" | "ArrowUp" if playing => {
                        g.input.jump = true;
                        event.prevent_default();
                    }
                    "KeyA" | "ArrowLeft" if playing => {
                        g.input.left = true;
                        event.prevent_default();
                    }
                    "KeyD" | "ArrowRight" if playing => {
                        g.input.right = true;
                        event.prevent_default();
                    }
                    "Enter" if !playing => g.start(),
                    _ => {}
                }
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Resize
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                game.borrow_mut().resize_canvas();
            });
            let _ = window
                .add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_buttons(game: Rc<RefCell<Game>>) {
        let Some(document) = document() else {
            return;
        };
        for id in ["startBtn", "restartBtn"] {
            if let Some(btn) = document.get_element_by_id(id) {
                let game = game.clone();
                let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                    game.borrow_mut().start();
                });
                let _ =
                    btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
                closure.forget();
            }
        }
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |_time: f64| {
            game_loop(game);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>) {
        {
            let mut g = game.borrow_mut();
            g.update();
            g.render();
        }

        request_animation_frame(game);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() -> Result<(), JsValue> {
    wasm_game::run().await
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Cautio (native) starting...");

    let mut args = std::env::args().skip(1);
    let mode = args.next().unwrap_or_else(|| "runner".to_owned());
    let seed = args.next().and_then(|s| s.parse().ok()).unwrap_or(1);
    let tuning = match std::env::var("CAUTIO_TUNING") {
        Ok(path) => match std::fs::read_to_string(&path) {
            Ok(json) => cautio::Tuning::from_json_or_default(&json),
            Err(err) => {
                log::warn!("Cannot read tuning file {}: {}", path, err);
                cautio::Tuning::default()
            }
        },
        Err(_) => cautio::Tuning::default(),
    };

    match mode.as_str() {
        "quiz" => native::quiz(seed),
        _ => native::runner(tuning, seed),
    }
}

/// Headless runs for the native binary
#[cfg(not(target_arch = "wasm32"))]
mod native {
    use cautio::persistence::MemoryStore;
    use cautio::platform::{Clock, ManualClock, NullHud};
    use cautio::quiz::{QuizPhase, QuizSession};
    use cautio::sim::{GamePhase, GameState, RandomSource, Side, TickInput, seeded};
    use cautio::{QuestionBank, Session, Tuning};

    const FRAME_MS: f64 = 1000.0 / 60.0;
    /// Frames of autopilot before giving up
    const MAX_FRAMES: u32 = 120_000;
    /// Forward distance at which the autopilot jumps
    const JUMP_RANGE: f32 = 40.0;

    /// Simple autopilot: answers by coin flip, jumps at obstacles in its lane
    fn autopilot(state: &GameState, rng: &mut impl RandomSource) -> TickInput {
        if state.awaiting_decision() {
            let side = if rng.coin_flip() { Side::Left } else { Side::Right };
            return TickInput {
                left: side == Side::Left,
                right: side == Side::Right,
                ..Default::default()
            };
        }
        let road = &state.road;
        let threat = state.obstacles.iter().any(|o| {
            let ahead = o.x - road.strike_x();
            let same_lane = (state.player.x - road.obstacle_lane_x(o.lane)).abs()
                < road.lane_width() / 2.0;
            same_lane && (0.0..JUMP_RANGE).contains(&ahead)
        });
        TickInput {
            jump: threat,
            ..Default::default()
        }
    }

    pub fn runner(tuning: Tuning, seed: u64) {
        let bank = QuestionBank::load_or_empty();
        let mut session = Session::new(
            tuning,
            bank.runner,
            seeded(seed),
            ManualClock::new(),
            NullHud,
            MemoryStore::new(),
        );
        let mut pilot = seeded(seed.wrapping_add(1));
        session.start();

        let mut frames = 0;
        while session.state().phase == GamePhase::Playing && frames < MAX_FRAMES {
            let input = autopilot(session.state(), &mut pilot);
            session.frame(&input);
            session.clock_mut().advance(FRAME_MS);
            frames += 1;
        }

        let seconds = session.clock_mut().now_ms() / 1000.0;
        match session.last_summary() {
            Some(summary) => log::info!(
                "Run over after {} frames ({:.1}s): {:?}, score {}, {} correct",
                frames,
                seconds,
                summary.outcome,
                summary.score,
                summary.correct_answers
            ),
            None => log::info!(
                "Stopped after {} frames at {} km",
                frames,
                session.state().distance_km()
            ),
        }
        let best = session.best();
        log::info!(
            "Best score {}, total distance {} km",
            best.best_score,
            best.total_distance_km
        );
    }

    pub fn quiz(seed: u64) {
        let bank = QuestionBank::load_or_empty();
        let mut rng = seeded(seed);
        let mut session = QuizSession::new(&bank.quiz, &mut rng);
        if session.phase() == QuizPhase::Error {
            log::warn!("No quiz questions available");
            return;
        }

        while let Some(question) = session.current_question() {
            log::info!("Q{}: {}", session.question_number(), question.question);
            let pick = rng.index(question.options.len());
            session.select(pick);
            if let Some(correct) = session.submit() {
                let verdict = if correct { "correct" } else { "incorrect" };
                log::info!("  answered option {}: {}", pick + 1, verdict);
            }
            session.next();
        }

        if let Some(results) = session.results() {
            log::info!(
                "Quiz complete: {}% ({}/{}) - {}",
                results.percentage,
                results.correct,
                results.total,
                results.message
            );
        }
        let mut store = MemoryStore::new();
        session.record_best(&mut store);
    }
}
