//! RPS Arena entry point
//!
//! The browser build draws the arena on a 2D canvas and drives the session
//! from `requestAnimationFrame`. The native build plays a headless series on
//! a simulated 60 Hz clock and prints the result.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{CanvasRenderingContext2d, Document, HtmlCanvasElement, HtmlInputElement, Window};

    use rps_arena::consts::*;
    use rps_arena::sim::{Arena, EntityKind, GameEvent, GamePhase, Session, Snapshot};
    use rps_arena::{Settings, arena_for_viewport};

    /// Game instance holding all state
    struct Game {
        session: Session,
        canvas: HtmlCanvasElement,
        ctx: CanvasRenderingContext2d,
        /// Pending animation frame, cancelled on teardown
        frame_id: Option<i32>,
    }

    impl Game {
        fn render(&self, phase: GamePhase, snapshot: &Snapshot) {
            let ctx = &self.ctx;
            let w = self.canvas.width() as f64;
            let h = self.canvas.height() as f64;
            ctx.clear_rect(0.0, 0.0, w, h);
            ctx.set_text_align("center");
            ctx.set_text_baseline("middle");

            match phase {
                GamePhase::Simulating => {
                    ctx.set_font(&format!("{}px serif", ENTITY_SIZE));
                    for e in &snapshot.entities {
                        let _ = ctx.fill_text(e.glyph, e.x as f64, e.y as f64);
                    }
                }
                GamePhase::RoundOver { winner } => {
                    ctx.set_font("bold 48px sans-serif");
                    let _ = ctx.fill_text("Round Over!", w / 2.0, h / 2.0 - 50.0);
                    ctx.set_font("28px sans-serif");
                    let _ = ctx.fill_text(&format!("The winner is {}!", winner), w / 2.0, h / 2.0);
                    let secs = snapshot.next_round_in_ms.unwrap_or(0.0) / 1000.0;
                    let _ = ctx.fill_text(
                        &format!("Starting next round in {:.0}s...", secs.ceil()),
                        w / 2.0,
                        h / 2.0 + 45.0,
                    );
                }
                GamePhase::SeriesOver { winner } => {
                    ctx.set_font("bold 48px sans-serif");
                    let _ = ctx.fill_text("SERIES COMPLETE!", w / 2.0, h / 2.0 - 30.0);
                    ctx.set_font("28px sans-serif");
                    let _ = ctx.fill_text(
                        &format!("{} wins the best of 7!", winner),
                        w / 2.0,
                        h / 2.0 + 20.0,
                    );
                }
            }
        }
    }

    /// Update the stats panel in the DOM
    fn update_hud(document: &Document, snapshot: &Snapshot) {
        for kind in EntityKind::ALL {
            let name = kind.as_str();
            if let Some(el) = document.get_element_by_id(&format!("score-{}", name)) {
                el.set_text_content(Some(&snapshot.wins.get(kind).to_string()));
            }
            if let Some(el) = document.get_element_by_id(&format!("live-{}", name)) {
                el.set_text_content(Some(&snapshot.live.get(kind).to_string()));
            }
        }
        if let Some(el) = document.get_element_by_id("round-number") {
            el.set_text_content(Some(&snapshot.round.to_string()));
        }
    }

    fn viewport_arena(window: &Window) -> Arena {
        let w = window.inner_width().ok().and_then(|v| v.as_f64()).unwrap_or(0.0);
        let h = window.inner_height().ok().and_then(|v| v.as_f64()).unwrap_or(0.0);
        arena_for_viewport(w as f32, h as f32)
    }

    fn size_canvas(canvas: &HtmlCanvasElement, arena: Arena) {
        canvas.set_width(arena.width.max(0.0) as u32);
        canvas.set_height(arena.height.max(0.0) as u32);
    }

    /// Settings embedded in the page as `<script id="settings" type="application/json">`
    fn page_settings(document: &Document) -> Settings {
        let Some(json) = document
            .get_element_by_id("settings")
            .and_then(|el| el.text_content())
        else {
            return Settings::default();
        };
        match Settings::from_json(&json) {
            Ok(settings) => {
                log::info!("Loaded settings from page");
                settings
            }
            Err(e) => {
                log::warn!("Ignoring malformed settings: {}", e);
                Settings::default()
            }
        }
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("RPS Arena starting...");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .expect("no canvas")
            .dyn_into()
            .expect("not a canvas");
        let ctx: CanvasRenderingContext2d = canvas
            .get_context("2d")
            .expect("context lookup failed")
            .expect("no 2d context")
            .dyn_into()
            .expect("not a 2d context");

        let arena = viewport_arena(&window);
        size_canvas(&canvas, arena);

        let settings = page_settings(&document);
        if let Some(slider) = document
            .get_element_by_id("speed")
            .and_then(|el| el.dyn_into::<HtmlInputElement>().ok())
        {
            slider.set_value(&settings.speed.to_string());
        }

        let seed = js_sys::Date::now() as u64;
        let game = Rc::new(RefCell::new(Game {
            session: Session::new(arena, settings, seed),
            canvas,
            ctx,
            frame_id: None,
        }));

        setup_controls(&document, game.clone());
        setup_window_handlers(&window, game.clone());

        request_animation_frame(game);
        log::info!("RPS Arena running!");
    }

    fn setup_controls(document: &Document, game: Rc<RefCell<Game>>) {
        // Reset button: full reset, also serves as "Play Again"
        if let Some(btn) = document.get_element_by_id("reset-btn") {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
                game.borrow_mut().session.input.full_reset = true;
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Optional re-deal of the current round
        if let Some(btn) = document.get_element_by_id("redeal-btn") {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
                game.borrow_mut().session.input.reset_round = true;
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Speed slider
        if let Some(slider) = document
            .get_element_by_id("speed")
            .and_then(|el| el.dyn_into::<HtmlInputElement>().ok())
        {
            let input = slider.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                match input.value().parse::<f32>() {
                    Ok(speed) => game.borrow_mut().session.input.speed = Some(speed),
                    Err(_) => log::warn!("Speed slider sent {:?}", input.value()),
                }
            });
            let _ = slider.add_event_listener_with_callback("input", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_window_handlers(window: &Window, game: Rc<RefCell<Game>>) {
        // New viewport: resize the canvas, series starts over
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                let Some(window) = web_sys::window() else {
                    return;
                };
                let arena = viewport_arena(&window);
                let mut g = game.borrow_mut();
                size_canvas(&g.canvas, arena);
                g.session.input.resize = Some(arena);
            });
            let _ = window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Teardown: stop the frame loop and drop the round timer
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                let mut g = game.borrow_mut();
                if let (Some(id), Some(window)) = (g.frame_id.take(), web_sys::window()) {
                    let _ = window.cancel_animation_frame(id);
                }
                g.session.shutdown();
            });
            let _ = window.add_event_listener_with_callback("pagehide", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Restored from the back/forward cache: deal a fresh series and restart the loop
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                let Some(window) = web_sys::window() else {
                    return;
                };
                let arena = viewport_arena(&window);
                {
                    let mut g = game.borrow_mut();
                    if !g.session.resume(arena, js_sys::Date::now() as u64) {
                        return;
                    }
                    size_canvas(&g.canvas, arena);
                }
                request_animation_frame(game.clone());
            });
            let _ = window.add_event_listener_with_callback("pageshow", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let next = game.clone();
        let closure = Closure::once(move |time: f64| {
            game_loop(next, time);
        });
        if let Ok(id) = window.request_animation_frame(closure.as_ref().unchecked_ref()) {
            game.borrow_mut().frame_id = Some(id);
        }
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>, time: f64) {
        {
            let mut g = game.borrow_mut();
            g.frame_id = None;
            if !g.session.is_running() {
                return;
            }

            g.session.frame(time);
            for event in g.session.state.drain_events() {
                match event {
                    GameEvent::SeriesWon { winner } => log::info!("Series complete: {}", winner),
                    other => log::debug!("{:?}", other),
                }
            }

            let snapshot = g.session.snapshot();
            g.render(g.session.state.phase, &snapshot);
            if let Some(document) = web_sys::window().and_then(|w| w.document()) {
                update_hud(&document, &snapshot);
            }
        }

        request_animation_frame(game);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_game::run();
}

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use rps_arena::consts::FRAME_MS;
    use rps_arena::sim::{GameEvent, GamePhase, Session};
    use rps_arena::{Settings, arena_for_viewport};

    /// Viewport the headless runner pretends to have
    const VIEWPORT: (f32, f32) = (1280.0, 720.0);
    /// Give up after an hour of simulated time
    const MAX_FRAMES: u64 = 60 * 60 * 60;

    pub fn load_settings(path: Option<String>) -> Settings {
        let Some(path) = path.filter(|p| p != "-") else {
            return Settings::default();
        };
        let parsed = std::fs::read_to_string(&path)
            .map_err(|e| e.to_string())
            .and_then(|json| Settings::from_json(&json).map_err(|e| e.to_string()));
        match parsed {
            Ok(settings) => {
                log::info!("Loaded settings from {}", path);
                settings
            }
            Err(e) => {
                log::warn!("Could not load settings from {}: {}", path, e);
                Settings::default()
            }
        }
    }

    /// Play one series to completion on a simulated clock
    pub fn run(settings: Settings) {
        let seed = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or(0);
        let arena = arena_for_viewport(VIEWPORT.0, VIEWPORT.1);
        let mut session = Session::new(arena, settings, seed);

        let mut frames = 0u64;
        while frames < MAX_FRAMES {
            session.frame(frames as f64 * FRAME_MS);
            frames += 1;

            for event in session.state.drain_events() {
                if let GameEvent::RoundWon { round, winner } = event {
                    println!("round {:>2}: {}", round, winner);
                }
            }
            if matches!(session.state.phase, GamePhase::SeriesOver { .. }) {
                break;
            }
        }

        if frames >= MAX_FRAMES {
            log::warn!("Series undecided after {} frames", frames);
        }
        session.shutdown();

        let summary = serde_json::json!({
            "seed": session.state.seed,
            "rounds": session.state.round.number,
            "frames": frames,
            "champion": session.state.series.champion,
            "wins": session.state.series.wins,
        });
        match serde_json::to_string_pretty(&summary) {
            Ok(json) => println!("{}", json),
            Err(e) => log::error!("Failed to encode summary: {}", e),
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("RPS Arena (native) starting...");
    log::info!("Headless mode - run with `trunk serve` for the animated web version");

    let mut args = std::env::args().skip(1);
    let mut settings = headless::load_settings(args.next());
    if let Some(name) = args.next() {
        match rps_arena::sim::LayoutPolicy::from_str(&name) {
            Some(layout) => settings.layout = layout,
            None => log::warn!("Unknown layout {:?}, keeping {}", name, settings.layout.as_str()),
        }
    }
    headless::run(settings);
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
