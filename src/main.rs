//! Drop Catcher entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::collections::HashMap;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, Element, HtmlButtonElement, HtmlElement, HtmlSelectElement};
    use web_sys::{KeyboardEvent, MouseEvent, TouchEvent};

    use drop_catcher::audio::{AudioManager, SoundEffect};
    use drop_catcher::platform::FrameClock;
    use drop_catcher::platform::storage::LocalStorageStore;
    use drop_catcher::sim::{DropKind, GameEvent, TickInput};
    use drop_catcher::{Difficulty, RoundController, RoundSummary, Settings};

    /// Game instance holding all state
    struct Game {
        controller: RoundController<LocalStorageStore>,
        settings: Settings,
        audio: AudioManager,
        input: TickInput,
        clock: FrameClock,
        document: Document,
        area: HtmlElement,
        bucket: HtmlElement,
        /// DOM node for each live drop
        drop_nodes: HashMap<u32, Element>,
        field_size: (i32, i32),
    }

    impl Game {
        fn new(seed: u64, document: Document, area: HtmlElement, bucket: HtmlElement) -> Self {
            let store = LocalStorageStore::new();
            let settings = Settings::load(&store);
            let mut controller = RoundController::new(store, seed);
            controller.select_difficulty(settings.difficulty);

            let mut audio = AudioManager::new();
            audio.set_muted(settings.muted);

            Self {
                controller,
                settings,
                audio,
                input: TickInput::default(),
                clock: FrameClock::new(),
                document,
                area,
                bucket,
                drop_nodes: HashMap::new(),
                field_size: (0, 0),
            }
        }

        fn start(&mut self) {
            if self.controller.is_active() {
                return;
            }
            let difficulty = self.settings.difficulty;
            if let Err(e) = self.controller.start_round(difficulty) {
                log::error!("{}", e);
                return;
            }
            self.clear_drop_nodes();
            self.input.clear();
            self.clock.reset();
            self.audio.play(SoundEffect::RoundStart);
            self.set_start_enabled(false);
            self.set_text("feedback", "");
        }

        fn select_difficulty(&mut self, value: &str) {
            let Some(difficulty) = Difficulty::from_str(value) else {
                log::warn!("Unknown difficulty: {}", value);
                return;
            };
            if self.controller.select_difficulty(difficulty) {
                self.settings.difficulty = difficulty;
                self.settings.save(self.controller.store_mut());
            }
        }

        fn toggle_mute(&mut self) {
            let muted = self.settings.toggle_mute();
            self.audio.set_muted(muted);
            self.settings.save(self.controller.store_mut());
            self.set_text("mute-btn", if muted { "Unmute" } else { "Mute" });
        }

        /// Re-read the play field size from layout
        fn sync_field(&mut self) {
            let size = (self.area.client_width(), self.area.client_height());
            if size != self.field_size && size.0 > 0 && size.1 > 0 {
                self.field_size = size;
                self.controller.set_field(size.0 as f32, size.1 as f32);
            }
        }

        fn frame(&mut self, time: f64) {
            self.sync_field();
            let dt = self.clock.delta_ms(time);
            let summary = self.controller.advance(&self.input, dt);
            self.input.clear();

            let events = self.controller.session_mut().drain_events();
            for event in &events {
                self.apply_event(event);
            }
            self.render();

            if let Some(summary) = summary {
                self.show_summary(&summary);
            }
        }

        fn apply_event(&mut self, event: &GameEvent) {
            if let Some(effect) = SoundEffect::for_event(event) {
                self.audio.play(effect);
            }
            match event {
                GameEvent::Spawned { id, kind, x } => self.create_drop_node(*id, *kind, *x),
                GameEvent::Caught { id, .. } | GameEvent::Missed { id, .. } => {
                    if let Some(node) = self.drop_nodes.remove(id) {
                        node.remove();
                    }
                }
                GameEvent::Cleared { ids } => {
                    for id in ids {
                        if let Some(node) = self.drop_nodes.remove(id) {
                            node.remove();
                        }
                    }
                }
                _ => {}
            }
        }

        fn create_drop_node(&mut self, id: u32, kind: DropKind, x: f32) {
            let Ok(node) = self.document.create_element("div") else {
                return;
            };
            let class = match kind {
                DropKind::Water => "water-drop",
                DropKind::Pollutant => "pollutant-drop",
                DropKind::Golden => "golden-drop",
            };
            let _ = node.set_attribute("class", class);
            let _ = node.set_attribute("data-id", &id.to_string());
            let _ = node.set_attribute("style", &format!("left: {}px; top: -48px;", x));
            let _ = self.area.append_child(&node);
            self.drop_nodes.insert(id, node);
        }

        fn clear_drop_nodes(&mut self) {
            for (_, node) in self.drop_nodes.drain() {
                node.remove();
            }
        }

        /// Push simulation state to the DOM
        fn render(&self) {
            let session = self.controller.session();
            let _ = self
                .bucket
                .style()
                .set_property("left", &format!("{}px", session.catcher.x));

            for drop in &session.drops {
                if let Some(node) = self.drop_nodes.get(&drop.id) {
                    let left = drop.pos.x;
                    let top = drop.pos.y;
                    let _ = node.set_attribute("style", &format!("left: {}px; top: {}px;", left, top));
                }
            }

            self.set_text("score", &format!("Score: {}", session.score));
            self.set_text("timer", &format!("Time: {}", session.time_remaining));
            self.set_text("high-score", &format!("Best: {}", self.controller.high_score()));

            let tier = session.combo.tier();
            self.set_text("combo", tier.message().unwrap_or(""));
            if let Some(el) = self.document.get_element_by_id("combo") {
                let _ = el.set_attribute("style", &format!("opacity: {}", tier.intensity()));
            }

            if self.controller.is_active() {
                let (text, color) = match &session.feedback {
                    Some(f) if session.feedback_text().is_some() => {
                        (f.text.as_str(), if f.positive { "#ffd600" } else { "#888" })
                    }
                    _ => ("", "#ffd600"),
                };
                self.set_text("feedback", text);
                if let Some(el) = self.document.get_element_by_id("feedback") {
                    let _ = el.set_attribute("style", &format!("color: {}", color));
                }
            }
        }

        fn show_summary(&mut self, summary: &RoundSummary) {
            self.audio.play(if summary.new_high_score {
                SoundEffect::HighScore
            } else {
                SoundEffect::GameOver
            });
            self.set_text("feedback", &summary.message());
            self.set_text("mission", summary.mission);
            self.set_start_enabled(true);
        }

        fn set_text(&self, id: &str, text: &str) {
            if let Some(el) = self.document.get_element_by_id(id) {
                el.set_text_content(Some(text));
            }
        }

        fn set_start_enabled(&self, enabled: bool) {
            if let Some(btn) = self
                .document
                .get_element_by_id("start-btn")
                .and_then(|el| el.dyn_into::<HtmlButtonElement>().ok())
            {
                btn.set_disabled(!enabled);
            }
        }

        /// Convert a viewport x to a field-relative x
        fn field_x(&self, client_x: i32) -> f32 {
            let rect = self.area.get_bounding_client_rect();
            client_x as f32 - rect.left() as f32
        }
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Drop Catcher starting...");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        let area: HtmlElement = document
            .get_element_by_id("game-area")
            .expect("no game area")
            .dyn_into()
            .expect("game area is not an element");
        let bucket: HtmlElement = document
            .get_element_by_id("bucket")
            .expect("no bucket")
            .dyn_into()
            .expect("bucket is not an element");

        let seed = js_sys::Date::now() as u64;
        let game = Rc::new(RefCell::new(Game::new(seed, document.clone(), area.clone(), bucket)));

        {
            let g = game.borrow();
            if let Some(select) = document
                .get_element_by_id("difficulty")
                .and_then(|el| el.dyn_into::<HtmlSelectElement>().ok())
            {
                select.set_value(g.settings.difficulty.as_str());
            }
            g.set_text("mute-btn", if g.settings.muted { "Unmute" } else { "Mute" });
            g.set_text("high-score", &format!("Best: {}", g.controller.high_score()));
        }

        setup_input_handlers(&area, game.clone());
        setup_controls(&document, game.clone());
        setup_auto_pause(&document, game.clone());

        request_animation_frame(game);
        log::info!("Drop Catcher running!");
    }

    fn setup_input_handlers(area: &HtmlElement, game: Rc<RefCell<Game>>) {
        // Mouse move - bucket follows the pointer
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                let mut g = game.borrow_mut();
                let x = g.field_x(event.client_x());
                g.input.pointer_x = Some(x);
            });
            let _ = area
                .add_event_listener_with_callback("mousemove", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Touch move
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                if let Some(touch) = event.touches().get(0) {
                    let mut g = game.borrow_mut();
                    let x = g.field_x(touch.client_x());
                    g.input.pointer_x = Some(x);
                }
            });
            let _ = area
                .add_event_listener_with_callback("touchmove", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Click on a drop - direct catch
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                let id = event
                    .target()
                    .and_then(|t| t.dyn_into::<Element>().ok())
                    .and_then(|el| el.get_attribute("data-id"))
                    .and_then(|id| id.parse::<u32>().ok());
                if let Some(id) = id {
                    game.borrow_mut().input.clicked.push(id);
                }
            });
            let _ = area
                .add_event_listener_with_callback("mousedown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Keyboard
        {
            let window = web_sys::window().unwrap();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let mut g = game.borrow_mut();
                match event.key().as_str() {
                    "ArrowLeft" => g.input.nudge_left += 1,
                    "ArrowRight" => g.input.nudge_right += 1,
                    _ => {}
                }
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_controls(document: &Document, game: Rc<RefCell<Game>>) {
        if let Some(btn) = document.get_element_by_id("start-btn") {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                game.borrow_mut().start();
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        if let Some(select) = document
            .get_element_by_id("difficulty")
            .and_then(|el| el.dyn_into::<HtmlSelectElement>().ok())
        {
            let game = game.clone();
            let select_clone = select.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                let mut g = game.borrow_mut();
                g.select_difficulty(&select_clone.value());
                // Snap the control back if the change was refused
                select_clone.set_value(g.controller.difficulty().as_str());
            });
            let _ =
                select.add_event_listener_with_callback("change", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        if let Some(btn) = document.get_element_by_id("mute-btn") {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                game.borrow_mut().toggle_mute();
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_auto_pause(document: &Document, game: Rc<RefCell<Game>>) {
        // Hidden tabs stop getting frames; drop the stale timestamp on return
        let document_clone = document.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            if document_clone.visibility_state() == web_sys::VisibilityState::Visible {
                game.borrow_mut().clock.reset();
            }
        });
        let _ = document
            .add_event_listener_with_callback("visibilitychange", closure.as_ref().unchecked_ref());
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
        game.borrow_mut().frame(time);
        request_animation_frame(game);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_game::run();
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Drop Catcher (native) starting...");
    log::info!("Native mode runs a headless demo - run with `trunk serve` for the web version");

    let difficulty = std::env::args()
        .nth(1)
        .and_then(|arg| drop_catcher::Difficulty::from_str(&arg))
        .unwrap_or_default();
    demo::run(difficulty, 2);
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Headless rounds played by a simple bot
#[cfg(not(target_arch = "wasm32"))]
mod demo {
    use drop_catcher::consts::DROP_WIDTH;
    use drop_catcher::sim::{GameSession, TickInput};
    use drop_catcher::{Difficulty, MemoryStore, RoundController};

    const FRAME_MS: u64 = 16;

    /// Chase the lowest collectible drop
    fn bot_input(session: &GameSession) -> TickInput {
        let target = session
            .drops
            .iter()
            .filter(|d| !d.resolved && d.kind.is_collectible())
            .max_by(|a, b| a.pos.y.total_cmp(&b.pos.y));
        TickInput {
            pointer_x: target.map(|d| d.pos.x + DROP_WIDTH / 2.0),
            ..Default::default()
        }
    }

    pub fn run(difficulty: Difficulty, rounds: u32) {
        let mut controller = RoundController::new(MemoryStore::new(), 0x5eed);

        for round in 1..=rounds {
            if let Err(e) = controller.start_round(difficulty) {
                log::error!("{}", e);
                return;
            }
            let summary = loop {
                let input = bot_input(controller.session());
                if let Some(summary) = controller.advance(&input, FRAME_MS) {
                    break summary;
                }
                controller.session_mut().drain_events();
            };

            println!("Round {} ({}): {}", round, difficulty.as_str(), summary.message());
            println!(
                "  water {} / golden {} / pollutants {} / missed {} / best combo {}",
                summary.stats.water_caught,
                summary.stats.golden_caught,
                summary.stats.pollutants_caught,
                summary.stats.drops_missed,
                summary.best_combo
            );
            println!("  {}", summary.mission);
        }
    }
}
