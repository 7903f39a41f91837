//! Dash Runner entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, HtmlCanvasElement, KeyboardEvent, MouseEvent, TouchEvent};

    use dash_runner::audio::AudioManager;
    use dash_runner::consts::{FIELD_HEIGHT, FIELD_WIDTH, VILLAIN_VARIANTS};
    use dash_runner::renderer::{CanvasSurface, SpriteId, render};
    use dash_runner::{Game, HudSnapshot, Settings};

    /// Screens at most this wide get the on-screen controls hint
    const MOBILE_MAX_WIDTH: f64 = 768.0;

    /// Everything the browser callbacks share
    struct App {
        game: Game,
        surface: CanvasSurface,
        audio: AudioManager,
        /// Last HUD written to the DOM
        hud: Option<HudSnapshot>,
    }

    impl App {
        /// Simulate, paint and present one animation frame
        fn frame(&mut self, time: f64) {
            let outcome = self.game.frame(time, &self.audio);

            render(&mut self.surface, &self.game.scene(time));

            let Some(document) = web_sys::window().and_then(|w| w.document()) else {
                return;
            };
            self.update_hud(&document);

            if let Some(final_score) = outcome.game_over() {
                if let Some(el) = document.get_element_by_id("finalScore") {
                    el.set_text_content(Some(&final_score.to_string()));
                }
                set_visible(&document, "gameOver", true);
            }
            if outcome.hide_mobile_guide {
                set_visible(&document, "mobileGuide", false);
            }
        }

        /// Update HUD elements in DOM (only when something changed)
        fn update_hud(&mut self, document: &Document) {
            let hud = self.game.hud();
            if self.hud == Some(hud) {
                return;
            }
            self.hud = Some(hud);

            for (id, value) in [
                ("score", hud.score.to_string()),
                ("lives", hud.lives.to_string()),
                ("jumps", hud.jumps_left.to_string()),
                ("specialAttacks", hud.special_charges.to_string()),
            ] {
                if let Some(el) = document.get_element_by_id(id) {
                    el.set_text_content(Some(&value));
                }
            }

            if let Some(btn) = document.query_selector(".special-attack-btn").ok().flatten() {
                if hud.special_ready {
                    let _ = btn.remove_attribute("disabled");
                } else {
                    let _ = btn.set_attribute("disabled", "");
                }
            }
        }

        fn restart(&mut self) {
            let seed = js_sys::Date::now() as u64;
            self.game.restart(seed);
            self.hud = None;
            if let Some(document) = web_sys::window().and_then(|w| w.document()) {
                set_visible(&document, "gameOver", false);
            }
        }
    }

    fn set_visible(document: &Document, id: &str, visible: bool) {
        if let Some(el) = document.get_element_by_id(id) {
            let display = if visible { "display: block" } else { "display: none" };
            let _ = el.set_attribute("style", display);
        }
    }

    pub fn run() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        if console_log::init_with_level(log::Level::Info).is_err() {
            web_sys::console::warn_1(&"Logger already initialised".into());
        }

        log::info!("Dash Runner starting...");

        let window = web_sys::window().ok_or("no window")?;
        let document = window.document().ok_or("no document")?;

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("gameCanvas")
            .ok_or("no canvas")?
            .dyn_into()?;
        canvas.set_width(FIELD_WIDTH as u32);
        canvas.set_height(FIELD_HEIGHT as u32);

        let settings = Settings::load();
        let mut surface = CanvasSurface::new(&canvas).ok_or("no 2d context")?;
        let hero = settings.character;
        surface.load_sprite(SpriteId::Hero(hero), &settings.sprite_url(hero.sprite_id()));
        for variant in 0..VILLAIN_VARIANTS {
            let sprite = SpriteId::Villain(variant);
            surface.load_sprite(sprite, &settings.sprite_url(sprite.image_id()));
        }

        let seed = js_sys::Date::now() as u64;
        let mut game = Game::new(settings, seed);
        let audio = AudioManager::new(game.volume());

        // Controls hint on small screens
        let narrow = window
            .inner_width()
            .ok()
            .and_then(|w| w.as_f64())
            .is_some_and(|w| w <= MOBILE_MAX_WIDTH);
        if narrow {
            set_visible(&document, "mobileGuide", true);
            game.show_mobile_guide(window.performance().map_or(0.0, |p| p.now()));
        }

        let app = Rc::new(RefCell::new(App {
            game,
            surface,
            audio,
            hud: None,
        }));

        log::info!("Game initialized with seed: {}", seed);

        setup_input_handlers(&canvas, app.clone());
        setup_buttons(app.clone());

        // Start game loop
        request_animation_frame(app);

        log::info!("Dash Runner running!");
        Ok(())
    }

    fn setup_input_handlers(canvas: &HtmlCanvasElement, app: Rc<RefCell<App>>) {
        let Some(window) = web_sys::window() else {
            return;
        };

        // Keyboard
        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let mut a = app.borrow_mut();
                a.audio.resume();
                match event.code().as_str() {
                    "KeyM" if !event.repeat() => {
                        let muted = a.audio.toggle_mute();
                        log::info!("Muted: {}", muted);
                    }
                    "KeyI" if !event.repeat() => {
                        a.game.toggle_autopilot();
                    }
                    code => {
                        if a.game.key_down(code) {
                            event.prevent_default();
                        }
                    }
                }
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }
        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                app.borrow_mut().game.key_up(&event.code());
            });
            let _ = window
                .add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Touch start (jump)
        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                let mut a = app.borrow_mut();
                a.audio.resume();
                a.game.touch_start(event.time_stamp());
            });
            let _ = canvas
                .add_event_listener_with_callback("touchstart", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Touch end
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                app.borrow_mut().game.touch_end(event.time_stamp());
            });
            let _ = canvas
                .add_event_listener_with_callback("touchend", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_buttons(app: Rc<RefCell<App>>) {
        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            return;
        };

        if let Some(btn) = document.get_element_by_id("restart-btn") {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                app.borrow_mut().restart();
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        if let Some(btn) = document.query_selector(".special-attack-btn").ok().flatten() {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                event.prevent_default();
                let mut a = app.borrow_mut();
                a.audio.resume();
                a.game.press_special();
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        if let Some(btn) = document.get_element_by_id("select-character-btn") {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                if let Some(window) = web_sys::window() {
                    let _ = window.location().set_href("index.html");
                }
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn request_animation_frame(app: Rc<RefCell<App>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |time: f64| {
            game_loop(app, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(app: Rc<RefCell<App>>, time: f64) {
        app.borrow_mut().frame(time);
        request_animation_frame(app);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    if let Err(e) = wasm_game::run() {
        log::error!("Failed to start: {:?}", e);
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Dash Runner (native) starting...");
    log::info!("Native mode runs a headless autopilot session - serve the wasm build to play");

    let seed = std::env::args()
        .nth(1)
        .and_then(|s| s.parse().ok())
        .unwrap_or(0x5EED);
    headless_session(seed);
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Play up to ten simulated minutes on autopilot and report the result
#[cfg(not(target_arch = "wasm32"))]
fn headless_session(seed: u64) {
    use dash_runner::audio::Silent;
    use dash_runner::consts::SIM_STEP_MS;
    use dash_runner::renderer::{DrawList, render};
    use dash_runner::{Game, Settings};

    const MAX_FRAMES: u32 = 60 * 60 * 10;

    let mut game = Game::new(Settings::load(), seed);
    game.set_autopilot(true);
    let mut surface = DrawList::new();
    let mut primitives = 0usize;

    let mut frames = 0;
    while frames < MAX_FRAMES {
        let now = frames as f64 * SIM_STEP_MS;
        let outcome = game.frame(now, &Silent);

        surface.clear();
        render(&mut surface, &game.scene(now));
        primitives += surface.len();

        frames += 1;
        if let Some(score) = outcome.game_over() {
            log::info!("Autopilot run ended after {} frames with {} points", frames, score);
            break;
        }
    }

    let hud = game.hud();
    log::info!(
        "Final: score {}, lives {}, specials left {}, {} primitives painted",
        hud.score,
        hud.lives,
        hud.special_charges,
        primitives
    );
}
