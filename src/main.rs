//! Brawl Arena entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;

    use glam::Vec2;
    use wasm_bindgen::prelude::*;
    use web_sys::{HtmlCanvasElement, MouseEvent};

    use brawl_arena::commentary::{MessageKind, MessageLog};
    use brawl_arena::persistence::LocalStorage;
    use brawl_arena::render::{HudSnapshot, Renderer, update_hud};
    use brawl_arena::shop::{self, BoxReward};
    use brawl_arena::sim::{GameMode, MatchConfig, PlayerInput, Stick, World, tick};
    use brawl_arena::{Settings, Shop};

    // Announcer bridge. The page may install `window.brawlAnnouncer(event, context)`
    // returning a promise of text; without it every request resolves empty.
    #[wasm_bindgen(inline_js = "
        export function announcer_commentary(event, context) {
            const hook = window.brawlAnnouncer;
            if (typeof hook !== 'function') {
                return Promise.resolve('');
            }
            return Promise.resolve()
                .then(() => hook(event, context))
                .then(text => (typeof text === 'string' ? text : ''))
                .catch(e => { console.warn('Announcer failed:', e); return ''; });
        }
    ")]
    extern "C" {
        fn announcer_commentary(event: &str, context: &str) -> js_sys::Promise;
    }

    thread_local! {
        static GAME: RefCell<Option<Rc<RefCell<Game>>>> = const { RefCell::new(None) };
    }

    fn with_game<R>(f: impl FnOnce(&mut Game) -> R) -> Option<R> {
        let game = GAME.with(|g| g.borrow().clone())?;
        let mut g = game.borrow_mut();
        Some(f(&mut g))
    }

    /// Game instance holding all state
    struct Game {
        world: World,
        mode: GameMode,
        input: PlayerInput,
        renderer: Option<Renderer>,
        display: Vec2,
        shop: Shop<LocalStorage>,
        settings: Settings,
        messages: Rc<RefCell<MessageLog>>,
        // FPS tracking
        frame_times: [f64; 60],
        frame_index: usize,
        fps: u32,
        paused: bool,
        reward_paid: bool,
    }

    impl Game {
        fn new(seed: u64) -> Self {
            let shop = Shop::load(LocalStorage);
            let settings = Settings::load();
            let mode = GameMode::GemRush;
            let mut world = World::new(MatchConfig {
                mode,
                hero: shop.hero_stats(),
                seed,
            });
            world.particle_cap = settings.max_particles();
            Self {
                world,
                mode,
                input: PlayerInput::default(),
                renderer: None,
                display: Vec2::new(900.0, 600.0),
                shop,
                settings,
                messages: Rc::new(RefCell::new(MessageLog::new())),
                frame_times: [0.0; 60],
                frame_index: 0,
                fps: 0,
                paused: false,
                reward_paid: false,
            }
        }

        fn start_match(&mut self, mode: GameMode, seed: u64) {
            self.mode = mode;
            self.world.restart(MatchConfig {
                mode,
                hero: self.shop.hero_stats(),
                seed,
            });
            self.world.particle_cap = self.settings.max_particles();
            self.input = PlayerInput {
                pointer_capable: self.input.pointer_capable,
                ..Default::default()
            };
            self.messages.borrow_mut().clear();
            self.paused = false;
            self.reward_paid = false;
        }

        fn update(&mut self, time: f64) {
            if let Some(renderer) = self.renderer.as_mut() {
                self.display = renderer.resize();
            }

            if !self.paused {
                tick(&mut self.world, &mut self.input, self.display);
                self.messages.borrow_mut().tick();
            }

            self.dispatch_commentary();

            if let Some(winner) = self.world.winner() {
                if !self.reward_paid {
                    self.reward_paid = true;
                    let earned = self.shop.award_match(winner);
                    self.messages
                        .borrow_mut()
                        .push(shop::result_message(winner, earned), MessageKind::System);
                }
            }
            for event in self.world.drain_events() {
                log::debug!("{:?}", event);
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

        /// Hand queued requests to the announcer without waiting on them
        fn dispatch_commentary(&mut self) {
            let requests = self.world.commentary.drain();
            if !self.settings.commentary {
                for request in &requests {
                    self.messages.borrow_mut().push_response(request, None);
                }
                return;
            }
            for request in requests {
                let messages = self.messages.clone();
                wasm_bindgen_futures::spawn_local(async move {
                    let promise = announcer_commentary(request.event, &request.context);
                    let text = wasm_bindgen_futures::JsFuture::from(promise)
                        .await
                        .ok()
                        .and_then(|v| v.as_string());
                    messages.borrow_mut().push_response(&request, text);
                });
            }
        }

        fn render(&self) {
            if let Some(renderer) = self.renderer.as_ref() {
                renderer.draw(&self.world, &self.settings, self.display);
            }
            let messages = self.messages.borrow();
            update_hud(&HudSnapshot {
                world: &self.world,
                messages: &messages,
                coins: self.shop.coins(),
                fps: self.fps,
                settings: &self.settings,
            });
        }
    }

    pub async fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Brawl Arena starting...");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        if let Some(loading) = document.get_element_by_id("loading") {
            let _ = loading.set_attribute("class", "hidden");
        }

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .expect("no canvas")
            .dyn_into()
            .expect("not a canvas");

        let seed = js_sys::Date::now() as u64;
        let game = Rc::new(RefCell::new(Game::new(seed)));
        match Renderer::new(canvas.clone()) {
            Ok(renderer) => game.borrow_mut().renderer = Some(renderer),
            Err(e) => log::error!("Canvas2D unavailable: {:?}", e),
        }
        GAME.with(|g| *g.borrow_mut() = Some(game.clone()));

        log::info!("Game initialized with seed: {}", seed);

        setup_input_handlers(&canvas, game.clone());
        setup_mode_buttons(game.clone());
        setup_auto_pause(game.clone());

        request_animation_frame(game);

        log::info!("Brawl Arena running!");
    }

    fn setup_input_handlers(canvas: &HtmlCanvasElement, game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };

        {
            let game = game.clone();
            let canvas_clone = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                let rect = canvas_clone.get_bounding_client_rect();
                let mut g = game.borrow_mut();
                g.input.pointer_capable = true;
                g.input.pointer = Some(Vec2::new(
                    (event.client_x() as f64 - rect.left()) as f32,
                    (event.client_y() as f64 - rect.top()) as f32,
                ));
            });
            let _ = canvas
                .add_event_listener_with_callback("mousemove", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                if event.button() == 0 {
                    let mut g = game.borrow_mut();
                    g.input.pointer_capable = true;
                    g.input.pointer_down = true;
                }
            });
            let _ = canvas
                .add_event_listener_with_callback("mousedown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                if event.button() == 0 {
                    game.borrow_mut().input.pointer_down = false;
                }
            });
            let _ = window
                .add_event_listener_with_callback("mouseup", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::KeyboardEvent| {
                let mut g = game.borrow_mut();
                match event.key().as_str() {
                    "Escape" => {
                        g.paused = !g.paused;
                        log::info!("Paused: {}", g.paused);
                    }
                    key => g.input.press(key),
                }
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::KeyboardEvent| {
                game.borrow_mut().input.release(&event.key());
            });
            let _ = window
                .add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_mode_buttons(game: Rc<RefCell<Game>>) {
        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            return;
        };

        for mode in [GameMode::GemRush, GameMode::Deathmatch, GameMode::BossHunt] {
            let Some(btn) = document.get_element_by_id(&format!("start-{}", mode.as_str())) else {
                continue;
            };
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                let seed = js_sys::Date::now() as u64;
                game.borrow_mut().start_match(mode, seed);
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        if let Some(btn) = document.get_element_by_id("restart-btn") {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                let seed = js_sys::Date::now() as u64;
                let mut g = game.borrow_mut();
                let mode = g.mode;
                g.start_match(mode, seed);
                log::info!("Match restarted with seed: {}", seed);
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_auto_pause(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let Some(document) = window.document() else {
            return;
        };

        {
            let game = game.clone();
            let document_clone = document.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                if document_clone.visibility_state() == web_sys::VisibilityState::Hidden {
                    let mut g = game.borrow_mut();
                    g.paused = true;
                    g.input = PlayerInput::default();
                    log::info!("Auto-paused (tab hidden)");
                }
            });
            let _ = document.add_event_listener_with_callback(
                "visibilitychange",
                closure.as_ref().unchecked_ref(),
            );
            closure.forget();
        }

        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
                // Keys held while focus leaves never get a keyup
                let mut g = game.borrow_mut();
                g.input.keys.clear();
                g.input.pointer_down = false;
            });
            let _ = window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref());
            closure.forget();
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
            g.update(time);
            g.render();
        }

        request_animation_frame(game);
    }

    // === Exports for the page (touch joysticks, shop UI) ===

    #[wasm_bindgen]
    pub fn set_move_stick(x: f32, y: f32, active: bool) {
        with_game(|g| {
            g.input.pointer_capable = false;
            g.input.move_stick = Stick {
                vec: Vec2::new(x.clamp(-1.0, 1.0), y.clamp(-1.0, 1.0)),
                active,
            };
        });
    }

    #[wasm_bindgen]
    pub fn set_aim_stick(x: f32, y: f32, active: bool) {
        with_game(|g| {
            g.input.pointer_capable = false;
            g.input
                .set_aim_stick(Vec2::new(x.clamp(-1.0, 1.0), y.clamp(-1.0, 1.0)), active);
        });
    }

    #[wasm_bindgen]
    pub fn coins() -> u32 {
        with_game(|g| g.shop.coins()).unwrap_or(0)
    }

    #[wasm_bindgen]
    pub fn buy_hero(id: &str) -> Result<(), JsValue> {
        with_game(|g| g.shop.buy_hero(id).map(|_| ()))
            .unwrap_or(Ok(()))
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    #[wasm_bindgen]
    pub fn select_hero(id: &str) -> Result<(), JsValue> {
        with_game(|g| g.shop.select_hero(id))
            .unwrap_or(Ok(()))
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Returns a short description of the reward
    #[wasm_bindgen]
    pub fn open_box(id: &str) -> Result<String, JsValue> {
        let reward = with_game(|g| g.shop.open_box(id, &mut rand::rng()))
            .ok_or_else(|| JsValue::from_str("game not started"))?
            .map_err(|e| JsValue::from_str(&e.to_string()))?;
        Ok(match reward {
            BoxReward::Coins(n) => format!("+{n} Coins"),
            BoxReward::Hero(hero) => format!("Unlocked {}!", hero.name),
        })
    }

    #[wasm_bindgen]
    pub fn save_settings(json: &str) -> Result<(), JsValue> {
        let settings: Settings =
            serde_json::from_str(json).map_err(|e| JsValue::from_str(&e.to_string()))?;
        settings.save();
        with_game(|g| {
            g.world.particle_cap = settings.max_particles();
            g.settings = settings;
        });
        Ok(())
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
    log::info!("Brawl Arena (native) starting...");
    log::info!("The playable build targets the browser - run with `trunk serve` for the web version");

    println!("\nRunning headless matches...");
    headless_matches();
}

#[cfg(target_arch = "wasm32")]
fn main() {}

/// Play each mode with an idle player and report how it went
#[cfg(not(target_arch = "wasm32"))]
fn headless_matches() {
    use brawl_arena::Shop;
    use brawl_arena::persistence::MemoryStore;
    use brawl_arena::sim::{GameMode, MatchConfig, PlayerInput, World, tick};
    use glam::Vec2;

    const MAX_FRAMES: u32 = 60 * 60 * 3;
    let display = Vec2::new(1280.0, 720.0);
    let mut input = PlayerInput::default();
    let mut shop = Shop::load(MemoryStore::new());

    for (i, mode) in [GameMode::GemRush, GameMode::Deathmatch, GameMode::BossHunt]
        .into_iter()
        .enumerate()
    {
        let mut world = World::new(MatchConfig {
            mode,
            hero: shop.hero_stats(),
            seed: 0xB0A7 + i as u64,
        });

        for _ in 0..MAX_FRAMES {
            tick(&mut world, &mut input, display);
            world.drain_events();
            world.commentary.clear();
            if !world.is_active() {
                break;
            }
        }

        match world.winner() {
            Some(winner) => {
                let earned = shop.award_match(winner);
                println!(
                    "✓ {:<10} {} won after {} frames (blue {} / red {}), +{} coins",
                    mode.as_str(),
                    winner.as_str(),
                    world.frame,
                    world.score.blue,
                    world.score.red,
                    earned
                );
            }
            None => println!(
                "- {:<10} undecided after {} frames (blue {} / red {})",
                mode.as_str(),
                world.frame,
                world.score.blue,
                world.score.red
            ),
        }
    }

    println!("Coins after session: {}", shop.coins());
}
