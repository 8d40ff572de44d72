//! Browser bindings
//!
//! The page owns the animation frame loop and forwards key events; this side
//! runs the simulation, updates the HUD and keeps progress in LocalStorage.

use wasm_bindgen::prelude::*;

use crate::game_loop::GameLoop;
use crate::platform::{InputState, RenderTarget};
use crate::rewards::{GameRewards, PlayerProgress};
use crate::settings::Settings;
use crate::sim::{GameSessionSummary, SeasonPhase, Snapshot};

const MS_PER_DAY: f64 = 86_400_000.0;

#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    if let Err(e) = console_log::init_with_level(log::Level::Info) {
        web_sys::console::warn_1(&format!("Logger already set: {e}").into());
    }
    log::info!("Duck Season starting...");
}

/// Writes the snapshot into the page's HUD elements
struct DomHud;

impl RenderTarget for DomHud {
    fn present(&mut self, snapshot: &Snapshot) {
        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            return;
        };

        let set_text = |selector: &str, text: String| {
            if let Some(el) = document.query_selector(selector).ok().flatten() {
                el.set_text_content(Some(&text));
            }
        };
        set_text("#hud-hearts .hud-value", snapshot.hearts_remaining.to_string());
        set_text("#hud-time .hud-value", snapshot.time_remaining_seconds.to_string());
        set_text(
            "#hud-level .hud-value",
            format!("{} - {}", snapshot.level_index, snapshot.level_name),
        );
        set_text(
            "#hud-key .hud-value",
            if snapshot.key_collected { "yes" } else { "no" }.to_string(),
        );

        let show = |id: &str, visible: bool| {
            if let Some(el) = document.get_element_by_id(id) {
                let _ = el.set_attribute("class", if visible { "" } else { "hidden" });
            }
        };
        show("season-complete", snapshot.phase == SeasonPhase::SeasonComplete);
        show("season-failed", snapshot.phase == SeasonPhase::SeasonFailed);
        show("level-cleared", snapshot.phase == SeasonPhase::LevelTransition);
    }
}

/// One game instance driven by the page
#[wasm_bindgen]
pub struct DuckGame {
    game: GameLoop,
    input: InputState,
}

#[wasm_bindgen]
impl DuckGame {
    #[wasm_bindgen(constructor)]
    pub fn new(seed: u64) -> Result<DuckGame, JsError> {
        let settings = Settings::load();
        let mut game = GameLoop::with_builtin_levels(&settings, seed, PlayerProgress::load())
            .map_err(|e| JsError::new(&e.to_string()))?;

        let today = (js_sys::Date::now() / MS_PER_DAY) as u32;
        let login = game.daily_login(today);
        if login.xp_awarded > 0 {
            log::info!("Daily login: +{} XP", login.xp_awarded);
            game.progress().save();
        }

        Ok(Self {
            game,
            input: InputState::new(settings.bindings),
        })
    }

    /// Returns true when the key is bound (the page should prevent default)
    pub fn key_down(&mut self, key: &str) -> bool {
        self.input.key_down(key)
    }

    pub fn key_up(&mut self, key: &str) -> bool {
        self.input.key_up(key)
    }

    /// Release all keys when the page loses focus
    pub fn blur(&mut self) {
        self.input.clear();
    }

    /// Advance by `dt` seconds; returns the events raised as JSON
    pub fn update(&mut self, dt: f32) -> String {
        let mut earned = false;
        let mut sink = |summary: &GameSessionSummary, rewards: &GameRewards| {
            log::info!(
                "Season {:016x} scored {}: +{} XP",
                summary.session_id,
                summary.final_score,
                rewards.xp_awarded
            );
            earned = true;
        };
        let events = self.game.update(dt, &self.input, &mut sink);
        if earned {
            self.game.progress().save();
        }
        serde_json::to_string(&events).unwrap_or_default()
    }

    pub fn render_hud(&self) {
        self.game.render(&mut DomHud);
    }

    /// Current snapshot as JSON
    pub fn snapshot(&self) -> String {
        let snapshot = self.game.season().snapshot(self.game.now_ms());
        serde_json::to_string(&snapshot).unwrap_or_default()
    }

    /// Player progress as JSON
    pub fn progress(&self) -> String {
        serde_json::to_string(self.game.progress()).unwrap_or_default()
    }

    /// Per-badge progress as JSON
    pub fn badge_progress(&self) -> String {
        let progress = self.game.progress();
        let badges = self
            .game
            .calculator()
            .badges
            .progress(&progress.counters, &progress.badges);
        serde_json::to_string(&badges).unwrap_or_default()
    }

    pub fn next_level_estimate(&self, xp_per_day: f64) -> String {
        self.game
            .calculator()
            .ladder
            .estimated_time_to_next_level(self.game.progress().counters.total_xp, xp_per_day)
            .to_string()
    }

    pub fn restart(&mut self, seed: u64) {
        self.game.restart(seed);
        self.input.clear();
        log::info!("Started new season with seed: {}", seed);
    }
}
