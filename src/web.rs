//! Browser facade
//!
//! Wraps the controller for a JS shell. The shell owns rendering, the 1 Hz
//! intervals and the transition delay; everything else flows through here as
//! JSON event lists.

use std::fmt::Display;

use wasm_bindgen::prelude::*;

use crate::audio::{AudioManager, SoundEffect};
use crate::battle::{BattleController, BattleEvent, FixedStage};
use crate::highscores::HighScores;
use crate::problems::{Difficulty, OperationType};
use crate::settings::Settings;
use crate::tuning::Rules;

fn to_js(err: impl Display) -> JsValue {
    JsValue::from_str(&err.to_string())
}

fn random_seed() -> u64 {
    (js_sys::Math::random() * u32::MAX as f64) as u64 ^ js_sys::Date::now() as u64
}

/// Install the panic hook and console logger once the module loads
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);
    log::info!("Math Battle core loaded");
}

/// One browser game: controller plus persisted settings and scores
#[wasm_bindgen]
pub struct WebBattle {
    controller: BattleController<FixedStage>,
    settings: Settings,
    high_scores: HighScores,
    audio: AudioManager,
    last_rank: Option<usize>,
}

#[wasm_bindgen]
impl WebBattle {
    #[wasm_bindgen(constructor)]
    pub fn new() -> WebBattle {
        let settings = Settings::load();
        WebBattle {
            controller: BattleController::new(random_seed()),
            audio: AudioManager::new(settings.muted),
            settings,
            high_scores: HighScores::load(),
            last_rank: None,
        }
    }

    /// Replace balance rules from JSON. Only allowed from the menu.
    pub fn load_rules(&mut self, json: &str) -> Result<(), JsValue> {
        if self.controller.state().is_game_started() {
            return Err(to_js("rules can only change in the menu"));
        }
        let rules = Rules::from_json(json).map_err(to_js)?;
        self.controller = BattleController::with_rules(random_seed(), rules);
        Ok(())
    }

    /// Store the menu selection. Returns false for unknown names.
    pub fn select(&mut self, operation: &str, table: u32, difficulty: &str) -> bool {
        let (Some(operation), Some(difficulty)) =
            (OperationType::from_str(operation), Difficulty::from_str(difficulty))
        else {
            return false;
        };
        self.settings.select(operation, table, difficulty);
        self.settings.save();
        true
    }

    /// Settings as JSON
    pub fn settings_json(&self) -> Result<String, JsValue> {
        serde_json::to_string(&self.settings).map_err(to_js)
    }

    pub fn toggle_mute(&mut self) -> bool {
        let muted = self.settings.toggle_mute();
        self.audio.set_muted(muted);
        self.settings.save();
        muted
    }

    pub fn start(&mut self) -> Result<(), JsValue> {
        self.last_rank = None;
        let config = self.settings.generator_config();
        self.controller
            .start(config, js_sys::Date::now())
            .map_err(to_js)
    }

    pub fn restart(&mut self) -> Result<(), JsValue> {
        self.last_rank = None;
        self.controller.restart(js_sys::Date::now()).map_err(to_js)
    }

    pub fn return_to_menu(&mut self) -> Result<(), JsValue> {
        self.controller.return_to_menu().map_err(to_js)
    }

    /// Submit typed text; resolves to the outcome as JSON
    pub fn submit_answer(&mut self, raw: &str) -> Result<String, JsValue> {
        let outcome = self
            .controller
            .submit_answer(raw, js_sys::Date::now())
            .map_err(to_js)?;
        serde_json::to_string(&outcome).map_err(to_js)
    }

    pub fn session_tick(&mut self) {
        self.controller.session_tick();
    }

    pub fn question_tick(&mut self) {
        self.controller.question_tick(js_sys::Date::now());
    }

    pub fn finish_transition(&mut self) -> Result<(), JsValue> {
        self.controller
            .finish_transition(js_sys::Date::now())
            .map_err(to_js)
    }

    /// Move the hero used for power-up pickup checks
    pub fn set_hero_position(&mut self, x: f32, y: f32, z: f32) {
        self.controller.stage_mut().hero = glam::Vec3::new(x, y, z);
    }

    /// Queued events as a JSON array, each with its banner text attached
    pub fn drain_events(&mut self) -> Result<String, JsValue> {
        let events = self.controller.drain_events();
        for event in &events {
            if let Some(effect) = SoundEffect::for_event(event) {
                self.audio.play(effect);
            }
            if let BattleEvent::GameOver { final_score } = event {
                let config = *self.controller.generator().config();
                self.last_rank =
                    self.high_scores
                        .add_score(final_score, &config, js_sys::Date::now());
                if self.last_rank.is_some() {
                    self.high_scores.save();
                }
            }
        }

        let payload: Vec<serde_json::Value> = events
            .iter()
            .map(|event| {
                serde_json::json!({
                    "event": event,
                    "banner": event.banner(),
                })
            })
            .collect();
        serde_json::to_string(&payload).map_err(to_js)
    }

    /// Full battle state as JSON
    pub fn state_json(&self) -> Result<String, JsValue> {
        serde_json::to_string(self.controller.state()).map_err(to_js)
    }

    pub fn high_scores_json(&self) -> Result<String, JsValue> {
        serde_json::to_string(&self.high_scores).map_err(to_js)
    }

    /// Leaderboard rank of the last finished session, 0 if it didn't place
    pub fn last_rank(&self) -> u32 {
        self.last_rank.map(|r| r as u32).unwrap_or(0)
    }
}

impl Default for WebBattle {
    fn default() -> Self {
        Self::new()
    }
}
