//! Browser host bindings
//!
//! JavaScript owns the canvas, the audio context and the animation frame
//! loop. It forwards clicks to [`WebGame::submit_launch`], calls
//! [`WebGame::frame`] once per `requestAnimationFrame`, plays the returned
//! sound cues and draws from [`WebGame::snapshot_json`].

use wasm_bindgen::prelude::*;

use crate::consts::NOMINAL_FRAME_MS;
use crate::highscores::HighScores;
use crate::persistence::LocalStore;
use crate::settings::Settings;
use crate::sim::{Autopilot, GameState, Simulation};
use crate::tuning::Tuning;

#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    if console_log::init_with_level(log::Level::Info).is_err() {
        web_sys::console::warn_1(&"Logger already initialized".into());
    }
    log::info!("Celestial Guardian starting...");
}

/// Game instance holding all state
#[wasm_bindgen]
pub struct WebGame {
    sim: Simulation,
    state: GameState,
    settings: Settings,
    high_scores: HighScores,
    store: LocalStore,
    autopilot: Option<Autopilot>,
    last_time: Option<f64>,
    /// Finished round already written to the leaderboard
    recorded: bool,
}

#[wasm_bindgen]
impl WebGame {
    #[wasm_bindgen(constructor)]
    pub fn new(width: f64, height: f64) -> WebGame {
        let store = LocalStore::new();
        let tuning = Tuning::load(&store);
        let settings = Settings::load(&store);
        let high_scores = HighScores::load(&store);

        let mut sim = Simulation::from_entropy(tuning).with_max_particles(settings.max_particles());
        let mut state = sim.new_round(width, height);
        state.high_score = high_scores.top_score().unwrap_or(0);

        WebGame {
            sim,
            state,
            settings,
            high_scores,
            store,
            autopilot: None,
            last_time: None,
            recorded: false,
        }
    }

    /// Buffer a launch toward a canvas point
    pub fn submit_launch(&mut self, x: f64, y: f64) -> bool {
        self.state.submit_launch(x, y)
    }

    /// Let the autopilot play (attract screen)
    pub fn set_idle(&mut self, idle: bool) {
        self.autopilot = idle.then(Autopilot::default);
    }

    /// Advance one animation frame; returns this frame's sound cues as JSON
    pub fn frame(&mut self, timestamp: f64) -> String {
        let delta_ms = match self.last_time {
            Some(last) => timestamp - last,
            None => NOMINAL_FRAME_MS,
        };
        self.last_time = Some(timestamp);

        if let Some(pilot) = &mut self.autopilot {
            pilot.update(&mut self.state, self.sim.tuning(), delta_ms);
        }

        self.sim.advance(&mut self.state, delta_ms);

        if self.state.is_game_over && !self.recorded {
            self.recorded = true;
            if self.autopilot.is_none() {
                self.record_score();
            }
        }

        serde_json::to_string(&self.state.drain_sounds()).unwrap_or_else(|e| {
            log::warn!("Could not encode sound events: {e}");
            "[]".to_string()
        })
    }

    /// Full game state for the renderer
    pub fn snapshot_json(&self) -> String {
        serde_json::to_string(&self.state).unwrap_or_else(|e| {
            log::warn!("Could not encode snapshot: {e}");
            "{}".to_string()
        })
    }

    /// Score, combo and friends for the HUD overlay
    pub fn hud_json(&self) -> String {
        let hud = self.state.hud(self.sim.tuning(), &self.settings);
        serde_json::to_string(&hud).unwrap_or_else(|_| "{}".to_string())
    }

    /// Leaderboard entries as JSON
    pub fn high_scores_json(&self) -> String {
        serde_json::to_string(&self.high_scores).unwrap_or_else(|_| "{}".to_string())
    }

    pub fn restart(&mut self) {
        self.sim.restart(&mut self.state);
        self.recorded = false;
        self.last_time = None;
    }

    pub fn resize(&mut self, width: f64, height: f64) {
        self.sim.resize(&mut self.state, width, height);
    }

    /// Apply and persist a (possibly partial) tuning document
    pub fn set_tuning_json(&mut self, json: &str) -> Result<(), JsValue> {
        let tuning = Tuning::from_json(json).map_err(|e| JsValue::from_str(&e.to_string()))?;
        self.sim.set_tuning(tuning);
        self.sim
            .tuning()
            .save(&mut self.store)
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    pub fn tuning_json(&self) -> String {
        self.sim.tuning().to_json().unwrap_or_else(|_| "{}".to_string())
    }

    /// Apply and persist player preferences
    pub fn set_settings_json(&mut self, json: &str) -> Result<(), JsValue> {
        let settings: Settings =
            serde_json::from_str(json).map_err(|e| JsValue::from_str(&e.to_string()))?;
        self.sim.set_max_particles(settings.max_particles());
        self.settings = settings;
        self.settings
            .save(&mut self.store)
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }
}

impl WebGame {
    fn record_score(&mut self) {
        if self
            .high_scores
            .record(&self.state, js_sys::Date::now())
            .is_some()
        {
            if let Err(e) = self.high_scores.save(&mut self.store) {
                log::warn!("Could not save high scores: {e}");
            }
        }
    }
}
