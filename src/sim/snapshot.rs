//! HUD summary of a game state

use serde::{Deserialize, Serialize};

use super::state::GameState;
use crate::settings::Settings;
use crate::tuning::Tuning;

/// Everything the HUD overlay shows, in one serializable record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HudSnapshot {
    pub score: u64,
    pub high_score: u64,
    pub level: u32,
    pub combo: u32,
    /// Score multiplier the current combo grants
    pub multiplier: f64,
    pub cities_alive: usize,
    pub is_game_over: bool,
    /// Shake to render, after the player's motion preferences
    pub screen_shake: f64,
}

impl GameState {
    pub fn hud(&self, tuning: &Tuning, settings: &Settings) -> HudSnapshot {
        HudSnapshot {
            score: self.score,
            high_score: self.high_score.max(self.score),
            level: self.level,
            combo: self.combo,
            multiplier: tuning.multiplier(self.combo),
            cities_alive: self.living_cities().count(),
            is_game_over: self.is_game_over,
            screen_shake: settings.shake_amount(self.screen_shake),
        }
    }
}
