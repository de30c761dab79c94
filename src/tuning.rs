//! Game balance tuning
//!
//! Every gameplay-affecting value in one place. The simulation reads it
//! through the `Simulation` context; it is loaded and saved by the host.
//!
//! Field names serialize in camelCase and every table is `#[serde(default)]`,
//! so a partially saved document merges over the defaults.

use serde::{Deserialize, Serialize};

use crate::error::StoreError;
use crate::persistence::Store;

/// Enemy spawn cadence (milliseconds)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SpawnTuning {
    pub base_interval: f64,
    pub min_interval: f64,
    /// Interval reduction per level
    pub level_scale: f64,
}

impl Default for SpawnTuning {
    fn default() -> Self {
        Self {
            base_interval: 2000.0,
            min_interval: 500.0,
            level_scale: 300.0,
        }
    }
}

/// Level derivation weights: `level = floor(time / time_weight + score / score_weight) + 1`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LevelTuning {
    pub time_weight: f64,
    pub score_weight: f64,
}

impl Default for LevelTuning {
    fn default() -> Self {
        Self {
            time_weight: 14000.0,
            score_weight: 4000.0,
        }
    }
}

/// Standard (timer-spawned) missile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct NormalMissileTuning {
    pub base_speed: f64,
    /// Speed added per level
    pub level_bonus: f64,
    pub explosion_radius: f64,
    pub screen_shake: f64,
}

impl Default for NormalMissileTuning {
    fn default() -> Self {
        Self {
            base_speed: 1.0,
            level_bonus: 0.15,
            explosion_radius: 40.0,
            screen_shake: 15.0,
        }
    }
}

/// Fast (penalty) missile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FastMissileTuning {
    pub base_speed: f64,
    /// Uniform random speed added on top of `base_speed`
    pub speed_variance: f64,
    pub explosion_radius: f64,
    pub screen_shake: f64,
}

impl Default for FastMissileTuning {
    fn default() -> Self {
        Self {
            base_speed: 18.0,
            speed_variance: 8.0,
            explosion_radius: 80.0,
            screen_shake: 30.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MissileTuning {
    pub normal: NormalMissileTuning,
    pub fast: FastMissileTuning,
    /// Added to explosion radius for hit detection
    pub hit_margin: f64,
}

impl Default for MissileTuning {
    fn default() -> Self {
        Self {
            normal: NormalMissileTuning::default(),
            fast: FastMissileTuning::default(),
            hit_margin: 6.0,
        }
    }
}

impl MissileTuning {
    /// Ground-impact explosion radius for a missile class
    pub fn impact_radius(&self, is_fast: bool) -> f64 {
        if is_fast {
            self.fast.explosion_radius
        } else {
            self.normal.explosion_radius
        }
    }

    /// Screen shake applied on ground impact
    pub fn screen_shake(&self, is_fast: bool) -> f64 {
        if is_fast {
            self.fast.screen_shake
        } else {
            self.normal.screen_shake
        }
    }
}

/// Player interceptors
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DefenseTuning {
    pub speed: f64,
    pub explosion_radius: f64,
    /// Distance to target that triggers detonation
    pub arrival_distance: f64,
}

impl Default for DefenseTuning {
    fn default() -> Self {
        Self {
            speed: 11.0,
            explosion_radius: 75.0,
            arrival_distance: 12.0,
        }
    }
}

/// Combo added by a direct hit, keyed by missile class
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DirectHitBonus {
    pub normal: u32,
    pub fast: u32,
}

impl Default for DirectHitBonus {
    fn default() -> Self {
        Self { normal: 5, fast: 10 }
    }
}

impl DirectHitBonus {
    pub fn for_missile(&self, is_fast: bool) -> u32 {
        if is_fast { self.fast } else { self.normal }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ComboTuning {
    pub multiplier_per_stack: f64,
    pub decay_rate_on_miss: f64,
    pub decay_rate_on_ground_hit: f64,
    pub decay_rate_on_city_hit: f64,
    pub direct_hit_bonus: DirectHitBonus,
    pub multi_kill_bonus: u32,
}

impl Default for ComboTuning {
    fn default() -> Self {
        Self {
            multiplier_per_stack: 0.2,
            decay_rate_on_miss: 0.5,
            decay_rate_on_ground_hit: 1.0,
            decay_rate_on_city_hit: 1.0,
            direct_hit_bonus: DirectHitBonus::default(),
            multi_kill_bonus: 1,
        }
    }
}

/// Base points for a direct hit, keyed by missile class
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DirectHitPoints {
    pub normal: u32,
    pub fast: u32,
}

impl Default for DirectHitPoints {
    fn default() -> Self {
        Self {
            normal: 50,
            fast: 200,
        }
    }
}

impl DirectHitPoints {
    pub fn for_missile(&self, is_fast: bool) -> u32 {
        if is_fast { self.fast } else { self.normal }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ExplosionHitPoints {
    pub base: u32,
    pub level_bonus: f64,
}

impl Default for ExplosionHitPoints {
    fn default() -> Self {
        Self {
            base: 10,
            level_bonus: 0.1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ScoringTuning {
    pub direct_hit: DirectHitPoints,
    pub explosion_hit: ExplosionHitPoints,
    /// Flat award when a ground-impact blast takes out another missile
    pub chain_hit: u32,
}

impl Default for ScoringTuning {
    fn default() -> Self {
        Self {
            direct_hit: DirectHitPoints::default(),
            explosion_hit: ExplosionHitPoints::default(),
            chain_hit: 10,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PenaltyTuning {
    /// Ground impacts before a fast missile is sent
    pub miss_threshold: u32,
}

impl Default for PenaltyTuning {
    fn default() -> Self {
        Self { miss_threshold: 6 }
    }
}

/// Complete balance table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Tuning {
    pub spawn: SpawnTuning,
    pub level: LevelTuning,
    pub missile: MissileTuning,
    pub defense: DefenseTuning,
    pub combo: ComboTuning,
    pub scoring: ScoringTuning,
    pub direct_hit_radius: f64,
    pub penalty: PenaltyTuning,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            spawn: SpawnTuning::default(),
            level: LevelTuning::default(),
            missile: MissileTuning::default(),
            defense: DefenseTuning::default(),
            combo: ComboTuning::default(),
            scoring: ScoringTuning::default(),
            direct_hit_radius: 15.0,
            penalty: PenaltyTuning::default(),
        }
    }
}

impl Tuning {
    /// Storage key (shared with the browser build's saved config)
    pub const STORAGE_KEY: &'static str = "celestialGuardian_config";

    /// Score multiplier for a combo value
    #[inline]
    pub fn multiplier(&self, combo: u32) -> f64 {
        1.0 + combo as f64 * self.combo.multiplier_per_stack
    }

    /// Parse a (possibly partial) JSON document over the defaults
    pub fn from_json(json: &str) -> Result<Self, StoreError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String, StoreError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Clamp every tunable into the range the tuning panel exposes
    pub fn clamped(mut self) -> Self {
        let s = &mut self.spawn;
        s.base_interval = s.base_interval.clamp(500.0, 5000.0);
        s.min_interval = s.min_interval.clamp(100.0, 2000.0);
        s.level_scale = s.level_scale.clamp(100.0, 1000.0);

        let l = &mut self.level;
        l.time_weight = l.time_weight.clamp(5000.0, 30000.0);
        l.score_weight = l.score_weight.clamp(1000.0, 10000.0);

        let n = &mut self.missile.normal;
        n.base_speed = n.base_speed.clamp(0.5, 5.0);
        n.level_bonus = n.level_bonus.clamp(0.0, 0.5);
        n.explosion_radius = n.explosion_radius.clamp(20.0, 100.0);
        n.screen_shake = n.screen_shake.clamp(0.0, 50.0);

        let f = &mut self.missile.fast;
        f.base_speed = f.base_speed.clamp(10.0, 30.0);
        f.speed_variance = f.speed_variance.clamp(0.0, 20.0);
        f.explosion_radius = f.explosion_radius.clamp(40.0, 150.0);
        f.screen_shake = f.screen_shake.clamp(0.0, 80.0);

        self.missile.hit_margin = self.missile.hit_margin.clamp(0.0, 20.0);

        let d = &mut self.defense;
        d.speed = d.speed.clamp(5.0, 20.0);
        d.explosion_radius = d.explosion_radius.clamp(30.0, 150.0);
        d.arrival_distance = d.arrival_distance.clamp(5.0, 30.0);

        let c = &mut self.combo;
        c.multiplier_per_stack = c.multiplier_per_stack.clamp(0.1, 1.0);
        c.decay_rate_on_miss = c.decay_rate_on_miss.clamp(0.0, 1.0);
        c.decay_rate_on_ground_hit = c.decay_rate_on_ground_hit.clamp(0.0, 1.0);
        c.decay_rate_on_city_hit = c.decay_rate_on_city_hit.clamp(0.0, 1.0);
        c.direct_hit_bonus.normal = c.direct_hit_bonus.normal.clamp(1, 20);
        c.direct_hit_bonus.fast = c.direct_hit_bonus.fast.clamp(1, 30);
        c.multi_kill_bonus = c.multi_kill_bonus.min(5);

        let p = &mut self.scoring;
        p.direct_hit.normal = p.direct_hit.normal.clamp(10, 200);
        p.direct_hit.fast = p.direct_hit.fast.clamp(50, 500);
        p.explosion_hit.base = p.explosion_hit.base.clamp(1, 50);
        p.explosion_hit.level_bonus = p.explosion_hit.level_bonus.clamp(0.0, 0.5);
        p.chain_hit = p.chain_hit.clamp(1, 50);

        self.direct_hit_radius = self.direct_hit_radius.clamp(5.0, 40.0);
        self.penalty.miss_threshold = self.penalty.miss_threshold.clamp(1, 20);

        self
    }

    /// Load from a store, falling back to defaults on absence or corruption
    pub fn load(store: &impl Store) -> Self {
        match store.load(Self::STORAGE_KEY) {
            Ok(Some(json)) => match Self::from_json(&json) {
                Ok(tuning) => {
                    log::info!("Loaded tuning from store");
                    return tuning.clamped();
                }
                Err(e) => log::warn!("Could not parse saved tuning: {e}"),
            },
            Ok(None) => {}
            Err(e) => log::warn!("Could not load tuning: {e}"),
        }

        log::info!("Using default tuning");
        Self::default()
    }

    pub fn save(&self, store: &mut impl Store) -> Result<(), StoreError> {
        store.save(Self::STORAGE_KEY, &self.to_json()?)?;
        log::info!("Tuning saved");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemoryStore;

    #[test]
    fn test_defaults_match_shipped_balance() {
        let t = Tuning::default();
        assert_eq!(t.spawn.base_interval, 2000.0);
        assert_eq!(t.level.time_weight, 14000.0);
        assert_eq!(t.combo.direct_hit_bonus.normal, 5);
        assert_eq!(t.scoring.direct_hit.fast, 200);
        assert_eq!(t.direct_hit_radius, 15.0);
        assert_eq!(t.penalty.miss_threshold, 6);
    }

    #[test]
    fn test_partial_json_merges_over_defaults() {
        let json = r#"{"combo":{"decayRateOnMiss":0.25,"directHitBonus":{"fast":12}},"directHitRadius":20}"#;
        let t = Tuning::from_json(json).unwrap();
        assert_eq!(t.combo.decay_rate_on_miss, 0.25);
        assert_eq!(t.combo.direct_hit_bonus.fast, 12);
        // Untouched siblings keep their defaults
        assert_eq!(t.combo.direct_hit_bonus.normal, 5);
        assert_eq!(t.combo.multiplier_per_stack, 0.2);
        assert_eq!(t.direct_hit_radius, 20.0);
        assert_eq!(t.spawn, SpawnTuning::default());
    }

    #[test]
    fn test_clamped_bounds_decay_rates() {
        let mut t = Tuning::default();
        t.combo.decay_rate_on_miss = 3.0;
        t.combo.decay_rate_on_city_hit = -1.0;
        t.penalty.miss_threshold = 0;
        let t = t.clamped();
        assert_eq!(t.combo.decay_rate_on_miss, 1.0);
        assert_eq!(t.combo.decay_rate_on_city_hit, 0.0);
        assert_eq!(t.penalty.miss_threshold, 1);
    }

    #[test]
    fn test_defaults_survive_clamping() {
        assert_eq!(Tuning::default().clamped(), Tuning::default());
    }

    #[test]
    fn test_multiplier() {
        let t = Tuning::default();
        assert_eq!(t.multiplier(0), 1.0);
        assert_eq!(t.multiplier(5), 2.0);
    }

    #[test]
    fn test_load_save_through_store() {
        let mut store = MemoryStore::default();
        assert_eq!(Tuning::load(&store), Tuning::default());

        let mut t = Tuning::default();
        t.defense.speed = 14.0;
        t.save(&mut store).unwrap();
        assert_eq!(Tuning::load(&store).defense.speed, 14.0);
    }

    #[test]
    fn test_load_corrupt_falls_back() {
        let mut store = MemoryStore::default();
        store.save(Tuning::STORAGE_KEY, "{not json").unwrap();
        assert_eq!(Tuning::load(&store), Tuning::default());
    }
}
