//! Player preferences
//!
//! Persisted separately from tuning and high scores.

use serde::{Deserialize, Serialize};

use crate::error::StoreError;
use crate::persistence::Store;

/// Quality preset levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum QualityPreset {
    Low,
    Medium,
    #[default]
    High,
}

impl QualityPreset {
    pub fn as_str(&self) -> &'static str {
        match self {
            QualityPreset::Low => "Low",
            QualityPreset::Medium => "Medium",
            QualityPreset::High => "High",
        }
    }

    /// Maximum live particles for this preset
    pub fn max_particles(&self) -> usize {
        match self {
            QualityPreset::Low => 400,
            QualityPreset::Medium => 1000,
            QualityPreset::High => crate::consts::DEFAULT_MAX_PARTICLES,
        }
    }
}

impl std::str::FromStr for QualityPreset {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "low" => Ok(QualityPreset::Low),
            "medium" | "med" => Ok(QualityPreset::Medium),
            "high" => Ok(QualityPreset::High),
            other => Err(format!("unknown quality preset '{other}'")),
        }
    }
}

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Graphics quality preset
    pub quality: QualityPreset,

    // === Visual Effects ===
    /// Screen shake on impacts
    pub screen_shake: bool,
    /// Particle effects (trails, bursts, debris)
    pub particles: bool,

    // === Audio ===
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,
    pub muted: bool,

    // === Accessibility ===
    /// Reduced motion (no shake)
    pub reduced_motion: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            quality: QualityPreset::High,

            screen_shake: true,
            particles: true,

            master_volume: 0.8,
            sfx_volume: 1.0,
            muted: false,

            reduced_motion: false,
        }
    }
}

impl Settings {
    /// Storage key
    pub const STORAGE_KEY: &'static str = "celestialGuardian_settings";

    /// Create settings from a quality preset
    pub fn from_preset(preset: QualityPreset) -> Self {
        Self {
            quality: preset,
            ..Self::default()
        }
    }

    /// Effective screen shake (respects reduced_motion)
    pub fn effective_screen_shake(&self) -> bool {
        self.screen_shake && !self.reduced_motion
    }

    /// Shake magnitude to render for a simulated magnitude
    pub fn shake_amount(&self, screen_shake: f64) -> f64 {
        if self.effective_screen_shake() {
            screen_shake
        } else {
            0.0
        }
    }

    /// Effective particle count cap
    pub fn max_particles(&self) -> usize {
        if !self.particles {
            0
        } else {
            self.quality.max_particles()
        }
    }

    /// Load settings, falling back to defaults
    pub fn load(store: &impl Store) -> Self {
        match store.load(Self::STORAGE_KEY) {
            Ok(Some(json)) => match serde_json::from_str(&json) {
                Ok(settings) => {
                    log::info!("Loaded settings");
                    return settings;
                }
                Err(e) => log::warn!("Could not parse saved settings: {e}"),
            },
            Ok(None) => {}
            Err(e) => log::warn!("Could not load settings: {e}"),
        }

        log::info!("Using default settings");
        Self::default()
    }

    pub fn save(&self, store: &mut impl Store) -> Result<(), StoreError> {
        store.save(Self::STORAGE_KEY, &serde_json::to_string(self)?)?;
        log::info!("Settings saved");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemoryStore;

    #[test]
    fn test_particle_cap_follows_preset() {
        let mut s = Settings::from_preset(QualityPreset::Low);
        assert_eq!(s.max_particles(), 400);
        s.particles = false;
        assert_eq!(s.max_particles(), 0);
        assert_eq!(Settings::default().max_particles(), 2000);
    }

    #[test]
    fn test_reduced_motion_suppresses_shake() {
        let mut s = Settings::default();
        assert_eq!(s.shake_amount(12.0), 12.0);
        s.reduced_motion = true;
        assert_eq!(s.shake_amount(12.0), 0.0);
    }

    #[test]
    fn test_quality_parse() {
        assert_eq!("MED".parse::<QualityPreset>(), Ok(QualityPreset::Medium));
        assert!("ultra".parse::<QualityPreset>().is_err());
    }

    #[test]
    fn test_round_trip_through_store() {
        let mut store = MemoryStore::default();
        assert_eq!(Settings::load(&store), Settings::default());

        let mut s = Settings::from_preset(QualityPreset::Medium);
        s.muted = true;
        s.save(&mut store).unwrap();
        assert_eq!(Settings::load(&store), s);
    }

    #[test]
    fn test_partial_document_keeps_defaults() {
        let mut store = MemoryStore::default();
        store.save(Settings::STORAGE_KEY, r#"{"reduced_motion":true}"#).unwrap();
        let s = Settings::load(&store);
        assert!(s.reduced_motion);
        assert_eq!(s.quality, QualityPreset::High);
    }
}
