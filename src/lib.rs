//! Celestial Guardian - A firework missile-defense arcade game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (spawning, movement, collisions, scoring)
//! - `tuning`: Data-driven game balance
//! - `audio`: Sound bridge draining the simulation's sound buffer
//! - `persistence`: Key/value stores for settings, tuning and high scores
//! - `settings`, `highscores`: Player preferences and leaderboard
//! - `platform`: Browser bindings (wasm32 only)

pub mod audio;
pub mod error;
pub mod highscores;
pub mod persistence;
pub mod platform;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use highscores::HighScores;
pub use settings::{QualityPreset, Settings};
pub use sim::{GameState, Simulation, SoundEvent};
pub use tuning::Tuning;

use glam::DVec2;

/// Game configuration constants
///
/// Values the browser game hard-coded rather than exposing for tuning.
pub mod consts {
    /// Reference canvas height; entity speeds and sizes scale by `height / BASE_HEIGHT`
    pub const BASE_HEIGHT: f64 = 750.0;
    /// Nominal host refresh interval (ms) used by headless runs
    pub const NOMINAL_FRAME_MS: f64 = 1000.0 / 60.0;

    /// Missiles at or below `height - GROUND_MARGIN` have struck the ground
    pub const GROUND_MARGIN: f64 = 5.0;
    /// Enemy missiles enter this far above the top edge (scaled)
    pub const MISSILE_SPAWN_HEIGHT: f64 = 20.0;

    /// Explosion radius growth per tick while growing (scaled)
    pub const EXPLOSION_GROW_SPEED: f64 = 5.0;
    /// Explosion radius shrink per tick after peaking (scaled)
    pub const EXPLOSION_SHRINK_SPEED: f64 = 1.8;
    /// Explosion alpha fade per tick after peaking
    pub const EXPLOSION_FADE: f64 = 0.01;
    /// Explosion starting alpha
    pub const EXPLOSION_ALPHA: f64 = 0.4;

    /// Default particle physics
    pub const PARTICLE_FRICTION: f64 = 0.95;
    pub const PARTICLE_GRAVITY: f64 = 0.08;

    /// Screen shake decay per tick, snapped to zero below the threshold
    pub const SCREEN_SHAKE_DECAY: f64 = 0.9;
    pub const SCREEN_SHAKE_CUTOFF: f64 = 0.5;

    /// Round layout
    pub const CITY_COUNT: usize = 6;
    pub const CITY_BASE_WIDTH: f64 = 50.0;
    pub const CITY_WINDOWS: usize = 10;
    pub const STAR_COUNT: usize = 150;

    /// Default particle cap (see `Settings::max_particles`)
    pub const DEFAULT_MAX_PARTICLES: usize = 2000;
}

/// Velocity of magnitude `speed` pointing from `from` toward `to`.
///
/// Uses `atan2`, so coincident points yield a finite velocity along +x
/// instead of NaN.
#[inline]
pub fn aim_velocity(from: DVec2, to: DVec2, speed: f64) -> DVec2 {
    let delta = to - from;
    let angle = delta.y.atan2(delta.x);
    DVec2::new(angle.cos() * speed, angle.sin() * speed)
}

/// `floor(value * rate)` for a non-negative counter, saturating at zero
#[inline]
pub fn decay_floor(value: u32, rate: f64) -> u32 {
    // Float-to-int casts saturate, so a negative or NaN product lands on 0.
    (value as f64 * rate).floor() as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aim_velocity_direction() {
        let v = aim_velocity(DVec2::new(0.0, 0.0), DVec2::new(0.0, 10.0), 3.0);
        assert!(v.x.abs() < 1e-9);
        assert!((v.y - 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_aim_velocity_coincident_points_is_finite() {
        let p = DVec2::new(42.0, 17.0);
        let v = aim_velocity(p, p, 5.0);
        assert!(v.is_finite());
        assert!((v.length() - 5.0).abs() < 1e-9);
    }

    #[test]
    fn test_decay_floor() {
        assert_eq!(decay_floor(9, 0.5), 4);
        assert_eq!(decay_floor(7, 1.0), 7);
        assert_eq!(decay_floor(7, 0.0), 0);
        assert_eq!(decay_floor(7, -0.5), 0);
    }
}
