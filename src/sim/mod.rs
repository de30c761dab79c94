//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Seeded RNG only, owned by [`Simulation`]
//! - Stable iteration order (insertion order of each collection)
//! - Entities leave their collections only in the collision cleanup pass
//! - No rendering, audio or platform dependencies

pub mod autopilot;
pub mod collision;
pub mod effects;
pub mod input;
pub mod movement;
pub mod snapshot;
pub mod spawn;
pub mod state;
pub mod tick;

pub use autopilot::Autopilot;
pub use effects::Emitter;
pub use input::{SharedInput, process_input};
pub use snapshot::HudSnapshot;
pub use state::{
    City, Color, EnemyMissile, Explosion, GameState, Interceptor, LaunchCommand, Particle,
    SoundEvent, Star, Window, palette,
};
pub use tick::{Simulation, decay_screen_shake};
