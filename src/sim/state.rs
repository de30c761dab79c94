//! Game state and core simulation types
//!
//! Entities are plain data. Each lives in exactly one collection on
//! [`GameState`] and never references another entity; removal happens only
//! in the collision engine's cleanup pass.

use glam::DVec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::aim_velocity;
use crate::consts::*;
use crate::tuning::Tuning;

/// Packed 0xRRGGBB color
pub type Color = u32;

/// Named colors used by the simulation's effects
pub mod palette {
    use super::Color;

    /// Interceptor colors, picked at random per launch
    pub const INTERCEPTOR: [Color; 7] = [
        0xff0055, 0x00ffcc, 0xffcc00, 0xff00ff, 0x0099ff, 0xffffff, 0xff6600,
    ];
    pub const WHITE: Color = 0xffffff;
    pub const FAST_MISSILE: Color = 0xff00ff;
    pub const MISSILE_TRAIL: Color = 0xff4400;
    pub const MISSILE_IMPACT: Color = 0xff3300;
    pub const DEBRIS: Color = 0x555555;
    pub const CITY: Color = 0x1a1a2e;
    /// Golden starburst for direct hits
    pub const DIRECT_HIT: [Color; 4] = [0xffcc00, 0xffffff, 0xff9900, 0xffff00];
}

/// Audio cue queued by the simulation for the host to play
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum SoundEvent {
    /// Interceptor launched
    Launch,
    /// Any blast; `None` means the player's default volume
    Explosion {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        volume: Option<f64>,
    },
    /// A city was destroyed
    CityHit,
}

/// Buffered player command: launch an interceptor toward a point
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LaunchCommand {
    pub target: DVec2,
}

/// A descending enemy warhead
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnemyMissile {
    pub pos: DVec2,
    pub vel: DVec2,
    pub origin: DVec2,
    pub target: DVec2,
    pub active: bool,
    /// Penalty missile: faster, aimed precisely, immune to blast radius
    pub is_fast: bool,
    /// Animation phase (render only)
    pub flicker: f64,
}

impl EnemyMissile {
    pub fn new(origin: DVec2, target: DVec2, speed: f64, is_fast: bool) -> Self {
        Self {
            pos: origin,
            vel: aim_velocity(origin, target, speed),
            origin,
            target,
            active: true,
            is_fast,
            flicker: 0.0,
        }
    }
}

/// A player-launched firework shell
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Interceptor {
    pub pos: DVec2,
    pub vel: DVec2,
    pub origin: DVec2,
    pub target: DVec2,
    pub active: bool,
    pub color: Color,
}

impl Interceptor {
    pub fn new(origin: DVec2, target: DVec2, speed: f64, color: Color) -> Self {
        Self {
            pos: origin,
            vel: aim_velocity(origin, target, speed),
            origin,
            target,
            active: true,
            color,
        }
    }
}

/// An expanding then fading blast
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Explosion {
    pub pos: DVec2,
    pub color: Color,
    pub radius: f64,
    pub max_radius: f64,
    pub growing: bool,
    pub alpha: f64,
    /// Interceptor detonation (scores kills) vs ground impact (chain hits only)
    pub is_player: bool,
    /// Already credited a kill; further kills earn the multi-kill bonus
    pub has_hit_enemy: bool,
    pub active: bool,
}

impl Explosion {
    pub fn new(pos: DVec2, color: Color, max_radius: f64, is_player: bool) -> Self {
        Self {
            pos,
            color,
            radius: 0.0,
            max_radius,
            growing: true,
            alpha: EXPLOSION_ALPHA,
            is_player,
            has_hit_enemy: false,
            active: true,
        }
    }
}

/// A cosmetic particle (not gameplay-affecting)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Particle {
    pub pos: DVec2,
    pub vel: DVec2,
    pub color: Color,
    pub alpha: f64,
    pub friction: f64,
    pub gravity: f64,
    /// Alpha lost per tick
    pub decay: f64,
    pub size: f64,
    pub active: bool,
}

/// Decorative window on a city skyline
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Window {
    /// Offset from the city's top-left corner
    pub offset: DVec2,
    pub lit: bool,
}

/// A defended city
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct City {
    /// Left edge
    pub x: f64,
    pub width: f64,
    pub height: f64,
    pub is_alive: bool,
    pub color: Color,
    pub windows: Vec<Window>,
}

impl City {
    /// Build a city whose left edge is `x`, with randomized height and windows
    pub fn new<R: Rng>(rng: &mut R, x: f64, base_width: f64, scale: f64) -> Self {
        let height = (40.0 + rng.random::<f64>() * 40.0) * scale;
        let windows = (0..CITY_WINDOWS)
            .map(|_| {
                let ox = (5.0 + rng.random::<f64>() * (base_width - 10.0)) * scale;
                let oy = (5.0 + rng.random::<f64>() * 30.0) * scale;
                Window {
                    offset: DVec2::new(ox, oy),
                    lit: rng.random::<f64>() > 0.3,
                }
            })
            .collect();

        Self {
            x,
            width: base_width * scale,
            height,
            is_alive: true,
            color: palette::CITY,
            windows,
        }
    }

    #[inline]
    pub fn center_x(&self) -> f64 {
        self.x + self.width / 2.0
    }
}

/// A twinkling background star
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Star {
    pub pos: DVec2,
    pub size: f64,
    /// Signed alpha change per tick; flips at the [0, 1] bounds
    pub blink_speed: f64,
    pub alpha: f64,
}

impl Star {
    pub fn new<R: Rng>(rng: &mut R, width: f64, height: f64) -> Self {
        let mut star = Self {
            pos: DVec2::ZERO,
            size: 0.0,
            blink_speed: 0.0,
            alpha: 0.0,
        };
        star.scatter(rng, width, height);
        star
    }

    /// Re-roll position and twinkle within the upper 70% of the screen
    pub fn scatter<R: Rng>(&mut self, rng: &mut R, width: f64, height: f64) {
        self.pos = DVec2::new(
            rng.random::<f64>() * width,
            rng.random::<f64>() * (height * 0.7),
        );
        self.size = rng.random::<f64>() * 1.5;
        self.blink_speed = 0.01 + rng.random::<f64>() * 0.05;
        self.alpha = rng.random::<f64>();
    }
}

/// Complete game state (deterministic, serializable)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    pub score: u64,
    pub high_score: u64,
    /// Derived by the spawn controller; starts at 1
    pub level: u32,
    pub combo: u32,
    /// One-way latch set when every city is destroyed
    pub is_game_over: bool,
    pub screen_shake: f64,
    /// Ground impacts since the last penalty missile
    pub missed_count: u32,
    /// Milliseconds since the last spawn
    pub spawn_timer: f64,
    pub spawn_interval: f64,
    /// Milliseconds of play this round
    pub level_timer: f64,

    pub width: f64,
    pub height: f64,
    /// `height / BASE_HEIGHT`
    pub scale: f64,

    pub missiles: Vec<EnemyMissile>,
    pub interceptors: Vec<Interceptor>,
    pub explosions: Vec<Explosion>,
    pub particles: Vec<Particle>,
    pub cities: Vec<City>,
    pub stars: Vec<Star>,

    /// Pending launches, drained at the start of the next tick
    pub input_buffer: Vec<LaunchCommand>,
    /// Audio cues produced this tick; the host drains it every frame
    pub sound_buffer: Vec<SoundEvent>,
}

impl GameState {
    /// An empty playfield (no cities or stars)
    pub fn new(width: f64, height: f64, tuning: &Tuning) -> Self {
        Self {
            score: 0,
            high_score: 0,
            level: 1,
            combo: 0,
            is_game_over: false,
            screen_shake: 0.0,
            missed_count: 0,
            spawn_timer: 0.0,
            spawn_interval: tuning.spawn.base_interval,
            level_timer: 0.0,
            width,
            height,
            scale: scale_for_height(height),
            missiles: Vec::new(),
            interceptors: Vec::new(),
            explosions: Vec::new(),
            particles: Vec::new(),
            cities: Vec::new(),
            stars: Vec::new(),
            input_buffer: Vec::new(),
            sound_buffer: Vec::new(),
        }
    }

    /// Queue a launch toward `(x, y)` for the next tick
    ///
    /// Returns false (and drops the command) for non-finite coordinates.
    pub fn submit_launch(&mut self, x: f64, y: f64) -> bool {
        if !x.is_finite() || !y.is_finite() {
            log::warn!("Ignoring launch toward non-finite point ({x}, {y})");
            return false;
        }
        self.input_buffer.push(LaunchCommand {
            target: DVec2::new(x, y),
        });
        true
    }

    /// Take this tick's sound events, leaving the buffer empty
    pub fn drain_sounds(&mut self) -> Vec<SoundEvent> {
        std::mem::take(&mut self.sound_buffer)
    }

    /// Missiles at or below this line have struck the ground
    #[inline]
    pub fn ground_y(&self) -> f64 {
        self.height - GROUND_MARGIN
    }

    /// Fixed interceptor launch point (bottom center)
    #[inline]
    pub fn launch_origin(&self) -> DVec2 {
        DVec2::new(self.width / 2.0, self.height)
    }

    pub fn living_cities(&self) -> impl Iterator<Item = &City> {
        self.cities.iter().filter(|c| c.is_alive)
    }

    pub fn any_city_alive(&self) -> bool {
        self.cities.iter().any(|c| c.is_alive)
    }
}

/// Scale factor relative to the reference height
pub fn scale_for_height(height: f64) -> f64 {
    if height > 0.0 && height.is_finite() {
        height / BASE_HEIGHT
    } else {
        1.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_new_state_defaults() {
        let state = GameState::new(1000.0, 1500.0, &Tuning::default());
        assert_eq!(state.level, 1);
        assert_eq!(state.spawn_interval, 2000.0);
        assert_eq!(state.scale, 2.0);
        assert!(!state.is_game_over);
        assert_eq!(state.launch_origin(), DVec2::new(500.0, 1500.0));
    }

    #[test]
    fn test_submit_launch_rejects_non_finite() {
        let mut state = GameState::new(800.0, 750.0, &Tuning::default());
        assert!(state.submit_launch(10.0, 20.0));
        assert!(!state.submit_launch(f64::NAN, 20.0));
        assert!(!state.submit_launch(10.0, f64::INFINITY));
        assert_eq!(state.input_buffer.len(), 1);
    }

    #[test]
    fn test_sound_event_wire_format() {
        let json = serde_json::to_string(&[
            SoundEvent::Launch,
            SoundEvent::Explosion { volume: Some(0.25) },
            SoundEvent::Explosion { volume: None },
            SoundEvent::CityHit,
        ])
        .unwrap();
        assert_eq!(
            json,
            r#"[{"type":"launch"},{"type":"explosion","volume":0.25},{"type":"explosion"},{"type":"cityHit"}]"#
        );
    }

    #[test]
    fn test_city_geometry() {
        let mut rng = Pcg32::seed_from_u64(3);
        let city = City::new(&mut rng, 100.0, 50.0, 2.0);
        assert_eq!(city.width, 100.0);
        assert_eq!(city.center_x(), 150.0);
        assert!(city.height >= 80.0 && city.height < 160.0);
        assert_eq!(city.windows.len(), CITY_WINDOWS);
    }

    #[test]
    fn test_star_stays_in_upper_sky() {
        let mut rng = Pcg32::seed_from_u64(11);
        for _ in 0..100 {
            let star = Star::new(&mut rng, 800.0, 600.0);
            assert!(star.pos.y < 420.0);
            assert!(star.blink_speed >= 0.01 && star.blink_speed < 0.06);
        }
    }

    #[test]
    fn test_scale_guard() {
        assert_eq!(scale_for_height(750.0), 1.0);
        assert_eq!(scale_for_height(0.0), 1.0);
        assert_eq!(scale_for_height(f64::NAN), 1.0);
    }
}
