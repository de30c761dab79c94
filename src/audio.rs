//! Audio bridge
//!
//! Turns the simulation's sound buffer into calls on a [`SoundBackend`],
//! with master/sfx volume and mute applied. Synthesis lives in the backend;
//! the browser host plays the cues from JavaScript.

use crate::settings::Settings;
use crate::sim::SoundEvent;

/// Explosion volume when the event doesn't carry one
pub const DEFAULT_EXPLOSION_VOLUME: f32 = 0.15;
/// Base volume of the launch whistle
pub const LAUNCH_VOLUME: f32 = 0.2;
/// Base volume of the city-destroyed rumble
pub const CITY_HIT_VOLUME: f32 = 0.3;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// Interceptor launched (rising whistle)
    Launch,
    /// Filtered noise burst plus low thump
    Explosion,
    /// City destroyed (falling buzz)
    CityHit,
}

impl SoundEffect {
    /// Effect and base volume for a simulation cue
    pub fn for_event(event: &SoundEvent) -> (Self, f32) {
        match event {
            SoundEvent::Launch => (SoundEffect::Launch, LAUNCH_VOLUME),
            SoundEvent::Explosion { volume } => (
                SoundEffect::Explosion,
                volume.map(|v| v as f32).unwrap_or(DEFAULT_EXPLOSION_VOLUME),
            ),
            SoundEvent::CityHit => (SoundEffect::CityHit, CITY_HIT_VOLUME),
        }
    }
}

/// Something that can actually make noise
pub trait SoundBackend {
    fn play(&mut self, effect: SoundEffect, volume: f32);
}

/// Backend that writes cues to the log (headless runs)
#[derive(Debug, Default)]
pub struct LogBackend;

impl SoundBackend for LogBackend {
    fn play(&mut self, effect: SoundEffect, volume: f32) {
        log::trace!("sound {:?} at {:.2}", effect, volume);
    }
}

/// Backend that remembers every cue it was asked to play
#[derive(Debug, Default)]
pub struct RecordingBackend {
    pub played: Vec<(SoundEffect, f32)>,
}

impl SoundBackend for RecordingBackend {
    fn play(&mut self, effect: SoundEffect, volume: f32) {
        self.played.push((effect, volume));
    }
}

/// Audio manager for the game
pub struct AudioManager<B: SoundBackend> {
    backend: B,
    master_volume: f32,
    sfx_volume: f32,
    muted: bool,
}

impl<B: SoundBackend> AudioManager<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            master_volume: 0.8,
            sfx_volume: 1.0,
            muted: false,
        }
    }

    pub fn from_settings(backend: B, settings: &Settings) -> Self {
        let mut audio = Self::new(backend);
        audio.apply_settings(settings);
        audio
    }

    pub fn apply_settings(&mut self, settings: &Settings) {
        self.set_master_volume(settings.master_volume);
        self.set_sfx_volume(settings.sfx_volume);
        self.set_muted(settings.muted);
    }

    /// Set master volume (0.0 - 1.0)
    pub fn set_master_volume(&mut self, vol: f32) {
        self.master_volume = vol.clamp(0.0, 1.0);
    }

    /// Set SFX volume (0.0 - 1.0)
    pub fn set_sfx_volume(&mut self, vol: f32) {
        self.sfx_volume = vol.clamp(0.0, 1.0);
    }

    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    fn effective_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.master_volume * self.sfx_volume
        }
    }

    /// Play one simulation cue
    pub fn play_event(&mut self, event: &SoundEvent) {
        let gain = self.effective_volume();
        if gain <= 0.0 {
            return;
        }
        let (effect, volume) = SoundEffect::for_event(event);
        self.backend.play(effect, volume * gain);
    }

    /// Play every drained cue in order; returns how many were handled
    pub fn flush(&mut self, events: impl IntoIterator<Item = SoundEvent>) -> usize {
        let mut count = 0;
        for event in events {
            self.play_event(&event);
            count += 1;
        }
        count
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }
}
