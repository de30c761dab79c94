//! Input adapter
//!
//! Player commands are buffered between ticks and turned into interceptors
//! at the start of the next tick.

use std::sync::{Arc, Mutex};

use rand::Rng;

use super::state::{GameState, Interceptor, LaunchCommand, SoundEvent, palette};
use crate::tuning::Tuning;

/// Turn every buffered launch into an interceptor, then clear the buffer
///
/// Commands that arrive after game over are discarded.
pub fn process_input<R: Rng>(state: &mut GameState, tuning: &Tuning, rng: &mut R) {
    let commands = std::mem::take(&mut state.input_buffer);
    if state.is_game_over {
        return;
    }

    let origin = state.launch_origin();
    let speed = tuning.defense.speed * state.scale;

    for command in commands {
        let color = palette::INTERCEPTOR[rng.random_range(0..palette::INTERCEPTOR.len())];
        state
            .interceptors
            .push(Interceptor::new(origin, command.target, speed, color));
        state.sound_buffer.push(SoundEvent::Launch);
    }
}

/// Launch queue shared between event handlers and the tick loop
///
/// Handlers on any thread push commands; the thread that owns the
/// [`GameState`] moves them into `input_buffer` before advancing.
#[derive(Debug, Clone, Default)]
pub struct SharedInput {
    queue: Arc<Mutex<Vec<LaunchCommand>>>,
}

impl SharedInput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a launch; non-finite points are dropped
    pub fn push(&self, x: f64, y: f64) -> bool {
        if !x.is_finite() || !y.is_finite() {
            log::warn!("Ignoring launch toward non-finite point ({x}, {y})");
            return false;
        }
        let command = LaunchCommand {
            target: glam::DVec2::new(x, y),
        };
        match self.queue.lock() {
            Ok(mut queue) => queue.push(command),
            Err(poisoned) => poisoned.into_inner().push(command),
        }
        true
    }

    /// Move every queued command into the state's input buffer
    pub fn drain_into(&self, state: &mut GameState) -> usize {
        let mut queue = match self.queue.lock() {
            Ok(queue) => queue,
            Err(poisoned) => poisoned.into_inner(),
        };
        let count = queue.len();
        state.input_buffer.append(&mut queue);
        count
    }

    pub fn len(&self) -> usize {
        match self.queue.lock() {
            Ok(queue) => queue.len(),
            Err(poisoned) => poisoned.into_inner().len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
