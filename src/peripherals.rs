//! Collaborators the machine talks to but does not own.

use rand::{rngs::ThreadRng, Rng};

/// Pixel output, key input and the window lifecycle.
pub trait Display {
    fn clear_screen(&mut self);

    /// XOR `sprite` in at `(x, y)`; true when a lit pixel was switched off.
    fn draw_sprite(&mut self, sprite: &[u8], x: u8, y: u8) -> bool;

    fn is_key_pressed(&self, key: u8) -> bool;

    fn should_terminate(&self) -> bool;

    fn present_frame(&mut self);

    fn poll_input(&mut self);
}

pub trait RandomSource {
    /// Uniform over 0..=255.
    fn next_byte(&mut self) -> u8;
}

pub struct ThreadRandom {
    rng: ThreadRng,
}

impl ThreadRandom {
    pub fn new() -> Self {
        Self {
            rng: rand::thread_rng(),
        }
    }
}

impl Default for ThreadRandom {
    fn default() -> Self {
        Self::new()
    }
}

impl RandomSource for ThreadRandom {
    fn next_byte(&mut self) -> u8 {
        self.rng.gen()
    }
}

/// Buzzer driven by the sound timer.
pub trait Audio {
    fn set_active(&mut self, active: bool);
}

/// Silent buzzer.
#[derive(Debug, Default)]
pub struct Mute;

impl Audio for Mute {
    fn set_active(&mut self, _active: bool) {}
}
