const TIMER_DEC_PER_SECOND: f64 = 60.0;

/// Countdown that runs on wall-clock time rather than instruction count.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct Timer {
    count: f64,
}

impl Timer {
    pub fn new(init_count: u8) -> Self {
        Self {
            count: f64::from(init_count),
        }
    }

    pub fn set(&mut self, value: u8) {
        self.count = f64::from(value);
    }

    /// Decrease by `dt * 60`, never going below zero.
    pub fn decay(&mut self, dt: f64) {
        if self.count > 0.0 {
            self.count = (self.count - dt * TIMER_DEC_PER_SECOND).max(0.0);
        }
    }

    /// Whole ticks remaining, truncated.
    pub fn get(&self) -> u8 {
        self.count as u8
    }

    pub fn remaining(&self) -> f64 {
        self.count
    }

    pub fn is_active(&self) -> bool {
        self.count > 0.0
    }
}
