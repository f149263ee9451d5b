use crate::memory::DEFAULT_MEMORY_SIZE;

pub const DEFAULT_INSTRUCTIONS_PER_SECOND: u32 = 500;

/// Historical instruction variants. Never auto-detected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quirks {
    /// 8XY6 / 8XYE copy VY into VX before shifting.
    pub legacy_shift: bool,
    /// BNNN jumps to NNN + V0 instead of NNN + VX.
    pub legacy_jump_offset: bool,
}

impl Default for Quirks {
    fn default() -> Self {
        Self {
            legacy_shift: false,
            legacy_jump_offset: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Config {
    pub instructions_per_second: u32,
    pub memory_size: usize,
    pub quirks: Quirks,
}

impl Config {
    /// Seconds per instruction.
    pub fn instruction_period(&self) -> f64 {
        1.0 / f64::from(self.instructions_per_second.max(1))
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            instructions_per_second: DEFAULT_INSTRUCTIONS_PER_SECOND,
            memory_size: DEFAULT_MEMORY_SIZE,
            quirks: Quirks::default(),
        }
    }
}
