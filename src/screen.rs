pub const WIDTH: usize = 64;
pub const HEIGHT: usize = 32;

const BYTE_IN_BITS: usize = 8;

/// Monochrome WIDTH x HEIGHT bit grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Screen {
    bit_buffer: Vec<bool>,
}

impl Screen {
    pub fn new() -> Self {
        Self {
            bit_buffer: vec![false; WIDTH * HEIGHT],
        }
    }

    pub fn clear(&mut self) {
        self.bit_buffer.fill(false);
    }

    pub fn is_set(&self, x: usize, y: usize) -> bool {
        self.bit_buffer[y * WIDTH + x]
    }

    pub fn pixels(&self) -> &[bool] {
        &self.bit_buffer
    }

    /// The start position wraps, the sprite itself clips at the edges.
    pub fn paint(&mut self, sprite: &[u8], x: u8, y: u8) -> bool {
        let (x, y) = (x as usize % WIDTH, y as usize % HEIGHT);
        let mut vf = false;

        for (i, row) in sprite.iter().enumerate().take(HEIGHT - y) {
            for j in 0..BYTE_IN_BITS.min(WIDTH - x) {
                if (row >> (BYTE_IN_BITS - 1 - j)) & 1 == 0 {
                    continue;
                }
                let index = (y + i) * WIDTH + x + j;
                if self.bit_buffer[index] {
                    vf = true;
                }
                self.bit_buffer[index] = !self.bit_buffer[index];
            }
        }
        vf
    }
}

impl Default for Screen {
    fn default() -> Self {
        Self::new()
    }
}
