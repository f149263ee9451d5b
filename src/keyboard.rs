use minifb::Key;

pub const KEY_COUNT: usize = 16;

/// Hex keypad state, one flag per key 0x0..=0xF.
#[derive(Debug, Default, Clone)]
pub struct Keypad {
    keys: [bool; KEY_COUNT],
}

impl Keypad {
    pub fn new() -> Self {
        Self {
            keys: [false; KEY_COUNT],
        }
    }

    pub fn press(&mut self, key: u8) {
        self.keys[Self::slot(key)] = true;
    }

    pub fn release(&mut self, key: u8) {
        self.keys[Self::slot(key)] = false;
    }

    pub fn is_pressed(&self, key: u8) -> bool {
        self.keys[Self::slot(key)]
    }

    /// Apply a batch of host key events.
    pub fn update(&mut self, pressed: &[Key], released: &[Key]) {
        for key in pressed.iter().filter_map(|k| key_to_num(*k)) {
            self.press(key);
        }
        for key in released.iter().filter_map(|k| key_to_num(*k)) {
            self.release(key);
        }
    }

    fn slot(key: u8) -> usize {
        assert!((key as usize) < KEY_COUNT, "no hex key {key:#x}");
        key as usize
    }
}

// 1 2 3 C      1 2 3 4
// 4 5 6 D  <-  Q W E R
// 7 8 9 E      A S D F
// A 0 B F      Z X C V
pub fn key_to_num(key: Key) -> Option<u8> {
    match key {
        Key::Key1 => Some(0x1),
        Key::Key2 => Some(0x2),
        Key::Key3 => Some(0x3),
        Key::Key4 => Some(0xC),
        Key::Q => Some(0x4),
        Key::W => Some(0x5),
        Key::E => Some(0x6),
        Key::R => Some(0xD),
        Key::A => Some(0x7),
        Key::S => Some(0x8),
        Key::D => Some(0x9),
        Key::F => Some(0xE),
        Key::Z => Some(0xA),
        Key::X => Some(0x0),
        Key::C => Some(0xB),
        Key::V => Some(0xF),
        _ => None,
    }
}
