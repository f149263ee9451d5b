use std::time::{Duration, Instant};

use log::debug;
use minifb::{Key, KeyRepeat, Scale, Window, WindowOptions};

use crate::{
    keyboard::Keypad,
    peripherals::Display,
    screen::{Screen, HEIGHT, WIDTH},
};

const LIT: u32 = 0x00FF_FFFF;
const UNLIT: u32 = 0x0000_0000;

#[derive(Clone, Copy)]
pub struct WindowConfig {
    pub scale: Scale,
    pub refresh_rate: u32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            scale: Scale::X16,
            refresh_rate: 60,
        }
    }
}

/// minifb window over a [`Screen`] and a [`Keypad`].
///
/// The window only refreshes at `refresh_rate`, so the instruction rate
/// is not capped by vsync.
pub struct WindowDisplay {
    screen: Screen,
    keypad: Keypad,
    pixel_buffer: Vec<u32>,
    window: Window,
    refresh_interval: Duration,
    last_refresh: Instant,
    dirty: bool,
    // events already pumped by the last present_frame
    pumped: bool,
}

impl WindowDisplay {
    pub fn new(title: &str, config: WindowConfig) -> Result<Self, minifb::Error> {
        let window = Window::new(
            title,
            WIDTH,
            HEIGHT,
            WindowOptions {
                scale: config.scale,
                ..WindowOptions::default()
            },
        )?;
        debug!("opened {WIDTH}x{HEIGHT} window at {} Hz", config.refresh_rate);

        Ok(Self {
            screen: Screen::new(),
            keypad: Keypad::new(),
            pixel_buffer: vec![UNLIT; WIDTH * HEIGHT],
            window,
            refresh_interval: Duration::from_secs_f64(1.0 / f64::from(config.refresh_rate.max(1))),
            last_refresh: Instant::now(),
            dirty: true,
            pumped: false,
        })
    }

    fn sync(&mut self) -> Result<(), minifb::Error> {
        if self.dirty {
            for (pixel, lit) in self.pixel_buffer.iter_mut().zip(self.screen.pixels()) {
                *pixel = if *lit { LIT } else { UNLIT };
            }
            self.dirty = false;
        }
        self.window
            .update_with_buffer(&self.pixel_buffer, WIDTH, HEIGHT)
    }
}

impl Display for WindowDisplay {
    fn clear_screen(&mut self) {
        self.screen.clear();
        self.dirty = true;
    }

    fn draw_sprite(&mut self, sprite: &[u8], x: u8, y: u8) -> bool {
        self.dirty = true;
        self.screen.paint(sprite, x, y)
    }

    fn is_key_pressed(&self, key: u8) -> bool {
        self.keypad.is_pressed(key)
    }

    fn should_terminate(&self) -> bool {
        !self.window.is_open() || self.window.is_key_down(Key::Escape)
    }

    fn present_frame(&mut self) {
        if self.last_refresh.elapsed() < self.refresh_interval {
            return;
        }
        self.last_refresh = Instant::now();
        if let Err(err) = self.sync() {
            log::error!("window update failed: {err}");
        }
        self.pumped = true;
    }

    // update_with_buffer only runs at refresh_rate, so pump key events here
    // as well or short taps between two refreshes are lost
    fn poll_input(&mut self) {
        if !self.pumped {
            self.window.update();
        }
        self.pumped = false;
        let pressed = self.window.get_keys_pressed(KeyRepeat::No);
        let released = self.window.get_keys_released();
        self.keypad.update(&pressed, &released);
    }
}
