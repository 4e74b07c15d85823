use std::cell::RefCell;
use std::rc::Rc;

use minifb::{Key, KeyRepeat, Scale, Window, WindowOptions};

pub const WIDTH: usize = 64;
pub const HEIGHT: usize = 32;

const PIXEL_ON: u32 = 0x007FFF; // (0, 127, 255)
const PIXEL_OFF: u32 = 0x000000;

/// Where sprites land. The machine only ever toggles single pixels and
/// asks for the result, so anything from a window to a test buffer can
/// sit behind this.
pub trait DisplayPort {
    /// XOR the pixel at (x, y) and return its new state. The caller
    /// derives collision from a `false` result, the pixel was on and
    /// the toggle turned it off.
    fn set_pixel(&mut self, x: u8, y: u8) -> bool;

    /// Turn every pixel off.
    fn clear(&mut self);

    /// Flush to the visible surface, called once per draw instruction.
    fn present(&mut self);
}

// Lets a host keep a handle on the surface it injected.
impl<T: DisplayPort> DisplayPort for Rc<RefCell<T>> {
    fn set_pixel(&mut self, x: u8, y: u8) -> bool {
        self.borrow_mut().set_pixel(x, y)
    }

    fn clear(&mut self) {
        self.borrow_mut().clear()
    }

    fn present(&mut self) {
        self.borrow_mut().present()
    }
}

/// Headless 64x32 monochrome buffer. This is the whole display model;
/// the window front end just paints it.
pub struct FrameBuffer {
    bits: [bool; WIDTH * HEIGHT],
}

impl FrameBuffer {
    pub fn new() -> Self {
        Self {
            bits: [false; WIDTH * HEIGHT],
        }
    }

    pub fn get(&self, x: usize, y: usize) -> bool {
        self.bits[y * WIDTH + x]
    }

    pub fn is_blank(&self) -> bool {
        self.bits.iter().all(|&b| !b)
    }
}

impl Default for FrameBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl DisplayPort for FrameBuffer {
    fn set_pixel(&mut self, x: u8, y: u8) -> bool {
        let index = y as usize * WIDTH + x as usize;
        self.bits[index] ^= true;
        self.bits[index]
    }

    fn clear(&mut self) {
        self.bits = [false; WIDTH * HEIGHT];
    }

    fn present(&mut self) {}
}

/// minifb window at 16x scale, teacher-blue pixels on black.
pub struct WindowDisplay {
    fb: FrameBuffer,
    pixels: Vec<u32>,
    window: Window,
}

impl WindowDisplay {
    pub fn new(title: &str) -> Result<Self, minifb::Error> {
        let mut window = Window::new(
            title,
            WIDTH,
            HEIGHT,
            WindowOptions {
                scale: Scale::X16,
                ..WindowOptions::default()
            },
        )?;
        // Limit to max ~60 fps update rate
        window.limit_update_rate(Some(std::time::Duration::from_micros(16600)));
        Ok(Self {
            fb: FrameBuffer::new(),
            pixels: vec![PIXEL_OFF; WIDTH * HEIGHT],
            window,
        })
    }

    pub fn is_open(&self) -> bool {
        self.window.is_open() && !self.window.is_key_pressed(Key::Escape, KeyRepeat::Yes)
    }

    /// Keys currently held, for the host to mirror into the keypad.
    pub fn held_keys(&self) -> Vec<Key> {
        self.window.get_keys()
    }

    /// Pump the window once per frame so key state stays live even when
    /// the program draws nothing.
    pub fn pump(&mut self) -> Result<(), minifb::Error> {
        self.window.update_with_buffer(&self.pixels, WIDTH, HEIGHT)
    }
}

impl DisplayPort for WindowDisplay {
    fn set_pixel(&mut self, x: u8, y: u8) -> bool {
        let on = self.fb.set_pixel(x, y);
        let index = y as usize * WIDTH + x as usize;
        self.pixels[index] = if on { PIXEL_ON } else { PIXEL_OFF };
        on
    }

    fn clear(&mut self) {
        self.fb.clear();
        self.pixels.fill(PIXEL_OFF);
    }

    fn present(&mut self) {
        if let Err(e) = self.window.update_with_buffer(&self.pixels, WIDTH, HEIGHT) {
            log::warn!("window update failed: {e}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_pixel_is_xor() {
        let mut fb = FrameBuffer::new();
        assert!(fb.set_pixel(3, 4)); // off -> on
        assert!(fb.get(3, 4));
        assert!(!fb.set_pixel(3, 4)); // on -> off
        assert!(!fb.get(3, 4));
    }

    #[test]
    fn clear_blanks_everything() {
        let mut fb = FrameBuffer::new();
        fb.set_pixel(0, 0);
        fb.set_pixel(63, 31);
        fb.clear();
        assert!(fb.is_blank());
    }
}
