use std::cell::RefCell;
use std::rc::Rc;

use minifb::Key;

/// Live key state as seen by the machine. Only the host writes it, the
/// machine just polls.
pub trait InputPort {
    fn is_down(&self, key: u8) -> bool;
}

impl<T: InputPort> InputPort for Rc<RefCell<T>> {
    fn is_down(&self, key: u8) -> bool {
        self.borrow().is_down(key)
    }
}

/// The 16-key hex pad, one flag per key code 0x0-0xF.
pub struct Keypad {
    keys: [bool; 16],
}

impl Keypad {
    pub fn new() -> Self {
        Self { keys: [false; 16] }
    }

    pub fn press(&mut self, key: u8) {
        self.keys[key as usize] = true;
    }

    pub fn release(&mut self, key: u8) {
        self.keys[key as usize] = false;
    }

    pub fn release_all(&mut self) {
        self.keys = [false; 16];
    }
}

impl Default for Keypad {
    fn default() -> Self {
        Self::new()
    }
}

impl InputPort for Keypad {
    fn is_down(&self, key: u8) -> bool {
        self.keys[key as usize]
    }
}

/// Conventional layout of the 4x4 pad on the left of a qwerty keyboard:
/// 1234 / QWER / ASDF / ZXCV.
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
