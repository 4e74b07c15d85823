//! A CHIP-8 virtual machine.
//!
//! The core is [`Emulator`]: 4KB of memory, sixteen 8-bit registers, a
//! 16-frame call stack, two 60 Hz countdown timers, and the full 34-op
//! instruction table. The host drives it through two independent
//! clocks, `step()` for instructions and `tick_timers()` at 60 Hz wall
//! time, and injects the display, keypad and random source at
//! construction so everything runs headless under test. The minifb
//! window, key mapping and cpal beeper in this crate are one such host.

pub mod decode;
pub mod display;
pub mod emulator;
pub mod error;
pub mod keyboard;
pub mod memory;
pub mod registers;
pub mod sound;
pub mod timer;

pub use decode::Instruction;
pub use display::{DisplayPort, FrameBuffer, WindowDisplay};
pub use emulator::{Emulator, Mode};
pub use error::Chip8Error;
pub use keyboard::{InputPort, Keypad};
