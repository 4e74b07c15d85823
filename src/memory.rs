use log::debug;

use crate::error::Chip8Error;

pub type Addr = u16; // in reality u12

pub const MEMORY_SIZE: usize = 4096;
pub const PROGRAM_START: Addr = 0x200;
pub const PROGRAM_SPACE: usize = MEMORY_SIZE - PROGRAM_START as usize;
pub const STACK_DEPTH: usize = 16;

/// 4x5 pixel glyphs for hex digits 0-F, one bit row per byte.
pub const FONT: [u8; 5 * 16] = [
    0xF0, 0x90, 0x90, 0x90, 0xF0, // 0
    0x20, 0x60, 0x20, 0x20, 0x70, // 1
    0xF0, 0x10, 0xF0, 0x80, 0xF0, // 2
    0xF0, 0x10, 0xF0, 0x10, 0xF0, // 3
    0x90, 0x90, 0xF0, 0x10, 0x10, // 4
    0xF0, 0x80, 0xF0, 0x10, 0xF0, // 5
    0xF0, 0x80, 0xF0, 0x90, 0xF0, // 6
    0xF0, 0x10, 0x20, 0x40, 0x40, // 7
    0xF0, 0x90, 0xF0, 0x90, 0xF0, // 8
    0xF0, 0x90, 0xF0, 0x10, 0xF0, // 9
    0xF0, 0x90, 0xF0, 0x90, 0x90, // A
    0xE0, 0x90, 0xE0, 0x90, 0xE0, // B
    0xF0, 0x80, 0x80, 0x80, 0xF0, // C
    0xE0, 0x90, 0x90, 0x90, 0xE0, // D
    0xF0, 0x80, 0xF0, 0x80, 0xF0, // E
    0xF0, 0x80, 0xF0, 0x80, 0x80, // F
];

/// Flat 4KB store. The font table sits at address 0 so the glyph for
/// digit `d` starts at `d * 5`; programs load at 0x200. Every access is
/// bounds-checked rather than wrapped, a program indexing past the end
/// is already broken and should fault loudly.
pub struct Memory {
    bytes: [u8; MEMORY_SIZE],
}

impl Memory {
    pub fn new() -> Self {
        let mut bytes = [0; MEMORY_SIZE];
        bytes[..FONT.len()].copy_from_slice(&FONT);
        Self { bytes }
    }

    pub fn read(&self, addr: Addr) -> Result<u8, Chip8Error> {
        self.bytes
            .get(addr as usize)
            .copied()
            .ok_or(Chip8Error::AddressOutOfRange { addr })
    }

    pub fn write(&mut self, addr: Addr, val: u8) -> Result<(), Chip8Error> {
        *self
            .bytes
            .get_mut(addr as usize)
            .ok_or(Chip8Error::AddressOutOfRange { addr })? = val;
        Ok(())
    }

    /// Big-endian 16-bit fetch, used for instruction words.
    pub fn read_word(&self, addr: Addr) -> Result<u16, Chip8Error> {
        let hi = self.read(addr)?;
        let lo = self.read(addr.wrapping_add(1))?;
        Ok(u16::from(hi) << 8 | u16::from(lo))
    }

    /// A checked view of `len` bytes starting at `addr`. Handlers that
    /// touch a run of cells (sprite rows, BCD, register dumps) go
    /// through here so a bad range faults before anything is mutated.
    pub fn span(&self, addr: Addr, len: usize) -> Result<&[u8], Chip8Error> {
        let start = addr as usize;
        self.bytes
            .get(start..start + len)
            .ok_or(Chip8Error::AddressOutOfRange { addr })
    }

    pub fn span_mut(&mut self, addr: Addr, len: usize) -> Result<&mut [u8], Chip8Error> {
        let start = addr as usize;
        self.bytes
            .get_mut(start..start + len)
            .ok_or(Chip8Error::AddressOutOfRange { addr })
    }

    /// Copy a raw program image in at 0x200. The image has no header,
    /// its first byte is the first instruction byte.
    pub fn load_program(&mut self, image: &[u8]) -> Result<(), Chip8Error> {
        if image.len() > PROGRAM_SPACE {
            return Err(Chip8Error::ProgramTooLarge {
                len: image.len(),
                max: PROGRAM_SPACE,
            });
        }
        let start = PROGRAM_START as usize;
        self.bytes[start..start + image.len()].copy_from_slice(image);
        debug!("loaded {} byte program at {:#05x}", image.len(), PROGRAM_START);
        Ok(())
    }
}

impl Default for Memory {
    fn default() -> Self {
        Self::new()
    }
}

/// Return-address stack for CALL/RET, at most 16 frames deep.
pub struct Stack {
    frames: Vec<Addr>,
}

impl Stack {
    pub fn new() -> Self {
        Self {
            frames: Vec::with_capacity(STACK_DEPTH),
        }
    }

    pub fn push(&mut self, addr: Addr) -> Result<(), Chip8Error> {
        if self.frames.len() == STACK_DEPTH {
            return Err(Chip8Error::StackOverflow);
        }
        self.frames.push(addr);
        Ok(())
    }

    pub fn pop(&mut self) -> Result<Addr, Chip8Error> {
        self.frames.pop().ok_or(Chip8Error::StackUnderflow)
    }

    pub fn depth(&self) -> usize {
        self.frames.len()
    }
}

impl Default for Stack {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn font_sits_at_address_zero() {
        let mem = Memory::new();
        // glyph for 0
        assert_eq!(mem.span(0, 5).unwrap(), &[0xF0, 0x90, 0x90, 0x90, 0xF0]);
        // glyph for F starts at 0xF * 5
        assert_eq!(mem.read(0xF * 5).unwrap(), 0xF0);
    }

    #[test]
    fn read_write_round_trip() {
        let mut mem = Memory::new();
        mem.write(0x200, 0xAB).unwrap();
        assert_eq!(mem.read(0x200).unwrap(), 0xAB);
    }

    #[test]
    fn access_past_end_faults() {
        let mut mem = Memory::new();
        assert_eq!(
            mem.read(4096),
            Err(Chip8Error::AddressOutOfRange { addr: 4096 })
        );
        assert_eq!(
            mem.write(4096, 0),
            Err(Chip8Error::AddressOutOfRange { addr: 4096 })
        );
        assert_eq!(mem.read(4095), Ok(0));
    }

    #[test]
    fn span_faults_before_partial_access() {
        let mem = Memory::new();
        assert!(mem.span(4094, 2).is_ok());
        assert_eq!(
            mem.span(4094, 3),
            Err(Chip8Error::AddressOutOfRange { addr: 4094 })
        );
    }

    #[test]
    fn program_loads_at_0x200() {
        let mut mem = Memory::new();
        mem.load_program(&[0x12, 0x34]).unwrap();
        assert_eq!(mem.read_word(0x200).unwrap(), 0x1234);
    }

    #[test]
    fn oversized_program_is_rejected() {
        let mut mem = Memory::new();
        assert!(mem.load_program(&[0; PROGRAM_SPACE]).is_ok());
        assert_eq!(
            mem.load_program(&[0; PROGRAM_SPACE + 1]),
            Err(Chip8Error::ProgramTooLarge {
                len: PROGRAM_SPACE + 1,
                max: PROGRAM_SPACE,
            })
        );
    }

    #[test]
    fn stack_is_bounded_both_ways() {
        let mut stack = Stack::new();
        assert_eq!(stack.pop(), Err(Chip8Error::StackUnderflow));
        for i in 0..STACK_DEPTH {
            stack.push(i as Addr).unwrap();
        }
        assert_eq!(stack.push(0xFFF), Err(Chip8Error::StackOverflow));
        assert_eq!(stack.pop(), Ok((STACK_DEPTH - 1) as Addr));
    }
}
