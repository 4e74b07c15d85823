use log::trace;
use rand::{Rng, RngCore};

use crate::decode::Instruction;
use crate::display::{DisplayPort, HEIGHT, WIDTH};
use crate::error::Chip8Error;
use crate::keyboard::InputPort;
use crate::memory::{Addr, Memory, Stack, PROGRAM_START};
use crate::registers::Registers;
use crate::timer::Timers;

/// Whether the next `step()` executes an instruction or is parked on
/// FX0A, holding the register the awaited key code goes into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Running,
    AwaitingKey(u8),
}

/// The machine. Owns memory, registers, stack and timers outright;
/// display, input and the random source are injected capabilities so
/// the whole thing runs headless under test.
///
/// The host drives two independent clocks: `step()` at whatever
/// instruction rate it wants, `tick_timers()` at 60 Hz wall time.
pub struct Emulator {
    pub regs: Registers,
    pub mem: Memory,
    pub stack: Stack,
    pub timers: Timers,
    pub pc: Addr,
    pub index: Addr,
    mode: Mode,
    display: Box<dyn DisplayPort>,
    input: Box<dyn InputPort>,
    rng: Box<dyn RngCore>,
}

impl Emulator {
    pub fn new(
        display: Box<dyn DisplayPort>,
        input: Box<dyn InputPort>,
        rng: Box<dyn RngCore>,
    ) -> Self {
        Self {
            regs: Registers::new(),
            mem: Memory::new(),
            stack: Stack::new(),
            timers: Timers::new(),
            pc: PROGRAM_START,
            index: 0,
            mode: Mode::Running,
            display,
            input,
            rng,
        }
    }

    pub fn load_program(&mut self, image: &[u8]) -> Result<(), Chip8Error> {
        self.mem.load_program(image)
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// One fetch/decode/execute cycle, or one poll of the keypad while
    /// parked on FX0A.
    ///
    /// Fault contract: `UnknownOpcode` leaves the pc past the unknown
    /// word, so a host that logs and keeps stepping just skips it. Any
    /// other fault takes no effect at all, the pc still addresses the
    /// faulting instruction.
    pub fn step(&mut self) -> Result<(), Chip8Error> {
        if let Mode::AwaitingKey(reg) = self.mode {
            if let Some(key) = self.first_key_down() {
                self.regs.set(reg, key);
                self.mode = Mode::Running;
            }
            return Ok(());
        }

        let at = self.pc;
        let word = self.mem.read_word(at)?;
        self.pc = self.pc.wrapping_add(2);
        let ins = Instruction::decode(word)?;
        trace!("pc={at:#05x} op={word:#06x} {ins:?}");
        if let Err(fault) = self.execute(ins) {
            self.pc = at;
            return Err(fault);
        }
        Ok(())
    }

    /// One 60 Hz timer tick. Never faults, zero is a floor.
    pub fn tick_timers(&mut self) {
        self.timers.tick();
    }

    /// True exactly while the sound timer is nonzero; the host's beep
    /// collaborator follows this.
    pub fn sound_active(&self) -> bool {
        self.timers.sound_active()
    }

    fn first_key_down(&self) -> Option<u8> {
        (0..16).find(|&k| self.input.is_down(k))
    }

    fn skip(&mut self) {
        self.pc = self.pc.wrapping_add(2);
    }

    fn execute(&mut self, ins: Instruction) -> Result<(), Chip8Error> {
        match ins {
            Instruction::ClearScreen => self.display.clear(),
            Instruction::Return => self.pc = self.stack.pop()?,
            Instruction::Jump(addr) => self.pc = addr,
            Instruction::Call(addr) => {
                // pc already points past the call, that is the return
                // address.
                self.stack.push(self.pc)?;
                self.pc = addr;
            }
            Instruction::SkipEqualByte(x, kk) => {
                if self.regs.get(x) == kk {
                    self.skip();
                }
            }
            Instruction::SkipNotEqualByte(x, kk) => {
                if self.regs.get(x) != kk {
                    self.skip();
                }
            }
            Instruction::SkipEqualRegister(x, y) => {
                if self.regs.get(x) == self.regs.get(y) {
                    self.skip();
                }
            }
            Instruction::SkipNotEqualRegister(x, y) => {
                if self.regs.get(x) != self.regs.get(y) {
                    self.skip();
                }
            }
            Instruction::SetRegister(x, kk) => self.regs.set(x, kk),
            Instruction::AddToRegister(x, kk) => {
                self.regs.set(x, self.regs.get(x).wrapping_add(kk));
            }
            Instruction::CopyRegister(x, y) => self.regs.set(x, self.regs.get(y)),
            Instruction::Or(x, y) => self.regs.set(x, self.regs.get(x) | self.regs.get(y)),
            Instruction::And(x, y) => self.regs.set(x, self.regs.get(x) & self.regs.get(y)),
            Instruction::Xor(x, y) => self.regs.set(x, self.regs.get(x) ^ self.regs.get(y)),
            Instruction::Add(x, y) => {
                let (sum, carry) = self.regs.get(x).overflowing_add(self.regs.get(y));
                self.regs.set(x, sum);
                self.regs.set_flag(carry as u8);
            }
            Instruction::Subtract(x, y) => {
                let (vx, vy) = (self.regs.get(x), self.regs.get(y));
                self.regs.set(x, vx.wrapping_sub(vy));
                self.regs.set_flag((vx > vy) as u8);
            }
            Instruction::SubtractReversed(x, y) => {
                let (vx, vy) = (self.regs.get(x), self.regs.get(y));
                self.regs.set(x, vy.wrapping_sub(vx));
                self.regs.set_flag((vy > vx) as u8);
            }
            Instruction::ShiftRight(x) => {
                let vx = self.regs.get(x);
                self.regs.set(x, vx >> 1);
                self.regs.set_flag(vx & 1);
            }
            Instruction::ShiftLeft(x) => {
                let vx = self.regs.get(x);
                self.regs.set(x, vx << 1);
                // the shifted-out bit as 0 or 1, not the raw masked byte
                self.regs.set_flag(vx >> 7);
            }
            Instruction::SetIndex(addr) => self.index = addr,
            Instruction::JumpWithOffset(addr) => {
                self.pc = addr.wrapping_add(u16::from(self.regs.get(0)));
            }
            Instruction::Random(x, kk) => {
                let byte: u8 = self.rng.gen();
                self.regs.set(x, byte & kk);
            }
            Instruction::Draw(x, y, n) => self.draw(x, y, n)?,
            Instruction::SkipIfPressed(x) => {
                if self.input.is_down(self.regs.get(x) & 0xF) {
                    self.skip();
                }
            }
            Instruction::SkipIfNotPressed(x) => {
                if !self.input.is_down(self.regs.get(x) & 0xF) {
                    self.skip();
                }
            }
            Instruction::ReadDelay(x) => self.regs.set(x, self.timers.delay),
            Instruction::WaitForKey(x) => {
                // Genuine suspension: no busy wait here, subsequent
                // step() calls poll the keypad until something is down.
                self.mode = Mode::AwaitingKey(x);
            }
            Instruction::SetDelay(x) => self.timers.delay = self.regs.get(x),
            Instruction::SetSound(x) => self.timers.sound = self.regs.get(x),
            Instruction::AddToIndex(x) => {
                self.index = self.index.wrapping_add(u16::from(self.regs.get(x)));
            }
            Instruction::FontAddress(x) => {
                // glyphs live at address 0, five bytes each
                self.index = u16::from(self.regs.get(x)) * 5;
            }
            Instruction::StoreDecimal(x) => {
                let v = self.regs.get(x);
                let cells = self.mem.span_mut(self.index, 3)?;
                cells[0] = v / 100;
                cells[1] = v / 10 % 10;
                cells[2] = v % 10;
            }
            Instruction::StoreRegisters(x) => {
                let count = x as usize + 1;
                self.mem
                    .span_mut(self.index, count)?
                    .copy_from_slice(self.regs.through(x));
                self.index = self.index.wrapping_add(count as u16);
            }
            Instruction::LoadRegisters(x) => {
                let count = x as usize + 1;
                let cells = self.mem.span(self.index, count)?;
                self.regs.through_mut(x).copy_from_slice(cells);
                self.index = self.index.wrapping_add(count as u16);
            }
        }
        Ok(())
    }

    /// XOR-blit an 8xN sprite read from memory at I. Coordinates wrap
    /// on both axes, VF reports whether any lit pixel went dark, and I
    /// is left alone.
    fn draw(&mut self, x: u8, y: u8, n: u8) -> Result<(), Chip8Error> {
        let x0 = self.regs.get(x) as usize;
        let y0 = self.regs.get(y) as usize;
        let rows: Vec<u8> = self.mem.span(self.index, n as usize)?.to_vec();

        let mut collision = false;
        for (i, row) in rows.iter().enumerate() {
            for bit in 0..8 {
                if row >> (7 - bit) & 1 == 1 {
                    let px = ((x0 + bit) % WIDTH) as u8;
                    let py = ((y0 + i) % HEIGHT) as u8;
                    // set_pixel reports the new state; a toggle that
                    // lands dark means it erased a lit pixel
                    collision |= !self.display.set_pixel(px, py);
                }
            }
        }
        self.regs.set_flag(collision as u8);
        self.display.present();
        Ok(())
    }
}
