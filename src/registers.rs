/// The flag register. Arithmetic, shifts and draws overwrite it as a
/// side effect; programs that keep data in it lose that data.
pub const FLAG: u8 = 0xF;

/// The sixteen 8-bit registers V0-VF. All arithmetic on them wraps
/// modulo 256, there is no wider intermediate leaking out.
pub struct Registers {
    v: [u8; 16],
}

impl Registers {
    pub fn new() -> Self {
        Self { v: [0; 16] }
    }

    pub fn get(&self, reg: u8) -> u8 {
        self.v[reg as usize]
    }

    pub fn set(&mut self, reg: u8, value: u8) {
        self.v[reg as usize] = value;
    }

    pub fn set_flag(&mut self, value: u8) {
        self.v[FLAG as usize] = value;
    }

    /// Slice of V0..=Vx, for the bulk store/load instructions.
    pub fn through(&self, x: u8) -> &[u8] {
        &self.v[..=x as usize]
    }

    pub fn through_mut(&mut self, x: u8) -> &mut [u8] {
        &mut self.v[..=x as usize]
    }
}

impl Default for Registers {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_then_get() {
        let mut regs = Registers::new();
        regs.set(0xA, 0x42);
        assert_eq!(regs.get(0xA), 0x42);
        assert_eq!(regs.get(0x0), 0);
    }

    #[test]
    fn through_is_inclusive() {
        let mut regs = Registers::new();
        for i in 0..16 {
            regs.set(i, i + 1);
        }
        assert_eq!(regs.through(0), &[1]);
        assert_eq!(regs.through(2), &[1, 2, 3]);
    }
}
