use crate::error::Chip8Error;
use crate::memory::Addr;

/// One decoded instruction. Every field the handler needs is extracted
/// here once, so the execute step never touches the raw word again and
/// an unmatched word falls out of exactly one place as `UnknownOpcode`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Instruction {
    // 00E0
    ClearScreen,
    // 00EE
    Return,
    // 1NNN
    Jump(Addr),
    // 2NNN
    Call(Addr),
    // 3XKK
    SkipEqualByte(u8, u8),
    // 4XKK
    SkipNotEqualByte(u8, u8),
    // 5XY0
    SkipEqualRegister(u8, u8),
    // 9XY0
    SkipNotEqualRegister(u8, u8),
    // 6XKK
    SetRegister(u8, u8),
    // 7XKK, no carry flag
    AddToRegister(u8, u8),
    // 8XY0
    CopyRegister(u8, u8),
    // 8XY1
    Or(u8, u8),
    // 8XY2
    And(u8, u8),
    // 8XY3
    Xor(u8, u8),
    // 8XY4, VF = carry
    Add(u8, u8),
    // 8XY5, VF = no borrow
    Subtract(u8, u8),
    // 8XY7, VX = VY - VX
    SubtractReversed(u8, u8),
    // 8XY6, VF = bit shifted out
    ShiftRight(u8),
    // 8XYE, VF = bit shifted out
    ShiftLeft(u8),
    // ANNN
    SetIndex(Addr),
    // BNNN
    JumpWithOffset(Addr),
    // CXKK
    Random(u8, u8),
    // DXYN
    Draw(u8, u8, u8),
    // EX9E
    SkipIfPressed(u8),
    // EXA1
    SkipIfNotPressed(u8),
    // FX07
    ReadDelay(u8),
    // FX0A, suspends until a key goes down
    WaitForKey(u8),
    // FX15
    SetDelay(u8),
    // FX18
    SetSound(u8),
    // FX1E, no carry flag
    AddToIndex(u8),
    // FX29
    FontAddress(u8),
    // FX33
    StoreDecimal(u8),
    // FX55
    StoreRegisters(u8),
    // FX65
    LoadRegisters(u8),
}

impl Instruction {
    /// Decode one big-endian instruction word. Classes 0x0, 0x8, 0xE and
    /// 0xF discriminate further on the low byte or nibble; 5XY? and 9XY?
    /// only exist with a zero low nibble.
    pub fn decode(word: u16) -> Result<Self, Chip8Error> {
        let x = ((word >> 8) & 0xF) as u8;
        let y = ((word >> 4) & 0xF) as u8;
        let kk = (word & 0xFF) as u8;
        let nnn = word & 0x0FFF;
        let n = (word & 0xF) as u8;

        let unknown = Err(Chip8Error::UnknownOpcode { opcode: word });

        match (word >> 12) & 0xF {
            0x0 => match word {
                0x00E0 => Ok(Self::ClearScreen),
                0x00EE => Ok(Self::Return),
                // 0NNN calls a machine-language routine on the original
                // hardware; there is nothing to jump into here.
                _ => unknown,
            },
            0x1 => Ok(Self::Jump(nnn)),
            0x2 => Ok(Self::Call(nnn)),
            0x3 => Ok(Self::SkipEqualByte(x, kk)),
            0x4 => Ok(Self::SkipNotEqualByte(x, kk)),
            0x5 if n == 0 => Ok(Self::SkipEqualRegister(x, y)),
            0x6 => Ok(Self::SetRegister(x, kk)),
            0x7 => Ok(Self::AddToRegister(x, kk)),
            0x8 => match n {
                0x0 => Ok(Self::CopyRegister(x, y)),
                0x1 => Ok(Self::Or(x, y)),
                0x2 => Ok(Self::And(x, y)),
                0x3 => Ok(Self::Xor(x, y)),
                0x4 => Ok(Self::Add(x, y)),
                0x5 => Ok(Self::Subtract(x, y)),
                0x6 => Ok(Self::ShiftRight(x)),
                0x7 => Ok(Self::SubtractReversed(x, y)),
                0xE => Ok(Self::ShiftLeft(x)),
                _ => unknown,
            },
            0x9 if n == 0 => Ok(Self::SkipNotEqualRegister(x, y)),
            0xA => Ok(Self::SetIndex(nnn)),
            0xB => Ok(Self::JumpWithOffset(nnn)),
            0xC => Ok(Self::Random(x, kk)),
            0xD => Ok(Self::Draw(x, y, n)),
            0xE => match kk {
                0x9E => Ok(Self::SkipIfPressed(x)),
                0xA1 => Ok(Self::SkipIfNotPressed(x)),
                _ => unknown,
            },
            0xF => match kk {
                0x07 => Ok(Self::ReadDelay(x)),
                0x0A => Ok(Self::WaitForKey(x)),
                0x15 => Ok(Self::SetDelay(x)),
                0x18 => Ok(Self::SetSound(x)),
                0x1E => Ok(Self::AddToIndex(x)),
                0x29 => Ok(Self::FontAddress(x)),
                0x33 => Ok(Self::StoreDecimal(x)),
                0x55 => Ok(Self::StoreRegisters(x)),
                0x65 => Ok(Self::LoadRegisters(x)),
                _ => unknown,
            },
            _ => unknown,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_field_layout() {
        assert_eq!(Instruction::decode(0x1ABC), Ok(Instruction::Jump(0xABC)));
        assert_eq!(
            Instruction::decode(0x3C42),
            Ok(Instruction::SkipEqualByte(0xC, 0x42))
        );
        assert_eq!(
            Instruction::decode(0xD12F),
            Ok(Instruction::Draw(0x1, 0x2, 0xF))
        );
        assert_eq!(
            Instruction::decode(0x8AB4),
            Ok(Instruction::Add(0xA, 0xB))
        );
    }

    #[test]
    fn decodes_zero_class() {
        assert_eq!(Instruction::decode(0x00E0), Ok(Instruction::ClearScreen));
        assert_eq!(Instruction::decode(0x00EE), Ok(Instruction::Return));
        // machine-language call, unsupported
        assert_eq!(
            Instruction::decode(0x0123),
            Err(Chip8Error::UnknownOpcode { opcode: 0x0123 })
        );
    }

    #[test]
    fn decodes_f_class() {
        assert_eq!(Instruction::decode(0xF50A), Ok(Instruction::WaitForKey(5)));
        assert_eq!(Instruction::decode(0xF329), Ok(Instruction::FontAddress(3)));
        assert_eq!(
            Instruction::decode(0xF155),
            Ok(Instruction::StoreRegisters(1))
        );
        assert_eq!(
            Instruction::decode(0xF265),
            Ok(Instruction::LoadRegisters(2))
        );
    }

    #[test]
    fn rejects_unmatched_words_in_every_class() {
        for word in [0x0000, 0x5AB1, 0x8AB8, 0x9AB5, 0xE0FF, 0xF0FF] {
            assert_eq!(
                Instruction::decode(word),
                Err(Chip8Error::UnknownOpcode { opcode: word })
            );
        }
    }

    #[test]
    fn shift_uses_only_vx() {
        assert_eq!(Instruction::decode(0x8A76), Ok(Instruction::ShiftRight(0xA)));
        assert_eq!(Instruction::decode(0x8A7E), Ok(Instruction::ShiftLeft(0xA)));
    }
}
