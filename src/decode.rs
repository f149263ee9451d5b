use std::fmt;

use crate::memory::TypeAddr;

const NIBBLE_BITS: u16 = 4;
const NIBBLE_MASK: u16 = 0xF;
const BYTE_BITS: u16 = 8;
const BYTE_MASK: u16 = 0xFF;

/// One fetched 16-bit instruction word.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Opcode(u16);

impl Opcode {
    pub fn new(code: u16) -> Self {
        Opcode(code)
    }

    pub fn from_bytes(hi: u8, lo: u8) -> Self {
        Opcode(u16::from_be_bytes([hi, lo]))
    }

    pub fn raw(&self) -> u16 {
        self.0
    }

    // pos counts from the right, starting at 0
    pub fn nibble(&self, pos: u8) -> u8 {
        assert!(pos <= 3, "nibble position {pos} out of range");
        ((self.0 >> (u16::from(pos) * NIBBLE_BITS)) & NIBBLE_MASK) as u8
    }

    pub fn byte(&self, pos: u8) -> u8 {
        assert!(pos <= 1, "byte position {pos} out of range");
        ((self.0 >> (u16::from(pos) * BYTE_BITS)) & BYTE_MASK) as u8
    }

    /// NNN operand: the low 12 bits.
    pub fn addr12(&self) -> TypeAddr {
        (u16::from(self.nibble(2)) << BYTE_BITS) | u16::from(self.byte(0))
    }

    fn x(&self) -> u8 {
        self.nibble(2)
    }

    fn y(&self) -> u8 {
        self.nibble(1)
    }
}

impl PartialEq<u16> for Opcode {
    fn eq(&self, ins: &u16) -> bool {
        ins.eq(&self.0)
    }
}

impl fmt::Display for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04X}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Instruction {
    // 00E0
    ClearScreen,
    // 00EE
    PopSubroutine,
    // 1NNN
    Jump(TypeAddr),
    // 2NNN
    PushSubroutine(TypeAddr),

    // 3XNN
    SkipEqualConstant(u8, u8),
    // 4XNN
    SkipNotEqualConstant(u8, u8),
    // 5XYN, N ignored
    SkipEqualRegister(u8, u8),
    // 9XYN, N ignored
    SkipNotEqualRegister(u8, u8),

    // 6XNN
    SetRegister(u8, u8),
    // 7XNN, no carry flag
    AddToRegister(u8, u8),

    // 8XY0
    CopyRegister(u8, u8),
    // 8XY1
    Or(u8, u8),
    // 8XY2
    And(u8, u8),
    // 8XY3
    XOr(u8, u8),
    // 8XY4
    Add(u8, u8),
    // 8XY5, VX - VY
    SubtractForward(u8, u8),
    // 8XY6
    RightShift(u8, u8),
    // 8XY7, VY - VX
    SubtractBackward(u8, u8),
    // 8XYE
    LeftShift(u8, u8),

    // ANNN
    SetIndexRegister(TypeAddr),
    // BNNN, offset register depends on the jump quirk
    JumpWithOffset(TypeAddr, u8),
    // CXNN
    Random(u8, u8),
    // DXYN
    // draw an N pixel tall sprite from I at (VX, VY)
    // VF is set when a lit pixel gets switched off
    Display(u8, u8, u8),

    // EX9E
    SkipIfPressed(u8),
    // EXA1
    SkipIfNotPressed(u8),

    // FX07
    CopyDelayToRegister(u8),
    // FX0A
    GetKey(u8),
    // FX15
    CopyRegisterToDelay(u8),
    // FX18
    CopyRegisterToSound(u8),
    // FX1E
    AddToIndex(u8),
    // FX29
    PointChar(u8),
    // FX33
    ToDecimal(u8),
    // FX55
    StoreRegisterToMemory(u8),
    // FX65
    LoadRegisterFromMemory(u8),

    Unknown(Opcode),
}

impl Instruction {
    pub fn decode(op: Opcode) -> Self {
        let (x, y, n, nn) = (op.x(), op.y(), op.nibble(0), op.byte(0));

        match op.nibble(3) {
            0x0 => match op.raw() {
                0x00E0 => Self::ClearScreen,
                0x00EE => Self::PopSubroutine,
                _ => Self::Unknown(op),
            },
            0x1 => Self::Jump(op.addr12()),
            0x2 => Self::PushSubroutine(op.addr12()),
            0x3 => Self::SkipEqualConstant(x, nn),
            0x4 => Self::SkipNotEqualConstant(x, nn),
            0x5 => Self::SkipEqualRegister(x, y),
            0x6 => Self::SetRegister(x, nn),
            0x7 => Self::AddToRegister(x, nn),
            0x8 => match n {
                0x0 => Self::CopyRegister(x, y),
                0x1 => Self::Or(x, y),
                0x2 => Self::And(x, y),
                0x3 => Self::XOr(x, y),
                0x4 => Self::Add(x, y),
                0x5 => Self::SubtractForward(x, y),
                0x6 => Self::RightShift(x, y),
                0x7 => Self::SubtractBackward(x, y),
                0xE => Self::LeftShift(x, y),
                _ => Self::Unknown(op),
            },
            0x9 => Self::SkipNotEqualRegister(x, y),
            0xA => Self::SetIndexRegister(op.addr12()),
            0xB => Self::JumpWithOffset(op.addr12(), x),
            0xC => Self::Random(x, nn),
            0xD => Self::Display(x, y, n),
            0xE => match nn {
                0x9E => Self::SkipIfPressed(x),
                0xA1 => Self::SkipIfNotPressed(x),
                _ => Self::Unknown(op),
            },
            0xF => match nn {
                0x07 => Self::CopyDelayToRegister(x),
                0x0A => Self::GetKey(x),
                0x15 => Self::CopyRegisterToDelay(x),
                0x18 => Self::CopyRegisterToSound(x),
                0x1E => Self::AddToIndex(x),
                0x29 => Self::PointChar(x),
                0x33 => Self::ToDecimal(x),
                0x55 => Self::StoreRegisterToMemory(x),
                0x65 => Self::LoadRegisterFromMemory(x),
                _ => Self::Unknown(op),
            },
            _ => Self::Unknown(op),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bit_manip() {
        let op = Opcode::new(0x124E);
        assert_eq!(op.addr12(), 0x024E);
        assert_eq!(op.nibble(3), 0x1);
        assert_eq!(op.nibble(2), 0x2);
        assert_eq!(op.nibble(1), 0x4);
        assert_eq!(op.nibble(0), 0xE);
        assert_eq!(op.byte(0), 0x4E);
        assert_eq!(op.byte(1), 0x12);
    }

    #[test]
    fn test_bytes_reassemble_every_word() {
        for w in 0..=u16::MAX {
            let op = Opcode::new(w);
            let back = (u16::from(op.byte(1)) << 8) | u16::from(op.byte(0));
            assert_eq!(back, w);
            assert_eq!(Opcode::from_bytes(op.byte(1), op.byte(0)), w);
            assert_eq!(op.addr12(), w & 0x0FFF);
        }
    }

    #[test]
    #[should_panic]
    fn test_nibble_position_is_asserted() {
        Opcode::new(0x1234).nibble(4);
    }

    #[test]
    #[should_panic]
    fn test_byte_position_is_asserted() {
        Opcode::new(0x1234).byte(2);
    }

    #[test]
    fn test_decode_families() {
        let cases = [
            (0x00E0, Instruction::ClearScreen),
            (0x00EE, Instruction::PopSubroutine),
            (0x1ABC, Instruction::Jump(0xABC)),
            (0x2123, Instruction::PushSubroutine(0x123)),
            (0x3A02, Instruction::SkipEqualConstant(0xA, 0x02)),
            (0x4B11, Instruction::SkipNotEqualConstant(0xB, 0x11)),
            (0x5120, Instruction::SkipEqualRegister(0x1, 0x2)),
            (0x6A02, Instruction::SetRegister(0xA, 0x02)),
            (0x7122, Instruction::AddToRegister(0x1, 0x22)),
            (0x8120, Instruction::CopyRegister(0x1, 0x2)),
            (0x8121, Instruction::Or(0x1, 0x2)),
            (0x8122, Instruction::And(0x1, 0x2)),
            (0x8123, Instruction::XOr(0x1, 0x2)),
            (0x8124, Instruction::Add(0x1, 0x2)),
            (0x8125, Instruction::SubtractForward(0x1, 0x2)),
            (0x8126, Instruction::RightShift(0x1, 0x2)),
            (0x8127, Instruction::SubtractBackward(0x1, 0x2)),
            (0x812E, Instruction::LeftShift(0x1, 0x2)),
            (0x9120, Instruction::SkipNotEqualRegister(0x1, 0x2)),
            (0xA2F0, Instruction::SetIndexRegister(0x2F0)),
            (0xB345, Instruction::JumpWithOffset(0x345, 0x3)),
            (0xC40F, Instruction::Random(0x4, 0x0F)),
            (0xD125, Instruction::Display(0x1, 0x2, 0x5)),
            (0xE39E, Instruction::SkipIfPressed(0x3)),
            (0xE3A1, Instruction::SkipIfNotPressed(0x3)),
            (0xF507, Instruction::CopyDelayToRegister(0x5)),
            (0xF50A, Instruction::GetKey(0x5)),
            (0xF515, Instruction::CopyRegisterToDelay(0x5)),
            (0xF518, Instruction::CopyRegisterToSound(0x5)),
            (0xF51E, Instruction::AddToIndex(0x5)),
            (0xF529, Instruction::PointChar(0x5)),
            (0xF533, Instruction::ToDecimal(0x5)),
            (0xF555, Instruction::StoreRegisterToMemory(0x5)),
            (0xF565, Instruction::LoadRegisterFromMemory(0x5)),
        ];
        for (word, expected) in cases {
            assert_eq!(Instruction::decode(Opcode::new(word)), expected, "{word:04X}");
        }
    }

    #[test]
    fn test_unmapped_secondary_cases_are_unknown() {
        for word in [0x0123, 0x00E1, 0x8128, 0x812F, 0xE3A2, 0xF5FF] {
            assert_eq!(
                Instruction::decode(Opcode::new(word)),
                Instruction::Unknown(Opcode::new(word)),
                "{word:04X}"
            );
        }
    }
}
