//! A module to contain the instruction set and the decoding of fetched words into it.
//! For more information on CHIP-8 opcodes, please see [this section](https://en.wikipedia.org/wiki/CHIP-8#Opcode_table) of the wikipedia page.
//!
//! Field names follow the usual `F|X|Y|N`, `F|X|NN` and `F|NNN` splits of the 16-bit word.

use std::fmt::{Display, Formatter};

use crate::error::ChipError;

const CLEAR_SCREEN_WORD: u16 = 0x00E0;
const RETURN_WORD: u16 = 0x00EE;
const NIBBLE_MASK: u16 = 0xF;
const BYTE_MASK: u16 = 0xFF;
const ADDRESS_MASK: u16 = 0xFFF;

/// One decoded instruction with the operands it needs.
/// Register operands are indices `0x0..=0xF`.
#[derive(PartialEq, Eq, Debug, Clone, Copy)]
pub enum Opcode {
    /// 0NNN
    System(u16),

    /// 00E0
    ClearScreen,

    /// 00EE
    Return,

    /// 1NNN
    Jump(u16),

    /// 2NNN
    Call(u16),

    /// 3XNN
    SkipIfEqualValue(usize, u8),

    /// 4XNN
    SkipIfNotEqualValue(usize, u8),

    /// 5XY0
    SkipIfRegistersEqual(usize, usize),

    /// 6XNN
    SetValue(usize, u8),

    /// 7XNN
    AddValue(usize, u8),

    /// 8XY0
    Copy(usize, usize),

    /// 8XY1
    Or(usize, usize),

    /// 8XY2
    And(usize, usize),

    /// 8XY3
    Xor(usize, usize),

    /// 8XY4
    AddRegisters(usize, usize),

    /// 8XY5
    Subtract(usize, usize),

    /// 8XY6
    ShiftRight(usize, usize),

    /// 8XY7
    SubtractReversed(usize, usize),

    /// 8XYE
    ShiftLeft(usize, usize),

    /// 9XY0
    SkipIfRegistersNotEqual(usize, usize),

    /// ANNN
    SetIndex(u16),

    /// BNNN
    JumpOffset(u16),

    /// CXNN
    Random(usize, u8),

    /// DXYN
    Draw(usize, usize, u8),

    /// EX9E
    SkipIfKeyPressed(usize),

    /// EXA1
    SkipIfKeyNotPressed(usize),

    /// FX07
    ReadDelayTimer(usize),

    /// FX0A
    WaitForKey(usize),

    /// FX15
    SetDelayTimer(usize),

    /// FX18
    SetSoundTimer(usize),

    /// FX1E
    AddToIndex(usize),

    /// FX29
    FontGlyph(usize),

    /// FX33
    BinaryCodedDecimal(usize),

    /// FX55
    StoreRegisters(usize),

    /// FX65
    LoadRegisters(usize)
}

/// A raw instruction word as fetched from memory, first byte high.
#[derive(PartialEq, Eq, Debug, Clone, Copy)]
pub struct OpcodeWord(pub u16);

impl OpcodeWord {
    /// Combines two fetched bytes into a word.
    #[must_use]
    pub fn from_bytes(bytes: [u8; 2]) -> OpcodeWord {
        OpcodeWord(u16::from_be_bytes(bytes))
    }

    fn group(self) -> u16 {
        self.0 >> 12
    }

    fn x(self) -> usize {
        ((self.0 >> 8) & NIBBLE_MASK) as usize
    }

    fn y(self) -> usize {
        ((self.0 >> 4) & NIBBLE_MASK) as usize
    }

    #[allow(clippy::cast_possible_truncation)]
    fn n(self) -> u8 {
        (self.0 & NIBBLE_MASK) as u8
    }

    #[allow(clippy::cast_possible_truncation)]
    fn nn(self) -> u8 {
        (self.0 & BYTE_MASK) as u8
    }

    fn nnn(self) -> u16 {
        self.0 & ADDRESS_MASK
    }

    /// Returns the [Opcode](Opcode) this word encodes.
    ///
    /// # Errors
    ///
    /// Returns `UnknownOpcode` if the word matches no instruction. See [wikipedia](https://en.wikipedia.org/wiki/CHIP-8#Opcode_table) for a list of valid opcodes.
    pub fn decode(self) -> Result<Opcode, ChipError> {
        let (x, y) = (self.x(), self.y());
        let opcode = match (self.group(), self.n()) {
            _ if self.0 == CLEAR_SCREEN_WORD => Opcode::ClearScreen,
            _ if self.0 == RETURN_WORD => Opcode::Return,
            (0x0, _) => Opcode::System(self.nnn()),
            (0x1, _) => Opcode::Jump(self.nnn()),
            (0x2, _) => Opcode::Call(self.nnn()),
            (0x3, _) => Opcode::SkipIfEqualValue(x, self.nn()),
            (0x4, _) => Opcode::SkipIfNotEqualValue(x, self.nn()),
            (0x5, 0x0) => Opcode::SkipIfRegistersEqual(x, y),
            (0x6, _) => Opcode::SetValue(x, self.nn()),
            (0x7, _) => Opcode::AddValue(x, self.nn()),
            (0x8, 0x0) => Opcode::Copy(x, y),
            (0x8, 0x1) => Opcode::Or(x, y),
            (0x8, 0x2) => Opcode::And(x, y),
            (0x8, 0x3) => Opcode::Xor(x, y),
            (0x8, 0x4) => Opcode::AddRegisters(x, y),
            (0x8, 0x5) => Opcode::Subtract(x, y),
            (0x8, 0x6) => Opcode::ShiftRight(x, y),
            (0x8, 0x7) => Opcode::SubtractReversed(x, y),
            (0x8, 0xE) => Opcode::ShiftLeft(x, y),
            (0x9, 0x0) => Opcode::SkipIfRegistersNotEqual(x, y),
            (0xA, _) => Opcode::SetIndex(self.nnn()),
            (0xB, _) => Opcode::JumpOffset(self.nnn()),
            (0xC, _) => Opcode::Random(x, self.nn()),
            (0xD, n) => Opcode::Draw(x, y, n),
            (0xE, _) => match self.nn() {
                0x9E => Opcode::SkipIfKeyPressed(x),
                0xA1 => Opcode::SkipIfKeyNotPressed(x),
                _ => return Err(self.unknown())
            },
            (0xF, _) => match self.nn() {
                0x07 => Opcode::ReadDelayTimer(x),
                0x0A => Opcode::WaitForKey(x),
                0x15 => Opcode::SetDelayTimer(x),
                0x18 => Opcode::SetSoundTimer(x),
                0x1E => Opcode::AddToIndex(x),
                0x29 => Opcode::FontGlyph(x),
                0x33 => Opcode::BinaryCodedDecimal(x),
                0x55 => Opcode::StoreRegisters(x),
                0x65 => Opcode::LoadRegisters(x),
                _ => return Err(self.unknown())
            },
            _ => return Err(self.unknown())
        };

        Ok(opcode)
    }

    fn unknown(self) -> ChipError {
        ChipError::UnknownOpcode { opcode: self.0 }
    }
}

impl Display for OpcodeWord {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:04X}", self.0)
    }
}
