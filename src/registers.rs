//! The sixteen general purpose registers.
//!
//! `VF` doubles as the flag output of arithmetic and draw instructions. Those
//! instructions go through [`set_flag`](Registers::set_flag), which always
//! writes 0 or 1, and call it after storing their result so the flag is what
//! remains when the destination is `VF` itself.

pub const REGISTER_COUNT: usize = 16;
pub const FLAG_REGISTER: usize = 0xF;

#[derive(Debug, Default, Clone, PartialEq)]
pub struct Registers {
    values: [u8; REGISTER_COUNT]
}

impl Registers {
    #[must_use]
    pub fn new() -> Registers {
        Registers { values: [0; REGISTER_COUNT] }
    }

    /// Returns the value of `VX`. `register` is masked to a nibble.
    #[must_use]
    pub fn get(&self, register: usize) -> u8 {
        self.values[register & 0xF]
    }

    /// Stores `value` in `VX`. `register` is masked to a nibble.
    pub fn set(&mut self, register: usize, value: u8) {
        self.values[register & 0xF] = value;
    }

    /// Overwrites `VF` with 1 or 0.
    pub fn set_flag(&mut self, flag: bool) {
        self.values[FLAG_REGISTER] = u8::from(flag);
    }

    /// Returns `V0..=VX`.
    #[must_use]
    pub fn up_to(&self, register: usize) -> &[u8] {
        &self.values[..=(register & 0xF)]
    }

    /// Returns `V0..=VX` for writing.
    pub fn up_to_mut(&mut self, register: usize) -> &mut [u8] {
        &mut self.values[..=(register & 0xF)]
    }
}
