//! The 4 KiB address space.
//!
//! ```text
//! 0x000-0x04F  reserved
//! 0x050-0x09F  hexadecimal font
//! 0x0A0-0x1FF  reserved
//! 0x200-0xFFF  program
//! ```
//!
//! Every access goes through a bounds check; an address past `0xFFF` is an
//! [`OutOfBounds`](ChipError::OutOfBounds) error rather than being wrapped.

use crate::error::ChipError;
use crate::font::{FONT, FONT_BASE_ADDRESS};

pub const MEMORY_SIZE: usize = 4096;
pub const PROGRAM_START_ADDRESS: u16 = 0x200;
pub const MAX_PROGRAM_SIZE: usize = MEMORY_SIZE - PROGRAM_START_ADDRESS as usize;

pub struct Memory {
    bytes: [u8; MEMORY_SIZE]
}

impl Memory {
    /// Returns a zeroed memory with the font in place.
    #[must_use]
    pub fn new() -> Memory {
        let mut bytes = [0; MEMORY_SIZE];
        let font_start = FONT_BASE_ADDRESS as usize;
        bytes[font_start..font_start + FONT.len()].copy_from_slice(&FONT);

        Memory { bytes }
    }

    /// Copies `program` to `0x200`.
    /// Nothing is written unless the whole program fits.
    ///
    /// # Errors
    ///
    /// Returns `RomTooLarge` if `program` is longer than 3584 bytes.
    pub fn load_program(&mut self, program: &[u8]) -> Result<(), ChipError> {
        if program.len() > MAX_PROGRAM_SIZE {
            return Err(ChipError::RomTooLarge { size: program.len(), max: MAX_PROGRAM_SIZE });
        }

        let start = PROGRAM_START_ADDRESS as usize;
        self.bytes[start..start + program.len()].copy_from_slice(program);
        Ok(())
    }

    /// Returns the byte at `address`.
    ///
    /// # Errors
    ///
    /// Returns `OutOfBounds` if `address` is past the end of memory.
    pub fn read(&self, address: usize) -> Result<u8, ChipError> {
        self.bytes.get(address).copied().ok_or(ChipError::OutOfBounds { address })
    }

    /// Returns the big-endian word at `address` and `address + 1`.
    ///
    /// # Errors
    ///
    /// Returns `OutOfBounds` if either byte is past the end of memory.
    pub fn read_word(&self, address: usize) -> Result<[u8; 2], ChipError> {
        Ok([self.read(address)?, self.read(address + 1)?])
    }

    /// Returns `len` bytes starting at `address`.
    ///
    /// # Errors
    ///
    /// Returns `OutOfBounds` with the first offending address if the range runs past the end of memory.
    pub fn slice(&self, address: usize, len: usize) -> Result<&[u8], ChipError> {
        let end = address + len;
        if end > MEMORY_SIZE {
            return Err(ChipError::OutOfBounds { address: address.max(MEMORY_SIZE) });
        }
        Ok(&self.bytes[address..end])
    }

    /// Returns `len` writable bytes starting at `address`.
    ///
    /// # Errors
    ///
    /// Returns `OutOfBounds` with the first offending address if the range runs past the end of memory.
    pub fn slice_mut(&mut self, address: usize, len: usize) -> Result<&mut [u8], ChipError> {
        let end = address + len;
        if end > MEMORY_SIZE {
            return Err(ChipError::OutOfBounds { address: address.max(MEMORY_SIZE) });
        }
        Ok(&mut self.bytes[address..end])
    }

    #[must_use]
    pub fn as_slice(&self) -> &[u8] {
        &self.bytes
    }
}

impl Default for Memory {
    fn default() -> Self {
        Memory::new()
    }
}
