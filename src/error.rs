//! Error conditions raised by the interpreter core.

use thiserror::Error;

/// Everything that can go wrong while loading or running a program.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChipError {
    /// The program does not fit between `0x200` and the end of memory.
    #[error("ROM is too large ({size} bytes), max size is {max} bytes")]
    RomTooLarge { size: usize, max: usize },

    /// The fetched word matches no known instruction.
    #[error("Unrecognized opcode: {opcode:04X}")]
    UnknownOpcode { opcode: u16 },

    /// A return was executed with nothing on the call stack.
    #[error("Stack underflow: return with an empty call stack")]
    StackUnderflow,

    /// A call would nest deeper than the stack allows.
    #[error("Stack overflow: call nesting exceeds {depth} levels")]
    StackOverflow { depth: usize },

    /// A read or write landed outside the 4096-byte address space.
    #[error("Memory access out of bounds at address {address:#06X}")]
    OutOfBounds { address: usize },
}

impl ChipError {
    /// Returns whether the instruction loop has to stop.
    /// Only an unknown opcode can be skipped over.
    #[must_use]
    pub fn is_fatal(&self) -> bool {
        !matches!(self, ChipError::UnknownOpcode { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_unknown_opcode_is_recoverable() {
        assert!(!ChipError::UnknownOpcode { opcode: 0x5121 }.is_fatal(), "Unknown opcode halted the loop.");
        assert!(ChipError::StackUnderflow.is_fatal(), "Stack underflow did not halt the loop.");
        assert!(ChipError::StackOverflow { depth: 16 }.is_fatal(), "Stack overflow did not halt the loop.");
        assert!(ChipError::OutOfBounds { address: 0x1000 }.is_fatal(), "Out of bounds access did not halt the loop.");
        assert!(ChipError::RomTooLarge { size: 3585, max: 3584 }.is_fatal(), "Oversized ROM was not fatal.");
    }

    #[test]
    fn messages() {
        assert_eq!(ChipError::UnknownOpcode { opcode: 0x51C7 }.to_string(), "Unrecognized opcode: 51C7");
        assert_eq!(ChipError::OutOfBounds { address: 0x1000 }.to_string(), "Memory access out of bounds at address 0x1000");
    }
}
