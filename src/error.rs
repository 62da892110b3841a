// (c) 2023 John A. Breaux
// This code is licensed under MIT license (see LICENSE for details)

//! Error type for the Chip-8 virtual machine

use thiserror::Error;

/// Result type, equivalent to [std::result::Result]<T, [enum@Error]>
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for the Chip-8 virtual machine.
#[derive(Debug, Error)]
pub enum Error {
    /// The program does not fit in the program window
    #[error("program is {len} bytes, but only {max} bytes fit in program memory")]
    ProgramTooLarge {
        /// The length of the offending program
        len: usize,
        /// The size of the program window
        max: usize,
    },
    /// Tried to access a span of memory which isn't wholly inside one window
    #[error("range {addr:03x}..{:03x} is not inside a single memory window", .addr + .len)]
    InvalidAddress {
        /// The first address of the span
        addr: usize,
        /// The length of the span
        len: usize,
    },
    /// Tried to read a stack slot which does not exist
    #[error("stack slot {sp} does not exist")]
    InvalidStackPointer {
        /// The offending stack pointer
        sp: usize,
    },
    /// Exceeded the maximum level of nested subroutines
    #[error("stack overflow: subroutine nesting exceeds {sp} levels")]
    StackOverflow {
        /// The stack pointer at the time of the call
        sp: usize,
    },
    /// Returned from a subroutine with nothing on the stack
    #[error("stack underflow: return with no subroutine active")]
    StackUnderflow,
    /// Represents an unimplemented operation
    #[error("opcode {word:04x} not recognized")]
    UnimplementedInstruction {
        /// The offending word
        word: u16,
    },
    /// Tried to press a key that doesn't exist
    #[error("tried to access key {key:X} which does not exist")]
    InvalidKey {
        /// The offending key
        key: usize,
    },
    /// Tried to get/set an out-of-bounds register
    #[error("tried to access register v{reg:X} which does not exist")]
    InvalidRegister {
        /// The offending register
        reg: usize,
    },
    /// Error originated in [std::io]
    #[error(transparent)]
    IoError(#[from] std::io::Error),
    #[cfg(feature = "minifb")]
    /// Error originated in [minifb]
    #[error(transparent)]
    MinifbError(#[from] minifb::Error),
}
