use std::io;
use thiserror::Error;

/// Everything that can go wrong while a CHIP-8 program runs.
#[derive(Debug, Error)]
pub enum Chip8Error {
    /// read or write touching memory outside `[0, capacity)`
    #[error("memory access out of bounds: {len} byte(s) at {addr:#05x}")]
    OutOfBounds { addr: usize, len: usize },

    /// CALL with a full call stack
    #[error("call stack overflow (capacity {capacity})")]
    StackOverflow { capacity: usize },

    /// RETURN (or peek) with an empty call stack
    #[error("call stack underflow")]
    StackUnderflow,

    /// decode miss; the program counter has already moved past it
    #[error("unknown opcode {opcode:04X} at {addr:#05x}")]
    UnknownOpcode { addr: u16, opcode: u16 },

    /// `step` after a fatal error; the machine is frozen where it faulted
    #[error("machine halted by an earlier fault at {addr:#05x}")]
    Halted { addr: u16 },

    #[error("io error: {0}")]
    Io(#[from] io::Error),
}

impl Chip8Error {
    /// fatal errors must stop the run loop; everything else is reported and skipped
    pub fn is_fatal(&self) -> bool {
        !matches!(self, Chip8Error::UnknownOpcode { .. })
    }
}
