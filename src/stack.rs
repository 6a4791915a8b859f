use crate::error::Chip8Error;

/// how many return addresses fit on the stack
pub const CHIP8_STACK_DEPTH: usize = 16;

/// Fixed-capacity LIFO of return addresses, used only by CALL and RETURN.
pub struct CallStack {
    frames: [u16; CHIP8_STACK_DEPTH],
    len: usize,
}

impl CallStack {
    pub fn new() -> Self {
        CallStack {
            frames: [0; CHIP8_STACK_DEPTH],
            len: 0,
        }
    }

    pub fn push(&mut self, addr: u16) -> Result<(), Chip8Error> {
        let slot = self.frames.get_mut(self.len).ok_or(Chip8Error::StackOverflow {
            capacity: CHIP8_STACK_DEPTH,
        })?;
        *slot = addr;
        self.len += 1;
        Ok(())
    }

    pub fn pop(&mut self) -> Result<u16, Chip8Error> {
        let top = self.peek()?;
        self.len -= 1;
        Ok(top)
    }

    pub fn peek(&self) -> Result<u16, Chip8Error> {
        match self.len {
            0 => Err(Chip8Error::StackUnderflow),
            n => Ok(self.frames[n - 1]),
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

impl Default for CallStack {
    fn default() -> Self {
        Self::new()
    }
}
