use crate::error::Chip8Error;
use crate::framebuffer::FrameBuffer;
use crate::instruction::Reg;
use crate::memory::{Chip8MemoryMap, MemoryMap};
use crate::stack::CallStack;
use log::info;
use std::ops::{Index, IndexMut};

/// V0..VF. VF doubles as the flag register but lives in the same bank.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Registers([u8; 16]);

impl Registers {
    pub fn as_slice(&self) -> &[u8] {
        &self.0
    }
}

impl Index<Reg> for Registers {
    type Output = u8;

    fn index(&self, reg: Reg) -> &u8 {
        &self.0[reg.index()]
    }
}

impl IndexMut<Reg> for Registers {
    fn index_mut(&mut self, reg: Reg) -> &mut u8 {
        &mut self.0[reg.index()]
    }
}

/// # MachineState
///
/// Everything a CHIP-8 program can see: RAM, screen, call stack, program
/// counter, index register, V0..VF and the two countdown timers.
pub struct MachineState {
    pub memory: Chip8MemoryMap,
    pub frame_buffer: FrameBuffer,
    pub stack: CallStack,
    pub v: Registers,
    pub i: u16,
    pub pc: u16,
    pub delay_timer: u8,
    pub sound_timer: u8,
    /// set whenever the frame buffer changes; cleared by whoever renders it
    pub draw_flag: bool,
}

impl MachineState {
    /// zeroed machine with the font installed and pc at the program address
    pub fn new() -> Result<Self, Chip8Error> {
        let memory = Chip8MemoryMap::new()?;
        let pc = memory.program_addr;
        Ok(MachineState {
            memory,
            frame_buffer: FrameBuffer::new(),
            stack: CallStack::new(),
            v: Registers::default(),
            i: 0,
            pc,
            delay_timer: 0,
            sound_timer: 0,
            draw_flag: false,
        })
    }

    /// copy a program image into RAM at `offset` and point pc at it
    pub fn load_program(&mut self, bytes: &[u8], offset: u16) -> Result<(), Chip8Error> {
        self.memory.write(offset, bytes)?;
        self.pc = offset;
        info!("loaded {} byte program at {:#05x}", bytes.len(), offset);
        Ok(())
    }

    /// one 60Hz tick of the delay and sound timers
    pub fn tick_timers(&mut self) {
        self.delay_timer = self.delay_timer.saturating_sub(1);
        self.sound_timer = self.sound_timer.saturating_sub(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::{CHIP8_FONT, CHIP8_FONT_ADDR};

    #[test]
    fn test_bootstrap() -> Result<(), Chip8Error> {
        let m = MachineState::new()?;
        assert_eq!(m.pc, 0x200);
        assert_eq!(m.i, 0);
        assert!(m.stack.is_empty());
        assert_eq!(m.v.as_slice(), &[0; 16]);
        assert_eq!(m.memory.get_ro_slice(CHIP8_FONT_ADDR, 80)?, &CHIP8_FONT[..]);
        assert_eq!(m.frame_buffer, FrameBuffer::new());
        Ok(())
    }

    #[test]
    fn test_registers_read_back() {
        let mut v = Registers::default();
        for x in 0..16 {
            for nn in [0x00, 0x01, 0x7f, 0x80, 0xff] {
                v[Reg::new(x)] = nn;
                assert_eq!(v[Reg::new(x)], nn);
            }
        }
    }

    #[test]
    fn test_load_program() -> Result<(), Chip8Error> {
        let mut m = MachineState::new()?;
        m.load_program(&[0x12, 0x34], 0x300)?;
        assert_eq!(m.pc, 0x300);
        assert_eq!(m.memory.get_word(0x300)?, 0x1234);
        Ok(())
    }

    #[test]
    fn test_load_program_too_big() {
        let mut m = MachineState::new().unwrap();
        let image = vec![0xaa; 0xe01];
        assert!(matches!(
            m.load_program(&image, 0x200),
            Err(Chip8Error::OutOfBounds { .. })
        ));
        // pc not moved on failure
        assert_eq!(m.pc, 0x200);
    }

    #[test]
    fn test_tick_timers_saturates() -> Result<(), Chip8Error> {
        let mut m = MachineState::new()?;
        m.delay_timer = 2;
        m.sound_timer = 1;
        m.tick_timers();
        assert_eq!((m.delay_timer, m.sound_timer), (1, 0));
        m.tick_timers();
        m.tick_timers();
        assert_eq!((m.delay_timer, m.sound_timer), (0, 0));
        Ok(())
    }
}
