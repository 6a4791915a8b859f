//! # interpreter
//!
//! Fetch, decode and execute, one instruction per `step`.
//!
//! Every step:
//!  1. fetches the big-endian word at pc and moves pc on by 2, even when the
//!     instruction is about to overwrite pc itself
//!  2. decodes it into an `Instruction`
//!  3. applies it to the `MachineState`
//!
//! Faults come back as `Chip8Error`. Bounds and stack faults are fatal; an
//! unknown opcode is reported but pc has already moved past it, so the
//! caller may simply carry on.
//!
//! Once a fatal fault has been returned the interpreter stays halted: later
//! steps report `Chip8Error::Halted` and touch nothing.
//!
//! A step that starts at the same pc as the step before it is reported as
//! `Step::Stalled`: the program is spinning on a jump to itself. The step
//! still runs; what to do about it is up to the caller.
use crate::config::Config;
use crate::display::Display;
use crate::error::Chip8Error;
use crate::framebuffer::DISPLAY_HEIGHT;
use crate::input::StopRequest;
use crate::instruction::{Instruction, Reg};
use crate::machine::MachineState;
use crate::memory::MemoryMap;
use log::{debug, error, info, trace, warn};
use std::io;
use std::time::{Duration, Instant};

/// how often the delay and sound timers count down
const TIMER_PERIOD: Duration = Duration::from_nanos(1_000_000_000 / 60);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Continue,
    /// pc has not moved since the previous step
    Stalled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// the `StopRequest` asked for it
    Requested,
    /// `max_cycles` reached
    CycleLimit,
    /// the program stalled and the config says to halt on stalls
    Stalled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub cycles: u64,
    pub reason: StopReason,
}

pub struct Chip8Interpreter<'a> {
    machine: MachineState,
    display: &'a mut dyn Display,
    previous_pc: Option<u16>,
    /// address and raw word of the most recent fetch, for diagnostics
    last_fetch: Option<(u16, u16)>,
    /// address of the instruction that caused a fatal fault
    halted_at: Option<u16>,
}

impl<'a> Chip8Interpreter<'a> {
    pub fn new(display: &'a mut dyn Display) -> Result<Chip8Interpreter<'a>, Chip8Error> {
        Ok(Chip8Interpreter {
            machine: MachineState::new()?,
            display,
            previous_pc: None,
            last_fetch: None,
            halted_at: None,
        })
    }

    /// load a chip8 program at the standard program address
    pub fn load_program(&mut self, reader: &mut impl io::Read) -> Result<(), Chip8Error> {
        let mut image = Vec::new();
        reader.read_to_end(&mut image)?;
        let offset = self.machine.memory.program_addr;
        self.machine.load_program(&image, offset)?;
        self.previous_pc = None;
        self.halted_at = None;
        Ok(())
    }

    pub fn machine(&self) -> &MachineState {
        &self.machine
    }

    pub fn machine_mut(&mut self) -> &mut MachineState {
        &mut self.machine
    }

    /// external interrupt: redraw the screen if anything changed
    pub fn interrupt(&mut self) -> Result<(), io::Error> {
        if self.machine.draw_flag {
            self.display.draw(&self.machine.frame_buffer)?;
            self.machine.draw_flag = false;
        }
        Ok(())
    }

    /// run a single instruction
    pub fn step(&mut self) -> Result<Step, Chip8Error> {
        if let Some(addr) = self.halted_at {
            return Err(Chip8Error::Halted { addr });
        }
        let addr = self.machine.pc;
        let result = self.run_one(addr);
        if matches!(&result, Err(e) if e.is_fatal()) {
            self.halted_at = Some(addr);
        }
        result
    }

    fn run_one(&mut self, addr: u16) -> Result<Step, Chip8Error> {
        let stalled = self.previous_pc == Some(addr);
        self.previous_pc = Some(addr);

        let opcode = self.fetch()?;
        let instruction = Instruction::decode(opcode);
        trace!(
            "{:#05x}: {:04X} {:<16} v{:02X?} i{:04X}",
            addr,
            opcode,
            instruction.to_string(),
            self.machine.v.as_slice(),
            self.machine.i
        );
        self.execute(instruction, addr)?;

        // a skip over the last word, or falling off the end
        let pc = self.machine.pc;
        if usize::from(pc) >= self.machine.memory.capacity() {
            return Err(Chip8Error::OutOfBounds {
                addr: usize::from(pc),
                len: 2,
            });
        }

        Ok(if stalled { Step::Stalled } else { Step::Continue })
    }

    fn fetch(&mut self) -> Result<u16, Chip8Error> {
        let addr = self.machine.pc;
        let opcode = self.machine.memory.get_word(addr)?;
        self.last_fetch = Some((addr, opcode));
        self.machine.pc = addr + 2;
        Ok(opcode)
    }

    fn execute(&mut self, instruction: Instruction, addr: u16) -> Result<(), Chip8Error> {
        use Instruction::*;

        let m = &mut self.machine;
        match instruction {
            ClearScreen => {
                m.frame_buffer.clear();
                m.draw_flag = true;
            }
            Return => m.pc = m.stack.pop()?,
            Sys(target) => debug!("ignoring machine code call to {:03X} at {:#05x}", target, addr),
            Jump(target) => m.pc = target,
            Call(target) => {
                m.stack.push(m.pc)?;
                m.pc = target;
            }
            SkipIfEqConst(x, nn) => {
                if m.v[x] == nn {
                    m.pc += 2;
                }
            }
            SkipIfNeConst(x, nn) => {
                if m.v[x] != nn {
                    m.pc += 2;
                }
            }
            SkipIfEqReg(x, y) => {
                if m.v[x] == m.v[y] {
                    m.pc += 2;
                }
            }
            SkipIfNeReg(x, y) => {
                if m.v[x] != m.v[y] {
                    m.pc += 2;
                }
            }
            SetConst(x, nn) => m.v[x] = nn,
            // no carry out of 7xnn
            AddConst(x, nn) => m.v[x] = m.v[x].wrapping_add(nn),
            Assign(x, y) => m.v[x] = m.v[y],
            Or(x, y) => m.v[x] |= m.v[y],
            And(x, y) => m.v[x] &= m.v[y],
            Xor(x, y) => m.v[x] ^= m.v[y],
            // the flag is computed from the operands and written last, so
            // when x is VF the flag is what remains
            AddReg(x, y) => {
                let (res, carry) = m.v[x].overflowing_add(m.v[y]);
                m.v[x] = res;
                m.v[Reg::VF] = u8::from(carry);
            }
            SubReg(x, y) => {
                let (res, borrow) = m.v[x].overflowing_sub(m.v[y]);
                m.v[x] = res;
                m.v[Reg::VF] = u8::from(!borrow);
            }
            SubReversed(x, y) => {
                let (res, borrow) = m.v[y].overflowing_sub(m.v[x]);
                m.v[x] = res;
                m.v[Reg::VF] = u8::from(!borrow);
            }
            ShiftRight(x, y) => {
                let vy = m.v[y];
                m.v[x] = vy >> 1;
                m.v[Reg::VF] = vy & 0x01;
            }
            ShiftLeft(x, y) => {
                let vy = m.v[y];
                m.v[x] = vy << 1;
                m.v[Reg::VF] = vy >> 7;
            }
            SetIndex(target) => m.i = target,
            SetIndexOffset(target) => m.i = target + u16::from(m.v[Reg::V0]),
            Draw(x, y, n) => {
                let (origin_x, origin_y) = (m.v[x], m.v[y]);
                // rows below the bottom edge are clipped, so never read them
                let visible = DISPLAY_HEIGHT - usize::from(origin_y) % DISPLAY_HEIGHT;
                let rows = usize::from(n).min(visible);
                // Dxy0 reads nothing, so I may point anywhere
                let sprite = match rows {
                    0 => &[][..],
                    _ => m.memory.get_ro_slice(m.i, rows)?,
                };
                let collision = m.frame_buffer.draw_sprite(origin_x, origin_y, sprite);
                m.v[Reg::VF] = u8::from(collision);
                m.draw_flag = true;
            }
            Unknown(opcode) => return Err(Chip8Error::UnknownOpcode { addr, opcode }),
        }
        Ok(())
    }

    /// Step until something tells us to stop, redrawing after each step,
    /// counting the timers down at 60Hz and pacing to `config.hz`.
    ///
    /// Fatal errors end the run and are returned after being logged.
    pub fn main_loop(
        &mut self,
        stop: &mut dyn StopRequest,
        config: &Config,
    ) -> Result<RunSummary, Chip8Error> {
        let cycle_time = Duration::from_secs_f64(1.0 / f64::from(config.hz.max(1)));
        let mut last_tick = Instant::now();
        let mut cycles: u64 = 0;
        let mut stall_reported = false;

        info!("running at {}Hz from {:#05x}", config.hz, self.machine.pc);
        let reason = loop {
            if stop.stop_requested()? {
                break StopReason::Requested;
            }
            if config.max_cycles.map_or(false, |max| cycles >= max) {
                break StopReason::CycleLimit;
            }

            let started = Instant::now();
            let outcome = self.step();
            cycles += 1;
            match outcome {
                Ok(Step::Continue) => {}
                Ok(Step::Stalled) if config.halt_on_stall() => {
                    self.interrupt()?;
                    info!("program stalled at {:#05x}", self.machine.pc);
                    break StopReason::Stalled;
                }
                Ok(Step::Stalled) => {
                    if !stall_reported {
                        warn!("program stalled at {:#05x}", self.machine.pc);
                        stall_reported = true;
                    }
                }
                Err(e) if !e.is_fatal() => warn!("{}; skipping", e),
                Err(e) => {
                    match self.last_fetch {
                        Some((addr, opcode)) => {
                            error!("halted by {:04X} at {:#05x}: {}", opcode, addr, e)
                        }
                        None => error!("halted before first fetch: {}", e),
                    }
                    return Err(e);
                }
            }
            self.interrupt()?;

            while last_tick.elapsed() >= TIMER_PERIOD {
                self.machine.tick_timers();
                last_tick += TIMER_PERIOD;
            }

            let elapsed = started.elapsed();
            if elapsed < cycle_time {
                spin_sleep::sleep(cycle_time - elapsed);
            }
        };

        info!("stopped after {} cycles: {:?}", cycles, reason);
        Ok(RunSummary { cycles, reason })
    }
}
