//! A CHIP-8 virtual machine for the terminal.
//!
//! ## Design
//!
//! * one program per process; the machine is built once, loaded, then stepped
//! * `Chip8Interpreter::step` runs exactly one instruction to completion and
//!   hands faults back as values; the run loop decides whether to stop
//! * the frame buffer is the only thing the outside world reads; renderers
//!   sit behind the `Display` trait, starting with TUI in-console
//! * the run loop owns pacing (`spin_sleep`) and the 60Hz timer countdown
//!
//! Model
//!
//! ```text
//! Environment (main)
//!  |-- config, display, stop request
//!  |-- interpreter(display)
//!  |    `-- machine state
//!  |         |-- memory (font at 0x050, program at 0x200)
//!  |         |-- frame buffer
//!  |         |-- call stack
//!  |         `-- V0..VF, I, pc, timers
//!  `-- main loop
//!       |-- stop requested? stop
//!       |-- interpreter.step()     -- fatal error? stop
//!       |-- interpreter.interrupt() -- redraw if the frame changed
//!       |-- tick timers at 60Hz
//!       `-- sleep out the rest of the cycle
//! ```
pub mod config;
pub mod display;
pub mod error;
pub mod framebuffer;
pub mod input;
pub mod instruction;
pub mod interpreter;
pub mod machine;
pub mod memory;
pub mod stack;
