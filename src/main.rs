use std::error::Error;
use std::fs::File;

use clap::Parser;
use log::info;

use chip8vm::config::Config;
use chip8vm::display::{Display, DummyDisplay, MonoTermDisplay};
use chip8vm::framebuffer::{DISPLAY_HEIGHT, DISPLAY_WIDTH};
use chip8vm::input::{NeverStop, StopRequest, TerminalStop};
use chip8vm::interpreter::Chip8Interpreter;

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let config = Config::parse();

    // initialise
    let mut display: Box<dyn Display> = if config.headless {
        Box::new(DummyDisplay::new())
    } else {
        Box::new(MonoTermDisplay::new(DISPLAY_WIDTH, DISPLAY_HEIGHT)?)
    };
    let mut stop: Box<dyn StopRequest> = if config.headless {
        Box::new(NeverStop)
    } else {
        Box::new(TerminalStop::new()?)
    };
    let mut interpreter = Chip8Interpreter::new(display.as_mut())?;

    // load a program
    let mut f = File::open(&config.rom)?;
    interpreter.load_program(&mut f)?;

    let result = interpreter.main_loop(stop.as_mut(), &config);

    // put the terminal back before reporting anything
    drop(interpreter);
    drop(stop);
    drop(display);
    if !config.headless {
        // shove some junk on stdout to stop the cli messing up the last frame
        for _ in 0..4 {
            println!();
        }
    }

    match result {
        Ok(summary) => {
            info!("{:?} after {} cycles", summary.reason, summary.cycles);
            Ok(())
        }
        // already logged with the failing instruction
        Err(e) => Err(e.into()),
    }
}
