use crossterm::event::{poll, read, Event, KeyCode, KeyEvent, KeyModifiers};
use crossterm::terminal;
use log::debug;
use std::io;
use std::time::Duration;

/// asks whether the run loop should stop; checked between steps
pub trait StopRequest {
    fn stop_requested(&mut self) -> Result<bool, io::Error>;
}

/// watches the terminal for Esc, `q` or Ctrl-C
pub struct TerminalStop {
    requested: bool,
}

impl TerminalStop {
    pub fn new() -> Result<Self, io::Error> {
        terminal::enable_raw_mode()?;
        Ok(TerminalStop { requested: false })
    }

    fn is_stop_key(evt: &KeyEvent) -> bool {
        match evt.code {
            KeyCode::Esc | KeyCode::Char('q') => true,
            KeyCode::Char('c') => evt.modifiers.contains(KeyModifiers::CONTROL),
            _ => false,
        }
    }

    // drain everything that's waiting without blocking
    fn read_events(&mut self) -> Result<(), io::Error> {
        while poll(Duration::from_millis(0))? {
            match read()? {
                Event::Key(evt) if Self::is_stop_key(&evt) => self.requested = true,
                Event::Key(evt) => debug!("ignoring key {:?}", evt.code),
                _ => {}
            }
        }
        Ok(())
    }
}

impl Drop for TerminalStop {
    fn drop(&mut self) {
        let _ = terminal::disable_raw_mode();
    }
}

impl StopRequest for TerminalStop {
    fn stop_requested(&mut self) -> Result<bool, io::Error> {
        self.read_events()?;
        Ok(self.requested)
    }
}

/// never asks to stop; for headless runs
pub struct NeverStop;

impl StopRequest for NeverStop {
    fn stop_requested(&mut self) -> Result<bool, io::Error> {
        Ok(false)
    }
}

/// asks to stop after being polled `n` times; for testing
pub struct StopAfter(pub usize);

impl StopRequest for StopAfter {
    fn stop_requested(&mut self) -> Result<bool, io::Error> {
        match self.0 {
            0 => Ok(true),
            _ => {
                self.0 -= 1;
                Ok(false)
            }
        }
    }
}
