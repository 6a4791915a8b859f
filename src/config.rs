use clap::Parser;
use std::path::PathBuf;

/// Run a CHIP-8 program in the terminal
#[derive(Parser, Debug, Clone)]
#[command(name = "chip8vm", version, about)]
pub struct Config {
    /// program image, loaded verbatim at 0x200
    pub rom: PathBuf,

    /// instructions per second
    #[arg(long, default_value_t = 700, value_parser = clap::value_parser!(u32).range(1..))]
    pub hz: u32,

    /// stop after this many instructions
    #[arg(long)]
    pub max_cycles: Option<u64>,

    /// don't draw anything; useful with RUST_LOG=trace
    #[arg(long)]
    pub headless: bool,

    /// keep stepping when the program spins on a jump to itself
    #[arg(long)]
    pub keep_running_on_stall: bool,
}

impl Config {
    pub fn halt_on_stall(&self) -> bool {
        !self.keep_running_on_stall
    }
}
