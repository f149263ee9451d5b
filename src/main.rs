use std::{path::PathBuf, time::Instant};

use anyhow::Context;
use chipvm::{
    config::{Config, Quirks, DEFAULT_INSTRUCTIONS_PER_SECOND},
    display::{WindowConfig, WindowDisplay},
    memory::{read_rom, DEFAULT_MEMORY_SIZE},
    sound::Beeper,
    Emulator,
};
use clap::{Parser, ValueEnum};
use log::{error, warn};
use minifb::Scale;

// Separately:
// CPU: 500 instructions per second
// Display: refreshed at --refresh-rate
// Timers: 60 per second, on wall-clock time

#[derive(Parser, Debug)]
#[command(version, about = "CHIP-8 interpreter", long_about = None)]
struct Args {
    /// Path to the ROM file to run
    rom: PathBuf,

    #[arg(long, default_value_t = DEFAULT_INSTRUCTIONS_PER_SECOND, help = "Instructions per second")]
    ips: u32,

    #[arg(long, help = "8XY6/8XYE shift VY into VX")]
    legacy_shift: bool,

    #[arg(long, help = "BNNN jumps to NNN + VX instead of NNN + V0")]
    modern_jump: bool,

    #[arg(short, long, value_enum, default_value = "16", help = "Window scale factor")]
    scale: WindowScale,

    #[arg(long, default_value_t = 60, help = "Window refresh rate in Hz")]
    refresh_rate: u32,

    #[arg(long, help = "Disable the buzzer")]
    mute: bool,
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args = Args::parse();
    let config = Config {
        instructions_per_second: args.ips,
        memory_size: DEFAULT_MEMORY_SIZE,
        quirks: Quirks {
            legacy_shift: args.legacy_shift,
            legacy_jump_offset: !args.modern_jump,
        },
    };

    let rom = read_rom(&args.rom)?;

    let name = args
        .rom
        .file_name()
        .map_or_else(|| args.rom.display().to_string(), |n| n.to_string_lossy().into_owned());
    let title = format!("chipvm - {name} - ESC to exit");
    let display = WindowDisplay::new(
        &title,
        WindowConfig {
            scale: args.scale.into(),
            refresh_rate: args.refresh_rate,
        },
    )
    .context("unable to open window")?;

    let mut emu = Emulator::new(config, display);
    emu.load_rom(&rom)?;
    if !args.mute {
        match Beeper::new() {
            Ok(beeper) => emu = emu.with_audio(beeper),
            Err(err) => warn!("running without sound: {err}"),
        }
    }

    let mut current_time = Instant::now();
    while !emu.should_terminate() {
        let new_time = Instant::now();
        let frame_time = new_time.duration_since(current_time).as_secs_f64();
        current_time = new_time;

        if let Err(err) = emu.cycle(frame_time) {
            error!("machine halted at {:03x}: {err}", emu.regs.pc.get());
            return Err(err.into());
        }
    }

    Ok(())
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum WindowScale {
    #[value(name = "1")]
    X1,
    #[value(name = "2")]
    X2,
    #[value(name = "4")]
    X4,
    #[value(name = "8")]
    X8,
    #[value(name = "16")]
    X16,
    #[value(name = "32")]
    X32,
}

impl From<WindowScale> for Scale {
    fn from(scale: WindowScale) -> Self {
        match scale {
            WindowScale::X1 => Scale::X1,
            WindowScale::X2 => Scale::X2,
            WindowScale::X4 => Scale::X4,
            WindowScale::X8 => Scale::X8,
            WindowScale::X16 => Scale::X16,
            WindowScale::X32 => Scale::X32,
        }
    }
}
