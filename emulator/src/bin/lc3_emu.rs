
use std::io::IsTerminal;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use emu_lib::io::tty::StdIo;
use emu_lib::{Config, Emulator, PutspBase};
use obj::Image;

use clap::Parser;
use common::asm::Reg;
use crossterm::terminal;
use log::{error, warn};


/// LC-3 Emulator
#[derive(Parser)]
#[command(about)]
struct Args {
    /// Image to execute: a big endian origin word followed by the program
    image: PathBuf,

    /// PUTSP prints the string at the address in R0 instead of address 0
    #[arg(long)]
    putsp_from_r0: bool,

    /// Print registers to stderr when execution stops
    #[arg(long)]
    dump_regs: bool,
}

// Keeps the terminal raw for the lifetime of the run.
struct RawMode {
    enabled: bool,
}

impl RawMode {
    fn enable() -> RawMode {
        if !std::io::stdin().is_terminal() {
            return RawMode { enabled: false };
        }
        match terminal::enable_raw_mode() {
            Ok(()) => RawMode { enabled: true },
            Err(e) => {
                warn!("unable to enable raw terminal mode: {e}");
                RawMode { enabled: false }
            }
        }
    }
}

impl Drop for RawMode {
    fn drop(&mut self) {
        if self.enabled {
            if let Err(e) = terminal::disable_raw_mode() {
                error!("unable to restore terminal: {e}");
            }
        }
    }
}

fn dump_regs(emu: &Emulator) {
    eprintln!("PC:   {:#06x}", emu.pc());
    eprintln!("COND: {:?}", emu.cond());
    for reg in Reg::ALL {
        eprintln!("{reg}:   {:#06x}", emu.reg_read(reg));
    }
    eprintln!("executed {} instructions", emu.num_ins());
}

fn main() -> ExitCode {
    env_logger::init();

    let opt = Args::parse();

    let image = match Image::load(&opt.image) {
        Ok(image) => image,
        Err(e) => {
            error!("failed to load {}: {e}", opt.image.display());
            return ExitCode::FAILURE;
        }
    };

    let putsp_base = if opt.putsp_from_r0 { PutspBase::R0 } else { PutspBase::Zero };
    let config = Config { putsp_base };
    let mut emu = Emulator::with_config(config, Arc::new(StdIo::default()));
    emu.load_image(&image);

    let res = {
        let _raw = RawMode::enable();
        emu.run()
    };

    if opt.dump_regs {
        dump_regs(&emu);
    }

    match res {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("execution stopped: {e}");
            ExitCode::FAILURE
        }
    }
}
