use std::fs;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use chipwright::{Emulator, InterpreterKind, Platform};

const VERSION: &str = env!("CARGO_PKG_VERSION");
const FRAME_INTERVAL: Duration = Duration::from_micros(16_667);

struct Args {
    rom: PathBuf,
    platform: Platform,
    interpreter: InterpreterKind,
}

fn parse_args() -> Result<Args, lexopt::Error> {
    use lexopt::prelude::*;

    let help_msg = "\
USAGE:
    chipwright [OPTIONS] <ROM>

ARGS:
    <ROM>    Filepath to the CHIP-8 ROM to run.

OPTIONS:
    -p, --platform=NAME     Platform to emulate. One of: originalChip8, hybridVIP, modernChip8,
                            chip8x, chip48, superchip1, superchip, megachip8, xochip.
                            (default: originalChip8)
    -i, --interpreter=NAME  Execution engine to use: pure or cached. (default: cached)
    -h, --help              Print this help message.
    -V, --version           Print version information.";

    let mut rom = None;
    let mut platform = Platform::OriginalChip8;
    let mut interpreter = InterpreterKind::Cached;

    let mut parser = lexopt::Parser::from_env();
    while let Some(arg) = parser.next()? {
        match arg {
            Short('p') | Long("platform") => {
                platform = parse_platform(&parser.value()?.string()?)?;
            }
            Short('i') | Long("interpreter") => {
                interpreter = parse_interpreter(&parser.value()?.string()?)?;
            }
            Short('h') | Long("help") => {
                println!("{}", help_msg);
                std::process::exit(0);
            }
            Short('V') | Long("version") => {
                println!("chipwright {}", VERSION);
                std::process::exit(0);
            }
            Value(path) if rom.is_none() => {
                rom = Some(PathBuf::from(path));
            }
            _ => return Err(arg.unexpected()),
        }
    }

    Ok(Args {
        rom: rom.ok_or("missing required argument <ROM>")?,
        platform,
        interpreter,
    })
}

fn parse_platform(name: &str) -> Result<Platform, lexopt::Error> {
    match name {
        "originalChip8" => Ok(Platform::OriginalChip8),
        "hybridVIP" => Ok(Platform::HybridVip),
        "modernChip8" => Ok(Platform::ModernChip8),
        "chip8x" => Ok(Platform::Chip8X),
        "chip48" => Ok(Platform::Chip48),
        "superchip1" => Ok(Platform::SuperChip1),
        "superchip" => Ok(Platform::SuperChip),
        "megachip8" => Ok(Platform::MegaChip8),
        "xochip" => Ok(Platform::XoChip),
        other => Err(format!("unrecognised platform '{}'", other).into()),
    }
}

fn parse_interpreter(name: &str) -> Result<InterpreterKind, lexopt::Error> {
    match name {
        "pure" => Ok(InterpreterKind::Pure),
        "cached" => Ok(InterpreterKind::Cached),
        other => Err(format!("unrecognised interpreter '{}'", other).into()),
    }
}

/// A minimal headless host: loads a ROM and drives the emulator core at 60Hz for as long as the
/// process runs. Performs no video rendering or audio playback; those are left to hosting
/// applications that embed the crate for that purpose.
fn main() {
    let args = match parse_args() {
        Ok(args) => args,
        Err(error) => {
            eprintln!("error: {}", error);
            std::process::exit(2);
        }
    };

    let rom_bytes = match fs::read(&args.rom) {
        Ok(bytes) => bytes,
        Err(error) => {
            eprintln!("error reading '{}': {}", args.rom.display(), error);
            std::process::exit(1);
        }
    };

    let mut emulator: Emulator = Emulator::new(args.platform, args.interpreter, 0, None);
    if let Err(error) = emulator.load_rom(&rom_bytes) {
        eprintln!("error loading ROM: {}", error);
        std::process::exit(1);
    }

    loop {
        let frame_start: Instant = Instant::now();
        match emulator.process_frame() {
            Ok(()) => {}
            Err(runtime_error) => {
                if runtime_error.inner_error == chipwright::ErrorDetail::ExitInterpreter {
                    println!("program exited: {}", runtime_error);
                    std::process::exit(0);
                }
                eprintln!("fatal error: {}", runtime_error);
                std::process::exit(1);
            }
        }
        let elapsed: Duration = frame_start.elapsed();
        if elapsed < FRAME_INTERVAL {
            std::thread::sleep(FRAME_INTERVAL - elapsed);
        }
    }
}
