// BCM GPIO - Bare-metal GPIO control and simulation
// Copyright (C) 2026 Andrii Shylenko
//
// This software is released under the MIT License.
// See the LICENSE file in the project root for full license information.

use bcm_gpio_config::{BoardConfig, Soc};
use bcm_gpio_core::startup::{self, PinAction};
use bcm_gpio_core::{Gpio, Pin};
use bcm_gpio_sim::{GpioBlock, PinSnapshot};
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{error, info};

const EXIT_PASS: u8 = 0;
const EXIT_CONFIG_ERROR: u8 = 2;
const EXIT_RUNTIME_ERROR: u8 = 3;

const RESULT_SCHEMA_VERSION: &str = "1.0";

fn parse_soc(s: &str) -> Result<Soc, String> {
    s.parse::<Soc>().map_err(|e| format!("{:#}", e))
}

#[derive(Parser, Debug)]
#[command(author, version, about = "BCM283x GPIO startup simulator", long_about = None)]
struct Cli {
    /// Enable register-level tracing
    #[arg(short, long, global = true)]
    trace: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run a board's startup sequence against the simulated GPIO block.
    Run(RunArgs),

    /// Show which registers and bits control a pin.
    Locate(LocateArgs),
}

#[derive(Parser, Debug)]
struct RunArgs {
    /// Path to the board config (YAML). Defaults to the Raspberry Pi 3B+ LED board.
    #[arg(short, long)]
    board: Option<PathBuf>,

    /// Write the final GPIO block state (JSON)
    #[arg(long)]
    snapshot: Option<PathBuf>,

    /// Print the run report as a single JSON line
    #[arg(long)]
    json: bool,
}

#[derive(Parser, Debug)]
struct LocateArgs {
    /// GPIO number (0-53)
    pin: u8,

    /// SoC whose peripheral base to use
    #[arg(long, default_value = "bcm2837", value_parser = parse_soc)]
    soc: Soc,
}

#[derive(Debug, Serialize)]
struct RunReport {
    result_schema_version: String,
    status: String,
    board: String,
    gpio_base: String,
    pins: Vec<PinSnapshot>,
    faults: Vec<String>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Logs go to stderr so stdout stays machine-readable.
    let level = if cli.trace {
        tracing::Level::TRACE
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Run(args) => run_board(args),
        Commands::Locate(args) => run_locate(args),
    }
}

fn load_board(path: Option<&Path>) -> anyhow::Result<BoardConfig> {
    match path {
        Some(path) => {
            info!("Loading board config: {:?}", path);
            BoardConfig::from_file(path)
        }
        None => {
            info!("Using default board configuration");
            Ok(BoardConfig::default())
        }
    }
}

/// Configured pins in first-seen order.
fn touched_pins(actions: &[PinAction]) -> Vec<Pin> {
    let mut pins: Vec<Pin> = Vec::new();
    for action in actions {
        if !pins.contains(&action.pin) {
            pins.push(action.pin);
        }
    }
    pins
}

fn run_board(args: RunArgs) -> ExitCode {
    let (board, layout, actions) = match load_board(args.board.as_deref()).and_then(|board| {
        let layout = board.layout()?;
        let actions = board.actions()?;
        Ok((board, layout, actions))
    }) {
        Ok(loaded) => loaded,
        Err(e) => {
            error!("{:#}", e);
            return ExitCode::from(EXIT_CONFIG_ERROR);
        }
    };

    info!(
        "Board '{}' ({:?}), GPIO block at {:#x}",
        board.name, board.soc, layout.base
    );

    let mut gpio = Gpio::new(GpioBlock::new(layout), layout);
    for action in &actions {
        match action.level {
            Some(level) => info!("{}: {} {}", action.pin, action.function, level),
            None => info!("{}: {}", action.pin, action.function),
        }
    }
    startup::apply(&mut gpio, &actions);
    let block = gpio.into_inner();

    let report = RunReport {
        result_schema_version: RESULT_SCHEMA_VERSION.to_string(),
        status: "halted".to_string(),
        board: board.name.clone(),
        gpio_base: format!("{:#x}", layout.base),
        pins: touched_pins(&actions)
            .into_iter()
            .map(|pin| PinSnapshot::from(block.pin_state(pin)))
            .collect(),
        faults: block.faults().iter().map(ToString::to_string).collect(),
    };

    if args.json {
        match serde_json::to_string(&report) {
            Ok(line) => println!("{}", line),
            Err(e) => {
                error!("Failed to serialize report: {}", e);
                return ExitCode::from(EXIT_RUNTIME_ERROR);
            }
        }
    } else {
        for pin in &report.pins {
            println!("GPIO{:<3} {:<7} {}", pin.pin, pin.function, pin.level);
        }
    }

    if let Some(path) = &args.snapshot {
        let written = std::fs::File::create(path)
            .map_err(anyhow::Error::from)
            .and_then(|f| Ok(serde_json::to_writer_pretty(f, &block.snapshot())?));
        if let Err(e) = written {
            error!("Failed to write snapshot {:?}: {}", path, e);
            return ExitCode::from(EXIT_RUNTIME_ERROR);
        }
        info!("Snapshot written to {:?}", path);
    }

    if !report.faults.is_empty() {
        for fault in &report.faults {
            error!("Register fault: {}", fault);
        }
        return ExitCode::from(EXIT_RUNTIME_ERROR);
    }

    info!("Startup complete; firmware halts here");
    ExitCode::from(EXIT_PASS)
}

fn run_locate(args: LocateArgs) -> ExitCode {
    let pin = match Pin::new(args.pin) {
        Ok(pin) => pin,
        Err(e) => {
            error!("{}", e);
            return ExitCode::from(EXIT_CONFIG_ERROR);
        }
    };

    let loc = args.soc.layout().locate(pin);
    let bank = pin.bank();
    println!("{} on {:?}", pin, args.soc);
    println!(
        "  GPFSEL{}  {:#010x}  bits {}..={}",
        pin.fsel_index(),
        loc.fsel_addr,
        loc.fsel_shift,
        loc.fsel_shift + 2
    );
    println!("  GPSET{}   {:#010x}  bit {}", bank, loc.set_addr, loc.bank_bit);
    println!("  GPCLR{}   {:#010x}  bit {}", bank, loc.clr_addr, loc.bank_bit);
    println!("  GPLEV{}   {:#010x}  bit {}", bank, loc.lev_addr, loc.bank_bit);
    ExitCode::from(EXIT_PASS)
}
