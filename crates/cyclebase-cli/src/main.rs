mod commands;
mod config;
mod logging;
use anyhow::Result;

use clap::{Parser, Subcommand};
use commands::{NameKind, Unit};
use config::Config;
use log::error;
use logging::BurstLogger;
use std::{path::PathBuf, process::exit};

#[derive(Parser)]
#[command(name = "cyclebase")]
#[command(about = "A CLI tool for inspecting cycle counter calibration")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Calibrate the host cycle counter and print the conversion constants.
    Calibrate {
        /// Optional path to the configuration file.
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Flag, if set, print the calibration as JSON.
        #[arg(short, long, action)]
        json: bool,
    },
    /// Convert a value between ticks and wall-clock units.
    Convert {
        /// The value to convert.
        value: u64,
        /// Unit of the value.
        #[arg(short, long, value_enum, default_value_t = Unit::Ticks)]
        from: Unit,
        /// Optional path to the configuration file.
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
    /// Print the display name of a code.
    Names {
        /// Which table to look the code up in.
        #[arg(value_enum)]
        kind: NameKind,
        /// The code, decimal or 0x-prefixed hex.
        code: String,
    },
    /// Force debug logging for a while and wait for it to end.
    Burst {
        /// Optional path to the configuration file.
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Optional length of the burst in seconds, overrides config.
        #[arg(short, long)]
        seconds: Option<u32>,
        /// Optional poll interval in milliseconds, overrides config.
        #[arg(short, long)]
        poll_ms: Option<u64>,
    },
    /// Hang forever, to attach a debugger.
    Hang,
}

fn main() {
    init_logging();

    if let Err(e) = do_main() {
        error!("error: {e}");
        exit(1);
    }
}

fn init_logging() {
    if let Err(e) = BurstLogger::from_env().init() {
        eprintln!("error: failed to set up logging: {e}");
        exit(1);
    }
}

fn do_main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Calibrate { config, json } => {
            commands::calibrate(&Config::load(config.as_ref())?, json)
        }
        Commands::Convert {
            value,
            from,
            config,
        } => commands::convert(&Config::load(config.as_ref())?, value, from),
        Commands::Names { kind, code } => commands::names(kind, &code),
        Commands::Burst {
            config,
            seconds,
            poll_ms,
        } => {
            let cfg = Config::load(config.as_ref())?;
            let seconds = seconds.unwrap_or_else(|| cfg.burst_seconds());
            let poll_ms = poll_ms.unwrap_or_else(|| cfg.poll_ms());
            commands::burst(&cfg, seconds, poll_ms)
        }
        Commands::Hang => cyclebase::hang(),
    }
}
