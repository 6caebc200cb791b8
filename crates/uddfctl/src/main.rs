use std::path::PathBuf;

use anyhow::Result;
use clap::{ArgAction, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use uddf::UnitSystem;
use uddfctl::{cmd_convert, cmd_dives, cmd_field};

#[derive(Parser, Debug)]
#[command(name = "uddfctl", version, about = "UDDF dive-log CLI")]
struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,
    /// Unit system for converted values (si, metric, imperial)
    #[arg(long, default_value = "si", global = true)]
    unit: UnitSystem,
    #[command(subcommand)]
    cmd: Cmd,
}

#[derive(Subcommand, Debug)]
enum Cmd {
    /// Print the converted document as JSON
    Convert {
        file: PathBuf,
        /// Single-line JSON
        #[arg(long)]
        compact: bool,
    },
    /// List dives with depth, duration, and sample count
    Dives {
        file: PathBuf,
        #[arg(long)]
        json: bool,
    },
    /// Convert one value as if stored under a field name
    Field {
        name: String,
        value: String,
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let Cli { verbose, unit, cmd } = Cli::parse();

    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| level.into()),
        ))
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match cmd {
        Cmd::Convert { file, compact } => cmd_convert::run(&file, unit, compact).await?,
        Cmd::Dives { file, json } => cmd_dives::run(&file, unit, json).await?,
        Cmd::Field { name, value, json } => cmd_field::run(&name, &value, unit, json)?,
    };

    Ok(())
}
