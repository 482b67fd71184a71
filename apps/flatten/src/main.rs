//! `flatten`: inline a source file and its transitively included headers
//! into a single compilation unit.

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::process::ExitCode;

mod commands;
mod logging;

#[derive(Parser)]
#[command(name = "flatten")]
#[command(about = "Flatten a source file and its #include tree into one file")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Flatten INPUT and every file it includes
    Run(commands::run::RunArgs),

    /// Configuration management commands
    Config {
        #[command(subcommand)]
        command: commands::config::ConfigCommands,
    },
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Run(args) => commands::run::execute(args, cli.verbose),
        Commands::Config { command } => {
            logging::init(cli.verbose, None);
            commands::config::execute(command)?;
            Ok(ExitCode::SUCCESS)
        }
    }
}
