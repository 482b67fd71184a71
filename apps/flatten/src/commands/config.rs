//! Configuration management commands for `flatten.json`.

use anyhow::{Context, Result};
use clap::Subcommand;
use colored::Colorize;
use flatten_config::{
    FlattenConfig,
    loader::{LOCAL_FILE, load_merged, local_config_path},
    writer::write_pretty_json_atomic,
};
use std::path::PathBuf;

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Create flatten.json in the current directory
    Init {
        /// Overwrite an existing config file
        #[arg(long)]
        force: bool,
    },

    /// Show the merged configuration
    Show {
        /// Output as raw JSON (no formatting)
        #[arg(long)]
        json: bool,

        /// Directory holding the local flatten.json (defaults to current dir)
        #[arg(long)]
        path: Option<PathBuf>,
    },

    /// Output the JSON Schema for flatten.json
    Schema,

    /// Validate configuration and show warnings
    Validate {
        /// Directory holding the local flatten.json (defaults to current dir)
        #[arg(long)]
        path: Option<PathBuf>,
    },
}

pub fn execute(cmd: ConfigCommands) -> Result<()> {
    match cmd {
        ConfigCommands::Init { force } => cmd_init(force),
        ConfigCommands::Show { json, path } => cmd_show(json, path),
        ConfigCommands::Schema => cmd_schema(),
        ConfigCommands::Validate { path } => cmd_validate(path),
    }
}

fn cmd_init(force: bool) -> Result<()> {
    let path = local_config_path(&std::env::current_dir()?);

    if path.exists() && !force {
        anyhow::bail!(
            "Config file already exists: {}\nUse --force to overwrite",
            path.display()
        );
    }

    let value = serde_json::to_value(FlattenConfig::default())?;
    write_pretty_json_atomic(&path, &value)
        .with_context(|| format!("Failed to write {LOCAL_FILE}"))?;

    println!(
        "{} Created {}",
        "OK".green(),
        path.display().to_string().cyan()
    );
    Ok(())
}

fn cmd_show(json_output: bool, path: Option<PathBuf>) -> Result<()> {
    let dir = path.map_or_else(std::env::current_dir, Ok)?;
    let loaded = load_merged(&dir)?;

    for warning in &loaded.warnings {
        eprintln!("{} {}", "WARN".yellow(), warning);
    }

    if json_output {
        println!("{}", serde_json::to_string(&loaded.config)?);
    } else {
        println!("{}", serde_json::to_string_pretty(&loaded.config)?);
    }
    Ok(())
}

fn cmd_schema() -> Result<()> {
    println!("{}", flatten_config::schema_json_pretty()?);
    Ok(())
}

fn cmd_validate(path: Option<PathBuf>) -> Result<()> {
    let dir = path.map_or_else(std::env::current_dir, Ok)?;
    let loaded = load_merged(&dir)?;

    if loaded.warnings.is_empty() {
        println!("{} Configuration is valid", "OK".green());
    } else {
        println!(
            "{} Configuration has {} warning(s):",
            "WARN".yellow(),
            loaded.warnings.len()
        );
        for w in &loaded.warnings {
            println!("  - {w}");
        }
    }

    println!("\nConfig files:");
    match &loaded.paths.global {
        Some(global) => println!("  Global: {}", global.display()),
        None => println!("  Global: (no config directory on this platform)"),
    }
    println!("  Local:  {}", loaded.paths.local.display());
    Ok(())
}
