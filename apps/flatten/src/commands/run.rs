//! The `run` subcommand: one top-level flattening invocation.

use anyhow::{Context, Result};
use clap::Args;
use flatten_config::{FlattenConfig, load_merged};
use include_flattener::{
    DEFAULT_MAX_DEPTH, FlattenError, FlattenOptions, FlattenReport, Flattener, UnresolvedInclude,
    flatten_file,
};
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Args, Debug)]
pub struct RunArgs {
    /// Root source file
    pub input: PathBuf,

    /// Output file, appended to (created if missing). Writes to stdout when omitted
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Include directory; repeat to search several, in the order given
    #[arg(short = 'I', long = "include-dir", value_name = "DIR")]
    pub include_dirs: Vec<PathBuf>,

    /// Empty the output file first instead of appending
    #[arg(long)]
    pub truncate: bool,

    /// Maximum include nesting depth
    #[arg(long, value_name = "N")]
    pub max_depth: Option<usize>,

    /// Ignore flatten.json files and FLATTEN_* environment variables
    #[arg(long)]
    pub no_config: bool,
}

pub fn execute(args: RunArgs, verbose: u8) -> Result<ExitCode> {
    let config = if args.no_config {
        crate::logging::init(verbose, None);
        FlattenConfig::default()
    } else {
        let cwd = std::env::current_dir()?;
        let loaded = load_merged(&cwd).context("Failed to load flatten configuration")?;
        crate::logging::init(verbose, Some(&loaded.config.logging.level));
        for w in &loaded.warnings {
            tracing::warn!("{}", w);
        }
        loaded.config
    };

    let options = build_options(&args, &config);
    tracing::debug!("Search order: {:?}", options.include_dirs);

    let (result, diagnostics) = match &args.output {
        Some(path) => {
            let outcome = flatten_file(
                &args.input,
                path,
                options,
                args.truncate || config.truncate_output,
            );
            (outcome.result, outcome.diagnostics)
        }
        None => {
            if args.truncate {
                tracing::debug!("--truncate has no effect when writing to stdout");
            }
            flatten_to_stdout(&args, options)
        }
    };

    finish(&args, result, &diagnostics)
}

/// Command-line dirs are searched before configured ones; a command-line
/// depth limit beats the configured one.
fn build_options(args: &RunArgs, config: &FlattenConfig) -> FlattenOptions {
    FlattenOptions {
        include_dirs: args
            .include_dirs
            .iter()
            .chain(&config.include_dirs)
            .cloned()
            .collect(),
        max_depth: args
            .max_depth
            .or(config.max_depth)
            .unwrap_or(DEFAULT_MAX_DEPTH),
    }
}

fn flatten_to_stdout(
    args: &RunArgs,
    options: FlattenOptions,
) -> (
    include_flattener::Result<FlattenReport>,
    Vec<UnresolvedInclude>,
) {
    let mut writer = BufWriter::new(io::stdout().lock());
    let mut flattener = Flattener::new(options);
    let mut result = flattener.inline(&args.input, &mut writer);
    if let Err(e) = writer.flush() {
        if result.is_ok() {
            result = Err(FlattenError::Write(e));
        }
    }
    (result, flattener.take_diagnostics())
}

fn finish(
    args: &RunArgs,
    result: include_flattener::Result<FlattenReport>,
    diagnostics: &[UnresolvedInclude],
) -> Result<ExitCode> {
    for diag in diagnostics {
        eprintln!("{diag}");
    }

    match result {
        Ok(report) => {
            tracing::info!(
                "Flattened {} ({} file(s), {} line(s), depth {})",
                args.input.display(),
                report.files_inlined,
                report.lines_written,
                report.max_depth_seen
            );
            Ok(ExitCode::SUCCESS)
        }
        // Already reported above, one line per directive.
        Err(FlattenError::Unresolved(_)) => Ok(ExitCode::FAILURE),
        Err(e) => Err(e).with_context(|| format!("Failed to flatten {}", args.input.display())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(include_dirs: &[&str], max_depth: Option<usize>) -> RunArgs {
        RunArgs {
            input: "main.c".into(),
            output: None,
            include_dirs: include_dirs.iter().map(PathBuf::from).collect(),
            truncate: false,
            max_depth,
            no_config: true,
        }
    }

    #[test]
    fn cli_dirs_come_before_configured_dirs() {
        let config = FlattenConfig {
            include_dirs: vec!["cfg1".into(), "cfg2".into()],
            ..Default::default()
        };
        let options = build_options(&args(&["cli1", "cli2"], None), &config);
        let expected: Vec<PathBuf> = ["cli1", "cli2", "cfg1", "cfg2"]
            .iter()
            .map(PathBuf::from)
            .collect();
        assert_eq!(options.include_dirs, expected);
    }

    #[test]
    fn max_depth_precedence() {
        let config = FlattenConfig {
            max_depth: Some(7),
            ..Default::default()
        };
        assert_eq!(build_options(&args(&[], Some(3)), &config).max_depth, 3);
        assert_eq!(build_options(&args(&[], None), &config).max_depth, 7);
        assert_eq!(
            build_options(&args(&[], None), &FlattenConfig::default()).max_depth,
            DEFAULT_MAX_DEPTH
        );
    }
}
