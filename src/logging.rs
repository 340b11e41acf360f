use std::fs::OpenOptions;
use std::path::PathBuf;

use anyhow::Context;
use env_logger::{Builder, Target};
use log::LevelFilter;

const DEFAULT_LOG_FILE: &str = "lpr-config-editor.log";

/// Log level from `--debug`, then `--log-level`, then info
pub fn resolve_level(cli_matches: &clap::ArgMatches) -> LevelFilter {
    if cli_matches.get_flag("debug") {
        return LevelFilter::Debug;
    }
    cli_matches
        .get_one::<String>("log-level")
        .map(|s| parse_level(s))
        .unwrap_or(LevelFilter::Info)
}

fn parse_level(level: &str) -> LevelFilter {
    match level.to_lowercase().as_str() {
        "off" => LevelFilter::Off,
        "error" => LevelFilter::Error,
        "warn" => LevelFilter::Warn,
        "info" => LevelFilter::Info,
        "debug" => LevelFilter::Debug,
        "trace" => LevelFilter::Trace,
        s => {
            eprintln!("Unrecognized log level '{}', defaulting to info.", s);
            LevelFilter::Info
        }
    }
}

pub fn log_file_path(cli_matches: &clap::ArgMatches) -> PathBuf {
    cli_matches
        .get_one::<String>("log-file")
        .map(PathBuf::from)
        .unwrap_or_else(|| std::env::temp_dir().join(DEFAULT_LOG_FILE))
}

/// Send logs to a file; stderr would draw over the terminal UI
pub fn initialize_logging(cli_matches: &clap::ArgMatches) -> anyhow::Result<PathBuf> {
    let path = log_file_path(cli_matches);
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("Failed to open log file '{}'", path.display()))?;

    let mut builder = Builder::new();
    builder
        .filter_level(resolve_level(cli_matches))
        .target(Target::Pipe(Box::new(file)))
        .try_init()
        .context("Failed to initialize logger")?;

    Ok(path)
}
