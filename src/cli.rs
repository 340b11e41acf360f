use clap::{Arg, ArgAction, Command};
use log::debug;

pub const DEFAULT_URL: &str = "http://localhost:5000";

pub fn build_cli() -> Command {
    debug!("⚙️ Building CLI interface...");
    Command::new("lpr-config-editor")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Edit the RTSP streams and ignored plates of an LPR service through its config API.")
        .arg(
            Arg::new("url")
                .short('u')
                .long("url")
                .value_name("BASE_URL")
                .env("LPR_CONFIG_URL")
                .default_value(DEFAULT_URL)
                .help("Base URL of the service exposing /api/config")
                .action(ArgAction::Set),
        )
        .arg(
            Arg::new("debug")
                .short('d')
                .long("debug")
                .help("Enable debug logging")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("log-level")
                .long("log-level")
                .value_name("LEVEL")
                .help("Log level: error, warn, info, debug or trace")
                .action(ArgAction::Set),
        )
        .arg(
            Arg::new("log-file")
                .long("log-file")
                .value_name("FILE")
                .help("Write logs to this file instead of the default in the temp directory")
                .action(ArgAction::Set),
        )
        .subcommand(Command::new("edit").about("Open the interactive editor (default)"))
        .subcommand(
            Command::new("show").about("Print the current configuration and exit"),
        )
}
