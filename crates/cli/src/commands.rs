//! Clap argument definition and config resolution.

use clap::{Arg, ArgMatches, Command};
use std::path::Path;
use tasknet_core::{Error, Result};
use tasknet_durability::LedgerMode;
use tasknet_engine::NetworkConfig;

/// Build the command-line interface.
pub fn build_cli() -> Command {
    Command::new("tasknet")
        .about("Real-time task network: two random streams, capture and lookup")
        .arg(
            Arg::new("config")
                .long("config")
                .short('c')
                .value_name("FILE")
                .help("TOML config file (default: built-in settings)"),
        )
        .arg(
            Arg::new("ledger")
                .long("ledger")
                .value_name("FILE")
                .help("Ledger file (default: E.txt)"),
        )
        .arg(
            Arg::new("append-ledger")
                .long("append-ledger")
                .help("Continue an existing ledger instead of replacing it")
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            Arg::new("seed")
                .long("seed")
                .value_name("N")
                .help("Master seed for a reproducible run")
                .value_parser(clap::value_parser!(u64)),
        )
        .arg(
            Arg::new("log-level")
                .long("log-level")
                .value_name("FILTER")
                .help("Log filter, e.g. info or tasknet::slow=debug (default: RUST_LOG or warn)"),
        )
        .arg(
            Arg::new("print-config")
                .long("print-config")
                .help("Print the default config file and exit")
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            Arg::new("init-config")
                .long("init-config")
                .value_name("FILE")
                .help("Write the default config to FILE unless it exists, then exit"),
        )
}

/// Handle `--init-config`. Returns the path if the flag was given.
///
/// # Errors
///
/// `Io` if the file cannot be written.
pub fn init_config(matches: &ArgMatches) -> Result<Option<&str>> {
    let Some(path) = matches.get_one::<String>("init-config") else {
        return Ok(None);
    };
    NetworkConfig::write_default_if_missing(Path::new(path))?;
    Ok(Some(path.as_str()))
}

/// Resolve the network config: file values first, then flag overrides.
///
/// # Errors
///
/// Config file errors, or `InvalidConfiguration` if the result does not
/// validate.
pub fn resolve_config(matches: &ArgMatches) -> Result<NetworkConfig> {
    let mut config = match matches.get_one::<String>("config") {
        Some(path) => NetworkConfig::from_file(Path::new(path))?,
        None => NetworkConfig::default(),
    };
    if let Some(path) = matches.get_one::<String>("ledger") {
        config = config.with_ledger_path(path);
    }
    if matches.get_flag("append-ledger") {
        config = config.with_ledger_mode(LedgerMode::Append);
    }
    if let Some(seed) = matches.get_one::<u64>("seed") {
        config = config.with_seed(*seed);
    }
    config.validate()?;
    Ok(config)
}

/// One-line usage hint built from the configured keys.
pub fn key_help(config: &NetworkConfig) -> String {
    format!(
        "Keys: '{}' + Enter to capture, '{}' + Enter to look up, '{}' + Enter to quit",
        config.keys.capture, config.keys.lookup, config.keys.quit
    )
}

/// Exit code for a startup error.
pub fn exit_code(error: &Error) -> i32 {
    match error {
        Error::InvalidConfiguration(_) | Error::ConfigParse(_) => 2,
        _ => 1,
    }
}
