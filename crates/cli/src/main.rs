//! tasknet: run the task network against the terminal.
//!
//! Fast values stream to stdout. Commands are read one per line from stdin:
//! capture, lookup (followed by the query on the next line) and quit. Logs
//! go to stderr, filtered by `--log-level` or `RUST_LOG`.

mod commands;

use std::io::{self, Write};
use std::process;
use std::sync::Arc;

use tasknet_engine::{LineEventSource, StdoutConsole, TaskNetwork};
use tracing_subscriber::EnvFilter;

use commands::{build_cli, exit_code, init_config, key_help, resolve_config};

fn main() {
    let matches = build_cli().get_matches();

    if matches.get_flag("print-config") {
        print!("{}", tasknet_engine::NetworkConfig::default_toml());
        return;
    }

    match init_config(&matches) {
        Ok(Some(path)) => {
            println!("Config at {}", path);
            return;
        }
        Ok(None) => {}
        Err(e) => {
            eprintln!("tasknet: {}", e);
            process::exit(exit_code(&e));
        }
    }

    init_logging(matches.get_one::<String>("log-level").map(String::as_str));

    let config = match resolve_config(&matches) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("tasknet: {}", e);
            process::exit(exit_code(&e));
        }
    };

    println!("{}", key_help(&config));
    let _ = io::stdout().flush();

    let network = match TaskNetwork::start(config.clone(), Arc::new(StdoutConsole)) {
        Ok(network) => network,
        Err(e) => {
            eprintln!("tasknet: {}", e);
            process::exit(exit_code(&e));
        }
    };

    let stdin = io::stdin();
    let mut source = LineEventSource::new(stdin.lock(), config.keys.clone());
    let stats = network.run(&mut source);
    network.shutdown();

    tracing::info!(
        captures = stats.captures,
        lookups = stats.lookups,
        lines = network.ledger().next_line(),
        "tasknet exiting"
    );
}

fn init_logging(level: Option<&str>) {
    let filter = match level {
        Some(level) => EnvFilter::new(level),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(true)
        .init();
}
