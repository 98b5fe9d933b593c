//! dbconf - inspect the resolved database-client configuration
//!
//! A thin CLI over `dbconf-core`: resolves the configuration for the current
//! process environment and prints or checks it.

use clap::Parser;

mod commands;

use commands::Cli;

fn main() {
    dbconf_core::logging::init();

    let cli = Cli::parse();

    if let Err(e) = cli.execute() {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
