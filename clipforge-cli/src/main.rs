// ============================================================================
// clipforge-cli/src/main.rs
// ============================================================================
//
// CLIPFORGE CLI: Main Entry Point
//
// Parses the command line, sets up logging and runs the selected command.
// Any error is printed as a single "Error: ..." line and the process exits
// with status 1.
//
// AI-ASSISTANT-INFO: Main entry point for the clipforge CLI application

use clap::Parser;
use clipforge_cli::{Cli, logging};
use std::process;

fn main() {
    let cli = Cli::parse();

    match logging::init_logging(&cli.globals) {
        Ok(Some(log_path)) => log::debug!("Logging to {}", log_path.display()),
        Ok(None) => {}
        Err(e) => {
            eprintln!("Error: failed to set up logging: {e}");
            process::exit(1);
        }
    }

    if let Err(e) = clipforge_cli::run(cli) {
        log::debug!("Command failed: {e:?}");
        eprintln!("Error: {e}");
        process::exit(1);
    }
}
