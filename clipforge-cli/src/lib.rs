// clipforge-cli/src/lib.rs
//
// Library portion of the clipforge CLI application.
// Contains argument definitions and command logic.

pub mod cli;
pub mod commands;
pub mod error;
pub mod logging;
pub mod progress;

// Re-export items needed by the binary or integration tests
pub use cli::{Cli, Commands, GlobalArgs, OutputArgs, PhotoArgs, ProbeArgs, RangeArgs};
pub use commands::run_export;
pub use error::{CliErrorContext, CliResult};

/// Dispatches the parsed command line to its command.
pub fn run(cli: Cli) -> CliResult<()> {
    let globals = cli.globals;
    match cli.command {
        Commands::Gif(args) => commands::clip::run_gif(&globals, args),
        Commands::Trim(args) => commands::clip::run_trim(&globals, args),
        Commands::Photo(args) => commands::photo::run_photo(&globals, args),
        Commands::Probe(args) => commands::probe::run_probe(&globals, args),
    }
}
