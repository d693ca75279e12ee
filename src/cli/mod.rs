//! CLI command handlers
//!
//! - Argument parsing structures
//! - Routing to the configurator, processor and backup manager

pub mod args;
pub mod router;

pub use args::{Cli, Commands, ConfigureArgs};
pub use router::execute_command;

/// Log filter for a `-v` count
pub fn get_log_level(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    }
}
