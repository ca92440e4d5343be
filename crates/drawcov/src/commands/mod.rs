//! Command implementations.
//!
//! Each submodule handles one CLI command.

mod funcov;
mod render;

use crate::cli::{Cli, Commands};

/// Dispatch CLI command to the appropriate handler.
pub fn run_command(cli: &Cli) -> i32 {
    match &cli.command {
        None => render::cmd_render(&cli.input, cli.silent),
        Some(Commands::Render { input }) => render::cmd_render(input, cli.silent),
        Some(Commands::Funcov { input }) => funcov::cmd_funcov(input, cli.silent),
    }
}
