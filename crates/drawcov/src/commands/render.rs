//! Render command.

use tracing::{error, info};

use crate::cli::{EXIT_FAILURE, EXIT_SUCCESS, InputArgs};
use crate::terminal::print_render_summary;

/// Handle the default `render` command.
pub fn cmd_render(input: &InputArgs, silent: bool) -> i32 {
    let options = match input.to_options() {
        Ok(options) => options,
        Err(err) => {
            error!(error = %err, "invalid arguments");
            return EXIT_FAILURE;
        }
    };
    info!(guest = %options.guest_dir.display(), output = %options.output_dir.display(), "rendering");

    match drawcov::render(&options) {
        Ok(report) => {
            if !silent {
                print_render_summary(&report);
            }
            EXIT_SUCCESS
        }
        Err(err) => {
            error!(error = %err, "render failed");
            EXIT_FAILURE
        }
    }
}
