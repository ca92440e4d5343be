//! Function coverage command.

use drawcov::Session;
use tracing::error;

use crate::cli::{EXIT_FAILURE, EXIT_SUCCESS, InputArgs};
use crate::terminal::Spinner;

/// Handle the `funcov` command.
pub fn cmd_funcov(input: &InputArgs, silent: bool) -> i32 {
    let options = match input.to_options() {
        Ok(options) => options,
        Err(err) => {
            error!(error = %err, "invalid arguments");
            return EXIT_FAILURE;
        }
    };

    let session = match Session::load(&options) {
        Ok(session) => session,
        Err(err) => {
            error!(error = %err, "failed to load inputs");
            return EXIT_FAILURE;
        }
    };

    let spinner = (!silent).then(|| Spinner::new("Assigning coverages"));
    match session.write_funcov(&options.output_dir) {
        Ok(path) => {
            if let Some(spinner) = &spinner {
                spinner.finish_with_success(&format!("wrote {}", path.display()));
            }
            EXIT_SUCCESS
        }
        Err(err) => {
            if let Some(spinner) = &spinner {
                spinner.finish_with_failure("function coverage failed");
            }
            error!(error = %err, "funcov failed");
            EXIT_FAILURE
        }
    }
}
