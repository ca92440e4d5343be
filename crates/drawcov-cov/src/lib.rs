//! Symbol resolution and function-level coverage for drawcov.

mod funcov;
mod resolver;

pub use funcov::*;
pub use resolver::*;

use std::path::PathBuf;

use thiserror::Error;

/// Coverage report errors.
#[derive(Error, Debug)]
pub enum CovError {
    #[error("failed to write {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, CovError>;
