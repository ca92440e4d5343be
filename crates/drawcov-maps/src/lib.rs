//! Loaders for the flat-file inputs of a coverage run.
//!
//! A guest directory holds `mapinfo` (memory regions) and `syms` (function
//! symbols). Coverage comes from either a visited-ranges file or an
//! instruction-address trace. Every loader is all-or-nothing: the first
//! malformed line aborts the load.

mod int;
mod mapinfo;
mod symbols;
mod visited;

pub use int::parse_int;
pub use mapinfo::*;
pub use symbols::*;
pub use visited::*;

use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Path that selects standard input instead of a file.
pub const STDIN_PATH: &str = "-";

/// Input loading errors.
#[derive(Error, Debug)]
pub enum MapsError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("{}:{line}: {message}", path.display())]
    Parse {
        path: PathBuf,
        line: usize,
        message: String,
    },
}

pub type Result<T> = std::result::Result<T, MapsError>;

/// Open `path` for line reading. `-` reads standard input.
///
/// # Errors
///
/// Returns [`MapsError::Io`] if the file cannot be opened.
pub fn open_input(path: &Path) -> Result<Box<dyn BufRead>> {
    if path.as_os_str() == STDIN_PATH {
        return Ok(Box::new(io::stdin().lock()));
    }
    let file = File::open(path).map_err(|source| MapsError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(Box::new(BufReader::new(file)))
}

/// Feed every non-blank line to `f`, tagging failures with `origin` and the
/// 1-based line number.
fn for_each_line<R, F>(reader: R, origin: &Path, mut f: F) -> Result<()>
where
    R: BufRead,
    F: FnMut(&str) -> std::result::Result<(), String>,
{
    for (idx, line) in reader.lines().enumerate() {
        let line = line.map_err(|source| MapsError::Io {
            path: origin.to_path_buf(),
            source,
        })?;
        if line.trim().is_empty() {
            continue;
        }
        f(&line).map_err(|message| MapsError::Parse {
            path: origin.to_path_buf(),
            line: idx + 1,
            message,
        })?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_error_reports_line() {
        let input = "ok\n\nbad\n";
        let err = for_each_line(input.as_bytes(), Path::new("f.txt"), |line| {
            if line == "bad" {
                Err("boom".to_string())
            } else {
                Ok(())
            }
        })
        .unwrap_err();
        assert_eq!(err.to_string(), "f.txt:3: boom");
    }

    #[test]
    fn test_open_missing_file() {
        let err = open_input(Path::new("/nonexistent/drawcov/mapinfo")).err().unwrap();
        assert!(matches!(err, MapsError::Io { .. }));
    }
}
