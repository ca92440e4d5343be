//! drawcov - coverage maps for guest memory regions
//!
//! Reads a guest directory (`mapinfo`, `syms`) plus a visited-ranges file or
//! instruction-address trace, and draws one image per executable region with
//! the covered bytes in red.
//!
//! # Example
//!
//! ```ignore
//! use drawcov::{RenderOptions, VisitedSource};
//!
//! let options = RenderOptions::new()
//!     .with_guest_dir("guest-last")
//!     .with_visited(VisitedSource::InsAddrs("trace.txt".into()))
//!     .with_output_dir("out");
//! let report = drawcov::render(&options)?;
//! ```

// Re-export from sub-crates
pub use drawcov_cov::{
    CovError, FUNCOV_FILE, FunctionCoverage, ResolverStats, SymbolResolver, aggregate,
    write_funcov,
};
pub use drawcov_maps::{
    MAPINFO_FILE, MAX_INSN_BYTES, MapsError, MemoryMap, MemoryRegion, PROT_EXEC, STDIN_PATH,
    SYMS_FILE, SymbolEntry, SymbolTable, TraceFolder, VisitedRanges, parse_int,
};
pub use drawcov_raster::{
    Canvas, DEFAULT_HEIGHT, DEFAULT_WIDTH, RasterConfig, RasterError, RasterOutcome, SkipReason,
    pixels_per_byte, rasterize,
};

pub mod metrics;
mod options;
mod session;

pub use options::*;
pub use session::*;

use std::path::{Path, PathBuf};

use thiserror::Error;

/// drawcov errors.
#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Maps(#[from] MapsError),
    #[error(transparent)]
    Raster(#[from] RasterError),
    #[error(transparent)]
    Cov(#[from] CovError),
    #[error("failed to create {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("no visited source for guest {}: pass --visited-file or --insaddr-file", .0.display())]
    NoVisitedSource(PathBuf),
}

pub type Result<T> = std::result::Result<T, Error>;

/// Load the inputs named by `options` and write one image per executable region.
///
/// # Errors
///
/// Fails on any load error or if an image cannot be written.
pub fn render(options: &RenderOptions) -> Result<RenderReport> {
    let session = Session::load(options)?;
    session.render(&options.output_dir, &options.raster)
}

/// Load the inputs named by `options` and write `funcov.txt`.
///
/// # Errors
///
/// Fails on any load error or if the summary cannot be written.
pub fn funcov(options: &RenderOptions) -> Result<PathBuf> {
    let session = Session::load(options)?;
    session.write_funcov(&options.output_dir)
}

fn create_output_dir(dir: &Path) -> Result<()> {
    std::fs::create_dir_all(dir).map_err(|source| Error::Io {
        path: dir.to_path_buf(),
        source,
    })
}
