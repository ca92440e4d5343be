//! Region rasterization.
//!
//! A region's bytes are scaled onto a fixed canvas (`width * height` pixels,
//! row-major), and each visited range fully inside the region is painted as
//! a run of pixels.

mod canvas;
mod config;
mod rasterizer;

pub use canvas::*;
pub use config::*;
pub use rasterizer::*;

use std::path::PathBuf;

use thiserror::Error;

/// Rasterization and image output errors.
#[derive(Error, Debug)]
pub enum RasterError {
    #[error("failed to write {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("PNG encoding failed: {0}")]
    Encode(#[from] png::EncodingError),
}

pub type Result<T> = std::result::Result<T, RasterError>;
