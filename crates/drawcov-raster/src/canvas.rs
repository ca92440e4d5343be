//! RGB pixel buffer with PNG output.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::{RasterError, Result, Rgb};

/// Row-major 8-bit RGB image.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Canvas {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl Canvas {
    /// Create a canvas filled with `background`.
    #[must_use]
    pub fn new(width: u32, height: u32, background: Rgb) -> Self {
        let len = width as usize * height as usize;
        Self {
            width,
            height,
            pixels: background.repeat(len),
        }
    }

    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Number of pixels.
    #[must_use]
    pub const fn len(&self) -> u64 {
        self.width as u64 * self.height as u64
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Raw RGB bytes, row-major.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.pixels
    }

    /// Color at `(x, y)`, or `None` outside the canvas.
    #[must_use]
    pub fn get(&self, x: u32, y: u32) -> Option<Rgb> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let at = (y as usize * self.width as usize + x as usize) * 3;
        Some([self.pixels[at], self.pixels[at + 1], self.pixels[at + 2]])
    }

    /// Set `(x, y)` to `color`. Returns false outside the canvas.
    pub fn set(&mut self, x: u32, y: u32, color: Rgb) -> bool {
        if x >= self.width || y >= self.height {
            return false;
        }
        let at = (y as usize * self.width as usize + x as usize) * 3;
        self.pixels[at..at + 3].copy_from_slice(&color);
        true
    }

    /// Count pixels equal to `color`.
    #[must_use]
    pub fn count(&self, color: Rgb) -> u64 {
        self.pixels
            .chunks_exact(3)
            .filter(|px| *px == color)
            .count() as u64
    }

    /// Encode as an 8-bit RGB PNG.
    ///
    /// # Errors
    ///
    /// Returns [`RasterError::Encode`] on encoder or write failure.
    pub fn write_png<W: Write>(&self, out: W) -> Result<()> {
        let mut encoder = png::Encoder::new(out, self.width, self.height);
        encoder.set_color(png::ColorType::Rgb);
        encoder.set_depth(png::BitDepth::Eight);
        let mut writer = encoder.write_header()?;
        writer.write_image_data(&self.pixels)?;
        writer.finish()?;
        Ok(())
    }

    /// Write the canvas to `path` as PNG.
    ///
    /// # Errors
    ///
    /// Fails if the file cannot be created or the image cannot be encoded.
    pub fn save(&self, path: &Path) -> Result<()> {
        let file = File::create(path).map_err(|source| RasterError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        self.write_png(BufWriter::new(file))
    }
}
