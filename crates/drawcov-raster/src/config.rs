//! Canvas configuration.

/// An 8-bit RGB color.
pub type Rgb = [u8; 3];

pub const BLACK: Rgb = [0, 0, 0];
pub const RED: Rgb = [255, 0, 0];

/// Default canvas width in pixels.
pub const DEFAULT_WIDTH: u32 = 640;
/// Default canvas height in pixels.
pub const DEFAULT_HEIGHT: u32 = 480;

/// Canvas size and colors.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RasterConfig {
    pub width: u32,
    pub height: u32,
    /// Color of covered pixels.
    pub foreground: Rgb,
    pub background: Rgb,
}

impl Default for RasterConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            foreground: RED,
            background: BLACK,
        }
    }
}

impl RasterConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set canvas dimensions.
    #[must_use]
    pub const fn with_size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    /// Set the covered-pixel color.
    #[must_use]
    pub const fn with_foreground(mut self, color: Rgb) -> Self {
        self.foreground = color;
        self
    }

    /// Set the background color.
    #[must_use]
    pub const fn with_background(mut self, color: Rgb) -> Self {
        self.background = color;
        self
    }

    /// Pixel budget of the canvas.
    #[must_use]
    pub const fn total_pixels(&self) -> u64 {
        self.width as u64 * self.height as u64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = RasterConfig::default();
        assert_eq!((config.width, config.height), (640, 480));
        assert_eq!(config.total_pixels(), 307_200);
        assert_eq!(config.foreground, RED);
        assert_eq!(config.background, BLACK);
    }

    #[test]
    fn test_builder() {
        let config = RasterConfig::new()
            .with_size(16, 4)
            .with_foreground([0, 255, 0])
            .with_background([255, 255, 255]);
        assert_eq!(config.total_pixels(), 64);
        assert_eq!(config.foreground, [0, 255, 0]);
    }
}
