//! Visited ranges of one region → coverage image.

use drawcov_maps::{MemoryRegion, VisitedRanges};
use tracing::{debug, warn};

use crate::{Canvas, RasterConfig};

/// Why a region produced no image.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SkipReason {
    /// Region lacks execute permission.
    NotExecutable,
    /// Region has zero length.
    Empty,
    /// Region is so large that pixels per byte rounds to zero.
    ZeroDensity,
}

impl SkipReason {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NotExecutable => "not-executable",
            Self::Empty => "empty",
            Self::ZeroDensity => "zero-density",
        }
    }
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of rasterizing one region.
#[derive(Debug)]
pub enum RasterOutcome {
    Rendered(Canvas),
    Skipped(SkipReason),
}

/// Pixels allotted to each byte of `region`. Infinite for empty regions.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn pixels_per_byte(config: &RasterConfig, region: &MemoryRegion) -> f64 {
    config.total_pixels() as f64 / region.len() as f64
}

/// Paint every visited range lying entirely inside `region`.
///
/// The range starting at `addr` lands at linear pixel
/// `floor(ppb * (addr - region.start))` and covers `floor(ppb * bytes)` pixels,
/// wrapping every `config.width` pixels. Ranges that cross a region bound are
/// dropped, not clipped.
#[must_use]
#[allow(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss
)]
pub fn rasterize(
    region: &MemoryRegion,
    visited: &VisitedRanges,
    config: &RasterConfig,
) -> RasterOutcome {
    if !region.is_executable() {
        return RasterOutcome::Skipped(SkipReason::NotExecutable);
    }
    if region.is_empty() {
        return RasterOutcome::Skipped(SkipReason::Empty);
    }

    let ppb = pixels_per_byte(config, region);
    if ppb <= 0.0 {
        warn!(start = format_args!("{:#x}", region.start), "0 pixels per byte");
        return RasterOutcome::Skipped(SkipReason::ZeroDensity);
    }

    let total = config.total_pixels();
    let width = u64::from(config.width);
    let mut canvas = Canvas::new(config.width, config.height, config.background);
    let mut entries = 0usize;

    for (addr, bytes) in visited.starting_in(region.start..region.end) {
        if !region.contains_range(addr, bytes) {
            continue;
        }
        entries += 1;
        let offset = (ppb * (addr - region.start) as f64) as u64;
        let count = (bytes as f64 * ppb) as u64;
        let end = offset.saturating_add(count).min(total);
        for px in offset..end {
            canvas.set((px % width) as u32, (px / width) as u32, config.foreground);
        }
    }

    debug!(
        start = format_args!("{:#x}", region.start),
        ppb,
        entries,
        "rasterized region"
    );
    RasterOutcome::Rendered(canvas)
}
