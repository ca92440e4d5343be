//! Loaded inputs of one run, and the passes over them.

use std::path::{Path, PathBuf};

use drawcov_cov::{FunctionCoverage, SymbolResolver, aggregate};
use drawcov_maps::{MemoryMap, MemoryRegion, SymbolTable, VisitedRanges};
use drawcov_raster::{RasterConfig, RasterOutcome, SkipReason, rasterize};
use tracing::{debug, info};

use crate::{RenderOptions, Result, create_output_dir, metrics};

/// An image written for one region.
#[derive(Clone, Debug)]
pub struct RenderedImage {
    pub region_start: u64,
    pub path: PathBuf,
    /// Pixels painted with the foreground color.
    pub painted: u64,
}

/// A region that produced no image.
#[derive(Clone, Debug)]
pub struct SkippedRegion {
    pub region_start: u64,
    pub reason: SkipReason,
}

/// Outcome of a render pass, in region order.
#[derive(Clone, Debug, Default)]
pub struct RenderReport {
    pub images: Vec<RenderedImage>,
    pub skipped: Vec<SkippedRegion>,
}

/// Image file name for a region: `cov-0x<start>[-<name>].png`.
#[must_use]
pub fn image_file_name(region: &MemoryRegion) -> String {
    match &region.name {
        Some(name) => format!("cov-{:#x}-{name}.png", region.start),
        None => format!("cov-{:#x}.png", region.start),
    }
}

/// All inputs of a run, loaded up front.
#[derive(Clone, Debug, Default)]
pub struct Session {
    pub memory_map: MemoryMap,
    pub symbols: SymbolTable,
    pub visited: VisitedRanges,
}

impl Session {
    #[must_use]
    pub const fn new(memory_map: MemoryMap, symbols: SymbolTable, visited: VisitedRanges) -> Self {
        Self {
            memory_map,
            symbols,
            visited,
        }
    }

    /// Load `mapinfo`, `syms` and the visited source. Any failure aborts.
    ///
    /// # Errors
    ///
    /// Propagates the first load error.
    pub fn load(options: &RenderOptions) -> Result<Self> {
        info!(guest = %options.guest_dir.display(), "loading guest");
        let memory_map = MemoryMap::load_guest(&options.guest_dir)?;
        let symbols = SymbolTable::load_guest(&options.guest_dir)?;

        info!(source = %options.visited, "loading visited ranges");
        let visited = options.visited.load()?;

        info!(
            regions = memory_map.len(),
            symbols = symbols.len(),
            visited = visited.len(),
            "inputs loaded"
        );
        metrics::record_load(memory_map.len(), symbols.len(), visited.len());

        Ok(Self::new(memory_map, symbols, visited))
    }

    /// Rasterize every region and write an image for each executable one.
    ///
    /// # Errors
    ///
    /// Fails if the output directory cannot be created or an image cannot be
    /// written.
    pub fn render(&self, output_dir: &Path, config: &RasterConfig) -> Result<RenderReport> {
        create_output_dir(output_dir)?;
        let mut report = RenderReport::default();

        for region in self.memory_map.regions() {
            match rasterize(region, &self.visited, config) {
                RasterOutcome::Skipped(reason) => {
                    debug!(start = format_args!("{:#x}", region.start), %reason, "skipping region");
                    metrics::record_region_skipped(reason);
                    report.skipped.push(SkippedRegion {
                        region_start: region.start,
                        reason,
                    });
                }
                RasterOutcome::Rendered(canvas) => {
                    let path = output_dir.join(image_file_name(region));
                    canvas.save(&path)?;
                    let painted = canvas.count(config.foreground);
                    info!(path = %path.display(), painted, "wrote coverage image");
                    metrics::record_region_rendered(region, painted, canvas.len());
                    report.images.push(RenderedImage {
                        region_start: region.start,
                        path,
                        painted,
                    });
                }
            }
        }

        Ok(report)
    }

    /// Per-function coverage, using a fresh resolver.
    #[must_use]
    pub fn function_coverage(&self) -> Vec<FunctionCoverage> {
        let mut resolver = SymbolResolver::new(&self.symbols);
        let functions = aggregate(&mut resolver, &self.visited);
        metrics::record_funcov(functions.len(), resolver.stats());
        functions
    }

    /// Write `funcov.txt` into `output_dir`.
    ///
    /// # Errors
    ///
    /// Fails if the directory cannot be created or the file cannot be written.
    pub fn write_funcov(&self, output_dir: &Path) -> Result<PathBuf> {
        create_output_dir(output_dir)?;
        let functions = self.function_coverage();
        let path = drawcov_cov::write_funcov(output_dir, &functions)?;
        info!(path = %path.display(), functions = functions.len(), "wrote function coverage");
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn region(start: u64, name: Option<&str>) -> MemoryRegion {
        MemoryRegion {
            start,
            end: start + 0x1000,
            protection: 5,
            flags: 0,
            name: name.map(str::to_string),
        }
    }

    #[test]
    fn test_image_file_name() {
        assert_eq!(
            image_file_name(&region(0x7f12_718c_2000, Some("libc-2.14.1.so"))),
            "cov-0x7f12718c2000-libc-2.14.1.so.png"
        );
        assert_eq!(image_file_name(&region(0x40_0000, None)), "cov-0x400000.png");
    }

    #[test]
    fn test_render_report_order() {
        let mut map = MemoryMap::new();
        map.insert(region(0x2000, None));
        map.insert(MemoryRegion {
            protection: 3,
            ..region(0x1000, Some("heap"))
        });
        let visited: VisitedRanges = [(0x2000, 4)].into_iter().collect();
        let session = Session::new(map, SymbolTable::default(), visited);

        let dir = tempfile::tempdir().unwrap();
        let report = session.render(dir.path(), &RasterConfig::default()).unwrap();
        assert_eq!(report.skipped.len(), 1);
        assert_eq!(report.skipped[0].region_start, 0x1000);
        assert_eq!(report.skipped[0].reason, SkipReason::NotExecutable);
        assert_eq!(report.images.len(), 1);
        assert_eq!(report.images[0].path, dir.path().join("cov-0x2000.png"));
        // 0x1000 bytes over 307200 pixels: 75 pixels per byte.
        assert_eq!(report.images[0].painted, 300);
    }
}
