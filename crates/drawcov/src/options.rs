//! Run configuration.

use std::fmt;
use std::path::{Path, PathBuf};

use drawcov_maps::{STDIN_PATH, VisitedRanges};
use drawcov_raster::RasterConfig;

use crate::{Error, Result};

/// Guest directory used when none is given.
pub const DEFAULT_GUEST_DIR: &str = "guest-last";

/// Where observed coverage comes from. A path of `-` reads stdin.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum VisitedSource {
    /// `START-END ...` lines.
    Ranges(PathBuf),
    /// One instruction address per line, in execution order.
    InsAddrs(PathBuf),
}

impl VisitedSource {
    /// Ranges read from standard input.
    #[must_use]
    pub fn stdin() -> Self {
        Self::Ranges(PathBuf::from(STDIN_PATH))
    }

    /// Pick the source for a run.
    ///
    /// An explicit ranges file wins over an instruction trace. With neither,
    /// ranges are read from stdin, but only when no guest directory was
    /// named (`guest_dir` is `None`).
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoVisitedSource`] when a guest directory was named
    /// without any coverage input.
    pub fn select(
        visited_file: Option<&Path>,
        insaddr_file: Option<&Path>,
        guest_dir: Option<&Path>,
    ) -> Result<Self> {
        match (visited_file, insaddr_file, guest_dir) {
            (Some(path), _, _) => Ok(Self::Ranges(path.to_path_buf())),
            (None, Some(path), _) => Ok(Self::InsAddrs(path.to_path_buf())),
            (None, None, None) => Ok(Self::stdin()),
            (None, None, Some(dir)) => Err(Error::NoVisitedSource(dir.to_path_buf())),
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        match self {
            Self::Ranges(path) | Self::InsAddrs(path) => path,
        }
    }

    /// Read the visited ranges.
    ///
    /// # Errors
    ///
    /// Fails on a missing file or on the first malformed line.
    pub fn load(&self) -> drawcov_maps::Result<VisitedRanges> {
        match self {
            Self::Ranges(path) => VisitedRanges::load_ranges(path),
            Self::InsAddrs(path) => VisitedRanges::load_ins_addrs(path),
        }
    }
}

impl fmt::Display for VisitedSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let path = self.path();
        let shown = if path.as_os_str() == STDIN_PATH {
            String::from("<stdin>")
        } else {
            path.display().to_string()
        };
        match self {
            Self::Ranges(_) => write!(f, "ranges {shown}"),
            Self::InsAddrs(_) => write!(f, "instruction trace {shown}"),
        }
    }
}

/// Options for a render or funcov run.
#[derive(Clone, Debug)]
pub struct RenderOptions {
    /// Directory holding `mapinfo` and `syms`.
    pub guest_dir: PathBuf,
    pub visited: VisitedSource,
    /// Where images and `funcov.txt` are written. Created if missing.
    pub output_dir: PathBuf,
    pub raster: RasterConfig,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            guest_dir: PathBuf::from(DEFAULT_GUEST_DIR),
            visited: VisitedSource::stdin(),
            output_dir: PathBuf::from("."),
            raster: RasterConfig::default(),
        }
    }
}

impl RenderOptions {
    /// Create default options.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the guest directory.
    #[must_use]
    pub fn with_guest_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.guest_dir = dir.into();
        self
    }

    /// Set the coverage input.
    #[must_use]
    pub fn with_visited(mut self, source: VisitedSource) -> Self {
        self.visited = source;
        self
    }

    /// Set the output directory.
    #[must_use]
    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = dir.into();
        self
    }

    /// Set canvas configuration.
    #[must_use]
    pub fn with_raster(mut self, raster: RasterConfig) -> Self {
        self.raster = raster;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_select_prefers_ranges_file() {
        let source = VisitedSource::select(
            Some(Path::new("visited.txt")),
            Some(Path::new("trace.txt")),
            Some(Path::new("guest")),
        )
        .unwrap();
        assert_eq!(source, VisitedSource::Ranges("visited.txt".into()));
    }

    #[test]
    fn test_select_trace() {
        let source = VisitedSource::select(None, Some(Path::new("trace.txt")), None).unwrap();
        assert_eq!(source, VisitedSource::InsAddrs("trace.txt".into()));
    }

    #[test]
    fn test_select_defaults_to_stdin_without_guest() {
        let source = VisitedSource::select(None, None, None).unwrap();
        assert_eq!(source, VisitedSource::stdin());
        assert_eq!(source.to_string(), "ranges <stdin>");
    }

    #[test]
    fn test_select_requires_source_with_guest() {
        let err = VisitedSource::select(None, None, Some(Path::new("guest"))).unwrap_err();
        assert!(matches!(err, Error::NoVisitedSource(_)));
    }

    #[test]
    fn test_default_options() {
        let options = RenderOptions::default();
        assert_eq!(options.guest_dir, Path::new(DEFAULT_GUEST_DIR));
        assert_eq!(options.output_dir, Path::new("."));
        assert_eq!(options.visited, VisitedSource::stdin());
    }
}
