//! Shared helpers for drawcov integration tests.

#![allow(dead_code)]

use std::fs::{self, File};
use std::path::{Path, PathBuf};

use tempfile::TempDir;

/// Executable region exactly one canvas (640x480 bytes) long.
pub const TEXT_START: u64 = 0x40_0000;
pub const TEXT_END: u64 = TEXT_START + 640 * 480;

pub const MAPINFO: &str = "\
0x400000-0x44b000 5 2 /home/user/bin/target
0x44b000-0x44c000 3 2 /home/user/bin/target
0x7f0000000000-0x7f0000001000 5 34
0x7f0000002000-0x7f0000002000 5 34
";

pub const SYMS: &str = "\
main 400100-400180
helper 400000-400040
_start 7f0000000000-7f0000000010
";

/// Guest directory plus separate output directory.
pub struct Guest {
    pub root: TempDir,
}

impl Guest {
    pub fn new() -> Self {
        Self::with_files(MAPINFO, SYMS)
    }

    pub fn with_files(mapinfo: &str, syms: &str) -> Self {
        let root = tempfile::tempdir().expect("failed to create temp dir");
        fs::create_dir(root.path().join("guest")).unwrap();
        fs::write(root.path().join("guest/mapinfo"), mapinfo).unwrap();
        fs::write(root.path().join("guest/syms"), syms).unwrap();
        Self { root }
    }

    pub fn dir(&self) -> PathBuf {
        self.root.path().join("guest")
    }

    pub fn out(&self) -> PathBuf {
        self.root.path().join("out")
    }

    /// Write a file next to the guest directory and return its path.
    pub fn write(&self, name: &str, contents: &str) -> PathBuf {
        let path = self.root.path().join(name);
        fs::write(&path, contents).unwrap();
        path
    }
}

/// Decoded RGB image.
pub struct Image {
    pub width: u32,
    pub height: u32,
    pub rgb: Vec<u8>,
}

impl Image {
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 3] {
        let at = ((y * self.width + x) * 3) as usize;
        [self.rgb[at], self.rgb[at + 1], self.rgb[at + 2]]
    }

    pub fn count(&self, color: [u8; 3]) -> usize {
        self.rgb.chunks_exact(3).filter(|px| *px == color).count()
    }
}

pub fn read_png(path: &Path) -> Image {
    let decoder = png::Decoder::new(File::open(path).expect("image not written"));
    let mut reader = decoder.read_info().unwrap();
    let mut buf = vec![0; reader.output_buffer_size()];
    let info = reader.next_frame(&mut buf).unwrap();
    assert_eq!(info.color_type, png::ColorType::Rgb);
    buf.truncate(info.buffer_size());
    Image {
        width: info.width,
        height: info.height,
        rgb: buf,
    }
}
