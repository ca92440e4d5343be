//! Memory map snapshot (`mapinfo`).
//!
//! Line format: `STARTHEX-ENDHEX PROT FLAGS [BACKINGPATH]`, e.g.
//! `0x7f12718c2000-0x7f1271a47000 5 0 /lib64/libc-2.14.1.so`.

use std::collections::BTreeMap;
use std::io::BufRead;
use std::path::Path;

use tracing::debug;

use crate::int::parse_int;
use crate::{Result, for_each_line, open_input};

/// File name of the memory map inside a guest directory.
pub const MAPINFO_FILE: &str = "mapinfo";

/// Execute permission bit in [`MemoryRegion::protection`].
pub const PROT_EXEC: u32 = 0x4;

/// A contiguous span of guest address space.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MemoryRegion {
    pub start: u64,
    /// Exclusive end address.
    pub end: u64,
    pub protection: u32,
    pub flags: u64,
    /// Final path component of the backing file, if any.
    pub name: Option<String>,
}

impl MemoryRegion {
    /// Parse one `mapinfo` line.
    ///
    /// # Errors
    ///
    /// Returns a message describing the first malformed field.
    pub fn parse(line: &str) -> std::result::Result<Self, String> {
        let line = line.trim();
        let (start, rest) = line
            .split_once('-')
            .ok_or_else(|| format!("expected START-END, got '{line}'"))?;
        let (end, rest) = next_field(rest).ok_or("missing region end")?;
        let (protection, rest) = next_field(rest).ok_or("missing protection")?;
        let (flags, rest) = next_field(rest).ok_or("missing flags")?;

        let protection = protection
            .parse::<u32>()
            .map_err(|e| format!("invalid protection '{protection}': {e}"))?;
        let flags = flags
            .parse::<u64>()
            .map_err(|e| format!("invalid flags '{flags}': {e}"))?;

        Ok(Self {
            start: parse_int(start)?,
            end: parse_int(end)?,
            protection,
            flags,
            name: next_field(rest).and_then(|(path, _)| backing_name(path)),
        })
    }

    /// Region size in bytes (zero if `end <= start`).
    #[must_use]
    pub const fn len(&self) -> u64 {
        self.end.saturating_sub(self.start)
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Check if the region is mapped executable.
    #[must_use]
    pub const fn is_executable(&self) -> bool {
        (self.protection & PROT_EXEC) != 0
    }

    /// Check if `[start, start + bytes)` lies entirely within the region.
    #[must_use]
    pub const fn contains_range(&self, start: u64, bytes: u64) -> bool {
        if start < self.start {
            return false;
        }
        match start.checked_add(bytes) {
            Some(end) => end <= self.end,
            None => false,
        }
    }
}

/// Split off the next whitespace-delimited field.
fn next_field(s: &str) -> Option<(&str, &str)> {
    let s = s.trim_start();
    if s.is_empty() {
        return None;
    }
    Some(s.split_once(char::is_whitespace).unwrap_or((s, "")))
}

fn backing_name(path: &str) -> Option<String> {
    path.rsplit('/')
        .next()
        .filter(|name| !name.is_empty())
        .map(str::to_string)
}

/// All regions of a snapshot, keyed by start address.
#[derive(Clone, Debug, Default)]
pub struct MemoryMap {
    regions: BTreeMap<u64, MemoryRegion>,
}

impl MemoryMap {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Load `mapinfo` from a guest directory.
    ///
    /// # Errors
    ///
    /// Fails on a missing file or on the first malformed line.
    pub fn load_guest(guest_dir: &Path) -> Result<Self> {
        Self::load(&guest_dir.join(MAPINFO_FILE))
    }

    /// Load a memory map file.
    ///
    /// # Errors
    ///
    /// Fails on a missing file or on the first malformed line.
    pub fn load(path: &Path) -> Result<Self> {
        Self::from_reader(open_input(path)?, path)
    }

    /// Parse a memory map from `reader`; `origin` names it in errors.
    ///
    /// # Errors
    ///
    /// Fails on the first malformed line.
    pub fn from_reader<R: BufRead>(reader: R, origin: &Path) -> Result<Self> {
        let mut map = Self::new();
        for_each_line(reader, origin, |line| {
            let region = MemoryRegion::parse(line)?;
            debug!(
                start = format_args!("{:#x}", region.start),
                end = format_args!("{:#x}", region.end),
                prot = region.protection,
                "region"
            );
            map.insert(region);
            Ok(())
        })?;
        Ok(map)
    }

    /// Insert a region; a previous region with the same start is replaced.
    pub fn insert(&mut self, region: MemoryRegion) -> Option<MemoryRegion> {
        self.regions.insert(region.start, region)
    }

    #[must_use]
    pub fn get(&self, start: u64) -> Option<&MemoryRegion> {
        self.regions.get(&start)
    }

    /// Regions in ascending start order.
    pub fn regions(&self) -> impl Iterator<Item = &MemoryRegion> {
        self.regions.values()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.regions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }
}
