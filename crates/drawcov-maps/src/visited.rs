//! Observed coverage, as a map from start address to covered byte count.
//!
//! Two producers feed it: an explicit ranges file (`START-END ...` per line)
//! and an instruction-address trace (one address per line, in execution
//! order). The trace has no instruction lengths, so each instruction's width
//! is approximated by the distance to the next one.

use std::collections::BTreeMap;
use std::io::BufRead;
use std::ops::RangeBounds;
use std::path::Path;

use tracing::info;

use crate::int::parse_int;
use crate::{Result, for_each_line, open_input};

/// Widest instruction assumed when folding an address trace.
pub const MAX_INSN_BYTES: u64 = 16;

/// Covered bytes keyed by start address.
///
/// Entries may overlap; only identical starts collapse (last write wins).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct VisitedRanges {
    ranges: BTreeMap<u64, u64>,
}

impl VisitedRanges {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Load an explicit ranges file (`-` for stdin).
    ///
    /// # Errors
    ///
    /// Fails on a missing file or on the first malformed line.
    pub fn load_ranges(path: &Path) -> Result<Self> {
        Self::ranges_from_reader(open_input(path)?, path)
    }

    /// Load an instruction-address trace (`-` for stdin).
    ///
    /// # Errors
    ///
    /// Fails on a missing file or on the first malformed line.
    pub fn load_ins_addrs(path: &Path) -> Result<Self> {
        let visited = Self::ins_addrs_from_reader(open_input(path)?, path)?;
        info!(entries = visited.len(), "loaded instruction address trace");
        Ok(visited)
    }

    /// Parse `START-END ...` lines. Trailing fields are ignored.
    ///
    /// # Errors
    ///
    /// Fails on the first malformed line.
    pub fn ranges_from_reader<R: BufRead>(reader: R, origin: &Path) -> Result<Self> {
        let mut visited = Self::new();
        for_each_line(reader, origin, |line| {
            let (start, bytes) = parse_range(line)?;
            visited.insert(start, bytes);
            Ok(())
        })?;
        Ok(visited)
    }

    /// Fold an instruction-address trace into per-instruction widths.
    ///
    /// # Errors
    ///
    /// Fails on the first malformed line.
    pub fn ins_addrs_from_reader<R: BufRead>(reader: R, origin: &Path) -> Result<Self> {
        let mut folder = TraceFolder::new();
        for_each_line(reader, origin, |line| {
            folder.push(parse_int(line)?);
            Ok(())
        })?;
        Ok(folder.finish())
    }

    /// Record `bytes` covered from `start`, replacing any previous count.
    pub fn insert(&mut self, start: u64, bytes: u64) -> Option<u64> {
        self.ranges.insert(start, bytes)
    }

    pub fn remove(&mut self, start: u64) -> Option<u64> {
        self.ranges.remove(&start)
    }

    #[must_use]
    pub fn get(&self, start: u64) -> Option<u64> {
        self.ranges.get(&start).copied()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.ranges.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    /// All `(start, bytes)` pairs in ascending start order.
    pub fn iter(&self) -> impl Iterator<Item = (u64, u64)> + '_ {
        self.ranges.iter().map(|(&start, &bytes)| (start, bytes))
    }

    /// Entries whose start address falls in `starts`.
    pub fn starting_in<B: RangeBounds<u64>>(&self, starts: B) -> impl Iterator<Item = (u64, u64)> + '_ {
        self.ranges.range(starts).map(|(&start, &bytes)| (start, bytes))
    }
}

impl FromIterator<(u64, u64)> for VisitedRanges {
    fn from_iter<I: IntoIterator<Item = (u64, u64)>>(iter: I) -> Self {
        Self {
            ranges: iter.into_iter().collect(),
        }
    }
}

/// Parse the leading `START-END` token of a ranges line into `(start, bytes)`.
fn parse_range(line: &str) -> std::result::Result<(u64, u64), String> {
    let token = line.split_whitespace().next().unwrap_or_default();
    let (start, end) = token
        .split_once('-')
        .ok_or_else(|| format!("expected START-END, got '{token}'"))?;
    let start = parse_int(start)?;
    let end = parse_int(end)?;
    let bytes = end
        .checked_sub(start)
        .ok_or_else(|| format!("range end {end:#x} precedes start {start:#x}"))?;
    Ok((start, bytes))
}

/// Incremental fold of an instruction-address trace.
///
/// Each address closes the previous instruction: a forward step of at most
/// [`MAX_INSN_BYTES`] is taken as its width, anything else (repeat, backward
/// jump, long forward jump) falls back to [`MAX_INSN_BYTES`]. The last address
/// never gets an entry since nothing follows it.
#[derive(Debug, Default)]
pub struct TraceFolder {
    last_addr: u64,
    visited: VisitedRanges,
}

impl TraceFolder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, cur: u64) {
        let width = match cur.checked_sub(self.last_addr) {
            Some(step) if step > 0 && step <= MAX_INSN_BYTES => step,
            _ => MAX_INSN_BYTES,
        };
        self.visited.insert(self.last_addr, width);
        self.last_addr = cur;
    }

    /// Finish the fold, dropping the entry left at address 0 by the initial
    /// `last_addr`.
    #[must_use]
    pub fn finish(mut self) -> VisitedRanges {
        self.visited.remove(0);
        self.visited
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fold(addrs: &[u64]) -> VisitedRanges {
        let mut folder = TraceFolder::new();
        for &addr in addrs {
            folder.push(addr);
        }
        folder.finish()
    }

    #[test]
    fn test_trace_repeat_and_jump_fall_back() {
        let visited = fold(&[100, 104, 104, 250]);
        assert_eq!(visited.get(100), Some(4));
        assert_eq!(visited.get(104), Some(16));
        assert_eq!(visited.get(250), None);
        assert_eq!(visited.get(0), None);
        assert_eq!(visited.len(), 2);
    }

    #[test]
    fn test_trace_backward_jump() {
        let visited = fold(&[0x1000, 0x1003, 0x0ff8, 0x0ffc]);
        assert_eq!(visited.get(0x1000), Some(3));
        assert_eq!(visited.get(0x1003), Some(16));
        assert_eq!(visited.get(0x0ff8), Some(4));
    }

    #[test]
    fn test_trace_step_of_sixteen_is_kept() {
        let visited = fold(&[0x2000, 0x2010, 0x2021]);
        assert_eq!(visited.get(0x2000), Some(16));
        assert_eq!(visited.get(0x2010), Some(16));
    }

    #[test]
    fn test_trace_empty() {
        assert!(fold(&[]).is_empty());
    }

    #[test]
    fn test_trace_from_reader_hex_lines() {
        let input = "0x400000\n0x400004\n0x400006\n";
        let visited = VisitedRanges::ins_addrs_from_reader(input.as_bytes(), Path::new("trace")).unwrap();
        assert_eq!(visited.get(0x40_0000), Some(4));
        assert_eq!(visited.get(0x40_0004), Some(2));
        assert_eq!(visited.len(), 2);
    }

    #[test]
    fn test_trace_malformed_aborts() {
        let input = "0x400000\nnot-an-address\n";
        assert!(VisitedRanges::ins_addrs_from_reader(input.as_bytes(), Path::new("trace")).is_err());
    }

    #[test]
    fn test_ranges_last_line_wins() {
        let input = "100-110 a b\n100-120 c d\n";
        let visited = VisitedRanges::ranges_from_reader(input.as_bytes(), Path::new("visited")).unwrap();
        assert_eq!(visited.get(100), Some(20));
        assert_eq!(visited.len(), 1);
    }

    #[test]
    fn test_ranges_hex_and_trailing_fields() {
        let input = "0x1000-0x1010 hits=3\n0x2000-0x2001\n";
        let visited = VisitedRanges::ranges_from_reader(input.as_bytes(), Path::new("visited")).unwrap();
        assert_eq!(visited.iter().collect::<Vec<_>>(), vec![(0x1000, 0x10), (0x2000, 1)]);
    }

    #[test]
    fn test_ranges_malformed_aborts() {
        for input in ["0x1000\n", "0x2000-0x1000\n", "a-b\n"] {
            assert!(
                VisitedRanges::ranges_from_reader(input.as_bytes(), Path::new("visited")).is_err(),
                "{input}"
            );
        }
    }

    #[test]
    fn test_starting_in() {
        let visited: VisitedRanges = [(0x10, 1), (0x20, 2), (0x30, 3)].into_iter().collect();
        let hits: Vec<_> = visited.starting_in(0x20..0x30).collect();
        assert_eq!(hits, vec![(0x20, 2)]);
    }
}
