//! Function symbol table (`syms`).
//!
//! Line format: `NAME STARTHEX-ENDHEX` with bare hex addresses, e.g.
//! `xdr_netobj 7f17cac14b70-7f17cac14b81`.

use std::io::BufRead;
use std::path::Path;

use crate::int::parse_hex;
use crate::{Result, for_each_line, open_input};

/// File name of the symbol table inside a guest directory.
pub const SYMS_FILE: &str = "syms";

/// A named function and the bytes it spans.
///
/// Ordering is by `(start, name, length)`.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SymbolEntry {
    pub start: u64,
    pub name: String,
    pub length: u64,
}

impl SymbolEntry {
    pub fn new(start: u64, name: impl Into<String>, length: u64) -> Self {
        Self {
            start,
            name: name.into(),
            length,
        }
    }

    /// Parse one `syms` line.
    ///
    /// # Errors
    ///
    /// Returns a message describing the malformed field.
    pub fn parse(line: &str) -> std::result::Result<Self, String> {
        let mut fields = line.split_whitespace();
        let (Some(name), Some(range), None) = (fields.next(), fields.next(), fields.next()) else {
            return Err(format!("expected 'NAME START-END', got '{}'", line.trim()));
        };
        let (start, end) = range
            .split_once('-')
            .ok_or_else(|| format!("expected START-END, got '{range}'"))?;
        let start = parse_hex(start)?;
        let end = parse_hex(end)?;
        let length = end
            .checked_sub(start)
            .ok_or_else(|| format!("symbol {name} ends before it starts"))?;
        Ok(Self::new(start, name, length))
    }

    /// Exclusive end address.
    #[must_use]
    pub const fn end(&self) -> u64 {
        self.start.saturating_add(self.length)
    }

    /// Check if `addr` lies in `[start, start + length)`.
    #[must_use]
    pub const fn contains(&self, addr: u64) -> bool {
        addr >= self.start && addr < self.end()
    }
}

/// Symbols sorted ascending by start address. Read-only once built.
#[derive(Clone, Debug, Default)]
pub struct SymbolTable {
    entries: Vec<SymbolEntry>,
}

impl SymbolTable {
    /// Build a table from unsorted entries. Overlaps are kept as-is.
    #[must_use]
    pub fn from_entries(mut entries: Vec<SymbolEntry>) -> Self {
        entries.sort();
        Self { entries }
    }

    /// Load `syms` from a guest directory.
    ///
    /// # Errors
    ///
    /// Fails on a missing file or on the first malformed line.
    pub fn load_guest(guest_dir: &Path) -> Result<Self> {
        Self::load(&guest_dir.join(SYMS_FILE))
    }

    /// Load a symbol table file.
    ///
    /// # Errors
    ///
    /// Fails on a missing file or on the first malformed line.
    pub fn load(path: &Path) -> Result<Self> {
        Self::from_reader(open_input(path)?, path)
    }

    /// Parse a symbol table from `reader`; `origin` names it in errors.
    ///
    /// # Errors
    ///
    /// Fails on the first malformed line.
    pub fn from_reader<R: BufRead>(reader: R, origin: &Path) -> Result<Self> {
        let mut entries = Vec::new();
        for_each_line(reader, origin, |line| {
            entries.push(SymbolEntry::parse(line)?);
            Ok(())
        })?;
        Ok(Self::from_entries(entries))
    }

    #[must_use]
    pub fn entries(&self) -> &[SymbolEntry] {
        &self.entries
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Last entry (in sort order) whose start is `<= addr`.
    ///
    /// This is the entry a front-to-back scan stops on: the one preceding
    /// the first start greater than `addr`. It does not check that `addr`
    /// falls inside it.
    #[must_use]
    pub fn last_at_or_before(&self, addr: u64) -> Option<&SymbolEntry> {
        let idx = self.entries.partition_point(|s| s.start <= addr);
        if idx == 0 {
            None
        } else {
            Some(&self.entries[idx - 1])
        }
    }
}
