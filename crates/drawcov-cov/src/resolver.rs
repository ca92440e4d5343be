//! Address to enclosing-symbol lookup with a one-entry memo.

use drawcov_maps::{SymbolEntry, SymbolTable};

/// Lookup counters, mostly useful to see how often the memo pays off.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ResolverStats {
    pub hits: u64,
    pub misses: u64,
}

/// Resolves addresses against a [`SymbolTable`].
///
/// The last successful answer is memoized. A memo hit requires
/// `memo.start < addr < memo.end()`: the lower bound is strict, so querying a
/// symbol's exact start always goes to the table even when that symbol is
/// memoized. The table search returns the same answer either way.
#[derive(Debug)]
pub struct SymbolResolver<'a> {
    table: &'a SymbolTable,
    memo: Option<&'a SymbolEntry>,
    stats: ResolverStats,
}

impl<'a> SymbolResolver<'a> {
    #[must_use]
    pub const fn new(table: &'a SymbolTable) -> Self {
        Self {
            table,
            memo: None,
            stats: ResolverStats { hits: 0, misses: 0 },
        }
    }

    /// Find the symbol whose `[start, start + length)` contains `addr`.
    ///
    /// Returns `None` for addresses before the first symbol, in gaps, or past
    /// the end of the last symbol. Where symbols overlap, the candidate is the
    /// last one (in table order) starting at or before `addr`.
    pub fn resolve(&mut self, addr: u64) -> Option<&'a SymbolEntry> {
        if let Some(memo) = self.memo {
            if addr > memo.start && addr < memo.end() {
                self.stats.hits += 1;
                return Some(memo);
            }
        }

        self.stats.misses += 1;
        let candidate = self.table.last_at_or_before(addr)?;
        if !candidate.contains(addr) {
            return None;
        }
        self.memo = Some(candidate);
        Some(candidate)
    }

    /// The memoized symbol, if any.
    #[must_use]
    pub const fn memo(&self) -> Option<&'a SymbolEntry> {
        self.memo
    }

    #[must_use]
    pub const fn stats(&self) -> ResolverStats {
        self.stats
    }

    /// Forget the memo and counters.
    pub const fn reset(&mut self) {
        self.memo = None;
        self.stats = ResolverStats { hits: 0, misses: 0 };
    }
}
