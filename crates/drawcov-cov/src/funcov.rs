//! Per-function coverage summary (`funcov.txt`).
//!
//! Format, one function per line: `NAME TOTAL COVERED`, e.g. `malloc 200 100`.
//! `COVERED` is the plain sum of the visited byte counts whose start resolves
//! to the function. It is not clamped, so overlapping or overhanging ranges
//! can push it past `TOTAL`.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use drawcov_maps::VisitedRanges;
use rustc_hash::FxHashMap;
use tracing::debug;

use crate::{CovError, Result, SymbolResolver};

/// File name of the summary in the output directory.
pub const FUNCOV_FILE: &str = "funcov.txt";

/// Coverage totals for one function.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FunctionCoverage {
    pub name: String,
    /// Symbol length from the symbol table.
    pub total_bytes: u64,
    pub covered_bytes: u64,
}

/// Assign every visited entry to its enclosing function.
///
/// Entries are walked in ascending address order and unresolved ones are
/// skipped. Functions appear in the order they are first hit.
pub fn aggregate(resolver: &mut SymbolResolver<'_>, visited: &VisitedRanges) -> Vec<FunctionCoverage> {
    let mut functions: Vec<FunctionCoverage> = Vec::new();
    let mut index: FxHashMap<&str, usize> = FxHashMap::default();
    let mut unresolved = 0usize;

    for (addr, bytes) in visited.iter() {
        let Some(sym) = resolver.resolve(addr) else {
            unresolved += 1;
            continue;
        };
        let slot = *index.entry(sym.name.as_str()).or_insert_with(|| {
            functions.push(FunctionCoverage {
                name: sym.name.clone(),
                total_bytes: sym.length,
                covered_bytes: 0,
            });
            functions.len() - 1
        });
        let func = &mut functions[slot];
        func.covered_bytes = func.covered_bytes.saturating_add(bytes);
    }

    let stats = resolver.stats();
    debug!(
        functions = functions.len(),
        unresolved,
        memo_hits = stats.hits,
        memo_misses = stats.misses,
        "coverages assigned"
    );
    functions
}

/// Write summary lines to `out`.
///
/// # Errors
///
/// Propagates write failures.
pub fn write_funcov_to<W: Write>(out: &mut W, functions: &[FunctionCoverage]) -> std::io::Result<()> {
    for func in functions {
        writeln!(out, "{} {} {}", func.name, func.total_bytes, func.covered_bytes)?;
    }
    out.flush()
}

/// Write `funcov.txt` into `dir` and return its path.
///
/// # Errors
///
/// Returns [`CovError::Io`] if the file cannot be created or written.
pub fn write_funcov(dir: &Path, functions: &[FunctionCoverage]) -> Result<PathBuf> {
    let path = dir.join(FUNCOV_FILE);
    let io_err = |source| CovError::Io {
        path: path.clone(),
        source,
    };
    let file = File::create(&path).map_err(io_err)?;
    write_funcov_to(&mut BufWriter::new(file), functions).map_err(io_err)?;
    Ok(path)
}
