//! Metrics collection and reporting using metrics-rs.
//!
//! Run statistics are recorded through the `metrics` facade. The CLI installs
//! [`CliRecorder`] when `--metrics` is given and prints a summary on exit;
//! without a recorder every call here is a no-op.

use std::collections::HashMap;
use std::sync::Arc;

use drawcov_cov::ResolverStats;
use drawcov_maps::MemoryRegion;
use drawcov_raster::SkipReason;
use metrics::{
    Counter, Gauge, Histogram, Key, KeyName, Metadata, Recorder, SharedString, Unit, counter,
    describe_counter, describe_gauge, describe_histogram, gauge, histogram,
};
use parking_lot::RwLock;

// ============================================================================
// Metric descriptions
// ============================================================================

/// Register metric descriptions. Call once at startup.
pub fn init() {
    describe_counter!("drawcov_regions_total", Unit::Count, "Regions in the memory map");
    describe_counter!(
        "drawcov_regions_rendered_total",
        Unit::Count,
        "Regions written as images"
    );
    describe_counter!(
        "drawcov_regions_skipped_total",
        Unit::Count,
        "Regions skipped, by reason"
    );
    describe_counter!("drawcov_symbols_total", Unit::Count, "Symbols loaded");
    describe_counter!(
        "drawcov_visited_entries_total",
        Unit::Count,
        "Visited range entries loaded"
    );
    describe_counter!(
        "drawcov_pixels_painted_total",
        Unit::Count,
        "Foreground pixels across all images"
    );
    describe_counter!(
        "drawcov_functions_covered_total",
        Unit::Count,
        "Functions with at least one visited entry"
    );
    describe_counter!(
        "drawcov_resolver_memo_hits_total",
        Unit::Count,
        "Symbol lookups answered by the resolver memo"
    );
    describe_counter!(
        "drawcov_resolver_memo_misses_total",
        Unit::Count,
        "Symbol lookups that searched the table"
    );

    describe_gauge!(
        "drawcov_region_fill_ratio",
        Unit::Count,
        "Painted fraction of a region image (0-1)"
    );

    describe_histogram!("drawcov_region_bytes", Unit::Bytes, "Size of rendered regions");
}

// ============================================================================
// Metric recording functions
// ============================================================================

/// Record input sizes after loading.
pub fn record_load(regions: usize, symbols: usize, visited: usize) {
    counter!("drawcov_regions_total").absolute(regions as u64);
    counter!("drawcov_symbols_total").absolute(symbols as u64);
    counter!("drawcov_visited_entries_total").absolute(visited as u64);
}

/// Record one written region image.
#[allow(clippy::cast_precision_loss)]
pub fn record_region_rendered(region: &MemoryRegion, painted: u64, total_pixels: u64) {
    counter!("drawcov_regions_rendered_total").increment(1);
    counter!("drawcov_pixels_painted_total").increment(painted);
    histogram!("drawcov_region_bytes").record(region.len() as f64);
    if total_pixels > 0 {
        let labels = [("region", format!("{:#x}", region.start))];
        gauge!("drawcov_region_fill_ratio", &labels).set(painted as f64 / total_pixels as f64);
    }
}

/// Record one skipped region.
pub fn record_region_skipped(reason: SkipReason) {
    counter!("drawcov_regions_skipped_total", "reason" => reason.as_str()).increment(1);
}

/// Record a function coverage pass.
pub fn record_funcov(functions: usize, stats: ResolverStats) {
    counter!("drawcov_functions_covered_total").absolute(functions as u64);
    counter!("drawcov_resolver_memo_hits_total").absolute(stats.hits);
    counter!("drawcov_resolver_memo_misses_total").absolute(stats.misses);
}

// ============================================================================
// CLI Recorder for terminal output
// ============================================================================

/// In-memory metric values, keyed by rendered metric key.
#[derive(Default)]
struct Storage {
    counters: RwLock<HashMap<String, u64>>,
    gauges: RwLock<HashMap<String, f64>>,
    histograms: RwLock<HashMap<String, Vec<f64>>>,
}

/// Handle shared by all metric kinds of the CLI recorder.
struct CliHandle {
    key: String,
    storage: Arc<Storage>,
}

impl metrics::CounterFn for CliHandle {
    fn increment(&self, value: u64) {
        *self.storage.counters.write().entry(self.key.clone()).or_insert(0) += value;
    }

    fn absolute(&self, value: u64) {
        self.storage.counters.write().insert(self.key.clone(), value);
    }
}

impl metrics::GaugeFn for CliHandle {
    fn increment(&self, value: f64) {
        *self.storage.gauges.write().entry(self.key.clone()).or_insert(0.0) += value;
    }

    fn decrement(&self, value: f64) {
        *self.storage.gauges.write().entry(self.key.clone()).or_insert(0.0) -= value;
    }

    fn set(&self, value: f64) {
        self.storage.gauges.write().insert(self.key.clone(), value);
    }
}

impl metrics::HistogramFn for CliHandle {
    fn record(&self, value: f64) {
        self.storage
            .histograms
            .write()
            .entry(self.key.clone())
            .or_default()
            .push(value);
    }
}

/// Recorder that keeps metrics in memory for a terminal summary.
#[derive(Default)]
pub struct CliRecorder {
    storage: Arc<Storage>,
}

impl CliRecorder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Install as the global recorder.
    ///
    /// Returns `None` if a recorder is already installed.
    #[must_use]
    pub fn install(self) -> Option<CliRecorderHandle> {
        let storage = Arc::clone(&self.storage);
        metrics::set_global_recorder(self).ok()?;
        Some(CliRecorderHandle { storage })
    }

    fn handle(&self, key: &Key) -> Arc<CliHandle> {
        Arc::new(CliHandle {
            key: key_to_string(key),
            storage: Arc::clone(&self.storage),
        })
    }
}

fn key_to_string(key: &Key) -> String {
    let labels: Vec<String> = key
        .labels()
        .map(|l| format!("{}={}", l.key(), l.value()))
        .collect();
    if labels.is_empty() {
        key.name().to_string()
    } else {
        format!("{}{{{}}}", key.name(), labels.join(","))
    }
}

impl Recorder for CliRecorder {
    fn describe_counter(&self, _key: KeyName, _unit: Option<Unit>, _description: SharedString) {}
    fn describe_gauge(&self, _key: KeyName, _unit: Option<Unit>, _description: SharedString) {}
    fn describe_histogram(&self, _key: KeyName, _unit: Option<Unit>, _description: SharedString) {}

    fn register_counter(&self, key: &Key, _metadata: &Metadata<'_>) -> Counter {
        Counter::from_arc(self.handle(key))
    }

    fn register_gauge(&self, key: &Key, _metadata: &Metadata<'_>) -> Gauge {
        Gauge::from_arc(self.handle(key))
    }

    fn register_histogram(&self, key: &Key, _metadata: &Metadata<'_>) -> Histogram {
        Histogram::from_arc(self.handle(key))
    }
}

/// Access to metrics recorded after [`CliRecorder::install`].
pub struct CliRecorderHandle {
    storage: Arc<Storage>,
}

impl CliRecorderHandle {
    #[must_use]
    pub fn get_counter(&self, key: &str) -> Option<u64> {
        self.storage.counters.read().get(key).copied()
    }

    #[must_use]
    pub fn get_gauge(&self, key: &str) -> Option<f64> {
        self.storage.gauges.read().get(key).copied()
    }

    /// Print all collected metrics.
    #[allow(clippy::cast_precision_loss)]
    pub fn print_summary(&self) {
        let counters = self.storage.counters.read();
        let gauges = self.storage.gauges.read();
        let histograms = self.storage.histograms.read();

        if counters.is_empty() && gauges.is_empty() && histograms.is_empty() {
            println!("No metrics collected.");
            return;
        }

        println!();
        println!("## Metrics Summary");
        println!();

        if !counters.is_empty() {
            println!("### Counters");
            for (key, value) in sorted(&counters) {
                println!("  {key}: {value}");
            }
            println!();
        }

        if !gauges.is_empty() {
            println!("### Gauges");
            for (key, value) in sorted(&gauges) {
                println!("  {key}: {value:.6}");
            }
            println!();
        }

        if !histograms.is_empty() {
            println!("### Histograms");
            for (key, values) in sorted(&histograms) {
                if values.is_empty() {
                    continue;
                }
                let min = values.iter().copied().fold(f64::INFINITY, f64::min);
                let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
                let avg = values.iter().sum::<f64>() / values.len() as f64;
                println!(
                    "  {key}: count={}, min={min:.0}, max={max:.0}, avg={avg:.1}",
                    values.len()
                );
            }
            println!();
        }
    }
}

fn sorted<V>(map: &HashMap<String, V>) -> Vec<(&String, &V)> {
    let mut entries: Vec<_> = map.iter().collect();
    entries.sort_by(|a, b| a.0.cmp(b.0));
    entries
}
