//! Terminal UI utilities for progress indication and styled output.

use std::borrow::Cow;
use std::time::Duration;

use console::style;
use drawcov::RenderReport;
use indicatif::{ProgressBar, ProgressStyle};

/// Spinner for indeterminate progress.
pub struct Spinner {
    bar: ProgressBar,
}

impl Spinner {
    /// Create a new spinner with a message.
    pub fn new(message: impl Into<Cow<'static, str>>) -> Self {
        let bar = ProgressBar::new_spinner();
        bar.set_style(
            ProgressStyle::default_spinner()
                .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"])
                .template("{spinner:.cyan} {msg}")
                .unwrap(),
        );
        bar.set_message(message);
        bar.enable_steady_tick(Duration::from_millis(80));
        Self { bar }
    }

    /// Finish the spinner with a success message.
    pub fn finish_with_success(&self, message: &str) {
        self.bar.finish_and_clear();
        eprintln!("{} {}", style("✓").green().bold(), message);
    }

    /// Finish the spinner with a failure message.
    pub fn finish_with_failure(&self, message: &str) {
        self.bar.finish_and_clear();
        eprintln!("{} {}", style("✗").red().bold(), message);
    }
}

impl Drop for Spinner {
    fn drop(&mut self) {
        self.bar.finish_and_clear();
    }
}

/// Print written images and skipped regions.
pub fn print_render_summary(report: &RenderReport) {
    for image in &report.images {
        eprintln!(
            "{} {} {}",
            style("✓").green().bold(),
            image.path.display(),
            style(format!("({} px)", image.painted)).dim()
        );
    }
    for skipped in &report.skipped {
        eprintln!(
            "{} {:#x} {}",
            style("-").dim(),
            skipped.region_start,
            style(skipped.reason).dim()
        );
    }
    eprintln!(
        "{} {} image(s), {} region(s) skipped",
        style("Done:").bold(),
        report.images.len(),
        report.skipped.len()
    );
}
