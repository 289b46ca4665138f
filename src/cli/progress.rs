//! Progress bar and listing output for CLI runs.

use indicatif::{ProgressBar, ProgressStyle};

use crate::download::DownloadProgress;
use crate::format::{format_bytes, format_duration, format_invoice_line};
use crate::invoice::InvoiceRecord;
use crate::stats::{InvoiceStats, SessionStats};

const SEPARATOR: &str = "────────────────────────────────────────────────────────────";

/// Creates the bar that tracks invoices completed out of `total`.
///
/// # Panics
///
/// Panics if the progress template fails to parse (this is a compile-time
/// constant and will not happen in practice).
#[must_use]
pub fn make_invoice_bar(total: usize) -> ProgressBar {
    let bar = ProgressBar::new(total as u64);
    bar.set_style(
        ProgressStyle::with_template("{spinner:.cyan} [{bar:40.green/white}] {pos}/{len} {msg}")
            .expect("progress template is valid")
            .progress_chars("━━╌"),
    );
    bar
}

/// Reports each invoice above a shared progress bar.
pub struct CliProgress {
    bar: ProgressBar,
}

impl CliProgress {
    /// Wraps an existing bar.
    #[must_use]
    pub const fn new(bar: ProgressBar) -> Self {
        Self { bar }
    }

    /// Clears the bar from the terminal.
    pub fn finish(&self) {
        self.bar.finish_and_clear();
    }
}

impl DownloadProgress for CliProgress {
    fn on_invoice_start(&self, index: usize, total: usize, invoice: &InvoiceRecord) {
        self.bar.suspend(|| println!("Downloading invoice {index}/{total}"));
        self.bar.set_message(invoice.invoice_id.clone());
    }

    fn on_invoice_complete(&self, invoice: &InvoiceRecord, stats: &InvoiceStats) {
        self.bar.inc(1);
        self.bar.println(format!(
            "  {} - {} file(s), {} in {}",
            invoice.filename_stem(),
            stats.files,
            format_bytes(stats.bytes),
            format_duration(stats.elapsed),
        ));
    }

    fn on_error(&self, invoice: &InvoiceRecord, error: &str) {
        self.bar.abandon_with_message(format!("{} failed", invoice.invoice_id));
        log::debug!("Progress stopped on {}: {error}", invoice.invoice_id);
    }
}

/// Prints the provider catalog, one name per line.
pub fn print_providers(providers: &[String]) {
    for provider in providers {
        println!("{provider}");
    }
}

/// Prints matching invoices, one line each.
pub fn print_invoice_list(invoices: &[InvoiceRecord]) {
    for invoice in invoices {
        println!("{}", format_invoice_line(invoice));
    }
}

/// Prints a summary of download statistics.
pub fn print_summary(stats: &SessionStats) {
    if stats.invoices_downloaded == 0 {
        return;
    }

    println!("\n{SEPARATOR}");
    println!("Download Summary");
    println!("{SEPARATOR}");
    println!("  Invoices downloaded: {}", stats.invoices_downloaded);
    println!("  Files written:       {}", stats.files_written);
    println!("  Total size:          {}", format_bytes(stats.total_bytes));
    println!("  Total time:          {}", format_duration(stats.elapsed));
    println!(
        "  Average per invoice: {}",
        format_duration(stats.average_per_invoice())
    );
    println!("{SEPARATOR}");
}
