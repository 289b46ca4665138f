//! Download run statistics.

use std::time::{Duration, Instant};

/// Outcome of downloading one invoice.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InvoiceStats {
    /// Number of artifacts written (0, 1 or 2).
    pub files: usize,
    /// Combined size of the written artifacts in bytes.
    pub bytes: u64,
    /// Time spent on this invoice.
    pub elapsed: Duration,
}

/// Statistics for an entire download run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionStats {
    /// Number of invoices downloaded.
    pub invoices_downloaded: usize,
    /// Number of artifacts written.
    pub files_written: usize,
    /// Total bytes written.
    pub total_bytes: u64,
    /// Total elapsed time for the run.
    pub elapsed: Duration,
}

impl Default for SessionStats {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionStats {
    /// Creates a new empty session stats.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            invoices_downloaded: 0,
            files_written: 0,
            total_bytes: 0,
            elapsed: Duration::ZERO,
        }
    }

    /// Returns the average time per invoice.
    #[must_use]
    pub fn average_per_invoice(&self) -> Duration {
        u32::try_from(self.invoices_downloaded)
            .ok()
            .filter(|&n| n > 0)
            .map_or(Duration::ZERO, |n| self.elapsed / n)
    }
}

/// Builder for accumulating session statistics during a run.
pub struct SessionStatsBuilder {
    invoices_downloaded: usize,
    files_written: usize,
    total_bytes: u64,
    start_time: Instant,
}

impl Default for SessionStatsBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionStatsBuilder {
    /// Creates a new session stats builder; the clock starts now.
    #[must_use]
    pub fn new() -> Self {
        Self {
            invoices_downloaded: 0,
            files_written: 0,
            total_bytes: 0,
            start_time: Instant::now(),
        }
    }

    /// Records a completed invoice.
    pub const fn add_invoice(&mut self, stats: &InvoiceStats) {
        self.invoices_downloaded += 1;
        self.files_written += stats.files;
        self.total_bytes += stats.bytes;
    }

    /// Builds the final session statistics.
    #[must_use]
    pub fn build(self) -> SessionStats {
        SessionStats {
            invoices_downloaded: self.invoices_downloaded,
            files_written: self.files_written,
            total_bytes: self.total_bytes,
            elapsed: self.start_time.elapsed(),
        }
    }
}
