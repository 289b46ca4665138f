//! Download orchestration: one remote request per invoice, in catalog order.

use std::time::Instant;

use crate::config::DownloadConfig;
use crate::error::{Error, Result};
use crate::fs::{FileSystem, TokioFileSystem};
use crate::invoice::InvoiceRecord;
use crate::service::InvoiceService;
use crate::stats::{InvoiceStats, SessionStats, SessionStatsBuilder};

/// Trait for receiving download progress updates.
///
/// All methods have default no-op implementations for convenience.
pub trait DownloadProgress: Send + Sync {
    /// Called before invoice `index` (1-based) of `total` is attempted.
    fn on_invoice_start(&self, _index: usize, _total: usize, _invoice: &InvoiceRecord) {}

    /// Called when an invoice's artifacts have been written.
    fn on_invoice_complete(&self, _invoice: &InvoiceRecord, _stats: &InvoiceStats) {}

    /// Called when an invoice fails. The run stops right after.
    fn on_error(&self, _invoice: &InvoiceRecord, _error: &str) {}
}

/// A null progress implementation that ignores all events.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoProgress;

impl DownloadProgress for NoProgress {}

/// Drives the download loop against an [`InvoiceService`].
pub struct Downloader<'a, S: InvoiceService + ?Sized, F: FileSystem = TokioFileSystem> {
    service: &'a S,
    config: DownloadConfig,
    fs: F,
}

impl<'a, S: InvoiceService + ?Sized> Downloader<'a, S, TokioFileSystem> {
    /// Creates a new downloader with the default file system.
    #[must_use]
    pub const fn new(service: &'a S, config: DownloadConfig) -> Self {
        Self {
            service,
            config,
            fs: TokioFileSystem,
        }
    }
}

impl<'a, S: InvoiceService + ?Sized, F: FileSystem> Downloader<'a, S, F> {
    /// Creates a new downloader with a custom file system implementation.
    #[must_use]
    pub const fn with_fs(service: &'a S, config: DownloadConfig, fs: F) -> Self {
        Self {
            service,
            config,
            fs,
        }
    }

    /// Returns a reference to the download configuration.
    #[must_use]
    pub const fn config(&self) -> &DownloadConfig {
        &self.config
    }

    /// Downloads a single invoice.
    ///
    /// Creates `<invoice_path>/<provider>/<issuer id>` and asks the service
    /// for the enabled formats. Nothing is cleaned up on failure.
    ///
    /// # Errors
    ///
    /// Returns [`Error::CreateDir`] if the directory cannot be created, and
    /// [`Error::Download`] wrapping the service error otherwise.
    pub async fn download_invoice(&self, invoice: &InvoiceRecord) -> Result<InvoiceStats> {
        let started = Instant::now();
        let target = invoice.target(
            &self.config.invoice_path,
            self.config.download_pdf,
            self.config.download_xml,
        );

        self.fs
            .create_dir_all(&target.directory)
            .await
            .map_err(|source| Error::CreateDir {
                path: target.directory.clone(),
                source,
            })?;

        self.service
            .download_invoice(invoice, target.pdf.as_deref(), target.xml.as_deref())
            .await
            .map_err(|e| Error::Download {
                invoice_id: invoice.invoice_id.clone(),
                source: Box::new(e),
            })?;

        let mut stats = InvoiceStats::default();
        for path in target.paths() {
            if let Some(size) = self.fs.file_size(path).await {
                stats.files += 1;
                stats.bytes += size;
            }
        }
        stats.elapsed = started.elapsed();
        Ok(stats)
    }

    /// Downloads every invoice in order, stopping at the first failure.
    ///
    /// Invoices are neither reordered nor deduplicated, and failures are not
    /// retried: the next run resumes from the archive instead.
    ///
    /// # Errors
    ///
    /// Returns the first error from [`download_invoice`](Self::download_invoice).
    pub async fn download_all(
        &self,
        invoices: &[InvoiceRecord],
        progress: &dyn DownloadProgress,
    ) -> Result<SessionStats> {
        let mut builder = SessionStatsBuilder::new();
        let total = invoices.len();

        for (i, invoice) in invoices.iter().enumerate() {
            progress.on_invoice_start(i + 1, total, invoice);
            match self.download_invoice(invoice).await {
                Ok(stats) => {
                    progress.on_invoice_complete(invoice, &stats);
                    builder.add_invoice(&stats);
                }
                Err(e) => {
                    log::error!("Download failed: {e}");
                    progress.on_error(invoice, &e.to_string());
                    return Err(e);
                }
            }
        }

        Ok(builder.build())
    }
}
