//! dijnet-dl - A library for incrementally syncing invoices from Dijnet.
//!
//! Invoices are archived as
//! `<invoice_path>/<provider>/<issuer id>/<YYYY-MM-DD>_<invoice id>.{pdf,xml}`.
//! The newest date found in that tree is where the next run resumes.
//!
//! # Example
//!
//! ```no_run
//! use dijnet_dl::{
//!     DateRange, DijnetClient, DownloadConfig, Downloader, InvoiceService, InvoicesQuery,
//!     LocalInvoiceState, NoProgress, RangeRequest, plan, resolve_provider, scan,
//! };
//!
//! # async fn example() -> dijnet_dl::Result<()> {
//! let client = DijnetClient::new()?;
//! client.login("user", "password").await?;
//! let catalog = client.providers().await?;
//!
//! let config = DownloadConfig::new().with_invoice_path("invoices");
//! let local: LocalInvoiceState = scan(&config.invoice_path)?;
//! let request = RangeRequest { resume: true, ..RangeRequest::default() };
//! let range: DateRange = plan(request, &local, |_| Ok(true))?;
//!
//! let query = InvoicesQuery {
//!     provider: resolve_provider("water", &catalog.providers)?,
//!     issuer_id: None,
//!     range,
//!     token: catalog.token,
//! };
//! let invoices = client.invoices(&query).await?;
//!
//! let stats = Downloader::new(&client, config)
//!     .download_all(&invoices, &NoProgress)
//!     .await?;
//! println!("Downloaded {} invoices", stats.invoices_downloaded);
//! # Ok(())
//! # }
//! ```

#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

pub mod archive;
pub mod config;
pub mod download;
pub mod error;
pub mod format;
pub mod fs;
pub mod invoice;
pub mod provider;
pub mod range;
pub mod service;
pub mod stats;

#[cfg(feature = "cli")]
pub mod cli;

// Re-export main types for convenience
pub use archive::{LocalInvoiceState, scan};
pub use config::{AppConfig, Credentials, DownloadConfig, FileConfig};
pub use download::{DownloadProgress, Downloader, NoProgress};
pub use error::{Error, ErrorKind, Result};
pub use format::{format_bytes, format_duration, format_invoice_line};
pub use fs::{FileSystem, TokioFileSystem};
pub use invoice::{DownloadTarget, InvoiceRecord, InvoicesQuery, ProviderCatalog};
pub use provider::resolve_provider;
pub use range::{DateRange, RangeRequest, plan};
pub use service::{DEFAULT_BASE_URL, DijnetClient, InvoiceService};
pub use stats::{InvoiceStats, SessionStats};
