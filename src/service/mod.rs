//! The remote invoice service seam.
//!
//! [`crate::Downloader`] and [`crate::cli::run`] only talk to the remote side
//! through [`InvoiceService`]; [`DijnetClient`] is the HTTP implementation.

mod dijnet;

use std::path::Path;

use async_trait::async_trait;

use crate::error::Result;
use crate::invoice::{InvoiceRecord, InvoicesQuery, ProviderCatalog};

pub use dijnet::{DEFAULT_BASE_URL, DijnetClient};

/// Operations offered by an authenticated invoice portal session.
#[async_trait]
pub trait InvoiceService: Send + Sync {
    /// Opens a session.
    async fn login(&self, username: &str, password: &str) -> Result<()>;

    /// Lists the providers the account has invoices from.
    async fn providers(&self) -> Result<ProviderCatalog>;

    /// Queries the invoice catalog.
    async fn invoices(&self, query: &InvoicesQuery) -> Result<Vec<InvoiceRecord>>;

    /// Fetches the artifacts of one invoice. A `None` path skips that artifact.
    async fn download_invoice(
        &self,
        invoice: &InvoiceRecord,
        pdf: Option<&Path>,
        xml: Option<&Path>,
    ) -> Result<()>;
}
