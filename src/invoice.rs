//! Invoice records, catalog queries, and deterministic local file naming.

use std::path::{Path, PathBuf};

use chrono::NaiveDate;

use crate::range::DateRange;

/// Date format used in archive file names and on the command line.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// One invoice as reported by the remote catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvoiceRecord {
    /// Canonical provider name.
    pub provider: String,
    /// Issuer-side customer identifier.
    pub issuer_id: String,
    /// Invoice number; may contain `/`.
    pub invoice_id: String,
    /// Billing date of issue.
    pub date_of_issue: NaiveDate,
    /// Opaque handle the remote service uses to select this row.
    pub row: usize,
}

impl InvoiceRecord {
    /// Returns the file name stem `<YYYY-MM-DD>_<invoice id>` with every `/`
    /// in the identifier replaced by `_`.
    #[must_use]
    pub fn filename_stem(&self) -> String {
        format!(
            "{}_{}",
            self.date_of_issue.format(DATE_FORMAT),
            self.invoice_id.replace('/', "_")
        )
    }

    /// Returns the directory `<base>/<provider>/<issuer id>` the invoice's
    /// artifacts are stored in.
    #[must_use]
    pub fn directory(&self, base: &Path) -> PathBuf {
        base.join(&self.provider).join(&self.issuer_id)
    }

    /// Computes where this invoice's artifacts go. Disabled formats get no path.
    #[must_use]
    pub fn target(&self, base: &Path, pdf: bool, xml: bool) -> DownloadTarget {
        let directory = self.directory(base);
        let stem = self.filename_stem();
        let pdf = pdf.then(|| directory.join(format!("{stem}.pdf")));
        let xml = xml.then(|| directory.join(format!("{stem}.xml")));
        DownloadTarget {
            directory,
            pdf,
            xml,
        }
    }
}

/// Local destination of one invoice's artifacts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadTarget {
    /// Directory holding both artifacts.
    pub directory: PathBuf,
    /// PDF destination, absent when PDF download is disabled.
    pub pdf: Option<PathBuf>,
    /// XML destination, absent when XML download is disabled.
    pub xml: Option<PathBuf>,
}

impl DownloadTarget {
    /// Iterates over the enabled artifact paths.
    pub fn paths(&self) -> impl Iterator<Item = &Path> {
        self.pdf.iter().chain(self.xml.iter()).map(PathBuf::as_path)
    }
}

/// Provider names offered by the remote service plus the session token
/// required for catalog queries.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProviderCatalog {
    /// Canonical provider names in the order the service lists them.
    pub providers: Vec<String>,
    /// Form token tied to the current session.
    pub token: String,
}

/// Filters for one remote catalog query.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InvoicesQuery {
    /// Resolved provider name, `None` for all providers.
    pub provider: Option<String>,
    /// Issuer-side customer identifier, `None` for all.
    pub issuer_id: Option<String>,
    /// Issue date bounds.
    pub range: DateRange,
    /// Session token from [`ProviderCatalog`].
    pub token: String,
}
