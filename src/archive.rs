//! Local archive scanning: finds the newest invoice already on disk.
//!
//! The archive is the tree written by [`crate::Downloader`]:
//! `<base>/<provider>/<issuer id>/<YYYY-MM-DD>_<invoice id>.{pdf,xml}`.
//! Only the file name matters here; any file following that naming scheme is
//! counted wherever it sits in the tree.

use std::io;
use std::path::Path;
use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;
use walkdir::WalkDir;

use crate::error::{Error, Result};
use crate::invoice::DATE_FORMAT;

static INVOICE_FILE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d{4}-\d{2}-\d{2})_.*\.(pdf|xml)$").expect("valid regex")
});

/// What the local archive already holds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LocalInvoiceState {
    /// Issue date of the newest archived invoice, if any.
    pub latest_date: Option<NaiveDate>,
}

impl LocalInvoiceState {
    /// Returns true if at least one archived invoice was found.
    #[must_use]
    pub const fn found(&self) -> bool {
        self.latest_date.is_some()
    }
}

/// Extracts the issue date from an archive file name.
///
/// Matching is case-insensitive. Returns `None` for names that do not follow
/// the archive naming scheme or carry an impossible calendar date.
#[must_use]
pub fn invoice_date_from_filename(name: &str) -> Option<NaiveDate> {
    let lower = name.to_lowercase();
    let caps = INVOICE_FILE_RE.captures(&lower)?;
    NaiveDate::parse_from_str(&caps[1], DATE_FORMAT).ok()
}

/// Scans `base` recursively and reports the newest archived invoice date.
///
/// A missing `base` is an empty archive, not an error.
///
/// # Errors
///
/// Returns [`Error::NotADirectory`] if `base` exists but is not a directory,
/// and [`Error::Scan`] if inspecting or walking the tree fails.
pub fn scan(base: &Path) -> Result<LocalInvoiceState> {
    match std::fs::metadata(base) {
        Ok(meta) if !meta.is_dir() => {
            return Err(Error::NotADirectory {
                path: base.to_path_buf(),
            });
        }
        Ok(_) => {}
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            log::debug!("Invoice path {} does not exist yet", base.display());
            return Ok(LocalInvoiceState::default());
        }
        Err(e) => {
            return Err(Error::Scan {
                path: base.to_path_buf(),
                source: e,
            });
        }
    }

    let mut latest: Option<NaiveDate> = None;
    let mut matched = 0usize;

    for entry in WalkDir::new(base) {
        let entry = entry.map_err(|e| Error::Scan {
            path: base.to_path_buf(),
            source: e.into(),
        })?;
        if entry.file_type().is_dir() {
            continue;
        }
        let Some(date) = entry
            .file_name()
            .to_str()
            .and_then(invoice_date_from_filename)
        else {
            continue;
        };
        matched += 1;
        latest = latest.max(Some(date));
    }

    log::debug!(
        "Scanned {}: {matched} archived invoice file(s), latest {latest:?}",
        base.display()
    );

    Ok(LocalInvoiceState {
        latest_date: latest,
    })
}
