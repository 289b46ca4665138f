//! Configuration types for invoice synchronization.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::range::RangeRequest;

/// Default archive directory, relative to the working directory.
pub const DEFAULT_INVOICE_PATH: &str = "invoices";

/// Configuration for the download loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadConfig {
    /// Archive root; invoices land in `<invoice_path>/<provider>/<issuer id>/`.
    pub invoice_path: PathBuf,
    /// Whether to fetch the PDF rendition.
    pub download_pdf: bool,
    /// Whether to fetch the XML e-invoice.
    pub download_xml: bool,
}

impl Default for DownloadConfig {
    fn default() -> Self {
        Self {
            invoice_path: PathBuf::from(DEFAULT_INVOICE_PATH),
            download_pdf: true,
            download_xml: true,
        }
    }
}

impl DownloadConfig {
    /// Creates a new configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the archive root.
    #[must_use]
    pub fn with_invoice_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.invoice_path = path.into();
        self
    }

    /// Sets whether PDFs are downloaded.
    #[must_use]
    pub const fn with_pdf(mut self, enabled: bool) -> Self {
        self.download_pdf = enabled;
        self
    }

    /// Sets whether XML files are downloaded.
    #[must_use]
    pub const fn with_xml(mut self, enabled: bool) -> Self {
        self.download_xml = enabled;
        self
    }

    /// Returns true if at least one format is enabled.
    #[must_use]
    pub const fn downloads_anything(&self) -> bool {
        self.download_pdf || self.download_xml
    }
}

/// Portal login. `Debug` never prints the password.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Credentials {
    /// Portal username.
    pub username: String,
    /// Portal password.
    pub password: String,
}

impl Credentials {
    /// Returns true if both username and password are set.
    #[must_use]
    pub const fn is_complete(&self) -> bool {
        !self.username.is_empty() && !self.password.is_empty()
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"********")
            .finish()
    }
}

/// Everything one run needs, after flags, environment and file are merged.
#[derive(Debug, Clone, Default)]
pub struct AppConfig {
    /// Portal login.
    pub credentials: Credentials,
    /// Download loop settings.
    pub download: DownloadConfig,
    /// Raw provider filter as typed; empty means all providers.
    pub provider: String,
    /// Issuer ID filter.
    pub issuer_id: Option<String>,
    /// Explicit bounds and resume/redownload flags.
    pub range: RangeRequest,
    /// Print the provider catalog.
    pub list_providers: bool,
    /// Print matching invoices.
    pub list_invoices: bool,
}

impl AppConfig {
    /// Checks everything that can be checked before contacting the portal.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingCredentials`], [`Error::ConflictingFlags`],
    /// [`Error::InvalidRange`] or [`Error::NothingToDo`].
    pub fn validate(&self) -> Result<()> {
        if !self.credentials.is_complete() {
            return Err(Error::MissingCredentials);
        }
        self.range.validate()?;
        if !self.download.downloads_anything() && !self.list_invoices && !self.list_providers {
            return Err(Error::NothingToDo);
        }
        Ok(())
    }
}

/// Optional on-disk defaults, read from TOML.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    /// Portal username.
    pub username: Option<String>,
    /// Portal password.
    pub password: Option<String>,
    /// Archive root.
    pub invoice_path: Option<PathBuf>,
    /// Whether to fetch PDFs.
    pub download_pdf: Option<bool>,
    /// Whether to fetch XML files.
    pub download_xml: Option<bool>,
}

impl FileConfig {
    /// Default location: `<config dir>/dijnet-dl/config.toml`.
    #[must_use]
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("dijnet-dl")
            .join("config.toml")
    }

    /// Loads the file at `path`. A missing file yields `Ok(None)`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] if the file exists but cannot be read, and
    /// [`Error::Config`] if it is not valid TOML for this schema.
    pub fn load(path: &Path) -> Result<Option<Self>> {
        let text = match std::fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let config = toml::from_str(&text).map_err(|e| Error::Config {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        log::info!("Loaded config from {}", path.display());
        Ok(Some(config))
    }
}
