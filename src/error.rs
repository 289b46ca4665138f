//! Error types for the dijnet-dl library.

use std::path::PathBuf;

use thiserror::Error;

/// Broad classification of an [`Error`], used for reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Bad flags, conflicting modes, or an invalid range. Raised before any
    /// remote call is made.
    Configuration,
    /// Login, catalog, or download failure reported by the remote service.
    Remote,
    /// Archive scan or directory provisioning failure.
    Filesystem,
    /// A provider filter matched nothing in the catalog.
    NotFound,
}

/// Errors that can occur while synchronizing invoices.
#[derive(Error, Debug)]
pub enum Error {
    /// Username or password is missing.
    #[error(
        "missing credentials: set --username/--password or DIJNET_USERNAME/DIJNET_PASSWORD"
    )]
    MissingCredentials,

    /// `--resume` and `--redownload` were both requested.
    #[error("--resume and --redownload are mutually exclusive")]
    ConflictingFlags,

    /// Both explicit bounds are set and `from` is after `to`.
    #[error("invalid range: --from ({from}) is after --to ({to})")]
    InvalidRange {
        /// Explicit lower bound.
        from: chrono::NaiveDate,
        /// Explicit upper bound.
        to: chrono::NaiveDate,
    },

    /// A date flag could not be parsed.
    #[error("invalid --{flag} date {value:?}, expected YYYY-MM-DD")]
    InvalidDate {
        /// Flag name without leading dashes.
        flag: String,
        /// Raw value supplied by the operator.
        value: String,
    },

    /// Both download formats are disabled and no list mode was requested.
    #[error(
        "nothing to do: enable --download-pdf and/or --download-xml, or use --list-invoices/--list-providers"
    )]
    NothingToDo,

    /// A command-line argument was malformed or unknown.
    #[error("{0}")]
    InvalidArgument(String),

    /// The configuration file could not be parsed.
    #[error("invalid config file {}: {message}", .path.display())]
    Config {
        /// Path of the offending file.
        path: PathBuf,
        /// Parser message.
        message: String,
    },

    /// The provider filter matched no catalog entry.
    #[error("provider {input:?} not found; use --list-providers to inspect valid names")]
    ProviderNotFound {
        /// The filter exactly as the operator typed it.
        input: String,
    },

    /// The invoice path exists but is not a directory.
    #[error("invoice path {} is not a directory", .path.display())]
    NotADirectory {
        /// Offending path.
        path: PathBuf,
    },

    /// Walking the invoice archive failed.
    #[error("unable to walk invoice path {}: {source}", .path.display())]
    Scan {
        /// Archive root being scanned.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// An invoice directory could not be created.
    #[error("unable to create directory {}: {source}", .path.display())]
    CreateDir {
        /// Directory that could not be created.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// Login was rejected or failed.
    #[error("login error: {0}")]
    Login(String),

    /// The provider catalog could not be fetched.
    #[error("unable to get providers: {0}")]
    Providers(String),

    /// The invoice catalog query failed.
    #[error("unable to get invoices: {0}")]
    Invoices(String),

    /// Downloading one invoice failed; the run stops here.
    #[error("download failed for invoice {invoice_id}: {source}")]
    Download {
        /// Identifier of the invoice being downloaded.
        invoice_id: String,
        /// What went wrong.
        source: Box<Error>,
    },

    /// I/O error during file operations.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP request error.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

impl Error {
    /// Returns the taxonomy bucket this error belongs to.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::MissingCredentials
            | Self::ConflictingFlags
            | Self::InvalidRange { .. }
            | Self::InvalidDate { .. }
            | Self::NothingToDo
            | Self::InvalidArgument(_)
            | Self::Config { .. } => ErrorKind::Configuration,
            Self::ProviderNotFound { .. } => ErrorKind::NotFound,
            Self::NotADirectory { .. } | Self::Scan { .. } | Self::CreateDir { .. } | Self::Io(_) => {
                ErrorKind::Filesystem
            }
            Self::Login(_)
            | Self::Providers(_)
            | Self::Invoices(_)
            | Self::Download { .. }
            | Self::Http(_) => ErrorKind::Remote,
        }
    }
}

/// A specialized `Result` type for dijnet-dl operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_not_found_echoes_input() {
        let err = Error::ProviderNotFound {
            input: "Gaz Co".to_string(),
        };
        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert!(err.to_string().contains("\"Gaz Co\""));
        assert!(err.to_string().contains("--list-providers"));
    }

    #[test]
    fn download_error_carries_invoice_id() {
        let err = Error::Download {
            invoice_id: "2024/001".to_string(),
            source: Box::new(Error::Io(std::io::Error::other("connection reset"))),
        };
        assert_eq!(err.kind(), ErrorKind::Remote);
        assert!(err.to_string().starts_with("download failed for invoice 2024/001"));
    }

    #[test]
    fn configuration_errors_are_classified() {
        assert_eq!(Error::ConflictingFlags.kind(), ErrorKind::Configuration);
        assert_eq!(Error::NothingToDo.kind(), ErrorKind::Configuration);
        assert_eq!(Error::MissingCredentials.kind(), ErrorKind::Configuration);
    }

    #[test]
    fn filesystem_errors_are_classified() {
        let err = Error::NotADirectory {
            path: PathBuf::from("invoices"),
        };
        assert_eq!(err.kind(), ErrorKind::Filesystem);
        assert_eq!(err.to_string(), "invoice path invoices is not a directory");
    }
}
