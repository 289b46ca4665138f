//! Command-line argument parsing and config assembly.
//!
//! Flags take one or two leading dashes. Value flags accept `--name value`
//! or `--name=value`; boolean flags accept `--name` or `--name=<bool>`.

use std::path::PathBuf;

use crate::config::{AppConfig, Credentials, DEFAULT_INVOICE_PATH, DownloadConfig, FileConfig};
use crate::error::{Error, Result};
use crate::range::{RangeRequest, parse_date_flag};

/// Raw command-line values, before environment and file defaults apply.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CliArgs {
    /// `--username`.
    pub username: Option<String>,
    /// `--password`.
    pub password: Option<String>,
    /// `--invoice-path`: archive root.
    pub invoice_path: Option<PathBuf>,
    /// `--provider`: raw provider filter.
    pub provider: Option<String>,
    /// `--issuer-id`.
    pub issuer_id: Option<String>,
    /// `--from`, unparsed.
    pub from: Option<String>,
    /// `--to`, unparsed.
    pub to: Option<String>,
    /// `--resume`.
    pub resume: bool,
    /// `--redownload`.
    pub redownload: bool,
    /// `--list-providers`.
    pub list_providers: bool,
    /// `--list-invoices`.
    pub list_invoices: bool,
    /// `--download-pdf`; `None` when not given.
    pub download_pdf: Option<bool>,
    /// `--download-xml`; `None` when not given.
    pub download_xml: Option<bool>,
    /// `--config`: TOML file to read instead of the default.
    pub config: Option<PathBuf>,
    /// `-h` / `--help`.
    pub help: bool,
}

/// Parses a boolean flag value the way Go-style CLIs do.
fn parse_bool(flag: &str, value: &str) -> Result<bool> {
    match value {
        "1" | "t" | "T" | "true" | "TRUE" | "True" => Ok(true),
        "0" | "f" | "F" | "false" | "FALSE" | "False" => Ok(false),
        _ => Err(Error::InvalidArgument(format!(
            "invalid boolean value {value:?} for --{flag}"
        ))),
    }
}

/// Parses command-line arguments (without the program name).
///
/// # Errors
///
/// Returns [`Error::InvalidArgument`] for unknown flags, stray positional
/// arguments, missing values, and malformed booleans.
pub fn parse_args<I>(args: I) -> Result<CliArgs>
where
    I: IntoIterator<Item = String>,
{
    let mut parsed = CliArgs::default();
    let mut args = args.into_iter();

    while let Some(arg) = args.next() {
        let Some(flag) = arg.strip_prefix("--").or_else(|| arg.strip_prefix('-')) else {
            return Err(Error::InvalidArgument(format!("unexpected argument: {arg}")));
        };
        let (name, inline) = match flag.split_once('=') {
            Some((name, value)) => (name, Some(value.to_string())),
            None => (flag, None),
        };

        let mut value = || {
            inline
                .clone()
                .or_else(|| args.next())
                .ok_or_else(|| Error::InvalidArgument(format!("--{name} requires a value")))
        };
        let switch = || inline.as_deref().map_or(Ok(true), |v| parse_bool(name, v));

        match name {
            "username" => parsed.username = Some(value()?),
            "password" => parsed.password = Some(value()?),
            "invoice-path" => parsed.invoice_path = Some(PathBuf::from(value()?)),
            "provider" => parsed.provider = Some(value()?),
            "issuer-id" => parsed.issuer_id = Some(value()?),
            "from" => parsed.from = Some(value()?),
            "to" => parsed.to = Some(value()?),
            "config" => parsed.config = Some(PathBuf::from(value()?)),
            "resume" => parsed.resume = switch()?,
            "redownload" => parsed.redownload = switch()?,
            "list-providers" => parsed.list_providers = switch()?,
            "list-invoices" => parsed.list_invoices = switch()?,
            "download-pdf" => parsed.download_pdf = Some(switch()?),
            "download-xml" => parsed.download_xml = Some(switch()?),
            "h" | "help" => parsed.help = true,
            _ => {
                return Err(Error::InvalidArgument(format!("unknown option: {arg}")));
            }
        }
    }

    Ok(parsed)
}

impl CliArgs {
    /// Config file to read: `--config`, or the platform default.
    #[must_use]
    pub fn config_path(&self) -> PathBuf {
        self.config.clone().unwrap_or_else(FileConfig::default_path)
    }

    /// Merges flags with environment and file defaults.
    ///
    /// Precedence is flag, then environment (`DIJNET_USERNAME`,
    /// `DIJNET_PASSWORD`, `DIJNET_INVOICE_PATH`), then `file`, then built-in
    /// defaults. `env` returns `None` for unset variables.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDate`] if `--from` or `--to` is malformed.
    pub fn into_config<E>(self, env: E, file: Option<FileConfig>) -> Result<AppConfig>
    where
        E: Fn(&str) -> Option<String>,
    {
        let file = file.unwrap_or_default();

        let credentials = Credentials {
            username: self
                .username
                .or_else(|| env("DIJNET_USERNAME"))
                .or(file.username)
                .unwrap_or_default(),
            password: self
                .password
                .or_else(|| env("DIJNET_PASSWORD"))
                .or(file.password)
                .unwrap_or_default(),
        };

        let invoice_path = self
            .invoice_path
            .or_else(|| env("DIJNET_INVOICE_PATH").map(PathBuf::from))
            .or(file.invoice_path)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_INVOICE_PATH));

        let download = DownloadConfig::new()
            .with_invoice_path(invoice_path)
            .with_pdf(self.download_pdf.or(file.download_pdf).unwrap_or(true))
            .with_xml(self.download_xml.or(file.download_xml).unwrap_or(true));

        let range = RangeRequest {
            from: parse_date_flag("from", self.from.as_deref().unwrap_or_default())?,
            to: parse_date_flag("to", self.to.as_deref().unwrap_or_default())?,
            resume: self.resume,
            redownload: self.redownload,
        };

        Ok(AppConfig {
            credentials,
            download,
            provider: self.provider.unwrap_or_default(),
            issuer_id: self.issuer_id.filter(|id| !id.is_empty()),
            range,
            list_providers: self.list_providers,
            list_invoices: self.list_invoices,
        })
    }
}

/// Help text for `--help`.
#[must_use]
pub fn usage() -> String {
    format!(
        "\
Usage: dijnet [OPTIONS]

Downloads new invoices from Dijnet into a local archive.

Options:
  --username <NAME>       Dijnet username (or DIJNET_USERNAME)
  --password <PASS>       Dijnet password (or DIJNET_PASSWORD)
  --invoice-path <DIR>    Base directory where invoices are stored (or DIJNET_INVOICE_PATH, default: {DEFAULT_INVOICE_PATH})
  --provider <NAME>       Provider name filter (exact, case-insensitive or partial match)
  --issuer-id <ID>        Issuer ID filter
  --from <YYYY-MM-DD>     From issue date, inclusive
  --to <YYYY-MM-DD>       To issue date, inclusive
  --resume                Resume from one day after the newest local invoice without asking
  --redownload            Ignore local invoice history and redownload all matching invoices
  --list-providers        List available providers
  --list-invoices         List matching invoices
  --download-pdf=<BOOL>   Download PDF files (default: true)
  --download-xml=<BOOL>   Download XML files (default: true)
  --config <FILE>         Config file (default: {})
  -h, --help              Show this help
",
        FileConfig::default_path().display()
    )
}
