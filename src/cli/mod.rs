//! CLI mode for dijnet - incremental invoice sync from the command line.

mod args;
mod progress;
mod prompt;

pub use args::{CliArgs, parse_args, usage};
pub use prompt::confirm_resume;

use chrono::NaiveDate;

use crate::archive;
use crate::config::AppConfig;
use crate::download::Downloader;
use crate::error::Result;
use crate::invoice::InvoicesQuery;
use crate::provider::resolve_provider;
use crate::range;
use crate::service::InvoiceService;
use crate::stats::SessionStats;

use progress::{CliProgress, make_invoice_bar, print_invoice_list, print_providers, print_summary};

/// How a successful run ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Only the provider catalog was printed.
    ListedProviders,
    /// Resuming left no dates to query.
    UpToDate,
    /// The catalog query matched nothing.
    NoInvoices,
    /// Matching invoices were printed; nothing was downloaded.
    Listed(usize),
    /// Invoices were downloaded.
    Downloaded(SessionStats),
}

/// Runs one sync: validate, log in, plan the range, query, then download.
///
/// `confirm` is consulted at most once, when the archive already holds
/// invoices and `--resume` was not given.
///
/// # Errors
///
/// Returns the first configuration, remote, or filesystem error. Nothing
/// is retried.
pub async fn run<S, C>(config: &AppConfig, service: &S, confirm: C) -> Result<Outcome>
where
    S: InvoiceService + ?Sized,
    C: FnOnce(NaiveDate) -> Result<bool>,
{
    config.validate()?;

    log::info!("Logging in as {}", config.credentials.username);
    service
        .login(&config.credentials.username, &config.credentials.password)
        .await?;

    let catalog = service.providers().await?;
    log::debug!("{} provider(s) available", catalog.providers.len());

    if config.list_providers {
        print_providers(&catalog.providers);
        if config.provider.is_empty() {
            return Ok(Outcome::ListedProviders);
        }
    }

    let local = archive::scan(&config.download.invoice_path)?;
    let range = range::plan(config.range, &local, confirm)?;
    let provider = resolve_provider(&config.provider, &catalog.providers)?;

    if range.is_empty() {
        println!("Local archive is already up to date");
        return Ok(Outcome::UpToDate);
    }

    let query = InvoicesQuery {
        provider,
        issuer_id: config.issuer_id.clone(),
        range,
        token: catalog.token,
    };
    log::debug!("Querying invoices: {query:?}");
    let invoices = service.invoices(&query).await?;

    if invoices.is_empty() {
        println!("No invoices found for the selected filters");
        return Ok(Outcome::NoInvoices);
    }

    if config.list_invoices {
        print_invoice_list(&invoices);
        if !config.download.downloads_anything() {
            return Ok(Outcome::Listed(invoices.len()));
        }
    }

    let progress = CliProgress::new(make_invoice_bar(invoices.len()));
    let downloader = Downloader::new(service, config.download.clone());
    let stats = downloader.download_all(&invoices, &progress).await?;
    progress.finish();

    print_summary(&stats);
    Ok(Outcome::Downloaded(stats))
}
