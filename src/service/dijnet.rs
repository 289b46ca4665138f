//! HTTP client for the Dijnet invoice portal.
//!
//! The portal is a classic server-rendered web app: a cookie session, a form
//! token embedded in the search page, and HTML result tables. Page parsing
//! lives in small pure functions so it can be tested without a network.

use std::path::Path;
use std::sync::LazyLock;
use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;
use regex::Regex;
use serde::Deserialize;

use super::InvoiceService;
use crate::error::{Error, Result};
use crate::fs::{FileSystem, TokioFileSystem};
use crate::invoice::{InvoiceRecord, InvoicesQuery, ProviderCatalog};

/// Production portal address.
pub const DEFAULT_BASE_URL: &str = "https://www.dijnet.hu";

const PORTAL_DATE_FORMAT: &str = "%Y.%m.%d";

static ROPTS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)var\s+ropts\s*=\s*(\[.*?\]);").expect("valid regex"));

static TOKEN_INPUT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"<input[^>]*name="vfw_token"[^>]*>"#).expect("valid regex"));

static VALUE_ATTR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"value="([^"]*)""#).expect("valid regex"));

static ROW_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<tr[^>]*>(.*?)</tr>").expect("valid regex"));

static CELL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<td[^>]*>(.*?)</td>").expect("valid regex"));

static TABLE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<table[\s>]").expect("valid regex"));

static TAG_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]*>").expect("valid regex"));

#[derive(Deserialize)]
struct LoginResponse {
    success: bool,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Deserialize)]
struct ProviderOption {
    szlaszolgnev: String,
}

/// Builds a configured HTTP client for portal requests.
fn build_http_client() -> reqwest::Result<reqwest::Client> {
    reqwest::Client::builder()
        .cookie_store(true)
        .connect_timeout(Duration::from_secs(30))
        .pool_idle_timeout(Duration::from_secs(60))
        .user_agent(concat!("dijnet-dl/", env!("CARGO_PKG_VERSION")))
        .build()
}

/// Dijnet portal client. Artifacts are written through `F`.
pub struct DijnetClient<F: FileSystem = TokioFileSystem> {
    http: reqwest::Client,
    base_url: String,
    fs: F,
}

impl DijnetClient<TokioFileSystem> {
    /// Creates a client for the production portal.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new() -> Result<Self> {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    /// Creates a client for a portal at `base_url`.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn with_base_url(base_url: impl Into<String>) -> Result<Self> {
        Ok(Self::with_fs(build_http_client()?, base_url, TokioFileSystem))
    }
}

impl<F: FileSystem> DijnetClient<F> {
    /// Creates a client from its parts.
    #[must_use]
    pub fn with_fs(http: reqwest::Client, base_url: impl Into<String>, fs: F) -> Self {
        Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            fs,
        }
    }

    /// Returns the portal address this client talks to.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    async fn get_text(&self, path: &str) -> Result<String> {
        Ok(self
            .http
            .get(self.url(path))
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?)
    }

    async fn save(&self, path: &str, dest: &Path) -> Result<()> {
        let bytes = self
            .http
            .get(self.url(path))
            .send()
            .await?
            .error_for_status()?
            .bytes()
            .await?;
        self.fs.write_file(dest, &bytes).await?;
        log::debug!("Wrote {} ({} bytes)", dest.display(), bytes.len());
        Ok(())
    }
}

#[async_trait]
impl<F: FileSystem> InvoiceService for DijnetClient<F> {
    async fn login(&self, username: &str, password: &str) -> Result<()> {
        let body = async {
            self.http
                .post(self.url("/ekonto/login/login_check_ajax"))
                .form(&[("username", username), ("password", password)])
                .send()
                .await?
                .error_for_status()?
                .text()
                .await
        }
        .await
        .map_err(|e| Error::Login(e.to_string()))?;
        parse_login_response(&body)?;
        log::info!("Logged in as {username}");
        Ok(())
    }

    async fn providers(&self) -> Result<ProviderCatalog> {
        let page = self
            .get_text("/ekonto/control/szamla_search")
            .await
            .map_err(|e| Error::Providers(e.to_string()))?;
        let catalog = ProviderCatalog {
            providers: parse_providers(&page)?,
            token: parse_token(&page)?,
        };
        log::debug!("Portal lists {} provider(s)", catalog.providers.len());
        Ok(catalog)
    }

    async fn invoices(&self, query: &InvoicesQuery) -> Result<Vec<InvoiceRecord>> {
        let format_bound = |d: Option<NaiveDate>| {
            d.map(|d| d.format(PORTAL_DATE_FORMAT).to_string())
                .unwrap_or_default()
        };
        let form = [
            ("vfw_form", "szamla_search_submit".to_string()),
            ("vfw_token", query.token.clone()),
            ("szlaszolgnev", query.provider.clone().unwrap_or_default()),
            ("regszolgid", query.issuer_id.clone().unwrap_or_default()),
            ("datumtol", format_bound(query.range.from)),
            ("datumig", format_bound(query.range.to)),
        ];
        let page = async {
            self.http
                .post(self.url("/ekonto/control/szamla_search_submit"))
                .form(&form)
                .send()
                .await?
                .error_for_status()?
                .text()
                .await
        }
        .await
        .map_err(|e| Error::Invoices(e.to_string()))?;

        let invoices = parse_invoices(&page)?;
        log::info!("Catalog query returned {} invoice(s)", invoices.len());
        Ok(invoices)
    }

    async fn download_invoice(
        &self,
        invoice: &InvoiceRecord,
        pdf: Option<&Path>,
        xml: Option<&Path>,
    ) -> Result<()> {
        self.get_text(&format!(
            "/ekonto/control/szamla_select?vfw_coll=szamla_list&vfw_rowid={}&exp=K",
            invoice.row
        ))
        .await?;
        self.get_text("/ekonto/control/szamla_letolt").await?;

        if let Some(dest) = pdf {
            self.save("/ekonto/control/szamla_pdf", dest).await?;
        }
        if let Some(dest) = xml {
            self.save("/ekonto/control/szamla_xml", dest).await?;
        }

        // The portal keeps the selection in the session; go back to the list
        // so the next row index refers to the same result table.
        self.get_text("/ekonto/control/szamla_list").await?;
        Ok(())
    }
}

/// Interprets the JSON reply of the login endpoint.
fn parse_login_response(body: &str) -> Result<()> {
    let reply: LoginResponse = serde_json::from_str(body)
        .map_err(|e| Error::Login(format!("unexpected login response: {e}")))?;
    if reply.success {
        Ok(())
    } else {
        Err(Error::Login(
            reply.error.unwrap_or_else(|| "rejected".to_string()),
        ))
    }
}

/// Extracts provider names, in page order and without duplicates.
fn parse_providers(page: &str) -> Result<Vec<String>> {
    let json = ROPTS_RE
        .captures(page)
        .and_then(|c| c.get(1))
        .ok_or_else(|| Error::Providers("provider list not found on search page".to_string()))?;
    let options: Vec<ProviderOption> = serde_json::from_str(json.as_str())
        .map_err(|e| Error::Providers(format!("malformed provider list: {e}")))?;

    let mut providers: Vec<String> = Vec::with_capacity(options.len());
    for option in options {
        if !providers.contains(&option.szlaszolgnev) {
            providers.push(option.szlaszolgnev);
        }
    }
    Ok(providers)
}

/// Extracts the form token from the search page.
fn parse_token(page: &str) -> Result<String> {
    TOKEN_INPUT_RE
        .find(page)
        .and_then(|tag| VALUE_ATTR_RE.captures(tag.as_str()))
        .map(|c| c[1].to_string())
        .ok_or_else(|| Error::Providers("form token not found on search page".to_string()))
}

/// Parses the search result table.
///
/// Columns: provider, issuer ID, invoice ID, date of issue, then amounts and
/// status which are not needed here. Rows without a parseable date (headers,
/// footers) are skipped. The row handle is the position among invoice rows.
/// A page without any table (the login form after a session expired) is an
/// error rather than an empty result.
fn parse_invoices(page: &str) -> Result<Vec<InvoiceRecord>> {
    if !TABLE_RE.is_match(page) {
        return Err(Error::Invoices(
            "result table not found on search result page".to_string(),
        ));
    }
    let mut invoices = Vec::new();
    for row in ROW_RE.captures_iter(page) {
        let cells: Vec<String> = CELL_RE
            .captures_iter(&row[1])
            .map(|c| cell_text(&c[1]))
            .collect();
        let [provider, issuer_id, invoice_id, issued, ..] = cells.as_slice() else {
            continue;
        };
        let Ok(date_of_issue) = NaiveDate::parse_from_str(issued, PORTAL_DATE_FORMAT) else {
            continue;
        };
        invoices.push(InvoiceRecord {
            provider: provider.clone(),
            issuer_id: issuer_id.clone(),
            invoice_id: invoice_id.clone(),
            date_of_issue,
            row: invoices.len(),
        });
    }
    Ok(invoices)
}

/// Strips markup and the handful of entities the portal emits.
fn cell_text(html: &str) -> String {
    TAG_RE
        .replace_all(html, "")
        .replace("&nbsp;", " ")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&amp;", "&")
        .trim()
        .to_string()
}
