//! HTTP access to the advent calendar origin.
//!
//! ### Landing page
//! - Plain GET of the configured origin URL.
//! - Non-2xx, timeouts and oversized bodies are errors.
//!
//! ### AJAX endpoint
//! - Form-encoded POST to `wp-admin/admin-ajax.php` with `action=check_access`.
//! - Mimics the browser's XHR: same-origin `Origin`/`Referer` and `X-Requested-With`.
//! - Returns status and body untouched; interpreting them is the prize extractor's job.
//!
//! One `reqwest::Client` with a cookie store is shared by all calls, so the
//! AJAX requests of a check run in the same session.

pub mod url;

use async_trait::async_trait;
use reqwest::{Client, StatusCode, header};
use std::time::{Duration, Instant};

pub use self::url::{UrlError, ajax_endpoint, canonicalize, origin_header};

use advent_core::{AppConfig, Error};

const BROWSER_ACCEPT_LANGUAGE: &str = "en-GB,en;q=0.9,de-DE;q=0.8,de;q=0.7,en-US;q=0.6";
const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded; charset=UTF-8";

/// Configuration for the fetch client.
#[derive(Debug, Clone)]
pub struct FetchConfig {
    /// Landing page of the calendar (default: https://adventskalender-vs.de/)
    pub origin_url: String,

    /// User agent string
    pub user_agent: String,

    /// Maximum response body size in bytes (default: 5MB)
    pub max_bytes: usize,

    /// Per-request timeout (default: 10s)
    pub timeout: Duration,
}

impl Default for FetchConfig {
    fn default() -> Self {
        let app = AppConfig::default();
        Self::from(&app)
    }
}

impl From<&AppConfig> for FetchConfig {
    fn from(config: &AppConfig) -> Self {
        Self {
            origin_url: config.origin_url.clone(),
            user_agent: config.user_agent.clone(),
            max_bytes: config.max_bytes,
            timeout: config.timeout(),
        }
    }
}

/// Raw reply of the AJAX endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AjaxReply {
    pub status: StatusCode,
    pub body: String,
}

/// Source of calendar data.
///
/// `FetchClient` talks to the live site; tests substitute canned pages.
#[async_trait]
pub trait Origin: Send + Sync {
    /// HTML of the landing page.
    async fn landing_page(&self) -> Result<String, Error>;

    /// Reply of the `check_access` AJAX call for one window token.
    async fn check_access(&self, target: &str) -> Result<AjaxReply, Error>;
}

/// HTTP client for the calendar origin.
pub struct FetchClient {
    http: Client,
    config: FetchConfig,
    base: ::url::Url,
    ajax: ::url::Url,
}

impl FetchClient {
    /// Create a new fetch client with the given configuration.
    pub fn new(config: FetchConfig) -> Result<Self, Error> {
        let base = canonicalize(&config.origin_url).map_err(|e| Error::InvalidInput(e.to_string()))?;
        let ajax = ajax_endpoint(&base).map_err(|e| Error::InvalidInput(e.to_string()))?;

        let http = Client::builder()
            .user_agent(&config.user_agent)
            .timeout(config.timeout)
            .cookie_store(true)
            .use_rustls_tls()
            .gzip(true)
            .brotli(true)
            .deflate(true)
            .build()
            .map_err(|e| Error::OriginUnavailable(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self { http, config, base, ajax })
    }

    /// Get reference to the configuration.
    pub fn config(&self) -> &FetchConfig {
        &self.config
    }

    /// Landing page URL after canonicalization.
    pub fn base_url(&self) -> &::url::Url {
        &self.base
    }

    async fn read_body(&self, response: reqwest::Response) -> Result<String, Error> {
        if let Some(len) = response.content_length()
            && len as usize > self.config.max_bytes
        {
            return Err(Error::OriginUnavailable(format!("{} bytes exceeds {}", len, self.config.max_bytes)));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| Error::OriginUnavailable(format!("failed to read response: {}", e)))?;

        if bytes.len() > self.config.max_bytes {
            return Err(Error::OriginUnavailable(format!(
                "{} bytes exceeds {}",
                bytes.len(),
                self.config.max_bytes
            )));
        }

        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }
}

fn network_error(err: reqwest::Error) -> Error {
    if err.is_timeout() {
        Error::OriginUnavailable(format!("timeout: {}", err))
    } else {
        Error::OriginUnavailable(format!("network error: {}", err))
    }
}

#[async_trait]
impl Origin for FetchClient {
    async fn landing_page(&self) -> Result<String, Error> {
        let start = Instant::now();

        let response = self
            .http
            .get(self.base.as_str())
            .header(header::ACCEPT, "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8")
            .send()
            .await
            .map_err(network_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::HttpError(format!("status {}", status.as_u16())));
        }

        let html = self.read_body(response).await?;

        tracing::debug!("fetched {} in {}ms ({} bytes)", self.base, start.elapsed().as_millis(), html.len());

        Ok(html)
    }

    async fn check_access(&self, target: &str) -> Result<AjaxReply, Error> {
        let start = Instant::now();
        let body = ::url::form_urlencoded::Serializer::new(String::new())
            .append_pair("action", "check_access")
            .append_pair("target", target)
            .finish();

        let response = self
            .http
            .post(self.ajax.as_str())
            .header(header::ACCEPT, "*/*")
            .header(header::ACCEPT_LANGUAGE, BROWSER_ACCEPT_LANGUAGE)
            .header(header::CONTENT_TYPE, FORM_CONTENT_TYPE)
            .header(header::ORIGIN, origin_header(&self.base))
            .header(header::REFERER, self.base.as_str())
            .header("X-Requested-With", "XMLHttpRequest")
            .body(body)
            .send()
            .await
            .map_err(network_error)?;

        let status = response.status();
        let body = self.read_body(response).await?;

        tracing::debug!(
            window = target,
            status = status.as_u16(),
            "check_access answered in {}ms",
            start.elapsed().as_millis()
        );

        Ok(AjaxReply { status, body })
    }
}
