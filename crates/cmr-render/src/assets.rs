//! Remote asset resolution with a uniform degradation policy
//!
//! Both optional assets (the background template PDF and the embeddable
//! font) are fetched the same way: a single attempt with a bounded timeout,
//! non-success statuses and malformed payloads treated as failures. Neither
//! failure aborts a request; the template falls back to a synthesized blank
//! A4 page and the font falls back to the built-in standard font.

use pdf_overlay::{EmbeddedFont, FormDocument, PageFont, StandardFont};
use std::time::Duration;
use thiserror::Error;

/// Name the embedded font is registered under in the PDF
const EMBEDDED_FONT_NAME: &str = "CmrForm";

/// Which text-rendering strategy the service runs with
///
/// Chosen by configuration at process start, never per request.
#[derive(Debug, Clone)]
pub enum FontStrategy {
    /// Built-in Helvetica; diacritics are folded by the normalizer
    Standard,
    /// Fetch and embed a Unicode-capable TrueType font
    Embedded { url: String },
}

/// Why a fetch failed; used for diagnostics only, never propagated
#[derive(Debug, Error)]
pub enum AssetError {
    #[error("http: {0}")]
    Http(String),
    #[error("unexpected status {0}")]
    Status(reqwest::StatusCode),
    #[error("malformed payload: {0}")]
    Malformed(String),
}

/// The resolved page background
pub enum Background {
    /// The remote template was fetched and parsed
    Template(FormDocument),
    /// Fallback path: a synthesized blank A4 page
    Blank(FormDocument),
}

impl Background {
    pub fn is_fallback(&self) -> bool {
        matches!(self, Background::Blank(_))
    }

    pub fn into_document(self) -> FormDocument {
        match self {
            Background::Template(doc) | Background::Blank(doc) => doc,
        }
    }
}

/// Fetcher for the two optional remote assets
pub struct AssetFetcher {
    client: reqwest::Client,
    timeout: Duration,
}

impl AssetFetcher {
    pub fn new(timeout: Duration) -> Self {
        Self {
            client: reqwest::Client::new(),
            timeout,
        }
    }

    /// Single bounded fetch attempt; no retries
    async fn fetch_asset(&self, url: &str) -> Result<Vec<u8>, AssetError> {
        let resp = self
            .client
            .get(url)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| AssetError::Http(e.to_string()))?;

        if !resp.status().is_success() {
            return Err(AssetError::Status(resp.status()));
        }

        let bytes = resp
            .bytes()
            .await
            .map_err(|e| AssetError::Http(e.to_string()))?;
        Ok(bytes.to_vec())
    }

    /// Resolve the page background, never failing
    ///
    /// Any failure (network, status, bytes that are not a PDF) logs a warning
    /// and yields the blank A4 fallback. Only page 1 is used downstream.
    pub async fn resolve_background(&self, template_url: &str) -> Background {
        let fetched = self.fetch_asset(template_url).await.and_then(|bytes| {
            FormDocument::from_bytes(&bytes).map_err(|e| AssetError::Malformed(e.to_string()))
        });

        match fetched {
            Ok(doc) => {
                tracing::info!(url = template_url, pages = doc.page_count(), "template loaded");
                Background::Template(doc)
            }
            Err(err) => {
                tracing::warn!(url = template_url, error = %err, "template unavailable, using blank page");
                Background::Blank(FormDocument::blank_a4())
            }
        }
    }

    /// Resolve the page font per the configured strategy
    ///
    /// The embedded strategy degrades to the standard font when the fetch or
    /// parse fails, so a broken font host costs diacritics, not the request.
    pub async fn resolve_font(&self, strategy: &FontStrategy) -> PageFont {
        let url = match strategy {
            FontStrategy::Standard => return PageFont::Standard(StandardFont::helvetica()),
            FontStrategy::Embedded { url } => url,
        };

        let fetched = self.fetch_asset(url).await.and_then(|bytes| {
            EmbeddedFont::parse(EMBEDDED_FONT_NAME, bytes)
                .map_err(|e| AssetError::Malformed(e.to_string()))
        });

        match fetched {
            Ok(font) => {
                tracing::info!(url, "embedded font loaded");
                PageFont::Embedded(font)
            }
            Err(err) => {
                tracing::warn!(url, error = %err, "font unavailable, using standard font");
                PageFont::Standard(StandardFont::helvetica())
            }
        }
    }
}
