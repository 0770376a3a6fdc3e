//! Client for the headless content API.
//!
//! Editors publish exhibits and standalone pages through the content
//! studio; the site reads them back with GROQ queries against the query
//! endpoint (`/v{version}/data/query/{dataset}?query=...`). Responses wrap
//! the result in `{"result": ...}`.
//!
//! Query results are cached in-process for a few minutes. Published content
//! changes rarely and the museum's traffic is bursty around event
//! announcements, so a short TTL takes almost all reads off the API without
//! editors noticing staleness.

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use secrecy::ExposeSecret;
use serde::Deserialize;
use thiserror::Error;

use crate::config::ContentConfig;

const CACHE_CAPACITY: u64 = 256;
const CACHE_TTL_SECONDS: u64 = 300;
const REQUEST_TIMEOUT_SECONDS: u64 = 10;

/// Errors from content API operations.
#[derive(Debug, Error)]
pub enum CmsError {
    /// Network or transport failure.
    #[error("content request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-success status from the API.
    #[error("content API error ({status}): {message}")]
    Status {
        status: reqwest::StatusCode,
        message: String,
    },

    /// The response did not match the expected document shape.
    #[error("unexpected content shape: {0}")]
    Parse(String),
}

/// A published exhibit document.
#[derive(Debug, Clone, Deserialize)]
pub struct Exhibit {
    pub title: String,
    pub slug: String,
    /// One-line summary shown on listing pages.
    #[serde(default)]
    pub summary: Option<String>,
    /// Body paragraphs, flattened from the editor's rich-text blocks.
    #[serde(default)]
    pub body: Vec<String>,
    #[serde(default)]
    pub featured: bool,
    /// Hero image URL on the content CDN.
    #[serde(default)]
    pub image_url: Option<String>,
}

/// A standalone content page (donate, volunteer, visiting info).
#[derive(Debug, Clone, Deserialize)]
pub struct Page {
    pub title: String,
    pub slug: String,
    #[serde(default)]
    pub body: Vec<String>,
}

/// Client for the headless content API with an in-process query cache.
#[derive(Clone)]
pub struct CmsClient {
    client: reqwest::Client,
    query_url: String,
    token: Option<Arc<secrecy::SecretString>>,
    cache: Cache<String, Arc<serde_json::Value>>,
}

/// Envelope around every query response.
#[derive(Debug, Deserialize)]
struct QueryResponse {
    result: serde_json::Value,
}

const EXHIBIT_FIELDS: &str = "{title, \"slug\": slug.current, summary, \
     \"body\": body[].children[].text, featured, \"image_url\": image.asset->url}";

impl CmsClient {
    /// Create a new content API client.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn new(config: &ContentConfig) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECONDS))
            .build()?;

        let query_url = format!(
            "{}/v{}/data/query/{}",
            config.api_url.trim_end_matches('/'),
            config.api_version,
            config.dataset,
        );

        let cache = Cache::builder()
            .max_capacity(CACHE_CAPACITY)
            .time_to_live(Duration::from_secs(CACHE_TTL_SECONDS))
            .build();

        Ok(Self {
            client,
            query_url,
            token: config.token.clone().map(Arc::new),
            cache,
        })
    }

    /// All published exhibits, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the API is unreachable or the response cannot be
    /// interpreted.
    pub async fn exhibits(&self) -> Result<Vec<Exhibit>, CmsError> {
        let groq = format!(
            "*[_type == \"exhibit\"] | order(_createdAt desc) {EXHIBIT_FIELDS}"
        );
        let result = self.query(&groq).await?;
        parse_documents(&result)
    }

    /// Exhibits flagged for the home page.
    ///
    /// # Errors
    ///
    /// Returns an error if the API is unreachable or the response cannot be
    /// interpreted.
    pub async fn featured_exhibits(&self) -> Result<Vec<Exhibit>, CmsError> {
        let groq = format!(
            "*[_type == \"exhibit\" && featured == true] | order(_createdAt desc) {EXHIBIT_FIELDS}"
        );
        let result = self.query(&groq).await?;
        parse_documents(&result)
    }

    /// A single exhibit by slug, or `None` if not published.
    ///
    /// # Errors
    ///
    /// Returns an error if the API is unreachable or the response cannot be
    /// interpreted.
    pub async fn exhibit(&self, slug: &str) -> Result<Option<Exhibit>, CmsError> {
        let groq = format!(
            "*[_type == \"exhibit\" && slug.current == \"{}\"][0] {EXHIBIT_FIELDS}",
            escape_groq_string(slug),
        );
        let result = self.query(&groq).await?;
        parse_optional_document(&result)
    }

    /// Slugs of every published exhibit, for the sitemap.
    ///
    /// # Errors
    ///
    /// Returns an error if the API is unreachable or the response cannot be
    /// interpreted.
    pub async fn exhibit_slugs(&self) -> Result<Vec<String>, CmsError> {
        let groq = "*[_type == \"exhibit\"].slug.current";
        let result = self.query(groq).await?;
        parse_documents(&result)
    }

    /// A standalone page by slug, or `None` if not published.
    ///
    /// # Errors
    ///
    /// Returns an error if the API is unreachable or the response cannot be
    /// interpreted.
    pub async fn page(&self, slug: &str) -> Result<Option<Page>, CmsError> {
        let groq = format!(
            "*[_type == \"page\" && slug.current == \"{}\"][0] \
             {{title, \"slug\": slug.current, \"body\": body[].children[].text}}",
            escape_groq_string(slug),
        );
        let result = self.query(&groq).await?;
        parse_optional_document(&result)
    }

    /// Run a GROQ query, serving from cache when fresh.
    ///
    /// Only successful responses are cached; errors are retried on the next
    /// request.
    async fn query(&self, groq: &str) -> Result<Arc<serde_json::Value>, CmsError> {
        if let Some(cached) = self.cache.get(groq).await {
            return Ok(cached);
        }

        let mut request = self.client.get(&self.query_url).query(&[("query", groq)]);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token.expose_secret());
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(CmsError::Status { status, message });
        }

        let envelope: QueryResponse = response.json().await?;
        let result = Arc::new(envelope.result);
        self.cache.insert(groq.to_owned(), Arc::clone(&result)).await;

        Ok(result)
    }
}

/// Escape a string for inlining into a GROQ string literal.
fn escape_groq_string(s: &str) -> String {
    s.replace('\\', "\\\\").replace('"', "\\\"")
}

/// Deserialize a query result that must be present (arrays come back `[]`
/// when empty, never `null`).
fn parse_documents<T: serde::de::DeserializeOwned>(
    result: &serde_json::Value,
) -> Result<T, CmsError> {
    serde_json::from_value(result.clone()).map_err(|e| CmsError::Parse(e.to_string()))
}

/// Deserialize a single-document query result, where `null` means the
/// document is not published.
fn parse_optional_document<T: serde::de::DeserializeOwned>(
    result: &serde_json::Value,
) -> Result<Option<T>, CmsError> {
    if result.is_null() {
        return Ok(None);
    }
    serde_json::from_value(result.clone())
        .map(Some)
        .map_err(|e| CmsError::Parse(e.to_string()))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_exhibit_list() {
        let result = serde_json::json!([
            {
                "title": "Tidal Forms",
                "slug": "tidal-forms",
                "summary": "Sculpture shaped by the harbor's tides.",
                "body": ["First paragraph.", "Second paragraph."],
                "featured": true,
                "image_url": "https://cdn.sanity.io/images/abc/production/hero.jpg"
            },
            {
                "title": "Shipwrights",
                "slug": "shipwrights",
                "body": []
            }
        ]);

        let exhibits: Vec<Exhibit> = parse_documents(&result).unwrap();
        assert_eq!(exhibits.len(), 2);
        assert_eq!(exhibits[0].slug, "tidal-forms");
        assert!(exhibits[0].featured);
        assert_eq!(exhibits[0].body.len(), 2);
        // Fields the editor left blank come back absent, not null-crashing
        assert!(!exhibits[1].featured);
        assert!(exhibits[1].summary.is_none());
        assert!(exhibits[1].image_url.is_none());
    }

    #[test]
    fn test_parse_missing_document_is_none() {
        let result = serde_json::Value::Null;
        let page: Option<Page> = parse_optional_document(&result).unwrap();
        assert!(page.is_none());
    }

    #[test]
    fn test_parse_page() {
        let result = serde_json::json!({
            "title": "Support the Museum",
            "slug": "donate",
            "body": ["Your gift keeps the galleries open."]
        });

        let page: Option<Page> = parse_optional_document(&result).unwrap();
        let page = page.unwrap();
        assert_eq!(page.title, "Support the Museum");
        assert_eq!(page.body.len(), 1);
    }

    #[test]
    fn test_parse_rejects_wrong_shape() {
        let result = serde_json::json!({ "title": 42 });
        let page: Result<Option<Page>, _> = parse_optional_document(&result);
        assert!(matches!(page, Err(CmsError::Parse(_))));
    }

    #[test]
    fn test_escape_groq_string() {
        assert_eq!(escape_groq_string("tidal-forms"), "tidal-forms");
        assert_eq!(escape_groq_string("a\"b"), "a\\\"b");
        assert_eq!(escape_groq_string("a\\b"), "a\\\\b");
    }

    #[test]
    fn test_query_url_shape() {
        let config = ContentConfig {
            api_url: "https://content.example.test/".to_owned(),
            dataset: "production".to_owned(),
            api_version: "2025-06-01".to_owned(),
            token: None,
        };
        let client = CmsClient::new(&config).unwrap();
        assert_eq!(
            client.query_url,
            "https://content.example.test/v2025-06-01/data/query/production"
        );
    }
}
