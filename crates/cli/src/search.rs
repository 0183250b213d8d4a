//! Elasticsearch/Kibana search client.
//!
//! A thin data source: it issues `_search` (and scroll) requests and hands
//! the raw response JSON to the core normalizer. Connection failures and
//! non-2xx responses are fatal to the run.

use anyhow::{bail, Context, Result};
use reqwest::Client;
use serde_json::{json, Value};
use tracing::debug;

/// Scroll context lifetime for paginated fetches.
const SCROLL_TTL: &str = "5m";

/// Backend authentication.
#[derive(Debug, Clone)]
pub enum Auth {
    None,
    Basic { username: String, password: String },
    ApiKey(String),
}

/// Client for an Elasticsearch-compatible search endpoint.
pub struct SearchClient {
    http: Client,
    base_url: String,
    auth: Auth,
}

impl SearchClient {
    /// Build a client for the given base URL.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be constructed.
    pub fn new(base_url: &str, auth: Auth) -> Result<Self> {
        let http = Client::builder()
            // Log clusters are routinely fronted by self-signed certificates.
            .danger_accept_invalid_certs(true)
            .build()
            .context("failed to build HTTP client")?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_owned(),
            auth,
        })
    }

    /// Execute a single bounded search and return the raw response envelope.
    pub async fn fetch(&self, index: &str, query: Option<&Value>, size: usize) -> Result<Value> {
        let url = format!("{}/{}/_search", self.base_url, index);
        debug!(%url, size, "executing search");
        let resp = self
            .with_auth(self.http.post(&url))
            .json(&search_body(query, size))
            .send()
            .await
            .with_context(|| format!("failed to connect to {}", self.base_url))?;
        into_json(resp).await
    }

    /// Fetch all matching hits with the scroll API, page by page.
    ///
    /// Returns the accumulated hit list; the scroll context is cleared on
    /// completion (best effort).
    pub async fn fetch_scroll(
        &self,
        index: &str,
        query: Option<&Value>,
        page_size: usize,
    ) -> Result<Vec<Value>> {
        let url = format!("{}/{}/_search?scroll={SCROLL_TTL}", self.base_url, index);
        debug!(%url, page_size, "starting scroll");
        let resp = self
            .with_auth(self.http.post(&url))
            .json(&search_body(query, page_size))
            .send()
            .await
            .with_context(|| format!("failed to connect to {}", self.base_url))?;
        let mut page = into_json(resp).await?;

        let mut all_hits = Vec::new();
        loop {
            let scroll_id = page
                .get("_scroll_id")
                .and_then(Value::as_str)
                .map(str::to_owned);
            let hits = page
                .pointer_mut("/hits/hits")
                .and_then(Value::as_array_mut)
                .map(std::mem::take)
                .unwrap_or_default();

            if hits.is_empty() {
                if let Some(id) = &scroll_id {
                    self.clear_scroll(id).await;
                }
                break;
            }
            debug!(page_hits = hits.len(), "scroll page received");
            all_hits.extend(hits);

            let Some(id) = scroll_id else { break };
            let resp = self
                .with_auth(self.http.post(format!("{}/_search/scroll", self.base_url)))
                .json(&json!({ "scroll": SCROLL_TTL, "scroll_id": id }))
                .send()
                .await
                .context("scroll continuation request failed")?;
            page = into_json(resp).await?;
        }
        Ok(all_hits)
    }

    async fn clear_scroll(&self, scroll_id: &str) {
        // Best effort; an abandoned context expires server-side anyway.
        let _ = self
            .with_auth(self.http.delete(format!("{}/_search/scroll", self.base_url)))
            .json(&json!({ "scroll_id": scroll_id }))
            .send()
            .await;
    }

    fn with_auth(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.auth {
            Auth::None => req,
            Auth::Basic { username, password } => req.basic_auth(username, Some(password)),
            Auth::ApiKey(key) => req.header("Authorization", format!("ApiKey {key}")),
        }
    }
}

/// Build a `_search` request body: explicit query or match-all, newest first.
fn search_body(query: Option<&Value>, size: usize) -> Value {
    json!({
        "query": query.cloned().unwrap_or_else(|| json!({ "match_all": {} })),
        "size": size,
        "sort": [{ "@timestamp": { "order": "desc" } }],
    })
}

async fn into_json(resp: reqwest::Response) -> Result<Value> {
    let status = resp.status();
    if !status.is_success() {
        let body = resp.text().await.unwrap_or_default();
        bail!("search request failed with {status}: {body}");
    }
    resp.json()
        .await
        .context("search response was not valid JSON")
}
