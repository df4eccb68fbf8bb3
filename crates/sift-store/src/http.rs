//! REST engine adapter over `reqwest`.
//!
//! Talks to an Elasticsearch-compatible endpoint using typed document
//! routes (`/{index}/{type}/{id}`).

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, RequestBuilder, Response, StatusCode, Url};
use serde_json::{Value, json};
use sift_core::{EngineConfig, Error, Result};

use crate::engine::{
    DocumentRef, GetResponse, IndexRequest, ScrollRequest, SearchEngine, SearchRequest,
};

const NDJSON: &str = "application/x-ndjson";

/// [`SearchEngine`] backed by the engine's REST API.
#[derive(Debug, Clone)]
pub struct HttpEngine {
    client: Client,
    base: Url,
}

impl HttpEngine {
    /// Create an engine client from connection settings.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the URL is not a usable base URL or
    /// the HTTP client cannot be built.
    pub fn new(config: &EngineConfig) -> Result<Self> {
        let base = Url::parse(&config.url)
            .map_err(|e| Error::config(format!("Invalid engine URL '{}': {e}", config.url)))?;
        if base.cannot_be_a_base() {
            return Err(Error::config(format!(
                "Engine URL '{}' cannot carry a path",
                config.url
            )));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| Error::config(format!("Failed to build HTTP client: {e}")))?;

        log::debug!("HTTP engine at {base} (timeout {}s)", config.timeout_secs);
        Ok(Self { client, base })
    }

    /// Base URL requests are resolved against.
    pub fn base_url(&self) -> &Url {
        &self.base
    }

    fn url(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|()| Error::config(format!("Engine URL '{}' cannot carry a path", self.base)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn document_url(&self, target: &DocumentRef) -> Result<Url> {
        self.url(&[&target.index, &target.doc_type, &target.id])
    }

    async fn send(&self, request: RequestBuilder, what: &str) -> Result<Response> {
        request.send().await.map_err(|e| transport_error(what, e))
    }

    async fn send_json(&self, request: RequestBuilder, what: &str) -> Result<Value> {
        let response = check_status(self.send(request, what).await?).await?;
        response
            .json::<Value>()
            .await
            .map_err(|e| transport_error(what, e))
    }

    /// Search route with pagination, scroll and sort as query pairs.
    fn search_url(&self, request: &SearchRequest) -> Result<Url> {
        let mut url = self.url(&[&request.index, &request.doc_type, "_search"])?;
        {
            let mut query = url.query_pairs_mut();
            if let Some(from) = request.from {
                query.append_pair("from", &from.to_string());
            }
            query.append_pair("size", &request.size.to_string());
            if let Some(scroll) = &request.scroll {
                query.append_pair("scroll", scroll);
            }
            if !request.sort.is_empty() {
                query.append_pair("sort", &request.sort.join(","));
            }
        }
        Ok(url)
    }

    /// `HEAD` request answering 200 (present) or 404 (absent).
    async fn probe(&self, url: Url, what: &str) -> Result<bool> {
        let response = self.send(self.client.head(url), what).await?;
        match response.status() {
            StatusCode::NOT_FOUND => Ok(false),
            status if status.is_success() => Ok(true),
            status => Err(Error::engine_status(
                status.as_u16(),
                format!("{what} answered {status}"),
            )),
        }
    }
}

/// Map a transport failure onto the error taxonomy.
fn transport_error(what: &str, err: reqwest::Error) -> Error {
    if err.is_timeout() {
        Error::timeout(format!("{what}: {err}"))
    } else if err.is_connect() || err.is_request() {
        Error::connection_with_source(format!("{what} failed"), err)
    } else if err.is_decode() {
        Error::malformed(format!("{what}: {err}"))
    } else {
        Error::engine(format!("{what}: {err}"))
    }
}

async fn check_status(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(Error::engine_status(
        status.as_u16(),
        error_reason(&body, status),
    ))
}

/// Pull the engine's reason out of an error body.
fn error_reason(body: &str, status: StatusCode) -> String {
    let reason = serde_json::from_str::<Value>(body).ok().and_then(|v| {
        match &v["error"] {
            Value::String(reason) => Some(reason.clone()),
            error => error["reason"].as_str().map(str::to_string),
        }
    });

    match reason {
        Some(reason) => reason,
        None if !body.trim().is_empty() => body.trim().to_string(),
        None => status
            .canonical_reason()
            .unwrap_or("request failed")
            .to_string(),
    }
}

fn scroll_body(request: &ScrollRequest) -> Value {
    json!({ "scroll": request.scroll, "scroll_id": request.scroll_id })
}

/// Encode bulk lines as newline-delimited JSON, newline-terminated.
pub fn encode_ndjson(lines: &[Value]) -> Result<String> {
    let mut body = String::new();
    for line in lines {
        body.push_str(&serde_json::to_string(line)?);
        body.push('\n');
    }
    Ok(body)
}

#[async_trait]
impl SearchEngine for HttpEngine {
    async fn index(&self, request: IndexRequest) -> Result<Value> {
        let builder = match &request.id {
            Some(id) => self
                .client
                .put(self.url(&[&request.index, &request.doc_type, id])?),
            None => self
                .client
                .post(self.url(&[&request.index, &request.doc_type])?),
        };
        self.send_json(builder.json(&request.body), "index").await
    }

    async fn delete(&self, target: &DocumentRef) -> Result<Value> {
        let url = self.document_url(target)?;
        self.send_json(self.client.delete(url), "delete").await
    }

    async fn get(&self, target: &DocumentRef) -> Result<GetResponse> {
        let url = self.document_url(target)?;
        let response = self.send(self.client.get(url), "get").await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(GetResponse::missing(target.id.as_str()));
        }
        check_status(response)
            .await?
            .json::<GetResponse>()
            .await
            .map_err(|e| transport_error("get", e))
    }

    async fn exists(&self, target: &DocumentRef) -> Result<bool> {
        self.probe(self.document_url(target)?, "exists").await
    }

    async fn update(&self, target: &DocumentRef, body: Value) -> Result<Value> {
        let url = self.url(&[&target.index, &target.doc_type, &target.id, "_update"])?;
        self.send_json(self.client.post(url).json(&body), "update")
            .await
    }

    async fn bulk(&self, index: &str, doc_type: &str, lines: Vec<Value>) -> Result<Value> {
        let url = self.url(&[index, doc_type, "_bulk"])?;
        let body = encode_ndjson(&lines)?;
        let request = self
            .client
            .post(url)
            .header(CONTENT_TYPE, NDJSON)
            .body(body);
        self.send_json(request, "bulk").await
    }

    async fn search(&self, request: SearchRequest) -> Result<Value> {
        let url = self.search_url(&request)?;
        self.send_json(self.client.post(url).json(&request.body), "search")
            .await
    }

    async fn scroll(&self, request: ScrollRequest) -> Result<Value> {
        let url = self.url(&["_search", "scroll"])?;
        self.send_json(self.client.post(url).json(&scroll_body(&request)), "scroll")
            .await
    }

    async fn create_index(&self, index: &str, body: Value) -> Result<Value> {
        let url = self.url(&[index])?;
        self.send_json(self.client.put(url).json(&body), "create index")
            .await
    }

    async fn delete_index(&self, index: &str) -> Result<Value> {
        let url = self.url(&[index])?;
        self.send_json(self.client.delete(url), "delete index").await
    }

    async fn index_exists(&self, index: &str) -> Result<bool> {
        self.probe(self.url(&[index])?, "index exists").await
    }

    async fn put_mapping(&self, index: &str, doc_type: &str, body: Value) -> Result<Value> {
        let url = self.url(&[index, "_mapping", doc_type])?;
        self.send_json(self.client.put(url).json(&body), "put mapping")
            .await
    }

    fn name(&self) -> &str {
        "http"
    }
}

// ============================================================================
// Tests
// ============================================================================
