//! HTTP transport for talking to a remote agent's routes.
//!
//! A thin `reqwest` wrapper: callers supply a path relative to the agent's
//! base URL (`/tasks/send`, `/tasks/stream`, ...) and get back parsed JSON
//! or a raw streaming response to hand to the SSE parser.

use std::collections::HashMap;
use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use serde_json::Value;

use crate::error::{A2AError, A2AResult};
use crate::utils::constants::DEFAULT_REQUEST_TIMEOUT_SECS;

#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    base_url: String,
    timeout: Duration,
    headers: HashMap<String, String>,
}

impl HttpTransport {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
            headers: HashMap::new(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    fn header_map(&self) -> HeaderMap {
        let mut map = HeaderMap::new();
        for (key, value) in &self.headers {
            if let (Ok(name), Ok(val)) = (
                HeaderName::from_bytes(key.as_bytes()),
                HeaderValue::from_str(value),
            ) {
                map.insert(name, val);
            }
        }
        map
    }

    fn url_for(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub async fn get_json(&self, path: &str) -> A2AResult<Value> {
        let url = self.url_for(path);
        let response = self
            .client
            .get(&url)
            .headers(self.header_map())
            .header("Accept", "application/json")
            .timeout(self.timeout)
            .send()
            .await?;
        parse_json_response(response).await
    }

    pub async fn post_json(&self, path: &str, body: &Value) -> A2AResult<Value> {
        let url = self.url_for(path);
        let response = self
            .client
            .post(&url)
            .headers(self.header_map())
            .header("Content-Type", "application/json")
            .timeout(self.timeout)
            .json(body)
            .send()
            .await?;
        parse_json_response(response).await
    }

    /// Posts `body` and returns the raw response for SSE parsing — the
    /// stream itself has no unary timeout (§5); only idle reads do.
    pub async fn post_stream(&self, path: &str, body: &Value) -> A2AResult<reqwest::Response> {
        let url = self.url_for(path);
        let response = self
            .client
            .post(&url)
            .headers(self.header_map())
            .header("Content-Type", "application/json")
            .header("Accept", "text/event-stream")
            .json(body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(A2AError::request(status.as_u16(), text));
        }
        Ok(response)
    }
}

async fn parse_json_response(response: reqwest::Response) -> A2AResult<Value> {
    let status = response.status();
    if !status.is_success() {
        let text = response.text().await.unwrap_or_default();
        return Err(A2AError::request(status.as_u16(), text));
    }
    let bytes = response.bytes().await?;
    serde_json::from_slice(&bytes)
        .map_err(|e| A2AError::response(format!("invalid JSON response body: {e}")))
}
