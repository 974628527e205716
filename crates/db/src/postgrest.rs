//! HTTP client for a Supabase project's PostgREST interface.
//!
//! Wraps `/rest/v1/{table}` (row insert and filtered select) using
//! [`reqwest`]. One [`reqwest::Client`] is shared by every region so they
//! pool connections together.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{ACCEPT, AUTHORIZATION};
use serde_json::Value;

use crate::backend::{BackendError, RegionBackend, SelectQuery};
use crate::config::RegionConfig;

/// HTTP request timeout for a single backend call.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// PostgREST media type that returns a single object instead of an array.
const SINGLE_OBJECT: &str = "application/vnd.pgrst.object+json";

/// Build the HTTP client shared by all regional backends.
pub fn http_client() -> Result<reqwest::Client, reqwest::Error> {
    reqwest::Client::builder().timeout(REQUEST_TIMEOUT).build()
}

/// PostgREST client for one regional project.
pub struct PostgrestClient {
    client: reqwest::Client,
    rest_url: String,
    anon_key: String,
}

impl PostgrestClient {
    /// Create a client reusing an existing [`reqwest::Client`].
    pub fn new(client: reqwest::Client, config: &RegionConfig) -> Self {
        Self {
            client,
            rest_url: format!("{}/rest/v1", config.url.trim_end_matches('/')),
            anon_key: config.anon_key.clone(),
        }
    }

    fn table_url(&self, table: &str) -> String {
        format!("{}/{}", self.rest_url, table)
    }

    fn request(&self, method: reqwest::Method, table: &str) -> reqwest::RequestBuilder {
        self.client
            .request(method, self.table_url(table))
            .header("apikey", &self.anon_key)
            .header(AUTHORIZATION, format!("Bearer {}", self.anon_key))
    }

    // ---- private helpers ----

    /// Return the response unchanged on 2xx, or a [`BackendError::Api`]
    /// carrying the provider's `message` (or the raw body) otherwise.
    async fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response, BackendError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "<unreadable body>".to_string());
        Err(BackendError::Api {
            status: status.as_u16(),
            message: provider_message(&body),
        })
    }
}

#[async_trait]
impl RegionBackend for PostgrestClient {
    async fn insert(&self, table: &str, row: &Value) -> Result<Value, BackendError> {
        let response = self
            .request(reqwest::Method::POST, table)
            .header("Prefer", "return=representation")
            .header(ACCEPT, SINGLE_OBJECT)
            .json(row)
            .send()
            .await?;

        let response = Self::ensure_success(response).await?;
        Ok(response.json::<Value>().await?)
    }

    async fn select(&self, table: &str, query: &SelectQuery) -> Result<Vec<Value>, BackendError> {
        let response = self
            .request(reqwest::Method::GET, table)
            .query(&query.to_pairs())
            .send()
            .await?;

        let response = Self::ensure_success(response).await?;
        match response.json::<Value>().await? {
            Value::Array(rows) => Ok(rows),
            other => Err(BackendError::Decode(format!(
                "expected an array of rows, got {}",
                type_name(&other)
            ))),
        }
    }
}

/// Pull the human-readable message out of a PostgREST error body.
fn provider_message(body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| {
            v.get("message")
                .or_else(|| v.get("error_description"))
                .or_else(|| v.get("error"))
                .and_then(Value::as_str)
                .map(str::to_string)
        })
        .unwrap_or_else(|| body.to_string())
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
