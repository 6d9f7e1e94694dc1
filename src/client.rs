//! HTTP client for the discussion service API.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use crate::api::{Channel, Message, SendReceipt};
use crate::error::{ClientError, Result};
use crate::poller::MessageSource;

const CONNECT_TIMEOUT_SECS: u64 = 8;
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Messages fetched per page when loading history.
pub const DEFAULT_PAGE_SIZE: u32 = 100;

/// Filters for the message read endpoint.
///
/// `after` is the poller's watermark filter. `after = 0` asks the server
/// for the initial backlog (latest page, ascending). `before` pages
/// backwards through older history.
#[derive(Clone, Copy, Debug, Default)]
pub struct MessageQuery {
    pub after: Option<i64>,
    pub before: Option<i64>,
    pub limit: Option<u32>,
}

impl MessageQuery {
    pub fn after(id: i64) -> Self {
        Self {
            after: Some(id),
            ..Self::default()
        }
    }

    pub fn before(id: i64) -> Self {
        Self {
            before: Some(id),
            limit: Some(DEFAULT_PAGE_SIZE),
            ..Self::default()
        }
    }

    fn params(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::new();
        if let Some(after) = self.after {
            params.push(("after", after.to_string()));
        }
        if let Some(before) = self.before {
            params.push(("before", before.to_string()));
        }
        if let Some(limit) = self.limit {
            params.push(("limit", limit.to_string()));
        }
        params
    }
}

/// Error payload the server attaches to non-success responses.
#[derive(Deserialize)]
struct ApiErrorBody {
    error: String,
}

/// Client for the discussion service REST API.
#[derive(Clone)]
pub struct ApiClient {
    base_url: String,
    http: Client,
}

impl ApiClient {
    /// Create a client for the given base URL (e.g. `https://hub.example.org`).
    pub fn new(base_url: &str) -> Result<Self> {
        let base_url = base_url.trim_end_matches('/').to_string();
        if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
            return Err(ClientError::InvalidBaseUrl(base_url));
        }
        let http = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
            .build()
            .map_err(ClientError::Http)?;
        Ok(Self { base_url, http })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/api/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// List channels visible to the current user.
    pub async fn channels(&self) -> Result<Vec<Channel>> {
        let resp = self.http.get(self.url("channels")).send().await?;
        let resp = check_response(resp).await?;
        Ok(resp.json().await?)
    }

    /// Fetch messages on a channel, filtered by `query`.
    ///
    /// The server returns an ascending-by-id JSON array; empty when there
    /// is nothing new.
    pub async fn messages(&self, channel_id: i64, query: MessageQuery) -> Result<Vec<Message>> {
        let resp = self
            .http
            .get(self.url(&format!("messages/{}", channel_id)))
            .query(&query.params())
            .send()
            .await?;
        let resp = check_response(resp).await?;
        Ok(resp.json().await?)
    }

    /// Post a message to a channel.
    pub async fn send_message(&self, channel_id: i64, content: &str) -> Result<SendReceipt> {
        let resp = self
            .http
            .post(self.url(&format!("messages/{}/send", channel_id)))
            .json(&serde_json::json!({ "content": content }))
            .send()
            .await?;
        let resp = check_response(resp).await?;
        Ok(resp.json().await?)
    }
}

#[async_trait]
impl MessageSource for ApiClient {
    async fn fetch_after(&self, channel_id: i64, after: i64) -> Result<Vec<Message>> {
        self.messages(channel_id, MessageQuery::after(after)).await
    }
}

/// Map non-success statuses to `ClientError::Api`, extracting the server's
/// `{"error": ...}` body when present.
async fn check_response(resp: reqwest::Response) -> Result<reqwest::Response> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let message = match resp.json::<ApiErrorBody>().await {
        Ok(body) => body.error,
        // Some endpoints answer errors with a bare array or empty body
        Err(_) => status
            .canonical_reason()
            .unwrap_or("request failed")
            .to_string(),
    };
    tracing::debug!(status = status.as_u16(), %message, "API request rejected");
    Err(ClientError::Api {
        status: status.as_u16(),
        message,
    })
}
