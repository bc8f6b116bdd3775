use async_trait::async_trait;
use log::{info, warn};
use reqwest::{Client, IntoUrl};
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;

use crate::{
    models::{
        stream::Outcome,
        token::{SourceTag, TokenRecord},
    },
    utils::solana::RpcError,
};

pub mod aggregator;
pub mod dex_pairs;
pub mod launches;
pub mod mock;
pub mod network;
pub mod presenter;
pub mod price;
pub mod trending;
pub mod wallet;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("HTTP request failed: {0}")]
    Network(#[from] reqwest::Error),

    #[error("unexpected HTTP status {0}")]
    Status(u16),

    #[error("time budget of {0:?} exceeded")]
    Timeout(Duration),

    #[error("Response parsing error: {0}")]
    Parse(String),

    #[error("payload contained no usable records")]
    EmptyPayload,

    #[error("invalid endpoint: {0}")]
    Url(#[from] url::ParseError),

    #[error(transparent)]
    Rpc(#[from] RpcError),
}

/// Where a source lives and how much of it we show.
#[derive(Debug, Clone)]
pub struct SourceConfig {
    pub base_url: String,
    pub limit: usize,
    pub time_budget: Duration,
}

impl SourceConfig {
    pub fn new(base_url: &str, limit: usize, time_budget: Duration) -> Self {
        SourceConfig {
            base_url: base_url.trim_end_matches('/').to_string(),
            limit,
            time_budget,
        }
    }

    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }
}

/// One upstream token listing normalized into `TokenRecord`s.
#[async_trait]
pub trait SourceFetcher: Send + Sync {
    fn tag(&self) -> SourceTag;

    fn config(&self) -> &SourceConfig;

    async fn fetch(&self) -> Result<Vec<TokenRecord>, FetchError>;

    /// Synthetic listing with the same cardinality and ranges as real data.
    fn fallback(&self) -> Vec<TokenRecord> {
        mock::synthetic_records(self.tag(), self.config().limit, &mut rand::thread_rng())
    }
}

#[derive(Debug, Clone)]
pub struct SourceLoad {
    pub tag: SourceTag,
    pub records: Vec<TokenRecord>,
    pub outcome: Outcome,
}

/// Runs `fetcher` within its time budget, substituting fallback data on any failure.
pub async fn load(fetcher: &dyn SourceFetcher) -> SourceLoad {
    let tag = fetcher.tag();
    let budget = fetcher.config().time_budget;

    let result = match tokio::time::timeout(budget, fetcher.fetch()).await {
        Ok(Ok(records)) if records.is_empty() => Err(FetchError::EmptyPayload),
        Ok(result) => result,
        Err(_) => Err(FetchError::Timeout(budget)),
    };

    match result {
        Ok(records) => {
            info!("{}: loaded {} records", tag, records.len());

            SourceLoad {
                tag,
                records,
                outcome: Outcome::Live,
            }
        }
        Err(e) => {
            warn!("{}: {}, using mock data", tag, e);

            SourceLoad {
                tag,
                records: fetcher.fallback(),
                outcome: Outcome::Fallback,
            }
        }
    }
}

pub(crate) async fn get_json<U: IntoUrl>(client: &Client, url: U) -> Result<Value, FetchError> {
    let response = client.get(url).send().await?;
    let status = response.status();

    if !status.is_success() {
        return Err(FetchError::Status(status.as_u16()));
    }

    let text = response.text().await?;

    serde_json::from_str(&text).map_err(|e| FetchError::Parse(e.to_string()))
}

/// Numeric field that may arrive as a JSON number or a numeric string.
/// Zero and non-finite values count as missing.
pub(crate) fn number(value: &Value) -> Option<f64> {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s
            .trim()
            .trim_start_matches('$')
            .replace(',', "")
            .parse::<f64>()
            .ok(),
        _ => None,
    };

    parsed.filter(|v| v.is_finite() && *v != 0.0)
}

pub(crate) fn text(value: &Value) -> Option<String> {
    value
        .as_str()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
}

/// Payload excerpt for parse errors.
pub(crate) fn truncate(body: &Value) -> String {
    let mut content = body.to_string();

    if content.len() > 200 {
        let mut end = 200;
        while !content.is_char_boundary(end) {
            end -= 1;
        }
        content.truncate(end);
    }

    content
}
