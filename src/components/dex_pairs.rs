use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use rand::Rng;
use reqwest::Client;
use serde_json::Value;

use super::{
    get_json,
    mock::{epic_name, meme_ticker, ranges_for},
    number, text, truncate, FetchError, SourceConfig, SourceFetcher,
};
use crate::{
    config::sources::DEX_PAIR_MAX_AGE_MS,
    models::token::{SourceTag, TokenRecord},
};

/// Raydium AMM pairs created within the last three days.
pub struct DexPairsFetcher {
    client: Client,
    config: SourceConfig,
}

impl DexPairsFetcher {
    pub fn new(client: Client, config: SourceConfig) -> Self {
        DexPairsFetcher { client, config }
    }
}

#[async_trait]
impl SourceFetcher for DexPairsFetcher {
    fn tag(&self) -> SourceTag {
        SourceTag::DexListing
    }

    fn config(&self) -> &SourceConfig {
        &self.config
    }

    async fn fetch(&self) -> Result<Vec<TokenRecord>, FetchError> {
        let body = get_json(&self.client, self.config.endpoint("v2/main/pairs")).await?;

        parse_pairs(&body, self.config.limit, Utc::now(), &mut rand::thread_rng())
    }
}

/// `createTime` arrives as epoch seconds, epoch millis or an RFC 3339 string.
fn created_at(value: &Value) -> Option<DateTime<Utc>> {
    match value {
        Value::Number(n) => {
            let raw = n.as_i64()?;
            // Anything below 1e12 cannot be millis after 2001.
            let millis = if raw < 1_000_000_000_000 { raw * 1000 } else { raw };

            Utc.timestamp_millis_opt(millis).single()
        }
        Value::String(s) => DateTime::parse_from_rfc3339(s.trim())
            .ok()
            .map(|d| d.with_timezone(&Utc)),
        _ => None,
    }
}

pub fn parse_pairs<R: Rng + ?Sized>(
    body: &Value,
    limit: usize,
    now: DateTime<Utc>,
    rng: &mut R,
) -> Result<Vec<TokenRecord>, FetchError> {
    let pairs = body
        .as_array()
        .ok_or_else(|| FetchError::Parse(format!("Invalid pairs format: {}", truncate(body))))?;
    let ranges = ranges_for(SourceTag::DexListing);

    let records = pairs
        .iter()
        .filter_map(|pair| {
            let created = created_at(&pair["createTime"])?;
            let age = now.signed_duration_since(created).num_milliseconds();

            (age >= 0 && age < DEX_PAIR_MAX_AGE_MS).then_some((pair, created))
        })
        .take(limit)
        .map(|(pair, created)| {
            let symbol = text(&pair["baseSymbol"]).or_else(|| {
                text(&pair["name"]).and_then(|name| name.split('-').next().map(String::from))
            });

            TokenRecord {
                symbol: symbol.unwrap_or_else(|| meme_ticker(rng)),
                display_name: text(&pair["baseName"]).unwrap_or_else(|| epic_name(rng)),
                price: number(&pair["price"])
                    .filter(|v| *v > 0.0)
                    .unwrap_or_else(|| ranges.price.sample(rng)),
                change_24h_percent: number(&pair["change24h"])
                    .unwrap_or_else(|| ranges.change_24h.sample(rng)),
                market_cap_usd: number(&pair["marketCap"])
                    .filter(|v| *v > 0.0)
                    .unwrap_or_else(|| ranges.market_cap.sample(rng)),
                volume_24h_usd: number(&pair["volume24h"])
                    .filter(|v| *v > 0.0)
                    .unwrap_or_else(|| ranges.volume_24h.sample(rng)),
                source_tag: SourceTag::DexListing,
                launched_at: created,
                rank: None,
            }
        })
        .collect();

    Ok(records)
}
