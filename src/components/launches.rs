use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use rand::Rng;
use reqwest::Client;
use serde_json::Value;
use url::Url;

use super::{
    get_json,
    mock::{epic_name, launched_within, meme_ticker, ranges_for},
    number, text, truncate, FetchError, SourceConfig, SourceFetcher,
};
use crate::models::token::{SourceTag, TokenRecord};

// Bonding-curve tokens are minted with 6 decimals.
const TOKEN_DECIMALS: f64 = 1_000_000.0;

/// Newest pump.fun launches, most recent first.
pub struct LaunchesFetcher {
    client: Client,
    config: SourceConfig,
}

impl LaunchesFetcher {
    pub fn new(client: Client, config: SourceConfig) -> Self {
        LaunchesFetcher { client, config }
    }

    fn feed_url(&self) -> Result<Url, FetchError> {
        let limit = self.config.limit.to_string();
        let url = Url::parse_with_params(
            &self.config.endpoint("coins"),
            &[
                ("offset", "0"),
                ("limit", limit.as_str()),
                ("sort", "created_timestamp"),
                ("order", "DESC"),
                ("includeNsfw", "false"),
            ],
        )?;

        Ok(url)
    }
}

#[async_trait]
impl SourceFetcher for LaunchesFetcher {
    fn tag(&self) -> SourceTag {
        SourceTag::NewLaunch
    }

    fn config(&self) -> &SourceConfig {
        &self.config
    }

    async fn fetch(&self) -> Result<Vec<TokenRecord>, FetchError> {
        let body = get_json(&self.client, self.feed_url()?).await?;

        parse_launches(&body, self.config.limit, &mut rand::thread_rng())
    }
}

fn created_at(value: &Value) -> Option<DateTime<Utc>> {
    Utc.timestamp_millis_opt(value.as_i64()?).single()
}

/// The feed carries no trading stats, so change and volume are always synthetic.
pub fn parse_launches<R: Rng + ?Sized>(
    body: &Value,
    limit: usize,
    rng: &mut R,
) -> Result<Vec<TokenRecord>, FetchError> {
    let coins = body
        .as_array()
        .ok_or_else(|| FetchError::Parse(format!("Invalid launches format: {}", truncate(body))))?;
    let ranges = ranges_for(SourceTag::NewLaunch);

    let records = coins
        .iter()
        .filter(|coin| coin.is_object())
        .take(limit)
        .map(|coin| {
            let market_cap = number(&coin["usd_market_cap"]).filter(|v| *v > 0.0);
            let price = market_cap.zip(number(&coin["total_supply"])).and_then(|(cap, supply)| {
                let tokens = supply / TOKEN_DECIMALS;
                (tokens > 0.0).then(|| cap / tokens)
            });

            TokenRecord {
                symbol: text(&coin["symbol"])
                    .map(|s| s.to_uppercase())
                    .unwrap_or_else(|| meme_ticker(rng)),
                display_name: text(&coin["name"]).unwrap_or_else(|| epic_name(rng)),
                price: price.unwrap_or_else(|| ranges.price.sample(rng)),
                change_24h_percent: ranges.change_24h.sample(rng),
                market_cap_usd: market_cap.unwrap_or_else(|| ranges.market_cap.sample(rng)),
                volume_24h_usd: ranges.volume_24h.sample(rng),
                source_tag: SourceTag::NewLaunch,
                launched_at: created_at(&coin["created_timestamp"])
                    .unwrap_or_else(|| launched_within(ranges.max_age_hours, rng)),
                rank: None,
            }
        })
        .collect();

    Ok(records)
}
