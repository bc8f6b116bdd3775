use async_trait::async_trait;
use rand::Rng;
use reqwest::Client;
use serde_json::Value;

use super::{
    get_json,
    mock::{launched_within, meme_ticker, ranges_for},
    number, text, truncate, FetchError, SourceConfig, SourceFetcher,
};
use crate::models::token::{SourceTag, TokenRecord};

// Coins without a market-cap rank sort after everything ranked.
const UNRANKED: u32 = 999;

/// CoinGecko `search/trending`: the most searched coins right now.
pub struct TrendingFetcher {
    client: Client,
    config: SourceConfig,
}

impl TrendingFetcher {
    pub fn new(client: Client, config: SourceConfig) -> Self {
        TrendingFetcher { client, config }
    }
}

#[async_trait]
impl SourceFetcher for TrendingFetcher {
    fn tag(&self) -> SourceTag {
        SourceTag::Trending
    }

    fn config(&self) -> &SourceConfig {
        &self.config
    }

    async fn fetch(&self) -> Result<Vec<TokenRecord>, FetchError> {
        let body = get_json(&self.client, self.config.endpoint("search/trending")).await?;

        parse_trending(&body, self.config.limit, &mut rand::thread_rng())
    }
}

/// Normalizes a trending payload; gaps in price data are filled from the mock ranges.
pub fn parse_trending<R: Rng + ?Sized>(
    body: &Value,
    limit: usize,
    rng: &mut R,
) -> Result<Vec<TokenRecord>, FetchError> {
    let coins = body["coins"].as_array().ok_or_else(|| {
        FetchError::Parse(format!("Invalid trending format: {}", truncate(body)))
    })?;
    let ranges = ranges_for(SourceTag::Trending);

    let records = coins
        .iter()
        .map(|entry| &entry["item"])
        .filter(|item| item.is_object())
        .take(limit)
        .map(|item| {
            let data = &item["data"];

            TokenRecord {
                symbol: text(&item["symbol"])
                    .map(|s| s.to_uppercase())
                    .unwrap_or_else(|| meme_ticker(rng)),
                display_name: text(&item["name"]).unwrap_or_else(|| "UNKNOWN".to_string()),
                price: number(&data["price"])
                    .filter(|v| *v > 0.0)
                    .unwrap_or_else(|| ranges.price.sample(rng)),
                change_24h_percent: number(&data["price_change_percentage_24h"]["usd"])
                    .unwrap_or_else(|| ranges.change_24h.sample(rng)),
                market_cap_usd: number(&data["market_cap"])
                    .filter(|v| *v > 0.0)
                    .unwrap_or_else(|| ranges.market_cap.sample(rng)),
                volume_24h_usd: number(&data["total_volume"])
                    .filter(|v| *v > 0.0)
                    .unwrap_or_else(|| ranges.volume_24h.sample(rng)),
                source_tag: SourceTag::Trending,
                launched_at: launched_within(ranges.max_age_hours, rng),
                rank: Some(
                    item["market_cap_rank"]
                        .as_u64()
                        .map(|r| r as u32)
                        .unwrap_or(UNRANKED),
                ),
            }
        })
        .collect();

    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::load;
    use crate::models::stream::Outcome;
    use rand::{rngs::StdRng, SeedableRng};
    use serde_json::json;
    use std::time::Duration;

    fn trending_body() -> Value {
        json!({
            "coins": [
                {
                    "item": {
                        "id": "bonk",
                        "name": "Bonk",
                        "symbol": "bonk",
                        "market_cap_rank": 61,
                        "data": {
                            "price": 0.0000231,
                            "price_change_percentage_24h": {"usd": 12.4},
                            "market_cap": "$1,612,345,678",
                            "total_volume": "$240,000,000"
                        }
                    }
                },
                {
                    "item": {
                        "id": "dogwifcoin",
                        "name": "dogwifhat",
                        "symbol": "wif",
                        "data": {}
                    }
                },
                {"item": {"name": "third", "symbol": "thr"}}
            ],
            "nfts": []
        })
    }

    #[test]
    fn test_parse_trending_success() {
        let mut rng = StdRng::seed_from_u64(5);
        let records = parse_trending(&trending_body(), 5, &mut rng).unwrap();

        assert_eq!(records.len(), 3);
        assert_eq!(records[0].symbol, "BONK");
        assert_eq!(records[0].display_name, "Bonk");
        assert_eq!(records[0].price, 0.0000231);
        assert_eq!(records[0].change_24h_percent, 12.4);
        assert_eq!(records[0].market_cap_usd, 1_612_345_678.0);
        assert_eq!(records[0].volume_24h_usd, 240_000_000.0);
        assert_eq!(records[0].rank, Some(61));
        assert!(records.iter().all(|r| r.source_tag == SourceTag::Trending));
    }

    #[test]
    fn test_parse_trending_fills_missing_fields() {
        let mut rng = StdRng::seed_from_u64(5);
        let records = parse_trending(&trending_body(), 5, &mut rng).unwrap();
        let ranges = ranges_for(SourceTag::Trending);
        let wif = &records[1];

        assert_eq!(wif.symbol, "WIF");
        assert_eq!(wif.rank, Some(UNRANKED));
        assert!(ranges.price.contains(wif.price));
        assert!(ranges.market_cap.contains(wif.market_cap_usd));
    }

    #[test]
    fn test_parse_trending_respects_limit() {
        let mut rng = StdRng::seed_from_u64(5);
        let records = parse_trending(&trending_body(), 2, &mut rng).unwrap();

        assert_eq!(records.len(), 2);
    }

    #[test]
    fn test_parse_trending_invalid_format() {
        let mut rng = StdRng::seed_from_u64(5);
        let res = parse_trending(&json!({"status": {"error_code": 429}}), 5, &mut rng);

        assert!(matches!(res, Err(FetchError::Parse(_))));
    }

    #[tokio::test]
    async fn test_fetch_trending_from_server() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/search/trending")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(trending_body().to_string())
            .create_async()
            .await;

        let fetcher = TrendingFetcher::new(
            Client::new(),
            SourceConfig::new(&server.url(), 5, Duration::from_secs(5)),
        );
        let records = fetcher.fetch().await.unwrap();

        mock.assert_async().await;
        assert_eq!(records.len(), 3);
        assert_eq!(records[0].symbol, "BONK");
    }

    #[tokio::test]
    async fn test_rate_limited_trending_falls_back() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/search/trending")
            .with_status(429)
            .create_async()
            .await;

        let fetcher = TrendingFetcher::new(
            Client::new(),
            SourceConfig::new(&server.url(), 5, Duration::from_secs(5)),
        );

        assert!(matches!(fetcher.fetch().await, Err(FetchError::Status(429))));

        let load = load(&fetcher).await;
        assert_eq!(load.outcome, Outcome::Fallback);
        assert_eq!(load.records.len(), 5);
        assert_eq!(load.records[0].display_name, "VIRAL MEME MACHINE");
    }
}
