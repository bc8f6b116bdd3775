use chrono::{DateTime, TimeZone, Utc};
use reqwest::Client;
use serde_json::Value;
use url::Url;

use super::{get_json, number, truncate, FetchError, SourceConfig};
use crate::{
    config::sources::{COIN_ID, VS_CURRENCY},
    models::price::{AllTimeMark, CoinDetail, PriceQuote, PriceSample},
};

/// CoinGecko quote, market chart and coin detail for the tracked coin.
#[derive(Debug, Clone)]
pub struct PriceSource {
    client: Client,
    config: SourceConfig,
}

impl PriceSource {
    /// `config.limit` is the number of market-chart days to request.
    pub fn new(client: Client, config: SourceConfig) -> Self {
        PriceSource { client, config }
    }

    pub fn config(&self) -> &SourceConfig {
        &self.config
    }

    fn url(&self, path: &str, params: &[(&str, &str)]) -> Result<Url, FetchError> {
        Ok(Url::parse_with_params(&self.config.endpoint(path), params)?)
    }

    pub async fn fetch_quote(&self) -> Result<PriceQuote, FetchError> {
        let url = self.url(
            "simple/price",
            &[
                ("ids", COIN_ID),
                ("vs_currencies", VS_CURRENCY),
                ("include_24hr_change", "true"),
                ("include_24hr_vol", "true"),
                ("include_market_cap", "true"),
                ("include_last_updated_at", "true"),
            ],
        )?;
        let body = get_json(&self.client, url).await?;

        parse_quote(&body)
    }

    pub async fn fetch_history(&self) -> Result<Vec<PriceSample>, FetchError> {
        let days = self.config.limit.to_string();
        let url = self.url(
            &format!("coins/{}/market_chart", COIN_ID),
            &[
                ("vs_currency", VS_CURRENCY),
                ("days", days.as_str()),
                ("interval", "daily"),
            ],
        )?;
        let body = get_json(&self.client, url).await?;

        parse_history(&body)
    }

    pub async fn fetch_detail(&self) -> Result<CoinDetail, FetchError> {
        let url = self.url(
            &format!("coins/{}", COIN_ID),
            &[
                ("localization", "false"),
                ("tickers", "false"),
                ("community_data", "false"),
                ("developer_data", "false"),
                ("sparkline", "false"),
            ],
        )?;
        let body = get_json(&self.client, url).await?;

        parse_detail(&body)
    }
}

pub fn parse_quote(body: &Value) -> Result<PriceQuote, FetchError> {
    let coin = &body[COIN_ID];
    let price_usd = number(&coin[VS_CURRENCY])
        .filter(|v| *v > 0.0)
        .ok_or_else(|| FetchError::Parse(format!("Invalid price format: {}", truncate(body))))?;

    Ok(PriceQuote {
        price_usd,
        change_24h_percent: number(&coin["usd_24h_change"]).unwrap_or_default(),
        market_cap_usd: number(&coin["usd_market_cap"]).unwrap_or_default(),
        volume_24h_usd: number(&coin["usd_24h_vol"]).unwrap_or_default(),
    })
}

/// `prices` is a list of `[epoch_millis, price]` pairs, oldest first.
pub fn parse_history(body: &Value) -> Result<Vec<PriceSample>, FetchError> {
    let prices = body["prices"]
        .as_array()
        .ok_or_else(|| FetchError::Parse(format!("Invalid market chart format: {}", truncate(body))))?;

    let samples = prices
        .iter()
        .filter_map(|point| {
            let timestamp = Utc.timestamp_millis_opt(point[0].as_f64()? as i64).single()?;
            let price_usd = number(&point[1])?;

            Some(PriceSample {
                timestamp,
                price_usd,
            })
        })
        .collect();

    Ok(samples)
}

fn date(value: &Value) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value.as_str()?)
        .ok()
        .map(|d| d.with_timezone(&Utc))
}

fn mark(data: &Value, key: &str) -> Option<AllTimeMark> {
    Some(AllTimeMark {
        price_usd: number(&data[key][VS_CURRENCY])?,
        date: date(&data[format!("{}_date", key).as_str()][VS_CURRENCY]),
    })
}

pub fn parse_detail(body: &Value) -> Result<CoinDetail, FetchError> {
    let data = &body["market_data"];

    if !data.is_object() {
        return Err(FetchError::Parse(format!(
            "Invalid coin detail format: {}",
            truncate(body)
        )));
    }

    Ok(CoinDetail {
        market_cap_rank: body["market_cap_rank"].as_u64().map(|r| r as u32),
        circulating_supply: number(&data["circulating_supply"]),
        total_supply: number(&data["total_supply"]),
        max_supply: number(&data["max_supply"]),
        fully_diluted_valuation: number(&data["fully_diluted_valuation"][VS_CURRENCY]),
        change_7d_percent: number(&data["price_change_percentage_7d"]),
        change_30d_percent: number(&data["price_change_percentage_30d"]),
        change_1y_percent: number(&data["price_change_percentage_1y"]),
        ath: mark(data, "ath"),
        atl: mark(data, "atl"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;
    use serde_json::json;
    use std::time::Duration;

    #[test]
    fn test_parse_quote() {
        let quote = parse_quote(&json!({
            "solana": {
                "usd": 171.42,
                "usd_market_cap": 89_000_000_000.0,
                "usd_24h_vol": 3_100_000_000.0,
                "usd_24h_change": -2.35,
                "last_updated_at": 1748779200
            }
        }))
        .unwrap();

        assert_eq!(quote.price_usd, 171.42);
        assert_eq!(quote.change_24h_percent, -2.35);
        assert_eq!(quote.market_cap_usd, 89_000_000_000.0);
        assert_eq!(quote.volume_24h_usd, 3_100_000_000.0);
    }

    #[test]
    fn test_parse_quote_rejects_missing_price() {
        assert!(matches!(
            parse_quote(&json!({"status": {"error_code": 429, "error_message": "rate limited"}})),
            Err(FetchError::Parse(_))
        ));
        assert!(parse_quote(&json!({"solana": {"usd": 0}})).is_err());
    }

    #[test]
    fn test_parse_history() {
        let samples = parse_history(&json!({
            "prices": [
                [1748217600000i64, 165.1],
                [1748304000000i64, 168.9],
                ["bad"],
                [1748390400000i64, 171.4]
            ],
            "market_caps": [],
            "total_volumes": []
        }))
        .unwrap();

        assert_eq!(samples.len(), 3);
        assert_eq!(samples[0].price_usd, 165.1);
        assert_eq!(samples[2].timestamp.timestamp_millis(), 1748390400000);
        assert!(samples[0].timestamp < samples[1].timestamp);
    }

    #[test]
    fn test_parse_detail() {
        let detail = parse_detail(&json!({
            "id": "solana",
            "market_cap_rank": 6,
            "market_data": {
                "ath": {"usd": 293.31},
                "ath_date": {"usd": "2025-01-19T11:15:27.957Z"},
                "atl": {"usd": 0.500801},
                "atl_date": {"usd": "2020-05-11T19:35:23.449Z"},
                "fully_diluted_valuation": {"usd": 101_000_000_000.0},
                "circulating_supply": 520_000_000.0,
                "total_supply": 600_000_000.0,
                "max_supply": null,
                "price_change_percentage_7d": 4.1,
                "price_change_percentage_30d": -8.2,
                "price_change_percentage_1y": 60.5
            }
        }))
        .unwrap();

        assert_eq!(detail.market_cap_rank, Some(6));
        assert_eq!(detail.max_supply, None);
        assert_eq!(detail.change_30d_percent, Some(-8.2));
        assert_eq!(detail.fully_diluted_valuation, Some(101_000_000_000.0));

        let ath = detail.ath.unwrap();
        assert_eq!(ath.price_usd, 293.31);
        assert_eq!(ath.date.map(|d| d.timestamp()), Some(1737285327));
        assert_eq!(detail.atl.map(|m| m.price_usd), Some(0.500801));
    }

    #[test]
    fn test_parse_detail_without_market_data() {
        assert!(matches!(
            parse_detail(&json!({"error": "coin not found"})),
            Err(FetchError::Parse(_))
        ));
    }

    #[tokio::test]
    async fn test_fetch_quote_from_server() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/simple/price")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("ids".into(), "solana".into()),
                Matcher::UrlEncoded("vs_currencies".into(), "usd".into()),
            ]))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"solana":{"usd":150.5,"usd_24h_change":1.25}}"#)
            .create_async()
            .await;

        let source = PriceSource::new(
            Client::new(),
            SourceConfig::new(&server.url(), 7, Duration::from_secs(5)),
        );
        let quote = source.fetch_quote().await.unwrap();

        mock.assert_async().await;
        assert_eq!(quote.price_usd, 150.5);
        assert_eq!(quote.change_24h_percent, 1.25);
        assert_eq!(quote.market_cap_usd, 0.0);
    }

    #[tokio::test]
    async fn test_fetch_history_requests_configured_days() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/coins/solana/market_chart")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("days".into(), "7".into()),
                Matcher::UrlEncoded("interval".into(), "daily".into()),
            ]))
            .with_status(200)
            .with_body(r#"{"prices":[[1748217600000,165.1]]}"#)
            .create_async()
            .await;

        let source = PriceSource::new(
            Client::new(),
            SourceConfig::new(&server.url(), 7, Duration::from_secs(5)),
        );
        let samples = source.fetch_history().await.unwrap();

        mock.assert_async().await;
        assert_eq!(samples.len(), 1);
    }
}
