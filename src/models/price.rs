use chrono::{DateTime, TimeZone, Utc};
use serde::Serialize;

use super::{stream::StreamStatus, window::RollingWindow};
use crate::components::mock::SmoothedSeries;

#[derive(Debug, Serialize, Clone, Copy, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PriceSample {
    pub timestamp: DateTime<Utc>,
    pub price_usd: f64,
}

#[derive(Debug, Serialize, Clone, Copy, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct PriceQuote {
    pub price_usd: f64,
    pub change_24h_percent: f64,
    pub market_cap_usd: f64,
    pub volume_24h_usd: f64,
}

#[derive(Debug, Serialize, Clone, Copy, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AllTimeMark {
    pub price_usd: f64,
    pub date: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize, Clone, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct CoinDetail {
    pub market_cap_rank: Option<u32>,
    pub circulating_supply: Option<f64>,
    pub total_supply: Option<f64>,
    pub max_supply: Option<f64>,
    pub fully_diluted_valuation: Option<f64>,
    pub change_7d_percent: Option<f64>,
    pub change_30d_percent: Option<f64>,
    pub change_1y_percent: Option<f64>,
    pub ath: Option<AllTimeMark>,
    pub atl: Option<AllTimeMark>,
}

impl CoinDetail {
    pub fn mock() -> Self {
        CoinDetail {
            market_cap_rank: Some(5),
            circulating_supply: Some(470_000_000.0),
            total_supply: Some(588_600_000.0),
            max_supply: None,
            fully_diluted_valuation: Some(105_700_000_000.0),
            change_7d_percent: Some(12.5),
            change_30d_percent: Some(28.7),
            change_1y_percent: Some(156.8),
            ath: Some(AllTimeMark {
                price_usd: 260.06,
                date: Utc.with_ymd_and_hms(2021, 11, 6, 16, 32, 41).single(),
            }),
            atl: Some(AllTimeMark {
                price_usd: 0.500801,
                date: Utc.with_ymd_and_hms(2020, 5, 11, 19, 35, 23).single(),
            }),
        }
    }
}

#[derive(Debug, Serialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PriceSnapshot {
    pub quote: PriceQuote,
    pub detail: CoinDetail,
    pub is_mock: bool,
    pub updated_at: DateTime<Utc>,
}

/// Price stream state: rolling history for the chart plus the latest snapshot.
#[derive(Debug)]
pub struct PriceBoard {
    pub history: RollingWindow<PriceSample>,
    pub snapshot: Option<PriceSnapshot>,
    pub model: SmoothedSeries,
    pub status: StreamStatus,
}

impl PriceBoard {
    pub fn new(window: usize) -> Self {
        PriceBoard {
            history: RollingWindow::new(window),
            snapshot: None,
            model: SmoothedSeries::price(),
            status: StreamStatus::default(),
        }
    }

    /// Last known coin detail, or the mock one before any refresh.
    pub fn detail_or_mock(&self) -> CoinDetail {
        self.snapshot
            .as_ref()
            .map(|s| s.detail.clone())
            .unwrap_or_else(CoinDetail::mock)
    }

    pub fn record(&mut self, sample: PriceSample, snapshot: PriceSnapshot) {
        self.history.push(sample);
        self.snapshot = Some(snapshot);
    }

    /// Seeds an empty chart history from a market-chart series (oldest first).
    pub fn seed(&mut self, samples: Vec<PriceSample>) -> bool {
        if !self.history.is_empty() || samples.is_empty() {
            return false;
        }

        self.history.extend(samples);

        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn sample(minutes: i64, price: f64) -> PriceSample {
        PriceSample {
            timestamp: Utc::now() - Duration::minutes(minutes),
            price_usd: price,
        }
    }

    #[test]
    fn test_seed_only_into_empty_history() {
        let mut board = PriceBoard::new(3);

        assert!(!board.seed(vec![]));
        assert!(board.seed(vec![sample(40, 1.0), sample(30, 2.0), sample(20, 3.0), sample(10, 4.0)]));
        let prices: Vec<f64> = board.history.iter().map(|s| s.price_usd).collect();
        assert_eq!(prices, vec![2.0, 3.0, 4.0]);

        assert!(!board.seed(vec![sample(5, 9.0)]));
        assert_eq!(board.history.len(), 3);
    }

    #[test]
    fn test_detail_falls_back_to_mock() {
        let board = PriceBoard::new(7);
        let detail = board.detail_or_mock();

        assert_eq!(detail.market_cap_rank, Some(5));
        assert_eq!(detail.ath.map(|m| m.price_usd), Some(260.06));
        assert!(detail.max_supply.is_none());
    }
}
