use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::RwLock;

use super::{
    network::{NetworkBoard, NetworkStats},
    price::{PriceBoard, PriceSample, PriceSnapshot},
    stream::StreamStatus,
    token::TokenRecord,
    wallet::WalletSession,
};
use crate::{
    components::{
        aggregator::{Aggregation, SourceReport},
        mock::static_fallback,
    },
    config::refresh::TPS_WINDOW,
};

pub const LOAD_FAILED: &str = "Failed to load memecoin data";

/// Token-list stream state. `records` is only ever swapped whole.
#[derive(Debug, Default)]
pub struct TokenBoard {
    pub records: Arc<Vec<TokenRecord>>,
    pub sources: Vec<SourceReport>,
    pub loaded: bool,
    pub last_error: Option<String>,
    pub status: StreamStatus,
}

impl TokenBoard {
    pub fn replace(&mut self, aggregation: Aggregation) {
        self.records = Arc::new(aggregation.records);
        self.sources = aggregation.sources;
        self.loaded = true;
        self.last_error = None;
    }

    /// A refresh died before producing anything: keep what is shown, or the
    /// static listing if nothing was ever loaded.
    pub fn fail(&mut self, error: String) {
        if !self.loaded {
            self.records = Arc::new(static_fallback());
            self.loaded = true;
        }
        self.last_error = Some(error);
    }
}

/// Everything the dashboard shows, one lock per stream.
#[derive(Debug)]
pub struct AppState {
    pub tokens: RwLock<TokenBoard>,
    pub price: RwLock<PriceBoard>,
    pub network: RwLock<NetworkBoard>,
    pub wallet: RwLock<WalletSession>,
}

/// Consistent copy of the state for rendering.
#[derive(Debug, Clone)]
pub struct DashboardSnapshot {
    pub tokens: Arc<Vec<TokenRecord>>,
    pub tokens_loaded: bool,
    pub tokens_error: Option<String>,
    pub price_history: Vec<PriceSample>,
    pub price: Option<PriceSnapshot>,
    pub network: Option<NetworkStats>,
    pub network_is_mock: bool,
    pub tps_history: Vec<u32>,
    pub wallet: WalletSession,
    pub taken_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct StatusReport {
    pub price: StreamStatus,
    pub network_stats: StreamStatus,
    pub token_list: StreamStatus,
    pub sources: Vec<SourceReport>,
    pub last_error: Option<String>,
}

impl AppState {
    pub fn new(price_window: usize) -> Self {
        AppState {
            tokens: RwLock::new(TokenBoard::default()),
            price: RwLock::new(PriceBoard::new(price_window)),
            network: RwLock::new(NetworkBoard::new(TPS_WINDOW)),
            wallet: RwLock::new(WalletSession::default()),
        }
    }

    pub async fn snapshot(&self) -> DashboardSnapshot {
        let (tokens, tokens_loaded, tokens_error) = {
            let board = self.tokens.read().await;
            (board.records.clone(), board.loaded, board.last_error.clone())
        };
        let (price_history, price) = {
            let board = self.price.read().await;
            (board.history.iter().copied().collect(), board.snapshot.clone())
        };
        let (network, network_is_mock, tps_history) = {
            let board = self.network.read().await;
            (board.stats, board.is_mock, board.tps_history.iter().copied().collect())
        };
        let wallet = self.wallet.read().await.clone();

        DashboardSnapshot {
            tokens,
            tokens_loaded,
            tokens_error,
            price_history,
            price,
            network,
            network_is_mock,
            tps_history,
            wallet,
            taken_at: Utc::now(),
        }
    }

    pub async fn status(&self) -> StatusReport {
        let (token_list, sources, last_error) = {
            let board = self.tokens.read().await;
            (board.status.clone(), board.sources.clone(), board.last_error.clone())
        };

        StatusReport {
            price: self.price.read().await.status.clone(),
            network_stats: self.network.read().await.status.clone(),
            token_list,
            sources,
            last_error,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::mock::synthetic_records;
    use crate::models::{stream::Outcome, token::SourceTag};

    fn aggregation(count: usize) -> Aggregation {
        Aggregation {
            records: synthetic_records(SourceTag::Trending, count, &mut rand::thread_rng()),
            sources: vec![SourceReport {
                tag: SourceTag::Trending,
                outcome: Outcome::Live,
                count,
            }],
        }
    }

    #[test]
    fn test_failure_before_first_load_uses_static_listing() {
        let mut board = TokenBoard::default();

        board.fail("task panicked".to_string());

        assert!(board.loaded);
        assert_eq!(board.records.len(), 3);
        assert_eq!(board.last_error.as_deref(), Some("task panicked"));
    }

    #[test]
    fn test_failure_keeps_previous_records() {
        let mut board = TokenBoard::default();
        board.replace(aggregation(5));
        let before = board.records.clone();

        board.fail("task panicked".to_string());

        assert!(Arc::ptr_eq(&before, &board.records));
        assert!(board.last_error.is_some());

        board.replace(aggregation(2));
        assert_eq!(board.records.len(), 2);
        assert!(board.last_error.is_none());
    }

    #[tokio::test]
    async fn test_snapshot_of_fresh_state() {
        let state = AppState::new(7);
        let snapshot = state.snapshot().await;

        assert!(snapshot.tokens.is_empty());
        assert!(!snapshot.tokens_loaded);
        assert!(snapshot.price.is_none());
        assert!(snapshot.price_history.is_empty());
        assert!(snapshot.network.is_none());
        assert!(!snapshot.wallet.is_connected());
    }
}
