use chrono::Utc;
use log::{error, info, warn};
use std::{future::Future, sync::Arc, time::Duration};

use crate::{
    components::{
        aggregator::aggregate,
        mock::{mock_history, mock_quote},
        network::NetworkSource,
        price::PriceSource,
        FetchError, SourceFetcher,
    },
    models::{
        network::NetworkStats,
        price::{PriceSample, PriceSnapshot},
        state::AppState,
        stream::Outcome,
    },
};

async fn within<T, F>(budget: Duration, fut: F) -> Result<T, FetchError>
where
    F: Future<Output = Result<T, FetchError>>,
{
    tokio::time::timeout(budget, fut)
        .await
        .unwrap_or(Err(FetchError::Timeout(budget)))
}

/// Re-aggregates every token source and swaps the new listing in whole.
/// Returns the number of records now shown.
pub async fn refresh_tokens(state: &AppState, fetchers: &[Arc<dyn SourceFetcher>]) -> usize {
    state.tokens.write().await.status.begin();

    let sources = fetchers.to_vec();
    let result = tokio::spawn(async move { aggregate(&sources).await }).await;

    let mut board = state.tokens.write().await;
    let outcome = match result {
        Ok(aggregation) => {
            let outcome = aggregation.outcome();
            board.replace(aggregation);
            outcome
        }
        Err(e) => {
            error!("token refresh aborted: {}", e);
            board.fail(e.to_string());
            Outcome::Fallback
        }
    };

    board.status.complete(outcome);
    board.status.settle();

    board.records.len()
}

/// Fetches quote, detail and (for an empty chart) the market history, falling
/// back to the smoothed price model for anything that fails.
pub async fn refresh_price(state: &AppState, source: &PriceSource) -> PriceSample {
    let budget = source.config().time_budget;
    let needs_history = {
        let mut board = state.price.write().await;
        board.status.begin();
        board.history.is_empty()
    };

    let history = async {
        if needs_history {
            within(budget, source.fetch_history()).await.map(Some)
        } else {
            Ok(None)
        }
    };
    let (quote, detail, history) = tokio::join!(
        within(budget, source.fetch_quote()),
        within(budget, source.fetch_detail()),
        history
    );

    let mut board = state.price.write().await;
    let mut rng = rand::thread_rng();
    let now = Utc::now();

    let detail = detail.unwrap_or_else(|e| {
        warn!("price: coin detail unavailable: {}", e);
        board.detail_or_mock()
    });

    if let Ok(quote) = &quote {
        board.model.anchor_to(quote.price_usd);
    }

    if board.history.is_empty() {
        let seeded = match history {
            Ok(Some(samples)) => board.seed(samples),
            Ok(None) => false,
            Err(e) => {
                warn!("price: market chart unavailable: {}", e);
                false
            }
        };

        if !seeded {
            let days = board.history.capacity();
            let mock = mock_history(&board.model, days, now, &mut rng);
            board.seed(mock);
        }
    }

    let previous = board.history.latest().map(|s| s.price_usd);
    let (quote, outcome) = match quote {
        Ok(quote) => (quote, Outcome::Live),
        Err(e) => {
            warn!("price: {}, using mock data", e);
            let price = board.model.next(&mut rng);
            (mock_quote(price, previous, &mut rng), Outcome::Fallback)
        }
    };

    let sample = PriceSample {
        timestamp: now,
        price_usd: quote.price_usd,
    };
    let snapshot = PriceSnapshot {
        quote,
        detail,
        is_mock: outcome == Outcome::Fallback,
        updated_at: now,
    };

    board.record(sample, snapshot);
    board.status.complete(outcome);
    board.status.settle();

    info!("price: ${:.2} ({:?})", sample.price_usd, outcome);

    sample
}

pub async fn refresh_network_stats(state: &AppState, source: &NetworkSource) -> NetworkStats {
    state.network.write().await.status.begin();

    let result = within(source.time_budget(), source.fetch_stats()).await;

    let mut board = state.network.write().await;
    let (stats, outcome) = match result {
        Ok(stats) => {
            board.model.anchor_to(&stats);
            (stats, Outcome::Live)
        }
        Err(e) => {
            warn!("network stats: {}, using mock data", e);
            (board.model.next(&mut rand::thread_rng()), Outcome::Fallback)
        }
    };

    board.record(stats, outcome == Outcome::Fallback);
    board.status.complete(outcome);
    board.status.settle();

    stats
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        components::{presenter::render, test_support::*, SourceConfig},
        models::{
            state::LOAD_FAILED,
            stream::StreamState,
            token::{SourceTag, TokenFilter, TokenRecord},
        },
        utils::solana::Solana,
    };
    use mockito::Matcher;
    use reqwest::Client;

    const DOWN: &str = "http://127.0.0.1:1";

    fn panicking(_: SourceTag) -> Result<Vec<TokenRecord>, FetchError> {
        panic!("upstream exploded")
    }

    fn fetchers(result: fn(SourceTag) -> Result<Vec<TokenRecord>, FetchError>) -> Vec<Arc<dyn SourceFetcher>> {
        SourceTag::ALL
            .into_iter()
            .map(|tag| Arc::new(ScriptedFetcher::new(tag, result)) as Arc<dyn SourceFetcher>)
            .collect()
    }

    fn price_source(url: &str) -> PriceSource {
        PriceSource::new(Client::new(), SourceConfig::new(url, 7, Duration::from_secs(5)))
    }

    #[tokio::test]
    async fn test_refresh_tokens_with_failing_sources() {
        let state = AppState::new(7);
        let count = refresh_tokens(&state, &fetchers(failing)).await;

        assert_eq!(count, 12);
        let board = state.tokens.read().await;
        assert!(board.loaded);
        assert_eq!(board.status.state, StreamState::Idle);
        assert_eq!(board.status.last_outcome, Some(StreamState::FallbackApplied));
    }

    #[tokio::test]
    async fn test_refresh_tokens_replaces_whole_collection() {
        let state = AppState::new(7);

        refresh_tokens(&state, &fetchers(failing)).await;
        let count = refresh_tokens(&state, &fetchers(two_live)).await;

        assert_eq!(count, 6);
        let board = state.tokens.read().await;
        assert!(board.records.iter().all(|r| r.symbol.starts_with("LIVE")));
        assert_eq!(board.status.last_outcome, Some(StreamState::Success));
        assert_eq!(board.status.cycles, 2);
    }

    #[tokio::test]
    async fn test_refresh_tokens_survives_panicking_source() {
        let state = AppState::new(7);
        let count = refresh_tokens(&state, &fetchers(panicking)).await;

        assert_eq!(count, 3);
        assert!(state.tokens.read().await.last_error.is_some());

        let view = render(&state.snapshot().await, TokenFilter::All);
        assert_eq!(view.tokens.rows.len(), 3);
        assert_eq!(view.tokens.message.as_deref(), Some(LOAD_FAILED));
    }

    #[tokio::test]
    async fn test_failed_refresh_keeps_rows_and_reports_error() {
        let state = AppState::new(7);

        refresh_tokens(&state, &fetchers(two_live)).await;
        let count = refresh_tokens(&state, &fetchers(panicking)).await;

        assert_eq!(count, 6);
        let view = render(&state.snapshot().await, TokenFilter::All);
        assert_eq!(view.tokens.rows.len(), 6);
        assert!(view.tokens.rows.iter().all(|row| row.symbol.starts_with("LIVE")));
        assert_eq!(view.tokens.message.as_deref(), Some(LOAD_FAILED));

        refresh_tokens(&state, &fetchers(two_live)).await;
        let view = render(&state.snapshot().await, TokenFilter::All);
        assert_eq!(view.tokens.message, None);
    }

    #[tokio::test]
    async fn test_refresh_price_falls_back_to_model() {
        let state = AppState::new(7);
        let source = price_source(DOWN);

        let first = refresh_price(&state, &source).await;
        let second = refresh_price(&state, &source).await;

        assert!(first.price_usd >= 50.0);
        let board = state.price.read().await;
        let step = board.model.max_step();
        assert!((second.price_usd - first.price_usd).abs() <= step + 1e-9);
        assert_eq!(board.history.len(), 7);
        assert_eq!(board.history.latest().map(|s| s.price_usd), Some(second.price_usd));

        let snapshot = board.snapshot.as_ref().unwrap();
        assert!(snapshot.is_mock);
        assert_eq!(snapshot.detail.market_cap_rank, Some(5));
        assert_eq!(board.status.fallbacks, 2);
    }

    #[tokio::test]
    async fn test_refresh_price_live() {
        let mut server = mockito::Server::new_async().await;
        let _quote = server
            .mock("GET", "/simple/price")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(r#"{"solana":{"usd":150.5,"usd_24h_change":-1.5,"usd_market_cap":72000000000}}"#)
            .create_async()
            .await;
        let _chart = server
            .mock("GET", "/coins/solana/market_chart")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(r#"{"prices":[[1748217600000,140.0],[1748304000000,145.0]]}"#)
            .create_async()
            .await;
        let _detail = server
            .mock("GET", "/coins/solana")
            .match_query(Matcher::Any)
            .with_status(404)
            .create_async()
            .await;

        let state = AppState::new(7);
        let sample = refresh_price(&state, &price_source(&server.url())).await;

        assert_eq!(sample.price_usd, 150.5);
        let board = state.price.read().await;
        let prices: Vec<f64> = board.history.iter().map(|s| s.price_usd).collect();
        assert_eq!(prices, vec![140.0, 145.0, 150.5]);
        assert!((board.model.current() - 150.5).abs() < 1e-9);

        let snapshot = board.snapshot.as_ref().unwrap();
        assert!(!snapshot.is_mock);
        assert_eq!(snapshot.quote.change_24h_percent, -1.5);
        assert_eq!(snapshot.detail.ath.map(|m| m.price_usd), Some(260.06));
        assert_eq!(board.status.last_outcome, Some(StreamState::Success));
    }

    #[tokio::test]
    async fn test_refresh_network_falls_back_to_model() {
        let state = AppState::new(7);
        let source = NetworkSource::new(
            Solana::from(vec![DOWN.to_string()], Client::new()),
            Duration::from_secs(5),
        );

        let first = refresh_network_stats(&state, &source).await;
        let second = refresh_network_stats(&state, &source).await;

        assert!((2000..=5000).contains(&first.transactions_per_second));
        assert!((1700..=1900).contains(&second.validator_count));
        assert!(second.current_epoch >= first.current_epoch);

        let board = state.network.read().await;
        assert!(board.is_mock);
        assert_eq!(board.tps_history.len(), 2);
        assert_eq!(board.status.last_outcome, Some(StreamState::FallbackApplied));
    }
}
