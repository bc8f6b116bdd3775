use log::{error, info};
use moon_dash::{
    components::{
        dex_pairs::DexPairsFetcher, launches::LaunchesFetcher, network::NetworkSource,
        price::PriceSource, trending::TrendingFetcher, SourceConfig, SourceFetcher,
    },
    config::{
        settings::Settings,
        sources::{DEX_PAIRS_LIMIT, LAUNCHES_LIMIT, TRENDING_LIMIT},
    },
    models::{state::AppState, stream::Stream},
    server::{run_server, ServerContext},
    utils::{http::build_client, solana::Solana},
    workers::{
        refresh::{refresh_network_stats, refresh_price, refresh_tokens},
        scheduler::Scheduler,
    },
};
use simple_logger::SimpleLogger;
use std::{error::Error, sync::Arc};
use tokio::sync::Notify;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let settings = Settings::from_env()?;

    SimpleLogger::new()
        .with_colors(true)
        .with_level(settings.log_level)
        .init()?;

    let client = build_client(settings.fetch_timeout)?;
    let budget = settings.fetch_timeout;
    let endpoints = &settings.endpoints;

    let token_sources: Arc<Vec<Arc<dyn SourceFetcher>>> = Arc::new(vec![
        Arc::new(TrendingFetcher::new(
            client.clone(),
            SourceConfig::new(&endpoints.coingecko, TRENDING_LIMIT, budget),
        )),
        Arc::new(DexPairsFetcher::new(
            client.clone(),
            SourceConfig::new(&endpoints.raydium, DEX_PAIRS_LIMIT, budget),
        )),
        Arc::new(LaunchesFetcher::new(
            client.clone(),
            SourceConfig::new(&endpoints.pumpfun, LAUNCHES_LIMIT, budget),
        )),
    ]);
    let price_source = Arc::new(PriceSource::new(
        client.clone(),
        SourceConfig::new(&endpoints.coingecko, settings.price_window, budget),
    ));
    let network_source = Arc::new(NetworkSource::new(
        Solana::from(endpoints.solana_rpc.clone(), client),
        budget,
    ));

    let state = Arc::new(AppState::new(settings.price_window));
    let mut scheduler = Scheduler::new();

    {
        let state = Arc::clone(&state);
        scheduler.every(Stream::Price, settings.price_refresh, move || {
            let state = Arc::clone(&state);
            let source = Arc::clone(&price_source);
            async move {
                refresh_price(&state, &source).await;
            }
        });
    }
    {
        let state = Arc::clone(&state);
        scheduler.every(Stream::NetworkStats, settings.network_refresh, move || {
            let state = Arc::clone(&state);
            let source = Arc::clone(&network_source);
            async move {
                refresh_network_stats(&state, &source).await;
            }
        });
    }
    {
        let state = Arc::clone(&state);
        scheduler.every(Stream::TokenList, settings.tokens_refresh, move || {
            let state = Arc::clone(&state);
            let sources = Arc::clone(&token_sources);
            async move {
                let count = refresh_tokens(&state, &sources).await;
                info!("token list: {} records", count);
            }
        });
    }

    info!("refresh streams started: {:?}", scheduler.streams());

    let shutdown = Arc::new(Notify::new());
    let ctx = Arc::new(ServerContext {
        state: Arc::clone(&state),
        asset_root: settings.asset_root.clone(),
    });
    let server = tokio::spawn(run_server(ctx, settings.port, Arc::clone(&shutdown)));

    tokio::select! {
        res = tokio::signal::ctrl_c() => {
            if let Err(e) = res {
                error!("failed to listen for ctrl-c: {}", e);
            }
            info!("shutting down");
        }
        res = server => {
            match res {
                Ok(Err(e)) => error!("server error: {}", e),
                Err(e) => error!("server task failed: {}", e),
                Ok(Ok(())) => {}
            }
        }
    }

    shutdown.notify_waiters();
    scheduler.shutdown().await;

    Ok(())
}
