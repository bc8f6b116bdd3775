use futures::future::join_all;
use log::info;
use serde::Serialize;
use std::sync::Arc;

use super::{load, SourceFetcher};
use crate::models::{
    stream::Outcome,
    token::{SourceTag, TokenRecord},
};

#[derive(Debug, Serialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SourceReport {
    pub tag: SourceTag,
    pub outcome: Outcome,
    pub count: usize,
}

#[derive(Debug, Clone)]
pub struct Aggregation {
    pub records: Vec<TokenRecord>,
    pub sources: Vec<SourceReport>,
}

impl Aggregation {
    /// Live only if every source answered with real data.
    pub fn outcome(&self) -> Outcome {
        if self.sources.iter().all(|s| s.outcome == Outcome::Live) {
            Outcome::Live
        } else {
            Outcome::Fallback
        }
    }
}

/// Loads every source concurrently and concatenates the results in source order.
/// Never fails: a broken source contributes its fallback listing instead.
pub async fn aggregate(fetchers: &[Arc<dyn SourceFetcher>]) -> Aggregation {
    let loads = join_all(fetchers.iter().map(|fetcher| load(fetcher.as_ref()))).await;

    let mut records = Vec::with_capacity(loads.iter().map(|l| l.records.len()).sum());
    let mut sources = Vec::with_capacity(loads.len());

    for load in loads {
        sources.push(SourceReport {
            tag: load.tag,
            outcome: load.outcome,
            count: load.records.len(),
        });
        records.extend(load.records);
    }

    info!(
        "aggregated {} records from {} sources",
        records.len(),
        sources.len()
    );

    Aggregation { records, sources }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::{test_support::*, FetchError};
    use std::time::Duration;

    type Script = fn(SourceTag) -> Result<Vec<TokenRecord>, FetchError>;

    fn fetchers(result: Script) -> Vec<Arc<dyn SourceFetcher>> {
        SourceTag::ALL
            .into_iter()
            .map(|tag| Arc::new(ScriptedFetcher::new(tag, result)) as Arc<dyn SourceFetcher>)
            .collect()
    }

    #[tokio::test]
    async fn test_all_sources_failing_still_yields_tagged_records() {
        let aggregation = aggregate(&fetchers(failing)).await;

        assert_eq!(aggregation.records.len(), 12);
        assert_eq!(aggregation.outcome(), Outcome::Fallback);
        for tag in SourceTag::ALL {
            let count = aggregation
                .records
                .iter()
                .filter(|r| r.source_tag == tag)
                .count();
            assert_eq!(count, 4);
        }
    }

    #[tokio::test]
    async fn test_source_and_record_order_preserved() {
        let aggregation = aggregate(&fetchers(two_live)).await;
        let symbols: Vec<&str> = aggregation.records.iter().map(|r| r.symbol.as_str()).collect();

        assert_eq!(
            symbols,
            vec![
                "LIVE0trending",
                "LIVE1trending",
                "LIVE0dexListing",
                "LIVE1dexListing",
                "LIVE0newLaunch",
                "LIVE1newLaunch",
            ]
        );
        assert_eq!(aggregation.outcome(), Outcome::Live);
    }

    #[tokio::test]
    async fn test_duplicates_are_kept() {
        let fetchers: Vec<Arc<dyn SourceFetcher>> = vec![
            Arc::new(ScriptedFetcher::new(SourceTag::Trending, two_live)),
            Arc::new(ScriptedFetcher::new(SourceTag::Trending, two_live)),
        ];
        let aggregation = aggregate(&fetchers).await;

        assert_eq!(aggregation.records.len(), 4);
        assert_eq!(aggregation.records[0].symbol, aggregation.records[2].symbol);
    }

    #[tokio::test(start_paused = true)]
    async fn test_mixed_outcomes_reported_per_source() {
        let fetchers: Vec<Arc<dyn SourceFetcher>> = vec![
            Arc::new(ScriptedFetcher::new(SourceTag::Trending, two_live)),
            Arc::new(
                ScriptedFetcher::new(SourceTag::DexListing, two_live)
                    .with_delay(Duration::from_secs(60)),
            ),
            Arc::new(ScriptedFetcher::new(SourceTag::NewLaunch, empty)),
        ];
        let aggregation = aggregate(&fetchers).await;

        assert_eq!(
            aggregation.sources,
            vec![
                SourceReport {
                    tag: SourceTag::Trending,
                    outcome: Outcome::Live,
                    count: 2
                },
                SourceReport {
                    tag: SourceTag::DexListing,
                    outcome: Outcome::Fallback,
                    count: 4
                },
                SourceReport {
                    tag: SourceTag::NewLaunch,
                    outcome: Outcome::Fallback,
                    count: 4
                },
            ]
        );
    }
}
