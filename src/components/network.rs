use serde::{de::IgnoredAny, Deserialize};
use serde_json::json;
use std::time::Duration;

use super::FetchError;
use crate::{
    config::solana::RPC_METHODS,
    models::network::NetworkStats,
    utils::solana::{take_result, Solana},
};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PerformanceSample {
    num_transactions: u64,
    sample_period_secs: u64,
}

#[derive(Debug, Deserialize)]
struct EpochInfo {
    epoch: u64,
}

#[derive(Debug, Deserialize)]
struct VoteAccounts {
    current: Vec<IgnoredAny>,
}

/// Live cluster statistics from a single JSON-RPC batch.
#[derive(Debug, Clone)]
pub struct NetworkSource {
    rpc: Solana,
    time_budget: Duration,
}

impl NetworkSource {
    pub fn new(rpc: Solana, time_budget: Duration) -> Self {
        NetworkSource { rpc, time_budget }
    }

    pub fn time_budget(&self) -> Duration {
        self.time_budget
    }

    pub async fn fetch_stats(&self) -> Result<NetworkStats, FetchError> {
        let bodies = [
            self.rpc
                .build_body(0, RPC_METHODS.get_recent_performance_samples, json!([1])),
            self.rpc.build_body(1, RPC_METHODS.get_epoch_info, json!([])),
            self.rpc.build_body(
                2,
                RPC_METHODS.get_vote_accounts,
                json!([{"commitment": "confirmed"}]),
            ),
        ];
        let responses = self.rpc.fetch(&bodies).await?;

        let samples: Vec<PerformanceSample> = take_result(&responses, 0)?;
        let epoch: EpochInfo = take_result(&responses, 1)?;
        let votes: VoteAccounts = take_result(&responses, 2)?;

        let sample = samples.first().ok_or(FetchError::EmptyPayload)?;
        if sample.sample_period_secs == 0 {
            return Err(FetchError::Parse("zero-length performance sample".to_string()));
        }

        Ok(NetworkStats {
            transactions_per_second: (sample.num_transactions / sample.sample_period_secs) as u32,
            validator_count: votes.current.len() as u32,
            current_epoch: epoch.epoch,
        })
    }
}
