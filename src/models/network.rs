use serde::Serialize;

use super::{stream::StreamStatus, window::RollingWindow};
use crate::components::mock::MockNetworkModel;

/// Snapshot of network activity, replaced wholesale each refresh.
#[derive(Debug, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct NetworkStats {
    pub transactions_per_second: u32,
    pub validator_count: u32,
    pub current_epoch: u64,
}

#[derive(Debug)]
pub struct NetworkBoard {
    pub stats: Option<NetworkStats>,
    pub tps_history: RollingWindow<u32>,
    pub is_mock: bool,
    pub model: MockNetworkModel,
    pub status: StreamStatus,
}

impl NetworkBoard {
    pub fn new(tps_window: usize) -> Self {
        NetworkBoard {
            stats: None,
            tps_history: RollingWindow::new(tps_window),
            is_mock: false,
            model: MockNetworkModel::new(),
            status: StreamStatus::default(),
        }
    }

    pub fn record(&mut self, stats: NetworkStats, is_mock: bool) {
        self.tps_history.push(stats.transactions_per_second);
        self.stats = Some(stats);
        self.is_mock = is_mock;
    }
}
