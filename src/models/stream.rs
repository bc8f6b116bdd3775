use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;

/// Data streams refreshed on their own timers.
#[derive(Debug, Serialize, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub enum Stream {
    Price,
    NetworkStats,
    TokenList,
}

impl fmt::Display for Stream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stream::Price => "price",
            Stream::NetworkStats => "network-stats",
            Stream::TokenList => "token-list",
        };

        f.write_str(name)
    }
}

#[derive(Debug, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum StreamState {
    Idle,
    Fetching,
    Success,
    FallbackApplied,
}

/// How a refresh cycle ended.
#[derive(Debug, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum Outcome {
    Live,
    Fallback,
}

/// Per-stream cycle: Idle -> Fetching -> (Success | FallbackApplied) -> Idle.
#[derive(Debug, Serialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StreamStatus {
    pub state: StreamState,
    pub last_outcome: Option<StreamState>,
    pub in_flight: u32,
    pub cycles: u64,
    pub fallbacks: u64,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Default for StreamStatus {
    fn default() -> Self {
        StreamStatus {
            state: StreamState::Idle,
            last_outcome: None,
            in_flight: 0,
            cycles: 0,
            fallbacks: 0,
            updated_at: None,
        }
    }
}

impl StreamStatus {
    pub fn begin(&mut self) {
        self.in_flight += 1;
        self.state = StreamState::Fetching;
    }

    /// Records the outcome of a finished fetch; overlapping fetches settle last-write-wins.
    pub fn complete(&mut self, outcome: Outcome) {
        let state = match outcome {
            Outcome::Live => StreamState::Success,
            Outcome::Fallback => {
                self.fallbacks += 1;
                StreamState::FallbackApplied
            }
        };

        self.state = state;
        self.last_outcome = Some(state);
        self.cycles += 1;
        self.updated_at = Some(Utc::now());
    }

    pub fn settle(&mut self) {
        self.in_flight = self.in_flight.saturating_sub(1);

        if self.in_flight == 0 {
            self.state = StreamState::Idle;
        } else {
            self.state = StreamState::Fetching;
        }
    }
}
