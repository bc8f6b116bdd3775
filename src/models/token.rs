use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};
use thiserror::Error;

/// Upstream listing feed a token record originated from.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub enum SourceTag {
    Trending,
    DexListing,
    NewLaunch,
}

impl SourceTag {
    pub const ALL: [SourceTag; 3] = [
        SourceTag::Trending,
        SourceTag::DexListing,
        SourceTag::NewLaunch,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SourceTag::Trending => "trending",
            SourceTag::DexListing => "dexListing",
            SourceTag::NewLaunch => "newLaunch",
        }
    }

    /// Platform name shown on the table badge.
    pub fn platform(&self) -> &'static str {
        match self {
            SourceTag::Trending => "trending",
            SourceTag::DexListing => "raydium",
            SourceTag::NewLaunch => "pumpfun",
        }
    }
}

impl fmt::Display for SourceTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown token filter: {0}")]
pub struct UnknownFilter(pub String);

impl FromStr for SourceTag {
    type Err = UnknownFilter;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "trending" => Ok(SourceTag::Trending),
            "dexlisting" | "dex_listing" | "dex" | "raydium" => Ok(SourceTag::DexListing),
            "newlaunch" | "new_launch" | "launch" | "pumpfun" => Ok(SourceTag::NewLaunch),
            _ => Err(UnknownFilter(s.to_string())),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TokenRecord {
    pub symbol: String,
    pub display_name: String,
    pub price: f64,
    pub change_24h_percent: f64,
    pub market_cap_usd: f64,
    pub volume_24h_usd: f64,
    pub source_tag: SourceTag,
    pub launched_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rank: Option<u32>,
}

/// Table filter over `source_tag`; `All` matches every record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TokenFilter {
    #[default]
    All,
    Source(SourceTag),
}

impl TokenFilter {
    pub fn matches(&self, record: &TokenRecord) -> bool {
        match self {
            TokenFilter::All => true,
            TokenFilter::Source(tag) => record.source_tag == *tag,
        }
    }
}

impl FromStr for TokenFilter {
    type Err = UnknownFilter;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value = s.trim();

        if value.is_empty() || value.eq_ignore_ascii_case("all") {
            return Ok(TokenFilter::All);
        }

        value.parse::<SourceTag>().map(TokenFilter::Source)
    }
}

impl fmt::Display for TokenFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenFilter::All => f.write_str("all"),
            TokenFilter::Source(tag) => tag.fmt(f),
        }
    }
}
