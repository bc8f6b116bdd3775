use super::range::ValueRange;

pub const COINGECKO_API: &str = "https://api.coingecko.com/api/v3";
pub const RAYDIUM_API: &str = "https://api.raydium.io";
pub const PUMPFUN_API: &str = "https://frontend-api-v3.pump.fun";

pub const COIN_ID: &str = "solana";
pub const VS_CURRENCY: &str = "usd";
pub const FETCH_TIMEOUT_SECS: u64 = 10;

pub const TRENDING_LIMIT: usize = 5;
pub const DEX_PAIRS_LIMIT: usize = 8;
pub const LAUNCHES_LIMIT: usize = 12;

// Raydium pairs older than three days are not listings anymore.
pub const DEX_PAIR_MAX_AGE_MS: i64 = 259_200_000;

/// Value ranges a synthetic record of a given source is drawn from.
#[derive(Debug, Clone, Copy)]
pub struct SyntheticRanges {
    pub price: ValueRange,
    pub change_24h: ValueRange,
    pub market_cap: ValueRange,
    pub volume_24h: ValueRange,
    pub max_age_hours: i64,
}

pub const TRENDING_RANGES: SyntheticRanges = SyntheticRanges {
    price: ValueRange::new(0.0, 0.1),
    change_24h: ValueRange::new(-50.0, 450.0),
    market_cap: ValueRange::new(0.0, 10_000_000.0),
    volume_24h: ValueRange::new(0.0, 5_000_000.0),
    max_age_hours: 24 * 7,
};

/// Trending fallback listings are drawn tighter than live gap filling.
pub const TRENDING_FALLBACK_RANGES: SyntheticRanges = SyntheticRanges {
    price: ValueRange::new(0.0, 0.05),
    change_24h: ValueRange::new(-25.0, 275.0),
    market_cap: ValueRange::new(0.0, 15_000_000.0),
    volume_24h: ValueRange::new(0.0, 8_000_000.0),
    max_age_hours: 24 * 2,
};

pub const DEX_PAIRS_RANGES: SyntheticRanges = SyntheticRanges {
    price: ValueRange::new(0.0, 1.0),
    change_24h: ValueRange::new(-150.0, 450.0),
    market_cap: ValueRange::new(0.0, 200_000_000.0),
    volume_24h: ValueRange::new(0.0, 50_000_000.0),
    max_age_hours: 24 * 3,
};

pub const LAUNCHES_RANGES: SyntheticRanges = SyntheticRanges {
    price: ValueRange::new(0.0, 0.05),
    change_24h: ValueRange::new(-100.0, 700.0),
    market_cap: ValueRange::new(0.0, 100_000_000.0),
    volume_24h: ValueRange::new(0.0, 25_000_000.0),
    max_age_hours: 24 * 3,
};
