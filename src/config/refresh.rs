pub const PRICE_REFRESH_SECS: u64 = 60;
pub const NETWORK_REFRESH_SECS: u64 = 120;
pub const TOKENS_REFRESH_SECS: u64 = 300;

pub const PRICE_WINDOW: usize = 7;
pub const TPS_WINDOW: usize = 12;
