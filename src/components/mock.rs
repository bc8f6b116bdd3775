use chrono::{DateTime, Duration, Utc};
use rand::{seq::SliceRandom, Rng};
use std::f64::consts::PI;

use crate::{
    config::{
        meme::{
            DEX_NAMES, LAUNCH_NAMES, NAME_ADJECTIVES, NAME_ENDINGS, NAME_NOUNS, TICKER_PREFIXES,
            TICKER_SUFFIXES, TRENDING_NAMES,
        },
        range::ValueRange,
        sources::{
            SyntheticRanges, DEX_PAIRS_RANGES, LAUNCHES_RANGES, TRENDING_FALLBACK_RANGES,
            TRENDING_RANGES,
        },
    },
    models::{
        network::NetworkStats,
        price::{PriceQuote, PriceSample},
        token::{SourceTag, TokenRecord},
    },
};

// Reference levels for a mocked quote at a $180 coin price.
const MOCK_PRICE_BASE: f64 = 180.0;
const MOCK_MARKET_CAP: f64 = 85_000_000_000.0;
const MOCK_VOLUME: f64 = 3_500_000_000.0;

/// Ranges used to fill gaps in a live record.
pub fn ranges_for(tag: SourceTag) -> &'static SyntheticRanges {
    match tag {
        SourceTag::Trending => &TRENDING_RANGES,
        SourceTag::DexListing => &DEX_PAIRS_RANGES,
        SourceTag::NewLaunch => &LAUNCHES_RANGES,
    }
}

/// Ranges a fallback listing is drawn from.
pub fn fallback_ranges_for(tag: SourceTag) -> &'static SyntheticRanges {
    match tag {
        SourceTag::Trending => &TRENDING_FALLBACK_RANGES,
        tag => ranges_for(tag),
    }
}

fn names_for(tag: SourceTag) -> &'static [&'static str] {
    match tag {
        SourceTag::Trending => &TRENDING_NAMES,
        SourceTag::DexListing => &DEX_NAMES,
        SourceTag::NewLaunch => &LAUNCH_NAMES,
    }
}

fn pick<R: Rng + ?Sized>(words: &[&'static str], rng: &mut R) -> &'static str {
    words.choose(rng).copied().unwrap_or_default()
}

/// `PREFIX` + 1..=999 + `SUFFIX`, e.g. `PEPE420MOON`.
pub fn meme_ticker<R: Rng + ?Sized>(rng: &mut R) -> String {
    let prefix = pick(&TICKER_PREFIXES, rng);
    let suffix = pick(&TICKER_SUFFIXES, rng);
    let number: u16 = rng.gen_range(1..=999);

    format!("{}{}{}", prefix, number, suffix)
}

pub fn epic_name<R: Rng + ?Sized>(rng: &mut R) -> String {
    format!(
        "{} {} {}",
        pick(&NAME_ADJECTIVES, rng),
        pick(&NAME_NOUNS, rng),
        pick(&NAME_ENDINGS, rng)
    )
}

/// Launch time somewhere within the source's age range.
pub fn launched_within<R: Rng + ?Sized>(max_age_hours: i64, rng: &mut R) -> DateTime<Utc> {
    let max_secs = (max_age_hours * 3600).max(1);
    let age = rng.gen_range(0..max_secs);

    Utc::now() - Duration::seconds(age)
}

pub fn synthetic_record<R: Rng + ?Sized>(tag: SourceTag, index: usize, rng: &mut R) -> TokenRecord {
    let ranges = fallback_ranges_for(tag);
    let display_name = match names_for(tag).get(index) {
        Some(name) => name.to_string(),
        None => epic_name(rng),
    };
    let rank = match tag {
        SourceTag::Trending => Some(500 + index as u32),
        _ => None,
    };

    TokenRecord {
        symbol: meme_ticker(rng),
        display_name,
        price: ranges.price.sample(rng),
        change_24h_percent: ranges.change_24h.sample(rng),
        market_cap_usd: ranges.market_cap.sample(rng),
        volume_24h_usd: ranges.volume_24h.sample(rng),
        source_tag: tag,
        launched_at: launched_within(ranges.max_age_hours, rng),
        rank,
    }
}

/// Fallback listing for a source: `count` plausible records tagged `tag`.
pub fn synthetic_records<R: Rng + ?Sized>(tag: SourceTag, count: usize, rng: &mut R) -> Vec<TokenRecord> {
    (0..count)
        .map(|index| synthetic_record(tag, index, rng))
        .collect()
}

/// Fixed listing used when a whole token refresh blows up before anything was loaded.
pub fn static_fallback() -> Vec<TokenRecord> {
    let now = Utc::now();
    let record = |symbol: &str,
                  name: &str,
                  price: f64,
                  change: f64,
                  cap: f64,
                  volume: f64,
                  tag: SourceTag,
                  days: i64| TokenRecord {
        symbol: symbol.to_string(),
        display_name: name.to_string(),
        price,
        change_24h_percent: change,
        market_cap_usd: cap,
        volume_24h_usd: volume,
        source_tag: tag,
        launched_at: now - Duration::days(days),
        rank: None,
    };

    vec![
        record(
            "MOONPEPE",
            "MOON PEPE ROCKET",
            0.00234,
            247.5,
            12_500_000.0,
            3_400_000.0,
            SourceTag::NewLaunch,
            1,
        ),
        record(
            "SOLBEAST",
            "SOLANA BEAST MODE",
            0.156,
            -12.3,
            45_000_000.0,
            8_900_000.0,
            SourceTag::DexListing,
            2,
        ),
        record(
            "DIAMONDX",
            "DIAMOND HANDS X",
            0.00089,
            89.7,
            8_700_000.0,
            2_100_000.0,
            SourceTag::Trending,
            3,
        ),
    ]
}

/// Sinusoidal trend plus AR(1)-smoothed noise around an anchor level.
///
/// Consecutive values move by at most `amplitude * 2π / period + 2 * (1 - smoothing) * noise`,
/// so a mocked stream looks continuous across refreshes.
#[derive(Debug, Clone)]
pub struct SmoothedSeries {
    anchor: f64,
    amplitude: f64,
    period: f64,
    noise_scale: f64,
    smoothing: f64,
    bounds: ValueRange,
    step: u64,
    noise: f64,
}

impl SmoothedSeries {
    pub fn new(anchor: f64, amplitude: f64, period: f64, noise_scale: f64, bounds: ValueRange) -> Self {
        SmoothedSeries {
            anchor,
            amplitude,
            period: period.max(1.0),
            noise_scale,
            smoothing: 0.7,
            bounds,
            step: 0,
            noise: 0.0,
        }
    }

    /// Coin price around $160-$200, never below $50.
    pub fn price() -> Self {
        let base = 180.0 + rand::thread_rng().gen_range(-20.0..20.0);

        SmoothedSeries::new(base, 15.0, 24.0, 15.0, ValueRange::new(50.0, f64::MAX))
    }

    fn trend(&self, step: u64) -> f64 {
        (step as f64 / self.period * 2.0 * PI).sin() * self.amplitude
    }

    pub fn current(&self) -> f64 {
        self.bounds
            .clamp(self.anchor + self.trend(self.step) + self.noise)
    }

    /// Re-centres the series so its current value equals `value`.
    pub fn anchor_to(&mut self, value: f64) {
        self.anchor = value - self.trend(self.step) - self.noise;
    }

    pub fn next<R: Rng + ?Sized>(&mut self, rng: &mut R) -> f64 {
        let innovation = if self.noise_scale > 0.0 {
            rng.gen_range(-self.noise_scale..self.noise_scale)
        } else {
            0.0
        };

        self.step += 1;
        self.noise = self.smoothing * self.noise + (1.0 - self.smoothing) * innovation;

        self.current()
    }

    /// Stretches the bounds to cover `value` so a series anchored there is not
    /// clamped straight back into its mock range.
    pub fn widen_to(&mut self, value: f64) {
        if !self.bounds.contains(value) {
            self.bounds = ValueRange::new(self.bounds.min.min(value), self.bounds.max.max(value));
        }
    }

    pub fn floor(&self) -> f64 {
        self.bounds.min
    }

    pub fn max_step(&self) -> f64 {
        self.amplitude * 2.0 * PI / self.period + 2.0 * (1.0 - self.smoothing) * self.noise_scale
    }
}

/// Quote around a mocked price; the 24h change is measured against `previous`.
pub fn mock_quote<R: Rng + ?Sized>(price: f64, previous: Option<f64>, rng: &mut R) -> PriceQuote {
    let change_24h_percent = match previous {
        Some(previous) if previous > 0.0 => (price - previous) / previous * 100.0,
        _ => 0.0,
    };

    PriceQuote {
        price_usd: price,
        change_24h_percent,
        market_cap_usd: MOCK_MARKET_CAP * price / MOCK_PRICE_BASE,
        volume_24h_usd: MOCK_VOLUME * rng.gen_range(0.8..1.2),
    }
}

/// `days` daily samples ending a day before `now`, drawn from a copy of `series`
/// and re-anchored so the chart joins the live series without a jump.
pub fn mock_history<R: Rng + ?Sized>(
    series: &SmoothedSeries,
    days: usize,
    now: DateTime<Utc>,
    rng: &mut R,
) -> Vec<PriceSample> {
    let mut walk = series.clone();
    let prices: Vec<f64> = (0..days).map(|_| walk.next(rng)).collect();
    let offset = series.current() - prices.last().copied().unwrap_or_default();

    prices
        .iter()
        .enumerate()
        .map(|(i, price)| PriceSample {
            timestamp: now - Duration::days((days - i) as i64),
            price_usd: (*price + offset).max(series.floor()),
        })
        .collect()
}

/// Mock network statistics: smoothed TPS and validator count, non-decreasing epoch.
///
/// Unanchored values stay in 2000-5000 TPS, 1700-1900 validators and epochs
/// 580-600. Once a live reading is seen the model continues from it, even when
/// it lies outside those ranges, and the epoch may run at most one past it.
#[derive(Debug, Clone)]
pub struct MockNetworkModel {
    tps: SmoothedSeries,
    validators: SmoothedSeries,
    epoch: u64,
    epoch_ceiling: u64,
}

impl MockNetworkModel {
    pub fn new() -> Self {
        let epoch = rand::thread_rng().gen_range(580..590);

        MockNetworkModel {
            tps: SmoothedSeries::new(3500.0, 600.0, 12.0, 400.0, ValueRange::new(2000.0, 5000.0)),
            validators: SmoothedSeries::new(1800.0, 40.0, 30.0, 30.0, ValueRange::new(1700.0, 1900.0)),
            epoch,
            epoch_ceiling: 600,
        }
    }

    pub fn anchor_to(&mut self, stats: &NetworkStats) {
        let tps = stats.transactions_per_second as f64;
        let validators = stats.validator_count as f64;

        self.tps.widen_to(tps);
        self.tps.anchor_to(tps);
        self.validators.widen_to(validators);
        self.validators.anchor_to(validators);
        self.epoch = self.epoch.max(stats.current_epoch);
        self.epoch_ceiling = self.epoch_ceiling.max(stats.current_epoch + 1);
    }

    pub fn next<R: Rng + ?Sized>(&mut self, rng: &mut R) -> NetworkStats {
        // Epochs roll over roughly every couple of days; advance rarely.
        if self.epoch < self.epoch_ceiling && rng.gen_bool(0.05) {
            self.epoch += 1;
        }

        NetworkStats {
            transactions_per_second: self.tps.next(rng).round() as u32,
            validator_count: self.validators.next(rng).round() as u32,
            current_epoch: self.epoch,
        }
    }
}

impl Default for MockNetworkModel {
    fn default() -> Self {
        MockNetworkModel::new()
    }
}
