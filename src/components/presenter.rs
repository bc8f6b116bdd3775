use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

use crate::{
    models::{
        price::{AllTimeMark, PriceSample, PriceSnapshot},
        state::{DashboardSnapshot, LOAD_FAILED},
        token::{TokenFilter, TokenRecord},
        wallet::WalletSession,
    },
    utils::format::{
        format_change, format_number, format_optional, format_usd, group_thousands,
    },
};

pub const LOADING: &str = "Loading fresh memecoins...";
pub const NO_MATCHES: &str = "No tokens for this filter";

#[derive(Debug, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum ChangeClass {
    Positive,
    Negative,
}

impl ChangeClass {
    fn of(change: f64) -> Self {
        if change > 0.0 {
            ChangeClass::Positive
        } else {
            ChangeClass::Negative
        }
    }
}

#[derive(Debug, Serialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TableRow {
    pub logo: String,
    pub symbol: String,
    pub name: String,
    pub price: String,
    pub change: String,
    pub change_class: ChangeClass,
    pub market_cap: String,
    pub volume: String,
    pub platform: String,
}

#[derive(Debug, Serialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TokenTable {
    pub filter: String,
    pub rows: Vec<TableRow>,
    pub message: Option<String>,
}

#[derive(Debug, Serialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PriceChart {
    pub labels: Vec<String>,
    pub prices: Vec<f64>,
}

#[derive(Debug, Serialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MarkPanel {
    pub price: String,
    pub date: String,
}

#[derive(Debug, Serialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PricePanel {
    pub price: String,
    pub change: String,
    pub change_class: ChangeClass,
    pub market_cap: String,
    pub volume: String,
    pub circulating_supply: String,
    pub total_supply: String,
    pub max_supply: String,
    pub market_cap_rank: String,
    pub fully_diluted_valuation: String,
    pub change_7d: String,
    pub change_30d: String,
    pub change_1y: String,
    pub ath: MarkPanel,
    pub atl: MarkPanel,
    pub is_mock: bool,
}

#[derive(Debug, Serialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NetworkPanel {
    pub tps: String,
    pub validators: String,
    pub epoch: String,
    pub activity: Vec<u32>,
    pub is_mock: bool,
}

#[derive(Debug, Serialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WalletPanel {
    pub connected: bool,
    pub address: Option<String>,
    pub balance: Option<String>,
}

#[derive(Debug, Serialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DashboardView {
    pub price: Option<PricePanel>,
    pub chart: PriceChart,
    pub network: Option<NetworkPanel>,
    pub tokens: TokenTable,
    pub wallet: WalletPanel,
    pub generated_at: DateTime<Utc>,
}

pub fn render_row(record: &TokenRecord) -> TableRow {
    TableRow {
        logo: record.symbol.chars().next().map(String::from).unwrap_or_default(),
        symbol: record.symbol.clone(),
        name: record.display_name.clone(),
        price: format_usd(record.price, 6),
        change: format_change(record.change_24h_percent, 1),
        change_class: ChangeClass::of(record.change_24h_percent),
        market_cap: format!("${}", format_number(record.market_cap_usd)),
        volume: format!("${}", format_number(record.volume_24h_usd)),
        platform: record.source_tag.platform().to_uppercase(),
    }
}

/// Rows for every record matching `filter`, in collection order.
pub fn render_rows(records: &[TokenRecord], filter: TokenFilter) -> Vec<TableRow> {
    records
        .iter()
        .filter(|record| filter.matches(record))
        .map(render_row)
        .collect()
}

pub fn render_table(
    records: &[TokenRecord],
    filter: TokenFilter,
    loaded: bool,
    error: Option<&str>,
) -> TokenTable {
    let rows = render_rows(records, filter);
    let message = if !loaded {
        Some(LOADING)
    } else if error.is_some() {
        Some(LOAD_FAILED)
    } else if rows.is_empty() {
        Some(NO_MATCHES)
    } else {
        None
    };

    TokenTable {
        filter: filter.to_string(),
        rows,
        message: message.map(String::from),
    }
}

/// `Now`, `5h ago`, `2d 3h ago`.
pub fn age_label(age: Duration) -> String {
    let hours = age.num_hours().max(0);

    match hours {
        0 => "Now".to_string(),
        h if h < 24 => format!("{}h ago", h),
        h => format!("{}d {}h ago", h / 24, h % 24),
    }
}

/// Oldest sample first, labelled by age relative to `now`.
pub fn render_chart(history: &[PriceSample], now: DateTime<Utc>) -> PriceChart {
    PriceChart {
        labels: history
            .iter()
            .map(|sample| age_label(now.signed_duration_since(sample.timestamp)))
            .collect(),
        prices: history.iter().map(|sample| sample.price_usd).collect(),
    }
}

fn render_mark(mark: Option<&AllTimeMark>, decimals: usize) -> MarkPanel {
    MarkPanel {
        price: mark
            .map(|m| format_usd(m.price_usd, decimals))
            .unwrap_or_else(|| "---".to_string()),
        date: mark
            .and_then(|m| m.date)
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_else(|| "Unknown".to_string()),
    }
}

fn dollars(value: Option<f64>) -> String {
    match value.filter(|v| *v != 0.0) {
        Some(value) => format!("${}", format_number(value)),
        None => "N/A".to_string(),
    }
}

fn render_percent(change: Option<f64>) -> String {
    format_change(change.unwrap_or_default(), 2)
}

pub fn render_price(snapshot: &PriceSnapshot) -> PricePanel {
    let quote = &snapshot.quote;
    let detail = &snapshot.detail;

    PricePanel {
        price: format_usd(quote.price_usd, 2),
        change: format_change(quote.change_24h_percent, 2),
        change_class: ChangeClass::of(quote.change_24h_percent),
        market_cap: dollars(Some(quote.market_cap_usd)),
        volume: dollars(Some(quote.volume_24h_usd)),
        circulating_supply: format!("{} SOL", format_optional(detail.circulating_supply)),
        total_supply: format!("{} SOL", format_optional(detail.total_supply)),
        max_supply: match detail.max_supply {
            Some(max) if max > 0.0 => format!("{} SOL", format_number(max)),
            _ => "No Limit".to_string(),
        },
        market_cap_rank: detail
            .market_cap_rank
            .map(|rank| format!("#{}", rank))
            .unwrap_or_else(|| "#N/A".to_string()),
        fully_diluted_valuation: dollars(detail.fully_diluted_valuation),
        change_7d: render_percent(detail.change_7d_percent),
        change_30d: render_percent(detail.change_30d_percent),
        change_1y: render_percent(detail.change_1y_percent),
        ath: render_mark(detail.ath.as_ref(), 2),
        atl: render_mark(detail.atl.as_ref(), 6),
        is_mock: snapshot.is_mock,
    }
}

pub fn render_wallet(wallet: &WalletSession) -> WalletPanel {
    WalletPanel {
        connected: wallet.is_connected(),
        address: wallet.short_address(),
        balance: wallet.balance_sol.map(|b| format!("{:.2} SOL", b)),
    }
}

/// Full dashboard view. Pure: the same snapshot and filter give the same view.
pub fn render(snapshot: &DashboardSnapshot, filter: TokenFilter) -> DashboardView {
    DashboardView {
        price: snapshot.price.as_ref().map(render_price),
        chart: render_chart(&snapshot.price_history, snapshot.taken_at),
        network: snapshot.network.map(|stats| NetworkPanel {
            tps: group_thousands(stats.transactions_per_second as u64),
            validators: group_thousands(stats.validator_count as u64),
            epoch: stats.current_epoch.to_string(),
            activity: snapshot.tps_history.clone(),
            is_mock: snapshot.network_is_mock,
        }),
        tokens: render_table(
            &snapshot.tokens,
            filter,
            snapshot.tokens_loaded,
            snapshot.tokens_error.as_deref(),
        ),
        wallet: render_wallet(&snapshot.wallet),
        generated_at: snapshot.taken_at,
    }
}
