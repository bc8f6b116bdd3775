const UNITS: [(f64, &str, usize); 4] = [
    (1e12, "T", 2),
    (1e9, "B", 2),
    (1e6, "M", 1),
    (1e3, "K", 1),
];

/// Compact human number: `1_500 -> "1.5K"`, `2_300_000 -> "2.3M"`, `1e12 -> "1.00T"`.
///
/// If rounding carries a value up to 1000 of its unit, the next unit is used
/// instead (`999_960 -> "1.0M"`).
pub fn format_number(num: f64) -> String {
    if !num.is_finite() {
        return "N/A".to_string();
    }

    let sign = if num < 0.0 { "-" } else { "" };
    let abs = num.abs();

    for (index, &(scale, suffix, decimals)) in UNITS.iter().enumerate() {
        if abs < scale {
            continue;
        }

        let scaled = round_to(abs / scale, decimals);

        if scaled >= 1000.0 && index > 0 {
            let (scale, suffix, decimals) = UNITS[index - 1];
            return format!("{}{:.*}{}", sign, decimals, abs / scale, suffix);
        }

        return format!("{}{:.*}{}", sign, decimals, scaled, suffix);
    }

    let rounded = round_to(abs, 1);
    if rounded >= 1000.0 {
        return format!("{}1.0K", sign);
    }

    format!("{}{}", sign, abs)
}

/// Stat-panel variant: missing or zero values read `N/A`.
pub fn format_optional(num: Option<f64>) -> String {
    match num {
        Some(value) if value != 0.0 => format_number(value),
        _ => "N/A".to_string(),
    }
}

pub fn format_usd(price: f64, decimals: usize) -> String {
    format!("${:.*}", decimals, price)
}

/// Signed percentage, `+12.5%` / `-3.1%`.
pub fn format_change(change: f64, decimals: usize) -> String {
    let sign = if change > 0.0 { "+" } else { "" };

    format!("{}{:.*}%", sign, decimals, change)
}

/// `7xKXtg2CW87d97TXJSDpbD5jBkheTqA83TZRuJosgAsU -> "7xKX...gAsU"`.
pub fn shorten_address(address: &str) -> String {
    let chars: Vec<char> = address.chars().collect();

    if chars.len() <= 8 {
        return address.to_string();
    }

    let head: String = chars[..4].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();

    format!("{}...{}", head, tail)
}

/// `3247 -> "3,247"`.
pub fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);

    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }

    out
}

fn round_to(value: f64, decimals: usize) -> f64 {
    let factor = 10f64.powi(decimals as i32);

    (value * factor).round() / factor
}
