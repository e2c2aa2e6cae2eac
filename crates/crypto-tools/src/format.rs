//! Text rendering for CoinCap records
//!
//! Output is meant to be read by a person (or an LLM) on the other side of the
//! tool boundary. Numbers follow en-US conventions: comma thousands
//! separators, half-away-from-zero rounding, no trailing fractional zeros
//! unless a fixed precision is asked for.

use chrono::{DateTime, Utc};
use rust_decimal::{Decimal, RoundingStrategy};

use crate::model::{ExchangeRecord, RateRecord};

const UNKNOWN: &str = "Unknown";

/// Render exchange details, one field per line
pub fn format_exchange_details(data: &ExchangeRecord) -> String {
    let volume = data.volume_usd().map_or_else(
        || UNKNOWN.to_string(),
        |v| format!("${}", group_thousands(v, 3)),
    );
    let share = data
        .percent_total_volume()
        .map_or_else(|| UNKNOWN.to_string(), |p| format!("{}%", fixed(p, 2)));
    let updated = data
        .updated_at()
        .map_or_else(|| UNKNOWN.to_string(), |at| format_timestamp(&at));

    [
        format!("Name: {}", or_unknown(data.name.as_deref())),
        format!("Rank: {}", or_unknown(data.rank.as_deref())),
        format!("Volume (USD): {volume}"),
        format!("% of Total Volume: {share}"),
        format!("Trading Pairs: {}", or_unknown(data.trading_pairs.as_deref())),
        format!("Website: {}", or_unknown(data.exchange_url.as_deref())),
        format!("Last Updated: {updated}"),
    ]
    .join("\n")
}

/// Render a USD rate, one field per line
pub fn format_rate_details(data: &RateRecord) -> String {
    let rate = data.rate_usd().map_or_else(
        || UNKNOWN.to_string(),
        |r| format!("${}", group_thousands(r, 2)),
    );

    [
        format!(
            "Symbol: {} {}",
            or_unknown(data.symbol.as_deref()),
            non_empty(data.currency_symbol.as_deref()).unwrap_or_default()
        ),
        format!("Type: {}", or_unknown(data.kind.as_deref())),
        format!("USD Rate: {rate}"),
    ]
    .join("\n")
}

/// `1234567.891` → `1,234,567.89` with `max_fraction_digits = 2`
pub fn group_thousands(value: Decimal, max_fraction_digits: u32) -> String {
    let rounded = value
        .round_dp_with_strategy(max_fraction_digits, RoundingStrategy::MidpointAwayFromZero)
        .normalize();
    let digits = rounded.abs().to_string();
    let (int_part, frac_part) = digits
        .split_once('.')
        .map_or((digits.as_str(), None), |(i, f)| (i, Some(f)));

    let mut out = String::with_capacity(digits.len() + int_part.len() / 3 + 1);
    if rounded.is_sign_negative() && !rounded.is_zero() {
        out.push('-');
    }
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    if let Some(frac) = frac_part {
        out.push('.');
        out.push_str(frac);
    }
    out
}

/// Fixed-precision rendering, e.g. `4.2` → `4.20`
pub fn fixed(value: Decimal, fraction_digits: u32) -> String {
    let mut rounded =
        value.round_dp_with_strategy(fraction_digits, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(fraction_digits);
    rounded.to_string()
}

/// `11/14/2023, 10:13:20 PM UTC`
pub fn format_timestamp(at: &DateTime<Utc>) -> String {
    at.format("%-m/%-d/%Y, %-I:%M:%S %p UTC").to_string()
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

fn or_unknown(value: Option<&str>) -> &str {
    non_empty(value).unwrap_or(UNKNOWN)
}
