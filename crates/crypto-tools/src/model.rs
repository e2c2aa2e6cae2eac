//! Domain Models
//!
//! Records returned by the CoinCap API. Every field is optional on the wire,
//! and CoinCap sends most numbers as strings, so numeric-looking fields are
//! kept as text and only parsed (into `Decimal`, never `f64`) when rendered.

use chrono::{DateTime, Utc};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};

/// Response wrapper: `{"data": ..., "timestamp": ...}`
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Envelope<T> {
    /// Payload; `null` or absent when the upstream has nothing for the id
    pub data: Option<T>,

    /// Server time in epoch milliseconds
    pub timestamp: Option<i64>,
}

impl<T> Envelope<T> {
    pub fn into_data(self) -> Option<T> {
        self.data
    }
}

/// A cryptocurrency exchange (`GET /exchanges/{id}`)
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExchangeRecord {
    #[serde(default)]
    pub exchange_id: Option<String>,

    #[serde(default)]
    pub name: Option<String>,

    /// Rank by volume
    #[serde(default, deserialize_with = "string_or_number")]
    pub rank: Option<String>,

    /// Share of total tracked volume, in percent
    #[serde(default, deserialize_with = "string_or_number")]
    pub percent_total_volume: Option<String>,

    /// 24h volume in USD
    #[serde(default, deserialize_with = "string_or_number")]
    pub volume_usd: Option<String>,

    #[serde(default, deserialize_with = "string_or_number")]
    pub trading_pairs: Option<String>,

    /// Whether the exchange offers a websocket feed
    #[serde(default)]
    pub socket: Option<bool>,

    #[serde(default)]
    pub exchange_url: Option<String>,

    /// Last update, epoch milliseconds
    #[serde(default, deserialize_with = "string_or_number")]
    pub updated: Option<String>,
}

impl ExchangeRecord {
    pub fn volume_usd(&self) -> Option<Decimal> {
        parse_decimal(self.volume_usd.as_deref())
    }

    pub fn percent_total_volume(&self) -> Option<Decimal> {
        parse_decimal(self.percent_total_volume.as_deref())
    }

    pub fn updated_at(&self) -> Option<DateTime<Utc>> {
        parse_decimal(self.updated.as_deref())
            .and_then(|millis| millis.trunc().to_i64())
            .and_then(DateTime::from_timestamp_millis)
    }
}

/// A currency rate against USD (`GET /rates/{id}`)
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RateRecord {
    #[serde(default)]
    pub id: Option<String>,

    /// Ticker symbol (e.g., "BTC")
    #[serde(default)]
    pub symbol: Option<String>,

    /// Display symbol (e.g., "$", "₿")
    #[serde(default)]
    pub currency_symbol: Option<String>,

    /// "crypto" or "fiat"
    #[serde(default, rename = "type")]
    pub kind: Option<String>,

    #[serde(default, deserialize_with = "string_or_number")]
    pub rate_usd: Option<String>,
}

impl RateRecord {
    pub fn rate_usd(&self) -> Option<Decimal> {
        parse_decimal(self.rate_usd.as_deref())
    }
}

pub type ExchangeResponse = Envelope<ExchangeRecord>;
pub type RateResponse = Envelope<RateRecord>;

/// Parse a CoinCap decimal string; empty or malformed input yields `None`
pub fn parse_decimal(raw: Option<&str>) -> Option<Decimal> {
    let raw = raw?.trim();
    if raw.is_empty() {
        return None;
    }
    raw.parse::<Decimal>()
        .ok()
        .or_else(|| Decimal::from_scientific(raw).ok())
}

/// Accept `"42"`, `42`, `4.2` or `null` for text fields
fn string_or_number<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;

    match Option::<serde_json::Value>::deserialize(deserializer)? {
        None | Some(serde_json::Value::Null) => Ok(None),
        Some(serde_json::Value::String(s)) => Ok(Some(s)),
        Some(serde_json::Value::Number(n)) => Ok(Some(n.to_string())),
        Some(other) => Err(D::Error::custom(format!(
            "expected string or number, got {other}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_exchange_envelope() {
        let body = r#"{
            "data": {
                "exchangeId": "kraken",
                "name": "Kraken",
                "rank": "3",
                "percentTotalVolume": "4.231",
                "volumeUsd": "512345678.9012",
                "tradingPairs": "418",
                "socket": false,
                "exchangeUrl": "https://kraken.com",
                "updated": 1700000000000
            },
            "timestamp": 1700000001234
        }"#;

        let envelope: ExchangeResponse = serde_json::from_str(body).unwrap();
        assert_eq!(envelope.timestamp, Some(1_700_000_001_234));

        let record = envelope.into_data().unwrap();
        assert_eq!(record.name.as_deref(), Some("Kraken"));
        assert_eq!(record.volume_usd(), Some(dec!(512345678.9012)));
        assert_eq!(record.socket, Some(false));
        assert!(record.updated_at().is_some());
    }

    #[test]
    fn test_null_data_is_soft_miss() {
        let envelope: RateResponse = serde_json::from_str(r#"{"data": null, "timestamp": 1}"#).unwrap();
        assert!(envelope.into_data().is_none());

        let envelope: RateResponse = serde_json::from_str(r#"{"timestamp": 1}"#).unwrap();
        assert!(envelope.into_data().is_none());
    }

    #[test]
    fn test_numeric_fields_accept_numbers() {
        let record: ExchangeRecord =
            serde_json::from_str(r#"{"rank": 1, "tradingPairs": 250, "volumeUsd": null}"#).unwrap();
        assert_eq!(record.rank.as_deref(), Some("1"));
        assert_eq!(record.trading_pairs.as_deref(), Some("250"));
        assert!(record.volume_usd.is_none());
    }

    #[test]
    fn test_updated_accepts_string_and_float() {
        let expected = DateTime::from_timestamp_millis(1_700_000_000_000);

        for updated in [r#""1700000000000""#, "1700000000000", "1700000000000.0"] {
            let body = format!(r#"{{"data": {{"exchangeId": "kraken", "updated": {updated}}}}}"#);
            let envelope: ExchangeResponse = serde_json::from_str(&body).unwrap();
            assert_eq!(envelope.into_data().unwrap().updated_at(), expected, "{updated}");
        }

        let record: ExchangeRecord = serde_json::from_str(r#"{"updated": "soon"}"#).unwrap();
        assert!(record.updated_at().is_none());
    }

    #[test]
    fn test_rate_kind_field() {
        let record: RateRecord = serde_json::from_str(
            r#"{"id":"bitcoin","symbol":"BTC","currencySymbol":"₿","type":"crypto","rateUsd":"67123.456"}"#,
        )
        .unwrap();
        assert_eq!(record.kind.as_deref(), Some("crypto"));
        assert_eq!(record.rate_usd(), Some(dec!(67123.456)));
    }

    #[test]
    fn test_parse_decimal() {
        assert_eq!(parse_decimal(Some(" 12.5 ")), Some(dec!(12.5)));
        assert_eq!(parse_decimal(Some("1e3")), Some(dec!(1000)));
        assert_eq!(parse_decimal(Some("")), None);
        assert_eq!(parse_decimal(Some("abc")), None);
        assert_eq!(parse_decimal(None), None);
    }
}
