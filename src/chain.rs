//! Raw upstream chain models and normalization into per-strike rows.
//!
//! The upstream document is treated as untrusted: every field is optional,
//! numeric fields tolerate string encodings, and a missing or malformed top
//! level normalizes to an empty snapshot rather than an error.

use serde::{Deserialize, Deserializer, Serialize};
use std::cmp::Ordering;
use tracing::warn;
use utoipa::ToSchema;

/// Option contract side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub enum Side {
    /// Call contract.
    CE,
    /// Put contract.
    PE,
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::CE => write!(f, "CE"),
            Self::PE => write!(f, "PE"),
        }
    }
}

/// Which sides a scan covers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "UPPERCASE")]
pub enum ScanSide {
    /// Both sides.
    #[default]
    All,
    /// Calls only.
    CE,
    /// Puts only.
    PE,
}

impl ScanSide {
    /// Concrete sides covered by this selection.
    pub fn sides(self) -> &'static [Side] {
        match self {
            Self::All => &[Side::CE, Side::PE],
            Self::CE => &[Side::CE],
            Self::PE => &[Side::PE],
        }
    }

    /// Whether the selection covers a given side.
    pub fn includes(self, side: Side) -> bool {
        self.sides().contains(&side)
    }

    /// Parses the upper-cased wire token, `None` for anything unrecognized.
    pub fn parse(token: &str) -> Option<Self> {
        match token {
            "ALL" => Some(Self::All),
            "CE" => Some(Self::CE),
            "PE" => Some(Self::PE),
            _ => None,
        }
    }
}

/// Deserializes an optional float that may arrive as a number, a numeric
/// string, or null/absent.
fn flexible_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::Number(n) => n.as_f64(),
        serde_json::Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    })
}

/// Raw option-chain document as returned upstream.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawOptionChain {
    /// Top-level records block; absent in malformed responses.
    #[serde(default)]
    pub records: Option<RawRecords>,
}

/// The `records` block of the upstream document.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawRecords {
    /// Expiry dates in upstream order (nearest first).
    #[serde(rename = "expiryDates", default)]
    pub expiry_dates: Vec<String>,
    /// Per-strike chain entries across all expiries.
    #[serde(default)]
    pub data: Vec<RawChainEntry>,
    /// Spot price of the underlying.
    #[serde(rename = "underlyingValue", default, deserialize_with = "flexible_f64")]
    pub underlying_value: Option<f64>,
    /// Symbol name for index chains.
    #[serde(default)]
    pub index: Option<String>,
    /// Symbol name for equity chains.
    #[serde(default)]
    pub underlying: Option<String>,
}

/// One chain entry: a strike/expiry pair with optional CE/PE legs.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawChainEntry {
    /// Strike price; entries without a resolvable strike are dropped.
    #[serde(rename = "strikePrice", default, deserialize_with = "flexible_f64")]
    pub strike_price: Option<f64>,
    /// Expiry date token.
    #[serde(rename = "expiryDate", default)]
    pub expiry_date: Option<String>,
    /// Call leg, absent when the strike has no call contract.
    #[serde(rename = "CE", default)]
    pub ce: Option<RawOptionLeg>,
    /// Put leg, absent when the strike has no put contract.
    #[serde(rename = "PE", default)]
    pub pe: Option<RawOptionLeg>,
}

/// One contract leg of a chain entry.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawOptionLeg {
    /// Implied volatility.
    #[serde(rename = "impliedVolatility", default, deserialize_with = "flexible_f64")]
    pub implied_volatility: Option<f64>,
    /// Last traded price.
    #[serde(rename = "lastPrice", default, deserialize_with = "flexible_f64")]
    pub last_price: Option<f64>,
    #[serde(rename = "totalTradedVolume", default, deserialize_with = "flexible_f64")]
    total_traded_volume: Option<f64>,
    #[serde(rename = "lastTradedVolume", default, deserialize_with = "flexible_f64")]
    last_traded_volume: Option<f64>,
    #[serde(rename = "totalTradedQty", default, deserialize_with = "flexible_f64")]
    total_traded_qty: Option<f64>,
}

impl RawOptionLeg {
    /// Traded volume: first present of the three fields upstream has used
    /// across chain revisions.
    pub fn volume(&self) -> Option<f64> {
        self.total_traded_volume
            .or(self.last_traded_volume)
            .or(self.total_traded_qty)
    }
}

/// Canonical per-strike row.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Row {
    /// Symbol name as reported upstream.
    pub symbol: Option<String>,
    /// Underlying spot price.
    pub underlying: Option<f64>,
    /// Expiry token for this row.
    pub expiry: Option<String>,
    /// Strike price; always present (strike-less entries are dropped).
    pub strike: f64,
    /// Call implied volatility.
    #[serde(rename = "CE_iv")]
    pub ce_iv: Option<f64>,
    /// Put implied volatility.
    #[serde(rename = "PE_iv")]
    pub pe_iv: Option<f64>,
    /// Call last traded price.
    #[serde(rename = "CE_ltp")]
    pub ce_ltp: Option<f64>,
    /// Put last traded price.
    #[serde(rename = "PE_ltp")]
    pub pe_ltp: Option<f64>,
    /// Call traded volume.
    #[serde(rename = "CE_vol")]
    pub ce_vol: Option<f64>,
    /// Put traded volume.
    #[serde(rename = "PE_vol")]
    pub pe_vol: Option<f64>,
}

impl Row {
    /// Implied volatility for a side.
    pub fn iv(&self, side: Side) -> Option<f64> {
        match side {
            Side::CE => self.ce_iv,
            Side::PE => self.pe_iv,
        }
    }

    /// Last traded price for a side.
    pub fn ltp(&self, side: Side) -> Option<f64> {
        match side {
            Side::CE => self.ce_ltp,
            Side::PE => self.pe_ltp,
        }
    }

    /// Traded volume for a side.
    pub fn volume(&self, side: Side) -> Option<f64> {
        match side {
            Side::CE => self.ce_vol,
            Side::PE => self.pe_vol,
        }
    }

    /// LTP for a side, filtered to tradeable values: a zero price means the
    /// contract has not traded and counts as missing.
    pub fn tradeable_ltp(&self, side: Side) -> Option<f64> {
        self.ltp(side).filter(|v| *v > 0.0)
    }
}

/// Normalized chain: metadata plus rows filtered to one expiry.
#[derive(Debug, Clone, Default)]
pub struct ChainSnapshot {
    /// Expiry tokens in upstream order.
    pub expiries: Vec<String>,
    /// Underlying spot price.
    pub underlying: Option<f64>,
    /// Symbol name as reported upstream.
    pub symbol_name: Option<String>,
    /// Per-strike rows, ascending by strike.
    pub rows: Vec<Row>,
}

/// Converts a raw chain document into a [`ChainSnapshot`].
///
/// When `chosen_expiry` is given, entries for other expiries are dropped.
/// Entries whose strike cannot be resolved to a number are dropped after
/// mapping; remaining rows are stably sorted ascending by strike.
pub fn normalize(raw: &RawOptionChain, chosen_expiry: Option<&str>) -> ChainSnapshot {
    let Some(records) = &raw.records else {
        warn!("Invalid chain document structure, returning empty snapshot");
        return ChainSnapshot::default();
    };

    let symbol_name = records.index.clone().or_else(|| records.underlying.clone());
    let underlying = records.underlying_value;

    let mut rows: Vec<Row> = Vec::with_capacity(records.data.len());
    for entry in &records.data {
        if let Some(chosen) = chosen_expiry
            && entry.expiry_date.as_deref() != Some(chosen)
        {
            continue;
        }
        let Some(strike) = entry.strike_price else {
            continue;
        };
        let ce = entry.ce.as_ref();
        let pe = entry.pe.as_ref();
        rows.push(Row {
            symbol: symbol_name.clone(),
            underlying,
            expiry: entry.expiry_date.clone(),
            strike,
            ce_iv: ce.and_then(|leg| leg.implied_volatility),
            pe_iv: pe.and_then(|leg| leg.implied_volatility),
            ce_ltp: ce.and_then(|leg| leg.last_price),
            pe_ltp: pe.and_then(|leg| leg.last_price),
            ce_vol: ce.and_then(|leg| leg.volume()),
            pe_vol: pe.and_then(|leg| leg.volume()),
        });
    }

    rows.sort_by(|a, b| a.strike.partial_cmp(&b.strike).unwrap_or(Ordering::Equal));

    ChainSnapshot {
        expiries: records.expiry_dates.clone(),
        underlying,
        symbol_name,
        rows,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn raw_from(value: serde_json::Value) -> RawOptionChain {
        serde_json::from_value(value).expect("should deserialize")
    }

    fn sample_chain() -> RawOptionChain {
        raw_from(json!({
            "records": {
                "expiryDates": ["30-Sep-2025", "28-Oct-2025"],
                "underlyingValue": 24_000.5,
                "index": "NIFTY",
                "data": [
                    {
                        "strikePrice": 24_100.0,
                        "expiryDate": "30-Sep-2025",
                        "CE": {"impliedVolatility": 14.2, "lastPrice": 95.0, "totalTradedVolume": 1200.0},
                        "PE": {"impliedVolatility": 15.1, "lastPrice": 180.0, "totalTradedVolume": 900.0}
                    },
                    {
                        "strikePrice": 24_000.0,
                        "expiryDate": "30-Sep-2025",
                        "CE": {"impliedVolatility": 13.9, "lastPrice": 140.0}
                    },
                    {
                        "strikePrice": 24_200.0,
                        "expiryDate": "28-Oct-2025",
                        "PE": {"impliedVolatility": 16.0, "lastPrice": 260.0}
                    },
                    {
                        "expiryDate": "30-Sep-2025",
                        "CE": {"lastPrice": 1.0}
                    }
                ]
            }
        }))
    }

    #[test]
    fn test_malformed_document_yields_empty_snapshot() {
        let snapshot = normalize(&raw_from(json!({"error": "blocked"})), None);
        assert!(snapshot.rows.is_empty());
        assert!(snapshot.expiries.is_empty());
        assert!(snapshot.underlying.is_none());
    }

    #[test]
    fn test_rows_sorted_ascending_and_strikeless_dropped() {
        let snapshot = normalize(&sample_chain(), None);
        assert_eq!(snapshot.rows.len(), 3);
        let strikes: Vec<f64> = snapshot.rows.iter().map(|r| r.strike).collect();
        assert_eq!(strikes, vec![24_000.0, 24_100.0, 24_200.0]);
    }

    #[test]
    fn test_expiry_filter_drops_other_expiries() {
        let snapshot = normalize(&sample_chain(), Some("30-Sep-2025"));
        assert_eq!(snapshot.rows.len(), 2);
        assert!(
            snapshot
                .rows
                .iter()
                .all(|r| r.expiry.as_deref() == Some("30-Sep-2025"))
        );
        // Expiry list stays unfiltered chain metadata.
        assert_eq!(snapshot.expiries.len(), 2);
    }

    #[test]
    fn test_missing_leg_maps_to_none() {
        let snapshot = normalize(&sample_chain(), Some("30-Sep-2025"));
        let row = &snapshot.rows[0];
        assert_eq!(row.strike, 24_000.0);
        assert!(row.pe_iv.is_none());
        assert!(row.pe_ltp.is_none());
        assert_eq!(row.ce_ltp, Some(140.0));
    }

    #[test]
    fn test_volume_field_fallback_order() {
        let leg: RawOptionLeg = serde_json::from_value(json!({
            "lastTradedVolume": 70.0,
            "totalTradedQty": 30.0
        }))
        .expect("should deserialize");
        assert_eq!(leg.volume(), Some(70.0));

        let leg: RawOptionLeg = serde_json::from_value(json!({
            "totalTradedQty": 30.0
        }))
        .expect("should deserialize");
        assert_eq!(leg.volume(), Some(30.0));
    }

    #[test]
    fn test_flexible_float_accepts_strings() {
        let raw = raw_from(json!({
            "records": {
                "expiryDates": [],
                "underlyingValue": "812.75",
                "underlying": "SBIN",
                "data": [
                    {"strikePrice": "800", "expiryDate": "30-Sep-2025"},
                    {"strikePrice": "not-a-number", "expiryDate": "30-Sep-2025"}
                ]
            }
        }));
        let snapshot = normalize(&raw, None);
        assert_eq!(snapshot.underlying, Some(812.75));
        assert_eq!(snapshot.rows.len(), 1);
        assert_eq!(snapshot.rows[0].strike, 800.0);
    }

    #[test]
    fn test_zero_ltp_is_not_tradeable() {
        let row = Row {
            symbol: None,
            underlying: None,
            expiry: None,
            strike: 100.0,
            ce_iv: None,
            pe_iv: None,
            ce_ltp: Some(0.0),
            pe_ltp: Some(12.5),
            ce_vol: None,
            pe_vol: None,
        };
        assert!(row.tradeable_ltp(Side::CE).is_none());
        assert_eq!(row.tradeable_ltp(Side::PE), Some(12.5));
    }
}
