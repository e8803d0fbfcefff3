//! Request and response models for the REST API.

use crate::chain::Row;
use crate::signal::{BreakoutHit, StraddleInfo, Strategy};
use crate::spread::SpreadMatch;
use crate::surge::SurgeEvent;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use utoipa::ToSchema;

/// Health check response.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    /// Service status.
    pub status: String,
    /// Crate version.
    pub version: String,
}

/// Query parameters for the on-demand chain endpoint.
#[derive(Debug, Deserialize, ToSchema)]
pub struct ChainQuery {
    /// Symbol to fetch; defaults to SBIN.
    pub symbol: Option<String>,
    /// Expiry override; defaults to the nearest expiry upstream reports.
    pub expiry: Option<String>,
}

/// On-demand chain response.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ChainResponse {
    /// Symbol fetched.
    pub symbol: String,
    /// All expiries upstream reports, nearest first.
    pub expiries: Vec<String>,
    /// Expiry the rows are filtered to.
    pub expiry_used: Option<String>,
    /// Underlying spot price.
    pub underlying: Option<f64>,
    /// Per-strike rows, ascending by strike.
    pub rows: Vec<Row>,
}

/// Breakout scan request.
#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(default)]
pub struct BreakoutScanRequest {
    /// Symbols to scan.
    pub symbols: Vec<String>,
    /// IV breakout threshold; must be >= 0. Defaults to the configured value.
    pub threshold: Option<f64>,
    /// Side selection token: ALL, CE or PE.
    pub side: Option<String>,
    /// Per-symbol expiry overrides.
    pub expiry_overrides: HashMap<String, String>,
}

/// Per-side hit counts and maxima for one scan result.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ScanSummary {
    /// Number of call-side hits.
    pub ce_hit_count: usize,
    /// Number of put-side hits.
    pub pe_hit_count: usize,
    /// Largest call-side increment, 0 when no hits.
    pub ce_max_inc: f64,
    /// Largest put-side increment, 0 when no hits.
    pub pe_max_inc: f64,
}

/// Per-symbol breakout scan aggregate.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ScanResult {
    /// Symbol scanned.
    pub symbol: String,
    /// Expiry used, `-` when upstream reported none.
    pub expiry_used: String,
    /// Underlying spot price, rounded to 2 decimals.
    pub underlying: f64,
    /// ATM call IV, rounded to 2 decimals.
    pub atm_ce_iv: Option<f64>,
    /// ATM put IV, rounded to 2 decimals.
    pub atm_pe_iv: Option<f64>,
    /// LTP at the ATM call strike, rounded to 2 decimals.
    pub atm_ce_ltp: Option<f64>,
    /// LTP at the ATM put strike, rounded to 2 decimals.
    pub atm_pe_ltp: Option<f64>,
    /// Call-side breakout hits, strongest first.
    pub ce_hits: Vec<BreakoutHit>,
    /// Put-side breakout hits, strongest first.
    pub pe_hits: Vec<BreakoutHit>,
    /// Hit counts and maxima.
    pub summary: ScanSummary,
    /// Bias/strategy classification.
    pub strategy: Strategy,
}

/// Breakout scan response.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct BreakoutScanResponse {
    /// Per-symbol results; failed symbols are omitted.
    pub data: Vec<ScanResult>,
    /// Scan completion time, RFC 3339 UTC.
    pub ts: String,
}

/// Spread scan request.
#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(default)]
pub struct SpreadScanRequest {
    /// Symbols to scan (capped at 210); defaults to the major liquid names.
    pub symbols: Vec<String>,
    /// Lots bought at the near strike.
    pub buy_lots: Option<i64>,
    /// Lots sold at the far strike.
    pub sell_lots: Option<i64>,
    /// Target absolute net premium per lot.
    pub target_diff: Option<f64>,
    /// Tolerance band around the target.
    pub tolerance: Option<f64>,
    /// Side selection token: ALL, CE or PE.
    pub side: Option<String>,
    /// Lower ATM-distance bound in percent.
    pub atm_from_pct: Option<f64>,
    /// Upper ATM-distance bound in percent.
    pub atm_to_pct: Option<f64>,
    /// Minimum strike distance in percent.
    pub min_strike_diff: Option<f64>,
    /// Maximum strike distance in percent.
    pub max_strike_diff: Option<f64>,
    /// Per-symbol expiry overrides.
    pub expiry_overrides: HashMap<String, String>,
}

/// Spread matches for one symbol.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SymbolSpreadMatches {
    /// Symbol scanned.
    pub symbol: String,
    /// Underlying spot price.
    pub underlying: f64,
    /// Expiry the quotes came from.
    pub expiry_used: Option<String>,
    /// ATM straddle pricing, absent when either leg has not traded.
    pub straddle: Option<StraddleInfo>,
    /// Matching strike pairs.
    pub matches: Vec<SpreadMatch>,
}

/// Spread scan response.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SpreadScanResponse {
    /// Symbols with at least one match.
    pub data: Vec<SymbolSpreadMatches>,
}

/// Premium surge scan request.
#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(default)]
pub struct SurgeScanRequest {
    /// Symbols to scan (capped at 200).
    pub symbols: Vec<String>,
    /// Minimum percentage jump to report; defaults to 200.
    pub min_pct: Option<f64>,
    /// Per-symbol expiry overrides.
    pub expiry_overrides: HashMap<String, String>,
}

/// Premium surge scan response.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SurgeScanResponse {
    /// Ranked events, strongest first, at most 50.
    pub data: Vec<SurgeEvent>,
}

/// Suggested symbol universe response.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SuggestedResponse {
    /// Popular F&O symbols.
    pub symbols: Vec<String>,
}

/// Upper-cases, trims and drops empty symbols, preserving order.
pub fn clean_symbols(symbols: &[String]) -> Vec<String> {
    symbols
        .iter()
        .map(|s| s.trim().to_uppercase())
        .filter(|s| !s.is_empty())
        .collect()
}
