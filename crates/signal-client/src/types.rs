//! Request and response types for the Option Signal API.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;


// ============================================================================
// Health
// ============================================================================

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Service status.
    pub status: String,
    /// Service version.
    pub version: String,
}

// ============================================================================
// Option Chain
// ============================================================================

/// One per-strike chain row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChainRow {
    /// Symbol name as reported by the source.
    pub symbol: Option<String>,
    /// Underlying spot price.
    pub underlying: Option<f64>,
    /// Expiry token for this row.
    pub expiry: Option<String>,
    /// Strike price.
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

/// On-demand chain response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChainResponse {
    /// Symbol fetched.
    pub symbol: String,
    /// All expiries the source reports, nearest first.
    pub expiries: Vec<String>,
    /// Expiry the rows are filtered to.
    pub expiry_used: Option<String>,
    /// Underlying spot price.
    pub underlying: Option<f64>,
    /// Per-strike rows, ascending by strike.
    pub rows: Vec<ChainRow>,
}

// ============================================================================
// Breakout Scan
// ============================================================================

/// Breakout scan request.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BreakoutScanRequest {
    /// Symbols to scan.
    pub symbols: Vec<String>,
    /// IV breakout threshold.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub threshold: Option<f64>,
    /// Side selection token: ALL, CE or PE.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub side: Option<String>,
    /// Per-symbol expiry overrides.
    #[serde(skip_serializing_if = "HashMap::is_empty")]
    pub expiry_overrides: HashMap<String, String>,
}

/// One IV breakout hit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BreakoutHit {
    /// Strike price.
    pub strike: f64,
    /// Implied volatility at the strike.
    pub iv: f64,
    /// Last traded price at the strike.
    pub ltp: Option<f64>,
    /// IV excess over the ATM IV.
    pub inc: f64,
    /// Distance from the underlying in percent.
    pub dist_pct: f64,
}

/// Per-side hit counts and maxima.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanSummary {
    /// Number of call-side hits.
    pub ce_hit_count: usize,
    /// Number of put-side hits.
    pub pe_hit_count: usize,
    /// Largest call-side increment.
    pub ce_max_inc: f64,
    /// Largest put-side increment.
    pub pe_max_inc: f64,
}

/// Strategy classification for one scan result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Strategy {
    /// Directional bias label.
    pub bias: String,
    /// Suggested trade structure.
    pub suggestion: String,
    /// Top breakout increment backing the bias.
    pub strength: f64,
}

/// Per-symbol breakout scan aggregate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanResult {
    /// Symbol scanned.
    pub symbol: String,
    /// Expiry used, `-` when the source reported none.
    pub expiry_used: String,
    /// Underlying spot price.
    pub underlying: f64,
    /// ATM call IV.
    pub atm_ce_iv: Option<f64>,
    /// ATM put IV.
    pub atm_pe_iv: Option<f64>,
    /// LTP at the ATM call strike.
    pub atm_ce_ltp: Option<f64>,
    /// LTP at the ATM put strike.
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
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BreakoutScanResponse {
    /// Per-symbol results.
    pub data: Vec<ScanResult>,
    /// Scan completion time, RFC 3339 UTC.
    pub ts: String,
}

// ============================================================================
// Spread Scan
// ============================================================================

/// Spread scan request.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SpreadScanRequest {
    /// Symbols to scan.
    pub symbols: Vec<String>,
    /// Lots bought at the near strike.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub buy_lots: Option<i64>,
    /// Lots sold at the far strike.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sell_lots: Option<i64>,
    /// Target absolute net premium per lot.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_diff: Option<f64>,
    /// Tolerance band around the target.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tolerance: Option<f64>,
    /// Side selection token: ALL, CE or PE.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub side: Option<String>,
    /// Lower ATM-distance bound in percent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub atm_from_pct: Option<f64>,
    /// Upper ATM-distance bound in percent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub atm_to_pct: Option<f64>,
    /// Minimum strike distance in percent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_strike_diff: Option<f64>,
    /// Maximum strike distance in percent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_strike_diff: Option<f64>,
    /// Per-symbol expiry overrides.
    #[serde(skip_serializing_if = "HashMap::is_empty")]
    pub expiry_overrides: HashMap<String, String>,
}

/// ATM straddle pricing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StraddleInfo {
    /// Sum of both legs' LTP.
    pub price: f64,
    /// Mean of both legs' IV.
    pub iv: Option<f64>,
    /// Resolved at-the-money strike.
    pub atm_strike: f64,
    /// Descriptive label, e.g. `"24000 CE + 24000 PE"`.
    pub label: String,
}

/// One matching strike pair.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpreadMatch {
    /// Strike bought.
    pub buy_strike: f64,
    /// Strike sold.
    pub sell_strike: f64,
    /// Side bought.
    pub buy_side: String,
    /// Side sold.
    pub sell_side: String,
    /// LTP of the bought leg.
    pub buy_ltp: f64,
    /// LTP of the sold leg.
    pub sell_ltp: f64,
    /// Lot-weighted net premium.
    pub net_per_lot: f64,
    /// Net premium scaled by the contract lot size.
    pub total_pnl: i64,
    /// Contract lot size used for the P&L conversion.
    pub lot_size: u32,
    /// Expiry the quotes came from.
    pub expiry: Option<String>,
}

/// Spread matches for one symbol.
#[derive(Debug, Clone, Serialize, Deserialize)]
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
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpreadScanResponse {
    /// Symbols with at least one match.
    pub data: Vec<SymbolSpreadMatches>,
}

// ============================================================================
// Premium Surge
// ============================================================================

/// Premium surge scan request.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SurgeScanRequest {
    /// Symbols to scan.
    pub symbols: Vec<String>,
    /// Minimum percentage jump to report.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_pct: Option<f64>,
    /// Per-symbol expiry overrides.
    #[serde(skip_serializing_if = "HashMap::is_empty")]
    pub expiry_overrides: HashMap<String, String>,
}

/// One premium surge event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SurgeEvent {
    /// Symbol scanned.
    pub symbol: String,
    /// Expiry the contract belongs to.
    pub expiry: String,
    /// Strike price.
    pub strike: i64,
    /// Contract side (CE/PE).
    pub side: String,
    /// Previous observed price.
    pub prev: f64,
    /// Current observed price.
    pub curr: f64,
    /// Percentage jump.
    pub pct: f64,
    /// Jump speed over the recent observation window.
    pub speed: f64,
    /// Traded volume.
    pub volume: i64,
    /// Volume expressed in lots.
    pub lots: f64,
    /// Severity label (GOOD/STRONG/EXTREME/NUCLEAR).
    pub strength: String,
    /// Event kind (OTM_BOMB/INSTITUTIONAL_BOMB).
    #[serde(rename = "type")]
    pub kind: String,
    /// Wall-clock event time, HH:MM:SS.
    pub timestamp: String,
}

/// Premium surge scan response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SurgeScanResponse {
    /// Ranked events, strongest first.
    pub data: Vec<SurgeEvent>,
}

// ============================================================================
// Suggested Symbols
// ============================================================================

/// Suggested symbol universe response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuggestedResponse {
    /// Popular F&O symbols.
    pub symbols: Vec<String>,
}
