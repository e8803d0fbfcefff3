//! Multi-symbol breakout scanning on top of the upstream client.
//!
//! One scan walks its symbols sequentially with a small throttle between
//! fetches; a symbol that fails upstream is logged and omitted so the rest of
//! the batch still produces results.

use crate::chain::{self, ChainSnapshot, ScanSide, Side};
use crate::config::ScanConfig;
use crate::models::{clean_symbols, ScanResult, ScanSummary};
use crate::signal;
use crate::upstream::{FetchError, UpstreamClient};
use std::collections::HashMap;
use std::time::Duration;
use tracing::{debug, warn};

/// One symbol's chain resolved to a concrete expiry.
#[derive(Debug, Clone)]
pub struct SymbolChain {
    /// All expiries upstream reports, nearest first.
    pub expiries: Vec<String>,
    /// Expiry the rows are filtered to: the caller's override when given,
    /// otherwise the nearest expiry, `None` when upstream reports none.
    pub expiry_used: Option<String>,
    /// Snapshot filtered to `expiry_used`.
    pub snapshot: ChainSnapshot,
}

/// Fetches one symbol's chain and resolves it to a single expiry.
///
/// The document is normalized twice: once unfiltered to discover the expiry
/// list, then filtered to the override or the nearest expiry.
pub async fn fetch_symbol_chain(
    upstream: &UpstreamClient,
    symbol: &str,
    expiry_override: Option<&str>,
) -> Result<SymbolChain, FetchError> {
    let raw = upstream.fetch_chain(symbol).await?;
    let base = chain::normalize(&raw, None);
    let expiry_used = expiry_override
        .map(str::to_string)
        .or_else(|| base.expiries.first().cloned());
    let snapshot = chain::normalize(&raw, expiry_used.as_deref());
    Ok(SymbolChain {
        expiries: base.expiries,
        expiry_used,
        snapshot,
    })
}

/// Computes one symbol's scan aggregate from its resolved chain.
///
/// Returns `None` when the snapshot carries no rows or no underlying price,
/// which is how a blocked or empty upstream response surfaces here.
pub fn build_scan_result(
    symbol: &str,
    chain: &SymbolChain,
    threshold: f64,
    side: ScanSide,
) -> Option<ScanResult> {
    let rows = &chain.snapshot.rows;
    let underlying = chain.snapshot.underlying?;
    if rows.is_empty() {
        return None;
    }

    let atm_ce = signal::nearest_strike_iv(rows, underlying, Side::CE);
    let atm_pe = signal::nearest_strike_iv(rows, underlying, Side::PE);

    let atm_ltp = |atm: Option<(f64, f64)>, leg: Side| {
        let (strike, _) = atm?;
        rows.iter()
            .find(|r| r.strike == strike)
            .and_then(|r| r.ltp(leg))
            .map(signal::round2)
    };

    let ce_hits = match (side.includes(Side::CE), atm_ce) {
        (true, Some((_, iv))) => signal::breakout_hits(rows, underlying, Side::CE, iv, threshold),
        _ => Vec::new(),
    };
    let pe_hits = match (side.includes(Side::PE), atm_pe) {
        (true, Some((_, iv))) => signal::breakout_hits(rows, underlying, Side::PE, iv, threshold),
        _ => Vec::new(),
    };

    let summary = ScanSummary {
        ce_hit_count: ce_hits.len(),
        pe_hit_count: pe_hits.len(),
        // Hits are ordered strongest first.
        ce_max_inc: ce_hits.first().map(|h| h.increment).unwrap_or(0.0),
        pe_max_inc: pe_hits.first().map(|h| h.increment).unwrap_or(0.0),
    };
    let strategy = signal::strategy(&ce_hits, &pe_hits);

    Some(ScanResult {
        symbol: symbol.to_string(),
        expiry_used: chain.expiry_used.clone().unwrap_or_else(|| "-".to_string()),
        underlying: signal::round2(underlying),
        atm_ce_iv: atm_ce.map(|(_, iv)| signal::round2(iv)),
        atm_pe_iv: atm_pe.map(|(_, iv)| signal::round2(iv)),
        atm_ce_ltp: atm_ltp(atm_ce, Side::CE),
        atm_pe_ltp: atm_ltp(atm_pe, Side::PE),
        ce_hits,
        pe_hits,
        summary,
        strategy,
    })
}

/// Scans a batch of symbols sequentially.
///
/// Symbols are upper-cased and de-blanked first. Each fetch is preceded by the
/// configured throttle sleep; a per-symbol failure is logged at warn and the
/// symbol omitted from the output.
pub async fn scan_symbols(
    upstream: &UpstreamClient,
    scan: &ScanConfig,
    symbols: &[String],
    threshold: f64,
    side: ScanSide,
    expiry_overrides: &HashMap<String, String>,
) -> Vec<ScanResult> {
    let symbols = clean_symbols(symbols);
    let throttle = Duration::from_millis(scan.symbol_throttle_ms);
    let mut results = Vec::with_capacity(symbols.len());

    for symbol in &symbols {
        tokio::time::sleep(throttle).await;
        let chain =
            match fetch_symbol_chain(upstream, symbol, expiry_overrides.get(symbol).map(String::as_str))
                .await
            {
                Ok(chain) => chain,
                Err(err) => {
                    warn!(symbol = %symbol, error = %err, "Scan skipping symbol");
                    continue;
                }
            };
        match build_scan_result(symbol, &chain, threshold, side) {
            Some(result) => results.push(result),
            None => debug!(symbol = %symbol, "Empty chain, skipping symbol"),
        }
    }

    results
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chain::Row;
    use crate::signal::Bias;

    fn row(strike: f64, ce_iv: Option<f64>, pe_iv: Option<f64>) -> Row {
        Row {
            symbol: None,
            underlying: Some(1000.0),
            expiry: Some("30-Sep-2025".to_string()),
            strike,
            ce_iv,
            pe_iv,
            ce_ltp: Some(10.0),
            pe_ltp: Some(12.0),
            ce_vol: None,
            pe_vol: None,
        }
    }

    fn symbol_chain(rows: Vec<Row>, underlying: Option<f64>) -> SymbolChain {
        SymbolChain {
            expiries: vec!["30-Sep-2025".to_string()],
            expiry_used: Some("30-Sep-2025".to_string()),
            snapshot: ChainSnapshot {
                expiries: vec!["30-Sep-2025".to_string()],
                underlying,
                symbol_name: Some("TEST".to_string()),
                rows,
            },
        }
    }

    #[test]
    fn test_empty_rows_or_missing_underlying_skip() {
        let chain = symbol_chain(Vec::new(), Some(1000.0));
        assert!(build_scan_result("TEST", &chain, 5.0, ScanSide::All).is_none());

        let chain = symbol_chain(vec![row(1000.0, Some(15.0), Some(15.0))], None);
        assert!(build_scan_result("TEST", &chain, 5.0, ScanSide::All).is_none());
    }

    #[test]
    fn test_scan_result_aggregates_both_sides() {
        let rows = vec![
            row(950.0, Some(24.0), Some(24.0)),
            row(1000.0, Some(15.0), Some(16.0)),
            row(1050.0, Some(21.5), Some(18.0)),
        ];
        let chain = symbol_chain(rows, Some(1000.0));
        let result = build_scan_result("TEST", &chain, 5.0, ScanSide::All).expect("should scan");

        assert_eq!(result.expiry_used, "30-Sep-2025");
        assert_eq!(result.underlying, 1000.0);
        assert_eq!(result.atm_ce_iv, Some(15.0));
        assert_eq!(result.atm_pe_iv, Some(16.0));
        assert_eq!(result.atm_ce_ltp, Some(10.0));
        assert_eq!(result.atm_pe_ltp, Some(12.0));
        // CE: 1050 at 21.5 over ATM 15.0 -> inc 6.5. PE: 950 at 24.0 over 16.0 -> inc 8.0.
        assert_eq!(result.summary.ce_hit_count, 1);
        assert_eq!(result.summary.pe_hit_count, 1);
        assert_eq!(result.summary.ce_max_inc, 6.5);
        assert_eq!(result.summary.pe_max_inc, 8.0);
        assert_eq!(result.strategy.bias, Bias::VolExpansion);
        assert_eq!(result.strategy.strength, 8.0);
    }

    #[test]
    fn test_side_filter_suppresses_other_side() {
        let rows = vec![
            row(950.0, Some(24.0), Some(24.0)),
            row(1000.0, Some(15.0), Some(16.0)),
            row(1050.0, Some(21.5), Some(18.0)),
        ];
        let chain = symbol_chain(rows, Some(1000.0));
        let result = build_scan_result("TEST", &chain, 5.0, ScanSide::CE).expect("should scan");

        assert_eq!(result.summary.ce_hit_count, 1);
        assert_eq!(result.summary.pe_hit_count, 0);
        assert!(result.pe_hits.is_empty());
        // With only call hits the bias reads bullish.
        assert_eq!(result.strategy.bias, Bias::Bullish);
        // ATM levels still reported for both sides.
        assert_eq!(result.atm_pe_iv, Some(16.0));
    }

    #[test]
    fn test_missing_expiry_reported_as_dash() {
        let mut chain = symbol_chain(vec![row(1000.0, Some(15.0), Some(16.0))], Some(1000.0));
        chain.expiry_used = None;
        let result = build_scan_result("TEST", &chain, 5.0, ScanSide::All).expect("should scan");
        assert_eq!(result.expiry_used, "-");
    }
}
