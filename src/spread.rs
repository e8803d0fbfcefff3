//! Strategy/LTP spread scan: finds same-side strike pairs whose lot-weighted
//! net premium lands inside a target band.

use crate::chain::{Row, ScanSide, Side};
use crate::reference;
use crate::signal::round2;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Spread scan parameters.
#[derive(Debug, Clone, Copy)]
pub struct SpreadParams {
    /// Lots bought at the near strike.
    pub buy_lots: i64,
    /// Lots sold at the far strike.
    pub sell_lots: i64,
    /// Target absolute net premium per lot.
    pub target_diff: f64,
    /// Tolerance band around the target.
    pub tolerance: f64,
    /// Sides to scan.
    pub side: ScanSide,
    /// Lower ATM-distance bound in percent for candidate strikes.
    pub atm_from_pct: f64,
    /// Upper ATM-distance bound in percent for candidate strikes.
    pub atm_to_pct: f64,
    /// Minimum buy/sell strike distance in percent of the underlying.
    pub min_strike_diff: f64,
    /// Maximum buy/sell strike distance in percent of the underlying.
    pub max_strike_diff: f64,
}

impl Default for SpreadParams {
    fn default() -> Self {
        Self {
            buy_lots: 1,
            sell_lots: 3,
            target_diff: 6.0,
            tolerance: 1.0,
            side: ScanSide::All,
            atm_from_pct: 0.0,
            atm_to_pct: 5.0,
            min_strike_diff: 1.0,
            max_strike_diff: 10.0,
        }
    }
}

/// One matching strike pair.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SpreadMatch {
    /// Strike bought.
    pub buy_strike: f64,
    /// Strike sold.
    pub sell_strike: f64,
    /// Side bought (same as sold).
    pub buy_side: Side,
    /// Side sold.
    pub sell_side: Side,
    /// LTP of the bought leg, rounded to 2 decimals.
    pub buy_ltp: f64,
    /// LTP of the sold leg, rounded to 2 decimals.
    pub sell_ltp: f64,
    /// Lot-weighted net premium, rounded to 2 decimals.
    pub net_per_lot: f64,
    /// Net premium scaled by the contract lot size, rounded to a whole unit.
    pub total_pnl: i64,
    /// Contract lot size used for the P&L conversion.
    pub lot_size: u32,
    /// Expiry the quotes came from.
    pub expiry: Option<String>,
}

/// Finds all matching strike pairs for one symbol's snapshot rows.
///
/// Candidate strikes are limited to the ATM-distance window; buy strikes sit
/// on the OTM side of the ATM strike and sell strikes strictly further OTM.
pub fn find_spread_matches(
    symbol: &str,
    rows: &[Row],
    underlying: f64,
    expiry_used: Option<&str>,
    params: &SpreadParams,
) -> Vec<SpreadMatch> {
    // (strike, CE ltp, PE ltp) for strikes inside the ATM window, ascending.
    let candidates: Vec<(f64, Option<f64>, Option<f64>)> = rows
        .iter()
        .filter(|r| {
            let dist_pct = (r.strike - underlying).abs() / underlying * 100.0;
            dist_pct >= params.atm_from_pct && dist_pct <= params.atm_to_pct
        })
        .map(|r| (r.strike, r.ce_ltp, r.pe_ltp))
        .collect();

    if candidates.is_empty() {
        return Vec::new();
    }

    let mut atm_strike = candidates[0].0;
    let mut best_distance = f64::INFINITY;
    for &(strike, _, _) in &candidates {
        let distance = (strike - underlying).abs();
        if distance < best_distance {
            atm_strike = strike;
            best_distance = distance;
        }
    }

    let lot_size = reference::contract_lot_size(symbol);
    let mut matches = Vec::new();

    for &side in params.side.sides() {
        for (buy_idx, &(buy_strike, buy_ce, buy_pe)) in candidates.iter().enumerate() {
            let on_otm_side = match side {
                Side::CE => buy_strike >= atm_strike,
                Side::PE => buy_strike <= atm_strike,
            };
            if !on_otm_side {
                continue;
            }
            let buy_ltp = match side {
                Side::CE => buy_ce,
                Side::PE => buy_pe,
            };
            let Some(buy_ltp) = buy_ltp else {
                continue;
            };

            // Sell strikes strictly further OTM than the buy strike.
            let sell_range: Box<dyn Iterator<Item = &(f64, Option<f64>, Option<f64>)>> = match side
            {
                Side::CE => Box::new(candidates[buy_idx + 1..].iter()),
                Side::PE => Box::new(candidates[..buy_idx].iter()),
            };

            for &(sell_strike, sell_ce, sell_pe) in sell_range {
                let sell_ltp = match side {
                    Side::CE => sell_ce,
                    Side::PE => sell_pe,
                };
                let Some(sell_ltp) = sell_ltp else {
                    continue;
                };

                let diff_pct = (sell_strike - buy_strike).abs() / underlying * 100.0;
                if diff_pct < params.min_strike_diff || diff_pct > params.max_strike_diff {
                    continue;
                }

                let net =
                    buy_ltp * params.buy_lots as f64 - sell_ltp * params.sell_lots as f64;
                let abs_net = net.abs();
                if abs_net < params.target_diff - params.tolerance
                    || abs_net > params.target_diff + params.tolerance
                {
                    continue;
                }

                matches.push(SpreadMatch {
                    buy_strike,
                    sell_strike,
                    buy_side: side,
                    sell_side: side,
                    buy_ltp: round2(buy_ltp),
                    sell_ltp: round2(sell_ltp),
                    net_per_lot: round2(net),
                    total_pnl: (net * f64::from(lot_size)).round() as i64,
                    lot_size,
                    expiry: expiry_used.map(str::to_string),
                });
            }
        }
    }

    matches
}
