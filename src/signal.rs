//! Stateless per-scan signal computations: ATM strike lookup, straddle
//! pricing, IV breakout detection and the bias/strategy decision table.

use crate::chain::{Row, Side};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Rounds to two decimal places.
pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// One IV breakout hit: an OTM strike whose IV exceeds the ATM IV by at least
/// the scan threshold.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct BreakoutHit {
    /// Strike price.
    pub strike: f64,
    /// Implied volatility at the strike.
    pub iv: f64,
    /// Last traded price at the strike, when available.
    pub ltp: Option<f64>,
    /// IV excess over the ATM IV, rounded to 2 decimals.
    #[serde(rename = "inc")]
    pub increment: f64,
    /// Distance from the underlying in percent, rounded to 2 decimals.
    #[serde(rename = "dist_pct")]
    pub distance_pct: f64,
}

/// ATM straddle pricing. All-or-nothing: absent when either leg's LTP is
/// missing at the resolved ATM strike.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct StraddleInfo {
    /// Sum of both legs' LTP, rounded to 2 decimals.
    pub price: f64,
    /// Mean of both legs' IV, rounded to 2 decimals; absent when either IV is.
    pub iv: Option<f64>,
    /// Resolved at-the-money strike.
    pub atm_strike: f64,
    /// Descriptive label, e.g. `"24000 CE + 24000 PE"`.
    pub label: String,
}

/// Directional bias derived from breakout hits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum Bias {
    /// Only call-side breakouts.
    Bullish,
    /// Only put-side breakouts.
    Bearish,
    /// Breakouts on both sides.
    #[serde(rename = "Vol Expansion")]
    VolExpansion,
    /// No breakouts.
    Neutral,
}

impl std::fmt::Display for Bias {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Bullish => write!(f, "Bullish"),
            Self::Bearish => write!(f, "Bearish"),
            Self::VolExpansion => write!(f, "Vol Expansion"),
            Self::Neutral => write!(f, "Neutral"),
        }
    }
}

/// Strategy classification for one scan result.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Strategy {
    /// Directional bias.
    pub bias: Bias,
    /// Suggested trade structure.
    pub suggestion: String,
    /// Top breakout increment backing the bias.
    pub strength: f64,
}

/// Finds the strike nearest the underlying that carries a usable IV for the
/// side, returning `(strike, iv)`.
///
/// Strict `<` comparison over rows in ascending strike order, so the lowest
/// strike wins exact distance ties.
pub fn nearest_strike_iv(rows: &[Row], underlying: f64, side: Side) -> Option<(f64, f64)> {
    let mut best: Option<(f64, f64)> = None;
    let mut best_distance = f64::INFINITY;
    for row in rows {
        let Some(iv) = row.iv(side) else {
            continue;
        };
        let distance = (row.strike - underlying).abs();
        if distance < best_distance {
            best = Some((row.strike, iv));
            best_distance = distance;
        }
    }
    best
}

/// Computes ATM straddle pricing.
///
/// The ATM strike is an exact match within 0.1 of the underlying, falling back
/// to the globally nearest strike. Both legs must have traded (non-zero LTP);
/// otherwise the whole computation yields `None`, never a partial straddle.
pub fn straddle_info(rows: &[Row], underlying: f64) -> Option<StraddleInfo> {
    if rows.is_empty() {
        return None;
    }

    let atm_strike = rows
        .iter()
        .find(|r| (r.strike - underlying).abs() < 0.1)
        .map(|r| r.strike)
        .or_else(|| {
            let mut best: Option<f64> = None;
            let mut best_distance = f64::INFINITY;
            for row in rows {
                let distance = (row.strike - underlying).abs();
                if distance < best_distance {
                    best = Some(row.strike);
                    best_distance = distance;
                }
            }
            best
        })?;

    let mut ce_leg: Option<&Row> = None;
    let mut pe_leg: Option<&Row> = None;
    for row in rows.iter().filter(|r| r.strike == atm_strike) {
        if row.tradeable_ltp(Side::CE).is_some() {
            ce_leg = Some(row);
        }
        if row.tradeable_ltp(Side::PE).is_some() {
            pe_leg = Some(row);
        }
    }
    let (ce_leg, pe_leg) = (ce_leg?, pe_leg?);

    let ce_ltp = ce_leg.tradeable_ltp(Side::CE)?;
    let pe_ltp = pe_leg.tradeable_ltp(Side::PE)?;
    let iv = match (ce_leg.ce_iv, pe_leg.pe_iv) {
        (Some(ce_iv), Some(pe_iv)) => Some(round2((ce_iv + pe_iv) / 2.0)),
        _ => None,
    };

    Some(StraddleInfo {
        price: round2(ce_ltp + pe_ltp),
        iv,
        atm_strike,
        label: format!("{atm_strike} CE + {atm_strike} PE"),
    })
}

/// Collects IV breakout hits for one side.
///
/// Only strikes on the out-of-the-money side of the underlying qualify
/// (CE: strike >= underlying, PE: strike <= underlying). Hits are ordered by
/// increment descending, ties broken by larger distance from the underlying,
/// surfacing both the strongest and the farthest-OTM anomalies first.
pub fn breakout_hits(
    rows: &[Row],
    underlying: f64,
    side: Side,
    atm_iv: f64,
    threshold: f64,
) -> Vec<BreakoutHit> {
    let mut hits: Vec<BreakoutHit> = Vec::new();
    for row in rows {
        let Some(iv) = row.iv(side) else {
            continue;
        };
        let otm = match side {
            Side::CE => row.strike >= underlying,
            Side::PE => row.strike <= underlying,
        };
        if !otm {
            continue;
        }
        let increment = iv - atm_iv;
        if increment >= threshold {
            let distance_pct = (row.strike - underlying).abs() / underlying * 100.0;
            hits.push(BreakoutHit {
                strike: row.strike,
                iv,
                ltp: row.ltp(side),
                increment: round2(increment),
                distance_pct: round2(distance_pct),
            });
        }
    }

    hits.sort_by(|a, b| {
        b.increment
            .partial_cmp(&a.increment)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then(
                b.distance_pct
                    .partial_cmp(&a.distance_pct)
                    .unwrap_or(std::cmp::Ordering::Equal),
            )
    });
    hits
}

/// Classifies directional bias from the two hit lists. A decision table, not
/// a model: which sides fired determines the bias, the top increment its
/// strength.
pub fn strategy(ce_hits: &[BreakoutHit], pe_hits: &[BreakoutHit]) -> Strategy {
    match (ce_hits.first(), pe_hits.first()) {
        (Some(ce_top), None) => Strategy {
            bias: Bias::Bullish,
            suggestion: "Call Buy / Bull Call Spread".to_string(),
            strength: ce_top.increment,
        },
        (None, Some(pe_top)) => Strategy {
            bias: Bias::Bearish,
            suggestion: "Put Buy / Bear Put Spread".to_string(),
            strength: pe_top.increment,
        },
        (Some(ce_top), Some(pe_top)) => Strategy {
            bias: Bias::VolExpansion,
            suggestion: "Long Straddle / Strangle".to_string(),
            strength: ce_top.increment.max(pe_top.increment),
        },
        (None, None) => Strategy {
            bias: Bias::Neutral,
            suggestion: "Wait / No Trade".to_string(),
            strength: 0.0,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(strike: f64, ce_iv: Option<f64>, pe_iv: Option<f64>) -> Row {
        Row {
            symbol: None,
            underlying: None,
            expiry: None,
            strike,
            ce_iv,
            pe_iv,
            ce_ltp: None,
            pe_ltp: None,
            ce_vol: None,
            pe_vol: None,
        }
    }

    fn row_with_ltp(strike: f64, ce_ltp: Option<f64>, pe_ltp: Option<f64>) -> Row {
        Row {
            ce_ltp,
            pe_ltp,
            ce_iv: Some(12.0),
            pe_iv: Some(14.0),
            ..row(strike, None, None)
        }
    }

    #[test]
    fn test_nearest_strike_lowest_wins_ties() {
        // 95 and 105 are equidistant from 100; 95 comes first in strike order.
        let rows = vec![
            row(95.0, Some(11.0), None),
            row(105.0, Some(13.0), None),
        ];
        let (strike, iv) = nearest_strike_iv(&rows, 100.0, Side::CE).expect("should resolve");
        assert_eq!(strike, 95.0);
        assert_eq!(iv, 11.0);
    }

    #[test]
    fn test_nearest_strike_skips_rows_without_iv() {
        let rows = vec![
            row(100.0, None, Some(15.0)),
            row(110.0, Some(13.0), None),
        ];
        let (strike, _) = nearest_strike_iv(&rows, 100.0, Side::CE).expect("should resolve");
        assert_eq!(strike, 110.0);
        assert!(nearest_strike_iv(&[row(100.0, None, None)], 100.0, Side::PE).is_none());
    }

    #[test]
    fn test_straddle_requires_both_legs() {
        let rows = vec![row_with_ltp(100.0, Some(5.0), None)];
        assert!(straddle_info(&rows, 100.0).is_none());

        let rows = vec![row_with_ltp(100.0, Some(5.0), Some(7.0))];
        let straddle = straddle_info(&rows, 100.0).expect("should resolve");
        assert_eq!(straddle.price, 12.0);
        assert_eq!(straddle.iv, Some(13.0));
        assert_eq!(straddle.atm_strike, 100.0);
        assert_eq!(straddle.label, "100 CE + 100 PE");
    }

    #[test]
    fn test_straddle_zero_ltp_counts_as_missing() {
        let rows = vec![row_with_ltp(100.0, Some(0.0), Some(7.0))];
        assert!(straddle_info(&rows, 100.0).is_none());
    }

    #[test]
    fn test_straddle_falls_back_to_nearest_strike() {
        let rows = vec![
            row_with_ltp(95.0, Some(4.0), Some(8.0)),
            row_with_ltp(110.0, Some(2.0), Some(12.0)),
        ];
        let straddle = straddle_info(&rows, 100.0).expect("should resolve");
        assert_eq!(straddle.atm_strike, 95.0);
    }

    #[test]
    fn test_breakout_hits_respect_side_of_underlying() {
        let rows = vec![
            row(90.0, Some(25.0), Some(25.0)),
            row(100.0, Some(25.0), Some(25.0)),
            row(110.0, Some(25.0), Some(25.0)),
        ];
        let ce = breakout_hits(&rows, 100.0, Side::CE, 10.0, 5.0);
        assert!(ce.iter().all(|h| h.strike >= 100.0));
        let pe = breakout_hits(&rows, 100.0, Side::PE, 10.0, 5.0);
        assert!(pe.iter().all(|h| h.strike <= 100.0));
    }

    #[test]
    fn test_breakout_increment_at_threshold_boundary() {
        // ATM IV 15.0, candidate IV 21.5, threshold 5.0 -> increment 6.50.
        let rows = vec![row(1050.0, Some(21.5), None)];
        let hits = breakout_hits(&rows, 1000.0, Side::CE, 15.0, 5.0);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].increment, 6.5);
        assert_eq!(hits[0].distance_pct, 5.0);

        // Exactly at threshold still fires.
        let rows = vec![row(1050.0, Some(20.0), None)];
        assert_eq!(breakout_hits(&rows, 1000.0, Side::CE, 15.0, 5.0).len(), 1);
        // Just below does not.
        let rows = vec![row(1050.0, Some(19.99), None)];
        assert!(breakout_hits(&rows, 1000.0, Side::CE, 15.0, 5.0).is_empty());
    }

    #[test]
    fn test_breakout_ordering_increment_then_distance() {
        let rows = vec![
            row(1010.0, Some(21.0), None), // inc 6.0, near
            row(1200.0, Some(21.0), None), // inc 6.0, far
            row(1100.0, Some(23.0), None), // inc 8.0
        ];
        let hits = breakout_hits(&rows, 1000.0, Side::CE, 15.0, 5.0);
        let strikes: Vec<f64> = hits.iter().map(|h| h.strike).collect();
        // Highest increment first; equal increments ordered by larger distance.
        assert_eq!(strikes, vec![1100.0, 1200.0, 1010.0]);
    }

    #[test]
    fn test_strategy_decision_table() {
        let hit = BreakoutHit {
            strike: 1050.0,
            iv: 21.5,
            ltp: None,
            increment: 6.5,
            distance_pct: 5.0,
        };
        let stronger = BreakoutHit {
            increment: 9.0,
            ..hit.clone()
        };

        let s = strategy(&[hit.clone()], &[]);
        assert_eq!(s.bias, Bias::Bullish);
        assert_eq!(s.strength, 6.5);

        let s = strategy(&[], &[hit.clone()]);
        assert_eq!(s.bias, Bias::Bearish);

        let s = strategy(&[hit.clone()], &[stronger]);
        assert_eq!(s.bias, Bias::VolExpansion);
        assert_eq!(s.strength, 9.0);

        let s = strategy(&[], &[]);
        assert_eq!(s.bias, Bias::Neutral);
        assert_eq!(s.strength, 0.0);
        assert_eq!(s.suggestion, "Wait / No Trade");
    }
}
