//! Stateful premium-surge detection.
//!
//! Keeps a bounded price history per (symbol, expiry, strike, side) in a
//! process-global [`DashMap`]; the map's per-entry locking serializes
//! concurrent read-modify-append on one contract, so the history bound holds
//! across concurrent scans. Keys are never evicted: over a long-running
//! process the key count grows with every symbol/expiry/strike observed. A
//! restart clears the cache.

use crate::chain::{Row, Side};
use crate::reference;
use chrono::{DateTime, Local, Utc};
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use utoipa::ToSchema;

/// Most recent prices retained per contract.
const HISTORY_DEPTH: usize = 5;
/// A strike must be OTM by this buffer before its moves count as anomalies.
const OTM_BUFFER: f64 = 10.0;
/// Prior prices at or below this level are noise, not a surge baseline.
const NOISE_FLOOR: f64 = 0.1;
/// Ranked events returned per scan.
const MAX_EVENTS: usize = 50;

/// Severity tier of a surge, from an ordered threshold table over the
/// percentage jump.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "UPPERCASE")]
pub enum Severity {
    /// pct >= 1000.
    Nuclear,
    /// pct >= 500.
    Extreme,
    /// pct >= 300.
    Strong,
    /// Below all tier thresholds.
    Good,
}

/// Ordered severity thresholds, highest first.
const SEVERITY_TIERS: &[(f64, Severity)] = &[
    (1000.0, Severity::Nuclear),
    (500.0, Severity::Extreme),
    (300.0, Severity::Strong),
];

impl Severity {
    /// Classifies a percentage jump.
    pub fn classify(pct: f64) -> Self {
        SEVERITY_TIERS
            .iter()
            .find(|(threshold, _)| pct >= *threshold)
            .map(|(_, severity)| *severity)
            .unwrap_or(Severity::Good)
    }
}

/// Flow classification from traded lot count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum SurgeKind {
    /// Fewer than 5 lots traded: a lottery-ticket OTM punt.
    #[serde(rename = "OTM_BOMB")]
    OtmBomb,
    /// 5 lots or more: sized flow.
    #[serde(rename = "INSTITUTIONAL_BOMB")]
    InstitutionalBomb,
}

/// Cache key: one option contract.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SurgeKey {
    symbol: String,
    expiry: String,
    /// Bit pattern of the strike; strikes arrive verbatim from one upstream
    /// source, so identical strikes have identical bits.
    strike_bits: u64,
    side: Side,
}

impl SurgeKey {
    fn new(symbol: &str, expiry: &str, strike: f64, side: Side) -> Self {
        Self {
            symbol: symbol.to_string(),
            expiry: expiry.to_string(),
            strike_bits: strike.to_bits(),
            side,
        }
    }
}

/// Bounded FIFO of observed prices for one contract.
#[derive(Debug, Default)]
struct SurgeHistory {
    prices: VecDeque<f64>,
    last_update: Option<DateTime<Utc>>,
}

/// One detected premium surge.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SurgeEvent {
    /// Symbol.
    pub symbol: String,
    /// Expiry used for the scan.
    pub expiry: String,
    /// Strike, truncated to an integer as displayed.
    pub strike: i64,
    /// Contract side.
    pub side: Side,
    /// Previous observed price, rounded to 2 decimals.
    pub prev: f64,
    /// Current price, rounded to 2 decimals.
    pub curr: f64,
    /// Percentage jump, rounded to 1 decimal.
    pub pct: f64,
    /// 3-tick momentum, rounded to 1 decimal; 0 until 3 observations exist.
    pub speed: f64,
    /// Traded volume.
    pub volume: i64,
    /// Volume in lots, rounded to 2 decimals.
    pub lots: f64,
    /// Severity tier.
    pub strength: Severity,
    /// Flow classification.
    #[serde(rename = "type")]
    pub kind: SurgeKind,
    /// Wall-clock detection time (HH:MM:SS).
    pub timestamp: String,
}

/// Composite ranking score: base pct plus tier, momentum and flow bonuses.
pub fn score(event: &SurgeEvent) -> f64 {
    let mut score = event.pct;
    if event.strength == Severity::Nuclear {
        score += 5000.0;
    }
    if event.strength == Severity::Extreme {
        score += 2000.0;
    }
    if event.speed > event.pct * 1.5 {
        score += 1000.0;
    }
    if event.kind == SurgeKind::InstitutionalBomb {
        score += 500.0;
    }
    score
}

/// Sorts events by composite score descending and keeps the top 50.
pub fn rank(mut events: Vec<SurgeEvent>) -> Vec<SurgeEvent> {
    events.sort_by(|a, b| {
        score(b)
            .partial_cmp(&score(a))
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    events.truncate(MAX_EVENTS);
    events
}

/// Process-global surge detector.
#[derive(Default)]
pub struct SurgeDetector {
    history: DashMap<SurgeKey, SurgeHistory>,
}

impl SurgeDetector {
    /// Creates an empty detector.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of tracked contract keys (monotonically growing).
    #[must_use]
    pub fn key_count(&self) -> usize {
        self.history.len()
    }

    /// Observes one snapshot's rows for a symbol/expiry, appending events at
    /// or above `min_pct` to `out`. Every observed price is recorded in the
    /// history whether or not an event fires.
    pub fn observe_rows(
        &self,
        symbol: &str,
        expiry: &str,
        underlying: f64,
        rows: &[Row],
        min_pct: f64,
        out: &mut Vec<SurgeEvent>,
    ) {
        for row in rows {
            for side in [Side::CE, Side::PE] {
                if let Some(event) =
                    self.observe_leg(symbol, expiry, underlying, row, side, min_pct)
                {
                    out.push(event);
                }
            }
        }
    }

    /// Observes one contract leg. Returns an event when the jump qualifies
    /// and clears the threshold.
    fn observe_leg(
        &self,
        symbol: &str,
        expiry: &str,
        underlying: f64,
        row: &Row,
        side: Side,
        min_pct: f64,
    ) -> Option<SurgeEvent> {
        let price = row.tradeable_ltp(side)?;
        let qualifies = match side {
            Side::CE => row.strike > underlying + OTM_BUFFER,
            Side::PE => row.strike < underlying - OTM_BUFFER,
        };
        if !qualifies {
            return None;
        }

        let key = SurgeKey::new(symbol, expiry, row.strike, side);
        let mut entry = self.history.entry(key).or_default();

        let mut event = None;
        if let Some(&prev) = entry.prices.back()
            && prev > NOISE_FLOOR
        {
            let pct = (price - prev) / prev * 100.0;
            let speed = if entry.prices.len() >= 2 {
                // Oldest of the last three observations, counting the current
                // price as the third.
                let oldest = entry.prices[entry.prices.len() - 2];
                if oldest > 0.0 {
                    (price - oldest) / oldest * 100.0
                } else {
                    0.0
                }
            } else {
                0.0
            };

            if pct >= min_pct {
                let volume = row.volume(side).unwrap_or(0.0);
                let lots = volume / f64::from(reference::surge_lot_size(symbol));
                event = Some(SurgeEvent {
                    symbol: symbol.to_string(),
                    expiry: expiry.to_string(),
                    strike: row.strike as i64,
                    side,
                    prev: round2(prev),
                    curr: round2(price),
                    pct: round1(pct),
                    speed: round1(speed),
                    volume: volume as i64,
                    lots: round2(lots),
                    strength: Severity::classify(pct),
                    kind: if lots < 5.0 {
                        SurgeKind::OtmBomb
                    } else {
                        SurgeKind::InstitutionalBomb
                    },
                    timestamp: Local::now().format("%H:%M:%S").to_string(),
                });
            }
        }

        entry.prices.push_back(price);
        while entry.prices.len() > HISTORY_DEPTH {
            entry.prices.pop_front();
        }
        entry.last_update = Some(Utc::now());

        event
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
