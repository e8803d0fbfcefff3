//! API request handlers.

use crate::chain::ScanSide;
use crate::error::ApiError;
use crate::models::{
    clean_symbols, BreakoutScanRequest, BreakoutScanResponse, ChainQuery, ChainResponse,
    HealthResponse, SpreadScanRequest, SpreadScanResponse, SuggestedResponse, SurgeScanRequest,
    SurgeScanResponse, SymbolSpreadMatches,
};
use crate::state::AppState;
use crate::{reference, scanner, signal, spread, surge};
use axum::extract::{Query, State};
use axum::Json;
use std::sync::Arc;
use tracing::warn;

/// Symbol cap for the spread scan.
const MAX_SPREAD_SYMBOLS: usize = 210;
/// Symbol cap for the surge scan.
const MAX_SURGE_SYMBOLS: usize = 200;
/// Floor for the surge threshold when the request omits it.
const DEFAULT_SURGE_MIN_PCT: f64 = 200.0;

/// Default symbol set for the spread scan.
const DEFAULT_SPREAD_SYMBOLS: &[&str] = &["NIFTY", "BANKNIFTY", "RELIANCE", "TCS"];

/// Parses the optional side token, defaulting to both sides.
fn parse_side(token: Option<&str>) -> Result<ScanSide, ApiError> {
    match token {
        None => Ok(ScanSide::All),
        Some(raw) => ScanSide::parse(&raw.trim().to_uppercase()).ok_or_else(|| {
            ApiError::InvalidRequest(format!("Invalid side: {}. Use ALL, CE or PE", raw))
        }),
    }
}

// ============================================================================
// Health Check
// ============================================================================

/// Health check endpoint.
#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse)
    ),
    tag = "Health"
)]
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

// ============================================================================
// Option Chain
// ============================================================================

/// Fetches one symbol's option chain, filtered to a single expiry.
#[utoipa::path(
    get,
    path = "/api/oc",
    params(
        ("symbol" = Option<String>, Query, description = "Symbol to fetch, defaults to SBIN"),
        ("expiry" = Option<String>, Query, description = "Expiry override, defaults to the nearest expiry")
    ),
    responses(
        (status = 200, description = "Option chain snapshot", body = ChainResponse),
        (status = 502, description = "Upstream source unavailable")
    ),
    tag = "Chain"
)]
pub async fn get_option_chain(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ChainQuery>,
) -> Result<Json<ChainResponse>, ApiError> {
    let symbol = query
        .symbol
        .as_deref()
        .map(|s| s.trim().to_uppercase())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| "SBIN".to_string());

    let chain =
        scanner::fetch_symbol_chain(&state.upstream, &symbol, query.expiry.as_deref()).await?;

    Ok(Json(ChainResponse {
        symbol,
        expiries: chain.expiries,
        expiry_used: chain.expiry_used,
        underlying: chain.snapshot.underlying,
        rows: chain.snapshot.rows,
    }))
}

// ============================================================================
// Breakout Scan
// ============================================================================

/// Runs the IV breakout scan over a batch of symbols.
#[utoipa::path(
    post,
    path = "/api/breakout_scan",
    request_body = BreakoutScanRequest,
    responses(
        (status = 200, description = "Per-symbol scan results", body = BreakoutScanResponse),
        (status = 400, description = "Invalid request parameters")
    ),
    tag = "Scans"
)]
pub async fn breakout_scan(
    State(state): State<Arc<AppState>>,
    Json(request): Json<BreakoutScanRequest>,
) -> Result<Json<BreakoutScanResponse>, ApiError> {
    let symbols = clean_symbols(&request.symbols);
    if symbols.is_empty() {
        return Err(ApiError::InvalidRequest("symbols required".to_string()));
    }

    let threshold = request
        .threshold
        .unwrap_or(state.config.scan.default_threshold);
    if !threshold.is_finite() || threshold < 0.0 {
        return Err(ApiError::InvalidRequest(
            "threshold must be a number >= 0".to_string(),
        ));
    }
    let side = parse_side(request.side.as_deref())?;

    let data = scanner::scan_symbols(
        &state.upstream,
        &state.config.scan,
        &symbols,
        threshold,
        side,
        &request.expiry_overrides,
    )
    .await;

    Ok(Json(BreakoutScanResponse {
        data,
        ts: chrono::Utc::now().to_rfc3339(),
    }))
}

// ============================================================================
// Spread Scan
// ============================================================================

/// Scans for strike pairs whose lot-weighted net premium lands in the target
/// band, alongside ATM straddle pricing per symbol.
#[utoipa::path(
    post,
    path = "/api/strategy_ltp_scan",
    request_body = SpreadScanRequest,
    responses(
        (status = 200, description = "Per-symbol spread matches", body = SpreadScanResponse),
        (status = 400, description = "Invalid request parameters")
    ),
    tag = "Scans"
)]
pub async fn strategy_ltp_scan(
    State(state): State<Arc<AppState>>,
    Json(request): Json<SpreadScanRequest>,
) -> Result<Json<SpreadScanResponse>, ApiError> {
    let mut symbols = clean_symbols(&request.symbols);
    if symbols.is_empty() {
        symbols = DEFAULT_SPREAD_SYMBOLS
            .iter()
            .map(|s| s.to_string())
            .collect();
    }
    symbols.truncate(MAX_SPREAD_SYMBOLS);

    let defaults = spread::SpreadParams::default();
    let params = spread::SpreadParams {
        buy_lots: request.buy_lots.unwrap_or(defaults.buy_lots),
        sell_lots: request.sell_lots.unwrap_or(defaults.sell_lots),
        target_diff: request.target_diff.unwrap_or(defaults.target_diff),
        tolerance: request.tolerance.unwrap_or(defaults.tolerance),
        side: parse_side(request.side.as_deref())?,
        atm_from_pct: request.atm_from_pct.unwrap_or(defaults.atm_from_pct),
        atm_to_pct: request.atm_to_pct.unwrap_or(defaults.atm_to_pct),
        min_strike_diff: request.min_strike_diff.unwrap_or(defaults.min_strike_diff),
        max_strike_diff: request.max_strike_diff.unwrap_or(defaults.max_strike_diff),
    };
    if params.buy_lots < 1 || params.sell_lots < 1 {
        return Err(ApiError::InvalidRequest(
            "buy_lots and sell_lots must be at least 1".to_string(),
        ));
    }
    if params.tolerance < 0.0 || params.target_diff < 0.0 {
        return Err(ApiError::InvalidRequest(
            "target_diff and tolerance must be >= 0".to_string(),
        ));
    }

    let mut data = Vec::new();
    for symbol in &symbols {
        let chain = match scanner::fetch_symbol_chain(
            &state.upstream,
            symbol,
            request.expiry_overrides.get(symbol).map(String::as_str),
        )
        .await
        {
            Ok(chain) => chain,
            Err(err) => {
                warn!(symbol = %symbol, error = %err, "Spread scan skipping symbol");
                continue;
            }
        };
        let Some(underlying) = chain.snapshot.underlying else {
            continue;
        };

        let matches = spread::find_spread_matches(
            symbol,
            &chain.snapshot.rows,
            underlying,
            chain.expiry_used.as_deref(),
            &params,
        );
        if matches.is_empty() {
            continue;
        }

        data.push(SymbolSpreadMatches {
            symbol: symbol.clone(),
            underlying: signal::round2(underlying),
            expiry_used: chain.expiry_used.clone(),
            straddle: signal::straddle_info(&chain.snapshot.rows, underlying),
            matches,
        });
    }

    Ok(Json(SpreadScanResponse { data }))
}

// ============================================================================
// Premium Surge
// ============================================================================

/// Detects sudden OTM premium jumps against the in-memory price history.
#[utoipa::path(
    post,
    path = "/api/premium_surge",
    request_body = SurgeScanRequest,
    responses(
        (status = 200, description = "Ranked surge events", body = SurgeScanResponse),
        (status = 400, description = "Invalid request parameters")
    ),
    tag = "Scans"
)]
pub async fn premium_surge(
    State(state): State<Arc<AppState>>,
    Json(request): Json<SurgeScanRequest>,
) -> Result<Json<SurgeScanResponse>, ApiError> {
    let mut symbols = clean_symbols(&request.symbols);
    symbols.truncate(MAX_SURGE_SYMBOLS);

    let min_pct = request.min_pct.unwrap_or(DEFAULT_SURGE_MIN_PCT);
    if !min_pct.is_finite() || min_pct < 0.0 {
        return Err(ApiError::InvalidRequest(
            "min_pct must be a number >= 0".to_string(),
        ));
    }

    let mut events = Vec::new();
    for symbol in &symbols {
        let chain = match scanner::fetch_symbol_chain(
            &state.upstream,
            symbol,
            request.expiry_overrides.get(symbol).map(String::as_str),
        )
        .await
        {
            Ok(chain) => chain,
            Err(err) => {
                warn!(symbol = %symbol, error = %err, "Surge scan skipping symbol");
                continue;
            }
        };
        let (Some(underlying), Some(expiry)) =
            (chain.snapshot.underlying, chain.expiry_used.as_deref())
        else {
            continue;
        };

        state.surge.observe_rows(
            symbol,
            expiry,
            underlying,
            &chain.snapshot.rows,
            min_pct,
            &mut events,
        );
    }

    Ok(Json(SurgeScanResponse {
        data: surge::rank(events),
    }))
}

// ============================================================================
// Suggested Symbols
// ============================================================================

/// Lists the suggested F&O symbol universe.
#[utoipa::path(
    get,
    path = "/api/suggested",
    responses(
        (status = 200, description = "Suggested symbols", body = SuggestedResponse)
    ),
    tag = "Reference"
)]
pub async fn suggested_symbols() -> Json<SuggestedResponse> {
    Json(SuggestedResponse {
        symbols: reference::suggested_symbols()
            .iter()
            .map(|s| s.to_string())
            .collect(),
    })
}
