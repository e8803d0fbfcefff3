//! Scan endpoint tests.
//!
//! These exercise the live upstream through a running server, so results
//! depend on market hours; assertions stick to structural invariants.

use signal_client::{BreakoutScanRequest, SpreadScanRequest, SurgeScanRequest};
use signal_tests::create_test_client;

#[tokio::test]
#[ignore = "requires a running server"]
async fn test_option_chain_default_symbol() {
    let client = create_test_client().expect("Failed to create client");

    let chain = client
        .get_option_chain(None, None)
        .await
        .expect("Failed to fetch chain");

    assert_eq!(chain.symbol, "SBIN");
    // Rows must be sorted ascending by strike.
    for pair in chain.rows.windows(2) {
        assert!(pair[0].strike <= pair[1].strike);
    }
    // Expiry used must come from the reported expiry list when present.
    if let Some(used) = &chain.expiry_used {
        assert!(chain.expiries.contains(used));
    }
}

#[tokio::test]
#[ignore = "requires a running server"]
async fn test_breakout_scan_structure() {
    let client = create_test_client().expect("Failed to create client");

    let response = client
        .breakout_scan(&BreakoutScanRequest {
            symbols: vec!["NIFTY".to_string(), "BANKNIFTY".to_string()],
            threshold: Some(5.0),
            side: Some("ALL".to_string()),
            ..Default::default()
        })
        .await
        .expect("Scan failed");

    for result in &response.data {
        assert!(result.underlying > 0.0);
        assert_eq!(result.summary.ce_hit_count, result.ce_hits.len());
        assert_eq!(result.summary.pe_hit_count, result.pe_hits.len());
        // Hits ordered by increment descending.
        for pair in result.ce_hits.windows(2) {
            assert!(pair[0].inc >= pair[1].inc);
        }
        for hit in &result.ce_hits {
            assert!(hit.inc >= 5.0);
            assert!(hit.strike >= result.underlying);
        }
        for hit in &result.pe_hits {
            assert!(hit.strike <= result.underlying);
        }
    }
}

#[tokio::test]
#[ignore = "requires a running server"]
async fn test_breakout_scan_rejects_empty_symbols() {
    let client = create_test_client().expect("Failed to create client");

    let err = client
        .breakout_scan(&BreakoutScanRequest::default())
        .await
        .expect_err("Empty symbol list should be rejected");

    match err {
        signal_client::Error::Api { status, .. } => assert_eq!(status, 400),
        other => panic!("unexpected error: {:?}", other),
    }
}

#[tokio::test]
#[ignore = "requires a running server"]
async fn test_breakout_scan_rejects_negative_threshold() {
    let client = create_test_client().expect("Failed to create client");

    let err = client
        .breakout_scan(&BreakoutScanRequest {
            symbols: vec!["NIFTY".to_string()],
            threshold: Some(-1.0),
            ..Default::default()
        })
        .await
        .expect_err("Negative threshold should be rejected");

    match err {
        signal_client::Error::Api { status, .. } => assert_eq!(status, 400),
        other => panic!("unexpected error: {:?}", other),
    }
}

#[tokio::test]
#[ignore = "requires a running server"]
async fn test_spread_scan_structure() {
    let client = create_test_client().expect("Failed to create client");

    let response = client
        .strategy_ltp_scan(&SpreadScanRequest {
            symbols: vec!["NIFTY".to_string()],
            target_diff: Some(6.0),
            tolerance: Some(1.0),
            ..Default::default()
        })
        .await
        .expect("Spread scan failed");

    for entry in &response.data {
        assert!(!entry.matches.is_empty());
        for m in &entry.matches {
            assert_eq!(m.buy_side, m.sell_side);
            let net = m.net_per_lot.abs();
            assert!(net >= 5.0 && net <= 7.0);
        }
    }
}

#[tokio::test]
#[ignore = "requires a running server"]
async fn test_premium_surge_structure() {
    let client = create_test_client().expect("Failed to create client");

    let response = client
        .premium_surge(&SurgeScanRequest {
            symbols: vec!["NIFTY".to_string()],
            min_pct: Some(200.0),
            ..Default::default()
        })
        .await
        .expect("Surge scan failed");

    // First observation never yields events; bound still holds.
    assert!(response.data.len() <= 50);
    for event in &response.data {
        assert!(event.pct >= 200.0);
        assert!(event.curr > event.prev);
    }
}
