//! WebSocket handler for realtime scan pushes.
//!
//! Each connected client may run one push loop at a time. A `start` command
//! replaces any running loop with a fresh one; `stop` halts it; disconnect
//! tears the session down.

use crate::chain::ScanSide;
use crate::config::ScanConfig;
use crate::models::{clean_symbols, ScanResult};
use crate::scanner;
use crate::session::SessionHandle;
use crate::state::AppState;
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::State;
use axum::response::IntoResponse;
use futures::{SinkExt, StreamExt};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, error, info};
use uuid::Uuid;

/// WebSocket message types sent to clients.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", content = "data")]
pub enum WsMessage {
    /// Connection established.
    #[serde(rename = "connected")]
    Connected {
        /// Welcome message.
        message: String,
        /// Client identifier for this connection.
        client_id: String,
    },
    /// Push loop started.
    #[serde(rename = "started")]
    Started {
        /// Push interval in seconds.
        interval: u64,
    },
    /// Push loop stopped.
    #[serde(rename = "stopped")]
    Stopped {
        /// Whether a loop was running.
        was_running: bool,
    },
    /// One scan's results.
    #[serde(rename = "update")]
    Update {
        /// Per-symbol scan results.
        results: Vec<ScanResult>,
        /// Scan completion time, RFC 3339 UTC.
        ts: String,
    },
    /// Heartbeat/ping.
    #[serde(rename = "heartbeat")]
    Heartbeat {
        /// Timestamp in milliseconds.
        timestamp: u64,
    },
}

/// Client command frame. Malformed values fall back to defaults rather than
/// erroring, so a sloppy client still gets a stream.
#[derive(Debug, Deserialize)]
struct ClientCommand {
    action: String,
    #[serde(default)]
    symbols: Vec<String>,
    #[serde(default)]
    threshold: Option<serde_json::Value>,
    #[serde(default)]
    side: Option<String>,
    #[serde(default)]
    interval: Option<serde_json::Value>,
    #[serde(default)]
    expiry_overrides: HashMap<String, String>,
}

/// Resolved parameters for one push loop.
#[derive(Debug, Clone)]
struct RealtimeParams {
    symbols: Vec<String>,
    threshold: f64,
    side: ScanSide,
    interval: Duration,
    expiry_overrides: HashMap<String, String>,
}

/// Pulls a float out of a JSON value that may be a number or numeric string.
fn coerce_f64(value: Option<&serde_json::Value>) -> Option<f64> {
    match value {
        Some(serde_json::Value::Number(n)) => n.as_f64(),
        Some(serde_json::Value::String(s)) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}

impl RealtimeParams {
    fn from_command(cmd: &ClientCommand, scan: &ScanConfig) -> Self {
        let threshold = coerce_f64(cmd.threshold.as_ref())
            .filter(|t| t.is_finite() && *t >= 0.0)
            .unwrap_or(scan.default_threshold);
        let side = cmd
            .side
            .as_deref()
            .and_then(|s| ScanSide::parse(&s.trim().to_uppercase()))
            .unwrap_or_default();
        let interval_secs = coerce_f64(cmd.interval.as_ref())
            .filter(|i| i.is_finite() && *i >= 1.0)
            .map(|i| i as u64)
            .unwrap_or(scan.default_interval_secs);
        Self {
            symbols: clean_symbols(&cmd.symbols),
            threshold,
            side,
            interval: Duration::from_secs(interval_secs),
            expiry_overrides: cmd.expiry_overrides.clone(),
        }
    }
}

/// WebSocket upgrade handler.
#[utoipa::path(
    get,
    path = "/ws",
    responses(
        (status = 101, description = "WebSocket connection established")
    ),
    tag = "WebSocket"
)]
pub async fn ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

/// Handle an individual WebSocket connection.
async fn handle_socket(socket: WebSocket, state: Arc<AppState>) {
    let client_id = Uuid::new_v4();
    let (mut sender, mut receiver) = socket.split();

    // Outbound frames funnel through one channel so push loops and command
    // acknowledgements share the socket safely.
    let (tx, mut rx) = mpsc::channel::<WsMessage>(16);

    // Send connection confirmation
    let connected_msg = WsMessage::Connected {
        message: "Connected to option signal stream".to_string(),
        client_id: client_id.to_string(),
    };
    if let Ok(json) = serde_json::to_string(&connected_msg) {
        let _ = sender.send(Message::Text(json.into())).await;
    }

    info!(client = %client_id, "WebSocket client connected");

    // Forward queued frames and periodic heartbeats to the client
    let send_task = tokio::spawn(async move {
        loop {
            tokio::select! {
                msg = rx.recv() => {
                    match msg {
                        Some(msg) => {
                            if let Ok(json) = serde_json::to_string(&msg)
                                && sender.send(Message::Text(json.into())).await.is_err() {
                                    break;
                                }
                        }
                        None => break,
                    }
                }
                _ = tokio::time::sleep(Duration::from_secs(30)) => {
                    let heartbeat = WsMessage::Heartbeat {
                        timestamp: chrono::Utc::now().timestamp_millis() as u64,
                    };
                    if let Ok(json) = serde_json::to_string(&heartbeat)
                        && sender.send(Message::Text(json.into())).await.is_err() {
                            break;
                        }
                }
            }
        }
    });

    // Handle incoming command frames
    let recv_state = Arc::clone(&state);
    let recv_tx = tx.clone();
    let recv_task = tokio::spawn(async move {
        while let Some(msg) = receiver.next().await {
            match msg {
                Ok(Message::Text(text)) => {
                    debug!(client = %client_id, "Received WebSocket message: {}", text);
                    handle_client_message(&text, &recv_state, client_id, &recv_tx).await;
                }
                Ok(Message::Ping(_data)) => {
                    debug!("Received ping");
                    // Pong is handled automatically by axum
                }
                Ok(Message::Close(_)) => {
                    info!(client = %client_id, "WebSocket client disconnected");
                    break;
                }
                Err(e) => {
                    error!(client = %client_id, "WebSocket error: {}", e);
                    break;
                }
                _ => {}
            }
        }
    });

    // Wait for either task to complete
    tokio::select! {
        _ = recv_task => {}
        _ = send_task => {}
    }

    // Any push loop the client still owns stops at its next check.
    state.sessions.remove(&client_id);
    info!(client = %client_id, "WebSocket connection closed");
}

/// Handle incoming client commands.
async fn handle_client_message(
    text: &str,
    state: &Arc<AppState>,
    client_id: Uuid,
    tx: &mpsc::Sender<WsMessage>,
) {
    let Ok(cmd) = serde_json::from_str::<ClientCommand>(text) else {
        debug!(client = %client_id, "Ignoring malformed WebSocket frame");
        return;
    };

    match cmd.action.as_str() {
        "start" => {
            let params = RealtimeParams::from_command(&cmd, &state.config.scan);
            // begin() stops any loop the client already had.
            let handle = state.sessions.begin(client_id);
            let _ = tx
                .send(WsMessage::Started {
                    interval: params.interval.as_secs(),
                })
                .await;
            tokio::spawn(run_push_loop(
                Arc::clone(state),
                handle,
                params,
                tx.clone(),
            ));
        }
        "stop" => {
            let was_running = state.sessions.stop(&client_id);
            let _ = tx.send(WsMessage::Stopped { was_running }).await;
        }
        _ => {
            debug!(client = %client_id, "Unknown command: {}", cmd.action);
        }
    }
}

/// Scan-and-push loop for one realtime session.
async fn run_push_loop(
    state: Arc<AppState>,
    handle: SessionHandle,
    params: RealtimeParams,
    tx: mpsc::Sender<WsMessage>,
) {
    let interval = params.interval;
    push_updates(handle, interval, tx, move || {
        let state = Arc::clone(&state);
        let params = params.clone();
        async move {
            scanner::scan_symbols(
                &state.upstream,
                &state.config.scan,
                &params.symbols,
                params.threshold,
                params.side,
                &params.expiry_overrides,
            )
            .await
        }
    })
    .await;
    debug!("Push loop ended");
}

/// Drives one session's scan/publish cycle until its handle stops or the
/// client channel closes.
async fn push_updates<F, Fut>(
    handle: SessionHandle,
    interval: Duration,
    tx: mpsc::Sender<WsMessage>,
    mut scan: F,
) where
    F: FnMut() -> Fut,
    Fut: std::future::Future<Output = Vec<ScanResult>>,
{
    while handle.is_running() {
        let results = scan().await;

        // A stop that landed while the scan was in flight must not publish.
        if !handle.is_running() {
            break;
        }
        let update = WsMessage::Update {
            results,
            ts: chrono::Utc::now().to_rfc3339(),
        };
        if tx.send(update).await.is_err() {
            break;
        }

        tokio::time::sleep(interval).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::SessionRegistry;

    fn command(json: serde_json::Value) -> ClientCommand {
        serde_json::from_value(json).expect("should parse")
    }

    #[test]
    fn test_params_from_full_command() {
        let cmd = command(serde_json::json!({
            "action": "start",
            "symbols": ["nifty", " sbin "],
            "threshold": 7.5,
            "side": "ce",
            "interval": 20,
            "expiry_overrides": {"NIFTY": "30-Sep-2025"}
        }));
        let params = RealtimeParams::from_command(&cmd, &ScanConfig::default());
        assert_eq!(params.symbols, vec!["NIFTY", "SBIN"]);
        assert_eq!(params.threshold, 7.5);
        assert_eq!(params.side, ScanSide::CE);
        assert_eq!(params.interval, Duration::from_secs(20));
        assert_eq!(
            params.expiry_overrides.get("NIFTY").map(String::as_str),
            Some("30-Sep-2025")
        );
    }

    #[test]
    fn test_invalid_values_fall_back_to_defaults() {
        let cmd = command(serde_json::json!({
            "action": "start",
            "threshold": "not-a-number",
            "side": "CALLS",
            "interval": 0
        }));
        let scan = ScanConfig::default();
        let params = RealtimeParams::from_command(&cmd, &scan);
        assert_eq!(params.threshold, scan.default_threshold);
        assert_eq!(params.side, ScanSide::All);
        assert_eq!(params.interval, Duration::from_secs(scan.default_interval_secs));
    }

    #[test]
    fn test_numeric_strings_coerce() {
        let cmd = command(serde_json::json!({
            "action": "start",
            "threshold": "6.5",
            "interval": "30"
        }));
        let params = RealtimeParams::from_command(&cmd, &ScanConfig::default());
        assert_eq!(params.threshold, 6.5);
        assert_eq!(params.interval, Duration::from_secs(30));
    }

    #[test]
    fn test_ws_message_wire_shape() {
        let msg = WsMessage::Update {
            results: Vec::new(),
            ts: "2025-09-30T10:00:00Z".to_string(),
        };
        let value = serde_json::to_value(&msg).expect("should serialize");
        assert_eq!(value["type"], "update");
        assert_eq!(value["data"]["ts"], "2025-09-30T10:00:00Z");
        assert!(value["data"]["results"].as_array().expect("array").is_empty());

        let msg = WsMessage::Stopped { was_running: true };
        let value = serde_json::to_value(&msg).expect("should serialize");
        assert_eq!(value["type"], "stopped");
        assert_eq!(value["data"]["was_running"], true);
    }

    #[tokio::test]
    async fn test_stop_during_scan_suppresses_publish() {
        let registry = SessionRegistry::new();
        let handle = registry.begin(Uuid::new_v4());
        let (tx, mut rx) = mpsc::channel(16);

        // The stop lands while the first scan is still in flight; the loop
        // must wind down without publishing the stale results.
        let scan_handle = handle.clone();
        push_updates(handle, Duration::from_secs(1), tx, move || {
            let handle = scan_handle.clone();
            async move {
                handle.stop();
                Vec::new()
            }
        })
        .await;

        assert!(rx.recv().await.is_none());
    }

    #[tokio::test]
    async fn test_loop_publishes_until_stopped() {
        let registry = SessionRegistry::new();
        let handle = registry.begin(Uuid::new_v4());
        let (tx, mut rx) = mpsc::channel(16);

        let scan_handle = handle.clone();
        let mut calls = 0;
        push_updates(handle, Duration::from_millis(1), tx, move || {
            calls += 1;
            let handle = scan_handle.clone();
            let stop_now = calls >= 2;
            async move {
                if stop_now {
                    handle.stop();
                }
                Vec::new()
            }
        })
        .await;

        // One update from the first scan; the second scan's stop suppressed
        // its own publish.
        assert!(matches!(rx.recv().await, Some(WsMessage::Update { .. })));
        assert!(rx.recv().await.is_none());
    }
}
