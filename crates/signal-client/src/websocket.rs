//! WebSocket client for realtime scan pushes.

use crate::error::Error;
use crate::types::ScanResult;
use futures_util::{SinkExt, StreamExt};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tokio::sync::mpsc;
use tokio_tungstenite::{connect_async, tungstenite::Message};

/// WebSocket message types received from the server.
#[derive(Debug, Clone, Serialize, Deserialize)]
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

/// Commands that can be sent to the server.
#[derive(Debug, Clone, Serialize)]
pub struct ClientCommand {
    /// Action to perform.
    pub action: String,
    /// Symbols to scan.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub symbols: Vec<String>,
    /// IV breakout threshold.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub threshold: Option<f64>,
    /// Side selection token: ALL, CE or PE.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub side: Option<String>,
    /// Push interval in seconds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interval: Option<u64>,
    /// Per-symbol expiry overrides.
    #[serde(skip_serializing_if = "HashMap::is_empty")]
    pub expiry_overrides: HashMap<String, String>,
}

impl ClientCommand {
    /// Creates a start command with default scan parameters.
    #[must_use]
    pub fn start(symbols: Vec<String>) -> Self {
        Self {
            action: "start".to_string(),
            symbols,
            threshold: None,
            side: None,
            interval: None,
            expiry_overrides: HashMap::new(),
        }
    }

    /// Creates a stop command.
    #[must_use]
    pub fn stop() -> Self {
        Self {
            action: "stop".to_string(),
            symbols: Vec::new(),
            threshold: None,
            side: None,
            interval: None,
            expiry_overrides: HashMap::new(),
        }
    }

    /// Sets the breakout threshold.
    #[must_use]
    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = Some(threshold);
        self
    }

    /// Sets the side selection.
    #[must_use]
    pub fn with_side(mut self, side: &str) -> Self {
        self.side = Some(side.to_string());
        self
    }

    /// Sets the push interval in seconds.
    #[must_use]
    pub fn with_interval(mut self, interval: u64) -> Self {
        self.interval = Some(interval);
        self
    }
}

/// WebSocket client for receiving realtime scan pushes.
pub struct WsClient {
    rx: mpsc::Receiver<WsMessage>,
    tx: mpsc::Sender<ClientCommand>,
}

impl WsClient {
    /// Connects to the WebSocket server.
    ///
    /// # Arguments
    /// * `url` - WebSocket URL (e.g., "ws://localhost:8000/ws")
    ///
    /// # Errors
    /// Returns error if connection fails.
    pub async fn connect(url: &str) -> Result<Self, Error> {
        let (ws_stream, _) = connect_async(url).await.map_err(Box::new)?;
        let (mut write, mut read) = ws_stream.split();

        // Channel for receiving messages
        let (msg_tx, msg_rx) = mpsc::channel::<WsMessage>(100);

        // Channel for sending commands
        let (cmd_tx, mut cmd_rx) = mpsc::channel::<ClientCommand>(100);

        // Spawn task to read messages
        tokio::spawn(async move {
            while let Some(msg) = read.next().await {
                match msg {
                    Ok(Message::Text(text)) => {
                        if let Ok(ws_msg) = serde_json::from_str::<WsMessage>(&text)
                            && msg_tx.send(ws_msg).await.is_err()
                        {
                            break;
                        }
                    }
                    Ok(Message::Close(_)) => break,
                    Err(_) => break,
                    _ => {}
                }
            }
        });

        // Spawn task to send commands
        tokio::spawn(async move {
            while let Some(cmd) = cmd_rx.recv().await {
                if let Ok(json) = serde_json::to_string(&cmd)
                    && write.send(Message::Text(json.into())).await.is_err()
                {
                    break;
                }
            }
        });

        Ok(Self {
            rx: msg_rx,
            tx: cmd_tx,
        })
    }

    /// Receives the next message from the server.
    ///
    /// Returns `None` if the connection is closed.
    pub async fn recv(&mut self) -> Option<WsMessage> {
        self.rx.recv().await
    }

    /// Sends a command to the server.
    ///
    /// # Errors
    /// Returns error if the send fails.
    pub async fn send(&self, cmd: ClientCommand) -> Result<(), Error> {
        self.tx.send(cmd).await.map_err(|_| Error::ConnectionClosed)
    }

    /// Starts a realtime scan loop.
    ///
    /// # Errors
    /// Returns error if the send fails.
    pub async fn start(&self, symbols: Vec<String>) -> Result<(), Error> {
        self.send(ClientCommand::start(symbols)).await
    }

    /// Stops the running scan loop.
    ///
    /// # Errors
    /// Returns error if the send fails.
    pub async fn stop(&self) -> Result<(), Error> {
        self.send(ClientCommand::stop()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_start_command_serialization() {
        let cmd = ClientCommand::start(vec!["NIFTY".to_string()])
            .with_threshold(6.0)
            .with_side("CE")
            .with_interval(20);

        let value = serde_json::to_value(&cmd).unwrap();
        assert_eq!(value["action"], "start");
        assert_eq!(value["symbols"][0], "NIFTY");
        assert_eq!(value["threshold"], 6.0);
        assert_eq!(value["side"], "CE");
        assert_eq!(value["interval"], 20);
    }

    #[test]
    fn test_stop_command_skips_scan_fields() {
        let cmd = ClientCommand::stop();

        let value = serde_json::to_value(&cmd).unwrap();
        assert_eq!(value["action"], "stop");
        assert!(value.get("symbols").is_none());
        assert!(value.get("threshold").is_none());
    }

    #[test]
    fn test_update_message_deserialization() {
        let json = r#"{"type": "update", "data": {"results": [], "ts": "2025-09-30T10:00:00Z"}}"#;
        let msg: WsMessage = serde_json::from_str(json).unwrap();
        match msg {
            WsMessage::Update { results, ts } => {
                assert!(results.is_empty());
                assert_eq!(ts, "2025-09-30T10:00:00Z");
            }
            other => panic!("unexpected message: {:?}", other),
        }
    }
}
