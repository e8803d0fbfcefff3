//! HTTP client library for the Option Signal API.
//!
//! This crate provides a typed HTTP client for interacting with the option
//! signal backend. It covers all REST endpoints and the realtime WebSocket
//! stream.
//!
//! # Example
//!
//! ```no_run
//! use signal_client::{SignalClient, ClientConfig};
//! use std::time::Duration;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), signal_client::Error> {
//!     let client = SignalClient::new(ClientConfig {
//!         base_url: "http://localhost:8000".into(),
//!         timeout: Duration::from_secs(30),
//!     })?;
//!
//!     // Check health
//!     let health = client.health_check().await?;
//!     println!("Status: {}", health.status);
//!
//!     Ok(())
//! }
//! ```

mod client;
mod error;
mod types;
mod websocket;

pub use client::{ClientConfig, SignalClient};
pub use error::Error;
pub use types::*;
pub use websocket::{ClientCommand, WsClient, WsMessage};
