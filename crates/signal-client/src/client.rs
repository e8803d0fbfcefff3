//! HTTP client for the Option Signal API.

use crate::error::Error;
use crate::types::*;
use reqwest::Client;
use std::time::Duration;

#[cfg(test)]
mod tests;

/// Client configuration.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the API (e.g., "http://localhost:8000").
    pub base_url: String,
    /// Request timeout.
    pub timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".to_string(),
            timeout: Duration::from_secs(30),
        }
    }
}

/// HTTP client for the Option Signal API.
#[derive(Debug, Clone)]
pub struct SignalClient {
    client: Client,
    base_url: String,
}

impl SignalClient {
    /// Creates a new client with the given configuration.
    ///
    /// # Errors
    /// Returns error if the HTTP client cannot be built.
    pub fn new(config: ClientConfig) -> Result<Self, Error> {
        let client = Client::builder().timeout(config.timeout).build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Creates a new client with default configuration.
    ///
    /// # Errors
    /// Returns error if the HTTP client cannot be built.
    pub fn with_base_url(base_url: &str) -> Result<Self, Error> {
        Self::new(ClientConfig {
            base_url: base_url.to_string(),
            ..Default::default()
        })
    }

    // ========================================================================
    // Health
    // ========================================================================

    /// Performs a health check.
    ///
    /// # Errors
    /// Returns error if the request fails.
    pub async fn health_check(&self) -> Result<HealthResponse, Error> {
        let url = format!("{}/health", self.base_url);
        let resp = self.client.get(&url).send().await?;
        self.handle_response(resp).await
    }

    // ========================================================================
    // Option Chain
    // ========================================================================

    /// Fetches one symbol's option chain.
    ///
    /// # Errors
    /// Returns error if the request fails.
    pub async fn get_option_chain(
        &self,
        symbol: Option<&str>,
        expiry: Option<&str>,
    ) -> Result<ChainResponse, Error> {
        let url = format!("{}/api/oc", self.base_url);
        let mut query: Vec<(&str, &str)> = Vec::new();
        if let Some(symbol) = symbol {
            query.push(("symbol", symbol));
        }
        if let Some(expiry) = expiry {
            query.push(("expiry", expiry));
        }
        let resp = self.client.get(&url).query(&query).send().await?;
        self.handle_response(resp).await
    }

    // ========================================================================
    // Scans
    // ========================================================================

    /// Runs an IV breakout scan.
    ///
    /// # Errors
    /// Returns error if the request fails.
    pub async fn breakout_scan(
        &self,
        request: &BreakoutScanRequest,
    ) -> Result<BreakoutScanResponse, Error> {
        let url = format!("{}/api/breakout_scan", self.base_url);
        let resp = self.client.post(&url).json(request).send().await?;
        self.handle_response(resp).await
    }

    /// Runs a spread scan.
    ///
    /// # Errors
    /// Returns error if the request fails.
    pub async fn strategy_ltp_scan(
        &self,
        request: &SpreadScanRequest,
    ) -> Result<SpreadScanResponse, Error> {
        let url = format!("{}/api/strategy_ltp_scan", self.base_url);
        let resp = self.client.post(&url).json(request).send().await?;
        self.handle_response(resp).await
    }

    /// Runs a premium surge scan.
    ///
    /// # Errors
    /// Returns error if the request fails.
    pub async fn premium_surge(
        &self,
        request: &SurgeScanRequest,
    ) -> Result<SurgeScanResponse, Error> {
        let url = format!("{}/api/premium_surge", self.base_url);
        let resp = self.client.post(&url).json(request).send().await?;
        self.handle_response(resp).await
    }

    // ========================================================================
    // Suggested Symbols
    // ========================================================================

    /// Lists the suggested F&O symbol universe.
    ///
    /// # Errors
    /// Returns error if the request fails.
    pub async fn suggested_symbols(&self) -> Result<SuggestedResponse, Error> {
        let url = format!("{}/api/suggested", self.base_url);
        let resp = self.client.get(&url).send().await?;
        self.handle_response(resp).await
    }

    // ========================================================================
    // WebSocket
    // ========================================================================

    /// Returns the WebSocket URL for this client.
    #[must_use]
    pub fn ws_url(&self) -> String {
        let ws_base = self
            .base_url
            .replace("http://", "ws://")
            .replace("https://", "wss://");
        format!("{}/ws", ws_base)
    }

    // ========================================================================
    // Internal Helpers
    // ========================================================================

    async fn handle_response<T: serde::de::DeserializeOwned>(
        &self,
        resp: reqwest::Response,
    ) -> Result<T, Error> {
        let status = resp.status();

        if status.is_success() {
            Ok(resp.json().await?)
        } else {
            let text = resp.text().await.unwrap_or_default();
            Err(Error::Api {
                status: status.as_u16(),
                message: text,
            })
        }
    }
}
