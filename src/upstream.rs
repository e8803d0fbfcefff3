//! Resilient HTTP acquisition of raw option chains.
//!
//! The upstream source requires browser-like headers and a cookie-backed
//! session established by a warm-up navigation sequence (`prime`). Blocked or
//! failed attempts re-prime the session and retry under a [`RetryPolicy`];
//! exhausting the policy yields [`FetchError::Exhausted`], which callers treat
//! as skip-this-symbol, never batch abort.

use crate::chain::RawOptionChain;
use crate::config::UpstreamConfig;
use crate::reference;
use reqwest::Client;
use reqwest::header::{HeaderMap, HeaderValue};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};

/// Fetch error types.
#[derive(Debug, Error)]
pub enum FetchError {
    /// HTTP client could not be constructed.
    #[error("failed to build HTTP client: {0}")]
    Build(#[source] reqwest::Error),

    /// Response body was not a valid chain document.
    #[error("failed to decode chain response for {symbol}: {message}")]
    Decode {
        /// Symbol being fetched.
        symbol: String,
        /// Decoder error message.
        message: String,
    },

    /// All attempts failed.
    #[error("chain fetch exhausted after {attempts} attempts for {symbol}")]
    Exhausted {
        /// Symbol being fetched.
        symbol: String,
        /// Number of attempts made.
        attempts: u32,
    },
}

/// Why a single fetch attempt failed. Determines whether the session is
/// re-primed before the next attempt.
#[derive(Debug)]
enum AttemptFailure {
    /// Auth/block status (401/403): the session cookie state is stale.
    Blocked(u16),
    /// Any other non-success status.
    Status(u16),
    /// Network-level failure.
    Transport(String),
}

impl AttemptFailure {
    /// Blocked responses and transport failures invalidate the session;
    /// other bad statuses are retried without re-priming.
    fn triggers_reprime(&self) -> bool {
        matches!(self, AttemptFailure::Blocked(_) | AttemptFailure::Transport(_))
    }
}

/// Retry behavior expressed as data.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    /// Maximum attempts per fetch.
    pub max_attempts: u32,
    /// Fixed delay between attempts.
    pub retry_delay: Duration,
}

impl From<&UpstreamConfig> for RetryPolicy {
    fn from(config: &UpstreamConfig) -> Self {
        Self {
            max_attempts: config.max_attempts,
            retry_delay: Duration::from_millis(config.retry_delay_ms),
        }
    }
}

/// HTTP client for the upstream option-chain source.
pub struct UpstreamClient {
    client: Client,
    base_url: String,
    policy: RetryPolicy,
    prime_timeout: Duration,
}

impl UpstreamClient {
    /// Creates a new upstream client from configuration.
    ///
    /// The cookie store is what makes `prime` effective: the warm-up requests
    /// collect the session cookies the chain endpoints require.
    ///
    /// # Errors
    /// Returns [`FetchError::Build`] if the HTTP client cannot be built.
    pub fn new(config: &UpstreamConfig) -> Result<Self, FetchError> {
        let base_url = config.base_url.trim_end_matches('/').to_string();

        let mut headers = HeaderMap::new();
        headers.insert("User-Agent", HeaderValue::from_static("Mozilla/5.0"));
        headers.insert(
            "Accept",
            HeaderValue::from_static("application/json, text/plain, */*"),
        );
        headers.insert(
            "Accept-Language",
            HeaderValue::from_static("en-US,en;q=0.9"),
        );
        headers.insert("Connection", HeaderValue::from_static("keep-alive"));
        if let Ok(referer) = HeaderValue::from_str(&format!("{}/option-chain", base_url)) {
            headers.insert("Referer", referer);
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .cookie_store(true)
            .default_headers(headers)
            .build()
            .map_err(FetchError::Build)?;

        Ok(Self {
            client,
            base_url,
            policy: RetryPolicy::from(config),
            prime_timeout: Duration::from_secs(config.prime_timeout_secs),
        })
    }

    /// Returns the chain endpoint for a symbol: indices and equities are
    /// served by different upstream endpoints.
    pub fn chain_endpoint(&self, symbol: &str) -> String {
        if reference::is_index(symbol) {
            format!("{}/api/option-chain-indices", self.base_url)
        } else {
            format!("{}/api/option-chain-equities", self.base_url)
        }
    }

    /// Re-establishes upstream session state by navigating the landing and
    /// option-chain pages. Best-effort: failure is logged, never escalated.
    pub async fn prime(&self) {
        let pages = [
            self.base_url.clone(),
            format!("{}/option-chain", self.base_url),
        ];
        for page in pages {
            if let Err(e) = self
                .client
                .get(&page)
                .timeout(self.prime_timeout)
                .send()
                .await
            {
                warn!("Session priming request failed for {}: {}", page, e);
                return;
            }
        }
        debug!("Session primed successfully");
    }

    /// Fetches and decodes the raw option chain for a symbol, retrying under
    /// the configured policy.
    ///
    /// # Errors
    /// Returns [`FetchError::Decode`] when a 200 response carries an
    /// undecodable body, or [`FetchError::Exhausted`] when every attempt
    /// failed.
    pub async fn fetch_chain(&self, symbol: &str) -> Result<RawOptionChain, FetchError> {
        let endpoint = self.chain_endpoint(symbol);

        for attempt in 1..=self.policy.max_attempts {
            match self.try_fetch(&endpoint, symbol).await {
                // A 200 resolves the fetch either way: a malformed body is
                // returned as a Decode error without further retries.
                Ok(decoded) => return decoded,
                Err(failure) => {
                    warn!(
                        "Chain fetch attempt {}/{} failed for {}: {:?}",
                        attempt, self.policy.max_attempts, symbol, failure
                    );
                    if failure.triggers_reprime() {
                        self.prime().await;
                    }
                    tokio::time::sleep(self.policy.retry_delay).await;
                }
            }
        }

        Err(FetchError::Exhausted {
            symbol: symbol.to_string(),
            attempts: self.policy.max_attempts,
        })
    }

    /// One fetch attempt. A 200 with an undecodable body is a hard failure
    /// (retrying will not fix a malformed document), so decoding happens
    /// outside the retry classification.
    async fn try_fetch(
        &self,
        endpoint: &str,
        symbol: &str,
    ) -> Result<Result<RawOptionChain, FetchError>, AttemptFailure> {
        let response = self
            .client
            .get(endpoint)
            .query(&[("symbol", symbol)])
            .send()
            .await
            .map_err(|e| AttemptFailure::Transport(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            let decoded = response
                .json::<RawOptionChain>()
                .await
                .map_err(|e| FetchError::Decode {
                    symbol: symbol.to_string(),
                    message: e.to_string(),
                });
            return Ok(decoded);
        }

        if status.as_u16() == 401 || status.as_u16() == 403 {
            Err(AttemptFailure::Blocked(status.as_u16()))
        } else {
            Err(AttemptFailure::Status(status.as_u16()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_client() -> UpstreamClient {
        UpstreamClient::new(&UpstreamConfig::default()).expect("client should build")
    }

    #[test]
    fn test_index_symbols_route_to_index_endpoint() {
        let client = test_client();
        assert_eq!(
            client.chain_endpoint("NIFTY"),
            "https://www.nseindia.com/api/option-chain-indices"
        );
        assert_eq!(
            client.chain_endpoint("BANKNIFTY"),
            "https://www.nseindia.com/api/option-chain-indices"
        );
    }

    #[test]
    fn test_equities_route_to_equity_endpoint() {
        let client = test_client();
        assert_eq!(
            client.chain_endpoint("SBIN"),
            "https://www.nseindia.com/api/option-chain-equities"
        );
    }

    #[test]
    fn test_retry_policy_from_config() {
        let config = UpstreamConfig {
            max_attempts: 5,
            retry_delay_ms: 250,
            ..UpstreamConfig::default()
        };
        let policy = RetryPolicy::from(&config);
        assert_eq!(policy.max_attempts, 5);
        assert_eq!(policy.retry_delay, Duration::from_millis(250));
    }

    #[test]
    fn test_reprime_classification() {
        assert!(AttemptFailure::Blocked(401).triggers_reprime());
        assert!(AttemptFailure::Blocked(403).triggers_reprime());
        assert!(AttemptFailure::Transport("timeout".to_string()).triggers_reprime());
        assert!(!AttemptFailure::Status(500).triggers_reprime());
        assert!(!AttemptFailure::Status(429).triggers_reprime());
    }

    #[test]
    fn test_base_url_trailing_slash_is_trimmed() {
        let config = UpstreamConfig {
            base_url: "https://www.nseindia.com/".to_string(),
            ..UpstreamConfig::default()
        };
        let client = UpstreamClient::new(&config).expect("client should build");
        assert_eq!(
            client.chain_endpoint("SBIN"),
            "https://www.nseindia.com/api/option-chain-equities"
        );
    }
}
