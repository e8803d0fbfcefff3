//! Shared application state.

use crate::config::Config;
use crate::session::SessionRegistry;
use crate::surge::SurgeDetector;
use crate::upstream::{FetchError, UpstreamClient};
use std::sync::Arc;

/// State shared across handlers and realtime loops.
#[derive(Clone)]
pub struct AppState {
    /// Service configuration.
    pub config: Arc<Config>,
    /// Upstream option-chain client.
    pub upstream: Arc<UpstreamClient>,
    /// Premium surge detector; price history persists across scans.
    pub surge: Arc<SurgeDetector>,
    /// Realtime session registry.
    pub sessions: Arc<SessionRegistry>,
}

impl AppState {
    /// Builds the shared state from configuration.
    pub fn from_config(config: Config) -> Result<Self, FetchError> {
        let upstream = UpstreamClient::new(&config.upstream)?;
        Ok(Self {
            config: Arc::new(config),
            upstream: Arc::new(upstream),
            surge: Arc::new(SurgeDetector::new()),
            sessions: Arc::new(SessionRegistry::new()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_from_default_config() {
        let state = AppState::from_config(Config::default()).expect("should build");
        assert!(state.sessions.is_empty());
        assert_eq!(state.surge.key_count(), 0);
    }
}
