//! Unit tests for client module.

use super::*;

// ============================================================================
// ClientConfig Tests
// ============================================================================

#[test]
fn test_client_config_default() {
    let config = ClientConfig::default();

    assert_eq!(config.base_url, "http://localhost:8000");
    assert_eq!(config.timeout, Duration::from_secs(30));
}

#[test]
fn test_client_config_custom() {
    let config = ClientConfig {
        base_url: "http://api.example.com:9000".to_string(),
        timeout: Duration::from_secs(60),
    };

    assert_eq!(config.base_url, "http://api.example.com:9000");
    assert_eq!(config.timeout, Duration::from_secs(60));
}

// ============================================================================
// SignalClient Creation Tests
// ============================================================================

#[test]
fn test_signal_client_new() {
    let config = ClientConfig::default();
    let client = SignalClient::new(config);

    assert!(client.is_ok());
}

#[test]
fn test_signal_client_with_base_url() {
    let client = SignalClient::with_base_url("http://localhost:3000");

    assert!(client.is_ok());
}

#[test]
fn test_signal_client_base_url_trimmed() {
    let client = SignalClient::with_base_url("http://localhost:8000/").unwrap();

    assert_eq!(client.ws_url(), "ws://localhost:8000/ws");
}

#[test]
fn test_signal_client_ws_url_http() {
    let client = SignalClient::with_base_url("http://localhost:8000").unwrap();

    assert_eq!(client.ws_url(), "ws://localhost:8000/ws");
}

#[test]
fn test_signal_client_ws_url_https() {
    let client = SignalClient::with_base_url("https://api.example.com").unwrap();

    assert_eq!(client.ws_url(), "wss://api.example.com/ws");
}
