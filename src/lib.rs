//! # Option Signal Backend - REST API Server
//!
//! A REST and WebSocket backend that pulls NSE option-chain data, normalizes
//! it into per-strike rows and derives tradeable signals: IV breakouts, ATM
//! straddle pricing, credit-spread candidates and premium surge events.
//! Built with [Axum](https://crates.io/crates/axum) for async HTTP handling and
//! provides OpenAPI/Swagger documentation via [utoipa](https://crates.io/crates/utoipa).
//!
//! ## Key Features
//!
//! - **Resilient Acquisition**: Cookie-primed upstream sessions with bounded
//!   retries and automatic re-priming when the source starts blocking.
//!
//! - **Tolerant Normalization**: Upstream JSON is treated as untrusted; every
//!   field is optional and numbers may arrive as strings.
//!
//! - **Signal Derivation**: IV breakout detection against the ATM strike, a
//!   bias/strategy decision table, spread matching and surge classification.
//!
//! - **Realtime Push**: Per-client WebSocket scan loops with replace-then-start
//!   semantics and cooperative cancellation.
//!
//! - **OpenAPI Documentation**: Auto-generated Swagger UI for API exploration
//!   and testing at `/swagger-ui/`.
//!
//! - **Structured Logging**: Request tracing with `tower-http` for debugging
//!   and monitoring.
//!
//! ## Module Structure
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`api`] | Route handlers, WebSocket endpoint and router configuration |
//! | [`chain`] | Raw upstream models and normalization into per-strike rows |
//! | [`config`] | TOML configuration loading and validation |
//! | [`error`] | API error types with `IntoResponse` implementation |
//! | [`models`] | Request/response DTOs with OpenAPI schemas |
//! | [`reference`] | Static symbol universe and contract lot sizes |
//! | [`scanner`] | Multi-symbol scan pipeline over the upstream client |
//! | [`session`] | Per-client realtime session registry |
//! | [`signal`] | ATM lookup, straddle pricing, breakouts and strategy table |
//! | [`spread`] | Strike-pair spread matching |
//! | [`state`] | Application state management |
//! | [`surge`] | Premium surge detection with in-memory price history |
//! | [`upstream`] | Primed HTTP client for the option-chain source |
//!
//! ## API Endpoints
//!
//! | Method | Endpoint | Description |
//! |--------|----------|-------------|
//! | GET | `/health` | Health check |
//! | GET | `/ws` | WebSocket upgrade for realtime scans |
//! | GET | `/api/oc?symbol=&expiry=` | One symbol's chain, single expiry |
//! | POST | `/api/breakout_scan` | IV breakout scan over a symbol batch |
//! | POST | `/api/strategy_ltp_scan` | Spread-pair scan with straddle pricing |
//! | POST | `/api/premium_surge` | Premium surge detection |
//! | GET | `/api/suggested` | Suggested F&O symbol universe |
//!
//! ## Example Usage
//!
//! ### Starting the Server
//!
//! ```bash
//! # Development mode
//! cargo run
//!
//! # With custom host/port
//! HOST=127.0.0.1 PORT=3000 cargo run
//!
//! # Release build
//! cargo build --release
//! ./target/release/option-signal-backend
//! ```
//!
//! ### API Requests
//!
//! ```bash
//! # Fetch a chain snapshot
//! curl "http://localhost:8000/api/oc?symbol=NIFTY"
//!
//! # Run a breakout scan
//! curl -X POST http://localhost:8000/api/breakout_scan \
//!   -H "Content-Type: application/json" \
//!   -d '{"symbols": ["NIFTY", "BANKNIFTY"], "threshold": 5.0, "side": "ALL"}'
//!
//! # Detect premium surges
//! curl -X POST http://localhost:8000/api/premium_surge \
//!   -H "Content-Type: application/json" \
//!   -d '{"symbols": ["NIFTY"], "min_pct": 200}'
//! ```
//!
//! ## Swagger UI
//!
//! Once the server is running, access the interactive API documentation at:
//!
//! ```text
//! http://localhost:8000/swagger-ui/
//! ```

pub mod api;
pub mod chain;
pub mod config;
pub mod error;
pub mod models;
pub mod reference;
pub mod scanner;
pub mod session;
pub mod signal;
pub mod spread;
pub mod state;
pub mod surge;
pub mod upstream;
