//! # firewatch-app
//!
//! Application layer: use-cases and **port definitions** (traits).
//!
//! ## Responsibilities
//! - Define the **driven/outbound port** adapters must implement:
//!   - `TelemetryStore` hands out one `StoreSession` per request
//!   - `StoreSession` covering hierarchy lookups, the jacket update and aggregate reads
//! - Define the **driving/inbound** use-cases:
//!   - `IngestService` to validate and apply one telemetry update
//!   - `QueryService` to serve the dashboard read modes
//! - Orchestrate domain objects without knowing *how* persistence works
//!
//! ## Dependency rule
//! Depends on `firewatch-domain` only.
//! Never imports adapter crates. Adapters depend on *this* crate, not the reverse.

pub mod ports;
pub mod services;
