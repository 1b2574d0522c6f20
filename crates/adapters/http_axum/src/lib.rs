//! # firewatch-adapter-http-axum
//!
//! HTTP adapter built on [axum](https://docs.rs/axum).
//!
//! ## Responsibilities
//! - Accept **telemetry** pushed by jackets (`POST /data`)
//! - Serve the dashboard's **read modes** (`GET /data?page=..`)
//! - Map HTTP requests into application service calls (driving adapter)
//! - Render every error through the configured message catalog as a JSON
//!   `{"message": ..}` envelope
//!
//! ## Dependency rule
//! Depends on `firewatch-app` (for port traits and services) and `firewatch-domain`
//! (for domain types used in request/response mapping). Never leaks axum types
//! into the domain.

pub mod api;
pub mod error;
pub mod router;
pub mod state;
