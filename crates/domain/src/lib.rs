//! # firewatch-domain
//!
//! Pure domain model for the firewatch jacket telemetry service.
//!
//! ## Responsibilities
//! - Foundational types: typed identifiers, error taxonomy
//! - Define the location hierarchy: **Buildings**, **Floors**, **Rooms**
//! - Define **Jackets** (pre-provisioned wearables) and their [`UserStatus`](jacket::UserStatus)
//! - Parse and validate **telemetry updates** pushed by jackets
//! - Resolve dashboard query parameters into a closed set of **read modes**
//! - Hold the user-facing **message catalog**
//!
//! ## Dependency rule
//! This crate has **no internal dependencies**.
//! It must never import anything from `app`, adapters, or external IO crates.
//! All IO boundaries are expressed as traits in the `app` crate (ports).

pub mod error;
pub mod id;
pub mod messages;

pub mod building;
pub mod floor;
pub mod jacket;
pub mod query;
pub mod room;
pub mod telemetry;
