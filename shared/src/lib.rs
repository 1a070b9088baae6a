//! Shared types and models for the Spaza Compliance Portal
//!
//! This crate contains the domain models and the pure compliance logic
//! shared between the backend and the browser (via WASM): questionnaire
//! scoring, nearby-shop search and dashboard aggregates.

pub mod dashboard;
pub mod geo;
pub mod models;
pub mod session;
pub mod types;
pub mod validation;

pub use dashboard::*;
pub use geo::*;
pub use models::*;
pub use session::*;
pub use types::*;
pub use validation::*;
