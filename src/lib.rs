//! Finance Planner API
//!
//! A small finance backend that:
//! - Stores user financial profiles and transaction records
//! - Derives retirement, allocation and risk figures from closed-form formulas
//! - Exposes everything as a JSON HTTP API with pluggable storage
//!
//! FLOW: client → API layer → (predictor | store) → JSON response

pub mod api;
pub mod error;
pub mod models;
pub mod predictor;
pub mod store;

pub use error::Result;

// Re-export common types
pub use models::*;
