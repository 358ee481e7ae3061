//! Shared domain logic for the weather aggregator
//!
//! Everything here is pure and synchronous: coordinate and sentinel
//! validation, desert classification, the synthetic climate model, condition
//! derivation, probability estimates and presentation formatting. The backend
//! crate wires these into its provider pipeline.

pub mod climate;
pub mod conditions;
pub mod format;
pub mod models;
pub mod probability;
pub mod types;
pub mod validation;

pub use format::{format_forecast, Formattable, FormattedSnapshot, Percent};
pub use models::*;
pub use types::*;
pub use validation::*;
