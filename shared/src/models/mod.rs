//! Domain models for the weather aggregator

mod desert;
mod probability;
mod weather;

pub use desert::*;
pub use probability::*;
pub use weather::*;
