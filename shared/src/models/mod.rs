//! Domain models for the bike demand predictor

mod features;
mod prediction;
mod weather;

pub use features::*;
pub use prediction::*;
pub use weather::*;
