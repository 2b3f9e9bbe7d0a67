//! Shared types and models for the bike demand predictor
//!
//! This crate contains the feature schema and encoder shared between the
//! backend, browser forms (via WASM), and other components of the system.

pub mod models;
pub mod validation;

pub use models::*;
pub use validation::*;
