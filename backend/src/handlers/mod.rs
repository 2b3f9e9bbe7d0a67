//! HTTP request handlers

pub mod health;
pub mod page;
pub mod prediction;
pub mod weather;

pub use health::*;
pub use page::*;
pub use prediction::*;
pub use weather::*;
