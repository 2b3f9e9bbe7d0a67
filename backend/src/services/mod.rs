//! Business logic services

pub mod prediction;
pub mod weather;

pub use weather::WeatherService;
