//! Core library for the `skytemp` weather client.
//!
//! This crate defines:
//! - Configuration and the favorites store
//! - The OpenWeather provider and the report pipeline on top of it
//! - Forecast aggregation, AQI derivation and display formatting
//! - The application controller that ties them together
//!
//! It is used by `skytemp-cli`, but can also be reused by other front ends.

pub mod app;
pub mod aqi;
pub mod config;
pub mod error;
pub mod favorites;
pub mod forecast;
pub mod model;
pub mod platform;
pub mod present;
pub mod provider;
pub mod service;

#[cfg(test)]
mod test_support;

pub use app::{AppState, Controller, ErrorState};
pub use aqi::AqiLevel;
pub use config::Config;
pub use error::WeatherError;
pub use favorites::{Favorites, FavoritesBackend, JsonFileBackend, MemoryBackend};
pub use forecast::{DailySummary, ForecastSample, ForecastView};
pub use model::{AirQualitySample, Coordinates, CurrentConditions, Query, Units, WeatherReport};
pub use platform::{Geolocator, ManualLocation};
pub use provider::{WeatherProvider, openweather::OpenWeatherProvider, provider_from_config};
pub use service::WeatherService;
