use async_trait::async_trait;
use std::fmt::Debug;

use crate::{
    Config,
    error::WeatherError,
    forecast::ForecastSample,
    model::{Coordinates, CurrentConditions, Query, Units},
    provider::openweather::OpenWeatherProvider,
};

pub mod openweather;

/// Source of the three raw datasets a report is built from.
#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    async fn current(&self, query: &Query, units: Units)
    -> Result<CurrentConditions, WeatherError>;

    /// 3-hour samples, oldest first.
    async fn forecast(
        &self,
        coord: Coordinates,
        units: Units,
    ) -> Result<Vec<ForecastSample>, WeatherError>;

    /// Latest PM2.5 concentration in µg/m³.
    async fn pm2_5(&self, coord: Coordinates) -> Result<f64, WeatherError>;
}

/// Construct the OpenWeather provider from config.
pub fn provider_from_config(config: &Config) -> anyhow::Result<Box<dyn WeatherProvider>> {
    let api_key = config.require_api_key()?;

    let provider = OpenWeatherProvider::with_base_url(
        api_key.to_owned(),
        config.base_url.clone(),
        config.timeout_secs,
    )?;

    Ok(Box::new(provider))
}
