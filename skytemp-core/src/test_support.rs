//! In-process provider used by unit tests.

use async_trait::async_trait;
use chrono::{Duration, TimeZone, Utc};
use std::sync::Mutex;

use crate::{
    error::WeatherError,
    forecast::ForecastSample,
    model::{Coordinates, CurrentConditions, Query, Units},
    provider::WeatherProvider,
};

/// Serves fixed data; temperatures follow the requested units.
#[derive(Debug, Default)]
pub struct FakeProvider {
    pub calls: Mutex<Vec<String>>,
    pub unknown_cities: Vec<String>,
    pub fail_air: bool,
    pub pm2_5: f64,
}

impl FakeProvider {
    pub fn new() -> Self {
        Self {
            pm2_5: 10.0,
            ..Self::default()
        }
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }
}

/// 0 °C reported back in the requested units.
fn freezing(units: Units) -> f64 {
    match units {
        Units::Metric => 0.0,
        Units::Imperial => 32.0,
    }
}

#[async_trait]
impl WeatherProvider for FakeProvider {
    async fn current(
        &self,
        query: &Query,
        units: Units,
    ) -> Result<CurrentConditions, WeatherError> {
        self.record(format!("current {query} {units}"));

        let (city, coord) = match query {
            Query::City(name) if self.unknown_cities.contains(name) => {
                return Err(WeatherError::LocationNotFound {
                    query: name.clone(),
                    status: 404,
                    body: "city not found".into(),
                });
            }
            Query::City(name) => (name.clone(), Coordinates { lat: 26.85, lon: 80.95 }),
            Query::Coordinates(c) => ("Located".to_string(), *c),
        };

        let noon = Utc.with_ymd_and_hms(2024, 1, 15, 12, 0, 0).unwrap();
        Ok(CurrentConditions {
            city,
            observed_at: noon,
            temperature: freezing(units),
            feels_like: freezing(units),
            humidity_pct: 80,
            pressure_hpa: 1013.0,
            wind_speed: 3.0,
            condition: "Clear".into(),
            description: "clear sky".into(),
            icon: "01d".into(),
            sunrise: noon - Duration::hours(6),
            sunset: noon + Duration::hours(6),
            coord,
            visibility_m: Some(10_000),
        })
    }

    async fn forecast(
        &self,
        coord: Coordinates,
        units: Units,
    ) -> Result<Vec<ForecastSample>, WeatherError> {
        self.record(format!("forecast {} {} {units}", coord.lat, coord.lon));

        let start = Utc.with_ymd_and_hms(2024, 1, 15, 12, 0, 0).unwrap();
        Ok((0..40)
            .map(|i| {
                let ts = start + Duration::hours(3 * i);
                ForecastSample {
                    timestamp: ts,
                    dt_txt: ts.format("%Y-%m-%d %H:%M:%S").to_string(),
                    temperature: freezing(units) + i as f64 % 8.0,
                    icon: "04d".into(),
                    description: "broken clouds".into(),
                }
            })
            .collect())
    }

    async fn pm2_5(&self, coord: Coordinates) -> Result<f64, WeatherError> {
        self.record(format!("air {} {}", coord.lat, coord.lon));

        if self.fail_air {
            return Err(WeatherError::Request {
                endpoint: "air_pollution",
                reason: "status 500 Internal Server Error: boom".into(),
            });
        }
        Ok(self.pm2_5)
    }
}
