use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, de::DeserializeOwned};
use std::time::Duration;
use tracing::{debug, instrument};

use crate::{
    config::{DEFAULT_BASE_URL, DEFAULT_TIMEOUT_SECS},
    error::WeatherError,
    forecast::ForecastSample,
    model::{Coordinates, CurrentConditions, Query, Units},
};

use super::WeatherProvider;

const CURRENT: &str = "weather";
const FORECAST: &str = "forecast";
const AIR_POLLUTION: &str = "air_pollution";

/// Client for the OpenWeather 2.5 REST API.
#[derive(Debug, Clone)]
pub struct OpenWeatherProvider {
    api_key: String,
    base_url: String,
    http: Client,
}

impl OpenWeatherProvider {
    pub fn new(api_key: String) -> Result<Self, WeatherError> {
        Self::with_base_url(api_key, DEFAULT_BASE_URL.to_string(), DEFAULT_TIMEOUT_SECS)
    }

    pub fn with_base_url(
        api_key: String,
        base_url: String,
        timeout_secs: u64,
    ) -> Result<Self, WeatherError> {
        let http = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| WeatherError::Request {
                endpoint: "client",
                reason: e.to_string(),
            })?;

        Ok(Self {
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
            http,
        })
    }

    /// Send a GET to `endpoint` and decode the JSON body.
    ///
    /// Non-success statuses are handed to `on_status` together with the
    /// (truncated) body so each caller decides how to classify them.
    async fn get_json<T, F>(
        &self,
        endpoint: &'static str,
        params: &[(&str, String)],
        on_status: F,
    ) -> Result<T, WeatherError>
    where
        T: DeserializeOwned,
        F: FnOnce(StatusCode, String) -> WeatherError,
    {
        let url = format!("{}/{}", self.base_url, endpoint);
        debug!(%url, "Sending OpenWeather request");

        let res = self
            .http
            .get(&url)
            .query(params)
            .query(&[("appid", self.api_key.as_str())])
            .send()
            .await
            .map_err(|e| WeatherError::Request {
                endpoint,
                reason: e.to_string(),
            })?;

        let status = res.status();
        let body = res.text().await.map_err(|e| WeatherError::Request {
            endpoint,
            reason: format!("failed to read body: {e}"),
        })?;

        if !status.is_success() {
            return Err(on_status(status, truncate_body(&body)));
        }

        serde_json::from_str(&body).map_err(|e| WeatherError::Parse {
            endpoint,
            reason: e.to_string(),
        })
    }

    fn sub_call_failed(endpoint: &'static str) -> impl FnOnce(StatusCode, String) -> WeatherError {
        move |status, body| WeatherError::Request {
            endpoint,
            reason: format!("status {status}: {body}"),
        }
    }
}

fn coord_params(coord: Coordinates) -> Vec<(&'static str, String)> {
    vec![("lat", coord.lat.to_string()), ("lon", coord.lon.to_string())]
}

#[derive(Debug, Deserialize)]
struct OwMain {
    temp: f64,
    feels_like: f64,
    humidity: u8,
    pressure: f64,
}

#[derive(Debug, Deserialize)]
struct OwWeather {
    main: String,
    description: String,
    icon: String,
}

#[derive(Debug, Deserialize)]
struct OwWind {
    speed: f64,
}

#[derive(Debug, Deserialize)]
struct OwSys {
    sunrise: i64,
    sunset: i64,
}

#[derive(Debug, Deserialize)]
struct OwCurrentResponse {
    name: String,
    dt: i64,
    coord: Coordinates,
    main: OwMain,
    weather: Vec<OwWeather>,
    wind: OwWind,
    sys: OwSys,
    visibility: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct OwForecastMain {
    temp: f64,
}

#[derive(Debug, Deserialize)]
struct OwForecastWeather {
    description: String,
    icon: String,
}

#[derive(Debug, Deserialize)]
struct OwForecastEntry {
    dt: i64,
    dt_txt: String,
    main: OwForecastMain,
    weather: Vec<OwForecastWeather>,
}

#[derive(Debug, Deserialize)]
struct OwForecastResponse {
    list: Vec<OwForecastEntry>,
}

#[derive(Debug, Deserialize)]
struct OwComponents {
    pm2_5: f64,
}

#[derive(Debug, Deserialize)]
struct OwAirEntry {
    components: OwComponents,
}

#[derive(Debug, Deserialize)]
struct OwAirResponse {
    list: Vec<OwAirEntry>,
}

#[async_trait]
impl WeatherProvider for OpenWeatherProvider {
    #[instrument(skip_all, fields(query = %query, units = %units))]
    async fn current(
        &self,
        query: &Query,
        units: Units,
    ) -> Result<CurrentConditions, WeatherError> {
        let mut params = match query {
            Query::City(name) => vec![("q", name.clone())],
            Query::Coordinates(coord) => coord_params(*coord),
        };
        params.push(("units", units.as_str().to_string()));

        let lookup = query.to_string();
        let parsed: OwCurrentResponse = self
            .get_json(CURRENT, &params, |status, body| WeatherError::LocationNotFound {
                query: lookup,
                status: status.as_u16(),
                body,
            })
            .await?;

        let weather = parsed.weather.into_iter().next().ok_or(WeatherError::MissingData {
            endpoint: CURRENT,
            what: "weather conditions",
        })?;

        Ok(CurrentConditions {
            city: parsed.name,
            observed_at: unix_to_utc(parsed.dt, CURRENT)?,
            temperature: parsed.main.temp,
            feels_like: parsed.main.feels_like,
            humidity_pct: parsed.main.humidity,
            pressure_hpa: parsed.main.pressure,
            wind_speed: parsed.wind.speed,
            condition: weather.main,
            description: weather.description,
            icon: weather.icon,
            sunrise: unix_to_utc(parsed.sys.sunrise, CURRENT)?,
            sunset: unix_to_utc(parsed.sys.sunset, CURRENT)?,
            coord: parsed.coord,
            visibility_m: parsed.visibility,
        })
    }

    #[instrument(skip_all, fields(lat = %coord.lat, lon = %coord.lon, units = %units))]
    async fn forecast(
        &self,
        coord: Coordinates,
        units: Units,
    ) -> Result<Vec<ForecastSample>, WeatherError> {
        let mut params = coord_params(coord);
        params.push(("units", units.as_str().to_string()));

        let parsed: OwForecastResponse = self
            .get_json(FORECAST, &params, Self::sub_call_failed(FORECAST))
            .await?;

        parsed
            .list
            .into_iter()
            .map(|entry| -> Result<ForecastSample, WeatherError> {
                let weather = entry.weather.into_iter().next().ok_or(WeatherError::MissingData {
                    endpoint: FORECAST,
                    what: "weather conditions",
                })?;

                Ok(ForecastSample {
                    timestamp: unix_to_utc(entry.dt, FORECAST)?,
                    dt_txt: entry.dt_txt,
                    temperature: entry.main.temp,
                    icon: weather.icon,
                    description: weather.description,
                })
            })
            .collect()
    }

    #[instrument(skip_all, fields(lat = %coord.lat, lon = %coord.lon))]
    async fn pm2_5(&self, coord: Coordinates) -> Result<f64, WeatherError> {
        let parsed: OwAirResponse = self
            .get_json(AIR_POLLUTION, &coord_params(coord), Self::sub_call_failed(AIR_POLLUTION))
            .await?;

        parsed
            .list
            .first()
            .map(|entry| entry.components.pm2_5)
            .ok_or(WeatherError::MissingData {
                endpoint: AIR_POLLUTION,
                what: "readings",
            })
    }
}

fn unix_to_utc(ts: i64, endpoint: &'static str) -> Result<DateTime<Utc>, WeatherError> {
    DateTime::from_timestamp(ts, 0).ok_or_else(|| WeatherError::Parse {
        endpoint,
        reason: format!("timestamp {ts} out of range"),
    })
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.len() > MAX {
        let cut = (0..=MAX).rev().find(|i| body.is_char_boundary(*i)).unwrap_or(0);
        format!("{}...", &body[..cut])
    } else {
        body.to_string()
    }
}
