//! Application state and the actions that change it.
//!
//! A [`Controller`] owns the state and processes one action at a time, so the
//! last completed action always determines what is shown.

use anyhow::Result;
use tracing::{debug, info};

use crate::{
    error::{GENERIC_FAILURE_MESSAGE, LOCATION_DENIED_MESSAGE},
    favorites::{Favorites, FavoritesBackend},
    model::{Query, Units, WeatherReport},
    platform::Geolocator,
    provider::WeatherProvider,
    service::WeatherService,
};

/// User-facing failure of the last action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorState {
    /// Lookup, network or decoding failure; deliberately not told apart.
    LookupFailed,
    LocationDenied,
}

impl ErrorState {
    pub fn message(&self) -> &'static str {
        match self {
            ErrorState::LookupFailed => GENERIC_FAILURE_MESSAGE,
            ErrorState::LocationDenied => LOCATION_DENIED_MESSAGE,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppState {
    /// City of the last successful lookup; used for refreshes.
    pub city: String,
    pub units: Units,
    /// Kept across failures, so the previous report stays visible.
    pub report: Option<WeatherReport>,
    pub error: Option<ErrorState>,
}

#[derive(Debug)]
pub struct Controller<P: ?Sized, B: FavoritesBackend> {
    state: AppState,
    service: WeatherService<P>,
    favorites: Favorites<B>,
}

impl<P, B> Controller<P, B>
where
    P: WeatherProvider + ?Sized,
    B: FavoritesBackend,
{
    pub fn new(
        service: WeatherService<P>,
        favorites: Favorites<B>,
        city: impl Into<String>,
        units: Units,
    ) -> Self {
        Self {
            state: AppState {
                city: city.into(),
                units,
                report: None,
                error: None,
            },
            service,
            favorites,
        }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn favorites(&self) -> &[String] {
        self.favorites.list()
    }

    /// Fetch a fresh report and fold the outcome into the state.
    pub async fn load(&mut self, query: Query) {
        self.state.error = None;

        match self.service.fetch_report(&query, self.state.units).await {
            Ok(report) => {
                info!(city = %report.current.city, "Loaded weather");
                self.state.city = report.current.city.clone();
                self.state.report = Some(report);
            }
            Err(e) => {
                debug!(error = %e, query = %query, "Load failed");
                self.state.error = Some(ErrorState::LookupFailed);
            }
        }
    }

    /// Search by free text; blank input is ignored.
    pub async fn search(&mut self, text: &str) {
        let text = text.trim();
        if text.is_empty() {
            return;
        }
        self.load(Query::city(text)).await;
    }

    pub async fn locate<G: Geolocator + ?Sized>(&mut self, geolocator: &G) {
        match geolocator.locate() {
            Ok(coord) => self.load(Query::Coordinates(coord)).await,
            Err(e) => {
                debug!(error = %e, "Geolocation unavailable");
                self.state.error = Some(ErrorState::LocationDenied);
            }
        }
    }

    /// Reload the current city.
    pub async fn refresh(&mut self) {
        let city = self.state.city.clone();
        self.load(Query::City(city)).await;
    }

    /// Switch units and reload, since the API converts server-side.
    pub async fn toggle_units(&mut self) {
        self.state.units = self.state.units.toggled();
        self.refresh().await;
    }

    /// Only a successfully loaded city can be added.
    pub fn add_current_to_favorites(&mut self) -> Result<bool> {
        if self.state.report.is_none() {
            return Ok(false);
        }
        self.favorites.add(&self.state.city)
    }

    pub fn remove_favorite(&mut self, city: &str) -> Result<bool> {
        self.favorites.remove(city)
    }

    pub fn is_current_favorite(&self) -> bool {
        self.favorites.contains(&self.state.city)
    }
}
