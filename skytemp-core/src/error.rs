use thiserror::Error;

/// Message shown for every lookup, transport or decoding failure.
pub const GENERIC_FAILURE_MESSAGE: &str = "City not found or network issue";

/// Message shown when no location could be obtained.
pub const LOCATION_DENIED_MESSAGE: &str = "Location access denied";

/// Errors produced while fetching or deriving weather data.
#[derive(Debug, Error)]
pub enum WeatherError {
    /// The current-weather lookup answered with a non-success status.
    #[error("Location '{query}' not found (status {status}): {body}")]
    LocationNotFound {
        query: String,
        status: u16,
        body: String,
    },

    /// A request could not be sent, or a follow-up call failed.
    #[error("Request to {endpoint} failed: {reason}")]
    Request {
        endpoint: &'static str,
        reason: String,
    },

    /// A response body was not the JSON we expected.
    #[error("Failed to parse {endpoint} response: {reason}")]
    Parse {
        endpoint: &'static str,
        reason: String,
    },

    /// The response decoded fine but lacked a required entry.
    #[error("{endpoint} response contained no {what}")]
    MissingData {
        endpoint: &'static str,
        what: &'static str,
    },

    /// PM2.5 concentrations must be finite and non-negative.
    #[error("Invalid PM2.5 concentration: {0}")]
    InvalidConcentration(f64),

    /// Geolocation was refused or is unavailable.
    #[error("Location access denied")]
    LocationDenied,
}

impl WeatherError {
    /// Collapse the error into the single message a user gets to see.
    pub fn user_message(&self) -> &'static str {
        match self {
            WeatherError::LocationDenied => LOCATION_DENIED_MESSAGE,
            _ => GENERIC_FAILURE_MESSAGE,
        }
    }

    /// True when the lookup itself was rejected, as opposed to a transport failure.
    pub fn is_lookup_failure(&self) -> bool {
        matches!(self, WeatherError::LocationNotFound { .. })
    }
}
