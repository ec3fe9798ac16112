//! US EPA PM2.5 breakpoints.

use serde::{Deserialize, Serialize};

use crate::{error::WeatherError, model::AirQualitySample};

/// Severity bucket of an AQI value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AqiLevel {
    Good,
    Moderate,
    UnhealthyForSensitive,
    Unhealthy,
    VeryUnhealthy,
    Hazardous,
}

impl AqiLevel {
    pub fn from_aqi(aqi: u32) -> Self {
        match aqi {
            0..=50 => AqiLevel::Good,
            51..=100 => AqiLevel::Moderate,
            101..=150 => AqiLevel::UnhealthyForSensitive,
            151..=200 => AqiLevel::Unhealthy,
            201..=300 => AqiLevel::VeryUnhealthy,
            _ => AqiLevel::Hazardous,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            AqiLevel::Good => "Good",
            AqiLevel::Moderate => "Moderate",
            AqiLevel::UnhealthyForSensitive => "Unhealthy (Sensitive)",
            AqiLevel::Unhealthy => "Unhealthy",
            AqiLevel::VeryUnhealthy => "Very Unhealthy",
            AqiLevel::Hazardous => "Hazardous",
        }
    }

    /// Hex colour used when rendering the level.
    pub fn color(&self) -> &'static str {
        match self {
            AqiLevel::Good => "#4ade80",
            AqiLevel::Moderate => "#facc15",
            AqiLevel::UnhealthyForSensitive => "#fb923c",
            AqiLevel::Unhealthy => "#ef4444",
            AqiLevel::VeryUnhealthy => "#a855f7",
            AqiLevel::Hazardous => "#991b1b",
        }
    }
}

/// (upper concentration bound, low AQI, AQI span, low concentration, concentration span)
const SEGMENTS: [(f64, f64, f64, f64, f64); 5] = [
    (12.0, 0.0, 50.0, 0.0, 12.0),
    (35.4, 50.0, 50.0, 12.1, 23.4),
    (55.4, 100.0, 50.0, 35.5, 19.9),
    (150.4, 150.0, 50.0, 55.5, 94.9),
    (250.4, 200.0, 100.0, 150.5, 99.9),
];

const HAZARDOUS_SEGMENT: (f64, f64, f64, f64) = (300.0, 200.0, 250.5, 249.5);

/// Convert a PM2.5 concentration (µg/m³) into an AQI value.
pub fn pm25_to_aqi(pm25: f64) -> Result<u32, WeatherError> {
    if !pm25.is_finite() || pm25 < 0.0 {
        return Err(WeatherError::InvalidConcentration(pm25));
    }

    let (low_aqi, aqi_span, low_conc, conc_span) = SEGMENTS
        .iter()
        .find(|(upper, ..)| pm25 <= *upper)
        .map(|&(_, low_aqi, aqi_span, low_conc, conc_span)| {
            (low_aqi, aqi_span, low_conc, conc_span)
        })
        .unwrap_or(HAZARDOUS_SEGMENT);

    // Readings inside the 0.1 gaps between segments round up to the segment's low AQI.
    let aqi = low_aqi + round_half_up(aqi_span / conc_span * (pm25 - low_conc));

    Ok(aqi as u32)
}

/// Derive the full air-quality sample from a raw PM2.5 reading.
pub fn air_quality(pm2_5: f64) -> Result<AirQualitySample, WeatherError> {
    let aqi = pm25_to_aqi(pm2_5)?;

    Ok(AirQualitySample {
        pm2_5,
        aqi,
        level: AqiLevel::from_aqi(aqi),
    })
}

fn round_half_up(x: f64) -> f64 {
    (x + 0.5).floor()
}
