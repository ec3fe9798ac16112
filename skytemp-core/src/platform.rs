use crate::{error::WeatherError, model::Coordinates};

/// Something that can tell where the user is.
pub trait Geolocator {
    fn locate(&self) -> Result<Coordinates, WeatherError>;
}

/// Location supplied up front, e.g. from command-line arguments.
///
/// Without a position, or with one outside valid lat/lon ranges, the lookup
/// is treated as refused.
#[derive(Debug, Clone, Copy, Default)]
pub struct ManualLocation {
    coord: Option<Coordinates>,
}

impl ManualLocation {
    pub fn new(lat: Option<f64>, lon: Option<f64>) -> Self {
        let coord = lat.zip(lon).map(|(lat, lon)| Coordinates { lat, lon });
        Self { coord }
    }
}

impl Geolocator for ManualLocation {
    fn locate(&self) -> Result<Coordinates, WeatherError> {
        self.coord
            .filter(|c| (-90.0..=90.0).contains(&c.lat) && (-180.0..=180.0).contains(&c.lon))
            .ok_or(WeatherError::LocationDenied)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn both_coordinates_required() {
        assert!(ManualLocation::new(Some(26.85), None).locate().is_err());
        assert!(ManualLocation::new(None, Some(80.95)).locate().is_err());
        assert!(ManualLocation::default().locate().is_err());

        let coord = ManualLocation::new(Some(26.85), Some(80.95)).locate().unwrap();
        assert_eq!(coord, Coordinates { lat: 26.85, lon: 80.95 });
    }

    #[test]
    fn out_of_range_is_denied() {
        let err = ManualLocation::new(Some(91.0), Some(0.0)).locate().unwrap_err();
        assert!(matches!(err, WeatherError::LocationDenied));
        assert!(ManualLocation::new(Some(0.0), Some(-180.5)).locate().is_err());
    }
}
