use tracing::{info, instrument, warn};

use crate::{
    aqi,
    error::WeatherError,
    forecast,
    model::{Query, Units, WeatherReport},
    provider::WeatherProvider,
};

/// Builds a full [`WeatherReport`] out of the three provider calls.
///
/// The current-weather lookup runs first because it resolves the coordinates.
/// Forecast and air quality only depend on those coordinates and run
/// concurrently.
#[derive(Debug)]
pub struct WeatherService<P: ?Sized> {
    provider: Box<P>,
}

impl<P: WeatherProvider + ?Sized> WeatherService<P> {
    pub fn new(provider: Box<P>) -> Self {
        Self { provider }
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    #[instrument(skip_all, fields(query = %query, units = %units))]
    pub async fn fetch_report(
        &self,
        query: &Query,
        units: Units,
    ) -> Result<WeatherReport, WeatherError> {
        let current = self.provider.current(query, units).await.inspect_err(|e| {
            warn!(error = %e, "Current weather lookup failed");
        })?;

        let coord = current.coord;
        let (samples, pm2_5) = tokio::try_join!(
            self.provider.forecast(coord, units),
            self.provider.pm2_5(coord),
        )
        .inspect_err(|e| warn!(error = %e, city = %current.city, "Follow-up request failed"))?;

        let view = forecast::aggregate(&samples);
        let air = aqi::air_quality(pm2_5)?;

        info!(
            city = %current.city,
            hourly = view.hourly.len(),
            daily = view.daily.len(),
            aqi = air.aqi,
            "Weather report ready"
        );

        Ok(WeatherReport {
            units,
            current,
            hourly: view.hourly,
            daily: view.daily,
            air,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{aqi::AqiLevel, test_support::FakeProvider};

    #[tokio::test]
    async fn report_combines_all_three_calls() {
        let service = WeatherService::new(Box::new(FakeProvider::new()));

        let report = service
            .fetch_report(&Query::city("Lucknow"), Units::Metric)
            .await
            .expect("report");

        assert_eq!(report.current.city, "Lucknow");
        assert_eq!(report.hourly.len(), 12);
        assert_eq!(report.daily.len(), 6);
        assert_eq!(report.air.aqi, 42);
        assert_eq!(report.air.level, AqiLevel::Good);
    }

    #[tokio::test]
    async fn follow_up_calls_use_resolved_coordinates() {
        let service = WeatherService::new(Box::new(FakeProvider::new()));
        service
            .fetch_report(&Query::city("Lucknow"), Units::Imperial)
            .await
            .expect("report");

        let mut calls = service.provider.calls();
        assert_eq!(calls.remove(0), "current Lucknow imperial");
        calls.sort();
        assert_eq!(calls, ["air 26.85 80.95", "forecast 26.85 80.95 imperial"]);
    }

    #[tokio::test]
    async fn unknown_city_stops_before_follow_up_calls() {
        let provider = FakeProvider {
            unknown_cities: vec!["Atlantis".into()],
            ..FakeProvider::new()
        };
        let service = WeatherService::new(Box::new(provider));

        let err = service
            .fetch_report(&Query::city("Atlantis"), Units::Metric)
            .await
            .unwrap_err();

        assert!(err.is_lookup_failure());
        assert_eq!(service.provider.calls().len(), 1);
    }

    #[tokio::test]
    async fn air_failure_fails_the_report() {
        let provider = FakeProvider {
            fail_air: true,
            ..FakeProvider::new()
        };
        let service = WeatherService::new(Box::new(provider));

        let err = service
            .fetch_report(&Query::city("Delhi"), Units::Metric)
            .await
            .unwrap_err();

        assert!(matches!(err, WeatherError::Request { endpoint: "air_pollution", .. }));
    }

    #[tokio::test]
    async fn negative_concentration_is_rejected() {
        let provider = FakeProvider {
            pm2_5: -3.0,
            ..FakeProvider::new()
        };
        let service = WeatherService::new(Box::new(provider));

        let err = service
            .fetch_report(&Query::city("Delhi"), Units::Metric)
            .await
            .unwrap_err();

        assert!(matches!(err, WeatherError::InvalidConcentration(_)));
    }
}
