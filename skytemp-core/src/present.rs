//! Display strings for reports.

use chrono::{DateTime, TimeZone, Timelike, Utc};
use std::fmt::Display;

use crate::model::{AirQualitySample, Units, WeatherReport};

/// Round half up, the way temperatures are shown everywhere.
pub fn round_display(value: f64) -> i64 {
    (value + 0.5).floor() as i64
}

/// `20.4` metric becomes `"20°C"`.
pub fn format_temperature(value: f64, units: Units) -> String {
    format!("{}{}", round_display(value), units.temperature_symbol())
}

/// `"12°C / 5°C"`
pub fn format_high_low(max: f64, min: f64, units: Units) -> String {
    format!("{} / {}", format_temperature(max, units), format_temperature(min, units))
}

pub fn format_wind(speed: f64, units: Units) -> String {
    format!("{speed} {}", units.speed_unit())
}

pub fn format_visibility(metres: u32) -> String {
    format!("{:.1} km", f64::from(metres) / 1000.0)
}

pub fn format_air_quality(air: &AirQualitySample) -> String {
    format!("{} {}", air.aqi, air.level.label())
}

/// Collapse a provider description into a short label.
pub fn simple_description(description: &str) -> &'static str {
    let desc = description.to_lowercase();
    let has = |needle: &str| desc.contains(needle);

    if has("clear") {
        "Sunny"
    } else if has("cloud") {
        "Cloudy"
    } else if has("rain") {
        "Rainy"
    } else if has("drizzle") {
        "Light Rain"
    } else if has("thunderstorm") {
        "Storm"
    } else if has("snow") {
        "Snow"
    } else if has("mist") || has("fog") || has("haze") {
        "Foggy"
    } else if has("overcast") {
        "Overcast"
    } else {
        "Clear"
    }
}

/// Strictly between sunrise and sunset.
pub fn is_daytime(now: DateTime<Utc>, sunrise: DateTime<Utc>, sunset: DateTime<Utc>) -> bool {
    now > sunrise && now < sunset
}

/// Hour of `ts` in `tz`, rounded to the nearest 3-hour block: `"15:00"`.
///
/// Hour 23 rounds up to `"24:00"`; the block is not wrapped to the next day.
pub fn hour_block<Tz>(ts: DateTime<Utc>, tz: &Tz) -> String
where
    Tz: TimeZone,
{
    let hour = ts.with_timezone(tz).hour();
    let rounded = round_display(f64::from(hour) / 3.0) * 3;
    format!("{rounded:02}:00")
}

/// `"06:42"` in `tz`.
pub fn clock_time<Tz>(ts: DateTime<Utc>, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    ts.with_timezone(tz).format("%H:%M").to_string()
}

/// Short weekday name in `tz`, e.g. `"Mon"`.
pub fn weekday<Tz>(ts: DateTime<Utc>, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    ts.with_timezone(tz).format("%a").to_string()
}

/// One-line text for sharing the current conditions.
pub fn share_text(report: &WeatherReport) -> String {
    format!(
        "It's {} and {} in {}. Check it out!",
        format_temperature(report.current.temperature, report.units),
        report.current.description,
        report.current.city,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aqi;
    use chrono::FixedOffset;

    fn at(h: u32, m: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 15, h, m, 0).unwrap()
    }

    #[test]
    fn temperature_is_rounded_with_symbol() {
        assert_eq!(format_temperature(20.0, Units::Metric), "20°C");
        assert_eq!(format_temperature(20.5, Units::Metric), "21°C");
        assert_eq!(format_temperature(68.4, Units::Imperial), "68°F");
        assert_eq!(format_temperature(-2.5, Units::Metric), "-2°C");
        assert_eq!(format_temperature(-0.3, Units::Metric), "0°C");
    }

    #[test]
    fn freezing_point_in_both_units() {
        assert_eq!(format_temperature(0.0, Units::Metric), "0°C");
        assert_eq!(format_temperature(32.0, Units::Imperial), "32°F");
    }

    #[test]
    fn high_low_and_wind() {
        assert_eq!(format_high_low(12.3, 4.6, Units::Metric), "12°C / 5°C");
        assert_eq!(format_wind(3.6, Units::Imperial), "3.6 mph");
        assert_eq!(format_visibility(10_000), "10.0 km");
        assert_eq!(format_visibility(2_460), "2.5 km");
    }

    #[test]
    fn air_quality_string() {
        let air = aqi::air_quality(10.0).unwrap();
        assert_eq!(format_air_quality(&air), "42 Good");
    }

    #[test]
    fn simple_descriptions() {
        assert_eq!(simple_description("clear sky"), "Sunny");
        assert_eq!(simple_description("Broken Clouds"), "Cloudy");
        assert_eq!(simple_description("light rain"), "Rainy");
        assert_eq!(simple_description("light intensity drizzle"), "Light Rain");
        assert_eq!(simple_description("thunderstorm"), "Storm");
        assert_eq!(simple_description("light snow"), "Snow");
        assert_eq!(simple_description("haze"), "Foggy");
        assert_eq!(simple_description("tornado"), "Clear");
    }

    #[test]
    fn first_match_wins() {
        // "thunderstorm with light rain" hits "rain" before "thunderstorm".
        assert_eq!(simple_description("thunderstorm with light rain"), "Rainy");
        assert_eq!(simple_description("overcast clouds"), "Cloudy");
    }

    #[test]
    fn daytime_is_exclusive() {
        let sunrise = at(6, 0);
        let sunset = at(18, 0);

        assert!(is_daytime(at(12, 0), sunrise, sunset));
        assert!(!is_daytime(sunrise, sunrise, sunset));
        assert!(!is_daytime(at(19, 0), sunrise, sunset));
    }

    #[test]
    fn hour_blocks() {
        assert_eq!(hour_block(at(0, 0), &Utc), "00:00");
        assert_eq!(hour_block(at(4, 0), &Utc), "03:00");
        assert_eq!(hour_block(at(5, 0), &Utc), "06:00");
        assert_eq!(hour_block(at(21, 0), &Utc), "21:00");
        assert_eq!(hour_block(at(22, 0), &Utc), "21:00");
        assert_eq!(hour_block(at(23, 0), &Utc), "24:00");

        let ist = FixedOffset::east_opt(5 * 3600 + 1800).unwrap();
        // 12:00 UTC is 17:30 IST
        assert_eq!(hour_block(at(12, 0), &ist), "18:00");
    }

    #[test]
    fn clock_and_weekday() {
        let ist = FixedOffset::east_opt(5 * 3600 + 1800).unwrap();

        assert_eq!(clock_time(at(1, 12), &ist), "06:42");
        assert_eq!(weekday(at(12, 0), &Utc), "Mon");
        assert_eq!(weekday(at(20, 0), &ist), "Tue");
    }
}
