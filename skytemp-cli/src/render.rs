use chrono::{Local, Utc};
use skytemp_core::{
    WeatherReport,
    present::{
        clock_time, format_air_quality, format_high_low, format_temperature, format_visibility,
        format_wind, hour_block, is_daytime, simple_description, weekday,
    },
};

pub fn print_report(report: &WeatherReport, favorite: bool) {
    let current = &report.current;
    let units = report.units;

    let star = if favorite { " ⭐" } else { "" };
    let phase = if is_daytime(Utc::now(), current.sunrise, current.sunset) {
        "Day"
    } else {
        "Night"
    };

    println!("{}{star}  ({phase})", current.city);
    println!(
        "  {}  {}",
        format_temperature(current.temperature, units),
        simple_description(&current.description)
    );
    println!("  Feels like: {}", format_temperature(current.feels_like, units));
    println!("  Humidity:   {}%", current.humidity_pct);
    println!("  Wind:       {}", format_wind(current.wind_speed, units));
    println!("  Pressure:   {} hPa", current.pressure_hpa);
    if let Some(visibility) = current.visibility_m {
        println!("  Visibility: {}", format_visibility(visibility));
    }
    println!("  Sunrise:    {}", clock_time(current.sunrise, &Local));
    println!("  Sunset:     {}", clock_time(current.sunset, &Local));
    println!(
        "  Air quality: {} (PM2.5 {} µg/m³)",
        format_air_quality(&report.air),
        report.air.pm2_5
    );

    if !report.hourly.is_empty() {
        println!();
        println!("Hourly");
        for sample in &report.hourly {
            println!(
                "  {}  {:>6}  {}",
                hour_block(sample.timestamp, &Local),
                format_temperature(sample.temperature, units),
                simple_description(&sample.description)
            );
        }
    }

    if !report.daily.is_empty() {
        println!();
        println!("{}-Day Forecast", report.daily.len());
        for day in &report.daily {
            println!(
                "  {}  {:>12}  {}",
                weekday(day.timestamp, &Local),
                format_high_low(day.max, day.min, units),
                simple_description(&day.description)
            );
        }
    }
}
