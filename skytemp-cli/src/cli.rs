use anyhow::{Context, anyhow, bail};
use clap::{Parser, Subcommand};
use inquire::{Password, PasswordDisplayMode, Select, Text};
use skytemp_core::{
    Config, Controller, ErrorState, Favorites, FavoritesBackend, JsonFileBackend, ManualLocation,
    Units, WeatherService, config::POPULAR_CITIES, present, provider_from_config,
};
use tracing::debug;

use crate::render;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "skytemp", version, about = "Weather, forecasts and air quality in your terminal")]
pub struct Cli {
    /// Increase log verbosity (-v, -vv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// OpenWeather API key; overrides the configured one.
    #[arg(long, env = "OPENWEATHER_API_KEY", hide_env_values = true, global = true)]
    pub api_key: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Set the API key, default units and default city.
    Configure,

    /// Show current weather, forecast and air quality.
    Show {
        /// City name; defaults to the configured city.
        city: Option<String>,

        /// Latitude of your position (use together with --lon).
        #[arg(long, allow_negative_numbers = true)]
        lat: Option<f64>,

        /// Longitude of your position (use together with --lat).
        #[arg(long, allow_negative_numbers = true)]
        lon: Option<f64>,

        /// "metric" or "imperial"; defaults to the configured units.
        #[arg(long, short, value_parser = parse_units)]
        units: Option<Units>,

        /// Add the resolved city to favorites.
        #[arg(long)]
        favorite: bool,

        /// Print a one-line summary suitable for sharing.
        #[arg(long)]
        share: bool,
    },

    /// Manage favorite cities.
    Favorites {
        #[command(subcommand)]
        action: FavoritesAction,
    },
}

#[derive(Debug, Subcommand)]
pub enum FavoritesAction {
    /// List favorites in the order they were added.
    List,
    /// Add a city.
    Add { city: String },
    /// Remove a city.
    Remove { city: String },
}

fn parse_units(s: &str) -> Result<Units, String> {
    Units::try_from(s).map_err(|e| e.to_string())
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command {
            Command::Configure => configure(),
            Command::Show {
                city,
                lat,
                lon,
                units,
                favorite,
                share,
            } => {
                let config = Config::load()?.with_api_key_override(self.api_key);
                let opts = ShowOptions {
                    city,
                    lat,
                    lon,
                    units,
                    favorite,
                    share,
                };
                show(config, opts).await
            }
            Command::Favorites { action } => favorites(action),
        }
    }
}

fn configure() -> anyhow::Result<()> {
    let mut config = Config::load()?;

    let api_key = Password::new("OpenWeather API key:")
        .with_display_mode(PasswordDisplayMode::Masked)
        .without_confirmation()
        .with_help_message("Leave empty to keep the current key")
        .prompt()
        .context("Failed to read API key")?;
    if !api_key.trim().is_empty() {
        config.api_key = Some(api_key.trim().to_string());
    }

    let options = vec![Units::Metric, Units::Imperial];
    let start = options.iter().position(|u| *u == config.units).unwrap_or(0);
    config.units = Select::new("Units:", options)
        .with_starting_cursor(start)
        .prompt()
        .context("Failed to read units")?;

    let city = Text::new("Default city:")
        .with_default(&config.default_city)
        .prompt()
        .context("Failed to read default city")?;
    if !city.trim().is_empty() {
        config.default_city = city.trim().to_string();
    }

    config.save()?;
    println!("Saved configuration to {}", Config::config_file_path()?.display());

    Ok(())
}

struct ShowOptions {
    city: Option<String>,
    lat: Option<f64>,
    lon: Option<f64>,
    units: Option<Units>,
    favorite: bool,
    share: bool,
}

async fn show(config: Config, opts: ShowOptions) -> anyhow::Result<()> {
    let provider = provider_from_config(&config)?;
    let favorites = Favorites::open(JsonFileBackend::default_location()?)?;
    let units = opts.units.unwrap_or(config.units);
    debug!(%units, default_city = %config.default_city, "Starting lookup");

    let mut controller = Controller::new(
        WeatherService::new(provider),
        favorites,
        config.default_city.clone(),
        units,
    );

    if opts.lat.is_some() || opts.lon.is_some() {
        controller.locate(&ManualLocation::new(opts.lat, opts.lon)).await;
    } else if let Some(city) = opts.city.as_deref() {
        controller.search(city).await;
    } else {
        controller.refresh().await;
    }

    if let Some(error) = controller.state().error {
        return Err(match error {
            ErrorState::LookupFailed => anyhow!(
                "{}\nTry one of these popular cities: {}",
                error.message(),
                POPULAR_CITIES[..4].join(", ")
            ),
            ErrorState::LocationDenied => anyhow!(error.message()),
        });
    }

    let Some(report) = controller.state().report.clone() else {
        return Err(anyhow!("No weather data available"));
    };

    if opts.favorite {
        if controller.add_current_to_favorites()? {
            println!("Added {} to favorites.", report.current.city);
        } else {
            println!("{} is already a favorite.", report.current.city);
        }
    }

    render::print_report(&report, controller.is_current_favorite());

    if opts.share {
        println!();
        println!("{}", present::share_text(&report));
    }

    Ok(())
}

fn favorites(action: FavoritesAction) -> anyhow::Result<()> {
    let mut favorites = Favorites::open(JsonFileBackend::default_location()?)?;

    for line in apply_favorites(&mut favorites, action)? {
        println!("{line}");
    }

    Ok(())
}

/// Run a favorites action and return the lines to print.
fn apply_favorites<B: FavoritesBackend>(
    favorites: &mut Favorites<B>,
    action: FavoritesAction,
) -> anyhow::Result<Vec<String>> {
    let lines = match action {
        FavoritesAction::List if favorites.list().is_empty() => {
            vec!["No favorites yet".to_string()]
        }
        FavoritesAction::List => favorites.list().to_vec(),
        FavoritesAction::Add { city } => {
            let city = city.trim();
            if city.is_empty() {
                bail!("City name cannot be empty");
            }

            if favorites.add(city)? {
                vec![format!("Added {city}.")]
            } else {
                vec![format!("{city} is already a favorite.")]
            }
        }
        FavoritesAction::Remove { city } => {
            let city = city.trim();
            if favorites.remove(city)? {
                vec![format!("Removed {city}.")]
            } else {
                vec![format!("{city} is not a favorite.")]
            }
        }
    };

    Ok(lines)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use skytemp_core::MemoryBackend;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn show_accepts_negative_coordinates_and_units() {
        let cli = Cli::try_parse_from([
            "skytemp", "show", "--lat", "-33.87", "--lon", "151.21", "--units", "imperial",
        ])
        .expect("valid arguments");

        match cli.command {
            Command::Show { lat, lon, units, .. } => {
                assert_eq!(lat, Some(-33.87));
                assert_eq!(lon, Some(151.21));
                assert_eq!(units, Some(Units::Imperial));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn unknown_units_are_rejected() {
        let err = Cli::try_parse_from(["skytemp", "show", "Delhi", "--units", "kelvin"])
            .unwrap_err();
        assert!(err.to_string().contains("Unknown units"));
    }

    #[test]
    fn favorites_subcommands_parse() {
        let cli = Cli::try_parse_from(["skytemp", "favorites", "add", "Toronto"]).expect("valid");
        assert!(matches!(
            cli.command,
            Command::Favorites { action: FavoritesAction::Add { ref city } } if city == "Toronto"
        ));
    }

    #[test]
    fn blank_favorite_is_rejected() {
        let mut favs = Favorites::open(MemoryBackend::default()).unwrap();
        let action = FavoritesAction::Add {
            city: "   ".to_string(),
        };

        let err = apply_favorites(&mut favs, action).unwrap_err();
        assert!(err.to_string().contains("cannot be empty"));
        assert!(favs.backend().snapshot().is_empty());
    }

    #[test]
    fn add_and_remove_trim_the_name() {
        let mut favs = Favorites::open(MemoryBackend::default()).unwrap();

        let added = apply_favorites(
            &mut favs,
            FavoritesAction::Add {
                city: " Delhi ".to_string(),
            },
        )
        .unwrap();
        assert_eq!(added, ["Added Delhi."]);

        let removed = apply_favorites(
            &mut favs,
            FavoritesAction::Remove {
                city: " Delhi ".to_string(),
            },
        )
        .unwrap();
        assert_eq!(removed, ["Removed Delhi."]);

        let listed = apply_favorites(&mut favs, FavoritesAction::List).unwrap();
        assert_eq!(listed, ["No favorites yet"]);
    }
}
