use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use rand::rngs::StdRng;
use rand::SeedableRng;
use sunday_core::{App, Config, TemperatureUnit, Theme};
use sunday_ui::{view, AppState, Controller, Event, WeatherServices};
use sunday_weather::{StaticGeolocator, SuggestionClient, Units, WeatherProvider};
use tokio::runtime::Handle;

#[derive(Parser)]
#[command(name = "sunday", version, about = "Five-day weather lookup")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the forecast for a city
    Search {
        city: String,
        /// Index of the day to select in the five-day strip
        #[arg(long)]
        day: Option<usize>,
    },
    /// Show the forecast for the current position
    Here {
        #[arg(long, allow_hyphen_values = true, requires = "lon")]
        lat: Option<f64>,
        #[arg(long, allow_hyphen_values = true, requires = "lat")]
        lon: Option<f64>,
    },
    /// List city name suggestions for a partial query
    Suggest { query: String },
    /// Show or change the color theme
    Theme { choice: Option<ThemeChoice> },
}

#[derive(Clone, Copy, ValueEnum)]
enum ThemeChoice {
    Light,
    Dark,
    Toggle,
}

fn units_for(unit: TemperatureUnit) -> Units {
    match unit {
        TemperatureUnit::Celsius => Units::Metric,
        TemperatureUnit::Fahrenheit => Units::Imperial,
    }
}

fn build_services(config: &Config, position: Option<(f64, f64)>) -> Result<WeatherServices> {
    let timeout = Duration::from_secs(config.weather.request_timeout_secs);
    let language = &config.weather.language;

    let weather_key = config.weather_api_key().unwrap_or_else(|| {
        tracing::warn!("No weather API key configured; requests will be rejected");
        String::new()
    });
    let geocoding_key = config.geocoding_api_key().unwrap_or_default();

    let provider = WeatherProvider::with_timeout(
        &weather_key,
        units_for(config.weather.temperature_unit),
        timeout,
    )
    .context("Failed to create weather client")?
    .with_base_url(&config.services.weather_api_url)
    .with_language(language);

    let suggestions = SuggestionClient::with_timeout(&geocoding_key, timeout)
        .context("Failed to create geocoding client")?
        .with_base_url(&config.services.geocoding_api_url)
        .with_language(language);

    let geolocator = match position.or_else(|| config.weather.default_coordinates()) {
        Some((lat, lon)) => StaticGeolocator::at(lat, lon),
        None => StaticGeolocator::default(),
    };

    Ok(WeatherServices {
        provider: Arc::new(provider),
        suggestions: Arc::new(suggestions),
        geolocator: Arc::new(geolocator),
    })
}

fn print_page(controller: &Controller, units: Units) {
    print!(
        "{}",
        view::render(
            controller.state(),
            controller.precipitation(),
            units,
            chrono::Utc::now()
        )
    );
}

async fn run(controller: &mut Controller, command: Commands, units: Units) -> Result<()> {
    match command {
        Commands::Search { city, day } => {
            controller.dispatch(Event::SearchSubmitted(city));
            controller.settle().await;

            if let Some(index) = day {
                let timestamp = controller
                    .state()
                    .selection
                    .summaries()
                    .get(index)
                    .map(|entry| entry.timestamp);
                match timestamp {
                    Some(ts) => controller.dispatch(Event::DaySelected(ts)),
                    None if controller.state().has_weather() => {
                        bail!(
                            "Day {} is out of range (0..{})",
                            index,
                            controller.state().selection.summaries().len()
                        )
                    }
                    None => {}
                }
            }
            print_page(controller, units);
        }
        Commands::Here { .. } => {
            controller.dispatch(Event::LocationRequested);
            controller.settle().await;
            print_page(controller, units);
        }
        Commands::Suggest { query } => {
            controller.dispatch(Event::SearchInputChanged(query));
            controller.settle().await;
            for suggestion in &controller.state().suggestions {
                println!("{}, {}", suggestion.name, suggestion.country_code);
            }
        }
        Commands::Theme { choice } => {
            let current = controller.state().theme;
            let wanted = match choice {
                None => current,
                Some(ThemeChoice::Light) => Theme::Light,
                Some(ThemeChoice::Dark) => Theme::Dark,
                Some(ThemeChoice::Toggle) => current.toggled(),
            };
            if wanted != current {
                controller.dispatch(Event::ThemeToggled);
            }
            println!("{}", controller.state().theme.as_str());
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    sunday_core::init()?;

    let mut app = App::new()?;
    app.initialize()?;

    let units = units_for(app.config().weather.temperature_unit);
    let position = match &cli.command {
        Commands::Here {
            lat: Some(lat),
            lon: Some(lon),
        } => Some((*lat, *lon)),
        _ => None,
    };
    let services = build_services(app.config(), position)?;

    let mut controller = Controller::new(
        AppState::with_theme(app.theme()),
        services,
        Handle::current(),
        Box::new(app),
        StdRng::from_entropy(),
    );

    let outcome = run(&mut controller, cli.command, units).await;
    controller.shutdown()?;
    outcome?;

    tracing::info!("SUNDAY finished");
    Ok(())
}
