//! Weather backend: async forecast, suggestion and location requests.
//! All network work runs on the tokio runtime; results come back as messages.
//! Each request is spawned into the caller's `JoinSet`, so a task that dies
//! before replying is still noticed.
//!
//! Requests are never cancelled or de-duplicated. Whichever finishes last is
//! the one the page ends up showing.

use std::sync::Arc;

use sunday_weather::{
    CitySuggestion, ForecastSeries, Geolocator, Location, LocationError, SuggestionClient,
    WeatherProvider,
};
use tokio::runtime::Handle;
use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinSet;

/// Error type for forecast requests, keyed by how the lookup was made
#[derive(Debug, Clone)]
pub enum WeatherServiceError {
    CityLookup(String),
    CoordinateLookup(String),
}

impl std::fmt::Display for WeatherServiceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WeatherServiceError::CityLookup(s) => write!(f, "City lookup failed: {}", s),
            WeatherServiceError::CoordinateLookup(s) => {
                write!(f, "Coordinate lookup failed: {}", s)
            }
        }
    }
}

impl std::error::Error for WeatherServiceError {}

/// Messages sent from async operations back to the controller
#[derive(Debug)]
pub enum WeatherServiceMessage {
    /// Result of a forecast request
    FetchDone(Result<ForecastSeries, WeatherServiceError>),
    /// Suggestions for the search box; failures arrive as an empty list
    SuggestionsDone(Vec<CitySuggestion>),
    /// Result of asking the geolocator
    LocationDone(Result<Location, LocationError>),
}

/// Clients used by the service
#[derive(Clone)]
pub struct WeatherServices {
    pub provider: Arc<WeatherProvider>,
    pub suggestions: Arc<SuggestionClient>,
    pub geolocator: Arc<dyn Geolocator>,
}

/// Fetch the forecast for a city name. Sends `FetchDone` when complete.
pub fn request_city_fetch(
    tx: &UnboundedSender<WeatherServiceMessage>,
    tasks: &mut JoinSet<()>,
    runtime: &Handle,
    provider: Arc<WeatherProvider>,
    city: String,
) {
    let tx = tx.clone();
    let task = async move {
        // Every failure of a name search reads as "not found"
        let result = provider
            .fetch_by_city(&city)
            .await
            .map_err(|e| WeatherServiceError::CityLookup(e.to_string()));
        let _ = tx.send(WeatherServiceMessage::FetchDone(result));
    };
    tasks.spawn_on(task, runtime);
}

/// Fetch the forecast for coordinates. Sends `FetchDone` when complete.
pub fn request_coords_fetch(
    tx: &UnboundedSender<WeatherServiceMessage>,
    tasks: &mut JoinSet<()>,
    runtime: &Handle,
    provider: Arc<WeatherProvider>,
    latitude: f64,
    longitude: f64,
) {
    let tx = tx.clone();
    let task = async move {
        let result = provider
            .fetch_by_coords(latitude, longitude)
            .await
            .map_err(|e| WeatherServiceError::CoordinateLookup(e.to_string()));
        let _ = tx.send(WeatherServiceMessage::FetchDone(result));
    };
    tasks.spawn_on(task, runtime);
}

/// Fetch suggestions for a partial city name. Sends `SuggestionsDone`.
pub fn request_suggestions(
    tx: &UnboundedSender<WeatherServiceMessage>,
    tasks: &mut JoinSet<()>,
    runtime: &Handle,
    client: Arc<SuggestionClient>,
    query: String,
) {
    let tx = tx.clone();
    let task = async move {
        let suggestions = client.fetch_suggestions(&query).await;
        let _ = tx.send(WeatherServiceMessage::SuggestionsDone(suggestions));
    };
    tasks.spawn_on(task, runtime);
}

/// Ask the geolocator for the current position. Sends `LocationDone`.
pub fn request_location(
    tx: &UnboundedSender<WeatherServiceMessage>,
    tasks: &mut JoinSet<()>,
    runtime: &Handle,
    geolocator: Arc<dyn Geolocator>,
) {
    let tx = tx.clone();
    let task = async move {
        let result = geolocator.current_location().await;
        match &result {
            Ok(loc) => tracing::info!("Got location: {}, {}", loc.latitude, loc.longitude),
            Err(e) => tracing::warn!("Location request failed: {}", e),
        }
        let _ = tx.send(WeatherServiceMessage::LocationDone(result));
    };
    tasks.spawn_on(task, runtime);
}
