//! Weather lookup for SUNDAY
//!
//! Forecasts from OpenWeather, city suggestions from OpenCage, the daily
//! forecast selector and the precipitation particle generator.

pub mod types;
pub mod geocode;
pub mod location;
pub mod precipitation;
pub mod provider;
pub mod selector;

pub use types::*;
pub use geocode::SuggestionClient;
pub use location::{Geolocator, StaticGeolocator};
pub use precipitation::{Particle, ParticleKind, PrecipitationLayer};
pub use provider::WeatherProvider;
pub use selector::{LoadedForecast, SelectionState};
