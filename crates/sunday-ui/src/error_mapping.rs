//! Maps service failures to sunday_core::AppError for consistent user-facing messages.

use sunday_core::{AppError, WeatherError};
use sunday_weather::LocationError;

use crate::services::weather_service::WeatherServiceError;

impl From<WeatherServiceError> for AppError {
    fn from(e: WeatherServiceError) -> Self {
        match e {
            WeatherServiceError::CityLookup(s) => AppError::Weather(WeatherError::CityNotFound(s)),
            WeatherServiceError::CoordinateLookup(s) => {
                AppError::Weather(WeatherError::LocationFetchFailed(s))
            }
        }
    }
}

/// "No provider" and "provider refused or failed" read differently to the user
pub fn location_error(e: &LocationError) -> WeatherError {
    match e {
        LocationError::Unsupported => WeatherError::GeolocationUnsupported,
        other => WeatherError::GeolocationDenied(other.to_string()),
    }
}
