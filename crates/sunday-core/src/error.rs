//! Error types for SUNDAY.
//!
//! Each variant carries the detail for logs, and `user_message()` gives the
//! text the page shows.

use thiserror::Error;

/// Top-level application error type.
///
/// Use `user_message()` to get a UI-appropriate message.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Weather service error: {0}")]
    Weather(#[from] WeatherError),
}

impl AppError {
    /// Returns a user-friendly message suitable for display in the UI.
    pub fn user_message(&self) -> &'static str {
        match self {
            AppError::Weather(e) => e.user_message(),
        }
    }
}

/// Weather lookup errors, one per failure the page can report.
#[derive(Debug, Error)]
pub enum WeatherError {
    #[error("City not found: {0}")]
    CityNotFound(String),

    #[error("Weather lookup by coordinates failed: {0}")]
    LocationFetchFailed(String),

    #[error("Geolocation is not supported")]
    GeolocationUnsupported,

    #[error("Geolocation denied or unavailable: {0}")]
    GeolocationDenied(String),

    #[error("City suggestion lookup failed: {0}")]
    SuggestionFetchFailed(String),
}

impl WeatherError {
    pub fn user_message(&self) -> &'static str {
        match self {
            WeatherError::CityNotFound(_) => "City not found. Please try again.",
            WeatherError::LocationFetchFailed(_) => "Could not fetch weather for your location.",
            WeatherError::GeolocationUnsupported => {
                "Geolocation is not supported on this device."
            }
            WeatherError::GeolocationDenied(_) => "Unable to retrieve your location.",
            WeatherError::SuggestionFetchFailed(_) => "City suggestions are unavailable.",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_messages_are_non_empty() {
        let errors = vec![
            WeatherError::CityNotFound("x".into()),
            WeatherError::LocationFetchFailed("x".into()),
            WeatherError::GeolocationUnsupported,
            WeatherError::GeolocationDenied("x".into()),
            WeatherError::SuggestionFetchFailed("x".into()),
        ];

        for err in errors {
            let app_err = AppError::from(err);
            assert!(!app_err.user_message().is_empty(), "empty message for {:?}", app_err);
        }
    }

    #[test]
    fn test_app_error_conversion() {
        let weather_err = WeatherError::GeolocationUnsupported;
        let app_err: AppError = weather_err.into();
        assert!(matches!(
            app_err,
            AppError::Weather(WeatherError::GeolocationUnsupported)
        ));
    }

    #[test]
    fn test_city_not_found_message() {
        let app_err = AppError::Weather(WeatherError::CityNotFound("Nonexistent1234".into()));
        assert_eq!(app_err.user_message(), "City not found. Please try again.");
    }

    #[test]
    fn test_location_messages() {
        assert_eq!(
            AppError::from(WeatherError::GeolocationUnsupported).user_message(),
            "Geolocation is not supported on this device."
        );
        assert_eq!(
            AppError::from(WeatherError::GeolocationDenied("denied".into())).user_message(),
            "Unable to retrieve your location."
        );
        assert_eq!(
            AppError::from(WeatherError::LocationFetchFailed("500".into())).user_message(),
            "Could not fetch weather for your location."
        );
    }

    #[test]
    fn test_display_keeps_detail_for_logs() {
        let app_err = AppError::from(WeatherError::CityNotFound("status 404".into()));
        assert!(app_err.to_string().contains("status 404"));
    }
}
