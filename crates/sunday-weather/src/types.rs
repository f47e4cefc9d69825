use serde::{Deserialize, Serialize};

/// Measurement system requested from OpenWeather
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Units {
    #[default]
    Metric,
    Imperial,
}

impl Units {
    /// Value of the `units` query parameter
    pub fn query_value(&self) -> &'static str {
        match self {
            Self::Metric => "metric",
            Self::Imperial => "imperial",
        }
    }

    pub fn temperature_suffix(&self) -> &'static str {
        match self {
            Self::Metric => "°C",
            Self::Imperial => "°F",
        }
    }

    pub fn wind_suffix(&self) -> &'static str {
        match self {
            Self::Metric => "m/s",
            Self::Imperial => "mph",
        }
    }
}

/// Weather condition groups reported in OpenWeather's `weather[].main`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum WeatherCondition {
    #[default]
    Clear,
    Clouds,
    Drizzle,
    Rain,
    Thunderstorm,
    Snow,
    Fog,
    Dust,
    Squall,
}

impl WeatherCondition {
    /// Map a `main` group name to a condition
    /// See: https://openweathermap.org/weather-conditions
    pub fn from_main(main: &str) -> Self {
        match main.to_lowercase().as_str() {
            "clear" => Self::Clear,
            "clouds" => Self::Clouds,
            "drizzle" => Self::Drizzle,
            "rain" => Self::Rain,
            "thunderstorm" => Self::Thunderstorm,
            "snow" => Self::Snow,
            "mist" | "fog" | "haze" | "smoke" => Self::Fog,
            "dust" | "sand" | "ash" => Self::Dust,
            "squall" | "tornado" => Self::Squall,
            _ => Self::Clear, // Unknown groups default to clear
        }
    }

    /// Get a human-readable description
    pub fn description(&self) -> &'static str {
        match self {
            Self::Clear => "Clear",
            Self::Clouds => "Cloudy",
            Self::Drizzle => "Drizzle",
            Self::Rain => "Rain",
            Self::Thunderstorm => "Thunderstorm",
            Self::Snow => "Snow",
            Self::Fog => "Fog",
            Self::Dust => "Dust",
            Self::Squall => "Squall",
        }
    }
}

/// Map an OpenWeather icon code ("01d", "10n", ...) to a symbolic icon name
pub fn icon_name(code: &str) -> &'static str {
    let night = code.ends_with('n');
    match code.get(..2).unwrap_or_default() {
        "01" if night => "moon",
        "01" => "sun",
        "02" if night => "cloud_moon",
        "02" => "cloud_sun",
        "03" | "04" => "cloud",
        "09" | "10" => "cloud_rain",
        "11" => "cloud_lightning",
        "13" => "cloud_snow",
        "50" => "cloud_fog",
        _ => "question",
    }
}

/// One 3-hour forecast slot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastEntry {
    /// Epoch seconds
    pub timestamp: i64,
    pub temperature: f64,
    pub feels_like: f64,
    pub humidity: u8,
    pub pressure: u32,
    pub wind_speed: f64,
    pub condition_main: String,
    pub condition_description: String,
    pub condition_icon: String,
    /// "YYYY-MM-DD HH:MM:SS" as sent by the API
    pub timestamp_text: String,
}

impl ForecastEntry {
    pub fn condition(&self) -> WeatherCondition {
        WeatherCondition::from_main(&self.condition_main)
    }
}

/// Entry chosen to represent one calendar day
pub type DailyForecast = ForecastEntry;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CityInfo {
    pub name: String,
    pub country_code: String,
    pub sunrise: i64,
    pub sunset: i64,
    pub utc_offset_seconds: i32,
}

/// Full multi-day forecast for one location
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastSeries {
    pub entries: Vec<ForecastEntry>,
    pub city: CityInfo,
}

/// Autocomplete entry for the search box
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CitySuggestion {
    pub id: String,
    pub name: String,
    pub country_code: String,
}

/// Geographic location
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub latitude: f64,
    pub longitude: f64,
    pub accuracy_meters: Option<f64>,
    pub city_name: Option<String>,
}

impl Location {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
            accuracy_meters: None,
            city_name: None,
        }
    }
}

/// Location service errors
#[derive(Debug, Clone, thiserror::Error)]
pub enum LocationError {
    #[error("No location provider available")]
    Unsupported,
    #[error("Location permission denied")]
    PermissionDenied,
    #[error("Location service unavailable")]
    ServiceUnavailable,
    #[error("Location request timed out")]
    Timeout,
    #[error("Location error: {0}")]
    Other(String),
}

impl LocationError {
    /// True when no provider exists, as opposed to one that declined or failed
    pub fn is_unsupported(&self) -> bool {
        matches!(self, Self::Unsupported)
    }
}

/// Weather and geocoding client errors
#[derive(Debug, thiserror::Error)]
pub enum WeatherError {
    #[error("City not found: {city} (status {status})")]
    CityNotFound { city: String, status: u16 },
    #[error("Could not fetch weather for coordinates (status {status})")]
    LocationFetchFailed { status: u16 },
    #[error("Suggestion fetch failed: {0}")]
    SuggestionFetchFailed(String),
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("Parse error: {0}")]
    Parse(String),
}
