//! OpenWeather 5 day / 3 hour forecast client.

use crate::types::{CityInfo, ForecastEntry, ForecastSeries, Units, WeatherError};
use reqwest::Client;
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::instrument;

pub const OPENWEATHER_URL: &str = "https://api.openweathermap.org/data/2.5";
pub(crate) const DEFAULT_TIMEOUT_SECS: u64 = 10;
pub(crate) const USER_AGENT: &str = concat!("SUNDAY/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Deserialize)]
struct ApiForecastResponse {
    list: Vec<ApiForecastItem>,
    city: ApiCity,
}

#[derive(Debug, Deserialize)]
struct ApiForecastItem {
    dt: i64,
    main: ApiMain,
    #[serde(default)]
    weather: Vec<ApiWeather>,
    wind: ApiWind,
    dt_txt: String,
}

#[derive(Debug, Deserialize)]
struct ApiMain {
    temp: f64,
    feels_like: f64,
    humidity: u8,
    pressure: u32,
}

#[derive(Debug, Deserialize)]
struct ApiWeather {
    main: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    icon: String,
}

#[derive(Debug, Deserialize)]
struct ApiWind {
    speed: f64,
}

#[derive(Debug, Deserialize)]
struct ApiCity {
    name: String,
    #[serde(default)]
    country: String,
    #[serde(default)]
    sunrise: i64,
    #[serde(default)]
    sunset: i64,
    #[serde(default)]
    timezone: i32,
}

impl From<ApiForecastItem> for ForecastEntry {
    fn from(item: ApiForecastItem) -> Self {
        // Only the primary condition is kept
        let (condition_main, condition_description, condition_icon) = item
            .weather
            .into_iter()
            .next()
            .map(|w| (w.main, w.description, w.icon))
            .unwrap_or_default();

        Self {
            timestamp: item.dt,
            temperature: item.main.temp,
            feels_like: item.main.feels_like,
            humidity: item.main.humidity,
            pressure: item.main.pressure,
            wind_speed: item.wind.speed,
            condition_main,
            condition_description,
            condition_icon,
            timestamp_text: item.dt_txt,
        }
    }
}

impl From<ApiCity> for CityInfo {
    fn from(city: ApiCity) -> Self {
        Self {
            name: city.name,
            country_code: city.country,
            sunrise: city.sunrise,
            sunset: city.sunset,
            utc_offset_seconds: city.timezone,
        }
    }
}

/// Build the shared HTTP client used by both API clients
pub(crate) fn http_client(timeout: Duration) -> Result<Client, reqwest::Error> {
    Client::builder()
        .timeout(timeout)
        .user_agent(USER_AGENT)
        .build()
}

/// Which request produced a response; decides the error kind
#[derive(Debug, Clone)]
enum Query {
    City(String),
    Coordinates,
}

#[derive(Debug, Clone)]
pub struct WeatherProvider {
    client: Arc<Client>,
    base_url: String,
    api_key: String,
    units: Units,
    language: String,
}

impl WeatherProvider {
    pub fn new(api_key: &str, units: Units) -> Result<Self, WeatherError> {
        Self::with_timeout(api_key, units, Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    pub fn with_timeout(
        api_key: &str,
        units: Units,
        timeout: Duration,
    ) -> Result<Self, WeatherError> {
        let client = http_client(timeout)?;

        Ok(Self {
            client: Arc::new(client),
            base_url: OPENWEATHER_URL.to_string(),
            api_key: api_key.to_string(),
            units,
            language: "en".to_string(),
        })
    }

    /// Point the provider at another host (mock servers, proxies)
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    pub fn with_language(mut self, language: &str) -> Self {
        self.language = language.to_string();
        self
    }

    /// Forecast for a city name; any non-success status is `CityNotFound`.
    #[instrument(skip(self), level = "info")]
    pub async fn fetch_by_city(&self, city: &str) -> Result<ForecastSeries, WeatherError> {
        let query = format!("q={}", urlencoding::encode(city));
        self.fetch(&query, Query::City(city.to_string())).await
    }

    /// Forecast for coordinates; any non-success status is `LocationFetchFailed`.
    #[instrument(skip(self), level = "info")]
    pub async fn fetch_by_coords(
        &self,
        latitude: f64,
        longitude: f64,
    ) -> Result<ForecastSeries, WeatherError> {
        let query = format!("lat={}&lon={}", latitude, longitude);
        self.fetch(&query, Query::Coordinates).await
    }

    async fn fetch(&self, query: &str, kind: Query) -> Result<ForecastSeries, WeatherError> {
        tracing::debug!("GET {}/forecast?{}", self.base_url, query);
        let url = format!(
            "{}/forecast?{}&appid={}&units={}&lang={}",
            self.base_url,
            query,
            urlencoding::encode(&self.api_key),
            self.units.query_value(),
            urlencoding::encode(&self.language),
        );

        let response = self.client.get(&url).send().await?;
        let status = response.status();

        if !status.is_success() {
            tracing::warn!("Forecast request returned status {}", status);
            return Err(match kind {
                Query::City(city) => WeatherError::CityNotFound {
                    city,
                    status: status.as_u16(),
                },
                Query::Coordinates => WeatherError::LocationFetchFailed {
                    status: status.as_u16(),
                },
            });
        }

        let body: ApiForecastResponse = response
            .json()
            .await
            .map_err(|e| WeatherError::Parse(format!("forecast body: {}", e)))?;

        if body.list.is_empty() {
            return Err(WeatherError::Parse("forecast list is empty".to_string()));
        }

        let series = ForecastSeries {
            entries: body.list.into_iter().map(ForecastEntry::from).collect(),
            city: body.city.into(),
        };
        tracing::info!(
            "Fetched {} forecast entries for {}",
            series.entries.len(),
            series.city.name
        );
        Ok(series)
    }
}
