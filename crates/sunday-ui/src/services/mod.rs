pub mod weather_service;

pub use weather_service::{
    request_city_fetch, request_coords_fetch, request_location, request_suggestions,
    WeatherServiceError, WeatherServiceMessage, WeatherServices,
};
