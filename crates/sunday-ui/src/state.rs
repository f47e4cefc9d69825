//! Page state and its transitions.
//!
//! `reduce` is the only writer: every user action and every finished request
//! arrives as an `Event` and yields the next state plus the requests to start.

use sunday_core::{AppError, Theme};
use sunday_weather::selector::SelectionState;
use sunday_weather::{CitySuggestion, ForecastSeries, Location, LocationError};

use crate::error_mapping::location_error;

/// Shortest search term that triggers suggestions
pub const MIN_SUGGESTION_QUERY: usize = 2;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AppState {
    pub theme: Theme,
    pub menu_open: bool,
    pub selection: SelectionState,
    pub suggestions: Vec<CitySuggestion>,
    pub search_term: String,
    pub loading: bool,
    /// Single slot, replaced by each failure and cleared by each new search
    pub error: Option<String>,
}

impl AppState {
    pub fn with_theme(theme: Theme) -> Self {
        Self {
            theme,
            ..Self::default()
        }
    }

    pub fn has_weather(&self) -> bool {
        self.selection.loaded().is_some()
    }

    /// Lower-cased condition of the selected day
    pub fn condition_label(&self) -> Option<String> {
        self.selection.condition_label()
    }

    fn begin_search(&mut self) {
        self.loading = true;
        self.error = None;
        self.suggestions.clear();
        self.search_term.clear();
    }
}

#[derive(Debug)]
pub enum Event {
    ThemeToggled,
    MenuToggled,
    MenuClosed,
    SearchInputChanged(String),
    SearchSubmitted(String),
    SuggestionPicked(CitySuggestion),
    LocationRequested,
    LocationResolved(Location),
    LocationFailed(LocationError),
    WeatherLoaded(ForecastSeries),
    WeatherFailed(AppError),
    SuggestionsLoaded(Vec<CitySuggestion>),
    DaySelected(i64),
    /// A request task ended without replying
    RequestLost,
}

/// Side effects requested by a transition
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    FetchByCity(String),
    FetchByCoords { latitude: f64, longitude: f64 },
    FetchSuggestions(String),
    Locate,
    PersistTheme(Theme),
}

/// Apply `event` to `state`.
pub fn reduce(mut state: AppState, event: Event) -> (AppState, Vec<Command>) {
    let mut commands = Vec::new();

    match event {
        Event::ThemeToggled => {
            state.theme = state.theme.toggled();
            commands.push(Command::PersistTheme(state.theme));
        }
        Event::MenuToggled => state.menu_open = !state.menu_open,
        Event::MenuClosed => state.menu_open = false,
        Event::SearchInputChanged(term) => {
            if term.chars().count() < MIN_SUGGESTION_QUERY {
                state.suggestions.clear();
            } else {
                commands.push(Command::FetchSuggestions(term.clone()));
            }
            state.search_term = term;
        }
        Event::SearchSubmitted(city) => {
            let city = city.trim().to_string();
            if !city.is_empty() {
                state.begin_search();
                commands.push(Command::FetchByCity(city));
            }
        }
        Event::SuggestionPicked(suggestion) => {
            state.begin_search();
            commands.push(Command::FetchByCity(suggestion.name));
        }
        Event::LocationRequested => {
            state.loading = true;
            state.error = None;
            commands.push(Command::Locate);
        }
        Event::LocationResolved(location) => {
            commands.push(Command::FetchByCoords {
                latitude: location.latitude,
                longitude: location.longitude,
            });
        }
        Event::LocationFailed(e) => {
            tracing::warn!("Location unavailable: {}", e);
            state.error = Some(location_error(&e).user_message().to_string());
            state.loading = false;
        }
        Event::WeatherLoaded(series) => {
            state.loading = false;
            match SelectionState::load(series) {
                SelectionState::Empty => {
                    tracing::warn!("Ignoring forecast without entries");
                }
                loaded => state.selection = loaded,
            }
        }
        Event::WeatherFailed(e) => {
            tracing::error!("Failed to fetch weather: {}", e);
            state.error = Some(e.user_message().to_string());
            state.loading = false;
        }
        Event::SuggestionsLoaded(suggestions) => state.suggestions = suggestions,
        Event::DaySelected(timestamp) => {
            state.selection.select(timestamp);
        }
        Event::RequestLost => state.loading = false,
    }

    (state, commands)
}

/// Page-level style classes derived from the state
pub fn body_classes(state: &AppState) -> Vec<String> {
    let mut classes = Vec::new();
    if state.theme == Theme::Dark {
        classes.push("dark-mode".to_string());
    }
    if state.menu_open {
        classes.push("menu-open".to_string());
    }
    if let Some(condition) = state.condition_label() {
        classes.push(condition);
    }
    classes
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
    use super::*;
    use sunday_core::WeatherError;
    use sunday_weather::{CityInfo, ForecastEntry};

    fn entry(timestamp: i64, text: &str, main: &str) -> ForecastEntry {
        ForecastEntry {
            timestamp,
            temperature: 11.6,
            feels_like: 10.2,
            humidity: 80,
            pressure: 1009,
            wind_speed: 5.25,
            condition_main: main.to_string(),
            condition_description: String::new(),
            condition_icon: "10d".to_string(),
            timestamp_text: text.to_string(),
        }
    }

    fn series(name: &str, entries: Vec<ForecastEntry>) -> ForecastSeries {
        ForecastSeries {
            entries,
            city: CityInfo {
                name: name.to_string(),
                country_code: "GB".to_string(),
                sunrise: 0,
                sunset: 0,
                utc_offset_seconds: 0,
            },
        }
    }

    fn london() -> ForecastSeries {
        series(
            "London",
            vec![
                entry(1, "2025-06-01 09:00:00", "Clouds"),
                entry(2, "2025-06-01 12:00:00", "Rain"),
                entry(3, "2025-06-02 12:00:00", "Snow"),
            ],
        )
    }

    fn apply(state: AppState, event: Event) -> AppState {
        reduce(state, event).0
    }

    #[test]
    fn test_submit_empty_does_nothing() {
        let (state, commands) = reduce(AppState::default(), Event::SearchSubmitted("  ".into()));
        assert_eq!(state, AppState::default());
        assert!(commands.is_empty());
    }

    #[test]
    fn test_submit_starts_city_fetch() {
        let mut before = AppState::default();
        before.error = Some("old".into());
        before.search_term = "Lon".into();
        before.suggestions = vec![CitySuggestion {
            id: "g".into(),
            name: "London".into(),
            country_code: "UK".into(),
        }];

        let (state, commands) = reduce(before, Event::SearchSubmitted("London".into()));
        assert!(state.loading);
        assert!(state.error.is_none());
        assert!(state.suggestions.is_empty());
        assert!(state.search_term.is_empty());
        assert_eq!(commands, vec![Command::FetchByCity("London".into())]);
    }

    #[test]
    fn test_suggestion_pick_searches_its_name() {
        let pick = CitySuggestion {
            id: "gcpvj".into(),
            name: "London".into(),
            country_code: "United Kingdom".into(),
        };
        let (_, commands) = reduce(AppState::default(), Event::SuggestionPicked(pick));
        assert_eq!(commands, vec![Command::FetchByCity("London".into())]);
    }

    #[test]
    fn test_weather_loaded_selects_first_noon() {
        let state = apply(AppState::default(), Event::SearchSubmitted("London".into()));
        let state = apply(state, Event::WeatherLoaded(london()));
        assert!(!state.loading);
        assert_eq!(state.selection.selected().unwrap().timestamp, 2);
        assert_eq!(state.selection.summaries().len(), 2);
        assert_eq!(state.condition_label().as_deref(), Some("rain"));
    }

    #[test]
    fn test_failure_keeps_prior_weather() {
        let state = apply(AppState::default(), Event::WeatherLoaded(london()));
        let state = apply(state, Event::DaySelected(3));
        let before = state.selection.clone();

        let state = apply(state, Event::SearchSubmitted("Nonexistent1234".into()));
        let state = apply(
            state,
            Event::WeatherFailed(AppError::Weather(WeatherError::CityNotFound(
                "Nonexistent1234".into(),
            ))),
        );

        assert_eq!(state.error.as_deref(), Some("City not found. Please try again."));
        assert!(!state.loading);
        assert_eq!(state.selection, before);
    }

    #[test]
    fn test_new_series_resets_selection() {
        let state = apply(AppState::default(), Event::WeatherLoaded(london()));
        let state = apply(state, Event::DaySelected(3));
        let paris = series("Paris", vec![entry(100, "2025-06-05 12:00:00", "Clear")]);
        let state = apply(state, Event::WeatherLoaded(paris));
        assert_eq!(state.selection.selected().unwrap().timestamp, 100);
    }

    #[test]
    fn test_empty_series_keeps_state() {
        let state = apply(AppState::default(), Event::WeatherLoaded(london()));
        let state = apply(state, Event::WeatherLoaded(series("Void", vec![])));
        assert_eq!(
            state.selection.loaded().unwrap().series().city.name,
            "London"
        );
    }

    #[test]
    fn test_day_selected_unknown_is_noop() {
        let state = apply(AppState::default(), Event::WeatherLoaded(london()));
        // Timestamp 1 is in the series but not a daily summary
        let after = apply(state.clone(), Event::DaySelected(1));
        assert_eq!(after, state);
    }

    #[test]
    fn test_input_change_fetches_suggestions_from_two_chars() {
        let (state, commands) = reduce(AppState::default(), Event::SearchInputChanged("L".into()));
        assert_eq!(state.search_term, "L");
        assert!(commands.is_empty());

        let (state, commands) = reduce(state, Event::SearchInputChanged("Lo".into()));
        assert_eq!(commands, vec![Command::FetchSuggestions("Lo".into())]);

        let state = apply(
            state,
            Event::SuggestionsLoaded(vec![CitySuggestion {
                id: "g".into(),
                name: "Lome".into(),
                country_code: "Togo".into(),
            }]),
        );
        let state = apply(state, Event::SearchInputChanged("L".into()));
        assert!(state.suggestions.is_empty());
    }

    #[test]
    fn test_location_flow() {
        let (state, commands) = reduce(AppState::default(), Event::LocationRequested);
        assert!(state.loading);
        assert_eq!(commands, vec![Command::Locate]);

        let (state, commands) = reduce(state, Event::LocationResolved(Location::new(51.5, -0.12)));
        assert!(state.loading);
        assert_eq!(
            commands,
            vec![Command::FetchByCoords {
                latitude: 51.5,
                longitude: -0.12
            }]
        );
    }

    #[test]
    fn test_location_failures() {
        let state = apply(AppState::default(), Event::LocationRequested);
        let unsupported = apply(state.clone(), Event::LocationFailed(LocationError::Unsupported));
        assert_eq!(
            unsupported.error.as_deref(),
            Some("Geolocation is not supported on this device.")
        );
        assert!(!unsupported.loading);

        let denied = apply(state, Event::LocationFailed(LocationError::PermissionDenied));
        assert_eq!(denied.error.as_deref(), Some("Unable to retrieve your location."));
    }

    #[test]
    fn test_theme_toggle_persists() {
        let (state, commands) = reduce(AppState::default(), Event::ThemeToggled);
        assert_eq!(state.theme, Theme::Dark);
        assert_eq!(commands, vec![Command::PersistTheme(Theme::Dark)]);
    }

    #[test]
    fn test_menu() {
        let state = apply(AppState::default(), Event::MenuToggled);
        assert!(state.menu_open);
        let state = apply(state, Event::MenuClosed);
        assert!(!state.menu_open);
    }

    #[test]
    fn test_body_classes() {
        assert!(body_classes(&AppState::default()).is_empty());

        let mut state = apply(AppState::with_theme(Theme::Dark), Event::WeatherLoaded(london()));
        state.menu_open = true;
        assert_eq!(body_classes(&state), vec!["dark-mode", "menu-open", "rain"]);
    }

    #[test]
    fn test_lost_request_stops_loading() {
        let state = apply(AppState::default(), Event::WeatherLoaded(london()));
        let state = apply(state, Event::SearchSubmitted("Paris".into()));
        assert!(state.loading);

        let state = apply(state, Event::RequestLost);
        assert!(!state.loading);
        assert!(state.error.is_none());
        assert!(state.has_weather());
    }
}
