//! Daily summaries and the selected day.
//!
//! A day is represented by its entry whose timestamp text contains
//! `"12:00:00"`. The comparison is against the API's text and ignores the
//! city's own solar noon.

use crate::types::{DailyForecast, ForecastEntry, ForecastSeries};

/// Marker that picks the representative entry of a day
pub const DAILY_MARKER: &str = "12:00:00";

/// Width of the forecast strip
pub const MAX_DAILY_SUMMARIES: usize = 5;

/// Noon entries of `series`, in received order, at most five.
///
/// May be empty when the series has no noon slot at all.
pub fn derive_daily_summaries(series: &ForecastSeries) -> Vec<DailyForecast> {
    series
        .entries
        .iter()
        .filter(|entry| entry.timestamp_text.contains(DAILY_MARKER))
        .take(MAX_DAILY_SUMMARIES)
        .cloned()
        .collect()
}

/// First daily summary, else the first raw entry.
pub fn initial_selection(series: &ForecastSeries) -> Option<DailyForecast> {
    derive_daily_summaries(series)
        .into_iter()
        .next()
        .or_else(|| series.entries.first().cloned())
}

/// Summary whose timestamp equals `chosen_timestamp`.
pub fn select(summaries: &[DailyForecast], chosen_timestamp: i64) -> Option<DailyForecast> {
    summaries
        .iter()
        .find(|entry| entry.timestamp == chosen_timestamp)
        .cloned()
}

/// Lower-cased primary condition of the selection, input of the particle layer.
pub fn condition_label(selected: Option<&ForecastEntry>) -> Option<String> {
    selected.map(|entry| entry.condition_main.to_lowercase())
}

/// A loaded series together with its strip and the selected day
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedForecast {
    series: ForecastSeries,
    summaries: Vec<DailyForecast>,
    selected: DailyForecast,
}

impl LoadedForecast {
    pub fn series(&self) -> &ForecastSeries {
        &self.series
    }

    pub fn summaries(&self) -> &[DailyForecast] {
        &self.summaries
    }

    pub fn selected(&self) -> &DailyForecast {
        &self.selected
    }
}

/// Either nothing loaded, or a series with exactly one selected day.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum SelectionState {
    #[default]
    Empty,
    Loaded(LoadedForecast),
}

impl SelectionState {
    /// State for a freshly fetched series; any previous selection is dropped.
    ///
    /// An empty series has nothing to select and yields `Empty`.
    pub fn load(series: ForecastSeries) -> Self {
        match initial_selection(&series) {
            Some(selected) => {
                let summaries = derive_daily_summaries(&series);
                tracing::debug!(
                    "Loaded {} entries for {}, {} daily summaries, selected {}",
                    series.entries.len(),
                    series.city.name,
                    summaries.len(),
                    selected.timestamp_text
                );
                Self::Loaded(LoadedForecast {
                    series,
                    summaries,
                    selected,
                })
            }
            None => Self::Empty,
        }
    }

    /// Move the selection to the summary at `chosen_timestamp`.
    ///
    /// Returns false and leaves the state untouched when no summary matches.
    pub fn select(&mut self, chosen_timestamp: i64) -> bool {
        let Self::Loaded(loaded) = self else {
            return false;
        };
        match select(&loaded.summaries, chosen_timestamp) {
            Some(entry) => {
                loaded.selected = entry;
                true
            }
            None => {
                tracing::warn!(
                    "Ignoring selection of {} which is not in the current forecast",
                    chosen_timestamp
                );
                false
            }
        }
    }

    pub fn loaded(&self) -> Option<&LoadedForecast> {
        match self {
            Self::Loaded(loaded) => Some(loaded),
            Self::Empty => None,
        }
    }

    pub fn selected(&self) -> Option<&DailyForecast> {
        self.loaded().map(LoadedForecast::selected)
    }

    pub fn summaries(&self) -> &[DailyForecast] {
        self.loaded().map(LoadedForecast::summaries).unwrap_or(&[])
    }

    pub fn condition_label(&self) -> Option<String> {
        condition_label(self.selected())
    }
}
