//! Plain-text rendering of the page.

use std::fmt::Write;

use chrono::{DateTime, FixedOffset, Utc};
use sunday_weather::precipitation::PrecipitationLayer;
use sunday_weather::{icon_name, CityInfo, Units};

use crate::state::{body_classes, AppState};

const WELCOME: &str = "Find your weather";

/// City-local clock for epoch seconds
fn local_time(epoch: i64, city: &CityInfo) -> Option<DateTime<FixedOffset>> {
    let offset = FixedOffset::east_opt(city.utc_offset_seconds)?;
    DateTime::from_timestamp(epoch, 0).map(|t| t.with_timezone(&offset))
}

fn hh_mm(epoch: i64, city: &CityInfo) -> String {
    local_time(epoch, city)
        .map(|t| t.format("%H:%M").to_string())
        .unwrap_or_else(|| "--:--".to_string())
}

fn weekday(epoch: i64, city: &CityInfo) -> String {
    local_time(epoch, city)
        .map(|t| t.format("%a").to_string())
        .unwrap_or_default()
}

/// Render the page as of `now`.
pub fn render(
    state: &AppState,
    precipitation: &PrecipitationLayer,
    units: Units,
    now: DateTime<Utc>,
) -> String {
    let mut out = String::new();
    let classes = body_classes(state);
    let _ = writeln!(out, "SUNDAY [{}]", classes.join(" "));

    if state.menu_open {
        let _ = writeln!(out, "  NEWS | WEATHER | MAPS | APPS");
    }

    let loaded = state.selection.loaded();
    match loaded {
        None => {
            let _ = writeln!(out, "{}", WELCOME);
        }
        Some(loaded) => {
            let city = &loaded.series().city;
            let _ = writeln!(out, "{}", city.country_code);
            let _ = writeln!(out, "{}", city.name);
        }
    }

    for suggestion in &state.suggestions {
        let _ = writeln!(out, "  > {}, {}", suggestion.name, suggestion.country_code);
    }
    if state.loading {
        let _ = writeln!(out, "Loading...");
    }
    if let Some(error) = &state.error {
        let _ = writeln!(out, "{}", error);
    }

    let Some(loaded) = loaded else {
        return out;
    };
    let city = &loaded.series().city;
    let selected = loaded.selected();
    let temp = units.temperature_suffix();

    let _ = writeln!(out);
    for day in loaded.summaries() {
        let marker = if day.timestamp == selected.timestamp { "*" } else { " " };
        let _ = writeln!(
            out,
            "{} {:<4} {:<16} {}{}",
            marker,
            weekday(day.timestamp, city),
            icon_name(&day.condition_icon),
            day.temperature.round() as i64,
            temp
        );
    }

    let _ = writeln!(out);
    let _ = writeln!(out, "Condition   {}", selected.condition().description());
    let _ = writeln!(
        out,
        "Wind        {:.1} {}",
        selected.wind_speed,
        units.wind_suffix()
    );
    let _ = writeln!(out, "Humidity    {} %", selected.humidity);
    let _ = writeln!(out, "Sunrise     {}", hh_mm(city.sunrise, city));
    let _ = writeln!(out, "Sunset      {}", hh_mm(city.sunset, city));
    let _ = writeln!(
        out,
        "Feels Like  {} {}",
        selected.feels_like.round() as i64,
        temp
    );
    let _ = writeln!(out, "Pressure    {} hPa", selected.pressure);

    let _ = writeln!(out);
    let _ = writeln!(out, "Local Time: {}", hh_mm(now.timestamp(), city));

    if let Some(first) = precipitation.particles().first() {
        let _ = writeln!(
            out,
            "({} {} particles)",
            precipitation.particles().len(),
            first.kind.class_name()
        );
    }

    out
}
