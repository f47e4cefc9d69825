//! Page logic for SUNDAY: state, transitions, request plumbing and rendering.

pub mod controller;
pub mod error_mapping;
pub mod services;
pub mod state;
pub mod view;

pub use controller::{Controller, MemoryPreferences, PreferenceStore};
pub use services::{WeatherServiceMessage, WeatherServices};
pub use state::{body_classes, reduce, AppState, Command, Event};
