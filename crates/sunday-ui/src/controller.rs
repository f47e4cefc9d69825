//! Owns the page state and runs the commands the reducer asks for.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;
use rand::rngs::StdRng;
use sunday_core::{AppError, Theme};
use sunday_weather::PrecipitationLayer;
use tokio::runtime::Handle;
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};
use tokio::task::{JoinError, JoinSet};

use crate::services::{self, WeatherServiceMessage, WeatherServices};
use crate::state::{reduce, AppState, Command, Event};

/// Where the theme choice is persisted
pub trait PreferenceStore: Send {
    fn save_theme(&mut self, theme: Theme) -> anyhow::Result<()>;

    /// Called once when the controller shuts down
    fn close(&mut self) -> anyhow::Result<()> {
        Ok(())
    }
}

impl PreferenceStore for sunday_core::App {
    fn save_theme(&mut self, theme: Theme) -> anyhow::Result<()> {
        self.set_theme(theme)
    }

    fn close(&mut self) -> anyhow::Result<()> {
        self.shutdown()
    }
}

/// Keeps saved themes in memory; clones share the same record
#[derive(Debug, Clone, Default)]
pub struct MemoryPreferences {
    saved: Arc<Mutex<Vec<Theme>>>,
    closed: Arc<AtomicBool>,
}

impl MemoryPreferences {
    pub fn saved(&self) -> Vec<Theme> {
        self.saved.lock().clone()
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }
}

impl PreferenceStore for MemoryPreferences {
    fn save_theme(&mut self, theme: Theme) -> anyhow::Result<()> {
        self.saved.lock().push(theme);
        Ok(())
    }

    fn close(&mut self) -> anyhow::Result<()> {
        self.closed.store(true, Ordering::SeqCst);
        Ok(())
    }
}

pub struct Controller {
    state: AppState,
    services: WeatherServices,
    runtime: Handle,
    tx: UnboundedSender<WeatherServiceMessage>,
    rx: UnboundedReceiver<WeatherServiceMessage>,
    /// Requests started and not yet joined
    tasks: JoinSet<()>,
    precipitation: PrecipitationLayer,
    rng: StdRng,
    preferences: Box<dyn PreferenceStore>,
}

impl Controller {
    pub fn new(
        state: AppState,
        services: WeatherServices,
        runtime: Handle,
        preferences: Box<dyn PreferenceStore>,
        rng: StdRng,
    ) -> Self {
        let (tx, rx) = unbounded_channel();
        let mut controller = Self {
            state,
            services,
            runtime,
            tx,
            rx,
            tasks: JoinSet::new(),
            precipitation: PrecipitationLayer::new(),
            rng,
            preferences,
        };
        controller.sync_precipitation();
        controller
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn precipitation(&self) -> &PrecipitationLayer {
        &self.precipitation
    }

    pub fn is_idle(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Run one event through the reducer and start the resulting requests
    pub fn dispatch(&mut self, event: Event) {
        let state = std::mem::take(&mut self.state);
        let (state, commands) = reduce(state, event);
        self.state = state;
        self.sync_precipitation();

        for command in commands {
            self.execute(command);
        }
    }

    /// Apply every message that has already arrived; returns how many
    pub fn poll(&mut self) -> usize {
        while let Some(joined) = self.tasks.try_join_next() {
            self.reap(joined);
        }

        let mut handled = 0;
        while let Ok(message) = self.rx.try_recv() {
            self.handle(message);
            handled += 1;
        }
        handled
    }

    /// Wait until every started request, and the ones they started, finished
    pub async fn settle(&mut self) {
        loop {
            while let Ok(message) = self.rx.try_recv() {
                self.handle(message);
            }
            // A task sends its reply before it completes, so the drain above
            // has seen every reply of the tasks joined so far
            match self.tasks.join_next().await {
                Some(joined) => self.reap(joined),
                None => break,
            }
        }
    }

    /// Stop outstanding requests and close the preference store
    pub fn shutdown(mut self) -> anyhow::Result<()> {
        self.tasks.abort_all();
        self.preferences.close()
    }

    fn reap(&mut self, joined: Result<(), JoinError>) {
        if let Err(e) = joined {
            tracing::error!("Weather request ended without a reply: {}", e);
            self.dispatch(Event::RequestLost);
        }
    }

    fn handle(&mut self, message: WeatherServiceMessage) {
        let event = match message {
            WeatherServiceMessage::FetchDone(Ok(series)) => Event::WeatherLoaded(series),
            WeatherServiceMessage::FetchDone(Err(e)) => Event::WeatherFailed(AppError::from(e)),
            WeatherServiceMessage::SuggestionsDone(suggestions) => {
                Event::SuggestionsLoaded(suggestions)
            }
            WeatherServiceMessage::LocationDone(Ok(location)) => Event::LocationResolved(location),
            WeatherServiceMessage::LocationDone(Err(e)) => Event::LocationFailed(e),
        };
        self.dispatch(event);
    }

    fn execute(&mut self, command: Command) {
        match command {
            Command::FetchByCity(city) => services::request_city_fetch(
                &self.tx,
                &mut self.tasks,
                &self.runtime,
                self.services.provider.clone(),
                city,
            ),
            Command::FetchByCoords {
                latitude,
                longitude,
            } => services::request_coords_fetch(
                &self.tx,
                &mut self.tasks,
                &self.runtime,
                self.services.provider.clone(),
                latitude,
                longitude,
            ),
            Command::FetchSuggestions(query) => services::request_suggestions(
                &self.tx,
                &mut self.tasks,
                &self.runtime,
                self.services.suggestions.clone(),
                query,
            ),
            Command::Locate => services::request_location(
                &self.tx,
                &mut self.tasks,
                &self.runtime,
                self.services.geolocator.clone(),
            ),
            Command::PersistTheme(theme) => {
                if let Err(e) = self.preferences.save_theme(theme) {
                    tracing::warn!("Failed to save theme: {}", e);
                }
            }
        }
    }

    fn sync_precipitation(&mut self) {
        let condition = self.state.condition_label();
        self.precipitation
            .observe(condition.as_deref(), &mut self.rng);
    }
}
