use anyhow::Result;

use crate::{Config, Theme};

/// Main application state and lifecycle manager
pub struct App {
    config: Config,
}

impl App {
    /// Create a new application instance from the user's config file
    pub fn new() -> Result<Self> {
        let (config, _) = Config::load_validated()?;
        Ok(Self::with_config(config))
    }

    /// Create an application around an already loaded config
    pub fn with_config(config: Config) -> Self {
        Self { config }
    }

    /// Log startup details
    pub fn initialize(&mut self) -> Result<()> {
        tracing::info!(
            "Initializing application (config: {}, theme: {})",
            self.config.config_path().display(),
            self.config.ui.theme.as_str()
        );
        Ok(())
    }

    /// Current theme preference
    pub fn theme(&self) -> Theme {
        self.config.ui.theme
    }

    /// Change the theme and persist it to the config file
    pub fn set_theme(&mut self, theme: Theme) -> Result<()> {
        if self.config.ui.theme == theme {
            return Ok(());
        }
        tracing::info!("Switching theme to {}", theme.as_str());
        self.config.ui.theme = theme;
        self.config.save()
    }

    /// Shutdown the application
    pub fn shutdown(&mut self) -> Result<()> {
        tracing::info!("Shutting down application");
        Ok(())
    }

    /// Get reference to application config
    pub fn config(&self) -> &Config {
        &self.config
    }
}
