//! Settings management for CLI set/unset commands.
//!
//! Each key has a handler that validates input and edits a [`Config`]; the
//! registry loads the file, applies the change and writes it back.

pub mod error;
pub mod handlers;

pub use error::SettingError;

use std::collections::HashMap;
use std::path::Path;

use crate::core::config::data::Config;

use handlers::{
    clai_api_url_handler, default_model_handler, diagnostics_log_handler,
    priority_encoding_handler, rate_limit_retry_handler, task_api_url_handler, theme_handler,
};

/// Trait for handling a configuration setting.
pub trait SettingHandler: Send + Sync {
    /// Returns the configuration key this handler manages.
    fn key(&self) -> &'static str;

    /// Validate `args` and store the value, returning a message to display.
    fn set(&self, args: &[String], config: &mut Config) -> Result<String, SettingError>;

    /// Clear the value, returning a message to display.
    fn unset(&self, config: &mut Config) -> String;

    /// Format the stored value for display.
    fn format(&self, config: &Config) -> String;
}

/// Registry of all available setting handlers.
pub struct SettingRegistry {
    handlers: HashMap<&'static str, Box<dyn SettingHandler>>,
    /// Keys in display order for `termdesk set` output.
    display_order: Vec<&'static str>,
}

impl SettingRegistry {
    pub fn new() -> Self {
        let mut registry = Self {
            handlers: HashMap::new(),
            display_order: Vec::new(),
        };

        registry.register(Box::new(task_api_url_handler()));
        registry.register(Box::new(clai_api_url_handler()));
        registry.register(Box::new(theme_handler()));
        registry.register(Box::new(default_model_handler()));
        registry.register(Box::new(priority_encoding_handler()));
        registry.register(Box::new(rate_limit_retry_handler()));
        registry.register(Box::new(diagnostics_log_handler()));

        registry
    }

    fn register(&mut self, handler: Box<dyn SettingHandler>) {
        let key = handler.key();
        self.display_order.push(key);
        self.handlers.insert(key, handler);
    }

    /// Look up a handler; `task_api_url` and `task-api-url` name the same key.
    pub fn get(&self, key: &str) -> Option<&dyn SettingHandler> {
        let normalized = key.trim().to_ascii_lowercase().replace('_', "-");
        self.handlers.get(normalized.as_str()).map(|h| h.as_ref())
    }

    pub fn keys_display_order(&self) -> &[&'static str] {
        &self.display_order
    }

    /// Stored values of every key, one line each.
    pub fn format_all(&self, config: &Config) -> Vec<String> {
        self.display_order
            .iter()
            .filter_map(|key| self.handlers.get(key))
            .map(|handler| handler.format(config))
            .collect()
    }

    pub fn set(&self, path: &Path, key: &str, args: &[String]) -> Result<String, SettingError> {
        let handler = self
            .get(key)
            .ok_or_else(|| SettingError::UnknownKey(key.to_string()))?;
        let mut config =
            Config::load_from_path(path).map_err(|e| SettingError::ConfigError(e.to_string()))?;
        let message = handler.set(args, &mut config)?;
        config
            .save_to_path(path)
            .map_err(|e| SettingError::ConfigError(e.to_string()))?;
        Ok(message)
    }

    pub fn unset(&self, path: &Path, key: &str) -> Result<String, SettingError> {
        let handler = self
            .get(key)
            .ok_or_else(|| SettingError::UnknownKey(key.to_string()))?;
        Config::mutate_at(path, |config| handler.unset(config))
            .map_err(|e| SettingError::ConfigError(e.to_string()))
    }
}

impl Default for SettingRegistry {
    fn default() -> Self {
        Self::new()
    }
}
