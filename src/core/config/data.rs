use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::api::tasks::PriorityEncoding;

/// Contents of `config.toml`. Every field is optional; unset values fall back
/// to the environment and then to built-in defaults.
#[derive(Debug, Serialize, Deserialize, Default, Clone, PartialEq, Eq)]
pub struct Config {
    /// Base URL of the task service, including its `/api` prefix.
    pub task_api_url: Option<String>,
    /// Base URL of the chat session service.
    pub clai_api_url: Option<String>,
    /// UI theme name ("dark" or "light").
    pub theme: Option<String>,
    /// Model reported as current when a session has none.
    pub default_model: Option<String>,
    /// How task priorities are written on create and update.
    pub priority_encoding: Option<PriorityEncoding>,
    /// Retry a rate-limited request once after the advertised delay.
    pub rate_limit_retry: Option<bool>,
    /// File receiving tracing diagnostics.
    pub diagnostics_log: Option<PathBuf>,
}

/// Get a user-friendly display string for a path
/// Converts absolute paths to use ~ notation on Unix-like systems when possible
///
/// # Examples
/// - Unix: `/home/user/.config/termdesk/config.toml` → `~/.config/termdesk/config.toml`
/// - Windows: paths are shown unchanged
pub fn path_display<P: AsRef<Path>>(path: P) -> String {
    let path = path.as_ref();

    #[cfg(unix)]
    {
        if let Some(home) = std::env::var_os("HOME") {
            let home_path = PathBuf::from(home);
            if let Ok(relative) = path.strip_prefix(&home_path) {
                return format!("~/{}", relative.display());
            }
        }
    }

    path.display().to_string()
}
