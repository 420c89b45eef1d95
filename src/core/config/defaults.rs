//! Effective settings: command-line flags over environment over the config
//! file over built-in values.

use std::path::PathBuf;

use crate::api::tasks::PriorityEncoding;
use crate::core::chat::DEFAULT_MODEL;
use crate::core::config::data::Config;

pub const DEFAULT_TASK_API_URL: &str = "http://localhost:5000/api";
pub const DEFAULT_CLAI_API_URL: &str = "http://localhost:3500";
pub const DEFAULT_THEME: &str = "dark";
pub const TASK_API_URL_ENV: &str = "TASK_API_URL";
pub const CLAI_API_URL_ENV: &str = "CLAI_API_URL";

/// Values given on the command line for this run only.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Overrides {
    pub task_api_url: Option<String>,
    pub clai_api_url: Option<String>,
    pub theme: Option<String>,
    pub diagnostics_log: Option<PathBuf>,
}

/// Where an effective value came from, for `termdesk config`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
    Flag,
    Env,
    File,
    Default,
}

impl Source {
    pub fn as_str(self) -> &'static str {
        match self {
            Source::Flag => "flag",
            Source::Env => "env",
            Source::File => "config",
            Source::Default => "default",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolved<T> {
    pub value: T,
    pub source: Source,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub task_api_url: Resolved<String>,
    pub clai_api_url: Resolved<String>,
    pub theme: Resolved<String>,
    pub default_model: String,
    pub priority_encoding: PriorityEncoding,
    pub rate_limit_retry: bool,
    pub diagnostics_log: Option<PathBuf>,
}

fn first_set<T>(candidates: [(Option<T>, Source); 3], fallback: T) -> Resolved<T> {
    candidates
        .into_iter()
        .find_map(|(value, source)| value.map(|value| Resolved { value, source }))
        .unwrap_or(Resolved {
            value: fallback,
            source: Source::Default,
        })
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

impl Config {
    /// Resolve effective settings. `env` looks up environment variables so
    /// tests can supply their own.
    pub fn resolve<E>(&self, overrides: &Overrides, env: E) -> Settings
    where
        E: Fn(&str) -> Option<String>,
    {
        let task_api_url = first_set(
            [
                (non_empty(overrides.task_api_url.clone()), Source::Flag),
                (non_empty(env(TASK_API_URL_ENV)), Source::Env),
                (non_empty(self.task_api_url.clone()), Source::File),
            ],
            DEFAULT_TASK_API_URL.to_string(),
        );
        let clai_api_url = first_set(
            [
                (non_empty(overrides.clai_api_url.clone()), Source::Flag),
                (non_empty(env(CLAI_API_URL_ENV)), Source::Env),
                (non_empty(self.clai_api_url.clone()), Source::File),
            ],
            DEFAULT_CLAI_API_URL.to_string(),
        );
        let theme = first_set(
            [
                (non_empty(overrides.theme.clone()), Source::Flag),
                (None, Source::Env),
                (non_empty(self.theme.clone()), Source::File),
            ],
            DEFAULT_THEME.to_string(),
        );

        Settings {
            task_api_url,
            clai_api_url,
            theme,
            default_model: non_empty(self.default_model.clone())
                .unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            priority_encoding: self.priority_encoding.unwrap_or_default(),
            rate_limit_retry: self.rate_limit_retry.unwrap_or(true),
            diagnostics_log: overrides
                .diagnostics_log
                .clone()
                .or_else(|| self.diagnostics_log.clone()),
        }
    }
}
