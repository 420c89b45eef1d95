//! Data-driven handlers for the keys `termdesk set` understands.

use std::path::PathBuf;

use reqwest::Url;

use crate::api::tasks::PriorityEncoding;
use crate::cli::settings::error::SettingError;
use crate::cli::settings::SettingHandler;
use crate::core::config::data::Config;
use crate::ui::theme::Theme;
use crate::utils::url::normalize_base_url;

/// What a text setting accepts.
#[derive(Clone, Copy)]
pub enum ValueKind {
    Text,
    Url,
    Choice(&'static [&'static str]),
}

/// Handler for settings holding a single string value.
pub struct TextHandler {
    key: &'static str,
    kind: ValueKind,
    hint: &'static str,
    example: &'static str,
    default_display: &'static str,
    get: fn(&Config) -> Option<String>,
    set_field: fn(&mut Config, Option<String>),
}

impl TextHandler {
    fn validate(&self, input: &str) -> Result<String, SettingError> {
        match self.kind {
            ValueKind::Text => Ok(input.to_string()),
            ValueKind::Url => {
                let normalized = normalize_base_url(input);
                match Url::parse(&normalized) {
                    Ok(url) if matches!(url.scheme(), "http" | "https") => Ok(normalized),
                    _ => Err(SettingError::InvalidUrl(input.to_string())),
                }
            }
            ValueKind::Choice(choices) => choices
                .iter()
                .find(|choice| choice.eq_ignore_ascii_case(input))
                .map(|choice| choice.to_string())
                .ok_or(SettingError::InvalidChoice {
                    key: self.key,
                    input: input.to_string(),
                    choices,
                }),
        }
    }
}

impl SettingHandler for TextHandler {
    fn key(&self) -> &'static str {
        self.key
    }

    fn set(&self, args: &[String], config: &mut Config) -> Result<String, SettingError> {
        let input = args.join(" ");
        let input = input.trim();
        if input.is_empty() {
            return Err(SettingError::MissingArgs {
                hint: self.hint,
                example: self.example,
            });
        }

        let value = self.validate(input)?;
        let message = format!("✅ Set {} to: {value}", self.key);
        (self.set_field)(config, Some(value));
        Ok(message)
    }

    fn unset(&self, config: &mut Config) -> String {
        (self.set_field)(config, None);
        format!(
            "✅ Unset {} (will use default: {})",
            self.key, self.default_display
        )
    }

    fn format(&self, config: &Config) -> String {
        match (self.get)(config) {
            Some(value) => format!("  {}: {value}", self.key),
            None => format!("  {}: (unset, default: {})", self.key, self.default_display),
        }
    }
}

/// Data-driven handler for boolean (on/off) settings.
pub struct BooleanHandler {
    key: &'static str,
    hint: &'static str,
    example: &'static str,
    default_display: &'static str,
    get: fn(&Config) -> Option<bool>,
    set_field: fn(&mut Config, Option<bool>),
}

/// Parse a boolean value from user input.
///
/// Accepts: on/off, true/false, yes/no (case-insensitive).
pub fn parse_bool(input: &str) -> Option<bool> {
    match input.to_lowercase().as_str() {
        "on" | "true" | "yes" | "1" => Some(true),
        "off" | "false" | "no" | "0" => Some(false),
        _ => None,
    }
}

pub fn format_bool(value: bool) -> &'static str {
    if value {
        "on"
    } else {
        "off"
    }
}

impl SettingHandler for BooleanHandler {
    fn key(&self) -> &'static str {
        self.key
    }

    fn set(&self, args: &[String], config: &mut Config) -> Result<String, SettingError> {
        if args.is_empty() {
            return Err(SettingError::MissingArgs {
                hint: self.hint,
                example: self.example,
            });
        }

        let input = args.join(" ");
        let value = parse_bool(input.trim()).ok_or(SettingError::InvalidBoolean(input))?;
        (self.set_field)(config, Some(value));
        Ok(format!("✅ Set {} to: {}", self.key, format_bool(value)))
    }

    fn unset(&self, config: &mut Config) -> String {
        (self.set_field)(config, None);
        format!(
            "✅ Unset {} (will use default: {})",
            self.key, self.default_display
        )
    }

    fn format(&self, config: &Config) -> String {
        match (self.get)(config) {
            Some(value) => format!("  {}: {}", self.key, format_bool(value)),
            None => format!("  {}: (unset, default: {})", self.key, self.default_display),
        }
    }
}

pub fn task_api_url_handler() -> TextHandler {
    TextHandler {
        key: "task-api-url",
        kind: ValueKind::Url,
        hint: "To set the task service URL, specify it including the /api prefix:",
        example: "termdesk set task-api-url http://localhost:5000/api",
        default_display: "TASK_API_URL or http://localhost:5000/api",
        get: |c| c.task_api_url.clone(),
        set_field: |c, v| c.task_api_url = v,
    }
}

pub fn clai_api_url_handler() -> TextHandler {
    TextHandler {
        key: "clai-api-url",
        kind: ValueKind::Url,
        hint: "To set the chat service URL, specify it:",
        example: "termdesk set clai-api-url http://localhost:3500",
        default_display: "CLAI_API_URL or http://localhost:3500",
        get: |c| c.clai_api_url.clone(),
        set_field: |c, v| c.clai_api_url = v,
    }
}

pub fn theme_handler() -> TextHandler {
    TextHandler {
        key: "theme",
        kind: ValueKind::Choice(Theme::NAMES),
        hint: "To set the theme, specify its name:",
        example: "termdesk set theme light",
        default_display: "dark",
        get: |c| c.theme.clone(),
        set_field: |c, v| c.theme = v,
    }
}

pub fn default_model_handler() -> TextHandler {
    TextHandler {
        key: "default-model",
        kind: ValueKind::Text,
        hint: "To set the default model, specify its identifier:",
        example: "termdesk set default-model claude-opus-4-20250514",
        default_display: crate::core::chat::DEFAULT_MODEL,
        get: |c| c.default_model.clone(),
        set_field: |c, v| c.default_model = v,
    }
}

pub fn priority_encoding_handler() -> TextHandler {
    TextHandler {
        key: "priority-encoding",
        kind: ValueKind::Choice(&["numeric", "name"]),
        hint: "To set how priorities are sent, specify numeric or name:",
        example: "termdesk set priority-encoding name",
        default_display: "numeric",
        get: |c| c.priority_encoding.map(|e| e.as_str().to_string()),
        set_field: |c, v| {
            c.priority_encoding = v.map(|v| match v.as_str() {
                "name" => PriorityEncoding::Name,
                _ => PriorityEncoding::Numeric,
            })
        },
    }
}

pub fn diagnostics_log_handler() -> TextHandler {
    TextHandler {
        key: "diagnostics-log",
        kind: ValueKind::Text,
        hint: "To write diagnostics to a file, specify its path:",
        example: "termdesk set diagnostics-log /tmp/termdesk.log",
        default_display: "off",
        get: |c| c.diagnostics_log.as_ref().map(|p| p.display().to_string()),
        set_field: |c, v| c.diagnostics_log = v.map(PathBuf::from),
    }
}

pub fn rate_limit_retry_handler() -> BooleanHandler {
    BooleanHandler {
        key: "rate-limit-retry",
        hint: "To retry rate-limited requests once, specify on or off:",
        example: "termdesk set rate-limit-retry off",
        default_display: "on",
        get: |c| c.rate_limit_retry,
        set_field: |c, v| c.rate_limit_retry = v,
    }
}
