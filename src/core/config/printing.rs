use crate::core::config::defaults::{Resolved, Settings};

fn resolved_line(key: &str, resolved: &Resolved<String>) -> String {
    format!("  {key}: {} ({})", resolved.value, resolved.source.as_str())
}

impl Settings {
    /// Lines printed by `termdesk config`.
    pub fn summary_lines(&self) -> Vec<String> {
        vec![
            "Current configuration:".to_string(),
            resolved_line("task-api-url", &self.task_api_url),
            resolved_line("clai-api-url", &self.clai_api_url),
            resolved_line("theme", &self.theme),
            format!("  default-model: {}", self.default_model),
            format!("  priority-encoding: {}", self.priority_encoding.as_str()),
            format!(
                "  rate-limit-retry: {}",
                if self.rate_limit_retry { "on" } else { "off" }
            ),
            match &self.diagnostics_log {
                Some(path) => format!("  diagnostics-log: {}", path.display()),
                None => "  diagnostics-log: (unset)".to_string(),
            },
        ]
    }

    pub fn print_all(&self) {
        for line in self.summary_lines() {
            println!("{line}");
        }
    }
}
