//! Conversational terminal backed by the session service.
//!
//! Plain input is sent as a chat message to the current session; input
//! starting with `/` goes through [`crate::commands`]. Exactly one request is
//! in flight at a time and typing is ignored until it completes.

mod actions;

#[cfg(test)]
mod tests;

pub use actions::{AfterModels, ChatCommand, ChatOutcome, ChatReply, ChatRequest};

use tracing::{debug, warn};

use crate::api::models::ModelInfo;
use crate::api::sessions::ChatSession;
use crate::commands::{self, matching_commands, CommandResult};
use crate::core::message::TranscriptLine;
use crate::core::page::{KeyInput, PageView, TerminalPage};
use crate::core::transcript::Transcript;

pub const BANNER: &str = "CLAI - Command Line AI Interface v1.0.0";
pub const HINT: &str = "Type your message to chat, or use /help for commands";
pub const DEFAULT_MODEL: &str = "claude-sonnet-4-20250514";
const TITLE: &str = "clai@localhost:~";
const LIST_RULE_WIDTH: usize = 17;

/// Surround `lines` with a blank line on each side.
pub fn framed<I>(lines: I) -> Vec<TranscriptLine>
where
    I: IntoIterator<Item = TranscriptLine>,
{
    let mut framed = vec![TranscriptLine::blank()];
    framed.extend(lines);
    framed.push(TranscriptLine::blank());
    framed
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct PendingCall {
    call_id: u64,
    label: &'static str,
    startup: bool,
}

pub struct ChatTerminal {
    transcript: Transcript,
    input: String,
    session: Option<ChatSession>,
    default_model: String,
    pending: Option<PendingCall>,
    next_call_id: u64,
}

impl Default for ChatTerminal {
    fn default() -> Self {
        Self::new(DEFAULT_MODEL)
    }
}

impl ChatTerminal {
    pub fn new(default_model: impl Into<String>) -> Self {
        let mut transcript = Transcript::new();
        transcript.extend([
            TranscriptLine::accent(BANNER),
            TranscriptLine::blank(),
            TranscriptLine::info(HINT),
            TranscriptLine::blank(),
        ]);
        Self {
            transcript,
            input: String::new(),
            session: None,
            default_model: default_model.into(),
            pending: None,
            next_call_id: 0,
        }
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    pub fn session(&self) -> Option<&ChatSession> {
        self.session.as_ref()
    }

    pub fn default_model(&self) -> &str {
        &self.default_model
    }

    /// Model of the current session, or the configured default.
    pub fn current_model(&self) -> &str {
        self.session
            .as_ref()
            .and_then(|s| s.model.as_deref())
            .unwrap_or(&self.default_model)
    }

    pub fn is_busy(&self) -> bool {
        self.pending.is_some()
    }

    pub fn push_line(&mut self, line: TranscriptLine) {
        self.transcript.push(line);
    }

    pub fn push_lines<I: IntoIterator<Item = TranscriptLine>>(&mut self, lines: I) {
        self.transcript.extend(lines);
    }

    pub fn clear_transcript(&mut self) {
        self.transcript.clear();
    }

    /// Commands matching the partially typed input, as `usage  help` rows.
    pub fn suggestions(&self) -> Vec<String> {
        if !self.input.starts_with('/') || self.input.len() < 2 {
            return Vec::new();
        }
        matching_commands(&self.input)
            .into_iter()
            .map(|command| format!("{:<20} {}", command.usage, command.help))
            .collect()
    }

    pub fn on_key(&mut self, key: KeyInput) -> Option<ChatCommand> {
        if self.is_busy() {
            return None;
        }
        match key {
            KeyInput::Char(c) => self.input.push(c),
            KeyInput::Backspace => {
                self.input.pop();
            }
            KeyInput::ClearLine | KeyInput::Esc => self.input.clear(),
            KeyInput::Enter => {
                let input = std::mem::take(&mut self.input);
                return self.submit(&input);
            }
            KeyInput::Up | KeyInput::Down => {}
        }
        None
    }

    /// Handle one submitted line: a slash command or a chat message.
    pub fn submit(&mut self, raw: &str) -> Option<ChatCommand> {
        if self.is_busy() || raw.trim().is_empty() {
            return None;
        }

        match commands::process_input(self, raw) {
            CommandResult::Continue => None,
            CommandResult::Request(request) => Some(self.issue(request)),
            CommandResult::ProcessAsMessage(message) => {
                self.transcript.push(TranscriptLine::echo(&message));
                let session_id = match self.session.as_ref() {
                    Some(session) => session.id,
                    None => {
                        self.transcript
                            .push(TranscriptLine::error("✗ Error: No active session"));
                        return None;
                    }
                };
                Some(self.issue(ChatRequest::SendMessage {
                    session_id,
                    message,
                }))
            }
        }
    }

    /// Fold a finished remote call back into the page.
    pub fn apply_outcome(&mut self, outcome: ChatOutcome) -> Option<ChatCommand> {
        let Some(pending) = self.pending.filter(|p| p.call_id == outcome.call_id) else {
            debug!(call_id = outcome.call_id, "ignoring outcome of unknown call");
            return None;
        };
        self.pending = None;

        let reply = match outcome.result {
            Ok(reply) => reply,
            Err(err) => {
                warn!(call_id = pending.call_id, error = %err, "chat request failed");
                let text = if pending.startup {
                    format!("✗ Failed to initialize: {err}")
                } else {
                    format!("✗ Error: {err}")
                };
                self.transcript.push(TranscriptLine::error(text));
                return None;
            }
        };

        match reply {
            ChatReply::SessionReady(session) => {
                self.announce_session("✨ Session initialized", &session);
                self.session = Some(session);
            }
            ChatReply::Created(session) => {
                self.transcript.push(TranscriptLine::blank());
                self.announce_session("✨ Created new session", &session);
                self.session = Some(session);
            }
            ChatReply::Message(text) => {
                let mut lines = vec![TranscriptLine::blank()];
                lines.extend(text.lines().map(TranscriptLine::assistant));
                lines.push(TranscriptLine::blank());
                self.transcript.extend(lines);
            }
            ChatReply::Saved { name } => {
                if let Some(session) = self.session.as_mut() {
                    session.display_name = Some(name.clone());
                }
                self.transcript.extend(framed([TranscriptLine::success(format!(
                    "✅ Session saved as '{name}'"
                ))]));
            }
            ChatReply::Deleted { name } => {
                self.transcript.extend(framed([TranscriptLine::info(format!(
                    "🗑️  Session '{name}' deleted"
                ))]));
            }
            ChatReply::Sessions(sessions) => self.show_sessions(&sessions),
            ChatReply::Resumed { name, session } => {
                let mut lines = vec![
                    TranscriptLine::info(format!("🔄 Switched to session: '{name}'")),
                    TranscriptLine::info(format!("📝 Session ID: {}", session.id)),
                ];
                if let Some(role) = &session.role {
                    lines.push(TranscriptLine::info(format!("🎭 Role: {role}")));
                }
                if let Some(model) = &session.model {
                    lines.push(TranscriptLine::info(format!("🤖 Model: {model}")));
                }
                self.transcript.extend(framed(lines));
                self.session = Some(session);
            }
            ChatReply::RoleSet { role } => {
                if let Some(session) = self.session.as_mut() {
                    session.role = Some(role.clone());
                }
                self.transcript.extend(framed([TranscriptLine::info(format!(
                    "🎭 Role set to: '{role}'"
                ))]));
            }
            ChatReply::Models { models, then } => match then {
                AfterModels::Show => self.show_models(&models),
                AfterModels::Select(number) => return self.select_model(models, number),
            },
            ChatReply::ModelSet(model) => {
                if let Some(session) = self.session.as_mut() {
                    session.model = Some(model.id.clone());
                }
                self.transcript.extend(framed([TranscriptLine::info(format!(
                    "🤖 Model set to: '{}'",
                    model.label()
                ))]));
            }
        }
        None
    }

    fn announce_session(&mut self, heading: &str, session: &ChatSession) {
        self.transcript.push(TranscriptLine::info(format!(
            "{heading} (ID: {})",
            session.id
        )));
        if let Some(name) = &session.display_name {
            self.transcript
                .push(TranscriptLine::info(format!("📝 Session: {name}")));
        }
        self.transcript.push(TranscriptLine::blank());
    }

    fn show_sessions(&mut self, sessions: &[ChatSession]) {
        if sessions.is_empty() {
            self.transcript
                .extend(framed([TranscriptLine::info("No saved sessions found")]));
            return;
        }

        let mut lines = vec![
            TranscriptLine::info("📚 Saved Sessions:"),
            TranscriptLine::info("─".repeat(LIST_RULE_WIDTH)),
        ];
        for session in sessions {
            let Some(name) = &session.display_name else {
                continue;
            };
            let mut line = format!("• {name} (ID: {})", session.id);
            if let Some(role) = &session.role {
                line.push_str(&format!(" 🎭 {role}"));
            }
            lines.push(TranscriptLine::info(line));
        }
        self.transcript.extend(framed(lines));
    }

    fn show_models(&mut self, models: &[ModelInfo]) {
        let current = self.current_model().to_string();
        let mut lines = vec![
            TranscriptLine::info(format!("🤖 Current model: {current}")),
            TranscriptLine::blank(),
            TranscriptLine::info("📋 Available models:"),
            TranscriptLine::info("─".repeat(LIST_RULE_WIDTH)),
        ];
        lines.extend(models.iter().enumerate().map(|(i, model)| {
            let marker = if model.id == current { "→" } else { " " };
            TranscriptLine::info(format!(
                "{marker} {}. {} - {}",
                i + 1,
                model.id,
                model.display_name
            ))
        }));
        lines.push(TranscriptLine::blank());
        lines.push(TranscriptLine::muted(
            "💡 Use '/model <number>' to select a model",
        ));
        self.transcript.extend(framed(lines));
    }

    fn select_model(&mut self, models: Vec<ModelInfo>, number: usize) -> Option<ChatCommand> {
        let Some(model) = number
            .checked_sub(1)
            .and_then(|index| models.into_iter().nth(index))
        else {
            self.transcript.push(TranscriptLine::error(
                "✗ Invalid model number. Use '/model' to see available options.",
            ));
            return None;
        };
        let session_id = match self.session.as_ref() {
            Some(session) => session.id,
            None => {
                self.transcript
                    .push(TranscriptLine::error("✗ Error: No active session"));
                return None;
            }
        };
        Some(self.issue(ChatRequest::SetModel { session_id, model }))
    }

    fn issue(&mut self, request: ChatRequest) -> ChatCommand {
        self.next_call_id += 1;
        let call_id = self.next_call_id;
        self.pending = Some(PendingCall {
            call_id,
            label: request.busy_label(),
            startup: request == ChatRequest::InitSession,
        });
        debug!(call_id, "issuing chat request");
        ChatCommand { call_id, request }
    }

    fn status(&self) -> String {
        let Some(session) = &self.session else {
            return "no session".to_string();
        };
        let mut status = format!("📝 {}", session.label());
        if let Some(role) = &session.role {
            status.push_str(&format!("  🎭 {role}"));
        }
        status.push_str(&format!("  🤖 {}", self.current_model()));
        status
    }
}

impl TerminalPage for ChatTerminal {
    type Command = ChatCommand;
    type Outcome = ChatOutcome;

    fn startup(&mut self) -> Option<ChatCommand> {
        Some(self.issue(ChatRequest::InitSession))
    }

    fn handle_key(&mut self, key: KeyInput) -> Option<ChatCommand> {
        self.on_key(key)
    }

    fn apply_outcome(&mut self, outcome: ChatOutcome) -> Option<ChatCommand> {
        ChatTerminal::apply_outcome(self, outcome)
    }

    fn view(&self) -> PageView<'_> {
        let input_title = if self.is_busy() {
            "Waiting for response...".to_string()
        } else {
            "Type a message or /help for commands...".to_string()
        };
        PageView {
            title: TITLE,
            status: Some(self.status()),
            transcript: &self.transcript,
            picker: None,
            input: &self.input,
            input_title,
            busy: self.is_busy(),
            busy_label: self.pending.map(|p| p.label).unwrap_or("Thinking..."),
            suggestions: self.suggestions(),
        }
    }

    fn take_log_lines(&mut self) -> Vec<TranscriptLine> {
        self.transcript.take_unlogged()
    }
}
