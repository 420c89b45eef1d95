pub(super) mod core;
pub(super) mod session;
pub(super) mod settings;

use crate::commands::CommandResult;
use crate::core::chat::ChatTerminal;
use crate::core::message::TranscriptLine;

pub(super) fn usage_error(terminal: &mut ChatTerminal, usage: &'static str) -> CommandResult {
    terminal.push_line(TranscriptLine::error(format!("Usage: {usage}")));
    CommandResult::Continue
}

/// Id of the current session, or an error line when there is none.
pub(super) fn require_session(terminal: &mut ChatTerminal) -> Option<i64> {
    let id = terminal.session().map(|session| session.id);
    if id.is_none() {
        terminal.push_line(TranscriptLine::error("✗ Error: No active session"));
    }
    id
}
