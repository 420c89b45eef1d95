use crate::commands::registry::CommandInvocation;
use crate::commands::CommandResult;
use crate::core::chat::{ChatRequest, ChatTerminal};
use crate::core::message::TranscriptLine;

use super::{require_session, usage_error};

pub(crate) fn handle_new(
    _terminal: &mut ChatTerminal,
    invocation: CommandInvocation<'_>,
) -> CommandResult {
    let name = invocation
        .has_args()
        .then(|| invocation.args.to_string());
    CommandResult::Request(ChatRequest::NewSession { name })
}

pub(crate) fn handle_save(
    terminal: &mut ChatTerminal,
    invocation: CommandInvocation<'_>,
) -> CommandResult {
    if !invocation.has_args() {
        return usage_error(terminal, "/save <name>");
    }
    let Some(session_id) = require_session(terminal) else {
        return CommandResult::Continue;
    };
    CommandResult::Request(ChatRequest::SaveSession {
        session_id,
        name: invocation.args.to_string(),
    })
}

pub(crate) fn handle_delete(
    terminal: &mut ChatTerminal,
    invocation: CommandInvocation<'_>,
) -> CommandResult {
    if !invocation.has_args() {
        return usage_error(terminal, "/delete <name>");
    }
    let is_current = terminal
        .session()
        .and_then(|session| session.display_name.as_deref())
        == Some(invocation.args);
    if is_current {
        terminal.push_line(TranscriptLine::error(
            "✗ Cannot delete the current session. Switch to another session first.",
        ));
        return CommandResult::Continue;
    }
    CommandResult::Request(ChatRequest::DeleteSession {
        name: invocation.args.to_string(),
    })
}

pub(crate) fn handle_list(
    _terminal: &mut ChatTerminal,
    _invocation: CommandInvocation<'_>,
) -> CommandResult {
    CommandResult::Request(ChatRequest::ListSessions)
}

pub(crate) fn handle_resume(
    terminal: &mut ChatTerminal,
    invocation: CommandInvocation<'_>,
) -> CommandResult {
    if !invocation.has_args() {
        return usage_error(terminal, "/resume <name>");
    }
    CommandResult::Request(ChatRequest::ResumeSession {
        name: invocation.args.to_string(),
    })
}
