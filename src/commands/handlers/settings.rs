use crate::commands::registry::CommandInvocation;
use crate::commands::CommandResult;
use crate::core::chat::{framed, AfterModels, ChatRequest, ChatTerminal};
use crate::core::message::TranscriptLine;

use super::require_session;

pub(crate) fn handle_role(
    terminal: &mut ChatTerminal,
    invocation: CommandInvocation<'_>,
) -> CommandResult {
    if !invocation.has_args() {
        let line = match terminal.session().and_then(|s| s.role.as_deref()) {
            Some(role) => format!("🎭 Current role: '{role}'"),
            None => "🎭 No role set (Claude will respond as default assistant)".to_string(),
        };
        terminal.push_lines(framed([TranscriptLine::info(line)]));
        return CommandResult::Continue;
    }

    let Some(session_id) = require_session(terminal) else {
        return CommandResult::Continue;
    };
    CommandResult::Request(ChatRequest::SetRole {
        session_id,
        role: invocation.args.to_string(),
    })
}

pub(crate) fn handle_model(
    terminal: &mut ChatTerminal,
    invocation: CommandInvocation<'_>,
) -> CommandResult {
    if !invocation.has_args() {
        return CommandResult::Request(ChatRequest::FetchModels(AfterModels::Show));
    }

    match invocation.args.parse::<usize>() {
        Ok(number) => CommandResult::Request(ChatRequest::FetchModels(AfterModels::Select(number))),
        Err(_) => {
            terminal.push_line(TranscriptLine::error(
                "✗ Please provide a valid number. Use '/model' to see available options.",
            ));
            CommandResult::Continue
        }
    }
}
