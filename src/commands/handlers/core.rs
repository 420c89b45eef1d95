use crate::commands::registry::CommandInvocation;
use crate::commands::{all_commands, CommandResult};
use crate::core::chat::{framed, ChatTerminal};
use crate::core::message::TranscriptLine;

pub(crate) fn handle_help(
    terminal: &mut ChatTerminal,
    _invocation: CommandInvocation<'_>,
) -> CommandResult {
    let mut lines = vec![
        TranscriptLine::info("📚 Available Commands:"),
        TranscriptLine::info("─".repeat(21)),
    ];
    lines.extend(
        all_commands()
            .iter()
            .filter(|command| command.name != "help")
            .map(|command| TranscriptLine::info(format!("{:<20} {}", command.usage, command.help))),
    );
    terminal.push_lines(framed(lines));
    CommandResult::Continue
}

pub(crate) fn handle_clear(
    terminal: &mut ChatTerminal,
    _invocation: CommandInvocation<'_>,
) -> CommandResult {
    terminal.clear_transcript();
    CommandResult::Continue
}
