//! Slash commands understood by the chat terminal.
//!
//! Handlers either answer locally by writing to the transcript or hand back a
//! [`ChatRequest`] for the terminal to issue.

mod handlers;
mod registry;


pub use registry::{all_commands, find_command, matching_commands, Command, CommandInvocation};

use crate::core::chat::{ChatRequest, ChatTerminal};
use crate::core::message::TranscriptLine;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandResult {
    Continue,
    ProcessAsMessage(String),
    Request(ChatRequest),
}

pub fn process_input(terminal: &mut ChatTerminal, input: &str) -> CommandResult {
    let trimmed = input.trim();

    let Some(rest) = trimmed.strip_prefix('/') else {
        return CommandResult::ProcessAsMessage(trimmed.to_string());
    };

    let mut parts = rest.splitn(2, ' ');
    let command_name = parts.next().unwrap_or_default();
    let args = parts.next().unwrap_or("").trim();
    let invocation = CommandInvocation { args };

    match registry::find_command(command_name) {
        Some(command) => {
            if command.name != "help" {
                terminal.push_line(TranscriptLine::echo(trimmed));
            }
            (command.handler)(terminal, invocation)
        }
        None => {
            terminal.push_line(TranscriptLine::echo(trimmed));
            terminal.push_lines([
                TranscriptLine::error(format!("✗ Unknown command: /{command_name}")),
                TranscriptLine::info("Type /help to see available commands"),
            ]);
            CommandResult::Continue
        }
    }
}
