use super::{handlers, CommandResult};
use crate::core::chat::ChatTerminal;

pub type CommandHandler = fn(&mut ChatTerminal, CommandInvocation<'_>) -> CommandResult;

pub struct Command {
    pub name: &'static str,
    pub usage: &'static str,
    pub help: &'static str,
    pub handler: CommandHandler,
}

#[derive(Clone, Copy)]
pub struct CommandInvocation<'a> {
    pub args: &'a str,
}

impl CommandInvocation<'_> {
    pub fn has_args(&self) -> bool {
        !self.args.is_empty()
    }
}

pub fn all_commands() -> &'static [Command] {
    COMMANDS
}

pub fn find_command(name: &str) -> Option<&'static Command> {
    all_commands()
        .iter()
        .find(|command| command.name.eq_ignore_ascii_case(name))
}

/// Commands whose `/name` starts with `typed`, compared case-insensitively.
pub fn matching_commands(typed: &str) -> Vec<&'static Command> {
    let typed = typed.to_ascii_lowercase();
    all_commands()
        .iter()
        .filter(|command| format!("/{}", command.name).starts_with(&typed))
        .collect()
}

const COMMANDS: &[Command] = &[
    Command {
        name: "clear",
        usage: "/clear",
        help: "Clear the terminal screen",
        handler: handlers::core::handle_clear,
    },
    Command {
        name: "new",
        usage: "/new [name]",
        help: "Create a new session (optionally with a name)",
        handler: handlers::session::handle_new,
    },
    Command {
        name: "save",
        usage: "/save <name>",
        help: "Save the current session with a name",
        handler: handlers::session::handle_save,
    },
    Command {
        name: "delete",
        usage: "/delete <name>",
        help: "Delete a saved session",
        handler: handlers::session::handle_delete,
    },
    Command {
        name: "list",
        usage: "/list",
        help: "List all saved sessions",
        handler: handlers::session::handle_list,
    },
    Command {
        name: "resume",
        usage: "/resume <name>",
        help: "Resume a saved session",
        handler: handlers::session::handle_resume,
    },
    Command {
        name: "role",
        usage: "/role [name]",
        help: "Set or view the role-playing character",
        handler: handlers::settings::handle_role,
    },
    Command {
        name: "model",
        usage: "/model [number]",
        help: "Set or view the Claude model",
        handler: handlers::settings::handle_model,
    },
    Command {
        name: "help",
        usage: "/help",
        help: "Show this list of commands",
        handler: handlers::core::handle_help,
    },
];
