//! termdesk runs full-screen terminal front-ends for two REST backends: a
//! task manager and a conversational AI session service.
//!
//! The crate is organized around a small set of collaborating layers:
//! - [`core`] owns page state: the TaskManager prompt state machine, the CLAI
//!   chat state machine, transcripts, pickers, and configuration.
//! - [`ui`] renders pages and runs the event loop that drives user input,
//!   remote calls, and display updates.
//! - [`commands`] implements slash-command parsing and execution for the chat
//!   page.
//! - [`api`] defines the request gateway and the task and session accessors.
//!
//! Runtime entrypoints live in the binary crate (`src/main.rs`) and route
//! through [`crate::cli::main`], which resolves settings and dispatches into
//! [`ui::event_loop::run_page`] for interactive sessions.

pub mod api;
pub mod cli;
pub mod commands;
pub mod core;
pub mod ui;
pub mod utils;
