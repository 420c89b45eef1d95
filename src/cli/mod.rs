//! Command-line interface parsing and handling
//!
//! This module handles parsing command-line arguments and executing the appropriate commands.

pub mod settings;


use std::error::Error;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use clap::{Parser, Subcommand};
use tracing::info;

use crate::api::sessions::SessionApi;
use crate::api::tasks::TaskApi;
use crate::api::Gateway;
use crate::cli::settings::SettingRegistry;
use crate::core::chat::ChatTerminal;
use crate::core::config::data::Config;
use crate::core::config::defaults::{Overrides, Settings};
use crate::core::tasks::TaskTerminal;
use crate::ui::event_loop::run_page;
use crate::ui::executors::{ChatExecutor, TaskExecutor};
use crate::ui::theme::Theme;
use crate::utils::logging::{init_diagnostics, LoggingState};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Parser)]
#[command(name = "termdesk")]
#[command(version)]
#[command(about = "Full-screen terminals for a task manager and an AI chat service")]
#[command(
    long_about = "termdesk runs one of two full-screen terminal pages against a REST backend.\n\n\
Pages:\n\
  tasks             TaskManager CLI: menu-driven task management (default)\n\
  chat              CLAI: conversational AI sessions with slash commands\n\n\
Environment Variables:\n\
  TASK_API_URL      Task service base URL (defaults to http://localhost:5000/api)\n\
  CLAI_API_URL      Chat service base URL (defaults to http://localhost:3500)\n\
  TERMDESK_LOG      Diagnostics filter when --debug-log is set (defaults to info)\n\n\
Controls:\n\
  Type              Enter input in the input field\n\
  Enter             Submit the input\n\
  Up/Down           Move through pickers\n\
  Esc               Cancel the current prompt\n\
  PageUp/PageDown   Scroll the transcript\n\
  Ctrl+U            Clear the input line\n\
  Ctrl+C            Quit the application"
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Read and write settings at this path instead of the default location
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Append every transcript line to the specified file
    #[arg(short = 'l', long, global = true, value_name = "FILE")]
    pub log: Option<String>,

    /// Write diagnostics to the specified file
    #[arg(long, global = true, value_name = "FILE")]
    pub debug_log: Option<PathBuf>,

    /// Color theme (dark or light)
    #[arg(long, global = true, value_name = "NAME")]
    pub theme: Option<String>,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Commands {
    /// Start the TaskManager terminal (default)
    Tasks {
        /// Task service base URL, including the /api prefix
        #[arg(long, value_name = "URL")]
        api_url: Option<String>,
    },
    /// Start the CLAI chat terminal
    Chat {
        /// Chat service base URL
        #[arg(long, value_name = "URL")]
        api_url: Option<String>,
    },
    /// Show the effective configuration and where each value comes from
    Config,
    /// Set configuration values
    Set {
        /// Configuration key to set
        key: Option<String>,
        /// Value to set for the key (can be multiple words)
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        value: Vec<String>,
    },
    /// Unset configuration values
    Unset {
        /// Configuration key to unset
        key: String,
    },
}

impl Args {
    fn overrides(&self) -> Overrides {
        let (task_api_url, clai_api_url) = match &self.command {
            Some(Commands::Tasks { api_url }) => (api_url.clone(), None),
            Some(Commands::Chat { api_url }) => (None, api_url.clone()),
            _ => (None, None),
        };
        Overrides {
            task_api_url,
            clai_api_url,
            theme: self.theme.clone(),
            diagnostics_log: self.debug_log.clone(),
        }
    }
}

pub fn main() -> Result<(), Box<dyn Error>> {
    tokio::runtime::Runtime::new()?.block_on(async_main())
}

fn config_path(args: &Args) -> Result<PathBuf, Box<dyn Error>> {
    match &args.config {
        Some(path) => Ok(path.clone()),
        None => Ok(Config::default_config_path()?),
    }
}

async fn async_main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();
    let path = config_path(&args)?;

    match args.command {
        Some(Commands::Set { ref key, ref value }) => {
            handle_set(&path, key.as_deref(), value);
            Ok(())
        }
        Some(Commands::Unset { ref key }) => {
            handle_unset(&path, key);
            Ok(())
        }
        _ => {
            let config = Config::load_from_path(&path)?;
            let settings = config.resolve(&args.overrides(), |key| std::env::var(key).ok());
            match args.command {
                Some(Commands::Config) => {
                    settings.print_all();
                    Ok(())
                }
                Some(Commands::Chat { .. }) => run_chat(&settings, args.log).await,
                _ => run_tasks(&settings, args.log).await,
            }
        }
    }
}

fn handle_set(path: &Path, key: Option<&str>, value: &[String]) {
    let registry = SettingRegistry::new();
    let Some(key) = key else {
        match Config::load_from_path(path) {
            Ok(config) => {
                println!("Stored settings ({}):", path.display());
                for line in registry.format_all(&config) {
                    println!("{line}");
                }
            }
            Err(e) => {
                eprintln!("❌ {e}");
                std::process::exit(1);
            }
        }
        return;
    };

    match registry.set(path, key, value) {
        Ok(message) => println!("{message}"),
        Err(e) => {
            e.print();
            std::process::exit(1);
        }
    }
}

fn handle_unset(path: &Path, key: &str) {
    match SettingRegistry::new().unset(path, key) {
        Ok(message) => println!("{message}"),
        Err(e) => {
            e.print();
            std::process::exit(1);
        }
    }
}

fn build_gateway(settings: &Settings) -> Result<Gateway, Box<dyn Error>> {
    let client = reqwest::Client::builder()
        .timeout(REQUEST_TIMEOUT)
        .build()?;
    Ok(Gateway::new(client).with_rate_limit_retry(settings.rate_limit_retry))
}

fn prepare_logging(settings: &Settings, log: Option<String>) -> Result<LoggingState, Box<dyn Error>> {
    init_diagnostics(settings.diagnostics_log.as_deref())?;
    LoggingState::new(log)
}

async fn run_tasks(settings: &Settings, log: Option<String>) -> Result<(), Box<dyn Error>> {
    let logging = prepare_logging(settings, log)?;
    let api = TaskApi::new(build_gateway(settings)?, settings.task_api_url.value.as_str())
        .with_priority_encoding(settings.priority_encoding);
    info!(base_url = api.base_url(), "starting task terminal");

    run_page(
        TaskTerminal::new(),
        Arc::new(TaskExecutor::new(Arc::new(api))),
        Theme::from_name(&settings.theme.value),
        logging,
    )
    .await
}

async fn run_chat(settings: &Settings, log: Option<String>) -> Result<(), Box<dyn Error>> {
    let logging = prepare_logging(settings, log)?;
    let api = SessionApi::new(build_gateway(settings)?, settings.clai_api_url.value.as_str());
    info!(base_url = api.base_url(), "starting chat terminal");

    run_page(
        ChatTerminal::new(settings.default_model.as_str()),
        Arc::new(ChatExecutor::new(Arc::new(api))),
        Theme::from_name(&settings.theme.value),
        logging,
    )
    .await
}
