//! Event polling, dispatching, and rendering loop shared by both pages.
//!
//! Terminal input arrives from a reader task, command outcomes from the
//! executor tasks spawned by [`spawn_command`]. Both are fed into the page,
//! any follow-up command is dispatched, and the frame is redrawn.

use std::{error::Error, sync::Arc, time::Duration};

use ratatui::crossterm::event::{self, Event};
use ratatui::Frame;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::core::page::{CommandExecutor, KeyInput, TerminalPage};
use crate::ui::executors::spawn_command;
use crate::ui::keys::{route_key, KeyRoute};
use crate::ui::lifecycle::{restore_terminal, setup_terminal};
use crate::ui::renderer::{draw_page, ScrollState};
use crate::ui::theme::Theme;
use crate::utils::logging::LoggingState;

const SPINNER_INTERVAL: Duration = Duration::from_millis(150);

#[derive(Debug)]
pub enum UiEvent {
    Crossterm(Event),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopControl {
    Continue,
    Exit,
}

/// Page state plus the plumbing that runs its commands.
pub struct PageDriver<P, E>
where
    P: TerminalPage,
    E: CommandExecutor<Command = P::Command, Outcome = P::Outcome>,
{
    page: P,
    executor: Arc<E>,
    outcomes: mpsc::UnboundedSender<P::Outcome>,
    shutdown: CancellationToken,
    logging: LoggingState,
    theme: Theme,
    scroll: ScrollState,
    spinner_frame: usize,
}

impl<P, E> PageDriver<P, E>
where
    P: TerminalPage,
    E: CommandExecutor<Command = P::Command, Outcome = P::Outcome>,
{
    pub fn new(
        page: P,
        executor: Arc<E>,
        theme: Theme,
        logging: LoggingState,
    ) -> (Self, mpsc::UnboundedReceiver<P::Outcome>) {
        let (outcomes, outcome_rx) = mpsc::unbounded_channel();
        let driver = Self {
            page,
            executor,
            outcomes,
            shutdown: CancellationToken::new(),
            logging,
            theme,
            scroll: ScrollState::default(),
            spinner_frame: 0,
        };
        (driver, outcome_rx)
    }

    pub fn page(&self) -> &P {
        &self.page
    }

    pub fn scroll(&self) -> ScrollState {
        self.scroll
    }

    pub fn start(&mut self) {
        let command = self.page.startup();
        self.after_update(command);
    }

    /// Apply a routed key. `page_rows` is the distance a page scroll moves.
    pub fn handle_route(&mut self, route: KeyRoute, page_rows: u16) -> LoopControl {
        match route {
            KeyRoute::Quit => return LoopControl::Exit,
            KeyRoute::ScrollUp => self.scroll.page_up(page_rows),
            KeyRoute::ScrollDown => self.scroll.page_down(page_rows),
            KeyRoute::ScrollToBottom => self.scroll.to_bottom(),
            KeyRoute::Page(key) => {
                let command = self.page.handle_key(key);
                self.after_update(command);
            }
            KeyRoute::Ignore => {}
        }
        LoopControl::Continue
    }

    /// Pasted text is typed in character by character; line breaks are dropped.
    pub fn handle_paste(&mut self, text: &str) {
        for c in text.chars().filter(|c| !c.is_control()) {
            let command = self.page.handle_key(KeyInput::Char(c));
            self.after_update(command);
        }
    }

    pub fn deliver(&mut self, outcome: P::Outcome) {
        let command = self.page.apply_outcome(outcome);
        self.after_update(command);
    }

    /// Advance the busy indicator; returns whether a redraw is needed.
    pub fn tick(&mut self) -> bool {
        if self.page.view().busy {
            self.spinner_frame = self.spinner_frame.wrapping_add(1);
            true
        } else {
            false
        }
    }

    pub fn draw(&mut self, f: &mut Frame) {
        let view = self.page.view();
        draw_page(f, &view, &self.theme, &mut self.scroll, self.spinner_frame);
    }

    /// Abandon in-flight commands.
    pub fn shutdown(&self) {
        self.shutdown.cancel();
    }

    fn after_update(&mut self, command: Option<P::Command>) {
        if let Some(command) = command {
            spawn_command(
                self.executor.clone(),
                command,
                self.outcomes.clone(),
                self.shutdown.clone(),
            );
        }

        let lines = self.page.take_log_lines();
        if lines.is_empty() {
            return;
        }
        self.scroll.to_bottom();
        if let Err(e) = self.logging.log_lines(&lines) {
            warn!(error = %e, "failed to write transcript log");
        }
    }
}

fn spawn_event_reader(event_tx: mpsc::UnboundedSender<UiEvent>) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            if let Ok(true) = event::poll(Duration::from_millis(10)) {
                match event::read() {
                    Ok(ev) => {
                        if event_tx.send(UiEvent::Crossterm(ev)).is_err() {
                            break;
                        }
                    }
                    Err(_) => {
                        continue;
                    }
                }
            } else {
                tokio::task::yield_now().await;
            }
        }
    })
}

/// Run `page` full-screen until the user quits.
pub async fn run_page<P, E>(
    page: P,
    executor: Arc<E>,
    theme: Theme,
    logging: LoggingState,
) -> Result<(), Box<dyn Error>>
where
    P: TerminalPage,
    E: CommandExecutor<Command = P::Command, Outcome = P::Outcome>,
{
    let (mut driver, mut outcome_rx) = PageDriver::new(page, executor, theme, logging);

    let mut terminal = setup_terminal()?;
    let (event_tx, mut event_rx) = mpsc::unbounded_channel::<UiEvent>();
    let event_reader_handle = spawn_event_reader(event_tx);
    let mut spinner = tokio::time::interval(SPINNER_INTERVAL);

    info!("page started");
    driver.start();

    let mut request_redraw = true;
    let result: Result<(), Box<dyn Error>> = 'main_loop: loop {
        if request_redraw {
            if let Err(e) = terminal.draw(|f| driver.draw(f)) {
                break 'main_loop Err(e.into());
            }
            request_redraw = false;
        }

        let page_rows = terminal
            .size()
            .map(|size| size.height.saturating_sub(5))
            .unwrap_or(10);

        let control = tokio::select! {
            Some(ev) = event_rx.recv() => {
                request_redraw = true;
                match ev {
                    UiEvent::Crossterm(Event::Key(key)) => {
                        driver.handle_route(route_key(&key), page_rows)
                    }
                    UiEvent::Crossterm(Event::Paste(text)) => {
                        driver.handle_paste(&text);
                        LoopControl::Continue
                    }
                    UiEvent::Crossterm(_) => LoopControl::Continue,
                }
            }
            Some(outcome) = outcome_rx.recv() => {
                request_redraw = true;
                driver.deliver(outcome);
                LoopControl::Continue
            }
            _ = spinner.tick() => {
                request_redraw |= driver.tick();
                LoopControl::Continue
            }
        };

        if control == LoopControl::Exit {
            break 'main_loop Ok(());
        }
    };

    driver.shutdown();
    event_reader_handle.abort();
    restore_terminal(&mut terminal)?;
    debug!("terminal restored");

    result
}
