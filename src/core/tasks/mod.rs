//! Menu-driven task manager page.
//!
//! [`TaskTerminal`] owns the whole page state: transcript, active
//! [`PromptState`], creation draft, update context and the cached task list.
//! It only changes through [`TaskTerminal::on_key`], [`TaskTerminal::submit`]
//! and [`TaskTerminal::apply_outcome`]; transitions needing the backend
//! return a [`TaskCommand`] whose [`TaskOutcome`] is fed back later.

mod actions;
mod cache;
pub mod format;
pub mod parse;
pub mod prompt;


pub use actions::{AfterFetch, TaskCommand, TaskOutcome, TaskReply, TaskRequest};
pub use cache::TaskCache;
pub use prompt::{MenuOption, PromptState, TaskDraft, UpdatableField, UpdateContext};

use tracing::{debug, warn};

use crate::api::tasks::{FilterTasksParams, TaskPatch, TaskPriority, TaskWrite};
use crate::api::ApiError;
use crate::core::message::TranscriptLine;
use crate::core::page::{KeyInput, PageView, PickerView, TerminalPage};
use crate::core::picker::ChoicePicker;
use crate::core::transcript::Transcript;

use format::{task_detail_lines, task_list_lines};
use parse::{
    optional_text, parse_due_date, parse_tags, parse_task_id_or_index, parse_task_index,
    ValidationError,
};

pub const BANNER: &str = "TaskManager CLI v1.0.0";
pub const MENU_PROMPT: &str = "What would you like to do?";
pub const CANCELLED: &str = "Cancelled";
const TITLE: &str = "taskmanager@localhost:~";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct PendingCall {
    call_id: u64,
    /// Set when the user backed out while the call was in flight.
    detached: bool,
}

pub struct TaskTerminal {
    transcript: Transcript,
    prompt: PromptState,
    input: String,
    menu: ChoicePicker<MenuOption>,
    priorities: ChoicePicker<TaskPriority>,
    draft: TaskDraft,
    update: UpdateContext,
    cache: TaskCache,
    pending: Option<PendingCall>,
    next_call_id: u64,
    menu_mark: Option<usize>,
}

impl Default for TaskTerminal {
    fn default() -> Self {
        Self::new()
    }
}

impl TaskTerminal {
    pub fn new() -> Self {
        let mut terminal = Self {
            transcript: Transcript::new(),
            prompt: PromptState::Menu,
            input: String::new(),
            menu: ChoicePicker::new(MenuOption::ALL.to_vec()),
            priorities: ChoicePicker::new(TaskPriority::ALL.to_vec()),
            draft: TaskDraft::default(),
            update: UpdateContext::default(),
            cache: TaskCache::default(),
            pending: None,
            next_call_id: 0,
            menu_mark: None,
        };
        terminal.transcript.push(TranscriptLine::accent(BANNER));
        terminal.show_menu();
        terminal
    }

    pub fn prompt(&self) -> PromptState {
        self.prompt
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    pub fn draft(&self) -> &TaskDraft {
        &self.draft
    }

    pub fn update_context(&self) -> &UpdateContext {
        &self.update
    }

    pub fn cache(&self) -> &TaskCache {
        &self.cache
    }

    pub fn menu(&self) -> &ChoicePicker<MenuOption> {
        &self.menu
    }

    pub fn priorities(&self) -> &ChoicePicker<TaskPriority> {
        &self.priorities
    }

    pub fn is_busy(&self) -> bool {
        self.pending.is_some()
    }

    /// Handle one key press. Up/Down/Enter drive the pickers, everything
    /// else edits or submits the free-text input.
    pub fn on_key(&mut self, key: KeyInput) -> Option<TaskCommand> {
        if key == KeyInput::Esc {
            self.cancel();
            return None;
        }

        if self.prompt.is_choice() {
            match key {
                KeyInput::Up => self.active_picker_up(),
                KeyInput::Down => self.active_picker_down(),
                KeyInput::Enter => return self.commit_choice(),
                _ => {}
            }
            return None;
        }

        match key {
            KeyInput::Char(c) => self.input.push(c),
            KeyInput::Backspace => {
                self.input.pop();
            }
            KeyInput::ClearLine => self.input.clear(),
            KeyInput::Enter if !self.is_busy() => {
                let input = std::mem::take(&mut self.input);
                return self.submit(&input);
            }
            _ => {}
        }
        None
    }

    /// Interpret a free-text answer for the active prompt.
    pub fn submit(&mut self, raw: &str) -> Option<TaskCommand> {
        if self.prompt.is_choice() || self.is_busy() {
            return None;
        }

        let input = raw.trim();
        if !input.is_empty() {
            self.transcript.push(TranscriptLine::echo(input));
        }

        match self.prompt {
            PromptState::CreateTitle => {
                if input.is_empty() {
                    return self.fail_validation(ValidationError::EmptyTitle);
                }
                self.draft.title = input.to_string();
                self.enter_prompt(PromptState::CreateDescription);
                None
            }
            PromptState::CreateDescription => {
                self.draft.description = input.to_string();
                self.priorities.select(&TaskPriority::Medium);
                self.enter_prompt(PromptState::CreatePriority);
                None
            }
            PromptState::CreateTags => {
                self.draft.tags = input.to_string();
                self.enter_prompt(PromptState::CreateDueDate);
                None
            }
            PromptState::CreateDueDate => {
                self.draft.due_date = input.to_string();
                let due_date = match parse_due_date(input) {
                    Ok(date) => date,
                    Err(err) => return self.fail_validation(err),
                };
                let task = TaskWrite {
                    title: self.draft.title.clone(),
                    description: optional_text(&self.draft.description),
                    priority: self.draft.priority,
                    tags: parse_tags(&self.draft.tags),
                    due_date,
                };
                Some(self.issue(TaskRequest::Create(task)))
            }
            PromptState::ViewId => {
                if input.is_empty() {
                    return self.fail_validation(ValidationError::EmptyInput("a task number or ID"));
                }
                let id = parse_task_id_or_index(input, self.cache.index_map());
                Some(self.issue(TaskRequest::FetchTask { id }))
            }
            PromptState::CompleteIndex => match parse_task_index(input, self.cache.index_map()) {
                Ok(id) => Some(self.issue(TaskRequest::Complete { id })),
                Err(err) => self.fail_validation(err),
            },
            PromptState::DeleteIndex => match parse_task_index(input, self.cache.index_map()) {
                Ok(id) => Some(self.issue(TaskRequest::Delete { id })),
                Err(err) => self.fail_validation(err),
            },
            PromptState::UpdateId => {
                if input.is_empty() {
                    return self.fail_validation(ValidationError::EmptyInput("a task number or ID"));
                }
                self.update.task_id = parse_task_id_or_index(input, self.cache.index_map());
                self.enter_prompt(PromptState::UpdateField);
                None
            }
            PromptState::UpdateField => match input.parse::<UpdatableField>() {
                Ok(UpdatableField::Priority) => {
                    self.update.field = Some(UpdatableField::Priority);
                    self.priorities.select(&TaskPriority::Medium);
                    self.enter_prompt(PromptState::UpdatePriority);
                    None
                }
                Ok(field) => {
                    self.update.field = Some(field);
                    self.enter_prompt(PromptState::UpdateValue);
                    None
                }
                Err(message) => self.fail_validation(ValidationError::InvalidField(message)),
            },
            PromptState::UpdateValue => {
                let patch = match self.update.field {
                    Some(UpdatableField::Title) if input.is_empty() => {
                        return self.fail_validation(ValidationError::EmptyTitle);
                    }
                    Some(UpdatableField::Title) => TaskPatch::Title(input.to_string()),
                    Some(UpdatableField::Description) => {
                        TaskPatch::Description(optional_text(input))
                    }
                    Some(UpdatableField::Tags) => TaskPatch::Tags(parse_tags(input)),
                    Some(UpdatableField::DueDate) => match parse_due_date(input) {
                        Ok(date) => TaskPatch::DueDate(date),
                        Err(err) => return self.fail_validation(err),
                    },
                    Some(UpdatableField::Priority) | None => {
                        return self.fail_validation(ValidationError::InvalidField(format!(
                            "Invalid field. Choose one of: {}",
                            UpdatableField::names()
                        )));
                    }
                };
                let id = self.update.task_id.clone();
                Some(self.issue(TaskRequest::Update { id, patch }))
            }
            PromptState::SearchTerm => {
                if input.is_empty() {
                    return self.fail_validation(ValidationError::EmptyInput("a search term"));
                }
                Some(self.issue(TaskRequest::FetchTasks(AfterFetch::Search(
                    input.to_string(),
                ))))
            }
            PromptState::Menu
            | PromptState::CreatePriority
            | PromptState::UpdatePriority
            | PromptState::FilterPriority => None,
        }
    }

    /// Fold a finished remote call back into the page.
    pub fn apply_outcome(&mut self, outcome: TaskOutcome) -> Option<TaskCommand> {
        let Some(pending) = self.pending.filter(|p| p.call_id == outcome.call_id) else {
            debug!(call_id = outcome.call_id, "ignoring outcome of unknown call");
            return None;
        };
        self.pending = None;

        let reply = match outcome.result {
            Ok(reply) => reply,
            Err(err) => {
                self.report_api_error(&err);
                if !pending.detached {
                    self.return_to_menu();
                } else {
                    self.show_menu();
                }
                return None;
            }
        };

        match reply {
            TaskReply::Tasks { tasks, then } => {
                self.cache.replace(tasks);
                match then {
                    AfterFetch::List => {
                        self.transcript
                            .extend(task_list_lines(self.cache.numbered(), "No tasks found"));
                    }
                    AfterFetch::Search(term) => {
                        let notice = format!("No tasks matching '{term}'");
                        let lines = task_list_lines(self.cache.search(&term), &notice);
                        self.transcript.extend(lines);
                    }
                    AfterFetch::Prompt(next) => {
                        self.transcript
                            .extend(task_list_lines(self.cache.numbered(), "No tasks found"));
                        if !pending.detached && !self.cache.is_empty() {
                            self.enter_prompt(next);
                            return None;
                        }
                    }
                }
            }
            TaskReply::Task(task) => self.transcript.extend(task_detail_lines(&task)),
            TaskReply::Created { id } => {
                self.cache.invalidate();
                self.transcript.push(TranscriptLine::success(format!(
                    "✓ Task created successfully (ID: {id})"
                )));
            }
            TaskReply::Updated { .. } => {
                self.cache.invalidate();
                self.transcript
                    .push(TranscriptLine::success("✓ Task updated successfully"));
            }
            TaskReply::Completed { .. } => {
                self.cache.invalidate();
                self.transcript
                    .push(TranscriptLine::success("✓ Task marked as complete"));
            }
            TaskReply::Deleted { .. } => {
                self.cache.invalidate();
                self.transcript
                    .push(TranscriptLine::success("✓ Task deleted successfully"));
            }
            TaskReply::Filtered { priority, tasks } => {
                self.cache.replace(tasks);
                let label = priority.map(|p| p.as_str()).unwrap_or("any");
                self.transcript.push(TranscriptLine::info(format!(
                    "Tasks with priority {label}:"
                )));
                let notice = format!("No tasks with priority {label}");
                self.transcript
                    .extend(task_list_lines(self.cache.numbered(), &notice));
            }
        }

        if pending.detached {
            self.show_menu();
        } else {
            self.return_to_menu();
        }
        None
    }

    /// Return to the menu, dropping the draft and update context.
    pub fn reset_to_menu(&mut self) {
        self.prompt = PromptState::Menu;
        self.input.clear();
        self.draft = TaskDraft::default();
        self.update = UpdateContext::default();
        self.menu.reset();
    }

    fn cancel(&mut self) {
        if self.prompt == PromptState::Menu {
            return;
        }
        if let Some(pending) = self.pending.as_mut() {
            debug!(call_id = pending.call_id, "detaching pending call");
            pending.detached = true;
        }
        self.transcript.push(TranscriptLine::warning(CANCELLED));
        self.return_to_menu();
    }

    fn return_to_menu(&mut self) {
        self.reset_to_menu();
        self.show_menu();
    }

    fn menu_block() -> [TranscriptLine; 2] {
        [TranscriptLine::blank(), TranscriptLine::info(MENU_PROMPT)]
    }

    /// Append the menu prompt, retracting the previous copy so only one
    /// stays in the transcript.
    fn show_menu(&mut self) {
        if let Some(mark) = self.menu_mark.take() {
            self.transcript.retract_block(mark, &Self::menu_block());
        }
        self.menu_mark = Some(self.transcript.len());
        self.transcript.extend(Self::menu_block());
    }

    fn enter_prompt(&mut self, next: PromptState) {
        self.prompt = next;
        self.input.clear();
        let text = match next {
            PromptState::Menu => return self.show_menu(),
            PromptState::CreateTitle => "Enter task title:".to_string(),
            PromptState::CreateDescription => "Enter description (optional):".to_string(),
            PromptState::CreatePriority => {
                "Select priority (↑/↓ to move, Enter to confirm):".to_string()
            }
            PromptState::CreateTags => "Enter tags (comma-separated, optional):".to_string(),
            PromptState::CreateDueDate => "Enter due date (DD-MM-YYYY, optional):".to_string(),
            PromptState::ViewId => "Enter task number or ID:".to_string(),
            PromptState::CompleteIndex => "Enter task number to complete:".to_string(),
            PromptState::DeleteIndex => "Enter task number to delete:".to_string(),
            PromptState::UpdateId => "Enter task number or ID to update:".to_string(),
            PromptState::UpdateField => format!(
                "Enter field to update ({}):",
                UpdatableField::names()
            ),
            PromptState::UpdateValue => match self.update.field {
                Some(UpdatableField::DueDate) => {
                    "Enter new due date (DD-MM-YYYY, empty to clear):".to_string()
                }
                Some(UpdatableField::Tags) => "Enter new tags (comma-separated):".to_string(),
                Some(field) => format!("Enter new {field}:"),
                None => "Enter new value:".to_string(),
            },
            PromptState::UpdatePriority => "Select new priority:".to_string(),
            PromptState::SearchTerm => "Enter search term:".to_string(),
            PromptState::FilterPriority => "Select priority to filter by:".to_string(),
        };
        self.transcript.push(TranscriptLine::info(text));
    }

    fn active_picker_up(&mut self) {
        if self.prompt == PromptState::Menu {
            self.menu.move_up();
        } else {
            self.priorities.move_up();
        }
    }

    fn active_picker_down(&mut self) {
        if self.prompt == PromptState::Menu {
            self.menu.move_down();
        } else {
            self.priorities.move_down();
        }
    }

    fn commit_choice(&mut self) -> Option<TaskCommand> {
        if self.is_busy() {
            return None;
        }
        if self.prompt == PromptState::Menu {
            let option = *self.menu.selected()?;
            return self.select_menu_option(option);
        }

        let priority = *self.priorities.selected()?;
        self.transcript.push(TranscriptLine::echo(priority.as_str()));
        match self.prompt {
            PromptState::CreatePriority => {
                self.draft.priority = priority;
                self.enter_prompt(PromptState::CreateTags);
                None
            }
            PromptState::UpdatePriority => {
                let id = self.update.task_id.clone();
                Some(self.issue(TaskRequest::Update {
                    id,
                    patch: TaskPatch::Priority(priority),
                }))
            }
            PromptState::FilterPriority => Some(self.issue(TaskRequest::Filter(
                FilterTasksParams::by_priority(priority),
            ))),
            _ => None,
        }
    }

    fn select_menu_option(&mut self, option: MenuOption) -> Option<TaskCommand> {
        if option == MenuOption::Clear {
            self.transcript.clear();
            self.menu_mark = None;
            self.return_to_menu();
            return None;
        }

        self.transcript.push(TranscriptLine::echo(option.label()));
        match option {
            MenuOption::Create => {
                self.draft = TaskDraft::default();
                self.enter_prompt(PromptState::CreateTitle);
                None
            }
            MenuOption::ListAll => Some(self.issue(TaskRequest::FetchTasks(AfterFetch::List))),
            MenuOption::View => Some(self.fetch_then_prompt(PromptState::ViewId)),
            MenuOption::Complete => Some(self.fetch_then_prompt(PromptState::CompleteIndex)),
            MenuOption::Update => Some(self.fetch_then_prompt(PromptState::UpdateId)),
            MenuOption::Delete => Some(self.fetch_then_prompt(PromptState::DeleteIndex)),
            MenuOption::Search => {
                self.enter_prompt(PromptState::SearchTerm);
                None
            }
            MenuOption::Filter => {
                self.priorities.select(&TaskPriority::Low);
                self.enter_prompt(PromptState::FilterPriority);
                None
            }
            MenuOption::Clear => None,
        }
    }

    fn fetch_then_prompt(&mut self, next: PromptState) -> TaskCommand {
        self.update = UpdateContext::default();
        self.issue(TaskRequest::FetchTasks(AfterFetch::Prompt(next)))
    }

    fn issue(&mut self, request: TaskRequest) -> TaskCommand {
        self.next_call_id += 1;
        let call_id = self.next_call_id;
        self.pending = Some(PendingCall {
            call_id,
            detached: false,
        });
        debug!(call_id, prompt = %self.prompt, "issuing task request");
        TaskCommand { call_id, request }
    }

    fn fail_validation(&mut self, err: ValidationError) -> Option<TaskCommand> {
        self.transcript
            .push(TranscriptLine::error(format!("Error: {err}")));
        self.return_to_menu();
        None
    }

    fn report_api_error(&mut self, err: &ApiError) {
        warn!(error = %err, "task request failed");
        self.transcript
            .push(TranscriptLine::error(format!("Error: {err}")));
    }

    fn input_title(&self) -> String {
        if self.is_busy() {
            return "Waiting for response...".to_string();
        }
        match self.prompt {
            PromptState::Menu => "↑/↓ to move, Enter to select, Ctrl+C to quit".to_string(),
            p if p.is_priority_picker() => "↑/↓ to move, Enter to confirm, Esc to cancel".into(),
            _ => "Type your answer, Enter to submit, Esc to cancel".to_string(),
        }
    }
}

impl TerminalPage for TaskTerminal {
    type Command = TaskCommand;
    type Outcome = TaskOutcome;

    fn startup(&mut self) -> Option<TaskCommand> {
        None
    }

    fn handle_key(&mut self, key: KeyInput) -> Option<TaskCommand> {
        self.on_key(key)
    }

    fn apply_outcome(&mut self, outcome: TaskOutcome) -> Option<TaskCommand> {
        TaskTerminal::apply_outcome(self, outcome)
    }

    fn view(&self) -> PageView<'_> {
        let picker = if self.prompt == PromptState::Menu {
            Some(PickerView {
                options: self.menu.options().iter().map(|o| o.label().to_string()).collect(),
                selected: self.menu.index(),
            })
        } else if self.prompt.is_priority_picker() {
            Some(PickerView {
                options: self
                    .priorities
                    .options()
                    .iter()
                    .map(|p| p.as_str().to_string())
                    .collect(),
                selected: self.priorities.index(),
            })
        } else {
            None
        };

        PageView {
            title: TITLE,
            status: Some(format!("mode: {}", self.prompt)),
            transcript: &self.transcript,
            picker,
            input: &self.input,
            input_title: self.input_title(),
            busy: self.is_busy(),
            busy_label: "Loading...",
            suggestions: Vec::new(),
        }
    }

    fn take_log_lines(&mut self) -> Vec<TranscriptLine> {
        self.transcript.take_unlogged()
    }
}
