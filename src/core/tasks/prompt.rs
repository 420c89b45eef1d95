use std::fmt;
use std::str::FromStr;

use crate::api::tasks::TaskPriority;

/// Interaction mode of the task terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub enum PromptState {
    #[default]
    Menu,
    CreateTitle,
    CreateDescription,
    CreatePriority,
    CreateTags,
    CreateDueDate,
    ViewId,
    CompleteIndex,
    DeleteIndex,
    UpdateId,
    UpdateField,
    UpdateValue,
    UpdatePriority,
    SearchTerm,
    FilterPriority,
}

impl PromptState {
    pub fn as_str(self) -> &'static str {
        match self {
            PromptState::Menu => "menu",
            PromptState::CreateTitle => "create-title",
            PromptState::CreateDescription => "create-description",
            PromptState::CreatePriority => "create-priority",
            PromptState::CreateTags => "create-tags",
            PromptState::CreateDueDate => "create-duedate",
            PromptState::ViewId => "view-id",
            PromptState::CompleteIndex => "complete-index",
            PromptState::DeleteIndex => "delete-index",
            PromptState::UpdateId => "update-id",
            PromptState::UpdateField => "update-field",
            PromptState::UpdateValue => "update-value",
            PromptState::UpdatePriority => "update-priority",
            PromptState::SearchTerm => "search-term",
            PromptState::FilterPriority => "filter-priority",
        }
    }

    /// Modes driven by Up/Down and Enter rather than typed text.
    pub fn is_choice(self) -> bool {
        matches!(
            self,
            PromptState::Menu
                | PromptState::CreatePriority
                | PromptState::UpdatePriority
                | PromptState::FilterPriority
        )
    }

    pub fn is_priority_picker(self) -> bool {
        self.is_choice() && self != PromptState::Menu
    }
}

impl fmt::Display for PromptState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuOption {
    Create,
    ListAll,
    View,
    Complete,
    Update,
    Delete,
    Search,
    Filter,
    Clear,
}

impl MenuOption {
    pub const ALL: [MenuOption; 9] = [
        MenuOption::Create,
        MenuOption::ListAll,
        MenuOption::View,
        MenuOption::Complete,
        MenuOption::Update,
        MenuOption::Delete,
        MenuOption::Search,
        MenuOption::Filter,
        MenuOption::Clear,
    ];

    pub fn label(self) -> &'static str {
        match self {
            MenuOption::Create => "Create Task",
            MenuOption::ListAll => "List All Tasks",
            MenuOption::View => "View Task by ID",
            MenuOption::Complete => "Complete Task",
            MenuOption::Update => "Update Task",
            MenuOption::Delete => "Delete Task",
            MenuOption::Search => "Search Tasks",
            MenuOption::Filter => "Filter Tasks",
            MenuOption::Clear => "Clear",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdatableField {
    Title,
    Description,
    Priority,
    Tags,
    DueDate,
}

impl UpdatableField {
    pub const ALL: [UpdatableField; 5] = [
        UpdatableField::Title,
        UpdatableField::Description,
        UpdatableField::Priority,
        UpdatableField::Tags,
        UpdatableField::DueDate,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            UpdatableField::Title => "title",
            UpdatableField::Description => "description",
            UpdatableField::Priority => "priority",
            UpdatableField::Tags => "tags",
            UpdatableField::DueDate => "duedate",
        }
    }

    pub fn names() -> String {
        Self::ALL
            .iter()
            .map(|f| f.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl FromStr for UpdatableField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::ALL
            .into_iter()
            .find(|f| f.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| format!("Invalid field. Choose one of: {}", Self::names()))
    }
}

impl fmt::Display for UpdatableField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fields collected while walking through task creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskDraft {
    pub title: String,
    pub description: String,
    pub priority: TaskPriority,
    pub tags: String,
    pub due_date: String,
}

impl Default for TaskDraft {
    fn default() -> Self {
        Self {
            title: String::new(),
            description: String::new(),
            priority: TaskPriority::Medium,
            tags: String::new(),
            due_date: String::new(),
        }
    }
}

/// Target and chosen field of an in-progress update.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct UpdateContext {
    pub task_id: String,
    pub field: Option<UpdatableField>,
}
