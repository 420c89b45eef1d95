use crate::api::tasks::{FilterTasksParams, Task, TaskPatch, TaskPriority, TaskWrite};
use crate::api::ApiError;

use super::prompt::PromptState;

/// What to do with a freshly fetched task list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AfterFetch {
    /// Show it and go back to the menu.
    List,
    /// Show it, then ask for a task reference in this mode.
    Prompt(PromptState),
    /// Show only the entries matching the term.
    Search(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum TaskRequest {
    FetchTasks(AfterFetch),
    FetchTask { id: String },
    Create(TaskWrite),
    /// Re-fetch the task, apply the patch and write the full record.
    Update { id: String, patch: TaskPatch },
    Complete { id: String },
    Delete { id: String },
    Filter(FilterTasksParams),
}

/// Remote work requested by the task terminal.
#[derive(Debug, Clone, PartialEq)]
pub struct TaskCommand {
    pub call_id: u64,
    pub request: TaskRequest,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TaskReply {
    Tasks { tasks: Vec<Task>, then: AfterFetch },
    Task(Task),
    Created { id: String },
    Updated { id: String },
    Completed { id: String },
    Deleted { id: String },
    Filtered {
        priority: Option<TaskPriority>,
        tasks: Vec<Task>,
    },
}

/// Result of a [`TaskCommand`], carrying the same call id.
#[derive(Debug, Clone, PartialEq)]
pub struct TaskOutcome {
    pub call_id: u64,
    pub result: Result<TaskReply, ApiError>,
}

impl TaskOutcome {
    pub fn ok(call_id: u64, reply: TaskReply) -> Self {
        Self {
            call_id,
            result: Ok(reply),
        }
    }

    pub fn err(call_id: u64, error: ApiError) -> Self {
        Self {
            call_id,
            result: Err(error),
        }
    }
}
