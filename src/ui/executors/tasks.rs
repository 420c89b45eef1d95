use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::api::tasks::{TaskService, TaskWrite};
use crate::api::ApiError;
use crate::core::page::CommandExecutor;
use crate::core::tasks::{TaskCommand, TaskOutcome, TaskReply, TaskRequest};

pub struct TaskExecutor {
    service: Arc<dyn TaskService>,
}

impl TaskExecutor {
    pub fn new(service: Arc<dyn TaskService>) -> Self {
        Self { service }
    }

    async fn run(&self, request: TaskRequest) -> Result<TaskReply, ApiError> {
        match request {
            TaskRequest::FetchTasks(then) => {
                let tasks = self.service.list_tasks().await?;
                Ok(TaskReply::Tasks { tasks, then })
            }
            TaskRequest::FetchTask { id } => Ok(TaskReply::Task(self.service.get_task(&id).await?)),
            TaskRequest::Create(task) => {
                let id = self.service.create_task(&task).await?;
                Ok(TaskReply::Created { id })
            }
            TaskRequest::Update { id, patch } => {
                let current = self.service.get_task(&id).await?;
                let mut record = TaskWrite::from_task(&current);
                record.apply(patch);
                self.service.update_task(&current.id, &record).await?;
                Ok(TaskReply::Updated { id: current.id })
            }
            TaskRequest::Complete { id } => {
                self.service.complete_task(&id).await?;
                Ok(TaskReply::Completed { id })
            }
            TaskRequest::Delete { id } => {
                self.service.delete_task(&id).await?;
                Ok(TaskReply::Deleted { id })
            }
            TaskRequest::Filter(params) => {
                let tasks = self.service.filter_tasks(&params).await?;
                Ok(TaskReply::Filtered {
                    priority: params.priority,
                    tasks,
                })
            }
        }
    }
}

#[async_trait]
impl CommandExecutor for TaskExecutor {
    type Command = TaskCommand;
    type Outcome = TaskOutcome;

    async fn execute(&self, command: TaskCommand) -> TaskOutcome {
        let TaskCommand { call_id, request } = command;
        debug!(call_id, ?request, "running task command");
        let result = self.run(request).await;
        if let Err(err) = &result {
            warn!(call_id, error = %err, "task command failed");
        }
        TaskOutcome { call_id, result }
    }
}
