use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info, warn};

use crate::api::sessions::SessionService;
use crate::api::ApiError;
use crate::core::chat::{ChatCommand, ChatOutcome, ChatReply, ChatRequest};
use crate::core::page::CommandExecutor;

pub struct ChatExecutor {
    service: Arc<dyn SessionService>,
}

impl ChatExecutor {
    pub fn new(service: Arc<dyn SessionService>) -> Self {
        Self { service }
    }

    async fn run(&self, request: ChatRequest) -> Result<ChatReply, ApiError> {
        match request {
            ChatRequest::InitSession => match self.service.last_session().await {
                Ok(session) => Ok(ChatReply::SessionReady(session)),
                Err(err) => {
                    info!(error = %err, "no previous session, creating one");
                    let session = self.service.create_session(None).await?;
                    Ok(ChatReply::SessionReady(session))
                }
            },
            ChatRequest::SendMessage {
                session_id,
                message,
            } => {
                let response = self.service.send_message(session_id, &message).await?;
                Ok(ChatReply::Message(response))
            }
            ChatRequest::NewSession { name } => {
                let session = self.service.create_session(name.as_deref()).await?;
                Ok(ChatReply::Created(session))
            }
            ChatRequest::SaveSession { session_id, name } => {
                self.service.save_session(session_id, &name).await?;
                Ok(ChatReply::Saved { name })
            }
            ChatRequest::DeleteSession { name } => {
                self.service.delete_session(&name).await?;
                Ok(ChatReply::Deleted { name })
            }
            ChatRequest::ListSessions => Ok(ChatReply::Sessions(self.service.list_sessions().await?)),
            ChatRequest::ResumeSession { name } => {
                let session = self.service.session_by_name(&name).await?;
                Ok(ChatReply::Resumed { name, session })
            }
            ChatRequest::SetRole { session_id, role } => {
                self.service.set_role(session_id, Some(&role)).await?;
                Ok(ChatReply::RoleSet { role })
            }
            ChatRequest::FetchModels(then) => {
                let models = self.service.list_models().await?;
                Ok(ChatReply::Models { models, then })
            }
            ChatRequest::SetModel { session_id, model } => {
                self.service.set_model(session_id, &model.id).await?;
                Ok(ChatReply::ModelSet(model))
            }
        }
    }
}

#[async_trait]
impl CommandExecutor for ChatExecutor {
    type Command = ChatCommand;
    type Outcome = ChatOutcome;

    async fn execute(&self, command: ChatCommand) -> ChatOutcome {
        let ChatCommand { call_id, request } = command;
        debug!(call_id, ?request, "running chat command");
        let result = self.run(request).await;
        if let Err(err) = &result {
            warn!(call_id, error = %err, "chat command failed");
        }
        ChatOutcome { call_id, result }
    }
}
