use crate::api::models::ModelInfo;
use crate::api::sessions::ChatSession;
use crate::api::ApiError;

/// What to do with a freshly fetched model list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AfterModels {
    /// Print the list with the current model marked.
    Show,
    /// Switch to the model at this 1-based position.
    Select(usize),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatRequest {
    /// Resume the most recent session, creating one when there is none.
    InitSession,
    SendMessage { session_id: i64, message: String },
    NewSession { name: Option<String> },
    SaveSession { session_id: i64, name: String },
    DeleteSession { name: String },
    ListSessions,
    ResumeSession { name: String },
    SetRole { session_id: i64, role: String },
    FetchModels(AfterModels),
    SetModel { session_id: i64, model: ModelInfo },
}

impl ChatRequest {
    /// Label shown next to the spinner while the request runs.
    pub fn busy_label(&self) -> &'static str {
        match self {
            ChatRequest::InitSession => "Connecting...",
            ChatRequest::SendMessage { .. } => "Thinking...",
            _ => "Working...",
        }
    }
}

/// Remote work requested by the chat terminal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatCommand {
    pub call_id: u64,
    pub request: ChatRequest,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatReply {
    SessionReady(ChatSession),
    Message(String),
    Created(ChatSession),
    Saved { name: String },
    Deleted { name: String },
    Sessions(Vec<ChatSession>),
    Resumed { name: String, session: ChatSession },
    RoleSet { role: String },
    Models {
        models: Vec<ModelInfo>,
        then: AfterModels,
    },
    ModelSet(ModelInfo),
}

/// Result of a [`ChatCommand`], carrying the same call id.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatOutcome {
    pub call_id: u64,
    pub result: Result<ChatReply, ApiError>,
}

impl ChatOutcome {
    pub fn ok(call_id: u64, reply: ChatReply) -> Self {
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
