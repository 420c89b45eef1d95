use crate::api::models::ModelInfo;
use crate::api::sessions::{ChatSession, SessionService};
use crate::api::tasks::{FilterTasksParams, Task, TaskPriority, TaskService, TaskWrite};
use crate::api::{ApiError, Gateway};
use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use std::sync::{Arc, Mutex};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::task::JoinHandle;

/// A canned response served by [`MockHttpServer`].
#[derive(Debug, Clone)]
pub struct MockResponse {
    pub status: u16,
    pub reason: &'static str,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl MockResponse {
    pub fn json(status: u16, body: serde_json::Value) -> Self {
        Self {
            status,
            reason: reason_for(status),
            headers: vec![("content-type".to_string(), "application/json".to_string())],
            body: body.to_string(),
        }
    }

    pub fn text(status: u16, body: &str) -> Self {
        Self {
            status,
            reason: reason_for(status),
            headers: Vec::new(),
            body: body.to_string(),
        }
    }

    pub fn empty(status: u16) -> Self {
        Self::text(status, "")
    }

    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.headers.push((name.to_string(), value.to_string()));
        self
    }
}

fn reason_for(status: u16) -> &'static str {
    match status {
        200 => "OK",
        201 => "Created",
        204 => "No Content",
        400 => "Bad Request",
        404 => "Not Found",
        429 => "Too Many Requests",
        500 => "Internal Server Error",
        _ => "Unknown",
    }
}

/// A request captured by [`MockHttpServer`].
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: String,
    pub target: String,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl RecordedRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    pub fn json_body(&self) -> serde_json::Value {
        serde_json::from_str(&self.body).expect("request body should be JSON")
    }
}

/// Minimal HTTP/1.1 server answering one scripted response per connection.
pub struct MockHttpServer {
    pub base_url: String,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
    handle: JoinHandle<()>,
}

impl MockHttpServer {
    pub async fn start(responses: Vec<MockResponse>) -> Self {
        Self::start_with_prefix(responses, "").await
    }

    pub async fn start_with_prefix(responses: Vec<MockResponse>, prefix: &str) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("listener should bind");
        let addr = listener.local_addr().expect("local addr should resolve");
        let requests = Arc::new(Mutex::new(Vec::new()));
        let captured = Arc::clone(&requests);

        let handle = tokio::spawn(async move {
            for response in responses {
                let Ok((mut stream, _)) = listener.accept().await else {
                    return;
                };
                let Ok(request) = read_request(&mut stream).await else {
                    return;
                };
                captured.lock().expect("request log lock").push(request);
                let _ = write_response(&mut stream, &response).await;
            }
        });

        Self {
            base_url: format!("http://{addr}{prefix}"),
            requests,
            handle,
        }
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().expect("request log lock").clone()
    }
}

impl Drop for MockHttpServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

async fn read_request(stream: &mut TcpStream) -> Result<RecordedRequest, String> {
    let mut buffer = Vec::new();
    let mut header_end = None;
    while header_end.is_none() {
        let mut chunk = [0_u8; 1024];
        let read = stream.read(&mut chunk).await.map_err(|e| e.to_string())?;
        if read == 0 {
            return Err("Unexpected EOF while reading HTTP headers".to_string());
        }
        buffer.extend_from_slice(&chunk[..read]);
        header_end = buffer
            .windows(4)
            .position(|window| window == b"\r\n\r\n")
            .map(|index| index + 4);
    }

    let header_end = header_end.expect("header end should exist");
    let header_text = std::str::from_utf8(&buffer[..header_end]).map_err(|e| e.to_string())?;
    let mut lines = header_text.split("\r\n").filter(|line| !line.is_empty());
    let request_line = lines.next().ok_or("Missing HTTP request line")?;
    let mut parts = request_line.split_whitespace();
    let method = parts.next().unwrap_or_default().to_string();
    let target = parts.next().unwrap_or_default().to_string();

    let mut headers = Vec::new();
    let mut content_length = 0_usize;
    for line in lines {
        let Some((name, value)) = line.split_once(':') else {
            continue;
        };
        let value = value.trim().to_string();
        if name.eq_ignore_ascii_case("content-length") {
            content_length = value.parse().map_err(|_| "bad content-length")?;
        }
        headers.push((name.to_string(), value));
    }

    let mut body = buffer[header_end..].to_vec();
    while body.len() < content_length {
        let mut chunk = vec![0_u8; content_length - body.len()];
        let read = stream.read(&mut chunk).await.map_err(|e| e.to_string())?;
        if read == 0 {
            break;
        }
        body.extend_from_slice(&chunk[..read]);
    }

    Ok(RecordedRequest {
        method,
        target,
        headers,
        body: String::from_utf8_lossy(&body).to_string(),
    })
}

async fn write_response(stream: &mut TcpStream, response: &MockResponse) -> std::io::Result<()> {
    let mut raw = format!("HTTP/1.1 {} {}\r\n", response.status, response.reason);
    for (name, value) in &response.headers {
        raw.push_str(&format!("{name}: {value}\r\n"));
    }
    raw.push_str(&format!(
        "content-length: {}\r\nconnection: close\r\n\r\n{}",
        response.body.len(),
        response.body
    ));
    stream.write_all(raw.as_bytes()).await?;
    stream.shutdown().await
}

/// Gateway whose client ignores proxy settings from the environment.
pub fn test_gateway() -> Gateway {
    let client = reqwest::Client::builder()
        .no_proxy()
        .build()
        .expect("client should build");
    Gateway::new(client)
}

pub fn create_test_task(id: &str, title: &str, priority: TaskPriority) -> Task {
    Task {
        id: id.to_string(),
        title: title.to_string(),
        description: None,
        priority,
        tags: Vec::new(),
        created_at: Utc.with_ymd_and_hms(2025, 1, 15, 9, 30, 0).unwrap(),
        due_date: None,
        is_completed: false,
    }
}

pub fn create_test_tasks() -> Vec<Task> {
    vec![
        create_test_task(
            "3f0c6a8e-1b2d-4c5e-8f90-a1b2c3d4e5f6",
            "Buy groceries",
            TaskPriority::Medium,
        ),
        Task {
            description: Some("Quarterly numbers for the board".to_string()),
            tags: vec!["work".to_string()],
            ..create_test_task(
                "7a1d2e3f-4b5c-4d6e-9f00-112233445566",
                "Write report",
                TaskPriority::High,
            )
        },
        Task {
            is_completed: true,
            ..create_test_task(
                "c9b8a7d6-e5f4-4a3b-8c2d-998877665544",
                "Water plants",
                TaskPriority::Low,
            )
        },
    ]
}

pub fn create_test_session(id: i64, name: &str) -> ChatSession {
    ChatSession {
        id,
        name: name.to_string(),
        display_name: None,
        role: None,
        model: None,
    }
}

pub fn create_test_models() -> Vec<ModelInfo> {
    vec![
        ModelInfo {
            id: "claude-sonnet-4-20250514".to_string(),
            display_name: "Claude Sonnet 4".to_string(),
            created_at: None,
        },
        ModelInfo {
            id: "claude-opus-4-20250514".to_string(),
            display_name: "Claude Opus 4".to_string(),
            created_at: None,
        },
    ]
}

fn not_found(message: &str) -> ApiError {
    ApiError::Http {
        status: 404,
        message: message.to_string(),
        data: None,
    }
}

/// Calls recorded by the mock services.
#[derive(Debug, Clone, PartialEq)]
pub enum ServiceCall {
    ListTasks,
    GetTask(String),
    CreateTask(TaskWrite),
    UpdateTask(String, TaskWrite),
    CompleteTask(String),
    DeleteTask(String),
    FilterTasks(FilterTasksParams),
    ListSessions,
    GetSession(i64),
    LastSession,
    SessionByName(String),
    CreateSession(Option<String>),
    SaveSession(i64, String),
    DeleteSession(String),
    SendMessage(i64, String),
    SetRole(i64, Option<String>),
    SetModel(i64, String),
    ListModels,
}

#[derive(Default)]
struct CallLog {
    calls: Mutex<Vec<ServiceCall>>,
    failure: Mutex<Option<ApiError>>,
}

impl CallLog {
    fn record(&self, call: ServiceCall) -> Result<(), ApiError> {
        self.calls.lock().expect("call log lock").push(call);
        match self.failure.lock().expect("failure lock").take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    fn calls(&self) -> Vec<ServiceCall> {
        self.calls.lock().expect("call log lock").clone()
    }

    fn fail_next(&self, err: ApiError) {
        *self.failure.lock().expect("failure lock") = Some(err);
    }
}

/// In-memory task backend recording every call.
#[derive(Default)]
pub struct MockTaskService {
    tasks: Mutex<Vec<Task>>,
    log: CallLog,
}

impl MockTaskService {
    pub fn new(tasks: Vec<Task>) -> Self {
        Self {
            tasks: Mutex::new(tasks),
            log: CallLog::default(),
        }
    }

    pub fn with_default_tasks() -> Self {
        Self::new(create_test_tasks())
    }

    pub fn tasks(&self) -> Vec<Task> {
        self.tasks.lock().expect("tasks lock").clone()
    }

    pub fn calls(&self) -> Vec<ServiceCall> {
        self.log.calls()
    }

    /// Make the next call fail with `err`.
    pub fn fail_next(&self, err: ApiError) {
        self.log.fail_next(err);
    }
}

#[async_trait]
impl TaskService for MockTaskService {
    async fn list_tasks(&self) -> Result<Vec<Task>, ApiError> {
        self.log.record(ServiceCall::ListTasks)?;
        Ok(self.tasks())
    }

    async fn get_task(&self, id: &str) -> Result<Task, ApiError> {
        self.log.record(ServiceCall::GetTask(id.to_string()))?;
        self.tasks()
            .into_iter()
            .find(|t| t.id == id)
            .ok_or_else(|| not_found("Task not found"))
    }

    async fn create_task(&self, task: &TaskWrite) -> Result<String, ApiError> {
        self.log.record(ServiceCall::CreateTask(task.clone()))?;
        let id = "0a1b2c3d-4e5f-4a6b-8c7d-9e0f1a2b3c4d".to_string();
        let mut created = create_test_task(&id, &task.title, task.priority);
        created.description = task.description.clone();
        created.tags = task.tags.clone();
        self.tasks.lock().expect("tasks lock").push(created);
        Ok(id)
    }

    async fn update_task(&self, id: &str, task: &TaskWrite) -> Result<(), ApiError> {
        self.log
            .record(ServiceCall::UpdateTask(id.to_string(), task.clone()))?;
        let mut tasks = self.tasks.lock().expect("tasks lock");
        let existing = tasks
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or_else(|| not_found("Task not found"))?;
        existing.title = task.title.clone();
        existing.description = task.description.clone();
        existing.priority = task.priority;
        existing.tags = task.tags.clone();
        Ok(())
    }

    async fn complete_task(&self, id: &str) -> Result<(), ApiError> {
        self.log.record(ServiceCall::CompleteTask(id.to_string()))?;
        let mut tasks = self.tasks.lock().expect("tasks lock");
        let existing = tasks
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or_else(|| not_found("Task not found"))?;
        existing.is_completed = true;
        Ok(())
    }

    async fn delete_task(&self, id: &str) -> Result<(), ApiError> {
        self.log.record(ServiceCall::DeleteTask(id.to_string()))?;
        self.tasks.lock().expect("tasks lock").retain(|t| t.id != id);
        Ok(())
    }

    async fn filter_tasks(&self, params: &FilterTasksParams) -> Result<Vec<Task>, ApiError> {
        self.log.record(ServiceCall::FilterTasks(params.clone()))?;
        Ok(self
            .tasks()
            .into_iter()
            .filter(|t| params.priority.is_none_or(|p| t.priority == p))
            .collect())
    }
}

/// In-memory session backend recording every call.
pub struct MockSessionService {
    sessions: Mutex<Vec<ChatSession>>,
    models: Vec<ModelInfo>,
    log: CallLog,
}

impl MockSessionService {
    pub fn new(sessions: Vec<ChatSession>) -> Self {
        Self {
            sessions: Mutex::new(sessions),
            models: create_test_models(),
            log: CallLog::default(),
        }
    }

    pub fn sessions(&self) -> Vec<ChatSession> {
        self.sessions.lock().expect("sessions lock").clone()
    }

    pub fn calls(&self) -> Vec<ServiceCall> {
        self.log.calls()
    }

    pub fn fail_next(&self, err: ApiError) {
        self.log.fail_next(err);
    }

    fn find(&self, name: &str) -> Result<ChatSession, ApiError> {
        self.sessions()
            .into_iter()
            .find(|s| s.name == name || s.display_name.as_deref() == Some(name))
            .ok_or_else(|| not_found("Session not found"))
    }

    fn modify(&self, id: i64, change: impl FnOnce(&mut ChatSession)) -> Result<(), ApiError> {
        let mut sessions = self.sessions.lock().expect("sessions lock");
        let session = sessions
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or_else(|| not_found("Session not found"))?;
        change(session);
        Ok(())
    }
}

#[async_trait]
impl SessionService for MockSessionService {
    async fn list_sessions(&self) -> Result<Vec<ChatSession>, ApiError> {
        self.log.record(ServiceCall::ListSessions)?;
        Ok(self.sessions())
    }

    async fn get_session(&self, id: i64) -> Result<ChatSession, ApiError> {
        self.log.record(ServiceCall::GetSession(id))?;
        self.sessions()
            .into_iter()
            .find(|s| s.id == id)
            .ok_or_else(|| not_found("Session not found"))
    }

    async fn last_session(&self) -> Result<ChatSession, ApiError> {
        self.log.record(ServiceCall::LastSession)?;
        self.sessions()
            .last()
            .cloned()
            .ok_or_else(|| not_found("No sessions found"))
    }

    async fn session_by_name(&self, name: &str) -> Result<ChatSession, ApiError> {
        self.log
            .record(ServiceCall::SessionByName(name.to_string()))?;
        self.find(name)
    }

    async fn create_session(&self, name: Option<&str>) -> Result<ChatSession, ApiError> {
        self.log
            .record(ServiceCall::CreateSession(name.map(str::to_string)))?;
        let mut sessions = self.sessions.lock().expect("sessions lock");
        let id = sessions.iter().map(|s| s.id).max().unwrap_or(0) + 1;
        let mut session = create_test_session(id, name.unwrap_or(&format!("session_{id}")));
        session.display_name = name.map(str::to_string);
        sessions.push(session.clone());
        Ok(session)
    }

    async fn save_session(&self, id: i64, display_name: &str) -> Result<(), ApiError> {
        self.log
            .record(ServiceCall::SaveSession(id, display_name.to_string()))?;
        self.modify(id, |s| s.display_name = Some(display_name.to_string()))
    }

    async fn delete_session(&self, name: &str) -> Result<(), ApiError> {
        self.log
            .record(ServiceCall::DeleteSession(name.to_string()))?;
        let target = self.find(name)?;
        self.sessions
            .lock()
            .expect("sessions lock")
            .retain(|s| s.id != target.id);
        Ok(())
    }

    async fn send_message(&self, id: i64, message: &str) -> Result<String, ApiError> {
        self.log
            .record(ServiceCall::SendMessage(id, message.to_string()))?;
        Ok(format!("echo: {message}"))
    }

    async fn set_role(&self, id: i64, role: Option<&str>) -> Result<(), ApiError> {
        self.log
            .record(ServiceCall::SetRole(id, role.map(str::to_string)))?;
        self.modify(id, |s| s.role = role.map(str::to_string))
    }

    async fn set_model(&self, id: i64, model: &str) -> Result<(), ApiError> {
        self.log
            .record(ServiceCall::SetModel(id, model.to_string()))?;
        self.modify(id, |s| s.model = Some(model.to_string()))
    }

    async fn list_models(&self) -> Result<Vec<ModelInfo>, ApiError> {
        self.log.record(ServiceCall::ListModels)?;
        Ok(self.models.clone())
    }
}
