//! Task-management backend accessor.

use std::fmt;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use reqwest::{Method, Url};
use serde::de::{self, IgnoredAny};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{json, Map, Value};
use tracing::info;
use uuid::Uuid;

use super::{ApiError, Gateway, RequestOptions};
use crate::utils::url::{endpoint_url, with_query};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum TaskPriority {
    Low,
    #[default]
    Medium,
    High,
    Critical,
}

impl TaskPriority {
    pub const ALL: [TaskPriority; 4] = [
        TaskPriority::Low,
        TaskPriority::Medium,
        TaskPriority::High,
        TaskPriority::Critical,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            TaskPriority::Low => "Low",
            TaskPriority::Medium => "Medium",
            TaskPriority::High => "High",
            TaskPriority::Critical => "Critical",
        }
    }

    /// Wire code used by the numeric encoding.
    pub fn code(self) -> u8 {
        match self {
            TaskPriority::Low => 0,
            TaskPriority::Medium => 1,
            TaskPriority::High => 2,
            TaskPriority::Critical => 3,
        }
    }

    pub fn from_code(code: u64) -> Option<Self> {
        match code {
            0 => Some(TaskPriority::Low),
            1 => Some(TaskPriority::Medium),
            2 => Some(TaskPriority::High),
            3 => Some(TaskPriority::Critical),
            _ => None,
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.trim();
        Self::ALL
            .into_iter()
            .find(|p| p.as_str().eq_ignore_ascii_case(name))
    }
}

impl fmt::Display for TaskPriority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for TaskPriority {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for TaskPriority {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Code(u64),
            Name(String),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Code(code) => TaskPriority::from_code(code)
                .ok_or_else(|| de::Error::custom(format!("unknown priority code {code}"))),
            Raw::Name(name) => TaskPriority::from_name(&name)
                .ok_or_else(|| de::Error::custom(format!("unknown priority '{name}'"))),
        }
    }
}

/// How priorities are written in create and update bodies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PriorityEncoding {
    #[default]
    Numeric,
    Name,
}

impl PriorityEncoding {
    pub fn encode(self, priority: TaskPriority) -> Value {
        match self {
            PriorityEncoding::Numeric => json!(priority.code()),
            PriorityEncoding::Name => json!(priority.as_str()),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            PriorityEncoding::Numeric => "numeric",
            PriorityEncoding::Name => "name",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    #[serde(deserialize_with = "deserialize_uuid")]
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub priority: TaskPriority,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(deserialize_with = "deserialize_timestamp")]
    pub created_at: DateTime<Utc>,
    #[serde(default, deserialize_with = "deserialize_optional_timestamp")]
    pub due_date: Option<DateTime<Utc>>,
    pub is_completed: bool,
}

fn deserialize_uuid<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    let raw = String::deserialize(deserializer)?;
    Uuid::parse_str(&raw)
        .map_err(|e| de::Error::custom(format!("invalid task id '{raw}': {e}")))?;
    Ok(raw)
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawTimestamp {
    Millis(i64),
    Text(String),
}

impl RawTimestamp {
    fn resolve<E: de::Error>(self) -> Result<DateTime<Utc>, E> {
        match self {
            RawTimestamp::Millis(ms) => Utc
                .timestamp_millis_opt(ms)
                .single()
                .ok_or_else(|| E::custom(format!("timestamp {ms} out of range"))),
            RawTimestamp::Text(text) => parse_timestamp(&text)
                .ok_or_else(|| E::custom(format!("invalid timestamp '{text}'"))),
        }
    }
}

fn deserialize_timestamp<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<DateTime<Utc>, D::Error> {
    RawTimestamp::deserialize(deserializer)?.resolve()
}

fn deserialize_optional_timestamp<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<DateTime<Utc>>, D::Error> {
    Option::<RawTimestamp>::deserialize(deserializer)?
        .map(RawTimestamp::resolve)
        .transpose()
}

/// Parse the timestamp shapes task backends emit: RFC 3339, naive
/// date-times (taken as UTC), and bare dates.
pub fn parse_timestamp(text: &str) -> Option<DateTime<Utc>> {
    let text = text.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(text) {
        return Some(parsed.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(text, format) {
            return Some(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// Writable task fields, used for creation and for full-record updates.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TaskWrite {
    pub title: String,
    pub description: Option<String>,
    pub priority: TaskPriority,
    pub tags: Vec<String>,
    pub due_date: Option<NaiveDate>,
}

impl TaskWrite {
    pub fn from_task(task: &Task) -> Self {
        Self {
            title: task.title.clone(),
            description: task.description.clone(),
            priority: task.priority,
            tags: task.tags.clone(),
            due_date: task.due_date.map(|d| d.date_naive()),
        }
    }

    pub fn apply(&mut self, patch: TaskPatch) {
        match patch {
            TaskPatch::Title(title) => self.title = title,
            TaskPatch::Description(description) => self.description = description,
            TaskPatch::Priority(priority) => self.priority = priority,
            TaskPatch::Tags(tags) => self.tags = tags,
            TaskPatch::DueDate(due_date) => self.due_date = due_date,
        }
    }

    pub fn to_json(&self, encoding: PriorityEncoding) -> Value {
        let mut body = Map::new();
        body.insert("title".into(), json!(self.title));
        if let Some(description) = &self.description {
            body.insert("description".into(), json!(description));
        }
        body.insert("priority".into(), encoding.encode(self.priority));
        body.insert("tags".into(), json!(self.tags));
        if let Some(due) = self.due_date {
            body.insert(
                "dueDate".into(),
                json!(format!("{}T00:00:00.000Z", due.format("%Y-%m-%d"))),
            );
        }
        Value::Object(body)
    }

    /// Full-record body for a PUT. Cleared optional fields are sent as
    /// explicit `null` so a missing key cannot be read as "unchanged".
    pub fn to_update_json(&self, encoding: PriorityEncoding) -> Value {
        let mut body = self.to_json(encoding);
        if let Value::Object(fields) = &mut body {
            for key in ["description", "dueDate"] {
                fields.entry(key).or_insert(Value::Null);
            }
        }
        body
    }
}

/// A single-field change applied on top of the current record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskPatch {
    Title(String),
    Description(Option<String>),
    Priority(TaskPriority),
    Tags(Vec<String>),
    DueDate(Option<NaiveDate>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    Title,
    Priority,
    DueDate,
    CreatedAt,
    IsCompleted,
}

impl SortField {
    pub fn as_str(self) -> &'static str {
        match self {
            SortField::Title => "Title",
            SortField::Priority => "Priority",
            SortField::DueDate => "DueDate",
            SortField::CreatedAt => "CreatedAt",
            SortField::IsCompleted => "IsCompleted",
        }
    }
}

/// Server-side filter criteria; absent fields are omitted from the query.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FilterTasksParams {
    pub title: Option<String>,
    pub description: Option<String>,
    pub is_completed: Option<bool>,
    pub priority: Option<TaskPriority>,
    pub tags: Vec<String>,
    pub due_before: Option<String>,
    pub due_after: Option<String>,
    pub sort_by: Option<SortField>,
    pub sort_descending: Option<bool>,
}

impl FilterTasksParams {
    pub fn by_priority(priority: TaskPriority) -> Self {
        Self {
            priority: Some(priority),
            ..Self::default()
        }
    }

    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(title) = &self.title {
            pairs.push(("title", title.clone()));
        }
        if let Some(description) = &self.description {
            pairs.push(("description", description.clone()));
        }
        if let Some(done) = self.is_completed {
            pairs.push(("isCompleted", done.to_string()));
        }
        if let Some(priority) = self.priority {
            pairs.push(("priority", priority.as_str().to_string()));
        }
        for tag in &self.tags {
            pairs.push(("tags", tag.clone()));
        }
        if let Some(before) = &self.due_before {
            pairs.push(("dueBefore", before.clone()));
        }
        if let Some(after) = &self.due_after {
            pairs.push(("dueAfter", after.clone()));
        }
        if let Some(sort) = self.sort_by {
            pairs.push(("sortBy", sort.as_str().to_string()));
        }
        if let Some(descending) = self.sort_descending {
            pairs.push(("sortDescending", descending.to_string()));
        }
        pairs
    }
}

#[derive(Deserialize)]
struct CreatedTask {
    #[serde(deserialize_with = "deserialize_uuid")]
    id: String,
}

#[async_trait]
pub trait TaskService: Send + Sync {
    async fn list_tasks(&self) -> Result<Vec<Task>, ApiError>;
    async fn get_task(&self, id: &str) -> Result<Task, ApiError>;
    /// Returns the identifier assigned by the backend.
    async fn create_task(&self, task: &TaskWrite) -> Result<String, ApiError>;
    async fn update_task(&self, id: &str, task: &TaskWrite) -> Result<(), ApiError>;
    async fn complete_task(&self, id: &str) -> Result<(), ApiError>;
    async fn delete_task(&self, id: &str) -> Result<(), ApiError>;
    async fn filter_tasks(&self, params: &FilterTasksParams) -> Result<Vec<Task>, ApiError>;
}

#[derive(Clone)]
pub struct TaskApi {
    gateway: Gateway,
    base_url: String,
    encoding: PriorityEncoding,
}

impl TaskApi {
    pub fn new(gateway: Gateway, base_url: impl Into<String>) -> Self {
        Self {
            gateway,
            base_url: base_url.into(),
            encoding: PriorityEncoding::default(),
        }
    }

    pub fn with_priority_encoding(mut self, encoding: PriorityEncoding) -> Self {
        self.encoding = encoding;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, segments: &[&str]) -> Result<Url, ApiError> {
        endpoint_url(&self.base_url, segments).map_err(ApiError::Transport)
    }
}

#[async_trait]
impl TaskService for TaskApi {
    async fn list_tasks(&self) -> Result<Vec<Task>, ApiError> {
        self.gateway
            .call(&self.url(&["tasks"])?, &RequestOptions::get())
            .await
    }

    async fn get_task(&self, id: &str) -> Result<Task, ApiError> {
        self.gateway
            .call(&self.url(&["tasks", id])?, &RequestOptions::get())
            .await
    }

    async fn create_task(&self, task: &TaskWrite) -> Result<String, ApiError> {
        let options = RequestOptions::with_json(Method::POST, &task.to_json(self.encoding))?;
        let created: CreatedTask = self.gateway.call(&self.url(&["tasks"])?, &options).await?;
        info!(id = %created.id, "task created");
        Ok(created.id)
    }

    async fn update_task(&self, id: &str, task: &TaskWrite) -> Result<(), ApiError> {
        let options =
            RequestOptions::with_json(Method::PUT, &task.to_update_json(self.encoding))?;
        let _: IgnoredAny = self
            .gateway
            .call(&self.url(&["tasks", id])?, &options)
            .await?;
        info!(%id, "task updated");
        Ok(())
    }

    async fn complete_task(&self, id: &str) -> Result<(), ApiError> {
        let _: IgnoredAny = self
            .gateway
            .call(
                &self.url(&["tasks", id, "complete"])?,
                &RequestOptions::new(Method::PUT),
            )
            .await?;
        info!(%id, "task completed");
        Ok(())
    }

    async fn delete_task(&self, id: &str) -> Result<(), ApiError> {
        let _: IgnoredAny = self
            .gateway
            .call(
                &self.url(&["tasks", id])?,
                &RequestOptions::new(Method::DELETE),
            )
            .await?;
        info!(%id, "task deleted");
        Ok(())
    }

    async fn filter_tasks(&self, params: &FilterTasksParams) -> Result<Vec<Task>, ApiError> {
        let url = with_query(self.url(&["tasks", "filter"])?, params.query_pairs());
        self.gateway.call(&url, &RequestOptions::get()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::test_utils::{test_gateway, MockHttpServer, MockResponse};

    const ID: &str = "3f0c6a8e-1b2d-4c5e-8f90-a1b2c3d4e5f6";

    fn task_json(priority: Value) -> Value {
        json!({
            "id": ID,
            "title": "Buy milk",
            "description": null,
            "priority": priority,
            "tags": ["home"],
            "createdAt": "2025-01-15T09:30:00Z",
            "dueDate": "2025-02-01T00:00:00",
            "isCompleted": false
        })
    }

    #[test]
    fn priority_accepts_codes_and_names() {
        let from_code: Task = serde_json::from_value(task_json(json!(2))).unwrap();
        assert_eq!(from_code.priority, TaskPriority::High);
        let from_name: Task = serde_json::from_value(task_json(json!("critical"))).unwrap();
        assert_eq!(from_name.priority, TaskPriority::Critical);
        assert!(serde_json::from_value::<Task>(task_json(json!(7))).is_err());
    }

    #[test]
    fn priority_codes_are_ordered() {
        let codes: Vec<u8> = TaskPriority::ALL.iter().map(|p| p.code()).collect();
        assert_eq!(codes, vec![0, 1, 2, 3]);
        for priority in TaskPriority::ALL {
            assert_eq!(TaskPriority::from_code(priority.code() as u64), Some(priority));
        }
    }

    #[test]
    fn task_decoding_coerces_dates() {
        let task: Task = serde_json::from_value(task_json(json!(1))).unwrap();
        assert_eq!(task.created_at.to_rfc3339(), "2025-01-15T09:30:00+00:00");
        assert_eq!(
            task.due_date.map(|d| d.date_naive()),
            NaiveDate::from_ymd_opt(2025, 2, 1)
        );
        assert_eq!(task.description, None);
    }

    #[test]
    fn task_id_must_be_a_uuid() {
        let mut raw = task_json(json!(1));
        raw["id"] = json!("42");
        assert!(serde_json::from_value::<Task>(raw).is_err());
    }

    #[test]
    fn parse_timestamp_shapes() {
        assert!(parse_timestamp("2025-01-15T09:30:00.123+02:00").is_some());
        assert!(parse_timestamp("2025-01-15T09:30:00.1234567").is_some());
        assert!(parse_timestamp("2025-01-15").is_some());
        assert!(parse_timestamp("15-01-2025").is_none());
    }

    #[test]
    fn write_body_respects_encoding() {
        let write = TaskWrite {
            title: "Plan trip".into(),
            description: None,
            priority: TaskPriority::High,
            tags: vec!["travel".into()],
            due_date: NaiveDate::from_ymd_opt(2025, 3, 9),
        };
        assert_eq!(
            write.to_json(PriorityEncoding::Numeric),
            json!({
                "title": "Plan trip",
                "priority": 2,
                "tags": ["travel"],
                "dueDate": "2025-03-09T00:00:00.000Z"
            })
        );
        assert_eq!(
            write.to_json(PriorityEncoding::Name)["priority"],
            json!("High")
        );
    }

    #[test]
    fn update_body_sends_cleared_fields_as_null() {
        let task: Task = serde_json::from_value(task_json(json!(1))).unwrap();
        let mut write = TaskWrite::from_task(&task);
        write.apply(TaskPatch::Description(None));
        write.apply(TaskPatch::DueDate(None));

        let body = write.to_update_json(PriorityEncoding::Numeric);
        assert_eq!(body["description"], Value::Null);
        assert_eq!(body["dueDate"], Value::Null);
        assert!(body.as_object().unwrap().contains_key("description"));
        assert!(body.as_object().unwrap().contains_key("dueDate"));
        assert_eq!(body["title"], json!("Buy milk"));

        let created = write.to_json(PriorityEncoding::Numeric);
        assert!(!created.as_object().unwrap().contains_key("description"));
        assert!(!created.as_object().unwrap().contains_key("dueDate"));
    }

    #[test]
    fn patch_replaces_only_its_field() {
        let task: Task = serde_json::from_value(task_json(json!(1))).unwrap();
        let mut write = TaskWrite::from_task(&task);
        write.apply(TaskPatch::Priority(TaskPriority::Critical));
        assert_eq!(write.priority, TaskPriority::Critical);
        assert_eq!(write.title, "Buy milk");
        assert_eq!(write.tags, vec!["home".to_string()]);
        assert_eq!(write.due_date, NaiveDate::from_ymd_opt(2025, 2, 1));

        write.apply(TaskPatch::DueDate(None));
        assert_eq!(write.due_date, None);
    }

    #[test]
    fn filter_query_omits_absent_fields() {
        assert!(FilterTasksParams::default().query_pairs().is_empty());

        let params = FilterTasksParams {
            priority: Some(TaskPriority::High),
            tags: vec!["a".into(), "b".into()],
            sort_by: Some(SortField::DueDate),
            sort_descending: Some(true),
            ..FilterTasksParams::default()
        };
        assert_eq!(
            params.query_pairs(),
            vec![
                ("priority", "High".to_string()),
                ("tags", "a".to_string()),
                ("tags", "b".to_string()),
                ("sortBy", "DueDate".to_string()),
                ("sortDescending", "true".to_string()),
            ]
        );
    }

    #[tokio::test]
    async fn list_and_filter_hit_the_task_endpoints() {
        let server = MockHttpServer::start_with_prefix(
            vec![
                MockResponse::json(200, json!([task_json(json!(0))])),
                MockResponse::json(200, json!([])),
            ],
            "/api",
        )
        .await;
        let api = TaskApi::new(test_gateway(), server.base_url.clone());

        let tasks = api.list_tasks().await.unwrap();
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].priority, TaskPriority::Low);

        let filtered = api
            .filter_tasks(&FilterTasksParams::by_priority(TaskPriority::Critical))
            .await
            .unwrap();
        assert!(filtered.is_empty());

        let requests = server.requests();
        assert_eq!(requests[0].target, "/api/tasks");
        assert_eq!(requests[1].target, "/api/tasks/filter?priority=Critical");
    }

    #[tokio::test]
    async fn create_posts_numeric_priority_and_returns_id() {
        let server = MockHttpServer::start(vec![MockResponse::json(201, json!({"id": ID}))]).await;
        let api = TaskApi::new(test_gateway(), server.base_url.clone());

        let id = api
            .create_task(&TaskWrite {
                title: "Buy milk".into(),
                priority: TaskPriority::Medium,
                ..TaskWrite::default()
            })
            .await
            .unwrap();

        assert_eq!(id, ID);
        let request = &server.requests()[0];
        assert_eq!(request.method, "POST");
        assert_eq!(request.target, "/tasks");
        assert_eq!(
            request.json_body(),
            json!({"title": "Buy milk", "priority": 1, "tags": []})
        );
    }

    #[tokio::test]
    async fn mutations_use_their_methods_and_tolerate_bodies() {
        let server = MockHttpServer::start(vec![
            MockResponse::empty(204),
            MockResponse::json(200, json!({"ok": true})),
            MockResponse::empty(200),
        ])
        .await;
        let api = TaskApi::new(test_gateway(), server.base_url.clone())
            .with_priority_encoding(PriorityEncoding::Name);

        api.complete_task(ID).await.unwrap();
        api.update_task(
            ID,
            &TaskWrite {
                title: "Renamed".into(),
                priority: TaskPriority::Low,
                ..TaskWrite::default()
            },
        )
        .await
        .unwrap();
        api.delete_task(ID).await.unwrap();

        let requests = server.requests();
        assert_eq!(requests[0].method, "PUT");
        assert_eq!(requests[0].target, format!("/tasks/{ID}/complete"));
        assert_eq!(requests[0].body, "");
        assert_eq!(requests[1].method, "PUT");
        assert_eq!(requests[1].json_body()["priority"], json!("Low"));
        assert_eq!(requests[1].json_body()["description"], Value::Null);
        assert_eq!(requests[1].json_body()["dueDate"], Value::Null);
        assert_eq!(requests[2].method, "DELETE");
        assert_eq!(requests[2].target, format!("/tasks/{ID}"));
    }

    #[tokio::test]
    async fn missing_task_surfaces_server_message() {
        let server = MockHttpServer::start(vec![MockResponse::json(
            404,
            json!({"message": "Task not found"}),
        )])
        .await;
        let api = TaskApi::new(test_gateway(), server.base_url.clone());

        let err = api.get_task("nope").await.unwrap_err();
        assert_eq!(err.to_string(), "Task not found");
        assert_eq!(server.requests()[0].target, "/tasks/nope");
    }
}
