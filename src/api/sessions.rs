//! Conversational session backend accessor.

use async_trait::async_trait;
use chrono::Utc;
use reqwest::{Method, Url};
use serde::de::IgnoredAny;
use serde::{Deserialize, Serialize};
use tracing::info;

use super::models::{ModelInfo, ModelsPayload};
use super::{ApiError, Gateway, RequestOptions};
use crate::utils::url::endpoint_url;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ChatSession {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
}

impl ChatSession {
    pub fn label(&self) -> &str {
        self.display_name
            .as_deref()
            .filter(|name| !name.trim().is_empty())
            .unwrap_or(&self.name)
    }
}

#[derive(Serialize)]
struct CreateSessionBody<'a> {
    name: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    display_name: Option<&'a str>,
}

#[derive(Serialize)]
struct SaveSessionBody<'a> {
    display_name: &'a str,
}

#[derive(Serialize)]
struct ChatBody<'a> {
    message: &'a str,
}

#[derive(Deserialize)]
struct ChatReply {
    response: String,
}

#[derive(Serialize)]
struct RoleBody<'a> {
    role: Option<&'a str>,
}

#[derive(Serialize)]
struct ModelBody<'a> {
    model: &'a str,
}

/// Name given to sessions created without one.
pub fn generated_session_name() -> String {
    format!("session_{}", Utc::now().timestamp_millis())
}

#[async_trait]
pub trait SessionService: Send + Sync {
    async fn list_sessions(&self) -> Result<Vec<ChatSession>, ApiError>;
    async fn get_session(&self, id: i64) -> Result<ChatSession, ApiError>;
    async fn last_session(&self) -> Result<ChatSession, ApiError>;
    async fn session_by_name(&self, name: &str) -> Result<ChatSession, ApiError>;
    async fn create_session(&self, name: Option<&str>) -> Result<ChatSession, ApiError>;
    async fn save_session(&self, id: i64, display_name: &str) -> Result<(), ApiError>;
    async fn delete_session(&self, name: &str) -> Result<(), ApiError>;
    async fn send_message(&self, id: i64, message: &str) -> Result<String, ApiError>;
    async fn set_role(&self, id: i64, role: Option<&str>) -> Result<(), ApiError>;
    async fn set_model(&self, id: i64, model: &str) -> Result<(), ApiError>;
    async fn list_models(&self) -> Result<Vec<ModelInfo>, ApiError>;
}

#[derive(Clone)]
pub struct SessionApi {
    gateway: Gateway,
    base_url: String,
}

impl SessionApi {
    pub fn new(gateway: Gateway, base_url: impl Into<String>) -> Self {
        Self {
            gateway,
            base_url: base_url.into(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, segments: &[&str]) -> Result<Url, ApiError> {
        endpoint_url(&self.base_url, segments).map_err(ApiError::Transport)
    }
}

#[async_trait]
impl SessionService for SessionApi {
    async fn list_sessions(&self) -> Result<Vec<ChatSession>, ApiError> {
        self.gateway
            .call(&self.url(&["sessions"])?, &RequestOptions::get())
            .await
    }

    async fn get_session(&self, id: i64) -> Result<ChatSession, ApiError> {
        self.gateway
            .call(
                &self.url(&["sessions", id.to_string().as_str()])?,
                &RequestOptions::get(),
            )
            .await
    }

    async fn last_session(&self) -> Result<ChatSession, ApiError> {
        self.gateway
            .call(&self.url(&["sessions", "last"])?, &RequestOptions::get())
            .await
    }

    async fn session_by_name(&self, name: &str) -> Result<ChatSession, ApiError> {
        self.gateway
            .call(
                &self.url(&["sessions", "by-name", name])?,
                &RequestOptions::get(),
            )
            .await
    }

    async fn create_session(&self, name: Option<&str>) -> Result<ChatSession, ApiError> {
        let generated;
        let body = match name.map(str::trim).filter(|n| !n.is_empty()) {
            Some(name) => CreateSessionBody {
                name,
                display_name: Some(name),
            },
            None => {
                generated = generated_session_name();
                CreateSessionBody {
                    name: generated.as_str(),
                    display_name: None,
                }
            }
        };
        let options = RequestOptions::with_json(Method::POST, &body)?;
        let session: ChatSession = self
            .gateway
            .call(&self.url(&["sessions"])?, &options)
            .await?;
        info!(id = session.id, name = %session.name, "session created");
        Ok(session)
    }

    async fn save_session(&self, id: i64, display_name: &str) -> Result<(), ApiError> {
        let options = RequestOptions::with_json(Method::PATCH, &SaveSessionBody { display_name })?;
        let _: IgnoredAny = self
            .gateway
            .call(&self.url(&["sessions", id.to_string().as_str()])?, &options)
            .await?;
        Ok(())
    }

    async fn delete_session(&self, name: &str) -> Result<(), ApiError> {
        let _: IgnoredAny = self
            .gateway
            .call(
                &self.url(&["sessions", "by-name", name])?,
                &RequestOptions::new(Method::DELETE),
            )
            .await?;
        info!(%name, "session deleted");
        Ok(())
    }

    async fn send_message(&self, id: i64, message: &str) -> Result<String, ApiError> {
        let options = RequestOptions::with_json(Method::POST, &ChatBody { message })?;
        let reply: ChatReply = self
            .gateway
            .call(&self.url(&["sessions", id.to_string().as_str(), "chat"])?, &options)
            .await?;
        Ok(reply.response)
    }

    async fn set_role(&self, id: i64, role: Option<&str>) -> Result<(), ApiError> {
        let options = RequestOptions::with_json(Method::PUT, &RoleBody { role })?;
        let _: IgnoredAny = self
            .gateway
            .call(&self.url(&["sessions", id.to_string().as_str(), "role"])?, &options)
            .await?;
        Ok(())
    }

    async fn set_model(&self, id: i64, model: &str) -> Result<(), ApiError> {
        let options = RequestOptions::with_json(Method::PUT, &ModelBody { model })?;
        let _: IgnoredAny = self
            .gateway
            .call(&self.url(&["sessions", id.to_string().as_str(), "model"])?, &options)
            .await?;
        Ok(())
    }

    async fn list_models(&self) -> Result<Vec<ModelInfo>, ApiError> {
        let payload: ModelsPayload = self
            .gateway
            .call(&self.url(&["models"])?, &RequestOptions::get())
            .await?;
        Ok(payload.into_models())
    }
}
