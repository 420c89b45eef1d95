//! Remote operation gateway shared by the task and session accessors.
//!
//! Every request goes through [`Gateway::call`], which always sends JSON,
//! turns non-success statuses into [`ApiError::Http`], retries a single
//! HTTP 429 after the server-provided delay, and validates the response
//! body by deserializing it into the caller's expected type.

pub mod models;
pub mod sessions;
pub mod tasks;


use std::fmt;
use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderName, HeaderValue, CONTENT_TYPE, RETRY_AFTER};
use reqwest::{Method, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

/// Seconds to wait before retrying when a 429 carries no usable header.
pub const DEFAULT_RETRY_AFTER_SECS: u64 = 5;

const RATE_LIMIT_AFTER_HEADER: &str = "x-ratelimit-after";

#[derive(Debug, Clone, PartialEq)]
pub enum ApiError {
    /// The server answered with a non-success status.
    Http {
        status: u16,
        message: String,
        data: Option<Value>,
    },
    /// The server kept answering 429 after the single retry.
    RateLimited { retry_after_secs: u64 },
    /// The body did not match the expected response shape.
    Schema { diagnostic: String, payload: Value },
    /// The request never produced a response.
    Transport(String),
}

impl ApiError {
    pub fn retry_after(&self) -> Option<Duration> {
        match self {
            ApiError::RateLimited { retry_after_secs } => {
                Some(Duration::from_secs(*retry_after_secs))
            }
            _ => None,
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Http { status, .. } => Some(*status),
            ApiError::RateLimited { .. } => Some(429),
            _ => None,
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Http { message, .. } => write!(f, "{message}"),
            ApiError::RateLimited { retry_after_secs } => write!(
                f,
                "Rate limit exceeded. Please wait {retry_after_secs} seconds before trying again."
            ),
            ApiError::Schema { diagnostic, .. } => {
                write!(f, "Schema validation failed: {diagnostic}")
            }
            ApiError::Transport(message) => write!(f, "Request failed: {message}"),
        }
    }
}

impl std::error::Error for ApiError {}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        ApiError::Transport(err.to_string())
    }
}

/// Method, optional JSON body and extra headers for one call.
#[derive(Debug, Clone)]
pub struct RequestOptions {
    pub method: Method,
    pub body: Option<Value>,
    pub headers: Vec<(String, String)>,
}

impl Default for RequestOptions {
    fn default() -> Self {
        Self::new(Method::GET)
    }
}

impl RequestOptions {
    pub fn new(method: Method) -> Self {
        Self {
            method,
            body: None,
            headers: Vec::new(),
        }
    }

    pub fn get() -> Self {
        Self::new(Method::GET)
    }

    pub fn with_json<T: Serialize + ?Sized>(method: Method, body: &T) -> Result<Self, ApiError> {
        let body = serde_json::to_value(body)
            .map_err(|e| ApiError::Transport(format!("could not encode request body: {e}")))?;
        Ok(Self {
            body: Some(body),
            ..Self::new(method)
        })
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    fn header_map(&self) -> Result<HeaderMap, ApiError> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        for (name, value) in &self.headers {
            let name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|e| ApiError::Transport(format!("invalid header name '{name}': {e}")))?;
            let value = HeaderValue::from_str(value)
                .map_err(|e| ApiError::Transport(format!("invalid header value: {e}")))?;
            headers.insert(name, value);
        }
        Ok(headers)
    }
}

#[derive(Clone)]
pub struct Gateway {
    client: reqwest::Client,
    retry_rate_limited: bool,
}

impl Gateway {
    pub fn new(client: reqwest::Client) -> Self {
        Self {
            client,
            retry_rate_limited: true,
        }
    }

    /// When disabled, the first 429 is reported immediately.
    pub fn with_rate_limit_retry(mut self, enabled: bool) -> Self {
        self.retry_rate_limited = enabled;
        self
    }

    pub async fn call<T: DeserializeOwned>(
        &self,
        url: &Url,
        options: &RequestOptions,
    ) -> Result<T, ApiError> {
        let mut retried = false;
        loop {
            debug!(method = %options.method, %url, "sending request");
            let response = self.send(url, options).await?;
            let status = response.status();

            if status == StatusCode::TOO_MANY_REQUESTS {
                let retry_after_secs = retry_after_secs(response.headers());
                if self.retry_rate_limited && !retried {
                    warn!(%url, retry_after_secs, "rate limited; retrying once");
                    retried = true;
                    tokio::time::sleep(Duration::from_secs(retry_after_secs)).await;
                    continue;
                }
                warn!(%url, retry_after_secs, "rate limited");
                return Err(ApiError::RateLimited { retry_after_secs });
            }

            if !status.is_success() {
                return Err(http_error(status, response).await);
            }

            let text = response.text().await?;
            return decode_body(&text);
        }
    }

    async fn send(
        &self,
        url: &Url,
        options: &RequestOptions,
    ) -> Result<reqwest::Response, ApiError> {
        let mut request = self
            .client
            .request(options.method.clone(), url.clone())
            .headers(options.header_map()?);
        if let Some(body) = &options.body {
            request = request.body(body.to_string());
        }
        request.send().await.map_err(|e| {
            warn!(%url, error = %e, "request failed before a response");
            ApiError::from(e)
        })
    }
}

/// Read `retry-after` (or `x-ratelimit-after`) as whole seconds.
pub fn retry_after_secs(headers: &HeaderMap) -> u64 {
    [RETRY_AFTER.as_str(), RATE_LIMIT_AFTER_HEADER]
        .iter()
        .find_map(|name| {
            headers
                .get(*name)
                .and_then(|value| value.to_str().ok())
                .and_then(|value| value.trim().parse::<u64>().ok())
        })
        .unwrap_or(DEFAULT_RETRY_AFTER_SECS)
}

async fn http_error(status: StatusCode, response: reqwest::Response) -> ApiError {
    let data = response
        .text()
        .await
        .ok()
        .and_then(|text| serde_json::from_str::<Value>(&text).ok());
    let message = data
        .as_ref()
        .and_then(|value| value.get("message"))
        .and_then(Value::as_str)
        .map(str::to_string)
        .unwrap_or_else(|| {
            format!(
                "HTTP {}: {}",
                status.as_u16(),
                status.canonical_reason().unwrap_or("Unknown Status")
            )
        });
    debug!(status = status.as_u16(), %message, "request rejected");
    ApiError::Http {
        status: status.as_u16(),
        message,
        data,
    }
}

/// Validate a response body against `T`.
///
/// An empty body is treated as JSON `null`, so `()` and `Option<_>` accept it
/// while record types report a schema failure.
pub fn decode_body<T: DeserializeOwned>(text: &str) -> Result<T, ApiError> {
    let payload = if text.trim().is_empty() {
        Value::Null
    } else {
        serde_json::from_str::<Value>(text).map_err(|e| ApiError::Schema {
            diagnostic: format!("invalid JSON: {e}"),
            payload: Value::String(text.to_string()),
        })?
    };
    serde_json::from_value::<T>(payload.clone()).map_err(|e| ApiError::Schema {
        diagnostic: e.to_string(),
        payload,
    })
}
