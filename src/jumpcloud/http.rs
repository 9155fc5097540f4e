//! HTTP utilities for JumpCloud REST API calls

use anyhow::{Context, Result};
use reqwest::{Client, RequestBuilder, StatusCode};
use serde_json::Value;
use std::fmt;

/// Maximum length of response body to log (to avoid logging sensitive data)
const MAX_LOG_BODY_LENGTH: usize = 200;

/// Sanitize response body for logging
/// Truncates long responses and strips control characters
pub(crate) fn sanitize_for_log(body: &str) -> String {
    let truncated = if body.len() > MAX_LOG_BODY_LENGTH {
        let mut end = MAX_LOG_BODY_LENGTH;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}... [truncated, {} bytes total]", &body[..end], body.len())
    } else {
        body.to_string()
    };

    truncated.replace(|c: char| !c.is_ascii_graphic() && c != ' ', "")
}

/// A non-success HTTP status returned by the JumpCloud API
#[derive(Debug, Clone)]
pub struct ApiStatusError {
    pub status: StatusCode,
    /// Sanitized excerpt of the response body
    pub body: String,
}

impl fmt::Display for ApiStatusError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "API request failed: {}", self.status)
    }
}

impl std::error::Error for ApiStatusError {}

/// Credentials attached to every request
#[derive(Clone)]
pub struct Credentials {
    pub api_key: String,
    pub org_id: Option<String>,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("api_key", &"***")
            .field("org_id", &self.org_id)
            .finish()
    }
}

/// HTTP client wrapper for JumpCloud API calls
#[derive(Clone, Debug)]
pub struct JcHttpClient {
    client: Client,
}

impl JcHttpClient {
    /// Create a new HTTP client
    pub fn new() -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("terraform-provider-jumpcloud/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self { client })
    }

    fn authorize(request: RequestBuilder, credentials: &Credentials) -> RequestBuilder {
        let request = request
            .header("x-api-key", &credentials.api_key)
            .header(reqwest::header::ACCEPT, "application/json")
            .header(reqwest::header::CONTENT_TYPE, "application/json");

        match credentials.org_id.as_deref() {
            Some(org_id) if !org_id.is_empty() => request.header("x-org-id", org_id),
            _ => request,
        }
    }

    /// Make a GET request to the JumpCloud API
    pub async fn get(&self, url: &str, credentials: &Credentials) -> Result<Value> {
        tracing::debug!("GET {}", url);

        let request = Self::authorize(self.client.get(url), credentials);
        Self::execute(request).await
    }

    /// Make a POST request to the JumpCloud API
    pub async fn post(
        &self,
        url: &str,
        credentials: &Credentials,
        body: Option<&Value>,
    ) -> Result<Value> {
        tracing::debug!("POST {}", url);

        let mut request = Self::authorize(self.client.post(url), credentials);

        if let Some(body) = body {
            request = request.json(body);
        }

        Self::execute(request).await
    }

    async fn execute(request: RequestBuilder) -> Result<Value> {
        let response = request.send().await.context("Failed to send request")?;

        let status = response.status();
        let body = response
            .text()
            .await
            .context("Failed to read response body")?;

        if !status.is_success() {
            let body = sanitize_for_log(&body);
            tracing::error!("API error: {} - {}", status, body);
            return Err(ApiStatusError { status, body }.into());
        }

        // Graph mutations answer 204 with no body
        if body.trim().is_empty() {
            return Ok(Value::Null);
        }

        serde_json::from_str(&body).context("Failed to parse response JSON")
    }
}

/// Format a JumpCloud API error as a user-facing hint
pub fn format_api_error(error: &anyhow::Error) -> String {
    let status = error
        .chain()
        .find_map(|e| e.downcast_ref::<ApiStatusError>())
        .map(|e| e.status);

    match status.map(|s| s.as_u16()) {
        Some(401) => "Authentication failed. Check the JumpCloud API key.".to_string(),
        Some(403) => {
            "Permission denied. Check the API key's administrator role and organization ID."
                .to_string()
        }
        Some(404) => "Resource not found.".to_string(),
        Some(409) => "Resource conflict. The association may already exist.".to_string(),
        Some(429) => "Rate limit exceeded. Please try again later.".to_string(),
        Some(400) => "Invalid request. Check your parameters.".to_string(),
        Some(code) if code >= 500 => {
            "JumpCloud service temporarily unavailable. Please try again.".to_string()
        }
        Some(_) => "Request failed.".to_string(),
        None => {
            let error_str = error.to_string();
            let sanitized = error_str
                .chars()
                .filter(|c| c.is_ascii_graphic() || *c == ' ')
                .take(80)
                .collect::<String>();

            if sanitized.len() < error_str.len() {
                format!("{}...", sanitized)
            } else {
                sanitized
            }
        }
    }
}
