//! JumpCloud Client
//!
//! Binds the HTTP client to one API base path and a set of credentials.
//! v1 and v2 clients are both derived from the same [`crate::config::Config`].

use super::http::{Credentials, JcHttpClient};
use anyhow::Result;
use serde_json::Value;

/// Client for one JumpCloud API version
#[derive(Clone, Debug)]
pub struct ApiClient {
    pub http: JcHttpClient,
    pub credentials: Credentials,
    pub base_path: String,
}

impl ApiClient {
    /// Create a new client rooted at `base_path`
    pub fn new(base_path: &str, credentials: Credentials) -> Result<Self> {
        Ok(Self {
            http: JcHttpClient::new()?,
            credentials,
            base_path: base_path.trim_end_matches('/').to_string(),
        })
    }

    /// Build a URL below the base path. Segments are percent-encoded.
    pub fn url(&self, segments: &[&str]) -> String {
        let mut url = self.base_path.clone();
        for segment in segments {
            url.push('/');
            url.push_str(&urlencoding::encode(segment));
        }
        url
    }

    /// Make a GET request
    pub async fn get(&self, url: &str) -> Result<Value> {
        self.http.get(url, &self.credentials).await
    }

    /// Make a POST request
    pub async fn post(&self, url: &str, body: Option<&Value>) -> Result<Value> {
        self.http.post(url, &self.credentials, body).await
    }
}

/// Append query parameters to a URL
pub fn add_query_params(url: &str, params: &[(&str, &str)]) -> String {
    let query_parts: Vec<String> = params
        .iter()
        .map(|(key, value)| format!("{}={}", key, urlencoding::encode(value)))
        .collect();

    if query_parts.is_empty() {
        url.to_string()
    } else if url.contains('?') {
        format!("{}&{}", url, query_parts.join("&"))
    } else {
        format!("{}?{}", url, query_parts.join("&"))
    }
}
