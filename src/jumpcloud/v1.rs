//! JumpCloud v1 API
//!
//! Application listing and system search.

use super::client::ApiClient;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// SSO application as returned by `GET /applications`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Application {
    #[serde(rename = "_id", alias = "id", default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub display_name: String,
    #[serde(default)]
    pub sso_url: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationList {
    #[serde(default)]
    pub total_count: i64,
    #[serde(default)]
    pub results: Vec<Application>,
}

/// Managed system as returned by `POST /search/systems`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct System {
    #[serde(rename = "_id", alias = "id", default)]
    pub id: String,
    #[serde(default)]
    pub display_name: String,
    #[serde(default)]
    pub os: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SystemList {
    #[serde(default)]
    pub total_count: i64,
    #[serde(default)]
    pub results: Vec<System>,
}

/// Free-text search over a set of fields
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchFilter {
    pub search_term: String,
    pub fields: Vec<String>,
}

/// Body of a search request
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Search {
    pub search_filter: SearchFilter,
}

impl Search {
    /// Search a single field for `term`
    pub fn field(field: &str, term: &str) -> Self {
        Self {
            search_filter: SearchFilter {
                search_term: term.to_string(),
                fields: vec![field.to_string()],
            },
        }
    }
}

/// List all SSO applications (single page, no pagination)
pub async fn applications_list(client: &ApiClient) -> Result<ApplicationList> {
    let url = client.url(&["applications"]);
    let response = client.get(&url).await?;

    if response.is_null() {
        return Ok(ApplicationList::default());
    }
    serde_json::from_value(response).context("Failed to decode application list")
}

/// Search systems
pub async fn search_systems_post(client: &ApiClient, search: &Search) -> Result<SystemList> {
    let url = client.url(&["search", "systems"]);
    let body: Value = serde_json::to_value(search).context("Failed to encode search body")?;
    let response = client.post(&url, Some(&body)).await?;

    if response.is_null() {
        return Ok(SystemList::default());
    }
    serde_json::from_value(response).context("Failed to decode system search results")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_application_accepts_both_id_spellings() {
        let apps: ApplicationList = serde_json::from_value(json!({
            "totalCount": 2,
            "results": [
                {"_id": "A1", "name": "aws", "displayName": "AWS SSO", "ssoUrl": "https://x"},
                {"id": "A2", "name": "docusign"}
            ]
        }))
        .unwrap();

        assert_eq!(apps.total_count, 2);
        assert_eq!(apps.results[0].id, "A1");
        assert_eq!(apps.results[0].sso_url, "https://x");
        assert_eq!(apps.results[1].id, "A2");
        assert_eq!(apps.results[1].display_name, "");
    }

    #[test]
    fn test_search_body_shape() {
        let body = serde_json::to_value(Search::field("displayName", "build-mac")).unwrap();
        assert_eq!(
            body,
            json!({"searchFilter": {"searchTerm": "build-mac", "fields": ["displayName"]}})
        );
    }
}
