//! Provider dispatch
//!
//! Maps data source and resource type names to their lifecycle handlers and
//! turns handler errors into diagnostics.
//!
//! # Module Structure
//!
//! - [`schema`] - Attribute schemas and config validation
//! - [`resource_data`] - Identifier and attributes of one instance
//! - [`diag`] - Diagnostics
//! - [`data_applications`] - `jumpcloud_application`
//! - [`data_system_directory`] - `jumpcloud_system`
//! - [`resource_user_association`] - `jumpcloud_user_association`

pub mod data_applications;
pub mod data_system_directory;
pub mod diag;
pub mod resource_data;
pub mod resource_user_association;
pub mod schema;

use crate::config::Config;
use anyhow::Result;
use diag::{has_errors, Diagnostic};
use resource_data::ResourceData;
use schema::{Attribute, Schema};
use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Lifecycle step of a managed resource
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lifecycle {
    Create,
    Read,
    Update,
    Delete,
}

/// Result of one operation: resulting state plus diagnostics
#[derive(Debug, Clone, Serialize)]
pub struct Response {
    pub id: String,
    pub attributes: Map<String, Value>,
    pub diagnostics: Vec<Diagnostic>,
}

impl Response {
    fn new(data: &ResourceData, diagnostics: Vec<Diagnostic>) -> Self {
        Self {
            id: data.id().to_string(),
            attributes: data.state(),
            diagnostics,
        }
    }

    /// Response carrying no state, for failures before any handler ran
    pub fn failed(diagnostics: Vec<Diagnostic>) -> Self {
        Self::new(&ResourceData::default(), diagnostics)
    }

    pub fn has_errors(&self) -> bool {
        has_errors(&self.diagnostics)
    }
}

/// Full provider schema
#[derive(Debug, Clone, Serialize)]
pub struct ProviderSchema {
    pub provider: Schema,
    pub data_sources: BTreeMap<&'static str, Schema>,
    pub resources: BTreeMap<&'static str, Schema>,
}

/// Configured provider; immutable and shared by all callbacks
#[derive(Debug, Clone)]
pub struct Provider {
    config: Config,
}

impl Provider {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Schema of the provider block itself
    pub fn provider_schema() -> Schema {
        Schema::new("JumpCloud provider")
            .with_attribute(
                "api_key",
                Attribute::required_string()
                    .sensitive()
                    .with_description("JumpCloud administrator API key. May be set via JUMPCLOUD_API_KEY."),
            )
            .with_attribute(
                "org_id",
                Attribute::optional_string()
                    .with_description("Organization ID for multi-tenant administrators. May be set via JUMPCLOUD_ORG_ID."),
            )
            .with_attribute(
                "api_url",
                Attribute::optional_string()
                    .with_description("Console endpoint. Defaults to https://console.jumpcloud.com."),
            )
    }

    pub fn schema() -> ProviderSchema {
        let data_sources = [data_applications::TYPE_NAME, data_system_directory::TYPE_NAME]
            .into_iter()
            .filter_map(|name| Some((name, Self::data_source_schema(name)?)))
            .collect();
        let resources = [resource_user_association::TYPE_NAME]
            .into_iter()
            .filter_map(|name| Some((name, Self::resource_schema(name)?)))
            .collect();

        ProviderSchema {
            provider: Self::provider_schema(),
            data_sources,
            resources,
        }
    }

    pub fn data_source_schema(type_name: &str) -> Option<Schema> {
        match type_name {
            data_applications::TYPE_NAME => Some(data_applications::schema()),
            data_system_directory::TYPE_NAME => Some(data_system_directory::schema()),
            _ => None,
        }
    }

    pub fn resource_schema(type_name: &str) -> Option<Schema> {
        match type_name {
            resource_user_association::TYPE_NAME => Some(resource_user_association::schema()),
            _ => None,
        }
    }

    /// Validate provider configuration
    pub fn validate_config(&self) -> Vec<Diagnostic> {
        let config = serde_json::to_value(&self.config).unwrap_or(Value::Null);
        let config = match config {
            Value::Object(map) => {
                Value::Object(map.into_iter().filter(|(_, v)| !v.is_null()).collect())
            }
            other => other,
        };
        Self::provider_schema().validate(&config)
    }

    /// Read a data source
    pub async fn read_data_source(&self, type_name: &str, config: Value) -> Response {
        tracing::debug!("read_data_source: type={}", type_name);

        let Some(schema) = Self::data_source_schema(type_name) else {
            return Response::failed(vec![Diagnostic::error(format!(
                "Unknown data source: {}",
                type_name
            ))]);
        };

        let mut data = match Self::prepare(&schema, config) {
            Ok(data) => data,
            Err(diagnostics) => return Response::failed(diagnostics),
        };

        let result = match type_name {
            data_applications::TYPE_NAME => data_applications::read(&self.config, &mut data)
                .await
                .map(|()| Vec::new()),
            data_system_directory::TYPE_NAME => {
                data_system_directory::read(&self.config, &mut data).await
            }
            _ => unreachable!("schema lookup covers every data source"),
        };

        Self::finish(type_name, &data, result)
    }

    /// Run one lifecycle step of a managed resource
    ///
    /// `id` is the identifier from prior state; it is ignored on create.
    pub async fn apply(
        &self,
        type_name: &str,
        step: Lifecycle,
        config: Value,
        id: Option<String>,
    ) -> Response {
        tracing::info!("apply: type={}, step={:?}", type_name, step);

        let Some(schema) = Self::resource_schema(type_name) else {
            return Response::failed(vec![Diagnostic::error(format!(
                "Unknown resource: {}",
                type_name
            ))]);
        };

        let mut data = match Self::prepare(&schema, config) {
            Ok(data) => data,
            Err(diagnostics) => return Response::failed(diagnostics),
        };
        match (step, id) {
            (Lifecycle::Create, _) => data.set_id(""),
            (_, Some(id)) => data.set_id(id),
            (_, None) => {}
        }

        let result = match type_name {
            resource_user_association::TYPE_NAME => {
                let config = &self.config;
                match step {
                    Lifecycle::Create => resource_user_association::create(config, &mut data).await,
                    Lifecycle::Read => resource_user_association::read(config, &mut data).await,
                    Lifecycle::Update => resource_user_association::update(config, &mut data).await,
                    Lifecycle::Delete => resource_user_association::delete(config, &mut data).await,
                }
            }
            _ => unreachable!("schema lookup covers every resource"),
        };
        let result = result.map(|()| Vec::new());

        Self::finish(type_name, &data, result)
    }

    /// Import an existing resource by identifier
    pub async fn import(&self, type_name: &str, id: &str) -> Response {
        tracing::info!("import: type={}, id={}", type_name, id);

        let mut data = ResourceData::default();
        let result = match type_name {
            resource_user_association::TYPE_NAME => {
                resource_user_association::import(&self.config, &mut data, id)
                    .await
                    .map(|()| Vec::new())
            }
            _ => {
                return Response::failed(vec![Diagnostic::error(format!(
                    "Resource {} does not support import",
                    type_name
                ))])
            }
        };

        Self::finish(type_name, &data, result)
    }

    fn prepare(schema: &Schema, config: Value) -> std::result::Result<ResourceData, Vec<Diagnostic>> {
        let diagnostics = schema.validate(&config);
        if has_errors(&diagnostics) {
            return Err(diagnostics);
        }
        ResourceData::from_config(config).map_err(|e| vec![Diagnostic::from_error(&e)])
    }

    fn finish(type_name: &str, data: &ResourceData, result: Result<Vec<Diagnostic>>) -> Response {
        match result {
            Ok(diagnostics) => Response::new(data, diagnostics),
            Err(err) => {
                tracing::warn!("{} failed: {:#}", type_name, err);
                Response::new(data, vec![Diagnostic::from_error(&err)])
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn provider() -> Provider {
        Provider::new(Config {
            api_key: Some("key".to_string()),
            api_url: Some("http://127.0.0.1:9".to_string()),
            ..Default::default()
        })
    }

    #[test]
    fn test_schema_lists_every_type() {
        let schema = Provider::schema();
        assert!(schema.data_sources.contains_key("jumpcloud_application"));
        assert!(schema.data_sources.contains_key("jumpcloud_system"));
        assert!(schema.resources.contains_key("jumpcloud_user_association"));
        assert!(schema.provider.attributes["api_key"].sensitive);
    }

    #[test]
    fn test_validate_config_requires_api_key() {
        let diags = Provider::new(Config::default()).validate_config();
        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].attribute.as_deref(), Some("api_key"));
        assert!(provider().validate_config().is_empty());
    }

    #[test]
    fn test_unknown_data_source() {
        let response =
            tokio_test::block_on(provider().read_data_source("jumpcloud_nothing", json!({})));
        assert!(response.has_errors());
        assert_eq!(response.id, "");
    }

    #[test]
    fn test_invalid_type_rejected_before_any_call() {
        let response = tokio_test::block_on(provider().apply(
            "jumpcloud_user_association",
            Lifecycle::Create,
            json!({"system_id": "S1", "user_id": "U1", "type": "application"}),
            None,
        ));
        assert!(response.has_errors());
        assert_eq!(response.diagnostics[0].attribute.as_deref(), Some("type"));
    }

    #[test]
    fn test_import_unsupported_for_data_sources() {
        let response = tokio_test::block_on(provider().import("jumpcloud_application", "A1"));
        assert!(response.has_errors());
    }

    #[test]
    fn test_malformed_import_id() {
        let response =
            tokio_test::block_on(provider().import("jumpcloud_user_association", "no-slash"));
        assert!(response.has_errors());
        assert!(response.diagnostics[0].summary.contains("Unexpected import ID"));
    }
}
