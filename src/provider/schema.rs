//! Attribute schemas for data sources and resources

use super::diag::Diagnostic;
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;

/// Returns error messages for `value` of attribute `key`
pub type ValidateFn = fn(value: &str, key: &str) -> Vec<String>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AttributeType {
    String,
}

#[derive(Debug, Clone, Serialize)]
pub struct Attribute {
    #[serde(rename = "type")]
    pub kind: AttributeType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<&'static str>,
    pub required: bool,
    pub optional: bool,
    pub computed: bool,
    pub sensitive: bool,
    #[serde(skip)]
    pub validate: Option<ValidateFn>,
}

impl Attribute {
    fn string() -> Self {
        Self {
            kind: AttributeType::String,
            description: None,
            required: false,
            optional: false,
            computed: false,
            sensitive: false,
            validate: None,
        }
    }

    pub fn required_string() -> Self {
        Self {
            required: true,
            ..Self::string()
        }
    }

    pub fn optional_string() -> Self {
        Self {
            optional: true,
            ..Self::string()
        }
    }

    pub fn computed_string() -> Self {
        Self {
            computed: true,
            ..Self::string()
        }
    }

    pub fn with_description(mut self, description: &'static str) -> Self {
        self.description = Some(description);
        self
    }

    pub fn with_validator(mut self, validate: ValidateFn) -> Self {
        self.validate = Some(validate);
        self
    }

    pub fn sensitive(mut self) -> Self {
        self.sensitive = true;
        self
    }

    fn settable(&self) -> bool {
        self.required || self.optional
    }
}

/// Schema of one data source, resource or the provider block
#[derive(Debug, Clone, Serialize)]
pub struct Schema {
    pub description: &'static str,
    pub attributes: BTreeMap<&'static str, Attribute>,
}

impl Schema {
    pub fn new(description: &'static str) -> Self {
        Self {
            description,
            attributes: BTreeMap::new(),
        }
    }

    pub fn with_attribute(mut self, name: &'static str, attribute: Attribute) -> Self {
        self.attributes.insert(name, attribute);
        self
    }

    /// Check a configuration object against this schema
    pub fn validate(&self, config: &Value) -> Vec<Diagnostic> {
        let Some(config) = config.as_object() else {
            return vec![Diagnostic::error("Configuration must be a JSON object")];
        };

        let mut diagnostics = Vec::new();

        // "id" and computed attributes may be echoed back from prior state
        for key in config.keys() {
            if key != "id" && !self.attributes.contains_key(key.as_str()) {
                diagnostics.push(
                    Diagnostic::error(format!("Unsupported argument {:?}", key)).with_attribute(key),
                );
            }
        }

        for (name, attr) in &self.attributes {
            let value = config.get(*name).filter(|v| !v.is_null());

            if !attr.settable() {
                continue;
            }

            let Some(value) = value else {
                if attr.required {
                    diagnostics.push(
                        Diagnostic::error(format!("Missing required argument {:?}", name))
                            .with_attribute(*name),
                    );
                }
                continue;
            };

            let Some(s) = value.as_str() else {
                diagnostics.push(
                    Diagnostic::error(format!("Incorrect attribute value type for {:?}", name))
                        .with_detail("string required")
                        .with_attribute(*name),
                );
                continue;
            };

            if let Some(validate) = attr.validate {
                diagnostics.extend(
                    validate(s, *name)
                        .into_iter()
                        .map(|msg| Diagnostic::error(msg).with_attribute(*name)),
                );
            }
        }

        diagnostics
    }
}

/// Validator helper: is `value` one of `allowed`
pub fn string_in_slice(value: &str, allowed: &[&str]) -> bool {
    allowed.iter().any(|a| *a == value)
}
