//! `jumpcloud_application` data source

use super::resource_data::ResourceData;
use super::schema::{Attribute, Schema};
use crate::config::Config;
use crate::jumpcloud::v1::{self, Application};
use anyhow::Result;

pub const TYPE_NAME: &str = "jumpcloud_application";

pub fn schema() -> Schema {
    Schema::new("Use this data source to get information about the JumpCloud Applications.")
        .with_attribute("id", Attribute::computed_string())
        .with_attribute(
            "name",
            Attribute::required_string()
                .with_description("The application name, e.g. `aws or docusign`."),
        )
        .with_attribute(
            "displayname",
            Attribute::optional_string()
                .with_description("The application displayName, e.g. `AWS SSO or DocuSign`."),
        )
        .with_attribute("ssourl", Attribute::computed_string())
}

/// First application whose display name or name matches.
///
/// An unset display name is compared as "", so it also matches applications
/// without a display name.
pub fn find_application<'a>(
    applications: &'a [Application],
    name: &str,
    displayname: &str,
) -> Option<&'a Application> {
    applications
        .iter()
        .find(|app| app.display_name == displayname || app.name == name)
}

pub async fn read(config: &Config, d: &mut ResourceData) -> Result<()> {
    let client = config.v1_client()?;

    let applications = match v1::applications_list(&client).await {
        Ok(list) => list,
        Err(err) => {
            d.set_id("");
            return Err(err.context("could not find any application"));
        }
    };

    let name = d.get_str("name").to_string();
    let displayname = d.get_str("displayname").to_string();

    match find_application(&applications.results, &name, &displayname) {
        Some(app) => {
            tracing::debug!("application {:?} resolved to {}", name, app.id);
            d.set_id(app.id.clone());
            d.set("id", app.id.clone());
            d.set("ssourl", app.sso_url.clone());
            d.set("displayname", app.display_name.clone());
        }
        None => {
            tracing::debug!(
                "no application named {:?} among {} results (total {})",
                name,
                applications.results.len(),
                applications.total_count
            );
            d.set_id("");
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn app(id: &str, name: &str, display_name: &str) -> Application {
        Application {
            id: id.to_string(),
            name: name.to_string(),
            display_name: display_name.to_string(),
            sso_url: format!("https://sso/{}", id),
        }
    }

    #[test]
    fn test_match_by_name() {
        let apps = vec![app("A0", "docusign", "DocuSign"), app("A1", "aws", "AWS SSO")];
        assert_eq!(find_application(&apps, "aws", "").unwrap().id, "A1");
    }

    #[test]
    fn test_match_by_display_name_wins_first() {
        let apps = vec![app("A0", "aws", "AWS Old"), app("A1", "aws2", "AWS SSO")];
        assert_eq!(find_application(&apps, "other", "AWS SSO").unwrap().id, "A1");
        assert_eq!(find_application(&apps, "aws", "AWS SSO").unwrap().id, "A0");
    }

    #[test]
    fn test_no_match() {
        let apps = vec![app("A1", "aws", "AWS SSO")];
        assert!(find_application(&apps, "slack", "").is_none());
        assert!(find_application(&[], "aws", "").is_none());
    }

    #[test]
    fn test_unset_display_name_matches_blank_display_name() {
        let apps = vec![app("A1", "legacy", "")];
        assert_eq!(find_application(&apps, "aws", "").unwrap().id, "A1");
    }

    #[test]
    fn test_schema_shape() {
        let schema = schema();
        assert!(schema.attributes["name"].required);
        assert!(schema.attributes["displayname"].optional);
        assert!(schema.attributes["ssourl"].computed);
    }
}
