//! `jumpcloud_system` data source

use super::diag::Diagnostic;
use super::resource_data::ResourceData;
use super::schema::{Attribute, Schema};
use crate::config::Config;
use crate::jumpcloud::v1::{self, Search, System};
use anyhow::Result;

pub const TYPE_NAME: &str = "jumpcloud_system";

pub fn schema() -> Schema {
    Schema::new("Use this data source to get information about the JumpCloud System.")
        .with_attribute("id", Attribute::computed_string())
        .with_attribute(
            "name",
            Attribute::required_string()
                .with_description("The system defined name, e.g. `xxxx-xxx-Mac`."),
        )
        .with_attribute("os", Attribute::computed_string())
}

/// Search is fuzzy; only an exact display name counts
pub fn find_system<'a>(systems: &'a [System], name: &str) -> Option<&'a System> {
    systems.iter().find(|s| s.display_name == name)
}

/// Leaves state untouched when nothing matches; that case returns a warning
pub async fn read(config: &Config, d: &mut ResourceData) -> Result<Vec<Diagnostic>> {
    let client = config.v1_client()?;
    let name = d.get_str("name").to_string();

    let search = Search::field("displayName", &name);
    let systems = v1::search_systems_post(&client, &search)
        .await
        .map_err(|err| err.context("could not find system specified"))?;

    if let Some(system) = find_system(&systems.results, &name) {
        tracing::debug!("system {:?} resolved to {}", name, system.id);
        d.set_id(system.id.clone());
        d.set("id", system.id.clone());
        d.set("os", system.os.clone());
        return Ok(Vec::new());
    }

    tracing::debug!(
        "no system with display name {:?} among {} results (total {})",
        name,
        systems.results.len(),
        systems.total_count
    );
    Ok(vec![Diagnostic::warning(format!(
        "No system with display name {:?}; keeping previous state",
        name
    ))
    .with_attribute("name")])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn system(id: &str, display_name: &str) -> System {
        System {
            id: id.to_string(),
            display_name: display_name.to_string(),
            os: "Mac OS X".to_string(),
        }
    }

    #[test]
    fn test_exact_match_only() {
        let systems = vec![system("S0", "build-mac-2"), system("S1", "build-mac")];
        assert_eq!(find_system(&systems, "build-mac").unwrap().id, "S1");
        assert!(find_system(&systems, "build").is_none());
        assert!(find_system(&systems, "BUILD-MAC").is_none());
    }
}
