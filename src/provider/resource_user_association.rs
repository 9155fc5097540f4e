//! `jumpcloud_user_association` resource
//!
//! Manages one edge of the association graph between a system and a user.
//! Edges only know add and remove, so update re-adds.

use super::resource_data::ResourceData;
use super::schema::{string_in_slice, Attribute, Schema};
use crate::config::Config;
use crate::jumpcloud::client::ApiClient;
use crate::jumpcloud::v2::{self, GraphConnection, GraphOp, SystemGraphManagementReq};
use anyhow::{bail, Result};

pub const TYPE_NAME: &str = "jumpcloud_user_association";

/// Accepted values of `type`
pub const ALLOWED_TYPES: &[&str] = &["system", "user"];

pub fn schema() -> Schema {
    Schema::new(
        "Provides a resource for associating a JumpCloud user group to objects like SSO \
         applications, G Suite, Office 365, LDAP and more.",
    )
    .with_attribute(
        "system_id",
        Attribute::required_string().with_description("The ID of the `resource_user_group` resource."),
    )
    .with_attribute(
        "user_id",
        Attribute::required_string().with_description("The ID of the object to associate to the group."),
    )
    .with_attribute(
        "type",
        Attribute::required_string()
            .with_description(
                "The type of the object to associate to the given group. Possible values: \
                 `active_directory`, `application`, `command`, `g_suite`, `ldap_server`, \
                 `office_365`, `policy`, `radius_server`, `system`, `system_group`.",
            )
            .with_validator(validate_type),
    )
}

fn validate_type(value: &str, key: &str) -> Vec<String> {
    if string_in_slice(value, ALLOWED_TYPES) {
        Vec::new()
    } else {
        vec![format!("{:?} must be one of {:?}", key, ALLOWED_TYPES)]
    }
}

/// Terraform identifier of an edge
pub fn composite_id(user_id: &str, system_id: &str) -> String {
    format!("{}/{}", user_id, system_id)
}

/// Split `userId/systemId`
pub fn parse_composite_id(id: &str) -> Result<(&str, &str)> {
    match id.split_once('/') {
        Some((user_id, system_id))
            if !user_id.is_empty() && !system_id.is_empty() && !system_id.contains('/') =>
        {
            Ok((user_id, system_id))
        }
        _ => bail!("Unexpected import ID {:?}, expected \"<user_id>/<system_id>\"", id),
    }
}

pub fn has_edge_to(edges: &[GraphConnection], system_id: &str) -> bool {
    edges.iter().any(|edge| edge.to.id == system_id)
}

async fn modify_user_association(client: &ApiClient, d: &ResourceData, op: GraphOp) -> Result<()> {
    let request = SystemGraphManagementReq {
        op,
        kind: d.get_str("type").to_string(),
        id: d.get_str("user_id").to_string(),
    };
    let system_id = d.get_str("system_id");

    tracing::info!("{:?} association {} -> {}", op, system_id, request.id);
    v2::graph_system_associations_post(client, system_id, &request).await
}

pub async fn create(config: &Config, d: &mut ResourceData) -> Result<()> {
    let client = config.v2_client()?;
    modify_user_association(&client, d, GraphOp::Add).await?;
    read(config, d).await
}

/// Same wire call as create
pub async fn update(config: &Config, d: &mut ResourceData) -> Result<()> {
    let client = config.v2_client()?;
    modify_user_association(&client, d, GraphOp::Add).await?;
    read(config, d).await
}

pub async fn read(config: &Config, d: &mut ResourceData) -> Result<()> {
    let client = config.v2_client()?;
    let user_id = d.get_str("user_id").to_string();
    let system_id = d.get_str("system_id").to_string();

    let edges = v2::graph_user_associations_list(
        &client,
        &user_id,
        &["system"],
        v2::ASSOCIATION_LIST_LIMIT,
    )
    .await?;

    if has_edge_to(&edges, &system_id) {
        d.set_id(composite_id(&user_id, &system_id));
    } else {
        tracing::debug!("association {} not found among {} edges", system_id, edges.len());
        d.set_id("");
    }

    Ok(())
}

pub async fn delete(config: &Config, d: &mut ResourceData) -> Result<()> {
    let client = config.v2_client()?;
    modify_user_association(&client, d, GraphOp::Remove).await?;
    d.set_id("");
    Ok(())
}

/// Populate ids from `userId/systemId`, then read
pub async fn import(config: &Config, d: &mut ResourceData, id: &str) -> Result<()> {
    let (user_id, system_id) = parse_composite_id(id)?;
    d.set("user_id", user_id);
    d.set("system_id", system_id);
    read(config, d).await
}
