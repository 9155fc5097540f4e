//! JumpCloud v2 API
//!
//! Association graph: edges between systems and users.

use super::client::{add_query_params, ApiClient};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Edges returned per association listing
pub const ASSOCIATION_LIST_LIMIT: u32 = 100;

/// Graph edge operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum GraphOp {
    Add,
    Remove,
}

/// Body of `POST /systems/{id}/associations`
#[derive(Debug, Clone, Serialize)]
pub struct SystemGraphManagementReq {
    pub op: GraphOp,
    #[serde(rename = "type")]
    pub kind: String,
    pub id: String,
}

/// Node at one end of a graph edge
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GraphObject {
    #[serde(default)]
    pub id: String,
    #[serde(rename = "type", default)]
    pub kind: String,
}

/// One association edge
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GraphConnection {
    #[serde(default)]
    pub to: GraphObject,
}

/// Add or remove an association edge on a system
pub async fn graph_system_associations_post(
    client: &ApiClient,
    system_id: &str,
    request: &SystemGraphManagementReq,
) -> Result<()> {
    let url = client.url(&["systems", system_id, "associations"]);
    let body = serde_json::to_value(request).context("Failed to encode association request")?;
    client.post(&url, Some(&body)).await?;
    Ok(())
}

/// List a user's associations of the given target kinds
pub async fn graph_user_associations_list(
    client: &ApiClient,
    user_id: &str,
    targets: &[&str],
    limit: u32,
) -> Result<Vec<GraphConnection>> {
    let url = client.url(&["users", user_id, "associations"]);
    let limit = limit.to_string();
    let mut params: Vec<(&str, &str)> = targets.iter().map(|t| ("targets", *t)).collect();
    params.push(("limit", limit.as_str()));
    let url = add_query_params(&url, &params);

    let response = client.get(&url).await?;
    if response.is_null() {
        return Ok(Vec::new());
    }
    serde_json::from_value(response).context("Failed to decode association list")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_management_request_shape() {
        let req = SystemGraphManagementReq {
            op: GraphOp::Remove,
            kind: "user".to_string(),
            id: "U1".to_string(),
        };
        assert_eq!(
            serde_json::to_value(&req).unwrap(),
            json!({"op": "remove", "type": "user", "id": "U1"})
        );
    }

    #[test]
    fn test_connection_decodes_nested_target() {
        let edges: Vec<GraphConnection> = serde_json::from_value(json!([
            {"to": {"id": "S1", "type": "system"}, "attributes": null},
            {"to": {"id": "S2", "type": "system", "attributes": {"sudo": {"enabled": true}}}}
        ]))
        .unwrap();

        assert_eq!(edges.len(), 2);
        assert_eq!(edges[0].to.id, "S1");
        assert_eq!(edges[1].to.kind, "system");
    }
}
