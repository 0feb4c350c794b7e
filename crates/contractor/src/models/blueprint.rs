//! BluePrint namespace.

use chrono::{DateTime, Utc};
use cinp::Object;
use serde::{Deserialize, Serialize};

use crate::resource::resource;

/// Template for foundations: which foundation types it applies to and the
/// config values they inherit.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FoundationBluePrint {
    #[serde(skip_deserializing, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: Option<String>,
    pub description: Option<String>,
    /// URIs of parent blueprints.
    pub parent_list: Option<Vec<String>>,
    pub foundation_type_list: Option<Vec<String>>,
    pub template: Option<Object>,
    pub physical_interface_names: Option<Vec<String>>,
    pub config_values: Option<Object>,
    pub created: Option<DateTime<Utc>>,
    pub updated: Option<DateTime<Utc>>,
}

resource!(
    FoundationBluePrint, "/api/v1/BluePrint/", "FoundationBluePrint",
    create: [
        "name", "description", "parent_list", "foundation_type_list",
        "template", "physical_interface_names", "config_values",
    ],
    update: [
        "description", "parent_list", "foundation_type_list", "template",
        "physical_interface_names", "config_values",
    ],
);

/// Template for structures, restricted to the foundation blueprints it can
/// be deployed on.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StructureBluePrint {
    #[serde(skip_deserializing, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub parent_list: Option<Vec<String>>,
    /// URIs of the foundation blueprints this blueprint can run on.
    pub foundation_blueprint_list: Option<Vec<String>>,
    pub config_values: Option<Object>,
    pub created: Option<DateTime<Utc>>,
    pub updated: Option<DateTime<Utc>>,
}

resource!(
    StructureBluePrint, "/api/v1/BluePrint/", "StructureBluePrint",
    create: [
        "name", "description", "parent_list", "foundation_blueprint_list", "config_values",
    ],
    update: ["description", "parent_list", "foundation_blueprint_list", "config_values"],
);
