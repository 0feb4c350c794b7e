//! Building namespace: foundations, structures and complexes.

use chrono::{DateTime, Utc};
use cinp::Object;
use serde::{Deserialize, Serialize};

use crate::resource::resource;

/// A physical or virtual host substrate, bound to a provisioning provider.
///
/// Foundations are created through their provider subtype (see
/// [`crate::models::providers`]); the base kind is used to read, update,
/// delete and drive them regardless of provider.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Foundation {
    /// Server id (the locator).
    #[serde(skip_deserializing, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub locator: Option<String>,
    /// URI of the site.
    pub site: Option<String>,
    /// URI of the foundation blueprint.
    pub blueprint: Option<String>,
    /// Provider type, fixed by the subtype the foundation was created as.
    #[serde(rename = "type")]
    pub foundation_type: Option<String>,
    pub state: Option<String>,
    pub class_list: Option<Vec<String>>,
    pub id_map: Option<Object>,
    /// URI of the structure deployed on this foundation.
    pub structure: Option<String>,
    pub located_at: Option<DateTime<Utc>>,
    pub built_at: Option<DateTime<Utc>>,
    pub created: Option<DateTime<Utc>>,
    pub updated: Option<DateTime<Utc>>,
}

resource!(
    Foundation, "/api/v1/Building/", "Foundation",
    create: [],
    update: ["site", "blueprint", "id_map"],
);

/// A deployed workload bound to a foundation and a blueprint.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Structure {
    #[serde(skip_deserializing, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub hostname: Option<String>,
    pub site: Option<String>,
    pub blueprint: Option<String>,
    pub foundation: Option<String>,
    pub config_uuid: Option<String>,
    pub config_values: Option<Object>,
    pub state: Option<String>,
    pub built_at: Option<DateTime<Utc>>,
    pub created: Option<DateTime<Utc>>,
    pub updated: Option<DateTime<Utc>>,
}

resource!(
    Structure, "/api/v1/Building/", "Structure",
    create: ["hostname", "site", "blueprint", "foundation", "config_values"],
    update: ["hostname", "site", "blueprint", "config_values"],
);

/// A group of structures acting as a host for virtual foundations.
///
/// Like foundations, complexes are created through their provider subtype.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Complex {
    /// Server id (the complex name).
    #[serde(skip_deserializing, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: Option<String>,
    pub site: Option<String>,
    pub description: Option<String>,
    #[serde(rename = "type")]
    pub complex_type: Option<String>,
    pub state: Option<String>,
    /// Percentage of members that must be built for the complex to count
    /// as built.
    pub built_percentage: Option<i64>,
    /// URIs of member structures.
    pub members: Option<Vec<String>>,
    pub created: Option<DateTime<Utc>>,
    pub updated: Option<DateTime<Utc>>,
}

resource!(
    Complex, "/api/v1/Building/", "Complex",
    create: [],
    update: ["description", "built_percentage", "members"],
);
