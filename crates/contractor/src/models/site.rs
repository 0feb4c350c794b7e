//! Site namespace.

use chrono::{DateTime, Utc};
use cinp::Object;
use serde::{Deserialize, Serialize};

use crate::resource::resource;

/// A site groups everything deployed in one place and carries the config
/// values inherited by it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Site {
    /// Server id (the site name).
    #[serde(skip_deserializing, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: Option<String>,
    pub zone: Option<String>,
    pub description: Option<String>,
    /// URI of the parent site.
    pub parent: Option<String>,
    pub config_values: Option<Object>,
    pub created: Option<DateTime<Utc>>,
    pub updated: Option<DateTime<Utc>>,
}

resource!(
    Site, "/api/v1/Site/", "Site",
    create: ["name", "zone", "description", "parent", "config_values"],
    update: ["zone", "description", "parent", "config_values"],
);
