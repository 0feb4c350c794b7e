//! Survey namespace: physical plots and the cartographer agents that map
//! hardware into them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::resource::resource;

/// A physical area (datacenter, row, rack) hardware lives in.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Plot {
    #[serde(skip_deserializing, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: Option<String>,
    pub corners: Option<String>,
    pub description: Option<String>,
    /// URI of the enclosing plot.
    pub parent: Option<String>,
    pub created: Option<DateTime<Utc>>,
    pub updated: Option<DateTime<Utc>>,
}

resource!(
    Plot, "/api/v1/Survey/", "Plot",
    create: ["name", "corners", "description", "parent"],
    update: ["corners", "description", "parent"],
);

/// Agent running on unidentified hardware, waiting to be assigned to a
/// foundation. Cartographers register themselves.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Cartographer {
    #[serde(skip_deserializing, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub identifier: Option<String>,
    pub message: Option<String>,
    /// URI of the foundation the hardware was assigned to.
    pub foundation: Option<String>,
    pub last_checkin: Option<DateTime<Utc>>,
    pub created: Option<DateTime<Utc>>,
    pub updated: Option<DateTime<Utc>>,
}

resource!(Cartographer, "/api/v1/Survey/", "Cartographer", create: [], update: ["message"]);
