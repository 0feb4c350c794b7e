//! Foreman namespace: jobs created by the server to build and tear down
//! foundations and structures.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::resource::resource;

/// Fields shared by every job kind.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BaseJob {
    #[serde(skip_deserializing, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub site: Option<String>,
    pub state: Option<String>,
    /// Per-step progress as reported by the job runner.
    pub status: Option<Value>,
    pub message: Option<String>,
    pub script_name: Option<String>,
    pub can_start: Option<bool>,
    pub max_time: Option<i64>,
    pub created: Option<DateTime<Utc>>,
    pub updated: Option<DateTime<Utc>>,
}

resource!(BaseJob, "/api/v1/Foreman/", "BaseJob", create: [], update: []);

/// Job building or destroying a foundation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FoundationJob {
    #[serde(skip_deserializing, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(flatten)]
    pub job: BaseJob,
    pub foundation: Option<String>,
}

resource!(FoundationJob, "/api/v1/Foreman/", "FoundationJob", create: [], update: []);

/// Job building or destroying a structure.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StructureJob {
    #[serde(skip_deserializing, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(flatten)]
    pub job: BaseJob,
    pub structure: Option<String>,
}

resource!(StructureJob, "/api/v1/Foreman/", "StructureJob", create: [], update: []);

/// Job satisfying a dependency between structures.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DependencyJob {
    #[serde(skip_deserializing, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(flatten)]
    pub job: BaseJob,
    pub dependency: Option<String>,
}

resource!(DependencyJob, "/api/v1/Foreman/", "DependencyJob", create: [], update: []);
