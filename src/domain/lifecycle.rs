use crate::error::Error;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

/// Lifecycle operation requested by the custom resource framework.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestType {
    Create,
    Update,
    Delete,
}

impl RequestType {
    pub fn as_str(&self) -> &'static str {
        match self {
            RequestType::Create => "Create",
            RequestType::Update => "Update",
            RequestType::Delete => "Delete",
        }
    }
}

impl FromStr for RequestType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Create" => Ok(RequestType::Create),
            "Update" => Ok(RequestType::Update),
            "Delete" => Ok(RequestType::Delete),
            other => Err(Error::UnsupportedRequestType(other.to_string())),
        }
    }
}

impl fmt::Display for RequestType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Event delivered by the custom resource framework.
///
/// `RequestType` stays a raw string so that an unknown value surfaces as
/// [`Error::UnsupportedRequestType`] instead of a deserialization failure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct LifecycleEvent {
    pub request_type: String,
    #[serde(default)]
    pub resource_properties: Map<String, Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub physical_resource_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logical_resource_id: Option<String>,
    /// Data returned by the previous Create, carried into Delete.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<ResourceData>,
}

impl LifecycleEvent {
    pub fn request_type(&self) -> Result<RequestType, Error> {
        self.request_type.parse()
    }

    /// Saved objects captured by a prior Create, empty when none were supplied.
    pub fn captured_resources(&self) -> &[SavedObjectRef] {
        self.data
            .as_ref()
            .map(|d| d.resources.as_slice())
            .unwrap_or_default()
    }
}

/// Identity of a dashboard saved object created by the import.
///
/// The import response also carries `meta` and `overwrite`; those are dropped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedObjectRef {
    #[serde(rename = "type")]
    pub kind: String,
    pub id: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResourceData {
    #[serde(rename = "Resources", default)]
    pub resources: Vec<SavedObjectRef>,
}

/// Response returned to the custom resource framework.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LifecycleResponse {
    #[serde(rename = "Data")]
    pub data: ResourceData,
}

impl LifecycleResponse {
    pub fn with_resources(resources: Vec<SavedObjectRef>) -> Self {
        Self {
            data: ResourceData { resources },
        }
    }
}
