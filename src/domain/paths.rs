//! Paths on the search domain's REST API, relative to the endpoint root.

use urlencoding::encode;

pub const PIPELINE_ROLE: &str = "_opendistro/_security/api/roles/pipeline_role";
pub const PIPELINE_ROLE_MAPPING: &str = "_opendistro/_security/api/rolesmapping/pipeline_role";
pub const SAVED_OBJECTS_IMPORT: &str = "_dashboards/api/saved_objects/_import?overwrite=true";
pub const AUTH_INFO: &str = "_plugins/_security/authinfo";

/// Header required by the dashboards API on mutating calls.
pub const DASHBOARDS_XSRF_HEADER: (&str, &str) = ("osd-xsrf", "true");

// Dynamic segments are percent-encoded.
pub fn internal_user(username: &str) -> String {
    format!("_plugins/_security/api/internalusers/{}", encode(username))
}

pub fn index_template(name: &str) -> String {
    format!("_index_template/{}", encode(name))
}

pub fn saved_object(kind: &str, id: &str) -> String {
    format!("_dashboards/api/saved_objects/{}/{}", encode(kind), encode(id))
}
