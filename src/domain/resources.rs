//! Payloads pushed to the search domain by the bootstrap handler.
//!
//! Static files are embedded at build time. The `.tera` files are rendered
//! with values emitted as JSON literals, so any password character ends up
//! correctly escaped in the resulting document.

use crate::error::{Error, Result};
use serde_json::Value;
use tera::{Context, Tera};

const PIPELINE_ROLE: &str = include_str!("../../resources/users/pipeline_role.json");
const PIPELINE_ROLE_MAPPING: &str = include_str!("../../resources/users/pipeline_role_mapping.tera");
const ADMIN_USER: &str = include_str!("../../resources/users/admin.tera");
const READ_ONLY_USER: &str = include_str!("../../resources/users/user.tera");

/// Index templates applied on Create/Update, in order.
pub const INDEX_TEMPLATES: [IndexTemplate; 3] = [
    IndexTemplate {
        name: "spark_logs",
        source: include_str!("../../resources/templates/spark-logs.json"),
    },
    IndexTemplate {
        name: "spark_task_metrics",
        source: include_str!("../../resources/templates/spark-task-metrics.json"),
    },
    IndexTemplate {
        name: "spark_stage_agg_metrics",
        source: include_str!("../../resources/templates/spark-stage-agg-metrics.json"),
    },
];

/// Saved objects imported into the dashboards plugin.
pub const DATA_SKEW_DASHBOARD: DashboardBundle = DashboardBundle {
    file_name: "data-skew.ndjson",
    content: include_str!("../../resources/dashboards/data-skew.ndjson"),
};

#[derive(Debug, Clone, Copy)]
pub struct IndexTemplate {
    pub name: &'static str,
    source: &'static str,
}

impl IndexTemplate {
    pub fn body(&self) -> Result<Value> {
        Ok(serde_json::from_str(self.source)?)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct DashboardBundle {
    pub file_name: &'static str,
    pub content: &'static str,
}

/// Internal users managed by the bootstrap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InternalUser {
    /// Dashboard administrator
    Admin,
    /// Read-only dashboard user
    ReadOnly,
}

impl InternalUser {
    fn template(&self) -> &'static str {
        match self {
            InternalUser::Admin => ADMIN_USER,
            InternalUser::ReadOnly => READ_ONLY_USER,
        }
    }
}

pub fn pipeline_role() -> Result<Value> {
    Ok(serde_json::from_str(PIPELINE_ROLE)?)
}

/// Role mapping binding the pipeline IAM role to `pipeline_role`.
pub fn pipeline_role_mapping(role_arn: &str) -> Result<Value> {
    let mut context = Context::new();
    context.insert("backend_role", &serde_json::to_string(role_arn)?);
    render(PIPELINE_ROLE_MAPPING, &context)
}

pub fn internal_user(user: InternalUser, password: &str) -> Result<Value> {
    let mut context = Context::new();
    context.insert("secret_password", &serde_json::to_string(password)?);
    render(user.template(), &context)
}

fn render(template: &str, context: &Context) -> Result<Value> {
    let rendered = Tera::one_off(template, context, false)
        .map_err(|e| Error::Template(format!("{:?}", e)))?;
    Ok(serde_json::from_str(&rendered)?)
}
