use crate::error::{Error, Result};
use async_trait::async_trait;
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Put,
    Post,
    Patch,
    Delete,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Put => "PUT",
            Method::Post => "POST",
            Method::Patch => "PATCH",
            Method::Delete => "DELETE",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum RequestBody {
    Empty,
    Json(Value),
    /// Single file sent as a `multipart/form-data` field named `file`.
    File {
        file_name: String,
        content: Vec<u8>,
    },
}

/// A request against the domain REST API. `path` is relative to the endpoint root.
#[derive(Debug, Clone, PartialEq)]
pub struct DomainRequest {
    pub method: Method,
    pub path: String,
    pub headers: Vec<(String, String)>,
    pub body: RequestBody,
}

impl DomainRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            headers: Vec::new(),
            body: RequestBody::Empty,
        }
    }

    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::Put, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::Post, path)
    }

    pub fn patch(path: impl Into<String>) -> Self {
        Self::new(Method::Patch, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::Delete, path)
    }

    pub fn header(mut self, name: &str, value: &str) -> Self {
        self.headers.push((name.to_string(), value.to_string()));
        self
    }

    pub fn json(mut self, body: Value) -> Self {
        self.body = RequestBody::Json(body);
        self
    }

    pub fn file(mut self, file_name: &str, content: impl Into<Vec<u8>>) -> Self {
        self.body = RequestBody::File {
            file_name: file_name.to_string(),
            content: content.into(),
        };
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DomainResponse {
    pub status: u16,
    pub body: String,
}

impl DomainResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Turn a non-success response into a configuration error attributed to `context`.
    pub fn ensure_success(self, context: &str) -> Result<Self> {
        if self.is_success() {
            Ok(self)
        } else {
            Err(Error::configuration(context, self.status, self.body))
        }
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DomainApiPort: Send + Sync {
    /// Send an IAM-signed request to the domain
    async fn send(&self, request: DomainRequest) -> Result<DomainResponse>;

    /// Call the auth info endpoint as an internal user (HTTP basic auth)
    async fn authenticate(&self, username: &str, password: &str) -> Result<DomainResponse>;
}
