use crate::config::endpoint_url;
use crate::domain::paths;
use crate::error::{Error, Result};
use crate::ports::domain_api::{DomainApiPort, DomainRequest, DomainResponse, Method, RequestBody};
use async_trait::async_trait;
use aws_config::SdkConfig;
use aws_credential_types::provider::{ProvideCredentials, SharedCredentialsProvider};
use aws_sigv4::http_request::{
    sign, PayloadChecksumKind, SignableBody, SignableRequest, SigningSettings,
};
use aws_sigv4::sign::v4;
use aws_smithy_runtime_api::client::identity::Identity;
use std::time::{Duration, SystemTime};
use tracing::{debug, info};

/// Signing name of Amazon OpenSearch Service.
const SERVICE_NAME: &str = "es";

/// HTTP client for the domain REST API, signing every request with SigV4.
#[derive(Clone)]
pub struct SignedDomainClient {
    http: reqwest::Client,
    base_url: String,
    region: String,
    credentials: SharedCredentialsProvider,
}

impl SignedDomainClient {
    pub fn new(
        endpoint: &str,
        region: impl Into<String>,
        credentials: SharedCredentialsProvider,
        timeout: Duration,
    ) -> Result<Self> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            base_url: endpoint_url(endpoint),
            region: region.into(),
            credentials,
        })
    }

    /// Use the ambient credential chain of the shared SDK config.
    pub fn from_sdk_config(
        endpoint: &str,
        region: impl Into<String>,
        sdk_config: &SdkConfig,
        timeout: Duration,
    ) -> Result<Self> {
        let credentials = sdk_config
            .credentials_provider()
            .ok_or_else(|| Error::Signing("no credentials provider configured".to_string()))?;
        Self::new(endpoint, region, credentials, timeout)
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Compute the SigV4 headers for a request. Credentials are resolved on
    /// every call so refreshed session tokens are picked up.
    async fn signature_headers(
        &self,
        method: Method,
        url: &str,
        headers: &[(String, String)],
        body: &[u8],
    ) -> Result<Vec<(String, String)>> {
        let credentials = self
            .credentials
            .provide_credentials()
            .await
            .map_err(|e| Error::Signing(e.to_string()))?;
        let identity: Identity = credentials.into();

        let mut settings = SigningSettings::default();
        settings.payload_checksum_kind = PayloadChecksumKind::XAmzSha256;

        let params = v4::SigningParams::builder()
            .identity(&identity)
            .region(&self.region)
            .name(SERVICE_NAME)
            .time(SystemTime::now())
            .settings(settings)
            .build()
            .map_err(|e| Error::Signing(e.to_string()))?
            .into();

        let signable = SignableRequest::new(
            method.as_str(),
            url,
            headers.iter().map(|(k, v)| (k.as_str(), v.as_str())),
            SignableBody::Bytes(body),
        )
        .map_err(|e| Error::Signing(e.to_string()))?;

        let (instructions, _signature) = sign(signable, &params)
            .map_err(|e| Error::Signing(e.to_string()))?
            .into_parts();

        Ok(instructions
            .headers()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect())
    }
}

fn http_method(method: Method) -> reqwest::Method {
    match method {
        Method::Get => reqwest::Method::GET,
        Method::Put => reqwest::Method::PUT,
        Method::Post => reqwest::Method::POST,
        Method::Patch => reqwest::Method::PATCH,
        Method::Delete => reqwest::Method::DELETE,
    }
}

/// Encode a single `file` field as `multipart/form-data`.
fn multipart_body(boundary: &str, file_name: &str, content: &[u8]) -> Vec<u8> {
    let mut body = Vec::with_capacity(content.len() + 256);
    body.extend_from_slice(format!("--{}\r\n", boundary).as_bytes());
    body.extend_from_slice(
        format!(
            "Content-Disposition: form-data; name=\"file\"; filename=\"{}\"\r\n",
            file_name
        )
        .as_bytes(),
    );
    body.extend_from_slice(b"Content-Type: application/ndjson\r\n\r\n");
    body.extend_from_slice(content);
    body.extend_from_slice(format!("\r\n--{}--\r\n", boundary).as_bytes());
    body
}

async fn into_domain_response(response: reqwest::Response) -> Result<DomainResponse> {
    let status = response.status().as_u16();
    let body = response.text().await?;
    Ok(DomainResponse::new(status, body))
}

#[async_trait]
impl DomainApiPort for SignedDomainClient {
    async fn send(&self, request: DomainRequest) -> Result<DomainResponse> {
        let url = self.url(&request.path);
        let mut headers = request.headers;

        let body = match request.body {
            RequestBody::Empty => Vec::new(),
            RequestBody::Json(value) => {
                headers.push(("content-type".to_string(), "application/json".to_string()));
                serde_json::to_vec(&value)?
            }
            RequestBody::File { file_name, content } => {
                let boundary = format!("------------------------{}", uuid::Uuid::new_v4().simple());
                headers.push((
                    "content-type".to_string(),
                    format!("multipart/form-data; boundary={}", boundary),
                ));
                multipart_body(&boundary, &file_name, &content)
            }
        };

        let signature = self
            .signature_headers(request.method, &url, &headers, &body)
            .await?;

        let mut builder = self.http.request(http_method(request.method), &url);
        for (name, value) in headers.iter().chain(signature.iter()) {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if !body.is_empty() {
            builder = builder.body(body);
        }

        let response = into_domain_response(builder.send().await?).await?;
        info!(
            method = request.method.as_str(),
            path = %request.path,
            status = response.status,
            "Domain API call"
        );
        debug!(body = %response.body, "Domain API response");
        Ok(response)
    }

    async fn authenticate(&self, username: &str, password: &str) -> Result<DomainResponse> {
        let response = self
            .http
            .get(self.url(paths::AUTH_INFO))
            .basic_auth(username, Some(password))
            .send()
            .await?;

        let response = into_domain_response(response).await?;
        info!(username, status = response.status, "Authentication probe");
        Ok(response)
    }
}
