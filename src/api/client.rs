//! Invoicible Client
//!
//! Main client for the Invoicible API, combining request signing and the
//! HTTP connection. Every entity and manager holds a clone of it.

use super::auth::{HmacSha1Signer, OAuthCredentials, RequestSigner};
use super::http::{sanitize_for_log, ApiResponse, HttpClient};
use crate::config::Config;
use crate::error::{Error, Result, ValidationError};
use crate::resource::ParseOptions;
use reqwest::{Method, StatusCode};
use serde_json::Value;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use url::Url;

/// Service host used when none is configured
pub const DEFAULT_DOMAIN: &str = "secure.centrumfaktur.pl";

/// Main Invoicible client
#[derive(Clone)]
pub struct Client {
    signer: Arc<dyn RequestSigner>,
    http: HttpClient,
    base_url: Url,
    parse_options: ParseOptions,
}

impl Client {
    /// Create a client for `https://{domain}` signing with HMAC-SHA1 OAuth
    pub fn new(credentials: OAuthCredentials, domain: &str) -> Result<Self> {
        Self::with_base_url(
            Arc::new(HmacSha1Signer::new(credentials)),
            &format!("https://{}/", domain),
        )
    }

    /// Create a client against an explicit base url with any signer
    pub fn with_base_url(signer: Arc<dyn RequestSigner>, base_url: &str) -> Result<Self> {
        Ok(Self {
            signer,
            http: HttpClient::new(None)?,
            base_url: Url::parse(base_url)?,
            parse_options: ParseOptions::default(),
        })
    }

    /// Build a client from loaded configuration
    pub fn from_config(config: &Config) -> Result<Self> {
        let mut client = Self::new(config.credentials()?, config.effective_domain())?
            .with_parse_options(config.parse_options());
        if let Some(timeout) = config.timeout() {
            client = client.with_timeout(timeout)?;
        }
        Ok(client)
    }

    /// Apply a per-request timeout to the underlying connection
    pub fn with_timeout(mut self, timeout: Duration) -> Result<Self> {
        self.http = HttpClient::new(Some(timeout))?;
        Ok(self)
    }

    pub fn with_parse_options(mut self, parse_options: ParseOptions) -> Self {
        self.parse_options = parse_options;
        self
    }

    pub fn parse_options(&self) -> ParseOptions {
        self.parse_options
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Resolve a resource path against the base url and append the query,
    /// always including `format=json`
    pub fn resolve(&self, path: &str, query: &[(&str, String)]) -> Result<Url> {
        let mut url = if path.starts_with("http://") || path.starts_with("https://") {
            Url::parse(path)?
        } else {
            self.base_url.join(path)?
        };

        {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in query {
                pairs.append_pair(key, value);
            }
            pairs.append_pair("format", "json");
        }

        Ok(url)
    }

    async fn dispatch(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, String)],
        body: Option<&Value>,
    ) -> Result<ApiResponse> {
        let url = self.resolve(path, query)?;
        let params: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        let authorization = self.signer.authorization(&method, &url, &params)?;
        self.http.send(method, url, &authorization, body).await
    }

    /// GET a resource or listing; any non-success status is `DoesNotExist`
    pub async fn get_resources(&self, path: &str, query: &[(&str, String)]) -> Result<Value> {
        let response = self.dispatch(Method::GET, path, query, None).await?;

        if !response.status.is_success() {
            tracing::error!(
                "API error: {} - {}",
                response.status,
                sanitize_for_log(&response.body)
            );
            return Err(Error::DoesNotExist {
                path: path.to_string(),
                status: response.status.as_u16(),
            });
        }

        response.json()
    }

    /// POST a new resource to a collection
    pub async fn create_resource(&self, path: &str, data: &Value) -> Result<Value> {
        let response = self.dispatch(Method::POST, path, &[], Some(data)).await?;
        Self::accepted(path, response)
    }

    /// PUT an existing resource
    pub async fn update_resource(&self, path: &str, data: &Value) -> Result<Value> {
        let response = self.dispatch(Method::PUT, path, &[], Some(data)).await?;
        Self::accepted(path, response)
    }

    /// DELETE a resource; `true` iff the service answered 204
    pub async fn delete_resource(&self, path: &str) -> Result<bool> {
        let response = self.dispatch(Method::DELETE, path, &[], None).await?;

        if response.status != StatusCode::NO_CONTENT {
            tracing::warn!(
                "delete of {} answered {} - {}",
                path,
                response.status,
                sanitize_for_log(&response.body)
            );
            return Ok(false);
        }

        Ok(true)
    }

    fn accepted(path: &str, response: ApiResponse) -> Result<Value> {
        if !response.status.is_success() {
            tracing::error!(
                "API error: {} - {}",
                response.status,
                sanitize_for_log(&response.body)
            );
            return Err(ValidationError::Rejected {
                path: path.to_string(),
                status: response.status.as_u16(),
                body: sanitize_for_log(&response.body),
            }
            .into());
        }

        response.json()
    }
}

impl fmt::Debug for Client {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Client")
            .field("base_url", &self.base_url.as_str())
            .field("parse_options", &self.parse_options)
            .finish_non_exhaustive()
    }
}
