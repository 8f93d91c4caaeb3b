use reqwest::{Client, Method};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, error, warn};
use url::Url;
use uuid::Uuid;

use super::http::{send_with_retry, RetryPolicy};
use super::types::{error_from_response, RequestTarget};
use crate::config::{Endpoints, SdkOptions};
use crate::credentials::Credentials;
use crate::error::{ErrorKind, PlatformError, Result};

/// SDK version (from Cargo.toml)
const DEFAULT_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Which platform service a request goes to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Service {
    Projects,
    Model,
}

/// Delivery guarantee for a request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Delivery {
    /// Safe to resend on transient failures
    Retry,
    /// Sent once; transport failures are connection errors
    Once,
    /// Sent once; a failure after the request left the client is ambiguous
    Commit,
}

/// Build the User-Agent string
fn build_user_agent() -> String {
    std::env::var("MENDIX_SDK_USER_AGENT")
        .unwrap_or_else(|_| format!("mendix-platform-sdk/{}", DEFAULT_VERSION))
}

/// HTTP client for the projects and model services
pub(crate) struct ApiClient {
    client: Client,
    user_agent: String,
    session_id: String,
    credentials: Credentials,
    endpoints: Endpoints,
    retry: RetryPolicy,
}

impl ApiClient {
    pub fn new(
        credentials: Credentials,
        endpoints: Endpoints,
        options: &SdkOptions,
    ) -> Result<Self> {
        if options.accept_invalid_certs {
            warn!("TLS certificate validation is disabled for this client");
        }

        let client = Client::builder()
            .timeout(options.request_timeout)
            .danger_accept_invalid_certs(options.accept_invalid_certs)
            .build()
            .map_err(|e| {
                PlatformError::connection(format!("failed to build HTTP client: {}", e))
            })?;

        Ok(Self {
            client,
            user_agent: build_user_agent(),
            session_id: Uuid::new_v4().to_string(),
            credentials,
            endpoints,
            retry: RetryPolicy::new(options.max_retries),
        })
    }

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    pub fn endpoints(&self) -> &Endpoints {
        &self.endpoints
    }

    /// Append path segments to a base URL, keeping any path prefix of the base.
    ///
    /// Segments are percent-encoded, so ids may contain spaces or slashes.
    fn build_url(base_url: &str, segments: &[&str]) -> Result<Url> {
        let mut url = Url::parse(base_url).map_err(|e| {
            PlatformError::new(
                ErrorKind::Endpoint,
                format!("Invalid base URL {}: {}", base_url, e),
            )
        })?;
        url.path_segments_mut()
            .map_err(|_| {
                PlatformError::new(
                    ErrorKind::Endpoint,
                    format!("Invalid base URL {}: cannot carry a path", base_url),
                )
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn url(&self, service: Service, segments: &[&str]) -> Result<Url> {
        let base = match service {
            Service::Projects => &self.endpoints.projects,
            Service::Model => &self.endpoints.model,
        };
        Self::build_url(base, segments)
    }

    fn request(&self, method: Method, url: &Url, request_id: &str) -> reqwest::RequestBuilder {
        let mut request = self
            .client
            .request(method, url.clone())
            .header("Accept", "application/json")
            .header("User-Agent", &self.user_agent)
            .header("x-request-id", request_id)
            .header("x-request-session-id", &self.session_id);

        for (name, value) in self.credentials.headers() {
            request = request.header(name, value);
        }
        request
    }

    fn map_send_error(err: reqwest::Error, delivery: Delivery, url: &Url) -> PlatformError {
        if err.is_builder() {
            return PlatformError::new(
                ErrorKind::Endpoint,
                format!("Invalid request URL {}: {}", url, err),
            );
        }
        if delivery == Delivery::Commit && !err.is_connect() {
            return PlatformError::commit_outcome_unknown(err);
        }
        PlatformError::connection(err)
    }

    async fn execute<B, R>(
        &self,
        method: Method,
        service: Service,
        path: &[&str],
        body: Option<&B>,
        delivery: Delivery,
        target: &RequestTarget<'_>,
    ) -> Result<R>
    where
        B: Serialize,
        R: DeserializeOwned,
    {
        let url = self.url(service, path)?;
        let request_id = Uuid::new_v4().to_string();

        debug!("=== API Request ===");
        debug!("{} {}", method, url);

        let make_request = || {
            let request = self.request(method.clone(), &url, &request_id);
            match body {
                Some(body) => request.json(body),
                None => request,
            }
        };

        let sent = match delivery {
            Delivery::Retry => send_with_retry(self.retry, make_request).await,
            Delivery::Once | Delivery::Commit => make_request().send().await,
        };
        let response = sent.map_err(|e| {
            error!("Request to {} failed: {}", url, e);
            Self::map_send_error(e, delivery, &url).with_request_id(&request_id)
        })?;

        let status = response.status();
        debug!("=== API Response ===");
        debug!("Status: {}", status);

        let text = match response.text().await {
            Ok(text) => text,
            Err(e) => {
                error!("Failed to read response body from {}: {}", url, e);
                let err = if delivery == Delivery::Commit && status.is_success() {
                    PlatformError::commit_outcome_unknown(e)
                } else {
                    PlatformError::connection(e)
                };
                return Err(err.with_request_id(&request_id));
            }
        };

        if !status.is_success() {
            let err = error_from_response(status, &text, target).with_request_id(&request_id);
            if err.kind.is_fatal() {
                error!("❌ {}", err.message);
            } else {
                debug!("API request failed: {}", err.message);
            }
            return Err(err);
        }

        serde_json::from_str(&text).map_err(|e| {
            PlatformError::protocol(format!("Failed to parse API response from {}: {}", url, e))
                .with_http_status(status.as_u16())
                .with_request_id(&request_id)
        })
    }

    pub async fn post_json<B, R>(
        &self,
        service: Service,
        path: &[&str],
        body: &B,
        delivery: Delivery,
        target: &RequestTarget<'_>,
    ) -> Result<R>
    where
        B: Serialize,
        R: DeserializeOwned,
    {
        self.execute(Method::POST, service, path, Some(body), delivery, target)
            .await
    }

    pub async fn get_json<R>(
        &self,
        service: Service,
        path: &[&str],
        target: &RequestTarget<'_>,
    ) -> Result<R>
    where
        R: DeserializeOwned,
    {
        self.execute::<(), R>(Method::GET, service, path, None, Delivery::Retry, target)
            .await
    }
}
