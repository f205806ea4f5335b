//! The notification backend client.

use crate::endpoint::Endpoint;
use crate::environment::Environment;
use crate::error::{ApiError, ApiResult};
use crate::requests::{AssociateUserRequest, RegisterDeviceRequest, UpdateTokenRequest};
use crate::responses::{Ack, ErrorResponse};
use crate::retry::RetryPolicy;
use crate::SDK_VERSION;
use nis_types::{BundleInfo, DeviceInfo, DeviceRegistration, TopicSubscription};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, ACCEPT, CONTENT_TYPE, USER_AGENT};
use reqwest::{StatusCode, Url};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

/// Default per-request timeout.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Settings fixed for the lifetime of an [`ApiClient`].
#[derive(Debug, Clone)]
pub struct ApiClientConfig {
    pub environment: Environment,
    pub request_timeout: Duration,
    pub retry: RetryPolicy,
    pub bundle: BundleInfo,
    pub device: DeviceInfo,
}

impl ApiClientConfig {
    /// Default timeout and retry policy, device info collected from the host.
    pub fn new(environment: Environment, bundle: BundleInfo) -> Self {
        Self {
            environment,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            retry: RetryPolicy::default(),
            bundle,
            device: DeviceInfo::collect(),
        }
    }
}

/// HTTP client for the six device operations.
///
/// Every operation is sent through the configured [`RetryPolicy`]. The
/// client holds no device state of its own.
pub struct ApiClient {
    http: reqwest::Client,
    config: ApiClientConfig,
    user_agent: String,
    api_key: RwLock<Option<String>>,
}

impl ApiClient {
    pub fn new(config: ApiClientConfig) -> ApiResult<Self> {
        let base_url = config.environment.base_url();
        Url::parse(base_url).map_err(|e| ApiError::InvalidUrl(format!("{base_url}: {e}")))?;

        let user_agent = format!(
            "NIS/{} ({}; {})",
            SDK_VERSION, config.bundle.bundle_id, config.bundle.app_version
        );
        let headers = default_headers(&config.environment, &user_agent)?;

        let http = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .https_only(config.environment.uses_ssl_pinning())
            .default_headers(headers)
            .build()
            .map_err(|e| ApiError::NetworkError(format!("failed to create HTTP client: {e}")))?;

        debug!(
            environment = %config.environment,
            timeout_ms = config.request_timeout.as_millis() as u64,
            max_attempts = config.retry.max_attempts,
            "API client created"
        );

        Ok(Self {
            http,
            config,
            user_agent,
            api_key: RwLock::new(None),
        })
    }

    /// Sets the API key. Operations fail with [`ApiError::NotConfigured`]
    /// until this has been called.
    pub async fn configure(&self, api_key: impl Into<String>) {
        *self.api_key.write().await = Some(api_key.into());
        info!(environment = %self.config.environment, "API client configured");
    }

    pub async fn is_configured(&self) -> bool {
        self.api_key.read().await.is_some()
    }

    pub fn environment(&self) -> &Environment {
        &self.config.environment
    }

    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }

    pub fn retry_policy(&self) -> &RetryPolicy {
        &self.config.retry
    }

    // ── Operations ───────────────────────────────────────────────

    /// `POST /devices`
    pub async fn register_device(&self, token: &str) -> ApiResult<DeviceRegistration> {
        let body = RegisterDeviceRequest::new(token, &self.config.bundle, &self.config.device);
        self.send(Endpoint::RegisterDevice, Some(encode(&body)?))
            .await
    }

    /// `PUT /devices/{id}/token`
    pub async fn update_token(&self, device_id: &str, token: &str) -> ApiResult<Ack> {
        let endpoint = Endpoint::UpdateToken {
            device_id: device_id.to_string(),
        };
        self.send_ack(endpoint, Some(encode(&UpdateTokenRequest::new(token))?))
            .await
    }

    /// `POST /devices/{id}/user`
    pub async fn associate_user(&self, device_id: &str, user_id: &str) -> ApiResult<Ack> {
        let endpoint = Endpoint::AssociateUser {
            device_id: device_id.to_string(),
        };
        self.send_ack(endpoint, Some(encode(&AssociateUserRequest::new(user_id))?))
            .await
    }

    /// `DELETE /devices/{id}/user`
    pub async fn remove_user_association(&self, device_id: &str) -> ApiResult<Ack> {
        let endpoint = Endpoint::RemoveUserAssociation {
            device_id: device_id.to_string(),
        };
        self.send_ack(endpoint, None).await
    }

    /// `POST /devices/{id}/topics/{topic}`
    ///
    /// Returns `None` when the backend acknowledges with an empty body.
    pub async fn subscribe_topic(
        &self,
        device_id: &str,
        topic: &str,
    ) -> ApiResult<Option<TopicSubscription>> {
        let endpoint = Endpoint::SubscribeTopic {
            device_id: device_id.to_string(),
            topic: topic.to_string(),
        };
        self.send(endpoint, None).await
    }

    /// `DELETE /devices/{id}/topics/{topic}`
    pub async fn unsubscribe_topic(&self, device_id: &str, topic: &str) -> ApiResult<Ack> {
        let endpoint = Endpoint::UnsubscribeTopic {
            device_id: device_id.to_string(),
            topic: topic.to_string(),
        };
        self.send_ack(endpoint, None).await
    }

    // ── Transport ────────────────────────────────────────────────

    async fn send_ack(&self, endpoint: Endpoint, body: Option<Vec<u8>>) -> ApiResult<Ack> {
        let ack: Option<Ack> = self.send(endpoint, body).await?;
        Ok(ack.unwrap_or_default())
    }

    async fn send<R: DeserializeOwned>(
        &self,
        endpoint: Endpoint,
        body: Option<Vec<u8>>,
    ) -> ApiResult<R> {
        let api_key = self
            .api_key
            .read()
            .await
            .clone()
            .ok_or(ApiError::NotConfigured)?;
        let url = endpoint.url(
            self.config.environment.base_url(),
            self.config.environment.api_version(),
        )?;

        debug!(op = endpoint.name(), method = %endpoint.method(), %url, "sending request");
        let result = self
            .config
            .retry
            .execute(|| self.attempt(&endpoint, url.clone(), &api_key, body.clone()))
            .await;

        match &result {
            Ok(_) => debug!(op = endpoint.name(), "request succeeded"),
            Err(e) => warn!(op = endpoint.name(), error = %e, "request failed"),
        }
        result
    }

    async fn attempt<R: DeserializeOwned>(
        &self,
        endpoint: &Endpoint,
        url: Url,
        api_key: &str,
        body: Option<Vec<u8>>,
    ) -> ApiResult<R> {
        let mut request = self
            .http
            .request(endpoint.method(), url)
            .bearer_auth(api_key);
        if let Some(body) = body {
            request = request.body(body);
        }

        let response = request.send().await?;
        let status = response.status();
        let bytes = response.bytes().await?;

        if status.is_success() {
            decode(&bytes)
        } else {
            Err(status_error(status, &bytes))
        }
    }
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("environment", &self.config.environment)
            .field("user_agent", &self.user_agent)
            .finish_non_exhaustive()
    }
}

fn default_headers(environment: &Environment, user_agent: &str) -> ApiResult<HeaderMap> {
    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
    headers.insert(
        USER_AGENT,
        HeaderValue::from_str(user_agent)
            .map_err(|e| ApiError::EncodingError(format!("invalid user agent: {e}")))?,
    );
    for (name, value) in environment.additional_headers() {
        let name = HeaderName::from_bytes(name.as_bytes())
            .map_err(|e| ApiError::EncodingError(format!("invalid header name {name:?}: {e}")))?;
        let value = HeaderValue::from_str(value)
            .map_err(|e| ApiError::EncodingError(format!("invalid value for {name}: {e}")))?;
        headers.insert(name, value);
    }
    Ok(headers)
}

fn encode<B: Serialize>(body: &B) -> ApiResult<Vec<u8>> {
    serde_json::to_vec(body).map_err(|e| ApiError::EncodingError(e.to_string()))
}

/// Empty bodies decode as JSON `null`, which only optional targets accept.
fn decode<R: DeserializeOwned>(bytes: &[u8]) -> ApiResult<R> {
    let bytes = if bytes.iter().all(u8::is_ascii_whitespace) {
        b"null".as_slice()
    } else {
        bytes
    };
    serde_json::from_slice(bytes).map_err(|e| ApiError::DecodingError(e.to_string()))
}

fn status_error(status: StatusCode, bytes: &[u8]) -> ApiError {
    let envelope = serde_json::from_slice::<ErrorResponse>(bytes).ok();
    if let Some(envelope) = &envelope {
        debug!(
            status = status.as_u16(),
            code = %envelope.error_code,
            message = %envelope.error_message,
            "backend error envelope"
        );
    }

    match status {
        StatusCode::UNAUTHORIZED => ApiError::Unauthorized,
        StatusCode::TOO_MANY_REQUESTS => ApiError::RateLimitExceeded,
        s if s.is_server_error() => match envelope {
            Some(envelope) => ApiError::ServerError(envelope.error_message),
            None => ApiError::HttpError(s.as_u16()),
        },
        s => ApiError::HttpError(s.as_u16()),
    }
}
