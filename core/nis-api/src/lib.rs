//! Resilient HTTP client for the NIS notification backend.
//!
//! # Architecture
//!
//! - [`ApiClient`] carries the six device operations over HTTPS + JSON
//! - [`RetryPolicy`] retries transient failures with exponential backoff
//! - [`Environment`] selects the backend; [`Endpoint`] maps operations to routes
//! - [`ApiError`] classifies every failure and decides what is retryable

mod client;
mod endpoint;
mod environment;
mod error;
mod requests;
mod responses;
mod retry;

pub use client::{ApiClient, ApiClientConfig, DEFAULT_REQUEST_TIMEOUT};
pub use endpoint::Endpoint;
pub use environment::{CustomEnvironment, Environment, DEFAULT_API_VERSION};
pub use error::{ApiError, ApiResult};
pub use requests::{AssociateUserRequest, RegisterDeviceRequest, UpdateTokenRequest};
pub use responses::{Ack, ErrorResponse};
pub use retry::{RetryPolicy, DEFAULT_BASE_DELAY, DEFAULT_MAX_ATTEMPTS, DEFAULT_MAX_DELAY};

/// SDK version reported in the `User-Agent` header.
pub const SDK_VERSION: &str = env!("CARGO_PKG_VERSION");
