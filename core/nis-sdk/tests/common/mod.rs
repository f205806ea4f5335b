//! Shared test helpers for SDK tests.

#![allow(dead_code)]

use nis_sdk::{
    BundleInfo, Configuration, CustomEnvironment, DeviceStorage, Environment, NotificationClient,
};
use nis_types::DeviceInfo;
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const BUNDLE_ID: &str = "com.example.app";

pub fn bundle() -> BundleInfo {
    BundleInfo::new(BUNDLE_ID, "Example", "1.2.0")
}

pub fn device() -> DeviceInfo {
    DeviceInfo {
        device_model: "aarch64".into(),
        os_version: "14.0".into(),
        platform: "macos".into(),
        timezone: "UTC".into(),
        language: "en".into(),
    }
}

/// Production settings pointed at `server`, with millisecond backoff.
pub fn config(server: &MockServer) -> Configuration {
    Configuration {
        retry_base_delay_ms: 1,
        request_timeout_secs: 5,
        ..Configuration::production()
    }
    .with_environment(Environment::Custom(
        CustomEnvironment::new(server.uri()).without_ssl_pinning(),
    ))
}

pub async fn client_with(config: Configuration, storage: DeviceStorage) -> NotificationClient {
    let client =
        NotificationClient::with_device_info(config, bundle(), device(), storage).unwrap();
    client.configure("test-key").await.unwrap();
    client
}

pub async fn client(server: &MockServer) -> NotificationClient {
    client_with(config(server), DeviceStorage::in_memory(BUNDLE_ID)).await
}

pub fn registration(device_id: &str, token: &str, topics: &[&str]) -> serde_json::Value {
    json!({
        "device_id": device_id,
        "device_token": token,
        "default_topics": topics,
        "created_at": "2024-05-01T12:00:00Z"
    })
}

pub async fn mount_registration(server: &MockServer, device_id: &str, topics: &[&str]) {
    Mock::given(method("POST"))
        .and(path("/v1/devices"))
        .respond_with(ResponseTemplate::new(201).set_body_json(registration(
            device_id, "ignored", topics,
        )))
        .mount(server)
        .await;
}

/// Accepts subscribe and unsubscribe calls for any topic of `device_id`.
pub async fn mount_topic_routes(server: &MockServer, device_id: &str) {
    let prefix = format!("^/v1/devices/{device_id}/topics/[^/]+$");
    Mock::given(method("POST"))
        .and(wiremock::matchers::path_regex(prefix.clone()))
        .respond_with(ResponseTemplate::new(200))
        .mount(server)
        .await;
    Mock::given(method("DELETE"))
        .and(wiremock::matchers::path_regex(prefix))
        .respond_with(ResponseTemplate::new(200))
        .mount(server)
        .await;
}

/// Requests received so far with the given method and path.
pub async fn count(server: &MockServer, http_method: &str, request_path: &str) -> usize {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .iter()
        .filter(|r| r.method.as_str() == http_method && r.url.path() == request_path)
        .count()
}
