use nis_types::{DeviceIdentity, DeviceRegistration, DeviceStatus, TopicSubscription};
use pretty_assertions::assert_eq;

// ── DeviceRegistration ───────────────────────────────────────────

#[test]
fn registration_decodes_minimal_response() {
    let json = r#"{
        "device_id": "D1",
        "device_token": "T1",
        "default_topics": ["all", "ios"],
        "created_at": "2024-05-01T12:00:00Z"
    }"#;
    let reg: DeviceRegistration = serde_json::from_str(json).unwrap();
    assert_eq!(reg.device_id, "D1");
    assert_eq!(reg.token, "T1");
    assert_eq!(reg.default_topics, vec!["all".to_string(), "ios".to_string()]);
    assert_eq!(reg.status, DeviceStatus::Active);
    assert!(reg.updated_at.is_none());
    assert!(reg.has_default_topics());
}

#[test]
fn registration_without_default_topics() {
    let json = r#"{"device_id":"D1","device_token":"T1","created_at":"2024-05-01T12:00:00Z"}"#;
    let reg: DeviceRegistration = serde_json::from_str(json).unwrap();
    assert!(reg.default_topics.is_empty());
    assert!(!reg.has_default_topics());
}

#[test]
fn registration_full_record() {
    let json = r#"{
        "device_id": "D2",
        "device_token": "T2",
        "default_topics": [],
        "created_at": "2024-05-01T12:00:00Z",
        "updated_at": "2024-05-02T08:30:00+02:00",
        "status": "blocked"
    }"#;
    let reg: DeviceRegistration = serde_json::from_str(json).unwrap();
    assert_eq!(reg.status, DeviceStatus::Blocked);
    assert_eq!(
        reg.updated_at.unwrap().to_rfc3339(),
        "2024-05-02T06:30:00+00:00"
    );
}

#[test]
fn registration_rejects_missing_device_id() {
    let json = r#"{"device_token":"T1","created_at":"2024-05-01T12:00:00Z"}"#;
    assert!(serde_json::from_str::<DeviceRegistration>(json).is_err());
}

#[test]
fn registration_rejects_non_iso_timestamp() {
    let json = r#"{"device_id":"D1","device_token":"T1","created_at":"yesterday"}"#;
    assert!(serde_json::from_str::<DeviceRegistration>(json).is_err());
}

#[test]
fn device_status_display() {
    assert_eq!(DeviceStatus::Active.to_string(), "active");
    assert_eq!(DeviceStatus::Inactive.to_string(), "inactive");
    assert_eq!(DeviceStatus::Blocked.to_string(), "blocked");
}

// ── TopicSubscription ────────────────────────────────────────────

#[test]
fn topic_subscription_decodes() {
    let json = r#"{"topic":"news","status":"subscribed","subscribed_at":"2024-05-01T12:00:00Z"}"#;
    let sub: TopicSubscription = serde_json::from_str(json).unwrap();
    assert_eq!(sub.topic, "news");
    assert_eq!(sub.status, "subscribed");
}

// ── DeviceIdentity ───────────────────────────────────────────────

#[test]
fn identity_with_token_keeps_device_id() {
    let id = DeviceIdentity::new("D1", "T1");
    let next = id.with_token("T2");
    assert_eq!(next.device_id, "D1");
    assert_eq!(next.token, "T2");
    assert!(next.has_token("T2"));
    assert!(!id.has_token("T2"));
}

#[test]
fn identity_serde_field_names() {
    let id = DeviceIdentity::new("D1", "T1");
    let json = serde_json::to_string(&id).unwrap();
    assert_eq!(json, r#"{"device_id":"D1","token":"T1"}"#);
}
