//! Backend routes.

use crate::error::{ApiError, ApiResult};
use reqwest::{Method, Url};

/// One of the six device operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Endpoint {
    RegisterDevice,
    UpdateToken { device_id: String },
    AssociateUser { device_id: String },
    RemoveUserAssociation { device_id: String },
    SubscribeTopic { device_id: String, topic: String },
    UnsubscribeTopic { device_id: String, topic: String },
}

impl Endpoint {
    pub fn method(&self) -> Method {
        match self {
            Endpoint::RegisterDevice | Endpoint::AssociateUser { .. } => Method::POST,
            Endpoint::UpdateToken { .. } => Method::PUT,
            Endpoint::SubscribeTopic { .. } => Method::POST,
            Endpoint::RemoveUserAssociation { .. } | Endpoint::UnsubscribeTopic { .. } => {
                Method::DELETE
            }
        }
    }

    /// Path segments below `{base}/{api_version}`.
    pub fn segments(&self) -> Vec<&str> {
        match self {
            Endpoint::RegisterDevice => vec!["devices"],
            Endpoint::UpdateToken { device_id } => vec!["devices", device_id.as_str(), "token"],
            Endpoint::AssociateUser { device_id }
            | Endpoint::RemoveUserAssociation { device_id } => vec!["devices", device_id.as_str(), "user"],
            Endpoint::SubscribeTopic { device_id, topic }
            | Endpoint::UnsubscribeTopic { device_id, topic } => {
                vec!["devices", device_id.as_str(), "topics", topic.as_str()]
            }
        }
    }

    /// Short name for logs.
    pub fn name(&self) -> &'static str {
        match self {
            Endpoint::RegisterDevice => "register_device",
            Endpoint::UpdateToken { .. } => "update_token",
            Endpoint::AssociateUser { .. } => "associate_user",
            Endpoint::RemoveUserAssociation { .. } => "remove_user_association",
            Endpoint::SubscribeTopic { .. } => "subscribe_topic",
            Endpoint::UnsubscribeTopic { .. } => "unsubscribe_topic",
        }
    }

    /// Builds `{base_url}/{api_version}/{segments...}`.
    ///
    /// Segments are percent-encoded, so ids and topics can never change the
    /// shape of the path. A segment of `.` or `..` has no encoding that
    /// survives URL normalization and is refused.
    pub fn url(&self, base_url: &str, api_version: &str) -> ApiResult<Url> {
        let segments = self.segments();
        if let Some(dots) = segments.iter().find(|s| is_dot_segment(s)) {
            return Err(ApiError::InvalidUrl(format!(
                "'{dots}' cannot be used as a path segment"
            )));
        }
        let mut url =
            Url::parse(base_url).map_err(|e| ApiError::InvalidUrl(format!("{base_url}: {e}")))?;
        {
            let mut path = url
                .path_segments_mut()
                .map_err(|_| ApiError::InvalidUrl(format!("{base_url}: cannot be a base")))?;
            path.pop_if_empty();
            if !api_version.is_empty() {
                path.push(api_version);
            }
            path.extend(segments);
        }
        Ok(url)
    }
}

fn is_dot_segment(segment: &str) -> bool {
    matches!(segment, "." | "..")
}
