//! Host application and device descriptors.
//!
//! Both are sent to the backend when the device registers. Hosts that know
//! better (a mobile shell, a test harness) construct them directly; everyone
//! else uses [`DeviceInfo::collect`].

use serde::{Deserialize, Serialize};
use std::env;

/// Identity of the host application embedding the SDK.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BundleInfo {
    /// Reverse-DNS bundle identifier. Also the storage namespace.
    pub bundle_id: String,
    /// Display name of the application.
    pub app_name: String,
    /// Marketing version of the application.
    pub app_version: String,
}

impl BundleInfo {
    /// Creates bundle info from its parts.
    #[must_use]
    pub fn new(
        bundle_id: impl Into<String>,
        app_name: impl Into<String>,
        app_version: impl Into<String>,
    ) -> Self {
        Self {
            bundle_id: bundle_id.into(),
            app_name: app_name.into(),
            app_version: app_version.into(),
        }
    }

    /// Returns true if the bundle id looks like `a.b[.c...]`.
    #[must_use]
    pub fn has_valid_bundle_id(&self) -> bool {
        let id = &self.bundle_id;
        id.contains('.')
            && !id.starts_with('.')
            && !id.ends_with('.')
            && id
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-'))
    }
}

/// Information about the device the SDK runs on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceInfo {
    /// Hardware model or architecture.
    pub device_model: String,
    /// Operating system version.
    pub os_version: String,
    /// Platform tag sent as `platform` on registration.
    pub platform: String,
    /// IANA timezone identifier, if known.
    pub timezone: String,
    /// Two-letter language code.
    pub language: String,
}

impl DeviceInfo {
    /// Collects information about the current device.
    #[must_use]
    pub fn collect() -> Self {
        Self {
            device_model: env::consts::ARCH.to_string(),
            os_version: get_os_version(),
            platform: env::consts::OS.to_string(),
            timezone: env::var("TZ").unwrap_or_else(|_| "UTC".to_string()),
            language: get_language(),
        }
    }
}

/// Extracts the language code from `LANG` (`en_US.UTF-8` -> `en`).
fn get_language() -> String {
    env::var("LANG")
        .ok()
        .and_then(|lang| {
            lang.split(['_', '.', '-'])
                .next()
                .filter(|code| code.len() == 2)
                .map(str::to_lowercase)
        })
        .unwrap_or_else(|| "en".to_string())
}

fn get_os_version() -> String {
    #[cfg(target_os = "macos")]
    {
        std::process::Command::new("sw_vers")
            .arg("-productVersion")
            .output()
            .ok()
            .and_then(|o| String::from_utf8(o.stdout).ok())
            .map(|s| s.trim().to_string())
            .unwrap_or_else(|| "unknown".to_string())
    }

    #[cfg(target_os = "linux")]
    {
        std::fs::read_to_string("/etc/os-release")
            .ok()
            .and_then(|content| {
                content
                    .lines()
                    .find(|l| l.starts_with("VERSION_ID="))
                    .map(|l| {
                        l.trim_start_matches("VERSION_ID=")
                            .trim_matches('"')
                            .to_string()
                    })
            })
            .unwrap_or_else(|| "unknown".to_string())
    }

    #[cfg(not(any(target_os = "macos", target_os = "linux")))]
    {
        "unknown".to_string()
    }
}
