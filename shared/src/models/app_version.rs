//! App version settings

use serde::{Deserialize, Serialize};

/// `app-version/check` body (no envelope)
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppVersion {
    #[serde(default)]
    pub android_version: Option<String>,
    #[serde(default)]
    pub android_end_date: Option<String>,
    #[serde(default)]
    pub android_url: Option<String>,
    #[serde(default)]
    pub ios_version: Option<String>,
    #[serde(default)]
    pub ios_end_date: Option<String>,
    #[serde(default)]
    pub ios_url: Option<String>,
    /// Whether the storefront app accepts orders
    #[serde(default)]
    pub is_open: bool,
}

/// `app-version/update` body
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppVersionUpdate {
    pub android_version: String,
    pub android_end_date: String,
    pub android_url: String,
    pub ios_version: String,
    pub ios_end_date: String,
    pub ios_url: String,
}

impl From<&AppVersion> for AppVersionUpdate {
    fn from(v: &AppVersion) -> Self {
        Self {
            android_version: v.android_version.clone().unwrap_or_default(),
            android_end_date: v.android_end_date.clone().unwrap_or_default(),
            android_url: v.android_url.clone().unwrap_or_default(),
            ios_version: v.ios_version.clone().unwrap_or_default(),
            ios_end_date: v.ios_end_date.clone().unwrap_or_default(),
            ios_url: v.ios_url.clone().unwrap_or_default(),
        }
    }
}

/// `app-version/toggle-app-status` body
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppStatus {
    pub is_open: bool,
}
