//! User Model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Account status; `toggle-block` flips between the two
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserStatus {
    #[default]
    Active,
    Blocked,
}

impl UserStatus {
    pub fn toggled(self) -> Self {
        match self {
            UserStatus::Active => UserStatus::Blocked,
            UserStatus::Blocked => UserStatus::Active,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            UserStatus::Active => "active",
            UserStatus::Blocked => "blocked",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Gender {
    Male,
    Female,
}

/// User row as listed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: i64,
    #[serde(default)]
    pub full_name: Option<String>,
    pub email: String,
    #[serde(default)]
    pub phone_number: Option<String>,
    pub role: String,
    #[serde(default)]
    pub gender: Option<Gender>,
    #[serde(default)]
    pub status: UserStatus,
    #[serde(default)]
    pub profile_image: Option<String>,
}

/// User detail (`user/{id}`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserDetail {
    #[serde(flatten)]
    pub user: User,
    #[serde(default)]
    pub is_email_verified: bool,
    #[serde(default)]
    pub last_login_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
    /// Saved addresses, rendered verbatim
    #[serde(default)]
    pub addresses: Vec<serde_json::Value>,
}

impl From<UserDetail> for User {
    fn from(detail: UserDetail) -> Self {
        detail.user
    }
}
