//! Banner Model

use serde::{Deserialize, Serialize};

use crate::util::de_opt_i64;

/// Banner purpose
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BannerKind {
    #[default]
    Discount,
    New,
}

impl BannerKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            BannerKind::Discount => "discount",
            BannerKind::New => "new",
        }
    }
}

impl std::fmt::Display for BannerKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for BannerKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "discount" => Ok(BannerKind::Discount),
            "new" => Ok(BannerKind::New),
            other => Err(format!("unknown banner type: {other}")),
        }
    }
}

/// Banner entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Banner {
    pub id: i64,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub link: Option<String>,
    /// Product the banner points at
    #[serde(default, deserialize_with = "de_opt_i64")]
    pub product_id: Option<i64>,
    #[serde(rename = "type", default)]
    pub kind: BannerKind,
    /// Server-hosted image URL
    pub image_path: String,
}

impl Banner {
    pub fn resolve_assets(&mut self, resolve: &dyn Fn(&str) -> String) {
        self.image_path = resolve(&self.image_path);
    }
}
