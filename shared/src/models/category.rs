//! Category Model

use serde::{Deserialize, Serialize};

use crate::Localized;

/// Main category entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: i64,
    pub name: Localized,
    /// Icon URL
    #[serde(default)]
    pub icon: Option<String>,
    #[serde(default)]
    pub sub_categories: Vec<SubCategory>,
}

/// Sub category entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubCategory {
    pub id: i64,
    pub name: Localized,
    #[serde(default)]
    pub icon: Option<String>,
}

impl Category {
    /// Rewrite icon paths, including those of embedded subcategories
    pub fn resolve_assets(&mut self, resolve: &dyn Fn(&str) -> String) {
        if let Some(icon) = &mut self.icon {
            *icon = resolve(icon);
        }
        for sub in &mut self.sub_categories {
            sub.resolve_assets(resolve);
        }
    }
}

impl SubCategory {
    pub fn resolve_assets(&mut self, resolve: &dyn Fn(&str) -> String) {
        if let Some(icon) = &mut self.icon {
            *icon = resolve(icon);
        }
    }
}
