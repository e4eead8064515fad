//! Reward Model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::util::{de_f64, de_opt_f64, de_opt_i64};

/// What a reward grants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RewardKind {
    #[default]
    DiscountCoupon,
    FreeItem,
    Cashback,
}

impl std::str::FromStr for RewardKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "discount_coupon" => Ok(RewardKind::DiscountCoupon),
            "free_item" => Ok(RewardKind::FreeItem),
            "cashback" => Ok(RewardKind::Cashback),
            other => Err(format!("unknown reward type: {other}")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RewardDiscountType {
    #[default]
    Percentage,
    Fixed,
}

impl std::str::FromStr for RewardDiscountType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "percentage" => Ok(RewardDiscountType::Percentage),
            "fixed" => Ok(RewardDiscountType::Fixed),
            other => Err(format!("unknown discount type: {other}")),
        }
    }
}

/// Reward entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reward {
    pub id: i64,
    #[serde(rename = "type")]
    pub kind: RewardKind,
    pub discount_type: RewardDiscountType,
    #[serde(deserialize_with = "de_f64")]
    pub discount_value: f64,
    #[serde(default, deserialize_with = "de_opt_i64")]
    pub product_id: Option<i64>,
    #[serde(default)]
    pub display_text: Option<String>,
    #[serde(default)]
    pub coupon_code: Option<String>,
    /// Draw weight in `0.0..=1.0`
    #[serde(default, deserialize_with = "de_opt_f64")]
    pub probability: Option<f64>,
    #[serde(default)]
    pub is_active: bool,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub expires_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "de_opt_f64")]
    pub min_order_amount: Option<f64>,
}

/// `rewards` list payload: the wheel switch plus its rewards
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RewardBoard {
    #[serde(default)]
    pub is_active: bool,
    #[serde(default)]
    pub rewards: Vec<Reward>,
}

/// Create/update reward payload (JSON)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RewardPayload {
    #[serde(rename = "type")]
    pub kind: RewardKind,
    pub discount_type: RewardDiscountType,
    pub discount_value: f64,
    pub product_id: i64,
    pub display_text: String,
    pub coupon_code: String,
    pub probability: f64,
    pub is_active: bool,
    pub description: String,
    pub expires_at: Option<DateTime<Utc>>,
    pub min_order_amount: f64,
}
