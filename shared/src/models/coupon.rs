//! Coupon Model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::util::{de_f64, de_i64, de_opt_f64, de_opt_i64};
use crate::Localized;

/// How a coupon discount is computed (server side)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiscountType {
    #[default]
    Percentage,
    FixedAmount,
    CategorySpecific,
    ProductSpecific,
    FreeShipping,
}

impl DiscountType {
    pub fn as_str(&self) -> &'static str {
        match self {
            DiscountType::Percentage => "percentage",
            DiscountType::FixedAmount => "fixed_amount",
            DiscountType::CategorySpecific => "category_specific",
            DiscountType::ProductSpecific => "product_specific",
            DiscountType::FreeShipping => "free_shipping",
        }
    }

    /// Free shipping coupons carry no discount value
    pub fn has_value(&self) -> bool {
        !matches!(self, DiscountType::FreeShipping)
    }

    /// Category/product specific coupons target explicit ids
    pub fn is_targeted(&self) -> bool {
        matches!(
            self,
            DiscountType::CategorySpecific | DiscountType::ProductSpecific
        )
    }
}

impl std::fmt::Display for DiscountType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for DiscountType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "percentage" => Ok(DiscountType::Percentage),
            "fixed_amount" => Ok(DiscountType::FixedAmount),
            "category_specific" => Ok(DiscountType::CategorySpecific),
            "product_specific" => Ok(DiscountType::ProductSpecific),
            "free_shipping" => Ok(DiscountType::FreeShipping),
            other => Err(format!("unknown discount type: {other}")),
        }
    }
}

/// Coupon lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CouponStatus {
    #[default]
    Active,
    Inactive,
    Expired,
}

impl CouponStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            CouponStatus::Active => "active",
            CouponStatus::Inactive => "inactive",
            CouponStatus::Expired => "expired",
        }
    }
}

impl std::str::FromStr for CouponStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(CouponStatus::Active),
            "inactive" => Ok(CouponStatus::Inactive),
            "expired" => Ok(CouponStatus::Expired),
            other => Err(format!("unknown coupon status: {other}")),
        }
    }
}

fn default_true() -> bool {
    true
}

/// Coupon entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Coupon {
    pub id: i64,
    pub code: String,
    #[serde(default)]
    pub name: Option<Localized>,
    #[serde(default)]
    pub description: Option<Localized>,
    pub discount_type: DiscountType,
    #[serde(deserialize_with = "de_f64")]
    pub discount_value: f64,
    #[serde(default, deserialize_with = "de_opt_f64")]
    pub max_discount_amount: Option<f64>,
    #[serde(default, deserialize_with = "de_opt_f64")]
    pub min_order_amount: Option<f64>,
    #[serde(default)]
    pub status: CouponStatus,
    #[serde(default)]
    pub valid_from: Option<DateTime<Utc>>,
    #[serde(default)]
    pub valid_to: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "de_opt_i64")]
    pub usage_limit: Option<i64>,
    #[serde(default, deserialize_with = "de_opt_i64")]
    pub usage_limit_per_user: Option<i64>,
    #[serde(default)]
    pub applicable_categories: Vec<i64>,
    #[serde(default)]
    pub applicable_products: Vec<i64>,
    #[serde(default)]
    pub excluded_categories: Vec<i64>,
    #[serde(default)]
    pub excluded_products: Vec<i64>,
    #[serde(default)]
    pub applicable_user_groups: Vec<String>,
    #[serde(default = "default_true")]
    pub is_stackable: bool,
}

/// Create/update coupon payload (JSON)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CouponPayload {
    pub code: String,
    pub name: Localized,
    pub description: Localized,
    pub discount_type: DiscountType,
    pub discount_value: f64,
    pub max_discount_amount: f64,
    pub min_order_amount: f64,
    pub status: CouponStatus,
    pub valid_from: DateTime<Utc>,
    pub valid_to: DateTime<Utc>,
    pub usage_limit: i64,
    pub usage_limit_per_user: i64,
    pub applicable_categories: Vec<i64>,
    pub applicable_products: Vec<i64>,
    pub excluded_categories: Vec<i64>,
    pub excluded_products: Vec<i64>,
    pub applicable_user_groups: Vec<String>,
    pub is_stackable: bool,
}

/// `coupons/{id}/analytics` data
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CouponAnalytics {
    pub analytics: CouponUsage,
}

/// Usage figures for one coupon
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CouponUsage {
    #[serde(deserialize_with = "de_i64")]
    pub total_uses: i64,
    #[serde(deserialize_with = "de_f64")]
    pub total_discount: f64,
    #[serde(deserialize_with = "de_f64")]
    pub avg_order_total: f64,
    #[serde(deserialize_with = "de_i64")]
    pub unique_users: i64,
}
