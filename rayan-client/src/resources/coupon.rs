use chrono::{DateTime, Utc};
use http::Method;

use crate::error::{ClientError, ClientResult};
use crate::form::{Draft, FormMode, ValidationErrors};
use crate::payload::{Attachment, Payload};
use crate::query::ListQuery;
use crate::resource::{ActionRoute, ActionSpec, Resource, ResourceApi};
use shared::models::{Coupon, CouponAnalytics, CouponPayload, CouponStatus, DiscountType};
use shared::{Localized, SortOrder};

/// Coupons (`/coupons`, paginated, filtered by status)
pub struct Coupons;

/// `GET /coupons/{id}/analytics`
pub const ANALYTICS: ActionSpec = ActionSpec {
    name: "analytics",
    route: ActionRoute::Member,
    method: Method::GET,
};

impl Resource for Coupons {
    type Item = Coupon;
    type Detail = Coupon;
    type Draft = CouponDraft;

    const PATH: &'static str = "coupons";
    const LABEL: &'static str = "Coupon";

    fn default_query() -> ListQuery {
        ListQuery::new()
            .paginate(1, 10)
            .sort(SortOrder::Desc)
            .filter("status", CouponStatus::Active.as_str())
    }

    fn cached_detail(item: &Coupon) -> Option<Coupon> {
        Some(item.clone())
    }
}

/// Usage statistics of one coupon
pub async fn fetch_analytics<A>(api: &A, id: i64) -> ClientResult<CouponAnalytics>
where
    A: ResourceApi<Coupons> + ?Sized,
{
    let data = api.action(&ANALYTICS, Some(id), None).await?;
    serde_json::from_value(data).map_err(|e| ClientError::InvalidResponse(e.to_string()))
}

#[derive(Debug, Clone, PartialEq)]
pub struct CouponDraft {
    pub code: String,
    pub name: Localized,
    pub description: Localized,
    pub discount_type: DiscountType,
    pub discount_value: f64,
    pub max_discount_amount: f64,
    pub min_order_amount: f64,
    pub status: CouponStatus,
    /// Unset dates are sent as the submission time
    pub valid_from: Option<DateTime<Utc>>,
    pub valid_to: Option<DateTime<Utc>>,
    pub usage_limit: i64,
    pub usage_limit_per_user: i64,
    pub applicable_categories: Vec<i64>,
    pub applicable_products: Vec<i64>,
    pub excluded_categories: Vec<i64>,
    pub excluded_products: Vec<i64>,
    pub applicable_user_groups: Vec<String>,
    pub is_stackable: bool,
}

impl Default for CouponDraft {
    fn default() -> Self {
        Self {
            code: String::new(),
            name: Localized::default(),
            description: Localized::default(),
            discount_type: DiscountType::Percentage,
            discount_value: 0.0,
            max_discount_amount: 0.0,
            min_order_amount: 0.0,
            status: CouponStatus::Active,
            valid_from: None,
            valid_to: None,
            usage_limit: 0,
            usage_limit_per_user: 0,
            applicable_categories: Vec::new(),
            applicable_products: Vec::new(),
            excluded_categories: Vec::new(),
            excluded_products: Vec::new(),
            applicable_user_groups: Vec::new(),
            is_stackable: true,
        }
    }
}

impl Draft for CouponDraft {
    type Item = Coupon;

    const MAX_ATTACHMENTS: usize = 0;

    fn from_item(item: &Coupon) -> Self {
        Self {
            code: item.code.clone(),
            name: item.name.clone().unwrap_or_default(),
            description: item.description.clone().unwrap_or_default(),
            discount_type: item.discount_type,
            discount_value: item.discount_value,
            max_discount_amount: item.max_discount_amount.unwrap_or(0.0),
            min_order_amount: item.min_order_amount.unwrap_or(0.0),
            status: item.status,
            valid_from: item.valid_from,
            valid_to: item.valid_to,
            usage_limit: item.usage_limit.unwrap_or(0),
            usage_limit_per_user: item.usage_limit_per_user.unwrap_or(0),
            applicable_categories: item.applicable_categories.clone(),
            applicable_products: item.applicable_products.clone(),
            excluded_categories: item.excluded_categories.clone(),
            excluded_products: item.excluded_products.clone(),
            applicable_user_groups: item.applicable_user_groups.clone(),
            is_stackable: item.is_stackable,
        }
    }

    fn validate(&self, _mode: FormMode, _attachments: &[Attachment]) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        errors.require("code", &self.code);
        errors.check(self.discount_value >= 0.0, "discountValue", "must not be negative");
        if self.discount_type == DiscountType::Percentage {
            errors.check(self.discount_value <= 100.0, "discountValue", "must be at most 100");
        }
        if self.discount_type.has_value() {
            errors.check(self.discount_value > 0.0, "discountValue", "is required");
        }
        errors.check(self.max_discount_amount >= 0.0, "maxDiscountAmount", "must not be negative");
        errors.check(self.min_order_amount >= 0.0, "minOrderAmount", "must not be negative");
        errors.check(self.usage_limit >= 0, "usageLimit", "must not be negative");
        errors.check(self.usage_limit_per_user >= 0, "usageLimitPerUser", "must not be negative");
        if self.usage_limit > 0 {
            errors.check(
                self.usage_limit_per_user <= self.usage_limit,
                "usageLimitPerUser",
                "must not exceed the usage limit",
            );
        }
        match self.discount_type {
            DiscountType::CategorySpecific => errors.check(
                !self.applicable_categories.is_empty(),
                "applicableCategories",
                "select at least one category",
            ),
            DiscountType::ProductSpecific => errors.check(
                !self.applicable_products.is_empty(),
                "applicableProducts",
                "select at least one product",
            ),
            _ => {}
        }
        if let (Some(from), Some(to)) = (self.valid_from, self.valid_to) {
            errors.check(from <= to, "validTo", "must not be before the start date");
        }
        errors.into_result()
    }

    fn to_payload(&self, _mode: FormMode, _attachments: &[Attachment]) -> ClientResult<Payload> {
        let now = Utc::now();
        let code = self.code.trim().to_string();
        let name = if self.name.is_blank() {
            Localized::new(code.clone(), "")
        } else {
            self.name.clone()
        };
        let discount_value = if self.discount_type.has_value() {
            self.discount_value
        } else {
            0.0
        };
        let body = CouponPayload {
            code,
            name,
            description: self.description.clone(),
            discount_type: self.discount_type,
            discount_value,
            max_discount_amount: self.max_discount_amount,
            min_order_amount: self.min_order_amount,
            status: self.status,
            valid_from: self.valid_from.unwrap_or(now),
            valid_to: self.valid_to.unwrap_or(now),
            usage_limit: self.usage_limit,
            usage_limit_per_user: self.usage_limit_per_user,
            applicable_categories: self.applicable_categories.clone(),
            applicable_products: self.applicable_products.clone(),
            excluded_categories: self.excluded_categories.clone(),
            excluded_products: self.excluded_products.clone(),
            applicable_user_groups: self.applicable_user_groups.clone(),
            is_stackable: self.is_stackable,
        };
        Payload::json(&body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn draft() -> CouponDraft {
        CouponDraft {
            code: "SAVE10".into(),
            discount_value: 10.0,
            ..Default::default()
        }
    }

    #[test]
    fn test_percentage_capped() {
        let mut coupon = draft();
        assert!(coupon.validate(FormMode::Add, &[]).is_ok());

        coupon.discount_value = 150.0;
        let errors = coupon.validate(FormMode::Add, &[]).unwrap_err();
        assert_eq!(errors.get("discountValue"), Some("must be at most 100"));

        coupon.discount_type = DiscountType::FixedAmount;
        assert!(coupon.validate(FormMode::Add, &[]).is_ok());
    }

    #[test]
    fn test_date_order_and_targets() {
        let mut coupon = draft();
        coupon.valid_from = Some(Utc.with_ymd_and_hms(2026, 5, 2, 0, 0, 0).unwrap());
        coupon.valid_to = Some(Utc.with_ymd_and_hms(2026, 5, 1, 0, 0, 0).unwrap());
        assert!(coupon.validate(FormMode::Edit, &[]).unwrap_err().has("validTo"));

        let coupon = CouponDraft {
            discount_type: DiscountType::CategorySpecific,
            ..draft()
        };
        assert!(
            coupon
                .validate(FormMode::Add, &[])
                .unwrap_err()
                .has("applicableCategories")
        );
    }

    #[test]
    fn test_free_shipping_payload() {
        let coupon = CouponDraft {
            code: " SHIP ".into(),
            discount_type: DiscountType::FreeShipping,
            discount_value: 0.0,
            ..Default::default()
        };
        assert!(coupon.validate(FormMode::Add, &[]).is_ok());

        let payload = coupon.to_payload(FormMode::Add, &[]).unwrap();
        let json = payload.as_json().unwrap();
        assert_eq!(json["code"], "SHIP");
        assert_eq!(json["discountType"], "free_shipping");
        assert_eq!(json["discountValue"], 0.0);
        assert_eq!(json["name"]["en"], "SHIP");
        assert!(json["validFrom"].is_string());
    }

    #[test]
    fn test_default_query() {
        let pairs = Coupons::default_query().to_pairs();
        assert!(pairs.contains(&("status".to_string(), "active".to_string())));
        assert!(pairs.contains(&("sortOrder".to_string(), "DESC".to_string())));
    }
}
