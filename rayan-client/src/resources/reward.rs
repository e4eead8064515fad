use chrono::{DateTime, Utc};

use crate::error::{ClientError, ClientResult};
use crate::form::{Draft, FormMode, ValidationErrors};
use crate::http::RestClient;
use crate::payload::{Attachment, Payload};
use crate::resource::{ListPage, Resource};
use shared::ListData;
use shared::models::{Reward, RewardBoard, RewardDiscountType, RewardKind, RewardPayload};

/// Spin-wheel rewards (`/rewards`).
///
/// The list comes back as `{ isActive, rewards }`; older deployments answer
/// with a bare array.
pub struct Rewards;

impl Resource for Rewards {
    type Item = Reward;
    type Detail = Reward;
    type Draft = RewardDraft;

    const PATH: &'static str = "rewards";
    const LABEL: &'static str = "Reward";

    fn cached_detail(item: &Reward) -> Option<Reward> {
        Some(item.clone())
    }

    fn decode_list(data: serde_json::Value) -> Result<ListPage<Reward>, serde_json::Error> {
        if data.is_array() {
            let (items, metadata) = serde_json::from_value::<ListData<Reward>>(data)?.into_parts();
            return Ok(ListPage::new(items, metadata));
        }
        let board: RewardBoard = serde_json::from_value(data)?;
        Ok(ListPage::new(board.rewards, None))
    }
}

/// Rewards together with the wheel's on/off flag
pub async fn fetch_board(client: &RestClient) -> ClientResult<RewardBoard> {
    client
        .get_envelope::<RewardBoard>(Rewards::PATH, &[])
        .await?
        .data
        .ok_or_else(|| ClientError::InvalidResponse("reward board response has no data".to_string()))
}

#[derive(Debug, Clone, PartialEq)]
pub struct RewardDraft {
    pub kind: RewardKind,
    pub discount_type: RewardDiscountType,
    pub discount_value: f64,
    pub product_id: Option<i64>,
    pub display_text: String,
    pub coupon_code: String,
    /// Chance of landing on this reward, 0..=1
    pub probability: f64,
    pub is_active: bool,
    pub description: String,
    pub expires_at: Option<DateTime<Utc>>,
    pub min_order_amount: f64,
}

impl Default for RewardDraft {
    fn default() -> Self {
        Self {
            kind: RewardKind::DiscountCoupon,
            discount_type: RewardDiscountType::Percentage,
            discount_value: 0.0,
            product_id: None,
            display_text: String::new(),
            coupon_code: String::new(),
            probability: 1.0,
            is_active: true,
            description: String::new(),
            expires_at: None,
            min_order_amount: 0.0,
        }
    }
}

impl Draft for RewardDraft {
    type Item = Reward;

    const MAX_ATTACHMENTS: usize = 0;

    fn from_item(item: &Reward) -> Self {
        Self {
            kind: item.kind,
            discount_type: item.discount_type,
            discount_value: item.discount_value,
            product_id: item.product_id,
            display_text: item.display_text.clone().unwrap_or_default(),
            coupon_code: item.coupon_code.clone().unwrap_or_default(),
            probability: item.probability.unwrap_or(1.0),
            is_active: item.is_active,
            description: item.description.clone().unwrap_or_default(),
            expires_at: item.expires_at,
            min_order_amount: item.min_order_amount.unwrap_or(0.0),
        }
    }

    fn validate(&self, _mode: FormMode, _attachments: &[Attachment]) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        errors.check(self.discount_value >= 0.0, "discountValue", "must not be negative");
        if self.discount_type == RewardDiscountType::Percentage {
            errors.check(self.discount_value <= 100.0, "discountValue", "must be at most 100");
        }
        errors.check(
            (0.0..=1.0).contains(&self.probability),
            "probability",
            "must be between 0 and 1",
        );
        errors.check(self.min_order_amount >= 0.0, "minOrderAmount", "must not be negative");
        if self.kind == RewardKind::FreeItem {
            errors.check(
                self.product_id.is_some_and(|id| id > 0),
                "productId",
                "is required for free items",
            );
        }
        errors.into_result()
    }

    fn to_payload(&self, _mode: FormMode, _attachments: &[Attachment]) -> ClientResult<Payload> {
        let body = RewardPayload {
            kind: self.kind,
            discount_type: self.discount_type,
            discount_value: self.discount_value,
            product_id: self.product_id.unwrap_or(0),
            display_text: self.display_text.trim().to_string(),
            coupon_code: self.coupon_code.trim().to_string(),
            probability: self.probability,
            is_active: self.is_active,
            description: self.description.trim().to_string(),
            expires_at: self.expires_at,
            min_order_amount: self.min_order_amount,
        };
        Payload::json(&body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_board_and_array() {
        let reward = serde_json::json!({
            "id": 1,
            "type": "cashback",
            "discountType": "fixed",
            "discountValue": "5.00",
            "isActive": true
        });

        let page = Rewards::decode_list(serde_json::json!({
            "isActive": true,
            "rewards": [reward.clone()]
        }))
        .unwrap();
        assert_eq!(page.items.len(), 1);
        assert_eq!(page.items[0].discount_value, 5.0);

        let page = Rewards::decode_list(serde_json::json!([reward])).unwrap();
        assert_eq!(page.items[0].kind, RewardKind::Cashback);

        assert!(Rewards::decode_list(serde_json::json!({"rewards": "nope"})).is_err());
    }

    #[test]
    fn test_validate_probability() {
        let mut draft = RewardDraft {
            discount_value: 10.0,
            ..Default::default()
        };
        assert!(draft.validate(FormMode::Add, &[]).is_ok());

        draft.probability = 1.5;
        assert!(draft.validate(FormMode::Add, &[]).unwrap_err().has("probability"));

        let free = RewardDraft {
            kind: RewardKind::FreeItem,
            ..Default::default()
        };
        assert!(free.validate(FormMode::Add, &[]).unwrap_err().has("productId"));
    }

    #[test]
    fn test_payload_defaults() {
        let json = RewardDraft::default()
            .to_payload(FormMode::Add, &[])
            .unwrap()
            .as_json()
            .cloned()
            .unwrap();
        assert_eq!(json["type"], "discount_coupon");
        assert_eq!(json["productId"], 0);
        assert_eq!(json["probability"], 1.0);
        assert!(json["expiresAt"].is_null());
    }
}
