//! Admin resources
//!
//! Each module pairs a marker type implementing [`crate::Resource`] with
//! the draft used by its add/edit form.

mod banner;
mod category;
mod coupon;
mod product;
mod reward;
mod user;

pub use banner::{BannerDraft, Banners};
pub use category::{Categories, CategoryDraft, SubCategories};
pub use coupon::{ANALYTICS, CouponDraft, Coupons, fetch_analytics};
pub use product::{ProductDraft, Products};
pub use reward::{RewardDraft, Rewards, fetch_board};
pub use user::Users;

use crate::resource::Identified;
use shared::models::{Banner, Category, Coupon, Product, Reward, SubCategory, User};

macro_rules! identified {
    ($($ty:ty),* $(,)?) => {
        $(impl Identified for $ty {
            fn id(&self) -> i64 {
                self.id
            }
        })*
    };
}

identified!(Banner, Category, SubCategory, Coupon, Product, Reward, User);

/// Link values must be absolute http(s) URLs
pub(crate) fn is_http_url(value: &str) -> bool {
    let value = value.trim();
    ["http://", "https://"]
        .iter()
        .any(|scheme| value.len() > scheme.len() && value.starts_with(scheme))
}
