//! Data models
//!
//! Wire shapes of the Rayan API, camelCase on the wire.
//! All IDs are `i64`. Enumerated fields are closed: an unknown value is a
//! deserialization error, never a silent default.

pub mod app_version;
pub mod banner;
pub mod category;
pub mod coupon;
pub mod product;
pub mod report;
pub mod reward;
pub mod user;

// Re-exports
pub use app_version::*;
pub use banner::*;
pub use category::*;
pub use coupon::*;
pub use product::*;
pub use report::*;
pub use reward::*;
pub use user::*;
