//! Analytics report models
//!
//! Report endpoints under `orders/` answer with a bare JSON body, no envelope.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::util::{de_f64, de_i64, de_opt_i64};

/// `orders/dashboard`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrdersDashboard {
    pub overview: DashboardOverview,
    /// Free-form counters keyed by label
    #[serde(default)]
    pub recent_stats: BTreeMap<String, serde_json::Value>,
    #[serde(default)]
    pub product_stats: ProductStats,
    #[serde(default)]
    pub trends: DashboardTrends,
}

impl OrdersDashboard {
    pub fn resolve_assets(&mut self, resolve: &dyn Fn(&str) -> String) {
        for product in &mut self.product_stats.top_selling_products {
            product.resolve_assets(resolve);
        }
    }
}

/// Revenue series charted on the dashboard
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardTrends {
    #[serde(default)]
    pub daily_revenue: Vec<TrendPoint>,
    #[serde(default)]
    pub weekly_revenue: Vec<TrendPoint>,
    #[serde(default)]
    pub monthly_revenue: Vec<TrendPoint>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardOverview {
    #[serde(deserialize_with = "de_f64")]
    pub total_revenue: f64,
    #[serde(deserialize_with = "de_i64")]
    pub total_orders: i64,
    #[serde(default, deserialize_with = "de_i64")]
    pub total_products: i64,
    #[serde(default, deserialize_with = "de_i64")]
    pub total_customers: i64,
    #[serde(default, deserialize_with = "de_f64")]
    pub completion_rate: f64,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductStats {
    #[serde(default)]
    pub top_selling_products: Vec<ProductPerformance>,
    #[serde(default)]
    pub low_stock_products: Vec<LowStockProduct>,
}

/// `orders/sales-report`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SalesReport {
    pub summary: SalesSummary,
    pub breakdown: OrderBreakdown,
    pub customer_insights: CustomerInsights,
    #[serde(default)]
    pub top_products: Vec<ProductSale>,
    #[serde(default)]
    pub trends: Vec<TrendPoint>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SalesSummary {
    #[serde(deserialize_with = "de_f64")]
    pub total_revenue: f64,
    #[serde(deserialize_with = "de_i64")]
    pub total_orders: i64,
    #[serde(deserialize_with = "de_f64")]
    pub average_order_value: f64,
    #[serde(default, deserialize_with = "de_i64")]
    pub total_items_sold: i64,
    #[serde(default, deserialize_with = "de_f64")]
    pub total_discount_given: f64,
    #[serde(default, deserialize_with = "de_f64")]
    pub total_shipping_revenue: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderBreakdown {
    #[serde(default, deserialize_with = "de_i64")]
    pub completed_orders: i64,
    #[serde(default, deserialize_with = "de_i64")]
    pub pending_orders: i64,
    #[serde(default, deserialize_with = "de_i64")]
    pub cancelled_orders: i64,
    #[serde(default, deserialize_with = "de_i64")]
    pub refunded_orders: i64,
    #[serde(default, deserialize_with = "de_f64")]
    pub completion_rate: f64,
    #[serde(default, deserialize_with = "de_f64")]
    pub cancellation_rate: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerInsights {
    #[serde(default, deserialize_with = "de_i64")]
    pub unique_customers: i64,
    #[serde(default, deserialize_with = "de_i64")]
    pub returning_customers: i64,
    #[serde(default, deserialize_with = "de_f64")]
    pub average_orders_per_customer: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductSale {
    pub name: String,
    #[serde(deserialize_with = "de_i64")]
    pub quantity_sold: i64,
    #[serde(deserialize_with = "de_f64")]
    pub revenue: f64,
    #[serde(default, deserialize_with = "de_f64")]
    pub average_price: f64,
}

/// One bucket of `orders/trends` (daily, weekly or monthly)
///
/// Weekly and monthly buckets are keyed `week` / `month` on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendPoint {
    #[serde(alias = "week", alias = "month")]
    pub date: String,
    #[serde(deserialize_with = "de_f64")]
    pub revenue: f64,
    #[serde(deserialize_with = "de_i64")]
    pub orders: i64,
}

/// `orders/top-customer` row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TopCustomer {
    #[serde(default, deserialize_with = "de_opt_i64")]
    pub id: Option<i64>,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone_number: Option<String>,
    #[serde(deserialize_with = "de_i64")]
    pub order_count: i64,
    #[serde(deserialize_with = "de_f64")]
    pub total_spent: f64,
    #[serde(default, deserialize_with = "de_f64")]
    pub average_order_value: f64,
}

/// `orders/top-products` row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductPerformance {
    #[serde(default, deserialize_with = "de_opt_i64")]
    pub id: Option<i64>,
    pub name: String,
    /// Upload path, often host-relative
    #[serde(rename = "Image", alias = "image", default)]
    pub image: Option<String>,
    #[serde(default)]
    pub main_category_name: Option<String>,
    #[serde(default)]
    pub sub_category_name: Option<String>,
    #[serde(default, deserialize_with = "de_i64")]
    pub total_sold: i64,
    #[serde(default, deserialize_with = "de_f64")]
    pub revenue: f64,
    #[serde(default, deserialize_with = "de_f64")]
    pub average_price: f64,
}

impl ProductPerformance {
    pub fn resolve_assets(&mut self, resolve: &dyn Fn(&str) -> String) {
        if let Some(image) = &mut self.image {
            *image = resolve(image);
        }
    }
}

/// `orders/low-stock-products` row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LowStockProduct {
    pub id: i64,
    pub name: String,
    #[serde(deserialize_with = "de_i64")]
    pub current_stock: i64,
    #[serde(default, deserialize_with = "de_i64")]
    pub sold: i64,
    #[serde(default)]
    pub is_recommended: bool,
}

/// `orders/inventory-analytics` row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryItem {
    pub id: i64,
    pub name: String,
    #[serde(deserialize_with = "de_i64")]
    pub current_stock: i64,
    #[serde(default, deserialize_with = "de_i64")]
    pub total_sold: i64,
    #[serde(default, deserialize_with = "de_i64")]
    pub total_inventory: i64,
    #[serde(default, deserialize_with = "de_f64")]
    pub sell_through_rate: f64,
    #[serde(default, deserialize_with = "de_f64")]
    pub current_price: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sales_report_decodes_string_numbers() {
        let json = serde_json::json!({
            "summary": {
                "totalRevenue": "1520.50",
                "totalOrders": 12,
                "averageOrderValue": 126.7
            },
            "breakdown": { "completedOrders": 10, "cancelledOrders": 2, "completionRate": 83.3 },
            "customerInsights": { "uniqueCustomers": 9 },
            "topProducts": [
                { "name": "Dates", "quantitySold": "7", "revenue": 70 }
            ],
            "trends": [ { "date": "2026-01-01", "revenue": 100, "orders": 3 } ]
        });
        let report: SalesReport = serde_json::from_value(json).unwrap();
        assert_eq!(report.summary.total_revenue, 1520.5);
        assert_eq!(report.top_products[0].quantity_sold, 7);
        assert_eq!(report.breakdown.pending_orders, 0);
        assert_eq!(report.trends.len(), 1);
    }

    #[test]
    fn test_dashboard_trends_and_images() {
        let json = serde_json::json!({
            "overview": { "totalRevenue": 900, "totalOrders": 4 },
            "productStats": {
                "topSellingProducts": [
                    { "name": "Dates", "Image": "/uploads/dates.png", "totalSold": 3, "revenue": 30 }
                ]
            },
            "trends": {
                "dailyRevenue": [ { "date": "2026-01-01", "revenue": 100, "orders": 3 } ],
                "weeklyRevenue": [ { "week": "2025-12-29", "revenue": "250.5", "orders": 7 } ],
                "monthlyRevenue": [ { "month": "2026-01-01", "revenue": 900, "orders": "20" } ]
            }
        });
        let mut dashboard: OrdersDashboard = serde_json::from_value(json).unwrap();
        assert_eq!(dashboard.trends.daily_revenue.len(), 1);
        assert_eq!(dashboard.trends.weekly_revenue[0].date, "2025-12-29");
        assert_eq!(dashboard.trends.weekly_revenue[0].revenue, 250.5);
        assert_eq!(dashboard.trends.monthly_revenue[0].orders, 20);

        dashboard.resolve_assets(&|path: &str| format!("https://api.example{path}"));
        assert_eq!(
            dashboard.product_stats.top_selling_products[0].image.as_deref(),
            Some("https://api.example/uploads/dates.png")
        );
    }

    #[test]
    fn test_dashboard_requires_overview() {
        let json = serde_json::json!({ "recentStats": {} });
        assert!(serde_json::from_value::<OrdersDashboard>(json).is_err());
    }
}
