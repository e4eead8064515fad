//! Read-only analytics views and app settings
//!
//! Report endpoints answer with a bare JSON body rather than the usual
//! envelope, so they go through [`RestClient::get_raw`].

use async_trait::async_trait;
use chrono::NaiveDate;
use serde::de::DeserializeOwned;

use crate::error::{ClientError, ClientResult};
use crate::form::ValidationErrors;
use crate::http::RestClient;
use crate::notify::{Notice, Notifier};
use crate::controller::ListState;
use crate::payload::Payload;
use shared::models::{
    AppStatus, AppVersion, AppVersionUpdate, InventoryItem, LowStockProduct, OrdersDashboard,
    ProductPerformance, SalesReport, TopCustomer, TrendPoint,
};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Grouping used by sales and trend reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Period {
    #[default]
    Daily,
    Weekly,
    Monthly,
}

impl Period {
    pub fn as_str(&self) -> &'static str {
        match self {
            Period::Daily => "daily",
            Period::Weekly => "weekly",
            Period::Monthly => "monthly",
        }
    }
}

impl std::str::FromStr for Period {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "daily" => Ok(Period::Daily),
            "weekly" => Ok(Period::Weekly),
            "monthly" => Ok(Period::Monthly),
            other => Err(format!("unknown period: {other}")),
        }
    }
}

/// Query parameters of a report
pub trait ReportQuery: Clone + Send + Sync + 'static {
    fn pairs(&self) -> Vec<(String, String)>;

    fn validate(&self) -> Result<(), ValidationErrors> {
        Ok(())
    }
}

impl ReportQuery for () {
    fn pairs(&self) -> Vec<(String, String)> {
        Vec::new()
    }
}

/// Inclusive date range sent as `startDate` / `endDate`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    /// The `days` days ending on `end`
    pub fn last_days(end: NaiveDate, days: u64) -> Self {
        let start = end
            .checked_sub_days(chrono::Days::new(days.saturating_sub(1)))
            .unwrap_or(end);
        Self { start, end }
    }

    fn pairs(&self) -> [(String, String); 2] {
        [
            ("startDate".to_string(), self.start.format(DATE_FORMAT).to_string()),
            ("endDate".to_string(), self.end.format(DATE_FORMAT).to_string()),
        ]
    }

    fn check(&self, errors: &mut ValidationErrors) {
        errors.check(self.start <= self.end, "endDate", "must not be before the start date");
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SalesQuery {
    pub range: DateRange,
    pub period: Option<Period>,
}

impl ReportQuery for SalesQuery {
    fn pairs(&self) -> Vec<(String, String)> {
        let mut pairs = self.range.pairs().to_vec();
        if let Some(period) = self.period {
            pairs.push(("type".to_string(), period.as_str().to_string()));
        }
        pairs
    }

    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        self.range.check(&mut errors);
        errors.into_result()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrendsQuery {
    pub period: Period,
    pub limit: u32,
}

impl Default for TrendsQuery {
    fn default() -> Self {
        Self {
            period: Period::Daily,
            limit: 30,
        }
    }
}

impl ReportQuery for TrendsQuery {
    fn pairs(&self) -> Vec<(String, String)> {
        vec![
            ("type".to_string(), self.period.as_str().to_string()),
            ("limit".to_string(), self.limit.to_string()),
        ]
    }

    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        errors.check((1..=365).contains(&self.limit), "limit", "must be between 1 and 365");
        errors.into_result()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopCustomersQuery {
    pub range: DateRange,
    pub limit: u32,
}

impl ReportQuery for TopCustomersQuery {
    fn pairs(&self) -> Vec<(String, String)> {
        let mut pairs = self.range.pairs().to_vec();
        pairs.push(("limit".to_string(), self.limit.to_string()));
        pairs
    }

    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        self.range.check(&mut errors);
        errors.check(self.limit > 0, "limit", "must be positive");
        errors.into_result()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LimitQuery {
    pub limit: u32,
}

impl Default for LimitQuery {
    fn default() -> Self {
        Self { limit: 20 }
    }
}

impl ReportQuery for LimitQuery {
    fn pairs(&self) -> Vec<(String, String)> {
        vec![("limit".to_string(), self.limit.to_string())]
    }

    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        errors.check((1..=100).contains(&self.limit), "limit", "must be between 1 and 100");
        errors.into_result()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LowStockQuery {
    pub threshold: i64,
    pub limit: u32,
}

impl Default for LowStockQuery {
    fn default() -> Self {
        Self {
            threshold: 10,
            limit: 20,
        }
    }
}

impl ReportQuery for LowStockQuery {
    fn pairs(&self) -> Vec<(String, String)> {
        vec![
            ("threshold".to_string(), self.threshold.to_string()),
            ("limit".to_string(), self.limit.to_string()),
        ]
    }

    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        errors.check(self.threshold >= 0, "threshold", "must not be negative");
        errors.check(self.limit > 0, "limit", "must be positive");
        errors.into_result()
    }
}

/// Static description of one report endpoint
pub trait Report: Send + Sync + 'static {
    type Query: ReportQuery;
    type Output: DeserializeOwned + Send + 'static;

    const PATH: &'static str;
    const LABEL: &'static str;

    /// Rewrite file paths in the output, e.g. into absolute URLs
    fn resolve(_output: &mut Self::Output, _resolve: &dyn Fn(&str) -> String) {}
}

macro_rules! report {
    ($(#[$meta:meta])* $name:ident, $path:literal, $label:literal, $query:ty => $output:ty $(, assets = $assets:path)?) => {
        $(#[$meta])*
        pub struct $name;

        impl Report for $name {
            type Query = $query;
            type Output = $output;

            const PATH: &'static str = $path;
            const LABEL: &'static str = $label;

            $(
                fn resolve(output: &mut $output, resolve: &dyn Fn(&str) -> String) {
                    $assets(output, resolve)
                }
            )?
        }
    };
}

fn resolve_performance(rows: &mut Vec<ProductPerformance>, resolve: &dyn Fn(&str) -> String) {
    for row in rows {
        row.resolve_assets(resolve);
    }
}

report!(
    /// Revenue, order and product overview
    Dashboard, "orders/dashboard", "orders dashboard", () => OrdersDashboard,
    assets = OrdersDashboard::resolve_assets
);
report!(Sales, "orders/sales-report", "sales report", SalesQuery => SalesReport);
report!(Trends, "orders/trends", "trends", TrendsQuery => Vec<TrendPoint>);
report!(TopCustomers, "orders/top-customer", "top customers", TopCustomersQuery => Vec<TopCustomer>);
report!(
    TopProducts, "orders/top-products", "product performance", LimitQuery => Vec<ProductPerformance>,
    assets = resolve_performance
);
report!(LowStock, "orders/low-stock-products", "low stock products", LowStockQuery => Vec<LowStockProduct>);
report!(
    /// Stock and sell-through per product
    Inventory, "orders/inventory-analytics", "inventory analytics", () => Vec<InventoryItem>
);

/// Fetches report bodies
#[async_trait]
pub trait ReportSource: Send + Sync {
    async fn fetch<R: Report>(&self, query: &R::Query) -> ClientResult<R::Output>;
}

#[async_trait]
impl ReportSource for RestClient {
    async fn fetch<R: Report>(&self, query: &R::Query) -> ClientResult<R::Output> {
        let mut output = self.get_raw::<R::Output>(R::PATH, &query.pairs()).await?;
        R::resolve(&mut output, &|path: &str| self.asset_url(path));
        Ok(output)
    }
}

/// Issued by [`ReportView::begin_load`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportTicket(u64);

/// State of one report screen
pub struct ReportView<R: Report, S, N> {
    source: S,
    notifier: N,
    query: R::Query,
    state: ListState,
    data: Option<R::Output>,
    generation: u64,
    disposed: bool,
}

impl<R, S, N> ReportView<R, S, N>
where
    R: Report,
    S: ReportSource,
    N: Notifier,
{
    pub fn new(source: S, notifier: N, query: R::Query) -> Self {
        Self {
            source,
            notifier,
            query,
            state: ListState::Idle,
            data: None,
            generation: 0,
            disposed: false,
        }
    }

    pub fn query(&self) -> &R::Query {
        &self.query
    }

    /// Replace the query; call [`ReportView::refresh`] to apply it
    pub fn set_query(&mut self, query: R::Query) {
        self.query = query;
    }

    pub fn state(&self) -> ListState {
        self.state
    }

    pub fn data(&self) -> Option<&R::Output> {
        self.data.as_ref()
    }

    fn notify_failure(&self, error: &ClientError) {
        let message = match error {
            ClientError::Http { .. } | ClientError::Api { .. } | ClientError::Validation(_) => {
                error.user_message()
            }
            other => format!("Failed to load {}: {}", R::LABEL, other.user_message()),
        };
        tracing::warn!(report = R::LABEL, error = %error, "Report failed");
        self.notifier.notify(Notice::error(message));
    }

    /// Validate the query and start a load. Invalid queries are reported
    /// and never reach the network.
    pub fn begin_load(&mut self) -> ClientResult<ReportTicket> {
        if let Err(errors) = self.query.validate() {
            let e = ClientError::Validation(errors);
            self.notify_failure(&e);
            return Err(e);
        }
        self.generation += 1;
        self.state = ListState::Loading;
        Ok(ReportTicket(self.generation))
    }

    /// Apply a result. Returns `false` when the result was stale.
    pub fn finish_load(&mut self, ticket: ReportTicket, result: ClientResult<R::Output>) -> bool {
        if self.disposed || ticket.0 != self.generation {
            tracing::debug!(report = R::LABEL, "Discarding stale report result");
            return false;
        }
        match result {
            Ok(data) => self.data = Some(data),
            Err(e) => {
                self.data = None;
                self.notify_failure(&e);
            }
        }
        self.state = ListState::Loaded;
        true
    }

    pub async fn refresh(&mut self) -> ClientResult<()> {
        let ticket = self.begin_load()?;
        let result = self.source.fetch::<R>(&self.query).await;
        self.finish_load(ticket, result);
        Ok(())
    }

    pub fn dispose(&mut self) {
        self.disposed = true;
        self.generation += 1;
    }
}

const APP_CHECK: &str = "app-version/check";
const APP_TOGGLE: &str = "app-version/toggle-app-status";
const APP_UPDATE: &str = "app-version/update";
const APP_PRIVACY: &str = "app-version/privacy-policy-link";
const APP_DELETION: &str = "app-version/deletion-link";

/// Storefront app version and open/closed switch
pub struct AppSettings<N> {
    client: RestClient,
    notifier: N,
    version: Option<AppVersion>,
}

impl<N: Notifier> AppSettings<N> {
    pub fn new(client: RestClient, notifier: N) -> Self {
        Self {
            client,
            notifier,
            version: None,
        }
    }

    /// Last fetched settings
    pub fn version(&self) -> Option<&AppVersion> {
        self.version.as_ref()
    }

    fn fail<T>(&self, context: &str, error: ClientError) -> ClientResult<T> {
        let message = match &error {
            ClientError::Http { .. } | ClientError::Api { .. } => error.user_message(),
            other => format!("{context}: {}", other.user_message()),
        };
        tracing::warn!(error = %error, "{context}");
        self.notifier.notify(Notice::error(message));
        Err(error)
    }

    pub async fn check(&mut self) -> ClientResult<AppVersion> {
        match self.client.get_raw::<AppVersion>(APP_CHECK, &[]).await {
            Ok(version) => {
                self.version = Some(version.clone());
                Ok(version)
            }
            Err(e) => self.fail("Failed to check app version", e),
        }
    }

    /// Open or close the storefront; returns the new state
    pub async fn toggle_status(&mut self) -> ClientResult<AppStatus> {
        match self
            .client
            .patch_raw::<AppStatus>(APP_TOGGLE, Payload::empty_object())
            .await
        {
            Ok(status) => {
                if let Some(version) = self.version.as_mut() {
                    version.is_open = status.is_open;
                }
                let state = if status.is_open { "open" } else { "closed" };
                self.notifier.notify(Notice::success(format!("App is now {state}")));
                Ok(status)
            }
            Err(e) => self.fail("Failed to toggle app status", e),
        }
    }

    /// Save version info, then re-read it
    pub async fn update(&mut self, update: &AppVersionUpdate) -> ClientResult<AppVersion> {
        let payload = match Payload::json(update) {
            Ok(payload) => payload,
            Err(e) => return self.fail("Failed to update version", e),
        };
        if let Err(e) = self.client.put_raw::<serde_json::Value>(APP_UPDATE, payload).await {
            return self.fail("Failed to update version", e);
        }
        self.notifier.notify(Notice::success("Version updated"));
        self.check().await
    }

    /// Privacy policy page as published to the stores (HTML)
    pub async fn privacy_policy(&self) -> ClientResult<String> {
        self.page(APP_PRIVACY).await
    }

    /// Account deletion instructions page (HTML)
    pub async fn deletion_policy(&self) -> ClientResult<String> {
        self.page(APP_DELETION).await
    }

    async fn page(&self, path: &str) -> ClientResult<String> {
        match self.client.get_text(path).await {
            Ok(html) => Ok(html),
            Err(e) => self.fail("Failed to fetch page", e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notify::{NoticeBoard, NoticeLevel};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_sales_query_pairs() {
        let query = SalesQuery {
            range: DateRange::new(date(2026, 1, 1), date(2026, 1, 31)),
            period: Some(Period::Weekly),
        };
        assert!(query.validate().is_ok());
        assert_eq!(
            query.pairs(),
            vec![
                ("startDate".to_string(), "2026-01-01".to_string()),
                ("endDate".to_string(), "2026-01-31".to_string()),
                ("type".to_string(), "weekly".to_string()),
            ]
        );
    }

    #[test]
    fn test_reversed_range_rejected() {
        let query = TopCustomersQuery {
            range: DateRange::new(date(2026, 2, 2), date(2026, 2, 1)),
            limit: 10,
        };
        assert!(query.validate().unwrap_err().has("endDate"));
    }

    #[test]
    fn test_last_days() {
        let range = DateRange::last_days(date(2026, 3, 10), 7);
        assert_eq!(range.start, date(2026, 3, 4));
        assert_eq!(DateRange::last_days(date(2026, 3, 10), 0).start, date(2026, 3, 10));
    }

    #[test]
    fn test_limits() {
        assert!(TrendsQuery::default().validate().is_ok());
        assert!(TrendsQuery { period: Period::Monthly, limit: 0 }.validate().is_err());
        assert!(LimitQuery { limit: 101 }.validate().is_err());
        assert_eq!(LowStockQuery::default().pairs()[0], ("threshold".to_string(), "10".to_string()));
        assert_eq!("monthly".parse::<Period>(), Ok(Period::Monthly));
    }

    struct Offline;

    #[async_trait]
    impl ReportSource for Offline {
        async fn fetch<R: Report>(&self, _query: &R::Query) -> ClientResult<R::Output> {
            Err(ClientError::Api {
                message: "Reports are offline".into(),
            })
        }
    }

    #[test]
    fn test_stale_report_result_dropped() {
        let board = NoticeBoard::new();
        let mut view = ReportView::<Trends, _, _>::new(Offline, &board, TrendsQuery::default());

        let first = view.begin_load().unwrap();
        let second = view.begin_load().unwrap();
        assert!(!view.finish_load(first, Err(ClientError::Api { message: "late".into() })));
        assert_eq!(view.state(), ListState::Loading);
        assert!(board.is_empty());

        assert!(view.finish_load(second, Ok(Vec::new())));
        assert_eq!(view.state(), ListState::Loaded);
        assert_eq!(view.data().map(Vec::len), Some(0));

        let late = view.begin_load().unwrap();
        view.dispose();
        assert!(!view.finish_load(late, Ok(Vec::new())));
        assert!(board.is_empty());
    }

    #[tokio::test]
    async fn test_report_failure_notifies_once() {
        let board = NoticeBoard::new();
        let mut view = ReportView::<Dashboard, _, _>::new(Offline, &board, ());
        view.refresh().await.unwrap();
        assert_eq!(view.state(), ListState::Loaded);
        assert!(view.data().is_none());
        assert_eq!(board.count(NoticeLevel::Error), 1);
        assert_eq!(board.active()[0].message, "Reports are offline");
    }

    #[tokio::test]
    async fn test_invalid_query_skips_fetch() {
        let board = NoticeBoard::new();
        let query = LimitQuery { limit: 0 };
        let mut view = ReportView::<TopProducts, _, _>::new(Offline, &board, query);
        assert!(view.refresh().await.unwrap_err().is_validation());
        assert_eq!(view.state(), ListState::Idle);
        assert_eq!(board.count(NoticeLevel::Error), 1);
    }
}
