//! Command dispatch
//!
//! Each command drives the same controllers a UI would. Outcomes reach the
//! operator through [`ConsoleNotifier`]; data goes to stdout as JSON.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use anyhow::Context;
use chrono::Utc;
use rayan_client::report::{
    Dashboard, DateRange, Inventory, LimitQuery, LowStock, LowStockQuery, Sales, SalesQuery,
    TopCustomers, TopCustomersQuery, TopProducts, Trends, TrendsQuery,
};
use rayan_client::resources::{
    BannerDraft, Banners, Categories, CategoryDraft, CouponDraft, Coupons, ProductDraft, Products,
    RewardDraft, Rewards, SubCategories, Users, fetch_analytics, fetch_board,
};
use rayan_client::{
    AppSettings, Attachment, AuthSession, AuthToken, ClientError, ClientResult, ListQuery, Notice,
    NoticeLevel, Notifier, Report, ReportView, Resource, RestClient, ScreenController, TokenStore,
};
use serde::Serialize;
use shared::models::AppVersionUpdate;

use crate::cli::{
    AppCommand, BannerCommand, CategoryCommand, Command, CouponCommand, CouponFields, PageArgs,
    ProductCommand, ProductFields, RangeArgs, ReportCommand, RewardCommand, UserCommand,
};
use crate::config::ConsoleConfig;

/// A failure the operator has already been shown
#[derive(Debug, thiserror::Error)]
#[error("{0}")]
pub struct Reported(String);

trait ReportedExt<T> {
    fn reported(self) -> Result<T, Reported>;
}

impl<T> ReportedExt<T> for ClientResult<T> {
    fn reported(self) -> Result<T, Reported> {
        self.map_err(|e| Reported(e.user_message()))
    }
}

/// Prints notices to stderr and counts errors
#[derive(Debug, Clone, Default)]
pub struct ConsoleNotifier {
    errors: Arc<AtomicUsize>,
}

impl ConsoleNotifier {
    pub fn error_count(&self) -> usize {
        self.errors.load(Ordering::Relaxed)
    }

    fn fail(&self, error: ClientError) -> Reported {
        let message = error.user_message();
        self.notify(Notice::error(message.clone()));
        Reported(message)
    }

    fn check(&self) -> Result<(), Reported> {
        match self.error_count() {
            0 => Ok(()),
            n => Err(Reported(format!("{n} operation(s) failed"))),
        }
    }
}

impl Notifier for ConsoleNotifier {
    fn notify(&self, notice: Notice) {
        if notice.level == NoticeLevel::Error {
            self.errors.fetch_add(1, Ordering::Relaxed);
        }
        eprintln!("[{}] {}", notice.level.as_str(), notice.message);
    }
}

type Screen<R> = ScreenController<R, RestClient, ConsoleNotifier>;

fn print_json<T: Serialize + ?Sized>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn paged(mut query: ListQuery, args: &PageArgs) -> ListQuery {
    if let Some(page) = args.page {
        query.page = Some(page.max(1));
    }
    if let Some(limit) = args.limit {
        query.limit = Some(limit.max(1));
        query.page.get_or_insert(1);
    }
    if let Some(sort) = args.sort {
        query.sort_order = Some(sort.into());
    }
    query
}

async fn attachments(paths: &[PathBuf]) -> anyhow::Result<Vec<Attachment>> {
    let mut files = Vec::with_capacity(paths.len());
    for path in paths {
        files.push(read_attachment(path).await?);
    }
    Ok(files)
}

async fn read_attachment(path: &Path) -> anyhow::Result<Attachment> {
    Attachment::from_path(path)
        .await
        .with_context(|| format!("reading {}", path.display()))
}

// ========== Generic resource commands ==========

async fn list<R: Resource>(client: RestClient, notifier: ConsoleNotifier, query: ListQuery) -> anyhow::Result<()>
where
    R::Item: Serialize,
{
    let mut screen = Screen::<R>::with_query(client, notifier.clone(), query);
    screen.refresh().await;
    notifier.check()?;

    print_json(screen.items())?;
    let pagination = screen.pagination();
    if let (Some(pages), Some(total)) = (pagination.total_pages(), pagination.total_items()) {
        eprintln!("page {} of {pages}, {total} total", pagination.page);
    }
    Ok(())
}

async fn show<R: Resource>(client: RestClient, notifier: ConsoleNotifier, id: i64) -> anyhow::Result<()>
where
    R::Detail: Serialize,
{
    let mut screen = Screen::<R>::new(client, notifier);
    screen.open_view(id).await.reported()?;
    print_json(&screen.selected())
}

async fn add<R: Resource>(
    client: RestClient,
    notifier: ConsoleNotifier,
    fill: impl FnOnce(&mut R::Draft),
    files: Vec<Attachment>,
) -> anyhow::Result<()>
where
    R::Item: Serialize,
{
    let mut screen = Screen::<R>::new(client, notifier);
    screen.open_add();
    screen.update_draft(fill)?;
    for file in files {
        screen.attach(file)?;
    }
    if let Some(created) = screen.submit().await.reported()? {
        print_json(&created)?;
    }
    Ok(())
}

async fn edit<R: Resource>(
    client: RestClient,
    notifier: ConsoleNotifier,
    id: i64,
    fill: impl FnOnce(&mut R::Draft),
    files: Vec<Attachment>,
) -> anyhow::Result<()>
where
    R::Item: Serialize,
{
    let mut screen = Screen::<R>::new(client, notifier);
    if !R::HYDRATE_ON_EDIT {
        // list rows seed the form without an extra request
        screen.refresh().await;
    }
    screen.open_edit(id).await.reported()?;
    screen.update_draft(fill)?;
    for file in files {
        screen.attach(file)?;
    }
    if let Some(updated) = screen.submit().await.reported()? {
        print_json(&updated)?;
    }
    Ok(())
}

async fn delete<R: Resource>(client: RestClient, notifier: ConsoleNotifier, id: i64) -> anyhow::Result<()> {
    let mut screen = Screen::<R>::new(client, notifier);
    screen.delete(id).await.reported()?;
    Ok(())
}

async fn toggle<R: Resource>(client: RestClient, notifier: ConsoleNotifier, id: i64) -> anyhow::Result<()>
where
    R::Item: Serialize,
{
    let mut screen = Screen::<R>::new(client, notifier);
    screen.refresh().await;
    screen.toggle(id).await.reported()?;
    if let Some(item) = screen.item(id) {
        print_json(item)?;
    }
    Ok(())
}

async fn report<R: Report>(client: RestClient, notifier: ConsoleNotifier, query: R::Query) -> anyhow::Result<()>
where
    R::Output: Serialize,
{
    let mut view = ReportView::<R, _, _>::new(client, notifier.clone(), query);
    view.refresh().await.reported()?;
    notifier.check()?;
    print_json(&view.data())
}

fn date_range(args: &RangeArgs) -> DateRange {
    let end = args.to.unwrap_or_else(|| Utc::now().date_naive());
    match args.from {
        Some(start) => DateRange::new(start, end),
        None => DateRange::last_days(end, args.days),
    }
}

// ========== Field mapping ==========

fn apply_coupon_fields(draft: &mut CouponDraft, fields: CouponFields) {
    if let Some(en) = fields.name_en {
        draft.name.en = en;
    }
    if let Some(ar) = fields.name_ar {
        draft.name.ar = ar;
    }
    if let Some(amount) = fields.max_discount {
        draft.max_discount_amount = amount;
    }
    if let Some(amount) = fields.min_order {
        draft.min_order_amount = amount;
    }
    if let Some(status) = fields.status {
        draft.status = status;
    }
    if fields.valid_from.is_some() {
        draft.valid_from = fields.valid_from;
    }
    if fields.valid_to.is_some() {
        draft.valid_to = fields.valid_to;
    }
    if let Some(limit) = fields.usage_limit {
        draft.usage_limit = limit;
    }
    if let Some(limit) = fields.usage_limit_per_user {
        draft.usage_limit_per_user = limit;
    }
    if !fields.categories.is_empty() {
        draft.applicable_categories = fields.categories;
    }
    if !fields.products.is_empty() {
        draft.applicable_products = fields.products;
    }
}

fn apply_product_fields(draft: &mut ProductDraft, fields: &ProductFields) {
    if let Some(en) = &fields.description_en {
        draft.description.en = en.clone();
    }
    if let Some(ar) = &fields.description_ar {
        draft.description.ar = ar.clone();
    }
    if let Some(price) = fields.supplier_price {
        draft.supplier_price = price;
    }
    if let Some(discount) = fields.discount {
        draft.discount = discount;
    }
    if let Some(kind) = fields.discount_type {
        draft.discount_type = kind;
    }
    if let Some(stock) = fields.stock {
        draft.stock = stock;
    }
}

// ========== Dispatch ==========

pub async fn run(command: Command, config: &ConsoleConfig) -> anyhow::Result<()> {
    let store = TokenStore::new(&config.token_dir);

    match command {
        Command::Login { token } => {
            let token = AuthToken::new(token).context("token must not be empty")?;
            store
                .save(&token)
                .with_context(|| format!("saving token to {}", store.path().display()))?;
            tracing::info!(path = %store.path().display(), "Token saved");
            return Ok(());
        }
        Command::Logout => {
            if store.exists() {
                store.delete().context("removing saved token")?;
            }
            tracing::info!("Logged out");
            return Ok(());
        }
        _ => {}
    }

    let session = AuthSession::from_store(&store);
    if !session.is_authenticated() {
        tracing::warn!("No saved token; run `rayan login` first");
    }
    let client = config.client_config().build_client(session)?;
    let notifier = ConsoleNotifier::default();

    match command {
        Command::Login { .. } | Command::Logout => Ok(()),
        Command::Banner(cmd) => banner(cmd, client, notifier).await,
        Command::Category(cmd) => category(cmd, client, notifier).await,
        Command::Coupon(cmd) => coupon(cmd, client, notifier).await,
        Command::Product(cmd) => product(cmd, client, notifier).await,
        Command::User(cmd) => user(cmd, client, notifier).await,
        Command::Reward(cmd) => reward(cmd, client, notifier).await,
        Command::Report(cmd) => reports(cmd, client, notifier).await,
        Command::App(cmd) => app(cmd, client, notifier).await,
    }
}

async fn banner(cmd: BannerCommand, client: RestClient, notifier: ConsoleNotifier) -> anyhow::Result<()> {
    match cmd {
        BannerCommand::List => list::<Banners>(client, notifier, Banners::default_query()).await,
        BannerCommand::Add {
            title,
            link,
            product_id,
            kind,
            image,
        } => {
            let image = read_attachment(&image).await?;
            let fill = |draft: &mut BannerDraft| {
                draft.title = title;
                draft.link = link;
                draft.product_id = product_id;
                draft.kind = kind;
            };
            add::<Banners>(client, notifier, fill, vec![image]).await
        }
        BannerCommand::Edit {
            id,
            title,
            link,
            product_id,
            kind,
            image,
        } => {
            let files = attachments(image.as_slice()).await?;
            let fill = |draft: &mut BannerDraft| {
                if let Some(title) = title {
                    draft.title = title;
                }
                if let Some(link) = link {
                    draft.link = link;
                }
                if product_id.is_some() {
                    draft.product_id = product_id;
                }
                if let Some(kind) = kind {
                    draft.kind = kind;
                }
            };
            edit::<Banners>(client, notifier, id, fill, files).await
        }
        BannerCommand::Delete { id } => delete::<Banners>(client, notifier, id).await,
    }
}

async fn category(cmd: CategoryCommand, client: RestClient, notifier: ConsoleNotifier) -> anyhow::Result<()> {
    match cmd {
        CategoryCommand::List => list::<Categories>(client, notifier, Categories::default_query()).await,
        CategoryCommand::Show { id } => show::<Categories>(client, notifier, id).await,
        CategoryCommand::Subs { main_id } => {
            list::<SubCategories>(client, notifier, SubCategories::query_for(main_id)).await
        }
        CategoryCommand::Add {
            name_en,
            name_ar,
            icon,
        } => {
            let files = attachments(icon.as_slice()).await?;
            let fill = |draft: &mut CategoryDraft| {
                draft.name.en = name_en;
                draft.name.ar = name_ar;
            };
            add::<Categories>(client, notifier, fill, files).await
        }
        CategoryCommand::Edit {
            id,
            name_en,
            name_ar,
            icon,
        } => {
            let files = attachments(icon.as_slice()).await?;
            let fill = |draft: &mut CategoryDraft| {
                if let Some(en) = name_en {
                    draft.name.en = en;
                }
                if let Some(ar) = name_ar {
                    draft.name.ar = ar;
                }
            };
            edit::<Categories>(client, notifier, id, fill, files).await
        }
        CategoryCommand::Delete { id } => delete::<Categories>(client, notifier, id).await,
    }
}

async fn coupon(cmd: CouponCommand, client: RestClient, notifier: ConsoleNotifier) -> anyhow::Result<()> {
    match cmd {
        CouponCommand::List {
            page,
            status,
            discount_type,
        } => {
            let mut query = paged(Coupons::default_query(), &page);
            if let Some(status) = status {
                query = query.filter("status", status.as_str());
            }
            if let Some(kind) = discount_type {
                query = query.filter("discountType", kind.as_str());
            }
            list::<Coupons>(client, notifier, query).await
        }
        CouponCommand::Show { id } => show::<Coupons>(client, notifier, id).await,
        CouponCommand::Analytics { id } => {
            let analytics = fetch_analytics(&client, id)
                .await
                .map_err(|e| notifier.fail(e))?;
            print_json(&analytics)
        }
        CouponCommand::Add {
            code,
            discount_type,
            value,
            fields,
        } => {
            let fill = |draft: &mut CouponDraft| {
                draft.code = code;
                draft.discount_type = discount_type;
                draft.discount_value = value;
                apply_coupon_fields(draft, fields);
            };
            add::<Coupons>(client, notifier, fill, Vec::new()).await
        }
        CouponCommand::Edit {
            id,
            code,
            discount_type,
            value,
            fields,
        } => {
            let fill = |draft: &mut CouponDraft| {
                if let Some(code) = code {
                    draft.code = code;
                }
                if let Some(kind) = discount_type {
                    draft.discount_type = kind;
                }
                if let Some(value) = value {
                    draft.discount_value = value;
                }
                apply_coupon_fields(draft, fields);
            };
            edit::<Coupons>(client, notifier, id, fill, Vec::new()).await
        }
        CouponCommand::Delete { id } => delete::<Coupons>(client, notifier, id).await,
    }
}

async fn product(cmd: ProductCommand, client: RestClient, notifier: ConsoleNotifier) -> anyhow::Result<()> {
    match cmd {
        ProductCommand::List {
            page,
            category,
            sub_category,
        } => {
            let query = paged(Products::category_filter(category, sub_category), &page);
            list::<Products>(client, notifier, query).await
        }
        ProductCommand::Show { id } => show::<Products>(client, notifier, id).await,
        ProductCommand::Add {
            name_en,
            name_ar,
            price,
            category,
            sub_category,
            fields,
        } => {
            let files = attachments(&fields.images).await?;
            let fill = |draft: &mut ProductDraft| {
                draft.name.en = name_en;
                draft.name.ar = name_ar;
                draft.price = price;
                draft.main_category_id = Some(category);
                draft.sub_category_id = Some(sub_category);
                apply_product_fields(draft, &fields);
            };
            add::<Products>(client, notifier, fill, files).await
        }
        ProductCommand::Edit {
            id,
            name_en,
            name_ar,
            price,
            category,
            sub_category,
            fields,
        } => {
            let files = attachments(&fields.images).await?;
            let fill = |draft: &mut ProductDraft| {
                if let Some(en) = name_en {
                    draft.name.en = en;
                }
                if let Some(ar) = name_ar {
                    draft.name.ar = ar;
                }
                if let Some(price) = price {
                    draft.price = price;
                }
                if category.is_some() {
                    draft.main_category_id = category;
                }
                if sub_category.is_some() {
                    draft.sub_category_id = sub_category;
                }
                apply_product_fields(draft, &fields);
            };
            edit::<Products>(client, notifier, id, fill, files).await
        }
        ProductCommand::Toggle { id } => toggle::<Products>(client, notifier, id).await,
        ProductCommand::Delete { id } => delete::<Products>(client, notifier, id).await,
    }
}

async fn user(cmd: UserCommand, client: RestClient, notifier: ConsoleNotifier) -> anyhow::Result<()> {
    match cmd {
        UserCommand::List { page, search } => {
            let base = match search.as_deref() {
                Some(keyword) => Users::search(keyword),
                None => Users::default_query(),
            };
            list::<Users>(client, notifier, paged(base, &page)).await
        }
        UserCommand::Show { id } => show::<Users>(client, notifier, id).await,
        UserCommand::Toggle { id } => toggle::<Users>(client, notifier, id).await,
        UserCommand::Delete { id } => delete::<Users>(client, notifier, id).await,
    }
}

async fn reward(cmd: RewardCommand, client: RestClient, notifier: ConsoleNotifier) -> anyhow::Result<()> {
    match cmd {
        RewardCommand::List => {
            let board = fetch_board(&client).await.map_err(|e| notifier.fail(e))?;
            print_json(&board)
        }
        RewardCommand::Add {
            kind,
            discount_type,
            value,
            product_id,
            text,
            coupon_code,
            probability,
            min_order,
            expires_at,
            inactive,
        } => {
            let fill = |draft: &mut RewardDraft| {
                draft.kind = kind;
                draft.discount_type = discount_type;
                draft.discount_value = value;
                draft.product_id = product_id;
                draft.display_text = text;
                draft.coupon_code = coupon_code;
                draft.probability = probability;
                draft.min_order_amount = min_order;
                draft.expires_at = expires_at;
                draft.is_active = !inactive;
            };
            add::<Rewards>(client, notifier, fill, Vec::new()).await
        }
        RewardCommand::Delete { id } => delete::<Rewards>(client, notifier, id).await,
    }
}

async fn reports(cmd: ReportCommand, client: RestClient, notifier: ConsoleNotifier) -> anyhow::Result<()> {
    match cmd {
        ReportCommand::Dashboard => report::<Dashboard>(client, notifier, ()).await,
        ReportCommand::Sales { range, period } => {
            let query = SalesQuery {
                range: date_range(&range),
                period,
            };
            report::<Sales>(client, notifier, query).await
        }
        ReportCommand::Trends { period, limit } => {
            report::<Trends>(client, notifier, TrendsQuery { period, limit }).await
        }
        ReportCommand::TopCustomers { range, limit } => {
            let query = TopCustomersQuery {
                range: date_range(&range),
                limit,
            };
            report::<TopCustomers>(client, notifier, query).await
        }
        ReportCommand::TopProducts { limit } => {
            report::<TopProducts>(client, notifier, LimitQuery { limit }).await
        }
        ReportCommand::LowStock { threshold, limit } => {
            report::<LowStock>(client, notifier, LowStockQuery { threshold, limit }).await
        }
        ReportCommand::Inventory => report::<Inventory>(client, notifier, ()).await,
    }
}

async fn app(cmd: AppCommand, client: RestClient, notifier: ConsoleNotifier) -> anyhow::Result<()> {
    let mut settings = AppSettings::new(client, notifier);
    match cmd {
        AppCommand::Check => {
            let version = settings.check().await.reported()?;
            print_json(&version)
        }
        AppCommand::Toggle => {
            let status = settings.toggle_status().await.reported()?;
            print_json(&status)
        }
        AppCommand::Update {
            android_version,
            android_end_date,
            android_url,
            ios_version,
            ios_end_date,
            ios_url,
        } => {
            let current = settings.check().await.reported()?;
            let mut update = AppVersionUpdate::from(&current);
            let changes = [
                (&mut update.android_version, android_version),
                (&mut update.android_end_date, android_end_date),
                (&mut update.android_url, android_url),
                (&mut update.ios_version, ios_version),
                (&mut update.ios_end_date, ios_end_date),
                (&mut update.ios_url, ios_url),
            ];
            for (slot, value) in changes {
                if let Some(value) = value {
                    *slot = value;
                }
            }
            let version = settings.update(&update).await.reported()?;
            print_json(&version)
        }
        AppCommand::Privacy => {
            println!("{}", settings.privacy_policy().await.reported()?);
            Ok(())
        }
        AppCommand::Deletion => {
            println!("{}", settings.deletion_policy().await.reported()?);
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::SortArg;
    use chrono::NaiveDate;
    use shared::SortOrder;

    #[test]
    fn test_paged_overrides() {
        let args = PageArgs {
            page: Some(0),
            limit: Some(25),
            sort: Some(SortArg::Asc),
        };
        let query = paged(Coupons::default_query(), &args);
        assert_eq!(query.page, Some(1));
        assert_eq!(query.limit, Some(25));
        assert_eq!(query.sort_order, Some(SortOrder::Asc));
        assert_eq!(query.filter_value("status"), Some("active"));

        let query = paged(ListQuery::new(), &PageArgs::default());
        assert_eq!(query, ListQuery::new());
    }

    #[test]
    fn test_date_range() {
        let to = NaiveDate::from_ymd_opt(2026, 5, 31).unwrap();
        let args = RangeArgs {
            from: None,
            to: Some(to),
            days: 7,
        };
        assert_eq!(date_range(&args).start, NaiveDate::from_ymd_opt(2026, 5, 25).unwrap());

        let from = NaiveDate::from_ymd_opt(2026, 5, 1).unwrap();
        let args = RangeArgs {
            from: Some(from),
            ..args
        };
        assert_eq!(date_range(&args), DateRange::new(from, to));
    }

    #[test]
    fn test_console_notifier_counts_errors() {
        let notifier = ConsoleNotifier::default();
        notifier.notify(Notice::success("Banner added"));
        assert!(notifier.check().is_ok());

        let reported = notifier.fail(ClientError::Api {
            message: "Code already used".into(),
        });
        assert_eq!(reported.to_string(), "Code already used");
        assert_eq!(notifier.error_count(), 1);
        assert!(notifier.check().is_err());
    }

    #[test]
    fn test_coupon_fields_keep_unset_values() {
        let mut draft = CouponDraft {
            code: "SPRING".into(),
            usage_limit: 50,
            ..Default::default()
        };
        let fields = CouponFields {
            name_en: Some("Spring".into()),
            name_ar: None,
            max_discount: None,
            min_order: Some(20.0),
            status: None,
            valid_from: None,
            valid_to: None,
            usage_limit: None,
            usage_limit_per_user: None,
            categories: vec![3],
            products: Vec::new(),
        };
        apply_coupon_fields(&mut draft, fields);
        assert_eq!(draft.name.en, "Spring");
        assert_eq!(draft.min_order_amount, 20.0);
        assert_eq!(draft.usage_limit, 50);
        assert_eq!(draft.applicable_categories, vec![3]);
    }

    #[tokio::test]
    async fn test_login_and_logout_manage_token_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let config = ConsoleConfig {
            token_dir: dir.path().to_path_buf(),
            ..ConsoleConfig::from_lookup(|_| None)
        };

        run(Command::Login { token: "abc".into() }, &config).await.unwrap();
        let store = TokenStore::new(dir.path());
        assert_eq!(store.load().unwrap().as_str(), "abc");

        assert!(run(Command::Login { token: "  ".into() }, &config).await.is_err());

        run(Command::Logout, &config).await.unwrap();
        assert!(!store.exists());
    }
}
