//! Command-line interface

use std::path::PathBuf;

use chrono::{DateTime, NaiveDate, Utc};
use clap::{Args, Parser, Subcommand, ValueEnum};
use rayan_client::report::Period;
use shared::SortOrder;
use shared::models::{
    BannerKind, CouponStatus, DiscountType, ProductDiscountType, RewardDiscountType, RewardKind,
};

#[derive(Debug, Parser)]
#[command(name = "rayan")]
#[command(about = "Admin console for the Rayan store", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Default, Args)]
pub struct GlobalArgs {
    /// API host, overrides RAYAN_API_URL
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    /// Response language (en, ar)
    #[arg(long, global = true)]
    pub locale: Option<String>,

    /// Directory holding the saved token
    #[arg(long, global = true)]
    pub token_dir: Option<PathBuf>,

    /// Debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// JSON log lines on stderr
    #[arg(long, global = true)]
    pub json_logs: bool,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Save an access token for later commands
    Login {
        #[arg(long, env = "RAYAN_TOKEN", hide_env_values = true)]
        token: String,
    },
    /// Forget the saved token
    Logout,
    #[command(subcommand)]
    Banner(BannerCommand),
    #[command(subcommand)]
    Category(CategoryCommand),
    #[command(subcommand)]
    Coupon(CouponCommand),
    #[command(subcommand)]
    Product(ProductCommand),
    #[command(subcommand)]
    User(UserCommand),
    #[command(subcommand)]
    Reward(RewardCommand),
    /// Sales and inventory reports
    #[command(subcommand)]
    Report(ReportCommand),
    /// App version and store open/closed switch
    #[command(subcommand)]
    App(AppCommand),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SortArg {
    Asc,
    Desc,
}

impl From<SortArg> for SortOrder {
    fn from(arg: SortArg) -> Self {
        match arg {
            SortArg::Asc => SortOrder::Asc,
            SortArg::Desc => SortOrder::Desc,
        }
    }
}

#[derive(Debug, Clone, Default, Args)]
pub struct PageArgs {
    #[arg(long)]
    pub page: Option<u32>,

    #[arg(long)]
    pub limit: Option<u32>,

    #[arg(long, value_enum)]
    pub sort: Option<SortArg>,
}

#[derive(Debug, Subcommand)]
pub enum BannerCommand {
    List,
    Add {
        #[arg(long)]
        title: String,
        #[arg(long, default_value = "")]
        link: String,
        #[arg(long)]
        product_id: Option<i64>,
        #[arg(long, default_value = "discount")]
        kind: BannerKind,
        /// Banner image file
        #[arg(long)]
        image: PathBuf,
    },
    Edit {
        id: i64,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        link: Option<String>,
        #[arg(long)]
        product_id: Option<i64>,
        #[arg(long)]
        kind: Option<BannerKind>,
        /// Replacement image
        #[arg(long)]
        image: Option<PathBuf>,
    },
    Delete {
        id: i64,
    },
}

#[derive(Debug, Subcommand)]
pub enum CategoryCommand {
    List,
    Show {
        id: i64,
    },
    /// Subcategories of a main category
    Subs {
        main_id: i64,
    },
    Add {
        #[arg(long)]
        name_en: String,
        #[arg(long)]
        name_ar: String,
        #[arg(long)]
        icon: Option<PathBuf>,
    },
    Edit {
        id: i64,
        #[arg(long)]
        name_en: Option<String>,
        #[arg(long)]
        name_ar: Option<String>,
        #[arg(long)]
        icon: Option<PathBuf>,
    },
    Delete {
        id: i64,
    },
}

#[derive(Debug, Clone, Args)]
pub struct CouponFields {
    #[arg(long)]
    pub name_en: Option<String>,
    #[arg(long)]
    pub name_ar: Option<String>,
    #[arg(long)]
    pub max_discount: Option<f64>,
    #[arg(long)]
    pub min_order: Option<f64>,
    #[arg(long)]
    pub status: Option<CouponStatus>,
    /// RFC 3339 timestamp
    #[arg(long)]
    pub valid_from: Option<DateTime<Utc>>,
    /// RFC 3339 timestamp
    #[arg(long)]
    pub valid_to: Option<DateTime<Utc>>,
    #[arg(long)]
    pub usage_limit: Option<i64>,
    #[arg(long)]
    pub usage_limit_per_user: Option<i64>,
    #[arg(long, value_delimiter = ',')]
    pub categories: Vec<i64>,
    #[arg(long, value_delimiter = ',')]
    pub products: Vec<i64>,
}

#[derive(Debug, Subcommand)]
pub enum CouponCommand {
    List {
        #[command(flatten)]
        page: PageArgs,
        /// Status filter; defaults to active
        #[arg(long)]
        status: Option<CouponStatus>,
        #[arg(long)]
        discount_type: Option<DiscountType>,
    },
    Show {
        id: i64,
    },
    /// Usage statistics
    Analytics {
        id: i64,
    },
    Add {
        #[arg(long)]
        code: String,
        #[arg(long, default_value = "percentage")]
        discount_type: DiscountType,
        #[arg(long, default_value_t = 0.0)]
        value: f64,
        #[command(flatten)]
        fields: CouponFields,
    },
    Edit {
        id: i64,
        #[arg(long)]
        code: Option<String>,
        #[arg(long)]
        discount_type: Option<DiscountType>,
        #[arg(long)]
        value: Option<f64>,
        #[command(flatten)]
        fields: CouponFields,
    },
    Delete {
        id: i64,
    },
}

#[derive(Debug, Clone, Args)]
pub struct ProductFields {
    #[arg(long)]
    pub description_en: Option<String>,
    #[arg(long)]
    pub description_ar: Option<String>,
    #[arg(long)]
    pub supplier_price: Option<f64>,
    #[arg(long)]
    pub discount: Option<f64>,
    #[arg(long)]
    pub discount_type: Option<ProductDiscountType>,
    #[arg(long)]
    pub stock: Option<i64>,
    /// Image files, repeatable
    #[arg(long = "image")]
    pub images: Vec<PathBuf>,
}

#[derive(Debug, Subcommand)]
pub enum ProductCommand {
    List {
        #[command(flatten)]
        page: PageArgs,
        #[arg(long)]
        category: Option<i64>,
        #[arg(long)]
        sub_category: Option<i64>,
    },
    Show {
        id: i64,
    },
    Add {
        #[arg(long)]
        name_en: String,
        #[arg(long)]
        name_ar: String,
        #[arg(long)]
        price: f64,
        #[arg(long)]
        category: i64,
        #[arg(long)]
        sub_category: i64,
        #[command(flatten)]
        fields: ProductFields,
    },
    Edit {
        id: i64,
        #[arg(long)]
        name_en: Option<String>,
        #[arg(long)]
        name_ar: Option<String>,
        #[arg(long)]
        price: Option<f64>,
        #[arg(long)]
        category: Option<i64>,
        #[arg(long)]
        sub_category: Option<i64>,
        #[command(flatten)]
        fields: ProductFields,
    },
    /// Hide or show a product
    Toggle {
        id: i64,
    },
    Delete {
        id: i64,
    },
}

#[derive(Debug, Subcommand)]
pub enum UserCommand {
    List {
        #[command(flatten)]
        page: PageArgs,
        /// Name, email or phone
        #[arg(long)]
        search: Option<String>,
    },
    Show {
        id: i64,
    },
    /// Block or unblock an account
    Toggle {
        id: i64,
    },
    Delete {
        id: i64,
    },
}

#[derive(Debug, Subcommand)]
pub enum RewardCommand {
    List,
    Add {
        #[arg(long, default_value = "discount_coupon")]
        kind: RewardKind,
        #[arg(long, default_value = "percentage")]
        discount_type: RewardDiscountType,
        #[arg(long, default_value_t = 0.0)]
        value: f64,
        #[arg(long)]
        product_id: Option<i64>,
        #[arg(long, default_value = "")]
        text: String,
        #[arg(long, default_value = "")]
        coupon_code: String,
        #[arg(long, default_value_t = 1.0)]
        probability: f64,
        #[arg(long, default_value_t = 0.0)]
        min_order: f64,
        #[arg(long)]
        expires_at: Option<DateTime<Utc>>,
        #[arg(long)]
        inactive: bool,
    },
    Delete {
        id: i64,
    },
}

#[derive(Debug, Clone, Args)]
pub struct RangeArgs {
    /// First day, YYYY-MM-DD
    #[arg(long)]
    pub from: Option<NaiveDate>,
    /// Last day, YYYY-MM-DD; defaults to today
    #[arg(long)]
    pub to: Option<NaiveDate>,
    /// Length of the range when --from is not given
    #[arg(long, default_value_t = 30)]
    pub days: u64,
}

#[derive(Debug, Subcommand)]
pub enum ReportCommand {
    Dashboard,
    Sales {
        #[command(flatten)]
        range: RangeArgs,
        #[arg(long)]
        period: Option<Period>,
    },
    Trends {
        #[arg(long, default_value = "daily")]
        period: Period,
        #[arg(long, default_value_t = 30)]
        limit: u32,
    },
    TopCustomers {
        #[command(flatten)]
        range: RangeArgs,
        #[arg(long, default_value_t = 10)]
        limit: u32,
    },
    TopProducts {
        #[arg(long, default_value_t = 20)]
        limit: u32,
    },
    LowStock {
        #[arg(long, default_value_t = 10)]
        threshold: i64,
        #[arg(long, default_value_t = 20)]
        limit: u32,
    },
    Inventory,
}

#[derive(Debug, Subcommand)]
pub enum AppCommand {
    /// Show version info and store status
    Check,
    /// Open or close the store
    Toggle,
    /// Change version info; unset fields keep their current value
    Update {
        #[arg(long)]
        android_version: Option<String>,
        #[arg(long)]
        android_end_date: Option<String>,
        #[arg(long)]
        android_url: Option<String>,
        #[arg(long)]
        ios_version: Option<String>,
        #[arg(long)]
        ios_end_date: Option<String>,
        #[arg(long)]
        ios_url: Option<String>,
    },
    /// Print the privacy policy page
    Privacy,
    /// Print the account deletion page
    Deletion,
}
