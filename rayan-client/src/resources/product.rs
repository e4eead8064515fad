use http::Method;

use crate::error::ClientResult;
use crate::form::{Draft, FormMode, ValidationErrors};
use crate::payload::{Attachment, MultipartForm, Payload};
use crate::query::ListQuery;
use crate::resource::{ActionRoute, ActionSpec, Resource, Toggle};
use shared::models::{Product, ProductDiscountType};
use shared::{Localized, SortOrder};

const IMAGES_FIELD: &str = "images";

/// Products (`/product`, paginated, filtered by `categoryId` / `subCategoryId`)
pub struct Products;

impl Products {
    pub fn category_filter(main: Option<i64>, sub: Option<i64>) -> ListQuery {
        let mut query = Self::default_query();
        if let Some(main) = main {
            query = query.filter("categoryId", main.to_string());
        }
        if let Some(sub) = sub {
            query = query.filter("subCategoryId", sub.to_string());
        }
        query
    }
}

fn flip_hidden(product: &mut Product) {
    product.is_hidden = !product.is_hidden;
}

impl Resource for Products {
    type Item = Product;
    type Detail = Product;
    type Draft = ProductDraft;

    const PATH: &'static str = "product";
    const LABEL: &'static str = "Product";
    const HYDRATE_ON_EDIT: bool = true;

    fn default_query() -> ListQuery {
        ListQuery::new().paginate(1, 10).sort(SortOrder::Asc)
    }

    fn resolve_item(item: &mut Product, resolve: &dyn Fn(&str) -> String) {
        item.resolve_assets(resolve);
    }

    fn resolve_detail(detail: &mut Product, resolve: &dyn Fn(&str) -> String) {
        detail.resolve_assets(resolve);
    }

    /// `PATCH /product/toggle-hidden/{id}`
    fn toggle() -> Option<Toggle<Product>> {
        Some(Toggle {
            action: ActionSpec {
                name: "toggle-hidden",
                route: ActionRoute::Prefixed,
                method: Method::PATCH,
            },
            apply: flip_hidden,
            settle: None,
            success_message: "Product visibility updated",
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductDraft {
    pub name: Localized,
    pub description: Localized,
    pub price: f64,
    pub supplier_price: f64,
    pub discount: f64,
    pub discount_type: ProductDiscountType,
    pub main_category_id: Option<i64>,
    pub sub_category_id: Option<i64>,
    pub stock: i64,
}

impl Draft for ProductDraft {
    type Item = Product;

    const MAX_ATTACHMENTS: usize = 10;

    fn from_item(item: &Product) -> Self {
        Self {
            name: item.name.clone(),
            description: item.description.clone().unwrap_or_default(),
            price: item.price.unwrap_or(0.0),
            supplier_price: item.supplier_price.unwrap_or(0.0),
            discount: item.discount.unwrap_or(0.0),
            discount_type: item.discount_type.unwrap_or_default(),
            main_category_id: item.main_category.as_ref().map(|c| c.id),
            sub_category_id: item.sub_category.as_ref().map(|c| c.id),
            stock: item.stock,
        }
    }

    fn validate(&self, _mode: FormMode, attachments: &[Attachment]) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        errors.require("name[en]", &self.name.en);
        errors.require("name[ar]", &self.name.ar);
        errors.check(self.price >= 0.0, "price", "must not be negative");
        errors.check(self.supplier_price >= 0.0, "supplier_price", "must not be negative");
        errors.check(self.discount >= 0.0, "discount", "must not be negative");
        match self.discount_type {
            ProductDiscountType::Percent => {
                errors.check(self.discount <= 100.0, "discount", "must be at most 100")
            }
            ProductDiscountType::Fixed => {
                errors.check(self.discount <= self.price, "discount", "must not exceed the price")
            }
        }
        errors.check(self.main_category_id.is_some(), "main_category_id", "is required");
        errors.check(self.sub_category_id.is_some(), "sub_category_id", "is required");
        errors.check(self.stock >= 0, "stock", "must not be negative");
        for attachment in attachments {
            errors.check(attachment.is_image(), "images", "must be images");
        }
        errors.into_result()
    }

    /// Existing images stay on the server; only newly attached files are sent
    fn to_payload(&self, _mode: FormMode, attachments: &[Attachment]) -> ClientResult<Payload> {
        let mut form = MultipartForm::new()
            .localized("name", &self.name)
            .localized("description", &self.description)
            .text("price", self.price)
            .text("supplier_price", self.supplier_price)
            .text("discount", self.discount)
            .text("discount_type", self.discount_type.as_str())
            .text("stock", self.stock);
        if let Some(id) = self.main_category_id {
            form = form.text("main_category_id", id);
        }
        if let Some(id) = self.sub_category_id {
            form = form.text("sub_category_id", id);
        }
        for image in attachments {
            form = form.file(IMAGES_FIELD, image.clone());
        }
        Ok(Payload::Multipart(form))
    }
}
