use crate::error::ClientResult;
use crate::form::{Draft, FormMode, ReadOnly, ValidationErrors};
use crate::payload::{Attachment, MultipartForm, Payload};
use crate::query::ListQuery;
use crate::resource::Resource;
use shared::Localized;
use shared::models::{Category, SubCategory};

const ICON_FIELD: &str = "icon";

/// Main categories (`/category`, plain list).
///
/// List rows may carry only the locale-resolved name, so edit forms load
/// the detail to get both languages.
pub struct Categories;

impl Resource for Categories {
    type Item = Category;
    type Detail = Category;
    type Draft = CategoryDraft;

    const PATH: &'static str = "category";
    const LABEL: &'static str = "Category";
    const HYDRATE_ON_EDIT: bool = true;

    fn resolve_item(item: &mut Category, resolve: &dyn Fn(&str) -> String) {
        item.resolve_assets(resolve);
    }

    fn resolve_detail(detail: &mut Category, resolve: &dyn Fn(&str) -> String) {
        detail.resolve_assets(resolve);
    }
}

/// Subcategories of one main category (`/sub-categories?main_category=`)
pub struct SubCategories;

impl SubCategories {
    pub fn query_for(main_category: i64) -> ListQuery {
        ListQuery::new().filter("main_category", main_category.to_string())
    }
}

impl Resource for SubCategories {
    type Item = SubCategory;
    type Detail = SubCategory;
    type Draft = ReadOnly<SubCategory>;

    const PATH: &'static str = "sub-categories";
    const LABEL: &'static str = "Subcategory";

    fn resolve_item(item: &mut SubCategory, resolve: &dyn Fn(&str) -> String) {
        item.resolve_assets(resolve);
    }

    fn resolve_detail(detail: &mut SubCategory, resolve: &dyn Fn(&str) -> String) {
        detail.resolve_assets(resolve);
    }

    fn cached_detail(item: &SubCategory) -> Option<SubCategory> {
        Some(item.clone())
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CategoryDraft {
    pub name: Localized,
}

impl Draft for CategoryDraft {
    type Item = Category;

    fn from_item(item: &Category) -> Self {
        Self {
            name: item.name.clone(),
        }
    }

    fn validate(&self, _mode: FormMode, attachments: &[Attachment]) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        errors.require("name[en]", &self.name.en);
        errors.require("name[ar]", &self.name.ar);
        for attachment in attachments {
            errors.check(attachment.is_image(), "icon", "must be an image");
        }
        errors.into_result()
    }

    /// The icon part is sent only when a new file was chosen
    fn to_payload(&self, _mode: FormMode, attachments: &[Attachment]) -> ClientResult<Payload> {
        let name = Localized::new(self.name.en.trim(), self.name.ar.trim());
        let mut form = MultipartForm::new().localized("name", &name);
        if let Some(icon) = attachments.first() {
            form = form.file(ICON_FIELD, icon.clone());
        }
        Ok(Payload::Multipart(form))
    }
}
