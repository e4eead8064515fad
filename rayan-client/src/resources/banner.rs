use crate::error::ClientResult;
use crate::form::{Draft, FormMode, ValidationErrors};
use crate::payload::{Attachment, MultipartForm, Payload};
use crate::resource::Resource;
use shared::models::{Banner, BannerKind};

/// Multipart field carrying the banner image
const IMAGE_FIELD: &str = "imagePath";

/// Home-screen banners (`/banners`, plain list)
pub struct Banners;

impl Resource for Banners {
    type Item = Banner;
    type Detail = Banner;
    type Draft = BannerDraft;

    const PATH: &'static str = "banners";
    const LABEL: &'static str = "Banner";

    fn resolve_item(item: &mut Banner, resolve: &dyn Fn(&str) -> String) {
        item.resolve_assets(resolve);
    }

    fn resolve_detail(detail: &mut Banner, resolve: &dyn Fn(&str) -> String) {
        detail.resolve_assets(resolve);
    }

    fn cached_detail(item: &Banner) -> Option<Banner> {
        Some(item.clone())
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct BannerDraft {
    pub title: String,
    pub link: String,
    pub product_id: Option<i64>,
    pub kind: BannerKind,
}

impl Draft for BannerDraft {
    type Item = Banner;

    fn from_item(item: &Banner) -> Self {
        Self {
            title: item.title.clone().unwrap_or_default(),
            link: item.link.clone().unwrap_or_default(),
            product_id: item.product_id,
            kind: item.kind,
        }
    }

    fn validate(&self, mode: FormMode, attachments: &[Attachment]) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        errors.require("title", &self.title);
        if mode == FormMode::Add {
            errors.check(!attachments.is_empty(), "imagePath", "is required");
        }
        if !self.link.trim().is_empty() {
            errors.check(super::is_http_url(&self.link), "link", "must be an http(s) URL");
        }
        if let Some(id) = self.product_id {
            errors.check(id > 0, "productId", "must be a positive id");
        }
        for attachment in attachments {
            errors.check(attachment.is_image(), "imagePath", "must be an image");
        }
        errors.into_result()
    }

    fn to_payload(&self, _mode: FormMode, attachments: &[Attachment]) -> ClientResult<Payload> {
        let mut form = MultipartForm::new();
        if let Some(image) = attachments.first() {
            form = form.file(IMAGE_FIELD, image.clone());
        }
        let form = form
            .text("title", self.title.trim())
            .text("link", self.link.trim())
            .text("productId", self.product_id.unwrap_or(0))
            .text("type", self.kind.as_str());
        Ok(Payload::Multipart(form))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn banner() -> Banner {
        serde_json::from_value(serde_json::json!({
            "id": 4,
            "title": "Sale",
            "link": "https://example.com",
            "productId": "5",
            "type": "new",
            "imagePath": "https://cdn/b.png"
        }))
        .unwrap()
    }

    #[test]
    fn test_from_item() {
        let draft = BannerDraft::from_item(&banner());
        assert_eq!(draft.title, "Sale");
        assert_eq!(draft.product_id, Some(5));
        assert_eq!(draft.kind, BannerKind::New);
    }

    #[test]
    fn test_validate() {
        let draft = BannerDraft {
            link: "example.com".into(),
            ..Default::default()
        };
        let errors = draft.validate(FormMode::Add, &[]).unwrap_err();
        assert!(errors.has("title"));
        assert!(errors.has("link"));
        assert!(errors.has("imagePath"));

        let draft = BannerDraft {
            title: "Sale".into(),
            link: "http://x".into(),
            ..Default::default()
        };
        let image = Attachment::new("sale.png", vec![1]);
        assert!(draft.validate(FormMode::Add, &[image]).is_ok());
        assert!(draft.validate(FormMode::Edit, &[]).is_ok());

        let pdf = Attachment::new("doc.pdf", vec![1]);
        assert!(draft.validate(FormMode::Add, &[pdf]).unwrap_err().has("imagePath"));
    }

    #[test]
    fn test_payload_fields() {
        let draft = BannerDraft::from_item(&banner());
        let image = Attachment::new("b.png", vec![1, 2]);
        let payload = draft.to_payload(FormMode::Edit, &[image]).unwrap();
        let form = payload.as_multipart().unwrap();
        assert_eq!(form.file_count("imagePath"), 1);
        assert_eq!(form.text_value("title"), Some("Sale"));
        assert_eq!(form.text_value("productId"), Some("5"));
        assert_eq!(form.text_value("type"), Some("new"));

        let payload = BannerDraft::default().to_payload(FormMode::Edit, &[]).unwrap();
        let form = payload.as_multipart().unwrap();
        assert!(!form.has_part("imagePath"));
        assert_eq!(form.text_value("productId"), Some("0"));
        assert_eq!(form.text_value("type"), Some("discount"));
    }
}
