//! Request bodies: JSON or multipart with file attachments

use reqwest::multipart::{Form, Part};
use serde::Serialize;
use std::path::Path;

use crate::error::{ClientError, ClientResult};
use shared::Localized;

/// A file selected for upload
#[derive(Clone, PartialEq, Eq)]
pub struct Attachment {
    pub file_name: String,
    pub mime: String,
    pub bytes: Vec<u8>,
}

impl Attachment {
    /// Attachment with a content type guessed from the file extension
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        let file_name = file_name.into();
        let mime = mime_guess::from_path(&file_name)
            .first_or_octet_stream()
            .essence_str()
            .to_string();
        Self {
            file_name,
            mime,
            bytes,
        }
    }

    /// Read a file from disk
    pub async fn from_path(path: impl AsRef<Path>) -> ClientResult<Self> {
        let path = path.as_ref();
        let file_name = path
            .file_name()
            .and_then(|name| name.to_str())
            .ok_or_else(|| {
                ClientError::InvalidRequest(format!("not a file path: {}", path.display()))
            })?
            .to_string();
        let bytes = tokio::fs::read(path).await?;
        Ok(Self::new(file_name, bytes))
    }

    pub fn is_image(&self) -> bool {
        self.mime.starts_with("image/")
    }
}

impl std::fmt::Debug for Attachment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Attachment")
            .field("file_name", &self.file_name)
            .field("mime", &self.mime)
            .field("len", &self.bytes.len())
            .finish()
    }
}

/// One named part of a multipart body
#[derive(Debug, Clone, PartialEq)]
pub enum FormPart {
    Text { name: String, value: String },
    File { name: String, attachment: Attachment },
}

impl FormPart {
    pub fn name(&self) -> &str {
        match self {
            FormPart::Text { name, .. } | FormPart::File { name, .. } => name,
        }
    }
}

/// Ordered multipart body that can be inspected before sending
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MultipartForm {
    parts: Vec<FormPart>,
}

impl MultipartForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(mut self, name: impl Into<String>, value: impl ToString) -> Self {
        self.parts.push(FormPart::Text {
            name: name.into(),
            value: value.to_string(),
        });
        self
    }

    /// `field[en]` and `field[ar]`
    pub fn localized(mut self, field: &str, text: &Localized) -> Self {
        for (name, value) in text.form_pairs(field) {
            self = self.text(name, value);
        }
        self
    }

    pub fn file(mut self, name: impl Into<String>, attachment: Attachment) -> Self {
        self.parts.push(FormPart::File {
            name: name.into(),
            attachment,
        });
        self
    }

    pub fn parts(&self) -> &[FormPart] {
        &self.parts
    }

    /// First text value with this name
    pub fn text_value(&self, name: &str) -> Option<&str> {
        self.parts.iter().find_map(|part| match part {
            FormPart::Text { name: n, value } if n == name => Some(value.as_str()),
            _ => None,
        })
    }

    pub fn has_part(&self, name: &str) -> bool {
        self.parts.iter().any(|part| part.name() == name)
    }

    pub fn file_count(&self, name: &str) -> usize {
        self.parts
            .iter()
            .filter(|part| matches!(part, FormPart::File { name: n, .. } if n == name))
            .count()
    }

    pub fn into_reqwest(self) -> ClientResult<Form> {
        let mut form = Form::new();
        for part in self.parts {
            form = match part {
                FormPart::Text { name, value } => form.text(name, value),
                FormPart::File { name, attachment } => {
                    let part = Part::bytes(attachment.bytes)
                        .file_name(attachment.file_name)
                        .mime_str(&attachment.mime)?;
                    form.part(name, part)
                }
            };
        }
        Ok(form)
    }
}

/// Body of a mutating request
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    Json(serde_json::Value),
    Multipart(MultipartForm),
}

impl Payload {
    pub fn json<T: Serialize>(body: &T) -> ClientResult<Self> {
        Ok(Payload::Json(serde_json::to_value(body)?))
    }

    /// `{}`; toggles send this
    pub fn empty_object() -> Self {
        Payload::Json(serde_json::Value::Object(Default::default()))
    }

    pub fn as_json(&self) -> Option<&serde_json::Value> {
        match self {
            Payload::Json(value) => Some(value),
            Payload::Multipart(_) => None,
        }
    }

    pub fn as_multipart(&self) -> Option<&MultipartForm> {
        match self {
            Payload::Multipart(form) => Some(form),
            Payload::Json(_) => None,
        }
    }

    pub(crate) fn attach_to(self, request: reqwest::RequestBuilder) -> ClientResult<reqwest::RequestBuilder> {
        Ok(match self {
            Payload::Json(value) => request.json(&value),
            Payload::Multipart(form) => request.multipart(form.into_reqwest()?),
        })
    }
}
