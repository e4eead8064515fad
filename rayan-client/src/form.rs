//! Draft forms for creating and editing resources
//!
//! A [`DraftForm`] owns an independent copy of the values being edited; the
//! list item it was opened from is never modified until the server confirms
//! a change and the list is re-fetched.

use std::fmt;
use std::marker::PhantomData;

use crate::error::{ClientError, ClientResult};
use crate::payload::{Attachment, Payload};

/// Whether a draft creates or updates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormMode {
    Add,
    Edit,
}

/// A single failed field check
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

/// Field errors collected by a draft
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    errors: Vec<FieldError>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, field: &'static str, message: impl Into<String>) {
        self.errors.push(FieldError {
            field,
            message: message.into(),
        });
    }

    /// Record "is required" when `value` is blank
    pub fn require(&mut self, field: &'static str, value: &str) {
        if value.trim().is_empty() {
            self.push(field, "is required");
        }
    }

    /// Record a failure when `ok` is false
    pub fn check(&mut self, ok: bool, field: &'static str, message: impl Into<String>) {
        if !ok {
            self.push(field, message);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn has(&self, field: &str) -> bool {
        self.errors.iter().any(|e| e.field == field)
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.errors
            .iter()
            .find(|e| e.field == field)
            .map(|e| e.message.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldError> {
        self.errors.iter()
    }

    pub fn into_result(self) -> Result<(), ValidationErrors> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, error) in self.errors.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{}: {}", error.field, error.message)?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

/// Editable values of one resource
pub trait Draft: Clone + Default + Send + Sync + 'static {
    /// What an edit draft is populated from
    type Item;

    /// How many files the form accepts
    const MAX_ATTACHMENTS: usize = 1;

    fn from_item(item: &Self::Item) -> Self;

    fn validate(&self, mode: FormMode, attachments: &[Attachment]) -> Result<(), ValidationErrors>;

    /// Called only after [`Draft::validate`] passed
    fn to_payload(&self, mode: FormMode, attachments: &[Attachment]) -> ClientResult<Payload>;
}

/// Draft for resources that cannot be created or edited from the client
pub struct ReadOnly<T>(PhantomData<fn() -> T>);

impl<T> Default for ReadOnly<T> {
    fn default() -> Self {
        Self(PhantomData)
    }
}

impl<T> Clone for ReadOnly<T> {
    fn clone(&self) -> Self {
        Self::default()
    }
}

impl<T> fmt::Debug for ReadOnly<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ReadOnly")
    }
}

impl<T: 'static> Draft for ReadOnly<T> {
    type Item = T;

    const MAX_ATTACHMENTS: usize = 0;

    fn from_item(_item: &T) -> Self {
        Self::default()
    }

    fn validate(&self, _mode: FormMode, _attachments: &[Attachment]) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        errors.push("resource", "is read-only");
        Err(errors)
    }

    fn to_payload(&self, _mode: FormMode, _attachments: &[Attachment]) -> ClientResult<Payload> {
        Err(ClientError::InvalidRequest("resource is read-only".to_string()))
    }
}

/// A draft plus its mode, attachments and last validation result
#[derive(Debug, Clone)]
pub struct DraftForm<D> {
    mode: FormMode,
    values: D,
    attachments: Vec<Attachment>,
    errors: ValidationErrors,
}

impl<D: Draft> DraftForm<D> {
    /// Empty add form
    pub fn add() -> Self {
        Self {
            mode: FormMode::Add,
            values: D::default(),
            attachments: Vec::new(),
            errors: ValidationErrors::new(),
        }
    }

    /// Edit form populated from the item's current values
    pub fn edit(item: &D::Item) -> Self {
        Self {
            mode: FormMode::Edit,
            values: D::from_item(item),
            attachments: Vec::new(),
            errors: ValidationErrors::new(),
        }
    }

    pub fn mode(&self) -> FormMode {
        self.mode
    }

    pub fn values(&self) -> &D {
        &self.values
    }

    /// Change values; clears the previous validation result
    pub fn update(&mut self, change: impl FnOnce(&mut D)) {
        change(&mut self.values);
        self.errors = ValidationErrors::new();
    }

    /// Add a file; single-file forms replace the current one
    pub fn attach(&mut self, attachment: Attachment) -> ClientResult<()> {
        match D::MAX_ATTACHMENTS {
            0 => {
                return Err(ClientError::InvalidRequest(
                    "this form does not accept files".to_string(),
                ));
            }
            1 => self.attachments.clear(),
            max if self.attachments.len() >= max => {
                return Err(ClientError::InvalidRequest(format!(
                    "at most {max} files can be attached"
                )));
            }
            _ => {}
        }
        self.attachments.push(attachment);
        Ok(())
    }

    pub fn detach_all(&mut self) {
        self.attachments.clear();
    }

    pub fn attachments(&self) -> &[Attachment] {
        &self.attachments
    }

    /// Errors from the last validation
    pub fn errors(&self) -> &ValidationErrors {
        &self.errors
    }

    pub fn validate(&mut self) -> Result<(), ValidationErrors> {
        match self.values.validate(self.mode, &self.attachments) {
            Ok(()) => {
                self.errors = ValidationErrors::new();
                Ok(())
            }
            Err(errors) => {
                self.errors = errors.clone();
                Err(errors)
            }
        }
    }

    /// Validate, then build the request body
    pub fn submission(&mut self) -> ClientResult<Payload> {
        self.validate()?;
        self.values.to_payload(self.mode, &self.attachments)
    }
}
