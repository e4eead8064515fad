//! Rayan Client - admin client for the Rayan e-commerce API
//!
//! Provides the REST client, per-resource definitions, draft forms and the
//! screen controllers that keep view state in sync with the server.

pub mod auth;
pub mod config;
pub mod controller;
pub mod error;
pub mod form;
pub mod http;
pub mod notify;
pub mod payload;
pub mod query;
pub mod reconcile;
pub mod report;
pub mod resource;
pub mod resources;

pub use auth::{AuthSession, AuthToken, TokenStore};
pub use config::ClientConfig;
pub use controller::{ListState, LoadTicket, ModalMode, ModalState, ScreenController};
pub use error::{ClientError, ClientResult};
pub use form::{Draft, DraftForm, FormMode, ValidationErrors};
pub use http::RestClient;
pub use notify::{Notice, NoticeBoard, NoticeLevel, Notifier, TracingNotifier};
pub use payload::{Attachment, MultipartForm, Payload};
pub use query::{ListQuery, PaginationState};
pub use report::{AppSettings, Report, ReportSource, ReportView};
pub use resource::{ActionRoute, ActionSpec, Identified, ListPage, Resource, ResourceApi, Toggle};

// Re-export shared types for convenience
pub use shared::{Envelope, Localized, PageMetadata, SortOrder};
