//! Screen controller for one resource
//!
//! Holds what a list screen shows (rows, pagination, filters, the open
//! modal and its draft) and drives every change through [`ResourceApi`].
//!
//! Policy:
//! - every failed operation raises exactly one error notice;
//! - every successful mutation raises a success notice and re-fetches the
//!   list exactly once;
//! - list results carry a [`LoadTicket`]; a result whose ticket is no
//!   longer current, or that arrives after [`ScreenController::dispose`],
//!   is dropped.

use std::marker::PhantomData;

use crate::error::{ClientError, ClientResult};
use crate::form::DraftForm;
use crate::notify::{Notice, Notifier};
use crate::payload::{Attachment, Payload};
use crate::query::{ListQuery, PaginationState};
use crate::reconcile::Reconcile;
use crate::resource::{ActionSpec, Identified, ListPage, Resource, ResourceApi};
use shared::SortOrder;

/// List loading state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ListState {
    #[default]
    Idle,
    Loading,
    Loaded,
}

/// What the open modal is for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModalMode {
    Add,
    Edit(i64),
    View(i64),
}

impl ModalMode {
    pub fn target(&self) -> Option<i64> {
        match self {
            ModalMode::Add => None,
            ModalMode::Edit(id) | ModalMode::View(id) => Some(*id),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ModalState {
    #[default]
    Closed,
    Open(ModalMode),
}

/// Issued by [`ScreenController::begin_load`]; only the latest ticket's
/// result is applied
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadTicket {
    generation: u64,
    query: ListQuery,
}

impl LoadTicket {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn query(&self) -> &ListQuery {
        &self.query
    }
}

pub struct ScreenController<R: Resource, A, N> {
    api: A,
    notifier: N,
    state: ListState,
    items: Vec<R::Item>,
    query: ListQuery,
    pagination: PaginationState,
    modal: ModalState,
    selected: Option<R::Detail>,
    draft: Option<DraftForm<R::Draft>>,
    generation: u64,
    disposed: bool,
    _resource: PhantomData<fn() -> R>,
}

impl<R, A, N> ScreenController<R, A, N>
where
    R: Resource,
    A: ResourceApi<R>,
    N: Notifier,
{
    /// Controller starting from the resource's default query
    pub fn new(api: A, notifier: N) -> Self {
        Self::with_query(api, notifier, R::default_query())
    }

    pub fn with_query(api: A, notifier: N, query: ListQuery) -> Self {
        let pagination = PaginationState::new(query.page.unwrap_or(1), query.limit.unwrap_or(0));
        Self {
            api,
            notifier,
            state: ListState::Idle,
            items: Vec::new(),
            query,
            pagination,
            modal: ModalState::Closed,
            selected: None,
            draft: None,
            generation: 0,
            disposed: false,
            _resource: PhantomData,
        }
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn state(&self) -> ListState {
        self.state
    }

    pub fn items(&self) -> &[R::Item] {
        &self.items
    }

    pub fn item(&self, id: i64) -> Option<&R::Item> {
        self.items.iter().find(|item| item.id() == id)
    }

    pub fn query(&self) -> &ListQuery {
        &self.query
    }

    pub fn pagination(&self) -> &PaginationState {
        &self.pagination
    }

    pub fn modal(&self) -> ModalState {
        self.modal
    }

    pub fn selected(&self) -> Option<&R::Detail> {
        self.selected.as_ref()
    }

    pub fn draft(&self) -> Option<&DraftForm<R::Draft>> {
        self.draft.as_ref()
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    fn notify_failure(&self, context: &str, error: &ClientError) {
        let message = match error {
            ClientError::Http { .. } | ClientError::Api { .. } | ClientError::Validation(_) => {
                error.user_message()
            }
            other => format!("{context}: {}", other.user_message()),
        };
        tracing::warn!(resource = R::LABEL, error = %error, "{context}");
        self.notifier.notify(Notice::error(message));
    }

    fn notify_success(&self, message: impl Into<String>) {
        self.notifier.notify(Notice::success(message));
    }

    // ========== List ==========

    /// Start a list load for the current query
    pub fn begin_load(&mut self) -> LoadTicket {
        self.generation += 1;
        self.state = ListState::Loading;
        LoadTicket {
            generation: self.generation,
            query: self.query.clone(),
        }
    }

    /// Apply a list result. Returns `false` when the result was stale.
    pub fn finish_load(&mut self, ticket: LoadTicket, result: ClientResult<ListPage<R::Item>>) -> bool {
        if self.disposed || ticket.generation != self.generation {
            tracing::debug!(
                resource = R::LABEL,
                ticket = ticket.generation,
                current = self.generation,
                "Discarding stale list result"
            );
            return false;
        }

        match result {
            Ok(mut page) => {
                if let Some(limit) = ticket.query.limit {
                    let limit = limit as usize;
                    if limit > 0 && page.items.len() > limit {
                        tracing::warn!(
                            resource = R::LABEL,
                            received = page.items.len(),
                            limit,
                            "Server returned more rows than requested"
                        );
                        page.items.truncate(limit);
                    }
                }
                match page.metadata {
                    Some(metadata) => self.pagination.apply(&metadata),
                    None => self.pagination.clear_totals(),
                }
                self.items = page.items;
            }
            Err(e) => {
                self.items.clear();
                self.pagination.clear_totals();
                self.notify_failure(&format!("Failed to load {} list", R::LABEL.to_lowercase()), &e);
            }
        }
        self.state = ListState::Loaded;
        true
    }

    /// Fetch the list for the current query
    pub async fn refresh(&mut self) {
        let ticket = self.begin_load();
        let result = self.api.list(ticket.query()).await;
        self.finish_load(ticket, result);
    }

    /// Drop any in-flight result; the controller stays readable
    pub fn dispose(&mut self) {
        self.disposed = true;
        self.generation += 1;
    }

    pub async fn set_page(&mut self, page: u32) {
        if self.pagination.set_page(page) {
            self.query.page = Some(self.pagination.page);
            self.refresh().await;
        }
    }

    /// Changing the page size returns to page 1 and clears totals
    pub async fn set_limit(&mut self, limit: u32) {
        let limit = limit.max(1);
        if self.pagination.set_limit(limit) {
            self.query.limit = Some(limit);
            self.query.page = Some(self.pagination.page);
            self.refresh().await;
        }
    }

    pub async fn set_sort(&mut self, order: SortOrder) {
        if self.query.sort_order != Some(order) {
            self.query.sort_order = Some(order);
            self.refresh().await;
        }
    }

    /// Set a filter and return to the first page
    pub async fn set_filter(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        if self.query.filter_value(&key) == Some(value.as_str()) {
            return;
        }
        self.query.filters.insert(key, value);
        self.reset_page();
        self.refresh().await;
    }

    pub async fn clear_filter(&mut self, key: &str) {
        if self.query.filters.remove(key).is_some() {
            self.reset_page();
            self.refresh().await;
        }
    }

    fn reset_page(&mut self) {
        if self.query.page.is_some() {
            self.pagination.set_page(1);
            self.query.page = Some(1);
        }
    }

    // ========== Modal ==========

    pub fn open_add(&mut self) {
        self.selected = None;
        self.draft = Some(DraftForm::add());
        self.modal = ModalState::Open(ModalMode::Add);
    }

    /// Open the edit form, loading the detail when the list row is not enough
    pub async fn open_edit(&mut self, id: i64) -> ClientResult<()> {
        let cached = if R::HYDRATE_ON_EDIT {
            None
        } else {
            self.item(id).and_then(R::cached_detail)
        };
        let detail = match cached {
            Some(detail) => detail,
            None => match self.api.get(id).await {
                Ok(detail) => detail,
                Err(e) => {
                    self.notify_failure(&format!("Failed to load {}", R::LABEL.to_lowercase()), &e);
                    return Err(e);
                }
            },
        };
        self.draft = Some(DraftForm::edit(&detail));
        self.selected = Some(detail);
        self.modal = ModalState::Open(ModalMode::Edit(id));
        Ok(())
    }

    pub async fn open_view(&mut self, id: i64) -> ClientResult<()> {
        match self.api.get(id).await {
            Ok(detail) => {
                self.selected = Some(detail);
                self.draft = None;
                self.modal = ModalState::Open(ModalMode::View(id));
                Ok(())
            }
            Err(e) => {
                self.notify_failure(&format!("Failed to load {}", R::LABEL.to_lowercase()), &e);
                Err(e)
            }
        }
    }

    /// Close the modal and discard any draft
    pub fn close_modal(&mut self) {
        self.modal = ModalState::Closed;
        self.selected = None;
        self.draft = None;
    }

    fn draft_mut(&mut self) -> ClientResult<&mut DraftForm<R::Draft>> {
        self.draft
            .as_mut()
            .ok_or_else(|| ClientError::InvalidState("no form is open".to_string()))
    }

    pub fn update_draft(&mut self, change: impl FnOnce(&mut R::Draft)) -> ClientResult<()> {
        self.draft_mut()?.update(change);
        Ok(())
    }

    pub fn attach(&mut self, attachment: Attachment) -> ClientResult<()> {
        self.draft_mut()?.attach(attachment)
    }

    pub fn detach(&mut self) -> ClientResult<()> {
        self.draft_mut()?.detach_all();
        Ok(())
    }

    // ========== Mutations ==========

    /// Validate and send the open form.
    ///
    /// Validation failures never reach the network. On failure the modal
    /// and draft stay as they were.
    pub async fn submit(&mut self) -> ClientResult<Option<R::Item>> {
        let target = match self.modal {
            ModalState::Open(ModalMode::Add) => None,
            ModalState::Open(ModalMode::Edit(id)) => Some(id),
            _ => {
                let e = ClientError::InvalidState("no form is open".to_string());
                self.notify_failure("Cannot submit", &e);
                return Err(e);
            }
        };

        let payload = match self.draft_mut().and_then(|draft| draft.submission()) {
            Ok(payload) => payload,
            Err(e) => {
                self.notify_failure("Cannot submit", &e);
                return Err(e);
            }
        };

        let (result, verb) = match target {
            None => (self.api.create(payload).await, "added"),
            Some(id) => (self.api.update(id, payload).await, "updated"),
        };

        match result {
            Ok(item) => {
                tracing::info!(resource = R::LABEL, id = ?target, "{} {verb}", R::LABEL);
                self.close_modal();
                self.notify_success(format!("{} {verb}", R::LABEL));
                self.refresh().await;
                Ok(item)
            }
            Err(e) => {
                let verb = if target.is_some() { "update" } else { "add" };
                self.notify_failure(&format!("Failed to {verb} {}", R::LABEL.to_lowercase()), &e);
                Err(e)
            }
        }
    }

    /// Delete an item; it disappears from the list before the server
    /// answers and comes back if the request fails
    pub async fn delete(&mut self, id: i64) -> ClientResult<()> {
        let pending = Reconcile::begin(&mut self.items, |items| items.retain(|item| item.id() != id));

        match self.api.delete(id).await {
            Ok(()) => {
                pending.commit();
                if let ModalState::Open(mode) = self.modal
                    && mode.target() == Some(id)
                {
                    self.close_modal();
                }
                tracing::info!(resource = R::LABEL, id, "Deleted");
                self.notify_success(format!("{} deleted", R::LABEL));
                self.refresh().await;
                Ok(())
            }
            Err(e) => {
                pending.rollback(&mut self.items);
                self.notify_failure(&format!("Failed to delete {}", R::LABEL.to_lowercase()), &e);
                Err(e)
            }
        }
    }

    /// Flip the resource's toggle field (product hidden, user blocked)
    pub async fn toggle(&mut self, id: i64) -> ClientResult<()> {
        let Some(toggle) = R::toggle() else {
            let e = ClientError::InvalidRequest(format!("{} has no toggle", R::LABEL));
            self.notify_failure("Cannot toggle", &e);
            return Err(e);
        };

        let pending = Reconcile::begin(&mut self.items, |items| {
            if let Some(item) = items.iter_mut().find(|item| item.id() == id) {
                (toggle.apply)(item);
            }
        });

        match self
            .api
            .action(&toggle.action, Some(id), Some(Payload::empty_object()))
            .await
        {
            Ok(data) => {
                pending.commit();
                if let Some(settle) = toggle.settle
                    && let Some(item) = self.items.iter_mut().find(|item| item.id() == id)
                {
                    settle(item, &data);
                }
                self.notify_success(toggle.success_message);
                self.refresh().await;
                Ok(())
            }
            Err(e) => {
                pending.rollback(&mut self.items);
                self.notify_failure(&format!("Failed to update {}", R::LABEL.to_lowercase()), &e);
                Err(e)
            }
        }
    }

    /// Call a non-toggle action; the list is left alone
    pub async fn custom(
        &mut self,
        action: &ActionSpec,
        id: Option<i64>,
        payload: Option<Payload>,
    ) -> ClientResult<serde_json::Value> {
        match self.api.action(action, id, payload).await {
            Ok(data) => Ok(data),
            Err(e) => {
                self.notify_failure(&format!("{} {} failed", R::LABEL, action.name), &e);
                Err(e)
            }
        }
    }
}
