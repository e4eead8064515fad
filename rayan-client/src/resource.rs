//! Resource definitions and the CRUD surface shared by every screen

use async_trait::async_trait;
use http::Method;
use serde::de::DeserializeOwned;

use crate::error::{ClientError, ClientResult};
use crate::form::Draft;
use crate::http::RestClient;
use crate::payload::Payload;
use crate::query::ListQuery;
use shared::{ListData, PageMetadata};

/// Items addressable by a numeric id
pub trait Identified {
    fn id(&self) -> i64;
}

/// One page of list results
#[derive(Debug, Clone, PartialEq)]
pub struct ListPage<T> {
    pub items: Vec<T>,
    pub metadata: Option<PageMetadata>,
}

impl<T> ListPage<T> {
    pub fn new(items: Vec<T>, metadata: Option<PageMetadata>) -> Self {
        Self { items, metadata }
    }

    pub fn empty() -> Self {
        Self::new(Vec::new(), None)
    }
}

/// Where an action sits relative to the resource path
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionRoute {
    /// `{path}/{id}/{action}`
    Member,
    /// `{path}/{action}/{id}`
    Prefixed,
    /// `{path}/{action}`
    Collection,
}

/// A non-CRUD endpoint on a resource
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionSpec {
    pub name: &'static str,
    pub route: ActionRoute,
    pub method: Method,
}

impl ActionSpec {
    pub fn path(&self, resource: &str, id: Option<i64>) -> ClientResult<String> {
        match (self.route, id) {
            (ActionRoute::Member, Some(id)) => Ok(format!("{resource}/{id}/{}", self.name)),
            (ActionRoute::Prefixed, Some(id)) => Ok(format!("{resource}/{}/{id}", self.name)),
            (ActionRoute::Collection, None) => Ok(format!("{resource}/{}", self.name)),
            (ActionRoute::Collection, Some(_)) => Err(ClientError::InvalidRequest(format!(
                "action `{}` does not take an id",
                self.name
            ))),
            (_, None) => Err(ClientError::InvalidRequest(format!(
                "action `{}` requires an id",
                self.name
            ))),
        }
    }
}

/// A two-state flag flipped through an action endpoint
pub struct Toggle<T> {
    pub action: ActionSpec,
    /// Speculative local change applied before the request
    pub apply: fn(&mut T),
    /// Adopts the state reported in the response data, when present
    pub settle: Option<fn(&mut T, &serde_json::Value)>,
    pub success_message: &'static str,
}

/// Static description of one admin resource
pub trait Resource: Send + Sync + 'static {
    /// List row
    type Item: DeserializeOwned + Identified + Clone + Send + Sync + 'static;
    /// Detail view; may carry more than the list row
    type Detail: DeserializeOwned + Clone + Send + Sync + 'static;
    type Draft: Draft<Item = Self::Detail>;

    /// Path under the API root
    const PATH: &'static str;
    /// Singular display name for notices
    const LABEL: &'static str;
    /// Edit forms are populated from a fresh `get` instead of the list row
    const HYDRATE_ON_EDIT: bool = false;

    fn default_query() -> ListQuery {
        ListQuery::new()
    }

    fn toggle() -> Option<Toggle<Self::Item>> {
        None
    }

    /// Rewrite the file paths of a fetched row, e.g. into absolute URLs
    fn resolve_item(_item: &mut Self::Item, _resolve: &dyn Fn(&str) -> String) {}

    fn resolve_detail(_detail: &mut Self::Detail, _resolve: &dyn Fn(&str) -> String) {}

    /// Detail built from a list row without a request
    fn cached_detail(_item: &Self::Item) -> Option<Self::Detail> {
        None
    }

    /// Decode the `data` of a list response
    fn decode_list(data: serde_json::Value) -> Result<ListPage<Self::Item>, serde_json::Error> {
        let (items, metadata) = serde_json::from_value::<ListData<Self::Item>>(data)?.into_parts();
        Ok(ListPage::new(items, metadata))
    }
}

/// CRUD operations for one resource.
///
/// Screen controllers are generic over this trait; [`RestClient`] is the
/// network implementation.
#[async_trait]
pub trait ResourceApi<R: Resource>: Send + Sync {
    async fn list(&self, query: &ListQuery) -> ClientResult<ListPage<R::Item>>;

    async fn get(&self, id: i64) -> ClientResult<R::Detail>;

    async fn create(&self, payload: Payload) -> ClientResult<Option<R::Item>>;

    async fn update(&self, id: i64, payload: Payload) -> ClientResult<Option<R::Item>>;

    async fn delete(&self, id: i64) -> ClientResult<()>;

    async fn action(
        &self,
        action: &ActionSpec,
        id: Option<i64>,
        payload: Option<Payload>,
    ) -> ClientResult<serde_json::Value>;
}

impl RestClient {
    fn resolved<R: Resource>(&self, item: Option<R::Item>) -> Option<R::Item> {
        item.map(|mut item| {
            R::resolve_item(&mut item, &|path: &str| self.asset_url(path));
            item
        })
    }
}

#[async_trait]
impl<R: Resource> ResourceApi<R> for RestClient {
    async fn list(&self, query: &ListQuery) -> ClientResult<ListPage<R::Item>> {
        let envelope = self
            .get_envelope::<serde_json::Value>(R::PATH, &query.to_pairs())
            .await?;
        let data = envelope.data.ok_or_else(|| {
            ClientError::InvalidResponse(format!("{} list response has no data", R::LABEL))
        })?;
        let mut page = R::decode_list(data).map_err(|e| ClientError::InvalidResponse(e.to_string()))?;
        let resolve = |path: &str| self.asset_url(path);
        for item in &mut page.items {
            R::resolve_item(item, &resolve);
        }
        Ok(page)
    }

    async fn get(&self, id: i64) -> ClientResult<R::Detail> {
        let path = format!("{}/{id}", R::PATH);
        let mut detail = self
            .get_envelope::<R::Detail>(&path, &[])
            .await?
            .data
            .ok_or_else(|| ClientError::NotFound(format!("{} {id}", R::LABEL)))?;
        R::resolve_detail(&mut detail, &|path: &str| self.asset_url(path));
        Ok(detail)
    }

    async fn create(&self, payload: Payload) -> ClientResult<Option<R::Item>> {
        let envelope = self
            .send_envelope::<R::Item>(Method::POST, R::PATH, Some(payload))
            .await?;
        Ok(self.resolved::<R>(envelope.data))
    }

    async fn update(&self, id: i64, payload: Payload) -> ClientResult<Option<R::Item>> {
        let path = format!("{}/{id}", R::PATH);
        let envelope = self
            .send_envelope::<R::Item>(Method::PATCH, &path, Some(payload))
            .await?;
        Ok(self.resolved::<R>(envelope.data))
    }

    async fn delete(&self, id: i64) -> ClientResult<()> {
        let path = format!("{}/{id}", R::PATH);
        self.send_envelope::<serde_json::Value>(Method::DELETE, &path, None)
            .await?;
        Ok(())
    }

    async fn action(
        &self,
        action: &ActionSpec,
        id: Option<i64>,
        payload: Option<Payload>,
    ) -> ClientResult<serde_json::Value> {
        let path = action.path(R::PATH, id)?;
        let envelope = self
            .send_envelope::<serde_json::Value>(action.method.clone(), &path, payload)
            .await?;
        Ok(envelope.data.unwrap_or(serde_json::Value::Null))
    }
}
