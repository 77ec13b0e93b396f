//! One generic client for every REST collection

use std::marker::PhantomData;

use reqwest::Method;
use serde::Serialize;

use itms_core::{ListQuery, Page, Resource, StatusResource};

use crate::error::{ClientError, ClientResult};
use crate::transport::{RequestOptions, Transport};

/// CRUD operations on the collection of `R`
pub struct ResourceClient<R: Resource> {
    transport: Transport,
    _resource: PhantomData<fn() -> R>,
}

impl<R: Resource> Clone for ResourceClient<R> {
    fn clone(&self) -> Self {
        Self {
            transport: self.transport.clone(),
            _resource: PhantomData,
        }
    }
}

impl<R: Resource> std::fmt::Debug for ResourceClient<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResourceClient")
            .field("path", &R::PATH)
            .finish()
    }
}

#[derive(Serialize)]
struct StatusChange<S> {
    status: S,
}

impl<R: Resource> ResourceClient<R> {
    pub fn new(transport: Transport) -> Self {
        Self {
            transport,
            _resource: PhantomData,
        }
    }

    fn item_path(id: i64) -> String {
        format!("{}/{}", R::PATH, id)
    }

    /// `GET {path}`; the page envelope is returned as the backend sent it
    pub async fn list(&self, query: &ListQuery<R::Filter>) -> ClientResult<Page<R>> {
        tracing::debug!("Listing {} page {} (size {})", R::NAME, query.page, query.size);
        self.transport
            .request(Method::GET, R::PATH, RequestOptions::new().query(query)?)
            .await
    }

    pub async fn get(&self, id: i64) -> ClientResult<R> {
        self.transport.get(&Self::item_path(id)).await
    }

    pub async fn create(&self, request: &R::Create) -> ClientResult<R> {
        self.transport.post(R::PATH, request).await
    }

    /// Partial update; fields left `None` are not sent
    pub async fn update(&self, id: i64, request: &R::Update) -> ClientResult<R> {
        self.transport.put(&Self::item_path(id), request).await
    }

    pub async fn remove(&self, id: i64) -> ClientResult<()> {
        self.transport
            .execute(Method::DELETE, &Self::item_path(id), RequestOptions::new())
            .await?;
        tracing::debug!("Deleted {} {}", R::NAME, id);
        Ok(())
    }

    pub(crate) fn transport(&self) -> &Transport {
        &self.transport
    }
}

impl<R: StatusResource> ResourceClient<R> {
    /// `PUT {path}/{id}/status?status=..`, with the same status in the body.
    ///
    /// The backend binds the query parameter. Which transitions are allowed is
    /// decided there; a refusal surfaces as [`ClientError::InvalidTransition`].
    pub async fn transition_status(&self, id: i64, status: R::Status) -> ClientResult<R> {
        let path = format!("{}/status", Self::item_path(id));
        let change = StatusChange { status };
        let options = RequestOptions::new().query(&change)?.json(&change)?;
        let result = self.transport.request(Method::PUT, &path, options).await;

        result.map_err(|err| match err {
            ClientError::Api { status, error }
                if status == 409 || status == 422 || error.is_invalid_status() =>
            {
                ClientError::InvalidTransition(error)
            }
            other => other,
        })
    }
}
