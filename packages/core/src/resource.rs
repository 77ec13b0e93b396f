// ABOUTME: Traits binding an entity record to its REST collection and request records
// ABOUTME: One impl per entity replaces a hand-written client module per entity

use std::fmt::{Debug, Display};

use serde::{de::DeserializeOwned, Serialize};

/// An entity served from a REST collection.
///
/// `PATH` is the collection path relative to the API base URL
/// (`/projects`); item paths are `{PATH}/{id}`.
pub trait Resource: DeserializeOwned + Debug + Clone + Send + Sync + 'static {
    /// Collection path, e.g. `/projects`
    const PATH: &'static str;

    /// Human readable singular name used in messages
    const NAME: &'static str;

    /// Record sent on `POST {PATH}`
    type Create: Serialize + Debug + Send + Sync;

    /// Record sent on `PUT {PATH}/{id}`; absent fields keep the server value
    type Update: Serialize + Debug + Default + Send + Sync;

    /// Entity specific list filters, flattened into the list query string
    type Filter: Serialize + Debug + Default + Clone + PartialEq + Send + Sync + 'static;

    /// Server-assigned surrogate id
    fn id(&self) -> i64;
}

/// An entity with a server-owned status workflow (`PUT {PATH}/{id}/status`)
pub trait StatusResource: Resource {
    type Status: Serialize + DeserializeOwned + Display + Debug + Copy + PartialEq + Send + Sync;

    fn status(&self) -> Self::Status;
}
