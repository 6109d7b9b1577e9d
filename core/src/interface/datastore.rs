use std::{fmt::Display, pin::Pin, time::Duration};

use async_trait::async_trait;
use futures::Stream;
use thiserror::Error;

/// A datastore key. Keys are path-like strings (e.g. `/blocks/CIQ...`),
/// ordered lexicographically so prefix queries select contiguous ranges.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Key(String);

impl Key {
    pub fn new(key: impl Into<String>) -> Self {
        Key(key.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl From<&str> for Key {
    fn from(key: &str) -> Self {
        Key(key.to_string())
    }
}

impl From<String> for Key {
    fn from(key: String) -> Self {
        Key(key)
    }
}

impl Display for Key {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// One key/value pair produced by a [`Datastore::query`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub key: Key,
    pub value: Vec<u8>,
}

pub type EntryResult = Result<Entry, StoreError>;
pub type EntryStream = Pin<Box<dyn Stream<Item = EntryResult> + Send>>;

/// Range query selector: all entries whose key starts with `prefix`
/// (everything when `prefix` is `None`), up to `limit` entries.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Query {
    pub prefix: Option<Key>,
    pub limit: Option<usize>,
}

impl Query {
    pub fn all() -> Self {
        Query::default()
    }

    pub fn with_prefix(mut self, prefix: impl Into<Key>) -> Self {
        self.prefix = Some(prefix.into());
        self
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }
}

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("connection failed: {0}")]
    ConnectionFailed(Box<dyn std::error::Error + Send + Sync>),

    #[error("operation timed out after {0:?}")]
    Timeout(Duration),

    #[error("corrupted data: {0}")]
    CorruptedData(String),

    #[error(transparent)]
    Other(Box<dyn std::error::Error + Send + Sync>),
}

impl StoreError {
    pub fn connection_failed<E: std::error::Error + Send + Sync + 'static>(e: E) -> Self {
        StoreError::ConnectionFailed(Box::new(e))
    }

    pub fn other<E: std::error::Error + Send + Sync + 'static>(e: E) -> Self {
        StoreError::Other(Box::new(e))
    }
}

/// The host's generic datastore capability set. Backends must be shareable
/// across async tasks; each method is all-or-nothing with no internal retry.
#[async_trait]
pub trait Datastore: Send + Sync {
    /// Fetch the value stored under `key`, or `None` if the key is absent.
    async fn get(&self, key: &Key) -> Result<Option<Vec<u8>>, StoreError>;

    /// Store `value` under `key`, replacing any existing value.
    async fn put(&self, key: &Key, value: Vec<u8>) -> Result<(), StoreError>;

    /// Remove `key`. Deleting an absent key is not an error.
    async fn delete(&self, key: &Key) -> Result<(), StoreError>;

    /// Stream all entries selected by `query`, in key order.
    async fn query(&self, query: Query) -> Result<EntryStream, StoreError>;

    /// Open a write batch. Mutations are buffered until [`Batch::commit`].
    fn batch(&self) -> Result<Box<dyn Batch>, StoreError>;
}

/// A buffered set of writes applied together on commit.
#[async_trait]
pub trait Batch: Send {
    fn put(&mut self, key: Key, value: Vec<u8>);

    fn delete(&mut self, key: Key);

    async fn commit(self: Box<Self>) -> Result<(), StoreError>;
}
