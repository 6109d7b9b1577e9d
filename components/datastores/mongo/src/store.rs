// Copyright 2026 The Cask Authors.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! MongoDB-backed datastore.
//!
//! Documents are stored as `{ "_id": <key>, "v": <binary> }` in a single
//! collection. The configured operation timeout bounds each single
//! read/write; the transaction timeout bounds a batch commit.

use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use futures::StreamExt;
use mongodb::bson::{doc, spec::BinarySubtype, Binary, Document};
use mongodb::{Client, Collection};

use cask_core::interface::{Batch, Datastore, Entry, EntryStream, Key, Query, StoreError};

const DEFAULT_COLL_NAME: &str = "kv";
const ID_FIELD: &str = "_id";
const VALUE_FIELD: &str = "v";

/// Options for opening a [`MongoStore`]. Unset fields fall back to engine
/// defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MongoStoreOptions {
    pub coll_name: Option<String>,
    pub op_timeout: Option<Duration>,
    pub txn_timeout: Option<Duration>,
}

impl MongoStoreOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the collection name (default `"kv"`).
    pub fn with_coll_name(mut self, coll_name: impl Into<String>) -> Self {
        self.coll_name = Some(coll_name.into());
        self
    }

    /// Bound each single read/write operation.
    pub fn with_op_timeout(mut self, op_timeout: Duration) -> Self {
        self.op_timeout = Some(op_timeout);
        self
    }

    /// Bound each batch commit.
    pub fn with_txn_timeout(mut self, txn_timeout: Duration) -> Self {
        self.txn_timeout = Some(txn_timeout);
        self
    }
}

/// A datastore backed by a MongoDB collection.
pub struct MongoStore {
    collection: Collection<Document>,
    op_timeout: Option<Duration>,
    txn_timeout: Option<Duration>,
}

impl MongoStore {
    /// Connect to the MongoDB deployment at `uri` and open the datastore
    /// collection in `db_name`.
    ///
    /// Driver connections are established lazily, so an unreachable endpoint
    /// typically surfaces on the first operation rather than here.
    pub async fn connect(
        uri: &str,
        db_name: &str,
        options: MongoStoreOptions,
    ) -> Result<Self, StoreError> {
        let client = Client::with_uri_str(uri)
            .await
            .map_err(StoreError::connection_failed)?;

        let coll_name = options.coll_name.as_deref().unwrap_or(DEFAULT_COLL_NAME);
        let collection = client.database(db_name).collection::<Document>(coll_name);

        log::info!("Opened mongostore datastore (db: {db_name}, collection: {coll_name})");

        Ok(Self {
            collection,
            op_timeout: options.op_timeout,
            txn_timeout: options.txn_timeout,
        })
    }

    async fn guarded<T, F>(&self, fut: F) -> Result<T, StoreError>
    where
        F: Future<Output = Result<T, mongodb::error::Error>> + Send,
    {
        run_with_timeout(self.op_timeout, fut).await
    }
}

#[async_trait]
impl Datastore for MongoStore {
    async fn get(&self, key: &Key) -> Result<Option<Vec<u8>>, StoreError> {
        let filter = doc! { ID_FIELD: key.as_str() };
        let collection = self.collection.clone();
        let found = self
            .guarded(async move { collection.find_one(filter).await })
            .await?;

        match found {
            Some(document) => decode_value(key.as_str(), &document).map(Some),
            None => Ok(None),
        }
    }

    async fn put(&self, key: &Key, value: Vec<u8>) -> Result<(), StoreError> {
        let filter = doc! { ID_FIELD: key.as_str() };
        let replacement = encode_entry(key.as_str(), value);
        let collection = self.collection.clone();
        self.guarded(async move {
            collection
                .replace_one(filter, replacement)
                .upsert(true)
                .await
                .map(|_| ())
        })
        .await
    }

    async fn delete(&self, key: &Key) -> Result<(), StoreError> {
        let filter = doc! { ID_FIELD: key.as_str() };
        let collection = self.collection.clone();
        self.guarded(async move { collection.delete_one(filter).await.map(|_| ()) })
            .await
    }

    async fn query(&self, query: Query) -> Result<EntryStream, StoreError> {
        let filter = match &query.prefix {
            Some(prefix) => doc! {
                ID_FIELD: doc! { "$regex": format!("^{}", escape_regex(prefix.as_str())) }
            },
            None => doc! {},
        };

        let mut find = self.collection.find(filter).sort(doc! { ID_FIELD: 1 });
        if let Some(limit) = query.limit {
            find = find.limit(limit as i64);
        }

        // The operation timeout bounds obtaining the cursor; streaming the
        // results is paced by the caller.
        let cursor = self.guarded(async move { find.await }).await?;

        let stream = cursor
            .map(|item| match item {
                Ok(document) => {
                    let key = document
                        .get_str(ID_FIELD)
                        .map_err(|_| {
                            StoreError::CorruptedData("document without string _id".to_string())
                        })?
                        .to_string();
                    let value = decode_value(&key, &document)?;
                    Ok(Entry {
                        key: Key::from(key),
                        value,
                    })
                }
                Err(e) => Err(StoreError::other(e)),
            })
            .boxed();

        Ok(stream)
    }

    fn batch(&self) -> Result<Box<dyn Batch>, StoreError> {
        Ok(Box::new(MongoBatch {
            collection: self.collection.clone(),
            txn_timeout: self.txn_timeout,
            ops: Vec::new(),
        }))
    }
}

enum BatchOp {
    Put(Key, Vec<u8>),
    Delete(Key),
}

/// Buffered writes flushed together under the transaction timeout.
pub struct MongoBatch {
    collection: Collection<Document>,
    txn_timeout: Option<Duration>,
    ops: Vec<BatchOp>,
}

#[async_trait]
impl Batch for MongoBatch {
    fn put(&mut self, key: Key, value: Vec<u8>) {
        self.ops.push(BatchOp::Put(key, value));
    }

    fn delete(&mut self, key: Key) {
        self.ops.push(BatchOp::Delete(key));
    }

    async fn commit(self: Box<Self>) -> Result<(), StoreError> {
        let MongoBatch {
            collection,
            txn_timeout,
            ops,
        } = *self;

        run_with_timeout(txn_timeout, async move {
            for op in ops {
                match op {
                    BatchOp::Put(key, value) => {
                        let filter = doc! { ID_FIELD: key.as_str() };
                        let replacement = encode_entry(key.as_str(), value);
                        collection
                            .replace_one(filter, replacement)
                            .upsert(true)
                            .await?;
                    }
                    BatchOp::Delete(key) => {
                        collection.delete_one(doc! { ID_FIELD: key.as_str() }).await?;
                    }
                }
            }
            Ok(())
        })
        .await
    }
}

async fn run_with_timeout<T, F>(limit: Option<Duration>, fut: F) -> Result<T, StoreError>
where
    F: Future<Output = Result<T, mongodb::error::Error>> + Send,
{
    match limit {
        Some(limit) => match tokio::time::timeout(limit, fut).await {
            Ok(result) => result.map_err(StoreError::other),
            Err(_) => Err(StoreError::Timeout(limit)),
        },
        None => fut.await.map_err(StoreError::other),
    }
}

fn encode_entry(key: &str, value: Vec<u8>) -> Document {
    doc! {
        ID_FIELD: key,
        VALUE_FIELD: Binary {
            subtype: BinarySubtype::Generic,
            bytes: value,
        },
    }
}

fn decode_value(key: &str, document: &Document) -> Result<Vec<u8>, StoreError> {
    document
        .get_binary_generic(VALUE_FIELD)
        .cloned()
        .map_err(|_| StoreError::CorruptedData(format!("no binary value for key {key}")))
}

fn escape_regex(s: &str) -> String {
    let mut escaped = String::with_capacity(s.len());
    for c in s.chars() {
        if matches!(
            c,
            '\\' | '.' | '+' | '*' | '?' | '(' | ')' | '[' | ']' | '{' | '}' | '^' | '$' | '|'
        ) {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}
