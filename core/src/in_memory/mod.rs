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

//! In-memory default datastore.
//!
//! Used when no external backend is configured, and as a substitute engine
//! in tests. Volatile: contents are lost when the process exits.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use futures::{stream, StreamExt};
use tokio::sync::RwLock;

use crate::interface::{Batch, Datastore, Entry, EntryStream, Key, Query, StoreError};

type Inner = Arc<RwLock<BTreeMap<String, Vec<u8>>>>;

pub struct InMemoryDatastore {
    data: Inner,
}

impl Default for InMemoryDatastore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryDatastore {
    pub fn new() -> Self {
        Self {
            data: Arc::new(RwLock::new(BTreeMap::new())),
        }
    }

    pub async fn len(&self) -> usize {
        self.data.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.data.read().await.is_empty()
    }
}

#[async_trait]
impl Datastore for InMemoryDatastore {
    async fn get(&self, key: &Key) -> Result<Option<Vec<u8>>, StoreError> {
        Ok(self.data.read().await.get(key.as_str()).cloned())
    }

    async fn put(&self, key: &Key, value: Vec<u8>) -> Result<(), StoreError> {
        self.data.write().await.insert(key.as_str().to_string(), value);
        Ok(())
    }

    async fn delete(&self, key: &Key) -> Result<(), StoreError> {
        self.data.write().await.remove(key.as_str());
        Ok(())
    }

    async fn query(&self, query: Query) -> Result<EntryStream, StoreError> {
        let data = self.data.read().await;
        let prefix = query.prefix.as_ref().map(Key::as_str).unwrap_or("");
        let limit = query.limit.unwrap_or(usize::MAX);

        // BTreeMap iterates in key order, so entries come out sorted.
        let entries: Vec<Entry> = data
            .range(prefix.to_string()..)
            .take_while(|(k, _)| k.starts_with(prefix))
            .take(limit)
            .map(|(k, v)| Entry {
                key: Key::from(k.as_str()),
                value: v.clone(),
            })
            .collect();

        Ok(stream::iter(entries.into_iter().map(Ok)).boxed())
    }

    fn batch(&self) -> Result<Box<dyn Batch>, StoreError> {
        Ok(Box::new(InMemoryBatch {
            data: self.data.clone(),
            ops: Vec::new(),
        }))
    }
}

enum BatchOp {
    Put(Key, Vec<u8>),
    Delete(Key),
}

pub struct InMemoryBatch {
    data: Inner,
    ops: Vec<BatchOp>,
}

#[async_trait]
impl Batch for InMemoryBatch {
    fn put(&mut self, key: Key, value: Vec<u8>) {
        self.ops.push(BatchOp::Put(key, value));
    }

    fn delete(&mut self, key: Key) {
        self.ops.push(BatchOp::Delete(key));
    }

    async fn commit(self: Box<Self>) -> Result<(), StoreError> {
        let mut data = self.data.write().await;
        for op in self.ops {
            match op {
                BatchOp::Put(key, value) => {
                    data.insert(key.into_string(), value);
                }
                BatchOp::Delete(key) => {
                    data.remove(key.as_str());
                }
            }
        }
        Ok(())
    }
}
