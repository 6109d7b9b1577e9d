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

//! MongoDB Datastore Backend Plugin
//!
//! This crate provides the `mongostore` datastore backend: node block and
//! metadata storage in a MongoDB collection instead of local files.
//!
//! # Architecture
//!
//! - [`MongostorePlugin`] registers the backend under the `mongostore` type
//!   name so spec entries reach [`MongoStoreConfig::from_params`]
//! - [`MongoStoreConfig`] is the validated configuration: it serializes back
//!   to a disk spec and opens a live [`MongoStore`]
//! - [`MongoStore`] wraps the MongoDB driver behind the node's generic
//!   [`Datastore`](cask_core::interface::Datastore) capability set
//!
//! # Example
//!
//! ```ignore
//! use cask_core::registry::DatastoreRegistry;
//! use cask_datastore_mongo::plugins;
//!
//! let mut registry = DatastoreRegistry::new();
//! for plugin in plugins() {
//!     registry.register(plugin)?;
//! }
//! ```

use std::sync::Arc;

use cask_core::interface::DatastorePlugin;

mod config;
mod plugin;
mod store;

pub use config::MongoStoreConfig;
pub use config::Strictness;
pub use plugin::MongostorePlugin;
pub use plugin::DATASTORE_TYPE;
pub use store::MongoStore;
pub use store::MongoStoreOptions;

/// The datastore plugins exported by this crate, ready for host registration.
pub fn plugins() -> Vec<Arc<dyn DatastorePlugin>> {
    vec![Arc::new(MongostorePlugin)]
}
