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

//! Datastore Backend Plugin Traits
//!
//! This module defines the seam between the node's generic repo machinery and
//! external datastore backends (like the Mongo component in
//! `components/datastores/`).
//!
//! # Architecture
//!
//! - **Core** provides the datastore traits and a default in-memory
//!   implementation
//! - **External plugins** implement [`DatastorePlugin`] and register a config
//!   parser under a unique datastore type name
//! - The node's repo layer routes each `Datastore.Spec` entry to the parser
//!   registered for its `type` key, persists the resulting [`DiskSpec`], and
//!   calls [`DatastoreConfig::create`] to open the backend

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{Map, Value};
use thiserror::Error;

use super::{Datastore, StoreError};

/// The persisted, string-keyed form of a datastore configuration, written to
/// the node's on-disk repo spec. `BTreeMap` keeps the serialized form stable.
pub type DiskSpec = BTreeMap<String, String>;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("no {field} specified")]
    MissingField { field: &'static str },

    #[error("field '{field}' must be a {expected}")]
    WrongType {
        field: &'static str,
        expected: &'static str,
    },

    #[error("unable to parse {field}")]
    InvalidDuration {
        field: &'static str,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("unknown datastore type: '{0}'")]
    UnknownType(String),
}

/// A validated datastore configuration.
///
/// Produced once per configuration parse and immutable thereafter. Both
/// operations are pure reads of the parsed fields and may be called any
/// number of times, in any order.
#[async_trait]
pub trait DatastoreConfig: Send + Sync + std::fmt::Debug {
    /// The persistable form of this configuration. Always contains the
    /// backend's `type` key; optional fields at their unset value are
    /// omitted and reconstructed as unset on reparse.
    fn disk_spec(&self) -> DiskSpec;

    /// Create or open the datastore.
    ///
    /// `path` is the repo location supplied by the node; backends with no
    /// local file state ignore it. Engine errors are propagated unwrapped —
    /// retries, if any, belong to the engine or the host, not here.
    async fn create(&self, path: &Path) -> Result<Arc<dyn Datastore>, StoreError>;
}

/// Parser function turning an untyped configuration map into a validated
/// [`DatastoreConfig`].
pub type ConfigFromMap =
    Box<dyn Fn(&Map<String, Value>) -> Result<Arc<dyn DatastoreConfig>, ConfigError> + Send + Sync>;

/// Plugin trait for external datastore backends.
///
/// The two fixed host entry points: an identity pair ([`name`], [`version`])
/// plus the registration of a config parser under a unique
/// [`datastore_type_name`].
///
/// [`name`]: DatastorePlugin::name
/// [`version`]: DatastorePlugin::version
/// [`datastore_type_name`]: DatastorePlugin::datastore_type_name
pub trait DatastorePlugin: Send + Sync {
    /// The plugin's name.
    fn name(&self) -> &'static str;

    /// The plugin's version.
    fn version(&self) -> &'static str;

    /// Initialization hook, called once at registration. Most datastore
    /// plugins have nothing to do here.
    fn init(&self) -> Result<(), ConfigError> {
        Ok(())
    }

    /// The datastore's type name. Every backend must have a unique name;
    /// spec entries are routed to the parser registered under it.
    fn datastore_type_name(&self) -> &'static str;

    /// The configuration parser for this backend's spec entries.
    fn datastore_config_parser(&self) -> ConfigFromMap;
}
