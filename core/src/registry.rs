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

//! Datastore Plugin Registry
//!
//! This module provides a registry mapping datastore type names to registered
//! plugins, so the node's generic config-loading machinery can route each
//! spec entry to the parser that understands it.
//!
//! # Example
//!
//! ```ignore
//! use cask_core::registry::DatastoreRegistry;
//! use cask_datastore_mongo::MongostorePlugin;
//!
//! let mut registry = DatastoreRegistry::new();
//! registry.register(Arc::new(MongostorePlugin))?;
//!
//! let config = registry.parse(spec.as_object().unwrap())?;
//! let store = config.create(repo_path).await?;
//! ```

use std::collections::HashMap;
use std::sync::Arc;

use serde_json::{Map, Value};

use crate::interface::{ConfigError, DatastoreConfig, DatastorePlugin};

/// Registry of datastore backend plugins, keyed by datastore type name.
pub struct DatastoreRegistry {
    plugins: HashMap<&'static str, Arc<dyn DatastorePlugin>>,
}

impl Default for DatastoreRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl DatastoreRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self {
            plugins: HashMap::new(),
        }
    }

    /// Register a plugin under its datastore type name, running its `init`
    /// hook. A later registration with the same type name replaces the
    /// earlier one.
    pub fn register(&mut self, plugin: Arc<dyn DatastorePlugin>) -> Result<(), ConfigError> {
        plugin.init()?;
        log::debug!(
            "Registered datastore plugin {} {} for type '{}'",
            plugin.name(),
            plugin.version(),
            plugin.datastore_type_name()
        );
        self.plugins.insert(plugin.datastore_type_name(), plugin);
        Ok(())
    }

    /// Parse a persisted spec map into a validated datastore configuration.
    ///
    /// Routes on the spec's `type` key.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The spec has no `type` string key
    /// - No plugin is registered for the type
    /// - The plugin's parser rejects the spec
    pub fn parse(&self, spec: &Map<String, Value>) -> Result<Arc<dyn DatastoreConfig>, ConfigError> {
        let type_name = spec
            .get("type")
            .and_then(Value::as_str)
            .ok_or(ConfigError::MissingField { field: "type" })?;

        let plugin = self
            .plugins
            .get(type_name)
            .ok_or_else(|| ConfigError::UnknownType(type_name.to_string()))?;

        (plugin.datastore_config_parser())(spec)
    }

    /// Check if a plugin is registered for a datastore type.
    pub fn has_plugin(&self, type_name: &str) -> bool {
        self.plugins.contains_key(type_name)
    }

    /// Get a list of registered datastore types.
    pub fn registered_types(&self) -> Vec<&str> {
        self.plugins.keys().copied().collect()
    }
}
