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

//! Mongostore configuration: parsing, disk-spec serialization, construction.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::{Map, Value};

use cask_core::interface::{ConfigError, Datastore, DatastoreConfig, DiskSpec, StoreError};

use crate::plugin::DATASTORE_TYPE;
use crate::store::{MongoStore, MongoStoreOptions};

/// How to treat optional keys that are present but not strings.
///
/// Historically the parser silently ignored a wrong-typed optional key
/// (`collName: 42` parsed the same as no `collName` at all) while rejecting
/// wrong-typed required keys. [`Strictness::Lax`] keeps that behavior for
/// compatibility with existing node configs; [`Strictness::Strict`] turns it
/// into a [`ConfigError::WrongType`] failure.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Strictness {
    #[default]
    Lax,
    Strict,
}

/// Validated configuration for a `mongostore` datastore.
///
/// `None` optionals mean "use the engine default" and are omitted from the
/// disk spec; a parsed spec round-trips field for field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MongoStoreConfig {
    pub uri: String,
    pub db_name: String,
    pub coll_name: Option<String>,
    pub op_timeout: Option<Duration>,
    pub txn_timeout: Option<Duration>,
}

impl MongoStoreConfig {
    /// Parse an untyped configuration map with the compatible
    /// [`Strictness::Lax`] policy.
    pub fn from_params(params: &Map<String, Value>) -> Result<Self, ConfigError> {
        Self::from_params_with(params, Strictness::Lax)
    }

    /// Parse an untyped configuration map.
    ///
    /// Required keys: `uri` and `dbName`, both non-empty strings. Optional
    /// keys: `collName` (string), `opTimeout` and `txnTimeout` (duration
    /// strings such as `"30s"` or `"1h 2m 3s"`). Unknown keys are ignored.
    /// Pure: identical input always yields the identical result.
    pub fn from_params_with(
        params: &Map<String, Value>,
        strictness: Strictness,
    ) -> Result<Self, ConfigError> {
        Ok(MongoStoreConfig {
            uri: required_str(params, "uri")?,
            db_name: required_str(params, "dbName")?,
            coll_name: optional_str(params, "collName", strictness)?
                .filter(|s| !s.is_empty())
                .map(str::to_string),
            op_timeout: optional_duration(params, "opTimeout", strictness)?,
            txn_timeout: optional_duration(params, "txnTimeout", strictness)?,
        })
    }

    /// The construction options implied by the set optional fields.
    pub fn store_options(&self) -> MongoStoreOptions {
        let mut opts = MongoStoreOptions::new();
        if let Some(coll_name) = &self.coll_name {
            opts = opts.with_coll_name(coll_name);
        }
        if let Some(op_timeout) = self.op_timeout {
            opts = opts.with_op_timeout(op_timeout);
        }
        if let Some(txn_timeout) = self.txn_timeout {
            opts = opts.with_txn_timeout(txn_timeout);
        }
        opts
    }
}

#[async_trait]
impl DatastoreConfig for MongoStoreConfig {
    fn disk_spec(&self) -> DiskSpec {
        let mut spec = DiskSpec::new();
        spec.insert("type".to_string(), DATASTORE_TYPE.to_string());
        spec.insert("uri".to_string(), self.uri.clone());
        spec.insert("dbName".to_string(), self.db_name.clone());

        if let Some(coll_name) = &self.coll_name {
            spec.insert("collName".to_string(), coll_name.clone());
        }
        if let Some(op_timeout) = self.op_timeout {
            spec.insert(
                "opTimeout".to_string(),
                humantime::format_duration(op_timeout).to_string(),
            );
        }
        if let Some(txn_timeout) = self.txn_timeout {
            spec.insert(
                "txnTimeout".to_string(),
                humantime::format_duration(txn_timeout).to_string(),
            );
        }

        spec
    }

    /// Create or open the datastore. `path` is unused: this backend keeps no
    /// local file state.
    async fn create(&self, _path: &Path) -> Result<Arc<dyn Datastore>, StoreError> {
        let store = MongoStore::connect(&self.uri, &self.db_name, self.store_options()).await?;
        Ok(Arc::new(store))
    }
}

fn required_str(params: &Map<String, Value>, field: &'static str) -> Result<String, ConfigError> {
    match params.get(field).and_then(Value::as_str) {
        Some(s) if !s.is_empty() => Ok(s.to_string()),
        _ => Err(ConfigError::MissingField { field }),
    }
}

fn optional_str<'a>(
    params: &'a Map<String, Value>,
    field: &'static str,
    strictness: Strictness,
) -> Result<Option<&'a str>, ConfigError> {
    match params.get(field) {
        None => Ok(None),
        Some(Value::String(s)) => Ok(Some(s)),
        Some(other) => match strictness {
            Strictness::Lax => {
                log::warn!("mongostore: ignoring non-string '{field}' value: {other}");
                Ok(None)
            }
            Strictness::Strict => Err(ConfigError::WrongType {
                field,
                expected: "string",
            }),
        },
    }
}

fn optional_duration(
    params: &Map<String, Value>,
    field: &'static str,
    strictness: Strictness,
) -> Result<Option<Duration>, ConfigError> {
    let raw = match optional_str(params, field, strictness)? {
        Some(raw) => raw,
        None => return Ok(None),
    };

    let parsed = humantime::parse_duration(raw).map_err(|e| ConfigError::InvalidDuration {
        field,
        source: Box::new(e),
    })?;

    // Zero is the "use engine default" sentinel, never a configured value.
    Ok((parsed > Duration::ZERO).then_some(parsed))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn params(value: Value) -> Map<String, Value> {
        value.as_object().unwrap().clone()
    }

    fn spec_params(spec: &DiskSpec) -> Map<String, Value> {
        spec.iter()
            .map(|(k, v)| (k.clone(), Value::String(v.clone())))
            .collect()
    }

    mod parse {
        use super::*;

        #[test]
        fn test_minimal_config() {
            let config = MongoStoreConfig::from_params(&params(json!({
                "uri": "mongodb://localhost:27017",
                "dbName": "ipfs"
            })))
            .unwrap();

            assert_eq!(config.uri, "mongodb://localhost:27017");
            assert_eq!(config.db_name, "ipfs");
            assert_eq!(config.coll_name, None);
            assert_eq!(config.op_timeout, None);
            assert_eq!(config.txn_timeout, None);
        }

        #[test]
        fn test_full_config() {
            let config = MongoStoreConfig::from_params(&params(json!({
                "uri": "mongodb://h",
                "dbName": "d",
                "collName": "blocks",
                "opTimeout": "30s",
                "txnTimeout": "2m"
            })))
            .unwrap();

            assert_eq!(config.coll_name.as_deref(), Some("blocks"));
            assert_eq!(config.op_timeout, Some(Duration::from_secs(30)));
            assert_eq!(config.txn_timeout, Some(Duration::from_secs(120)));
        }

        #[test]
        fn test_missing_uri() {
            let err = MongoStoreConfig::from_params(&params(json!({"dbName": "d"}))).unwrap_err();
            match err {
                ConfigError::MissingField { field } => assert_eq!(field, "uri"),
                other => panic!("expected MissingField, got {other:?}"),
            }
        }

        #[test]
        fn test_missing_db_name() {
            let err =
                MongoStoreConfig::from_params(&params(json!({"uri": "mongodb://h"}))).unwrap_err();
            match err {
                ConfigError::MissingField { field } => assert_eq!(field, "dbName"),
                other => panic!("expected MissingField, got {other:?}"),
            }
        }

        #[test]
        fn test_wrong_typed_required_field() {
            let err = MongoStoreConfig::from_params(&params(json!({
                "uri": 42,
                "dbName": "d"
            })))
            .unwrap_err();
            assert!(matches!(err, ConfigError::MissingField { field: "uri" }));
        }

        #[test]
        fn test_empty_required_field() {
            let err = MongoStoreConfig::from_params(&params(json!({
                "uri": "",
                "dbName": "d"
            })))
            .unwrap_err();
            assert!(matches!(err, ConfigError::MissingField { field: "uri" }));
        }

        #[test]
        fn test_invalid_op_timeout() {
            let err = MongoStoreConfig::from_params(&params(json!({
                "uri": "mongodb://h",
                "dbName": "d",
                "opTimeout": "notaduration"
            })))
            .unwrap_err();
            match err {
                ConfigError::InvalidDuration { field, .. } => assert_eq!(field, "opTimeout"),
                other => panic!("expected InvalidDuration, got {other:?}"),
            }
        }

        #[test]
        fn test_invalid_txn_timeout() {
            let err = MongoStoreConfig::from_params(&params(json!({
                "uri": "mongodb://h",
                "dbName": "d",
                "txnTimeout": "banana"
            })))
            .unwrap_err();
            match err {
                ConfigError::InvalidDuration { field, .. } => assert_eq!(field, "txnTimeout"),
                other => panic!("expected InvalidDuration, got {other:?}"),
            }
        }

        #[test]
        fn test_zero_duration_is_unset() {
            let config = MongoStoreConfig::from_params(&params(json!({
                "uri": "mongodb://h",
                "dbName": "d",
                "opTimeout": "0s"
            })))
            .unwrap();
            assert_eq!(config.op_timeout, None);
        }

        #[test]
        fn test_unknown_keys_ignored() {
            let config = MongoStoreConfig::from_params(&params(json!({
                "uri": "mongodb://h",
                "dbName": "d",
                "compression": "zstd"
            })))
            .unwrap();
            assert_eq!(config.db_name, "d");
        }

        #[test]
        fn test_lax_ignores_wrong_typed_coll_name() {
            let config = MongoStoreConfig::from_params(&params(json!({
                "uri": "mongodb://h",
                "dbName": "d",
                "collName": 42
            })))
            .unwrap();
            assert_eq!(config.coll_name, None);
        }

        #[test]
        fn test_strict_rejects_wrong_typed_coll_name() {
            let err = MongoStoreConfig::from_params_with(
                &params(json!({
                    "uri": "mongodb://h",
                    "dbName": "d",
                    "collName": 42
                })),
                Strictness::Strict,
            )
            .unwrap_err();
            match err {
                ConfigError::WrongType { field, expected } => {
                    assert_eq!(field, "collName");
                    assert_eq!(expected, "string");
                }
                other => panic!("expected WrongType, got {other:?}"),
            }
        }

        #[test]
        fn test_lax_ignores_wrong_typed_timeout() {
            let config = MongoStoreConfig::from_params(&params(json!({
                "uri": "mongodb://h",
                "dbName": "d",
                "opTimeout": 30
            })))
            .unwrap();
            assert_eq!(config.op_timeout, None);
        }

        #[test]
        fn test_deterministic() {
            let input = params(json!({
                "uri": "mongodb://h",
                "dbName": "d",
                "opTimeout": "45s"
            }));
            let a = MongoStoreConfig::from_params(&input).unwrap();
            let b = MongoStoreConfig::from_params(&input).unwrap();
            assert_eq!(a, b);
        }
    }

    mod disk_spec {
        use super::*;

        #[test]
        fn test_minimal_spec_omits_unset_optionals() {
            let config = MongoStoreConfig::from_params(&params(json!({
                "uri": "mongodb://localhost:27017",
                "dbName": "ipfs"
            })))
            .unwrap();

            let spec = config.disk_spec();
            assert_eq!(spec.get("type").map(String::as_str), Some("mongostore"));
            assert_eq!(
                spec.get("uri").map(String::as_str),
                Some("mongodb://localhost:27017")
            );
            assert_eq!(spec.get("dbName").map(String::as_str), Some("ipfs"));
            assert!(!spec.contains_key("collName"));
            assert!(!spec.contains_key("opTimeout"));
            assert!(!spec.contains_key("txnTimeout"));
            assert_eq!(spec.len(), 3);
        }

        #[test]
        fn test_partial_spec() {
            let config = MongoStoreConfig::from_params(&params(json!({
                "uri": "mongodb://h",
                "dbName": "d",
                "opTimeout": "30s",
                "collName": "blocks"
            })))
            .unwrap();

            let spec = config.disk_spec();
            assert_eq!(spec.get("opTimeout").map(String::as_str), Some("30s"));
            assert_eq!(spec.get("collName").map(String::as_str), Some("blocks"));
            assert!(!spec.contains_key("txnTimeout"));
        }

        #[test]
        fn test_idempotent() {
            let config = MongoStoreConfig::from_params(&params(json!({
                "uri": "mongodb://h",
                "dbName": "d",
                "txnTimeout": "90s"
            })))
            .unwrap();
            assert_eq!(config.disk_spec(), config.disk_spec());
        }

        #[test]
        fn test_round_trip() {
            let original = MongoStoreConfig::from_params(&params(json!({
                "uri": "mongodb://h:27017",
                "dbName": "d",
                "collName": "blocks",
                "opTimeout": "30s",
                "txnTimeout": "1h 2m 3s"
            })))
            .unwrap();

            let reparsed =
                MongoStoreConfig::from_params(&spec_params(&original.disk_spec())).unwrap();
            assert_eq!(reparsed, original);
        }

        #[test]
        fn test_round_trip_keeps_optionals_unset() {
            let original = MongoStoreConfig::from_params(&params(json!({
                "uri": "mongodb://h",
                "dbName": "d"
            })))
            .unwrap();

            let reparsed =
                MongoStoreConfig::from_params(&spec_params(&original.disk_spec())).unwrap();
            assert_eq!(reparsed, original);
            assert_eq!(reparsed.op_timeout, None);
            assert_eq!(reparsed.txn_timeout, None);
            assert_eq!(reparsed.coll_name, None);
        }
    }

    mod construction {
        use super::*;

        #[test]
        fn test_store_options_from_set_fields() {
            let config = MongoStoreConfig::from_params(&params(json!({
                "uri": "mongodb://h",
                "dbName": "d",
                "collName": "blocks",
                "opTimeout": "30s"
            })))
            .unwrap();

            let opts = config.store_options();
            assert_eq!(opts.coll_name.as_deref(), Some("blocks"));
            assert_eq!(opts.op_timeout, Some(Duration::from_secs(30)));
            assert_eq!(opts.txn_timeout, None);
        }

        #[test]
        fn test_store_options_default_when_unset() {
            let config = MongoStoreConfig::from_params(&params(json!({
                "uri": "mongodb://h",
                "dbName": "d"
            })))
            .unwrap();
            assert_eq!(config.store_options(), MongoStoreOptions::new());
        }
    }
}
