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

use std::sync::Arc;

use cask_core::interface::{ConfigFromMap, DatastoreConfig, DatastorePlugin};

use crate::config::MongoStoreConfig;

/// This datastore's type name, used to identify the datastore in the node's
/// datastore config.
pub const DATASTORE_TYPE: &str = "mongostore";

/// The `mongostore` datastore backend plugin.
pub struct MongostorePlugin;

impl DatastorePlugin for MongostorePlugin {
    fn name(&self) -> &'static str {
        "ds-mongostore"
    }

    fn version(&self) -> &'static str {
        "0.2.0"
    }

    fn datastore_type_name(&self) -> &'static str {
        DATASTORE_TYPE
    }

    fn datastore_config_parser(&self) -> ConfigFromMap {
        Box::new(|params| {
            let config = MongoStoreConfig::from_params(params)?;
            Ok(Arc::new(config) as Arc<dyn DatastoreConfig>)
        })
    }
}
