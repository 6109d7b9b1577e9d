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

mod datastore;
mod plugin;

pub use datastore::Batch;
pub use datastore::Datastore;
pub use datastore::Entry;
pub use datastore::EntryResult;
pub use datastore::EntryStream;
pub use datastore::Key;
pub use datastore::Query;
pub use datastore::StoreError;
pub use plugin::ConfigError;
pub use plugin::ConfigFromMap;
pub use plugin::DatastoreConfig;
pub use plugin::DatastorePlugin;
pub use plugin::DiskSpec;
