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

//! Core datastore traits for the cask node.
//!
//! This crate defines the node-facing seam external datastore backends plug
//! into: the generic [`interface::Datastore`] capability set, the
//! [`interface::DatastorePlugin`] registration contract, and the
//! [`registry::DatastoreRegistry`] that routes persisted spec entries to the
//! backend that understands them. A volatile [`in_memory::InMemoryDatastore`]
//! is provided as the default when no backend is configured.

pub mod in_memory;
pub mod interface;
pub mod registry;
