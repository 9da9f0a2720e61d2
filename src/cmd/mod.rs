// Copyright 2025 Fernando Borretti
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


pub mod check;
pub mod drill;
pub mod export;
pub mod orphans;
pub mod reset;
pub mod stats;

use kasus_core::error::Fallible;
use kasus_core::store::ProgressStore;

use crate::collection::Catalog;
use crate::collection::Collection;
use crate::db::Database;

/// Open a collection for a maintenance command.
fn open_collection(directory: Option<String>) -> Fallible<(Catalog, ProgressStore<Database>)> {
    let Collection { db, catalog, .. } = Collection::new(directory)?;
    Ok((catalog, ProgressStore::new(db)))
}
