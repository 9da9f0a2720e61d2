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


use std::collections::BTreeSet;

use kasus_core::error::Fallible;
use kasus_core::store::PROGRESS_NAMESPACE;
use kasus_core::store::ProgressStore;
use kasus_core::types::content_key::ContentKey;

use crate::cmd::open_collection;
use crate::collection::Catalog;
use crate::db::Database;
use crate::loader::read_dataset;

pub fn list_orphans(directory: Option<String>) -> Fallible<()> {
    let (catalog, store) = open_collection(directory)?;
    for (dataset, keys) in find_orphans(&catalog, &store)? {
        for key in keys {
            println!("{dataset}\t{key}");
        }
    }
    Ok(())
}

pub fn delete_orphans(directory: Option<String>) -> Fallible<()> {
    let (catalog, mut store) = open_collection(directory)?;
    let mut total = 0;
    for dataset_id in store.inner().keys(PROGRESS_NAMESPACE)? {
        let Some(valid) = valid_keys(&catalog, &dataset_id) else {
            continue;
        };
        let mut snapshot = store.load(&dataset_id);
        let removed = snapshot.prune(&valid.iter().collect());
        if removed > 0 {
            store.save(&dataset_id, &snapshot);
            log::debug!("Removed {removed} orphan keys from '{dataset_id}'");
            total += removed;
        }
    }
    println!("Deleted {total} orphan keys.");
    Ok(())
}

/// Progress keys matching no item, per dataset.
fn find_orphans(
    catalog: &Catalog,
    store: &ProgressStore<Database>,
) -> Fallible<Vec<(String, BTreeSet<ContentKey>)>> {
    let mut result = Vec::new();
    for dataset_id in store.inner().keys(PROGRESS_NAMESPACE)? {
        let Some(valid) = valid_keys(catalog, &dataset_id) else {
            continue;
        };
        let orphans = store.load(&dataset_id).orphans(&valid.iter().collect());
        if !orphans.is_empty() {
            result.push((dataset_id, orphans));
        }
    }
    Ok(result)
}

/// The keys a dataset's progress may refer to. A dataset no longer in the
/// collection has none. `None` if the dataset exists but cannot be loaded,
/// since its keys cannot be checked.
fn valid_keys(catalog: &Catalog, dataset_id: &str) -> Option<BTreeSet<ContentKey>> {
    let Some(entry) = catalog.dataset(dataset_id) else {
        return Some(BTreeSet::new());
    };
    match read_dataset(entry) {
        Ok(dataset) => Some(dataset.keys().iter().cloned().collect()),
        Err(e) => {
            log::warn!("Skipping '{dataset_id}': {e}");
            None
        }
    }
}
