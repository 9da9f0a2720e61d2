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


use std::collections::BTreeMap;

use kasus_core::error::Fallible;
use kasus_core::progress::ProgressSnapshot;
use kasus_core::store::KeyValueStore;
use kasus_core::store::PROGRESS_NAMESPACE;
use kasus_core::store::ProgressStore;
use kasus_core::store::SETTINGS_NAMESPACE;
use serde::Serialize;

use crate::cmd::open_collection;
use crate::db::Database;

#[derive(Serialize)]
struct Export {
    settings: BTreeMap<String, String>,
    progress: BTreeMap<String, ProgressSnapshot>,
}

pub fn export_collection(directory: Option<String>, output: Option<String>) -> Fallible<()> {
    let (_, store) = open_collection(directory)?;
    let json = export_json(&store)?;
    match output {
        Some(path) => std::fs::write(path, json)?,
        None => println!("{json}"),
    }
    Ok(())
}

fn export_json(store: &ProgressStore<Database>) -> Fallible<String> {
    let db = store.inner();
    let mut settings = BTreeMap::new();
    for key in db.keys(SETTINGS_NAMESPACE)? {
        if let Some(value) = db.get(SETTINGS_NAMESPACE, &key)? {
            settings.insert(key, value);
        }
    }
    let mut progress = BTreeMap::new();
    for dataset_id in db.keys(PROGRESS_NAMESPACE)? {
        let snapshot = store.load(&dataset_id);
        progress.insert(dataset_id, snapshot);
    }
    Ok(serde_json::to_string_pretty(&Export { settings, progress })?)
}
