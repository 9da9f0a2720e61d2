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


//! Browser localStorage as a key-value store.

use kasus_core::error::ErrorReport;
use kasus_core::error::Fallible;
use kasus_core::store::KeyValueStore;
use wasm_bindgen::prelude::*;
use web_sys::Storage as WebStorage;

pub struct Storage {
    inner: Option<WebStorage>,
}

impl Storage {
    pub fn new() -> Self {
        let inner = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();
        Self { inner }
    }
}

impl Default for Storage {
    fn default() -> Self {
        Self::new()
    }
}

impl KeyValueStore for Storage {
    fn get(&self, namespace: &str, key: &str) -> Fallible<Option<String>> {
        match &self.inner {
            Some(storage) => storage
                .get_item(&storage_key(namespace, key))
                .map_err(js_error),
            None => Ok(None),
        }
    }

    fn set(&mut self, namespace: &str, key: &str, value: &str) -> Fallible<()> {
        match &self.inner {
            Some(storage) => storage
                .set_item(&storage_key(namespace, key), value)
                .map_err(js_error),
            None => Err(ErrorReport::new("localStorage is unavailable")),
        }
    }
}

/// `progress` / `verbs.csv` is stored as `progress_verbs.csv`.
fn storage_key(namespace: &str, key: &str) -> String {
    format!("{namespace}_{key}")
}

fn js_error(value: JsValue) -> ErrorReport {
    ErrorReport::new(format!("localStorage error: {value:?}"))
}
