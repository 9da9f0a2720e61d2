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


use std::io::ErrorKind;

use kasus_core::dataset::Dataset;
use kasus_core::dataset::DatasetLoadError;
use kasus_core::dataset::parse_dataset;

use crate::collection::DatasetEntry;

/// Read and parse a dataset without blocking the runtime.
pub async fn load_dataset(entry: &DatasetEntry) -> Result<Dataset, DatasetLoadError> {
    let text = tokio::fs::read_to_string(&entry.path).await;
    interpret(entry, text)
}

/// Read and parse a dataset. Used by the maintenance commands.
pub fn read_dataset(entry: &DatasetEntry) -> Result<Dataset, DatasetLoadError> {
    interpret(entry, std::fs::read_to_string(&entry.path))
}

fn interpret(
    entry: &DatasetEntry,
    text: std::io::Result<String>,
) -> Result<Dataset, DatasetLoadError> {
    match text {
        Ok(text) => parse_dataset(&entry.id, &text),
        Err(e) if e.kind() == ErrorKind::NotFound => Err(DatasetLoadError::NotFound {
            dataset: entry.id.clone(),
        }),
        Err(e) => Err(DatasetLoadError::Malformed {
            dataset: entry.id.clone(),
            reason: e.to_string(),
        }),
    }
}
