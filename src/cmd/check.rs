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


use kasus_core::error::Fallible;
use kasus_core::error::fail;

use crate::collection::Catalog;
use crate::collection::Collection;
use crate::loader::read_dataset;

pub fn check_collection(directory: Option<String>) -> Fallible<()> {
    let collection = Collection::new(directory)?;
    let problems = find_problems(&collection.catalog);
    if problems.is_empty() {
        println!("{} datasets OK.", collection.catalog.datasets.len());
        return Ok(());
    }
    for problem in &problems {
        println!("{problem}");
    }
    fail(format!("found {} problems.", problems.len()))
}

/// Load errors, and rows whose keys collide. Colliding rows are not an
/// error, but they share their progress, which is rarely intended.
fn find_problems(catalog: &Catalog) -> Vec<String> {
    let mut problems = Vec::new();
    for entry in &catalog.datasets {
        match read_dataset(entry) {
            Ok(dataset) => {
                for (key, rows) in dataset.collisions() {
                    let rows: Vec<String> = rows.iter().map(|row| (row + 1).to_string()).collect();
                    problems.push(format!(
                        "{}: items {} share the key '{key}'.",
                        entry.id,
                        rows.join(", ")
                    ));
                }
            }
            Err(e) => problems.push(e.to_string()),
        }
    }
    problems
}
