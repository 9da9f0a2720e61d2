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


use std::path::Path;
use std::path::PathBuf;

use kasus_core::error::Fallible;
use kasus_core::error::fail;
use serde::Deserialize;
use walkdir::WalkDir;

use crate::db::Database;

pub const DATABASE_FILE: &str = "kasus.db";
pub const CONFIG_FILE: &str = "kasus.toml";

/// The optional `kasus.toml` at the root of a collection.
#[derive(Deserialize, Default)]
#[serde(deny_unknown_fields)]
struct CollectionConfig {
    #[serde(default)]
    datasets: Vec<DatasetConfig>,
    default_dataset: Option<String>,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct DatasetConfig {
    file: String,
    label: Option<String>,
}

/// A dataset file in a collection.
#[derive(Clone, Debug, PartialEq)]
pub struct DatasetEntry {
    /// Path relative to the collection directory, with `/` separators.
    /// Progress is stored under this id.
    pub id: String,
    pub label: String,
    pub path: PathBuf,
}

pub struct Collection {
    pub directory: PathBuf,
    pub db: Database,
    pub catalog: Catalog,
}

/// The datasets of a collection.
#[derive(Clone, Debug, Default)]
pub struct Catalog {
    pub datasets: Vec<DatasetEntry>,
    pub default_dataset: Option<String>,
}

impl Collection {
    pub fn new(directory: Option<String>) -> Fallible<Self> {
        let directory: PathBuf = match directory {
            Some(dir) => PathBuf::from(dir),
            None => std::env::current_dir()?,
        };
        if !directory.exists() {
            return fail("directory does not exist.");
        }
        let directory = directory.canonicalize()?;
        let config = read_config(&directory)?;
        let datasets = if config.datasets.is_empty() {
            discover_datasets(&directory)?
        } else {
            configured_datasets(&directory, &config.datasets)
        };
        if let Some(id) = &config.default_dataset {
            if !datasets.iter().any(|entry| &entry.id == id) {
                return fail(format!("default dataset '{id}' is not in the collection."));
            }
        }
        log::debug!(
            "Found {} datasets in {}",
            datasets.len(),
            directory.display()
        );
        let db = Database::new(&directory.join(DATABASE_FILE))?;
        Ok(Self {
            directory,
            db,
            catalog: Catalog {
                datasets,
                default_dataset: config.default_dataset,
            },
        })
    }
}

impl Catalog {
    pub fn dataset(&self, id: &str) -> Option<&DatasetEntry> {
        self.datasets.iter().find(|entry| entry.id == id)
    }

    /// Look up a dataset, failing if it does not exist.
    pub fn require_dataset(&self, id: &str) -> Fallible<&DatasetEntry> {
        match self.dataset(id) {
            Some(entry) => Ok(entry),
            None => fail(format!("no dataset named '{id}' in the collection.")),
        }
    }

    /// The dataset to start a session with: the one asked for, else the one
    /// last used, else the configured default, else the first.
    pub fn starting_dataset(
        &self,
        requested: Option<&str>,
        last_used: Option<&str>,
    ) -> Fallible<Option<&DatasetEntry>> {
        if let Some(id) = requested {
            return self.require_dataset(id).map(Some);
        }
        let remembered = last_used.and_then(|id| self.dataset(id));
        let configured = self.default_dataset.as_deref().and_then(|id| self.dataset(id));
        Ok(remembered.or(configured).or(self.datasets.first()))
    }
}

fn read_config(directory: &Path) -> Fallible<CollectionConfig> {
    let path = directory.join(CONFIG_FILE);
    if !path.exists() {
        return Ok(CollectionConfig::default());
    }
    let text = std::fs::read_to_string(&path)?;
    Ok(toml::from_str(&text)?)
}

fn configured_datasets(directory: &Path, datasets: &[DatasetConfig]) -> Vec<DatasetEntry> {
    datasets
        .iter()
        .map(|dataset| {
            let id = dataset.file.replace('\\', "/");
            DatasetEntry {
                label: dataset.label.clone().unwrap_or_else(|| default_label(&id)),
                path: directory.join(&dataset.file),
                id,
            }
        })
        .collect()
}

fn discover_datasets(directory: &Path) -> Fallible<Vec<DatasetEntry>> {
    let mut datasets = Vec::new();
    for entry in WalkDir::new(directory) {
        let entry = entry.map_err(|e| std::io::Error::other(e.to_string()))?;
        let path = entry.path();
        if !path.is_file() || path.extension().and_then(|ext| ext.to_str()) != Some("csv") {
            continue;
        }
        let Ok(relative) = path.strip_prefix(directory) else {
            continue;
        };
        let id = relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/");
        datasets.push(DatasetEntry {
            label: default_label(&id),
            path: path.to_path_buf(),
            id,
        });
    }
    datasets.sort_by(|a, b| a.id.cmp(&b.id));
    Ok(datasets)
}

/// `b1/top_50_verbs.csv` becomes `top 50 verbs`.
fn default_label(id: &str) -> String {
    let name = id.rsplit('/').next().unwrap_or(id);
    let stem = name.strip_suffix(".csv").unwrap_or(name);
    stem.replace(['_', '-'], " ")
}
