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


use std::fmt::Display;
use std::fmt::Formatter;

use clap::ValueEnum;
use kasus_core::error::Fallible;
use kasus_core::mastery::MasteryState;
use kasus_core::store::ProgressStore;
use serde::Serialize;

use crate::cmd::open_collection;
use crate::collection::Catalog;
use crate::db::Database;
use crate::loader::read_dataset;

#[derive(ValueEnum, Clone, Copy, PartialEq)]
pub enum StatsFormat {
    /// An aligned text table.
    Table,
    /// JSON, one object per dataset.
    Json,
}

impl Display for StatsFormat {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            StatsFormat::Table => write!(f, "table"),
            StatsFormat::Json => write!(f, "json"),
        }
    }
}

#[derive(Serialize, Debug, PartialEq)]
pub struct DatasetStats {
    pub dataset: String,
    pub label: String,
    /// `None` if the dataset could not be loaded.
    pub items: Option<usize>,
    pub learned: usize,
    pub in_progress: usize,
    pub score: usize,
    pub error: Option<String>,
}

pub fn print_stats(directory: Option<String>, format: StatsFormat) -> Fallible<()> {
    let (catalog, store) = open_collection(directory)?;
    let stats = collect_stats(&catalog, &store);
    match format {
        StatsFormat::Json => println!("{}", serde_json::to_string_pretty(&stats)?),
        StatsFormat::Table => print!("{}", render_table(&stats)),
    }
    Ok(())
}

fn collect_stats(catalog: &Catalog, store: &ProgressStore<Database>) -> Vec<DatasetStats> {
    catalog
        .datasets
        .iter()
        .map(|entry| {
            let snapshot = store.load(&entry.id);
            match read_dataset(entry) {
                Ok(dataset) => {
                    let in_progress = dataset
                        .keys()
                        .iter()
                        .filter(|key| {
                            matches!(snapshot.record(key).state(), MasteryState::InProgress(_))
                        })
                        .count();
                    DatasetStats {
                        dataset: entry.id.clone(),
                        label: entry.label.clone(),
                        items: Some(dataset.len()),
                        learned: snapshot.learned_among(dataset.keys()),
                        in_progress,
                        score: snapshot.score(),
                        error: None,
                    }
                }
                Err(e) => DatasetStats {
                    dataset: entry.id.clone(),
                    label: entry.label.clone(),
                    items: None,
                    learned: 0,
                    in_progress: 0,
                    score: snapshot.score(),
                    error: Some(e.to_string()),
                },
            }
        })
        .collect()
}

fn render_table(stats: &[DatasetStats]) -> String {
    let width = stats
        .iter()
        .map(|s| s.dataset.len())
        .chain(["Dataset".len()])
        .max()
        .unwrap_or_default();
    let mut out = format!(
        "{:<width$}  {:>7}  {:>7}  {:>11}  {:>5}\n",
        "Dataset", "Items", "Learned", "In progress", "Score"
    );
    for s in stats {
        let items = match s.items {
            Some(items) => items.to_string(),
            None => "-".to_string(),
        };
        out.push_str(&format!(
            "{:<width$}  {:>7}  {:>7}  {:>11}  {:>5}\n",
            s.dataset, items, s.learned, s.in_progress, s.score
        ));
    }
    out
}
