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
use std::error::Error;
use std::fmt::Display;
use std::fmt::Formatter;

use csv::ReaderBuilder;
use csv::StringRecord;
use csv::Trim;

use crate::types::content_key::ContentKey;
use crate::types::item::Item;

const PRIMARY_COLUMNS: [&str; 3] = ["Verb", "Word", "Sentence"];
const PREPOSITION_COLUMN: &str = "Preposition";
const CASE_COLUMN: &str = "Case";
const WRONG_PREPOSITIONS_COLUMN: &str = "WrongPrepositions";
const EXAMPLE_COLUMNS: [&str; 2] = ["Exemple", "Example"];
const TRANSLATION_PREFIX: &str = "Translation_";
const EXAMPLE_TRANSLATION_PREFIX: &str = "ExampleTranslation_";

/// Why a dataset could not be loaded. Any of these stops the session from
/// starting.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DatasetLoadError {
    /// The source does not exist or could not be reached.
    NotFound { dataset: String },
    /// The source has no data rows.
    Empty { dataset: String },
    /// The source is not a usable CSV table.
    Malformed { dataset: String, reason: String },
}

impl DatasetLoadError {
    pub fn dataset(&self) -> &str {
        match self {
            DatasetLoadError::NotFound { dataset }
            | DatasetLoadError::Empty { dataset }
            | DatasetLoadError::Malformed { dataset, .. } => dataset,
        }
    }
}

impl Display for DatasetLoadError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            DatasetLoadError::NotFound { dataset } => {
                write!(f, "dataset '{dataset}' not found.")
            }
            DatasetLoadError::Empty { dataset } => write!(f, "dataset '{dataset}' is empty."),
            DatasetLoadError::Malformed { dataset, reason } => {
                write!(f, "dataset '{dataset}' is malformed: {reason}")
            }
        }
    }
}

impl Error for DatasetLoadError {}

/// The items of one dataset, with their keys computed once.
#[derive(Clone, Debug, PartialEq)]
pub struct Dataset {
    id: String,
    items: Vec<Item>,
    keys: Vec<ContentKey>,
}

impl Dataset {
    pub fn new(id: impl Into<String>, items: Vec<Item>) -> Self {
        let keys = items.iter().map(ContentKey::derive).collect();
        Self {
            id: id.into(),
            items,
            keys,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn keys(&self) -> &[ContentKey] {
        &self.keys
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn item(&self, index: usize) -> Option<&Item> {
        self.items.get(index)
    }

    pub fn key(&self, index: usize) -> Option<&ContentKey> {
        self.keys.get(index)
    }

    /// Keys shared by more than one row, with the (zero-based) rows that
    /// share them. Such rows share their progress.
    pub fn collisions(&self) -> Vec<(ContentKey, Vec<usize>)> {
        let mut rows: BTreeMap<&ContentKey, Vec<usize>> = BTreeMap::new();
        for (idx, key) in self.keys.iter().enumerate() {
            rows.entry(key).or_default().push(idx);
        }
        rows.into_iter()
            .filter(|(_, rows)| rows.len() > 1)
            .map(|(key, rows)| (key.clone(), rows))
            .collect()
    }
}

/// Column positions resolved from the header row.
struct Columns {
    primary: usize,
    preposition: Option<usize>,
    case: Option<usize>,
    wrong_prepositions: Option<usize>,
    example: Option<usize>,
    translations: Vec<(String, usize)>,
    example_translations: Vec<(String, usize)>,
}

impl Columns {
    fn resolve(dataset: &str, headers: &StringRecord) -> Result<Self, DatasetLoadError> {
        let find = |name: &str| headers.iter().position(|h| h == name);
        let find_any = |names: &[&str]| names.iter().find_map(|name| find(*name));
        let with_prefix = |prefix: &str| -> Vec<(String, usize)> {
            headers
                .iter()
                .enumerate()
                .filter_map(|(idx, h)| {
                    h.strip_prefix(prefix)
                        .filter(|lang| !lang.is_empty())
                        .map(|lang| (lang.to_lowercase(), idx))
                })
                .collect()
        };
        let primary = find_any(&PRIMARY_COLUMNS).ok_or_else(|| DatasetLoadError::Malformed {
            dataset: dataset.to_string(),
            reason: format!("missing a '{}' column.", PRIMARY_COLUMNS[0]),
        })?;
        let preposition = find(PREPOSITION_COLUMN);
        let case = find(CASE_COLUMN);
        if preposition.is_none() && case.is_none() {
            return Err(DatasetLoadError::Malformed {
                dataset: dataset.to_string(),
                reason: format!("needs a '{PREPOSITION_COLUMN}' or '{CASE_COLUMN}' column."),
            });
        }
        Ok(Self {
            primary,
            preposition,
            case,
            wrong_prepositions: find(WRONG_PREPOSITIONS_COLUMN),
            example: find_any(&EXAMPLE_COLUMNS),
            translations: with_prefix(TRANSLATION_PREFIX),
            example_translations: with_prefix(EXAMPLE_TRANSLATION_PREFIX),
        })
    }
}

/// Parse CSV text into a dataset.
///
/// Rows are validated here so that the rest of the engine only sees
/// well-formed items: every item has its primary text and at least one
/// of preposition and case.
pub fn parse_dataset(dataset: &str, text: &str) -> Result<Dataset, DatasetLoadError> {
    let malformed = |reason: String| DatasetLoadError::Malformed {
        dataset: dataset.to_string(),
        reason,
    };

    let head: String = text.trim_start().chars().take(16).collect::<String>().to_lowercase();
    if head.starts_with("<!doctype html") || head.starts_with("<html") {
        return Err(malformed(
            "received an HTML page instead of CSV data.".to_string(),
        ));
    }
    if text.trim().is_empty() {
        return Err(DatasetLoadError::Empty {
            dataset: dataset.to_string(),
        });
    }

    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(text.as_bytes());
    let headers = reader
        .headers()
        .map_err(|e| malformed(e.to_string()))?
        .clone();
    let columns = Columns::resolve(dataset, &headers)?;

    let mut items = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| malformed(e.to_string()))?;
        if record.iter().all(|field| field.is_empty()) {
            continue;
        }
        let line = record.position().map(|p| p.line()).unwrap_or_default();
        items.push(parse_row(&columns, &record).map_err(|reason| {
            malformed(format!("line {line}: {reason}"))
        })?);
    }

    if items.is_empty() {
        return Err(DatasetLoadError::Empty {
            dataset: dataset.to_string(),
        });
    }
    log::debug!("Parsed {} items from '{dataset}'", items.len());
    Ok(Dataset::new(dataset, items))
}

fn parse_row(columns: &Columns, record: &StringRecord) -> Result<Item, String> {
    let field = |idx: Option<usize>| idx.and_then(|i| record.get(i)).unwrap_or("");
    let primary = field(Some(columns.primary));
    if primary.is_empty() {
        return Err("missing primary text.".to_string());
    }
    let mut item = Item::new(primary)
        .with_preposition(field(columns.preposition))
        .with_case(field(columns.case))
        .with_example(field(columns.example))
        .with_wrong_prepositions(parse_wrong_prepositions(field(columns.wrong_prepositions)));
    if item.expected_preposition().is_none() && item.expected_case().is_none() {
        return Err("needs a preposition or a case.".to_string());
    }
    for (lang, idx) in columns.translations.iter() {
        item = item.with_translation(lang, field(Some(*idx)));
    }
    for (lang, idx) in columns.example_translations.iter() {
        item = item.with_example_translation(lang, field(Some(*idx)));
    }
    Ok(item)
}

/// Wrong candidates are written either as a JSON array or as a
/// comma-separated list.
fn parse_wrong_prepositions(text: &str) -> Vec<String> {
    if let Ok(list) = serde_json::from_str::<Vec<String>>(text) {
        return list
            .into_iter()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
    }
    text.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}
