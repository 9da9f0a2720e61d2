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

use serde::Deserialize;
use serde::Serialize;

use crate::types::item::Item;

/// Joins the derivation fields of a key.
pub const SEPARATOR: char = '|';

/// The persistent identity of an [`Item`].
///
/// A key is the primary text, expected preposition, and example sentence
/// joined by [`SEPARATOR`]; absent fields contribute an empty string. It
/// never depends on where the item sits in its dataset, so progress
/// survives rows being reordered, inserted, or deleted.
///
/// Two items that agree on all three fields get the same key and therefore
/// share progress. This is a known limitation; `kasus check` reports such
/// collisions.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContentKey(String);

impl ContentKey {
    pub fn derive(item: &Item) -> Self {
        let mut key = String::new();
        key.push_str(item.primary_text());
        key.push(SEPARATOR);
        key.push_str(item.expected_preposition().unwrap_or(""));
        key.push(SEPARATOR);
        key.push_str(item.example().unwrap_or(""));
        Self(key)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for ContentKey {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for ContentKey {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for ContentKey {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}
