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

use serde::Serialize;

use crate::config::Language;
use crate::types::content_key::ContentKey;

/// One quiz row: a verb (or adjective, or sentence) and the preposition and
/// case it governs.
///
/// Items are validated once by the dataset parser and never change
/// afterwards. Their identity is derived from their content, see
/// [`ContentKey`].
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Item {
    primary_text: String,
    expected_preposition: Option<String>,
    expected_case: Option<String>,
    wrong_prepositions: Vec<String>,
    /// Translations of the primary text, by language code.
    translations: BTreeMap<String, String>,
    example: Option<String>,
    /// Translations of the example sentence, by language code.
    example_translations: BTreeMap<String, String>,
}

impl Item {
    pub fn new(primary_text: impl Into<String>) -> Self {
        Self {
            primary_text: primary_text.into(),
            expected_preposition: None,
            expected_case: None,
            wrong_prepositions: Vec::new(),
            translations: BTreeMap::new(),
            example: None,
            example_translations: BTreeMap::new(),
        }
    }

    pub fn with_preposition(mut self, preposition: impl Into<String>) -> Self {
        self.expected_preposition = non_blank(preposition.into());
        self
    }

    pub fn with_case(mut self, case: impl Into<String>) -> Self {
        self.expected_case = non_blank(case.into());
        self
    }

    pub fn with_wrong_prepositions(mut self, wrongs: Vec<String>) -> Self {
        self.wrong_prepositions = wrongs;
        self
    }

    pub fn with_example(mut self, example: impl Into<String>) -> Self {
        self.example = non_blank(example.into());
        self
    }

    pub fn with_translation(mut self, lang: &str, text: impl Into<String>) -> Self {
        if let Some(text) = non_blank(text.into()) {
            self.translations.insert(lang.to_string(), text);
        }
        self
    }

    pub fn with_example_translation(mut self, lang: &str, text: impl Into<String>) -> Self {
        if let Some(text) = non_blank(text.into()) {
            self.example_translations.insert(lang.to_string(), text);
        }
        self
    }

    pub fn primary_text(&self) -> &str {
        &self.primary_text
    }

    pub fn expected_preposition(&self) -> Option<&str> {
        self.expected_preposition.as_deref()
    }

    pub fn expected_case(&self) -> Option<&str> {
        self.expected_case.as_deref()
    }

    pub fn wrong_prepositions(&self) -> &[String] {
        &self.wrong_prepositions
    }

    pub fn example(&self) -> Option<&str> {
        self.example.as_deref()
    }

    /// The translation of the primary text, falling back to English.
    pub fn translation(&self, lang: Language) -> Option<&str> {
        lookup(&self.translations, lang)
    }

    /// The translation of the example sentence, falling back to English.
    pub fn example_translation(&self, lang: Language) -> Option<&str> {
        lookup(&self.example_translations, lang)
    }

    pub fn key(&self) -> ContentKey {
        ContentKey::derive(self)
    }
}

fn lookup(map: &BTreeMap<String, String>, lang: Language) -> Option<&str> {
    if let Some(text) = map.get(lang.code()) {
        return Some(text);
    }
    if lang != Language::En {
        if let Some(text) = map.get(Language::En.code()) {
            log::debug!("Missing '{}' translation, falling back to English.", lang.code());
            return Some(text);
        }
    }
    None
}

fn non_blank(s: String) -> Option<String> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
