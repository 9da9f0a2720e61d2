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

use serde::Deserialize;
use serde::Serialize;

use crate::config::QuizMode;
use crate::rng::TinyRng;
use crate::rng::shuffle;
use crate::types::item::Item;

/// The cases offered as answer buttons.
pub const CASE_CHOICES: [&str; 2] = ["Akk", "Dat"];

/// How many wrong prepositions are mixed into the multiple-choice options.
const WRONG_CHOICES: usize = 3;

/// A user's answer. Either part may be missing.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Guess {
    pub preposition: Option<String>,
    pub case: Option<String>,
}

impl Guess {
    pub fn new(preposition: Option<&str>, case: Option<&str>) -> Self {
        Self {
            preposition: preposition.map(str::to_string),
            case: case.map(str::to_string),
        }
    }

    /// Whether every sub-answer asked of `item` under `mode` has been given.
    pub fn is_complete(&self, item: &Item, mode: QuizMode) -> bool {
        let filled = |s: &Option<String>| s.as_deref().is_some_and(|s| !s.trim().is_empty());
        (!asks_preposition(item, mode) || filled(&self.preposition))
            && (!asks_case(item, mode) || filled(&self.case))
    }
}

/// The preposition is asked when the mode wants it and the item has one.
pub fn asks_preposition(item: &Item, mode: QuizMode) -> bool {
    mode.asks_preposition() && item.expected_preposition().is_some()
}

/// The case is asked when the mode wants it and the item has one.
pub fn asks_case(item: &Item, mode: QuizMode) -> bool {
    mode.asks_case() && item.expected_case().is_some()
}

fn normalize(s: Option<&str>) -> String {
    s.unwrap_or("").trim().to_lowercase()
}

/// Case-insensitive, whitespace-insensitive comparison. Absent counts as
/// the empty string on both sides.
pub fn matches(expected: Option<&str>, given: Option<&str>) -> bool {
    normalize(expected) == normalize(given)
}

/// Grade a guess. Sub-answers the mode does not ask for are ignored.
pub fn grade(item: &Item, guess: &Guess, mode: QuizMode) -> bool {
    let preposition_ok = || matches(item.expected_preposition(), guess.preposition.as_deref());
    let case_ok = || matches(item.expected_case(), guess.case.as_deref());
    match mode {
        QuizMode::PrepositionOnly => preposition_ok(),
        QuizMode::CaseOnly => case_ok(),
        QuizMode::Both => preposition_ok() && case_ok(),
    }
}

/// The multiple-choice options for an item's preposition: the correct one
/// plus up to three random wrong candidates, in random order.
///
/// Items without a preposition get no options.
pub fn preposition_choices(item: &Item, rng: &mut TinyRng) -> Vec<String> {
    let Some(correct) = item.expected_preposition().map(str::trim) else {
        return Vec::new();
    };
    let mut wrongs: Vec<&str> = Vec::new();
    for wrong in item.wrong_prepositions() {
        let wrong = wrong.trim();
        if wrong.is_empty() || matches(Some(wrong), Some(correct)) {
            continue;
        }
        if wrongs.iter().any(|w| matches(Some(w), Some(wrong))) {
            continue;
        }
        wrongs.push(wrong);
    }
    let mut choices: Vec<String> = shuffle(wrongs, rng)
        .into_iter()
        .take(WRONG_CHOICES)
        .map(str::to_string)
        .collect();
    choices.push(correct.to_string());
    shuffle(choices, rng)
}
