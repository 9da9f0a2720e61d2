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
use std::collections::BTreeSet;

use serde::Deserialize;
use serde::Serialize;

use crate::mastery::LEARNED_THRESHOLD;
use crate::mastery::MasteryRecord;
use crate::mastery::Transition;
use crate::types::content_key::ContentKey;

/// Everything persisted about one dataset.
///
/// The fields are private so that `score == learned.len()` always holds.
/// Deserialized snapshots go through [`ProgressSnapshot::repaired`] before
/// they are used.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressSnapshot {
    #[serde(default)]
    score: usize,
    #[serde(default)]
    learned: BTreeSet<ContentKey>,
    #[serde(default)]
    attempts: BTreeMap<ContentKey, u32>,
}

impl ProgressSnapshot {
    pub fn score(&self) -> usize {
        self.score
    }

    pub fn learned(&self) -> &BTreeSet<ContentKey> {
        &self.learned
    }

    pub fn attempts(&self) -> &BTreeMap<ContentKey, u32> {
        &self.attempts
    }

    pub fn is_learned(&self, key: &ContentKey) -> bool {
        self.learned.contains(key)
    }

    /// The mastery record for a key. Keys never graded get the default.
    pub fn record(&self, key: &ContentKey) -> MasteryRecord {
        MasteryRecord {
            consecutive_correct: self.attempts.get(key).copied().unwrap_or(0),
            learned: self.learned.contains(key),
        }
    }

    /// Store the outcome of a mastery transition. The score only moves on
    /// the transition that first learned the item.
    pub fn apply(&mut self, key: &ContentKey, transition: Transition) {
        self.attempts
            .insert(key.clone(), transition.record.consecutive_correct);
        if transition.record.learned && self.learned.insert(key.clone()) {
            debug_assert!(transition.newly_learned);
            self.score += 1;
        }
    }

    /// Bring a snapshot read from storage back in line with the invariants:
    /// any key whose streak already reached the threshold counts as
    /// learned, and the score is recounted.
    pub fn repaired(mut self) -> Self {
        for (key, &count) in self.attempts.iter() {
            if count >= LEARNED_THRESHOLD {
                self.learned.insert(key.clone());
            }
        }
        self.score = self.learned.len();
        self
    }

    /// Number of the given keys that are learned.
    pub fn learned_among<'a>(&self, keys: impl IntoIterator<Item = &'a ContentKey>) -> usize {
        keys.into_iter().filter(|k| self.learned.contains(*k)).count()
    }

    /// Keys that have progress but are not in `keys`.
    pub fn orphans(&self, keys: &BTreeSet<&ContentKey>) -> BTreeSet<ContentKey> {
        self.learned
            .iter()
            .chain(self.attempts.keys())
            .filter(|k| !keys.contains(k))
            .cloned()
            .collect()
    }

    /// Drop every key that is not in `keys`. Returns the number removed.
    pub fn prune(&mut self, keys: &BTreeSet<&ContentKey>) -> usize {
        let orphans = self.orphans(keys);
        for key in orphans.iter() {
            self.learned.remove(key);
            self.attempts.remove(key);
        }
        self.score = self.learned.len();
        orphans.len()
    }
}
