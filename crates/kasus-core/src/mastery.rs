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

/// Consecutive correct answers needed to learn an item.
pub const LEARNED_THRESHOLD: u32 = 3;

/// Mastery information for a single item.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MasteryRecord {
    /// Correct answers in a row. Reset by any incorrect answer.
    pub consecutive_correct: u32,
    /// Set once the streak first reaches [`LEARNED_THRESHOLD`]. Never unset.
    pub learned: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MasteryState {
    /// Never answered correctly, or the streak was broken before any
    /// progress.
    New,
    /// Part way through a streak.
    InProgress(u32),
    /// Terminal. The counter keeps moving but no longer matters.
    Learned,
}

impl MasteryRecord {
    pub fn state(&self) -> MasteryState {
        if self.learned {
            MasteryState::Learned
        } else if self.consecutive_correct == 0 {
            MasteryState::New
        } else {
            MasteryState::InProgress(self.consecutive_correct)
        }
    }
}

/// The result of grading an item once.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Transition {
    pub record: MasteryRecord,
    /// True only on the answer that flipped `learned` from false to true.
    pub newly_learned: bool,
}

pub fn evaluate(record: MasteryRecord, is_correct: bool) -> Transition {
    if !is_correct {
        return Transition {
            record: MasteryRecord {
                consecutive_correct: 0,
                learned: record.learned,
            },
            newly_learned: false,
        };
    }
    let consecutive_correct = record.consecutive_correct.saturating_add(1);
    let newly_learned = !record.learned && consecutive_correct >= LEARNED_THRESHOLD;
    Transition {
        record: MasteryRecord {
            consecutive_correct,
            learned: record.learned || newly_learned,
        },
        newly_learned,
    }
}
