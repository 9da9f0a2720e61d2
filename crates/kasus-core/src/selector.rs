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

use std::collections::BTreeSet;

use crate::rng::TinyRng;
use crate::types::content_key::ContentKey;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Selection {
    /// Index into the dataset of the item to present next.
    Item(usize),
    /// Every item is learned.
    SessionComplete,
}

/// Indices of the items whose key is not learned, in dataset order.
pub fn candidates(keys: &[ContentKey], learned: &BTreeSet<ContentKey>) -> Vec<usize> {
    keys.iter()
        .enumerate()
        .filter(|(_, key)| !learned.contains(*key))
        .map(|(idx, _)| idx)
        .collect()
}

/// Pick the next item uniformly among the unlearned ones.
pub fn select_next(
    keys: &[ContentKey],
    learned: &BTreeSet<ContentKey>,
    rng: &mut TinyRng,
) -> Selection {
    let candidates = candidates(keys, learned);
    if candidates.is_empty() {
        return Selection::SessionComplete;
    }
    Selection::Item(candidates[rng.index(candidates.len())])
}
