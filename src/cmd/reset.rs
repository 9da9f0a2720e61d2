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
use kasus_core::progress::ProgressSnapshot;

use crate::cmd::open_collection;

/// Forget all progress on one dataset.
pub fn reset_dataset(directory: Option<String>, dataset: String) -> Fallible<()> {
    let (catalog, mut store) = open_collection(directory)?;
    let entry = catalog.require_dataset(&dataset)?;
    let before = store.load(&entry.id);
    store.save(&entry.id, &ProgressSnapshot::default());
    if store.is_degraded() {
        return fail(format!("could not reset progress for '{}'.", entry.id));
    }
    println!(
        "Reset progress for '{}' ({} learned items forgotten).",
        entry.id,
        before.learned().len()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use kasus_core::mastery::evaluate;
    use kasus_core::types::content_key::ContentKey;

    use super::*;
    use crate::helper::VERBS_CSV;
    use crate::helper::create_collection;

    #[test]
    fn test_reset() -> Fallible<()> {
        let dir = create_collection(&[("a.csv", VERBS_CSV), ("b.csv", VERBS_CSV)])?;
        let directory = Some(dir.display().to_string());
        {
            let (_, mut store) = open_collection(directory.clone())?;
            let key = ContentKey::from("denken|an|Ich denke an dich.");
            let mut snapshot = ProgressSnapshot::default();
            let t = evaluate(snapshot.record(&key), true);
            snapshot.apply(&key, t);
            store.save("a.csv", &snapshot);
            store.save("b.csv", &snapshot);
        }
        reset_dataset(directory.clone(), "a.csv".to_string())?;
        let (_, store) = open_collection(directory)?;
        assert_eq!(store.load("a.csv"), ProgressSnapshot::default());
        assert_eq!(store.load("b.csv").attempts().len(), 1);
        Ok(())
    }

    #[test]
    fn test_reset_unknown_dataset() -> Fallible<()> {
        let dir = create_collection(&[("a.csv", VERBS_CSV)])?;
        let result = reset_dataset(Some(dir.display().to_string()), "zzz.csv".to_string());
        assert_eq!(
            result.err().map(|e| e.to_string()),
            Some("error: no dataset named 'zzz.csv' in the collection.".to_string())
        );
        Ok(())
    }
}
