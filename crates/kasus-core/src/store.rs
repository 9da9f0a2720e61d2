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

//! Persistence of progress and settings.
//!
//! The engine never touches storage directly. It goes through a
//! [`KeyValueStore`], which the binary backs with SQLite and the browser
//! build backs with `localStorage`. Reads never fail from the caller's
//! point of view: missing or corrupt values become defaults. Writes are
//! best-effort: a failed write is logged and the session carries on in
//! memory.

use std::collections::HashMap;

use crate::config::Language;
use crate::config::Level;
use crate::config::QuizConfiguration;
use crate::config::QuizMode;
use crate::error::Fallible;
use crate::error::fail;
use crate::progress::ProgressSnapshot;

/// Namespace holding one snapshot per dataset id.
pub const PROGRESS_NAMESPACE: &str = "progress";

/// Namespace holding user settings.
pub const SETTINGS_NAMESPACE: &str = "settings";

const MODE_KEY: &str = "mode";
const LEVEL_KEY: &str = "level";
const LANGUAGE_KEY: &str = "language";
const DATASET_KEY: &str = "dataset";

/// A string key-value store partitioned into namespaces.
pub trait KeyValueStore {
    fn get(&self, namespace: &str, key: &str) -> Fallible<Option<String>>;

    fn set(&mut self, namespace: &str, key: &str, value: &str) -> Fallible<()>;
}

/// In-memory store. Writes can be made to fail, to exercise the
/// degraded-persistence path.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    entries: HashMap<(String, String), String>,
    fail_writes: bool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_fail_writes(&mut self, fail_writes: bool) {
        self.fail_writes = fail_writes;
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, namespace: &str, key: &str) -> Fallible<Option<String>> {
        Ok(self
            .entries
            .get(&(namespace.to_string(), key.to_string()))
            .cloned())
    }

    fn set(&mut self, namespace: &str, key: &str, value: &str) -> Fallible<()> {
        if self.fail_writes {
            return fail("storage is unavailable");
        }
        self.entries
            .insert((namespace.to_string(), key.to_string()), value.to_string());
        Ok(())
    }
}

/// Typed access to progress and settings on top of a [`KeyValueStore`].
pub struct ProgressStore<S: KeyValueStore> {
    inner: S,
    degraded: bool,
}

impl<S: KeyValueStore> ProgressStore<S> {
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            degraded: false,
        }
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }

    pub fn inner_mut(&mut self) -> &mut S {
        &mut self.inner
    }

    pub fn into_inner(self) -> S {
        self.inner
    }

    /// Whether any write has failed. Progress made since then may not
    /// survive a restart.
    pub fn is_degraded(&self) -> bool {
        self.degraded
    }

    /// The stored snapshot for a dataset, or an empty one if there is none
    /// or it cannot be read.
    pub fn load(&self, dataset_id: &str) -> ProgressSnapshot {
        let Some(data) = self.read(PROGRESS_NAMESPACE, dataset_id) else {
            return ProgressSnapshot::default();
        };
        match serde_json::from_str::<ProgressSnapshot>(&data) {
            Ok(snapshot) => snapshot.repaired(),
            Err(e) => {
                log::warn!("Discarding unreadable progress for '{dataset_id}': {e}");
                ProgressSnapshot::default()
            }
        }
    }

    pub fn save(&mut self, dataset_id: &str, snapshot: &ProgressSnapshot) {
        match serde_json::to_string(snapshot) {
            Ok(data) => self.write(PROGRESS_NAMESPACE, dataset_id, &data),
            Err(e) => {
                log::error!("Failed to serialize progress for '{dataset_id}': {e}");
                self.degraded = true;
            }
        }
    }

    pub fn load_config(&self) -> QuizConfiguration {
        QuizConfiguration {
            mode: self.read_setting::<QuizMode>(MODE_KEY),
            level: self.read_setting::<Level>(LEVEL_KEY),
        }
    }

    pub fn save_config(&mut self, config: QuizConfiguration) {
        self.write(SETTINGS_NAMESPACE, MODE_KEY, config.mode.as_str());
        self.write(SETTINGS_NAMESPACE, LEVEL_KEY, config.level.as_str());
    }

    pub fn load_language(&self) -> Language {
        self.read_setting::<Language>(LANGUAGE_KEY)
    }

    pub fn save_language(&mut self, language: Language) {
        self.write(SETTINGS_NAMESPACE, LANGUAGE_KEY, language.code());
    }

    /// The last selected dataset id, if any. Callers must check it against
    /// the datasets that actually exist.
    pub fn load_selected_dataset(&self) -> Option<String> {
        self.read(SETTINGS_NAMESPACE, DATASET_KEY)
    }

    pub fn save_selected_dataset(&mut self, dataset_id: &str) {
        self.write(SETTINGS_NAMESPACE, DATASET_KEY, dataset_id);
    }

    fn read_setting<T>(&self, key: &str) -> T
    where
        T: TryFrom<String> + Default,
    {
        match self.read(SETTINGS_NAMESPACE, key) {
            Some(value) => T::try_from(value.clone()).unwrap_or_else(|_| {
                log::warn!("Ignoring invalid value for setting '{key}': '{value}'");
                T::default()
            }),
            None => T::default(),
        }
    }

    fn read(&self, namespace: &str, key: &str) -> Option<String> {
        match self.inner.get(namespace, key) {
            Ok(value) => value,
            Err(e) => {
                log::warn!("Failed to read {namespace}/{key}: {e}");
                None
            }
        }
    }

    fn write(&mut self, namespace: &str, key: &str, value: &str) {
        if let Err(e) = self.inner.set(namespace, key, value) {
            log::error!("Failed to write {namespace}/{key}, continuing in memory: {e}");
            self.degraded = true;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mastery::evaluate;
    use crate::types::content_key::ContentKey;

    fn some_progress() -> ProgressSnapshot {
        let mut snapshot = ProgressSnapshot::default();
        let a = ContentKey::from("warten|auf|");
        let b = ContentKey::from("denken|an|");
        for _ in 0..3 {
            let t = evaluate(snapshot.record(&a), true);
            snapshot.apply(&a, t);
        }
        let t = evaluate(snapshot.record(&b), true);
        snapshot.apply(&b, t);
        snapshot
    }

    #[test]
    fn test_missing_is_default() {
        let store = ProgressStore::new(MemoryStore::new());
        assert_eq!(store.load("verbs.csv"), ProgressSnapshot::default());
    }

    #[test]
    fn test_roundtrip() {
        let mut store = ProgressStore::new(MemoryStore::new());
        let snapshot = some_progress();
        store.save("verbs.csv", &snapshot);
        let loaded = store.load("verbs.csv");
        assert_eq!(loaded.score(), snapshot.score());
        assert_eq!(loaded.learned(), snapshot.learned());
        assert_eq!(loaded.attempts(), snapshot.attempts());
        assert!(!store.is_degraded());
    }

    #[test]
    fn test_save_is_idempotent() {
        let mut store = ProgressStore::new(MemoryStore::new());
        let snapshot = some_progress();
        store.save("verbs.csv", &snapshot);
        store.save("verbs.csv", &snapshot);
        assert_eq!(store.load("verbs.csv"), snapshot);
    }

    #[test]
    fn test_malformed_is_default() -> Fallible<()> {
        let mut inner = MemoryStore::new();
        inner.set(PROGRESS_NAMESPACE, "verbs.csv", "{not json")?;
        inner.set(PROGRESS_NAMESPACE, "adj.csv", r#"{"learned": 5}"#)?;
        let store = ProgressStore::new(inner);
        assert_eq!(store.load("verbs.csv"), ProgressSnapshot::default());
        assert_eq!(store.load("adj.csv"), ProgressSnapshot::default());
        Ok(())
    }

    #[test]
    fn test_datasets_are_isolated() {
        let mut store = ProgressStore::new(MemoryStore::new());
        let snapshot = some_progress();
        store.save("verbs.csv", &snapshot);
        assert_eq!(store.load("adjectives.csv"), ProgressSnapshot::default());
        store.save("adjectives.csv", &ProgressSnapshot::default());
        assert_eq!(store.load("verbs.csv"), snapshot);
    }

    #[test]
    fn test_write_failure_is_swallowed() {
        let mut inner = MemoryStore::new();
        inner.set_fail_writes(true);
        let mut store = ProgressStore::new(inner);
        store.save("verbs.csv", &some_progress());
        assert!(store.is_degraded());
        assert_eq!(store.load("verbs.csv"), ProgressSnapshot::default());
    }

    #[test]
    fn test_settings_defaults() {
        let store = ProgressStore::new(MemoryStore::new());
        assert_eq!(store.load_config(), QuizConfiguration::default());
        assert_eq!(store.load_language(), Language::En);
        assert_eq!(store.load_selected_dataset(), None);
    }

    #[test]
    fn test_settings_roundtrip() {
        let mut store = ProgressStore::new(MemoryStore::new());
        let config = QuizConfiguration {
            mode: QuizMode::CaseOnly,
            level: Level::TextInput,
        };
        store.save_config(config);
        store.save_language(Language::Es);
        store.save_selected_dataset("adjectives.csv");
        assert_eq!(store.load_config(), config);
        assert_eq!(store.load_language(), Language::Es);
        assert_eq!(store.load_selected_dataset().as_deref(), Some("adjectives.csv"));
    }

    #[test]
    fn test_invalid_setting_is_default() -> Fallible<()> {
        let mut inner = MemoryStore::new();
        inner.set(SETTINGS_NAMESPACE, MODE_KEY, "everything")?;
        inner.set(SETTINGS_NAMESPACE, LEVEL_KEY, "2")?;
        let store = ProgressStore::new(inner);
        let config = store.load_config();
        assert_eq!(config.mode, QuizMode::Both);
        assert_eq!(config.level, Level::TextInput);
        Ok(())
    }

    #[test]
    fn test_settings_do_not_touch_progress() {
        let mut store = ProgressStore::new(MemoryStore::new());
        store.save_selected_dataset("verbs.csv");
        assert_eq!(store.load("verbs.csv"), ProgressSnapshot::default());
    }
}
