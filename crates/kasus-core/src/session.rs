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

//! The drill loop: present an item, grade the answer, update mastery,
//! reveal the answer, pick the next item.
//!
//! Every action is a synchronous method that runs to completion, and every
//! action that changes progress writes it through to the store before
//! returning. Loading a dataset is the only asynchronous step, so it is
//! split in two: [`SessionController::select_dataset`] hands out a
//! [`LoadTicket`], the caller fetches the data however it likes, and
//! [`SessionController::finish_load`] applies the result only if the ticket
//! is still current.

use serde::Serialize;

use crate::config::Language;
use crate::config::Level;
use crate::config::QuizConfiguration;
use crate::config::QuizMode;
use crate::dataset::Dataset;
use crate::dataset::DatasetLoadError;
use crate::grading::Guess;
use crate::grading::asks_case;
use crate::grading::asks_preposition;
use crate::grading::grade;
use crate::grading::preposition_choices;
use crate::mastery::MasteryRecord;
use crate::mastery::evaluate;
use crate::progress::ProgressSnapshot;
use crate::rng::TinyRng;
use crate::selector::Selection;
use crate::selector::select_next;
use crate::store::KeyValueStore;
use crate::store::ProgressStore;
use crate::types::content_key::ContentKey;
use crate::types::item::Item;

/// Identifies one dataset load request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LoadTicket {
    dataset_id: String,
    generation: u64,
}

impl LoadTicket {
    pub fn dataset_id(&self) -> &str {
        &self.dataset_id
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// What happened when an answer was graded.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Outcome {
    pub guess: Guess,
    pub correct: bool,
    /// The item's mastery after this answer.
    pub record: MasteryRecord,
    /// This answer made the item learned.
    pub newly_learned: bool,
}

/// One row of the per-item progress view.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ItemProgress<'a> {
    pub item: &'a Item,
    pub record: MasteryRecord,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Phase {
    /// No dataset has been selected yet.
    Idle,
    /// Waiting for a dataset.
    Loading { dataset_id: String },
    /// The dataset could not be loaded. Nothing can be drilled until
    /// another dataset is selected.
    Failed(DatasetLoadError),
    /// An item is shown and an answer is expected.
    Presenting { index: usize },
    /// The answer is shown. `outcome` is `None` if the user gave up.
    AnswerRevealed {
        index: usize,
        outcome: Option<Outcome>,
    },
    /// Every item of the dataset is learned.
    SessionComplete,
}

pub struct SessionController<S: KeyValueStore> {
    store: ProgressStore<S>,
    rng: TinyRng,
    config: QuizConfiguration,
    language: Language,
    dataset: Option<Dataset>,
    snapshot: ProgressSnapshot,
    phase: Phase,
    /// The answer being assembled in multiple-choice level, or the last
    /// submitted answer once revealed.
    guess: Guess,
    /// Preposition options for the current item.
    choices: Vec<String>,
    /// Bumped whenever a load is started or abandoned.
    generation: u64,
}

impl<S: KeyValueStore> SessionController<S> {
    /// Create a controller. Settings are read from the store; no dataset is
    /// loaded yet.
    pub fn new(store: S, rng: TinyRng) -> Self {
        let store = ProgressStore::new(store);
        let config = store.load_config();
        let language = store.load_language();
        Self {
            store,
            rng,
            config,
            language,
            dataset: None,
            snapshot: ProgressSnapshot::default(),
            phase: Phase::Idle,
            guess: Guess::default(),
            choices: Vec::new(),
            generation: 0,
        }
    }

    pub fn store(&self) -> &ProgressStore<S> {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store.into_inner()
    }

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    pub fn config(&self) -> QuizConfiguration {
        self.config
    }

    pub fn language(&self) -> Language {
        self.language
    }

    pub fn dataset(&self) -> Option<&Dataset> {
        self.dataset.as_ref()
    }

    pub fn snapshot(&self) -> &ProgressSnapshot {
        &self.snapshot
    }

    pub fn guess(&self) -> &Guess {
        &self.guess
    }

    pub fn choices(&self) -> &[String] {
        &self.choices
    }

    /// Whether progress may not be surviving restarts.
    pub fn is_degraded(&self) -> bool {
        self.store.is_degraded()
    }

    pub fn current_index(&self) -> Option<usize> {
        match self.phase {
            Phase::Presenting { index } | Phase::AnswerRevealed { index, .. } => Some(index),
            _ => None,
        }
    }

    pub fn current_item(&self) -> Option<&Item> {
        let index = self.current_index()?;
        self.dataset.as_ref()?.item(index)
    }

    pub fn current_key(&self) -> Option<&ContentKey> {
        let index = self.current_index()?;
        self.dataset.as_ref()?.key(index)
    }

    pub fn score(&self) -> usize {
        self.snapshot.score()
    }

    /// Learned items of the active dataset. Unlike the score, this ignores
    /// progress on rows that no longer exist.
    pub fn learned_count(&self) -> usize {
        match &self.dataset {
            Some(dataset) => self.snapshot.learned_among(dataset.keys()),
            None => 0,
        }
    }

    pub fn total_count(&self) -> usize {
        self.dataset.as_ref().map(Dataset::len).unwrap_or(0)
    }

    /// Switch to another dataset. The current dataset's progress is saved
    /// first and the session is cleared; the returned ticket must be
    /// passed to [`Self::finish_load`] with the loaded data.
    pub fn select_dataset(&mut self, dataset_id: &str) -> LoadTicket {
        self.persist();
        self.generation += 1;
        self.dataset = None;
        self.snapshot = ProgressSnapshot::default();
        self.guess = Guess::default();
        self.choices.clear();
        self.store.save_selected_dataset(dataset_id);
        self.phase = Phase::Loading {
            dataset_id: dataset_id.to_string(),
        };
        log::debug!("Loading dataset '{dataset_id}'");
        LoadTicket {
            dataset_id: dataset_id.to_string(),
            generation: self.generation,
        }
    }

    /// Apply the result of a load. Returns `false`, and changes nothing, if
    /// the ticket has been superseded or cancelled.
    pub fn finish_load(
        &mut self,
        ticket: &LoadTicket,
        result: Result<Dataset, DatasetLoadError>,
    ) -> bool {
        if ticket.generation != self.generation || !matches!(self.phase, Phase::Loading { .. }) {
            log::debug!("Discarding stale load of '{}'", ticket.dataset_id);
            return false;
        }
        let dataset = match result {
            Ok(dataset) if dataset.is_empty() => Err(DatasetLoadError::Empty {
                dataset: ticket.dataset_id.clone(),
            }),
            other => other,
        };
        match dataset {
            Ok(dataset) => {
                self.snapshot = self.store.load(&ticket.dataset_id);
                log::info!(
                    "Loaded '{}': {} items, {} learned",
                    ticket.dataset_id,
                    dataset.len(),
                    self.snapshot.learned_among(dataset.keys())
                );
                self.dataset = Some(dataset);
                self.advance();
            }
            Err(e) => {
                log::warn!("Failed to load dataset: {e}");
                self.phase = Phase::Failed(e);
            }
        }
        true
    }

    /// Abandon any load in flight. A result arriving later is discarded.
    pub fn cancel_load(&mut self) {
        self.generation += 1;
        if matches!(self.phase, Phase::Loading { .. }) {
            self.phase = Phase::Idle;
        }
    }

    /// Grade an answer to the current item. Does nothing unless an item is
    /// being presented.
    pub fn submit_answer(&mut self, guess: Guess) -> Option<Outcome> {
        let Phase::Presenting { index } = self.phase else {
            return None;
        };
        let dataset = self.dataset.as_ref()?;
        let item = dataset.item(index)?;
        let key = dataset.key(index)?.clone();
        let correct = grade(item, &guess, self.config.mode);
        let transition = evaluate(self.snapshot.record(&key), correct);
        self.snapshot.apply(&key, transition);
        if transition.newly_learned {
            log::info!("Learned '{key}' (score {})", self.snapshot.score());
        }
        self.persist();
        let outcome = Outcome {
            guess: guess.clone(),
            correct,
            record: transition.record,
            newly_learned: transition.newly_learned,
        };
        self.guess = guess;
        self.phase = Phase::AnswerRevealed {
            index,
            outcome: Some(outcome.clone()),
        };
        Some(outcome)
    }

    /// Record a preposition choice. In multiple-choice level the answer is
    /// submitted once every sub-answer the mode needs is filled in.
    pub fn pick_preposition(&mut self, preposition: &str) -> Option<Outcome> {
        if !matches!(self.phase, Phase::Presenting { .. }) {
            return None;
        }
        self.guess.preposition = Some(preposition.to_string());
        self.auto_submit()
    }

    /// Record a case choice. See [`Self::pick_preposition`].
    pub fn pick_case(&mut self, case: &str) -> Option<Outcome> {
        if !matches!(self.phase, Phase::Presenting { .. }) {
            return None;
        }
        self.guess.case = Some(case.to_string());
        self.auto_submit()
    }

    fn auto_submit(&mut self) -> Option<Outcome> {
        if self.config.level == Level::MultipleChoice && self.is_guess_complete() {
            let guess = self.guess.clone();
            self.submit_answer(guess)
        } else {
            None
        }
    }

    /// Every item of the active dataset in dataset order, with its mastery.
    pub fn item_progress(&self) -> Vec<ItemProgress<'_>> {
        let Some(dataset) = self.dataset.as_ref() else {
            return Vec::new();
        };
        dataset
            .items()
            .iter()
            .zip(dataset.keys())
            .map(|(item, key)| ItemProgress {
                item,
                record: self.snapshot.record(key),
            })
            .collect()
    }

    /// Whether the current item asks for a preposition under the current
    /// mode. Items without an expected preposition never do.
    pub fn asks_preposition(&self) -> bool {
        self.current_item()
            .is_some_and(|item| asks_preposition(item, self.config.mode))
    }

    /// See [`Self::asks_preposition`].
    pub fn asks_case(&self) -> bool {
        self.current_item()
            .is_some_and(|item| asks_case(item, self.config.mode))
    }

    /// Whether the pending guess covers everything the current item asks.
    pub fn is_guess_complete(&self) -> bool {
        self.current_item()
            .is_some_and(|item| self.guess.is_complete(item, self.config.mode))
    }

    /// Reveal the answer without grading. The item's progress is untouched.
    pub fn give_up(&mut self) -> bool {
        let Phase::Presenting { index } = self.phase else {
            return false;
        };
        self.phase = Phase::AnswerRevealed {
            index,
            outcome: None,
        };
        true
    }

    /// Move on from a revealed answer to the next item.
    pub fn acknowledge_and_advance(&mut self) -> bool {
        if !matches!(self.phase, Phase::AnswerRevealed { .. }) {
            return false;
        }
        self.advance();
        true
    }

    /// Forget all progress on the active dataset and start over.
    pub fn reset_progress(&mut self) -> bool {
        let Some(dataset) = self.dataset.as_ref() else {
            return false;
        };
        log::info!("Resetting progress for '{}'", dataset.id());
        self.snapshot = ProgressSnapshot::default();
        self.persist();
        self.advance();
        true
    }

    pub fn change_mode(&mut self, mode: QuizMode) {
        self.config.mode = mode;
        self.store.save_config(self.config);
        self.clear_pending_guess();
    }

    pub fn change_level(&mut self, level: Level) {
        self.config.level = level;
        self.store.save_config(self.config);
        self.clear_pending_guess();
    }

    pub fn change_language(&mut self, language: Language) {
        self.language = language;
        self.store.save_language(language);
    }

    fn clear_pending_guess(&mut self) {
        if matches!(self.phase, Phase::Presenting { .. }) {
            self.guess = Guess::default();
        }
    }

    fn advance(&mut self) {
        self.guess = Guess::default();
        let Some(dataset) = self.dataset.as_ref() else {
            return;
        };
        match select_next(dataset.keys(), self.snapshot.learned(), &mut self.rng) {
            Selection::Item(index) => {
                self.choices = dataset
                    .item(index)
                    .map(|item| preposition_choices(item, &mut self.rng))
                    .unwrap_or_default();
                self.phase = Phase::Presenting { index };
            }
            Selection::SessionComplete => {
                log::info!("All items of '{}' are learned", dataset.id());
                self.choices.clear();
                self.phase = Phase::SessionComplete;
            }
        }
    }

    fn persist(&mut self) {
        if let Some(dataset) = self.dataset.as_ref() {
            self.store.save(dataset.id(), &self.snapshot);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    fn items() -> Vec<Item> {
        vec![
            Item::new("denken").with_preposition("an").with_case("Akk"),
            Item::new("warten").with_preposition("auf").with_case("Akk"),
            Item::new("helfen").with_preposition("bei").with_case("Dat"),
            Item::new("träumen").with_preposition("von").with_case("Dat"),
            Item::new("lachen").with_preposition("über").with_case("Akk"),
        ]
    }

    fn loaded(store: MemoryStore, id: &str, items: Vec<Item>) -> SessionController<MemoryStore> {
        let mut session = SessionController::new(store, TinyRng::from_seed(11));
        let ticket = session.select_dataset(id);
        assert!(session.finish_load(&ticket, Ok(Dataset::new(id, items))));
        session
    }

    fn correct_guess(session: &SessionController<MemoryStore>) -> Guess {
        let item = session.current_item().unwrap();
        Guess::new(item.expected_preposition(), item.expected_case())
    }

    fn answer_correctly(session: &mut SessionController<MemoryStore>) -> Outcome {
        let guess = correct_guess(session);
        session.submit_answer(guess).unwrap()
    }

    #[test]
    fn test_load_presents_item() {
        let session = loaded(MemoryStore::new(), "verbs.csv", items());
        assert!(matches!(session.phase(), Phase::Presenting { .. }));
        assert_eq!(session.total_count(), 5);
        assert_eq!(session.score(), 0);
        assert!(session.choices().iter().any(|c| Some(c.as_str())
            == session.current_item().unwrap().expected_preposition()));
    }

    #[test]
    fn test_submit_reveals_and_persists() {
        let mut session = loaded(MemoryStore::new(), "verbs.csv", items());
        let outcome = answer_correctly(&mut session);
        assert!(outcome.correct);
        assert_eq!(outcome.record.consecutive_correct, 1);
        assert!(matches!(
            session.phase(),
            Phase::AnswerRevealed { outcome: Some(_), .. }
        ));
        let stored = session.store().load("verbs.csv");
        assert_eq!(&stored, session.snapshot());
        assert_eq!(stored.attempts().len(), 1);
    }

    #[test]
    fn test_submit_twice_counts_once() {
        let mut session = loaded(MemoryStore::new(), "verbs.csv", items());
        let guess = correct_guess(&session);
        assert!(session.submit_answer(guess.clone()).is_some());
        assert!(session.submit_answer(guess).is_none());
        let key = session.current_key().unwrap().clone();
        assert_eq!(session.snapshot().attempts()[&key], 1);
    }

    /// Wrong, then right three times: learned on the fourth answer, with
    /// the score going up exactly once.
    #[test]
    fn test_learned_on_fourth_answer() {
        let only = vec![Item::new("denken").with_preposition("an").with_case("Akk")];
        let mut session = loaded(MemoryStore::new(), "verbs.csv", only);
        let answers = [
            Guess::new(Some("auf"), Some("Dat")),
            Guess::new(Some("an"), Some("Akk")),
            Guess::new(Some("an"), Some("Akk")),
            Guess::new(Some("an"), Some("Akk")),
        ];
        for (i, guess) in answers.into_iter().enumerate() {
            let outcome = session.submit_answer(guess).unwrap();
            assert_eq!(outcome.correct, i > 0);
            assert_eq!(outcome.newly_learned, i == 3);
            assert_eq!(session.score(), if i == 3 { 1 } else { 0 });
            assert!(session.acknowledge_and_advance());
        }
        assert_eq!(session.phase(), &Phase::SessionComplete);
        assert_eq!(session.learned_count(), 1);
    }

    #[test]
    fn test_give_up_does_not_count() {
        let mut session = loaded(MemoryStore::new(), "verbs.csv", items());
        assert!(session.give_up());
        assert!(matches!(
            session.phase(),
            Phase::AnswerRevealed { outcome: None, .. }
        ));
        assert!(session.snapshot().attempts().is_empty());
        assert_eq!(session.store().load("verbs.csv"), ProgressSnapshot::default());
        assert!(session.submit_answer(Guess::default()).is_none());
        assert!(session.acknowledge_and_advance());
        assert!(matches!(session.phase(), Phase::Presenting { .. }));
    }

    #[test]
    fn test_give_up_keeps_streak() {
        let mut session = loaded(
            MemoryStore::new(),
            "verbs.csv",
            vec![Item::new("denken").with_preposition("an").with_case("Akk")],
        );
        answer_correctly(&mut session);
        session.acknowledge_and_advance();
        session.give_up();
        session.acknowledge_and_advance();
        let outcome = answer_correctly(&mut session);
        assert_eq!(outcome.record.consecutive_correct, 2);
    }

    #[test]
    fn test_multiple_choice_auto_submit() {
        let mut session = loaded(MemoryStore::new(), "verbs.csv", items());
        let item = session.current_item().unwrap().clone();
        assert!(session.pick_case(item.expected_case().unwrap()).is_none());
        assert!(matches!(session.phase(), Phase::Presenting { .. }));
        let outcome = session
            .pick_preposition(item.expected_preposition().unwrap())
            .unwrap();
        assert!(outcome.correct);
    }

    #[test]
    fn test_auto_submit_respects_mode() {
        let mut session = loaded(MemoryStore::new(), "verbs.csv", items());
        session.change_mode(QuizMode::PrepositionOnly);
        let outcome = session.pick_preposition("nonsense").unwrap();
        assert!(!outcome.correct);
    }

    #[test]
    fn test_case_only_item_in_default_mode() {
        let only = vec![Item::new("Mit dem neu__ Auto").with_case("Dat")];
        let mut session = loaded(MemoryStore::new(), "sentences.csv", only);
        assert_eq!(session.config(), QuizConfiguration::default());
        assert!(session.choices().is_empty());
        assert!(!session.asks_preposition());
        assert!(session.asks_case());
        for i in 0..3 {
            let outcome = session.pick_case("Dat").unwrap();
            assert!(outcome.correct);
            assert_eq!(outcome.newly_learned, i == 2);
            assert!(session.acknowledge_and_advance());
        }
        assert_eq!(session.phase(), &Phase::SessionComplete);
        assert_eq!(session.learned_count(), 1);
    }

    #[test]
    fn test_nothing_asked_needs_explicit_submit() {
        let only = vec![Item::new("Mit dem neu__ Auto").with_case("Dat")];
        let mut session = loaded(MemoryStore::new(), "sentences.csv", only);
        session.change_mode(QuizMode::PrepositionOnly);
        assert!(!session.asks_preposition());
        assert!(!session.asks_case());
        assert!(session.is_guess_complete());
        let guess = session.guess().clone();
        assert!(session.submit_answer(guess).unwrap().correct);
    }

    #[test]
    fn test_text_input_waits_for_submit() {
        let mut session = loaded(MemoryStore::new(), "verbs.csv", items());
        session.change_level(Level::TextInput);
        assert!(session.pick_preposition("an").is_none());
        assert!(session.pick_case("Akk").is_none());
        assert!(matches!(session.phase(), Phase::Presenting { .. }));
        let guess = correct_guess(&session);
        assert!(session.submit_answer(guess).unwrap().correct);
    }

    #[test]
    fn test_changing_mode_clears_pending_guess() {
        let mut session = loaded(MemoryStore::new(), "verbs.csv", items());
        session.pick_case("Akk");
        session.change_mode(QuizMode::CaseOnly);
        assert_eq!(session.guess(), &Guess::default());
    }

    #[test]
    fn test_settings_persist() {
        let mut session = SessionController::new(MemoryStore::new(), TinyRng::from_seed(1));
        session.change_mode(QuizMode::CaseOnly);
        session.change_level(Level::TextInput);
        session.change_language(Language::Fr);
        let session = SessionController::new(session.into_store(), TinyRng::from_seed(1));
        assert_eq!(session.config().mode, QuizMode::CaseOnly);
        assert_eq!(session.config().level, Level::TextInput);
        assert_eq!(session.language(), Language::Fr);
    }

    #[test]
    fn test_single_unlearned_item_always_selected() {
        let items = items();
        let mut store = ProgressStore::new(MemoryStore::new());
        let mut snapshot = ProgressSnapshot::default();
        for item in items.iter().filter(|i| i.primary_text() != "helfen") {
            let key = item.key();
            for _ in 0..3 {
                let t = evaluate(snapshot.record(&key), true);
                snapshot.apply(&key, t);
            }
        }
        store.save("verbs.csv", &snapshot);
        let mut session = loaded(store.into_inner(), "verbs.csv", items);
        assert_eq!(session.score(), 4);
        for _ in 0..10 {
            assert_eq!(session.current_index(), Some(2));
            session.give_up();
            session.acknowledge_and_advance();
        }
    }

    #[test]
    fn test_progress_survives_reload_and_reorder() {
        let mut session = loaded(MemoryStore::new(), "verbs.csv", items());
        let key = session.current_key().unwrap().clone();
        for _ in 0..3 {
            let item = session
                .dataset()
                .unwrap()
                .items()
                .iter()
                .find(|i| i.key() == key)
                .unwrap()
                .clone();
            while session.current_key() != Some(&key) {
                session.give_up();
                session.acknowledge_and_advance();
            }
            session
                .submit_answer(Guess::new(item.expected_preposition(), item.expected_case()))
                .unwrap();
            session.acknowledge_and_advance();
        }
        assert_eq!(session.score(), 1);

        let mut reversed = items();
        reversed.reverse();
        let session = loaded(session.into_store(), "verbs.csv", reversed);
        assert_eq!(session.score(), 1);
        assert!(session.snapshot().is_learned(&key));
        assert_ne!(session.current_key(), Some(&key));
    }

    #[test]
    fn test_switching_datasets_keeps_them_apart() {
        let mut session = loaded(MemoryStore::new(), "verbs.csv", items());
        answer_correctly(&mut session);
        let verbs_before = session.store().load("verbs.csv");

        let ticket = session.select_dataset("adjectives.csv");
        assert_eq!(session.score(), 0);
        assert!(session.dataset().is_none());
        let adjectives = vec![Item::new("Mit dem neu__ Auto").with_case("Dat")];
        assert!(session.finish_load(&ticket, Ok(Dataset::new("adjectives.csv", adjectives))));
        assert_eq!(session.snapshot(), &ProgressSnapshot::default());
        answer_correctly(&mut session);

        assert_eq!(session.store().load("verbs.csv"), verbs_before);
        assert_eq!(session.store().load("adjectives.csv").attempts().len(), 1);
        assert_eq!(
            session.store().load_selected_dataset().as_deref(),
            Some("adjectives.csv")
        );
    }

    #[test]
    fn test_stale_load_is_discarded() {
        let mut session = SessionController::new(MemoryStore::new(), TinyRng::from_seed(3));
        let first = session.select_dataset("verbs.csv");
        let second = session.select_dataset("adjectives.csv");
        assert!(!session.finish_load(&first, Ok(Dataset::new("verbs.csv", items()))));
        assert!(session.dataset().is_none());
        assert!(session.finish_load(&second, Ok(Dataset::new("adjectives.csv", items()))));
        assert_eq!(session.dataset().map(Dataset::id), Some("adjectives.csv"));
    }

    #[test]
    fn test_cancelled_load_is_discarded() {
        let mut session = SessionController::new(MemoryStore::new(), TinyRng::from_seed(3));
        let ticket = session.select_dataset("verbs.csv");
        session.cancel_load();
        assert_eq!(session.phase(), &Phase::Idle);
        assert!(!session.finish_load(&ticket, Ok(Dataset::new("verbs.csv", items()))));
        assert_eq!(session.phase(), &Phase::Idle);
    }

    #[test]
    fn test_failed_load() {
        let mut session = SessionController::new(MemoryStore::new(), TinyRng::from_seed(3));
        let ticket = session.select_dataset("missing.csv");
        let err = DatasetLoadError::NotFound {
            dataset: "missing.csv".to_string(),
        };
        assert!(session.finish_load(&ticket, Err(err.clone())));
        assert_eq!(session.phase(), &Phase::Failed(err));
        assert!(session.current_item().is_none());
        assert!(!session.give_up());
        assert!(!session.reset_progress());
    }

    #[test]
    fn test_empty_dataset_fails() {
        let mut session = SessionController::new(MemoryStore::new(), TinyRng::from_seed(3));
        let ticket = session.select_dataset("empty.csv");
        session.finish_load(&ticket, Ok(Dataset::new("empty.csv", Vec::new())));
        assert!(matches!(
            session.phase(),
            Phase::Failed(DatasetLoadError::Empty { .. })
        ));
    }

    #[test]
    fn test_reset_after_completion() {
        let only = vec![Item::new("denken").with_preposition("an").with_case("Akk")];
        let mut session = loaded(MemoryStore::new(), "verbs.csv", only);
        for _ in 0..3 {
            answer_correctly(&mut session);
            session.acknowledge_and_advance();
        }
        assert_eq!(session.phase(), &Phase::SessionComplete);
        assert!(!session.acknowledge_and_advance());
        assert!(session.reset_progress());
        assert_eq!(session.phase(), &Phase::Presenting { index: 0 });
        assert_eq!(session.score(), 0);
        assert_eq!(session.store().load("verbs.csv"), ProgressSnapshot::default());
    }

    #[test]
    fn test_item_progress_follows_answers() {
        let mut session = loaded(MemoryStore::new(), "verbs.csv", items());
        let index = session.current_index().unwrap();
        answer_correctly(&mut session);
        let rows = session.item_progress();
        assert_eq!(rows.len(), 5);
        for (i, row) in rows.iter().enumerate() {
            assert_eq!(row.item, &items()[i]);
            let expected = if i == index { 1 } else { 0 };
            assert_eq!(row.record.consecutive_correct, expected);
            assert!(!row.record.learned);
        }
    }

    #[test]
    fn test_reset_mid_session() {
        let mut session = loaded(MemoryStore::new(), "verbs.csv", items());
        answer_correctly(&mut session);
        assert!(session.acknowledge_and_advance());
        assert!(session.reset_progress());
        assert!(matches!(session.phase(), Phase::Presenting { .. }));
        assert!(session.snapshot().attempts().is_empty());
        assert_eq!(session.store().load("verbs.csv"), ProgressSnapshot::default());
        assert!(session
            .item_progress()
            .iter()
            .all(|row| row.record == MasteryRecord::default()));
    }

    #[test]
    fn test_write_failure_keeps_session_going() {
        let mut store = MemoryStore::new();
        store.set_fail_writes(true);
        let only = vec![Item::new("denken").with_preposition("an").with_case("Akk")];
        let mut session = loaded(store, "verbs.csv", only);
        for _ in 0..3 {
            answer_correctly(&mut session);
            session.acknowledge_and_advance();
        }
        assert!(session.is_degraded());
        assert_eq!(session.score(), 1);
        assert_eq!(session.phase(), &Phase::SessionComplete);
    }
}
