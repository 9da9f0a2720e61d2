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


//! WASM bindings for kasus - runs the trainer in the browser.
//!
//! Loading a dataset from JavaScript:
//!
//! ```js
//! const load = app.select_dataset("verbs.csv");
//! const fetched = await fetch_dataset("verbs.csv", "/verbs.csv");
//! app.finish_load(load, fetched);
//! ```

use kasus_core::config::Language;
use kasus_core::config::Level;
use kasus_core::config::QuizMode;
use kasus_core::dataset::Dataset;
use kasus_core::dataset::DatasetLoadError;
use kasus_core::dataset::parse_dataset;
use kasus_core::grading::CASE_CHOICES;
use kasus_core::grading::Guess;
use kasus_core::rng::TinyRng;
use kasus_core::session::LoadTicket;
use kasus_core::session::Outcome;
use kasus_core::session::Phase;
use kasus_core::session::SessionController;
use kasus_core::types::item::Item;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use web_sys::Response;
use web_sys::console;

mod storage;

use storage::Storage;

#[wasm_bindgen(start)]
pub fn main() {
    console_error_panic_hook::set_once();
    console::log_1(&"kasus WASM initialized".into());
}

/// A dataset load in flight.
#[wasm_bindgen]
pub struct PendingLoad(LoadTicket);

/// The result of [`fetch_dataset`].
#[wasm_bindgen]
pub struct FetchedDataset(Result<Dataset, DatasetLoadError>);

/// Fetch and parse a dataset. Never fails: errors are carried to
/// [`TrainerApp::finish_load`].
#[wasm_bindgen]
pub async fn fetch_dataset(dataset_id: String, url: String) -> FetchedDataset {
    FetchedDataset(fetch_and_parse(&dataset_id, &url).await)
}

async fn fetch_and_parse(dataset_id: &str, url: &str) -> Result<Dataset, DatasetLoadError> {
    let malformed = |reason: String| DatasetLoadError::Malformed {
        dataset: dataset_id.to_string(),
        reason,
    };
    let window = web_sys::window().ok_or_else(|| malformed("no window".to_string()))?;
    let response = JsFuture::from(window.fetch_with_str(url))
        .await
        .map_err(|e| malformed(format!("{e:?}")))?;
    let response: Response = response
        .dyn_into()
        .map_err(|e| malformed(format!("{e:?}")))?;
    if !response.ok() {
        return Err(DatasetLoadError::NotFound {
            dataset: dataset_id.to_string(),
        });
    }
    let text = response.text().map_err(|e| malformed(format!("{e:?}")))?;
    let text = JsFuture::from(text)
        .await
        .map_err(|e| malformed(format!("{e:?}")))?
        .as_string()
        .ok_or_else(|| malformed("response is not text".to_string()))?;
    parse_dataset(dataset_id, &text)
}

/// The main application state managed from JavaScript.
#[wasm_bindgen]
pub struct TrainerApp {
    session: SessionController<Storage>,
}

#[wasm_bindgen]
impl TrainerApp {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self {
            session: SessionController::new(Storage::new(), TinyRng::from_seed(seed())),
        }
    }

    /// The dataset selected last time, if any.
    #[wasm_bindgen]
    pub fn last_dataset(&self) -> Option<String> {
        self.session.store().load_selected_dataset()
    }

    #[wasm_bindgen]
    pub fn select_dataset(&mut self, dataset_id: &str) -> PendingLoad {
        PendingLoad(self.session.select_dataset(dataset_id))
    }

    /// Returns false if the load was superseded or cancelled.
    #[wasm_bindgen]
    pub fn finish_load(&mut self, load: &PendingLoad, fetched: FetchedDataset) -> bool {
        self.session.finish_load(&load.0, fetched.0)
    }

    #[wasm_bindgen]
    pub fn cancel_load(&mut self) {
        self.session.cancel_load();
    }

    /// One of `idle`, `loading`, `failed`, `presenting`, `revealed`, `complete`.
    #[wasm_bindgen]
    pub fn phase(&self) -> String {
        match self.session.phase() {
            Phase::Idle => "idle",
            Phase::Loading { .. } => "loading",
            Phase::Failed(_) => "failed",
            Phase::Presenting { .. } => "presenting",
            Phase::AnswerRevealed { .. } => "revealed",
            Phase::SessionComplete => "complete",
        }
        .to_string()
    }

    #[wasm_bindgen]
    pub fn error_message(&self) -> Option<String> {
        match self.session.phase() {
            Phase::Failed(e) => Some(e.to_string()),
            _ => None,
        }
    }

    #[wasm_bindgen]
    pub fn primary_text(&self) -> Option<String> {
        self.item().map(|item| item.primary_text().to_string())
    }

    #[wasm_bindgen]
    pub fn translation(&self) -> Option<String> {
        let language = self.session.language();
        self.item()
            .and_then(|item| item.translation(language))
            .map(str::to_string)
    }

    #[wasm_bindgen]
    pub fn example(&self) -> Option<String> {
        self.item().and_then(Item::example).map(str::to_string)
    }

    #[wasm_bindgen]
    pub fn example_translation(&self) -> Option<String> {
        let language = self.session.language();
        self.item()
            .and_then(|item| item.example_translation(language))
            .map(str::to_string)
    }

    #[wasm_bindgen]
    pub fn expected_preposition(&self) -> Option<String> {
        self.item()
            .and_then(Item::expected_preposition)
            .map(str::to_string)
    }

    #[wasm_bindgen]
    pub fn expected_case(&self) -> Option<String> {
        self.item().and_then(Item::expected_case).map(str::to_string)
    }

    #[wasm_bindgen]
    pub fn preposition_choices(&self) -> Vec<String> {
        self.session.choices().to_vec()
    }

    /// Whether the current item asks for a preposition. Items without one
    /// only ask for the case.
    #[wasm_bindgen]
    pub fn asks_preposition(&self) -> bool {
        self.session.asks_preposition()
    }

    #[wasm_bindgen]
    pub fn asks_case(&self) -> bool {
        self.session.asks_case()
    }

    /// Whether everything the current item asks has been picked. True from
    /// the start when nothing is asked, in which case a Guess button is
    /// needed.
    #[wasm_bindgen]
    pub fn is_guess_complete(&self) -> bool {
        self.session.is_guess_complete()
    }

    #[wasm_bindgen]
    pub fn case_choices(&self) -> Vec<String> {
        CASE_CHOICES.iter().map(|c| c.to_string()).collect()
    }

    /// The preposition picked or submitted so far.
    #[wasm_bindgen]
    pub fn guessed_preposition(&self) -> Option<String> {
        self.session.guess().preposition.clone()
    }

    /// The case picked or submitted so far.
    #[wasm_bindgen]
    pub fn guessed_case(&self) -> Option<String> {
        self.session.guess().case.clone()
    }

    /// Whether the revealed answer was correct. `None` before grading and
    /// after giving up.
    #[wasm_bindgen]
    pub fn was_correct(&self) -> Option<bool> {
        self.outcome().map(|o| o.correct)
    }

    #[wasm_bindgen]
    pub fn newly_learned(&self) -> bool {
        self.outcome().is_some_and(|o| o.newly_learned)
    }

    /// Returns whether the answer was correct, if it was submitted.
    #[wasm_bindgen]
    pub fn pick_preposition(&mut self, preposition: &str) -> Option<bool> {
        self.session.pick_preposition(preposition).map(|o| o.correct)
    }

    /// Returns whether the answer was correct, if it was submitted.
    #[wasm_bindgen]
    pub fn pick_case(&mut self, case: &str) -> Option<bool> {
        self.session.pick_case(case).map(|o| o.correct)
    }

    #[wasm_bindgen]
    pub fn submit_answer(&mut self, preposition: Option<String>, case: Option<String>) -> Option<bool> {
        self.session
            .submit_answer(Guess { preposition, case })
            .map(|o| o.correct)
    }

    #[wasm_bindgen]
    pub fn give_up(&mut self) -> bool {
        self.session.give_up()
    }

    #[wasm_bindgen]
    pub fn acknowledge_and_advance(&mut self) -> bool {
        self.session.acknowledge_and_advance()
    }

    #[wasm_bindgen]
    pub fn reset_progress(&mut self) -> bool {
        self.session.reset_progress()
    }

    #[wasm_bindgen]
    pub fn score(&self) -> usize {
        self.session.score()
    }

    #[wasm_bindgen]
    pub fn learned_count(&self) -> usize {
        self.session.learned_count()
    }

    #[wasm_bindgen]
    pub fn total_count(&self) -> usize {
        self.session.total_count()
    }

    /// Whether progress may not be surviving a reload.
    #[wasm_bindgen]
    pub fn is_degraded(&self) -> bool {
        self.session.is_degraded()
    }

    /// `prep`, `case` or `both`.
    #[wasm_bindgen]
    pub fn mode(&self) -> String {
        self.session.config().mode.to_string()
    }

    #[wasm_bindgen]
    pub fn set_mode(&mut self, mode: &str) -> Result<(), JsValue> {
        let mode = QuizMode::try_from(mode.to_string()).map_err(to_js)?;
        self.session.change_mode(mode);
        Ok(())
    }

    /// `1` for multiple choice, `2` for text input.
    #[wasm_bindgen]
    pub fn level(&self) -> String {
        self.session.config().level.to_string()
    }

    #[wasm_bindgen]
    pub fn set_level(&mut self, level: &str) -> Result<(), JsValue> {
        let level = Level::try_from(level.to_string()).map_err(to_js)?;
        self.session.change_level(level);
        Ok(())
    }

    /// `en`, `fr` or `es`.
    #[wasm_bindgen]
    pub fn language(&self) -> String {
        self.session.language().code().to_string()
    }

    #[wasm_bindgen]
    pub fn set_language(&mut self, language: &str) -> Result<(), JsValue> {
        let language = Language::try_from(language.to_string()).map_err(to_js)?;
        self.session.change_language(language);
        Ok(())
    }

    /// Every item with its streak and learned flag, as a JSON array.
    #[wasm_bindgen]
    pub fn item_progress(&self) -> String {
        serde_json::to_string(&self.session.item_progress()).unwrap_or_else(|_| "[]".to_string())
    }

    /// The active dataset's progress as JSON.
    #[wasm_bindgen]
    pub fn export_progress(&self) -> String {
        serde_json::to_string(self.session.snapshot()).unwrap_or_else(|_| "{}".to_string())
    }
}

impl TrainerApp {
    fn item(&self) -> Option<&Item> {
        self.session.current_item()
    }

    fn outcome(&self) -> Option<&Outcome> {
        match self.session.phase() {
            Phase::AnswerRevealed { outcome, .. } => outcome.as_ref(),
            _ => None,
        }
    }
}

impl Default for TrainerApp {
    fn default() -> Self {
        Self::new()
    }
}

fn seed() -> u64 {
    let mut bytes = [0u8; 8];
    match getrandom::getrandom(&mut bytes) {
        Ok(()) => u64::from_le_bytes(bytes),
        Err(_) => js_sys::Date::now() as u64,
    }
}

fn to_js(e: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&e.to_string())
}
