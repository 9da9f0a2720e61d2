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


//! kasus-core: progress engine for a German preposition and case trainer.
//!
//! This library is free of I/O and compiles to WASM. It provides:
//! - Parsing CSV datasets of drill items
//! - Content-derived keys that identify items across edits
//! - Grading, mastery tracking and selection of the next item
//! - A session controller that ties these together over any key-value store

pub mod config;
pub mod dataset;
pub mod error;
pub mod grading;
pub mod mastery;
pub mod progress;
pub mod rng;
pub mod selector;
pub mod session;
pub mod store;
pub mod types;

// Re-exports for convenience
pub use config::{Language, Level, QuizConfiguration, QuizMode};
pub use dataset::{Dataset, DatasetLoadError, parse_dataset};
pub use error::{ErrorReport, Fallible, fail};
pub use grading::{Guess, asks_case, asks_preposition, grade};
pub use mastery::{LEARNED_THRESHOLD, MasteryRecord, MasteryState, evaluate};
pub use progress::ProgressSnapshot;
pub use rng::TinyRng;
pub use selector::{Selection, select_next};
pub use session::{ItemProgress, LoadTicket, Outcome, Phase, SessionController};
pub use store::{KeyValueStore, MemoryStore, ProgressStore};
pub use types::content_key::ContentKey;
pub use types::item::Item;
