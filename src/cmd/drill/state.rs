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


use std::sync::Arc;
use std::sync::Mutex;
use std::sync::MutexGuard;

use chrono::DateTime;
use chrono::Local;
use kasus_core::error::ErrorReport;
use kasus_core::error::Fallible;
use kasus_core::session::SessionController;
use tokio::sync::oneshot::Sender;

use crate::collection::Catalog;
use crate::db::Database;

#[derive(Clone)]
pub struct ServerState {
    pub catalog: Arc<Catalog>,
    pub session_started_at: DateTime<Local>,
    pub mutable: Arc<Mutex<MutableState>>,
    pub shutdown_tx: Arc<Mutex<Option<Sender<()>>>>,
}

pub struct MutableState {
    pub session: SessionController<Database>,
    /// Answers graded since the server started.
    pub answered: usize,
    /// Answers graded correct since the server started.
    pub correct: usize,
    pub finished_at: Option<DateTime<Local>>,
}

impl ServerState {
    pub fn lock(&self) -> Fallible<MutexGuard<'_, MutableState>> {
        self.mutable
            .lock()
            .map_err(|_| ErrorReport::new("session state is poisoned."))
    }
}
