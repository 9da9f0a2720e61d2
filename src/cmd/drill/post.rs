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


use axum::Form;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Html;
use axum::response::IntoResponse;
use axum::response::Redirect;
use axum::response::Response;
use chrono::Local;
use kasus_core::config::Language;
use kasus_core::config::Level;
use kasus_core::config::QuizMode;
use kasus_core::error::ErrorReport;
use kasus_core::error::Fallible;
use kasus_core::error::fail;
use kasus_core::grading::Guess;
use maud::Markup;
use serde::Deserialize;

use crate::cmd::drill::get::render_ended;
use crate::cmd::drill::state::ServerState;
use crate::loader::load_dataset;

#[derive(Clone, Copy, Debug, Deserialize)]
pub enum Action {
    Preposition,
    Case,
    Guess,
    GiveUp,
    Continue,
    Mode,
    Level,
    Language,
    Dataset,
    Reset,
    Shutdown,
}

#[derive(Deserialize)]
pub struct FormData {
    action: Action,
    value: Option<String>,
    preposition: Option<String>,
    case: Option<String>,
}

pub async fn post_handler(State(state): State<ServerState>, Form(form): Form<FormData>) -> Response {
    log::debug!("Action: {:?}", form.action);
    let result = match form.action {
        Action::Shutdown => match shutdown(&state) {
            Ok(page) => return Html(page.into_string()).into_response(),
            Err(e) => Err(e),
        },
        Action::Dataset => switch_dataset(&state, form.value).await,
        _ => apply(&state, form),
    };
    match result {
        Ok(()) => Redirect::to("/").into_response(),
        Err(e) => {
            log::error!("Failed to handle action: {e}");
            (StatusCode::BAD_REQUEST, Html(e.to_string())).into_response()
        }
    }
}

fn apply(state: &ServerState, form: FormData) -> Fallible<()> {
    let mut mutable = state.lock()?;
    let session = &mut mutable.session;
    let outcome = match form.action {
        Action::Preposition => session.pick_preposition(&required(form.value)?),
        Action::Case => session.pick_case(&required(form.value)?),
        Action::Guess => {
            // Text input sends the fields; multiple choice submits what was
            // picked so far.
            let guess = if form.preposition.is_some() || form.case.is_some() {
                Guess {
                    preposition: form.preposition,
                    case: form.case,
                }
            } else {
                session.guess().clone()
            };
            session.submit_answer(guess)
        }
        Action::GiveUp => {
            session.give_up();
            None
        }
        Action::Continue => {
            session.acknowledge_and_advance();
            None
        }
        Action::Mode => {
            session.change_mode(QuizMode::try_from(required(form.value)?)?);
            None
        }
        Action::Level => {
            session.change_level(Level::try_from(required(form.value)?)?);
            None
        }
        Action::Language => {
            session.change_language(Language::try_from(required(form.value)?)?);
            None
        }
        Action::Reset => {
            session.reset_progress();
            None
        }
        Action::Dataset | Action::Shutdown => None,
    };
    if let Some(outcome) = outcome {
        mutable.answered += 1;
        if outcome.correct {
            mutable.correct += 1;
        }
    }
    Ok(())
}

/// Load another dataset. The lock is released while the file is read.
async fn switch_dataset(state: &ServerState, value: Option<String>) -> Fallible<()> {
    let id = required(value)?;
    let Some(entry) = state.catalog.dataset(&id).cloned() else {
        return fail(format!("no dataset named '{id}' in the collection."));
    };
    let ticket = state.lock()?.session.select_dataset(&entry.id);
    let result = load_dataset(&entry).await;
    state.lock()?.session.finish_load(&ticket, result);
    Ok(())
}

fn shutdown(state: &ServerState) -> Fallible<Markup> {
    let page = {
        let mut mutable = state.lock()?;
        mutable.finished_at = Some(Local::now());
        render_ended(state, &mutable)
    };
    let sender = state
        .shutdown_tx
        .lock()
        .map_err(|_| ErrorReport::new("shutdown channel is poisoned."))?
        .take();
    if let Some(sender) = sender {
        let _ = sender.send(());
    }
    Ok(page)
}

fn required(value: Option<String>) -> Fallible<String> {
    match value {
        Some(value) => Ok(value),
        None => fail("missing form value."),
    }
}
