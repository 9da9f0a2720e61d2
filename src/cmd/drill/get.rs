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


use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Html;
use chrono::Local;
use kasus_core::config::Language;
use kasus_core::config::Level;
use kasus_core::config::QuizMode;
use kasus_core::error::Fallible;
use kasus_core::grading::CASE_CHOICES;
use kasus_core::grading::matches;
use kasus_core::session::Outcome;
use kasus_core::session::Phase;
use kasus_core::session::SessionController;
use kasus_core::types::item::Item;
use maud::Markup;
use maud::html;

use crate::cmd::drill::state::MutableState;
use crate::cmd::drill::state::ServerState;
use crate::cmd::drill::template::page_template;
use crate::collection::Catalog;
use crate::db::Database;
use crate::i18n::Text;
use crate::i18n::level_label;
use crate::i18n::mode_label;
use crate::i18n::tr;
use crate::utils::format_duration;

type Session = SessionController<Database>;

pub async fn get_handler(State(state): State<ServerState>) -> (StatusCode, Html<String>) {
    match render_page(&state) {
        Ok(markup) => (StatusCode::OK, Html(markup.into_string())),
        Err(e) => {
            log::error!("Failed to render page: {e}");
            (StatusCode::INTERNAL_SERVER_ERROR, Html(e.to_string()))
        }
    }
}

fn render_page(state: &ServerState) -> Fallible<Markup> {
    let mutable = state.lock()?;
    let session = &mutable.session;
    let language = session.language();
    let body = html! {
        div.root {
            (render_header(session))
            (render_settings(&state.catalog, session))
            main {
                (render_phase(session))
            }
            (render_progress(session))
            footer {
                form method="post" {
                    button.shutdown type="submit" name="action" value="Shutdown" {
                        (tr(language, Text::Shutdown))
                    }
                }
            }
        }
    };
    Ok(page_template(language, body))
}

/// The page shown once the server is shutting down.
pub fn render_ended(state: &ServerState, mutable: &MutableState) -> Markup {
    let session = &mutable.session;
    let language = session.language();
    let finished_at = mutable.finished_at.unwrap_or_else(Local::now);
    let duration = finished_at - state.session_started_at;
    let body = html! {
        div.root.ended {
            h1 { (tr(language, Text::SessionEnded)) }
            table.summary {
                tbody {
                    tr {
                        td.key { (tr(language, Text::Score)) }
                        td.val { (session.score()) }
                    }
                    tr {
                        td.key { (tr(language, Text::Learned)) }
                        td.val { (session.learned_count()) " / " (session.total_count()) }
                    }
                    tr {
                        td.key { (tr(language, Text::Correct)) }
                        td.val { (mutable.correct) " / " (mutable.answered) }
                    }
                    tr {
                        td.key { (tr(language, Text::Duration)) }
                        td.val {
                            (format_duration(duration))
                            " (" (state.session_started_at.format("%H:%M")) " - " (finished_at.format("%H:%M")) ")"
                        }
                    }
                }
            }
        }
    };
    page_template(language, body)
}

fn render_header(session: &Session) -> Markup {
    let language = session.language();
    html! {
        header {
            h1 { (tr(language, Text::AppTitle)) }
            div.stats {
                span.score {
                    (tr(language, Text::Score)) ": " (session.score())
                }
                span.progress {
                    (tr(language, Text::Learned)) ": "
                    (session.learned_count()) " / " (session.total_count())
                }
            }
            @if session.is_degraded() {
                div.warning { (tr(language, Text::Degraded)) }
            }
        }
    }
}

/// Per-item streaks with learned rows highlighted, and a reset for the
/// whole dataset.
fn render_progress(session: &Session) -> Markup {
    if session.dataset().is_none() {
        return html! {};
    }
    let language = session.language();
    let total = session.total_count();
    let percent = if total == 0 {
        0
    } else {
        session.learned_count() * 100 / total
    };
    html! {
        details.item-progress {
            summary {
                (tr(language, Text::Progress)) " (" (session.learned_count()) " / " (total) ")"
            }
            div.bar {
                div.fill style=(format!("width: {percent}%")) {}
            }
            form.reset-all method="post" data-confirm=(tr(language, Text::ConfirmReset)) {
                button.reset type="submit" name="action" value="Reset" {
                    (tr(language, Text::ResetAll))
                }
            }
            table.items {
                thead {
                    tr {
                        th { (tr(language, Text::Item)) }
                        th { (tr(language, Text::Preposition)) }
                        th { (tr(language, Text::Case)) }
                        th { (tr(language, Text::Consecutive)) }
                    }
                }
                tbody {
                    @for row in session.item_progress() {
                        tr.learned-row[row.record.learned] {
                            td { (row.item.primary_text()) }
                            td { (row.item.expected_preposition().unwrap_or("")) }
                            td { (row.item.expected_case().unwrap_or("")) }
                            td.streak { (row.record.consecutive_correct) }
                        }
                    }
                }
            }
        }
    }
}

fn render_settings(catalog: &Catalog, session: &Session) -> Markup {
    let language = session.language();
    let config = session.config();
    let active_dataset = session.dataset().map(|d| d.id());
    html! {
        details.settings {
            summary { (tr(language, Text::Settings)) }
            div.setting {
                span.label { (tr(language, Text::Dataset)) }
                @for entry in &catalog.datasets {
                    (option_button("Dataset", &entry.id, &entry.label, active_dataset == Some(entry.id.as_str())))
                }
            }
            div.setting {
                span.label { (tr(language, Text::Mode)) }
                @for mode in QuizMode::ALL {
                    (option_button("Mode", mode.as_str(), mode_label(language, mode), mode == config.mode))
                }
            }
            div.setting {
                span.label { (tr(language, Text::Level)) }
                @for level in Level::ALL {
                    (option_button("Level", level.as_str(), level_label(language, level), level == config.level))
                }
            }
            div.setting {
                span.label { (tr(language, Text::Language)) }
                @for option in Language::ALL {
                    (option_button("Language", option.code(), option.native_name(), option == language))
                }
            }
        }
    }
}

fn option_button(action: &str, value: &str, label: &str, active: bool) -> Markup {
    html! {
        form.option method="post" {
            input type="hidden" name="value" value=(value);
            button.active[active] type="submit" name="action" value=(action) { (label) }
        }
    }
}

fn render_phase(session: &Session) -> Markup {
    let language = session.language();
    match session.phase() {
        Phase::Idle => html! {
            p.message { (tr(language, Text::NoDatasets)) }
        },
        Phase::Loading { .. } => html! {
            p.message { (tr(language, Text::Loading)) }
        },
        Phase::Failed(e) => html! {
            div.error {
                h2 { (tr(language, Text::Error)) }
                p { (e.to_string()) }
                p { (tr(language, Text::ChooseDataset)) }
            }
        },
        Phase::Presenting { .. } => render_question(session),
        Phase::AnswerRevealed { outcome, .. } => render_answer(session, outcome.as_ref()),
        Phase::SessionComplete => html! {
            div.complete {
                h2 { (tr(language, Text::AllLearned)) }
                form method="post" {
                    button #continue type="submit" name="action" value="Reset" autofocus {
                        (tr(language, Text::Restart))
                    }
                }
            }
        },
    }
}

fn render_prompt(item: &Item, language: Language) -> Markup {
    html! {
        div.prompt {
            div.primary { (item.primary_text()) }
            @if let Some(translation) = item.translation(language) {
                div.translation { "(" (translation) ")" }
            }
        }
    }
}

fn render_question(session: &Session) -> Markup {
    let Some(item) = session.current_item() else {
        return html! {};
    };
    let language = session.language();
    let guess = session.guess();
    let controls = match session.config().level {
        Level::MultipleChoice => html! {
            @if session.asks_preposition() {
                div.choices {
                    span.label { (tr(language, Text::Preposition)) }
                    @for choice in session.choices() {
                        (choice_button("Preposition", choice, guess.preposition.as_deref() == Some(choice.as_str())))
                    }
                }
            }
            @if session.asks_case() {
                div.choices {
                    span.label { (tr(language, Text::Case)) }
                    @for case in CASE_CHOICES {
                        (choice_button("Case", case, guess.case.as_deref() == Some(case)))
                    }
                }
            }
            form method="post" {
                // Nothing left to pick means nothing was asked.
                @if session.is_guess_complete() {
                    button type="submit" name="action" value="Guess" {
                        (tr(language, Text::Guess))
                    }
                }
                button.give-up type="submit" name="action" value="GiveUp" {
                    (tr(language, Text::GiveUp))
                }
            }
        },
        Level::TextInput => html! {
            form.answer method="post" {
                @if session.asks_preposition() {
                    label {
                        span.label { (tr(language, Text::Preposition)) }
                        input type="text" name="preposition" autocomplete="off" autofocus;
                    }
                }
                @if session.asks_case() {
                    div.choices {
                        span.label { (tr(language, Text::Case)) }
                        @for case in CASE_CHOICES {
                            label.case-option {
                                input type="radio" name="case" value=(case) required;
                                span { (case) }
                            }
                        }
                    }
                }
                button type="submit" name="action" value="Guess" {
                    (tr(language, Text::Guess))
                }
                button.give-up type="submit" name="action" value="GiveUp" formnovalidate {
                    (tr(language, Text::GiveUp))
                }
            }
        },
    };
    html! {
        (render_prompt(item, language))
        div.question {
            (controls)
        }
    }
}

fn choice_button(action: &str, value: &str, selected: bool) -> Markup {
    html! {
        form.choice method="post" {
            input type="hidden" name="value" value=(value);
            button.selected[selected] type="submit" name="action" value=(action) { (value) }
        }
    }
}

fn render_answer(session: &Session, outcome: Option<&Outcome>) -> Markup {
    let Some(item) = session.current_item() else {
        return html! {};
    };
    let language = session.language();
    html! {
        (render_prompt(item, language))
        div.reveal {
            @if let Some(outcome) = outcome {
                @if outcome.correct {
                    div.verdict.correct { (tr(language, Text::Correct)) }
                } @else {
                    div.verdict.incorrect { (tr(language, Text::Incorrect)) }
                }
            }
            @if session.asks_preposition() {
                (answer_line(
                    tr(language, Text::Preposition),
                    item.expected_preposition(),
                    outcome.map(|o| o.guess.preposition.as_deref()),
                ))
            }
            @if session.asks_case() {
                (answer_line(
                    tr(language, Text::Case),
                    item.expected_case(),
                    outcome.map(|o| o.guess.case.as_deref()),
                ))
            }
            @if outcome.is_some_and(|o| o.newly_learned) {
                div.learned { (tr(language, Text::NewlyLearned)) }
            }
            @if let Some(example) = item.example() {
                div.example {
                    span.label { (tr(language, Text::Example)) ": " }
                    (example)
                }
                @if let Some(translation) = item.example_translation(language) {
                    div.example-translation {
                        span.label { (tr(language, Text::Translation)) ": " }
                        (translation)
                    }
                }
            }
            form method="post" {
                button #continue type="submit" name="action" value="Continue" autofocus {
                    (tr(language, Text::Continue))
                }
            }
        }
    }
}

/// One sub-answer. `given` is `None` when the user gave up.
fn answer_line(label: &str, expected: Option<&str>, given: Option<Option<&str>>) -> Markup {
    let expected_text = expected.unwrap_or("-");
    html! {
        div.answer-line {
            span.label { (label) ": " }
            @match given {
                Some(given) if matches(expected, given) => {
                    span.correct { (expected_text) }
                }
                Some(given) => {
                    span.incorrect { (given.unwrap_or("")) }
                    " "
                    span.expected { "(" (expected_text) ")" }
                }
                None => {
                    span.expected { (expected_text) }
                }
            }
        }
    }
}
