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

use axum::Router;
use axum::http::HeaderName;
use axum::http::StatusCode;
use axum::http::header::CACHE_CONTROL;
use axum::http::header::CONTENT_TYPE;
use axum::response::Html;
use axum::routing::get;
use axum::routing::post;
use chrono::DateTime;
use chrono::Local;
use kasus_core::error::Fallible;
use kasus_core::rng::TinyRng;
use kasus_core::session::SessionController;
use tokio::net::TcpListener;
use tokio::select;
use tokio::signal;
use tokio::sync::oneshot::Receiver;
use tokio::sync::oneshot::channel;

use crate::cmd::drill::get::get_handler;
use crate::cmd::drill::post::post_handler;
use crate::cmd::drill::state::MutableState;
use crate::cmd::drill::state::ServerState;
use crate::collection::Collection;
use crate::loader::load_dataset;
use crate::utils::CACHE_CONTROL_IMMUTABLE;
use crate::utils::clock_seed;

pub struct ServerConfig {
    pub directory: Option<String>,
    pub host: String,
    pub port: u16,
    /// Dataset to start with. By default, the one used last.
    pub dataset: Option<String>,
    pub session_started_at: DateTime<Local>,
    /// Seed for item selection. By default, taken from the clock.
    pub seed: Option<u64>,
}

pub async fn start_server(config: ServerConfig) -> Fallible<()> {
    let Collection {
        directory,
        db,
        catalog,
    } = Collection::new(config.directory)?;
    log::debug!("Opened collection at {}", directory.display());

    let seed = config.seed.unwrap_or_else(clock_seed);
    let mut session = SessionController::new(db, TinyRng::from_seed(seed));

    let last_used = session.store().load_selected_dataset();
    let Some(entry) = catalog
        .starting_dataset(config.dataset.as_deref(), last_used.as_deref())?
        .cloned()
    else {
        println!("No datasets found.");
        return Ok(());
    };

    // A dataset that cannot be loaded at startup is fatal. Later failures
    // are shown in the page instead.
    let ticket = session.select_dataset(&entry.id);
    let dataset = load_dataset(&entry).await?;
    session.finish_load(&ticket, Ok(dataset));

    // Create shutdown channel
    let (shutdown_tx, shutdown_rx) = channel();

    let state = ServerState {
        catalog: Arc::new(catalog),
        session_started_at: config.session_started_at,
        mutable: Arc::new(Mutex::new(MutableState {
            session,
            answered: 0,
            correct: 0,
            finished_at: None,
        })),
        shutdown_tx: Arc::new(Mutex::new(Some(shutdown_tx))),
    };
    let app = Router::new();
    let app = app.route("/", get(get_handler));
    let app = app.route("/", post(post_handler));
    let app = app.route("/script.js", get(script_handler));
    let app = app.route("/style.css", get(style_handler));
    let app = app.fallback(not_found_handler);
    let app = app.with_state(state.clone());
    let bind = format!("{}:{}", config.host, config.port);

    // Start the server with graceful shutdown on Ctrl+C or shutdown button.
    log::debug!("Starting server on {bind}");
    let listener = TcpListener::bind(bind).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(shutdown_rx))
        .await?;

    let mutable = state.lock()?;
    log::info!(
        "Session over: {} answers, {} correct, score {}",
        mutable.answered,
        mutable.correct,
        mutable.session.score()
    );
    Ok(())
}

async fn script_handler() -> (StatusCode, [(HeaderName, &'static str); 1], &'static str) {
    (
        StatusCode::OK,
        [(CONTENT_TYPE, "text/javascript")],
        include_str!("script.js"),
    )
}

async fn style_handler() -> (StatusCode, [(HeaderName, &'static str); 2], &'static [u8]) {
    let bytes = include_bytes!("style.css");
    (
        StatusCode::OK,
        [
            (CONTENT_TYPE, "text/css"),
            (CACHE_CONTROL, CACHE_CONTROL_IMMUTABLE),
        ],
        bytes,
    )
}

async fn not_found_handler() -> (StatusCode, Html<String>) {
    (StatusCode::NOT_FOUND, Html("Not Found".to_string()))
}

async fn shutdown_signal(shutdown_rx: Receiver<()>) {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            log::error!("Failed to install Ctrl+C handler: {e}");
            std::future::pending::<()>().await;
        }
    };

    let shutdown = async {
        shutdown_rx.await.ok();
    };

    select! {
        _ = ctrl_c => {
            log::debug!("Received Ctrl+C, shutting down gracefully");
        },
        _ = shutdown => {
            log::debug!("Received shutdown signal, shutting down gracefully");
        },
    }
}
