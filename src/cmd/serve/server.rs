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

use std::path::PathBuf;
use std::sync::Arc;

use axum::Router;
use axum::extract::Path;
use axum::extract::State;
use axum::http::HeaderName;
use axum::http::StatusCode;
use axum::http::header::CACHE_CONTROL;
use axum::http::header::CONTENT_TYPE;
use axum::response::Html;
use axum::routing::get;
use karuta_core::config::DrillConfig;
use karuta_core::error::Fallible;
use tokio::net::TcpListener;
use tokio::signal;

use crate::cmd::serve::assets::AssetDir;
use crate::cmd::serve::assets::AssetError;
use crate::cmd::serve::assets::content_type;
use crate::cmd::serve::template::page_template;
use crate::cmd::serve::template::render_app;
use crate::dataset::load_cards;
use crate::dataset::load_config;

const NO_CACHE: &str = "no-cache";

pub struct ServerConfig {
    pub dataset: Option<String>,
    pub config: Option<String>,
    pub pkg_dir: String,
    pub host: String,
    pub port: u16,
}

#[derive(Clone)]
pub struct ServerState {
    pub cards_json: Arc<String>,
    pub card_count: usize,
    pub config: Arc<DrillConfig>,
    pub config_json: Arc<String>,
    pub assets: Arc<AssetDir>,
}

pub async fn start_server(config: ServerConfig) -> Fallible<()> {
    // Fail before binding if the dataset is broken.
    let cards = load_cards(config.dataset)?;
    if cards.is_empty() {
        println!("The dataset has no cards.");
        return Ok(());
    }
    let drill_config = load_config(config.config.as_deref())?;

    let pkg_dir = PathBuf::from(&config.pkg_dir);
    let pkg_dir = pkg_dir.canonicalize().unwrap_or(pkg_dir);
    if !pkg_dir.is_dir() {
        log::warn!(
            "wasm bundle not found at {}; build it with `wasm-pack build crates/karuta-wasm --target web --out-dir ../../pkg`",
            pkg_dir.display()
        );
    }

    let state = ServerState {
        cards_json: Arc::new(cards.to_json()?),
        card_count: cards.len(),
        config_json: Arc::new(serde_json::to_string(&drill_config)?),
        config: Arc::new(drill_config),
        assets: Arc::new(AssetDir::new(pkg_dir)),
    };
    let app = Router::new();
    let app = app.route("/", get(index_handler));
    let app = app.route("/script.js", get(script_handler));
    let app = app.route("/style.css", get(style_handler));
    let app = app.route("/cards.json", get(cards_handler));
    let app = app.route("/config.json", get(config_handler));
    let app = app.route("/pkg/{*path}", get(pkg_handler));
    let app = app.fallback(not_found_handler);
    let app = app.with_state(state);
    let bind = format!("{}:{}", config.host, config.port);

    log::info!("Serving {} cards on http://{bind}/", cards.len());
    let listener = TcpListener::bind(bind).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn index_handler(State(state): State<ServerState>) -> (StatusCode, Html<String>) {
    let body = render_app(&state.config, state.card_count);
    (StatusCode::OK, Html(page_template(body).into_string()))
}

async fn script_handler() -> (StatusCode, [(HeaderName, &'static str); 2], &'static str) {
    (
        StatusCode::OK,
        [(CONTENT_TYPE, "text/javascript"), (CACHE_CONTROL, NO_CACHE)],
        include_str!("script.js"),
    )
}

async fn style_handler() -> (StatusCode, [(HeaderName, &'static str); 2], &'static str) {
    (
        StatusCode::OK,
        [(CONTENT_TYPE, "text/css"), (CACHE_CONTROL, NO_CACHE)],
        include_str!("style.css"),
    )
}

async fn cards_handler(
    State(state): State<ServerState>,
) -> (StatusCode, [(HeaderName, &'static str); 1], String) {
    (
        StatusCode::OK,
        [(CONTENT_TYPE, "application/json")],
        state.cards_json.as_ref().clone(),
    )
}

async fn config_handler(
    State(state): State<ServerState>,
) -> (StatusCode, [(HeaderName, &'static str); 1], String) {
    (
        StatusCode::OK,
        [(CONTENT_TYPE, "application/json")],
        state.config_json.as_ref().clone(),
    )
}

async fn pkg_handler(
    State(state): State<ServerState>,
    Path(path): Path<String>,
) -> (StatusCode, [(HeaderName, &'static str); 1], Vec<u8>) {
    let file = match state.assets.resolve(&path) {
        Ok(file) => file,
        Err(e) => {
            if e == AssetError::Escapes {
                log::warn!("Refused asset path {path:?}");
            }
            return (
                StatusCode::NOT_FOUND,
                [(CONTENT_TYPE, "text/plain")],
                b"Not Found".to_vec(),
            );
        }
    };
    match tokio::fs::read(&file).await {
        Ok(bytes) => (StatusCode::OK, [(CONTENT_TYPE, content_type(&file))], bytes),
        Err(e) => {
            log::error!("Failed to read {}: {e}", file.display());
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                [(CONTENT_TYPE, "text/plain")],
                b"Internal Server Error".to_vec(),
            )
        }
    }
}

async fn not_found_handler() -> (StatusCode, Html<String>) {
    (StatusCode::NOT_FOUND, Html("Not Found".to_string()))
}

async fn shutdown_signal() {
    match signal::ctrl_c().await {
        Ok(()) => log::debug!("Received Ctrl+C, shutting down gracefully"),
        Err(e) => {
            log::error!("Failed to install Ctrl+C handler: {e}");
            std::future::pending::<()>().await
        }
    }
}
