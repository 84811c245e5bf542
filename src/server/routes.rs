//! HTTP routes for the dashboard and its actions

use axum::{extract::{Path, State}, http::StatusCode, response::{Html, IntoResponse}, routing::{get, post}, Json, Router};
use serde::Serialize;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::core::{Assets, Utxo};
use crate::dispatch::{Action, Dispatcher, Outcome, Recorder};
use crate::emulator::Emulator;
use crate::ui;

#[derive(Clone)]
pub struct AppState { pub session: Arc<Emulator>, pub address: String, pub app_name: String }

impl AppState {
    pub fn new(session: Arc<Emulator>, address: impl Into<String>, app_name: impl Into<String>) -> Self {
        Self { session, address: address.into(), app_name: app_name.into() }
    }

    /// Fresh dispatcher per request; outcomes land in its own recorder.
    fn dispatcher(&self) -> Dispatcher<Emulator, Recorder> {
        Dispatcher::new(self.session.clone(), self.address.clone(), Recorder::new())
    }
}

#[derive(Serialize)]
pub struct ActionResponse {
    success: bool,
    action: Action,
    #[serde(skip_serializing_if = "Option::is_none")]
    tx_hash: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    kind: Option<&'static str>,
}

#[derive(Serialize)]
pub struct HoldingsResponse { address: String, balance: Assets, utxos: Vec<Utxo>, count: usize }

pub fn create_router(session: Arc<Emulator>, address: &str) -> Router { create_router_with_name(session, address, "offchain") }

pub fn create_router_with_name(session: Arc<Emulator>, address: &str, app_name: &str) -> Router {
    Router::new()
        .route("/", get(dashboard))
        .route("/health", get(health))
        .route("/actions", get(actions))
        .route("/actions/:action", post(run_action))
        .route("/wallet", get(wallet))
        .route("/contract", get(contract))
        .layer(CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any))
        .layer(TraceLayer::new_for_http())
        .with_state(AppState::new(session, address, app_name))
}

async fn health(State(s): State<AppState>) -> impl IntoResponse {
    Json(serde_json::json!({"status": "ok", "service": s.app_name}))
}

async fn dashboard(State(s): State<AppState>) -> Html<String> {
    Html(ui::render_dashboard(&s.address))
}

async fn actions() -> Json<Vec<ui::Section>> {
    Json(ui::layout())
}

async fn run_action(State(s): State<AppState>, Path(name): Path<String>) -> Result<(StatusCode, Json<ActionResponse>), (StatusCode, String)> {
    let action = Action::parse(&name).ok_or_else(|| (StatusCode::NOT_FOUND, format!("unknown action: {}", name)))?;
    let dispatcher = s.dispatcher();
    dispatcher.dispatch(action).await;
    match dispatcher.reporter().last() {
        Some(Outcome::Submitted { tx_hash, .. }) => Ok((StatusCode::OK, Json(ActionResponse {
            success: true, action, tx_hash: Some(tx_hash.to_string()), error: None, kind: None,
        }))),
        Some(Outcome::Failed { error, .. }) => Ok((StatusCode::UNPROCESSABLE_ENTITY, Json(ActionResponse {
            success: false, action, tx_hash: None, error: Some(error.to_string()), kind: Some(error.kind()),
        }))),
        None => Err((StatusCode::INTERNAL_SERVER_ERROR, format!("{} reported no outcome", action))),
    }
}

async fn wallet(State(s): State<AppState>) -> Json<HoldingsResponse> {
    Json(holdings(&s.session, s.address.clone()))
}

async fn contract(State(s): State<AppState>) -> Result<Json<HoldingsResponse>, (StatusCode, String)> {
    let address = s.dispatcher().contract_address().map_err(|e| (StatusCode::SERVICE_UNAVAILABLE, e.to_string()))?;
    Ok(Json(holdings(&s.session, address)))
}

fn holdings(session: &Emulator, address: String) -> HoldingsResponse {
    let utxos = session.utxos_at(&address);
    let balance = session.balance_of(&address);
    HoldingsResponse { count: utxos.len(), balance, utxos, address }
}
