use crate::cards::RepoCard;
use crate::github::GitHubClient;
use crate::loader::spawn_load;
use crate::models::{SortKey, Theme};
use crate::page::{render_page, PageContext};
use crate::theme::ThemeStore;
use crate::view::{PanelState, PanelVisibility, PortfolioView};
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Json, Redirect, Response},
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::RwLock;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

/// Shared state of the portfolio server
#[derive(Clone)]
pub struct AppState {
    pub client: Arc<GitHubClient>,
    pub username: String,
    pub view: Arc<RwLock<PortfolioView>>,
    pub themes: ThemeStore,
    pub system_theme: Option<Theme>,
}

impl AppState {
    async fn current_theme(&self) -> Theme {
        match self.themes.current(self.system_theme).await {
            Ok(theme) => theme,
            Err(e) => {
                error!(error = %e, "Failed to read theme preference");
                crate::theme::resolve(None, self.system_theme)
            }
        }
    }
}

/// Query parameters for sorted views
#[derive(Debug, Deserialize)]
pub struct SortParams {
    pub sort: Option<String>,
}

/// Repository grid as JSON
#[derive(Debug, Serialize, Deserialize)]
pub struct ReposResponse {
    pub sort: SortKey,
    pub state: PanelState,
    pub visibility: PanelVisibility,
    pub cards: Vec<RepoCard>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ThemeResponse {
    pub theme: Theme,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/theme/toggle", post(toggle_theme_form))
        .route("/api/repos", get(list_repos))
        .route("/api/profile", get(get_profile))
        .route("/api/theme", get(get_theme))
        .route("/api/theme/toggle", post(toggle_theme))
        .route("/api/refresh", post(refresh))
        .route("/healthz", get(liveness_check))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Starts the background load and serves until the process stops.
pub async fn serve(state: AppState, port: u16) -> crate::error::Result<()> {
    spawn_load(state.client.clone(), state.username.clone(), state.view.clone());

    let app = create_router(state);
    let addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    info!("Portfolio server listening on http://{}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}

/// A `sort` parameter replaces the process-wide key before rendering.
async fn apply_sort(state: &AppState, params: &SortParams) {
    if let Some(sort) = params.sort.as_deref() {
        state.view.write().await.set_sort_key(SortKey::from(sort));
    }
}

async fn index(State(state): State<AppState>, Query(params): Query<SortParams>) -> Html<String> {
    apply_sort(&state, &params).await;
    let theme = state.current_theme().await;

    let view = state.view.read().await;
    let cards = view.cards();
    Html(render_page(&PageContext::from_view(&view, &cards, &state.username, theme)))
}

async fn list_repos(
    State(state): State<AppState>,
    Query(params): Query<SortParams>,
) -> Json<ReposResponse> {
    apply_sort(&state, &params).await;

    let view = state.view.read().await;
    Json(ReposResponse {
        sort: view.sort_key(),
        state: view.repo_panel().clone(),
        visibility: view.visibility(),
        cards: view.cards(),
    })
}

async fn get_profile(State(state): State<AppState>) -> Response {
    match state.view.read().await.profile() {
        Some(profile) => Json(profile.clone()).into_response(),
        None => (
            StatusCode::NOT_FOUND,
            Json(ErrorResponse {
                error: "Profile not loaded".to_string(),
            }),
        )
            .into_response(),
    }
}

async fn get_theme(State(state): State<AppState>) -> Json<ThemeResponse> {
    Json(ThemeResponse {
        theme: state.current_theme().await,
    })
}

async fn toggle_theme(State(state): State<AppState>) -> Response {
    match state.themes.toggle(state.system_theme).await {
        Ok(theme) => Json(ThemeResponse { theme }).into_response(),
        Err(e) => {
            error!(error = %e, "Failed to toggle theme");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: e.to_string(),
                }),
            )
                .into_response()
        }
    }
}

async fn toggle_theme_form(State(state): State<AppState>) -> Redirect {
    if let Err(e) = state.themes.toggle(state.system_theme).await {
        error!(error = %e, "Failed to toggle theme");
    }
    Redirect::to("/")
}

async fn refresh(State(state): State<AppState>) -> StatusCode {
    info!(username = %state.username, "Refreshing portfolio data");
    spawn_load(state.client.clone(), state.username.clone(), state.view.clone());
    StatusCode::ACCEPTED
}

async fn liveness_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "alive" }))
}
