use crate::{errors::AppError, models::ToyForm, view::BoardView, AppState};
use axum::{
    extract::{Path, State},
    response::{Html, Redirect},
    Form, Json,
};
use std::sync::Arc;

/// GET / renders the whole board.
pub async fn index(State(state): State<Arc<AppState>>) -> Result<Html<String>, AppError> {
    let view = state.board.snapshot().await?;
    let page = state.pages.render(&view)?;
    Ok(Html(page))
}

/// GET /board returns the same snapshot as JSON.
pub async fn board_json(State(state): State<Arc<AppState>>) -> Result<Json<BoardView>, AppError> {
    let view = state.board.snapshot().await?;
    Ok(Json(view))
}

pub async fn toggle_form(State(state): State<Arc<AppState>>) -> Result<Redirect, AppError> {
    state.board.toggle_form()?;
    Ok(Redirect::to("/"))
}

pub async fn submit_toy(
    State(state): State<Arc<AppState>>,
    Form(form): Form<ToyForm>,
) -> Result<Redirect, AppError> {
    tracing::debug!(name = %form.name, image = %form.image, "New toy submitted");
    state.board.submit(form)?;
    wait_for_store(&state).await?;
    Ok(Redirect::to("/"))
}

pub async fn like_toy(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Redirect, AppError> {
    tracing::debug!(toy_id = %id, "Like clicked");
    state.board.like(id.into())?;
    wait_for_store(&state).await?;
    Ok(Redirect::to("/"))
}

// Gives in-flight store calls a bounded chance to land before the redirect,
// so the next page load usually shows the confirmed state.
async fn wait_for_store(state: &AppState) -> Result<(), AppError> {
    match tokio::time::timeout(state.settle_timeout, state.board.settled()).await {
        Ok(settled) => Ok(settled?),
        Err(_) => {
            tracing::debug!(timeout = ?state.settle_timeout, "Store still busy, redirecting anyway");
            Ok(())
        }
    }
}
