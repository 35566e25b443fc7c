use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use uuid::Uuid;

use crate::errors::AppError;
use crate::shortcuts::{ShortcutCommand, ShortcutMode};
use crate::state::AppState;

/// GET /api/v1/shortcuts
pub async fn handle_list(State(state): State<AppState>) -> Json<Vec<ShortcutCommand>> {
    Json(state.shortcuts.list())
}

#[derive(Deserialize)]
pub struct ShortcutUpsert {
    #[serde(default)]
    pub id: Option<Uuid>,
    pub name: String,
    pub prompt: String,
    pub mode: ShortcutMode,
    #[serde(default)]
    pub model: Option<String>,
}

/// POST /api/v1/shortcuts — creates when no id is given, replaces otherwise.
pub async fn handle_upsert(
    State(state): State<AppState>,
    Json(req): Json<ShortcutUpsert>,
) -> Result<Json<ShortcutCommand>, AppError> {
    if req.name.trim().is_empty() {
        return Err(AppError::Validation("name must not be empty".to_string()));
    }
    if req.prompt.trim().is_empty() {
        return Err(AppError::Validation("prompt must not be empty".to_string()));
    }
    let command = ShortcutCommand {
        id: req.id.unwrap_or_else(Uuid::new_v4),
        name: req.name,
        prompt: req.prompt,
        mode: req.mode,
        model: req.model,
    };
    let saved = state.shortcuts.upsert(command)?;
    Ok(Json(saved))
}

/// DELETE /api/v1/shortcuts/:id
pub async fn handle_delete(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    if state.shortcuts.remove(id)? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound(format!("shortcut {id} not found")))
    }
}
