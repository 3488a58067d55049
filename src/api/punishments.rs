use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::{Router, routing::get};

use crate::auth::CurrentActor;
use crate::db::punishments as repository;
use crate::error::AppError;
use crate::models::{Punishment, PunishmentRequest};
use crate::services::roster;
use crate::state::AppState;

pub(super) fn routes() -> Router<AppState> {
    Router::new()
        .route("/punishments", get(list_punishments).post(create_punishment))
        .route(
            "/punishments/{id}",
            get(get_punishment)
                .patch(update_punishment)
                .delete(delete_punishment),
        )
}

async fn list_punishments(
    State(state): State<AppState>,
) -> Result<Json<Vec<Punishment>>, AppError> {
    let punishments = repository::fetch_punishments(&state.db).await?;
    Ok(Json(punishments))
}

async fn get_punishment(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Punishment>, AppError> {
    let punishment = repository::find_punishment_by_id(&state.db, &id)
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(Json(punishment))
}

async fn create_punishment(
    State(state): State<AppState>,
    actor: CurrentActor,
    Json(req): Json<PunishmentRequest>,
) -> Result<(StatusCode, Json<Punishment>), AppError> {
    let punishment = roster::add_punishment(&state.db, &req.name, actor.user_id()).await?;
    Ok((StatusCode::CREATED, Json(punishment)))
}

async fn update_punishment(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<PunishmentRequest>,
) -> Result<Json<Punishment>, AppError> {
    let punishment = roster::rename_punishment(&state.db, &id, &req.name).await?;
    Ok(Json(punishment))
}

async fn delete_punishment(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    roster::remove_punishment(&state.db, &id).await?;
    Ok(StatusCode::NO_CONTENT)
}
