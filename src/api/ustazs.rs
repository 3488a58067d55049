use axum::Json;
use axum::Router;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{patch, post};

use crate::error::AppError;
use crate::models::{ChangePasswordRequest, LoginRequest, RegisterUstazRequest, Ustaz};
use crate::services::accounts;
use crate::state::AppState;

pub(super) fn routes() -> Router<AppState> {
    Router::new()
        .route("/ustazs/register", post(register))
        .route("/ustazs/login", post(login))
        .route("/ustazs/{id}/password", patch(change_password))
}

async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterUstazRequest>,
) -> Result<(StatusCode, Json<Ustaz>), AppError> {
    let ustaz = accounts::register(&state.db, req).await?;
    Ok((StatusCode::CREATED, Json(ustaz)))
}

async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<Ustaz>, AppError> {
    let ustaz = accounts::login(&state.db, &req.user_name, &req.password).await?;
    Ok(Json(ustaz))
}

async fn change_password(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<ChangePasswordRequest>,
) -> Result<StatusCode, AppError> {
    accounts::change_password(&state.db, &id, &req.new_password).await?;
    Ok(StatusCode::NO_CONTENT)
}
