mod attendance;
mod progress;
mod punishments;
mod students;
mod ustazs;

use axum::Json;
use axum::{Router, extract::State, http::StatusCode, routing::get};
use chrono::{Local, NaiveDate};

use crate::error::AppError;
use crate::services::{ClassData, roster};
use crate::state::AppState;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/class-data", get(class_data))
        .merge(students::routes())
        .merge(attendance::routes())
        .merge(progress::routes())
        .merge(punishments::routes())
        .merge(weekly_tests::routes())
        .merge(ustazs::routes())
        .with_state(state)
}

/// The local calendar day, used when a request leaves the date out.
fn today() -> NaiveDate {
    Local::now().date_naive()
}

async fn health(State(state): State<AppState>) -> Result<StatusCode, AppError> {
    sqlx::query("select 1").execute(&state.db).await?;
    Ok(StatusCode::OK)
}

async fn class_data(State(state): State<AppState>) -> Result<Json<ClassData>, AppError> {
    let data = roster::load_class_data(&state.db).await?;
    Ok(Json(data))
}
