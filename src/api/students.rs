use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::{Router, routing::get};

use crate::auth::CurrentActor;
use crate::db::students as repository;
use crate::error::AppError;
use crate::models::{NewStudentRequest, Student, UpdateStudentRequest};
use crate::services::roster;
use crate::state::AppState;

pub(super) fn routes() -> Router<AppState> {
    Router::new()
        .route("/students", get(list_students).post(create_student))
        .route(
            "/students/{id}",
            get(get_student).patch(update_student).delete(delete_student),
        )
}

async fn list_students(State(state): State<AppState>) -> Result<Json<Vec<Student>>, AppError> {
    let students = repository::fetch_students(&state.db).await?;
    Ok(Json(students))
}

async fn get_student(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Student>, AppError> {
    let student = repository::find_student_by_id(&state.db, &id)
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(Json(student))
}

async fn create_student(
    State(state): State<AppState>,
    actor: CurrentActor,
    Json(req): Json<NewStudentRequest>,
) -> Result<(StatusCode, Json<Student>), AppError> {
    let student = roster::add_student(&state.db, req, actor.user_id()).await?;
    Ok((StatusCode::CREATED, Json(student)))
}

async fn update_student(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<UpdateStudentRequest>,
) -> Result<Json<Student>, AppError> {
    let student = roster::update_student(&state.db, &id, req).await?;
    Ok(Json(student))
}

async fn delete_student(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    roster::remove_student(&state.db, &id).await?;
    Ok(StatusCode::NO_CONTENT)
}
