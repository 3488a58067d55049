use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Router;
use axum::routing::{delete, get, patch, post};
use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::auth::CurrentActor;
use crate::error::AppError;
use crate::models::{
    AssignPunishmentRequest, AttendanceRecord, AttendanceView, DaySummary, EditArrivalRequest,
    MarkAbsentRequest, MarkPresentRequest,
};
use crate::services::AttendanceReconciler;
use crate::state::AppState;
use crate::store::AttendanceFilter;

use super::today;

#[derive(Deserialize)]
struct DayQueryParams {
    date: Option<NaiveDate>,
}

#[derive(Deserialize)]
struct HistoryQueryParams {
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
    student_id: Option<String>,
}

#[derive(Serialize)]
struct DaySheet {
    date: NaiveDate,
    class_start: NaiveTime,
    summary: DaySummary,
    records: Vec<AttendanceView>,
}

pub(super) fn routes() -> Router<AppState> {
    Router::new()
        .route("/attendance", get(history))
        .route("/attendance/today", get(day_sheet))
        .route("/attendance/present", post(mark_present))
        .route("/attendance/absent", post(mark_absent))
        .route("/attendance/{id}", delete(delete_record))
        .route("/attendance/{id}/arrival", patch(edit_arrival))
        .route("/attendance/{id}/punishment", patch(assign_punishment))
}

async fn day_sheet(
    State(state): State<AppState>,
    Query(params): Query<DayQueryParams>,
) -> Result<Json<DaySheet>, AppError> {
    let date = params.date.unwrap_or_else(today);
    let records = state.attendance.day_view(date).await?;
    Ok(Json(DaySheet {
        date,
        class_start: state.attendance.class_start(),
        summary: AttendanceReconciler::summarize(&records),
        records,
    }))
}

async fn history(
    State(state): State<AppState>,
    Query(params): Query<HistoryQueryParams>,
) -> Result<Json<Vec<AttendanceRecord>>, AppError> {
    let filter = AttendanceFilter {
        from: params.from,
        to: params.to,
        student_id: params.student_id,
    };
    let records = state.attendance.history(&filter).await?;
    Ok(Json(records))
}

async fn mark_present(
    State(state): State<AppState>,
    actor: CurrentActor,
    Json(req): Json<MarkPresentRequest>,
) -> Result<Json<AttendanceRecord>, AppError> {
    let date = req.date.unwrap_or_else(today);
    let record = state
        .attendance
        .mark_present(&req.student_id, date, &req.arrival_time, actor.user_id())
        .await?;
    Ok(Json(record))
}

async fn mark_absent(
    State(state): State<AppState>,
    actor: CurrentActor,
    Json(req): Json<MarkAbsentRequest>,
) -> Result<Json<AttendanceRecord>, AppError> {
    let date = req.date.unwrap_or_else(today);
    let record = state
        .attendance
        .mark_absent(&req.student_id, date, req.excuse.as_deref(), actor.user_id())
        .await?;
    Ok(Json(record))
}

async fn edit_arrival(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<EditArrivalRequest>,
) -> Result<Json<AttendanceRecord>, AppError> {
    let record = state.attendance.edit_arrival_time(&id, &req.arrival_time).await?;
    Ok(Json(record))
}

async fn assign_punishment(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<AssignPunishmentRequest>,
) -> Result<Json<AttendanceRecord>, AppError> {
    let record = state
        .attendance
        .assign_punishment(&id, req.punishment_id.as_deref())
        .await?;
    Ok(Json(record))
}

async fn delete_record(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    state.attendance.delete_record(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}
