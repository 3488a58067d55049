use axum::Json;
use axum::Router;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::{get, patch, post};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::auth::CurrentActor;
use crate::clock::WeekRange;
use crate::error::AppError;
use crate::models::{ResolveGoalRequest, SetGoalRequest, WeekSummary, WeeklyProgressGoal};
use crate::services::WeeklyGoalTracker;
use crate::state::AppState;

use super::today;

#[derive(Deserialize)]
struct WeekQueryParams {
    date: Option<NaiveDate>,
}

#[derive(Deserialize)]
struct RangeQueryParams {
    from: NaiveDate,
    to: NaiveDate,
}

#[derive(Serialize)]
struct WeekSheet {
    week: WeekRange,
    summary: WeekSummary,
    goals: Vec<WeeklyProgressGoal>,
}

pub(super) fn routes() -> Router<AppState> {
    Router::new()
        .route("/progress/week", get(week_sheet))
        .route("/progress/goals", post(set_goal))
        .route("/progress/goals/{id}", get(get_goal).delete(delete_goal))
        .route("/progress/goals/{id}/resolve", patch(resolve_goal))
        .route("/progress/goals/{id}/reopen", patch(reopen_goal))
        .route("/progress/students/{id}", get(student_history))
}

async fn week_sheet(
    State(state): State<AppState>,
    Query(params): Query<WeekQueryParams>,
) -> Result<Json<WeekSheet>, AppError> {
    let week = WeeklyGoalTracker::week_range_for(params.date.unwrap_or_else(today));
    let goals = state.goals.list_for_week(week).await?;
    Ok(Json(WeekSheet {
        week,
        summary: WeeklyGoalTracker::summarize(&goals),
        goals,
    }))
}

async fn set_goal(
    State(state): State<AppState>,
    actor: CurrentActor,
    Json(req): Json<SetGoalRequest>,
) -> Result<Json<WeeklyProgressGoal>, AppError> {
    let week = WeeklyGoalTracker::week_range_for(req.week_of.unwrap_or_else(today));
    let goal = state
        .goals
        .set_goal(
            &req.student_id,
            week,
            &req.current_position,
            &req.expected_position,
            actor.user_id(),
        )
        .await?;
    Ok(Json(goal))
}

async fn resolve_goal(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<ResolveGoalRequest>,
) -> Result<Json<WeeklyProgressGoal>, AppError> {
    let goal = state
        .goals
        .resolve_goal(&id, req.achieved, req.ustaz_notes.as_deref())
        .await?;
    Ok(Json(goal))
}

async fn get_goal(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<WeeklyProgressGoal>, AppError> {
    let goal = state.goals.goal(&id).await?;
    Ok(Json(goal))
}

async fn reopen_goal(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<WeeklyProgressGoal>, AppError> {
    let goal = state.goals.reopen_goal(&id).await?;
    Ok(Json(goal))
}

async fn delete_goal(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    state.goals.delete_goal(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn student_history(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(params): Query<RangeQueryParams>,
) -> Result<Json<Vec<WeeklyProgressGoal>>, AppError> {
    let goals = state.goals.student_history(&id, params.from, params.to).await?;
    Ok(Json(goals))
}
