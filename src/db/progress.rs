use chrono::{NaiveDate, Utc};
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::models::{GoalDraft, GoalStatus, WeeklyProgressGoal, WeeklyProgressRow};

const PROGRESS_COLUMNS: &str = "id, student_id, start_date, end_date, current_position, expected_position, achieved, ustaz_notes, set_by, updated_at";

pub async fn upsert_goal(db: &SqlitePool, draft: &GoalDraft) -> Result<WeeklyProgressGoal, sqlx::Error> {
    let id = Uuid::new_v4().to_string();
    let now = Utc::now().to_rfc3339();

    let row = sqlx::query_as::<_, WeeklyProgressRow>(&format!(
        r#"
        INSERT INTO hifz_weekly_progress
            (id, student_id, start_date, end_date, current_position,
            expected_position, achieved, ustaz_notes, set_by, updated_at)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6, NULL, NULL, ?7, ?8)
        ON CONFLICT (student_id, start_date) DO UPDATE SET
            end_date = excluded.end_date,
            current_position = excluded.current_position,
            expected_position = excluded.expected_position,
            achieved = NULL,
            set_by = excluded.set_by,
            updated_at = excluded.updated_at
        RETURNING {}
        "#,
        PROGRESS_COLUMNS
    ))
    .bind(id)
    .bind(&draft.student_id)
    .bind(draft.start_date)
    .bind(draft.end_date)
    .bind(&draft.current_position)
    .bind(&draft.expected_position)
    .bind(&draft.set_by)
    .bind(now)
    .fetch_one(db)
    .await?;

    Ok(row.into())
}

pub async fn find_goal_by_id(db: &SqlitePool, id: &str) -> Result<Option<WeeklyProgressGoal>, sqlx::Error> {
    let row = sqlx::query_as::<_, WeeklyProgressRow>(&format!(
        "SELECT {} FROM hifz_weekly_progress WHERE id = ?1",
        PROGRESS_COLUMNS
    ))
    .bind(id)
    .fetch_optional(db)
    .await?;

    Ok(row.map(Into::into))
}

pub async fn update_goal_status(
    db: &SqlitePool,
    id: &str,
    status: GoalStatus,
    ustaz_notes: Option<&str>,
) -> Result<Option<WeeklyProgressGoal>, sqlx::Error> {
    let now = Utc::now().to_rfc3339();
    let row = sqlx::query_as::<_, WeeklyProgressRow>(&format!(
        r#"
        UPDATE hifz_weekly_progress
        SET achieved = ?1,
            ustaz_notes = COALESCE(?2, ustaz_notes),
            updated_at = ?3
        WHERE id = ?4
        RETURNING {}
        "#,
        PROGRESS_COLUMNS
    ))
    .bind(status.as_column())
    .bind(ustaz_notes)
    .bind(now)
    .bind(id)
    .fetch_optional(db)
    .await?;

    Ok(row.map(Into::into))
}

pub async fn fetch_goals_starting_on(
    db: &SqlitePool,
    start_date: NaiveDate,
) -> Result<Vec<WeeklyProgressGoal>, sqlx::Error> {
    let rows = sqlx::query_as::<_, WeeklyProgressRow>(&format!(
        "SELECT {} FROM hifz_weekly_progress WHERE start_date = ?1",
        PROGRESS_COLUMNS
    ))
    .bind(start_date)
    .fetch_all(db)
    .await?;

    Ok(rows.into_iter().map(Into::into).collect())
}

pub async fn fetch_goals_for_student(
    db: &SqlitePool,
    student_id: &str,
    from: NaiveDate,
    to: NaiveDate,
) -> Result<Vec<WeeklyProgressGoal>, sqlx::Error> {
    let rows = sqlx::query_as::<_, WeeklyProgressRow>(&format!(
        r#"
        SELECT {} FROM hifz_weekly_progress
        WHERE student_id = ?1
          AND start_date >= ?2
          AND end_date <= ?3
        ORDER BY start_date ASC
        "#,
        PROGRESS_COLUMNS
    ))
    .bind(student_id)
    .bind(from)
    .bind(to)
    .fetch_all(db)
    .await?;

    Ok(rows.into_iter().map(Into::into).collect())
}

pub async fn fetch_goals(db: &SqlitePool) -> Result<Vec<WeeklyProgressGoal>, sqlx::Error> {
    let rows = sqlx::query_as::<_, WeeklyProgressRow>(&format!(
        "SELECT {} FROM hifz_weekly_progress ORDER BY start_date DESC",
        PROGRESS_COLUMNS
    ))
    .fetch_all(db)
    .await?;

    Ok(rows.into_iter().map(Into::into).collect())
}

pub async fn delete_goal(db: &SqlitePool, id: &str) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM hifz_weekly_progress WHERE id = ?1")
        .bind(id)
        .execute(db)
        .await?
        .rows_affected();

    Ok(result > 0)
}
