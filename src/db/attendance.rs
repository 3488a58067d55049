use chrono::{NaiveDate, NaiveTime, Utc};
use sqlx::{QueryBuilder, Sqlite, SqlitePool};
use uuid::Uuid;

use crate::models::{AttendanceMark, AttendanceRecord, AttendanceRow};
use crate::store::AttendanceFilter;

const ATTENDANCE_COLUMNS: &str = "id, student_id, date, status, arrival_time, lateness_in_minutes, excuse, punishment_id, recorded_by, updated_at";

fn into_record(row: AttendanceRow) -> Result<AttendanceRecord, sqlx::Error> {
    AttendanceRecord::try_from(row).map_err(|e| sqlx::Error::Decode(Box::new(e)))
}

fn into_records(rows: Vec<AttendanceRow>) -> Result<Vec<AttendanceRecord>, sqlx::Error> {
    rows.into_iter().map(into_record).collect()
}

pub async fn fetch_attendance_for_date(
    db: &SqlitePool,
    date: NaiveDate,
) -> Result<Vec<AttendanceRecord>, sqlx::Error> {
    let rows = sqlx::query_as::<_, AttendanceRow>(&format!(
        "SELECT {} FROM attendance WHERE date = ?1",
        ATTENDANCE_COLUMNS
    ))
    .bind(date)
    .fetch_all(db)
    .await?;

    into_records(rows)
}

pub async fn fetch_attendance(
    db: &SqlitePool,
    filter: &AttendanceFilter,
) -> Result<Vec<AttendanceRecord>, sqlx::Error> {
    let mut query: QueryBuilder<Sqlite> = QueryBuilder::new(format!(
        "SELECT {} FROM attendance WHERE 1 = 1",
        ATTENDANCE_COLUMNS
    ));
    if let Some(from) = filter.from {
        query.push(" AND date >= ").push_bind(from);
    }
    if let Some(to) = filter.to {
        query.push(" AND date <= ").push_bind(to);
    }
    if let Some(student_id) = &filter.student_id {
        query.push(" AND student_id = ").push_bind(student_id.clone());
    }
    query.push(" ORDER BY date DESC, arrival_time ASC");

    let rows = query
        .build_query_as::<AttendanceRow>()
        .fetch_all(db)
        .await?;

    into_records(rows)
}

pub async fn find_attendance_by_id(
    db: &SqlitePool,
    id: &str,
) -> Result<Option<AttendanceRecord>, sqlx::Error> {
    sqlx::query_as::<_, AttendanceRow>(&format!(
        "SELECT {} FROM attendance WHERE id = ?1",
        ATTENDANCE_COLUMNS
    ))
    .bind(id)
    .fetch_optional(db)
    .await?
    .map(into_record)
    .transpose()
}

/// Writes one row per (student_id, date). A second mark for the same day
/// overwrites the first and keeps its id.
pub async fn upsert_attendance(
    db: &SqlitePool,
    mark: &AttendanceMark,
) -> Result<AttendanceRecord, sqlx::Error> {
    let id = Uuid::new_v4().to_string();
    let now = Utc::now().to_rfc3339();

    let row = sqlx::query_as::<_, AttendanceRow>(&format!(
        r#"
        INSERT INTO attendance
            (id, student_id, date, status, arrival_time, lateness_in_minutes,
            excuse, punishment_id, recorded_by, updated_at)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, NULL, ?8, ?9)
        ON CONFLICT (student_id, date) DO UPDATE SET
            status = excluded.status,
            arrival_time = excluded.arrival_time,
            lateness_in_minutes = excluded.lateness_in_minutes,
            excuse = excluded.excuse,
            recorded_by = excluded.recorded_by,
            updated_at = excluded.updated_at
        RETURNING {}
        "#,
        ATTENDANCE_COLUMNS
    ))
    .bind(id)
    .bind(&mark.student_id)
    .bind(mark.date)
    .bind(mark.status.as_str())
    .bind(mark.arrival_time)
    .bind(mark.lateness_in_minutes)
    .bind(&mark.excuse)
    .bind(&mark.recorded_by)
    .bind(now)
    .fetch_one(db)
    .await?;

    into_record(row)
}

pub async fn update_arrival(
    db: &SqlitePool,
    id: &str,
    arrival_time: NaiveTime,
    lateness_in_minutes: i32,
) -> Result<Option<AttendanceRecord>, sqlx::Error> {
    let now = Utc::now().to_rfc3339();
    sqlx::query_as::<_, AttendanceRow>(&format!(
        r#"
        UPDATE attendance
        SET arrival_time = ?1,
            lateness_in_minutes = ?2,
            updated_at = ?3
        WHERE id = ?4
        RETURNING {}
        "#,
        ATTENDANCE_COLUMNS
    ))
    .bind(arrival_time)
    .bind(lateness_in_minutes)
    .bind(now)
    .bind(id)
    .fetch_optional(db)
    .await?
    .map(into_record)
    .transpose()
}

pub async fn set_punishment(
    db: &SqlitePool,
    id: &str,
    punishment_id: Option<&str>,
) -> Result<Option<AttendanceRecord>, sqlx::Error> {
    let now = Utc::now().to_rfc3339();
    sqlx::query_as::<_, AttendanceRow>(&format!(
        r#"
        UPDATE attendance
        SET punishment_id = ?1,
            updated_at = ?2
        WHERE id = ?3
        RETURNING {}
        "#,
        ATTENDANCE_COLUMNS
    ))
    .bind(punishment_id)
    .bind(now)
    .bind(id)
    .fetch_optional(db)
    .await?
    .map(into_record)
    .transpose()
}

pub async fn delete_attendance(db: &SqlitePool, id: &str) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM attendance WHERE id = ?1")
        .bind(id)
        .execute(db)
        .await?
        .rows_affected();

    Ok(result > 0)
}
