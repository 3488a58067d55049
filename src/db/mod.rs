pub mod attendance;
pub mod progress;
pub mod punishments;
pub mod students;
pub mod ustazs;

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveTime};
use sqlx::SqlitePool;
use sqlx::sqlite::SqlitePoolOptions;

use crate::error::AppError;
use crate::models::{
    AttendanceMark, AttendanceRecord, GoalDraft, GoalStatus, Punishment, Student,
    WeeklyProgressGoal,
};
use crate::store::{AttendanceFilter, AttendanceStore, ProgressStore, RosterStore};

/// Opens the pool and applies the embedded migrations.
pub async fn connect(database_url: &str) -> Result<SqlitePool, sqlx::Error> {
    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect(database_url)
        .await?;

    sqlx::migrate!("./migrations").run(&pool).await?;

    Ok(pool)
}

/// Single-connection in-memory database with the schema applied.
///
/// Every connection to `sqlite::memory:` is its own database, so the pool is
/// pinned to one connection that is never recycled.
pub async fn memory_pool() -> Result<SqlitePool, sqlx::Error> {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .min_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect("sqlite::memory:")
        .await?;

    sqlx::migrate!("./migrations").run(&pool).await?;

    Ok(pool)
}

/// sqlx-backed implementation of the store traits.
#[derive(Clone)]
pub struct SqliteStore {
    db: SqlitePool,
}

impl SqliteStore {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.db
    }
}

#[async_trait]
impl RosterStore for SqliteStore {
    async fn list_students(&self) -> Result<Vec<Student>, AppError> {
        Ok(students::fetch_students(&self.db).await?)
    }

    async fn find_student(&self, id: &str) -> Result<Option<Student>, AppError> {
        Ok(students::find_student_by_id(&self.db, id).await?)
    }
}

#[async_trait]
impl AttendanceStore for SqliteStore {
    async fn attendance_for_date(&self, date: NaiveDate) -> Result<Vec<AttendanceRecord>, AppError> {
        Ok(attendance::fetch_attendance_for_date(&self.db, date).await?)
    }

    async fn list_attendance(&self, filter: &AttendanceFilter) -> Result<Vec<AttendanceRecord>, AppError> {
        Ok(attendance::fetch_attendance(&self.db, filter).await?)
    }

    async fn find_attendance(&self, id: &str) -> Result<Option<AttendanceRecord>, AppError> {
        Ok(attendance::find_attendance_by_id(&self.db, id).await?)
    }

    async fn upsert_attendance(&self, mark: &AttendanceMark) -> Result<AttendanceRecord, AppError> {
        Ok(attendance::upsert_attendance(&self.db, mark).await?)
    }

    async fn update_arrival(
        &self,
        id: &str,
        arrival_time: NaiveTime,
        lateness_in_minutes: i32,
    ) -> Result<Option<AttendanceRecord>, AppError> {
        Ok(attendance::update_arrival(&self.db, id, arrival_time, lateness_in_minutes).await?)
    }

    async fn set_attendance_punishment(
        &self,
        id: &str,
        punishment_id: Option<&str>,
    ) -> Result<Option<AttendanceRecord>, AppError> {
        Ok(attendance::set_punishment(&self.db, id, punishment_id).await?)
    }

    async fn delete_attendance(&self, id: &str) -> Result<bool, AppError> {
        Ok(attendance::delete_attendance(&self.db, id).await?)
    }

    async fn find_punishment(&self, id: &str) -> Result<Option<Punishment>, AppError> {
        Ok(punishments::find_punishment_by_id(&self.db, id).await?)
    }
}

#[async_trait]
impl ProgressStore for SqliteStore {
    async fn upsert_goal(&self, draft: &GoalDraft) -> Result<WeeklyProgressGoal, AppError> {
        Ok(progress::upsert_goal(&self.db, draft).await?)
    }

    async fn find_goal(&self, id: &str) -> Result<Option<WeeklyProgressGoal>, AppError> {
        Ok(progress::find_goal_by_id(&self.db, id).await?)
    }

    async fn update_goal_status(
        &self,
        id: &str,
        status: GoalStatus,
        ustaz_notes: Option<&str>,
    ) -> Result<Option<WeeklyProgressGoal>, AppError> {
        Ok(progress::update_goal_status(&self.db, id, status, ustaz_notes).await?)
    }

    async fn goals_starting_on(&self, start_date: NaiveDate) -> Result<Vec<WeeklyProgressGoal>, AppError> {
        Ok(progress::fetch_goals_starting_on(&self.db, start_date).await?)
    }

    async fn goals_for_student(
        &self,
        student_id: &str,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<WeeklyProgressGoal>, AppError> {
        Ok(progress::fetch_goals_for_student(&self.db, student_id, from, to).await?)
    }

    async fn delete_goal(&self, id: &str) -> Result<bool, AppError> {
        Ok(progress::delete_goal(&self.db, id).await?)
    }
}
