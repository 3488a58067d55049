//! Persistence seams used by the attendance and weekly goal services.
//!
//! Services never hold rows between calls: every operation reads what it needs
//! through these traits and returns the persisted row, so callers refresh from
//! the store instead of patching local copies.

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveTime};

use crate::error::AppError;
use crate::models::{
    AttendanceMark, AttendanceRecord, GoalDraft, GoalStatus, Punishment, Student,
    WeeklyProgressGoal,
};

#[derive(Debug, Clone, Default)]
pub struct AttendanceFilter {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub student_id: Option<String>,
}

#[async_trait]
pub trait RosterStore: Send + Sync {
    async fn list_students(&self) -> Result<Vec<Student>, AppError>;
    async fn find_student(&self, id: &str) -> Result<Option<Student>, AppError>;
}

#[async_trait]
pub trait AttendanceStore: RosterStore {
    async fn attendance_for_date(&self, date: NaiveDate) -> Result<Vec<AttendanceRecord>, AppError>;
    async fn list_attendance(&self, filter: &AttendanceFilter) -> Result<Vec<AttendanceRecord>, AppError>;
    async fn find_attendance(&self, id: &str) -> Result<Option<AttendanceRecord>, AppError>;
    /// Insert or overwrite the row keyed by (student_id, date).
    async fn upsert_attendance(&self, mark: &AttendanceMark) -> Result<AttendanceRecord, AppError>;
    async fn update_arrival(
        &self,
        id: &str,
        arrival_time: NaiveTime,
        lateness_in_minutes: i32,
    ) -> Result<Option<AttendanceRecord>, AppError>;
    async fn set_attendance_punishment(
        &self,
        id: &str,
        punishment_id: Option<&str>,
    ) -> Result<Option<AttendanceRecord>, AppError>;
    async fn delete_attendance(&self, id: &str) -> Result<bool, AppError>;
    async fn find_punishment(&self, id: &str) -> Result<Option<Punishment>, AppError>;
}

#[async_trait]
pub trait ProgressStore: RosterStore {
    /// Insert or overwrite the goal keyed by (student_id, start_date); resets it to pending.
    async fn upsert_goal(&self, draft: &GoalDraft) -> Result<WeeklyProgressGoal, AppError>;
    async fn find_goal(&self, id: &str) -> Result<Option<WeeklyProgressGoal>, AppError>;
    async fn update_goal_status(
        &self,
        id: &str,
        status: GoalStatus,
        ustaz_notes: Option<&str>,
    ) -> Result<Option<WeeklyProgressGoal>, AppError>;
    async fn goals_starting_on(&self, start_date: NaiveDate) -> Result<Vec<WeeklyProgressGoal>, AppError>;
    async fn goals_for_student(
        &self,
        student_id: &str,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<WeeklyProgressGoal>, AppError>;
    async fn delete_goal(&self, id: &str) -> Result<bool, AppError>;
}
