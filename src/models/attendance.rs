use std::fmt;
use std::str::FromStr;

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use thiserror::Error;

/// Stored attendance status. "Not marked" is never persisted, see [`ViewStatus`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AttendanceStatus {
    Present,
    Absent,
}

#[derive(Debug, Error)]
#[error("unknown attendance status: {0}")]
pub struct UnknownStatus(pub String);

impl AttendanceStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AttendanceStatus::Present => "Present",
            AttendanceStatus::Absent => "Absent",
        }
    }
}

impl fmt::Display for AttendanceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AttendanceStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Present" => Ok(AttendanceStatus::Present),
            "Absent" => Ok(AttendanceStatus::Absent),
            other => Err(UnknownStatus(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttendanceRecord {
    pub id: String,
    pub student_id: String,
    pub date: NaiveDate,
    pub status: AttendanceStatus,
    pub arrival_time: Option<NaiveTime>,
    pub lateness_in_minutes: Option<i32>,
    pub excuse: Option<String>,
    pub punishment_id: Option<String>,
    pub recorded_by: Option<String>,
    pub updated_at: String,
}

/// Raw `attendance` row; `status` is checked when converted into a record.
#[derive(Debug, Clone, FromRow)]
pub struct AttendanceRow {
    pub id: String,
    pub student_id: String,
    pub date: NaiveDate,
    pub status: String,
    pub arrival_time: Option<NaiveTime>,
    pub lateness_in_minutes: Option<i32>,
    pub excuse: Option<String>,
    pub punishment_id: Option<String>,
    pub recorded_by: Option<String>,
    pub updated_at: String,
}

impl TryFrom<AttendanceRow> for AttendanceRecord {
    type Error = UnknownStatus;

    fn try_from(row: AttendanceRow) -> Result<Self, Self::Error> {
        Ok(AttendanceRecord {
            status: row.status.parse()?,
            id: row.id,
            student_id: row.student_id,
            date: row.date,
            arrival_time: row.arrival_time,
            lateness_in_minutes: row.lateness_in_minutes,
            excuse: row.excuse,
            punishment_id: row.punishment_id,
            recorded_by: row.recorded_by,
            updated_at: row.updated_at,
        })
    }
}

/// Everything needed to upsert one (student, date) attendance row.
#[derive(Debug, Clone)]
pub struct AttendanceMark {
    pub student_id: String,
    pub date: NaiveDate,
    pub status: AttendanceStatus,
    pub arrival_time: Option<NaiveTime>,
    pub lateness_in_minutes: Option<i32>,
    pub excuse: Option<String>,
    pub recorded_by: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewStatus {
    NotMarked,
    Present,
    Absent,
}

impl From<AttendanceStatus> for ViewStatus {
    fn from(status: AttendanceStatus) -> Self {
        match status {
            AttendanceStatus::Present => ViewStatus::Present,
            AttendanceStatus::Absent => ViewStatus::Absent,
        }
    }
}

/// One line of the daily attendance sheet. `record_id` is `None` until the
/// student has been marked for that day.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AttendanceView {
    pub record_id: Option<String>,
    pub student_id: String,
    pub student_name: String,
    pub date: NaiveDate,
    pub status: ViewStatus,
    pub arrival_time: Option<NaiveTime>,
    pub lateness_in_minutes: Option<i32>,
    pub excuse: Option<String>,
    pub punishment_id: Option<String>,
}

impl AttendanceView {
    pub fn is_persisted(&self) -> bool {
        self.record_id.is_some()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DaySummary {
    pub total: usize,
    pub present: usize,
    pub absent: usize,
    pub not_marked: usize,
    pub late: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarkPresentRequest {
    pub student_id: String,
    pub date: Option<NaiveDate>,
    pub arrival_time: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarkAbsentRequest {
    pub student_id: String,
    pub date: Option<NaiveDate>,
    pub excuse: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EditArrivalRequest {
    pub arrival_time: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssignPunishmentRequest {
    pub punishment_id: Option<String>,
}
