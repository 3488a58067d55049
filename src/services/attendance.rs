use std::collections::HashMap;
use std::sync::Arc;

use chrono::{NaiveDate, NaiveTime};
use tracing::{info, warn};

use crate::clock::{self, LatenessPolicy};
use crate::error::AppError;
use crate::models::{
    AttendanceMark, AttendanceRecord, AttendanceStatus, AttendanceView, DaySummary, Student,
    ViewStatus,
};
use crate::store::{AttendanceFilter, AttendanceStore};

/// Daily attendance rules: synthesized "not marked" views, lateness, and
/// idempotent (student, date) marking.
///
/// Marking a student Present after Absent (or the reverse) overwrites the
/// day's row in place; there is no need to delete first.
pub struct AttendanceReconciler {
    store: Arc<dyn AttendanceStore>,
    class_start: NaiveTime,
    policy: LatenessPolicy,
}

impl AttendanceReconciler {
    pub fn new(store: Arc<dyn AttendanceStore>, class_start: NaiveTime, policy: LatenessPolicy) -> Self {
        Self {
            store,
            class_start,
            policy,
        }
    }

    pub fn class_start(&self) -> NaiveTime {
        self.class_start
    }

    pub fn lateness_for(&self, arrival: NaiveTime) -> i32 {
        clock::compute_lateness(arrival, self.class_start, self.policy)
    }

    /// One view per student, in roster order. Rows for other dates or for
    /// students missing from the roster are skipped.
    pub fn derive_today_view(
        students: &[Student],
        rows: &[AttendanceRecord],
        today: NaiveDate,
    ) -> Vec<AttendanceView> {
        let by_student: HashMap<&str, &AttendanceRecord> = rows
            .iter()
            .filter(|r| r.date == today)
            .map(|r| (r.student_id.as_str(), r))
            .collect();

        let views: Vec<AttendanceView> = students
            .iter()
            .map(|student| match by_student.get(student.id.as_str()) {
                Some(record) => AttendanceView {
                    record_id: Some(record.id.clone()),
                    student_id: student.id.clone(),
                    student_name: student.full_name.clone(),
                    date: today,
                    status: record.status.into(),
                    arrival_time: record.arrival_time,
                    lateness_in_minutes: record.lateness_in_minutes,
                    excuse: record.excuse.clone(),
                    punishment_id: record.punishment_id.clone(),
                },
                None => AttendanceView {
                    record_id: None,
                    student_id: student.id.clone(),
                    student_name: student.full_name.clone(),
                    date: today,
                    status: ViewStatus::NotMarked,
                    arrival_time: None,
                    lateness_in_minutes: None,
                    excuse: None,
                    punishment_id: None,
                },
            })
            .collect();

        let matched = views.iter().filter(|v| v.is_persisted()).count();
        if matched < by_student.len() {
            warn!(
                skipped = by_student.len() - matched,
                %today,
                "attendance rows without a roster entry"
            );
        }

        views
    }

    pub fn summarize(views: &[AttendanceView]) -> DaySummary {
        views.iter().fold(
            DaySummary {
                total: views.len(),
                ..DaySummary::default()
            },
            |mut summary, view| {
                match view.status {
                    ViewStatus::Present => {
                        summary.present += 1;
                        if view.lateness_in_minutes.is_some_and(|m| m > 0) {
                            summary.late += 1;
                        }
                    }
                    ViewStatus::Absent => summary.absent += 1,
                    ViewStatus::NotMarked => summary.not_marked += 1,
                }
                summary
            },
        )
    }

    /// Fresh roster and rows for `date`, reconciled into the daily sheet.
    pub async fn day_view(&self, date: NaiveDate) -> Result<Vec<AttendanceView>, AppError> {
        let students = self.store.list_students().await?;
        let rows = self.store.attendance_for_date(date).await?;
        Ok(Self::derive_today_view(&students, &rows, date))
    }

    pub async fn history(&self, filter: &AttendanceFilter) -> Result<Vec<AttendanceRecord>, AppError> {
        self.store.list_attendance(filter).await
    }

    pub async fn mark_present(
        &self,
        student_id: &str,
        date: NaiveDate,
        arrival_time: &str,
        recorded_by: Option<&str>,
    ) -> Result<AttendanceRecord, AppError> {
        let arrival = clock::parse_clock_time(arrival_time)?;
        self.ensure_student(student_id).await?;

        let lateness = self.lateness_for(arrival);
        let record = self
            .store
            .upsert_attendance(&AttendanceMark {
                student_id: student_id.to_string(),
                date,
                status: AttendanceStatus::Present,
                arrival_time: Some(arrival),
                lateness_in_minutes: Some(lateness),
                excuse: None,
                recorded_by: recorded_by.map(str::to_string),
            })
            .await?;

        info!(student_id, %date, %arrival, lateness, "marked present");
        Ok(record)
    }

    pub async fn mark_absent(
        &self,
        student_id: &str,
        date: NaiveDate,
        excuse: Option<&str>,
        recorded_by: Option<&str>,
    ) -> Result<AttendanceRecord, AppError> {
        self.ensure_student(student_id).await?;

        let excuse = excuse
            .map(str::trim)
            .filter(|e| !e.is_empty())
            .map(str::to_string);

        let record = self
            .store
            .upsert_attendance(&AttendanceMark {
                student_id: student_id.to_string(),
                date,
                status: AttendanceStatus::Absent,
                arrival_time: None,
                lateness_in_minutes: None,
                excuse,
                recorded_by: recorded_by.map(str::to_string),
            })
            .await?;

        info!(student_id, %date, "marked absent");
        Ok(record)
    }

    /// Re-times a Present record. Status is left as is.
    pub async fn edit_arrival_time(&self, record_id: &str, new_time: &str) -> Result<AttendanceRecord, AppError> {
        let arrival = clock::parse_clock_time(new_time)?;

        let existing = self
            .store
            .find_attendance(record_id)
            .await?
            .ok_or(AppError::NotFound)?;
        if existing.status == AttendanceStatus::Absent {
            return Err(AppError::Validation(
                "Cannot set an arrival time on an absent record.".to_string(),
            ));
        }

        let lateness = self.lateness_for(arrival);
        let record = self
            .store
            .update_arrival(record_id, arrival, lateness)
            .await?
            .ok_or(AppError::NotFound)?;

        info!(record_id, %arrival, lateness, "arrival time updated");
        Ok(record)
    }

    pub async fn assign_punishment(
        &self,
        record_id: &str,
        punishment_id: Option<&str>,
    ) -> Result<AttendanceRecord, AppError> {
        if let Some(pid) = punishment_id {
            if self.store.find_punishment(pid).await?.is_none() {
                return Err(AppError::NotFound);
            }
        }

        let record = self
            .store
            .set_attendance_punishment(record_id, punishment_id)
            .await?
            .ok_or(AppError::NotFound)?;

        info!(record_id, punishment_id = ?punishment_id, "punishment assignment changed");
        Ok(record)
    }

    /// Removes the row; the next day view shows the student as not marked again.
    pub async fn delete_record(&self, record_id: &str) -> Result<(), AppError> {
        if !self.store.delete_attendance(record_id).await? {
            return Err(AppError::NotFound);
        }
        info!(record_id, "attendance record deleted");
        Ok(())
    }

    async fn ensure_student(&self, student_id: &str) -> Result<(), AppError> {
        match self.store.find_student(student_id).await? {
            Some(_) => Ok(()),
            None => Err(AppError::NotFound),
        }
    }
}
