use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Resolution of a weekly goal. Stored as a nullable boolean.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GoalStatus {
    Pending,
    Achieved,
    NotAchieved,
}

impl GoalStatus {
    pub fn from_achieved(achieved: bool) -> Self {
        if achieved {
            GoalStatus::Achieved
        } else {
            GoalStatus::NotAchieved
        }
    }

    pub fn as_column(&self) -> Option<bool> {
        match self {
            GoalStatus::Pending => None,
            GoalStatus::Achieved => Some(true),
            GoalStatus::NotAchieved => Some(false),
        }
    }
}

impl From<Option<bool>> for GoalStatus {
    fn from(value: Option<bool>) -> Self {
        value.map_or(GoalStatus::Pending, GoalStatus::from_achieved)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeeklyProgressGoal {
    pub id: String,
    pub student_id: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub current_position: String,
    pub expected_position: String,
    pub achieved: GoalStatus,
    pub ustaz_notes: Option<String>,
    pub set_by: Option<String>,
    pub updated_at: String,
}

#[derive(Debug, Clone, FromRow)]
pub struct WeeklyProgressRow {
    pub id: String,
    pub student_id: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub current_position: String,
    pub expected_position: String,
    pub achieved: Option<bool>,
    pub ustaz_notes: Option<String>,
    pub set_by: Option<String>,
    pub updated_at: String,
}

impl From<WeeklyProgressRow> for WeeklyProgressGoal {
    fn from(row: WeeklyProgressRow) -> Self {
        WeeklyProgressGoal {
            id: row.id,
            student_id: row.student_id,
            start_date: row.start_date,
            end_date: row.end_date,
            current_position: row.current_position,
            expected_position: row.expected_position,
            achieved: row.achieved.into(),
            ustaz_notes: row.ustaz_notes,
            set_by: row.set_by,
            updated_at: row.updated_at,
        }
    }
}

/// Upsert payload for one (student, week start) goal.
#[derive(Debug, Clone)]
pub struct GoalDraft {
    pub student_id: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub current_position: String,
    pub expected_position: String,
    pub set_by: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct WeekSummary {
    pub total_tracked: usize,
    pub achieved: usize,
    pub not_achieved: usize,
    pub pending: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SetGoalRequest {
    pub student_id: String,
    /// Any date inside the target week; defaults to today.
    pub week_of: Option<NaiveDate>,
    pub current_position: String,
    pub expected_position: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolveGoalRequest {
    pub achieved: bool,
    pub ustaz_notes: Option<String>,
}
