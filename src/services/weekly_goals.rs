use std::sync::Arc;

use chrono::NaiveDate;
use tracing::info;

use crate::clock::{self, WeekRange};
use crate::error::AppError;
use crate::models::{GoalDraft, GoalStatus, WeekSummary, WeeklyProgressGoal};
use crate::store::ProgressStore;

/// One memorization goal per student per Monday-started week.
///
/// No row means no goal was set; a row with `GoalStatus::Pending` means the
/// goal is set but not yet judged.
pub struct WeeklyGoalTracker {
    store: Arc<dyn ProgressStore>,
}

impl WeeklyGoalTracker {
    pub fn new(store: Arc<dyn ProgressStore>) -> Self {
        Self { store }
    }

    pub fn week_range_for(date: NaiveDate) -> WeekRange {
        clock::week_range_for(date)
    }

    pub fn summarize(goals: &[WeeklyProgressGoal]) -> WeekSummary {
        let mut summary = WeekSummary {
            total_tracked: goals.len(),
            ..WeekSummary::default()
        };
        for goal in goals {
            match goal.achieved {
                GoalStatus::Achieved => summary.achieved += 1,
                GoalStatus::NotAchieved => summary.not_achieved += 1,
                GoalStatus::Pending => summary.pending += 1,
            }
        }
        summary
    }

    /// Sets (or replaces) the goal for the week; the goal starts out pending.
    pub async fn set_goal(
        &self,
        student_id: &str,
        week: WeekRange,
        current_position: &str,
        expected_position: &str,
        set_by: Option<&str>,
    ) -> Result<WeeklyProgressGoal, AppError> {
        let current_position = current_position.trim();
        let expected_position = expected_position.trim();
        if current_position.is_empty() || expected_position.is_empty() {
            return Err(AppError::Validation(
                "Start and Target points are required.".to_string(),
            ));
        }

        if self.store.find_student(student_id).await?.is_none() {
            return Err(AppError::NotFound);
        }

        // Keys must land on the Monday of the week whatever range the caller built.
        let week = clock::week_range_for(week.start_date);
        let goal = self
            .store
            .upsert_goal(&GoalDraft {
                student_id: student_id.to_string(),
                start_date: week.start_date,
                end_date: week.end_date,
                current_position: current_position.to_string(),
                expected_position: expected_position.to_string(),
                set_by: set_by.map(str::to_string),
            })
            .await?;

        info!(student_id, start_date = %week.start_date, "weekly goal set");
        Ok(goal)
    }

    /// Records the outcome. Resolving to the same value again is harmless.
    pub async fn resolve_goal(
        &self,
        goal_id: &str,
        achieved: bool,
        ustaz_notes: Option<&str>,
    ) -> Result<WeeklyProgressGoal, AppError> {
        let status = GoalStatus::from_achieved(achieved);
        let notes = ustaz_notes.map(str::trim).filter(|n| !n.is_empty());
        let goal = self
            .store
            .update_goal_status(goal_id, status, notes)
            .await?
            .ok_or(AppError::NotFound)?;

        info!(goal_id, ?status, "weekly goal resolved");
        Ok(goal)
    }

    pub async fn goal(&self, goal_id: &str) -> Result<WeeklyProgressGoal, AppError> {
        self.store.find_goal(goal_id).await?.ok_or(AppError::NotFound)
    }

    pub async fn reopen_goal(&self, goal_id: &str) -> Result<WeeklyProgressGoal, AppError> {
        let goal = self
            .store
            .update_goal_status(goal_id, GoalStatus::Pending, None)
            .await?
            .ok_or(AppError::NotFound)?;

        info!(goal_id, "weekly goal reopened");
        Ok(goal)
    }

    /// Goals keyed on exactly this week's Monday.
    pub async fn list_for_week(&self, week: WeekRange) -> Result<Vec<WeeklyProgressGoal>, AppError> {
        self.store.goals_starting_on(week.start_date).await
    }

    /// A student's goals for weeks lying entirely within `from..=to`, oldest first.
    pub async fn student_history(
        &self,
        student_id: &str,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<WeeklyProgressGoal>, AppError> {
        if from > to {
            return Err(AppError::Validation(format!(
                "Range start {} is after range end {}.",
                from, to
            )));
        }
        self.store.goals_for_student(student_id, from, to).await
    }

    pub async fn delete_goal(&self, goal_id: &str) -> Result<(), AppError> {
        if !self.store.delete_goal(goal_id).await? {
            return Err(AppError::NotFound);
        }
        info!(goal_id, "weekly goal deleted");
        Ok(())
    }
}
