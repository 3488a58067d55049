use std::sync::Arc;

use chrono::NaiveDate;
use halaqa::db::{self, SqliteStore};
use halaqa::models::{GoalStatus, NewStudentRequest};
use halaqa::services::WeeklyGoalTracker;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[tokio::test]
async fn test_goal_from_pending_to_achieved() {
    let pool = db::memory_pool().await.expect("Failed to create test db");
    let student = db::students::insert_student(
        &pool,
        NewStudentRequest {
            full_name: "Yusuf".to_string(),
            family_name: None,
            family_phone: None,
            current_hifz_page: 100,
        },
        None,
    )
    .await
    .expect("Failed to insert student");
    let tracker = WeeklyGoalTracker::new(Arc::new(SqliteStore::new(pool)));

    // Any day of the week lands on the same Monday..Sunday range.
    let week = WeeklyGoalTracker::week_range_for(date(2024, 3, 9));
    assert_eq!(week.start_date, date(2024, 3, 4));
    assert_eq!(week.end_date, date(2024, 3, 10));
    assert_eq!(WeeklyGoalTracker::week_range_for(date(2024, 3, 10)), week);

    let goal = tracker
        .set_goal(&student.id, week, "Page 100", "Page 107", Some("ustaz-1"))
        .await
        .expect("set failed");
    assert_eq!(goal.achieved, GoalStatus::Pending);
    assert_eq!(goal.start_date, date(2024, 3, 4));
    assert_eq!(goal.end_date, date(2024, 3, 10));

    let summary = WeeklyGoalTracker::summarize(&tracker.list_for_week(week).await.expect("list failed"));
    assert_eq!(summary.pending, 1);
    assert_eq!(summary.achieved, 0);

    let resolved = tracker
        .resolve_goal(&goal.id, true, Some("Reached Page 107"))
        .await
        .expect("resolve failed");
    assert_eq!(resolved.achieved, GoalStatus::Achieved);

    let goals = tracker.list_for_week(week).await.expect("list failed");
    let summary = WeeklyGoalTracker::summarize(&goals);
    assert_eq!(summary.total_tracked, 1);
    assert_eq!(summary.achieved, 1);
    assert_eq!(summary.pending, 0);
    assert_eq!(goals[0].ustaz_notes.as_deref(), Some("Reached Page 107"));

    assert_eq!(tracker.goal(&goal.id).await.expect("get failed"), resolved);

    let not_met = tracker.resolve_goal(&goal.id, false, None).await.expect("resolve failed");
    assert_eq!(not_met.achieved, GoalStatus::NotAchieved);
}

#[tokio::test]
async fn test_goal_for_unknown_student_is_not_found() {
    let pool = db::memory_pool().await.expect("Failed to create test db");
    let tracker = WeeklyGoalTracker::new(Arc::new(SqliteStore::new(pool)));
    let week = WeeklyGoalTracker::week_range_for(date(2024, 3, 4));

    let err = tracker
        .set_goal("missing", week, "Page 1", "Page 5", None)
        .await
        .expect_err("should fail");
    assert!(matches!(err, halaqa::error::AppError::NotFound));
}
