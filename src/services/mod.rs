pub mod accounts;
pub mod attendance;
pub mod roster;
pub mod weekly_goals;
pub mod weekly_tests;

pub use attendance::AttendanceReconciler;
pub use roster::ClassData;
pub use weekly_goals::WeeklyGoalTracker;
pub use weekly_tests::WeeklyTestService;
