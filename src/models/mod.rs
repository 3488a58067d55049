pub mod attendance;
pub mod progress;
pub mod punishment;
pub mod student;
pub mod ustaz;

pub use attendance::{
    AssignPunishmentRequest, AttendanceMark, AttendanceRecord, AttendanceRow, AttendanceStatus,
    AttendanceView, DaySummary, EditArrivalRequest, MarkAbsentRequest, MarkPresentRequest,
    ViewStatus,
};
pub use progress::{
    GoalDraft, GoalStatus, ResolveGoalRequest, SetGoalRequest, WeekSummary, WeeklyProgressGoal,
    WeeklyProgressRow,
};
pub use punishment::{Punishment, PunishmentRequest};
pub use student::{NewStudentRequest, Student, UpdateStudentRequest};
pub use ustaz::{ChangePasswordRequest, LoginRequest, RegisterUstazRequest, Ustaz};
pub use weekly_test::{
    EvaluationInput, NewTestResultRequest, NewWeeklyTestRequest, ScoreInput,
    StudentTestEvaluation, TestEvaluation, TestResult, TestResultDetails, UpdateWeeklyTestRequest,
    WeeklyTest, WeeklyTestDetails,
};
