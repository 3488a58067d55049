use std::sync::Arc;

use sqlx::SqlitePool;

use crate::config::AppConfig;
use crate::db::SqliteStore;
use crate::services::{AttendanceReconciler, WeeklyGoalTracker, WeeklyTestService};

#[derive(Clone)]
pub struct AppState {
    pub db: SqlitePool,
    pub attendance: Arc<AttendanceReconciler>,
    pub goals: Arc<WeeklyGoalTracker>,
    pub tests: Arc<WeeklyTestService>,
}

impl AppState {
    pub fn new(db: SqlitePool, config: &AppConfig) -> Self {
        let store = Arc::new(SqliteStore::new(db.clone()));
        Self {
            attendance: Arc::new(AttendanceReconciler::new(
                store.clone(),
                config.class_start,
                config.lateness_policy,
            )),
            goals: Arc::new(WeeklyGoalTracker::new(store)),
            tests: Arc::new(WeeklyTestService::new(db.clone())),
            db,
        }
    }
}
