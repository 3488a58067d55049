use serde::Serialize;
use sqlx::SqlitePool;
use tracing::info;

use crate::db::{attendance, progress, punishments, students};
use crate::error::AppError;
use crate::models::{
    AttendanceRecord, NewStudentRequest, Punishment, Student, UpdateStudentRequest,
    WeeklyProgressGoal,
};
use crate::store::AttendanceFilter;

const MIN_PUNISHMENT_NAME_LEN: usize = 2;

/// Everything the class screens render from, fetched in one go.
#[derive(Debug, Serialize)]
pub struct ClassData {
    pub students: Vec<Student>,
    pub attendance: Vec<AttendanceRecord>,
    pub progress: Vec<WeeklyProgressGoal>,
    pub punishments: Vec<Punishment>,
}

pub async fn load_class_data(db: &SqlitePool) -> Result<ClassData, AppError> {
    let filter = AttendanceFilter::default();
    let (students, attendance, progress, punishments) = tokio::try_join!(
        students::fetch_students(db),
        attendance::fetch_attendance(db, &filter),
        progress::fetch_goals(db),
        punishments::fetch_punishments(db),
    )?;

    Ok(ClassData {
        students,
        attendance,
        progress,
        punishments,
    })
}

fn required_name(value: &str, message: &str) -> Result<String, AppError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(AppError::Validation(message.to_string()));
    }
    Ok(trimmed.to_string())
}

pub async fn add_student(
    db: &SqlitePool,
    mut req: NewStudentRequest,
    added_by: Option<&str>,
) -> Result<Student, AppError> {
    req.full_name = required_name(&req.full_name, "Full name is required.")?;
    if req.current_hifz_page < 0 {
        return Err(AppError::Validation("Hifz page cannot be negative.".to_string()));
    }

    let student = students::insert_student(db, req, added_by.map(str::to_string)).await?;
    info!(student_id = %student.id, "student added");
    Ok(student)
}

pub async fn update_student(
    db: &SqlitePool,
    id: &str,
    mut req: UpdateStudentRequest,
) -> Result<Student, AppError> {
    if let Some(name) = req.full_name.take() {
        req.full_name = Some(required_name(&name, "Full name is required.")?);
    }
    if req.current_hifz_page.is_some_and(|p| p < 0) {
        return Err(AppError::Validation("Hifz page cannot be negative.".to_string()));
    }

    students::update_student(db, id, req)
        .await?
        .ok_or(AppError::NotFound)
}

pub async fn remove_student(db: &SqlitePool, id: &str) -> Result<(), AppError> {
    if !students::delete_student(db, id).await? {
        return Err(AppError::NotFound);
    }
    info!(student_id = id, "student removed");
    Ok(())
}

fn punishment_name(name: &str) -> Result<String, AppError> {
    let trimmed = name.trim();
    if trimmed.chars().count() < MIN_PUNISHMENT_NAME_LEN {
        return Err(AppError::Validation(format!(
            "Punishment name must be at least {} characters.",
            MIN_PUNISHMENT_NAME_LEN
        )));
    }
    Ok(trimmed.to_string())
}

pub async fn add_punishment(
    db: &SqlitePool,
    name: &str,
    created_by: Option<&str>,
) -> Result<Punishment, AppError> {
    let name = punishment_name(name)?;
    let punishment = punishments::insert_punishment(db, &name, created_by.map(str::to_string)).await?;
    info!(punishment_id = %punishment.id, "punishment added");
    Ok(punishment)
}

pub async fn rename_punishment(db: &SqlitePool, id: &str, name: &str) -> Result<Punishment, AppError> {
    let name = punishment_name(name)?;
    punishments::rename_punishment(db, id, &name)
        .await?
        .ok_or(AppError::NotFound)
}

pub async fn remove_punishment(db: &SqlitePool, id: &str) -> Result<(), AppError> {
    if !punishments::delete_punishment(db, id).await? {
        return Err(AppError::NotFound);
    }
    info!(punishment_id = id, "punishment removed");
    Ok(())
}
