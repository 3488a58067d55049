use chrono::Utc;
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::models::{NewStudentRequest, Student, UpdateStudentRequest};

const STUDENT_COLUMNS: &str = "id, added_by, full_name, family_name, family_phone, current_hifz_page, is_active, created_at";

pub async fn fetch_students(db: &SqlitePool) -> Result<Vec<Student>, sqlx::Error> {
    sqlx::query_as::<_, Student>(&format!(
        "SELECT {} FROM students ORDER BY full_name ASC",
        STUDENT_COLUMNS
    ))
    .fetch_all(db)
    .await
}

pub async fn find_student_by_id(db: &SqlitePool, id: &str) -> Result<Option<Student>, sqlx::Error> {
    sqlx::query_as::<_, Student>(&format!(
        "SELECT {} FROM students WHERE id = ?",
        STUDENT_COLUMNS
    ))
    .bind(id)
    .fetch_optional(db)
    .await
}

pub async fn insert_student(
    db: &SqlitePool,
    req: NewStudentRequest,
    added_by: Option<String>,
) -> Result<Student, sqlx::Error> {
    let student = Student {
        id: Uuid::new_v4().to_string(),
        added_by,
        full_name: req.full_name,
        family_name: req.family_name,
        family_phone: req.family_phone,
        current_hifz_page: req.current_hifz_page,
        is_active: true,
        created_at: Utc::now().to_rfc3339(),
    };

    sqlx::query(
        r#"
        INSERT INTO students
            (id, added_by, full_name, family_name, family_phone,
            current_hifz_page, is_active, created_at)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
        "#,
    )
    .bind(&student.id)
    .bind(&student.added_by)
    .bind(&student.full_name)
    .bind(&student.family_name)
    .bind(&student.family_phone)
    .bind(student.current_hifz_page)
    .bind(student.is_active)
    .bind(&student.created_at)
    .execute(db)
    .await?;

    Ok(student)
}

pub async fn update_student(
    db: &SqlitePool,
    id: &str,
    req: UpdateStudentRequest,
) -> Result<Option<Student>, sqlx::Error> {
    let mut current = match find_student_by_id(db, id).await? {
        Some(s) => s,
        None => return Ok(None),
    };

    if let Some(full_name) = req.full_name {
        current.full_name = full_name;
    }
    if let Some(family_name) = req.family_name {
        current.family_name = Some(family_name);
    }
    if let Some(family_phone) = req.family_phone {
        current.family_phone = Some(family_phone);
    }
    if let Some(page) = req.current_hifz_page {
        current.current_hifz_page = page;
    }
    if let Some(is_active) = req.is_active {
        current.is_active = is_active;
    }

    sqlx::query(
        r#"
        UPDATE students
        SET full_name = ?1,
            family_name = ?2,
            family_phone = ?3,
            current_hifz_page = ?4,
            is_active = ?5
        WHERE id = ?6
        "#,
    )
    .bind(&current.full_name)
    .bind(&current.family_name)
    .bind(&current.family_phone)
    .bind(current.current_hifz_page)
    .bind(current.is_active)
    .bind(id)
    .execute(db)
    .await?;

    Ok(Some(current))
}

pub async fn delete_student(db: &SqlitePool, id: &str) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM students WHERE id = ?1")
        .bind(id)
        .execute(db)
        .await?
        .rows_affected();

    Ok(result > 0)
}
