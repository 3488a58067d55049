use chrono::Utc;
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::models::Punishment;

pub async fn fetch_punishments(db: &SqlitePool) -> Result<Vec<Punishment>, sqlx::Error> {
    sqlx::query_as::<_, Punishment>(
        "SELECT id, created_by, name, created_at, updated_at FROM punishments ORDER BY name ASC",
    )
    .fetch_all(db)
    .await
}

pub async fn find_punishment_by_id(db: &SqlitePool, id: &str) -> Result<Option<Punishment>, sqlx::Error> {
    sqlx::query_as::<_, Punishment>(
        "SELECT id, created_by, name, created_at, updated_at FROM punishments WHERE id = ?1",
    )
    .bind(id)
    .fetch_optional(db)
    .await
}

pub async fn insert_punishment(
    db: &SqlitePool,
    name: &str,
    created_by: Option<String>,
) -> Result<Punishment, sqlx::Error> {
    let now = Utc::now().to_rfc3339();
    let punishment = Punishment {
        id: Uuid::new_v4().to_string(),
        created_by,
        name: name.to_string(),
        created_at: now.clone(),
        updated_at: now,
    };

    sqlx::query(
        "INSERT INTO punishments (id, created_by, name, created_at, updated_at) VALUES (?1, ?2, ?3, ?4, ?5)",
    )
    .bind(&punishment.id)
    .bind(&punishment.created_by)
    .bind(&punishment.name)
    .bind(&punishment.created_at)
    .bind(&punishment.updated_at)
    .execute(db)
    .await?;

    Ok(punishment)
}

pub async fn rename_punishment(
    db: &SqlitePool,
    id: &str,
    name: &str,
) -> Result<Option<Punishment>, sqlx::Error> {
    let now = Utc::now().to_rfc3339();
    sqlx::query_as::<_, Punishment>(
        r#"
        UPDATE punishments
        SET name = ?1,
            updated_at = ?2
        WHERE id = ?3
        RETURNING id, created_by, name, created_at, updated_at
        "#,
    )
    .bind(name)
    .bind(now)
    .bind(id)
    .fetch_optional(db)
    .await
}

pub async fn delete_punishment(db: &SqlitePool, id: &str) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM punishments WHERE id = ?1")
        .bind(id)
        .execute(db)
        .await?
        .rows_affected();

    Ok(result > 0)
}
