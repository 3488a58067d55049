use sqlx::SqlitePool;

use crate::models::Ustaz;

pub async fn find_ustaz_by_user_name(db: &SqlitePool, user_name: &str) -> Result<Option<Ustaz>, sqlx::Error> {
    sqlx::query_as::<_, Ustaz>(
        "SELECT id, user_name, full_name, password_hash, created_at FROM ustazs WHERE user_name = ?1",
    )
    .bind(user_name)
    .fetch_optional(db)
    .await
}

/// Inserts or replaces the account with the same id.
pub async fn upsert_ustaz(db: &SqlitePool, ustaz: &Ustaz) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO ustazs (id, user_name, full_name, password_hash, created_at)
        VALUES (?1, ?2, ?3, ?4, ?5)
        ON CONFLICT (id) DO UPDATE SET
            user_name = excluded.user_name,
            full_name = excluded.full_name,
            password_hash = excluded.password_hash
        "#,
    )
    .bind(&ustaz.id)
    .bind(&ustaz.user_name)
    .bind(&ustaz.full_name)
    .bind(&ustaz.password_hash)
    .bind(&ustaz.created_at)
    .execute(db)
    .await?;

    Ok(())
}

pub async fn update_password_hash(db: &SqlitePool, id: &str, password_hash: &str) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("UPDATE ustazs SET password_hash = ?1 WHERE id = ?2")
        .bind(password_hash)
        .bind(id)
        .execute(db)
        .await?
        .rows_affected();

    Ok(result > 0)
}
