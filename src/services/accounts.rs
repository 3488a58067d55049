use chrono::Utc;
use sqlx::SqlitePool;
use tracing::{info, warn};
use uuid::Uuid;

use crate::auth::{hash_password, verify_password};
use crate::db::ustazs as repository;
use crate::error::AppError;
use crate::models::{RegisterUstazRequest, Ustaz};

const MIN_PASSWORD_LEN: usize = 6;

fn check_password(password: &str) -> Result<(), AppError> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(AppError::Validation(format!(
            "Password must be at least {} characters.",
            MIN_PASSWORD_LEN
        )));
    }
    Ok(())
}

/// Writes a new account. A user name taken between the lookup and the write
/// still surfaces as a conflict.
async fn insert_account(db: &SqlitePool, ustaz: &Ustaz) -> Result<(), AppError> {
    match repository::upsert_ustaz(db, ustaz).await {
        Ok(()) => Ok(()),
        Err(sqlx::Error::Database(e)) if e.is_unique_violation() => {
            Err(AppError::Conflict("Username already exists".to_string()))
        }
        Err(e) => Err(e.into()),
    }
}

pub async fn register(db: &SqlitePool, req: RegisterUstazRequest) -> Result<Ustaz, AppError> {
    let user_name = req.user_name.trim();
    let full_name = req.full_name.trim();
    if user_name.is_empty() || full_name.is_empty() {
        return Err(AppError::Validation(
            "User name and full name are required.".to_string(),
        ));
    }
    check_password(&req.password)?;

    if repository::find_ustaz_by_user_name(db, user_name).await?.is_some() {
        return Err(AppError::Conflict("Username already exists".to_string()));
    }

    let ustaz = Ustaz {
        id: Uuid::new_v4().to_string(),
        user_name: user_name.to_string(),
        full_name: full_name.to_string(),
        password_hash: hash_password(&req.password),
        created_at: Utc::now().to_rfc3339(),
    };
    insert_account(db, &ustaz).await?;

    info!(user_name = %ustaz.user_name, "ustaz registered");
    Ok(ustaz)
}

pub async fn login(db: &SqlitePool, user_name: &str, password: &str) -> Result<Ustaz, AppError> {
    let Some(ustaz) = repository::find_ustaz_by_user_name(db, user_name.trim()).await? else {
        warn!(user_name, "login for unknown user");
        return Err(AppError::Unauthorized);
    };

    if !verify_password(password, &ustaz.password_hash) {
        warn!(user_name, "login with wrong password");
        return Err(AppError::Unauthorized);
    }

    Ok(ustaz)
}

pub async fn change_password(db: &SqlitePool, id: &str, new_password: &str) -> Result<(), AppError> {
    check_password(new_password)?;
    if !repository::update_password_hash(db, id, &hash_password(new_password)).await? {
        return Err(AppError::NotFound);
    }
    info!(ustaz_id = id, "password changed");
    Ok(())
}
