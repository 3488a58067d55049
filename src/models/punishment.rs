use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A named disciplinary action an ustaz can attach to attendance records.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Punishment {
    pub id: String,
    pub created_by: Option<String>,
    pub name: String,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PunishmentRequest {
    pub name: String,
}
