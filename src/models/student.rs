use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Student {
    pub id: String,
    pub added_by: Option<String>,
    pub full_name: String,
    pub family_name: Option<String>,
    pub family_phone: Option<String>,
    pub current_hifz_page: i32,
    pub is_active: bool,
    pub created_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewStudentRequest {
    pub full_name: String,
    pub family_name: Option<String>,
    pub family_phone: Option<String>,
    #[serde(default)]
    pub current_hifz_page: i32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateStudentRequest {
    pub full_name: Option<String>,
    pub family_name: Option<String>,
    pub family_phone: Option<String>,
    pub current_hifz_page: Option<i32>,
    pub is_active: Option<bool>,
}
