//! Who is acting, and the account password format.
//!
//! The actor id is taken on trust from the `X-Ustaz-Id` header and only feeds
//! audit columns (`added_by`, `recorded_by`, `set_by`); nothing is authorized
//! on it.

use std::convert::Infallible;

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use sha2::{Digest, Sha256};
use uuid::Uuid;

pub const ACTOR_HEADER: &str = "x-ustaz-id";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CurrentActor(Option<String>);

impl CurrentActor {
    pub fn new(user_id: Option<String>) -> Self {
        Self(user_id)
    }

    pub fn user_id(&self) -> Option<&str> {
        self.0.as_deref()
    }
}

impl<S> FromRequestParts<S> for CurrentActor
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user_id = parts
            .headers
            .get(ACTOR_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(str::to_string);
        Ok(CurrentActor(user_id))
    }
}

fn digest(password: &str, salt: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(password.as_bytes());
    hasher.update(salt.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// `sha256$<salt>$<hex digest of password + salt>` with a random 16-byte salt.
pub fn hash_password(password: &str) -> String {
    let salt = Uuid::new_v4().simple().to_string();
    format!("sha256${}${}", salt, digest(password, &salt))
}

pub fn verify_password(password: &str, stored: &str) -> bool {
    let mut parts = stored.splitn(3, '$');
    match (parts.next(), parts.next(), parts.next()) {
        (Some("sha256"), Some(salt), Some(hash)) if !salt.is_empty() && !hash.is_empty() => {
            digest(password, salt) == hash
        }
        _ => false,
    }
}
