use std::env;
use std::net::SocketAddr;

use chrono::NaiveTime;

use crate::clock::{LatenessPolicy, parse_clock_time};
use crate::error::AppError;

pub const DEFAULT_DATABASE_URL: &str = "sqlite://halaqa.db?mode=rwc";
pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:3000";
pub const DEFAULT_CLASS_START_TIME: &str = "02:30";

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub database_url: String,
    pub bind_addr: SocketAddr,
    pub class_start: NaiveTime,
    pub lateness_policy: LatenessPolicy,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from any key lookup, falling back to defaults for unset keys.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url =
            lookup("DATABASE_URL").unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string());

        let bind_addr = lookup("BIND_ADDR")
            .unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string())
            .parse::<SocketAddr>()
            .map_err(|e| AppError::Config(format!("BIND_ADDR is invalid: {}", e)))?;

        let class_start_raw =
            lookup("CLASS_START_TIME").unwrap_or_else(|| DEFAULT_CLASS_START_TIME.to_string());
        let class_start = parse_clock_time(&class_start_raw).map_err(|_| {
            AppError::Config(format!("CLASS_START_TIME must be HH:MM, got '{}'", class_start_raw))
        })?;

        let lateness_policy = match lookup("LATENESS_POLICY") {
            Some(raw) => raw.parse()?,
            None => LatenessPolicy::default(),
        };

        Ok(Self {
            database_url,
            bind_addr,
            class_start,
            lateness_policy,
        })
    }
}
