//! Wall-clock arithmetic shared by attendance and weekly goals.

use std::str::FromStr;

use chrono::{Datelike, Duration, NaiveDate, NaiveTime, Timelike};
use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// How an arrival before class start is reported.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LatenessPolicy {
    /// Negative minutes mean the student arrived early.
    #[default]
    Signed,
    /// Early arrivals count as zero minutes late.
    Clamped,
}

impl FromStr for LatenessPolicy {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "signed" => Ok(LatenessPolicy::Signed),
            "clamped" => Ok(LatenessPolicy::Clamped),
            other => Err(AppError::Config(format!("unknown lateness policy: {}", other))),
        }
    }
}

/// Parses a 24-hour `HH:MM` time, also accepting `HH:MM:SS` as stored rows carry it.
pub fn parse_clock_time(input: &str) -> Result<NaiveTime, AppError> {
    let trimmed = input.trim();
    NaiveTime::parse_from_str(trimmed, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(trimmed, "%H:%M:%S"))
        .map_err(|_| {
            AppError::Validation(format!(
                "Invalid time format '{}'. Please use HH:MM (24-hour).",
                trimmed
            ))
        })
}

pub fn minutes_since_midnight(time: NaiveTime) -> i32 {
    // hour() < 24 and minute() < 60, so the cast cannot overflow
    (time.hour() * 60 + time.minute()) as i32
}

/// Minutes between class start and arrival. Seconds are ignored.
pub fn compute_lateness(arrival: NaiveTime, class_start: NaiveTime, policy: LatenessPolicy) -> i32 {
    let diff = minutes_since_midnight(arrival) - minutes_since_midnight(class_start);
    match policy {
        LatenessPolicy::Signed => diff,
        LatenessPolicy::Clamped => diff.max(0),
    }
}

/// Monday to Sunday, inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WeekRange {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

impl WeekRange {
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start_date <= date && date <= self.end_date
    }

    pub fn previous(&self) -> WeekRange {
        week_range_for(self.start_date - Duration::days(7))
    }

    pub fn next(&self) -> WeekRange {
        week_range_for(self.start_date + Duration::days(7))
    }
}

/// The Monday–Sunday week containing `date`. Sunday closes the previous week.
pub fn week_range_for(date: NaiveDate) -> WeekRange {
    let offset = i64::from(date.weekday().num_days_from_monday());
    let start_date = date - Duration::days(offset);
    WeekRange {
        start_date,
        end_date: start_date + Duration::days(6),
    }
}
