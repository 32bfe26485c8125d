//! Posting-time advice. The slot lists are fixed; only `now_local` depends on the
//! clock and the requested zone.

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::errors::AppError;

const WEEKDAY_SLOTS: &[&str] = &["08:00", "12:30", "18:00", "21:00"];
const WEEKEND_SLOTS: &[&str] = &["10:00", "14:00", "19:00", "21:30"];

const LOCAL_TIME_FORMAT: &str = "%Y-%m-%d %H:%M";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleAdvice {
    pub timezone: String,
    pub weekday: Vec<String>,
    pub weekend: Vec<String>,
    pub now_local: String,
}

/// Parses an IANA zone id. No fallback zone is substituted.
pub fn parse_timezone(timezone_id: &str) -> Result<Tz, AppError> {
    timezone_id
        .parse::<Tz>()
        .map_err(|_| AppError::InvalidTimezone(timezone_id.to_string()))
}

/// Advice for `timezone_id` at the current wall-clock time.
pub fn advise(timezone_id: &str) -> Result<ScheduleAdvice, AppError> {
    advise_at(timezone_id, Utc::now())
}

pub fn advise_at(timezone_id: &str, now: DateTime<Utc>) -> Result<ScheduleAdvice, AppError> {
    let tz = parse_timezone(timezone_id)?;
    Ok(ScheduleAdvice {
        timezone: tz.name().to_string(),
        weekday: to_owned(WEEKDAY_SLOTS),
        weekend: to_owned(WEEKEND_SLOTS),
        now_local: now.with_timezone(&tz).format(LOCAL_TIME_FORMAT).to_string(),
    })
}

fn to_owned(slots: &[&str]) -> Vec<String> {
    slots.iter().map(|s| s.to_string()).collect()
}
