use std::fmt;

use chrono::{DateTime, Local, NaiveDateTime, TimeZone};
use serde::Serialize;

pub const DEFAULT_EVENT_START: &str = "2025-10-31T09:00:00";
pub const STARTED_MESSAGE: &str = "¡El evento ha comenzado!";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum Countdown {
    Remaining {
        days: i64,
        hours: i64,
        minutes: i64,
        seconds: i64,
    },
    Started,
}

impl Countdown {
    pub fn until<Tz: TimeZone>(event: &DateTime<Tz>, now: &DateTime<Tz>) -> Self {
        let millis = event.clone().signed_duration_since(now.clone()).num_milliseconds();
        if millis < 0 {
            return Self::Started;
        }
        let total_seconds = millis / 1000;
        Self::Remaining {
            days: total_seconds / 86_400,
            hours: (total_seconds % 86_400) / 3_600,
            minutes: (total_seconds % 3_600) / 60,
            seconds: total_seconds % 60,
        }
    }
}

impl fmt::Display for Countdown {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Remaining {
                days,
                hours,
                minutes,
                seconds,
            } => write!(f, "{days}d {hours}h {minutes}m {seconds}s"),
            Self::Started => write!(f, "{STARTED_MESSAGE}"),
        }
    }
}

/// Parses `YYYY-MM-DDTHH:MM:SS` (or with a space) as local time, or a full
/// RFC 3339 timestamp.
pub fn parse_event_start(value: &str) -> Result<DateTime<Local>, String> {
    let trimmed = value.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(dt.with_timezone(&Local));
    }
    let naive = NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%dT%H:%M:%S")
        .or_else(|_| NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%d %H:%M:%S"))
        .map_err(|e| format!("expected YYYY-MM-DDTHH:MM:SS: {e}"))?;
    Local
        .from_local_datetime(&naive)
        .earliest()
        .ok_or_else(|| "time does not exist in the local timezone".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    #[test]
    fn remaining_time_splits_into_units() {
        let now = Utc::now();
        let event = now + Duration::days(2) + Duration::hours(3) + Duration::seconds(65);
        let cd = Countdown::until(&event, &now);
        assert_eq!(
            cd,
            Countdown::Remaining {
                days: 2,
                hours: 3,
                minutes: 1,
                seconds: 5
            }
        );
        assert_eq!(cd.to_string(), "2d 3h 1m 5s");
    }

    #[test]
    fn past_event_has_started() {
        let now = Utc::now();
        let event = now - Duration::seconds(1);
        assert_eq!(Countdown::until(&event, &now), Countdown::Started);
        assert_eq!(Countdown::Started.to_string(), STARTED_MESSAGE);
    }

    #[test]
    fn parses_local_and_rfc3339_starts() {
        assert!(parse_event_start(DEFAULT_EVENT_START).is_ok());
        assert!(parse_event_start("2025-10-31 09:00:00").is_ok());
        assert!(parse_event_start("2025-10-31T09:00:00-03:00").is_ok());
        assert!(parse_event_start("mañana").is_err());
    }
}
