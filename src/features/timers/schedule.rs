//! Turning /timer and /alarm arguments into absolute due times
//!
//! - **Version**: 1.0.0
//! - **Since**: 1.0.0

use chrono::{DateTime, Duration, TimeZone, Utc};
use thiserror::Error;

pub const DEFAULT_TIMER_MESSAGE: &str = "時間だよ！";
pub const DEFAULT_ALARM_MESSAGE: &str = "起きて！";

/// Rejected scheduling requests. Nothing is queued when one of these is returned.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ScheduleError {
    #[error("a timer of 0 hours and 0 minutes cannot be set")]
    ZeroDuration,
    #[error("hours must not be negative (got {0})")]
    NegativeHours(i64),
    #[error("hour must be between 0 and 23 (got {0})")]
    HourOutOfRange(i64),
    #[error("minute must be between 0 and 59 (got {0})")]
    MinuteOutOfRange(i64),
    #[error("the requested time is too far in the future")]
    TooFarAhead,
    #[error("{hour:02}:{minute:02} does not exist in the configured time zone")]
    InvalidLocalTime { hour: u32, minute: u32 },
}

/// Arguments of a /timer request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimerRequest {
    pub hours: i64,
    pub minutes: i64,
    /// Falls back to [`DEFAULT_TIMER_MESSAGE`] when absent or blank
    pub message: Option<String>,
}

impl TimerRequest {
    pub fn delay(&self) -> Result<Duration, ScheduleError> {
        delay_from(self.hours, self.minutes)
    }

    pub fn due(&self, now: DateTime<Utc>) -> Result<DateTime<Utc>, ScheduleError> {
        now.checked_add_signed(self.delay()?)
            .ok_or(ScheduleError::TooFarAhead)
    }

    pub fn message(&self) -> String {
        message_or(&self.message, DEFAULT_TIMER_MESSAGE)
    }
}

/// Arguments of an /alarm request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlarmRequest {
    pub hour: i64,
    pub minute: i64,
    /// Falls back to [`DEFAULT_ALARM_MESSAGE`] when absent or blank
    pub message: Option<String>,
}

impl AlarmRequest {
    pub fn resolve<Tz: TimeZone>(
        &self,
        now: DateTime<Utc>,
        tz: &Tz,
    ) -> Result<AlarmTime<Tz>, ScheduleError> {
        next_alarm(self.hour, self.minute, now, tz)
    }

    pub fn message(&self) -> String {
        message_or(&self.message, DEFAULT_ALARM_MESSAGE)
    }
}

/// When an alarm fires, both as the scheduler's UTC instant and as local wall-clock time
#[derive(Debug, Clone)]
pub struct AlarmTime<Tz: TimeZone> {
    pub due: DateTime<Utc>,
    pub local: DateTime<Tz>,
}

/// Validate a relative delay. Hours are unbounded above; minutes are 0-59.
pub fn delay_from(hours: i64, minutes: i64) -> Result<Duration, ScheduleError> {
    if hours < 0 {
        return Err(ScheduleError::NegativeHours(hours));
    }
    if !(0..=59).contains(&minutes) {
        return Err(ScheduleError::MinuteOutOfRange(minutes));
    }
    if hours == 0 && minutes == 0 {
        return Err(ScheduleError::ZeroDuration);
    }

    Duration::try_hours(hours)
        .and_then(|h| h.checked_add(&Duration::minutes(minutes)))
        .ok_or(ScheduleError::TooFarAhead)
}

/// Next occurrence of `hour:minute` (seconds zeroed) in `tz` that is strictly after `now`
pub fn next_alarm<Tz: TimeZone>(
    hour: i64,
    minute: i64,
    now: DateTime<Utc>,
    tz: &Tz,
) -> Result<AlarmTime<Tz>, ScheduleError> {
    let hour = u32::try_from(hour)
        .ok()
        .filter(|h| *h <= 23)
        .ok_or(ScheduleError::HourOutOfRange(hour))?;
    let minute = u32::try_from(minute)
        .ok()
        .filter(|m| *m <= 59)
        .ok_or(ScheduleError::MinuteOutOfRange(minute))?;
    let invalid = || ScheduleError::InvalidLocalTime { hour, minute };

    let local_now = now.with_timezone(tz);
    let wall_clock = local_now
        .date_naive()
        .and_hms_opt(hour, minute, 0)
        .ok_or_else(invalid)?;

    let mut local = tz
        .from_local_datetime(&wall_clock)
        .earliest()
        .ok_or_else(invalid)?;
    if local <= local_now {
        local = tz
            .from_local_datetime(&(wall_clock + Duration::days(1)))
            .earliest()
            .ok_or_else(invalid)?;
    }

    Ok(AlarmTime {
        due: local.with_timezone(&Utc),
        local,
    })
}

fn message_or(message: &Option<String>, default: &str) -> String {
    message
        .as_deref()
        .map(str::trim)
        .filter(|m| !m.is_empty())
        .unwrap_or(default)
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::FixedOffset;

    fn tokyo() -> FixedOffset {
        FixedOffset::east_opt(9 * 3600).unwrap()
    }

    fn utc(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, mo, d, h, mi, s).unwrap()
    }

    #[test]
    fn test_zero_duration_rejected() {
        assert_eq!(delay_from(0, 0), Err(ScheduleError::ZeroDuration));
    }

    #[test]
    fn test_ninety_minutes() {
        let now = utc(2024, 5, 1, 12, 0, 0);
        let request = TimerRequest {
            hours: 1,
            minutes: 30,
            message: None,
        };
        assert_eq!(request.due(now).unwrap(), now + Duration::minutes(90));
    }

    #[test]
    fn test_delay_bounds() {
        assert_eq!(delay_from(-1, 10), Err(ScheduleError::NegativeHours(-1)));
        assert_eq!(delay_from(1, 60), Err(ScheduleError::MinuteOutOfRange(60)));
        assert_eq!(delay_from(0, -5), Err(ScheduleError::MinuteOutOfRange(-5)));
        assert_eq!(delay_from(0, 1), Ok(Duration::minutes(1)));
        assert_eq!(delay_from(48, 0), Ok(Duration::hours(48)));
        assert_eq!(delay_from(i64::MAX, 0), Err(ScheduleError::TooFarAhead));
    }

    #[test]
    fn test_alarm_later_today() {
        // 08:00 in Tokyo
        let now = utc(2024, 5, 1, 23, 0, 0);
        let alarm = next_alarm(9, 30, now, &tokyo()).unwrap();
        assert_eq!(alarm.due, utc(2024, 5, 2, 0, 30, 0));
        assert_eq!(alarm.local.format("%m/%d %H:%M").to_string(), "05/02 09:30");
    }

    #[test]
    fn test_alarm_already_passed_moves_to_tomorrow() {
        // 10:00:30 in Tokyo
        let now = utc(2024, 5, 2, 1, 0, 30);
        let alarm = next_alarm(9, 30, now, &tokyo()).unwrap();
        assert_eq!(alarm.due, utc(2024, 5, 3, 0, 30, 0));
    }

    #[test]
    fn test_alarm_exactly_now_moves_to_tomorrow() {
        let now = utc(2024, 5, 2, 0, 30, 0);
        let alarm = next_alarm(9, 30, now, &tokyo()).unwrap();
        assert_eq!(alarm.due, utc(2024, 5, 3, 0, 30, 0));
    }

    #[test]
    fn test_alarm_same_minute_but_seconds_passed() {
        // 09:30:10 local; target 09:30:00 is not after now
        let now = utc(2024, 5, 2, 0, 30, 10);
        let alarm = next_alarm(9, 30, now, &tokyo()).unwrap();
        assert_eq!(alarm.due, utc(2024, 5, 3, 0, 30, 0));
    }

    #[test]
    fn test_alarm_in_utc() {
        let now = utc(2024, 12, 31, 23, 59, 0);
        let alarm = next_alarm(0, 0, now, &Utc).unwrap();
        assert_eq!(alarm.due, utc(2025, 1, 1, 0, 0, 0));
    }

    #[test]
    fn test_alarm_follows_daylight_saving() {
        let new_york = chrono_tz::America::New_York;
        // 07:00 EST, then 07:00 EDT
        let winter = next_alarm(9, 0, utc(2024, 1, 15, 12, 0, 0), &new_york).unwrap();
        assert_eq!(winter.due, utc(2024, 1, 15, 14, 0, 0));
        let summer = next_alarm(9, 0, utc(2024, 7, 15, 11, 0, 0), &new_york).unwrap();
        assert_eq!(summer.due, utc(2024, 7, 15, 13, 0, 0));
    }

    #[test]
    fn test_alarm_in_daylight_saving_gap_rejected() {
        // 01:00 EST on 2024-03-10; clocks jump from 02:00 to 03:00
        let now = utc(2024, 3, 10, 6, 0, 0);
        assert_eq!(
            next_alarm(2, 30, now, &chrono_tz::America::New_York).unwrap_err(),
            ScheduleError::InvalidLocalTime { hour: 2, minute: 30 }
        );
    }

    #[test]
    fn test_alarm_range_validation() {
        let now = utc(2024, 5, 1, 0, 0, 0);
        assert_eq!(
            next_alarm(24, 0, now, &Utc).unwrap_err(),
            ScheduleError::HourOutOfRange(24)
        );
        assert_eq!(
            next_alarm(-1, 0, now, &Utc).unwrap_err(),
            ScheduleError::HourOutOfRange(-1)
        );
        assert_eq!(
            next_alarm(7, 75, now, &Utc).unwrap_err(),
            ScheduleError::MinuteOutOfRange(75)
        );
    }

    #[test]
    fn test_default_messages() {
        let timer = TimerRequest {
            hours: 0,
            minutes: 5,
            message: Some("   ".to_string()),
        };
        assert_eq!(timer.message(), DEFAULT_TIMER_MESSAGE);

        let alarm = AlarmRequest {
            hour: 7,
            minute: 0,
            message: None,
        };
        assert_eq!(alarm.message(), DEFAULT_ALARM_MESSAGE);

        let custom = AlarmRequest {
            hour: 7,
            minute: 0,
            message: Some("ゴミ出し".to_string()),
        };
        assert_eq!(custom.message(), "ゴミ出し");
    }
}
