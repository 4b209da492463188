//! Timer command handlers
//!
//! Handles: timer, alarm
//!
//! Confirmations are public so the channel can see what was scheduled.

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use log::info;
use serenity::model::application::interaction::application_command::ApplicationCommandInteraction;
use serenity::prelude::Context;
use std::fmt::Display;
use std::sync::Arc;

use super::respond;
use crate::commands::context::CommandContext;
use crate::commands::handler::SlashCommandHandler;
use crate::commands::slash::{get_integer_option, get_string_option};
use crate::features::timers::{
    AlarmRequest, NotificationScheduler, ScheduleError, ScheduledNotification, TimerRequest,
};

/// Japanese reply for a rejected request
pub fn schedule_error_reply(error: &ScheduleError) -> &'static str {
    match error {
        ScheduleError::ZeroDuration => "0時間0分は設定できないよ。",
        ScheduleError::TooFarAhead => "そんなに先のことは覚えていられないよ…",
        _ => "その時刻はおかしいかも。",
    }
}

pub fn timer_confirmation(hours: i64, minutes: i64) -> String {
    format!("タイマーOK。{hours}時間{minutes}分後に知らせるね。")
}

pub fn alarm_confirmation<Tz: TimeZone>(local: &DateTime<Tz>) -> String
where
    Tz::Offset: Display,
{
    format!("アラームOK。{} に知らせるね。", local.format("%m/%d %H:%M"))
}

/// Validate and queue a /timer; returns the confirmation text
pub async fn schedule_timer(
    scheduler: &NotificationScheduler,
    request: &TimerRequest,
    now: DateTime<Utc>,
    channel_id: u64,
    user_id: u64,
) -> Result<String, ScheduleError> {
    let due = request.due(now)?;
    scheduler
        .schedule(ScheduledNotification::new(due, channel_id, user_id, request.message()))
        .await;
    Ok(timer_confirmation(request.hours, request.minutes))
}

/// Validate and queue an /alarm in `tz`; returns the confirmation text
pub async fn schedule_alarm<Tz: TimeZone>(
    scheduler: &NotificationScheduler,
    request: &AlarmRequest,
    now: DateTime<Utc>,
    tz: &Tz,
    channel_id: u64,
    user_id: u64,
) -> Result<String, ScheduleError>
where
    Tz::Offset: Display,
{
    let alarm = request.resolve(now, tz)?;
    scheduler
        .schedule(ScheduledNotification::new(
            alarm.due,
            channel_id,
            user_id,
            request.message(),
        ))
        .await;
    Ok(alarm_confirmation(&alarm.local))
}

pub struct TimerHandler;

#[async_trait]
impl SlashCommandHandler for TimerHandler {
    fn command_names(&self) -> &'static [&'static str] {
        &["timer", "alarm"]
    }

    async fn handle(
        &self,
        ctx: Arc<CommandContext>,
        serenity_ctx: &Context,
        command: &ApplicationCommandInteraction,
    ) -> Result<()> {
        let options = &command.data.options;
        let channel_id = command.channel_id.0;
        let user_id = command.user.id.0;
        let message = get_string_option(options, "message");
        let now = Utc::now();

        let result = match command.data.name.as_str() {
            "timer" => {
                let request = TimerRequest {
                    hours: get_integer_option(options, "hours").unwrap_or(0),
                    minutes: get_integer_option(options, "minutes").unwrap_or(0),
                    message,
                };
                schedule_timer(&ctx.scheduler, &request, now, channel_id, user_id).await
            }
            "alarm" => {
                // Missing values fall through to the range check
                let request = AlarmRequest {
                    hour: get_integer_option(options, "hour").unwrap_or(-1),
                    minute: get_integer_option(options, "minute").unwrap_or(-1),
                    message,
                };
                schedule_alarm(
                    &ctx.scheduler,
                    &request,
                    now,
                    &ctx.time_zone,
                    channel_id,
                    user_id,
                )
                .await
            }
            _ => return Ok(()),
        };

        match result {
            Ok(confirmation) => {
                info!(
                    "/{} scheduled for user {user_id} in channel {channel_id} ({} pending)",
                    command.data.name,
                    ctx.scheduler.pending_count().await
                );
                respond(serenity_ctx, command, confirmation, false).await
            }
            Err(e) => {
                info!("/{} rejected for user {user_id}: {e}", command.data.name);
                respond(serenity_ctx, command, schedule_error_reply(&e), true).await
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::timers::{DEFAULT_ALARM_MESSAGE, DEFAULT_TIMER_MESSAGE};
    use chrono::{Duration, FixedOffset};

    fn jst() -> FixedOffset {
        FixedOffset::east_opt(9 * 3600).unwrap()
    }

    fn at(rfc3339: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(rfc3339).unwrap().with_timezone(&Utc)
    }

    #[test]
    fn test_timer_handler_commands() {
        assert_eq!(TimerHandler.command_names(), &["timer", "alarm"]);
    }

    #[tokio::test]
    async fn test_timer_queues_one_entry() {
        let scheduler = NotificationScheduler::new();
        let now = at("2024-05-01T00:00:00Z");
        let request = TimerRequest {
            hours: 1,
            minutes: 30,
            message: None,
        };

        let reply = schedule_timer(&scheduler, &request, now, 10, 20).await.unwrap();
        assert_eq!(reply, "タイマーOK。1時間30分後に知らせるね。");

        let pending = scheduler.pending().await;
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].due, now + Duration::minutes(90));
        assert_eq!(pending[0].body, DEFAULT_TIMER_MESSAGE);
        assert_eq!(pending[0].render(), format!("<@20> {DEFAULT_TIMER_MESSAGE}"));
    }

    #[tokio::test]
    async fn test_zero_timer_rejected_without_queueing() {
        let scheduler = NotificationScheduler::new();
        let request = TimerRequest {
            hours: 0,
            minutes: 0,
            message: Some("hi".to_string()),
        };

        let err = schedule_timer(&scheduler, &request, Utc::now(), 1, 2)
            .await
            .unwrap_err();
        assert_eq!(err, ScheduleError::ZeroDuration);
        assert_eq!(schedule_error_reply(&err), "0時間0分は設定できないよ。");
        assert_eq!(scheduler.pending_count().await, 0);
    }

    #[tokio::test]
    async fn test_alarm_later_today() {
        let scheduler = NotificationScheduler::new();
        // 10:00 local
        let now = at("2024-05-01T01:00:00Z");
        let request = AlarmRequest {
            hour: 18,
            minute: 5,
            message: Some("ごはん".to_string()),
        };

        let reply = schedule_alarm(&scheduler, &request, now, &jst(), 1, 2)
            .await
            .unwrap();
        assert_eq!(reply, "アラームOK。05/01 18:05 に知らせるね。");

        let pending = scheduler.pending().await;
        assert_eq!(pending[0].due, at("2024-05-01T09:05:00Z"));
        assert_eq!(pending[0].body, "ごはん");
    }

    #[tokio::test]
    async fn test_alarm_already_passed_rolls_to_tomorrow() {
        let scheduler = NotificationScheduler::new();
        // 23:30 local on 05/01
        let now = at("2024-05-01T14:30:00Z");
        let request = AlarmRequest {
            hour: 7,
            minute: 0,
            message: None,
        };

        let reply = schedule_alarm(&scheduler, &request, now, &jst(), 1, 2)
            .await
            .unwrap();
        assert_eq!(reply, "アラームOK。05/02 07:00 に知らせるね。");
        assert_eq!(scheduler.pending().await[0].body, DEFAULT_ALARM_MESSAGE);
    }

    #[tokio::test]
    async fn test_alarm_uses_context_time_zone() {
        let (ctx, _dir) = crate::commands::context::testing::test_context();
        // 10:00 in Tokyo
        let now = at("2024-05-01T01:00:00Z");
        let request = AlarmRequest {
            hour: 12,
            minute: 0,
            message: None,
        };

        let reply = schedule_alarm(&ctx.scheduler, &request, now, &ctx.time_zone, 1, 2)
            .await
            .unwrap();
        assert_eq!(reply, "アラームOK。05/01 12:00 に知らせるね。");
        assert_eq!(ctx.scheduler.pending().await[0].due, at("2024-05-01T03:00:00Z"));
    }

    #[tokio::test]
    async fn test_alarm_out_of_range_rejected() {
        let scheduler = NotificationScheduler::new();
        let request = AlarmRequest {
            hour: 24,
            minute: 0,
            message: None,
        };

        let err = schedule_alarm(&scheduler, &request, Utc::now(), &jst(), 1, 2)
            .await
            .unwrap_err();
        assert_eq!(err, ScheduleError::HourOutOfRange(24));
        assert_eq!(schedule_error_reply(&err), "その時刻はおかしいかも。");
        assert_eq!(scheduler.pending_count().await, 0);
    }
}
