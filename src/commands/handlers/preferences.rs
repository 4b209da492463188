//! Per-user preference handlers
//!
//! Handles: set_name, set_greeting, set_silent, set_model, my_status, reset_my_settings
//!
//! Every reply here is ephemeral.

use anyhow::Result;
use async_trait::async_trait;
use log::{info, warn};
use serenity::model::application::interaction::application_command::ApplicationCommandInteraction;
use serenity::model::application::interaction::InteractionResponseType;
use serenity::prelude::Context;
use std::sync::Arc;

use super::respond;
use crate::commands::context::CommandContext;
use crate::commands::handler::SlashCommandHandler;
use crate::commands::slash::{get_mode_option, get_string_option};
use crate::features::preferences::{PreferenceError, PreferenceSnapshot};

const BAD_ARGUMENT: &str = "引数の形式が正しくないみたい…";
const UNKNOWN_NICKNAME: &str = "まだ覚えてないよ";

/// Rows of the /my_status embed
pub fn status_fields(prefs: &PreferenceSnapshot) -> Vec<(&'static str, String)> {
    let on_off = |on: bool| if on { "オン" } else { "オフ" }.to_string();
    vec![
        (
            "呼び名",
            prefs
                .nickname
                .clone()
                .unwrap_or_else(|| UNKNOWN_NICKNAME.to_string()),
        ),
        ("挨拶で名前を呼ぶ", on_off(prefs.greeting)),
        ("サイレントモード", on_off(prefs.silent)),
        ("使用モデル", format!("`{}`", prefs.model)),
    ]
}

fn greeting_reply(on: bool) -> &'static str {
    if on {
        "これからは名前を呼ぶね！"
    } else {
        "わかった、名前は呼ばないようにするね。"
    }
}

fn silent_reply(on: bool) -> &'static str {
    if on {
        "返信をサイレントモードにしたよ。通知は飛ばないはず！"
    } else {
        "サイレントモードを解除したよ。"
    }
}

fn error_reply(error: &PreferenceError) -> String {
    match error {
        PreferenceError::UnsupportedModel(model) => format!("`{model}` は使えないモデルだよ…"),
        PreferenceError::EmptyUserId | PreferenceError::EmptyKeyword => BAD_ARGUMENT.to_string(),
    }
}

/// Handler for per-user settings
pub struct PreferencesHandler;

#[async_trait]
impl SlashCommandHandler for PreferencesHandler {
    fn command_names(&self) -> &'static [&'static str] {
        &[
            "set_name",
            "set_greeting",
            "set_silent",
            "set_model",
            "my_status",
            "reset_my_settings",
        ]
    }

    async fn handle(
        &self,
        ctx: Arc<CommandContext>,
        serenity_ctx: &Context,
        command: &ApplicationCommandInteraction,
    ) -> Result<()> {
        let user_id = command.user.id.to_string();
        let options = &command.data.options;

        let reply = match command.data.name.as_str() {
            "set_name" => match get_string_option(options, "nickname") {
                Some(nickname) => match ctx.preferences.set_nickname(&user_id, &nickname).await {
                    Ok(()) => format!("わかった！これからは『{nickname}』って呼ぶね。"),
                    Err(e) => error_reply(&e),
                },
                None => BAD_ARGUMENT.to_string(),
            },
            "set_greeting" => match get_mode_option(options, "mode") {
                Some(on) => match ctx.preferences.set_greeting(&user_id, on).await {
                    Ok(()) => greeting_reply(on).to_string(),
                    Err(e) => error_reply(&e),
                },
                None => BAD_ARGUMENT.to_string(),
            },
            "set_silent" => match get_mode_option(options, "mode") {
                Some(on) => match ctx.preferences.set_silent(&user_id, on).await {
                    Ok(()) => silent_reply(on).to_string(),
                    Err(e) => error_reply(&e),
                },
                None => BAD_ARGUMENT.to_string(),
            },
            "set_model" => match get_string_option(options, "model") {
                Some(model) => match ctx.preferences.set_model(&user_id, &model).await {
                    Ok(()) => format!("わかった！これからの会話は `{model}` を使うね！"),
                    Err(e) => {
                        warn!("Rejected /set_model from user {user_id}: {e}");
                        error_reply(&e)
                    }
                },
                None => BAD_ARGUMENT.to_string(),
            },
            "my_status" => return self.handle_my_status(&ctx, serenity_ctx, command).await,
            "reset_my_settings" => {
                ctx.preferences.reset_user(&user_id).await;
                "わかった！あなたの設定を全部忘れちゃった！".to_string()
            }
            _ => return Ok(()),
        };

        info!("/{} completed for user {user_id}", command.data.name);
        respond(serenity_ctx, command, reply, true).await
    }
}

impl PreferencesHandler {
    /// Handle /my_status command - show resolved settings as an embed
    async fn handle_my_status(
        &self,
        ctx: &CommandContext,
        serenity_ctx: &Context,
        command: &ApplicationCommandInteraction,
    ) -> Result<()> {
        let prefs = ctx.preferences.snapshot(&command.user.id.to_string()).await;
        let display_name = command
            .member
            .as_ref()
            .and_then(|m| m.nick.clone())
            .unwrap_or_else(|| command.user.name.clone());
        let fields = status_fields(&prefs);

        command
            .create_interaction_response(&serenity_ctx.http, |r| {
                r.kind(InteractionResponseType::ChannelMessageWithSource)
                    .interaction_response_data(|m| {
                        m.ephemeral(true).embed(|e| {
                            e.title(format!("{display_name}さんの設定"));
                            e.color(0x2ECC71);
                            for (name, value) in fields {
                                e.field(name, value, false);
                            }
                            e
                        })
                    })
            })
            .await?;
        Ok(())
    }
}
