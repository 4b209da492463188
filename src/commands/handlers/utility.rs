//! Utility command handlers
//!
//! Handles: ping, help, chat

use anyhow::Result;
use async_trait::async_trait;
use log::info;
use serenity::model::application::interaction::application_command::ApplicationCommandInteraction;
use serenity::prelude::Context;
use std::sync::Arc;

use super::respond;
use crate::commands::context::CommandContext;
use crate::commands::handler::SlashCommandHandler;
use crate::commands::slash::get_mode_option;

const HELP_LINES: &[&str] = &[
    "**しかくうつ — コマンド一覧**",
    "・/ping — 生存確認",
    "・/chat on|off — このチャンネルでの自動おしゃべり切替（その人だけに見える）",
    "・/set_name <nickname> — あなたの呼び名を登録（その人だけに見える）",
    "・/set_greeting on|off — 返信の最初に名前を呼ぶか（その人だけに見える）",
    "・/set_silent on|off — あなたへの返信をサイレント（@silent\\n付与、個人のみ表示）",
    "・/set_model <model> — 会話に使うAIモデルを変更（その人だけに見える）",
    "・/my_status — あなたの現在設定を表示（その人だけに見える）",
    "・/reset_my_settings — あなたの設定をリセット（その人だけに見える）",
    "・/memo add|show|list|forget — 個人メモ（その人だけに見える）",
    "・/memory_read — 記憶を開示（管理者は全体、一般は自分のみ・個人表示）",
    "・/all_erase — **全記憶消去（管理者専用・個人表示）**",
    "・/timer <hours> <minutes> [message] — 指定の時間後に通知（全体）",
    "・/alarm <hour> <minute> [message] — 指定時刻に1回通知（全体）",
];

pub fn help_text() -> String {
    HELP_LINES.join("\n")
}

fn chat_label(on: bool) -> &'static str {
    if on {
        "おしゃべり"
    } else {
        "おしゃべりお休み"
    }
}

/// Handler for utility commands: ping, help, chat
pub struct UtilityHandler;

#[async_trait]
impl SlashCommandHandler for UtilityHandler {
    fn command_names(&self) -> &'static [&'static str] {
        &["ping", "help", "chat"]
    }

    async fn handle(
        &self,
        ctx: Arc<CommandContext>,
        serenity_ctx: &Context,
        command: &ApplicationCommandInteraction,
    ) -> Result<()> {
        match command.data.name.as_str() {
            "ping" => respond(serenity_ctx, command, "Pong! 生きてるよ～！", false).await,
            "help" => respond(serenity_ctx, command, help_text(), false).await,
            "chat" => self.handle_chat(&ctx, serenity_ctx, command).await,
            _ => Ok(()),
        }
    }
}

impl UtilityHandler {
    /// Handle /chat command - flip conversation for the current channel
    async fn handle_chat(
        &self,
        ctx: &CommandContext,
        serenity_ctx: &Context,
        command: &ApplicationCommandInteraction,
    ) -> Result<()> {
        let Some(on) = get_mode_option(&command.data.options, "mode") else {
            return respond(serenity_ctx, command, "引数の形式が正しくないみたい…", true).await;
        };

        ctx.chat_switch.set(command.channel_id.0, on);
        info!(
            "Chat switched {} in channel {} by user {}",
            if on { "on" } else { "off" },
            command.channel_id,
            command.user.id
        );

        respond(
            serenity_ctx,
            command,
            format!("このチャンネルは **{}** にするね", chat_label(on)),
            true,
        )
        .await
    }
}
