//! Memory disclosure and erase handlers
//!
//! Handles: memory_read, all_erase
//!
//! Privilege: guild owner or Manage Server. /memory_read is open to everyone
//! but limited to the caller's own entries without privilege.

use anyhow::Result;
use async_trait::async_trait;
use log::{info, warn};
use serenity::model::application::interaction::application_command::ApplicationCommandInteraction;
use serenity::model::application::interaction::InteractionResponseType;
use serenity::model::channel::AttachmentType;
use serenity::prelude::Context;
use std::borrow::Cow;
use std::sync::Arc;

use super::{invoker_can_manage, respond};
use crate::commands::context::CommandContext;
use crate::commands::handler::SlashCommandHandler;
use crate::core::{json_reply, JsonReply};
use crate::features::preferences::{ExportScope, PreferenceRepository};

pub const EXPORT_FILENAME: &str = "shikaku_memory.json";
const ADMIN_ONLY: &str = "このコマンドは管理者専用だよ！";

/// Scope a caller may read
pub fn export_scope(can_manage: bool, user_id: &str) -> ExportScope {
    if can_manage {
        ExportScope::All
    } else {
        ExportScope::User(user_id.to_string())
    }
}

/// Serialized export ready to send
pub async fn render_export(
    preferences: &PreferenceRepository,
    scope: &ExportScope,
) -> serde_json::Result<JsonReply> {
    let json = preferences.export(scope).await.to_pretty_json()?;
    Ok(json_reply(&json, EXPORT_FILENAME))
}

/// Clear everything if allowed; returns whether the erase happened
pub async fn erase_all(preferences: &PreferenceRepository, can_manage: bool) -> bool {
    if can_manage {
        preferences.reset_all().await;
    }
    can_manage
}

pub struct MemoryHandler;

#[async_trait]
impl SlashCommandHandler for MemoryHandler {
    fn command_names(&self) -> &'static [&'static str] {
        &["memory_read", "all_erase"]
    }

    async fn handle(
        &self,
        ctx: Arc<CommandContext>,
        serenity_ctx: &Context,
        command: &ApplicationCommandInteraction,
    ) -> Result<()> {
        let can_manage = invoker_can_manage(serenity_ctx, command);
        match command.data.name.as_str() {
            "memory_read" => {
                self.handle_memory_read(&ctx, serenity_ctx, command, can_manage)
                    .await
            }
            "all_erase" => {
                if erase_all(&ctx.preferences, can_manage).await {
                    info!("All memory erased by user {}", command.user.id);
                    respond(serenity_ctx, command, "オールクリア！まっさらにしたよ。", true).await
                } else {
                    warn!("Refused /all_erase from user {}", command.user.id);
                    respond(serenity_ctx, command, ADMIN_ONLY, true).await
                }
            }
            _ => Ok(()),
        }
    }
}

impl MemoryHandler {
    async fn handle_memory_read(
        &self,
        ctx: &CommandContext,
        serenity_ctx: &Context,
        command: &ApplicationCommandInteraction,
        can_manage: bool,
    ) -> Result<()> {
        let scope = export_scope(can_manage, &command.user.id.to_string());
        info!("/memory_read by user {} with scope {scope:?}", command.user.id);

        match render_export(&ctx.preferences, &scope).await? {
            JsonReply::Inline(content) => respond(serenity_ctx, command, content, true).await,
            JsonReply::Attachment { filename, data } => {
                command
                    .create_interaction_response(&serenity_ctx.http, |r| {
                        r.kind(InteractionResponseType::ChannelMessageWithSource)
                            .interaction_response_data(|m| {
                                m.content("記憶データを添付したよ。")
                                    .ephemeral(true)
                                    .add_file(AttachmentType::Bytes {
                                        data: Cow::Owned(data),
                                        filename,
                                    })
                            })
                    })
                    .await?;
                Ok(())
            }
        }
    }
}
