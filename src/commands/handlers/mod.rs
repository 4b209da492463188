//! Per-command handler implementations
//!
//! - **Version**: 1.2.0
//! - **Since**: 1.0.0
//!
//! ## Changelog
//! - 1.2.0: Add MemoryHandler (memory_read, all_erase)
//! - 1.1.0: Add MemoHandler
//! - 1.0.0: UtilityHandler, PreferencesHandler, TimerHandler

pub mod admin;
pub mod memo;
pub mod preferences;
pub mod timers;
pub mod utility;

use anyhow::Result;
use serenity::model::application::interaction::application_command::ApplicationCommandInteraction;
use serenity::model::application::interaction::InteractionResponseType;
use serenity::model::permissions::Permissions;
use serenity::prelude::Context;
use std::sync::Arc;

use super::handler::SlashCommandHandler;

/// Create all registered command handlers
pub fn create_all_handlers() -> Vec<Arc<dyn SlashCommandHandler>> {
    vec![
        Arc::new(utility::UtilityHandler),
        Arc::new(preferences::PreferencesHandler),
        Arc::new(memo::MemoHandler),
        Arc::new(timers::TimerHandler),
        Arc::new(admin::MemoryHandler),
    ]
}

/// Reply to the interaction with plain text
pub(crate) async fn respond(
    serenity_ctx: &Context,
    command: &ApplicationCommandInteraction,
    content: impl ToString,
    ephemeral: bool,
) -> Result<()> {
    command
        .create_interaction_response(&serenity_ctx.http, |response| {
            response
                .kind(InteractionResponseType::ChannelMessageWithSource)
                .interaction_response_data(|message| message.content(content).ephemeral(ephemeral))
        })
        .await?;
    Ok(())
}

/// Guild owners and members with Manage Server may touch everyone's data
pub fn can_manage(is_owner: bool, permissions: Option<Permissions>) -> bool {
    is_owner
        || permissions.is_some_and(|p| {
            p.contains(Permissions::MANAGE_GUILD) || p.contains(Permissions::ADMINISTRATOR)
        })
}

/// [`can_manage`] for the invoking member; always false outside a guild
pub(crate) fn invoker_can_manage(
    serenity_ctx: &Context,
    command: &ApplicationCommandInteraction,
) -> bool {
    let Some(guild_id) = command.guild_id else {
        return false;
    };
    let is_owner = serenity_ctx
        .cache
        .guild_field(guild_id, |guild| guild.owner_id)
        .is_some_and(|owner| owner == command.user.id);
    let permissions = command.member.as_ref().and_then(|m| m.permissions);
    can_manage(is_owner, permissions)
}
