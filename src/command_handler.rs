use crate::commands::context::CommandContext;
use crate::commands::registry::CommandRegistry;
use crate::core::truncate_for_message;
use crate::features::chat::ChatResponder;
use crate::features::reply::compose_for_user;
use anyhow::Result;
use log::{debug, info, warn};
use rand::Rng;
use serenity::model::application::interaction::application_command::ApplicationCommandInteraction;
use serenity::model::application::interaction::InteractionResponseType;
use serenity::model::channel::Message;
use serenity::prelude::Context;
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

/// Typing indicator pause before a chat reply, in milliseconds
const TYPING_DELAY_MS: std::ops::RangeInclusive<u64> = 250..=600;

/// Text the bot should answer, or `None` when the message is not for chat
///
/// Bot authors, DMs, channels with chat switched off and blank messages are skipped.
pub fn chat_text(content: &str, author_is_bot: bool, in_guild: bool, chat_on: bool) -> Option<&str> {
    if author_is_bot || !in_guild || !chat_on {
        return None;
    }
    let text = content.trim();
    (!text.is_empty()).then_some(text)
}

#[derive(Clone)]
pub struct CommandHandler {
    context: Arc<CommandContext>,
    registry: CommandRegistry,
    responder: ChatResponder,
}

impl CommandHandler {
    pub fn new(context: CommandContext, responder: ChatResponder) -> Self {
        CommandHandler {
            context: Arc::new(context),
            registry: CommandRegistry::with_all_handlers(),
            responder,
        }
    }

    pub fn context(&self) -> Arc<CommandContext> {
        Arc::clone(&self.context)
    }

    pub async fn handle_message(&self, ctx: &Context, msg: &Message) -> Result<()> {
        let chat_on = self.context.chat_switch.is_on(msg.channel_id.0);
        let Some(text) = chat_text(&msg.content, msg.author.bot, msg.guild_id.is_some(), chat_on)
        else {
            return Ok(());
        };

        let request_id = Uuid::new_v4();
        let user_id = msg.author.id.to_string();
        info!(
            "[{request_id}] Chat message | User: {user_id} | Channel: {} | Content: '{}'",
            msg.channel_id,
            text.chars().take(100).collect::<String>()
        );

        if let Err(e) = msg.channel_id.broadcast_typing(&ctx.http).await {
            debug!("[{request_id}] Typing indicator failed: {e}");
        }
        let delay = rand::rng().random_range(TYPING_DELAY_MS);
        tokio::time::sleep(Duration::from_millis(delay)).await;

        let bot_names = self.bot_names(ctx, msg);
        let bot_names: Vec<&str> = bot_names.iter().map(String::as_str).collect();
        let base = self.responder.respond(text, &user_id, &bot_names).await;

        let display_name = msg
            .member
            .as_ref()
            .and_then(|m| m.nick.clone())
            .unwrap_or_else(|| msg.author.name.clone());
        let reply = compose_for_user(&self.context.preferences, &base, &user_id, &display_name).await;

        // Send failures stay local to this message
        match msg.channel_id.say(&ctx.http, truncate_for_message(&reply)).await {
            Ok(_) => debug!("[{request_id}] Reply sent ({} chars)", reply.chars().count()),
            Err(e) => warn!("[{request_id}] Failed to send reply: {e}"),
        }
        Ok(())
    }

    /// The bot's account name plus its nickname in this guild, if any
    fn bot_names(&self, ctx: &Context, msg: &Message) -> Vec<String> {
        let me = ctx.cache.current_user();
        let mut names = vec![me.name.clone()];
        if let Some(guild_id) = msg.guild_id {
            let nick = ctx
                .cache
                .guild_field(guild_id, |g| g.members.get(&me.id).and_then(|m| m.nick.clone()))
                .flatten();
            names.extend(nick);
        }
        names
    }

    pub async fn handle_slash_command(
        &self,
        ctx: &Context,
        command: &ApplicationCommandInteraction,
    ) -> Result<()> {
        let request_id = Uuid::new_v4();
        let guild_id = command
            .guild_id
            .map(|id| id.to_string())
            .unwrap_or_else(|| "DM".to_string());

        info!(
            "[{}] Slash command received | Command: {} | User: {} | Channel: {} | Guild: {}",
            request_id, command.data.name, command.user.id, command.channel_id, guild_id
        );

        let Some(handler) = self.registry.get(&command.data.name) else {
            warn!("[{request_id}] No handler registered for /{}", command.data.name);
            command
                .create_interaction_response(&ctx.http, |response| {
                    response
                        .kind(InteractionResponseType::ChannelMessageWithSource)
                        .interaction_response_data(|message| {
                            message.content("そのコマンドは知らないや…").ephemeral(true)
                        })
                })
                .await?;
            return Ok(());
        };

        handler.handle(self.context(), ctx, command).await?;
        debug!("[{request_id}] /{} completed", command.data.name);
        Ok(())
    }
}
