use anyhow::Result;
use dotenvy::dotenv;
use log::{error, info, warn};
use serenity::async_trait;
use serenity::model::application::interaction::{Interaction, InteractionResponseType};
use serenity::model::channel::Message;
use serenity::model::gateway::Ready;
use serenity::model::id::GuildId;
use serenity::prelude::*;
use std::sync::Arc;

use shikaku::commands::{register_global_commands, register_guild_commands, CommandContext, CommandHandler};
use shikaku::core::Config;
use shikaku::features::chat::{ChatResponder, ChatSwitch, GeminiClient};
use shikaku::features::preferences::PreferenceRepository;
use shikaku::features::timers::{NotificationScheduler, SerenityDelivery, SystemClock};
use shikaku::storage::DurableStore;

struct Handler {
    command_handler: Arc<CommandHandler>,
    guild_id: Option<GuildId>,
}

#[async_trait]
impl EventHandler for Handler {
    async fn message(&self, ctx: Context, msg: Message) {
        if msg.author.bot {
            return;
        }

        if let Err(e) = self.command_handler.handle_message(&ctx, &msg).await {
            error!("Error handling message: {e}");
        }
    }

    async fn ready(&self, ctx: Context, ready: Ready) {
        info!("{} is connected and ready!", ready.user.name);
        info!("Connected to {} guilds", ready.guilds.len());
        info!("Bot ID: {}", ready.user.id);

        // Guild registration updates instantly; global can take up to an hour
        if let Some(guild_id) = self.guild_id {
            info!("Registering commands for guild {guild_id}");
            if let Err(e) = register_guild_commands(&ctx, guild_id).await {
                error!("Failed to register guild slash commands: {e}");
            }
        } else {
            info!("Registering commands globally");
            if let Err(e) = register_global_commands(&ctx).await {
                error!("Failed to register global slash commands: {e}");
            }
        }
    }

    async fn interaction_create(&self, ctx: Context, interaction: Interaction) {
        let Interaction::ApplicationCommand(command) = interaction else {
            return;
        };

        if let Err(e) = self.command_handler.handle_slash_command(&ctx, &command).await {
            error!("Error handling slash command '{}': {}", command.data.name, e);

            let error_message = format!("実行中にエラー: {e}");

            // The handler may already have replied; fall back to a followup edit
            #[allow(clippy::redundant_pattern_matching)]
            if let Err(_) = command
                .create_interaction_response(&ctx.http, |response| {
                    response
                        .kind(InteractionResponseType::ChannelMessageWithSource)
                        .interaction_response_data(|message| {
                            message.content(&error_message).ephemeral(true)
                        })
                })
                .await
            {
                if let Err(why) = command
                    .edit_original_interaction_response(&ctx.http, |response| {
                        response.content(&error_message)
                    })
                    .await
                {
                    warn!("Failed to report command error: {why}");
                }
            }
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenv().ok();

    let config = Config::from_env()?;

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(&config.log_level))
        .init();

    info!("Starting Shikaku Discord Bot...");

    let store = DurableStore::new(&config.data_path);
    let preferences = PreferenceRepository::open(store, config.default_model.clone()).await;

    let gemini = GeminiClient::new(config.gemini_api_key.clone());
    if !gemini.is_configured() {
        warn!("GEMINI_API_KEY is not set; generated replies will fall back to a notice");
    }

    let scheduler = NotificationScheduler::new();
    let context = CommandContext::new(
        preferences.clone(),
        scheduler.clone(),
        ChatSwitch::new(config.chat_default_on),
        config.time_zone,
    );
    let command_handler = CommandHandler::new(context, ChatResponder::new(preferences, gemini));

    let handler = Handler {
        command_handler: Arc::new(command_handler),
        guild_id: config.guild_id.map(GuildId),
    };

    let intents = GatewayIntents::GUILDS
        | GatewayIntents::GUILD_MESSAGES
        | GatewayIntents::MESSAGE_CONTENT;

    let mut client = Client::builder(&config.discord_token, intents)
        .event_handler(handler)
        .await
        .map_err(|e| {
            error!("Failed to create Discord client: {e}");
            anyhow::anyhow!("Client creation failed: {}", e)
        })?;

    // Start the notification scheduler
    let http = client.cache_and_http.http.clone();
    let tick_interval = config.tick_interval;
    tokio::spawn(async move {
        scheduler
            .run(
                Arc::new(SerenityDelivery::new(http)),
                Arc::new(SystemClock),
                tick_interval,
            )
            .await;
    });
    info!(
        "Notification scheduler running every {}s (alarm zone {})",
        tick_interval.as_secs(),
        config.time_zone
    );

    info!("Establishing WebSocket connection to Discord gateway...");
    if let Err(why) = client.start().await {
        error!("Gateway connection failed: {why:?}");
        return Err(anyhow::anyhow!(
            "Failed to establish gateway connection: {}",
            why
        ));
    }

    Ok(())
}
