//! # Slash Commands (/)
//!
//! Discord slash command definitions and option helpers.
//!
//! - **Version**: 1.2.0
//! - **Since**: 1.0.0
//! - **Toggleable**: false
//!
//! ## Changelog
//! - 1.2.0: /memory_read and /all_erase
//! - 1.1.0: /memo group with add, show, list, forget subcommands
//! - 1.0.0: Utility, preference and timer commands

pub mod admin;
pub mod memo;
pub mod preferences;
pub mod timers;
pub mod utility;

use anyhow::Result;
use log::info;
use serenity::builder::CreateApplicationCommand;
use serenity::model::application::interaction::application_command::CommandDataOption;
use serenity::model::application::command::Command;
use serenity::model::id::GuildId;
use serenity::prelude::Context;

/// Creates all slash command definitions
pub fn create_slash_commands() -> Vec<CreateApplicationCommand> {
    let mut commands = Vec::new();

    // ping, help, chat
    commands.extend(utility::create_commands());

    // Per-user settings
    commands.extend(preferences::create_commands());

    // /memo group
    commands.extend(memo::create_commands());

    // /timer, /alarm
    commands.extend(timers::create_commands());

    // Memory disclosure and erase
    commands.extend(admin::create_commands());

    commands
}

/// Registers all slash commands globally
pub async fn register_global_commands(ctx: &Context) -> Result<()> {
    let slash_commands = create_slash_commands();
    let count = slash_commands.len();

    Command::set_global_application_commands(&ctx.http, |commands| {
        for command in slash_commands {
            commands.add_application_command(command);
        }
        commands
    })
    .await?;

    info!("Global slash commands registered successfully ({count} commands)");
    Ok(())
}

/// Registers all slash commands for a specific guild (instant update)
pub async fn register_guild_commands(ctx: &Context, guild_id: GuildId) -> Result<()> {
    let slash_commands = create_slash_commands();
    let count = slash_commands.len();

    guild_id
        .set_application_commands(&ctx.http, |commands| {
            for command in slash_commands {
                commands.add_application_command(command);
            }
            commands
        })
        .await?;

    info!("Guild slash commands registered for guild {guild_id} ({count} commands)");
    Ok(())
}

/// Utility function to get string option from slash command
pub fn get_string_option(options: &[CommandDataOption], name: &str) -> Option<String> {
    options
        .iter()
        .find(|opt| opt.name == name)
        .and_then(|opt| opt.value.as_ref())
        .and_then(|val| val.as_str())
        .map(|s| s.to_string())
}

/// Utility function to get integer option from slash command
pub fn get_integer_option(options: &[CommandDataOption], name: &str) -> Option<i64> {
    options
        .iter()
        .find(|opt| opt.name == name)
        .and_then(|opt| opt.value.as_ref())
        .and_then(|val| val.as_i64())
}

/// An `on`/`off` string choice as a bool
pub fn get_mode_option(options: &[CommandDataOption], name: &str) -> Option<bool> {
    match get_string_option(options, name)?.as_str() {
        "on" => Some(true),
        "off" => Some(false),
        _ => None,
    }
}

/// The invoked subcommand name and its options
pub fn get_subcommand(options: &[CommandDataOption]) -> Option<(&str, &[CommandDataOption])> {
    options
        .first()
        .map(|sub| (sub.name.as_str(), sub.options.as_slice()))
}
