//! # Command System
//!
//! Slash command (/) handling for Discord interactions.
//!
//! - **Version**: 1.1.0
//! - **Since**: 1.0.0
//! - **Toggleable**: false
//!
//! ## Changelog
//! - 1.1.0: Memo and memory commands
//! - 1.0.0: Handler trait, shared context and registry

pub mod context;
pub mod handler;
pub mod handlers;
pub mod registry;
pub mod slash;

pub use crate::command_handler::CommandHandler;

pub use context::CommandContext;
pub use handler::SlashCommandHandler;
pub use registry::CommandRegistry;

pub use slash::{
    create_slash_commands, get_integer_option, get_mode_option, get_string_option,
    get_subcommand, register_global_commands, register_guild_commands,
};
