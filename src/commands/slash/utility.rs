//! Utility slash commands: /ping, /help, /chat

use serenity::builder::CreateApplicationCommand;
use serenity::model::application::command::CommandOptionType;

/// Creates utility commands
pub fn create_commands() -> Vec<CreateApplicationCommand> {
    vec![create_ping_command(), create_help_command(), create_chat_command()]
}

fn create_ping_command() -> CreateApplicationCommand {
    CreateApplicationCommand::default()
        .name("ping")
        .description("生存確認！")
        .to_owned()
}

fn create_help_command() -> CreateApplicationCommand {
    CreateApplicationCommand::default()
        .name("help")
        .description("しかくうつの使い方を表示するよ")
        .to_owned()
}

/// Creates the chat command - per-channel conversation switch
fn create_chat_command() -> CreateApplicationCommand {
    CreateApplicationCommand::default()
        .name("chat")
        .description("おしゃべりの on/off")
        .create_option(|option| {
            option
                .name("mode")
                .description("on / off")
                .kind(CommandOptionType::String)
                .required(true)
                .add_string_choice("on", "on")
                .add_string_choice("off", "off")
        })
        .to_owned()
}
