//! The /memo command group: add, show, list, forget

use serenity::builder::CreateApplicationCommand;
use serenity::model::application::command::CommandOptionType;

/// Creates the /memo command with its subcommands
pub fn create_commands() -> Vec<CreateApplicationCommand> {
    vec![create_memo_command()]
}

fn create_memo_command() -> CreateApplicationCommand {
    CreateApplicationCommand::default()
        .name("memo")
        .description("しかくうつに色々なことを覚えさせるコマンド")
        .create_option(|sub| {
            sub.name("add")
                .description("新しいことを覚えるよ")
                .kind(CommandOptionType::SubCommand)
                .create_sub_option(|o| {
                    o.name("keyword")
                        .description("キーワード")
                        .kind(CommandOptionType::String)
                        .required(true)
                })
                .create_sub_option(|o| {
                    o.name("content")
                        .description("覚えてほしい内容")
                        .kind(CommandOptionType::String)
                        .required(true)
                })
        })
        .create_option(|sub| {
            sub.name("show")
                .description("覚えていることを教えてくれるよ")
                .kind(CommandOptionType::SubCommand)
                .create_sub_option(|o| {
                    o.name("keyword")
                        .description("知りたいキーワード")
                        .kind(CommandOptionType::String)
                        .required(true)
                })
        })
        .create_option(|sub| {
            sub.name("list")
                .description("覚えているキーワードの一覧を表示するよ")
                .kind(CommandOptionType::SubCommand)
        })
        .create_option(|sub| {
            sub.name("forget")
                .description("覚えたことを忘れさせるよ")
                .kind(CommandOptionType::SubCommand)
                .create_sub_option(|o| {
                    o.name("keyword")
                        .description("忘れてほしいキーワード")
                        .kind(CommandOptionType::String)
                        .required(true)
                })
        })
        .to_owned()
}
