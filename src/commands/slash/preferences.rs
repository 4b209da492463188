//! Per-user setting commands: /set_name, /set_greeting, /set_silent, /set_model, /my_status, /reset_my_settings

use serenity::builder::CreateApplicationCommand;
use serenity::model::application::command::CommandOptionType;

use crate::features::preferences::SUPPORTED_MODELS;

/// Creates preference commands
pub fn create_commands() -> Vec<CreateApplicationCommand> {
    vec![
        create_set_name_command(),
        create_mode_command("set_greeting", "返事の最初に名前を呼ぶか設定するよ"),
        create_mode_command("set_silent", "あなたへの返信をサイレントモードにするよ"),
        create_set_model_command(),
        CreateApplicationCommand::default()
            .name("my_status")
            .description("僕が覚えているあなたの設定を表示するよ")
            .to_owned(),
        CreateApplicationCommand::default()
            .name("reset_my_settings")
            .description("僕が覚えたあなたの設定をリセットするよ")
            .to_owned(),
    ]
}

fn create_set_name_command() -> CreateApplicationCommand {
    CreateApplicationCommand::default()
        .name("set_name")
        .description("あなたの呼び名を覚えるよ")
        .create_option(|option| {
            option
                .name("nickname")
                .description("覚えてほしい名前を教えて")
                .kind(CommandOptionType::String)
                .required(true)
        })
        .to_owned()
}

/// A command taking a single required `mode` on/off choice
fn create_mode_command(name: &str, description: &str) -> CreateApplicationCommand {
    CreateApplicationCommand::default()
        .name(name)
        .description(description)
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

fn create_set_model_command() -> CreateApplicationCommand {
    CreateApplicationCommand::default()
        .name("set_model")
        .description("会話に使うAIモデルを変更するよ")
        .create_option(|option| {
            option
                .name("model")
                .description("モデルを選んでね (flashは速くて安い, proは高性能)")
                .kind(CommandOptionType::String)
                .required(true);
            for model in SUPPORTED_MODELS {
                option.add_string_choice(model, model);
            }
            option
        })
        .to_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(commands: &[CreateApplicationCommand]) -> Vec<&str> {
        commands
            .iter()
            .map(|cmd| cmd.0.get("name").unwrap().as_str().unwrap())
            .collect()
    }

    #[test]
    fn test_create_preference_commands() {
        let commands = create_commands();
        assert_eq!(
            names(&commands),
            vec![
                "set_name",
                "set_greeting",
                "set_silent",
                "set_model",
                "my_status",
                "reset_my_settings"
            ]
        );
    }

    #[test]
    fn test_set_model_offers_every_supported_model() {
        let cmd = create_set_model_command();
        let options = cmd.0.get("options").unwrap().as_array().unwrap();
        let choices = options[0].get("choices").unwrap().as_array().unwrap();
        assert_eq!(choices.len(), SUPPORTED_MODELS.len());
        for (choice, model) in choices.iter().zip(SUPPORTED_MODELS) {
            assert_eq!(choice.get("value").unwrap().as_str().unwrap(), *model);
        }
    }

    #[test]
    fn test_mode_option_is_required() {
        let cmd = create_mode_command("set_silent", "desc");
        let options = cmd.0.get("options").unwrap().as_array().unwrap();
        assert_eq!(options[0].get("name").unwrap().as_str().unwrap(), "mode");
        assert!(options[0].get("required").unwrap().as_bool().unwrap());
    }
}
