//! Timer slash commands: /timer, /alarm

use serenity::builder::CreateApplicationCommand;
use serenity::model::application::command::CommandOptionType;

/// Creates timer commands
pub fn create_commands() -> Vec<CreateApplicationCommand> {
    vec![create_timer_command(), create_alarm_command()]
}

fn create_timer_command() -> CreateApplicationCommand {
    CreateApplicationCommand::default()
        .name("timer")
        .description("○時間○分後に通知するよ")
        .create_option(|option| {
            option
                .name("hours")
                .description("0以上の時間")
                .kind(CommandOptionType::Integer)
                .required(true)
                .min_int_value(0)
        })
        .create_option(|option| {
            option
                .name("minutes")
                .description("0-59の分")
                .kind(CommandOptionType::Integer)
                .required(true)
                .min_int_value(0)
                .max_int_value(59)
        })
        .create_option(|option| {
            option
                .name("message")
                .description("任意: メッセージ")
                .kind(CommandOptionType::String)
                .required(false)
        })
        .to_owned()
}

fn create_alarm_command() -> CreateApplicationCommand {
    CreateApplicationCommand::default()
        .name("alarm")
        .description("今日の何時何分に一度だけ通知するよ（過ぎてたら翌日に）")
        .create_option(|option| {
            option
                .name("hour")
                .description("0-23の時")
                .kind(CommandOptionType::Integer)
                .required(true)
                .min_int_value(0)
                .max_int_value(23)
        })
        .create_option(|option| {
            option
                .name("minute")
                .description("0-59の分")
                .kind(CommandOptionType::Integer)
                .required(true)
                .min_int_value(0)
                .max_int_value(59)
        })
        .create_option(|option| {
            option
                .name("message")
                .description("任意: メッセージ")
                .kind(CommandOptionType::String)
                .required(false)
        })
        .to_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn option_names(cmd: &CreateApplicationCommand) -> Vec<String> {
        cmd.0
            .get("options")
            .unwrap()
            .as_array()
            .unwrap()
            .iter()
            .map(|o| o.get("name").unwrap().as_str().unwrap().to_string())
            .collect()
    }

    #[test]
    fn test_create_timer_commands() {
        let commands = create_commands();
        assert_eq!(commands.len(), 2, "Should have 2 timer commands");
    }

    #[test]
    fn test_timer_options() {
        assert_eq!(
            option_names(&create_timer_command()),
            vec!["hours", "minutes", "message"]
        );
    }

    #[test]
    fn test_alarm_hour_bounds() {
        let cmd = create_alarm_command();
        assert_eq!(option_names(&cmd), vec!["hour", "minute", "message"]);

        let options = cmd.0.get("options").unwrap().as_array().unwrap();
        assert_eq!(options[0].get("min_value").unwrap().as_u64().unwrap(), 0);
        assert_eq!(options[0].get("max_value").unwrap().as_u64().unwrap(), 23);
        assert!(!options[2].get("required").unwrap().as_bool().unwrap());
    }
}
