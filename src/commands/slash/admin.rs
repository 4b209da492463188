//! Memory slash commands: /memory_read, /all_erase

use serenity::builder::CreateApplicationCommand;
use serenity::model::permissions::Permissions;

/// Creates memory management commands
pub fn create_commands() -> Vec<CreateApplicationCommand> {
    vec![create_memory_read_command(), create_all_erase_command()]
}

/// Everyone may use it; managers see the whole document, others only themselves
fn create_memory_read_command() -> CreateApplicationCommand {
    CreateApplicationCommand::default()
        .name("memory_read")
        .description("しかくうつが記憶している情報を開示するよ")
        .to_owned()
}

/// Creates the all_erase command (Admin)
fn create_all_erase_command() -> CreateApplicationCommand {
    CreateApplicationCommand::default()
        .name("all_erase")
        .description("しかくうつの記憶をすべて消す（管理者専用）")
        .default_member_permissions(Permissions::MANAGE_GUILD)
        .dm_permission(false)
        .to_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_admin_commands() {
        let commands = create_commands();
        assert_eq!(commands.len(), 2, "Should have 2 memory commands");
    }

    #[test]
    fn test_all_erase_requires_manage_guild() {
        let cmd = create_all_erase_command();
        let perms = cmd.0.get("default_member_permissions").unwrap();
        assert_eq!(
            perms.as_str().unwrap(),
            Permissions::MANAGE_GUILD.bits().to_string()
        );
        assert!(create_memory_read_command()
            .0
            .get("default_member_permissions")
            .is_none());
    }
}
