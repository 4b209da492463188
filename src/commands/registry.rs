//! Command handler registry
//!
//! - **Version**: 1.0.0
//! - **Since**: 1.0.0

use std::collections::HashMap;
use std::sync::Arc;

use super::handler::SlashCommandHandler;

/// Command name to handler lookup
#[derive(Clone, Default)]
pub struct CommandRegistry {
    handlers: HashMap<&'static str, Arc<dyn SlashCommandHandler>>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with every built-in handler
    pub fn with_all_handlers() -> Self {
        let mut registry = Self::new();
        for handler in super::handlers::create_all_handlers() {
            registry.register(handler);
        }
        registry
    }

    /// Register a handler under each of its command names
    ///
    /// A later registration for the same name replaces the earlier one.
    pub fn register(&mut self, handler: Arc<dyn SlashCommandHandler>) {
        for name in handler.command_names() {
            self.handlers.insert(name, Arc::clone(&handler));
        }
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn SlashCommandHandler>> {
        self.handlers.get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.handlers.contains_key(name)
    }

    /// Number of registered command names (not handlers)
    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    /// Registered names, sorted
    pub fn command_names(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.handlers.keys().copied().collect();
        names.sort_unstable();
        names
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::context::CommandContext;
    use crate::commands::slash::create_slash_commands;
    use anyhow::Result;
    use async_trait::async_trait;
    use serenity::model::application::interaction::application_command::ApplicationCommandInteraction;
    use serenity::prelude::Context;

    struct MockHandler {
        names: &'static [&'static str],
    }

    #[async_trait]
    impl SlashCommandHandler for MockHandler {
        fn command_names(&self) -> &'static [&'static str] {
            self.names
        }

        async fn handle(
            &self,
            _ctx: Arc<CommandContext>,
            _serenity_ctx: &Context,
            _command: &ApplicationCommandInteraction,
        ) -> Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_registry_new_is_empty() {
        let registry = CommandRegistry::new();
        assert!(registry.is_empty());
        assert_eq!(registry.len(), 0);
    }

    #[test]
    fn test_registry_register_multiple_names() {
        let mut registry = CommandRegistry::new();
        registry.register(Arc::new(MockHandler {
            names: &["timer", "alarm"],
        }));

        assert_eq!(registry.len(), 2);
        assert!(registry.contains("timer"));
        assert!(registry.contains("alarm"));
        assert!(!registry.contains("memo"));
        assert!(registry.get("memo").is_none());
        assert_eq!(registry.command_names(), vec!["alarm", "timer"]);
    }

    #[test]
    fn test_every_defined_command_has_a_handler() {
        let registry = CommandRegistry::with_all_handlers();

        for cmd in create_slash_commands() {
            let name = cmd.0.get("name").unwrap().as_str().unwrap().to_string();
            assert!(registry.contains(&name), "No handler for /{name}");
        }
    }

    #[test]
    fn test_every_handler_has_a_definition() {
        let defined: Vec<String> = create_slash_commands()
            .iter()
            .map(|cmd| cmd.0.get("name").unwrap().as_str().unwrap().to_string())
            .collect();

        for name in CommandRegistry::with_all_handlers().command_names() {
            assert!(defined.iter().any(|d| d == name), "/{name} is not registered with Discord");
        }
    }
}
