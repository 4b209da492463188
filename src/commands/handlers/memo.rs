//! /memo handler
//!
//! Handles: memo add|show|list|forget

use anyhow::Result;
use async_trait::async_trait;
use log::{debug, info};
use serenity::model::application::interaction::application_command::ApplicationCommandInteraction;
use serenity::model::application::interaction::InteractionResponseType;
use serenity::prelude::Context;
use std::sync::Arc;

use super::respond;
use crate::commands::context::CommandContext;
use crate::commands::handler::SlashCommandHandler;
use crate::commands::slash::{get_string_option, get_subcommand};
use crate::core::{truncate_for_message, EMBED_LIMIT};

const BAD_ARGUMENT: &str = "引数の形式が正しくないみたい…";

/// Keyword list for the /memo list embed, one bullet per line
///
/// Stops at whole lines before the embed limit and notes how many were left out.
pub fn keyword_list(keywords: &[String]) -> String {
    // Room for the trailing "…ほか N 件" line
    let budget = EMBED_LIMIT - 32;
    let mut list = String::new();
    let mut used = 0;

    for (shown, keyword) in keywords.iter().enumerate() {
        let line = format!("- {keyword}");
        let cost = line.chars().count() + usize::from(shown > 0);
        if used + cost > budget {
            list.push_str(&format!("\n…ほか {} 件", keywords.len() - shown));
            break;
        }
        if shown > 0 {
            list.push('\n');
        }
        list.push_str(&line);
        used += cost;
    }
    list
}

pub struct MemoHandler;

#[async_trait]
impl SlashCommandHandler for MemoHandler {
    fn command_names(&self) -> &'static [&'static str] {
        &["memo"]
    }

    async fn handle(
        &self,
        ctx: Arc<CommandContext>,
        serenity_ctx: &Context,
        command: &ApplicationCommandInteraction,
    ) -> Result<()> {
        let user_id = command.user.id.to_string();
        let Some((subcommand, options)) = get_subcommand(&command.data.options) else {
            return respond(serenity_ctx, command, BAD_ARGUMENT, true).await;
        };
        debug!("/memo {subcommand} from user {user_id}");

        let reply = match subcommand {
            "add" => {
                let (Some(keyword), Some(content)) = (
                    get_string_option(options, "keyword"),
                    get_string_option(options, "content"),
                ) else {
                    return respond(serenity_ctx, command, BAD_ARGUMENT, true).await;
                };
                match ctx.preferences.add_memo(&user_id, &keyword, &content).await {
                    Ok(_) => format!("「{keyword}」は「{content}」だね。覚えた！"),
                    Err(_) => BAD_ARGUMENT.to_string(),
                }
            }
            "show" => {
                let Some(keyword) = get_string_option(options, "keyword") else {
                    return respond(serenity_ctx, command, BAD_ARGUMENT, true).await;
                };
                match ctx.preferences.memo(&user_id, &keyword).await {
                    Some(content) => format!("「{keyword}」は「{content}」だよ！"),
                    None => format!("ごめん、「{keyword}」についてはまだ知らないや…"),
                }
            }
            "list" => return self.handle_list(&ctx, serenity_ctx, command).await,
            "forget" => {
                let Some(keyword) = get_string_option(options, "keyword") else {
                    return respond(serenity_ctx, command, BAD_ARGUMENT, true).await;
                };
                if ctx.preferences.forget_memo(&user_id, &keyword).await {
                    info!("User {user_id} removed memo '{keyword}'");
                    format!("「{keyword}」のこと、忘れちゃった！")
                } else {
                    format!("ごめん、「{keyword}」については元から知らなかったみたい…")
                }
            }
            _ => return Ok(()),
        };

        respond(serenity_ctx, command, truncate_for_message(&reply), true).await
    }
}

impl MemoHandler {
    async fn handle_list(
        &self,
        ctx: &CommandContext,
        serenity_ctx: &Context,
        command: &ApplicationCommandInteraction,
    ) -> Result<()> {
        let keywords = ctx
            .preferences
            .memo_keywords(&command.user.id.to_string())
            .await;
        if keywords.is_empty() {
            return respond(serenity_ctx, command, "まだ何も覚えてないよ！", true).await;
        }

        let display_name = command
            .member
            .as_ref()
            .and_then(|m| m.nick.clone())
            .unwrap_or_else(|| command.user.name.clone());
        let description = keyword_list(&keywords);

        command
            .create_interaction_response(&serenity_ctx.http, |r| {
                r.kind(InteractionResponseType::ChannelMessageWithSource)
                    .interaction_response_data(|m| {
                        m.ephemeral(true).embed(|e| {
                            e.title(format!("{display_name}さんから教わったこと"))
                                .description(description)
                                .color(0x9B59B6)
                        })
                    })
            })
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::context::testing::test_context;

    #[test]
    fn test_memo_handler_commands() {
        assert_eq!(MemoHandler.command_names(), &["memo"]);
    }

    #[test]
    fn test_keyword_list_format() {
        let keywords = vec!["好きな食べ物".to_string(), "楽器".to_string()];
        assert_eq!(keyword_list(&keywords), "- 好きな食べ物\n- 楽器");
        assert_eq!(keyword_list(&[]), "");
    }

    #[test]
    fn test_keyword_list_fits_embed() {
        let keywords: Vec<String> = (0..500).map(|i| format!("キーワード{i:03}")).collect();
        let list = keyword_list(&keywords);

        assert!(list.chars().count() <= EMBED_LIMIT);
        assert!(list.starts_with("- キーワード000\n- キーワード001"));
        let shown = list.lines().filter(|l| l.starts_with("- ")).count();
        assert!(shown < 500);
        assert!(list.ends_with(&format!("…ほか {} 件", 500 - shown)));
    }

    #[tokio::test]
    async fn test_list_follows_insertion_order() {
        let (ctx, _dir) = test_context();
        ctx.preferences.add_memo("1", "b", "x").await.unwrap();
        ctx.preferences.add_memo("1", "a", "y").await.unwrap();
        ctx.preferences.add_memo("1", "b", "z").await.unwrap();

        let keywords = ctx.preferences.memo_keywords("1").await;
        assert_eq!(keyword_list(&keywords), "- b\n- a");
    }
}
