//! Per-user reply modifiers
//!
//! Applied in order to every chat reply before it is sent:
//! 1. greeting: `"<name>, "` prefix, using the stored nickname or the caller's fallback
//! 2. silent: `"@silent\n"` prefix, never doubled

use crate::features::preferences::{PreferenceRepository, PreferenceSnapshot};

/// Marker the chat transport treats as "deliver without a notification"
pub const SILENT_MARKER: &str = "@silent";

/// The full prefix added by silent mode
pub const SILENT_PREFIX: &str = "@silent\n";

pub fn compose_reply(base: &str, prefs: &PreferenceSnapshot, fallback_name: &str) -> String {
    // With silent on, an already-marked base keeps exactly one marker ahead of the greeting
    let body = if prefs.silent {
        base.strip_prefix(SILENT_PREFIX).unwrap_or(base)
    } else {
        base
    };

    let mut reply = if prefs.greeting {
        let name = prefs.nickname.as_deref().unwrap_or(fallback_name);
        format!("{name}, {body}")
    } else {
        body.to_string()
    };

    if prefs.silent {
        reply.insert_str(0, SILENT_PREFIX);
    }
    reply
}

/// Look up `user_id`'s preferences and compose
pub async fn compose_for_user(
    repository: &PreferenceRepository,
    base: &str,
    user_id: &str,
    fallback_name: &str,
) -> String {
    let prefs = repository.snapshot(user_id).await;
    compose_reply(base, &prefs, fallback_name)
}
