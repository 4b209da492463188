//! Discord message size utilities
//!
//! - **Version**: 1.2.0
//! - **Since**: 1.0.0
//!
//! ## Changelog
//! - 1.2.0: Embed description limit
//! - 1.1.0: Inline-or-attachment decision for JSON dumps
//! - 1.0.0: Message truncation

/// Discord embed description limit
pub const EMBED_LIMIT: usize = 4096;
/// Discord message content limit
pub const MESSAGE_LIMIT: usize = 2000;

/// Longest JSON body sent inline in a code block; anything longer becomes a file
pub const INLINE_JSON_LIMIT: usize = 1800;

/// How a JSON dump should be sent
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JsonReply {
    /// Message content, already wrapped in a ```json block
    Inline(String),
    /// File attachment contents
    Attachment { filename: String, data: Vec<u8> },
}

pub fn json_reply(json: &str, filename: &str) -> JsonReply {
    if json.chars().count() > INLINE_JSON_LIMIT {
        JsonReply::Attachment {
            filename: filename.to_string(),
            data: json.as_bytes().to_vec(),
        }
    } else {
        JsonReply::Inline(format!("```json\n{json}\n```"))
    }
}

/// Truncate text to fit message limit, adding ellipsis if needed
pub fn truncate_for_message(text: &str) -> String {
    if text.len() <= MESSAGE_LIMIT {
        text.to_string()
    } else {
        // Find a safe UTF-8 boundary
        let mut end = MESSAGE_LIMIT - 3; // Room for "..."
        while !text.is_char_boundary(end) && end > 0 {
            end -= 1;
        }
        format!("{}...", &text[..end])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_short() {
        assert_eq!(truncate_for_message("short text"), "short text");
    }

    #[test]
    fn test_truncate_long() {
        let result = truncate_for_message(&"a".repeat(3000));
        assert!(result.len() <= MESSAGE_LIMIT);
        assert!(result.ends_with("..."));
    }

    #[test]
    fn test_truncate_utf8_safety() {
        let text = "カツ丼".repeat(400);
        let result = truncate_for_message(&text);
        assert!(result.len() <= MESSAGE_LIMIT);
        assert!(result.trim_end_matches("...").chars().all(|c| "カツ丼".contains(c)));
    }

    #[test]
    fn test_small_json_inline() {
        assert_eq!(
            json_reply("{}", "memory.json"),
            JsonReply::Inline("```json\n{}\n```".to_string())
        );
    }

    #[test]
    fn test_large_json_attached() {
        let json = format!("{{\"memo\": \"{}\"}}", "x".repeat(INLINE_JSON_LIMIT));
        match json_reply(&json, "memory.json") {
            JsonReply::Attachment { filename, data } => {
                assert_eq!(filename, "memory.json");
                assert_eq!(data, json.as_bytes());
            }
            other => panic!("expected attachment, got {other:?}"),
        }
    }

    #[test]
    fn test_limit_counts_characters() {
        // 1800 multibyte characters is still inline
        let json = "あ".repeat(INLINE_JSON_LIMIT);
        assert!(matches!(json_reply(&json, "m.json"), JsonReply::Inline(_)));
    }
}
