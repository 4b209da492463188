//! Picks the base reply for a chat message
//!
//! Order: the bot's own name, then the keyword table, then a random filler
//! line, then a generated reply. The base text is handed to the reply
//! composer by the caller.

use rand::seq::IndexedRandom;
use rand::Rng;

use super::gemini::GeminiClient;
use crate::features::preferences::PreferenceRepository;

pub const NAME_REPLY: &str = "はい";

/// Chance of answering with a filler line instead of calling the model
pub const FILLER_PROBABILITY: f64 = 0.30;

/// First matching keyword wins, so order matters
const KEYWORD_REPLIES: &[(&str, &str)] = &[
    ("カツ丼", "いつだってたべたい！だいすき！"),
    ("おやつ", "今日はなに？"),
    ("アイス", "どの味にする？"),
    ("リンキン・パーク", "心が叫んでる！"),
    ("レイジ", "ゲリララジオ！"),
    ("マリリン・マンソン", "かっこいい、あくのカリスマ"),
    ("ニルヴァーナ", "なんだか叫びたい気分かも～"),
    ("カート・コバーン", "とってもリスペクトしてるよ"),
    ("ロック", "じぶんは、じぶんだ！"),
    ("ギター", "今日はどの曲弾く？"),
    ("へっぽこ", "へっぽこじゃない！"),
    ("こんにちは", "ちわ！"),
    ("やっほ～", "ちわ！"),
    ("やあ", "ちわ！"),
    ("hi", "ちわ！"),
    ("ちわ！", "ちわ！"),
    ("ㄘʓ‎〜", "ㄘʓ‎〜"),
];

const FILLERS: &[&str] = &["うんうん", "なるほど～", "そっかそっか", "へぇ！", "はぇ～～", "メモした！"];

/// Deterministic replies: exact bot name, then the first contained keyword
pub fn canned_reply(text: &str, bot_names: &[&str]) -> Option<&'static str> {
    if bot_names.iter().any(|name| !name.is_empty() && *name == text) {
        return Some(NAME_REPLY);
    }
    KEYWORD_REPLIES
        .iter()
        .find(|(keyword, _)| text.contains(keyword))
        .map(|(_, reply)| *reply)
}

/// A filler line with probability `probability`
pub fn pick_filler<R: Rng + ?Sized>(rng: &mut R, probability: f64) -> Option<&'static str> {
    if rng.random_bool(probability.clamp(0.0, 1.0)) {
        FILLERS.choose(rng).copied()
    } else {
        None
    }
}

#[derive(Clone)]
pub struct ChatResponder {
    preferences: PreferenceRepository,
    gemini: GeminiClient,
}

impl ChatResponder {
    pub fn new(preferences: PreferenceRepository, gemini: GeminiClient) -> Self {
        Self { preferences, gemini }
    }

    /// Base reply for `text` from `user_id`, before composition
    pub async fn respond(&self, text: &str, user_id: &str, bot_names: &[&str]) -> String {
        if let Some(reply) = canned_reply(text, bot_names) {
            return reply.to_string();
        }

        let filler = pick_filler(&mut rand::rng(), FILLER_PROBABILITY);
        if let Some(reply) = filler {
            return reply.to_string();
        }

        let memos = self.preferences.memos_for(user_id).await;
        let model = self.preferences.snapshot(user_id).await.model;
        self.gemini.generate(&model, text, &memos).await
    }
}
