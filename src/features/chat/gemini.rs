//! Gemini `generateContent` client
//!
//! - **Version**: 1.0.0
//! - **Since**: 1.0.0
//!
//! Every failure mode (missing key, HTTP error, timeout, blocked or empty
//! candidate) is turned into an in-character fallback line, so callers always
//! get something to say.

use anyhow::{anyhow, Result};
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::time::Duration;

const GEMINI_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta/models";

/// Upper bound on one generation request
pub const GENERATION_TIMEOUT: Duration = Duration::from_secs(30);

pub const MISSING_KEY_REPLY: &str = "（エラー: GeminiのAPIキーが設定されてないみたい…）";
pub const BLOCKED_REPLY: &str =
    "（ごめん！その言葉、なんだかうまく話せないみたい…別の言い方で聞いてみてくれる？）";
pub const FAILURE_REPLY: &str = "（エラー: 今、頭の中がぐるぐるしてる…）";

const PERSONA_PROMPT: &str = "あなたは『しかくうつ』という名前のキャラクターです。やさしくて、活発で、少しぽんこつな男の子として、\
フレンドリーかつ短い文章で返事をしてください。重要：顔文字は使わず、言葉だけで感情を表現してください。";

const SAFETY_CATEGORIES: &[&str] = &[
    "HARM_CATEGORY_HARASSMENT",
    "HARM_CATEGORY_HATE_SPEECH",
    "HARM_CATEGORY_SEXUALLY_EXPLICIT",
    "HARM_CATEGORY_DANGEROUS_CONTENT",
];

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest<'a> {
    system_instruction: Content<'a>,
    contents: Vec<Content<'a>>,
    generation_config: GenerationConfig,
    safety_settings: Vec<SafetySetting>,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<&'static str>,
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    candidate_count: u32,
    max_output_tokens: u32,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct SafetySetting {
    category: &'static str,
    threshold: &'static str,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    content: Option<CandidateContent>,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

impl GenerateResponse {
    /// Concatenated text of the first candidate, if it produced any
    fn text(&self) -> Option<String> {
        let text: String = self
            .candidates
            .first()?
            .content
            .as_ref()?
            .parts
            .iter()
            .filter_map(|p| p.text.as_deref())
            .collect();
        let text = text.trim();
        (!text.is_empty()).then(|| text.to_string())
    }

    fn finish_reason(&self) -> &str {
        self.candidates
            .first()
            .and_then(|c| c.finish_reason.as_deref())
            .unwrap_or("NO_CANDIDATE")
    }
}

/// System instruction: the persona plus everything the user asked the bot to remember
pub fn build_system_instruction(memos: &[(String, String)]) -> String {
    let mut instruction = format!(
        "{PERSONA_PROMPT}\n\nユーザーに関する以下の記憶情報を参考にして、会話をよりパーソナルなものにしてください。\n"
    );
    if memos.is_empty() {
        instruction.push_str("まだユーザーに関する記憶はありません。\n");
    } else {
        for (keyword, content) in memos {
            instruction.push_str(&format!("- {keyword}: {content}\n"));
        }
    }
    instruction
}

#[derive(Clone)]
pub struct GeminiClient {
    http: reqwest::Client,
    api_key: Option<String>,
    timeout: Duration,
}

impl GeminiClient {
    pub fn new(api_key: Option<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_key: api_key.filter(|k| !k.is_empty()),
            timeout: GENERATION_TIMEOUT,
        }
    }

    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    /// Generate a reply; never fails
    pub async fn generate(&self, model: &str, message: &str, memos: &[(String, String)]) -> String {
        let Some(api_key) = self.api_key.as_deref() else {
            return MISSING_KEY_REPLY.to_string();
        };

        match self.request(api_key, model, message, memos).await {
            Ok(response) => match response.text() {
                Some(text) => text,
                None => {
                    warn!(
                        "Gemini response blocked or empty (finish reason: {})",
                        response.finish_reason()
                    );
                    BLOCKED_REPLY.to_string()
                }
            },
            Err(e) => {
                warn!("Gemini request failed: {e}");
                FAILURE_REPLY.to_string()
            }
        }
    }

    async fn request(
        &self,
        api_key: &str,
        model: &str,
        message: &str,
        memos: &[(String, String)],
    ) -> Result<GenerateResponse> {
        let instruction = build_system_instruction(memos);
        let body = GenerateRequest {
            system_instruction: Content {
                role: None,
                parts: vec![Part { text: &instruction }],
            },
            contents: vec![Content {
                role: Some("user"),
                parts: vec![Part { text: message }],
            }],
            generation_config: GenerationConfig {
                candidate_count: 1,
                max_output_tokens: 150,
                temperature: 0.8,
            },
            safety_settings: SAFETY_CATEGORIES
                .iter()
                .map(|category| SafetySetting {
                    category: *category,
                    threshold: "BLOCK_NONE",
                })
                .collect(),
        };

        debug!("Sending {} chars to Gemini model {model}", message.len());
        let response = self
            .http
            .post(format!("{GEMINI_ENDPOINT}/{model}:generateContent"))
            .header("x-goog-api-key", api_key)
            .timeout(self.timeout)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(anyhow!(
                "Gemini returned {status}: {}",
                detail.chars().take(200).collect::<String>()
            ));
        }

        Ok(response.json::<GenerateResponse>().await?)
    }
}
