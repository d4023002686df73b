//! OpenRouter Distractor Generator
//!
//! OpenRouter互換のチャット補完APIを呼び出して誤答を生成する。

use std::fmt;

use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{clean_choice_lines_excluding, DistractorGenerator};
use crate::error::{Result, XlsxQuizError};

pub const DEFAULT_ENDPOINT: &str = "https://openrouter.ai/api/v1/chat/completions";
pub const DEFAULT_MODEL: &str = "meta-llama/llama-4-scout:free";
pub const DEFAULT_REFERER: &str = "*";
pub const DEFAULT_TITLE: &str = "xlsxquiz";

const SYSTEM_PROMPT: &str =
    "You are an assistant that writes multiple-choice quiz questions for secondary schools and universities.";

/// 生成サービスの接続設定
///
/// APIキーはソースに埋め込まず、起動時に環境変数などから注入します。
#[derive(Clone)]
pub struct OpenRouterConfig {
    pub endpoint: String,
    pub api_key: String,
    pub model: String,
    /// `HTTP-Referer`ヘッダー
    pub referer: String,
    /// `X-Title`ヘッダー
    pub title: String,
}

impl OpenRouterConfig {
    /// APIキーを指定し、その他はデフォルト値で設定を生成する
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            api_key: api_key.into(),
            model: DEFAULT_MODEL.to_string(),
            referer: DEFAULT_REFERER.to_string(),
            title: DEFAULT_TITLE.to_string(),
        }
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }
}

// APIキーはログに出さない
impl fmt::Debug for OpenRouterConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OpenRouterConfig")
            .field("endpoint", &self.endpoint)
            .field("api_key", &"<redacted>")
            .field("model", &self.model)
            .field("referer", &self.referer)
            .field("title", &self.title)
            .finish()
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct ChatMessage {
    #[serde(default)]
    role: String,
    content: String,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

/// OpenRouter互換APIを使用する誤答生成器
///
/// ブロッキングHTTPクライアントを内部に持つため、非同期ランタイムのワーカースレッド上では
/// 生成・破棄せず、`tokio::task::spawn_blocking`などの中で使用してください。
/// リトライ、キャッシュ、明示的なタイムアウトは行いません（クライアントのデフォルトに従う）。
pub struct OpenRouterGenerator {
    client: Client,
    config: OpenRouterConfig,
}

impl OpenRouterGenerator {
    /// # 戻り値
    ///
    /// * `Err(XlsxQuizError::Http)` - HTTPクライアントの初期化に失敗した場合
    pub fn new(config: OpenRouterConfig) -> Result<Self> {
        let client = Client::builder().build()?;
        Ok(Self { client, config })
    }

    fn build_request(&self, question: &str, correct: &str) -> ChatRequest<'_> {
        let prompt = format!(
            "Generate three wrong but plausible answers to the following question. \
Write them in the same language as the question. Do not include the correct answer. \
Put each answer on its own line and start every line with an asterisk.\n\n\
Question: {}\nCorrect answer: {}",
            question, correct
        );

        ChatRequest {
            model: &self.config.model,
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: SYSTEM_PROMPT.to_string(),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: prompt,
                },
            ],
        }
    }
}

impl DistractorGenerator for OpenRouterGenerator {
    fn generate(&self, question: &str, correct: &str) -> Result<Vec<String>> {
        let payload = self.build_request(question, correct);
        debug!(model = %self.config.model, question, "requesting distractors");

        let response: ChatResponse = self
            .client
            .post(&self.config.endpoint)
            .bearer_auth(&self.config.api_key)
            .header("HTTP-Referer", &self.config.referer)
            .header("X-Title", &self.config.title)
            .json(&payload)
            .send()?
            .error_for_status()?
            .json()?;

        let content = response
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or_else(|| XlsxQuizError::Distractor("response contained no choices".to_string()))?;

        let choices = clean_choice_lines_excluding(&content, correct);
        if choices.is_empty() {
            return Err(XlsxQuizError::Distractor(
                "response contained no usable answers".to_string(),
            ));
        }

        debug!(count = choices.len(), "received distractors");
        Ok(choices)
    }
}
