//! Server Configuration
//!
//! 環境変数からサーバー設定を読み込む。

use crate::builder::DEFAULT_MAX_INPUT_SIZE;
use crate::distractor::OpenRouterConfig;
use crate::error::{Result, XlsxQuizError};

pub const DEFAULT_PORT: u16 = 8080;

/// HTTPサーバーの設定
///
/// | 環境変数 | 内容 | デフォルト |
/// |---|---|---|
/// | `PORT` | 待ち受けポート | `8080`（未設定・空文字列の場合） |
/// | `OPENROUTER_API_KEY` | 誤答生成サービスのAPIキー | 未設定なら誤答生成を行わない |
/// | `OPENROUTER_ENDPOINT` | チャット補完APIのURL | OpenRouterの公開エンドポイント |
/// | `OPENROUTER_MODEL` | モデルID | `meta-llama/llama-4-scout:free` |
/// | `OPENROUTER_REFERER` | `HTTP-Referer`ヘッダー | `*` |
/// | `OPENROUTER_TITLE` | `X-Title`ヘッダー | `xlsxquiz` |
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub port: u16,

    /// アップロードの最大サイズ（バイト）
    pub max_upload_size: u64,

    /// 誤答生成サービスの設定（Noneの場合はスプレッドシートの誤答のみを使用）
    pub openrouter: Option<OpenRouterConfig>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            max_upload_size: DEFAULT_MAX_INPUT_SIZE,
            openrouter: None,
        }
    }
}

impl ServerConfig {
    /// プロセスの環境変数から設定を読み込む
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// 任意の参照関数から設定を読み込む
    ///
    /// 空文字列の値は未設定として扱います。
    ///
    /// # 戻り値
    ///
    /// * `Err(XlsxQuizError::Config)` - `PORT`がポート番号として解釈できない場合
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let port = match get("PORT") {
            Some(value) => value.trim().parse::<u16>().map_err(|_| {
                XlsxQuizError::Config(format!("Invalid PORT value: '{}'", value))
            })?,
            None => DEFAULT_PORT,
        };

        let openrouter = get("OPENROUTER_API_KEY").map(|api_key| {
            let mut config = OpenRouterConfig::new(api_key);
            if let Some(endpoint) = get("OPENROUTER_ENDPOINT") {
                config = config.with_endpoint(endpoint);
            }
            if let Some(model) = get("OPENROUTER_MODEL") {
                config = config.with_model(model);
            }
            if let Some(referer) = get("OPENROUTER_REFERER") {
                config.referer = referer;
            }
            if let Some(title) = get("OPENROUTER_TITLE") {
                config.title = title;
            }
            config
        });

        Ok(Self {
            port,
            openrouter,
            ..Default::default()
        })
    }
}
