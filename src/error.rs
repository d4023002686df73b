//! Error Types Module
//!
//! クレート全体で使用する構造化エラー型を定義するモジュール。
//! `thiserror`を使用して、エラーの自動変換とメッセージフォーマットを実現する。

use thiserror::Error;

/// xlsxquizクレート全体で使用するエラー型
///
/// スプレッドシートの読み込み、解析、誤答生成、アウトライン出力の処理中に
/// 発生するすべてのエラーを統一的に扱うために使用されます。
///
/// # エラーの種類
///
/// - `Io`: I/O操作中に発生したエラー（入力の読み込み失敗、出力の書き込み失敗など）
/// - `Parse`: スプレッドシートの解析中に発生したエラー（calamine由来）
/// - `Config`: 設定の検証に失敗したエラー、またはシートが見つからないエラー
/// - `SecurityViolation`: 入力サイズ制限に違反したエラー
/// - `Http`: 誤答生成サービスへのHTTP通信エラー（reqwest由来）
/// - `Distractor`: 誤答生成サービスの応答から選択肢を取り出せなかったエラー
///
/// # 使用例
///
/// ```rust,no_run
/// use xlsxquiz::XlsxQuizError;
/// use std::fs::File;
///
/// fn open_quiz(path: &str) -> Result<File, XlsxQuizError> {
///     let file = File::open(path)?;  // Ioエラーが自動的に変換される
///     Ok(file)
/// }
/// ```
#[derive(Error, Debug)]
pub enum XlsxQuizError {
    /// I/O操作中に発生したエラー
    ///
    /// `#[from]`属性により、`std::io::Error`から自動的に変換されます。
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// スプレッドシートの解析中に発生したエラー
    ///
    /// calamineクレートがファイルを開く、またはシートを読み込む際に発生したエラーです。
    /// ファイル形式が不正、破損したファイル、スプレッドシートではないファイルなどが
    /// 原因となります。
    #[error("Failed to parse spreadsheet: {0}")]
    Parse(#[from] calamine::Error),

    /// 設定の検証に失敗したエラー
    ///
    /// `ConverterBuilder::build()`時の設定検証、環境変数の解釈、
    /// シート選択の失敗（範囲外のインデックス、存在しないシート名）で発生します。
    ///
    /// # 例
    ///
    /// ```rust,no_run
    /// use xlsxquiz::{ConverterBuilder, XlsxQuizError};
    ///
    /// let result = ConverterBuilder::new()
    ///     .with_min_cells(1)  // 問題文と正答の2セル未満は無効
    ///     .build();
    ///
    /// match result {
    ///     Err(XlsxQuizError::Config(msg)) => {
    ///         println!("設定エラー: {}", msg);
    ///     }
    ///     _ => {}
    /// }
    /// ```
    #[error("Configuration error: {0}")]
    Config(String),

    /// 入力サイズ制限に違反したエラー
    #[error("Security violation: {0}")]
    SecurityViolation(String),

    /// 誤答生成サービスとのHTTP通信エラー
    ///
    /// 接続失敗、タイムアウト、非2xxステータス、JSONデコード失敗などが含まれます。
    #[error("Distractor service request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// 誤答生成サービスの応答に使用可能な選択肢がなかったエラー
    #[error("Distractor generation failed: {0}")]
    Distractor(String),
}

/// クレート内で使用する`Result`型エイリアス
pub type Result<T> = std::result::Result<T, XlsxQuizError>;
