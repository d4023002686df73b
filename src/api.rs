//! Public API Types
//!
//! 公開APIで使用する列挙型を定義するモジュール。

/// 1行に付ける誤答の最大数
pub const MAX_WRONG_ANSWERS: usize = 3;

/// 誤答の供給方式
///
/// 各行の誤答（ディストラクター）をどこから得るかを指定します。
/// 行をスキップする最小セル数のデフォルト値もこの方式で決まります。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum DistractorMode {
    /// スプレッドシートの3列目以降に書かれた誤答のみを使用（デフォルト）
    ///
    /// 最小セル数は3（問題文、正答、誤答1つ以上）です。
    ///
    /// # 出力例
    ///
    /// ```text
    /// .Capital of France?
    /// ..Paris
    /// ...London
    /// ...Berlin
    /// ...Madrid
    /// ```
    Supplied,

    /// 誤答がない行について、外部のテキスト生成サービスで誤答を生成
    ///
    /// 最小セル数は2（問題文、正答）です。3列目以降に誤答がある行は
    /// その誤答を使用し、生成サービスを呼び出しません。
    /// `ConverterBuilder::with_distractor_generator()`で生成器の指定が必要です。
    Generated,
}

impl DistractorMode {
    /// この方式でのデフォルト最小セル数
    pub fn default_min_cells(&self) -> usize {
        match self {
            DistractorMode::Supplied => 3,
            DistractorMode::Generated => 2,
        }
    }
}

/// 誤答生成に失敗した行の扱い
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum GenerationFailure {
    /// 行全体を出力しない（デフォルト）
    SkipRow,

    /// 問題文と正答のみを出力し、誤答は0件として扱う
    KeepWithoutDistractors,
}

/// 日付の出力形式
///
/// 日付セルをテキストに変換する際の出力形式を指定します。
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum DateFormat {
    /// ISO 8601形式（YYYY-MM-DD）
    ///
    /// 時刻成分を持つセルは`YYYY-MM-DD HH:MM:SS`になります。
    Iso8601,

    /// カスタム形式（chrono互換フォーマット文字列）
    ///
    /// # 使用例
    ///
    /// ```rust,no_run
    /// use xlsxquiz::{ConverterBuilder, DateFormat};
    ///
    /// # fn main() -> Result<(), xlsxquiz::XlsxQuizError> {
    /// let converter = ConverterBuilder::new()
    ///     .with_date_format(DateFormat::Custom("%d.%m.%Y".to_string()))
    ///     .build()?;
    /// # Ok(())
    /// # }
    /// ```
    Custom(String),
}

/// シート選択方式
///
/// 変換対象のシートを1つ選択します。
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SheetSelector {
    /// インデックス指定（0始まり）
    ///
    /// デフォルトは`SheetSelector::Index(0)`（先頭シート）です。
    Index(usize),

    /// シート名指定
    ///
    /// 例: `SheetSelector::Name("Quiz".to_string())`
    Name(String),
}
