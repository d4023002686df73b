//! Internal Data Types
//!
//! 行抽出とアウトライン出力の間で受け渡すデータ型を定義するモジュール。

use crate::api::MAX_WRONG_ANSWERS;

/// スプレッドシートの1行
///
/// セルはA列を起点に並び、末尾の空セルは取り除かれています。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    /// シート内の行インデックス（0始まり）
    pub index: u32,

    /// セルのテキスト値
    pub cells: Vec<String>,
}

impl Row {
    pub fn new(index: u32, cells: Vec<String>) -> Self {
        Self { index, cells }
    }

    /// 問題文（1列目）
    pub fn question(&self) -> Option<&str> {
        self.cells.first().map(String::as_str)
    }

    /// 正答（2列目）
    pub fn correct(&self) -> Option<&str> {
        self.cells.get(1).map(String::as_str)
    }

    /// 3列目以降の空でない誤答（最大`MAX_WRONG_ANSWERS`件）
    pub fn supplied_wrongs(&self) -> Vec<String> {
        self.cells
            .iter()
            .skip(2)
            .filter(|cell| !cell.is_empty())
            .take(MAX_WRONG_ANSWERS)
            .cloned()
            .collect()
    }
}

/// 1問分の解答セット
///
/// 行ごとに生成され、テキストへ書き出した後に破棄されます。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerSet {
    pub question: String,
    pub correct: String,
    /// 誤答（0〜3件、順序を保持）
    pub wrongs: Vec<String>,
}

impl AnswerSet {
    /// 解答セットを生成する
    ///
    /// 誤答が`MAX_WRONG_ANSWERS`件を超える場合は先頭から切り詰めます。
    pub fn new(question: impl Into<String>, correct: impl Into<String>, mut wrongs: Vec<String>) -> Self {
        wrongs.truncate(MAX_WRONG_ANSWERS);
        Self {
            question: question.into(),
            correct: correct.into(),
            wrongs,
        }
    }
}
