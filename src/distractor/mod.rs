//! Distractor Module
//!
//! 誤答（ディストラクター）生成の抽象化と、生成サービスの応答テキストの整形を提供する。

mod openrouter;

pub use openrouter::{OpenRouterConfig, OpenRouterGenerator};

use std::sync::Arc;

use crate::api::MAX_WRONG_ANSWERS;
use crate::error::Result;

/// 誤答生成器
///
/// 問題文と正答から、もっともらしいが誤った解答を最大3件生成します。
/// 生成結果に正答を含めてはいけません。
///
/// 行ごとに最大1回呼び出されます。失敗した行の扱いは
/// `GenerationFailure`で決まり、変換全体は中断されません。
pub trait DistractorGenerator: Send + Sync {
    fn generate(&self, question: &str, correct: &str) -> Result<Vec<String>>;
}

impl<T: DistractorGenerator + ?Sized> DistractorGenerator for Arc<T> {
    fn generate(&self, question: &str, correct: &str) -> Result<Vec<String>> {
        (**self).generate(question, correct)
    }
}

/// 生成サービスの自由形式テキストから誤答候補を取り出す
///
/// 各行の先頭にある箇条書き記号（数字、`-`、`.`、`*`、空白）と末尾の空白を取り除き、
/// 空行を捨てて、出現順に最大3件を返します。
///
/// ```rust
/// use xlsxquiz::clean_choice_lines;
///
/// let choices = clean_choice_lines("- 1. *Answer text  \n\n* Other\n");
/// assert_eq!(choices, vec!["Answer text", "Other"]);
/// ```
pub fn clean_choice_lines(text: &str) -> Vec<String> {
    choice_lines(text)
        .take(MAX_WRONG_ANSWERS)
        .map(str::to_string)
        .collect()
}

/// 正答と同じ候補を除いてから誤答候補を取り出す
///
/// 比較は前後の空白を除き、大文字・小文字を区別しません。
///
/// ```rust
/// use xlsxquiz::clean_choice_lines_excluding;
///
/// let choices = clean_choice_lines_excluding("* Paris\n* London\n* paris \n* Berlin", "Paris");
/// assert_eq!(choices, vec!["London", "Berlin"]);
/// ```
pub fn clean_choice_lines_excluding(text: &str, correct: &str) -> Vec<String> {
    choice_lines(text)
        .filter(|choice| !is_same_answer(choice, correct))
        .take(MAX_WRONG_ANSWERS)
        .map(str::to_string)
        .collect()
}

/// 2つの解答が同一とみなせるか
pub(crate) fn is_same_answer(candidate: &str, correct: &str) -> bool {
    let candidate = candidate.trim();
    let correct = correct.trim();
    candidate == correct || candidate.to_lowercase() == correct.to_lowercase()
}

fn choice_lines(text: &str) -> impl Iterator<Item = &str> {
    text.lines()
        .map(strip_list_marker)
        .filter(|line| !line.is_empty())
}

fn strip_list_marker(line: &str) -> &str {
    line.trim_start_matches(|c: char| {
        c.is_ascii_digit() || matches!(c, '-' | '.' | '*') || c.is_whitespace()
    })
    .trim_end()
}
