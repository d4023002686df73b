//! Outline Output Module
//!
//! 解答セットをドット記法のプレーンテキストとして書き出す。
//!
//! ```text
//! .問題文
//! ..正答
//! ...誤答
//! ```

use std::io::Write;

use crate::error::Result;
use crate::types::AnswerSet;

const QUESTION_MARKER: &str = ".";
const CORRECT_MARKER: &str = "..";
const WRONG_MARKER: &str = "...";

/// ドット記法のアウトラインフォーマッター
#[derive(Debug, Clone, Copy, Default)]
pub struct OutlineFormatter;

impl OutlineFormatter {
    /// 解答セット1件を書き出す
    ///
    /// セルのテキストは変換せずにそのまま出力します。
    pub fn render<W: Write>(&self, set: &AnswerSet, writer: &mut W) -> Result<()> {
        writeln!(writer, "{}{}", QUESTION_MARKER, set.question)?;
        writeln!(writer, "{}{}", CORRECT_MARKER, set.correct)?;
        for wrong in &set.wrongs {
            writeln!(writer, "{}{}", WRONG_MARKER, wrong)?;
        }
        Ok(())
    }

    /// 解答セットを行順に連結して書き出す
    pub fn render_all<W: Write>(&self, sets: &[AnswerSet], writer: &mut W) -> Result<()> {
        for set in sets {
            self.render(set, writer)?;
        }
        Ok(())
    }
}
