//! Parser Module
//!
//! calamineを使用したスプレッドシート解析の実装。
//! 選択したシートをA列起点のテキスト行の列として取り出します。

mod workbook;

pub(crate) use workbook::WorkbookParser;
