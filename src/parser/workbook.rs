//! Workbook Parser
//!
//! calamineを使用したスプレッドシートの行抽出。

use calamine::{open_workbook_auto_from_rs, Data, Reader, Sheets};
use std::io::{Cursor, Read, Seek};

use crate::api::SheetSelector;
use crate::error::{Result, XlsxQuizError};
use crate::formatter::CellFormatter;
use crate::types::Row;

/// ワークブックパーサー
///
/// calamineのラッパーとして、シート選択と行の抽出を提供します。
/// xlsx / xlsm / xlsb / xls / ods を自動判定で開きます。
pub(crate) struct WorkbookParser {
    workbook: Sheets<Cursor<Vec<u8>>>,
}

impl WorkbookParser {
    /// ワークブックを開く
    ///
    /// 入力全体をメモリに読み込み、サイズ制限を確認してからcalamineで開きます。
    ///
    /// # 引数
    ///
    /// * `reader` - スプレッドシートを読み込むためのリーダー
    /// * `max_input_size` - 入力サイズの上限（バイト）
    ///
    /// # 戻り値
    ///
    /// * `Ok(WorkbookParser)` - 読み込みに成功した場合
    /// * `Err(XlsxQuizError::SecurityViolation)` - 入力サイズが上限を超えた場合
    /// * `Err(XlsxQuizError::Parse)` - スプレッドシートとして解析できない場合
    pub fn open<R: Read + Seek>(mut reader: R, max_input_size: u64) -> Result<Self> {
        // 上限を1バイト超えた時点で読み込みを打ち切る
        let mut buffer = Vec::new();
        let bytes_read = (&mut reader)
            .take(max_input_size.saturating_add(1))
            .read_to_end(&mut buffer)?;

        if bytes_read as u64 > max_input_size {
            return Err(XlsxQuizError::SecurityViolation(format!(
                "Input file size exceeds maximum: more than {} bytes",
                max_input_size
            )));
        }

        let workbook = open_workbook_auto_from_rs(Cursor::new(buffer))?;
        Ok(Self { workbook })
    }

    /// すべてのシート名を取得
    pub fn get_sheet_names(&self) -> Vec<String> {
        self.workbook.sheet_names()
    }

    /// シート選択方式に基づいてシートを1つ選択
    ///
    /// # 戻り値
    ///
    /// * `Ok(String)` - 選択されたシート名
    /// * `Err(XlsxQuizError::Config)` - シートが見つからない、またはインデックスが範囲外の場合
    pub fn select_sheet(&self, selector: &SheetSelector) -> Result<String> {
        let all_sheet_names = self.get_sheet_names();

        match selector {
            SheetSelector::Index(index) => {
                all_sheet_names.get(*index).cloned().ok_or_else(|| {
                    XlsxQuizError::Config(format!(
                        "Sheet index {} is out of range (total: {})",
                        index,
                        all_sheet_names.len()
                    ))
                })
            }

            SheetSelector::Name(name) => {
                if !all_sheet_names.contains(name) {
                    return Err(XlsxQuizError::Config(format!("Sheet '{}' not found", name)));
                }
                Ok(name.clone())
            }
        }
    }

    /// シートの全行を抽出
    ///
    /// セルはA列を起点に並べ（使用範囲がB列以降から始まる場合は空文字列で埋める）、
    /// 末尾の空セルは取り除きます。空行は`cells`が空の`Row`になります。
    pub fn rows(&mut self, sheet_name: &str, formatter: &CellFormatter) -> Result<Vec<Row>> {
        let range = self.workbook.worksheet_range(sheet_name)?;

        let (row_offset, col_offset) = range.start().unwrap_or((0, 0));
        let mut rows = Vec::with_capacity(range.height());

        for (row_idx, cells) in range.rows().enumerate() {
            let row_idx = row_offset + row_idx as u32;
            let row = Self::extract_row(row_idx, col_offset, cells, formatter)?;
            rows.push(row);
        }

        Ok(rows)
    }

    fn extract_row(
        row_idx: u32,
        col_offset: u32,
        cells: &[Data],
        formatter: &CellFormatter,
    ) -> Result<Row> {
        let last_used = match cells.iter().rposition(|cell| !matches!(cell, Data::Empty)) {
            Some(pos) => pos,
            None => return Ok(Row::new(row_idx, Vec::new())),
        };

        let mut texts = vec![String::new(); col_offset as usize];
        for cell in &cells[..=last_used] {
            texts.push(formatter.format_cell(cell)?);
        }

        Ok(Row::new(row_idx, texts))
    }
}
