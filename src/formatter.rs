//! Formatter Module
//!
//! セル値をテキストに変換する処理を提供するモジュール。
//! セルのテキストはアウトラインにそのまま出力されるため、エスケープは行いません。

use calamine::{Data, ExcelDateTime};
use std::fmt::Write as _;

use chrono::{NaiveDateTime, Timelike};

use crate::api::DateFormat;
use crate::error::{Result, XlsxQuizError};

/// セルフォーマッター
///
/// セル値のフォーマット処理のファサードとして機能します。
#[derive(Debug)]
pub(crate) struct CellFormatter {
    /// 日付フォーマッター
    date_formatter: DateFormatter,
}

impl CellFormatter {
    /// 新しいCellFormatterインスタンスを生成
    pub fn new(date_format: DateFormat) -> Self {
        Self {
            date_formatter: DateFormatter { date_format },
        }
    }

    /// セル値をテキストに変換
    ///
    /// # 引数
    ///
    /// * `cell` - calamineのセルデータ
    ///
    /// # 戻り値
    ///
    /// * `Ok(String)` - フォーマット済み文字列（空セルは空文字列）
    /// * `Err(XlsxQuizError)` - 日付の変換に失敗した場合
    pub fn format_cell(&self, cell: &Data) -> Result<String> {
        let text = match cell {
            Data::String(s) => s.clone(),
            Data::Int(i) => i.to_string(),
            Data::Float(f) => f.to_string(),
            Data::Bool(b) => if *b { "TRUE" } else { "FALSE" }.to_string(),
            Data::DateTime(dt) => self.date_formatter.format_excel(dt)?,
            Data::DateTimeIso(s) | Data::DurationIso(s) => s.clone(),
            Data::Error(e) => e.to_string(),
            Data::Empty => String::new(),
        };
        Ok(text)
    }
}

/// 日付フォーマッター
///
/// Excelのシリアル日付値を文字列に変換します。
/// エポック（1900年／1904年システム）の判定はcalamineに任せます。
#[derive(Debug)]
pub(crate) struct DateFormatter {
    date_format: DateFormat,
}

impl DateFormatter {
    fn format_excel(&self, value: &ExcelDateTime) -> Result<String> {
        if value.is_duration() {
            let duration = value.as_duration().ok_or_else(|| {
                XlsxQuizError::Config(format!("Invalid duration value: {}", value.as_f64()))
            })?;
            let total = duration.num_seconds();
            return Ok(format!(
                "{}:{:02}:{:02}",
                total / 3600,
                (total % 3600) / 60,
                total % 60
            ));
        }

        let datetime = value.as_datetime().ok_or_else(|| {
            XlsxQuizError::Config(format!(
                "Date calculation overflow: serial_value={}",
                value.as_f64()
            ))
        })?;
        self.format(&datetime)
    }

    /// 日時をフォーマット
    ///
    /// `DateFormat::Iso8601`では、時刻成分が0時0分0秒の場合は日付のみを出力します。
    /// 不正な書式指定子を含むカスタム形式は`XlsxQuizError::Config`になります。
    pub fn format(&self, datetime: &NaiveDateTime) -> Result<String> {
        let format_str = match &self.date_format {
            DateFormat::Iso8601 if datetime.time().num_seconds_from_midnight() == 0 => "%Y-%m-%d",
            DateFormat::Iso8601 => "%Y-%m-%d %H:%M:%S",
            DateFormat::Custom(format_str) => format_str.as_str(),
        };

        let mut text = String::new();
        write!(text, "{}", datetime.format(format_str)).map_err(|_| {
            XlsxQuizError::Config(format!("Invalid date format string: '{}'", format_str))
        })?;
        Ok(text)
    }
}
