//! Builder Module
//!
//! Fluent Builder APIを提供し、`Converter`インスタンスを段階的に構築する。

use std::fmt;
use std::io::{BufWriter, Read, Seek, Write};

use tracing::{debug, warn};

use crate::api::{DateFormat, DistractorMode, GenerationFailure, SheetSelector};
use crate::distractor::{is_same_answer, DistractorGenerator};
use crate::error::{Result, XlsxQuizError};
use crate::formatter::CellFormatter;
use crate::outline::OutlineFormatter;
use crate::parser::WorkbookParser;
use crate::types::{AnswerSet, Row};

/// 入力ファイルサイズのデフォルト上限（10 MiB）
pub const DEFAULT_MAX_INPUT_SIZE: u64 = 10 * 1024 * 1024;

/// 変換処理の設定を保持する内部構造体
#[derive(Debug, Clone)]
pub(crate) struct ConversionConfig {
    /// シート選択方式
    pub sheet_selector: SheetSelector,

    /// 日付形式
    pub date_format: DateFormat,

    /// 誤答の供給方式
    pub distractor_mode: DistractorMode,

    /// 最小セル数（Noneの場合は供給方式のデフォルト）
    pub min_cells: Option<usize>,

    /// 誤答生成に失敗した行の扱い
    pub generation_failure: GenerationFailure,

    /// 入力ファイルサイズの上限（バイト）
    pub max_input_size: u64,
}

impl Default for ConversionConfig {
    fn default() -> Self {
        Self {
            sheet_selector: SheetSelector::Index(0),
            date_format: DateFormat::Iso8601,
            distractor_mode: DistractorMode::Supplied,
            min_cells: None,
            generation_failure: GenerationFailure::SkipRow,
            max_input_size: DEFAULT_MAX_INPUT_SIZE,
        }
    }
}

impl ConversionConfig {
    /// 実際に適用する最小セル数
    pub fn effective_min_cells(&self) -> usize {
        self.min_cells
            .unwrap_or_else(|| self.distractor_mode.default_min_cells())
    }
}

/// Fluent Builder APIを提供する構造体
///
/// すべての設定項目にデフォルト値が設定されており、必要な設定のみをオーバーライドできます。
///
/// # 使用例
///
/// ```rust,no_run
/// use xlsxquiz::{ConverterBuilder, SheetSelector};
///
/// # fn main() -> Result<(), xlsxquiz::XlsxQuizError> {
/// let converter = ConverterBuilder::new()
///     .with_sheet_selector(SheetSelector::Name("Quiz".to_string()))
///     .build()?;
/// # Ok(())
/// # }
/// ```
pub struct ConverterBuilder {
    /// 内部設定（構築中）
    config: ConversionConfig,

    generator: Option<Box<dyn DistractorGenerator>>,
}

impl Default for ConverterBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ConverterBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConverterBuilder")
            .field("config", &self.config)
            .field("has_generator", &self.generator.is_some())
            .finish()
    }
}

impl ConverterBuilder {
    /// デフォルト設定を持つビルダーインスタンスを生成する
    ///
    /// # デフォルト設定
    ///
    /// - シート選択: 先頭シート
    /// - 日付形式: ISO 8601 (YYYY-MM-DD)
    /// - 誤答の供給方式: スプレッドシートの誤答のみ（最小セル数3）
    /// - 誤答生成の失敗時: 行をスキップ
    /// - 入力サイズ上限: 10 MiB
    pub fn new() -> Self {
        Self {
            config: ConversionConfig::default(),
            generator: None,
        }
    }

    /// 変換対象のシートを選択する
    pub fn with_sheet_selector(mut self, selector: SheetSelector) -> Self {
        self.config.sheet_selector = selector;
        self
    }

    /// 日付セルの出力形式を指定する
    pub fn with_date_format(mut self, format: DateFormat) -> Self {
        self.config.date_format = format;
        self
    }

    /// 誤答の供給方式を指定する
    ///
    /// `DistractorMode::Generated`を指定した場合は、
    /// `with_distractor_generator()`で生成器も指定する必要があります。
    pub fn with_distractor_mode(mut self, mode: DistractorMode) -> Self {
        self.config.distractor_mode = mode;
        self
    }

    /// 行を出力対象とする最小セル数を指定する
    ///
    /// 指定しない場合は供給方式のデフォルト（`Supplied`: 3、`Generated`: 2）を使用します。
    ///
    /// # 制約
    ///
    /// * 2以上でなければならない（問題文と正答）
    /// * 制約違反の場合、`build()`時に`XlsxQuizError::Config`を返す
    pub fn with_min_cells(mut self, min_cells: usize) -> Self {
        self.config.min_cells = Some(min_cells);
        self
    }

    /// 誤答生成に失敗した行の扱いを指定する
    pub fn with_generation_failure(mut self, policy: GenerationFailure) -> Self {
        self.config.generation_failure = policy;
        self
    }

    /// 誤答生成器を指定する
    ///
    /// # 使用例
    ///
    /// ```rust,no_run
    /// use xlsxquiz::{
    ///     ConverterBuilder, DistractorMode, OpenRouterConfig, OpenRouterGenerator,
    /// };
    ///
    /// # fn main() -> Result<(), xlsxquiz::XlsxQuizError> {
    /// let api_key = std::env::var("OPENROUTER_API_KEY").unwrap_or_default();
    /// let generator = OpenRouterGenerator::new(OpenRouterConfig::new(api_key))?;
    /// let converter = ConverterBuilder::new()
    ///     .with_distractor_mode(DistractorMode::Generated)
    ///     .with_distractor_generator(Box::new(generator))
    ///     .build()?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn with_distractor_generator(mut self, generator: Box<dyn DistractorGenerator>) -> Self {
        self.generator = Some(generator);
        self
    }

    /// 入力ファイルサイズの上限（バイト）を指定する
    pub fn with_max_input_size(mut self, bytes: u64) -> Self {
        self.config.max_input_size = bytes;
        self
    }

    /// 設定を検証し、`Converter`インスタンスを生成する
    ///
    /// # 発生し得るエラー
    ///
    /// * `XlsxQuizError::Config(String)`: 設定の検証に失敗した場合
    ///   * 最小セル数が2未満
    ///   * `DistractorMode::Generated`で生成器が未指定
    ///   * カスタム日付形式が空文字列
    ///   * 入力サイズ上限が0
    pub fn build(self) -> Result<Converter> {
        // 1. 最小セル数の検証
        if let Some(min_cells) = self.config.min_cells {
            if min_cells < 2 {
                return Err(XlsxQuizError::Config(format!(
                    "Invalid min cells: {} (question and correct answer require at least 2)",
                    min_cells
                )));
            }
        }

        // 2. 生成器の検証
        if self.config.distractor_mode == DistractorMode::Generated && self.generator.is_none() {
            return Err(XlsxQuizError::Config(
                "Generated distractor mode requires a distractor generator".to_string(),
            ));
        }

        // 3. カスタム日付形式の検証
        if let DateFormat::Custom(ref format_str) = self.config.date_format {
            if format_str.is_empty() {
                return Err(XlsxQuizError::Config(format!(
                    "Invalid date format string: '{}'",
                    format_str
                )));
            }
        }

        // 4. 入力サイズ上限の検証
        if self.config.max_input_size == 0 {
            return Err(XlsxQuizError::Config(
                "Max input size must be greater than 0".to_string(),
            ));
        }

        Ok(Converter::new(self.config, self.generator))
    }
}

/// 変換処理のファサード
///
/// スプレッドシートをドット記法のアウトラインに変換するためのメインエントリーポイントです。
/// 行は先頭から順に1行ずつ処理され、1行の失敗が他の行の処理を中断することはありません。
///
/// # 使用例
///
/// ```rust,no_run
/// use xlsxquiz::ConverterBuilder;
/// use std::fs::File;
///
/// # fn main() -> Result<(), xlsxquiz::XlsxQuizError> {
/// let converter = ConverterBuilder::new().build()?;
/// let input = File::open("quiz.xlsx")?;
/// let outline = converter.convert_to_string(input)?;
/// print!("{}", outline);
/// # Ok(())
/// # }
/// ```
pub struct Converter {
    /// 変換設定
    config: ConversionConfig,

    /// セルフォーマッター
    formatter: CellFormatter,

    generator: Option<Box<dyn DistractorGenerator>>,
}

impl fmt::Debug for Converter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Converter")
            .field("config", &self.config)
            .field("has_generator", &self.generator.is_some())
            .finish()
    }
}

impl Converter {
    pub(crate) fn new(
        config: ConversionConfig,
        generator: Option<Box<dyn DistractorGenerator>>,
    ) -> Self {
        Self {
            formatter: CellFormatter::new(config.date_format.clone()),
            config,
            generator,
        }
    }

    /// スプレッドシートを読み込み、出力対象の解答セットを行順に返す
    ///
    /// # 処理フロー
    ///
    /// 1. WorkbookParserの初期化（サイズ制限の確認）
    /// 2. シート選択
    /// 3. 行の抽出
    /// 4. 各行について解答セットを構築（必要に応じて誤答を生成）
    ///
    /// # 戻り値
    ///
    /// * `Ok(Vec<AnswerSet>)` - 解答セット（スキップされた行は含まない）
    /// * `Err(XlsxQuizError)` - ファイルを開けない、シートが見つからない等の致命的エラー
    pub fn answer_sets<R: Read + Seek>(&self, input: R) -> Result<Vec<AnswerSet>> {
        let rows = {
            let mut parser = WorkbookParser::open(input, self.config.max_input_size)?;
            let sheet_name = parser.select_sheet(&self.config.sheet_selector)?;
            debug!(sheet = %sheet_name, "reading rows");
            parser.rows(&sheet_name, &self.formatter)?
        };

        let mut sets = Vec::with_capacity(rows.len());
        for row in &rows {
            match self.answer_set_for(row) {
                Ok(Some(set)) => sets.push(set),
                Ok(None) => {
                    debug!(row = row.index, cells = row.cells.len(), "skipping short row");
                }
                Err(e) => {
                    warn!(row = row.index, error = %e, "distractor generation failed");
                    if self.config.generation_failure == GenerationFailure::KeepWithoutDistractors {
                        if let (Some(question), Some(correct)) = (row.question(), row.correct()) {
                            sets.push(AnswerSet::new(question, correct, Vec::new()));
                        }
                    }
                }
            }
        }

        debug!(rows = rows.len(), emitted = sets.len(), "conversion finished");
        Ok(sets)
    }

    /// 1行分の解答セットを構築する
    ///
    /// * `Ok(None)` - セル数が不足している行
    /// * `Err(_)` - 誤答の生成に失敗した行（正答と同じ候補しか得られなかった場合を含む）
    fn answer_set_for(&self, row: &Row) -> Result<Option<AnswerSet>> {
        if row.cells.len() < self.config.effective_min_cells() {
            return Ok(None);
        }
        let (question, correct) = match (row.question(), row.correct()) {
            (Some(q), Some(c)) => (q, c),
            _ => return Ok(None),
        };

        let mut wrongs = row.supplied_wrongs();
        if wrongs.is_empty() && self.config.distractor_mode == DistractorMode::Generated {
            if let Some(generator) = &self.generator {
                wrongs = generator.generate(question, correct)?;
                wrongs.retain(|wrong| !is_same_answer(wrong, correct));
                if wrongs.is_empty() {
                    return Err(XlsxQuizError::Distractor(
                        "generator returned no answers distinct from the correct one".to_string(),
                    ));
                }
            }
        }

        Ok(Some(AnswerSet::new(question, correct, wrongs)))
    }

    /// スプレッドシートをアウトライン形式に変換
    ///
    /// # 引数
    ///
    /// * `input` - スプレッドシートを読み込むためのリーダー（Read + Seekトレイトを実装）
    /// * `output` - アウトライン出力先のライター（Writeトレイトを実装）
    ///
    /// エラーが発生した場合、出力には何も書き込まれません。
    pub fn convert<R: Read + Seek, W: Write>(&self, input: R, mut output: W) -> Result<()> {
        let sets = self.answer_sets(input)?;

        let mut writer = BufWriter::new(&mut output);
        OutlineFormatter.render_all(&sets, &mut writer)?;
        writer.flush()?;

        Ok(())
    }

    /// スプレッドシートをアウトライン形式の文字列に変換
    pub fn convert_to_string<R: Read + Seek>(&self, input: R) -> Result<String> {
        let mut buffer = Vec::new();
        self.convert(input, &mut buffer)?;

        let result = String::from_utf8(buffer).map_err(|e| {
            XlsxQuizError::Io(std::io::Error::new(std::io::ErrorKind::InvalidData, e))
        })?;

        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    struct FixedGenerator {
        answers: Vec<String>,
        calls: Arc<AtomicUsize>,
    }

    impl DistractorGenerator for FixedGenerator {
        fn generate(&self, _question: &str, _correct: &str) -> Result<Vec<String>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.answers.clone())
        }
    }

    struct FailingGenerator;

    impl DistractorGenerator for FailingGenerator {
        fn generate(&self, _question: &str, _correct: &str) -> Result<Vec<String>> {
            Err(XlsxQuizError::Distractor("service unavailable".to_string()))
        }
    }

    fn row(index: u32, cells: &[&str]) -> Row {
        Row::new(index, cells.iter().map(|s| s.to_string()).collect())
    }

    fn generated_converter(calls: Arc<AtomicUsize>) -> Converter {
        ConverterBuilder::new()
            .with_distractor_mode(DistractorMode::Generated)
            .with_distractor_generator(Box::new(FixedGenerator {
                answers: vec!["3".into(), "5".into(), "22".into()],
                calls,
            }))
            .build()
            .unwrap()
    }

    #[test]
    fn test_converter_builder_new() {
        let builder = ConverterBuilder::new();
        assert_eq!(builder.config.sheet_selector, SheetSelector::Index(0));
        assert_eq!(builder.config.date_format, DateFormat::Iso8601);
        assert_eq!(builder.config.distractor_mode, DistractorMode::Supplied);
        assert_eq!(builder.config.generation_failure, GenerationFailure::SkipRow);
        assert_eq!(builder.config.max_input_size, DEFAULT_MAX_INPUT_SIZE);
        assert_eq!(builder.config.effective_min_cells(), 3);
        assert!(builder.generator.is_none());
    }

    #[test]
    fn test_builder_method_chaining() {
        let builder = ConverterBuilder::new()
            .with_sheet_selector(SheetSelector::Name("Quiz".to_string()))
            .with_date_format(DateFormat::Custom("%d.%m.%Y".to_string()))
            .with_min_cells(4)
            .with_generation_failure(GenerationFailure::KeepWithoutDistractors)
            .with_max_input_size(1024);

        assert!(matches!(
            builder.config.sheet_selector,
            SheetSelector::Name(ref name) if name == "Quiz"
        ));
        assert_eq!(builder.config.effective_min_cells(), 4);
        assert_eq!(
            builder.config.generation_failure,
            GenerationFailure::KeepWithoutDistractors
        );
        assert_eq!(builder.config.max_input_size, 1024);
    }

    #[test]
    fn test_build_with_invalid_min_cells() {
        let result = ConverterBuilder::new().with_min_cells(1).build();
        match result {
            Err(XlsxQuizError::Config(msg)) => assert!(msg.contains("min cells")),
            _ => panic!("Expected Config error"),
        }
    }

    #[test]
    fn test_build_generated_without_generator() {
        let result = ConverterBuilder::new()
            .with_distractor_mode(DistractorMode::Generated)
            .build();
        match result {
            Err(XlsxQuizError::Config(msg)) => assert!(msg.contains("generator")),
            _ => panic!("Expected Config error"),
        }
    }

    #[test]
    fn test_build_with_invalid_custom_date_format() {
        let result = ConverterBuilder::new()
            .with_date_format(DateFormat::Custom("".to_string()))
            .build();
        match result {
            Err(XlsxQuizError::Config(msg)) => assert!(msg.contains("Invalid date format")),
            _ => panic!("Expected Config error"),
        }
    }

    #[test]
    fn test_build_with_zero_max_input_size() {
        let result = ConverterBuilder::new().with_max_input_size(0).build();
        assert!(matches!(result, Err(XlsxQuizError::Config(_))));
    }

    #[test]
    fn test_supplied_mode_skips_short_rows() {
        let converter = ConverterBuilder::new().build().unwrap();
        assert!(converter
            .answer_set_for(&row(0, &["Q", "A"]))
            .unwrap()
            .is_none());

        let set = converter
            .answer_set_for(&row(1, &["Capital of France?", "Paris", "London", "Berlin", "Madrid"]))
            .unwrap()
            .unwrap();
        assert_eq!(set.question, "Capital of France?");
        assert_eq!(set.correct, "Paris");
        assert_eq!(set.wrongs, vec!["London", "Berlin", "Madrid"]);
    }

    #[test]
    fn test_generated_mode_calls_generator_for_bare_rows() {
        let calls = Arc::new(AtomicUsize::new(0));
        let converter = generated_converter(calls.clone());

        let set = converter
            .answer_set_for(&row(0, &["2+2=?", "4"]))
            .unwrap()
            .unwrap();
        assert_eq!(set.wrongs, vec!["3", "5", "22"]);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_generated_answers_equal_to_correct_are_dropped() {
        let calls = Arc::new(AtomicUsize::new(0));
        let converter = generated_converter(calls.clone());

        let set = converter
            .answer_set_for(&row(0, &["2+3=?", "5"]))
            .unwrap()
            .unwrap();
        assert_eq!(set.wrongs, vec!["3", "22"]);
    }

    #[test]
    fn test_generated_only_correct_answer_is_row_error() {
        let converter = ConverterBuilder::new()
            .with_distractor_mode(DistractorMode::Generated)
            .with_distractor_generator(Box::new(FixedGenerator {
                answers: vec!["Paris".into(), " paris ".into()],
                calls: Arc::new(AtomicUsize::new(0)),
            }))
            .build()
            .unwrap();

        let result = converter.answer_set_for(&row(0, &["Capital of France?", "Paris"]));
        assert!(matches!(result, Err(XlsxQuizError::Distractor(_))));
    }

    #[test]
    fn test_generated_mode_prefers_supplied_wrongs() {
        let calls = Arc::new(AtomicUsize::new(0));
        let converter = generated_converter(calls.clone());

        let set = converter
            .answer_set_for(&row(0, &["Q", "A", "W"]))
            .unwrap()
            .unwrap();
        assert_eq!(set.wrongs, vec!["W"]);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_generated_mode_skips_single_cell_rows() {
        let calls = Arc::new(AtomicUsize::new(0));
        let converter = generated_converter(calls.clone());

        assert!(converter.answer_set_for(&row(0, &["Q"])).unwrap().is_none());
        assert!(converter.answer_set_for(&row(1, &[])).unwrap().is_none());
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_generation_failure_is_row_error() {
        let converter = ConverterBuilder::new()
            .with_distractor_mode(DistractorMode::Generated)
            .with_distractor_generator(Box::new(FailingGenerator))
            .build()
            .unwrap();

        let result = converter.answer_set_for(&row(0, &["Q", "A"]));
        assert!(matches!(result, Err(XlsxQuizError::Distractor(_))));
    }

    #[test]
    fn test_converter_convert_to_string_with_invalid_input() {
        let converter = ConverterBuilder::new().build().unwrap();
        let result = converter.convert_to_string(std::io::Cursor::new(Vec::<u8>::new()));
        assert!(result.is_err());
    }
}
