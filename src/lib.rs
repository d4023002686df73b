//! xlsxquiz - Quiz spreadsheet to dot-outline converter
//!
//! This crate reads a quiz spreadsheet (question, correct answer and optional wrong
//! answers per row) and flattens it into a plain-text outline where questions start
//! with `.`, correct answers with `..` and wrong answers with `...`.
//! Rows without wrong answers can be completed by an external text-generation
//! service (OpenRouter-compatible chat completions).
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use std::fs::File;
//! use xlsxquiz::ConverterBuilder;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Rows need a question, a correct answer and at least one wrong answer
//!     let converter = ConverterBuilder::new().build()?;
//!
//!     let input = File::open("quiz.xlsx")?;
//!     let outline = converter.convert_to_string(input)?;
//!     print!("{}", outline);
//!
//!     Ok(())
//! }
//! ```
//!
//! Given a first sheet containing
//! `Capital of France? | Paris | London | Berlin | Madrid`, the output is:
//!
//! ```text
//! .Capital of France?
//! ..Paris
//! ...London
//! ...Berlin
//! ...Madrid
//! ```
//!
//! # Generated Distractors
//!
//! ```rust,no_run
//! use std::io::Cursor;
//! use xlsxquiz::{ConverterBuilder, DistractorMode, OpenRouterConfig, OpenRouterGenerator};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = OpenRouterConfig::new(std::env::var("OPENROUTER_API_KEY")?);
//! let converter = ConverterBuilder::new()
//!     .with_distractor_mode(DistractorMode::Generated)
//!     .with_distractor_generator(Box::new(OpenRouterGenerator::new(config)?))
//!     .build()?;
//!
//! let excel_data: Vec<u8> = vec![]; // Your spreadsheet bytes
//! let outline = converter.convert_to_string(Cursor::new(excel_data))?;
//! # Ok(())
//! # }
//! ```
//!
//! The [`server`] module exposes the same conversion as an HTTP endpoint.

mod api;
mod builder;
mod distractor;
mod error;
mod formatter;
mod outline;
mod parser;
pub mod server;
mod types;

// 公開API
pub use api::{DateFormat, DistractorMode, GenerationFailure, SheetSelector, MAX_WRONG_ANSWERS};
pub use builder::{Converter, ConverterBuilder, DEFAULT_MAX_INPUT_SIZE};
pub use distractor::{
    clean_choice_lines, clean_choice_lines_excluding, DistractorGenerator, OpenRouterConfig,
    OpenRouterGenerator,
};
pub use error::{Result, XlsxQuizError};
pub use outline::OutlineFormatter;
pub use types::{AnswerSet, Row};
