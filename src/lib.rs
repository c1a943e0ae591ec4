//! Finds, classifies and rewrites license header comments across a source
//! tree, using per-language comment grammars.

pub mod actions;
pub mod cli;
pub mod grammar;
pub mod license;
pub mod models;
pub mod scanner;
pub mod segment;
pub mod utils;

pub use grammar::{GrammarDefinition, GrammarError, LanguageTag, detect_language_tag, grammar_for};
pub use license::{LicenseMatchResult, ReferenceLicense, classify};
pub use models::{FileReport, Finding, Output};
pub use scanner::{ProcessResult, count, process};
pub use segment::{CommentSegment, DataSegment, Document, Segment, split_text};
