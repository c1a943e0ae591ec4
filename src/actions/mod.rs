//! The per-file operations the command line offers.
//!
//! Actions are pure: they get a file's text and return findings plus, when
//! the file should change, its new content. Reading, saving and traversal
//! belong to the scanner.

mod check;
mod describe;
mod java_top;
mod list;
mod reformat;
mod relicense;
mod strip_blank;
mod xml_top;

use anyhow::{Context, Error};
use log::info;
use std::fs;
use std::path::Path;

use crate::grammar::{GrammarDefinition, LanguageTag, lookup_grammar};
use crate::license::ReferenceLicense;
use crate::models::Finding;

pub use check::CheckAction;
pub use describe::DescribeAction;
pub use java_top::JavaTopAction;
pub use list::ListAction;
pub use reformat::ReformatAction;
pub use relicense::{RelicenseAction, RelicenseMode};
pub use strip_blank::StripBlankAction;
pub use xml_top::XmlTopAction;

/// One file as handed to an action.
#[derive(Debug, Clone, Copy)]
pub struct SourceFile<'a> {
    pub language: Option<LanguageTag>,
    pub grammar: &'static GrammarDefinition,
    /// Empty when the action does not read content.
    pub text: &'a str,
}

impl<'a> SourceFile<'a> {
    pub fn new(
        language: Option<LanguageTag>,
        grammar: &'static GrammarDefinition,
        text: &'a str,
    ) -> Self {
        Self {
            language,
            grammar,
            text,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActionOutcome {
    pub findings: Vec<Finding>,
    /// New file content; `None` leaves the file untouched.
    pub rewrite: Option<String>,
}

impl ActionOutcome {
    pub fn report(findings: Vec<Finding>) -> Self {
        Self {
            findings,
            rewrite: None,
        }
    }

    pub fn rewrite(finding: Finding, content: String) -> Self {
        Self {
            findings: vec![finding],
            rewrite: Some(content),
        }
    }
}

pub trait Action: Sync {
    fn name(&self) -> &'static str;

    /// Files whose grammar has no comment syntax are skipped unless this
    /// returns `false`.
    fn requires_comment_syntax(&self) -> bool {
        true
    }

    fn reads_content(&self) -> bool {
        true
    }

    fn apply(&self, file: &SourceFile<'_>) -> Result<ActionOutcome, Error>;
}

/// Loads a reference license file, read through the grammar named by
/// `license_type` (usually `text`).
pub fn load_reference_license(
    path: &Path,
    license_type: &str,
) -> Result<ReferenceLicense<'static>, Error> {
    let grammar = lookup_grammar(Some(license_type));
    let text = fs::read_to_string(path)
        .with_context(|| format!("Could not read license file {}", path.display()))?;
    let reference = ReferenceLicense::from_text(grammar, &text)
        .with_context(|| format!("Invalid license file {}", path.display()))?;

    info!(
        "Loaded {} line reference license from {}",
        reference.lines().len(),
        path.display()
    );
    Ok(reference)
}
