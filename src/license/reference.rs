//! Positional comparison of a comment block against a reference license.

use std::fmt;

use serde::Serialize;

use crate::grammar::GrammarDefinition;
use crate::segment::CommentSegment;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReferenceError {
    /// The reference text produced no content lines.
    EmptyReferenceLicense,
}

impl fmt::Display for ReferenceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyReferenceLicense => write!(f, "License file is empty"),
        }
    }
}

impl std::error::Error for ReferenceError {}

/// One way a candidate block differs from the reference.
///
/// Line numbers are 1-based positions within the comment block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LicenseDeviation {
    LineCount { found: usize, expected: usize },
    Mismatch { line: usize },
    LeadingText { line: usize, text: String },
    TrailingText { line: usize, text: String },
}

impl fmt::Display for LicenseDeviation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LineCount { found, expected } => write!(
                f,
                "line numbers don't match: {} vs. {} lines",
                found, expected
            ),
            Self::Mismatch { line } => write!(f, "line {} does not match", line),
            Self::LeadingText { line, text } => {
                write!(f, "line {} has leading text: {}", line, text)
            }
            Self::TrailingText { line, text } => {
                write!(f, "line {} has trailing text: {}", line, text)
            }
        }
    }
}

/// A reference license read through a grammar, usually the delimiter-less
/// `text` grammar.
#[derive(Debug, Clone)]
pub struct ReferenceLicense<'g> {
    comment: CommentSegment<'g>,
}

impl<'g> ReferenceLicense<'g> {
    pub fn from_lines<I, S>(grammar: &'g GrammarDefinition, lines: I) -> Result<Self, ReferenceError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let comment = CommentSegment::from_lines(grammar, lines);
        if comment.len() == 0 {
            return Err(ReferenceError::EmptyReferenceLicense);
        }
        Ok(Self { comment })
    }

    pub fn from_text(grammar: &'g GrammarDefinition, text: &str) -> Result<Self, ReferenceError> {
        Self::from_lines(grammar, text.split_inclusive('\n'))
    }

    pub fn comment(&self) -> &CommentSegment<'g> {
        &self.comment
    }

    pub fn lines(&self) -> &[String] {
        self.comment.lines()
    }

    /// Compares `candidate` line by line. Every deviation is reported; a
    /// different line count is reported alone since positions no longer
    /// line up.
    pub fn compare(&self, candidate: &CommentSegment<'_>) -> Vec<LicenseDeviation> {
        compare_lines(self.lines(), candidate.lines())
    }
}

/// Each reference line must occur in the candidate line at the same
/// position, surrounded by nothing but whitespace.
pub fn compare_lines<R, C>(reference: &[R], candidate: &[C]) -> Vec<LicenseDeviation>
where
    R: AsRef<str>,
    C: AsRef<str>,
{
    if reference.len() != candidate.len() {
        return vec![LicenseDeviation::LineCount {
            found: candidate.len(),
            expected: reference.len(),
        }];
    }

    let mut deviations = Vec::new();
    for (index, (expected, found)) in reference.iter().zip(candidate).enumerate() {
        let line = index + 1;
        let expected = expected.as_ref();
        let found = found.as_ref();

        let Some(start) = found.find(expected) else {
            deviations.push(LicenseDeviation::Mismatch { line });
            continue;
        };
        let leading = &found[..start];
        let trailing = &found[start + expected.len()..];

        if !leading.is_empty() && !leading.chars().all(char::is_whitespace) {
            deviations.push(LicenseDeviation::LeadingText {
                line,
                text: leading.to_string(),
            });
        }
        if !trailing.is_empty() && !trailing.chars().all(char::is_whitespace) {
            deviations.push(LicenseDeviation::TrailingText {
                line,
                text: trailing.to_string(),
            });
        }
    }
    deviations
}
