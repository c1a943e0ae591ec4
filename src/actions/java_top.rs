use anyhow::{Error, bail};
use regex::Regex;
use std::sync::LazyLock;

use super::{Action, ActionOutcome, SourceFile};
use crate::grammar::LanguageTag;
use crate::license::classify;
use crate::models::Finding;
use crate::segment::{DataSegment, Document, Segment, is_blank, split_text};

static PACKAGE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^package\s+.*$").unwrap());

static IMPORT_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^import\s+.*$").unwrap());

static LINE_COMMENT_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\s*//.*$").unwrap());

/// Puts the head of a Java file in package, license, imports order.
///
/// With `license_on_top` the license block moves above the package line
/// instead. Everything after the first line that is neither an import, a
/// `//` comment nor blank is left as it is.
#[derive(Debug, Default)]
pub struct JavaTopAction {
    license_on_top: bool,
}

impl JavaTopAction {
    pub fn new(license_on_top: bool) -> Self {
        Self { license_on_top }
    }

    fn arrange<'g>(&self, document: &Document<'g>) -> Result<Document<'g>, Error> {
        let Some(license_index) = document.first_comment_index() else {
            bail!("No comment block found");
        };
        let license = &document.segments()[license_index];
        if let Some(comment) = license.as_comment() {
            let result = classify(comment);
            if !result.is_license && !result.is_copyright {
                bail!("First comment block is not the license/copyright block");
            }
        }

        let package_line = document
            .segments()
            .iter()
            .filter_map(Segment::as_data)
            .flat_map(DataSegment::lines)
            .find(|line| PACKAGE_RE.is_match(line));

        let mut package_block = DataSegment::new();
        if self.license_on_top {
            package_block.push_line("");
        }
        if let Some(line) = package_line {
            package_block.push_line(line);
            package_block.push_line("");
        }

        let mut arranged = Document::new();
        let mut pending = DataSegment::new();
        if self.license_on_top {
            arranged.push(license.clone());
            arranged.push(Segment::Data(package_block));
        } else {
            arranged.push(Segment::Data(package_block));
            arranged.push(license.clone());
            pending.push_line("");
        }

        // `None` once the import section has been written out.
        let mut pending = Some(pending);
        let mut import_start = false;
        let mut import_end = false;

        for (index, segment) in document.segments().iter().enumerate() {
            if index == license_index {
                continue;
            }

            let data = match segment {
                Segment::Comment(_) => {
                    if let Some(block) = pending.take() {
                        arranged.push(Segment::Data(block));
                        pending = Some(DataSegment::new());
                    }
                    arranged.push(segment.clone());
                    continue;
                }
                Segment::Data(data) => data,
            };

            if import_end {
                arranged.push(segment.clone());
                continue;
            }

            let block = pending.get_or_insert_with(DataSegment::new);
            for line in data.lines() {
                if PACKAGE_RE.is_match(line) {
                    continue;
                }

                if !import_end {
                    if !import_start {
                        if is_blank(line) {
                            continue;
                        }
                        if IMPORT_RE.is_match(line) {
                            import_start = true;
                        } else if !LINE_COMMENT_RE.is_match(line) {
                            // No imports at all.
                            import_start = true;
                            import_end = true;
                        } else {
                            bail!("Strange line found between imports: {}", line);
                        }
                    } else if !(is_blank(line)
                        || LINE_COMMENT_RE.is_match(line)
                        || IMPORT_RE.is_match(line))
                    {
                        import_end = true;
                    }
                }

                block.push_line(line);
            }

            if import_end {
                if let Some(block) = pending.take() {
                    arranged.push(Segment::Data(block));
                }
            }
        }

        if let Some(block) = pending {
            arranged.push(Segment::Data(block));
        }
        arranged.set_missing_final_newline(document.missing_final_newline());
        Ok(arranged)
    }
}

impl Action for JavaTopAction {
    fn name(&self) -> &'static str {
        "java-top"
    }

    fn apply(&self, file: &SourceFile<'_>) -> Result<ActionOutcome, Error> {
        if file.language != Some(LanguageTag::Java) {
            return Ok(ActionOutcome::default());
        }

        let document = split_text(file.grammar, file.text);
        let rendered = self.arrange(&document)?.render();
        if rendered == file.text {
            return Ok(ActionOutcome::default());
        }
        Ok(ActionOutcome::rewrite(Finding::Reformatted, rendered))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar::grammar_for;

    const HEADER: &str = "/*\n * Copyright 2020 Example Corp\n */\n";

    fn java_top(license_on_top: bool, text: &str) -> Result<ActionOutcome, Error> {
        JavaTopAction::new(license_on_top).apply(&SourceFile::new(
            Some(LanguageTag::Java),
            grammar_for(LanguageTag::Java),
            text,
        ))
    }

    #[test]
    fn test_package_moves_above_license() {
        let text = format!(
            "{}package org.example;\n\nimport java.util.List;\n\npublic class A {{}}\n",
            HEADER
        );
        let outcome = java_top(false, &text).unwrap();

        let expected = format!(
            "package org.example;\n\n{}\nimport java.util.List;\n\npublic class A {{}}\n",
            HEADER
        );
        assert_eq!(outcome.findings, [Finding::Reformatted]);
        assert_eq!(outcome.rewrite.as_deref(), Some(expected.as_str()));

        assert_eq!(java_top(false, &expected).unwrap(), ActionOutcome::default());
    }

    #[test]
    fn test_license_on_top() {
        let text = format!(
            "package org.example;\n{}import java.util.List;\nclass A {{}}\n",
            HEADER
        );
        let outcome = java_top(true, &text).unwrap();

        let expected = format!(
            "{}\npackage org.example;\n\nimport java.util.List;\nclass A {{}}\n",
            HEADER
        );
        assert_eq!(outcome.rewrite.as_deref(), Some(expected.as_str()));
        assert_eq!(java_top(true, &expected).unwrap(), ActionOutcome::default());
    }

    #[test]
    fn test_class_without_imports() {
        let text = format!("{}\n\nclass A {{}}\n", HEADER);
        let outcome = java_top(true, &text).unwrap();
        assert_eq!(
            outcome.rewrite.as_deref(),
            Some(format!("{}\nclass A {{}}\n", HEADER).as_str())
        );
    }

    #[test]
    fn test_first_comment_must_be_license() {
        let error = java_top(false, "/*\n * Some notes\n */\nclass A {}\n").unwrap_err();
        assert!(error.to_string().contains("not the license/copyright block"));

        let error = java_top(false, "class A {}\n").unwrap_err();
        assert_eq!(error.to_string(), "No comment block found");
    }

    #[test]
    fn test_line_comment_before_imports_is_rejected() {
        let text = format!("{}// stray\nimport java.util.List;\n", HEADER);
        let error = java_top(false, &text).unwrap_err();
        assert!(error.to_string().starts_with("Strange line found between imports"));
    }

    #[test]
    fn test_other_languages_are_ignored() {
        let grammar = grammar_for(LanguageTag::C);
        let outcome = JavaTopAction::default()
            .apply(&SourceFile::new(Some(LanguageTag::C), grammar, "int x;\n"))
            .unwrap();
        assert_eq!(outcome, ActionOutcome::default());
    }
}
