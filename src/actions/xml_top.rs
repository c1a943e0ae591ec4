use anyhow::Error;
use regex::Regex;
use std::sync::LazyLock;

use super::{Action, ActionOutcome, SourceFile};
use crate::grammar::LanguageTag;
use crate::models::Finding;
use crate::segment::{DataSegment, Document, Segment, is_blank, split_text};

static XML_DECLARATION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*<\?xml\s").unwrap());

const DEFAULT_DECLARATION: &str = r#"<?xml version="1.0" encoding="UTF-8"?>"#;

/// Moves the `<?xml ...?>` declaration to the first line, above any license
/// comment, inserting a UTF-8 declaration when the file has none.
#[derive(Debug, Default)]
pub struct XmlTopAction;

fn arrange<'g>(document: &Document<'g>) -> Document<'g> {
    // Only the first code block with content is searched.
    let declaration = document
        .segments()
        .iter()
        .filter_map(Segment::as_data)
        .find(|data| data.lines().iter().any(|line| !is_blank(line)))
        .and_then(|data| {
            data.lines()
                .iter()
                .find(|line| XML_DECLARATION_RE.is_match(line))
        });

    let mut head = DataSegment::new();
    head.push_line(declaration.map_or(DEFAULT_DECLARATION, String::as_str));

    let mut arranged = Document::new();
    arranged.push(Segment::Data(head));
    for segment in document.segments() {
        match segment {
            Segment::Data(data) => {
                let mut kept = DataSegment::new();
                for line in data.lines() {
                    if !XML_DECLARATION_RE.is_match(line) {
                        kept.push_line(line);
                    }
                }
                arranged.push(Segment::Data(kept));
            }
            Segment::Comment(_) => arranged.push(segment.clone()),
        }
    }
    arranged.set_missing_final_newline(document.missing_final_newline());
    arranged
}

impl Action for XmlTopAction {
    fn name(&self) -> &'static str {
        "xml-top"
    }

    fn apply(&self, file: &SourceFile<'_>) -> Result<ActionOutcome, Error> {
        if !matches!(file.language, Some(LanguageTag::Xml | LanguageTag::Jelly)) {
            return Ok(ActionOutcome::default());
        }

        let rendered = arrange(&split_text(file.grammar, file.text)).render();
        if rendered == file.text {
            return Ok(ActionOutcome::default());
        }
        Ok(ActionOutcome::rewrite(Finding::Reformatted, rendered))
    }
}
