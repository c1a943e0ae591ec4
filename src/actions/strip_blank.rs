use anyhow::Error;

use super::{Action, ActionOutcome, SourceFile};
use crate::models::Finding;

/// Removes leading blank lines and trailing whitespace on every line.
#[derive(Debug, Default)]
pub struct StripBlankAction;

fn strip_blank(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for line in text.lines() {
        let line = line.trim_end();
        if out.is_empty() && line.is_empty() {
            continue;
        }
        out.push_str(line);
        out.push('\n');
    }
    out
}

impl Action for StripBlankAction {
    fn name(&self) -> &'static str {
        "strip-blank"
    }

    fn apply(&self, file: &SourceFile<'_>) -> Result<ActionOutcome, Error> {
        let stripped = strip_blank(file.text);
        if stripped == file.text {
            return Ok(ActionOutcome::default());
        }
        Ok(ActionOutcome::rewrite(Finding::Reformatted, stripped))
    }
}
