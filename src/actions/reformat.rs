use anyhow::Error;

use super::{Action, ActionOutcome, SourceFile};
use crate::models::Finding;
use crate::segment::split_text;

/// Re-renders every comment block in the grammar's canonical layout.
#[derive(Debug, Default)]
pub struct ReformatAction;

impl Action for ReformatAction {
    fn name(&self) -> &'static str {
        "reformat"
    }

    fn apply(&self, file: &SourceFile<'_>) -> Result<ActionOutcome, Error> {
        let rendered = split_text(file.grammar, file.text).render();
        if rendered == file.text {
            return Ok(ActionOutcome::default());
        }
        Ok(ActionOutcome::rewrite(Finding::Reformatted, rendered))
    }
}
