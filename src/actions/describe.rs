use anyhow::Error;

use super::{Action, ActionOutcome, SourceFile};
use crate::models::Finding;

/// Reports the detected language of every file.
#[derive(Debug, Default)]
pub struct DescribeAction;

impl Action for DescribeAction {
    fn name(&self) -> &'static str {
        "describe"
    }

    fn requires_comment_syntax(&self) -> bool {
        false
    }

    fn reads_content(&self) -> bool {
        false
    }

    fn apply(&self, file: &SourceFile<'_>) -> Result<ActionOutcome, Error> {
        Ok(ActionOutcome::report(vec![Finding::FileType {
            language: file.language,
        }]))
    }
}
