use anyhow::Error;
use log::debug;

use super::{Action, ActionOutcome, SourceFile};
use crate::license::classify;
use crate::models::Finding;
use crate::segment::split_text;

/// Classifies the first comment block of each file.
#[derive(Debug, Default)]
pub struct ListAction;

impl Action for ListAction {
    fn name(&self) -> &'static str {
        "list"
    }

    fn apply(&self, file: &SourceFile<'_>) -> Result<ActionOutcome, Error> {
        let document = split_text(file.grammar, file.text);
        let Some(comment) = document.first_comment() else {
            return Ok(ActionOutcome::report(vec![Finding::NoCommentBlock]));
        };

        let result = classify(comment);
        debug!("Classified {} comment lines: {}", comment.len(), result);

        let mut findings = Vec::new();
        if !result.is_copyright {
            findings.push(Finding::NoCopyright);
        }
        match (result.is_license, result.license_id) {
            (false, _) => findings.push(Finding::NoLicense),
            (true, None) => findings.push(Finding::UnknownLicense),
            (true, Some(license_id)) => findings.push(Finding::Licensed { license_id }),
        }
        Ok(ActionOutcome::report(findings))
    }
}
