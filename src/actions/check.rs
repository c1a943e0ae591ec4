use anyhow::Error;
use log::debug;

use super::{Action, ActionOutcome, SourceFile};
use crate::license::ReferenceLicense;
use crate::models::Finding;
use crate::segment::split_text;

/// Compares each file's first comment block against a reference license.
#[derive(Debug)]
pub struct CheckAction {
    reference: ReferenceLicense<'static>,
}

impl CheckAction {
    pub fn new(reference: ReferenceLicense<'static>) -> Self {
        Self { reference }
    }
}

impl Action for CheckAction {
    fn name(&self) -> &'static str {
        "check"
    }

    fn apply(&self, file: &SourceFile<'_>) -> Result<ActionOutcome, Error> {
        let document = split_text(file.grammar, file.text);
        let Some(comment) = document.first_comment() else {
            return Ok(ActionOutcome::report(vec![Finding::NoCommentBlock]));
        };

        let deviations = self.reference.compare(comment);
        debug!("{} deviations from the reference license", deviations.len());

        Ok(ActionOutcome::report(
            deviations
                .into_iter()
                .map(|deviation| Finding::Deviation { deviation })
                .collect(),
        ))
    }
}
