use anyhow::{Error, bail};
use log::debug;

use super::{Action, ActionOutcome, SourceFile};
use crate::license::{ReferenceLicense, classify};
use crate::models::Finding;
use crate::segment::{Segment, split_text};

/// Which files `relicense` may touch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RelicenseMode {
    /// Replace a first comment block that contains license language.
    pub existing: bool,
    /// Insert the license into files that have none.
    pub new: bool,
}

/// Puts a reference license at the top of each file, rendered in the file's
/// own comment syntax.
#[derive(Debug)]
pub struct RelicenseAction {
    reference: ReferenceLicense<'static>,
    mode: RelicenseMode,
}

impl RelicenseAction {
    pub fn new(reference: ReferenceLicense<'static>, mode: RelicenseMode) -> Result<Self, Error> {
        if !mode.existing && !mode.new {
            bail!("No action has been selected: choose existing and/or new files");
        }
        Ok(Self { reference, mode })
    }
}

impl Action for RelicenseAction {
    fn name(&self) -> &'static str {
        "relicense"
    }

    fn apply(&self, file: &SourceFile<'_>) -> Result<ActionOutcome, Error> {
        let mut document = split_text(file.grammar, file.text);
        let replacement = Segment::Comment(self.reference.comment().retarget(file.grammar));

        let licensed_index = document
            .first_comment_index()
            .filter(|&index| {
                document.segments()[index]
                    .as_comment()
                    .is_some_and(|comment| classify(comment).is_license)
            });

        match licensed_index {
            Some(index) if self.mode.existing => {
                let previous = document.replace(index, replacement);
                if previous.render() == document.segments()[index].render() {
                    debug!("License is already up to date");
                    return Ok(ActionOutcome::default());
                }
                Ok(ActionOutcome::rewrite(Finding::LicenseReplaced, document.render()))
            }
            None if self.mode.new => {
                document.insert(0, replacement);
                Ok(ActionOutcome::rewrite(Finding::LicenseAdded, document.render()))
            }
            _ => Ok(ActionOutcome::default()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar::{LanguageTag, grammar_for};

    const LICENSE: &str = "Copyright 2021 Example Corp\n\nLicensed under the MIT License\n";

    fn action(existing: bool, new: bool) -> RelicenseAction {
        let reference =
            ReferenceLicense::from_text(grammar_for(LanguageTag::Text), LICENSE).unwrap();
        RelicenseAction::new(reference, RelicenseMode { existing, new }).unwrap()
    }

    fn relicense(action: &RelicenseAction, tag: LanguageTag, text: &str) -> ActionOutcome {
        action
            .apply(&SourceFile::new(Some(tag), grammar_for(tag), text))
            .unwrap()
    }

    #[test]
    fn test_mode_is_required() {
        let reference =
            ReferenceLicense::from_text(grammar_for(LanguageTag::Text), LICENSE).unwrap();
        assert!(RelicenseAction::new(reference, RelicenseMode::default()).is_err());
    }

    #[test]
    fn test_insert_into_unlicensed_file() {
        let outcome = relicense(&action(false, true), LanguageTag::Sh, "echo hello\n");
        assert_eq!(outcome.findings, [Finding::LicenseAdded]);
        assert_eq!(
            outcome.rewrite.as_deref(),
            Some("# Copyright 2021 Example Corp\n#\n# Licensed under the MIT License\necho hello\n")
        );
    }

    #[test]
    fn test_insert_keeps_unlicensed_comment() {
        let outcome = relicense(
            &action(true, true),
            LanguageTag::Java,
            "/*\n * Helper class\n */\nclass A {}\n",
        );
        assert_eq!(outcome.findings, [Finding::LicenseAdded]);
        assert_eq!(
            outcome.rewrite.as_deref(),
            Some(
                "/*\n * Copyright 2021 Example Corp\n *\n * Licensed under the MIT License\n */\n/*\n * Helper class\n */\nclass A {}\n"
            )
        );
    }

    #[test]
    fn test_replace_existing_license() {
        let outcome = relicense(
            &action(true, false),
            LanguageTag::Java,
            "/*\n * Copyright 2020 Example Corp\n * Licensed under the Apache License, Version 2.0\n */\nclass A {}\n",
        );
        assert_eq!(outcome.findings, [Finding::LicenseReplaced]);
        assert_eq!(
            outcome.rewrite.as_deref(),
            Some(
                "/*\n * Copyright 2021 Example Corp\n *\n * Licensed under the MIT License\n */\nclass A {}\n"
            )
        );
    }

    #[test]
    fn test_existing_only_skips_unlicensed_files() {
        let outcome = relicense(&action(true, false), LanguageTag::Python, "import os\n");
        assert_eq!(outcome, ActionOutcome::default());
    }

    #[test]
    fn test_new_only_skips_licensed_files() {
        let outcome = relicense(
            &action(false, true),
            LanguageTag::Sh,
            "# Licensed under the Apache License, Version 2.0\necho\n",
        );
        assert_eq!(outcome, ActionOutcome::default());
    }

    #[test]
    fn test_up_to_date_license_is_left_alone() {
        let outcome = relicense(
            &action(true, false),
            LanguageTag::Sh,
            "# Copyright 2021 Example Corp\n#\n# Licensed under the MIT License\necho\n",
        );
        assert_eq!(outcome, ActionOutcome::default());
    }

    #[test]
    fn test_replacement_uses_reference_layout() {
        let outcome = relicense(
            &action(true, false),
            LanguageTag::Python,
            "    # Licensed under the Apache License, Version 2.0\n    pass\n",
        );
        assert_eq!(
            outcome.rewrite.as_deref(),
            Some("# Copyright 2021 Example Corp\n#\n# Licensed under the MIT License\n    pass\n")
        );
    }
}
