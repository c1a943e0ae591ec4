use crate::actions::{Action, SourceFile};
use crate::grammar::{
    GrammarDefinition, LanguageTag, detect_language_tag, grammar_for, no_comment_syntax,
};
use crate::models::FileReport;
use crate::scanner::ProcessResult;
use crate::utils::file::{is_path_excluded, save_with_backup};
use anyhow::Error;
use content_inspector::{ContentType, inspect};
use glob::Pattern;
use indicatif::ProgressBar;
use log::{debug, info, warn};
use rayon::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Runs `action` on every file below `path`.
///
/// Files of one directory are processed in parallel, subdirectories are
/// visited afterwards in name order. Files the action has nothing to do
/// with produce no report.
pub fn process<P: AsRef<Path>>(
    path: P,
    max_depth: usize,
    progress_bar: Arc<ProgressBar>,
    exclude_patterns: &[Pattern],
    action: &dyn Action,
) -> Result<ProcessResult, Error> {
    let path = path.as_ref();

    if path.is_file() {
        let files = process_file(path, action).into_iter().collect();
        progress_bar.inc(1);
        return Ok(ProcessResult {
            files,
            excluded_count: 0,
        });
    }

    let mut all_files = Vec::new();
    let mut total_excluded = 0;

    let mut entries: Vec<PathBuf> = fs::read_dir(path)?
        .filter_map(Result::ok)
        .map(|entry| entry.path())
        .collect();
    entries.sort();

    let mut file_entries = Vec::new();
    let mut dir_entries = Vec::new();

    for path in entries {
        if is_path_excluded(&path, exclude_patterns) {
            debug!("Excluded {}", path.display());
            total_excluded += 1;
            continue;
        }

        match fs::metadata(&path) {
            Ok(metadata) if metadata.is_file() => file_entries.push(path),
            Ok(metadata) if metadata.is_dir() => dir_entries.push(path),
            _ => continue,
        }
    }

    // Process files in parallel
    all_files.extend(
        file_entries
            .par_iter()
            .filter_map(|path| {
                let report = process_file(path, action);
                progress_bar.inc(1);
                report
            })
            .collect::<Vec<_>>(),
    );

    // Process directories
    if max_depth > 0 {
        for path in dir_entries {
            match process(
                &path,
                max_depth - 1,
                progress_bar.clone(),
                exclude_patterns,
                action,
            ) {
                Ok(mut result) => {
                    all_files.append(&mut result.files);
                    total_excluded += result.excluded_count;
                }
                Err(e) => warn!("Error processing directory {}: {}", path.display(), e),
            }
        }
    }

    Ok(ProcessResult {
        files: all_files,
        excluded_count: total_excluded,
    })
}

/// Runs `action` on a single file, saving it if the action rewrote it.
///
/// Returns `None` when the file's language has no comment syntax and the
/// action needs one. Failures end up in the report's `scan_errors`.
pub fn process_file(path: &Path, action: &dyn Action) -> Option<FileReport> {
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy())
        .unwrap_or_default();
    let language = detect_language_tag(&file_name);
    let grammar = language.map_or_else(no_comment_syntax, grammar_for);

    if action.requires_comment_syntax() && !grammar.has_comment_syntax() {
        debug!("Skipping {}: no comment syntax", path.display());
        return None;
    }

    let mut report = FileReport::new(path, language);
    if let Err(e) = apply_action(&mut report, path, language, grammar, action) {
        report.scan_errors.push(format!("{:#}", e));
    }
    Some(report)
}

fn apply_action(
    report: &mut FileReport,
    path: &Path,
    language: Option<LanguageTag>,
    grammar: &'static GrammarDefinition,
    action: &dyn Action,
) -> Result<(), Error> {
    let text = if action.reads_content() {
        let buffer = fs::read(path)?;
        if inspect(&buffer) != ContentType::UTF_8 {
            debug!("Skipping {}: not UTF-8 text", path.display());
            return Ok(());
        }
        String::from_utf8(buffer)?
    } else {
        String::new()
    };

    let outcome = action.apply(&SourceFile::new(language, grammar, &text))?;
    if let Some(content) = outcome.rewrite {
        save_with_backup(path, &content)?;
        info!("{}: {}", action.name(), path.display());
        report.modified = true;
    }
    report.findings = outcome.findings;
    Ok(())
}
