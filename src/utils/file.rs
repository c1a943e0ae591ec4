use anyhow::{Context, Error};
use glob::{MatchOptions, Pattern};
use log::{debug, warn};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Paths skipped on every traversal: VCS metadata, dot files, editor
/// leftovers and common binary formats.
pub const DEFAULT_EXCLUDES: &[&str] = &[
    ".svn", "CVS", ".*", "*~", "#*#", "*.pyc", "*.pyo", "*.png", "*.gif", "*.jpg", "*.jpeg",
    "*.ico", "*.gz", "*.xcf",
];

const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: false,
};

/// Check if a path should be excluded based on a list of glob patterns.
///
/// Wildcards never cross a `/`, so `.*` matches dot files by name but not
/// every relative path starting with `./`.
pub fn is_path_excluded(path: &Path, exclude_patterns: &[Pattern]) -> bool {
    let path_str = path.to_string_lossy();
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy())
        .unwrap_or_default();

    for pattern in exclude_patterns {
        // Match against full path
        if pattern.matches_with(&path_str, MATCH_OPTIONS) {
            return true;
        }

        // Match against just the file/directory name
        if !file_name.is_empty() && pattern.matches_with(&file_name, MATCH_OPTIONS) {
            return true;
        }
    }

    false
}

/// Compiles glob patterns, skipping (and reporting) the invalid ones.
pub fn compile_exclude_patterns<S: AsRef<str>>(patterns: &[S]) -> Vec<Pattern> {
    patterns
        .iter()
        .filter_map(|pattern| {
            let pattern = pattern.as_ref();
            match Pattern::new(pattern) {
                Ok(compiled) => Some(compiled),
                Err(e) => {
                    warn!("Ignoring invalid exclude pattern '{}': {}", pattern, e);
                    None
                }
            }
        })
        .collect()
}

/// Reads an excludes file: one pattern per line, blank lines and lines
/// starting with `#` are skipped.
pub fn read_excludes_file(path: &Path) -> Result<Vec<String>, Error> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Could not read excludes file {}", path.display()))?;

    Ok(content
        .lines()
        .filter(|line| !line.trim().is_empty() && !line.starts_with('#'))
        .map(|line| line.trim().to_string())
        .collect())
}

/// Resolves `path` against `root` unless it is already absolute.
pub fn resolve_against(root: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        root.join(path)
    }
}

fn backup_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_os_string();
    name.push(".bak");
    PathBuf::from(name)
}

/// Replaces the file at `path` with `content`.
///
/// The old file is first moved to `<path>.bak`. If writing fails the backup
/// is moved back; on success it is removed.
pub fn save_with_backup(path: &Path, content: &str) -> Result<(), Error> {
    let backup = backup_path(path);

    match fs::remove_file(&backup) {
        Ok(()) => debug!("Removed stale backup {}", backup.display()),
        Err(e) if e.kind() == ErrorKind::NotFound => {}
        Err(e) => {
            return Err(e)
                .with_context(|| format!("Could not remove old backup {}", backup.display()));
        }
    }

    fs::rename(path, &backup)
        .with_context(|| format!("Could not create backup {}", backup.display()))?;

    if let Err(write_error) = fs::write(path, content) {
        let _ = fs::remove_file(path);
        fs::rename(&backup, path).with_context(|| {
            format!(
                "Could not write file and could not restore backup {}",
                backup.display()
            )
        })?;
        return Err(write_error).context("Could not write file, restored backup");
    }

    fs::remove_file(&backup)
        .with_context(|| format!("Could not remove backup {}", backup.display()))?;
    Ok(())
}
