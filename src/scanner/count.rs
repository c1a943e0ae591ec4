use crate::utils::file::is_path_excluded;
use glob::Pattern;
use std::fs;
use std::path::Path;

/// Counts `(files, directories, excluded)` below `path`, applying the same
/// exclusion and depth rules as [`process`](super::process). The root itself
/// is never excluded.
pub fn count<P: AsRef<Path>>(
    path: P,
    max_depth: usize,
    exclude_patterns: &[Pattern],
) -> std::io::Result<(usize, usize, usize)> {
    let path = path.as_ref();

    if path.is_file() {
        return Ok((1, 0, 0));
    }

    let mut files_count = 0;
    let mut dirs_count = 1; // Count the current directory
    let mut excluded_count = 0;

    for entry in fs::read_dir(path)? {
        let entry = entry?;
        let entry_path = entry.path();

        if is_path_excluded(&entry_path, exclude_patterns) {
            excluded_count += 1;
            continue;
        }

        let metadata = entry.metadata()?;
        if metadata.is_file() {
            files_count += 1;
        } else if metadata.is_dir() && max_depth > 0 {
            let (sub_files, sub_dirs, sub_excluded) =
                count(&entry_path, max_depth - 1, exclude_patterns)?;

            files_count += sub_files;
            dirs_count += sub_dirs;
            excluded_count += sub_excluded;
        } else if metadata.is_dir() {
            dirs_count += 1;
        }
    }

    Ok((files_count, dirs_count, excluded_count))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::file::{DEFAULT_EXCLUDES, compile_exclude_patterns};
    use tempfile::TempDir;

    #[test]
    fn test_count_respects_excludes_and_depth() {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        fs::create_dir_all(root.join("src/deep")).unwrap();
        fs::create_dir_all(root.join(".git")).unwrap();
        fs::write(root.join("build.sh"), "echo\n").unwrap();
        fs::write(root.join("src/A.java"), "class A {}\n").unwrap();
        fs::write(root.join("src/A.java~"), "class A {}\n").unwrap();
        fs::write(root.join("src/deep/b.py"), "pass\n").unwrap();

        let patterns = compile_exclude_patterns(DEFAULT_EXCLUDES);
        assert_eq!(count(root, 50, &patterns).unwrap(), (3, 3, 2));
        assert_eq!(count(root, 1, &patterns).unwrap(), (2, 3, 2));
    }
}
