//! The code file: one known code per line.

use std::collections::BTreeSet;
use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::Path;

use anyhow::{Context, Result};
use timeclock_core::TimeLog;

const COMMENT_PREFIXES: [&str; 3] = ["#", "//", ";"];

/// Extracts codes from the file's content, skipping blanks and comments.
pub fn parse_codes(content: &str) -> Vec<String> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .filter(|line| !COMMENT_PREFIXES.iter().any(|p| line.starts_with(p)))
        .map(ToString::to_string)
        .collect()
}

/// Reads the code file. A missing file means no known codes.
pub fn load_codes(path: &Path) -> Result<Vec<String>> {
    match fs::read_to_string(path) {
        Ok(content) => Ok(parse_codes(&content)),
        Err(err) if err.kind() == ErrorKind::NotFound => {
            tracing::debug!(path = %path.display(), "no code file");
            Ok(Vec::new())
        }
        Err(err) => Err(err).with_context(|| format!("failed to read {}", path.display())),
    }
}

/// Appends `code` on its own line, creating the file if needed.
pub fn append_code(path: &Path, code: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }

    let needs_newline = fs::read_to_string(path).is_ok_and(|c| !c.is_empty() && !c.ends_with('\n'));
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("failed to open {}", path.display()))?;
    if needs_newline {
        writeln!(file).with_context(|| format!("failed to write {}", path.display()))?;
    }
    writeln!(file, "{code}").with_context(|| format!("failed to write {}", path.display()))?;

    tracing::info!(code, path = %path.display(), "recorded new code");
    Ok(())
}

/// Codes from the code file together with any the log uses, sorted.
pub fn known_codes(file_codes: &[String], log: &TimeLog) -> Vec<String> {
    file_codes
        .iter()
        .cloned()
        .chain(log.codes())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    use timeclock_core::parse_log;

    #[test]
    fn test_parse_codes_skips_blanks_and_comments() {
        let content = "Project\n  Project:Sub  \n\n# comment\n// also\n; and this\nOther\n";
        assert_eq!(parse_codes(content), ["Project", "Project:Sub", "Other"]);
    }

    #[test]
    fn test_load_codes_missing_file_is_empty() {
        let temp = tempfile::tempdir().unwrap();
        assert!(load_codes(&temp.path().join("codes.txt")).unwrap().is_empty());
    }

    #[test]
    fn test_append_code_creates_and_extends() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("conf/codes.txt");

        append_code(&path, "A").unwrap();
        fs::write(&path, "A\nB").unwrap();
        append_code(&path, "C").unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "A\nB\nC\n");
        assert_eq!(load_codes(&path).unwrap(), ["A", "B", "C"]);
    }

    #[test]
    fn test_known_codes_merges_file_and_log() {
        let log = parse_log("2023/07/06 09:00AM [Z] x\n2023/07/06 10:00AM [A] y\n").unwrap();
        let file = vec!["A".to_string(), "B:C".to_string()];
        assert_eq!(known_codes(&file, &log), ["A", "B:C", "Z"]);
    }
}
