use std::fmt;
use std::fs::{self, OpenOptions};
use std::io::Write;

use chrono::Utc;

use crate::io::paths::DataPaths;

/// Trim the advisory log once it grows past this
const MAX_LOG_BYTES: u64 = 256 * 1024;

/// What produced an advisory entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogCategory {
    Fetch,
    Push,
    Local,
}

impl fmt::Display for LogCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LogCategory::Fetch => "fetch",
            LogCategory::Push => "push",
            LogCategory::Local => "local",
        };
        write!(f, "{}", name)
    }
}

/// Append a one-line entry to the sync log. Best-effort: the log must
/// never take the app down, so failures are swallowed.
pub fn append(paths: &DataPaths, category: LogCategory, message: &str) {
    append_entry(paths, category, message, None);
}

/// Append an entry carrying raw data worth keeping, such as the contents
/// of a file about to be replaced. Body lines are indented with `  | `.
pub fn append_with_body(paths: &DataPaths, category: LogCategory, message: &str, body: &str) {
    append_entry(paths, category, message, Some(body));
}

fn append_entry(paths: &DataPaths, category: LogCategory, message: &str, body: Option<&str>) {
    if paths.ensure_root().is_err() {
        return;
    }
    let path = paths.sync_log_file();

    let mut entry = format!(
        "{} [{}] {}\n",
        Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Secs, true),
        category,
        message.replace('\n', " "),
    );
    if let Some(body) = body {
        for line in body.lines() {
            entry.push_str("  | ");
            entry.push_str(line);
            entry.push('\n');
        }
    }

    let result = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .and_then(|mut f| f.write_all(entry.as_bytes()));
    if result.is_err() {
        return;
    }

    if let Ok(meta) = fs::metadata(&path)
        && meta.len() > MAX_LOG_BYTES
    {
        trim(paths);
    }
}

/// The whole log, or None when there is nothing to show
pub fn read_all(paths: &DataPaths) -> Option<String> {
    let text = fs::read_to_string(paths.sync_log_file()).ok()?;
    if text.trim().is_empty() { None } else { Some(text) }
}

/// Drop the older half of the log, keeping whole entries. An entry starts
/// at any line that is not a `  | ` body continuation.
fn trim(paths: &DataPaths) {
    let path = paths.sync_log_file();
    let Ok(text) = fs::read_to_string(&path) else {
        return;
    };
    let lines: Vec<&str> = text.lines().collect();
    let mut start = lines.len() / 2;
    while start < lines.len() && lines[start].starts_with("  | ") {
        start += 1;
    }
    let mut kept = lines[start..].join("\n");
    if !kept.is_empty() {
        kept.push('\n');
    }
    let _ = fs::write(&path, kept);
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn temp_paths() -> (TempDir, DataPaths) {
        let dir = TempDir::new().unwrap();
        let paths = DataPaths::at(dir.path());
        (dir, paths)
    }

    #[test]
    fn append_creates_and_accumulates() {
        let (_dir, paths) = temp_paths();
        assert_eq!(read_all(&paths), None);

        append(&paths, LogCategory::Push, "remote responded with HTTP 500");
        append(&paths, LogCategory::Fetch, "remote unreachable: timed out");

        let text = read_all(&paths).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].contains("[push] remote responded with HTTP 500"));
        assert!(lines[1].contains("[fetch] remote unreachable: timed out"));
    }

    #[test]
    fn body_lines_are_indented() {
        let (_dir, paths) = temp_paths();
        append_with_body(
            &paths,
            LogCategory::Local,
            "replacing unreadable tasks.json",
            "{\"not\":\n\"valid\"",
        );
        let text = read_all(&paths).unwrap();
        assert!(text.contains("[local] replacing unreadable tasks.json"));
        assert!(text.contains("  | {\"not\":"));
        assert!(text.contains("  | \"valid\""));
    }

    #[test]
    fn newlines_in_messages_are_flattened() {
        let (_dir, paths) = temp_paths();
        append(&paths, LogCategory::Fetch, "line one\nline two");
        let text = read_all(&paths).unwrap();
        assert_eq!(text.lines().count(), 1);
    }

    #[test]
    fn oversized_log_is_trimmed_to_whole_entries() {
        let (_dir, paths) = temp_paths();
        let big = "x".repeat(4096);
        for _ in 0..80 {
            append_with_body(&paths, LogCategory::Push, "retry", &big);
        }
        let len = std::fs::metadata(paths.sync_log_file()).unwrap().len();
        assert!(len <= MAX_LOG_BYTES + 8192);

        let text = read_all(&paths).unwrap();
        assert!(!text.starts_with("  | "));
    }
}
