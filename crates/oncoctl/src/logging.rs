//! Logging for oncoctl invocations
//!
//! One JSON line per command, written to an XDG state file with a fallback
//! chain. Never fails the command.

use serde::{Deserialize, Serialize};
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Log entry for each oncoctl invocation
#[derive(Debug, Serialize, Deserialize)]
pub struct LogEntry {
    /// RFC 3339 timestamp
    pub ts: String,

    /// Request ID (UUID)
    pub req_id: String,

    /// Command name
    pub command: String,

    #[serde(default)]
    pub args: Vec<String>,

    pub exit_code: i32,

    pub duration_ms: u64,

    pub ok: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorDetails>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorDetails {
    pub code: String,
    pub message: String,
}

impl LogEntry {
    pub fn new(command: &str, args: Vec<String>) -> Self {
        Self {
            ts: Self::now(),
            req_id: Self::generate_req_id(),
            command: command.to_string(),
            args,
            exit_code: 0,
            duration_ms: 0,
            ok: true,
            error: None,
        }
    }

    /// Discover log file path with fallback chain
    ///
    /// Priority:
    /// 1. $ONCOCTL_LOG_FILE (explicit override)
    /// 2. $XDG_STATE_HOME/oncodetect/ctl.jsonl
    /// 3. ~/.local/state/oncodetect/ctl.jsonl
    pub fn discover_log_path<F>(lookup: F) -> Option<PathBuf>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(path) = lookup("ONCOCTL_LOG_FILE") {
            return Some(PathBuf::from(path));
        }

        if let Some(xdg_state) = lookup("XDG_STATE_HOME") {
            return Some(Path::new(&xdg_state).join("oncodetect/ctl.jsonl"));
        }

        lookup("HOME").map(|home| Path::new(&home).join(".local/state/oncodetect/ctl.jsonl"))
    }

    /// Write log entry to file, falling back to stderr on failure
    pub fn write(&self) -> Result<(), std::io::Error> {
        let json = serde_json::to_string(self)?;

        let path = Self::discover_log_path(|var| std::env::var(var).ok());
        if let Some(path) = path {
            if Self::write_to_file(&json, &path).is_ok() {
                return Ok(());
            }
        }

        eprintln!("{}", json);
        Ok(())
    }

    fn write_to_file(json: &str, path: &Path) -> Result<(), std::io::Error> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let mut file = OpenOptions::new().create(true).append(true).open(path)?;

        writeln!(file, "{}", json)?;
        Ok(())
    }

    pub fn generate_req_id() -> String {
        uuid::Uuid::new_v4().to_string()
    }

    pub fn now() -> String {
        chrono::Utc::now().to_rfc3339()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_log_path_priority() {
        assert_eq!(
            LogEntry::discover_log_path(lookup(&[
                ("ONCOCTL_LOG_FILE", "/tmp/ctl.jsonl"),
                ("XDG_STATE_HOME", "/state"),
            ])),
            Some(PathBuf::from("/tmp/ctl.jsonl"))
        );
        assert_eq!(
            LogEntry::discover_log_path(lookup(&[("XDG_STATE_HOME", "/state"), ("HOME", "/home/u")])),
            Some(PathBuf::from("/state/oncodetect/ctl.jsonl"))
        );
        assert_eq!(
            LogEntry::discover_log_path(lookup(&[("HOME", "/home/u")])),
            Some(PathBuf::from("/home/u/.local/state/oncodetect/ctl.jsonl"))
        );
        assert_eq!(LogEntry::discover_log_path(lookup(&[])), None);
    }

    #[test]
    fn test_entry_appends_jsonl() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/ctl.jsonl");

        let mut entry = LogEntry::new("predict", vec!["scan.png".to_string()]);
        entry.exit_code = 70;
        entry.ok = false;
        entry.error = Some(ErrorDetails {
            code: "server_unavailable".to_string(),
            message: "connection refused".to_string(),
        });
        let json = serde_json::to_string(&entry).unwrap();

        LogEntry::write_to_file(&json, &path).unwrap();
        LogEntry::write_to_file(&json, &path).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 2);
        let parsed: LogEntry = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(parsed.exit_code, 70);
        assert_eq!(parsed.error.unwrap().code, "server_unavailable");
    }
}
