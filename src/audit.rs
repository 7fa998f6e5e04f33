//! Append-only audit log of recognized commands.
//!
//! One line per command: `YYYY-MM-DD HH:MM:SS: Received "<command>" command`.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::{Local, NaiveDateTime};
use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;
use tokio::sync::mpsc;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Formats one audit line, newline included.
pub fn audit_line(at: NaiveDateTime, command: &str) -> String {
    format!("{}: Received \"{}\" command\n", at.format(TIMESTAMP_FORMAT), command)
}

/// Handle to the audit log. Clones share one writer task, so lines land
/// in the order `record` was called.
#[derive(Debug, Clone)]
pub struct AuditLog {
    path: Arc<PathBuf>,
    lines: mpsc::UnboundedSender<String>,
}

impl AuditLog {
    /// Spawns the writer task; must be called inside a Tokio runtime.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = Arc::new(path.into());
        let (lines, rx) = mpsc::unbounded_channel();
        tokio::spawn(write_loop(Arc::clone(&path), rx));
        Self { path, lines }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Queues a line for `command`, timestamped now. Never waits on the file.
    pub fn record(&self, command: &str) {
        let line = audit_line(Local::now().naive_local(), command);
        if self.lines.send(line).is_err() {
            tracing::warn!(path = %self.path.display(), "Audit log writer has stopped");
        }
    }
}

/// Appends queued lines until every handle is dropped. Write failures are
/// logged and the line is lost.
async fn write_loop(path: Arc<PathBuf>, mut lines: mpsc::UnboundedReceiver<String>) {
    while let Some(line) = lines.recv().await {
        if let Err(e) = append_line(&path, &line).await {
            tracing::warn!(error = %e, path = %path.display(), "Failed to write audit log");
        }
    }
}

async fn append_line(path: &Path, line: &str) -> std::io::Result<()> {
    let mut file = OpenOptions::new().create(true).append(true).open(path).await?;
    file.write_all(line.as_bytes()).await?;
    file.flush().await
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use std::time::Duration;

    #[test]
    fn test_audit_line_format() {
        let at = NaiveDate::from_ymd_opt(2024, 3, 10)
            .unwrap()
            .and_hms_opt(9, 5, 7)
            .unwrap();
        assert_eq!(
            audit_line(at, "exchange 3"),
            "2024-03-10 09:05:07: Received \"exchange 3\" command\n"
        );
    }

    /// Polls `path` until it holds `count` lines.
    async fn read_lines(path: &Path, count: usize) -> Vec<String> {
        let mut lines = Vec::new();
        for _ in 0..100 {
            let contents = tokio::fs::read_to_string(path).await.unwrap_or_default();
            lines = contents.lines().map(String::from).collect();
            if lines.len() >= count {
                break;
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
        lines
    }

    #[tokio::test]
    async fn test_record_writes_in_background() {
        let dir = tempfile::tempdir().unwrap();
        let log = AuditLog::new(dir.path().join("log.txt"));

        log.record("exchange");

        let lines = read_lines(log.path(), 1).await;
        assert_eq!(lines.len(), 1);
        assert!(lines[0].ends_with(": Received \"exchange\" command"));
    }

    #[tokio::test]
    async fn test_records_keep_call_order() {
        let dir = tempfile::tempdir().unwrap();
        let log = AuditLog::new(dir.path().join("log.txt"));

        let clones: Vec<AuditLog> = (0..4).map(|_| log.clone()).collect();
        for i in 0..40 {
            clones[i % clones.len()].record(&format!("exchange {}", i % 10 + 1));
        }

        let lines = read_lines(log.path(), 40).await;
        assert_eq!(lines.len(), 40);
        for (i, line) in lines.iter().enumerate() {
            let expected = format!(": Received \"exchange {}\" command", i % 10 + 1);
            assert!(line.ends_with(&expected), "line {i}: {line}");
        }
    }

    #[tokio::test]
    async fn test_unwritable_path_does_not_panic() {
        let dir = tempfile::tempdir().unwrap();
        let log = AuditLog::new(dir.path().join("missing").join("log.txt"));

        log.record("exchange");
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(!log.path().exists());

        // The writer keeps running after a failed write.
        log.record("exchange 1");
        tokio::time::sleep(Duration::from_millis(50)).await;
    }
}
