use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::fs;
use std::path::{Path, PathBuf};

const HISTORY_FILENAME: &str = "print_history.json";

/// One request handled by the print API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobRecord {
    pub at: DateTime<Local>,
    /// Route that received the job, e.g. `/print/qr`.
    pub endpoint: String,
    /// Short rendering of the payload.
    pub detail: String,
    pub http_status: u16,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl JobRecord {
    pub fn printed(endpoint: &str, detail: impl Into<String>) -> Self {
        Self {
            at: Local::now(),
            endpoint: endpoint.to_string(),
            detail: detail.into(),
            http_status: 200,
            error: None,
        }
    }

    pub fn failed(
        endpoint: &str,
        detail: impl Into<String>,
        http_status: u16,
        error: impl Into<String>,
    ) -> Self {
        Self {
            at: Local::now(),
            endpoint: endpoint.to_string(),
            detail: detail.into(),
            http_status,
            error: Some(error.into()),
        }
    }

    pub fn succeeded(&self) -> bool {
        self.error.is_none()
    }
}

/// Bounded job history shared by the server and the panel. Persisted as a
/// JSON array, oldest first, when a history file is attached.
#[derive(Debug)]
pub struct PrintLog {
    records: VecDeque<JobRecord>,
    capacity: usize,
    history_file: Option<PathBuf>,
}

impl PrintLog {
    pub fn new(capacity: usize) -> Self {
        Self {
            records: VecDeque::with_capacity(capacity),
            capacity,
            history_file: None,
        }
    }

    pub fn history_path() -> PathBuf {
        std::env::current_exe()
            .ok()
            .and_then(|p| p.parent().map(|p| p.to_path_buf()))
            .unwrap_or_else(|| PathBuf::from("."))
            .join(HISTORY_FILENAME)
    }

    /// Restores history from `path` and keeps writing to it. Unreadable
    /// files start an empty history.
    pub fn open(path: PathBuf, capacity: usize) -> Self {
        let mut log = Self::new(capacity);
        match read_history(&path) {
            Ok(records) => {
                for record in records {
                    log.push(record);
                }
            }
            Err(e) if path.exists() => log::warn!("Print history {:?} ignored: {}", path, e),
            Err(_) => {}
        }
        log.history_file = Some(path);
        log
    }

    pub fn record(&mut self, record: JobRecord) {
        self.push(record);
        if let Some(path) = &self.history_file {
            if let Err(e) = write_history(path, &self.records) {
                log::warn!("Failed to write print history {:?}: {}", path, e);
            }
        }
    }

    fn push(&mut self, record: JobRecord) {
        if self.capacity == 0 {
            return;
        }
        if self.records.len() == self.capacity {
            self.records.pop_front();
        }
        self.records.push_back(record);
    }

    /// Newest first.
    pub fn recent(&self) -> impl Iterator<Item = &JobRecord> {
        self.records.iter().rev()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

fn read_history(path: &Path) -> Result<Vec<JobRecord>, Box<dyn std::error::Error>> {
    let contents = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&contents)?)
}

fn write_history(
    path: &Path,
    records: &VecDeque<JobRecord>,
) -> Result<(), Box<dyn std::error::Error>> {
    fs::write(path, serde_json::to_string_pretty(records)?)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recent_is_newest_first_and_bounded() {
        let mut log = PrintLog::new(2);
        log.record(JobRecord::printed("/print", "first"));
        log.record(JobRecord::failed("/print/qr", "second", 500, "paper out"));
        log.record(JobRecord::printed("/print/barcode", "third"));

        let endpoints: Vec<_> = log.recent().map(|r| r.endpoint.as_str()).collect();
        assert_eq!(endpoints, vec!["/print/barcode", "/print/qr"]);
    }

    #[test]
    fn test_failed_record_keeps_status_and_reason() {
        let mut log = PrintLog::new(10);
        log.record(JobRecord::failed("/print/image-url", "x", 502, "Download error"));

        let record = log.recent().next().unwrap();
        assert!(!record.succeeded());
        assert_eq!(record.http_status, 502);
        assert_eq!(record.error.as_deref(), Some("Download error"));
    }

    #[test]
    fn test_history_survives_reopen() {
        let path = std::env::temp_dir().join(format!("print-history-{}.json", std::process::id()));
        let _ = fs::remove_file(&path);

        let mut log = PrintLog::open(path.clone(), 3);
        log.record(JobRecord::printed("/print", "Hello"));
        log.record(JobRecord::failed("/print/barcode", "abc", 400, "invalid EAN13"));

        let reopened = PrintLog::open(path.clone(), 1);
        let records: Vec<_> = reopened.recent().cloned().collect();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].endpoint, "/print/barcode");
        assert_eq!(records[0].http_status, 400);

        let json: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert!(json[0].get("error").is_none());
        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_corrupt_history_starts_empty() {
        let path = std::env::temp_dir().join(format!("print-history-bad-{}.json", std::process::id()));
        fs::write(&path, "not json").unwrap();

        let log = PrintLog::open(path.clone(), 5);
        assert!(log.is_empty());
        fs::remove_file(&path).unwrap();
    }
}
