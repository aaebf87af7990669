//! JSON snapshot output.
//!
//! The snapshot lives at a single well-known path and is fully replaced on
//! each successful run. Content is written to a sibling `.tmp` file first and
//! then renamed over the target, so readers never observe a half-written
//! document.
//!
//! # Output Structure
//!
//! ```text
//! data/
//! └── fitness-news.json
//! ```

use crate::error::HarvestError;
use crate::models::Snapshot;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{info, instrument};

fn io_err(path: &Path) -> impl FnOnce(std::io::Error) -> HarvestError + '_ {
    move |source| HarvestError::Io {
        path: path.display().to_string(),
        source,
    }
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(OsString::from)
        .unwrap_or_else(|| OsString::from("snapshot.json"));
    name.push(".tmp");
    path.with_file_name(name)
}

/// Serialize `snapshot` as pretty-printed JSON and atomically replace `path`.
///
/// # Returns
///
/// The number of bytes written.
#[instrument(level = "info", skip_all, fields(path = %path.display(), articles = snapshot.total_count))]
pub async fn write_snapshot(snapshot: &Snapshot, path: &Path) -> Result<usize, HarvestError> {
    let json = serde_json::to_string_pretty(snapshot)?;

    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        fs::create_dir_all(dir).await.map_err(io_err(dir))?;
    }

    let tmp = temp_path(path);
    fs::write(&tmp, json.as_bytes()).await.map_err(io_err(&tmp))?;
    if let Err(e) = fs::rename(&tmp, path).await {
        let _ = fs::remove_file(&tmp).await;
        return Err(io_err(path)(e));
    }

    info!(bytes = json.len(), "Wrote snapshot");
    Ok(json.len())
}

/// Read the snapshot currently on disk, if any.
pub async fn read_snapshot(path: &Path) -> Result<Option<Snapshot>, HarvestError> {
    match fs::read_to_string(path).await {
        Ok(raw) => Ok(Some(serde_json::from_str(&raw)?)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(io_err(path)(e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NewsArticle;
    use chrono::{TimeZone, Utc};

    fn snapshot(hour: u32, n: usize) -> Snapshot {
        let articles = (0..n)
            .map(|i| NewsArticle {
                title: format!("헬스장 이용 가이드 {i}편"),
                url: format!("https://n.news.naver.com/mnews/article/001/{i}"),
                description: "본문...".to_string(),
                press: "네이버뉴스".to_string(),
                thumbnail: String::new(),
                date: "2025.01.15".to_string(),
                keyword: "헬스".to_string(),
                crawled_at: "2025-01-15T06:00:00.000Z".to_string(),
            })
            .collect();
        Snapshot::new(Utc.with_ymd_and_hms(2025, 1, 15, hour, 0, 0).unwrap(), articles)
    }

    #[tokio::test]
    async fn test_write_creates_parent_and_round_trips() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("data/fitness-news.json");

        write_snapshot(&snapshot(6, 2), &path).await.unwrap();

        let back = read_snapshot(&path).await.unwrap().unwrap();
        assert_eq!(back, snapshot(6, 2));
        assert!(!temp_path(&path).exists());
    }

    #[tokio::test]
    async fn test_write_replaces_previous_snapshot() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("fitness-news.json");

        write_snapshot(&snapshot(6, 3), &path).await.unwrap();
        write_snapshot(&snapshot(7, 1), &path).await.unwrap();

        let back = read_snapshot(&path).await.unwrap().unwrap();
        assert_eq!(back.total_count, 1);
        assert_eq!(back.last_updated, "2025-01-15T07:00:00.000Z");
    }

    #[tokio::test]
    async fn test_output_is_pretty_printed_utf8() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("fitness-news.json");

        write_snapshot(&snapshot(6, 1), &path).await.unwrap();

        let raw = std::fs::read_to_string(&path).unwrap();
        assert!(raw.starts_with("{\n  \"lastUpdated\""));
        assert!(raw.contains("헬스장 이용 가이드"));
    }

    #[tokio::test]
    async fn test_read_missing_snapshot_is_none() {
        let tmp = tempfile::tempdir().unwrap();
        let missing = tmp.path().join("nope.json");
        assert!(read_snapshot(&missing).await.unwrap().is_none());
    }

    #[test]
    fn test_temp_path_is_sibling() {
        let tmp = temp_path(Path::new("data/fitness-news.json"));
        assert_eq!(tmp, PathBuf::from("data/fitness-news.json.tmp"));
    }
}
