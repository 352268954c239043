use std::fs::{self, OpenOptions};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::error::Result;
use crate::models::{Preferences, Report, SavedReport, Task};

/// Returns the path to the saved reports file (`reports.json`).
///
/// The path is determined in the following order:
/// 1. `REPORTS_DB` environment variable.
/// 2. `~/.local/share/taskreport/reports.json` (on Linux).
/// 3. `./reports.json` (fallback).
pub fn reports_path() -> PathBuf {
    std::env::var("REPORTS_DB").map(PathBuf::from).unwrap_or_else(|_| {
        let mut p = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
        p.push("taskreport");
        p.push("reports.json");
        p
    })
}

fn read_file(path: &Path) -> std::io::Result<String> {
    let mut f = OpenOptions::new().read(true).open(path)?;
    let mut s = String::new();
    f.read_to_string(&mut s)?;
    Ok(s)
}

/// Loads a JSON array of task records exported by the task tracker.
///
/// Records that cannot be read as tasks are skipped with a warning so that a
/// single corrupt entry does not block the whole report.
pub fn load_task_file(path: &Path) -> Result<Vec<Task>> {
    let raw: Vec<serde_json::Value> = serde_json::from_str(&read_file(path)?)?;
    let total = raw.len();
    let tasks: Vec<Task> = raw
        .into_iter()
        .enumerate()
        .filter_map(|(idx, value)| match serde_json::from_value::<Task>(value) {
            Ok(task) => Some(task),
            Err(e) => {
                warn!(file = %path.display(), index = idx, error = %e, "skipping bad task record");
                None
            }
        })
        .collect();
    let skipped = total - tasks.len();
    info!(file = %path.display(), loaded = tasks.len(), skipped, "loaded tasks");
    Ok(tasks)
}

#[derive(Serialize, Deserialize, Debug, Default)]
struct StoreFile {
    #[serde(default)]
    reports: Vec<SavedReport>,
    #[serde(default)]
    preferences: Preferences,
}

#[derive(Deserialize)]
struct RawStoreFile {
    #[serde(default)]
    reports: Vec<serde_json::Value>,
    #[serde(default)]
    preferences: serde_json::Value,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum StoreContents {
    Legacy(Vec<serde_json::Value>),
    Full(RawStoreFile),
}

impl StoreContents {
    /// Reads reports one at a time so that a bad record only costs itself.
    fn into_store(self, path: &Path) -> StoreFile {
        let (raw_reports, raw_prefs) = match self {
            StoreContents::Legacy(reports) => (reports, serde_json::Value::Null),
            StoreContents::Full(file) => (file.reports, file.preferences),
        };
        let reports = raw_reports
            .into_iter()
            .enumerate()
            .filter_map(|(idx, value)| match serde_json::from_value::<SavedReport>(value) {
                Ok(report) => Some(report),
                Err(e) => {
                    warn!(file = %path.display(), index = idx, error = %e, "skipping bad report");
                    None
                }
            })
            .collect();
        let preferences = if raw_prefs.is_null() {
            Preferences::default()
        } else {
            serde_json::from_value(raw_prefs).unwrap_or_else(|e| {
                warn!(file = %path.display(), error = %e, "ignoring malformed preferences");
                Preferences::default()
            })
        };
        StoreFile { reports, preferences }
    }
}

impl SavedReport {
    /// Wraps a freshly generated report for saving. The id is assigned on save.
    pub fn from_report(report: &Report, name: impl Into<String>, include_notes: bool) -> Self {
        SavedReport {
            id: String::new(),
            name: name.into(),
            text: report.text.clone(),
            start_date: report.start_date.clone(),
            end_date: report.end_date.clone(),
            include_notes,
            total_tasks: report.total_tasks,
            generated_at: report.generated_at.clone(),
            saved_at: String::new(),
        }
    }
}

fn read_store(path: &Path) -> Result<StoreContents> {
    Ok(serde_json::from_str(&read_file(path)?)?)
}

/// Saved reports and preferences, persisted to a single JSON file.
#[derive(Debug)]
pub struct ReportStore {
    path: PathBuf,
    data: StoreFile,
}

impl ReportStore {
    /// Opens the store at the default location.
    pub fn open_default() -> Self {
        Self::load(reports_path())
    }

    /// Loads the store from `path`.
    ///
    /// A missing file gives an empty store. So does a file that cannot be read
    /// or parsed; the error is logged and the file is left untouched until the
    /// next save. Individual reports that cannot be read are skipped.
    pub fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let data = if path.exists() {
            match read_store(&path) {
                Ok(contents) => contents.into_store(&path),
                Err(e) => {
                    error!(file = %path.display(), error = %e, "error loading reports");
                    StoreFile::default()
                }
            }
        } else {
            StoreFile::default()
        };
        ReportStore { path, data }
    }

    /// File backing this store.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self) -> Result<()> {
        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir)?;
        }
        let s = serde_json::to_string_pretty(&self.data)?;
        let mut f = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(&self.path)?;
        f.write_all(s.as_bytes())?;
        info!(file = %self.path.display(), reports = self.data.reports.len(), "persisted reports");
        Ok(())
    }

    /// Saves a new report or replaces the one with the same id.
    ///
    /// New reports get a generated id and go to the front of the list.
    pub fn save_report(&mut self, mut report: SavedReport) -> Result<SavedReport> {
        if report.id.is_empty() {
            report.id = format!("report-{}", Uuid::new_v4().simple());
        }
        report.saved_at = Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true);

        if let Some(existing) = self.data.reports.iter_mut().find(|r| r.id == report.id) {
            *existing = report.clone();
        } else {
            self.data.reports.insert(0, report.clone());
        }
        self.persist()?;
        Ok(report)
    }

    /// Deletes a report by id. Returns `false` if it was not found.
    pub fn delete_report(&mut self, id: &str) -> Result<bool> {
        match self.data.reports.iter().position(|r| r.id == id) {
            Some(idx) => {
                self.data.reports.remove(idx);
                self.persist()?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Deletes every report whose id is listed. Returns how many were removed.
    pub fn delete_reports<S: AsRef<str>>(&mut self, ids: &[S]) -> Result<usize> {
        let before = self.data.reports.len();
        self.data
            .reports
            .retain(|r| !ids.iter().any(|id| id.as_ref() == r.id));
        let deleted = before - self.data.reports.len();
        if deleted > 0 {
            self.persist()?;
        }
        Ok(deleted)
    }

    /// All saved reports, newest first.
    pub fn reports(&self) -> &[SavedReport] {
        &self.data.reports
    }

    pub fn report(&self, id: &str) -> Option<&SavedReport> {
        self.data.reports.iter().find(|r| r.id == id)
    }

    pub fn preferences(&self) -> &Preferences {
        &self.data.preferences
    }

    pub fn set_preferences(&mut self, preferences: Preferences) -> Result<()> {
        self.data.preferences = preferences;
        self.persist()
    }
}
