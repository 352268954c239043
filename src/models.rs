use std::collections::BTreeMap;
use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};

use crate::dates::{date_from_millis, parse_date_key, to_date_key};

/// Reads a field that may be `null`, falling back to the type's default.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Identifier of a task as stored by the task tracker.
///
/// The tracker hands out both string and numeric ids, so either is accepted.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Hash)]
#[serde(untagged)]
pub enum TaskId {
    Number(i64),
    Text(String),
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TaskId::Number(n) => write!(f, "{}", n),
            TaskId::Text(s) => write!(f, "{}", s),
        }
    }
}

impl TaskId {
    /// Form used for duplicate detection: `1` and `"1"` name the same task.
    pub fn dedup_key(&self) -> String {
        self.to_string()
    }
}

impl From<&str> for TaskId {
    fn from(s: &str) -> Self {
        TaskId::Text(s.to_string())
    }
}

impl From<i64> for TaskId {
    fn from(n: i64) -> Self {
        TaskId::Number(n)
    }
}

/// A task record exported by the task tracker (archived or active).
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Unique identifier, stable across archived and active status.
    pub id: TaskId,
    /// Display title.
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    /// Whether the task has been completed.
    #[serde(default, deserialize_with = "null_as_default")]
    pub is_done: bool,
    /// Completion timestamp in epoch milliseconds.
    #[serde(default)]
    pub done_on: Option<i64>,
    /// Milliseconds of work logged per calendar day, keyed by `YYYY-MM-DD`.
    #[serde(default)]
    pub time_spent_on_day: Option<BTreeMap<String, i64>>,
    /// Free-text notes.
    #[serde(default)]
    pub notes: Option<String>,
}

impl Task {
    /// Creates an open task with no completion date, work logs or notes.
    pub fn new(id: impl Into<TaskId>, title: impl Into<String>) -> Self {
        Task {
            id: id.into(),
            title: title.into(),
            is_done: false,
            done_on: None,
            time_spent_on_day: None,
            notes: None,
        }
    }

    /// True when the work-log map is present and non-empty.
    pub fn has_work_logs(&self) -> bool {
        self.time_spent_on_day.as_ref().is_some_and(|logs| !logs.is_empty())
    }

    /// Local calendar day of completion, if the task is done and the timestamp is usable.
    pub fn completion_date(&self) -> Option<NaiveDate> {
        if !self.is_done {
            return None;
        }
        self.done_on.and_then(date_from_millis)
    }

    /// Work-log days with their durations, ascending.
    ///
    /// Only canonical `YYYY-MM-DD` keys count; `2024-1-15` or padded keys are
    /// dropped so that no two keys can land on the same day.
    pub fn work_logs(&self) -> Vec<(NaiveDate, i64)> {
        let Some(logs) = &self.time_spent_on_day else {
            return Vec::new();
        };
        let mut parsed: Vec<(NaiveDate, i64)> = logs
            .iter()
            .filter_map(|(key, ms)| match parse_date_key(key) {
                Ok(date) if to_date_key(date) == *key => Some((date, *ms)),
                _ => {
                    tracing::warn!(task = %self.id, key = %key, "ignoring malformed work log key");
                    None
                }
            })
            .collect();
        parsed.sort_by_key(|(date, _)| *date);
        parsed
    }
}

/// One line of a report: a task projected onto a single day.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportEntry {
    /// Copy of the underlying task.
    pub task: Task,
    /// Milliseconds of work attributed to this day, if any.
    pub time_spent: Option<i64>,
    /// Whether the entry comes from a work log rather than the completion date.
    pub is_work_log: bool,
    /// The work-log day this entry was derived from.
    pub work_log_date: Option<NaiveDate>,
}

/// Input of a single report generation.
#[derive(Debug, Clone, Copy)]
pub struct ReportRequest<'a> {
    /// First day of the range (`YYYY-MM-DD`).
    pub start_date: &'a str,
    /// Last day of the range (`YYYY-MM-DD`), inclusive.
    pub end_date: &'a str,
    /// Archived and active tasks, already merged.
    pub tasks: &'a [Task],
    /// Print task notes under each entry.
    pub include_notes: bool,
    /// Leave out dates without any entries.
    pub exclude_empty_dates: bool,
}

/// A generated report.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    pub text: String,
    pub start_date: String,
    pub end_date: String,
    /// Number of entries, not distinct tasks.
    pub total_tasks: usize,
    /// RFC 3339 UTC timestamp of generation.
    pub generated_at: String,
}

/// A report kept in the report store.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SavedReport {
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub text: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub start_date: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub end_date: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub include_notes: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub total_tasks: usize,
    #[serde(default, deserialize_with = "null_as_default")]
    pub generated_at: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub saved_at: String,
}

/// Report options remembered between runs.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Preferences {
    #[serde(default, deserialize_with = "null_as_default")]
    pub include_notes: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub exclude_empty_dates: bool,
}
