//! # taskreport
//!
//! Turns task-tracker exports into a Markdown activity report over a date range.
//!
//! Every task is assigned to the days it was worked on or completed:
//! tasks with several work-log days inside the range appear once per day,
//! a single work log on the completion day yields one entry with its duration,
//! and open tasks show up as `WIP` on the days they were worked on.
//! A `(task id, day)` pair is never listed twice, even when the same task is
//! present in both the archive and the active export.
//!
//! ```no_run
//! use taskreport::{generate_report, ReportRequest, Task};
//!
//! let tasks: Vec<Task> = Vec::new();
//! let report = generate_report(ReportRequest {
//!     start_date: "2024-01-15",
//!     end_date: "2024-01-21",
//!     tasks: &tasks,
//!     include_notes: true,
//!     exclude_empty_dates: false,
//! })?;
//! println!("{}", report.text);
//! # Ok::<(), taskreport::ReportError>(())
//! ```

pub mod classify;
pub mod commands;
pub mod dates;
pub mod error;
pub mod models;
pub mod render;
pub mod report;
pub mod storage;

pub use error::{ReportError, Result};
pub use models::{Report, ReportEntry, ReportRequest, SavedReport, Task, TaskId};
pub use report::generate_report;
