//! Assignment of tasks to the days of a report.
//!
//! Each task is reduced to a handful of facts (completion day, in-range work
//! logs) and run through an ordered rule table. The first rule that fires
//! decides how many entries the task produces and on which days. Entries are
//! then folded into [`Buckets`], which owns the per-day lists, the
//! `(task id, day)` seen-set and the running total.

use std::collections::{BTreeMap, HashSet};

use chrono::NaiveDate;
use tracing::debug;

use crate::dates::{enumerate_range, DateRange};
use crate::error::{ReportError, Result};
use crate::models::{ReportEntry, Task};

/// Inclusive day window of a report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl Window {
    /// Builds a window, rejecting a start that lies after the end.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self> {
        if start > end {
            return Err(ReportError::InvalidRange { start, end });
        }
        Ok(Window { start, end })
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    pub fn days(&self) -> DateRange {
        enumerate_range(self.start, self.end)
    }
}

/// Where a single entry lands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    pub date: NaiveDate,
    pub time_spent: Option<i64>,
    pub is_work_log: bool,
}

impl Placement {
    fn work_log(date: NaiveDate, ms: i64) -> Self {
        Placement { date, time_spent: Some(ms), is_work_log: true }
    }
}

/// Outcome of classifying one task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Contribution {
    NoContribution,
    SingleEntry(Placement),
    MultiEntry(Vec<Placement>),
}

impl Contribution {
    fn from_work_logs(logs: &[(NaiveDate, i64)]) -> Self {
        match logs {
            [] => Contribution::NoContribution,
            [(date, ms)] => Contribution::SingleEntry(Placement::work_log(*date, *ms)),
            _ => Contribution::MultiEntry(
                logs.iter().map(|(date, ms)| Placement::work_log(*date, *ms)).collect(),
            ),
        }
    }

    pub fn placements(&self) -> &[Placement] {
        match self {
            Contribution::NoContribution => &[],
            Contribution::SingleEntry(p) => std::slice::from_ref(p),
            Contribution::MultiEntry(ps) => ps,
        }
    }
}

/// What the rules look at.
#[derive(Debug)]
struct Facts {
    /// Set only for done tasks with a usable completion timestamp.
    completion: Option<NaiveDate>,
    completion_in_range: bool,
    has_work_logs: bool,
    /// Ascending.
    logs_in_range: Vec<(NaiveDate, i64)>,
}

impl Facts {
    fn gather(task: &Task, window: &Window) -> Self {
        let completion = task.completion_date();
        Facts {
            completion,
            completion_in_range: completion.is_some_and(|d| window.contains(d)),
            has_work_logs: task.has_work_logs(),
            logs_in_range: task
                .work_logs()
                .into_iter()
                .filter(|(date, _)| window.contains(*date))
                .collect(),
        }
    }
}

type Rule = fn(&Facts) -> Option<Contribution>;

/// Evaluated top to bottom; the first `Some` wins.
const RULES: [(&str, Rule); 6] = [
    ("multi_day_work_logs", multi_day_work_logs),
    ("single_log_on_completion_day", single_log_on_completion_day),
    ("single_log_off_completion_day", single_log_off_completion_day),
    ("completed_in_range", completed_in_range),
    ("completed_out_of_range", completed_out_of_range),
    ("open_work_logs", open_work_logs),
];

fn multi_day_work_logs(f: &Facts) -> Option<Contribution> {
    (f.completion.is_some() && f.logs_in_range.len() > 1)
        .then(|| Contribution::from_work_logs(&f.logs_in_range))
}

fn single_log_on_completion_day(f: &Facts) -> Option<Contribution> {
    let completed = f.completion?;
    match f.logs_in_range.as_slice() {
        [(date, ms)] if *date == completed && f.completion_in_range => {
            Some(Contribution::SingleEntry(Placement {
                date: completed,
                time_spent: Some(*ms),
                is_work_log: false,
            }))
        }
        _ => None,
    }
}

fn single_log_off_completion_day(f: &Facts) -> Option<Contribution> {
    let completed = f.completion?;
    match f.logs_in_range.as_slice() {
        [(date, _)] if *date != completed => Some(Contribution::from_work_logs(&f.logs_in_range)),
        _ => None,
    }
}

fn completed_in_range(f: &Facts) -> Option<Contribution> {
    let completed = f.completion?;
    f.completion_in_range.then_some(Contribution::SingleEntry(Placement {
        date: completed,
        time_spent: None,
        is_work_log: false,
    }))
}

fn completed_out_of_range(f: &Facts) -> Option<Contribution> {
    f.completion.map(|_| Contribution::NoContribution)
}

fn open_work_logs(f: &Facts) -> Option<Contribution> {
    f.has_work_logs.then(|| Contribution::from_work_logs(&f.logs_in_range))
}

/// Decides which days of `window` receive an entry for `task`.
pub fn classify(task: &Task, window: &Window) -> Contribution {
    let facts = Facts::gather(task, window);
    for (name, rule) in RULES {
        if let Some(contribution) = rule(&facts) {
            debug!(
                task = %task.id,
                rule = name,
                entries = contribution.placements().len(),
                "classified task"
            );
            return contribution;
        }
    }
    Contribution::NoContribution
}

/// Per-day entry lists for a report, with duplicate tracking.
#[derive(Debug, Clone, Default)]
pub struct Buckets {
    days: BTreeMap<NaiveDate, Vec<ReportEntry>>,
    /// Keyed on [`TaskId::dedup_key`](crate::models::TaskId::dedup_key).
    seen: HashSet<(String, NaiveDate)>,
    total: usize,
}

impl Buckets {
    /// One empty bucket per day of the range.
    pub fn for_range(days: DateRange) -> Self {
        Buckets {
            days: days.map(|d| (d, Vec::new())).collect(),
            ..Default::default()
        }
    }

    /// Adds the entries of one classified task, skipping `(id, day)` pairs already present.
    pub fn absorb(mut self, task: &Task, contribution: Contribution) -> Self {
        for placement in contribution.placements() {
            let Some(bucket) = self.days.get_mut(&placement.date) else {
                continue;
            };
            if !self.seen.insert((task.id.dedup_key(), placement.date)) {
                debug!(task = %task.id, date = %placement.date, "skipping duplicate entry");
                continue;
            }
            bucket.push(ReportEntry {
                task: task.clone(),
                time_spent: placement.time_spent,
                is_work_log: placement.is_work_log,
                work_log_date: placement.is_work_log.then_some(placement.date),
            });
            self.total += 1;
        }
        self
    }

    /// Number of entries across all days.
    pub fn total(&self) -> usize {
        self.total
    }

    /// Days in ascending order with their entries.
    pub fn iter(&self) -> impl Iterator<Item = (NaiveDate, &[ReportEntry])> {
        self.days.iter().map(|(d, entries)| (*d, entries.as_slice()))
    }

    pub fn entries_on(&self, date: NaiveDate) -> &[ReportEntry] {
        self.days.get(&date).map(Vec::as_slice).unwrap_or(&[])
    }
}

/// Classifies every task against the window and folds the results into buckets.
pub fn bucketize(window: &Window, tasks: &[Task]) -> Buckets {
    tasks.iter().fold(Buckets::for_range(window.days()), |acc, task| {
        acc.absorb(task, classify(task, window))
    })
}
