use std::path::PathBuf;

use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, ContentArrangement, Table};

use crate::error::{ReportError, Result};
use crate::models::{Preferences, Report, ReportRequest, SavedReport, Task};
use crate::report::generate_report;
use crate::storage::{load_task_file, ReportStore};

/// Options of the `generate` command.
#[derive(Debug, Clone, Default)]
pub struct GenerateOptions {
    pub start: String,
    pub end: String,
    /// Active task exports.
    pub tasks: Vec<PathBuf>,
    /// Archived task exports, merged ahead of the active ones.
    pub archive: Vec<PathBuf>,
    /// Overrides the stored preference when set.
    pub include_notes: Option<bool>,
    /// Overrides the stored preference when set.
    pub exclude_empty_dates: Option<bool>,
    /// Save the report under this name.
    pub save: Option<String>,
    /// Print the report as JSON instead of Markdown.
    pub json: bool,
}

fn load_all_tasks(opts: &GenerateOptions) -> Result<Vec<Task>> {
    let mut tasks = Vec::new();
    for path in opts.archive.iter().chain(opts.tasks.iter()) {
        tasks.extend(load_task_file(path)?);
    }
    Ok(tasks)
}

/// Generates a report from task exports, prints it and optionally saves it.
///
/// Flags not given on the command line fall back to the stored preferences.
pub fn cmd_generate(
    opts: GenerateOptions,
    store: &mut ReportStore,
    silent: bool,
) -> Result<Report> {
    let tasks = load_all_tasks(&opts)?;
    let prefs = store.preferences().clone();
    let include_notes = opts.include_notes.unwrap_or(prefs.include_notes);

    let report = generate_report(ReportRequest {
        start_date: &opts.start,
        end_date: &opts.end,
        tasks: &tasks,
        include_notes,
        exclude_empty_dates: opts.exclude_empty_dates.unwrap_or(prefs.exclude_empty_dates),
    })?;

    if !silent {
        if opts.json {
            println!("{}", serde_json::to_string_pretty(&report)?);
        } else {
            println!("{}", report.text);
        }
    }

    if let Some(name) = &opts.save {
        let draft = SavedReport::from_report(&report, name.as_str(), include_notes);
        let saved = store.save_report(draft)?;
        if !silent { eprintln!("Report saved to {} (id = {})", store.path().display(), saved.id); }
    }
    Ok(report)
}

/// Lists saved reports in a table, newest first.
pub fn cmd_list(store: &ReportStore) {
    let reports = store.reports();
    if reports.is_empty() {
        println!("No saved reports yet.");
        return;
    }

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            Cell::new("ID").add_attribute(Attribute::Bold),
            Cell::new("Name").add_attribute(Attribute::Bold),
            Cell::new("Range").add_attribute(Attribute::Bold),
            Cell::new("Entries").add_attribute(Attribute::Bold),
            Cell::new("Generated").add_attribute(Attribute::Bold),
        ]);

    for r in reports {
        let range = if r.start_date == r.end_date {
            r.start_date.clone()
        } else {
            format!("{} .. {}", r.start_date, r.end_date)
        };
        table.add_row(vec![
            Cell::new(&r.id),
            Cell::new(&r.name),
            Cell::new(range),
            Cell::new(r.total_tasks),
            Cell::new(&r.generated_at),
        ]);
    }

    println!("{table}");
}

/// Prints the text of a saved report.
pub fn cmd_show(store: &ReportStore, id: &str) -> Result<()> {
    let report = store
        .report(id)
        .ok_or_else(|| ReportError::NotFound(id.to_string()))?;
    println!("{}", report.text);
    Ok(())
}

/// Deletes one or more saved reports.
pub fn cmd_delete(store: &mut ReportStore, ids: &[String], silent: bool) -> Result<usize> {
    let deleted = match ids {
        [id] => usize::from(store.delete_report(id)?),
        _ => store.delete_reports(ids)?,
    };
    if deleted == 0 {
        return Err(ReportError::NotFound(ids.join(", ")));
    }
    if !silent { println!("Deleted {} report(s).", deleted); }
    Ok(deleted)
}

/// Shows the stored preferences, updating any that are given.
pub fn cmd_prefs(
    store: &mut ReportStore,
    include_notes: Option<bool>,
    exclude_empty_dates: Option<bool>,
    silent: bool,
) -> Result<Preferences> {
    let mut prefs = store.preferences().clone();
    if include_notes.is_some() || exclude_empty_dates.is_some() {
        if let Some(v) = include_notes { prefs.include_notes = v; }
        if let Some(v) = exclude_empty_dates { prefs.exclude_empty_dates = v; }
        store.set_preferences(prefs.clone())?;
    }
    if !silent {
        println!("include notes:       {}", prefs.include_notes);
        println!("exclude empty dates: {}", prefs.exclude_empty_dates);
    }
    Ok(prefs)
}
