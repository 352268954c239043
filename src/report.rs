use chrono::{SecondsFormat, Utc};
use tracing::info;

use crate::classify::{bucketize, Window};
use crate::dates::parse_date_key;
use crate::error::Result;
use crate::models::{Report, ReportRequest};
use crate::render::{render_markdown, RenderOptions};

/// Builds a date-bucketed report for the requested range.
///
/// Fails with [`ReportError::InvalidRange`](crate::error::ReportError::InvalidRange)
/// when the start date lies after the end date, before any task is looked at.
pub fn generate_report(request: ReportRequest<'_>) -> Result<Report> {
    let start = parse_date_key(request.start_date)?;
    let end = parse_date_key(request.end_date)?;
    let window = Window::new(start, end)?;

    let buckets = bucketize(&window, request.tasks);
    let text = render_markdown(
        start,
        end,
        &buckets,
        RenderOptions {
            include_notes: request.include_notes,
            exclude_empty_dates: request.exclude_empty_dates,
        },
    );

    info!(
        start = request.start_date,
        end = request.end_date,
        tasks = request.tasks.len(),
        entries = buckets.total(),
        "generated report"
    );

    Ok(Report {
        text,
        start_date: request.start_date.to_string(),
        end_date: request.end_date.to_string(),
        total_tasks: buckets.total(),
        generated_at: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
    })
}
