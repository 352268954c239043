use chrono::NaiveDate;

use crate::classify::Buckets;
use crate::dates::display_date;
use crate::models::ReportEntry;

const MS_PER_HOUR: i64 = 60 * 60 * 1000;
const MS_PER_MINUTE: i64 = 60 * 1000;

/// Rendering switches that do not affect classification.
#[derive(Debug, Clone, Copy, Default)]
pub struct RenderOptions {
    pub include_notes: bool,
    pub exclude_empty_dates: bool,
}

/// Formats a duration as `1h 30min`, `2h` or `45 min`.
///
/// Returns `None` when there is nothing worth printing (zero, negative, or under a minute).
pub fn format_duration(ms: i64) -> Option<String> {
    if ms <= 0 {
        return None;
    }
    let hours = ms / MS_PER_HOUR;
    let minutes = (ms % MS_PER_HOUR) / MS_PER_MINUTE;
    match (hours, minutes) {
        (0, 0) => None,
        (h, 0) => Some(format!("{}h", h)),
        (0, m) => Some(format!("{} min", m)),
        (h, m) => Some(format!("{}h {}min", h, m)),
    }
}

fn push_entry(lines: &mut Vec<String>, entry: &ReportEntry, include_notes: bool) {
    let mut line = format!("- {}", entry.task.title);
    if let Some(duration) = entry.time_spent.and_then(format_duration) {
        line.push_str(&format!(" *({})*", duration));
    }
    if !entry.task.is_done {
        line.push_str(" WIP");
    }
    lines.push(line);

    if include_notes {
        if let Some(notes) = entry.task.notes.as_deref().filter(|n| !n.is_empty()) {
            lines.push(format!("  {}", notes));
        }
    }
}

/// Renders the buckets as a Markdown document.
pub fn render_markdown(
    start: NaiveDate,
    end: NaiveDate,
    buckets: &Buckets,
    options: RenderOptions,
) -> String {
    let mut lines: Vec<String> = Vec::new();
    lines.push(format!("# Task Report: {} - {}", display_date(start), display_date(end)));
    lines.push(String::new());

    for (date, entries) in buckets.iter() {
        if entries.is_empty() && options.exclude_empty_dates {
            continue;
        }
        lines.push(format!("## {}", display_date(date)));
        lines.push(String::new());

        if entries.is_empty() {
            lines.push("*No tasks*".to_string());
        } else {
            for entry in entries {
                push_entry(&mut lines, entry, options.include_notes);
            }
        }
        lines.push(String::new());
    }

    lines.join("\n").trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::Window;
    use crate::models::Task;

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, day).unwrap()
    }

    #[test]
    fn test_format_duration_variants() {
        assert_eq!(format_duration(7_200_000).as_deref(), Some("2h"));
        assert_eq!(format_duration(5_400_000).as_deref(), Some("1h 30min"));
        assert_eq!(format_duration(2_700_000).as_deref(), Some("45 min"));
        assert_eq!(format_duration(0), None);
        assert_eq!(format_duration(30_000), None);
        assert_eq!(format_duration(-60_000), None);
    }

    #[test]
    fn test_render_empty_range() {
        let window = Window::new(d(15), d(15)).unwrap();
        let buckets = Buckets::for_range(window.days());
        let text = render_markdown(d(15), d(15), &buckets, RenderOptions::default());
        let expected = "\
# Task Report: Monday, January 15, 2024 - Monday, January 15, 2024

## Monday, January 15, 2024

*No tasks*";
        assert_eq!(text, expected);
    }

    #[test]
    fn test_render_entry_with_duration_wip_and_notes() {
        let window = Window::new(d(15), d(16)).unwrap();
        let mut task = Task::new(7i64, "Write docs");
        task.notes = Some("draft only".to_string());
        let buckets = Buckets::for_range(window.days()).absorb(
            &task,
            crate::classify::Contribution::SingleEntry(crate::classify::Placement {
                date: d(16),
                time_spent: Some(5_400_000),
                is_work_log: true,
            }),
        );
        let options = RenderOptions { include_notes: true, exclude_empty_dates: true };
        let expected = "\
# Task Report: Monday, January 15, 2024 - Tuesday, January 16, 2024

## Tuesday, January 16, 2024

- Write docs *(1h 30min)* WIP
  draft only";
        assert_eq!(render_markdown(d(15), d(16), &buckets, options), expected);
    }

    #[test]
    fn test_render_all_dates_excluded_leaves_title() {
        let window = Window::new(d(15), d(17)).unwrap();
        let options = RenderOptions { include_notes: false, exclude_empty_dates: true };
        let text = render_markdown(d(15), d(17), &Buckets::for_range(window.days()), options);
        assert_eq!(text, "# Task Report: Monday, January 15, 2024 - Wednesday, January 17, 2024");
    }
}
