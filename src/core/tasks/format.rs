use crate::api::tasks::{Task, TaskPriority};
use crate::core::message::{LineStyle, TranscriptLine};

use super::parse::format_due_date;

pub const TASK_DETAIL_WIDTH: usize = 69;

pub fn priority_style(priority: TaskPriority) -> LineStyle {
    match priority {
        TaskPriority::Low => LineStyle::Muted,
        TaskPriority::Medium => LineStyle::Info,
        TaskPriority::High => LineStyle::Warning,
        TaskPriority::Critical => LineStyle::Error,
    }
}

/// One list row: `N. [✓] [PRIORITY] title #tag (due DD-MM-YYYY)`.
pub fn task_list_line(index: usize, task: &Task) -> TranscriptLine {
    let (status, status_style) = if task.is_completed {
        ("[✓]", LineStyle::Success)
    } else {
        ("[ ]", LineStyle::Muted)
    };

    let mut line = TranscriptLine::plain(format!("{index}. "))
        .push(status_style, status)
        .push(LineStyle::Plain, " ")
        .push(
            priority_style(task.priority),
            format!("[{}]", task.priority.as_str().to_uppercase()),
        )
        .push(LineStyle::Plain, format!(" {}", task.title));

    if !task.tags.is_empty() {
        let tags: Vec<String> = task.tags.iter().map(|t| format!("#{t}")).collect();
        line = line.push(LineStyle::Accent, format!(" {}", tags.join(" ")));
    }
    if let Some(due) = task.due_date {
        line = line.push(
            LineStyle::Muted,
            format!(" (due {})", format_due_date(due.date_naive())),
        );
    }
    line
}

/// Rows for `(index, task)` pairs, or a single notice when there are none.
pub fn task_list_lines<'a, I>(entries: I, empty_notice: &str) -> Vec<TranscriptLine>
where
    I: IntoIterator<Item = (usize, &'a Task)>,
{
    let lines: Vec<TranscriptLine> = entries
        .into_iter()
        .map(|(index, task)| task_list_line(index, task))
        .collect();
    if lines.is_empty() {
        vec![TranscriptLine::warning(empty_notice)]
    } else {
        lines
    }
}

fn detail_row(label: &str, value: String, style: LineStyle) -> TranscriptLine {
    TranscriptLine::muted(format!("{label:<13}")).push(style, value)
}

pub fn task_detail_lines(task: &Task) -> Vec<TranscriptLine> {
    let rule = TranscriptLine::muted("─".repeat(TASK_DETAIL_WIDTH));
    let status = if task.is_completed {
        ("Completed".to_string(), LineStyle::Success)
    } else {
        ("Pending".to_string(), LineStyle::Warning)
    };
    let tags = if task.tags.is_empty() {
        "(none)".to_string()
    } else {
        task.tags.join(", ")
    };

    vec![
        rule.clone(),
        detail_row("ID:", task.id.clone(), LineStyle::Plain),
        detail_row("Title:", task.title.clone(), LineStyle::Accent),
        detail_row(
            "Description:",
            task.description
                .clone()
                .filter(|d| !d.trim().is_empty())
                .unwrap_or_else(|| "(none)".to_string()),
            LineStyle::Plain,
        ),
        detail_row(
            "Priority:",
            task.priority.as_str().to_string(),
            priority_style(task.priority),
        ),
        detail_row("Status:", status.0, status.1),
        detail_row("Tags:", tags, LineStyle::Plain),
        detail_row(
            "Created:",
            task.created_at.format("%d-%m-%Y %H:%M").to_string(),
            LineStyle::Plain,
        ),
        detail_row(
            "Due:",
            task.due_date
                .map(|d| format_due_date(d.date_naive()))
                .unwrap_or_else(|| "(none)".to_string()),
            LineStyle::Plain,
        ),
        rule,
    ]
}
