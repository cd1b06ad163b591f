use ratatui::text::Span;

use crate::model::{Task, TaskStatus};
use crate::util::unicode;

/// One-line card metadata: type, assignee when set, subtask progress when any
pub(super) fn card_meta(task: &Task) -> String {
    let mut meta = format!("({})", task.task_type.as_str());
    if !task.assignee.is_empty() {
        meta.push_str(" @");
        meta.push_str(&task.assignee);
    }
    if let Some((done, total)) = task.subtask_progress() {
        meta.push_str(&format!(" [{}/{}]", done, total));
    }
    meta
}

/// Column heading with its card count
pub(super) fn column_header(status: TaskStatus, count: usize) -> String {
    format!("{} ({})", status.label(), count)
}

/// Compute total display width of a slice of spans
pub(super) fn spans_width(spans: &[Span]) -> usize {
    spans
        .iter()
        .map(|s| unicode::display_width(&s.content))
        .sum()
}
