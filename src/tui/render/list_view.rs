use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::model::Task;
use crate::tui::app::App;
use crate::util::unicode;

use super::helpers::spans_width;
use super::push_highlighted_spans;

/// Render the flat task list
pub fn render_list_view(frame: &mut Frame, app: &mut App, area: Rect) {
    let tasks: Vec<Task> = app.visible_tasks().into_iter().cloned().collect();

    if tasks.is_empty() {
        let text = if app.active_filter.is_some() {
            " No tasks match the filter (Esc clears it)"
        } else if app.show_completed {
            " No tasks yet. Press a to add one."
        } else {
            " Nothing open. Press c to include done tasks, a to add one."
        };
        let empty = Paragraph::new(text)
            .style(Style::default().fg(app.theme.dim).bg(app.theme.background));
        frame.render_widget(empty, area);
        return;
    }

    let cursor = app.list_cursor.min(tasks.len() - 1);
    app.list_cursor = cursor;
    let visible_height = area.height as usize;
    let width = area.width as usize;
    let filter_re = app.filter_regex();

    let hl_style = Style::default()
        .fg(app.theme.match_fg)
        .bg(app.theme.match_bg)
        .add_modifier(Modifier::BOLD);

    let mut lines: Vec<Line> = Vec::new();
    for (idx, task) in tasks.iter().enumerate() {
        let is_cursor = idx == cursor;
        let bg = if is_cursor {
            app.theme.selection_bg
        } else {
            app.theme.background
        };

        let mut spans: Vec<Span> = Vec::new();

        // Column 0 reservation
        if is_cursor {
            spans.push(Span::styled(
                "\u{258E}",
                Style::default()
                    .fg(app.theme.selection_border)
                    .bg(app.theme.selection_bg),
            ));
        } else {
            spans.push(Span::styled(" ", Style::default().bg(app.theme.background)));
        }

        // Status marker
        spans.push(Span::styled(
            format!("{} ", task.status.symbol()),
            Style::default()
                .fg(app.theme.status_color(task.status))
                .bg(bg),
        ));

        // Metadata suffix is laid out after the title, so reserve its width
        let mut suffix: Vec<Span> = Vec::new();
        suffix.push(Span::styled(
            format!(" ({})", task.task_type.as_str()),
            Style::default()
                .fg(app.theme.type_color(task.task_type))
                .bg(bg),
        ));
        if !task.assignee.is_empty() {
            suffix.push(Span::styled(
                format!(" @{}", task.assignee),
                Style::default().fg(app.theme.dim).bg(bg),
            ));
        }
        if let Some((done, total)) = task.subtask_progress() {
            suffix.push(Span::styled(
                format!(" [{}/{}]", done, total),
                Style::default().fg(app.theme.dim).bg(bg),
            ));
        }

        let title_style = if is_cursor {
            Style::default()
                .fg(app.theme.text_bright)
                .bg(bg)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(app.theme.text_bright).bg(bg)
        };
        let available = width
            .saturating_sub(spans_width(&spans) + spans_width(&suffix) + 1);
        let display_title = unicode::truncate_to_width(&task.title, available);
        push_highlighted_spans(
            &mut spans,
            &display_title,
            title_style,
            hl_style,
            filter_re.as_ref(),
        );
        spans.extend(suffix);

        // Pad to full width so the selection bg reaches the edge
        let content_width = spans_width(&spans);
        if content_width < width {
            spans.push(Span::styled(
                " ".repeat(width - content_width),
                Style::default().bg(bg),
            ));
        }

        lines.push(Line::from(spans));
    }

    // Auto-adjust scroll to keep cursor visible
    let mut scroll = app.list_scroll;
    if cursor < scroll {
        scroll = cursor;
    } else if visible_height > 0 && cursor >= scroll + visible_height {
        scroll = cursor.saturating_sub(visible_height - 1);
    }
    app.list_scroll = scroll;

    let visible_lines: Vec<Line> = lines
        .into_iter()
        .skip(scroll)
        .take(visible_height)
        .collect();
    let paragraph =
        Paragraph::new(visible_lines).style(Style::default().bg(app.theme.background));
    frame.render_widget(paragraph, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::render::test_helpers::*;
    use tempfile::TempDir;

    #[test]
    fn hides_done_tasks_by_default() {
        let tmp = TempDir::new().unwrap();
        let mut app = app_with_tasks(&tmp, sample_tasks());
        let output = render_to_string(TERM_W, TERM_H, |frame, area| {
            render_list_view(frame, &mut app, area);
        });
        assert!(output.contains("[ ] Design login page"));
        assert!(output.contains("[>] Fix save crash"));
        assert!(output.contains("[?] Update docs"));
        assert!(!output.contains("Ship beta"));
    }

    #[test]
    fn shows_meta_after_title() {
        let tmp = TempDir::new().unwrap();
        let mut app = app_with_tasks(&tmp, sample_tasks());
        let output = render_to_string(TERM_W, TERM_H, |frame, area| {
            render_list_view(frame, &mut app, area);
        });
        assert!(output.contains("Design login page (feature) @ana [1/2]"));
        assert!(output.contains("Fix save crash (bug) @sam"));
    }

    #[test]
    fn includes_done_when_toggled() {
        let tmp = TempDir::new().unwrap();
        let mut app = app_with_tasks(&tmp, sample_tasks());
        app.show_completed = true;
        let output = render_to_string(TERM_W, TERM_H, |frame, area| {
            render_list_view(frame, &mut app, area);
        });
        assert!(output.contains("[x] Ship beta"));
    }

    #[test]
    fn filter_narrows_rows() {
        let tmp = TempDir::new().unwrap();
        let mut app = app_with_tasks(&tmp, sample_tasks());
        app.active_filter = Some("docs".to_string());
        let output = render_to_string(TERM_W, TERM_H, |frame, area| {
            render_list_view(frame, &mut app, area);
        });
        assert!(output.contains("Update docs"));
        assert!(!output.contains("Fix save crash"));
    }

    #[test]
    fn empty_board_prompts_for_first_task() {
        let tmp = TempDir::new().unwrap();
        let mut app = app_with_tasks(&tmp, Vec::new());
        app.show_completed = true;
        let output = render_to_string(TERM_W, TERM_H, |frame, area| {
            render_list_view(frame, &mut app, area);
        });
        assert!(output.contains("No tasks yet"));
    }
}
