use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::model::{Task, TaskStatus};
use crate::tui::app::App;
use crate::util::unicode;

use super::helpers::{card_meta, column_header, spans_width};

/// Render the four status columns
pub fn render_board_view(frame: &mut Frame, app: &mut App, area: Rect) {
    let columns: Vec<(TaskStatus, Vec<Task>)> = app
        .board()
        .into_iter()
        .map(|(status, tasks)| (status, tasks.into_iter().cloned().collect()))
        .collect();

    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Ratio(1, 4),
            Constraint::Ratio(1, 4),
            Constraint::Ratio(1, 4),
            Constraint::Ratio(1, 4),
        ])
        .split(area);

    for (idx, (status, tasks)) in columns.iter().enumerate() {
        render_column(frame, app, chunks[idx], *status, tasks, idx);
    }
}

fn render_column(
    frame: &mut Frame,
    app: &App,
    area: Rect,
    status: TaskStatus,
    tasks: &[Task],
    col_idx: usize,
) {
    let bg = app.theme.background;
    let width = area.width as usize;
    let is_active_col = col_idx == app.board_col;

    let mut lines: Vec<Line> = Vec::new();

    // Header
    let header = column_header(status, tasks.len());
    lines.push(Line::from(Span::styled(
        format!(
            " {}",
            unicode::truncate_to_width(&header, width.saturating_sub(1))
        ),
        Style::default()
            .fg(app.theme.status_color(status))
            .bg(bg)
            .add_modifier(Modifier::BOLD),
    )));
    lines.push(Line::from(""));

    // Cards take three rows: title, meta, spacing
    let rows_visible = (area.height as usize).saturating_sub(2) / 3;
    let scroll = if is_active_col && rows_visible > 0 && app.board_row >= rows_visible {
        app.board_row + 1 - rows_visible
    } else {
        0
    };

    for (row, task) in tasks
        .iter()
        .enumerate()
        .skip(scroll)
        .take(rows_visible.max(1))
    {
        let is_cursor = is_active_col && row == app.board_row;
        let carried = matches!(&app.moving, Some(mv) if mv.task_id == task.id);
        let card_bg = if is_cursor { app.theme.selection_bg } else { bg };
        let bar_color = if carried {
            app.theme.highlight
        } else {
            app.theme.selection_border
        };

        // Title row
        let mut spans: Vec<Span> = Vec::new();
        if is_cursor {
            spans.push(Span::styled(
                "\u{258E}",
                Style::default().fg(bar_color).bg(card_bg),
            ));
        } else {
            spans.push(Span::styled(" ", Style::default().bg(bg)));
        }
        let title_style = if is_cursor {
            Style::default()
                .fg(app.theme.text_bright)
                .bg(card_bg)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(app.theme.text_bright).bg(card_bg)
        };
        spans.push(Span::styled(
            unicode::truncate_to_width(&task.title, width.saturating_sub(2)),
            title_style,
        ));
        pad_to_width(&mut spans, width, card_bg);
        lines.push(Line::from(spans));

        // Meta row
        let mut meta_spans: Vec<Span> = Vec::new();
        if is_cursor {
            meta_spans.push(Span::styled(
                "\u{258E}",
                Style::default().fg(bar_color).bg(card_bg),
            ));
        } else {
            meta_spans.push(Span::styled(" ", Style::default().bg(bg)));
        }
        meta_spans.push(Span::styled(
            format!(
                " {}",
                unicode::truncate_to_width(&card_meta(task), width.saturating_sub(3))
            ),
            Style::default().fg(app.theme.dim).bg(card_bg),
        ));
        pad_to_width(&mut meta_spans, width, card_bg);
        lines.push(Line::from(meta_spans));

        lines.push(Line::from(""));
    }

    let paragraph = Paragraph::new(lines).style(Style::default().bg(bg));
    frame.render_widget(paragraph, area);
}

fn pad_to_width(spans: &mut Vec<Span>, width: usize, bg: Color) {
    let content = spans_width(spans);
    if content < width {
        spans.push(Span::styled(
            " ".repeat(width - content),
            Style::default().bg(bg),
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::app::{MoveState, View};
    use crate::tui::render::test_helpers::*;
    use tempfile::TempDir;

    #[test]
    fn columns_carry_headers_and_counts() {
        let tmp = TempDir::new().unwrap();
        let mut app = app_with_tasks(&tmp, sample_tasks());
        app.view = View::Board;
        let output = render_to_string(TERM_W, TERM_H, |frame, area| {
            render_board_view(frame, &mut app, area);
        });
        assert!(output.contains("Backlog (1)"));
        assert!(output.contains("In Progress (1)"));
        assert!(output.contains("Ready to Check (1)"));
        assert!(output.contains("Done (1)"));
        assert!(output.contains("Fix save crash"));
        assert!(output.contains("(bug) @sam"));
    }

    #[test]
    fn carried_card_counts_toward_target_column() {
        let tmp = TempDir::new().unwrap();
        let mut app = app_with_tasks(&tmp, sample_tasks());
        app.view = View::Board;
        app.moving = Some(MoveState {
            task_id: "t2".to_string(),
            from: TaskStatus::InProgress,
            to: TaskStatus::Done,
        });
        let output = render_to_string(TERM_W, TERM_H, |frame, area| {
            render_board_view(frame, &mut app, area);
        });
        assert!(output.contains("In Progress (0)"));
        assert!(output.contains("Done (2)"));
    }
}
