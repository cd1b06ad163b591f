use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use crate::model::TaskStatus;
use crate::tui::app::{App, FormField};

use super::centered_rect;

/// Render the add/edit modal over the current view
pub fn render_task_form(frame: &mut Frame, app: &App, area: Rect) {
    let Some(form) = &app.form else { return };

    let overlay = centered_rect(60, 70, area);
    frame.render_widget(Clear, overlay);

    let bg = app.theme.background;
    let dim_style = Style::default().fg(app.theme.dim).bg(bg);

    let mut lines: Vec<Line> = Vec::new();
    lines.push(Line::from(""));

    lines.push(field_line(
        app,
        FormField::Title,
        form.focus,
        form.title.clone(),
        false,
    ));
    lines.push(field_line(
        app,
        FormField::Description,
        form.focus,
        form.description.clone(),
        false,
    ));
    lines.push(field_line(
        app,
        FormField::Type,
        form.focus,
        form.task_type.as_str().to_string(),
        true,
    ));
    lines.push(field_line(
        app,
        FormField::Status,
        form.focus,
        form.status.as_str().to_string(),
        true,
    ));
    lines.push(field_line(
        app,
        FormField::Assignee,
        form.focus,
        form.assignee.clone(),
        false,
    ));

    // Subtask list under its label
    let subtasks_focused = form.focus == FormField::Subtasks;
    lines.push(Line::from(Span::styled(
        format!(" {:<12}", FormField::Subtasks.label()),
        label_style(app, subtasks_focused),
    )));
    for (i, sub) in form.subtasks.iter().enumerate() {
        let selected = subtasks_focused && i == form.subtask_cursor;
        let mut spans: Vec<Span> = Vec::new();
        if selected {
            spans.push(Span::styled(
                " \u{258E}",
                Style::default().fg(app.theme.selection_border).bg(bg),
            ));
        } else {
            spans.push(Span::styled("  ", Style::default().bg(bg)));
        }
        let mark = if sub.completed { "[x]" } else { "[ ]" };
        let mark_color = if sub.completed {
            app.theme.status_color(TaskStatus::Done)
        } else {
            app.theme.text
        };
        spans.push(Span::styled(
            format!(" {} ", mark),
            Style::default().fg(mark_color).bg(bg),
        ));
        spans.push(Span::styled(
            sub.title.clone(),
            Style::default().fg(app.theme.text_bright).bg(bg),
        ));
        if selected {
            spans.push(Span::styled(
                "\u{258C}",
                Style::default().fg(app.theme.highlight).bg(bg),
            ));
        }
        lines.push(Line::from(spans));
    }
    if form.subtasks.is_empty() {
        lines.push(Line::from(Span::styled(
            "   none (Ctrl+N adds one)",
            dim_style,
        )));
    }

    if let Some(err) = &form.error {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            format!(" {}", err),
            Style::default().fg(app.theme.red).bg(bg),
        )));
    }

    lines.push(Line::from(""));
    let hint = if subtasks_focused {
        " Ctrl+N add  Ctrl+T toggle  Ctrl+D remove  Enter save  Esc cancel"
    } else {
        " Tab next field  \u{2190}/\u{2192} cycle choices  Enter save  Esc cancel"
    };
    lines.push(Line::from(Span::styled(hint, dim_style)));

    let title = if form.task_id.is_some() {
        " Edit Task "
    } else {
        " Add Task "
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .title(title)
        .title_style(
            Style::default()
                .fg(app.theme.text_bright)
                .bg(bg)
                .add_modifier(Modifier::BOLD),
        )
        .border_style(Style::default().fg(app.theme.dim).bg(bg))
        .style(Style::default().bg(bg));
    let paragraph = Paragraph::new(lines)
        .block(block)
        .style(Style::default().bg(bg));
    frame.render_widget(paragraph, overlay);
}

fn label_style(app: &App, focused: bool) -> Style {
    if focused {
        Style::default()
            .fg(app.theme.highlight)
            .bg(app.theme.background)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default()
            .fg(app.theme.text)
            .bg(app.theme.background)
    }
}

fn field_line<'a>(
    app: &App,
    field: FormField,
    focus: FormField,
    value: String,
    is_choice: bool,
) -> Line<'a> {
    let bg = app.theme.background;
    let focused = field == focus;
    let mut spans = vec![Span::styled(
        format!(" {:<12}", field.label()),
        label_style(app, focused),
    )];
    let shown = if is_choice {
        format!("< {} >", value)
    } else {
        value
    };
    spans.push(Span::styled(
        shown,
        Style::default().fg(app.theme.text_bright).bg(bg),
    ));
    if focused && !is_choice {
        spans.push(Span::styled(
            "\u{258C}",
            Style::default().fg(app.theme.highlight).bg(bg),
        ));
    }
    Line::from(spans)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::app::FormState;
    use crate::tui::render::test_helpers::*;
    use tempfile::TempDir;

    #[test]
    fn blank_form_offers_defaults() {
        let tmp = TempDir::new().unwrap();
        let mut app = app_with_tasks(&tmp, Vec::new());
        app.form = Some(FormState::blank());
        let output = render_to_string(TERM_W, TERM_H, |frame, area| {
            render_task_form(frame, &mut app, area);
        });
        assert!(output.contains("Add Task"));
        assert!(output.contains("< task >"));
        assert!(output.contains("< backlog >"));
        assert!(output.contains("none (Ctrl+N adds one)"));
    }

    #[test]
    fn edit_form_carries_task_fields() {
        let tmp = TempDir::new().unwrap();
        let tasks = sample_tasks();
        let mut app = app_with_tasks(&tmp, tasks.clone());
        app.form = Some(FormState::for_task(&tasks[0]));
        let output = render_to_string(TERM_W, TERM_H, |frame, area| {
            render_task_form(frame, &mut app, area);
        });
        assert!(output.contains("Edit Task"));
        assert!(output.contains("Design login page"));
        assert!(output.contains("< feature >"));
        assert!(output.contains("[x] sketch layout"));
        assert!(output.contains("[ ] review with team"));
    }

    #[test]
    fn validation_error_is_shown() {
        let tmp = TempDir::new().unwrap();
        let mut app = app_with_tasks(&tmp, Vec::new());
        let mut form = FormState::blank();
        form.error = Some("title is required".to_string());
        app.form = Some(form);
        let output = render_to_string(TERM_W, TERM_H, |frame, area| {
            render_task_form(frame, &mut app, area);
        });
        assert!(output.contains("title is required"));
    }
}
