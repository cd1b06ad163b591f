use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use crate::tui::app::App;

use super::centered_rect;

/// Render the sign-in screen shown until a session exists
pub fn render_login_view(frame: &mut Frame, app: &App, area: Rect) {
    let overlay = centered_rect(50, 40, area);
    frame.render_widget(Clear, overlay);

    let bg = app.theme.background;
    let dim_style = Style::default().fg(app.theme.dim).bg(bg);

    let mut lines: Vec<Line> = Vec::new();
    lines.push(Line::from(Span::styled(
        " [#] plank",
        Style::default()
            .fg(app.theme.purple)
            .bg(bg)
            .add_modifier(Modifier::BOLD),
    )));
    lines.push(Line::from(""));
    lines.push(Line::from(vec![
        Span::styled(" username: ", Style::default().fg(app.theme.text).bg(bg)),
        Span::styled(
            app.login_input.clone(),
            Style::default().fg(app.theme.text_bright).bg(bg),
        ),
        Span::styled(
            "\u{258C}",
            Style::default().fg(app.theme.highlight).bg(bg),
        ),
    ]));
    lines.push(Line::from(""));
    if let Some(err) = &app.login_error {
        lines.push(Line::from(Span::styled(
            format!(" {}", err),
            Style::default().fg(app.theme.red).bg(bg),
        )));
    } else {
        lines.push(Line::from(Span::styled(
            " any name signs in; the admin account can change tasks",
            dim_style,
        )));
    }
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(" Enter sign in  Esc quit", dim_style)));

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(app.theme.dim).bg(bg))
        .style(Style::default().bg(bg));
    let paragraph = Paragraph::new(lines)
        .block(block)
        .style(Style::default().bg(bg));
    frame.render_widget(paragraph, overlay);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::app::View;
    use crate::tui::render::test_helpers::*;
    use tempfile::TempDir;

    #[test]
    fn prompt_shows_typed_username() {
        let tmp = TempDir::new().unwrap();
        let mut app = app_with_tasks(&tmp, Vec::new());
        app.view = View::Login;
        app.login_input = "ana".to_string();
        let output = render_to_string(TERM_W, TERM_H, |frame, area| {
            render_login_view(frame, &mut app, area);
        });
        assert!(output.contains("[#] plank"));
        assert!(output.contains("username: ana"));
        assert!(output.contains("Enter sign in"));
    }

    #[test]
    fn error_replaces_the_hint() {
        let tmp = TempDir::new().unwrap();
        let mut app = app_with_tasks(&tmp, Vec::new());
        app.view = View::Login;
        app.login_error = Some("username is required".to_string());
        let output = render_to_string(TERM_W, TERM_H, |frame, area| {
            render_login_view(frame, &mut app, area);
        });
        assert!(output.contains("username is required"));
        assert!(!output.contains("any name signs in"));
    }
}
