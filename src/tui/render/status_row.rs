use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::tui::app::{App, Mode, View};
use crate::util::unicode;

/// Render the status row (bottom of screen)
pub fn render_status_row(frame: &mut Frame, app: &App, area: Rect) {
    let bg = app.theme.background;
    let width = area.width as usize;

    let line = match app.mode {
        Mode::Filter => {
            // Filter prompt: /pattern▌
            let mut spans = vec![
                Span::styled(
                    format!("/{}", app.filter_input),
                    Style::default().fg(app.theme.text_bright).bg(bg),
                ),
                Span::styled(
                    "\u{258C}",
                    Style::default().fg(app.theme.highlight).bg(bg),
                ),
            ];
            push_right_hint(&mut spans, "Enter apply  Esc cancel", width, app);
            Line::from(spans)
        }
        _ => {
            if let Some(msg) = &app.status_message {
                Line::from(Span::styled(
                    format!(" {}", unicode::truncate_to_width(msg, width.saturating_sub(1))),
                    Style::default().fg(app.theme.text_bright).bg(bg),
                ))
            } else if let Some(err) = &app.sync_error {
                Line::from(Span::styled(
                    format!(
                        " sync: {}",
                        unicode::truncate_to_width(err, width.saturating_sub(7))
                    ),
                    Style::default().fg(app.theme.red).bg(bg),
                ))
            } else {
                let mut spans: Vec<Span> = Vec::new();
                if let Some(pattern) = &app.active_filter {
                    spans.push(Span::styled(
                        format!("/{}", pattern),
                        Style::default().fg(app.theme.dim).bg(bg),
                    ));
                }
                if app.show_key_hints {
                    push_right_hint(&mut spans, hint_text(app), width, app);
                }
                Line::from(spans)
            }
        }
    };

    let paragraph = Paragraph::new(line).style(Style::default().bg(bg));
    frame.render_widget(paragraph, area);
}

fn push_right_hint<'a>(spans: &mut Vec<Span<'a>>, hint: &'a str, width: usize, app: &App) {
    let bg = app.theme.background;
    let content_width: usize = spans.iter().map(|s| s.content.chars().count()).sum();
    let hint_width = hint.chars().count();
    if content_width + hint_width < width {
        let padding = width - content_width - hint_width;
        spans.push(Span::styled(" ".repeat(padding), Style::default().bg(bg)));
        spans.push(Span::styled(hint, Style::default().fg(app.theme.dim).bg(bg)));
    }
}

fn hint_text(app: &App) -> &'static str {
    match app.mode {
        Mode::Move => "h/l carry  Enter drop  Esc cancel",
        Mode::Confirm => "y delete  n cancel",
        Mode::Form => "Tab field  Enter save  Esc cancel",
        _ => {
            if app.is_admin() {
                match app.view {
                    View::Board => "a add  e edit  d delete  Space move  / filter  ? help ",
                    _ => "a add  e edit  d delete  c done  / filter  ? help ",
                }
            } else {
                "read-only  / filter  s sync  o sign out  ? help "
            }
        }
    }
}
