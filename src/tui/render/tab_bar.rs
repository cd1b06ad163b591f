use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::io::store::StorageMode;
use crate::tui::app::{App, View};

/// Render the tab bar: view tabs on the left, session and storage state on
/// the right, separator line below
pub fn render_tab_bar(frame: &mut Frame, app: &App, area: Rect) {
    // Split into tab row and separator row
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // tabs
            Constraint::Length(1), // separator
        ])
        .split(area);

    let sep_cols = render_tabs(frame, app, chunks[0]);
    render_separator(frame, app, chunks[1], &sep_cols);
}

/// Render tabs and return the column positions of each separator character.
fn render_tabs(frame: &mut Frame, app: &App, area: Rect) -> Vec<usize> {
    let mut spans: Vec<Span> = Vec::new();
    let mut sep_cols: Vec<usize> = Vec::new();
    let sep = Span::styled(
        "\u{2502}",
        Style::default().fg(app.theme.dim).bg(app.theme.background),
    );

    // Leading icon
    let bg_style = Style::default().bg(app.theme.background);
    spans.push(Span::styled(" ", bg_style));
    spans.push(Span::styled(
        "#",
        Style::default()
            .fg(app.theme.purple)
            .bg(app.theme.background),
    ));
    spans.push(Span::styled(" ", bg_style));

    // View tabs
    let is_list = app.view == View::List;
    spans.push(Span::styled(" List ", tab_style(app, is_list)));
    sep_cols.push(spans.iter().map(|s| s.content.chars().count()).sum());
    spans.push(sep.clone());

    let is_board = app.view == View::Board;
    spans.push(Span::styled(" Board ", tab_style(app, is_board)));
    sep_cols.push(spans.iter().map(|s| s.content.chars().count()).sum());
    spans.push(sep.clone());

    // Right side: who is signed in, where the data lives, sync state
    let mut right: Vec<Span> = Vec::new();
    if let Some(name) = app.auth.username() {
        let role = app
            .auth
            .user
            .as_ref()
            .map(|u| u.role.label())
            .unwrap_or("User");
        right.push(Span::styled(
            format!("{} ({})", name, role),
            Style::default().fg(app.theme.text).bg(app.theme.background),
        ));
        right.push(Span::styled("  ", bg_style));
    }
    let mode_color = match app.storage_mode {
        StorageMode::Mirrored => app.theme.cyan,
        StorageMode::LocalOnly => app.theme.dim,
    };
    right.push(Span::styled(
        app.storage_mode.label(),
        Style::default().fg(mode_color).bg(app.theme.background),
    ));
    if app.syncing {
        right.push(Span::styled(
            " ~",
            Style::default()
                .fg(app.theme.highlight)
                .bg(app.theme.background),
        ));
    }
    if app.sync_error.is_some() {
        right.push(Span::styled(
            " !",
            Style::default().fg(app.theme.red).bg(app.theme.background),
        ));
    }
    right.push(Span::styled(" ", bg_style));

    let width = area.width as usize;
    let left_width: usize = spans.iter().map(|s| s.content.chars().count()).sum();
    let right_width: usize = right.iter().map(|s| s.content.chars().count()).sum();
    if left_width + right_width < width {
        spans.push(Span::styled(
            " ".repeat(width - left_width - right_width),
            bg_style,
        ));
        spans.extend(right);
    }

    let line = Line::from(spans);
    let tabs = Paragraph::new(line).style(Style::default().bg(app.theme.background));
    frame.render_widget(tabs, area);
    sep_cols
}

fn render_separator(frame: &mut Frame, app: &App, area: Rect, sep_cols: &[usize]) {
    let width = area.width as usize;
    let bg = app.theme.background;
    let dim = app.theme.dim;

    if let Some(pattern) = &app.active_filter {
        // Indicator spans: "filter: " + /pattern
        let mut indicator_spans: Vec<Span> = Vec::new();
        indicator_spans.push(Span::styled(
            "filter: ",
            Style::default().fg(app.theme.purple).bg(bg),
        ));
        indicator_spans.push(Span::styled(
            format!("/{}", pattern),
            Style::default().fg(app.theme.text).bg(bg),
        ));

        let indicator_width: usize = indicator_spans
            .iter()
            .map(|s| s.content.chars().count())
            .sum();
        // +2: one space before indicator, one space after (right edge buffer)
        let separator_end = width.saturating_sub(indicator_width + 2);

        let mut spans: Vec<Span> = Vec::new();
        let mut sep_text = String::with_capacity(separator_end * 3);
        for col in 0..separator_end {
            if sep_cols.contains(&col) {
                sep_text.push('\u{2534}');
            } else {
                sep_text.push('\u{2500}');
            }
        }
        spans.push(Span::styled(sep_text, Style::default().fg(dim).bg(bg)));
        spans.push(Span::styled(" ", Style::default().bg(bg)));
        spans.extend(indicator_spans);
        let current_width: usize = spans.iter().map(|s| s.content.chars().count()).sum();
        if current_width < width {
            spans.push(Span::styled(
                " ".repeat(width - current_width),
                Style::default().bg(bg),
            ));
        }

        let line = Line::from(spans);
        let sep_widget = Paragraph::new(line).style(Style::default().bg(bg));
        frame.render_widget(sep_widget, area);
    } else {
        // No filter, plain separator
        let mut line: String = String::with_capacity(width * 3);
        for col in 0..width {
            if sep_cols.contains(&col) {
                line.push('\u{2534}');
            } else {
                line.push('\u{2500}');
            }
        }
        let sep_widget = Paragraph::new(line).style(Style::default().fg(dim).bg(bg));
        frame.render_widget(sep_widget, area);
    }
}

/// Style for a tab: highlighted if current, normal otherwise
fn tab_style(app: &App, is_current: bool) -> Style {
    if is_current {
        Style::default()
            .fg(app.theme.text_bright)
            .bg(app.theme.selection_bg)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(app.theme.text).bg(app.theme.background)
    }
}
