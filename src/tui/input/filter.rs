use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::tui::app::{App, Mode};

pub(super) fn handle_filter(app: &mut App, key: KeyEvent) {
    match (key.modifiers, key.code) {
        (KeyModifiers::CONTROL, KeyCode::Char('c')) => {
            app.should_quit = true;
        }
        // Esc abandons the input; the previously applied filter survives
        (_, KeyCode::Esc) => {
            app.filter_input.clear();
            app.mode = Mode::Navigate;
        }
        (_, KeyCode::Enter) => apply_filter(app),
        (_, KeyCode::Backspace) => {
            app.filter_input.pop();
        }
        (KeyModifiers::NONE | KeyModifiers::SHIFT, KeyCode::Char(c)) => {
            app.filter_input.push(c);
        }
        _ => {}
    }
}

fn apply_filter(app: &mut App) {
    let pattern = app.filter_input.trim().to_string();
    app.active_filter = if pattern.is_empty() {
        None
    } else {
        Some(pattern)
    };
    app.filter_input.clear();
    app.mode = Mode::Navigate;
    app.clamp_cursors();
}
