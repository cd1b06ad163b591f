use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::model::TaskStatus;
use crate::tui::app::{App, Mode};

use super::*;

pub(super) fn handle_move(app: &mut App, key: KeyEvent) {
    match (key.modifiers, key.code) {
        (KeyModifiers::CONTROL, KeyCode::Char('c')) => {
            app.should_quit = true;
        }

        // Carry the card across columns
        (_, KeyCode::Char('h') | KeyCode::Left) => shift_target(app, false),
        (_, KeyCode::Char('l') | KeyCode::Right) => shift_target(app, true),

        // Drop: Enter, Space, or m again
        (_, KeyCode::Enter | KeyCode::Char(' ') | KeyCode::Char('m')) => drop_card(app),

        // Cancel
        (_, KeyCode::Esc) => cancel_move(app),

        _ => {}
    }
}

fn shift_target(app: &mut App, forward: bool) {
    let id = {
        let Some(mv) = &mut app.moving else { return };
        let idx = TaskStatus::ALL
            .iter()
            .position(|s| *s == mv.to)
            .unwrap_or(0);
        let next = if forward {
            (idx + 1).min(TaskStatus::ALL.len() - 1)
        } else {
            idx.saturating_sub(1)
        };
        mv.to = TaskStatus::ALL[next];
        mv.task_id.clone()
    };
    // Keep the cursor riding on the carried card
    select_board_task(app, &id);
}

fn drop_card(app: &mut App) {
    let Some(mv) = app.moving.take() else {
        app.mode = Mode::Navigate;
        return;
    };
    app.mode = Mode::Navigate;
    if mv.to != mv.from {
        set_status(app, &mv.task_id, mv.to);
    }
    select_board_task(app, &mv.task_id);
}

fn cancel_move(app: &mut App) {
    if let Some(mv) = app.moving.take() {
        select_board_task(app, &mv.task_id);
    }
    app.mode = Mode::Navigate;
}
