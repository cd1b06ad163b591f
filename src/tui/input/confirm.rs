use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::ops::task_ops;
use crate::tui::app::{App, Mode};

use super::*;

pub(super) fn handle_confirm(app: &mut App, key: KeyEvent) {
    match (key.modifiers, key.code) {
        (KeyModifiers::CONTROL, KeyCode::Char('c')) => {
            app.should_quit = true;
        }
        // Confirm: y or Enter
        (_, KeyCode::Char('y') | KeyCode::Enter) => {
            let state = app.confirm.take();
            app.mode = Mode::Navigate;
            if let Some(state) = state {
                confirm_delete_task(app, &state.task_id, &state.title);
            }
        }
        // Cancel: n or Esc
        (_, KeyCode::Char('n') | KeyCode::Esc) => {
            app.confirm = None;
            app.mode = Mode::Navigate;
        }
        _ => {}
    }
}

fn confirm_delete_task(app: &mut App, task_id: &str, title: &str) {
    let (tasks, report) = task_ops::remove_task(&app.store, &app.tasks, task_id);
    app.apply_saved(tasks, &report);
    if app.status_message.is_none() {
        app.status_message = Some(format!("deleted \"{}\"", title));
    }
}
