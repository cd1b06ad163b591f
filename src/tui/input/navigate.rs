use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::auth;
use crate::model::TaskStatus;
use crate::tui::app::{App, ConfirmState, FormState, Mode, MoveState, View};

use super::*;

pub(super) fn handle_navigate(app: &mut App, key: KeyEvent) {
    // Help overlay intercepts ? and Esc
    if app.show_help {
        if matches!(key.code, KeyCode::Char('?') | KeyCode::Esc | KeyCode::Char('q')) {
            app.show_help = false;
        }
        return;
    }

    // Clear any transient status message on keypress
    app.status_message = None;

    match (key.modifiers, key.code) {
        // Quit
        (KeyModifiers::CONTROL, KeyCode::Char('c')) | (_, KeyCode::Char('q')) => {
            app.should_quit = true;
        }

        // Help
        (_, KeyCode::Char('?')) => {
            app.show_help = true;
        }

        // View switching
        (_, KeyCode::Tab) => toggle_view(app),
        (_, KeyCode::Char('1')) => switch_view(app, View::List),
        (_, KeyCode::Char('2')) => switch_view(app, View::Board),

        // Cursor movement
        (_, KeyCode::Char('j') | KeyCode::Down) => move_down(app),
        (_, KeyCode::Char('k') | KeyCode::Up) => move_up(app),
        (_, KeyCode::Char('h') | KeyCode::Left) => move_left(app),
        (_, KeyCode::Char('l') | KeyCode::Right) => move_right(app),
        (_, KeyCode::Char('g') | KeyCode::Home) => jump_top(app),
        (_, KeyCode::Char('G') | KeyCode::End) => jump_bottom(app),

        // Task mutations (admin only)
        (_, KeyCode::Char('a')) => open_add_form(app),
        (_, KeyCode::Enter | KeyCode::Char('e')) => open_edit_form(app),
        (_, KeyCode::Char('d')) => open_delete_confirm(app),
        (_, KeyCode::Char('<')) => shift_status(app, false),
        (_, KeyCode::Char('>')) => shift_status(app, true),
        (_, KeyCode::Char(' ') | KeyCode::Char('m')) => pick_up_card(app),

        // List options
        (_, KeyCode::Char('c')) => toggle_completed(app),

        // Filter
        (_, KeyCode::Char('/')) => enter_filter(app),
        (_, KeyCode::Esc) => clear_filter(app),

        // Sync and session
        (_, KeyCode::Char('s')) => manual_sync(app),
        (_, KeyCode::Char('o')) => sign_out(app),

        _ => {}
    }
}

fn toggle_view(app: &mut App) {
    let next = match app.view {
        View::List => View::Board,
        _ => View::List,
    };
    switch_view(app, next);
}

fn switch_view(app: &mut App, view: View) {
    app.view = view;
    app.clamp_cursors();
}

fn move_down(app: &mut App) {
    match app.view {
        View::List => {
            let len = app.visible_tasks().len();
            if len > 0 && app.list_cursor + 1 < len {
                app.list_cursor += 1;
            }
        }
        View::Board => {
            let len = app.column_len(app.board_col);
            if len > 0 && app.board_row + 1 < len {
                app.board_row += 1;
            }
        }
        View::Login => {}
    }
}

fn move_up(app: &mut App) {
    match app.view {
        View::List => app.list_cursor = app.list_cursor.saturating_sub(1),
        View::Board => app.board_row = app.board_row.saturating_sub(1),
        View::Login => {}
    }
}

fn move_left(app: &mut App) {
    if app.view == View::Board && app.board_col > 0 {
        app.board_col -= 1;
        app.clamp_cursors();
    }
}

fn move_right(app: &mut App) {
    if app.view == View::Board && app.board_col + 1 < TaskStatus::ALL.len() {
        app.board_col += 1;
        app.clamp_cursors();
    }
}

fn jump_top(app: &mut App) {
    match app.view {
        View::List => app.list_cursor = 0,
        View::Board => app.board_row = 0,
        View::Login => {}
    }
}

fn jump_bottom(app: &mut App) {
    match app.view {
        View::List => {
            let len = app.visible_tasks().len();
            app.list_cursor = len.saturating_sub(1);
        }
        View::Board => {
            let len = app.column_len(app.board_col);
            app.board_row = len.saturating_sub(1);
        }
        View::Login => {}
    }
}

fn open_add_form(app: &mut App) {
    if !require_admin(app) {
        return;
    }
    let mut form = FormState::blank();
    // New cards land in the column under the cursor
    if app.view == View::Board
        && let Some(status) = TaskStatus::ALL.get(app.board_col)
    {
        form.status = *status;
    }
    app.form = Some(form);
    app.mode = Mode::Form;
}

fn open_edit_form(app: &mut App) {
    if !require_admin(app) {
        return;
    }
    if let Some(task) = app.selected_task() {
        let form = FormState::for_task(task);
        app.form = Some(form);
        app.mode = Mode::Form;
    }
}

fn open_delete_confirm(app: &mut App) {
    if !require_admin(app) {
        return;
    }
    if let Some(task) = app.selected_task() {
        let confirm = ConfirmState {
            task_id: task.id.clone(),
            title: task.title.clone(),
        };
        app.confirm = Some(confirm);
        app.mode = Mode::Confirm;
    }
}

fn shift_status(app: &mut App, forward: bool) {
    if !require_admin(app) {
        return;
    }
    let Some(task) = app.selected_task() else {
        return;
    };
    let id = task.id.clone();
    let current = task.status;
    let idx = TaskStatus::ALL
        .iter()
        .position(|s| *s == current)
        .unwrap_or(0);
    let next = if forward {
        match TaskStatus::ALL.get(idx + 1) {
            Some(status) => *status,
            None => return,
        }
    } else {
        match idx.checked_sub(1) {
            Some(prev) => TaskStatus::ALL[prev],
            None => return,
        }
    };
    set_status(app, &id, next);
    if app.view == View::Board {
        select_board_task(app, &id);
    }
}

fn pick_up_card(app: &mut App) {
    if app.view != View::Board {
        return;
    }
    if !require_admin(app) {
        return;
    }
    let Some(task) = app.selected_task() else {
        return;
    };
    let mv = MoveState {
        task_id: task.id.clone(),
        from: task.status,
        to: task.status,
    };
    app.moving = Some(mv);
    app.mode = Mode::Move;
}

fn toggle_completed(app: &mut App) {
    app.show_completed = !app.show_completed;
    app.clamp_cursors();
}

fn enter_filter(app: &mut App) {
    app.filter_input = app.active_filter.clone().unwrap_or_default();
    app.mode = Mode::Filter;
}

fn clear_filter(app: &mut App) {
    if app.active_filter.take().is_some() {
        app.clamp_cursors();
    }
}

fn manual_sync(app: &mut App) {
    if app.sync.is_none() {
        app.status_message = Some("mirroring is off (see `pk remote`)".to_string());
        return;
    }
    app.request_fetch();
}

fn sign_out(app: &mut App) {
    match auth::logout(app.store.paths()) {
        Ok(state) => {
            app.auth = state;
            app.view = View::Login;
            app.mode = Mode::Navigate;
            app.form = None;
            app.confirm = None;
            app.moving = None;
        }
        Err(err) => app.status_message = Some(err.to_string()),
    }
}
