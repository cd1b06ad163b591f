use crate::model::TaskStatus;
use crate::ops::task_ops;
use crate::tui::app::App;

/// Gate a mutation on the admin role. Explains the refusal in the status
/// row when the current user can only read.
pub(super) fn require_admin(app: &mut App) -> bool {
    if app.is_admin() {
        return true;
    }
    app.status_message = Some("read-only: sign in as admin to change tasks".to_string());
    false
}

/// Persist a status change and report it in the status row
pub(super) fn set_status(app: &mut App, id: &str, status: TaskStatus) {
    match task_ops::update_task_status(&app.store, &app.tasks, id, status) {
        Ok((tasks, task, report)) => {
            app.apply_saved(tasks, &report);
            if app.status_message.is_none() {
                app.status_message = Some(format!("{} → {}", task.title, status.label()));
            }
        }
        Err(err) => app.status_message = Some(err.to_string()),
    }
}

/// Point the board cursor at a task after the layout changed
pub(super) fn select_board_task(app: &mut App, id: &str) {
    let mut target = None;
    {
        let columns = app.board();
        for (col, tasks) in columns.values().enumerate() {
            if let Some(row) = tasks.iter().position(|t| t.id == id) {
                target = Some((col, row));
                break;
            }
        }
    }
    if let Some((col, row)) = target {
        app.board_col = col;
        app.board_row = row;
    }
}
